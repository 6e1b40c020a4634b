// Formatting front-ends for `LogSink`: compose the message, then hand it over.

#[macro_export]
macro_rules! log_at {
    ($sink:expr, $level:expr, $($arg:tt)*) => {
        $sink.log($level, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_trace {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log_at!($sink, $crate::Level::Trace, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log_at!($sink, $crate::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log_at!($sink, $crate::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log_at!($sink, $crate::Level::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log_at!($sink, $crate::Level::Error, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log_at!($sink, $crate::Level::Fatal, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::sink::{CaptureBuffer, LogSink};

    #[test]
    fn test_macros_compose_message() {
        let console = CaptureBuffer::new();
        let mut sink = LogSink::with_console(console.clone()).with_color(false);

        log_info!(sink, "loaded {} of {}", 2, 5);
        log_fatal!(sink, "giving up on {:?}", "x.log");

        assert_eq!(
            console.contents(),
            "[INFO]: loaded 2 of 5\n[FATAL]: giving up on \"x.log\"\n"
        );
    }

    #[test]
    fn test_macros_accept_guards() {
        let console = CaptureBuffer::new();
        let shared = LogSink::with_console(console.clone())
            .with_color(false)
            .into_shared();

        log_warn!(shared.lock().unwrap(), "through a {}", "guard");

        assert_eq!(console.contents(), "[WARN]: through a guard\n");
    }
}
