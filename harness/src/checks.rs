//! Built-in self-checks of the log sink.
//!
//! [`register_builtin_checks`] is the one place these get registered; there
//! is no self-registration.

use crate::error::HarnessResult;
use crate::registry::TestRegistry;
use logger::level::RESET_COLOR;
use logger::{CaptureBuffer, Level, LogSink, LoggerError};
use std::collections::HashSet;
use std::fs;
use tracing::warn;

pub fn register_builtin_checks(registry: &mut TestRegistry) {
    registry.add_fn("level_tags_are_bracketed", level_tags_are_bracketed);
    registry.add_fn("level_colors_are_distinct", level_colors_are_distinct);
    registry.add_fn("file_lines_are_plain", || passes(file_lines_are_plain()));
    registry.add_fn("file_is_appended_on_reopen", || {
        passes(file_is_appended_on_reopen())
    });
    registry.add_fn("failed_open_keeps_previous_file", || {
        passes(failed_open_keeps_previous_file())
    });
    registry.add_fn("try_open_reports_failure", || {
        passes(try_open_reports_failure())
    });
    registry.add_fn("reopen_routes_to_new_file", || {
        passes(reopen_routes_to_new_file())
    });
    registry.add_fn("close_without_file_is_noop", close_without_file_is_noop);
}

/// A check that could not set itself up counts as failed
fn passes(result: HarnessResult<bool>) -> bool {
    match result {
        Ok(passed) => passed,
        Err(e) => {
            warn!(error = %e, "check could not run");
            false
        }
    }
}

fn captured_sink() -> (LogSink, CaptureBuffer) {
    let console = CaptureBuffer::new();
    (LogSink::with_console(console.clone()), console)
}

fn level_tags_are_bracketed() -> bool {
    let (mut sink, console) = captured_sink();
    Level::ALL.iter().all(|&level| {
        console.clear();
        sink.log(level, "probe");
        console.contents()
            == format!(
                "{}[{}]{}: probe{}\n",
                level.color(),
                level.as_str(),
                RESET_COLOR,
                RESET_COLOR
            )
    })
}

fn level_colors_are_distinct() -> bool {
    let colors: HashSet<_> = Level::ALL.iter().map(|l| l.color()).collect();
    colors.len() == Level::ALL.len()
}

fn file_lines_are_plain() -> HarnessResult<bool> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("plain.log");
    let (mut sink, _console) = captured_sink();

    sink.try_open_file(&path)?;
    sink.info("hello");
    sink.close_file();

    let content = fs::read_to_string(&path)?;
    Ok(content.lines().last() == Some("[INFO]: hello") && !content.contains('\x1b'))
}

fn file_is_appended_on_reopen() -> HarnessResult<bool> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("append.log");

    for message in ["first", "second"] {
        let (mut sink, _console) = captured_sink();
        sink.try_open_file(&path)?;
        sink.info(message);
    }

    let content = fs::read_to_string(&path)?;
    let first = content.find("[INFO]: first");
    let second = content.find("[INFO]: second");
    Ok(matches!((first, second), (Some(a), Some(b)) if a < b))
}

fn failed_open_keeps_previous_file() -> HarnessResult<bool> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("good.log");
    let bad = dir.path().join("missing").join("bad.log");
    let (mut sink, _console) = captured_sink();

    sink.try_open_file(&good)?;
    sink.open_file(&bad);
    sink.info("after");

    let content = fs::read_to_string(&good)?;
    Ok(sink.file_path() == Some(good.as_path())
        && content.contains("[ERROR]: Failed to open file")
        && content.lines().last() == Some("[INFO]: after"))
}

fn try_open_reports_failure() -> HarnessResult<bool> {
    let dir = tempfile::tempdir()?;
    let bad = dir.path().join("missing").join("bad.log");
    let (mut sink, console) = captured_sink();

    let failed = matches!(
        sink.try_open_file(&bad),
        Err(LoggerError::OpenFailed { .. })
    );
    Ok(failed && !sink.is_file_open() && console.contents().is_empty())
}

fn reopen_routes_to_new_file() -> HarnessResult<bool> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let (mut sink, _console) = captured_sink();

    sink.try_open_file(&first)?;
    sink.try_open_file(&second)?;
    sink.info("routed");

    let first_content = fs::read_to_string(&first)?;
    let second_content = fs::read_to_string(&second)?;
    Ok(first_content.contains("Changing log files to")
        && !first_content.contains("routed")
        && second_content.contains("[INFO]: routed"))
}

fn close_without_file_is_noop() -> bool {
    let (mut sink, console) = captured_sink();
    sink.close_file();
    sink.close_file();
    sink.info("console only");
    !sink.is_file_open() && console.contents().contains("[INFO]")
}
