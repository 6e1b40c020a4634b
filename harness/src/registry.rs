//! Registry of boolean-result tests
//!
//! Tests are kept in registration order and run in that order. A run resets
//! the pass/fail counters before tallying, so running twice does not
//! accumulate. The same test may be registered more than once; every entry
//! is run and counted.
//!
//! # Examples
//!
//! ```rust
//! use harness::registry::TestRegistry;
//!
//! let mut registry = TestRegistry::new();
//! registry.add_fn("addition", || 1 + 1 == 2);
//! registry.add_fn("wishful", || false);
//!
//! let summary = registry.run();
//! assert_eq!((summary.total, summary.passed, summary.failed), (2, 1, 1));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};

/// Something that can run a check and say whether it passed
pub trait Testable: Send {
    fn name(&self) -> &str;
    fn check(&self) -> bool;
}

/// Static test objects register by reference and keep owning themselves.
impl<T> Testable for &'static T
where
    T: Testable + Sync + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn check(&self) -> bool {
        (**self).check()
    }
}

impl<T> Testable for Arc<T>
where
    T: Testable + Sync + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn check(&self) -> bool {
        (**self).check()
    }
}

/// A named closure used as a test
pub struct FnTest<F> {
    name: String,
    check: F,
}

impl<F> FnTest<F>
where
    F: Fn() -> bool + Send,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> Testable for FnTest<F>
where
    F: Fn() -> bool + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> bool {
        (self.check)()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
}

/// Counts of a registry at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Names of the tests that failed in the last run
    pub failures: Vec<String>,
}

impl TestSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total: {}", self.total)?;
        writeln!(f, "Passed: {}", self.passed)?;
        writeln!(f, "Failed: {}", self.failed)?;
        for name in &self.failures {
            writeln!(f, "  FAILED: {}", name)?;
        }
        Ok(())
    }
}

static INSTANCE: OnceLock<Mutex<TestRegistry>> = OnceLock::new();

#[derive(Default)]
pub struct TestRegistry {
    tests: Vec<Box<dyn Testable>>,
    passed: usize,
    failed: usize,
    outcomes: Vec<TestOutcome>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use.
    ///
    /// Prefer an owned registry passed around through
    /// [`crate::context::Context`]; this exists for code that has no handle
    /// to one.
    pub fn instance() -> &'static Mutex<TestRegistry> {
        INSTANCE.get_or_init(|| Mutex::new(TestRegistry::new()))
    }

    /// Append `test` to the run order. Duplicates are kept.
    pub fn add_test(&mut self, test: impl Testable + 'static) {
        self.tests.push(Box::new(test));
    }

    pub fn add_fn<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn() -> bool + Send + 'static,
    {
        self.add_test(FnTest::new(name, check));
    }

    /// Run every registered test in registration order.
    ///
    /// A check that panics is not contained; the panic leaves this call.
    pub fn run(&mut self) -> TestSummary {
        self.passed = 0;
        self.failed = 0;
        self.outcomes.clear();

        for test in &self.tests {
            let passed = test.check();
            debug!(test = test.name(), passed, "test finished");

            if passed {
                self.passed += 1;
            } else {
                self.failed += 1;
            }
            self.outcomes.push(TestOutcome {
                name: test.name().to_string(),
                passed,
            });
        }

        info!(
            total = self.count(),
            passed = self.passed,
            failed = self.failed,
            "test run complete"
        );
        self.summary()
    }

    /// Write the total/passed/failed counts, then the failed test names.
    pub fn report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.summary())
    }

    pub fn summary(&self) -> TestSummary {
        TestSummary {
            total: self.count(),
            passed: self.passed,
            failed: self.failed,
            failures: self
                .outcomes
                .iter()
                .filter(|o| !o.passed)
                .map(|o| o.name.clone())
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.tests.len()
    }

    pub fn passed_count(&self) -> usize {
        self.passed
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Per-test results of the last run, in run order
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn names(&self) -> Vec<&str> {
        self.tests.iter().map(|t| t.name()).collect()
    }
}

impl fmt::Debug for TestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRegistry")
            .field("tests", &self.names())
            .field("passed", &self.passed)
            .field("failed", &self.failed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysPasses;

    impl Testable for AlwaysPasses {
        fn name(&self) -> &str {
            "always_passes"
        }

        fn check(&self) -> bool {
            true
        }
    }

    static ALWAYS_PASSES: AlwaysPasses = AlwaysPasses;

    struct CountingTest {
        calls: AtomicUsize,
    }

    impl Testable for CountingTest {
        fn name(&self) -> &str {
            "counting"
        }

        fn check(&self) -> bool {
            // Passes on odd calls only
            self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0
        }
    }

    #[test]
    fn test_count_tracks_registrations() {
        let mut registry = TestRegistry::new();
        for i in 0..5 {
            registry.add_fn(format!("t{}", i), || true);
            assert_eq!(registry.count(), i + 1);
        }
    }

    #[test]
    fn test_same_object_registered_twice_counts_twice() {
        let mut registry = TestRegistry::new();
        registry.add_test(&ALWAYS_PASSES);
        registry.add_test(&ALWAYS_PASSES);

        assert_eq!(registry.count(), 2);
        let summary = registry.run();
        assert_eq!(summary.passed, 2);
        assert_eq!(registry.names(), vec!["always_passes", "always_passes"]);
    }

    #[test]
    fn test_pass_fail_pass_scenario() {
        let mut registry = TestRegistry::new();
        registry.add_fn("first", || true);
        registry.add_fn("second", || false);
        registry.add_fn("third", || true);

        registry.run();
        assert_eq!(registry.count(), 3);
        assert_eq!(registry.passed_count(), 2);
        assert_eq!(registry.failed_count(), 1);

        let mut out = Vec::new();
        registry.report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("Total: 3"));
        assert!(report.contains("Passed: 2"));
        assert!(report.contains("Failed: 1"));
        assert!(report.contains("FAILED: second"));
    }

    #[test]
    fn test_report_before_run() {
        let mut registry = TestRegistry::new();
        registry.add_fn("pending", || true);

        let mut out = Vec::new();
        registry.report(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total: 1\nPassed: 0\nFailed: 0\n"
        );
        assert_eq!(registry.passed_count(), 0);
        assert_eq!(registry.failed_count(), 0);
    }

    #[test]
    fn test_run_resets_counters() {
        let mut registry = TestRegistry::new();
        registry.add_fn("yes", || true);
        registry.add_fn("no", || false);

        let first = registry.run();
        let second = registry.run();
        assert_eq!(first, second);
        assert_eq!(second.passed + second.failed, second.total);
    }

    #[test]
    fn test_nondeterministic_check_changes_tally() {
        let counting = Arc::new(CountingTest {
            calls: AtomicUsize::new(0),
        });
        let mut registry = TestRegistry::new();
        registry.add_test(counting.clone());

        assert_eq!(registry.run().passed, 1);
        assert_eq!(registry.run().failed, 1);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_runs_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = TestRegistry::new();
        for name in ["c", "a", "b"] {
            let order = order.clone();
            registry.add_fn(name, move || {
                order.lock().unwrap().push(name);
                true
            });
        }

        registry.run();
        assert_eq!(*order.lock().unwrap(), vec!["c", "a", "b"]);
        let names: Vec<_> = registry.outcomes().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_registry_run() {
        let mut registry = TestRegistry::new();
        let summary = registry.run();
        assert_eq!(summary.total, 0);
        assert!(summary.all_passed());
    }

    #[test]
    #[should_panic(expected = "check exploded")]
    fn test_panicking_check_propagates() {
        let mut registry = TestRegistry::new();
        registry.add_fn("explodes", || panic!("check exploded"));
        registry.run();
    }

    #[test]
    fn test_summary_serialization() {
        let mut registry = TestRegistry::new();
        registry.add_fn("broken", || false);
        let summary = registry.run();

        let json = serde_json::to_string(&summary).unwrap();
        let deserialized: TestSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, summary);
        assert_eq!(deserialized.failures, vec!["broken".to_string()]);
    }

    #[test]
    #[serial]
    fn test_instance_is_shared() {
        let first = TestRegistry::instance() as *const _;
        let second = TestRegistry::instance() as *const _;
        assert_eq!(first, second);

        let mut registry = TestRegistry::instance().lock().unwrap();
        let before = registry.count();
        registry.add_test(&ALWAYS_PASSES);
        assert_eq!(registry.count(), before + 1);
    }
}
