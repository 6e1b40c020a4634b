pub mod checks;
pub mod cli;
pub mod context;
pub mod error;
pub mod registry;
pub mod report;

pub use checks::register_builtin_checks;
pub use context::Context;
pub use error::{HarnessError, HarnessResult};
pub use registry::{FnTest, TestOutcome, TestRegistry, TestSummary, Testable};
pub use report::{write_summary, ReportFormat};
