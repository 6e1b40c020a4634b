use crate::error::HarnessResult;
use crate::registry::TestSummary;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `Total:`/`Passed:`/`Failed:` lines
    #[default]
    Text,
    /// The summary as a JSON object
    Json,
}

pub fn write_summary<W: Write + ?Sized>(
    summary: &TestSummary,
    format: ReportFormat,
    out: &mut W,
) -> HarnessResult<()> {
    match format {
        ReportFormat::Text => write!(out, "{}", summary)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
