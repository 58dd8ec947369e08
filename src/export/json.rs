//! JSON报告输出

use crate::error::Result;
use loss_audit_common::AuditReport;
use std::path::Path;

pub fn write_json(report: &AuditReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = report.to_json_string()?;
    std::fs::write(output_path, content)?;
    Ok(())
}
