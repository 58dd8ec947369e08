//! Excel报告输出（CLI版）
//!
//! 工作簿内容由 common 的 excel_core 生成，这里只负责时间戳与落盘。

use crate::error::{LossAuditError, Result};
use loss_audit_common::export::excel_core::generate_report_buffer;
use loss_audit_common::AuditReport;
use std::path::Path;

/// 注释行使用的生成时间
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

pub fn write_excel(report: &AuditReport, output_path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(report, &timestamp()).map_err(LossAuditError::ExcelWrite)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}
