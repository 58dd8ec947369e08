pub mod excel;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use loss_audit_common::AuditReport;
use std::path::{Path, PathBuf};

fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.json", stem)),
            output.join(format!("{}.xlsx", stem)),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
        (
            parent.join(format!("{}.json", stem)),
            parent.join(format!("{}.xlsx", stem)),
        )
    }
}

/// 按格式输出分析报告，返回写出的文件
///
/// `output` 为目录（或无扩展名）时在其下生成 `{stem}.json` / `{stem}.xlsx`。
pub fn export_report(
    report: &AuditReport,
    format: &ExportFormat,
    output: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    let written = match format {
        ExportFormat::Json => {
            let path = output_path_for_format(output, stem, "json");
            json::write_json(report, &path)?;
            vec![path]
        }
        ExportFormat::Excel => {
            let path = output_path_for_format(output, stem, "xlsx");
            excel::write_excel(report, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (json_path, excel_path) = output_paths_for_both(output, stem);
            json::write_json(report, &json_path)?;
            excel::write_excel(report, &excel_path)?;
            vec![json_path, excel_path]
        }
    };

    for path in &written {
        tracing::info!("已输出: {}", path.display());
    }
    Ok(written)
}
