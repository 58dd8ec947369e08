//! 批量分析
//!
//! 扫描文件夹中的 .xlsx 文件，并行分析，每个文件使用独立的 AuditSession。

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::error::{LossAuditError, Result};
use crate::export;
use crate::ingest;
use indicatif::{ProgressBar, ProgressStyle};
use loss_audit_common::AuditSession;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// 单个文件的处理结果
#[derive(Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub outcome: std::result::Result<BatchSummary, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub outputs: Vec<PathBuf>,
    pub exception_projects: usize,
    pub failed_rules: usize,
}

fn is_excel_file(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("~$"))
        .unwrap_or(false);
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| EXCEL_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);
    has_ext && !is_lock_file
}

/// 扫描文件夹（`recursive` 为 false 时只看直下）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(LossAuditError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_excel_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// 单个文件的输出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub stem: String,
}

/// 输出文件名（不含扩展名）
pub fn default_stem(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("loss-audit");
    format!("{}_分析结果", stem)
}

fn output_dir_for(input: &Path, config: &Config, output_dir: Option<&Path>) -> PathBuf {
    output_dir
        .map(Path::to_path_buf)
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| input.parent().unwrap_or_else(|| Path::new(".")).to_path_buf())
}

/// 为每个输入文件确定输出位置
///
/// 同名文件输出到同一目录时依次加 `_1`、`_2` 后缀（不区分大小写）。
pub fn plan_outputs(files: &[PathBuf], config: &Config, output_dir: Option<&Path>) -> Vec<OutputTarget> {
    let mut used = HashSet::new();
    files
        .iter()
        .map(|input| {
            let dir = output_dir_for(input, config, output_dir);
            let base = default_stem(input);
            let key = |stem: &str| (dir.clone(), stem.to_lowercase());

            let mut stem = base.clone();
            let mut n = 0;
            while !used.insert(key(&stem)) {
                n += 1;
                stem = format!("{}_{}", base, n);
            }
            if n > 0 {
                tracing::warn!("{} 与其他文件同名，输出为 {}", input.display(), stem);
            }
            OutputTarget { dir, stem }
        })
        .collect()
}

/// 分析单个文件并输出到指定位置
pub fn analyze_file(
    input: &Path,
    config: &Config,
    format: &ExportFormat,
    target: &OutputTarget,
    sheet: Option<&str>,
) -> Result<BatchSummary> {
    let table = ingest::load_table(input, sheet, &config.source_layout())?;

    let mut session = AuditSession::new(&config.audit);
    session.upload(table);
    let report = session.run()?;

    let outputs = export::export_report(&report, format, &target.dir, &target.stem)?;

    Ok(BatchSummary {
        outputs,
        exception_projects: report.classification.all.len(),
        failed_rules: report.failed_rules().count(),
    })
}

/// 并行分析多个文件；单个文件失败不影响其他文件
pub fn run_batch(
    files: &[PathBuf],
    config: &Config,
    format: &ExportFormat,
    output_dir: Option<&Path>,
) -> Vec<BatchItem> {
    let targets = plan_outputs(files, config, output_dir);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let items: Vec<BatchItem> = files
        .par_iter()
        .zip(targets.par_iter())
        .map(|(input, target)| {
            let outcome = analyze_file(input, config, format, target, None).map_err(|e| {
                tracing::warn!("{} 分析失败: {}", input.display(), e);
                e.to_string()
            });
            pb.inc(1);
            BatchItem {
                input: input.clone(),
                outcome,
            }
        })
        .collect();

    pb.finish_and_clear();
    items
}
