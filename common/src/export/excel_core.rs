//! Excel报告生成（共通库）
//!
//! 每个成功且非空的规则结果一个Sheet：
//! 第1行加粗说明（行数、生成时间），第2行列名，第3行起数据。
//! 末尾追加「异常项目汇总」Sheet。

use crate::classify::ProjectExceptionRecord;
use crate::pipeline::AuditReport;
use crate::types::{Cell, Table};
use rust_xlsxwriter::*;

/// Excel Sheet名称上限
const MAX_SHEET_NAME: usize = 31;

const RESERVED_SHEET_NAME: &str = "history";

/// 汇总Sheet名称
pub const SUMMARY_SHEET: &str = "异常项目汇总";

lazy_static::lazy_static! {
    static ref FORBIDDEN_SHEET_CHARS: regex::Regex =
        regex::Regex::new(r"[\[\]:*?/\\]").expect("invalid sheet name pattern");
}

/// Sheet名称生成（去除非法字符、限长、重名加序号）
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: Vec<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回未使用过的Sheet名称；重名时依次尝试 `_1`, `_2` …
    pub fn unique(&mut self, base: &str) -> String {
        let cleaned = FORBIDDEN_SHEET_CHARS.replace_all(base.trim(), "_");
        // 首尾不能是单引号
        let cleaned = cleaned.trim_matches('\'').trim();
        let cleaned = if cleaned.is_empty() { "Sheet" } else { cleaned };

        let mut candidate = truncate(cleaned, MAX_SHEET_NAME)
            .trim_end_matches('\'')
            .to_string();
        let mut suffix = 1;
        while self.is_used(&candidate) {
            let tail = format!("_{}", suffix);
            candidate = format!(
                "{}{}",
                truncate(&cleaned, MAX_SHEET_NAME - tail.chars().count()),
                tail
            );
            suffix += 1;
        }
        self.used.push(candidate.to_lowercase());
        candidate
    }

    // Excel的Sheet名称不区分大小写，History 为保留名
    fn is_used(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        lower == RESERVED_SHEET_NAME || self.used.iter().any(|u| *u == lower)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// 说明行文本
pub fn annotation(rows: usize, generated_at: &str) -> String {
    format!("数据说明：共{}行 （生成时间：{}）", rows, generated_at)
}

struct Formats {
    note: Format,
    header: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            note: Format::new().set_bold(),
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xF2F2F2))
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_text_wrap(),
        }
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<(), XlsxError> {
    match cell {
        Cell::Number(n) if n.is_finite() => {
            worksheet.write_number(row, col, *n)?;
        }
        Cell::Number(_) | Cell::Empty => {}
        Cell::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

/// 写入一个结果表Sheet
fn write_table_sheet(
    worksheet: &mut Worksheet,
    table: &Table,
    generated_at: &str,
    formats: &Formats,
) -> Result<(), XlsxError> {
    worksheet.write_string_with_format(0, 0, annotation(table.len(), generated_at), &formats.note)?;

    for (col, name) in table.columns().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(1, col, name, &formats.header)?;
        worksheet.set_column_width(col, column_width(name))?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            write_cell(worksheet, r as u32 + 2, c as u16, cell)?;
        }
    }

    worksheet.set_freeze_panes(2, 0)?;
    Ok(())
}

/// 按列名长度估算列宽（中文字符按两个宽度计）
fn column_width(name: &str) -> f64 {
    let width: usize = name.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum();
    (width as f64 + 2.0).clamp(8.0, 40.0)
}

fn write_summary_sheet(
    worksheet: &mut Worksheet,
    projects: &[ProjectExceptionRecord],
    generated_at: &str,
    formats: &Formats,
) -> Result<(), XlsxError> {
    worksheet.write_string_with_format(0, 0, annotation(projects.len(), generated_at), &formats.note)?;

    for (col, name) in ["项目名称", "异常数量", "涉及规则"].iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *name, &formats.header)?;
    }
    worksheet.set_column_width(0, 36.0)?;
    worksheet.set_column_width(1, 10.0)?;
    worksheet.set_column_width(2, 80.0)?;

    for (i, project) in projects.iter().enumerate() {
        let row = i as u32 + 2;
        worksheet.write_string(row, 0, &project.project_name)?;
        worksheet.write_number(row, 1, project.exception_count as f64)?;
        worksheet.write_string(row, 2, project.rules.join("；"))?;
    }
    Ok(())
}

/// 生成分析报告Excel（内存缓冲）
///
/// # Arguments
/// * `report` - 分析结果
/// * `generated_at` - 说明行中的生成时间（如 `2026-01-18 09:30`）
///
/// 失败或无数据的规则不生成Sheet。
pub fn generate_report_buffer(report: &AuditReport, generated_at: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();
    let mut namer = SheetNamer::new();

    for result in report.results.iter().filter(|r| r.is_success() && !r.data.is_empty()) {
        let sheet_name = namer.unique(&result.sheet_name);
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name)
            .map_err(|e| format!("Sheet名称设置失败: {}", e))?;
        write_table_sheet(worksheet, &result.data, generated_at, &formats)
            .map_err(|e| format!("写入 {} 失败: {}", sheet_name, e))?;
        tracing::debug!("已写入Sheet {}（{} 行）", sheet_name, result.data.len());
    }

    let summary_name = namer.unique(SUMMARY_SHEET);
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&summary_name)
        .map_err(|e| format!("Sheet名称设置失败: {}", e))?;
    write_summary_sheet(worksheet, &report.classification.all, generated_at, &formats)
        .map_err(|e| format!("写入汇总失败: {}", e))?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存失败: {}", e))
}
