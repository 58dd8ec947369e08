//! Excel 读取
//!
//! 源表：第3~5行为合并单元格组成的三级表头，第6行起为数据，
//! 遇到第一列（序号）为空的行即停止。
//! 报告表：第1行说明、第2行列名、第3行起数据（用于回读导出结果）。

pub mod header;

use crate::error::{LossAuditError, Result};
use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use header::{build_headers, MergedRegion};
use loss_audit_common::{Cell, Table};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// 表头与数据的位置（行号从0开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub header_start: u32,
    pub header_depth: u32,
    pub data_start: u32,
}

impl SheetLayout {
    /// 源表布局
    ///
    /// `header_row` 从1开始（默认3），表头之后紧接数据。
    pub fn source(header_row: u32, header_depth: u32) -> Self {
        let header_start = header_row.saturating_sub(1);
        Self {
            header_start,
            header_depth,
            data_start: header_start + header_depth,
        }
    }

    /// 导出报告Sheet的布局
    pub fn report() -> Self {
        Self {
            header_start: 1,
            header_depth: 1,
            data_start: 2,
        }
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::source(3, 3)
    }
}

/// 检查路径与扩展名
fn check_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LossAuditError::FileNotFound(path.display().to_string()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext != "xlsx" && ext != "xlsm" {
        return Err(LossAuditError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 工作表名称列表
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    check_path(path)?;
    let workbook: Xlsx<_> = open_workbook(path)?;
    Ok(workbook.sheet_names())
}

/// 读取工作表为内存表
///
/// `sheet` 省略时读取第一个工作表。
pub fn load_table(path: &Path, sheet: Option<&str>, layout: &SheetLayout) -> Result<Table> {
    check_path(path)?;
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(LossAuditError::ExcelRead(format!("找不到工作表: {}", name)));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LossAuditError::EmptyWorkbook(path.display().to_string()))?,
    };

    workbook.load_merged_regions()?;
    let regions: Vec<MergedRegion> = workbook
        .merged_regions_by_sheet(&sheet_name)
        .into_iter()
        .map(|(_, _, dim)| MergedRegion {
            start: dim.start,
            end: dim.end,
        })
        .collect();

    let range = workbook.worksheet_range(&sheet_name)?;
    let table = read_range(&range, &regions, layout)
        .ok_or_else(|| LossAuditError::EmptyWorkbook(format!("{} / {}", path.display(), sheet_name)))?;

    info!(
        "表头解析完成，共 {} 列，共读取 {} 行原始数据（{}）",
        table.columns().len(),
        table.len(),
        sheet_name
    );
    Ok(table)
}

/// 按布局解析已读出的区域；区域为空时返回 None
pub fn read_range(range: &Range<Data>, regions: &[MergedRegion], layout: &SheetLayout) -> Option<Table> {
    let (last_row, last_col) = range.end()?;
    let width = last_col + 1;

    let header_rows = layout.header_start..layout.header_start + layout.header_depth;
    let columns = build_headers(header_rows, width, regions, |r, c| {
        range.get_value((r, c)).and_then(header_text)
    });
    warn_duplicate_columns(&columns);

    let mut table = Table::new(columns);
    for row in layout.data_start..=last_row {
        let key = range.get_value((row, 0)).map(to_cell).unwrap_or_default();
        if is_blank(&key) {
            break;
        }
        let cells = (0..width)
            .map(|col| range.get_value((row, col)).map(to_cell).unwrap_or_default())
            .collect();
        table.push_row(cells);
    }
    Some(table)
}

fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => s.trim().is_empty(),
        Cell::Number(_) => false,
    }
}

fn warn_duplicate_columns(columns: &[String]) {
    let mut seen = HashSet::new();
    for name in columns {
        if !seen.insert(name.as_str()) {
            warn!("存在重复列名：{}（按该列定位时会报告多列匹配）", name);
        }
    }
}

/// 表头单元格文字
fn header_text(data: &Data) -> Option<String> {
    match to_cell(data) {
        Cell::Empty => None,
        cell => Some(cell.to_text()),
    }
}

/// 单元格转换
pub fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => match data.as_datetime() {
            Some(value) => Cell::Text(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::Empty => Cell::Empty,
    }
}
