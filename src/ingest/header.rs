//! 多级表头合并
//!
//! 源表第3~5行是合并单元格组成的三级表头，逐列取各级表头文字，
//! 去空、去重后以 `_` 连接成一个列名，例如 `项目主要成本情况_劳务费_结算`。

use std::collections::HashSet;

/// 合并单元格区域（行列均从0开始，含端点）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRegion {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl MergedRegion {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start.0..=self.end.0).contains(&row) && (self.start.1..=self.end.1).contains(&col)
    }
}

/// 取单元格的实际取值位置：在合并区域内时为区域左上角
pub fn merged_origin(regions: &[MergedRegion], row: u32, col: u32) -> (u32, u32) {
    regions
        .iter()
        .find(|r| r.contains(row, col))
        .map(|r| r.start)
        .unwrap_or((row, col))
}

/// 由各级表头文字生成列名
///
/// `col_number` 从1开始，仅用于无表头时的占位名。
pub fn composite_name<I>(parts: I, col_number: usize) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut seen = HashSet::new();
    let parts: Vec<String> = parts
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect();

    if parts.is_empty() {
        format!("未知列_{}", col_number)
    } else {
        parts.join("_")
    }
}

/// 生成全部列名
///
/// # Arguments
/// * `header_rows` - 表头所在行（从0开始）
/// * `width` - 列数
/// * `regions` - 合并区域
/// * `value_at` - 读取 (行, 列) 处的表头文字
pub fn build_headers<F>(
    header_rows: std::ops::Range<u32>,
    width: u32,
    regions: &[MergedRegion],
    value_at: F,
) -> Vec<String>
where
    F: Fn(u32, u32) -> Option<String>,
{
    (0..width)
        .map(|col| {
            let parts = header_rows.clone().map(|row| {
                let (r, c) = merged_origin(regions, row, col);
                value_at(r, c)
            });
            composite_name(parts, col as usize + 1)
        })
        .collect()
}
