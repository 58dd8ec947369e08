//! 表格数据模型
//!
//! - Cell: 单元格值（数值 / 文本 / 缺失）
//! - Table: 有序列名 + 有序数据行，分析器输出都是它的行过滤结果
//! - Record: 输出用的字段映射（保持列顺序）

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 输出记录（列名 → 值，保持原始列顺序）
pub type Record = serde_json::Map<String, Value>;

/// 单元格值
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// 转为数值，无法转换时返回 None
    ///
    /// 文本先去除首尾空白再解析；NaN 视为缺失。
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    /// 文本形式（缺失为空字符串，整数不带小数点）
    pub fn to_text(&self) -> String {
        match self {
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// JSON 值（NaN / Infinity 替换为空字符串）
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(String::new())),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Empty => Value::Null,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// 数值的文本表示：整数值不带 ".0"
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// 内存表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 创建空表（只有列名）
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 由列名和数据行创建，行长度不足补空、超出截断
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Cell::Empty)
    }

    /// 某列所有单元格
    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(column).unwrap_or(&Cell::Empty))
    }

    /// 某列转数值
    pub fn numeric_column(&self, column: usize) -> Vec<Option<f64>> {
        self.column_cells(column).map(Cell::to_number).collect()
    }

    /// 按行号选取子表（列集合与顺序不变）
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// 单行转输出记录
    pub fn record(&self, row: usize) -> Record {
        let mut record = Record::new();
        for (col, name) in self.columns.iter().enumerate() {
            record.insert(name.clone(), self.cell(row, col).to_json());
        }
        record
    }

    /// 全部行转输出记录
    pub fn to_records(&self) -> Vec<Record> {
        (0..self.rows.len()).map(|i| self.record(i)).collect()
    }
}
