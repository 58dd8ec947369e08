//! 规则分析器
//!
//! 每个分析器接收完整的表和规则参数，返回入选行号（保持原始顺序）
//! 和该规则特有的统计结果。分析器本身无状态，可重复调用。

mod construction;
mod cost_structure;
mod design;
mod leader;
mod loss_over;

pub use construction::ConstructionAnalyzer;
pub use cost_structure::CostStructureAnalyzer;
pub use design::DesignAnalyzer;
pub use leader::LeaderFrequencyAnalyzer;
pub use loss_over::LossOverAnalyzer;

use crate::error::Result;
use crate::rules::{CategoryConfig, RuleKind, RuleParams};
use crate::types::Table;
use serde::Serialize;
use std::collections::BTreeMap;

/// 分析过程日志
///
/// 同时写入 tracing（debug 级别）并保留在结果中。
#[derive(Debug, Default)]
pub struct AnalysisLog {
    lines: Vec<String>,
}

impl AnalysisLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!("{}", msg);
        self.lines.push(msg);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// 负责人出现次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderCount {
    pub name: String,
    pub count: usize,
}

/// 各规则特有的统计结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleFinding {
    LeaderFrequency {
        /// 清理后的负责人总数
        distinct_leaders: usize,
        /// 达到次数要求的负责人（次数降序）
        qualified: Vec<LeaderCount>,
    },
    DesignLoss {
        valid_rows: usize,
    },
    ConstructionRatio {
        /// 属于目标类别的行数
        matched_rows: usize,
        /// 目标类别中金额有效的行数
        valid_rows: usize,
        category_counts: BTreeMap<String, usize>,
    },
    LossOverThreshold {
        valid_rows: usize,
        /// 入选行占有效行的百分比（两位小数）
        ratio_percent: f64,
    },
    CostStructure {
        valid_rows: usize,
        /// 亏损金额低于次级阈值的异常行
        #[serde(skip)]
        low_loss: Table,
    },
}

/// 单次分析的输出
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    /// 入选行号（升序）
    pub rows: Vec<usize>,
    pub finding: RuleFinding,
}

/// 分析器接口
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> RuleKind;

    fn analyze(&self, table: &Table, log: &mut AnalysisLog) -> Result<RuleOutcome>;
}

/// 根据规则参数构造分析器
pub fn build_analyzer(params: &RuleParams, categories: &CategoryConfig) -> Box<dyn Analyzer> {
    match params {
        RuleParams::LeaderFrequency { min_count } => {
            Box::new(LeaderFrequencyAnalyzer::new(*min_count))
        }
        RuleParams::DesignLoss => Box::new(DesignAnalyzer),
        RuleParams::ConstructionRatio { ratio } => Box::new(ConstructionAnalyzer::new(
            categories.construction_categories.clone(),
            *ratio,
        )),
        RuleParams::LossOverThreshold { threshold } => Box::new(LossOverAnalyzer::new(*threshold)),
        RuleParams::CostStructure {
            ratio,
            low_loss_threshold,
        } => Box::new(CostStructureAnalyzer::new(*ratio, *low_loss_threshold)),
    }
}

/// 两个数值都存在时才比较
fn both<F>(a: Option<f64>, b: Option<f64>, pred: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (a, b) {
        (Some(a), Some(b)) => pred(a, b),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::{Cell, Table};

    /// 以 (列名, 列值) 构造测试表
    pub fn table(columns: &[(&str, Vec<Cell>)]) -> Table {
        let names = columns.iter().map(|(n, _)| n.to_string()).collect();
        let height = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let rows = (0..height)
            .map(|i| {
                columns
                    .iter()
                    .map(|(_, v)| v.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Table::from_rows(names, rows)
    }

    pub fn nums(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(*v)).collect()
    }

    pub fn texts(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }
}
