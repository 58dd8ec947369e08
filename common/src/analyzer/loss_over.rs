//! 亏损金额超阈值分析
//!
//! 阈值单位与源数据一致（源表金额通常以万元计，默认 1000 即一千万）。

use super::{AnalysisLog, Analyzer, RuleFinding, RuleOutcome};
use crate::columns;
use crate::error::Result;
use crate::resolver::resolve_column;
use crate::rules::RuleKind;
use crate::types::Table;

pub struct LossOverAnalyzer {
    threshold: f64,
}

impl LossOverAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for LossOverAnalyzer {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

/// 百分比，保留两位小数
fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

impl Analyzer for LossOverAnalyzer {
    fn kind(&self) -> RuleKind {
        RuleKind::LossOverThreshold
    }

    fn analyze(&self, table: &Table, log: &mut AnalysisLog) -> Result<RuleOutcome> {
        log.log(format!("开始执行亏损金额> {} 的数据分析...", self.threshold));

        let loss_col = resolve_column(table, columns::LOSS_AMOUNT)?;
        log.log(format!("匹配亏损金额列：{}", table.columns()[loss_col]));

        let losses = table.numeric_column(loss_col);
        let valid_rows = losses.iter().filter(|l| l.is_some()).count();
        log.log(format!("有效亏损金额数据：{} 行", valid_rows));

        let rows: Vec<usize> = losses
            .iter()
            .enumerate()
            .filter(|(_, loss)| loss.is_some_and(|l| l > self.threshold))
            .map(|(i, _)| i)
            .collect();

        let ratio_percent = percent(rows.len(), valid_rows);
        log.log(format!(
            "符合条件（亏损金额> {}）的数据：{} 行，占有效数据比例：{}%",
            self.threshold,
            rows.len(),
            ratio_percent
        ));

        Ok(RuleOutcome {
            rows,
            finding: RuleFinding::LossOverThreshold {
                valid_rows,
                ratio_percent,
            },
        })
    }
}
