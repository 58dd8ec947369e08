//! 亏损大于合同分析

use super::{both, AnalysisLog, Analyzer, RuleFinding, RuleOutcome};
use crate::columns;
use crate::error::Result;
use crate::resolver::resolve_column;
use crate::rules::RuleKind;
use crate::types::Table;

/// 亏损金额达到或超过合同金额的项目
pub struct DesignAnalyzer;

impl Analyzer for DesignAnalyzer {
    fn kind(&self) -> RuleKind {
        RuleKind::DesignLoss
    }

    fn analyze(&self, table: &Table, log: &mut AnalysisLog) -> Result<RuleOutcome> {
        log.log("开始执行亏损大于合同分析...");

        let loss_col = resolve_column(table, columns::LOSS_AMOUNT)?;
        let contract_col = resolve_column(table, columns::CONTRACT_AMOUNT)?;
        log.log(format!(
            "匹配列：亏损金额={}, 合同金额={}",
            table.columns()[loss_col],
            table.columns()[contract_col]
        ));

        let losses = table.numeric_column(loss_col);
        let contracts = table.numeric_column(contract_col);

        let valid_rows = losses
            .iter()
            .zip(&contracts)
            .filter(|(l, c)| l.is_some() && c.is_some())
            .count();
        log.log(format!("金额有效数据：{} 行", valid_rows));

        let rows: Vec<usize> = losses
            .iter()
            .zip(&contracts)
            .enumerate()
            .filter(|(_, (loss, contract))| both(**loss, **contract, |l, c| l >= c))
            .map(|(i, _)| i)
            .collect();
        log.log(format!("亏损金额≥合同金额的数据：{} 行", rows.len()));

        Ok(RuleOutcome {
            rows,
            finding: RuleFinding::DesignLoss { valid_rows },
        })
    }
}
