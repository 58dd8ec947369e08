//! 成本构成异常分析
//!
//! 以下任一条件成立即视为异常：
//! - 亏损金额 ≥ 项目结算金额
//! - 亏损金额 ≥ 合同金额
//! - 任一项成本（劳务/材料/设备机械租赁/技术服务咨询/专业分包）÷ 合同金额 ≥ 比例
//!
//! 同时给出亏损金额低于次级阈值的异常子集（低亏损项目）。

use super::{both, AnalysisLog, Analyzer, RuleFinding, RuleOutcome};
use crate::columns;
use crate::error::Result;
use crate::resolver::resolve_column;
use crate::rules::RuleKind;
use crate::types::Table;

pub struct CostStructureAnalyzer {
    ratio: f64,
    low_loss_threshold: f64,
}

impl CostStructureAnalyzer {
    pub fn new(ratio: f64, low_loss_threshold: f64) -> Self {
        Self {
            ratio,
            low_loss_threshold,
        }
    }
}

impl Default for CostStructureAnalyzer {
    fn default() -> Self {
        Self::new(0.5, 10.0)
    }
}

/// 单行参与比较的数值
struct CostRow {
    loss: Option<f64>,
    settlement: Option<f64>,
    contract: Option<f64>,
    costs: [Option<f64>; 5],
}

impl CostRow {
    /// 至少有一组可比较的数值
    fn is_comparable(&self) -> bool {
        let pair = |a: Option<f64>, b: Option<f64>| a.is_some() && b.is_some();
        pair(self.loss, self.settlement)
            || pair(self.loss, self.contract)
            || self.costs.iter().any(|c| pair(*c, self.contract))
    }

    fn is_anomalous(&self, ratio: f64) -> bool {
        both(self.loss, self.settlement, |l, s| l >= s)
            || both(self.loss, self.contract, |l, c| l >= c)
            || self
                .costs
                .iter()
                .any(|cost| both(*cost, self.contract, |x, c| x / c >= ratio))
    }
}

impl Analyzer for CostStructureAnalyzer {
    fn kind(&self) -> RuleKind {
        RuleKind::CostStructure
    }

    fn analyze(&self, table: &Table, log: &mut AnalysisLog) -> Result<RuleOutcome> {
        log.log("开始执行成本构成异常分析...");

        let loss_col = resolve_column(table, columns::LOSS_AMOUNT)?;
        let settlement_col = resolve_column(table, columns::SETTLEMENT_AMOUNT)?;
        let contract_col = resolve_column(table, columns::CONTRACT_AMOUNT)?;
        let mut cost_cols = [0usize; 5];
        for (slot, name) in cost_cols.iter_mut().zip(columns::COST_CATEGORIES) {
            *slot = resolve_column(table, name)?;
        }

        let rows: Vec<CostRow> = (0..table.len())
            .map(|i| CostRow {
                loss: table.cell(i, loss_col).to_number(),
                settlement: table.cell(i, settlement_col).to_number(),
                contract: table.cell(i, contract_col).to_number(),
                costs: cost_cols.map(|col| table.cell(i, col).to_number()),
            })
            .collect();

        let valid: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_comparable())
            .map(|(i, _)| i)
            .collect();
        log.log(format!(
            "过滤无效行：{} 行，有效比较行：{} 行",
            rows.len() - valid.len(),
            valid.len()
        ));

        let anomalous: Vec<usize> = valid
            .iter()
            .copied()
            .filter(|&i| rows[i].is_anomalous(self.ratio))
            .collect();
        log.log(format!("符合成本异常条件的数据：{} 行", anomalous.len()));

        let low_loss: Vec<usize> = anomalous
            .iter()
            .copied()
            .filter(|&i| rows[i].loss.is_some_and(|l| l < self.low_loss_threshold))
            .collect();
        log.log(format!(
            "其中亏损金额< {} 的数据：{} 行",
            self.low_loss_threshold,
            low_loss.len()
        ));

        Ok(RuleOutcome {
            finding: RuleFinding::CostStructure {
                valid_rows: valid.len(),
                low_loss: table.select(&low_loss),
            },
            rows: anomalous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::{nums, table};
    use crate::error::Error;
    use crate::types::Cell;

    /// 列顺序：亏损, 结算, 合同, 劳务, 材料, 设备, 技术, 分包
    fn cost_table(rows: &[[Option<f64>; 8]]) -> Table {
        let headers = [
            "基本情况_亏损金额",
            "基本情况_项目结算金额",
            "基本情况_合同金额",
            columns::LABOR_COST,
            columns::MATERIAL_COST,
            columns::EQUIPMENT_COST,
            columns::CONSULTING_COST,
            columns::SUBCONTRACT_COST,
        ];
        let cols: Vec<(&str, Vec<Cell>)> = headers
            .iter()
            .enumerate()
            .map(|(c, h)| {
                let values = rows
                    .iter()
                    .map(|r| r[c].map(Cell::Number).unwrap_or(Cell::Empty))
                    .collect();
                (*h, values)
            })
            .collect();
        table(&cols)
    }

    const N: Option<f64> = None;

    #[test]
    fn test_single_cost_ratio_at_boundary_included() {
        let t = cost_table(&[
            [N, N, Some(100.0), Some(50.0), N, N, N, N],
            [N, N, Some(100.0), Some(49.0), N, N, N, N],
        ]);
        let mut log = AnalysisLog::new();
        let outcome = CostStructureAnalyzer::default().analyze(&t, &mut log).unwrap();
        assert_eq!(outcome.rows, vec![0]);
    }

    #[test]
    fn test_loss_against_settlement_and_contract() {
        let t = cost_table(&[
            [Some(20.0), Some(20.0), N, N, N, N, N, N],
            [Some(20.0), N, Some(20.0), N, N, N, N, N],
            [Some(5.0), Some(100.0), Some(100.0), Some(10.0), N, N, N, N],
        ]);
        let mut log = AnalysisLog::new();
        let outcome = CostStructureAnalyzer::default().analyze(&t, &mut log).unwrap();
        assert_eq!(outcome.rows, vec![0, 1]);
    }

    #[test]
    fn test_any_cost_category_triggers() {
        let t = cost_table(&[
            [N, N, Some(10.0), N, N, N, N, Some(6.0)],
            [N, N, Some(10.0), N, N, Some(5.0), N, N],
            [N, N, Some(10.0), N, Some(1.0), N, Some(1.0), N],
        ]);
        let mut log = AnalysisLog::new();
        let outcome = CostStructureAnalyzer::default().analyze(&t, &mut log).unwrap();
        assert_eq!(outcome.rows, vec![0, 1]);
    }

    #[test]
    fn test_rows_without_comparable_pair_are_invalid() {
        let t = cost_table(&[
            [Some(100.0), N, N, Some(3.0), N, N, N, N],
            [N, Some(1.0), N, N, N, N, N, N],
        ]);
        let mut log = AnalysisLog::new();
        let outcome = CostStructureAnalyzer::default().analyze(&t, &mut log).unwrap();
        assert!(outcome.rows.is_empty());
        match outcome.finding {
            RuleFinding::CostStructure { valid_rows, .. } => assert_eq!(valid_rows, 0),
            other => panic!("意外的结果: {:?}", other),
        }
    }

    #[test]
    fn test_low_loss_subset() {
        let t = cost_table(&[
            [Some(8.0), Some(5.0), Some(100.0), N, N, N, N, N],
            [Some(50.0), Some(40.0), Some(100.0), N, N, N, N, N],
            [N, N, Some(100.0), Some(60.0), N, N, N, N],
            [Some(3.0), Some(100.0), Some(100.0), N, N, N, N, N],
        ]);
        let mut log = AnalysisLog::new();
        let outcome = CostStructureAnalyzer::default().analyze(&t, &mut log).unwrap();
        assert_eq!(outcome.rows, vec![0, 1, 2]);
        match outcome.finding {
            RuleFinding::CostStructure { low_loss, valid_rows } => {
                assert_eq!(valid_rows, 4);
                assert_eq!(low_loss.len(), 1);
                assert_eq!(low_loss.cell(0, 0), &Cell::Number(8.0));
            }
            other => panic!("意外的结果: {:?}", other),
        }
    }

    #[test]
    fn test_missing_cost_column_fails() {
        let t = table(&[
            ("亏损金额", nums(&[1.0])),
            ("项目结算金额", nums(&[1.0])),
            ("合同金额", nums(&[1.0])),
        ]);
        let mut log = AnalysisLog::new();
        let err = CostStructureAnalyzer::default().analyze(&t, &mut log).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
    }
}
