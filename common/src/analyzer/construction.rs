//! 施工类项目亏损占比分析
//!
//! 只看目标类别（外部配置）的项目，亏损金额/合同金额 > 比例（默认30%）入选。

use super::{AnalysisLog, Analyzer, RuleFinding, RuleOutcome};
use crate::columns;
use crate::error::Result;
use crate::resolver::resolve_column;
use crate::rules::RuleKind;
use crate::types::Table;
use std::collections::{BTreeMap, HashSet};

pub struct ConstructionAnalyzer {
    target_categories: HashSet<String>,
    ratio: f64,
}

impl ConstructionAnalyzer {
    pub fn new(categories: Vec<String>, ratio: f64) -> Self {
        Self {
            target_categories: categories.into_iter().map(|c| c.trim().to_string()).collect(),
            ratio,
        }
    }
}

impl Analyzer for ConstructionAnalyzer {
    fn kind(&self) -> RuleKind {
        RuleKind::ConstructionRatio
    }

    fn analyze(&self, table: &Table, log: &mut AnalysisLog) -> Result<RuleOutcome> {
        log.log("开始执行施工类项目亏损分析...");

        let category_col = resolve_column(table, columns::PROJECT_CATEGORY)?;
        let loss_col = resolve_column(table, columns::LOSS_AMOUNT)?;
        let contract_col = resolve_column(table, columns::CONTRACT_AMOUNT)?;
        log.log(format!(
            "匹配列：项目类别={}, 亏损金额={}, 合同金额={}",
            table.columns()[category_col],
            table.columns()[loss_col],
            table.columns()[contract_col]
        ));

        let categories: Vec<String> = table
            .column_cells(category_col)
            .map(|cell| cell.to_text().trim().to_string())
            .collect();
        let in_target: Vec<usize> = categories
            .iter()
            .enumerate()
            .filter(|(_, c)| self.target_categories.contains(c.as_str()))
            .map(|(i, _)| i)
            .collect();
        log.log(format!("目标类别总数据量：{} 行", in_target.len()));

        if in_target.is_empty() {
            log.log("未找到属于目标类别的数据，分析终止");
            return Ok(RuleOutcome {
                rows: Vec::new(),
                finding: RuleFinding::ConstructionRatio {
                    matched_rows: 0,
                    valid_rows: 0,
                    category_counts: BTreeMap::new(),
                },
            });
        }

        let valid: Vec<(usize, f64, f64)> = in_target
            .iter()
            .filter_map(|&i| {
                let loss = table.cell(i, loss_col).to_number()?;
                let contract = table.cell(i, contract_col).to_number()?;
                (contract > 0.0).then_some((i, loss, contract))
            })
            .collect();
        log.log(format!(
            "目标类别中金额有效数据：{} 行，排除无效金额数据：{} 行",
            valid.len(),
            in_target.len() - valid.len()
        ));

        let rows: Vec<usize> = valid
            .iter()
            .filter(|(_, loss, contract)| loss / contract > self.ratio)
            .map(|(i, _, _)| *i)
            .collect();

        let mut category_counts = BTreeMap::new();
        for &i in &rows {
            *category_counts.entry(categories[i].clone()).or_insert(0) += 1;
        }
        log.log(format!("各目标类别符合条件数量：{:?}", category_counts));
        log.log(format!("最终符合条件数据：{} 行", rows.len()));

        Ok(RuleOutcome {
            rows,
            finding: RuleFinding::ConstructionRatio {
                matched_rows: in_target.len(),
                valid_rows: valid.len(),
                category_counts,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::{nums, table, texts};
    use crate::types::Cell;

    fn analyzer() -> ConstructionAnalyzer {
        ConstructionAnalyzer::new(vec!["施工".to_string(), "施工总承包".to_string()], 0.3)
    }

    #[test]
    fn test_ratio_boundary_is_strict() {
        let t = table(&[
            ("项目类别", texts(&["施工", "施工", "施工"])),
            ("亏损金额", nums(&[30.0, 31.0, 29.0])),
            ("合同金额", nums(&[100.0, 100.0, 100.0])),
        ]);
        let mut log = AnalysisLog::new();
        let outcome = analyzer().analyze(&t, &mut log).unwrap();
        assert_eq!(outcome.rows, vec![1]);
    }

    #[test]
    fn test_only_target_categories_considered() {
        let t = table(&[
            ("项目类别", texts(&[" 施工总承包 ", "设计", "施工"])),
            ("亏损金额", nums(&[80.0, 90.0, 5.0])),
            ("合同金额", nums(&[100.0, 100.0, 100.0])),
        ]);
        let mut log = AnalysisLog::new();
        let outcome = analyzer().analyze(&t, &mut log).unwrap();
        assert_eq!(outcome.rows, vec![0]);
        match outcome.finding {
            RuleFinding::ConstructionRatio {
                matched_rows,
                valid_rows,
                category_counts,
            } => {
                assert_eq!(matched_rows, 2);
                assert_eq!(valid_rows, 2);
                assert_eq!(category_counts.get("施工总承包"), Some(&1));
            }
            other => panic!("意外的结果: {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_or_missing_contract_discarded() {
        let t = table(&[
            ("项目类别", texts(&["施工", "施工", "施工"])),
            ("亏损金额", nums(&[50.0, 50.0, 50.0])),
            ("合同金额", vec![Cell::Number(0.0), Cell::Number(-10.0), "未签".into()]),
        ]);
        let mut log = AnalysisLog::new();
        let outcome = analyzer().analyze(&t, &mut log).unwrap();
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn test_no_target_category_is_empty_success() {
        let t = table(&[
            ("项目类别", texts(&["设计", "咨询"])),
            ("亏损金额", nums(&[50.0, 50.0])),
            ("合同金额", nums(&[10.0, 10.0])),
        ]);
        let mut log = AnalysisLog::new();
        let outcome = analyzer().analyze(&t, &mut log).unwrap();
        assert!(outcome.rows.is_empty());
        assert!(log.lines().iter().any(|l| l.contains("未找到属于目标类别的数据")));
    }
}
