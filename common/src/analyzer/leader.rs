//! 项目负责人频次分析
//!
//! 同一负责人名下亏损项目数达到 `min_count` 时，输出其全部项目行。

use super::{AnalysisLog, Analyzer, LeaderCount, RuleFinding, RuleOutcome};
use crate::columns;
use crate::error::Result;
use crate::resolver::resolve_column;
use crate::rules::RuleKind;
use crate::types::Table;
use std::collections::{HashMap, HashSet};

pub struct LeaderFrequencyAnalyzer {
    min_count: usize,
}

impl LeaderFrequencyAnalyzer {
    pub fn new(min_count: usize) -> Self {
        Self { min_count }
    }
}

impl Default for LeaderFrequencyAnalyzer {
    fn default() -> Self {
        Self::new(3)
    }
}

/// 清理负责人名称，空值或字面量 "nan" 视为无效
fn clean_leader(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(name.to_string())
    }
}

impl Analyzer for LeaderFrequencyAnalyzer {
    fn kind(&self) -> RuleKind {
        RuleKind::LeaderFrequency
    }

    fn analyze(&self, table: &Table, log: &mut AnalysisLog) -> Result<RuleOutcome> {
        log.log("开始执行项目负责人频次分析...");

        let leader_col = resolve_column(table, columns::PROJECT_LEADER)?;
        log.log(format!("匹配项目负责人列：{}", table.columns()[leader_col]));

        let leaders: Vec<Option<String>> = table
            .column_cells(leader_col)
            .map(|cell| clean_leader(&cell.to_text()))
            .collect();
        let clean_rows = leaders.iter().filter(|l| l.is_some()).count();
        log.log(format!("清理后有效数据：{} 行（排除空值/无效负责人）", clean_rows));

        // 按首次出现顺序计数
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in leaders.iter().flatten() {
            let count = counts.entry(name.as_str()).or_insert(0);
            if *count == 0 {
                order.push(name.as_str());
            }
            *count += 1;
        }

        let mut qualified: Vec<LeaderCount> = order
            .iter()
            .filter(|name| counts[*name] >= self.min_count)
            .map(|name| LeaderCount {
                name: name.to_string(),
                count: counts[name],
            })
            .collect();
        // 稳定排序：次数相同保持首次出现顺序
        qualified.sort_by(|a, b| b.count.cmp(&a.count));

        log.log(format!(
            "负责人总数：{} 人，出现≥{}次的负责人：{} 人",
            order.len(),
            self.min_count,
            qualified.len()
        ));
        if qualified.is_empty() {
            log.log(format!("无出现≥{}次的负责人", self.min_count));
        } else {
            let listing: Vec<String> = qualified
                .iter()
                .map(|l| format!("- {}: {}次", l.name, l.count))
                .collect();
            log.log(format!("高频负责人列表（次数）：\n{}", listing.join("\n")));
        }

        let names: HashSet<&str> = qualified.iter().map(|l| l.name.as_str()).collect();
        let rows: Vec<usize> = leaders
            .iter()
            .enumerate()
            .filter(|(_, l)| l.as_deref().is_some_and(|n| names.contains(n)))
            .map(|(i, _)| i)
            .collect();

        Ok(RuleOutcome {
            rows,
            finding: RuleFinding::LeaderFrequency {
                distinct_leaders: order.len(),
                qualified,
            },
        })
    }
}
