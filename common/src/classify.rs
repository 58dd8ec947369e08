//! 异常项目汇总分类
//!
//! 按项目名称归并各规则的入选行，统计每个项目被多少个规则标记，
//! 再分为「1项异常」「2项异常」「2项以上异常」。

use crate::pipeline::RuleResult;
use crate::resolver::resolve_column;
use crate::types::{Record, Table};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// 单条异常明细
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionDetail {
    /// 规则标识名
    pub rule: String,
    pub sheet_name: String,
    pub record: Record,
}

/// 单个项目的异常汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectExceptionRecord {
    pub project_name: String,
    /// 标记该项目的不同规则数
    pub exception_count: usize,
    /// 涉及的规则（每条规则一项，Sheet名称，按首次出现顺序）
    pub rules: Vec<String>,
    pub details: Vec<ExceptionDetail>,
}

/// 分类结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub one_exception: Vec<ProjectExceptionRecord>,
    pub two_exceptions: Vec<ProjectExceptionRecord>,
    pub more_than_two_exceptions: Vec<ProjectExceptionRecord>,
    /// 全部异常项目（按首次出现顺序）
    pub all: Vec<ProjectExceptionRecord>,
}

/// 按项目汇总各规则的成功结果
///
/// 项目名称列无法定位时返回空分类（记录警告，不视为失败）。
pub fn classify(table: &Table, results: &[RuleResult], project_column: &str) -> Classification {
    let name_col = match resolve_column(table, project_column) {
        Ok(col) => col,
        Err(e) => {
            warn!("无法汇总异常项目：{}", e);
            return Classification::default();
        }
    };

    let mut order: Vec<String> = Vec::new();
    let mut projects: HashMap<String, ProjectExceptionRecord> = HashMap::new();
    // 按规则在配置中的位置计数，Sheet名称可能重复
    let mut flagged_by: HashSet<(String, usize)> = HashSet::new();

    for (index, result) in results.iter().enumerate().filter(|(_, r)| r.is_success()) {
        for row in 0..result.data.len() {
            let name = result.data.cell(row, name_col).to_text().trim().to_string();
            if name.is_empty() {
                continue;
            }

            let entry = projects.entry(name.clone()).or_insert_with(|| {
                order.push(name.clone());
                ProjectExceptionRecord {
                    project_name: name.clone(),
                    exception_count: 0,
                    rules: Vec::new(),
                    details: Vec::new(),
                }
            });
            if flagged_by.insert((name.clone(), index)) {
                entry.rules.push(result.sheet_name.clone());
                entry.exception_count += 1;
            }
            entry.details.push(ExceptionDetail {
                rule: result.rule.name().to_string(),
                sheet_name: result.sheet_name.clone(),
                record: result.data.record(row),
            });
        }
    }

    let all: Vec<ProjectExceptionRecord> = order
        .iter()
        .filter_map(|name| projects.remove(name))
        .collect();

    let bucket = |pred: fn(usize) -> bool| -> Vec<ProjectExceptionRecord> {
        all.iter()
            .filter(|p| pred(p.exception_count))
            .cloned()
            .collect()
    };

    Classification {
        one_exception: bucket(|n| n == 1),
        two_exceptions: bucket(|n| n == 2),
        more_than_two_exceptions: bucket(|n| n > 2),
        all,
    }
}
