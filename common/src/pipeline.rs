//! 分析编排
//!
//! 每次请求使用独立的 [`AuditSession`]：上传表 → 依次执行全部规则 →
//! 汇总分类。单个规则失败只影响自身结果，不中断其余规则。

use crate::analyzer::{build_analyzer, AnalysisLog, Analyzer, RuleFinding};
use crate::classify::{classify, Classification};
use crate::error::{Error, Result};
use crate::rules::{AuditConfig, RuleConfig, RuleKind};
use crate::types::Table;
use serde::Serialize;
use tracing::{info, warn};

/// 规则执行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Success,
    Failed,
}

/// 单个规则的执行结果
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub rule: RuleKind,
    pub sheet_name: String,
    pub status: RuleStatus,
    /// 失败原因
    pub message: Option<String>,
    /// 入选行（与原表列一致）；失败时为空表
    pub data: Table,
    pub finding: Option<RuleFinding>,
    pub logs: Vec<String>,
}

impl RuleResult {
    pub fn is_success(&self) -> bool {
        self.status == RuleStatus::Success
    }
}

/// 一次完整分析的结果
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub results: Vec<RuleResult>,
    pub classification: Classification,
}

impl AuditReport {
    /// 成本构成异常中的低亏损项目
    pub fn low_loss_projects(&self) -> Option<&Table> {
        self.results.iter().find_map(|r| match &r.finding {
            Some(RuleFinding::CostStructure { low_loss, .. }) => Some(low_loss),
            _ => None,
        })
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// 单次请求的分析上下文
pub struct AuditSession {
    rules: Vec<(RuleConfig, Box<dyn Analyzer>)>,
    project_column: String,
    table: Option<Table>,
}

impl AuditSession {
    pub fn new(config: &AuditConfig) -> Self {
        let rules = config
            .rules
            .iter()
            .map(|rule| (rule.clone(), build_analyzer(&rule.params, &config.categories)))
            .collect();
        Self {
            rules,
            project_column: config.project_column.clone(),
            table: None,
        }
    }

    /// 载入待分析的表（替换之前的表）
    pub fn upload(&mut self, table: Table) {
        info!(
            "已载入数据：{} 列，{} 行",
            table.columns().len(),
            table.len()
        );
        self.table = Some(table);
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// 执行全部规则并汇总
    pub fn run(&self) -> Result<AuditReport> {
        let table = self.table.as_ref().ok_or(Error::NoDataUploaded)?;

        info!("开始执行数据分析...");
        let results: Vec<RuleResult> = self
            .rules
            .iter()
            .map(|(config, analyzer)| run_rule(config, analyzer.as_ref(), table))
            .collect();
        info!("所有分析器执行完毕");

        let classification = classify(table, &results, &self.project_column);
        Ok(AuditReport {
            results,
            classification,
        })
    }
}

fn run_rule(config: &RuleConfig, analyzer: &dyn Analyzer, table: &Table) -> RuleResult {
    let rule = analyzer.kind();
    info!("开始执行分析器：{}", rule.name());

    let mut log = AnalysisLog::new();
    match analyzer.analyze(table, &mut log) {
        Ok(outcome) => {
            let data = table.select(&outcome.rows);
            info!("{} 分析完成，包含 {} 条数据", rule.name(), data.len());
            RuleResult {
                rule,
                sheet_name: config.sheet_name.clone(),
                status: RuleStatus::Success,
                message: None,
                data,
                finding: Some(outcome.finding),
                logs: log.into_lines(),
            }
        }
        Err(e) => {
            let message = format!("{} 分析失败：{}", rule.name(), e);
            warn!("{}", message);
            log.log(message.clone());
            RuleResult {
                rule,
                sheet_name: config.sheet_name.clone(),
                status: RuleStatus::Failed,
                message: Some(message),
                data: Table::new(table.columns().to_vec()),
                finding: None,
                logs: log.into_lines(),
            }
        }
    }
}
