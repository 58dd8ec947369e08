//! JSON 输出结构
//!
//! ```text
//! { one_exception, two_exceptions, more_than_two_exceptions,
//!   low_loss_projects, all, source: [{analyzer_name, sheet_name, status, data, ...}] }
//! ```
//!
//! 所有记录中的 NaN / Infinity 在此之前已替换为空字符串。

use crate::analyzer::RuleFinding;
use crate::classify::ProjectExceptionRecord;
use crate::pipeline::{AuditReport, RuleResult, RuleStatus};
use crate::types::Record;
use serde::Serialize;

/// 单个规则的原始结果
#[derive(Debug, Clone, Serialize)]
pub struct SourceEntry<'a> {
    pub analyzer_name: &'static str,
    pub sheet_name: &'a str,
    pub status: RuleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    pub data: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finding: Option<&'a RuleFinding>,
    pub logs: &'a [String],
}

impl<'a> From<&'a RuleResult> for SourceEntry<'a> {
    fn from(result: &'a RuleResult) -> Self {
        Self {
            analyzer_name: result.rule.name(),
            sheet_name: &result.sheet_name,
            status: result.status,
            message: result.message.as_deref(),
            data: result.data.to_records(),
            finding: result.finding.as_ref(),
            logs: &result.logs,
        }
    }
}

/// 完整的 JSON 报告
#[derive(Debug, Clone, Serialize)]
pub struct ReportJson<'a> {
    pub one_exception: &'a [ProjectExceptionRecord],
    pub two_exceptions: &'a [ProjectExceptionRecord],
    pub more_than_two_exceptions: &'a [ProjectExceptionRecord],
    pub low_loss_projects: Vec<Record>,
    pub all: &'a [ProjectExceptionRecord],
    pub source: Vec<SourceEntry<'a>>,
}

impl<'a> ReportJson<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        let c = &report.classification;
        Self {
            one_exception: &c.one_exception,
            two_exceptions: &c.two_exceptions,
            more_than_two_exceptions: &c.more_than_two_exceptions,
            low_loss_projects: report
                .low_loss_projects()
                .map(|t| t.to_records())
                .unwrap_or_default(),
            all: &c.all,
            source: report.results.iter().map(SourceEntry::from).collect(),
        }
    }
}

impl AuditReport {
    /// 转为 JSON 值
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(ReportJson::new(self))
    }

    /// 转为格式化的 JSON 字符串
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ReportJson::new(self))
    }
}
