//! Loss Audit Common Library
//!
//! 亏损项目异常分析的核心：表格模型、列定位、规则分析器、编排与汇总分类。
//! 读写Excel文件等外部协作部分由 CLI 负责。

pub mod analyzer;
pub mod classify;
pub mod columns;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod types;

pub use analyzer::{AnalysisLog, Analyzer, RuleFinding, RuleOutcome};
pub use classify::{Classification, ProjectExceptionRecord};
pub use error::{Error, Result};
pub use pipeline::{AuditReport, AuditSession, RuleResult, RuleStatus};
pub use report::ReportJson;
pub use resolver::{normalize_name, resolve_column};
pub use rules::{AuditConfig, CategoryConfig, RuleConfig, RuleKind, RuleParams};
pub use types::{Cell, Record, Table};
