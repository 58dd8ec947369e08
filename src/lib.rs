//! loss-audit: 亏损项目分析 CLI
//!
//! 读取Excel源表，按配置的规则执行分析，输出JSON/Excel报告。

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
