//! 错误类型定义

use thiserror::Error;

/// 核心库错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("未找到「{column}」列（候选列示例：{}）", .available.join(", "))]
    ColumnNotFound {
        column: String,
        /// 表中前几列的列名，便于排查
        available: Vec<String>,
    },

    #[error("找到多个「{column}」列：{}，请确认唯一列", .matches.join(", "))]
    AmbiguousColumn { column: String, matches: Vec<String> },

    #[error("请先上传Excel文件！")]
    NoDataUploaded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型别名
pub type Result<T> = std::result::Result<T, Error>;
