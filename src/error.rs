use thiserror::Error;

#[derive(Error, Debug)]
pub enum LossAuditError {
    #[error("设置错误: {0}")]
    Config(String),

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件夹不存在: {0}")]
    FolderNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx）")]
    UnsupportedFormat(String),

    #[error("Excel 读取失败: {0}")]
    ExcelRead(String),

    #[error("Excel 生成失败: {0}")]
    ExcelWrite(String),

    #[error("工作表无数据: {0}")]
    EmptyWorkbook(String),

    #[error("JSON解析错误: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] loss_audit_common::Error),
}

impl From<calamine::XlsxError> for LossAuditError {
    fn from(e: calamine::XlsxError) -> Self {
        LossAuditError::ExcelRead(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LossAuditError>;
