//! 导出核心模块（CLI 封装共用）

#[cfg(feature = "excel")]
pub mod excel_core;
