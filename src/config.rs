use crate::cli::ExportFormat;
use crate::error::{LossAuditError, Result};
use crate::ingest::SheetLayout;
use loss_audit_common::{AuditConfig, CategoryConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_header_row() -> u32 {
    3
}

fn default_header_depth() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 表头起始行（从1开始）
    #[serde(default = "default_header_row")]
    pub header_row: u32,
    /// 表头行数
    #[serde(default = "default_header_depth")]
    pub header_depth: u32,
    /// 输出目录（省略时为输入文件所在目录）
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// 默认输出格式
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_row: default_header_row(),
            header_depth: default_header_depth(),
            output_dir: None,
            format: ExportFormat::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl Config {
    /// 读取设置；未指定路径且默认位置不存在时使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => {
                return Err(LossAuditError::FileNotFound(p.display().to_string()))
            }
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            tracing::debug!("已读取设置: {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LossAuditError::Config("找不到用户主目录".into()))?;
        Ok(home.join(".config").join("loss-audit").join("config.json"))
    }

    /// 用外部类别文件替换类别设置
    pub fn with_categories(mut self, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LossAuditError::FileNotFound(path.display().to_string()));
        }
        self.audit.categories = CategoryConfig::from_file(path)?;
        Ok(self)
    }

    /// 源表的表头/数据布局
    pub fn source_layout(&self) -> SheetLayout {
        SheetLayout::source(self.header_row, self.header_depth)
    }

    fn validate(&self) -> Result<()> {
        if self.header_row == 0 {
            return Err(LossAuditError::Config("header_row 从1开始计数".into()));
        }
        if self.header_depth == 0 {
            return Err(LossAuditError::Config("header_depth 至少为1".into()));
        }
        if self.audit.rules.is_empty() {
            return Err(LossAuditError::Config("未配置任何分析规则".into()));
        }
        Ok(())
    }
}
