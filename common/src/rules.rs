//! 规则配置
//!
//! 规则 → Sheet名称 → 参数 的静态配置列表，以及外部类别配置。
//! 新增分析规则只需在 [`RuleParams`] 增加变体并在默认列表中登记。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 规则标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    LeaderFrequency,
    DesignLoss,
    ConstructionRatio,
    LossOverThreshold,
    CostStructure,
}

impl RuleKind {
    /// 规则标识名（JSON 输出中的 analyzer_name）
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::LeaderFrequency => "LeaderFrequencyAnalyzer",
            RuleKind::DesignLoss => "DesignAnalyzer",
            RuleKind::ConstructionRatio => "ConstructionAnalyzer",
            RuleKind::LossOverThreshold => "LossOverAnalyzer",
            RuleKind::CostStructure => "LossDataAnalyzer",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::LeaderFrequency => write!(f, "项目负责人频次"),
            RuleKind::DesignLoss => write!(f, "亏损大于合同"),
            RuleKind::ConstructionRatio => write!(f, "施工类项目亏损占比"),
            RuleKind::LossOverThreshold => write!(f, "亏损金额超阈值"),
            RuleKind::CostStructure => write!(f, "成本构成异常"),
        }
    }
}

fn default_min_count() -> usize {
    3
}

fn default_construction_ratio() -> f64 {
    0.3
}

fn default_threshold() -> f64 {
    1000.0
}

fn default_cost_ratio() -> f64 {
    0.5
}

fn default_low_loss_threshold() -> f64 {
    10.0
}

/// 各规则参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleParams {
    LeaderFrequency {
        #[serde(default = "default_min_count")]
        min_count: usize,
    },
    DesignLoss,
    ConstructionRatio {
        /// 亏损/合同 严格大于该比例才入选
        #[serde(default = "default_construction_ratio")]
        ratio: f64,
    },
    LossOverThreshold {
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    CostStructure {
        /// 单项成本/合同 达到该比例即视为异常
        #[serde(default = "default_cost_ratio")]
        ratio: f64,
        /// 低亏损子集的亏损金额上限（不含）
        #[serde(default = "default_low_loss_threshold")]
        low_loss_threshold: f64,
    },
}

impl RuleParams {
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleParams::LeaderFrequency { .. } => RuleKind::LeaderFrequency,
            RuleParams::DesignLoss => RuleKind::DesignLoss,
            RuleParams::ConstructionRatio { .. } => RuleKind::ConstructionRatio,
            RuleParams::LossOverThreshold { .. } => RuleKind::LossOverThreshold,
            RuleParams::CostStructure { .. } => RuleKind::CostStructure,
        }
    }
}

/// 单条规则配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// 输出Sheet名称
    pub sheet_name: String,
    #[serde(flatten)]
    pub params: RuleParams,
}

impl RuleConfig {
    pub fn new(sheet_name: &str, params: RuleParams) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            params,
        }
    }
}

/// 默认规则列表（执行顺序即声明顺序）
pub fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new(
            "附表1 亏损3个项目项目负责人",
            RuleParams::LeaderFrequency { min_count: 3 },
        ),
        RuleConfig::new("附表2 亏损大于合同", RuleParams::DesignLoss),
        RuleConfig::new(
            "附表3 施工项目亏损金额占合同金额30%",
            RuleParams::ConstructionRatio { ratio: 0.3 },
        ),
        RuleConfig::new(
            "附表4 亏损大于1000万",
            RuleParams::LossOverThreshold { threshold: 1000.0 },
        ),
        RuleConfig::new(
            "附表5 成本费用异常情况",
            RuleParams::CostStructure {
                ratio: 0.5,
                low_loss_threshold: 10.0,
            },
        ),
    ]
}

/// 外部类别配置（categories.json）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// 视为「施工类」的项目类别
    #[serde(default = "default_construction_categories")]
    pub construction_categories: Vec<String>,
}

fn default_construction_categories() -> Vec<String> {
    ["施工", "施工总承包", "专业承包"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            construction_categories: default_construction_categories(),
        }
    }
}

impl CategoryConfig {
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.construction_categories.is_empty() {
            return Err(Error::Config("construction_categories 不能为空".into()));
        }
        Ok(config)
    }
}

fn default_project_column() -> String {
    crate::columns::PROJECT_NAME.to_string()
}

/// 分析配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// 按顺序执行的规则
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,

    #[serde(default)]
    pub categories: CategoryConfig,

    /// 汇总分类时用于识别同一项目的列
    #[serde(default = "default_project_column")]
    pub project_column: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            categories: CategoryConfig::default(),
            project_column: default_project_column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_order() {
        let kinds: Vec<RuleKind> = default_rules().iter().map(|r| r.params.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::LeaderFrequency,
                RuleKind::DesignLoss,
                RuleKind::ConstructionRatio,
                RuleKind::LossOverThreshold,
                RuleKind::CostStructure,
            ]
        );
    }

    #[test]
    fn test_rule_config_deserialize_with_defaults() {
        let json = r#"[
            {"sheet_name": "负责人", "rule": "leader_frequency"},
            {"sheet_name": "超阈值", "rule": "loss_over_threshold", "threshold": 500},
            {"sheet_name": "设计", "rule": "design_loss"}
        ]"#;
        let rules: Vec<RuleConfig> = serde_json::from_str(json).expect("反序列化失败");
        assert_eq!(rules[0].params, RuleParams::LeaderFrequency { min_count: 3 });
        assert_eq!(rules[1].params, RuleParams::LossOverThreshold { threshold: 500.0 });
        assert_eq!(rules[2].params, RuleParams::DesignLoss);
        assert_eq!(rules[2].sheet_name, "设计");
    }

    #[test]
    fn test_audit_config_empty_json_uses_defaults() {
        let config: AuditConfig = serde_json::from_str("{}").expect("反序列化失败");
        assert_eq!(config, AuditConfig::default());
        assert_eq!(config.project_column, "项目名称");
    }

    #[test]
    fn test_category_config_from_json() {
        let config =
            CategoryConfig::from_json(r#"{"construction_categories": ["房建施工", "市政施工"]}"#)
                .expect("读取失败");
        assert_eq!(config.construction_categories, vec!["房建施工", "市政施工"]);
    }

    #[test]
    fn test_category_config_rejects_empty_list() {
        let err = CategoryConfig::from_json(r#"{"construction_categories": []}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rule_kind_display() {
        assert_eq!(RuleKind::CostStructure.to_string(), "成本构成异常");
        assert_eq!(RuleKind::DesignLoss.name(), "DesignAnalyzer");
    }
}
