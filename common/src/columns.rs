//! 业务逻辑列名
//!
//! 与源表合并表头中的名称一致，由 [`crate::resolver`] 解析到物理列。

pub const PROJECT_NAME: &str = "项目名称";
pub const PROJECT_LEADER: &str = "项目负责人";
pub const PROJECT_CATEGORY: &str = "项目类别";
pub const LOSS_AMOUNT: &str = "亏损金额";
pub const CONTRACT_AMOUNT: &str = "合同金额";
pub const SETTLEMENT_AMOUNT: &str = "项目结算金额";

pub const LABOR_COST: &str = "项目主要成本情况_劳务费_结算";
pub const MATERIAL_COST: &str = "项目主要成本情况_材料费_结算";
pub const EQUIPMENT_COST: &str = "项目主要成本情况_设备机械租赁费_结算";
pub const CONSULTING_COST: &str = "项目主要成本情况_技术服务、咨询费_结算";
pub const SUBCONTRACT_COST: &str = "项目主要成本情况_专业分包_结算";

/// 成本构成分析涉及的五项成本（结算）列
pub const COST_CATEGORIES: [&str; 5] = [
    LABOR_COST,
    MATERIAL_COST,
    EQUIPMENT_COST,
    CONSULTING_COST,
    SUBCONTRACT_COST,
];

/// 分析中用到的全部逻辑列
pub const LOGICAL_COLUMNS: [&str; 11] = [
    PROJECT_NAME,
    PROJECT_LEADER,
    PROJECT_CATEGORY,
    LOSS_AMOUNT,
    CONTRACT_AMOUNT,
    SETTLEMENT_AMOUNT,
    LABOR_COST,
    MATERIAL_COST,
    EQUIPMENT_COST,
    CONSULTING_COST,
    SUBCONTRACT_COST,
];
