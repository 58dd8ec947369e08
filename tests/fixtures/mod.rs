//! 测试用源表生成
//!
//! 与实际台账相同的布局：第1行标题，第3~5行三级合并表头，第6行起数据，
//! 数据之后空一行再写填表说明（不应被读入）。

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub const COST_LABELS: [&str; 5] = ["劳务费", "材料费", "设备机械租赁费", "技术服务、咨询费", "专业分包"];

#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub name: String,
    pub leader: String,
    pub category: String,
    pub contract: f64,
    pub settlement: f64,
    pub loss: f64,
    pub costs: [Option<f64>; 5],
}

impl ProjectRow {
    /// 不触发任何规则的普通项目
    pub fn normal(name: &str, leader: &str) -> Self {
        Self {
            name: name.to_string(),
            leader: leader.to_string(),
            category: "设计".to_string(),
            contract: 100.0,
            settlement: 90.0,
            loss: 5.0,
            costs: [Some(10.0); 5],
        }
    }
}

/// 十个项目，其中「张三」负责三个，其余均无异常
pub fn leader_only_rows() -> Vec<ProjectRow> {
    let leaders = ["张三", "李四", "张三", "王五", "赵六", "张三", "钱七", "孙八", "周九", "吴十"];
    leaders
        .iter()
        .enumerate()
        .map(|(i, leader)| ProjectRow::normal(&format!("项目{:02}", i + 1), leader))
        .collect()
}

pub fn write_source_workbook(path: &Path, rows: &[ProjectRow]) {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("亏损项目明细").unwrap();

    sheet.write_string(0, 0, "2024年度亏损项目明细表").unwrap();
    sheet.write_string(1, 0, "单位：万元").unwrap();

    let basic = ["序号", "项目名称", "项目负责人", "项目类别", "合同金额", "项目结算金额", "亏损金额"];
    for (col, name) in basic.iter().enumerate() {
        sheet.merge_range(2, col as u16, 4, col as u16, name, &bold).unwrap();
    }
    let first_cost = basic.len() as u16;
    sheet
        .merge_range(2, first_cost, 2, first_cost + 4, "项目主要成本情况", &bold)
        .unwrap();
    for (i, label) in COST_LABELS.iter().enumerate() {
        let col = first_cost + i as u16;
        sheet.write_string_with_format(3, col, *label, &bold).unwrap();
        sheet.write_string_with_format(4, col, "结算", &bold).unwrap();
    }

    for (i, row) in rows.iter().enumerate() {
        let r = 5 + i as u32;
        sheet.write_number(r, 0, (i + 1) as f64).unwrap();
        sheet.write_string(r, 1, &row.name).unwrap();
        sheet.write_string(r, 2, &row.leader).unwrap();
        sheet.write_string(r, 3, &row.category).unwrap();
        sheet.write_number(r, 4, row.contract).unwrap();
        sheet.write_number(r, 5, row.settlement).unwrap();
        sheet.write_number(r, 6, row.loss).unwrap();
        for (k, cost) in row.costs.iter().enumerate() {
            if let Some(value) = cost {
                sheet.write_number(r, first_cost + k as u16, *value).unwrap();
            }
        }
    }

    let note_row = 5 + rows.len() as u32 + 1;
    sheet.write_string(note_row, 0, "填表人：财务部").unwrap();

    workbook.save(path).unwrap();
}

pub const EXPECTED_COLUMNS: [&str; 12] = [
    "序号",
    "项目名称",
    "项目负责人",
    "项目类别",
    "合同金额",
    "项目结算金额",
    "亏损金额",
    "项目主要成本情况_劳务费_结算",
    "项目主要成本情况_材料费_结算",
    "项目主要成本情况_设备机械租赁费_结算",
    "项目主要成本情况_技术服务、咨询费_结算",
    "项目主要成本情况_专业分包_结算",
];
