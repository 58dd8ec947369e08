//! 读取→分析→汇总 的端到端测试

mod fixtures;

use fixtures::{leader_only_rows, write_source_workbook, ProjectRow};
use loss_audit::config::Config;
use loss_audit::ingest::load_table;
use loss_audit_common::{AuditSession, Error, RuleKind, RuleStatus};
use tempfile::tempdir;

fn run(rows: &[ProjectRow]) -> loss_audit_common::AuditReport {
    loss_audit::logging::init_test();
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("source.xlsx");
    write_source_workbook(&path, rows);

    let config = Config::default();
    let table = load_table(&path, None, &config.source_layout()).expect("读取失败");
    let mut session = AuditSession::new(&config.audit);
    session.upload(table);
    session.run().expect("分析失败")
}

#[test]
fn test_single_leader_anomaly() {
    let report = run(&leader_only_rows());

    assert_eq!(report.results.len(), 5);
    assert!(report.results.iter().all(|r| r.status == RuleStatus::Success));

    let leader = &report.results[0];
    assert_eq!(leader.rule, RuleKind::LeaderFrequency);
    assert_eq!(leader.data.len(), 3);
    for other in &report.results[1..] {
        assert!(other.data.is_empty(), "{} 不应有数据", other.sheet_name);
    }

    let classification = &report.classification;
    let names: Vec<&str> = classification
        .one_exception
        .iter()
        .map(|p| p.project_name.as_str())
        .collect();
    assert_eq!(names, vec!["项目01", "项目03", "项目06"]);
    assert!(classification.two_exceptions.is_empty());
    assert!(classification.more_than_two_exceptions.is_empty());
    assert_eq!(classification.all.len(), 3);
}

#[test]
fn test_multi_rule_project_and_low_loss_subset() {
    let mut rows = leader_only_rows();
    // 施工项目，亏损超过合同且超过1000
    rows[3] = ProjectRow {
        category: "施工总承包".to_string(),
        contract: 1000.0,
        settlement: 1500.0,
        loss: 1200.0,
        ..ProjectRow::normal("项目04", "王五")
    };
    // 劳务费占合同一半，亏损金额低
    rows[4].costs = [Some(50.0), None, None, None, None];

    let report = run(&rows);
    let count = |kind: RuleKind| {
        report
            .results
            .iter()
            .find(|r| r.rule == kind)
            .map(|r| r.data.len())
            .unwrap_or(0)
    };
    assert_eq!(count(RuleKind::DesignLoss), 1);
    assert_eq!(count(RuleKind::ConstructionRatio), 1);
    assert_eq!(count(RuleKind::LossOverThreshold), 1);
    assert_eq!(count(RuleKind::CostStructure), 2);

    let big = &report.classification.more_than_two_exceptions;
    assert_eq!(big.len(), 1);
    assert_eq!(big[0].project_name, "项目04");
    assert_eq!(big[0].exception_count, 4);

    let low_loss = report.low_loss_projects().expect("缺少低亏损子集");
    assert_eq!(low_loss.len(), 1);
}

#[test]
fn test_run_without_upload() {
    let session = AuditSession::new(&Config::default().audit);
    assert!(matches!(session.run(), Err(Error::NoDataUploaded)));
}
