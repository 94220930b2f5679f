// ==========================================
// Excel 多工作表导入集成测试
// ==========================================
// 测试目标: 工作表 → 分组,标签去空白,仅表头工作表跳过,时间单元格渲染
// 夹具: tests/fixtures/multi_sheet.xlsx
//   " STAMP " : 表头 + 2 行（plan_start / actual_finish 为 h:mm 格式的数值单元格）
//   "EMPTY"   : 仅表头
//   "CTT"     : 表头 + 1 行
// ==========================================

use chrono::NaiveDate;
use production_tracker::domain::{BatchOutcome, RawBatch, RawCell};
use production_tracker::engine::TimeMetricsEngine;
use production_tracker::importer::*;
use production_tracker::logging;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("multi_sheet.xlsx")
}

fn create_test_importer() -> JobImporterImpl {
    JobImporterImpl::with_defaults(Default::default())
        .with_ingestion_date(NaiveDate::from_ymd_opt(2026, 4, 20).unwrap())
}

#[test]
fn test_workbook_sheets_become_groups() {
    let batch = UniversalFileParser
        .parse(fixture_path(), "2026-04-20")
        .expect("Workbook should parse");

    let RawBatch::Grouped {
        source,
        date,
        groups,
    } = batch
    else {
        panic!("workbook must yield a grouped batch");
    };

    assert_eq!(source, "multi_sheet.xlsx");
    assert_eq!(date, "2026-04-20");

    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec![" STAMP ", "EMPTY", "CTT"]);
    assert!(groups.iter().all(|g| g.has_header));

    // 表头 + 数据行
    assert_eq!(groups[0].rows.len(), 3);
    assert_eq!(groups[1].rows.len(), 1);
    assert_eq!(groups[2].rows.len(), 2);

    // h:mm 格式的数值单元格渲染为 HH:MM
    let stamp_row = &groups[0].rows[1];
    assert_eq!(stamp_row.cell(6), &RawCell::Text("12:00".to_string()));
    assert_eq!(stamp_row.cell(9), &RawCell::Text("12:45".to_string()));
}

#[tokio::test]
async fn test_import_multi_sheet_workbook() {
    logging::init_test();

    let jobs = create_test_importer()
        .import_file(fixture_path())
        .await
        .expect("Import should succeed");

    assert_eq!(jobs.len(), 3);
    assert!(jobs.iter().all(|j| j.date == "2026-04-20"));

    let processes: Vec<&str> = jobs.iter().map(|j| j.process.as_str()).collect();
    assert_eq!(processes, vec!["STAMP", "STAMP", "CTT"]);

    let first = &jobs[0];
    assert_eq!(first.id, 101);
    assert_eq!(first.job_name, "SPTR-161268-R5");
    assert_eq!(first.quantity, 50);
    assert_eq!(first.plan_start, "12:00");
    assert_eq!(first.plan_finish, "13:00");
    assert_eq!(first.actual_finish, "12:45");

    // 缺失 ID 合成,跳过本文件中的显式 ID
    let second = &jobs[1];
    assert_eq!(second.id, 1);
    assert_eq!(second.quantity, 0);
    assert_eq!(second.line, "Line 1");
    assert_eq!(second.status, "Pending");

    assert_eq!(jobs[2].id, 7);
    assert_eq!(jobs[2].job_name, "CTT-5541-B");

    let metrics = TimeMetricsEngine::default().evaluate(first);
    assert_eq!(metrics.score, Some(100));
    assert!(metrics.is_completed);
}

#[tokio::test]
async fn test_batch_import_reports_workbook_as_loaded() {
    let report = create_test_importer()
        .batch_import(vec![fixture_path()])
        .await;

    assert_eq!(report.batches[0].source, "multi_sheet.xlsx");
    assert_eq!(
        report.batches[0].outcome,
        BatchOutcome::Loaded { job_count: 3 }
    );
}
