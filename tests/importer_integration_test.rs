// ==========================================
// 导入集成测试
// ==========================================
// 测试目标: 文件 → 归一化 → 工单集合 的完整链路
// ==========================================


use chrono::NaiveDate;
use production_tracker::config::{config_keys, ConfigManager, PolicyConfigReader};
use production_tracker::domain::{BatchOutcome, RawBatch, RawRow};
use production_tracker::importer::*;
use production_tracker::logging;
use test_helpers::{create_test_db, insert_test_config, open_test_connection, write_job_csv};

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 20).unwrap()
}

fn create_test_importer() -> JobImporterImpl {
    JobImporterImpl::with_defaults(Default::default()).with_ingestion_date(fixed_date())
}

#[tokio::test]
async fn test_import_csv_end_to_end() {
    logging::init_test();

    let file = write_job_csv(&[
        "1,SPTR-161268-R5,16:31,50,Line 1,Completed,16:31,16:44,16:31,16:44",
        "\"2\",\"STK-9901-X\",08:00,120,Line A,In Progress,08:00,10:00,08:05,-",
        ",CTT-5541-B,,abc,,,09:30,11:30,-,-",
    ])
    .expect("Failed to write csv");

    let jobs = create_test_importer()
        .import_file(file.path())
        .await
        .expect("Import should succeed");

    assert_eq!(jobs.len(), 3);
    assert!(jobs.iter().all(|j| j.process == "Imported CSV"));
    assert!(jobs.iter().all(|j| j.date == "2026-04-20"));

    assert_eq!(jobs[1].id, 2);
    assert_eq!(jobs[1].job_name, "STK-9901-X");

    // 缺省值兜底: 自动编号跳过本批次显式 ID,数量无法解析记为 0
    let third = &jobs[2];
    assert_eq!(third.id, 3);
    let unique: std::collections::HashSet<i64> = jobs.iter().map(|j| j.id).collect();
    assert_eq!(unique.len(), jobs.len());
    assert_eq!(third.quantity, 0);
    assert_eq!(third.line, "Line 1");
    assert_eq!(third.status, "Pending");
    assert_eq!(third.cut_time, "-");
}

#[tokio::test]
async fn test_batch_import_empty_and_valid_files() {
    logging::init_test();

    let empty = write_job_csv(&[]).expect("Failed to write csv");
    let valid = write_job_csv(&[
        "1,A,,1,,,08:00,09:00,,09:00",
        "2,B,,1,,,08:00,09:00,,09:30",
        "3,C,,1,,,08:00,09:00,,-",
    ])
    .expect("Failed to write csv");

    let report = create_test_importer()
        .batch_import(vec![empty.path(), valid.path()])
        .await;

    assert!(report.has_data());
    assert_eq!(report.jobs.len(), 3);
    assert_eq!(report.batches[0].outcome, BatchOutcome::Empty);
    assert_eq!(
        report.batches[1].outcome,
        BatchOutcome::Loaded { job_count: 3 }
    );
    assert_ne!(report.batches[0].batch_id, report.batches[1].batch_id);
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn test_non_utf8_cell_keeps_file_loaded() {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create csv");
    writeln!(file, "{}", test_helpers::JOB_HEADER).expect("write");
    writeln!(file, "1,A,,5,,Completed,08:00,09:00,,09:00").expect("write");
    file.write_all(b"2,B,,7,,\xca\xd3\xe0\xc3\xe7\xa8,08:00,09:00,,09:30\n")
        .expect("write");
    file.flush().expect("flush");

    let report = create_test_importer().batch_import(vec![file.path()]).await;

    assert_eq!(
        report.batches[0].outcome,
        BatchOutcome::Loaded { job_count: 2 }
    );
    assert_eq!(report.jobs[1].job_name, "B");
    assert_eq!(report.jobs[1].quantity, 7);
    assert_eq!(report.jobs[1].plan_finish, "09:00");
}

#[tokio::test]
async fn test_batch_import_concatenates_in_submission_order() {
    let files: Vec<_> = (0..6)
        .map(|i| {
            let rows: Vec<String> = (0..(6 - i) * 20)
                .map(|n| format!("{},FILE{}-{},,1", n + 1, i, n))
                .collect();
            let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
            write_job_csv(&refs).expect("Failed to write csv")
        })
        .collect();

    let report = create_test_importer()
        .batch_import(files.iter().map(|f| f.path()).collect())
        .await;

    let prefixes: Vec<String> = report
        .jobs
        .iter()
        .map(|j| j.job_name.split('-').next().unwrap_or_default().to_string())
        .collect();
    let mut sorted = prefixes.clone();
    sorted.sort();
    assert_eq!(prefixes, sorted, "jobs must keep file submission order");
    assert_eq!(report.loaded_count(), 6);
}

#[tokio::test]
async fn test_batch_import_without_usable_data() {
    let empty = write_job_csv(&[]).expect("Failed to write csv");

    let report = create_test_importer()
        .batch_import(vec![empty.path().to_path_buf(), "missing.xlsx".into()])
        .await;

    assert!(!report.has_data());
    assert_eq!(report.empty_sources().len(), 1);
    assert!(matches!(
        report.batches[1].outcome,
        BatchOutcome::Failed { .. }
    ));
    assert!(matches!(report.into_jobs(), Err(ImportError::NoUsableData)));
}

#[tokio::test]
async fn test_flat_label_from_config() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn, config_keys::FLAT_PROCESS_LABEL, "Press Line").expect("insert");
    drop(conn);

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let defaults = config
        .load_normalizer_defaults()
        .await
        .expect("Failed to load defaults");

    let file = write_job_csv(&["1,A,,1"]).expect("Failed to write csv");
    let jobs = JobImporterImpl::with_defaults(defaults)
        .import_file(file.path())
        .await
        .expect("Import should succeed");

    assert_eq!(jobs[0].process, "Press Line");
}

#[test]
fn test_grouped_batch_normalization() {
    let header: RawRow = ["ID", "Job Name"].into_iter().collect();
    let batch = RawBatch::Grouped {
        source: "plan.xlsx".to_string(),
        date: "2026-04-20".to_string(),
        groups: vec![
            production_tracker::domain::RawGroup {
                label: "STAMP".to_string(),
                has_header: true,
                rows: vec![header.clone(), ["", "A"].into_iter().collect()],
            },
            production_tracker::domain::RawGroup {
                label: "CTT ".to_string(),
                has_header: true,
                rows: vec![header, ["", "B"].into_iter().collect()],
            },
        ],
    };

    let jobs = RecordNormalizer::default()
        .normalize(&batch)
        .expect("Normalization should succeed");

    assert_eq!(jobs.len(), 2);
    assert_eq!((jobs[0].id, jobs[0].process.as_str()), (1, "STAMP"));
    assert_eq!((jobs[1].id, jobs[1].process.as_str()), (2, "CTT"));
}
