// ==========================================
// 生产工单追踪 - 工单导入器实现
// ==========================================
// 流程: 文件解析 → 归一化 → 批次报告
// 并发: 每个文件一个阻塞任务,结果按提交顺序合并
// ==========================================

use crate::config::NormalizerDefaults;
use crate::domain::ingestion::{BatchReport, IngestionReport};
use crate::domain::job::ProductionJob;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{file_ingestion_date, source_name, UniversalFileParser};
use crate::importer::job_importer_trait::{FileParser, JobImporter};
use crate::importer::record_normalizer::{outcome_of, RecordNormalizer};
use crate::perf::PerfGuard;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// JobImporterImpl
// ==========================================
pub struct JobImporterImpl {
    file_parser: Arc<dyn FileParser>,
    normalizer: Arc<RecordNormalizer>,
    // 固定导入日期（为空时取文件修改日期）
    ingestion_date: Option<NaiveDate>,
}

impl JobImporterImpl {
    pub fn new(file_parser: Arc<dyn FileParser>, normalizer: RecordNormalizer) -> Self {
        Self {
            file_parser,
            normalizer: Arc::new(normalizer),
            ingestion_date: None,
        }
    }

    /// 使用通用文件解析器
    pub fn with_defaults(defaults: NormalizerDefaults) -> Self {
        Self::new(
            Arc::new(UniversalFileParser),
            RecordNormalizer::new(defaults),
        )
    }

    pub fn with_ingestion_date(mut self, date: NaiveDate) -> Self {
        self.ingestion_date = Some(date);
        self
    }

    fn date_for(&self, path: &Path) -> String {
        match self.ingestion_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => file_ingestion_date(path),
        }
    }
}

// 在阻塞线程池中执行: 解析 + 归一化
fn load_file(
    file_parser: &dyn FileParser,
    normalizer: &RecordNormalizer,
    path: &Path,
    date: &str,
) -> ImportResult<Vec<ProductionJob>> {
    let batch = file_parser.parse_to_raw_batch(path, date)?;
    normalizer.normalize(&batch)
}

#[async_trait]
impl JobImporter for JobImporterImpl {
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<Vec<ProductionJob>> {
        let path: PathBuf = file_path.as_ref().to_path_buf();
        let date = self.date_for(&path);
        let _perf = PerfGuard::new("import_file", 1);

        let file_parser = Arc::clone(&self.file_parser);
        let normalizer = Arc::clone(&self.normalizer);
        let jobs = tokio::task::spawn_blocking(move || {
            load_file(file_parser.as_ref(), &normalizer, &path, &date)
        })
        .await
        .map_err(|e| ImportError::TaskJoinError(e.to_string()))??;

        info!(jobs = jobs.len(), "文件导入成功");
        Ok(jobs)
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> IngestionReport {
        info!(count = file_paths.len(), "开始批量导入文件");

        // 为每个文件创建导入任务
        let import_tasks = file_paths.into_iter().map(|path| {
            let source = source_name(path.as_ref());
            let date = self.date_for(path.as_ref());
            async move {
                let result = self.import_file(path).await;
                let report = BatchReport::new(source, date, outcome_of(&result));
                match &result {
                    Ok(jobs) => {
                        info!(batch_id = %report.batch_id, file = %report.source, jobs = jobs.len(), "批次已加载");
                    }
                    Err(ImportError::EmptyBatch { .. }) => {
                        warn!(batch_id = %report.batch_id, file = %report.source, "文件无可用数据行");
                    }
                    Err(e) => {
                        error!(batch_id = %report.batch_id, file = %report.source, error = %e, "文件导入失败");
                    }
                }
                (report, result.unwrap_or_default())
            }
        });

        // 并发执行,join_all 保持提交顺序
        let results = join_all(import_tasks).await;

        let mut report = IngestionReport::default();
        for (batch, jobs) in results {
            report.batches.push(batch);
            report.jobs.extend(jobs);
        }

        info!(
            total = report.batches.len(),
            loaded = report.loaded_count(),
            failed = report.batches.len() - report.loaded_count(),
            jobs = report.jobs.len(),
            "批量导入完成"
        );

        report
    }
}

impl IngestionReport {
    /// 取出工单; 全部批次均无数据时返回 NoUsableData
    pub fn into_jobs(self) -> ImportResult<Vec<ProductionJob>> {
        if self.jobs.is_empty() {
            return Err(ImportError::NoUsableData);
        }
        Ok(self.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::BatchOutcome;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    const HEADER: &str =
        "ID,Job Name,Cut Time,Qty,Line,Status,Plan Start,Plan Finish,Actual Start,Actual Finish";

    fn csv_file(rows: &[&str]) -> NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(temp_file, "{}", row).unwrap();
        }
        temp_file
    }

    fn importer() -> JobImporterImpl {
        JobImporterImpl::with_defaults(NormalizerDefaults::default())
            .with_ingestion_date(NaiveDate::from_ymd_opt(2026, 2, 3).unwrap())
    }

    #[tokio::test]
    async fn test_import_file_uses_fixed_date() {
        let file = csv_file(&["1,JOB-A,08:00,10,Line 1,Completed,08:00,09:00,08:00,09:00"]);

        let jobs = importer().import_file(file.path()).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].date, "2026-02-03");
        assert_eq!(jobs[0].process, "Imported CSV");
    }

    #[tokio::test]
    async fn test_batch_import_keeps_submission_order() {
        let first = csv_file(&["1,FIRST,,1", "2,FIRST-2,,1"]);
        let empty = csv_file(&[]);
        let second = csv_file(&["1,SECOND,,1"]);

        let report = importer()
            .batch_import(vec![first.path(), empty.path(), second.path()])
            .await;

        assert_eq!(report.batches.len(), 3);
        assert_eq!(report.batches[1].outcome, BatchOutcome::Empty);
        let names: Vec<&str> = report.jobs.iter().map(|j| j.job_name.as_str()).collect();
        assert_eq!(names, vec!["FIRST", "FIRST-2", "SECOND"]);
    }

    #[tokio::test]
    async fn test_batch_import_missing_file_is_reported() {
        let report = importer()
            .batch_import(vec![Path::new("/nonexistent/jobs.csv")])
            .await;

        assert!(!report.has_data());
        assert!(matches!(
            report.batches[0].outcome,
            BatchOutcome::Failed { .. }
        ));
        assert!(matches!(report.into_jobs(), Err(ImportError::NoUsableData)));
    }
}
