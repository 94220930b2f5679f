// ==========================================
// 生产工单追踪 - 记录归一化器
// ==========================================
// 职责: RawBatch → Vec<ProductionJob>
// 列序: ID, Job Name, Cut Time, Qty, Line, Status,
//       Plan Start, Plan Finish, Actual Start, Actual Finish
// 红线: 行级问题一律用默认值兜底,不中断批次
// ==========================================

use crate::config::NormalizerDefaults;
use crate::domain::ingestion::{BatchOutcome, BatchReport, IngestionReport};
use crate::domain::job::ProductionJob;
use crate::domain::raw::{RawBatch, RawRow};
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::job_importer_trait::DataCleaner;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// 列索引
// ==========================================
const COL_ID: usize = 0;
const COL_JOB_NAME: usize = 1;
const COL_CUT_TIME: usize = 2;
const COL_QUANTITY: usize = 3;
const COL_LINE: usize = 4;
const COL_STATUS: usize = 5;
const COL_PLAN_START: usize = 6;
const COL_PLAN_FINISH: usize = 7;
const COL_ACTUAL_START: usize = 8;
const COL_ACTUAL_FINISH: usize = 9;

// 单批次内的自动编号,仅在行内无可解析 ID 时前进
// 跳过本批次已出现的显式 ID,合成 ID 与显式 ID 不会重复
struct IdAllocator {
    next: i64,
    explicit: HashSet<i64>,
}

impl IdAllocator {
    fn new(explicit: HashSet<i64>) -> Self {
        Self { next: 1, explicit }
    }

    fn allocate(&mut self) -> i64 {
        while self.explicit.contains(&self.next) {
            self.next += 1;
        }
        let id = self.next;
        self.next += 1;
        id
    }
}

// ==========================================
// RecordNormalizer
// ==========================================
pub struct RecordNormalizer {
    defaults: NormalizerDefaults,
    data_cleaner: Box<dyn DataCleaner>,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(NormalizerDefaults::default())
    }
}

impl RecordNormalizer {
    pub fn new(defaults: NormalizerDefaults) -> Self {
        Self::with_cleaner(defaults, Box::new(DataCleanerImpl))
    }

    pub fn with_cleaner(defaults: NormalizerDefaults, data_cleaner: Box<dyn DataCleaner>) -> Self {
        Self {
            defaults,
            data_cleaner,
        }
    }

    pub fn defaults(&self) -> &NormalizerDefaults {
        &self.defaults
    }

    /// 归一化单个批次
    ///
    /// # 返回
    /// - Ok(jobs): 至少一条工单
    /// - Err(EmptyBatch): 批次内无任何可用数据行
    pub fn normalize(&self, batch: &RawBatch) -> ImportResult<Vec<ProductionJob>> {
        let mut ids = IdAllocator::new(self.explicit_ids(batch));
        let mut jobs = Vec::new();

        match batch {
            RawBatch::Delimited {
                date,
                has_header,
                rows,
                ..
            } => {
                let label = self.defaults.flat_process_label.as_str();
                jobs.extend(self.normalize_rows(rows, *has_header, label, date, &mut ids));
            }
            RawBatch::Grouped { date, groups, .. } => {
                for group in groups {
                    let label = group.label.trim();
                    let before = jobs.len();
                    jobs.extend(self.normalize_rows(
                        &group.rows,
                        group.has_header,
                        label,
                        date,
                        &mut ids,
                    ));
                    if jobs.len() == before {
                        debug!(group = %label, "分组无数据行,跳过");
                    }
                }
            }
        }

        if jobs.is_empty() {
            warn!(source = %batch.source(), "批次无可用数据行");
            return Err(ImportError::EmptyBatch {
                source_name: batch.source().to_string(),
            });
        }

        debug!(source = %batch.source(), jobs = jobs.len(), "批次归一化完成");
        Ok(jobs)
    }

    /// 归一化多个批次,按提交顺序拼接
    ///
    /// 空批次只记入报告,不影响其他批次
    #[instrument(skip(self, batches), fields(count = batches.len()))]
    pub fn normalize_all(&self, batches: &[RawBatch]) -> IngestionReport {
        let mut report = IngestionReport::default();

        for batch in batches {
            let result = self.normalize(batch);
            report.batches.push(BatchReport::new(
                batch.source(),
                batch.date(),
                outcome_of(&result),
            ));
            if let Ok(jobs) = result {
                report.jobs.extend(jobs);
            }
        }

        info!(
            jobs = report.jobs.len(),
            loaded = report.loaded_count(),
            "批次归一化汇总"
        );
        report
    }

    // 批次内所有可解析的显式 ID（跨分组）
    fn explicit_ids(&self, batch: &RawBatch) -> HashSet<i64> {
        let cleaner = self.data_cleaner.as_ref();
        let parse = |rows: &[RawRow], has_header: bool| {
            data_rows(rows, has_header)
                .filter_map(|row| cleaner.parse_integer(row.cell(COL_ID)))
                .collect::<Vec<_>>()
        };

        match batch {
            RawBatch::Delimited {
                has_header, rows, ..
            } => parse(rows.as_slice(), *has_header).into_iter().collect(),
            RawBatch::Grouped { groups, .. } => groups
                .iter()
                .flat_map(|group| parse(group.rows.as_slice(), group.has_header))
                .collect(),
        }
    }

    fn normalize_rows(
        &self,
        rows: &[RawRow],
        has_header: bool,
        process: &str,
        date: &str,
        ids: &mut IdAllocator,
    ) -> Vec<ProductionJob> {
        data_rows(rows, has_header)
            .map(|row| self.normalize_row(row, process, date, ids))
            .collect()
    }

    fn normalize_row(
        &self,
        row: &RawRow,
        process: &str,
        date: &str,
        ids: &mut IdAllocator,
    ) -> ProductionJob {
        let cleaner = self.data_cleaner.as_ref();
        let text_or = |idx: usize, default: &str| {
            cleaner
                .clean_text(row.cell(idx))
                .unwrap_or_else(|| default.to_string())
        };
        let time = |idx: usize| text_or(idx, &self.defaults.time_placeholder);

        let id = cleaner
            .parse_integer(row.cell(COL_ID))
            .unwrap_or_else(|| ids.allocate());

        ProductionJob {
            id,
            job_name: text_or(COL_JOB_NAME, &self.defaults.job_name),
            cut_time: time(COL_CUT_TIME),
            quantity: cleaner.parse_quantity(row.cell(COL_QUANTITY)),
            line: text_or(COL_LINE, &self.defaults.line),
            process: process.to_string(),
            status: text_or(COL_STATUS, &self.defaults.status),
            plan_start: time(COL_PLAN_START),
            plan_finish: time(COL_PLAN_FINISH),
            actual_start: time(COL_ACTUAL_START),
            actual_finish: time(COL_ACTUAL_FINISH),
            date: date.to_string(),
        }
    }
}

// 跳过表头与空行后的数据行
fn data_rows(rows: &[RawRow], has_header: bool) -> impl Iterator<Item = &RawRow> {
    rows.iter()
        .skip(usize::from(has_header))
        .filter(|row| !row.is_blank())
}

/// 归一化/导入结果 → 批次结果
pub fn outcome_of(result: &ImportResult<Vec<ProductionJob>>) -> BatchOutcome {
    match result {
        Ok(jobs) => BatchOutcome::Loaded {
            job_count: jobs.len(),
        },
        Err(ImportError::EmptyBatch { .. }) => BatchOutcome::Empty,
        Err(e) => BatchOutcome::Failed {
            message: e.to_string(),
        },
    }
}
