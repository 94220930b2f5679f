use std::time::Instant;

/// 性能统计 Guard：记录 elapsed_ms + 处理条数
///
/// 使用方式：
/// ```ignore
/// let _perf = production_tracker::perf::PerfGuard::new("dashboard_view", jobs.len());
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    items: usize,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str, items: usize) -> Self {
        Self {
            op,
            items,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        tracing::info!(
            target: "perf",
            op = self.op,
            items = self.items,
            elapsed_ms = self.elapsed_ms(),
            "done"
        );
    }
}
