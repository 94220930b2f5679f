// ==========================================
// 生产工单追踪 - 演示数据
// ==========================================

use crate::domain::job::ProductionJob;

/// 三条演示工单: 已完工准时 / 生产中 / 等待物料
pub fn sample_jobs(date: &str) -> Vec<ProductionJob> {
    let job = |id: i64,
               job_name: &str,
               cut_time: &str,
               quantity: u64,
               line: &str,
               process: &str,
               status: &str,
               times: [&str; 4]| ProductionJob {
        id,
        job_name: job_name.to_string(),
        cut_time: cut_time.to_string(),
        quantity,
        line: line.to_string(),
        process: process.to_string(),
        status: status.to_string(),
        plan_start: times[0].to_string(),
        plan_finish: times[1].to_string(),
        actual_start: times[2].to_string(),
        actual_finish: times[3].to_string(),
        date: date.to_string(),
    };

    vec![
        job(
            1,
            "SPTR-161268-R5",
            "16:31",
            50,
            "Line 1",
            "STAMP",
            "เสร็จแล้ว @ 16:44",
            ["16:31", "16:44", "16:31", "16:44"],
        ),
        job(
            2,
            "STK-9901-X",
            "08:00",
            120,
            "Line A",
            "STK",
            "กำลังผลิต",
            ["08:00", "10:00", "08:05", "-"],
        ),
        job(
            3,
            "CTT-5541-B",
            "09:30",
            200,
            "Line 2",
            "CTT",
            "รอวัตถุดิบ",
            ["09:30", "11:30", "-", "-"],
        ),
    ]
}
