// ==========================================
// 生产工单追踪 - 命令行入口
// ==========================================
// 用法: production-tracker [选项] <文件>...
//   --sample            使用演示数据
//   --locale <代码>     zh-CN / en / th
//   --date <日期>       按导入日期筛选
//   --process <工序>    按工序筛选
//   --job <工单名>      按工单名筛选
//   --delay <条件>      delayed / on-time
//   --json              以 JSON 输出视图
// ==========================================

use anyhow::{bail, Context};
use chrono::Local;
use production_tracker::config::{ConfigManager, PolicyConfigReader};
use production_tracker::db::get_default_db_path;
use production_tracker::domain::{DelayFilter, ProcessSummary, Selector};
use production_tracker::engine::{Aggregator, DashboardState, FilterEngine, TimeMetricsEngine};
use production_tracker::i18n::{self, t, t_with_args};
use production_tracker::importer::{JobImporter, JobImporterImpl};
use production_tracker::sample::sample_jobs;
use production_tracker::{logging, APP_NAME, VERSION};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct CliArgs {
    sample: bool,
    json: bool,
    locale: Option<String>,
    date: Option<String>,
    process: Option<String>,
    job_name: Option<String>,
    delay: DelayFilter,
    files: Vec<PathBuf>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = CliArgs::default();
        while let Some(arg) = args.next() {
            let mut value_of = |flag: &str| {
                args.next()
                    .with_context(|| format!("{} 需要一个参数", flag))
            };
            match arg.as_str() {
                "--sample" => parsed.sample = true,
                "--json" => parsed.json = true,
                "--locale" => parsed.locale = Some(value_of("--locale")?),
                "--date" => parsed.date = Some(value_of("--date")?),
                "--process" => parsed.process = Some(value_of("--process")?),
                "--job" => parsed.job_name = Some(value_of("--job")?),
                "--delay" => {
                    parsed.delay = match value_of("--delay")?.as_str() {
                        "delayed" => DelayFilter::Delayed,
                        "on-time" => DelayFilter::OnTime,
                        "all" => DelayFilter::All,
                        other => bail!("未知的延迟条件: {}", other),
                    }
                }
                flag if flag.starts_with("--") => bail!("未知选项: {}", flag),
                file => parsed.files.push(PathBuf::from(file)),
            }
        }

        if !parsed.sample && parsed.files.is_empty() {
            bail!("用法: production-tracker [--sample] [--locale zh-CN|en|th] <文件>...");
        }
        Ok(parsed)
    }
}

fn score_text(score: Option<i64>) -> String {
    score
        .map(|s| format!("{}%", s))
        .unwrap_or_else(|| t("dashboard.unscored"))
}

fn print_summary_row(summary: &ProcessSummary) {
    println!(
        "{}",
        t_with_args(
            "dashboard.process_row",
            &[
                ("process", &summary.process),
                ("count", &summary.count.to_string()),
                ("quantity", &summary.quantity.to_string()),
                ("score", &score_text(summary.avg_score)),
            ],
        )
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    if let Some(locale) = &args.locale {
        if !i18n::set_locale(locale) {
            warn!(locale = %locale, "不支持的语言,使用默认语言");
        }
    }

    info!("{} v{}", APP_NAME, VERSION);

    // 加载配置
    let db_path = get_default_db_path();
    info!(db_path = %db_path, "使用配置数据库");
    let config = ConfigManager::new(&db_path).context("无法打开配置数据库")?;
    let policy = config.load_metrics_policy().await?;
    let defaults = config.load_normalizer_defaults().await?;

    // 导入工单
    let jobs = if args.sample {
        let jobs = sample_jobs(&Local::now().format("%Y-%m-%d").to_string());
        println!(
            "{}",
            t_with_args("import.sample_loaded", &[("count", &jobs.len().to_string())])
        );
        jobs
    } else {
        let importer = JobImporterImpl::with_defaults(defaults);
        let report = importer.batch_import(args.files.clone()).await;
        for batch in &report.batches {
            println!("{}", i18n::batch_message(batch));
        }
        let failed = report.failures().count();
        if failed > 0 {
            warn!(failed, total = report.batches.len(), "部分文件未能加载");
        }
        if !report.has_data() {
            bail!(t("import.no_usable_data"));
        }
        report.into_jobs()?
    };

    // 应用筛选
    let engine = TimeMetricsEngine::new(policy);
    let filter_engine = FilterEngine::new(engine.clone());
    let mut state = DashboardState::new(jobs);
    if let Some(date) = args.date {
        state = state.with_date(Selector::exact(date), &filter_engine);
    }
    if let Some(process) = args.process {
        state = state.with_process(Selector::exact(process), &filter_engine);
    }
    if let Some(job_name) = args.job_name {
        state = state.with_job_name(Selector::exact(job_name), &filter_engine);
    }
    state = state.with_delay_filter(args.delay);

    let view = state.view(&engine);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    // 汇总表
    if view.jobs.is_empty() {
        println!("{}", t("common.no_data"));
    }
    // 工序行与合计行同源（均不受延迟条件影响）
    for summary in Aggregator::rank_summaries(view.summaries.clone()) {
        print_summary_row(&summary);
    }
    let aggregator = Aggregator::new(engine);

    let overall = &view.overall;
    println!(
        "{}",
        t_with_args(
            "dashboard.overall",
            &[
                ("count", &overall.count.to_string()),
                ("quantity", &overall.quantity.to_string()),
                ("completed", &overall.completed.to_string()),
                ("on_time", &overall.on_time_count.to_string()),
                ("delayed", &overall.delayed_count.to_string()),
                ("score", &score_text(overall.avg_score)),
            ],
        )
    );

    for (job, metrics) in aggregator.delayed_jobs(&view.jobs) {
        println!(
            "{}",
            t_with_args(
                "dashboard.delayed_job",
                &[
                    ("job", &job.job_name),
                    ("process", job.process_key()),
                    ("delay", &metrics.delay_or_zero().to_string()),
                ],
            )
        );
    }

    Ok(())
}
