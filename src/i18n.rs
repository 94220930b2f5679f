// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）、英文、泰文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::ingestion::{BatchOutcome, BatchReport};

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["zh-CN", "en", "th"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言（不支持的语言代码忽略）
///
/// # 参数
/// - locale: 语言代码（"zh-CN" / "en" / "th"）
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use production_tracker::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use production_tracker::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 批次导入结果的提示语
pub fn batch_message(report: &BatchReport) -> String {
    let source = report.source.as_str();
    match &report.outcome {
        BatchOutcome::Loaded { job_count } => t_with_args(
            "import.batch_loaded",
            &[("source", source), ("count", &job_count.to_string())],
        ),
        BatchOutcome::Empty => t_with_args("import.batch_empty", &[("source", source)]),
        BatchOutcome::Failed { message } => t_with_args(
            "import.batch_failed",
            &[("source", source), ("message", message)],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert!(set_locale("th"));
        assert_eq!(current_locale(), "th");

        // 不支持的语言保持原状
        assert!(!set_locale("fr"));
        assert_eq!(current_locale(), "th");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
        assert_eq!(msg, "File not found: /tmp/test.csv");

        set_locale("zh-CN");
    }

    #[test]
    fn test_batch_message() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");

        let loaded = BatchReport::new("a.csv", "2026-01-01", BatchOutcome::Loaded { job_count: 4 });
        assert_eq!(batch_message(&loaded), "a.csv: imported 4 jobs");

        let empty = BatchReport::new("b.xlsx", "2026-01-01", BatchOutcome::Empty);
        assert_eq!(batch_message(&empty), "b.xlsx: no usable data found");

        set_locale("zh-CN");
    }
}
