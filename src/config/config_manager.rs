// ==========================================
// 生产工单追踪 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::policy::{
    default_completed_markers, default_in_progress_markers, DEFAULT_FLAT_PROCESS_LABEL,
    DEFAULT_OVERNIGHT_THRESHOLD_MINUTES, MINUTES_PER_DAY,
};
use crate::config::policy_config_trait::PolicyConfigReader;
use crate::db::{ensure_config_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ConfigError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager（会幂等建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 内存数据库（测试/演示用）
    pub fn in_memory() -> ConfigResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::debug!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取 JSON 字符串数组配置,格式错误或为空时回退默认值
    fn get_marker_list(&self, key: &str, default: Vec<String>) -> ConfigResult<Vec<String>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => {
                let cleaned: Vec<String> = list
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if cleaned.is_empty() {
                    Ok(default)
                } else {
                    Ok(cleaned)
                }
            }
            Err(e) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    error = %e,
                    "标记列表配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// PolicyConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PolicyConfigReader for ConfigManager {
    async fn get_overnight_threshold_minutes(&self) -> ConfigResult<i64> {
        let default = DEFAULT_OVERNIGHT_THRESHOLD_MINUTES.to_string();
        let value =
            self.get_config_or_default(config_keys::OVERNIGHT_THRESHOLD_MINUTES, &default)?;

        let minutes = value
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::ConfigValueError {
                key: config_keys::OVERNIGHT_THRESHOLD_MINUTES.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })?;

        // 阈值必须落在一天之内
        if !(0..MINUTES_PER_DAY).contains(&minutes) {
            return Err(ConfigError::ConfigValueError {
                key: config_keys::OVERNIGHT_THRESHOLD_MINUTES.to_string(),
                value,
                message: format!("取值范围 [0, {})", MINUTES_PER_DAY),
            });
        }
        Ok(minutes)
    }

    async fn get_completed_markers(&self) -> ConfigResult<Vec<String>> {
        self.get_marker_list(config_keys::COMPLETED_MARKERS, default_completed_markers())
    }

    async fn get_in_progress_markers(&self) -> ConfigResult<Vec<String>> {
        self.get_marker_list(config_keys::IN_PROGRESS_MARKERS, default_in_progress_markers())
    }

    async fn get_flat_process_label(&self) -> ConfigResult<String> {
        let value =
            self.get_config_or_default(config_keys::FLAT_PROCESS_LABEL, DEFAULT_FLAT_PROCESS_LABEL)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(DEFAULT_FLAT_PROCESS_LABEL.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 指标
    pub const OVERNIGHT_THRESHOLD_MINUTES: &str = "metrics/overnight_threshold_minutes";

    // 状态分类（JSON 字符串数组）
    pub const COMPLETED_MARKERS: &str = "status/completed_markers";
    pub const IN_PROGRESS_MARKERS: &str = "status/in_progress_markers";

    // 导入
    pub const FLAT_PROCESS_LABEL: &str = "import/flat_process_label";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_table_empty() {
        let config = ConfigManager::in_memory().unwrap();

        assert_eq!(config.get_overnight_threshold_minutes().await.unwrap(), 720);
        assert_eq!(
            config.get_flat_process_label().await.unwrap(),
            "Imported CSV"
        );
        assert_eq!(
            config.get_completed_markers().await.unwrap(),
            default_completed_markers()
        );
    }

    #[tokio::test]
    async fn test_override_and_snapshot() {
        let config = ConfigManager::in_memory().unwrap();
        config
            .set_global_config_value(config_keys::OVERNIGHT_THRESHOLD_MINUTES, "600")
            .unwrap();
        config
            .set_global_config_value(config_keys::COMPLETED_MARKERS, r#"["done", " "]"#)
            .unwrap();

        let policy = config.load_metrics_policy().await.unwrap();
        assert_eq!(policy.overnight_threshold_minutes, 600);
        assert_eq!(policy.completed_markers, vec!["done".to_string()]);

        let snapshot = config.get_config_snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.get(config_keys::OVERNIGHT_THRESHOLD_MINUTES),
            Some(&"600".to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_threshold_is_rejected() {
        let config = ConfigManager::in_memory().unwrap();
        config
            .set_global_config_value(config_keys::OVERNIGHT_THRESHOLD_MINUTES, "abc")
            .unwrap();
        assert!(config.get_overnight_threshold_minutes().await.is_err());

        config
            .set_global_config_value(config_keys::OVERNIGHT_THRESHOLD_MINUTES, "2000")
            .unwrap();
        assert!(config.get_overnight_threshold_minutes().await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_marker_json_falls_back() {
        let config = ConfigManager::in_memory().unwrap();
        config
            .set_global_config_value(config_keys::IN_PROGRESS_MARKERS, "not-json")
            .unwrap();
        assert_eq!(
            config.get_in_progress_markers().await.unwrap(),
            default_in_progress_markers()
        );
    }
}
