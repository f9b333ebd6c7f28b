// ==========================================
// 工厂设备监控大屏 - 布局仓储
// ==========================================
// 职责: 管理 layout_store 表（布局键 → 区域序列 JSON）
// 说明: 每个布局键至多一条记录；保存为整体覆盖而非合并
// 说明: 无法按预期形状解析的记录视同不存在，由调用方回退默认布局
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::hierarchy::Zone;
use crate::domain::selection::LayoutKey;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct LayoutRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LayoutRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS layout_store (
              layout_key TEXT PRIMARY KEY,
              zones_json TEXT NOT NULL,
              saved_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// 读取布局记录
    ///
    /// # 返回
    /// - Ok(Some(zones)): 记录存在且形状正确
    /// - Ok(None): 记录不存在，或 JSON 无法按区域序列解析（告警后视同不存在）
    pub fn load(&self, key: &LayoutKey) -> RepositoryResult<Option<Vec<Zone>>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT zones_json FROM layout_store WHERE layout_key = ?1",
            params![key.as_str()],
            |row| row.get::<_, String>(0),
        );

        let raw = match result {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Vec<Zone>>(&raw) {
            Ok(zones) => Ok(Some(zones)),
            Err(e) => {
                // 坏记录不应让大屏失败；视同不存在，调用方回退默认布局
                tracing::warn!(
                    "布局记录解析失败，视同不存在: layout_key={}, error={}",
                    key.as_str(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// 保存布局记录（整体覆盖）
    ///
    /// 同一布局键重复保存时更新记录和保存时间
    pub fn save(&self, key: &LayoutKey, zones: &[Zone]) -> RepositoryResult<()> {
        let zones_json = serde_json::to_string(zones)?;
        let saved_at = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO layout_store (layout_key, zones_json, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(layout_key) DO UPDATE SET
                zones_json = excluded.zones_json,
                saved_at = excluded.saved_at
            "#,
            params![key.as_str(), zones_json, saved_at],
        )?;
        Ok(())
    }

    /// 删除布局记录
    ///
    /// 删除后再次 load 返回 None
    pub fn remove(&self, key: &LayoutKey) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM layout_store WHERE layout_key = ?1",
            params![key.as_str()],
        )?;
        Ok(affected)
    }

    /// 写入原始 JSON（仅测试使用，用于构造坏记录）
    #[cfg(test)]
    fn save_raw(&self, key: &LayoutKey, raw: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO layout_store (layout_key, zones_json, saved_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(layout_key) DO UPDATE SET zones_json = excluded.zones_json
            "#,
            params![key.as_str(), raw],
        )?;
        Ok(())
    }
}
