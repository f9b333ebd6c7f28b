// ==========================================
// 工厂设备监控大屏 - 操作日志仓储
// ==========================================
// 职责: 管理 layout_action_log 表（布局编辑审计追踪）
// 说明: 日志按时间窗口查询较频繁，建立时间索引
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::action_log::LayoutAction;
use crate::domain::types::LayoutActionType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
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
            CREATE TABLE IF NOT EXISTS layout_action_log (
              action_id TEXT PRIMARY KEY,
              action_type TEXT NOT NULL,
              layout_key TEXT NOT NULL,
              actor TEXT NOT NULL,
              detail TEXT,
              action_ts TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_layout_action_ts
              ON layout_action_log(action_ts);
            CREATE INDEX IF NOT EXISTS idx_layout_action_key_ts
              ON layout_action_log(layout_key, action_ts);
            "#,
        )?;
        Ok(())
    }

    /// 写入一条操作日志
    pub fn insert(&self, action: &LayoutAction) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO layout_action_log (
                action_id,
                action_type,
                layout_key,
                actor,
                detail,
                action_ts
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                action.action_id,
                action.action_type.to_db_str(),
                action.layout_key,
                action.actor,
                action.detail,
                action.action_ts,
            ],
        )?;
        Ok(())
    }

    /// 查询最近的操作日志（按 rowid 倒序，同秒写入也保持插入序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<LayoutAction>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, layout_key, actor, detail, action_ts
            FROM layout_action_log
            ORDER BY rowid DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询某布局键下的操作日志
    pub fn list_by_key(&self, layout_key: &str, limit: usize) -> RepositoryResult<Vec<LayoutAction>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, layout_key, actor, detail, action_ts
            FROM layout_action_log
            WHERE layout_key = ?1
            ORDER BY rowid DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![layout_key, limit as i64], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<LayoutAction> {
        let action_type_raw: String = row.get(1)?;
        Ok(LayoutAction {
            action_id: row.get(0)?,
            // 历史库中的未知类型按 LAYOUT_SAVED 读出，避免读路径失败
            action_type: LayoutActionType::parse(&action_type_raw)
                .unwrap_or(LayoutActionType::LayoutSaved),
            layout_key: row.get(2)?,
            actor: row.get(3)?,
            detail: row.get(4)?,
            action_ts: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_repo() -> ActionLogRepository {
        ActionLogRepository::new(":memory:").expect("Failed to create test repository")
    }

    #[test]
    fn test_insert_and_list_recent() {
        let repo = setup_test_repo();

        for action_type in [
            LayoutActionType::EditEntered,
            LayoutActionType::LayoutSaved,
            LayoutActionType::EditExited,
        ] {
            let action = LayoutAction::new(action_type, "layout-f1-p1-d1", "operator", None);
            repo.insert(&action).expect("Failed to insert");
        }

        let recent = repo.list_recent(10).expect("Failed to list");
        assert_eq!(recent.len(), 3);
        // 倒序: 最后写入的在最前
        assert_eq!(recent[0].action_type, LayoutActionType::EditExited);
        assert_eq!(recent[2].action_type, LayoutActionType::EditEntered);
    }

    #[test]
    fn test_list_by_key_filters() {
        let repo = setup_test_repo();

        repo.insert(&LayoutAction::new(
            LayoutActionType::LayoutSaved,
            "layout-f1-p1-d1",
            "operator",
            Some(r#"{"zone_id":"z1"}"#.to_string()),
        ))
        .expect("Failed to insert");
        repo.insert(&LayoutAction::new(
            LayoutActionType::LayoutReset,
            "layout-f1-p1-d2",
            "operator",
            None,
        ))
        .expect("Failed to insert");

        let logs = repo
            .list_by_key("layout-f1-p1-d1", 10)
            .expect("Failed to list");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action_type, LayoutActionType::LayoutSaved);
        assert_eq!(logs[0].detail.as_deref(), Some(r#"{"zone_id":"z1"}"#));
    }

    #[test]
    fn test_list_recent_respects_limit() {
        let repo = setup_test_repo();

        for _ in 0..5 {
            repo.insert(&LayoutAction::new(
                LayoutActionType::LayoutSaved,
                "layout-f1-p1-d1",
                "operator",
                None,
            ))
            .expect("Failed to insert");
        }

        let recent = repo.list_recent(2).expect("Failed to list");
        assert_eq!(recent.len(), 2);
    }
}
