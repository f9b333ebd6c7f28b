// ==========================================
// 工厂设备监控大屏 - 布局操作日志实体
// ==========================================
// 职责: 操作员布局编辑行为的审计记录
// 说明: 审计为尽力而为，写入失败不影响大屏状态
// ==========================================

use crate::domain::types::LayoutActionType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 布局操作日志
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutAction {
    /// 日志ID (UUID)
    pub action_id: String,
    /// 操作类型
    pub action_type: LayoutActionType,
    /// 布局键
    pub layout_key: String,
    /// 操作员标识
    pub actor: String,
    /// 附加信息（JSON 字符串，可选）
    pub detail: Option<String>,
    /// 操作时间
    pub action_ts: String,
}

impl LayoutAction {
    /// 创建新的操作日志（自动生成 UUID 和时间戳）
    pub fn new(
        action_type: LayoutActionType,
        layout_key: &str,
        actor: &str,
        detail: Option<String>,
    ) -> Self {
        let now = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        Self {
            action_id: Uuid::new_v4().to_string(),
            action_type,
            layout_key: layout_key.to_string(),
            actor: actor.to_string(),
            detail,
            action_ts: now,
        }
    }
}
