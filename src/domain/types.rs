// ==========================================
// 工厂设备监控大屏 - 领域类型定义
// ==========================================
// 职责: 设备状态枚举、布局操作类型、基础别名
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 设备编号
///
/// 不透明字符串, 仅在所属区域内唯一, 不保证全局唯一
pub type MachineId = String;

// ==========================================
// 设备状态 (Machine Status)
// ==========================================
// 序列化格式: 小写 (与状态表数据一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Running, // 运行中
    Idle,    // 待机
    Off,     // 停机
    Fault,   // 故障
}

impl MachineStatus {
    /// 转换为字符串标识（与状态表数据格式一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Running => "running",
            MachineStatus::Idle => "idle",
            MachineStatus::Off => "off",
            MachineStatus::Fault => "fault",
        }
    }

    /// 从字符串解析设备状态
    ///
    /// 未知取值返回 None，由调用方决定回退行为（状态表查询回退为 Off）
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "running" => Some(MachineStatus::Running),
            "idle" => Some(MachineStatus::Idle),
            "off" => Some(MachineStatus::Off),
            "fault" => Some(MachineStatus::Fault),
            _ => None,
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 布局操作类型 (Layout Action Type)
// ==========================================
// 用于操作日志审计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutActionType {
    EditEntered, // 进入编辑模式
    EditExited,  // 退出编辑模式
    LayoutSaved, // 布局保存
    LayoutReset, // 布局重置
}

impl LayoutActionType {
    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LayoutActionType::EditEntered => "EDIT_ENTERED",
            LayoutActionType::EditExited => "EDIT_EXITED",
            LayoutActionType::LayoutSaved => "LAYOUT_SAVED",
            LayoutActionType::LayoutReset => "LAYOUT_RESET",
        }
    }

    /// 从字符串解析操作类型
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EDIT_ENTERED" => Some(LayoutActionType::EditEntered),
            "EDIT_EXITED" => Some(LayoutActionType::EditExited),
            "LAYOUT_SAVED" => Some(LayoutActionType::LayoutSaved),
            "LAYOUT_RESET" => Some(LayoutActionType::LayoutReset),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
