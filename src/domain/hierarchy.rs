// ==========================================
// 工厂设备监控大屏 - 层级结构实体
// ==========================================
// 职责: 工厂 → 分厂 → 部门 三级层级树 + 区域定义
// 说明: 层级数据由外部数据文件提供，本核心只读不写
// ==========================================

use crate::domain::types::MachineId;
use serde::{Deserialize, Serialize};

// ==========================================
// 区域 (Zone)
// ==========================================

/// 区域
///
/// 部门内一组设备的物理分组，设备顺序显式持有（可被操作员重排）。
/// 四个指标字段为展示用数值，可选；持久化 JSON 中 OEE 字段名为 `oEE`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// 区域ID（部门内唯一）
    pub id: String,
    /// 区域名称
    pub name: String,
    /// 设备编号序列（顺序即展示顺序）
    #[serde(default)]
    pub machines: Vec<MachineId>,
    /// 可动率 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<f64>,
    /// 性能稼动率 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,
    /// 良品率 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    /// 设备综合效率 (%)
    #[serde(
        default,
        rename = "oEE",
        alias = "oee",
        skip_serializing_if = "Option::is_none"
    )]
    pub oee: Option<f64>,
}

// ==========================================
// 层级树 (Factory → Plant → Department)
// ==========================================

/// 部门
///
/// 层级树叶子，持有默认的区域序列（布局重置的还原目标）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// 分厂
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub departments: Vec<Department>,
}

/// 工厂
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plants: Vec<Plant>,
}

/// 层级树根
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyRoot {
    #[serde(default)]
    pub factories: Vec<Factory>,
}
