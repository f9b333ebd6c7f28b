// ==========================================
// 工厂设备监控大屏 - 设备快照与状态表
// ==========================================
// 职责: 聚焦设备快照、状态表、设备详情（状态说明 + APQO 指标）
// 说明: 状态表为外部只读数据，未知设备一律回退为停机
// ==========================================

use crate::domain::hierarchy::Zone;
use crate::domain::types::{MachineId, MachineStatus};
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 状态表 (Status Table)
// ==========================================

/// 设备状态表
///
/// 外部只读数据：设备编号 → 状态。
/// 表中不存在的设备编号查询时回退为 Off。
#[derive(Debug, Clone, Default)]
pub struct StatusTable {
    entries: HashMap<MachineId, MachineStatus>,
}

impl StatusTable {
    /// 从原始字符串映射构建
    ///
    /// 无法解析的状态取值丢弃并告警（查询时回退为 Off）
    pub fn from_raw(raw: HashMap<String, String>) -> Self {
        let mut entries = HashMap::with_capacity(raw.len());
        for (machine_id, value) in raw {
            match MachineStatus::parse(&value) {
                Some(status) => {
                    entries.insert(machine_id, status);
                }
                None => {
                    tracing::warn!(
                        "状态表取值无法识别: machine_id={}, value={}, 将回退为 off",
                        machine_id,
                        value
                    );
                }
            }
        }
        Self { entries }
    }

    /// 写入一条状态（测试与内置数据使用）
    pub fn insert(&mut self, machine_id: &str, status: MachineStatus) {
        self.entries.insert(machine_id.to_string(), status);
    }

    /// 查询设备状态，缺失回退为 Off
    pub fn status_of(&self, machine_id: &str) -> MachineStatus {
        self.entries
            .get(machine_id)
            .copied()
            .unwrap_or(MachineStatus::Off)
    }

    /// 表中条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// 设备快照 (Machine Snapshot)
// ==========================================

/// 当前聚焦设备的快照
///
/// 展示编号为派生值（非存储值），同一输入必然产生同一快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// 展示编号，格式 `PLT1-{ZONE4}-MCH-{digits4}`
    pub display_id: String,
    /// 原始设备编号
    pub raw_id: MachineId,
    /// 设备状态
    pub status: MachineStatus,
    /// 所属区域名称
    pub zone_name: String,
}

// ==========================================
// 状态说明 (Status Info)
// ==========================================

/// 状态说明文案（本地化）
///
/// label/reason/action 取自 locales 下对应语言的 status.* 词条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub label: String,
    pub reason: String,
    pub action: String,
}

impl StatusInfo {
    /// 按状态取本地化说明
    pub fn for_status(status: MachineStatus) -> Self {
        let prefix = format!("status.{}", status.as_str());
        Self {
            label: i18n::t(&format!("{}.label", prefix)),
            reason: i18n::t(&format!("{}.reason", prefix)),
            action: i18n::t(&format!("{}.action", prefix)),
        }
    }
}

// ==========================================
// APQO 指标 (Availability / Performance / Quality / OEE)
// ==========================================

/// 展示用默认指标（区域未配置指标时使用）
pub const DEFAULT_AVAILABILITY: f64 = 92.0;
pub const DEFAULT_PERFORMANCE: f64 = 88.0;
pub const DEFAULT_QUALITY: f64 = 99.0;
pub const DEFAULT_OEE: f64 = 81.0;

/// APQO 展示指标
///
/// 展示用数值，本核心不做计算，取区域配置或默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApqoMetrics {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

impl ApqoMetrics {
    /// 从区域指标取值，缺失字段用默认值补齐
    pub fn from_zone(zone: &Zone) -> Self {
        Self {
            availability: zone.availability.unwrap_or(DEFAULT_AVAILABILITY),
            performance: zone.performance.unwrap_or(DEFAULT_PERFORMANCE),
            quality: zone.quality.unwrap_or(DEFAULT_QUALITY),
            oee: zone.oee.unwrap_or(DEFAULT_OEE),
        }
    }
}

// ==========================================
// 设备详情 (Machine Detail)
// ==========================================

/// 操作员点选设备后的详情视图数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDetail {
    pub snapshot: MachineSnapshot,
    pub info: StatusInfo,
    pub apqo: ApqoMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table_defaults_to_off() {
        let mut raw = HashMap::new();
        raw.insert("M1".to_string(), "running".to_string());
        raw.insert("M2".to_string(), "broken???".to_string());

        let table = StatusTable::from_raw(raw);
        assert_eq!(table.status_of("M1"), MachineStatus::Running);
        // 无法识别的取值与缺失条目一样回退为 off
        assert_eq!(table.status_of("M2"), MachineStatus::Off);
        assert_eq!(table.status_of("M999"), MachineStatus::Off);
    }

    #[test]
    fn test_apqo_from_zone_with_defaults() {
        let zone = Zone {
            id: "z1".to_string(),
            name: "Press Line".to_string(),
            machines: vec![],
            availability: Some(95.0),
            performance: None,
            quality: None,
            oee: None,
        };

        let apqo = ApqoMetrics::from_zone(&zone);
        assert_eq!(apqo.availability, 95.0);
        assert_eq!(apqo.performance, DEFAULT_PERFORMANCE);
        assert_eq!(apqo.quality, DEFAULT_QUALITY);
        assert_eq!(apqo.oee, DEFAULT_OEE);
    }
}
