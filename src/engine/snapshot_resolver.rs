// ==========================================
// 工厂设备监控大屏 - 设备快照解析引擎
// ==========================================
// 职责: 由原始设备编号 + 区域名 + 状态表派生聚焦设备快照
// 说明: 纯函数，无隐藏状态；同一输入必然产生同一快照
// ==========================================
// 展示编号派生规则:
// - 原始编号去掉非数字字符，左侧补零至 4 位
// - 区域名去空白、转大写、截取前 4 个字符
// - 组合为 "PLT1-{ZONE4}-MCH-{digits4}"
// ==========================================

use crate::domain::machine::{MachineSnapshot, StatusTable};

// ==========================================
// SnapshotResolver - 设备快照解析引擎
// ==========================================
pub struct SnapshotResolver;

impl SnapshotResolver {
    /// 创建新的设备快照解析引擎
    pub fn new() -> Self {
        Self
    }

    /// 解析设备快照
    ///
    /// # 参数
    /// - raw_id: 原始设备编号
    /// - zone_name: 所属区域名称
    /// - status_table: 设备状态表（缺失条目回退为 off）
    pub fn resolve(
        &self,
        raw_id: &str,
        zone_name: &str,
        status_table: &StatusTable,
    ) -> MachineSnapshot {
        MachineSnapshot {
            display_id: Self::derive_display_id(raw_id, zone_name),
            raw_id: raw_id.to_string(),
            status: status_table.status_of(raw_id),
            zone_name: zone_name.to_string(),
        }
    }

    /// 派生展示编号
    pub fn derive_display_id(raw_id: &str, zone_name: &str) -> String {
        let digits: String = raw_id.chars().filter(|c| c.is_ascii_digit()).collect();
        // 左侧补零至至少 4 位；超过 4 位的编号保留原样
        let digits = format!("{:0>4}", digits);

        let zone4: String = zone_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .take(4)
            .collect();

        format!("PLT1-{}-MCH-{}", zone4, digits)
    }
}

impl Default for SnapshotResolver {
    fn default() -> Self {
        Self::new()
    }
}
