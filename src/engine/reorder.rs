// ==========================================
// 工厂设备监控大屏 - 区域内重排引擎
// ==========================================
// 职责: 校验并提交拖放意图，在单个区域内移动一台设备
// 说明: 标准列表移动语义（摘出一项插入目标位，中间元素顺移一位），
//       重排是置换而非增删，设备集合不变
// 说明: 是否处于编辑模式由大屏控制器把关，本引擎不做判断
// ==========================================

use crate::domain::hierarchy::Zone;

// ==========================================
// ReorderEngine - 区域内重排引擎
// ==========================================
pub struct ReorderEngine;

impl ReorderEngine {
    /// 创建新的重排引擎
    pub fn new() -> Self {
        Self
    }

    /// 提交一次拖放重排
    ///
    /// # 参数
    /// - zones: 当前区域序列
    /// - zone_id: 目标区域ID
    /// - from_id: 被拖动的设备编号
    /// - to_id: 落点位置上的设备编号
    ///
    /// # 返回
    /// 新的区域序列；前置条件不满足（区域不存在、任一设备不在该区域、
    /// 两者相同）时原样返回输入，不视为错误
    pub fn reorder(
        &self,
        zones: &[Zone],
        zone_id: &str,
        from_id: &str,
        to_id: &str,
    ) -> Vec<Zone> {
        let Some(zone_pos) = zones.iter().position(|z| z.id == zone_id) else {
            tracing::debug!("重排忽略: 区域不存在 zone_id={}", zone_id);
            return zones.to_vec();
        };

        let machines = &zones[zone_pos].machines;
        let from_index = machines.iter().position(|m| m == from_id);
        let to_index = machines.iter().position(|m| m == to_id);

        let (Some(from_index), Some(to_index)) = (from_index, to_index) else {
            tracing::debug!(
                "重排忽略: 设备不在区域内 zone_id={}, from={}, to={}",
                zone_id,
                from_id,
                to_id
            );
            return zones.to_vec();
        };

        if from_index == to_index {
            return zones.to_vec();
        }

        let mut next = zones.to_vec();
        let moved = next[zone_pos].machines.remove(from_index);
        next[zone_pos].machines.insert(to_index, moved);

        tracing::debug!(
            "重排提交: zone_id={}, {}({}) -> {}({})",
            zone_id,
            from_id,
            from_index,
            to_id,
            to_index
        );
        next
    }
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new()
    }
}
