// ==========================================
// 工厂设备监控大屏 - 轮播调度引擎
// ==========================================
// 职责: 维护 (区域序号, 设备序号) 轮播游标 + 单个未决定时任务
// 说明: 本引擎是唯一的时间驱动组件；除游标与一个未决 tick 令牌外
//       不持有其它状态
// ==========================================
// 状态机:
// - 区域集变空/变更 → 游标归 (0,0)，立即重算快照（不等下一个 tick）
// - 聚焦区域变更 → 设备序号归 0，立即重算快照
// - tick 到期（编辑模式关闭且当前区域有设备时）→ 设备序号 +1 取模
// - 编辑模式开启 → 不再排 tick，已排的 tick 作废，避免编辑途中触发
// - 设备数缩到游标之下 → 先归零再做任何计算，游标永不越界读取
// ==========================================

use crate::domain::hierarchy::Zone;
use std::time::Duration;

/// 默认轮播间隔（毫秒）
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1200;

// ==========================================
// 轮播游标 (Rotation Cursor)
// ==========================================

/// 轮播游标
///
/// 当区域集非空时恒满足:
/// `zone_index < zones.len()` 且 `machine_index < zones[zone_index].machines.len()`
/// （当前区域无设备时 machine_index 停在 0，不产生快照）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationCursor {
    pub zone_index: usize,
    pub machine_index: usize,
}

// ==========================================
// Tick 令牌 (Tick Token)
// ==========================================

/// 定时任务令牌
///
/// 每次排定 tick 发出一个唯一令牌；任何结构变更都会作废当前令牌，
/// 过期令牌触发的 tick 被整体拒绝（取消是一等操作，不是事后补救）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    seq: u64,
}

/// tick 处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 游标已推进，快照需要重算；next 为新排定的 tick 令牌
    Advanced {
        cursor: RotationCursor,
        next: Option<TickToken>,
    },
    /// 本轮无事可做（编辑中 / 区域集为空 / 当前区域无设备）
    Idle,
    /// 令牌已作废，忽略
    Stale,
}

// ==========================================
// RotationScheduler - 轮播调度引擎
// ==========================================
pub struct RotationScheduler {
    cursor: RotationCursor,
    interval: Duration,
    /// 令牌发号器，保证每个令牌唯一
    seq: u64,
    /// 当前未决的 tick 令牌（至多一个）
    armed: Option<TickToken>,
}

impl RotationScheduler {
    /// 创建新的轮播调度引擎
    pub fn new(interval: Duration) -> Self {
        Self {
            cursor: RotationCursor::default(),
            interval,
            seq: 0,
            armed: None,
        }
    }

    /// 以默认间隔创建
    pub fn with_default_interval() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_INTERVAL_MS))
    }

    /// 当前游标
    pub fn cursor(&self) -> RotationCursor {
        self.cursor
    }

    /// 轮播间隔
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 当前未决的 tick 令牌
    pub fn pending(&self) -> Option<TickToken> {
        self.armed
    }

    /// 取消未决的 tick（一等操作）
    ///
    /// 已发出的令牌随之作废
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// 区域集变更后的整体复位
    ///
    /// 游标归 (0,0)；编辑模式关闭且首个区域有设备时排定新 tick。
    /// 调用方必须随即重算快照，不等下一个 tick。
    pub fn reset(&mut self, zones: &[Zone], editing: bool) -> Option<TickToken> {
        self.cancel();
        self.cursor = RotationCursor::default();
        self.arm(zones, editing)
    }

    /// 聚焦区域变更
    ///
    /// 区域序号取界内值（越界退回 0），设备序号归 0，重新排定 tick。
    /// 调用方必须随即重算快照。
    pub fn focus_zone(&mut self, zone_index: usize, zones: &[Zone], editing: bool) -> Option<TickToken> {
        self.cancel();
        self.cursor.zone_index = if zone_index < zones.len() { zone_index } else { 0 };
        self.cursor.machine_index = 0;
        self.arm(zones, editing)
    }

    /// 编辑结束后恢复轮播
    ///
    /// 游标保持原位（先按当前区域集收敛），重新排定 tick
    pub fn resume(&mut self, zones: &[Zone], editing: bool) -> Option<TickToken> {
        self.cancel();
        self.resync(zones);
        self.arm(zones, editing)
    }

    /// 按当前区域集收敛游标（不复位、不排 tick）
    ///
    /// 区域序号或设备序号越界时退回 0
    pub fn resync(&mut self, zones: &[Zone]) {
        if self.cursor.zone_index >= zones.len() {
            self.cursor.zone_index = 0;
        }
        let machine_count = zones
            .get(self.cursor.zone_index)
            .map(|z| z.machines.len())
            .unwrap_or(0);
        if self.cursor.machine_index >= machine_count {
            self.cursor.machine_index = 0;
        }
    }

    /// 处理一次 tick 到期
    ///
    /// 过期令牌整体拒绝；有效令牌在编辑模式关闭且当前区域有设备时
    /// 推进设备序号（越界先归零，再取模推进），并排定下一个 tick
    pub fn handle_tick(&mut self, token: TickToken, zones: &[Zone], editing: bool) -> TickOutcome {
        if self.armed != Some(token) {
            tracing::trace!("tick 令牌已作废: seq={}", token.seq);
            return TickOutcome::Stale;
        }
        // 令牌一次性消费
        self.armed = None;

        if editing || zones.is_empty() {
            return TickOutcome::Idle;
        }

        if self.cursor.zone_index >= zones.len() {
            self.cursor = RotationCursor::default();
        }
        let machine_count = zones[self.cursor.zone_index].machines.len();
        if machine_count == 0 {
            self.cursor.machine_index = 0;
            return TickOutcome::Idle;
        }

        // 越界游标先归零，该归零即本轮推进结果（不跳过 0 号设备）
        if self.cursor.machine_index >= machine_count {
            self.cursor.machine_index = 0;
        } else {
            self.cursor.machine_index = (self.cursor.machine_index + 1) % machine_count;
        }

        let next = self.arm(zones, editing);
        TickOutcome::Advanced {
            cursor: self.cursor,
            next,
        }
    }

    /// 排定下一个 tick
    ///
    /// 仅当编辑模式关闭且当前区域有设备时才排定
    fn arm(&mut self, zones: &[Zone], editing: bool) -> Option<TickToken> {
        let has_machines = zones
            .get(self.cursor.zone_index)
            .map(|z| !z.machines.is_empty())
            .unwrap_or(false);

        if editing || !has_machines {
            self.armed = None;
            return None;
        }

        self.seq += 1;
        let token = TickToken { seq: self.seq };
        self.armed = Some(token);
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, machines: &[&str]) -> Zone {
        Zone {
            id: id.to_string(),
            name: format!("Zone {}", id),
            machines: machines.iter().map(|m| m.to_string()).collect(),
            availability: None,
            performance: None,
            quality: None,
            oee: None,
        }
    }

    fn cursor(zone_index: usize, machine_index: usize) -> RotationCursor {
        RotationCursor {
            zone_index,
            machine_index,
        }
    }

    #[test]
    fn test_tick_advances_and_wraps() {
        let zones = vec![zone("z1", &["M1", "M2"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        let token = scheduler.reset(&zones, false).expect("应排定 tick");
        assert_eq!(scheduler.cursor(), cursor(0, 0));

        // 第一个 tick: 0 -> 1
        let outcome = scheduler.handle_tick(token, &zones, false);
        let TickOutcome::Advanced { cursor: c, next } = outcome else {
            panic!("期望推进, 实际 {:?}", outcome);
        };
        assert_eq!(c, cursor(0, 1));

        // 第二个 tick: 1 -> 0 (回绕)
        let outcome = scheduler.handle_tick(next.unwrap(), &zones, false);
        let TickOutcome::Advanced { cursor: c, .. } = outcome else {
            panic!("期望推进, 实际 {:?}", outcome);
        };
        assert_eq!(c, cursor(0, 0));
    }

    #[test]
    fn test_stale_token_rejected() {
        let zones = vec![zone("z1", &["M1", "M2"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        let old = scheduler.reset(&zones, false).unwrap();
        // 结构变更复位后，旧令牌作废
        let fresh = scheduler.reset(&zones, false).unwrap();

        assert_eq!(scheduler.handle_tick(old, &zones, false), TickOutcome::Stale);
        // 游标未被过期 tick 推进
        assert_eq!(scheduler.cursor(), cursor(0, 0));

        // 新令牌正常推进
        assert!(matches!(
            scheduler.handle_tick(fresh, &zones, false),
            TickOutcome::Advanced { .. }
        ));
    }

    #[test]
    fn test_cancel_invalidates_pending() {
        let zones = vec![zone("z1", &["M1", "M2"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        let token = scheduler.reset(&zones, false).unwrap();
        scheduler.cancel();
        assert!(scheduler.pending().is_none());
        assert_eq!(scheduler.handle_tick(token, &zones, false), TickOutcome::Stale);
    }

    #[test]
    fn test_token_not_reusable_after_consumption() {
        let zones = vec![zone("z1", &["M1", "M2", "M3"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        let token = scheduler.reset(&zones, false).unwrap();
        assert!(matches!(
            scheduler.handle_tick(token, &zones, false),
            TickOutcome::Advanced { .. }
        ));
        // 同一令牌重复投递被拒绝
        assert_eq!(scheduler.handle_tick(token, &zones, false), TickOutcome::Stale);
    }

    #[test]
    fn test_editing_blocks_scheduling() {
        let zones = vec![zone("z1", &["M1", "M2"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        // 编辑模式下不排 tick
        assert!(scheduler.reset(&zones, true).is_none());
        assert!(scheduler.pending().is_none());

        // 编辑结束后恢复轮播，游标保持原位
        let token = scheduler.resume(&zones, false).unwrap();
        assert_eq!(scheduler.cursor(), cursor(0, 0));
        assert!(matches!(
            scheduler.handle_tick(token, &zones, false),
            TickOutcome::Advanced { .. }
        ));
    }

    #[test]
    fn test_no_tick_for_empty_or_machineless_zones() {
        let mut scheduler = RotationScheduler::with_default_interval();

        assert!(scheduler.reset(&[], false).is_none());

        let zones = vec![zone("z1", &[])];
        assert!(scheduler.reset(&zones, false).is_none());
    }

    #[test]
    fn test_focus_zone_resets_machine_index() {
        let zones = vec![zone("z1", &["M1", "M2"]), zone("z2", &["M3", "M4", "M5"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        let token = scheduler.reset(&zones, false).unwrap();
        scheduler.handle_tick(token, &zones, false);
        assert_eq!(scheduler.cursor(), cursor(0, 1));

        scheduler.focus_zone(1, &zones, false);
        assert_eq!(scheduler.cursor(), cursor(1, 0));

        // 越界的区域序号退回 0
        scheduler.focus_zone(9, &zones, false);
        assert_eq!(scheduler.cursor(), cursor(0, 0));
    }

    #[test]
    fn test_shrunk_machine_count_clamps_before_advance() {
        let zones = vec![zone("z1", &["M1", "M2", "M3"])];
        let mut scheduler = RotationScheduler::with_default_interval();

        let token = scheduler.reset(&zones, false).unwrap();
        let TickOutcome::Advanced { next, .. } = scheduler.handle_tick(token, &zones, false) else {
            panic!("期望推进");
        };
        let TickOutcome::Advanced { next, .. } =
            scheduler.handle_tick(next.unwrap(), &zones, false)
        else {
            panic!("期望推进");
        };
        assert_eq!(scheduler.cursor(), cursor(0, 2));

        // 设备数缩水到游标之下: 下一个 tick 先归零，不越界读取
        let shrunk = vec![zone("z1", &["M1"])];
        let outcome = scheduler.handle_tick(next.unwrap(), &shrunk, false);
        let TickOutcome::Advanced { cursor: c, .. } = outcome else {
            panic!("期望推进, 实际 {:?}", outcome);
        };
        assert_eq!(c, cursor(0, 0));
    }

    #[test]
    fn test_resync_clamps_cursor() {
        let zones = vec![zone("z1", &["M1", "M2", "M3"])];
        let mut scheduler = RotationScheduler::with_default_interval();
        let token = scheduler.reset(&zones, false).unwrap();
        scheduler.handle_tick(token, &zones, false);
        assert_eq!(scheduler.cursor(), cursor(0, 1));

        // 置换不改形状: 游标原位
        scheduler.resync(&zones);
        assert_eq!(scheduler.cursor(), cursor(0, 1));

        // 形状缩水: 游标收敛到界内
        let shrunk = vec![zone("z1", &["M1"])];
        scheduler.resync(&shrunk);
        assert_eq!(scheduler.cursor(), cursor(0, 0));
    }
}
