// ==========================================
// 工厂设备监控大屏 - 大屏控制器
// ==========================================
// 职责: 持有选择状态、区域集、编辑标志、轮播游标与当前快照，
//       以单一归约函数串联各引擎
// 说明: 封闭事件集 + 单线程执行，结构变更与游标重同步的先后顺序
//       由归约函数本身保证，不依赖外部效果调度
// 说明: 定时由应用层驱动；控制器只发放/回收 tick 令牌，自身不起定时器
// ==========================================

use crate::domain::action_log::LayoutAction;
use crate::domain::hierarchy::{HierarchyRoot, Zone};
use crate::domain::machine::{ApqoMetrics, MachineDetail, MachineSnapshot, StatusInfo, StatusTable};
use crate::domain::selection::Selection;
use crate::domain::types::{LayoutActionType, MachineId};
use crate::engine::hierarchy_resolver::HierarchyResolver;
use crate::engine::reorder::ReorderEngine;
use crate::engine::rotation::{RotationCursor, RotationScheduler, TickOutcome, TickToken};
use crate::engine::snapshot_resolver::SnapshotResolver;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::layout_repo::LayoutRepository;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// 默认操作员标识（审计用）
const DEFAULT_ACTOR: &str = "operator";

// ==========================================
// 大屏事件 (Dashboard Event)
// ==========================================

/// 大屏事件
///
/// 操作员控件与定时驱动的全部输入，一个事件对应归约函数的一个分支
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// 工厂下拉变更（空字符串表示清空选择）
    FactorySelected(String),
    /// 分厂下拉变更
    PlantSelected(String),
    /// 部门下拉变更
    DepartmentSelected(String),
    /// 聚焦区域变更（操作员/外部导航）
    ZoneFocused(usize),
    /// 设备点选（None 表示关闭详情）
    MachineClicked(Option<MachineId>),
    /// 编辑模式开关
    EditToggled,
    /// 拖放重排意图
    ReorderIntent {
        zone_id: String,
        from_id: String,
        to_id: String,
    },
    /// 布局重置
    ResetLayout,
    /// 轮播定时到期
    Tick(TickToken),
}

// ==========================================
// DashboardController - 大屏控制器
// ==========================================
pub struct DashboardController {
    // 外部只读数据
    hierarchy: HierarchyRoot,
    status_table: StatusTable,

    // 仓储
    layout_repo: Arc<LayoutRepository>,
    action_log_repo: Arc<ActionLogRepository>,

    // 引擎
    resolver: HierarchyResolver,
    snapshot_resolver: SnapshotResolver,
    reorder_engine: ReorderEngine,
    scheduler: RotationScheduler,

    // 大屏状态
    selection: Selection,
    zones: Vec<Zone>,
    edit_mode: bool,
    snapshot: Option<MachineSnapshot>,
    selected_machine: Option<MachineDetail>,

    // 审计
    actor: String,
}

impl DashboardController {
    /// 创建大屏控制器
    ///
    /// 初始选择取层级树的首个 工厂/分厂/部门，随即完成首次布局加载
    pub fn new(
        hierarchy: HierarchyRoot,
        status_table: StatusTable,
        layout_repo: Arc<LayoutRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        tick_interval: Duration,
    ) -> Self {
        let resolver = HierarchyResolver::new();
        let selection = resolver.default_selection(&hierarchy);
        tracing::info!(
            "大屏控制器初始化: factory={}, plant={}, department={}",
            selection.factory_id,
            selection.plant_id,
            selection.department_id
        );

        let mut controller = Self {
            hierarchy,
            status_table,
            layout_repo,
            action_log_repo,
            resolver,
            snapshot_resolver: SnapshotResolver::new(),
            reorder_engine: ReorderEngine::new(),
            scheduler: RotationScheduler::new(tick_interval),
            selection,
            zones: Vec::new(),
            edit_mode: false,
            snapshot: None,
            selected_machine: None,
            actor: DEFAULT_ACTOR.to_string(),
        };
        controller.reload_zones();
        controller
    }

    // ==========================================
    // 状态读取
    // ==========================================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn cursor(&self) -> RotationCursor {
        self.scheduler.cursor()
    }

    /// 当前聚焦设备快照（区域集为空时无快照）
    pub fn snapshot(&self) -> Option<&MachineSnapshot> {
        self.snapshot.as_ref()
    }

    /// 操作员点选的设备详情
    pub fn selected_machine(&self) -> Option<&MachineDetail> {
        self.selected_machine.as_ref()
    }

    /// 未决的 tick 令牌与轮播间隔（应用层据此安排唯一定时任务）
    pub fn pending_tick(&self) -> Option<(TickToken, Duration)> {
        self.scheduler
            .pending()
            .map(|token| (token, self.scheduler.interval()))
    }

    // ==========================================
    // 归约函数
    // ==========================================

    /// 处理一个大屏事件
    pub fn dispatch(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::FactorySelected(factory_id) => {
                let next = self
                    .resolver
                    .cascade_factory_changed(&self.hierarchy, &factory_id);
                self.apply_selection(next);
            }

            DashboardEvent::PlantSelected(plant_id) => {
                let next =
                    self.resolver
                        .cascade_plant_changed(&self.hierarchy, &self.selection, &plant_id);
                self.apply_selection(next);
            }

            DashboardEvent::DepartmentSelected(department_id) => {
                let next = self
                    .resolver
                    .cascade_department_changed(&self.selection, &department_id);
                self.apply_selection(next);
            }

            DashboardEvent::ZoneFocused(zone_index) => {
                if self.zones.is_empty() {
                    return;
                }
                self.scheduler
                    .focus_zone(zone_index, &self.zones, self.edit_mode);
                self.recompute_snapshot();
            }

            DashboardEvent::MachineClicked(None) => {
                self.selected_machine = None;
            }

            DashboardEvent::MachineClicked(Some(machine_id)) => {
                // 编辑模式下点击用于拖动，不弹详情
                if self.edit_mode {
                    return;
                }
                let detail = self
                    .zones
                    .iter()
                    .find(|z| z.machines.iter().any(|m| *m == machine_id))
                    .map(|zone| MachineDetail {
                        snapshot: self.snapshot_resolver.resolve(
                            &machine_id,
                            &zone.name,
                            &self.status_table,
                        ),
                        info: StatusInfo::for_status(self.status_table.status_of(&machine_id)),
                        apqo: ApqoMetrics::from_zone(zone),
                    });
                if detail.is_none() {
                    tracing::debug!("点选设备不在当前布局内: machine_id={}", machine_id);
                }
                self.selected_machine = detail;
            }

            DashboardEvent::EditToggled => {
                if self.selection.layout_key().is_none() {
                    tracing::debug!("忽略编辑切换: 未选择部门");
                    return;
                }
                if self.edit_mode {
                    self.edit_mode = false;
                    self.record_action(LayoutActionType::EditExited, None);
                    // 恢复轮播: 游标先按当前区域集收敛再排定 tick
                    self.scheduler.resume(&self.zones, false);
                    self.recompute_snapshot();
                } else {
                    self.edit_mode = true;
                    // 已排定的 tick 立即作废，不得在编辑途中触发
                    self.scheduler.cancel();
                    self.selected_machine = None;
                    self.record_action(LayoutActionType::EditEntered, None);
                }
            }

            DashboardEvent::ReorderIntent {
                zone_id,
                from_id,
                to_id,
            } => {
                // 重排能力由控制器把关: 仅编辑模式可用
                if !self.edit_mode {
                    tracing::debug!("忽略重排: 编辑模式未开启");
                    return;
                }
                let Some(key) = self.selection.layout_key() else {
                    return;
                };

                let next = self
                    .reorder_engine
                    .reorder(&self.zones, &zone_id, &from_id, &to_id);
                if next == self.zones {
                    // 无效拖放按无事发生处理
                    return;
                }
                self.zones = next;

                // 编辑模式下的变更立即整体落库
                if let Err(e) = self.layout_repo.save(&key, &self.zones) {
                    tracing::warn!(
                        "布局保存失败（状态按内存继续）: key={}, error={}",
                        key,
                        e
                    );
                }
                self.record_action(
                    LayoutActionType::LayoutSaved,
                    Some(
                        json!({
                            "zone_id": zone_id,
                            "from": from_id,
                            "to": to_id,
                        })
                        .to_string(),
                    ),
                );

                // 重排是置换不改形状，游标仍按当前区域集收敛一次
                self.scheduler.resync(&self.zones);
                self.recompute_snapshot();
            }

            DashboardEvent::ResetLayout => {
                let Some(key) = self.selection.layout_key() else {
                    tracing::debug!("忽略重置: 未选择部门");
                    return;
                };
                let default_zones = {
                    let resolved = self.resolver.resolve(&self.hierarchy, &self.selection);
                    resolved.department.map(|d| d.zones.clone())
                };
                let Some(default_zones) = default_zones else {
                    return;
                };

                if let Err(e) = self.layout_repo.remove(&key) {
                    tracing::warn!("布局删除失败: key={}, error={}", key, e);
                }
                self.zones = default_zones;
                self.edit_mode = false;
                self.selected_machine = None;
                self.record_action(LayoutActionType::LayoutReset, None);
                self.scheduler.reset(&self.zones, false);
                self.recompute_snapshot();
                tracing::info!("布局已重置为部门默认顺序: key={}", key);
            }

            DashboardEvent::Tick(token) => {
                match self.scheduler.handle_tick(token, &self.zones, self.edit_mode) {
                    TickOutcome::Advanced { .. } => self.recompute_snapshot(),
                    TickOutcome::Idle | TickOutcome::Stale => {}
                }
            }
        }
    }

    // ==========================================
    // 内部步骤
    // ==========================================

    /// 落地新的选择并重新装载区域集
    fn apply_selection(&mut self, next: Selection) {
        if next == self.selection {
            return;
        }
        // 切换选择即结束当前编辑会话（审计记在旧布局键名下）
        if self.edit_mode {
            self.edit_mode = false;
            self.record_action(LayoutActionType::EditExited, None);
        }
        tracing::info!(
            "选择变更: factory={}, plant={}, department={}",
            next.factory_id,
            next.plant_id,
            next.department_id
        );
        self.selection = next;
        self.reload_zones();
    }

    /// 按当前选择装载区域集: 有存档取存档，否则取部门默认
    ///
    /// 装载完成后游标复位并立即重算快照（不等下一个 tick）
    fn reload_zones(&mut self) {
        // 结构变更期间先作废未决 tick
        self.scheduler.cancel();
        self.selected_machine = None;

        let default_zones = {
            let resolved = self.resolver.resolve(&self.hierarchy, &self.selection);
            resolved.department.map(|d| d.zones.clone())
        };

        let Some(default_zones) = default_zones else {
            // 未选择部门: 大屏显示为空，不产生快照
            self.zones.clear();
            self.snapshot = None;
            return;
        };

        let zones = match self.selection.layout_key() {
            Some(key) => match self.layout_repo.load(&key) {
                Ok(Some(saved)) => saved,
                Ok(None) => default_zones,
                Err(e) => {
                    tracing::warn!("布局读取失败，回退默认布局: key={}, error={}", key, e);
                    default_zones
                }
            },
            None => default_zones,
        };

        self.zones = zones;
        self.scheduler.reset(&self.zones, self.edit_mode);
        self.recompute_snapshot();
    }

    /// 按游标重算聚焦设备快照
    fn recompute_snapshot(&mut self) {
        let cursor = self.scheduler.cursor();
        let next = self.zones.get(cursor.zone_index).and_then(|zone| {
            zone.machines.get(cursor.machine_index).map(|machine_id| {
                self.snapshot_resolver
                    .resolve(machine_id, &zone.name, &self.status_table)
            })
        });
        self.snapshot = next;
    }

    /// 写入操作日志（尽力而为，失败不影响大屏状态）
    fn record_action(&self, action_type: LayoutActionType, detail: Option<String>) {
        let Some(key) = self.selection.layout_key() else {
            return;
        };
        let action = LayoutAction::new(action_type, key.as_str(), &self.actor, detail);
        if let Err(e) = self.action_log_repo.insert(&action) {
            tracing::warn!("操作日志写入失败: action_type={}, error={}", action_type, e);
        }
    }
}
