// ==========================================
// 工厂设备监控大屏 - 大屏 API
// ==========================================
// 职责: 包装大屏控制器，提供带校验的操作员入口与状态查询
// 说明: 三个级联下拉、编辑开关、重置、拖放与控制器入口一一对应
// 架构: API 层 → 控制器（归约函数）→ 引擎/仓储
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::hierarchy::Zone;
use crate::domain::machine::{MachineDetail, MachineSnapshot};
use crate::domain::selection::Selection;
use crate::engine::controller::{DashboardController, DashboardEvent};
use crate::engine::rotation::{RotationCursor, TickToken};
use crate::i18n;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

// ==========================================
// DashboardApi - 大屏 API
// ==========================================

/// 大屏API
///
/// 职责：
/// 1. 操作员控件入口（含输入校验与能力把关提示）
/// 2. 大屏状态查询（展示层轮询/订阅用）
/// 3. 状态变更通知（轮播驱动器据此重排定时）
pub struct DashboardApi {
    /// 大屏控制器（单线程归约，锁仅用于跨任务共享）
    controller: Mutex<DashboardController>,
    /// 状态变更通知（唤醒轮播驱动器重新评估定时）
    changed: Notify,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(controller: DashboardController) -> Self {
        Self {
            controller: Mutex::new(controller),
            changed: Notify::new(),
        }
    }

    fn with_controller<T>(
        &self,
        f: impl FnOnce(&mut DashboardController) -> T,
    ) -> ApiResult<T> {
        let mut guard = self
            .controller
            .lock()
            .map_err(|e| ApiError::InternalError(format!("控制器锁获取失败: {}", e)))?;
        Ok(f(&mut guard))
    }

    /// 处理事件并唤醒驱动器
    fn dispatch(&self, event: DashboardEvent) -> ApiResult<()> {
        self.with_controller(|c| c.dispatch(event))?;
        self.changed.notify_one();
        Ok(())
    }

    // ==========================================
    // 操作员控件入口
    // ==========================================

    /// 工厂下拉变更（空字符串清空选择）
    pub fn select_factory(&self, factory_id: &str) -> ApiResult<()> {
        self.dispatch(DashboardEvent::FactorySelected(factory_id.to_string()))
    }

    /// 分厂下拉变更
    pub fn select_plant(&self, plant_id: &str) -> ApiResult<()> {
        self.dispatch(DashboardEvent::PlantSelected(plant_id.to_string()))
    }

    /// 部门下拉变更
    pub fn select_department(&self, department_id: &str) -> ApiResult<()> {
        self.dispatch(DashboardEvent::DepartmentSelected(department_id.to_string()))
    }

    /// 聚焦区域变更
    pub fn focus_zone(&self, zone_index: usize) -> ApiResult<()> {
        self.dispatch(DashboardEvent::ZoneFocused(zone_index))
    }

    /// 设备点选（None 表示关闭详情）
    pub fn machine_clicked(&self, machine_id: Option<&str>) -> ApiResult<()> {
        self.dispatch(DashboardEvent::MachineClicked(
            machine_id.map(|m| m.to_string()),
        ))
    }

    /// 编辑模式开关
    ///
    /// # 返回
    /// - Ok(bool): 切换后的编辑模式
    /// - Err(ApiError::InvalidInput): 未选择部门
    pub fn toggle_edit_mode(&self) -> ApiResult<bool> {
        let mode = self.with_controller(|c| {
            if !c.selection().is_complete() {
                return None;
            }
            c.dispatch(DashboardEvent::EditToggled);
            Some(c.edit_mode())
        })?;

        match mode {
            Some(mode) => {
                self.changed.notify_one();
                Ok(mode)
            }
            None => Err(ApiError::InvalidInput(i18n::t("common.no_department"))),
        }
    }

    /// 拖放重排
    ///
    /// 无效拖放目标按无事发生处理（Ok 返回）；编辑模式未开启视为调用方错误
    pub fn reorder_machines(&self, zone_id: &str, from_id: &str, to_id: &str) -> ApiResult<()> {
        if zone_id.trim().is_empty() || from_id.trim().is_empty() || to_id.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "区域ID与设备编号不能为空".to_string(),
            ));
        }
        let editing = self.with_controller(|c| c.edit_mode())?;
        if !editing {
            return Err(ApiError::InvalidInput(
                "编辑模式未开启，不能重排布局".to_string(),
            ));
        }

        self.dispatch(DashboardEvent::ReorderIntent {
            zone_id: zone_id.to_string(),
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
        })
    }

    /// 布局重置
    pub fn reset_layout(&self) -> ApiResult<()> {
        let complete = self.with_controller(|c| c.selection().is_complete())?;
        if !complete {
            return Err(ApiError::InvalidInput(i18n::t("common.no_department")));
        }
        self.dispatch(DashboardEvent::ResetLayout)
    }

    /// 轮播定时到期（轮播驱动器专用入口）
    pub fn tick(&self, token: TickToken) -> ApiResult<()> {
        self.with_controller(|c| c.dispatch(DashboardEvent::Tick(token)))
    }

    // ==========================================
    // 状态查询
    // ==========================================

    pub fn selection(&self) -> ApiResult<Selection> {
        self.with_controller(|c| c.selection().clone())
    }

    pub fn zones(&self) -> ApiResult<Vec<Zone>> {
        self.with_controller(|c| c.zones().to_vec())
    }

    pub fn edit_mode(&self) -> ApiResult<bool> {
        self.with_controller(|c| c.edit_mode())
    }

    pub fn cursor(&self) -> ApiResult<RotationCursor> {
        self.with_controller(|c| c.cursor())
    }

    /// 当前聚焦设备快照
    pub fn snapshot(&self) -> ApiResult<Option<MachineSnapshot>> {
        self.with_controller(|c| c.snapshot().cloned())
    }

    /// 操作员点选的设备详情
    pub fn selected_machine(&self) -> ApiResult<Option<MachineDetail>> {
        self.with_controller(|c| c.selected_machine().cloned())
    }

    /// 未决的 tick 令牌与轮播间隔
    pub fn pending_tick(&self) -> ApiResult<Option<(TickToken, Duration)>> {
        self.with_controller(|c| c.pending_tick())
    }

    /// 等待下一次状态变更（轮播驱动器据此重排定时）
    pub async fn changed(&self) {
        self.changed.notified().await;
    }
}
