// ==========================================
// 工厂设备监控大屏 - 轮播驱动器
// ==========================================
// 职责: 大屏唯一的定时任务所有者，按控制器发放的 tick 令牌安排定时
// 说明: 单线程协作模型；操作员事件随时作废旧令牌，过期定时触发
//       会被控制器整体拒绝，不存在针对已替换数据集的遗留定时
// 说明: 驱动器退出（shutdown 或 future 被丢弃）即回收未决定时
// ==========================================

use crate::api::DashboardApi;
use std::sync::Arc;
use tokio::sync::oneshot;

/// 轮播定时循环
///
/// # 参数
/// - api: 大屏API
/// - shutdown: 关闭信号
///
/// # 行为
/// - 控制器有未决 tick 令牌时: 睡到间隔到期后投递该令牌；
///   途中任何状态变更都会唤醒本循环重新评估定时
/// - 无未决令牌时（编辑中/无部门/区域无设备）: 只等状态变更
pub async fn run_rotation_loop(api: Arc<DashboardApi>, mut shutdown: oneshot::Receiver<()>) {
    tracing::info!("轮播驱动器启动");

    loop {
        let pending = match api.pending_tick() {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!("读取未决 tick 失败，驱动器退出: {}", e);
                break;
            }
        };

        match pending {
            Some((token, interval)) => {
                tokio::select! {
                    _ = &mut shutdown => break,
                    // 状态变更: 重新评估定时（旧令牌若已作废会被控制器拒绝）
                    _ = api.changed() => {}
                    _ = tokio::time::sleep(interval) => {
                        if let Err(e) = api.tick(token) {
                            tracing::warn!("tick 处理失败: {}", e);
                        }
                        if let Ok(Some(snapshot)) = api.snapshot() {
                            tracing::debug!(
                                "轮播聚焦: {} ({})",
                                snapshot.display_id,
                                snapshot.status
                            );
                        }
                    }
                }
            }
            None => {
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = api.changed() => {}
                }
            }
        }
    }

    tracing::info!("轮播驱动器退出");
}
