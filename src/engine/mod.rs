// ==========================================
// 工厂设备监控大屏 - 引擎层
// ==========================================
// 职责: 实现布局与轮播业务规则,不拼 SQL
// 红线: Engine 不拼 SQL
// ==========================================

pub mod controller;
pub mod hierarchy_resolver;
pub mod reorder;
pub mod rotation;
pub mod snapshot_resolver;

// 重导出核心引擎
pub use controller::{DashboardController, DashboardEvent};
pub use hierarchy_resolver::{HierarchyResolver, Resolved};
pub use reorder::ReorderEngine;
pub use rotation::{
    RotationCursor, RotationScheduler, TickOutcome, TickToken, DEFAULT_TICK_INTERVAL_MS,
};
pub use snapshot_resolver::SnapshotResolver;
