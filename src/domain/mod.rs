// ==========================================
// 工厂设备监控大屏 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod hierarchy;
pub mod machine;
pub mod selection;
pub mod types;

// 重导出核心类型
pub use action_log::LayoutAction;
pub use hierarchy::{Department, Factory, HierarchyRoot, Plant, Zone};
pub use machine::{ApqoMetrics, MachineDetail, MachineSnapshot, StatusInfo, StatusTable};
pub use selection::{LayoutKey, Selection};
pub use types::{LayoutActionType, MachineId, MachineStatus};
