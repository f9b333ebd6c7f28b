// ==========================================
// 工厂设备监控大屏 - 应用层
// ==========================================
// 职责: 组装仓储/引擎/API + 轮播定时驱动
// ==========================================

pub mod driver;
pub mod state;

// 重导出核心类型
pub use driver::run_rotation_loop;
pub use state::{get_default_db_path, AppState};
