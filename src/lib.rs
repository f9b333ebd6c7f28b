// ==========================================
// 工厂设备监控大屏 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 车间布局与设备状态轮播引擎 (展示层为外部协作方)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 操作员入口
pub mod api;

// 应用层 - 组装与轮播驱动
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LayoutActionType, MachineStatus};

// 领域实体
pub use domain::{
    ApqoMetrics, Department, Factory, HierarchyRoot, LayoutAction, LayoutKey, MachineDetail,
    MachineId, MachineSnapshot, Plant, Selection, StatusInfo, StatusTable, Zone,
};

// 引擎
pub use engine::{
    DashboardController, DashboardEvent, HierarchyResolver, ReorderEngine, RotationCursor,
    RotationScheduler, SnapshotResolver, TickOutcome, TickToken,
};

// API
pub use api::DashboardApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工厂设备监控大屏";

// ==========================================
// 预编译检查
// ==========================================
