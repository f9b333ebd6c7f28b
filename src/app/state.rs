// ==========================================
// 工厂设备监控大屏 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::DashboardApi;
use crate::config::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::domain::hierarchy::HierarchyRoot;
use crate::domain::machine::StatusTable;
use crate::engine::controller::DashboardController;
use crate::repository::{ActionLogRepository, LayoutRepository};

/// 应用状态
///
/// 包含API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 大屏API
    pub dashboard_api: Arc<DashboardApi>,

    /// 布局仓储
    pub layout_repo: Arc<LayoutRepository>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - hierarchy: 层级树（外部只读数据）
    /// - status_table: 设备状态表（外部只读数据）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接
    /// 2. 初始化所有Repository与ConfigManager
    /// 3. 创建大屏控制器与API实例
    pub fn new(
        db_path: String,
        hierarchy: HierarchyRoot,
        status_table: StatusTable,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================

        let layout_repo = Arc::new(
            LayoutRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建LayoutRepository: {}", e))?,
        );
        let action_log_repo = Arc::new(
            ActionLogRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ActionLogRepository: {}", e))?,
        );

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化引擎与API层
        // ==========================================

        let tick_interval = Duration::from_millis(config_manager.get_tick_interval_ms());
        tracing::info!("轮播间隔: {:?}", tick_interval);

        let controller = DashboardController::new(
            hierarchy,
            status_table,
            layout_repo.clone(),
            action_log_repo.clone(),
            tick_interval,
        );
        let dashboard_api = Arc::new(DashboardApi::new(controller));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            dashboard_api,
            layout_repo,
            action_log_repo,
            config_manager,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 开发环境: 用户数据目录/floor-monitor-dev/floor_monitor.db
/// - 生产环境: 用户数据目录/floor-monitor/floor_monitor.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("FLOOR_MONITOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖
    let mut path = PathBuf::from("./floor_monitor.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("floor-monitor-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("floor-monitor");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("floor_monitor.db");
    }

    path.to_string_lossy().to_string()
}
