// ==========================================
// 工厂设备监控大屏 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 说明: 展示层为外部协作方；本进程装载数据、组装状态引擎并
//       运行轮播驱动器，直至收到 Ctrl-C
// ==========================================

use std::path::Path;

use anyhow::Context;
use floor_monitor::app::{get_default_db_path, run_rotation_loop, AppState};
use floor_monitor::importer::PlantDataImporter;
use tokio::sync::oneshot;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    floor_monitor::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", floor_monitor::APP_NAME);
    tracing::info!("系统版本: {}", floor_monitor::VERSION);
    tracing::info!("==================================================");

    // 装载外部只读数据
    let data_dir =
        std::env::var("FLOOR_MONITOR_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
    let data_dir = Path::new(&data_dir);
    let hierarchy = PlantDataImporter::load_hierarchy(&data_dir.join("machine_details.json"))?;
    let status_table =
        PlantDataImporter::load_status_table(&data_dir.join("machine_status.json"))?;

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    let app_state = AppState::new(db_path, hierarchy, status_table)
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    let api = app_state.dashboard_api.clone();
    if let Ok(selection) = api.selection() {
        tracing::info!(
            "默认选择: factory={}, plant={}, department={}",
            selection.factory_id,
            selection.plant_id,
            selection.department_id
        );
    }
    if let Ok(Some(snapshot)) = api.snapshot() {
        tracing::info!("初始聚焦: {} ({})", snapshot.display_id, snapshot.status);
    }

    // 启动轮播驱动器
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let driver = tokio::spawn(run_rotation_loop(api, shutdown_rx));

    // 等待退出信号
    tokio::signal::ctrl_c().await.context("等待退出信号失败")?;
    tracing::info!("收到退出信号，正在关闭...");

    let _ = shutdown_tx.send(());
    let _ = driver.await;

    tracing::info!("已退出");
    Ok(())
}
