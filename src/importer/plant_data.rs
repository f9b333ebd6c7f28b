// ==========================================
// 工厂设备监控大屏 - 工厂数据导入器
// ==========================================
// 职责: 从 JSON 数据文件装载层级树与设备状态表
// 说明: 数据文件缺失/非法是启动期硬错误；装载后仅做告警级校验
// ==========================================

use crate::domain::hierarchy::HierarchyRoot;
use crate::domain::machine::StatusTable;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

// ==========================================
// PlantDataImporter - 工厂数据导入器
// ==========================================
pub struct PlantDataImporter;

impl PlantDataImporter {
    /// 装载层级树
    ///
    /// # 参数
    /// - path: 层级数据 JSON 文件路径
    pub fn load_hierarchy(path: &Path) -> Result<HierarchyRoot> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("无法读取层级数据文件: {}", path.display()))?;
        let root: HierarchyRoot = serde_json::from_str(&raw)
            .with_context(|| format!("层级数据文件解析失败: {}", path.display()))?;

        Self::validate_hierarchy(&root);

        tracing::info!(
            "层级数据装载完成: factories={}, file={}",
            root.factories.len(),
            path.display()
        );
        Ok(root)
    }

    /// 装载设备状态表
    ///
    /// # 参数
    /// - path: 状态表 JSON 文件路径（设备编号 → 状态字符串）
    pub fn load_status_table(path: &Path) -> Result<StatusTable> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("无法读取状态表文件: {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("状态表文件解析失败: {}", path.display()))?;

        let table = StatusTable::from_raw(entries);
        tracing::info!(
            "状态表装载完成: entries={}, file={}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// 告警级数据校验
    ///
    /// 设备编号应在所属区域内唯一；重复不阻断启动，仅告警
    fn validate_hierarchy(root: &HierarchyRoot) {
        for factory in &root.factories {
            for plant in &factory.plants {
                for department in &plant.departments {
                    for zone in &department.zones {
                        let mut seen = HashSet::new();
                        for machine_id in &zone.machines {
                            if !seen.insert(machine_id) {
                                tracing::warn!(
                                    "区域内设备编号重复: zone_id={}, machine_id={}",
                                    zone.id,
                                    machine_id
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
