// ==========================================
// 工厂设备监控大屏 - 选择状态与布局键
// ==========================================
// 职责: 三级下拉选择状态 + 布局存储键派生
// 说明: 空字符串表示该级未选定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 选择状态 (Selection)
// ==========================================

/// 三级选择状态
///
/// 各字段为层级树中的节点ID，空字符串表示未选定。
/// 部门级只有在工厂、分厂均已选定且一致时才有意义（由层级解析器保证）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub factory_id: String,
    pub plant_id: String,
    pub department_id: String,
}

impl Selection {
    /// 创建完整选择
    pub fn new(factory_id: &str, plant_id: &str, department_id: &str) -> Self {
        Self {
            factory_id: factory_id.to_string(),
            plant_id: plant_id.to_string(),
            department_id: department_id.to_string(),
        }
    }

    /// 三级是否均已选定
    pub fn is_complete(&self) -> bool {
        !self.factory_id.is_empty() && !self.plant_id.is_empty() && !self.department_id.is_empty()
    }

    /// 派生布局存储键
    ///
    /// 仅当三级均已选定时才有定义
    pub fn layout_key(&self) -> Option<LayoutKey> {
        if self.is_complete() {
            Some(LayoutKey::new(
                &self.factory_id,
                &self.plant_id,
                &self.department_id,
            ))
        } else {
            None
        }
    }
}

// ==========================================
// 布局键 (Layout Key)
// ==========================================

/// 布局存储键
///
/// 格式: `layout-{factoryId}-{plantId}-{departmentId}`，
/// 唯一对应一个 工厂+分厂+部门 组合
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutKey(String);

impl LayoutKey {
    /// 由三级ID组合生成
    pub fn new(factory_id: &str, plant_id: &str, department_id: &str) -> Self {
        Self(format!("layout-{}-{}-{}", factory_id, plant_id, department_id))
    }

    /// 键的字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
