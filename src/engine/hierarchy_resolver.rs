// ==========================================
// 工厂设备监控大屏 - 层级解析引擎
// ==========================================
// 职责: 按当前选择解析 工厂/分厂/部门 节点 + 级联默认选择
// 说明: 纯查询，不产生副作用；新选择由调用方落地
// ==========================================
// 规则: 选择自上而下解析；上级变更时下级先清空、再取首个子节点补齐，
//       保证界面永远不会指向不存在的分厂/部门
// ==========================================

use crate::domain::hierarchy::{Department, Factory, HierarchyRoot, Plant};
use crate::domain::selection::Selection;

/// 解析结果
///
/// 在第一个未解析的层级处截断（下级必为 None）
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub factory: Option<&'a Factory>,
    pub plant: Option<&'a Plant>,
    pub department: Option<&'a Department>,
}

// ==========================================
// HierarchyResolver - 层级解析引擎
// ==========================================
pub struct HierarchyResolver;

impl HierarchyResolver {
    /// 创建新的层级解析引擎
    pub fn new() -> Self {
        Self
    }

    /// 按选择解析层级节点
    ///
    /// 部门只有在分厂、工厂均已解析且一致时才会解析出来
    pub fn resolve<'a>(&self, root: &'a HierarchyRoot, selection: &Selection) -> Resolved<'a> {
        let factory = Self::find_factory(root, &selection.factory_id);
        let plant = factory.and_then(|f| Self::find_plant(f, &selection.plant_id));
        let department = plant.and_then(|p| Self::find_department(p, &selection.department_id));

        Resolved {
            factory,
            plant,
            department,
        }
    }

    /// 首次加载的默认选择
    ///
    /// 依次取第一个工厂、其第一个分厂、其第一个部门；缺失层级留空
    pub fn default_selection(&self, root: &HierarchyRoot) -> Selection {
        let factory = root.factories.first();
        let plant = factory.and_then(|f| f.plants.first());
        let department = plant.and_then(|p| p.departments.first());

        Selection {
            factory_id: factory.map(|f| f.id.clone()).unwrap_or_default(),
            plant_id: plant.map(|p| p.id.clone()).unwrap_or_default(),
            department_id: department.map(|d| d.id.clone()).unwrap_or_default(),
        }
    }

    /// 工厂变更后的级联选择
    ///
    /// 分厂、部门先清空，再取新工厂的第一个分厂及其第一个部门补齐。
    /// 工厂ID不存在时下级保持空（下游解析为“未选择部门”）。
    pub fn cascade_factory_changed(&self, root: &HierarchyRoot, factory_id: &str) -> Selection {
        let factory = Self::find_factory(root, factory_id);
        let plant = factory.and_then(|f| f.plants.first());
        let department = plant.and_then(|p| p.departments.first());

        Selection {
            factory_id: factory_id.to_string(),
            plant_id: plant.map(|p| p.id.clone()).unwrap_or_default(),
            department_id: department.map(|d| d.id.clone()).unwrap_or_default(),
        }
    }

    /// 分厂变更后的级联选择
    ///
    /// 工厂保持不变；部门先清空，再取新分厂的第一个部门补齐。
    /// 分厂不属于当前工厂时部门保持空。
    pub fn cascade_plant_changed(
        &self,
        root: &HierarchyRoot,
        selection: &Selection,
        plant_id: &str,
    ) -> Selection {
        let factory = Self::find_factory(root, &selection.factory_id);
        let plant = factory.and_then(|f| Self::find_plant(f, plant_id));
        let department = plant.and_then(|p| p.departments.first());

        Selection {
            factory_id: selection.factory_id.clone(),
            plant_id: plant_id.to_string(),
            department_id: department.map(|d| d.id.clone()).unwrap_or_default(),
        }
    }

    /// 部门变更后的选择
    pub fn cascade_department_changed(&self, selection: &Selection, department_id: &str) -> Selection {
        Selection {
            factory_id: selection.factory_id.clone(),
            plant_id: selection.plant_id.clone(),
            department_id: department_id.to_string(),
        }
    }

    fn find_factory<'a>(root: &'a HierarchyRoot, id: &str) -> Option<&'a Factory> {
        if id.is_empty() {
            return None;
        }
        root.factories.iter().find(|f| f.id == id)
    }

    fn find_plant<'a>(factory: &'a Factory, id: &str) -> Option<&'a Plant> {
        if id.is_empty() {
            return None;
        }
        factory.plants.iter().find(|p| p.id == id)
    }

    fn find_department<'a>(plant: &'a Plant, id: &str) -> Option<&'a Department> {
        if id.is_empty() {
            return None;
        }
        plant.departments.iter().find(|d| d.id == id)
    }
}

impl Default for HierarchyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hierarchy::{Department, Factory, Plant, Zone};

    fn dept(id: &str) -> Department {
        Department {
            id: id.to_string(),
            name: format!("Dept {}", id),
            zones: vec![Zone {
                id: format!("{}-z", id),
                name: "Line".to_string(),
                machines: vec!["M1".to_string()],
                availability: None,
                performance: None,
                quality: None,
                oee: None,
            }],
        }
    }

    fn sample_root() -> HierarchyRoot {
        HierarchyRoot {
            factories: vec![
                Factory {
                    id: "f1".to_string(),
                    name: "Shanghai Works".to_string(),
                    plants: vec![
                        Plant {
                            id: "p1".to_string(),
                            name: "Plant North".to_string(),
                            departments: vec![dept("d1"), dept("d2")],
                        },
                        Plant {
                            id: "p2".to_string(),
                            name: "Plant South".to_string(),
                            departments: vec![dept("d3")],
                        },
                    ],
                },
                Factory {
                    id: "f2".to_string(),
                    name: "Chengdu Works".to_string(),
                    plants: vec![Plant {
                        id: "p3".to_string(),
                        name: "Plant East".to_string(),
                        departments: vec![dept("d4")],
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_default_selection_takes_first_chain() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();

        let selection = resolver.default_selection(&root);
        assert_eq!(selection, Selection::new("f1", "p1", "d1"));
    }

    #[test]
    fn test_default_selection_empty_tree() {
        let resolver = HierarchyResolver::new();
        let selection = resolver.default_selection(&HierarchyRoot::default());
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn test_resolve_full_chain() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();

        let resolved = resolver.resolve(&root, &Selection::new("f1", "p2", "d3"));
        assert_eq!(resolved.factory.unwrap().id, "f1");
        assert_eq!(resolved.plant.unwrap().id, "p2");
        assert_eq!(resolved.department.unwrap().id, "d3");
    }

    #[test]
    fn test_resolve_stops_at_first_miss() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();

        // 部门ID属于别的分厂: 分厂解析、部门不解析
        let resolved = resolver.resolve(&root, &Selection::new("f1", "p1", "d3"));
        assert!(resolved.plant.is_some());
        assert!(resolved.department.is_none());

        // 分厂ID属于别的工厂: 分厂及以下均不解析
        let resolved = resolver.resolve(&root, &Selection::new("f2", "p1", "d1"));
        assert!(resolved.factory.is_some());
        assert!(resolved.plant.is_none());
        assert!(resolved.department.is_none());

        // 空选择不解析任何层级
        let resolved = resolver.resolve(&root, &Selection::default());
        assert!(resolved.factory.is_none());
    }

    #[test]
    fn test_cascade_factory_changed_defaults_children() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();

        let selection = resolver.cascade_factory_changed(&root, "f2");
        assert_eq!(selection, Selection::new("f2", "p3", "d4"));
    }

    #[test]
    fn test_cascade_factory_changed_unknown_id() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();

        // 未知工厂: 下级保持空，不产生悬空引用
        let selection = resolver.cascade_factory_changed(&root, "f999");
        assert_eq!(selection.factory_id, "f999");
        assert!(selection.plant_id.is_empty());
        assert!(selection.department_id.is_empty());
        assert!(resolver.resolve(&root, &selection).factory.is_none());
    }

    #[test]
    fn test_cascade_plant_changed_defaults_department() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();
        let current = Selection::new("f1", "p1", "d2");

        let selection = resolver.cascade_plant_changed(&root, &current, "p2");
        assert_eq!(selection, Selection::new("f1", "p2", "d3"));
    }

    #[test]
    fn test_cascade_plant_changed_foreign_plant() {
        let root = sample_root();
        let resolver = HierarchyResolver::new();
        let current = Selection::new("f1", "p1", "d1");

        // p3 属于 f2: 部门保持空
        let selection = resolver.cascade_plant_changed(&root, &current, "p3");
        assert_eq!(selection.factory_id, "f1");
        assert_eq!(selection.plant_id, "p3");
        assert!(selection.department_id.is_empty());
    }

    #[test]
    fn test_cascade_never_dangles() {
        // 工厂变更后，分厂/部门要么为空、要么是新工厂的真实子节点
        let root = sample_root();
        let resolver = HierarchyResolver::new();

        for factory_id in ["f1", "f2", "f999", ""] {
            let selection = resolver.cascade_factory_changed(&root, factory_id);
            let resolved = resolver.resolve(&root, &selection);

            if !selection.plant_id.is_empty() {
                assert!(resolved.plant.is_some(), "plant dangles for {}", factory_id);
            }
            if !selection.department_id.is_empty() {
                assert!(
                    resolved.department.is_some(),
                    "department dangles for {}",
                    factory_id
                );
            }
        }
    }
}
