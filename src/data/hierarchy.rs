//! UI hierarchy snapshot (menus with their child elements, plus root elements)
//!
//! Written by `savehierarchy` and read back by `loadhierarchy`.

use super::element::UiElement;
use super::element_set::ElementSet;
use super::menu::{Menu, MenuSet};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    #[serde(flatten)]
    pub menu: Menu,
    #[serde(default)]
    pub children: Vec<UiElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    #[serde(default)]
    pub menus: Vec<MenuNode>,
    /// Elements that don't belong to any menu
    #[serde(default)]
    pub roots: Vec<UiElement>,
}

impl Hierarchy {
    /// Snapshot the current elements and menus.
    /// Elements pointing at a menu that no longer exists are saved as roots.
    pub fn build(elements: &ElementSet, menus: &MenuSet) -> Self {
        let mut hierarchy = Hierarchy {
            menus: menus
                .iter()
                .map(|menu| MenuNode {
                    menu: menu.clone(),
                    children: Vec::new(),
                })
                .collect(),
            roots: Vec::new(),
        };

        for element in elements.iter() {
            let parent = match element.base().menu.as_deref() {
                Some(name) => hierarchy.menus.iter_mut().find(|n| n.menu.name == name),
                None => None,
            };
            match parent {
                Some(node) => node.children.push(element.clone()),
                None => {
                    let mut root = element.clone();
                    root.base_mut().menu = None;
                    hierarchy.roots.push(root);
                }
            }
        }
        hierarchy
    }

    pub fn element_count(&self) -> usize {
        self.roots.len() + self.menus.iter().map(|n| n.children.len()).sum::<usize>()
    }

    /// Rebuild the element and menu sets. Roots come first in z-order,
    /// followed by each menu's children in menu order.
    pub fn into_state(self) -> Result<(ElementSet, MenuSet)> {
        let mut elements = self.roots;
        let mut menus = Vec::with_capacity(self.menus.len());
        for node in self.menus {
            for mut child in node.children {
                child.base_mut().menu = Some(node.menu.name.clone());
                elements.push(child);
            }
            menus.push(node.menu);
        }
        Ok((ElementSet::from_elements(elements)?, MenuSet::from_menus(menus)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::element::ElementKind;

    #[test]
    fn test_build_groups_children_under_menus() {
        let mut elements = ElementSet::new();
        elements
            .push(UiElement::with_defaults(ElementKind::Button, "play"))
            .unwrap();
        let mut volume = UiElement::with_defaults(ElementKind::Slider, "volume");
        volume.base_mut().menu = Some("settings".to_string());
        elements.push(volume).unwrap();
        let mut orphan = UiElement::with_defaults(ElementKind::Toggle, "orphan");
        orphan.base_mut().menu = Some("gone".to_string());
        elements.push(orphan).unwrap();

        let menus = MenuSet::from_menus(vec![Menu::new("settings")]).unwrap();
        let hierarchy = Hierarchy::build(&elements, &menus);

        assert_eq!(hierarchy.element_count(), 3);
        assert_eq!(hierarchy.menus[0].children[0].name(), "volume");
        let root_names: Vec<&str> = hierarchy.roots.iter().map(|e| e.name()).collect();
        assert_eq!(root_names, vec!["play", "orphan"]);
        assert!(hierarchy.roots[1].base().menu.is_none());
    }

    #[test]
    fn test_json_round_trip_restores_menu_membership() {
        let mut elements = ElementSet::new();
        let mut volume = UiElement::with_defaults(ElementKind::Slider, "volume");
        volume.base_mut().menu = Some("settings".to_string());
        elements.push(volume).unwrap();
        let menus = MenuSet::from_menus(vec![Menu::new("settings")]).unwrap();

        let json = serde_json::to_string_pretty(&Hierarchy::build(&elements, &menus)).unwrap();
        let restored: Hierarchy = serde_json::from_str(&json).unwrap();
        let (elements, menus) = restored.into_state().unwrap();

        assert_eq!(menus.len(), 1);
        assert_eq!(
            elements.get("volume").unwrap().base().menu.as_deref(),
            Some("settings")
        );
    }
}
