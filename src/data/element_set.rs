//! Ordered, name-keyed collection of UI elements
//!
//! Insertion order is z-order (later elements draw on top). Names are unique;
//! every mutating operation that could break that is checked here.

use super::element::{ElementKind, UiElement};
use anyhow::{bail, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSet {
    elements: Vec<UiElement>,
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from loaded elements, rejecting duplicate names and
    /// normalizing invariants that a hand-edited file may have broken
    pub fn from_elements(elements: Vec<UiElement>) -> Result<Self> {
        let mut set = Self::new();
        for mut element in elements {
            if element.slider().is_some_and(|slider| !slider.is_finite()) {
                bail!(
                    "Slider '{}' has a non-finite value, min or max",
                    element.name()
                );
            }
            element.normalize();
            set.push(element)?;
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&UiElement> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut UiElement> {
        self.elements.iter_mut().find(|e| e.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UiElement> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut UiElement> {
        self.elements.iter_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.name().to_string()).collect()
    }

    /// Append an element on top of the z-order
    pub fn push(&mut self, element: UiElement) -> Result<()> {
        if self.contains(element.name()) {
            bail!("Element '{}' already exists", element.name());
        }
        tracing::debug!("Element '{}' ({}) added", element.name(), element.kind());
        self.elements.push(element);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<UiElement> {
        let idx = self.position(name)?;
        Some(self.elements.remove(idx))
    }

    /// Rename an element; fails if `new_name` is taken by another element
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if old_name == new_name {
            return Ok(());
        }
        if self.contains(new_name) {
            bail!("Element '{}' already exists", new_name);
        }
        let element = self
            .get_mut(old_name)
            .ok_or_else(|| anyhow::anyhow!("Element not found: {}", old_name))?;
        element.base_mut().name = new_name.to_string();
        Ok(())
    }

    /// Generate an unused name for an element of `kind`
    /// Pattern: new_button_1, new_button_2, ... (smallest free number)
    pub fn next_free_name(&self, kind: ElementKind) -> String {
        (1u32..)
            .map(|n| format!("new_{}_{}", kind.as_str(), n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| format!("new_{}", kind.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(name: &str) -> UiElement {
        UiElement::with_defaults(ElementKind::Button, name)
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut set = ElementSet::new();
        set.push(button("play")).unwrap();
        assert!(set.push(button("play")).is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut set = ElementSet::new();
        set.push(button("a")).unwrap();
        set.push(button("c")).unwrap();
        set.push(button("b")).unwrap();
        assert_eq!(set.names(), vec!["a", "c", "b"]);

        set.remove("c");
        assert_eq!(set.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_rename_collision() {
        let mut set = ElementSet::new();
        set.push(button("a")).unwrap();
        set.push(button("b")).unwrap();
        assert!(set.rename("a", "b").is_err());
        set.rename("a", "z").unwrap();
        assert!(set.contains("z"));
        assert!(!set.contains("a"));
        // Renaming to itself is allowed
        set.rename("z", "z").unwrap();
    }

    #[test]
    fn test_next_free_name_skips_taken() {
        let mut set = ElementSet::new();
        assert_eq!(set.next_free_name(ElementKind::Slider), "new_slider_1");
        set.push(UiElement::with_defaults(ElementKind::Slider, "new_slider_1"))
            .unwrap();
        assert_eq!(set.next_free_name(ElementKind::Slider), "new_slider_2");
        assert_eq!(set.next_free_name(ElementKind::Button), "new_button_1");
    }

    #[test]
    fn test_from_elements_normalizes_sliders() {
        let mut slider = UiElement::with_defaults(ElementKind::Slider, "s");
        if let Some(data) = slider.slider_mut() {
            data.min = 50.0;
            data.max = 10.0;
            data.value = 99.0;
        }
        let set = ElementSet::from_elements(vec![slider]).unwrap();
        let data = set.get("s").and_then(|e| e.slider()).unwrap();
        assert!(data.min <= data.value && data.value <= data.max);
    }

    #[test]
    fn test_from_elements_rejects_non_finite_sliders() {
        for (value, min, max) in [
            (50.0, f64::NAN, 100.0),
            (f64::NAN, 0.0, 100.0),
            (50.0, 0.0, f64::INFINITY),
        ] {
            let mut slider = UiElement::with_defaults(ElementKind::Slider, "s");
            if let Some(data) = slider.slider_mut() {
                data.value = value;
                data.min = min;
                data.max = max;
            }
            let err = ElementSet::from_elements(vec![slider]).unwrap_err();
            assert!(err.to_string().contains("non-finite"));
        }
    }
}
