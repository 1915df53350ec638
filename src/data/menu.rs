//! Menus - named containers that can be opened, closed and made exclusive
//!
//! Two menus that are exclusive with each other are never open at the same
//! time: opening one closes the other.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    /// Draw order; lower number = on top
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub shown: bool,
    #[serde(default)]
    pub modal: bool,
    #[serde(default)]
    pub exclusive_with: Vec<String>,
    #[serde(default)]
    pub tabs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tab: Option<String>,
}

impl Menu {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            z_index: 0,
            shown: false,
            modal: false,
            exclusive_with: Vec::new(),
            tabs: Vec::new(),
            active_tab: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuSet {
    menus: Vec<Menu>,
}

impl MenuSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_menus(menus: Vec<Menu>) -> Result<Self> {
        let mut set = Self::new();
        for menu in menus {
            if set.get(&menu.name).is_some() {
                bail!("Menu '{}' defined twice", menu.name);
            }
            set.menus.push(menu);
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Menu> {
        self.menus.iter_mut().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Menu> {
        self.menus.iter()
    }

    pub fn push(&mut self, menu: Menu) -> Result<()> {
        if self.get(&menu.name).is_some() {
            bail!("Menu '{}' already exists", menu.name);
        }
        self.menus.push(menu);
        Ok(())
    }

    /// Remove a menu and scrub its name from every exclusivity list
    pub fn remove(&mut self, name: &str) -> Option<Menu> {
        let idx = self.menus.iter().position(|m| m.name == name)?;
        let removed = self.menus.remove(idx);
        for menu in &mut self.menus {
            menu.exclusive_with.retain(|other| other != name);
        }
        Some(removed)
    }

    /// Open a menu, closing every open menu it is exclusive with.
    /// Returns the names of the menus that were closed.
    pub fn open(&mut self, name: &str) -> Result<Vec<String>> {
        let exclusive = match self.get(name) {
            Some(menu) => menu.exclusive_with.clone(),
            None => bail!("Menu not found: {}", name),
        };

        let mut closed = Vec::new();
        for menu in &mut self.menus {
            if menu.name == name {
                menu.shown = true;
            } else if menu.shown && exclusive.contains(&menu.name) {
                menu.shown = false;
                closed.push(menu.name.clone());
            }
        }
        tracing::debug!("Opened menu '{}', closed {:?}", name, closed);
        Ok(closed)
    }

    pub fn close(&mut self, name: &str) -> Result<()> {
        let menu = self
            .get_mut(name)
            .ok_or_else(|| anyhow::anyhow!("Menu not found: {}", name))?;
        menu.shown = false;
        Ok(())
    }

    /// The open menu drawn on top (lowest z_index), if any
    pub fn top_open(&self) -> Option<&Menu> {
        self.menus
            .iter()
            .filter(|m| m.shown)
            .min_by_key(|m| m.z_index)
    }

    /// Make two menus mutually exclusive (bidirectional)
    pub fn add_exclusion(&mut self, first: &str, second: &str) -> Result<()> {
        self.check_pair(first, second)?;
        for (menu, other) in [(first, second), (second, first)] {
            if let Some(m) = self.get_mut(menu) {
                if !m.exclusive_with.iter().any(|n| n == other) {
                    m.exclusive_with.push(other.to_string());
                }
            }
        }
        Ok(())
    }

    pub fn remove_exclusion(&mut self, first: &str, second: &str) -> Result<()> {
        self.check_pair(first, second)?;
        for (menu, other) in [(first, second), (second, first)] {
            if let Some(m) = self.get_mut(menu) {
                m.exclusive_with.retain(|n| n != other);
            }
        }
        Ok(())
    }

    fn check_pair(&self, first: &str, second: &str) -> Result<()> {
        for name in [first, second] {
            if self.get(name).is_none() {
                bail!("Menu '{}' not found", name);
            }
        }
        if first == second {
            bail!("A menu cannot be exclusive with itself");
        }
        Ok(())
    }
}
