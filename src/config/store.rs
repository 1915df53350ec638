//! Persistence targets for DevMode (layout, settings, hierarchy)
//!
//! The interpreter only sees the `ConfigStore` trait; `FileStore` is the
//! on-disk implementation used by the binary.

use super::{Config, Layout, Settings};
use crate::data::Hierarchy;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub trait ConfigStore {
    fn save_layout(&mut self, layout: &Layout) -> Result<()>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;
    fn save_hierarchy(&mut self, hierarchy: &Hierarchy) -> Result<()>;
    fn load_hierarchy(&mut self) -> Result<Hierarchy>;
}

/// Writes TOML/JSON documents into the configured data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    config: Config,
}

impl FileStore {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.config.data_dir).context(format!(
            "Failed to create data directory: {:?}",
            self.config.data_dir
        ))?;
        fs::write(path, contents).context(format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn save_layout(&mut self, layout: &Layout) -> Result<()> {
        let path = self.config.layout_path();
        self.write(&path, &layout.to_toml()?)?;
        tracing::info!(
            "Saved layout ({} elements) to {:?}",
            layout.elements.len(),
            path
        );
        Ok(())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        let path = self.config.settings_path();
        self.write(&path, &settings.to_toml()?)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    fn save_hierarchy(&mut self, hierarchy: &Hierarchy) -> Result<()> {
        let path = self.config.hierarchy_path();
        let json =
            serde_json::to_string_pretty(hierarchy).context("Failed to serialize hierarchy")?;
        self.write(&path, &json)?;
        tracing::info!(
            "Saved UI hierarchy ({} menus, {} elements) to {:?}",
            hierarchy.menus.len(),
            hierarchy.element_count(),
            path
        );
        Ok(())
    }

    fn load_hierarchy(&mut self) -> Result<Hierarchy> {
        let path = self.config.hierarchy_path();
        let contents = fs::read_to_string(&path)
            .context(format!("No saved hierarchy found at {:?}", path))?;
        serde_json::from_str(&contents).context(format!("Failed to parse hierarchy: {:?}", path))
    }
}

/// In-memory store for tests; `fail` makes every call return an error
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub layout: Option<Layout>,
    pub settings: Option<Settings>,
    pub hierarchy: Option<Hierarchy>,
    pub fail: bool,
}

#[cfg(test)]
impl MemoryStore {
    fn check(&self) -> Result<()> {
        if self.fail {
            anyhow::bail!("disk full");
        }
        Ok(())
    }
}

#[cfg(test)]
impl ConfigStore for MemoryStore {
    fn save_layout(&mut self, layout: &Layout) -> Result<()> {
        self.check()?;
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.check()?;
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn save_hierarchy(&mut self, hierarchy: &Hierarchy) -> Result<()> {
        self.check()?;
        self.hierarchy = Some(hierarchy.clone());
        Ok(())
    }

    fn load_hierarchy(&mut self) -> Result<Hierarchy> {
        self.check()?;
        self.hierarchy
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No saved hierarchy"))
    }
}
