//! DevMode session - applies parsed commands to the element set
//!
//! The session owns only its own flags and the *name* of the selected
//! element. Everything it edits (elements, menus, settings, persistence) is
//! handed in through `DevModeContext` on every call, so nothing is global and
//! a deleted element simply resolves to "no selection".

use super::command::Command;
use super::error::DevModeError;
use super::outcome::{Outcome, SaveTarget};
use crate::config::{ConfigStore, Layout, Settings};
use crate::data::{ElementSet, Hierarchy, MenuSet, UiElement};

/// Collaborators the interpreter reads and mutates
pub struct DevModeContext<'a> {
    pub elements: &'a mut ElementSet,
    pub menus: &'a mut MenuSet,
    pub settings: &'a Settings,
    pub store: &'a mut dyn ConfigStore,
}

#[derive(Debug, Clone, Default)]
pub struct DevModeSession {
    enabled: bool,
    selected: Option<String>,
    debugging: bool,
}

impl DevModeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_debugging(&self) -> bool {
        self.debugging
    }

    /// The selected element, if it still exists
    pub fn selected<'e>(&self, elements: &'e ElementSet) -> Option<&'e UiElement> {
        self.selected.as_deref().and_then(|name| elements.get(name))
    }

    /// Select an element by name (what a mouse click does in the game)
    pub fn select(&mut self, name: &str, elements: &ElementSet) -> Result<(), DevModeError> {
        if !elements.contains(name) {
            return Err(DevModeError::validation(format!("no element named '{}'", name)));
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Handle one command line
    pub fn execute(
        &mut self,
        line: &str,
        ctx: &mut DevModeContext<'_>,
    ) -> Result<Outcome, DevModeError> {
        let result = self.dispatch(line, ctx);
        match &result {
            Ok(outcome) => tracing::info!("DevMode '{}': {}", line.trim_end(), outcome),
            Err(e) => tracing::warn!("DevMode '{}' rejected: {}", line.trim_end(), e),
        }
        result
    }

    fn dispatch(
        &mut self,
        line: &str,
        ctx: &mut DevModeContext<'_>,
    ) -> Result<Outcome, DevModeError> {
        // `0` flips DevMode in either state; everything else needs it on
        if line.trim() == "0" {
            self.enabled = !self.enabled;
            return Ok(Outcome::Toggled {
                enabled: self.enabled,
            });
        }
        if !self.enabled {
            return Ok(Outcome::Disabled);
        }

        let command = Command::parse(line)?;
        if command.requires_selection() {
            let name = self.resolve_selection(ctx.elements)?;
            return self.apply_to_selected(command, &name, ctx);
        }

        match command {
            Command::Add { kind, name } => {
                let name = match name {
                    Some(name) if ctx.elements.contains(&name) => {
                        return Err(DevModeError::validation(format!(
                            "element '{}' already exists",
                            name
                        )));
                    }
                    Some(name) => name,
                    None => ctx.elements.next_free_name(kind),
                };
                let mut element = UiElement::with_defaults(kind, &name);
                if let Some(menu) = ctx.menus.top_open() {
                    element.base_mut().menu = Some(menu.name.clone());
                }
                ctx.elements
                    .push(element)
                    .map_err(|e| DevModeError::validation(e.to_string()))?;
                self.selected = Some(name.clone());
                Ok(Outcome::Added { name, kind })
            }
            Command::Delete => match self.selected.take() {
                Some(name) if ctx.elements.remove(&name).is_some() => {
                    Ok(Outcome::Deleted { name })
                }
                _ => Ok(Outcome::NoOp {
                    reason: "nothing selected".to_string(),
                }),
            },
            Command::OverrideLayout => {
                let layout = Layout::from_state(ctx.elements, ctx.menus);
                ctx.store
                    .save_layout(&layout)
                    .map_err(DevModeError::Storage)?;
                Ok(Outcome::Saved {
                    target: SaveTarget::Layout,
                })
            }
            Command::OverrideSettings => {
                ctx.store
                    .save_settings(ctx.settings)
                    .map_err(DevModeError::Storage)?;
                Ok(Outcome::Saved {
                    target: SaveTarget::Settings,
                })
            }
            Command::RefreshUi => Ok(Outcome::RefreshRequested),
            Command::ToggleDebug => {
                self.debugging = !self.debugging;
                Ok(Outcome::Info(format!(
                    "Debugging {}",
                    if self.debugging { "on" } else { "off" }
                )))
            }
            Command::SaveHierarchy => {
                let hierarchy = Hierarchy::build(ctx.elements, ctx.menus);
                ctx.store
                    .save_hierarchy(&hierarchy)
                    .map_err(DevModeError::Storage)?;
                Ok(Outcome::Saved {
                    target: SaveTarget::Hierarchy,
                })
            }
            Command::LoadHierarchy => {
                let (elements, menus) = ctx
                    .store
                    .load_hierarchy()
                    .and_then(Hierarchy::into_state)
                    .map_err(DevModeError::Storage)?;
                let outcome = Outcome::Loaded {
                    elements: elements.len(),
                    menus: menus.len(),
                };
                *ctx.elements = elements;
                *ctx.menus = menus;
                self.selected = None;
                Ok(outcome)
            }
            Command::ListMenus => Ok(Outcome::Info(list_menus(ctx.menus))),
            Command::DeleteMenu(name) => {
                let menu = ctx.menus.remove(&name).ok_or_else(|| {
                    DevModeError::validation(format!("menu '{}' not found", name))
                })?;
                let mut detached = 0;
                for element in ctx.elements.iter_mut() {
                    let base = element.base_mut();
                    if base.menu.as_deref() == Some(menu.name.as_str()) {
                        base.menu = None;
                        detached += 1;
                    }
                }
                Ok(Outcome::Info(format!(
                    "Deleted menu '{}' ({} elements detached)",
                    menu.name, detached
                )))
            }
            Command::AddExclusion(first, second) => {
                ctx.menus
                    .add_exclusion(&first, &second)
                    .map_err(|e| DevModeError::validation(e.to_string()))?;
                Ok(Outcome::Info(format!(
                    "Added exclusivity between '{}' and '{}'",
                    first, second
                )))
            }
            Command::RemoveExclusion(first, second) => {
                ctx.menus
                    .remove_exclusion(&first, &second)
                    .map_err(|e| DevModeError::validation(e.to_string()))?;
                Ok(Outcome::Info(format!(
                    "Removed exclusivity between '{}' and '{}'",
                    first, second
                )))
            }
            // `0` is handled above; property commands go through apply_to_selected
            other => Err(DevModeError::parse(format!(
                "command cannot be dispatched: {:?}",
                other
            ))),
        }
    }

    /// Re-resolve the selected name; a stale selection is cleared
    fn resolve_selection(&mut self, elements: &ElementSet) -> Result<String, DevModeError> {
        match &self.selected {
            Some(name) if elements.contains(name) => Ok(name.clone()),
            Some(_) => {
                self.selected = None;
                Err(DevModeError::Selection)
            }
            None => Err(DevModeError::Selection),
        }
    }

    fn apply_to_selected(
        &mut self,
        command: Command,
        name: &str,
        ctx: &mut DevModeContext<'_>,
    ) -> Result<Outcome, DevModeError> {
        if let Command::Rename(new_name) = &command {
            ctx.elements
                .rename(name, new_name)
                .map_err(|e| DevModeError::validation(e.to_string()))?;
            self.selected = Some(new_name.clone());
            return Ok(Outcome::Applied {
                element: new_name.clone(),
                change: format!("renamed from '{}'", name),
            });
        }

        let element = ctx.elements.get_mut(name).ok_or(DevModeError::Selection)?;
        let change = match apply_property(command, element) {
            Ok(change) => change,
            Err(reason) => return Ok(Outcome::NoOp { reason }),
        };
        if let Command::PrintInfo = change {
            return Ok(Outcome::Info(element.describe()));
        }
        Ok(Outcome::Applied {
            element: name.to_string(),
            change: change.describe(element),
        })
    }
}

/// Mutate one element. `Err` carries the reason the command did not apply.
fn apply_property(command: Command, element: &mut UiElement) -> Result<Command, String> {
    let kind = element.kind();
    match &command {
        Command::X(v) => element.base_mut().x = *v,
        Command::Y(v) => element.base_mut().y = *v,
        Command::Width(v) => element.base_mut().width = *v,
        Command::Height(v) => element.base_mut().height = *v,
        Command::FillColor(c) => element.base_mut().fill_color = *c,
        Command::TextColor(c) => element.base_mut().text_color = *c,
        Command::HandleColor(c) => element.base_mut().handle_color = *c,
        Command::Text(text) => element.base_mut().text = text.clone(),
        Command::FontSize(size) => element.base_mut().font_size = *size,
        Command::Align(alignment) => element.base_mut().alignment = *alignment,
        Command::Alpha(alpha) => element.base_mut().alpha = *alpha,
        Command::Visible(visible) => element.base_mut().visible = *visible,
        Command::CenterText => {
            if let Err(reason) = element.base_mut().center_text() {
                return Err(format!("'{}' {}", element.name(), reason));
            }
        }
        Command::SliderValue(v) | Command::SliderMin(v) | Command::SliderMax(v) => {
            let slider = element
                .slider_mut()
                .ok_or_else(|| format!("{} is not a slider", kind))?;
            match command {
                Command::SliderValue(_) => slider.set_value(*v),
                Command::SliderMin(_) => slider.set_min(*v),
                _ => slider.set_max(*v),
            }
        }
        Command::ToggleOn | Command::ToggleOff | Command::ToggleFlip => {
            let toggle = element
                .toggle_mut()
                .ok_or_else(|| format!("{} is not a toggle", kind))?;
            toggle.on = match command {
                Command::ToggleOn => true,
                Command::ToggleOff => false,
                _ => !toggle.on,
            };
        }
        Command::ImagePath(path) => {
            let image = element
                .image_mut()
                .ok_or_else(|| format!("{} is not an image", kind))?;
            image.image_path = path.clone();
        }
        Command::PrintInfo => {}
        other => return Err(format!("{:?} does not edit an element", other)),
    }
    Ok(command)
}

impl Command {
    /// Short description of what a property command changed, read back from the element
    fn describe(&self, element: &UiElement) -> String {
        let base = element.base();
        match self {
            Command::X(_) => format!("x = {}", base.x),
            Command::Y(_) => format!("y = {}", base.y),
            Command::Width(_) => format!("width = {}", base.width),
            Command::Height(_) => format!("height = {}", base.height),
            Command::FillColor(_) => format!("fill_color = {}", base.fill_color),
            Command::TextColor(_) => format!("text_color = {}", base.text_color),
            Command::HandleColor(_) => format!("handle_color = {}", base.handle_color),
            Command::Text(_) => format!("text = {:?}", base.text),
            Command::FontSize(_) => format!("font_size = {}", base.font_size),
            Command::Align(_) => format!("alignment = {}", base.alignment.as_str()),
            Command::Alpha(_) => format!("alpha = {}", base.alpha),
            Command::Visible(_) => format!("visible = {}", base.visible),
            Command::CenterText => match base.text_anchor {
                Some((x, y)) => format!("text anchored at ({}, {})", x, y),
                None => "text centered".to_string(),
            },
            Command::SliderValue(_) | Command::SliderMin(_) | Command::SliderMax(_) => {
                match element.slider() {
                    Some(s) => format!("slider value={} min={} max={}", s.value, s.min, s.max),
                    None => "slider updated".to_string(),
                }
            }
            Command::ToggleOn | Command::ToggleOff | Command::ToggleFlip => {
                format!("on = {}", element.toggle().map(|t| t.on).unwrap_or(false))
            }
            Command::ImagePath(path) => {
                format!("image_path = {}", path.as_deref().unwrap_or("(none)"))
            }
            other => format!("{:?}", other),
        }
    }
}

fn list_menus(menus: &MenuSet) -> String {
    if menus.is_empty() {
        return "No menus defined".to_string();
    }
    let mut lines = vec![format!("=== Available Menus ({}) ===", menus.len())];
    for menu in menus.iter() {
        lines.push(format!(
            "  {}: z_index={}, {}, exclusive_with={:?}",
            menu.name,
            menu.z_index,
            if menu.shown { "OPEN" } else { "closed" },
            menu.exclusive_with
        ));
    }
    lines.join("\n")
}
