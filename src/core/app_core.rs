use super::devmode::{DevModeContext, DevModeSession};
use super::outcome::Outcome;
use crate::config::{Config, ConfigStore, Layout, Settings};
use crate::data::{ElementSet, MenuSet};
use anyhow::Result;

/// Host application state
///
/// AppCore owns the element set, menus and settings that the DevMode session
/// edits, plus the store it persists to. Lines starting with `.` are host
/// commands (selection, menus, quitting); everything else goes to DevMode.
pub struct AppCore {
    /// Resolved data directory
    pub config: Config,

    pub session: DevModeSession,

    pub elements: ElementSet,

    pub menus: MenuSet,

    pub settings: Settings,

    store: Box<dyn ConfigStore>,

    /// Application running flag
    pub running: bool,

    /// Set when an outcome asks the renderer to re-read the element set
    pub needs_refresh: bool,

    /// Messages produced since the last `take_messages`
    messages: Vec<String>,
}

impl AppCore {
    pub fn new(
        config: Config,
        layout: Layout,
        settings: Settings,
        store: Box<dyn ConfigStore>,
    ) -> Result<Self> {
        let (elements, menus) = layout.into_state()?;
        tracing::info!(
            "Loaded {} elements and {} menus",
            elements.len(),
            menus.len()
        );
        Ok(Self {
            config,
            session: DevModeSession::new(),
            elements,
            menus,
            settings,
            store,
            running: true,
            needs_refresh: false,
            messages: Vec::new(),
        })
    }

    /// Handle one line of user input
    pub fn handle_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        if trimmed.starts_with('.') {
            self.handle_dot_command(trimmed);
            return;
        }

        let mut ctx = DevModeContext {
            elements: &mut self.elements,
            menus: &mut self.menus,
            settings: &self.settings,
            store: self.store.as_mut(),
        };
        match self.session.execute(line, &mut ctx) {
            Ok(outcome) => {
                if outcome.needs_refresh() {
                    self.needs_refresh = true;
                }
                self.report(outcome);
                if self.session.is_debugging() {
                    self.report_selected();
                }
            }
            Err(e) => self.add_system_message(&format!("Error: {}", e)),
        }
    }

    fn report(&mut self, outcome: Outcome) {
        if let Outcome::Info(text) = &outcome {
            for line in text.lines() {
                self.add_system_message(line);
            }
        } else {
            self.add_system_message(&outcome.to_string());
        }
    }

    /// Debug echo of the selected element after each command
    fn report_selected(&mut self) {
        let described = self
            .session
            .selected(&self.elements)
            .map(|element| element.describe());
        if let Some(text) = described {
            for line in text.lines() {
                self.add_system_message(&format!("[debug] {}", line));
            }
        }
    }

    /// Host commands (`.select`, `.open`, ...)
    pub fn handle_dot_command(&mut self, command: &str) {
        let parts: Vec<&str> = command[1..].split_whitespace().collect();
        if parts.is_empty() {
            return;
        }

        match parts[0] {
            "quit" | "q" => {
                self.running = false;
                self.add_system_message("Exiting...");
            }
            "select" | "sel" => match parts.get(1) {
                Some(name) => match self.session.select(name, &self.elements) {
                    Ok(()) => self.add_system_message(&format!("Selected '{}'", name)),
                    Err(e) => self.add_system_message(&format!("Error: {}", e)),
                },
                None => self.add_system_message("Usage: .select <element>"),
            },
            "deselect" => {
                self.session.deselect();
                self.add_system_message("Selection cleared");
            }
            "list" | "elements" => {
                if self.elements.is_empty() {
                    self.add_system_message("No elements");
                } else {
                    let names = self.elements.names();
                    self.add_system_message(&format!(
                        "Elements ({}): {}",
                        names.len(),
                        names.join(", ")
                    ));
                }
            }
            "open" => match parts.get(1) {
                Some(name) => match self.menus.open(name) {
                    Ok(closed) if closed.is_empty() => {
                        self.add_system_message(&format!("Opened menu '{}'", name))
                    }
                    Ok(closed) => self.add_system_message(&format!(
                        "Opened menu '{}' (closed {})",
                        name,
                        closed.join(", ")
                    )),
                    Err(e) => self.add_system_message(&format!("Error: {}", e)),
                },
                None => self.add_system_message("Usage: .open <menu>"),
            },
            "close" => match parts.get(1) {
                Some(name) => match self.menus.close(name) {
                    Ok(()) => self.add_system_message(&format!("Closed menu '{}'", name)),
                    Err(e) => self.add_system_message(&format!("Error: {}", e)),
                },
                None => self.add_system_message("Usage: .close <menu>"),
            },
            "help" => {
                self.add_system_message("Host commands:");
                self.add_system_message("  .select <element> - Select an element for editing");
                self.add_system_message("  .deselect - Clear the selection");
                self.add_system_message("  .list - List elements");
                self.add_system_message("  .open <menu> / .close <menu> - Show or hide a menu");
                self.add_system_message("  .quit / .q - Exit");
                self.add_system_message(
                    "DevMode: 0 toggles; x y w h c tc hc t fs align sv smin smax ton toff tflip n a",
                );
                self.add_system_message(
                    "  add <type> [name], del, set <attr> <value>, centertext, print_info",
                );
                self.add_system_message(
                    "  overridel, overrides, savehierarchy, loadhierarchy, refreshui, toggle_debug",
                );
                self.add_system_message(
                    "  listmenus, deletemenu <m>, addexclusion <m1> <m2>, removeexclusion <m1> <m2>",
                );
            }
            _ => {
                self.add_system_message(&format!("Unknown command: .{} (try .help)", parts[0]));
            }
        }
    }

    pub fn add_system_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
        tracing::debug!("System message: {}", message);
    }

    /// Drain queued messages for display
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::MemoryStore;
    use crate::data::Menu;

    fn core() -> AppCore {
        let config = Config {
            data_dir: std::env::temp_dir().join("catan-devmode-test"),
        };
        let mut core = AppCore::new(
            config,
            Layout::embedded_default().unwrap(),
            Settings::default(),
            Box::new(MemoryStore::default()),
        )
        .unwrap();
        core.menus.push(Menu::new("trade")).ok();
        core
    }

    #[test]
    fn test_default_layout_is_loaded() {
        let core = core();
        assert!(core.elements.contains("play_button"));
        assert!(core.menus.get("settings").is_some());
    }

    #[test]
    fn test_select_and_edit() {
        let mut core = core();
        core.handle_line("0");
        core.handle_line(".select play_button");
        core.handle_line("x321");
        assert_eq!(core.elements.get("play_button").unwrap().base().x, 321);

        let messages = core.take_messages();
        assert_eq!(messages[0], "DevMode enabled");
        assert_eq!(messages[1], "Selected 'play_button'");
        assert!(messages[2].contains("x = 321"));
        assert!(core.take_messages().is_empty());
    }

    #[test]
    fn test_errors_become_messages() {
        let mut core = core();
        core.handle_line("0");
        core.handle_line("x10");
        core.handle_line(".select nope");
        let messages = core.take_messages();
        assert_eq!(messages[1], "Error: no element selected");
        assert!(messages[2].starts_with("Error: invalid value"));
        assert!(core.running);
    }

    #[test]
    fn test_refresh_flag() {
        let mut core = core();
        core.handle_line("0");
        assert!(!core.needs_refresh);
        core.handle_line("add button extra");
        assert!(core.needs_refresh);
    }

    #[test]
    fn test_menu_dot_commands() {
        let mut core = core();
        core.handle_line(".open pause");
        core.handle_line(".open settings");
        assert!(core.menus.get("settings").unwrap().shown);
        assert!(!core.menus.get("pause").unwrap().shown);
        let messages = core.take_messages();
        assert_eq!(messages[1], "Opened menu 'settings' (closed pause)");

        core.handle_line(".close settings");
        assert!(!core.menus.get("settings").unwrap().shown);
    }

    #[test]
    fn test_debug_echoes_selection() {
        let mut core = core();
        core.handle_line("0");
        core.handle_line("toggle_debug");
        core.handle_line(".select quit_button");
        core.take_messages();
        core.handle_line("y10");
        let messages = core.take_messages();
        assert_eq!(messages[1], "[debug] quit_button (button)");
    }

    #[test]
    fn test_quit() {
        let mut core = core();
        core.handle_line(".q");
        assert!(!core.running);
    }
}
