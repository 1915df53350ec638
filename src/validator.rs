use std::collections::HashSet;
use std::fmt;

use crate::config::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutIssue {
    /// Element or menu the issue is about
    pub subject: String,
    pub message: String,
    pub kind: IssueKind,
}

impl LayoutIssue {
    fn error(subject: &str, message: String) -> Self {
        Self {
            subject: subject.to_string(),
            message,
            kind: IssueKind::Error,
        }
    }

    fn warning(subject: &str, message: String) -> Self {
        Self {
            subject: subject.to_string(),
            message,
            kind: IssueKind::Warning,
        }
    }
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            IssueKind::Error => "✗ Error",
            IssueKind::Warning => "⚠ Warning",
        };
        write!(f, "{}: '{}' {}", marker, self.subject, self.message)
    }
}

/// Check a layout as written on disk, before it is normalized into an element set
pub fn validate_layout(layout: &Layout) -> Vec<LayoutIssue> {
    let mut issues = Vec::new();

    let menu_names: HashSet<&str> = layout.menus.iter().map(|m| m.name.as_str()).collect();

    let mut seen = HashSet::new();
    for element in &layout.elements {
        let base = element.base();
        let name = base.name.as_str();

        if name.is_empty() {
            issues.push(LayoutIssue::error("", "element has an empty name".to_string()));
        } else if !seen.insert(name) {
            issues.push(LayoutIssue::error(name, "is defined more than once".to_string()));
        }

        if base.width <= 0 || base.height <= 0 {
            issues.push(LayoutIssue::error(
                name,
                format!("has non-positive size {}x{}", base.width, base.height),
            ));
        }
        if base.font_size == 0 {
            issues.push(LayoutIssue::error(name, "has font_size 0".to_string()));
        }
        if let Some(slider) = element.slider() {
            if !slider.is_finite() {
                issues.push(LayoutIssue::error(
                    name,
                    format!(
                        "slider has a non-finite value {}, min {} or max {}",
                        slider.value, slider.min, slider.max
                    ),
                ));
            } else if slider.min > slider.max {
                issues.push(LayoutIssue::error(
                    name,
                    format!("slider min {} > max {}", slider.min, slider.max),
                ));
            } else if slider.value < slider.min || slider.value > slider.max {
                issues.push(LayoutIssue::warning(
                    name,
                    format!(
                        "slider value {} outside [{}, {}], will be clamped",
                        slider.value, slider.min, slider.max
                    ),
                ));
            }
        }
        if let Some(menu) = &base.menu {
            if !menu_names.contains(menu.as_str()) {
                issues.push(LayoutIssue::error(
                    name,
                    format!("refers to unknown menu '{}'", menu),
                ));
            }
        }

        // Off-screen to the top/left is legal but usually a mistake
        if base.x < 0 || base.y < 0 {
            issues.push(LayoutIssue::warning(
                name,
                format!("is positioned off-screen at ({}, {})", base.x, base.y),
            ));
        }
    }

    let mut seen_menus = HashSet::new();
    for menu in &layout.menus {
        if !seen_menus.insert(menu.name.as_str()) {
            issues.push(LayoutIssue::error(
                &menu.name,
                "menu is defined more than once".to_string(),
            ));
        }
        for other in &menu.exclusive_with {
            if other == &menu.name {
                issues.push(LayoutIssue::error(
                    &menu.name,
                    "menu is exclusive with itself".to_string(),
                ));
            } else if !menu_names.contains(other.as_str()) {
                issues.push(LayoutIssue::error(
                    &menu.name,
                    format!("exclusive with unknown menu '{}'", other),
                ));
            } else if !layout
                .menus
                .iter()
                .any(|m| &m.name == other && m.exclusive_with.contains(&menu.name))
            {
                issues.push(LayoutIssue::warning(
                    &menu.name,
                    format!("exclusivity with '{}' is one-directional", other),
                ));
            }
        }
        if let Some(tab) = &menu.active_tab {
            if !menu.tabs.contains(tab) {
                issues.push(LayoutIssue::warning(
                    &menu.name,
                    format!("active tab '{}' is not one of its tabs", tab),
                ));
            }
        }
    }

    issues
}

pub fn count(issues: &[LayoutIssue], kind: IssueKind) -> usize {
    issues.iter().filter(|i| i.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_is_clean() {
        let layout = Layout::embedded_default().unwrap();
        let issues = validate_layout(&layout);
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_reports_errors_and_warnings() {
        let layout = Layout::parse(
            r#"
[[elements]]
type = "button"
name = "dup"
width = 0
height = 20

[[elements]]
type = "button"
name = "dup"
x = -5
menu = "ghost"

[[elements]]
type = "slider"
name = "vol"
min = 10.0
max = 5.0
value = 7.0

[[menus]]
name = "settings"
exclusive_with = ["pause", "settings"]

[[menus]]
name = "pause"
"#,
        )
        .unwrap();
        let issues = validate_layout(&layout);
        let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();

        assert!(messages.iter().any(|m| m.contains("'dup' is defined more than once")));
        assert!(messages.iter().any(|m| m.contains("non-positive size 0x20")));
        assert!(messages.iter().any(|m| m.contains("unknown menu 'ghost'")));
        assert!(messages.iter().any(|m| m.contains("slider min 10 > max 5")));
        assert!(messages.iter().any(|m| m.contains("exclusive with itself")));
        assert!(messages.iter().any(|m| m.contains("one-directional")));
        assert!(messages
            .iter()
            .any(|m| m.starts_with("⚠ Warning: 'dup' is positioned off-screen")));
        assert_eq!(count(&issues, IssueKind::Warning), 2);
        assert_eq!(count(&issues, IssueKind::Error), 5);
    }

    #[test]
    fn test_non_finite_slider_is_an_error() {
        let layout = Layout::parse(
            r#"
[[elements]]
type = "slider"
name = "vol"
min = nan
max = inf
"#,
        )
        .unwrap();
        let issues = validate_layout(&layout);
        assert_eq!(count(&issues, IssueKind::Error), 1);
        assert_eq!(count(&issues, IssueKind::Warning), 0);
        assert!(issues[0].to_string().starts_with("✗ Error: 'vol' slider has a non-finite"));
    }
}
