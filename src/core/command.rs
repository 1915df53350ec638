//! DevMode command language
//!
//! One command per line, dispatched by prefix against a fixed table that is
//! ordered longest-prefix-first, so `tflip` wins over `t` and `tc` wins over `t`.
//!
//! Three match forms:
//! - `Exact`: the whole (trimmed) line must equal the keyword (`0`, `ton`, `del`, ...).
//!   When it doesn't, matching falls through to shorter prefixes, so `toffee`
//!   sets the text to `offee`.
//! - `Keyword`: keyword followed by whitespace-separated arguments (`add slider s1`).
//! - `Prefix`: argument glued to the prefix (`x100`, `tc255,0,0`, `tHello`).
//!
//! Arguments are parsed and validated here, before anything is mutated.

use super::error::DevModeError;
use crate::data::{clamp_channel, Alignment, ElementKind, Rgb};
use std::num::IntErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleDevMode,
    X(i32),
    Y(i32),
    Width(i32),
    Height(i32),
    FillColor(Rgb),
    TextColor(Rgb),
    HandleColor(Rgb),
    Text(String),
    FontSize(u32),
    Align(Alignment),
    SliderValue(f64),
    SliderMin(f64),
    SliderMax(f64),
    ToggleOn,
    ToggleOff,
    ToggleFlip,
    Rename(String),
    Alpha(u8),
    Visible(bool),
    ImagePath(Option<String>),
    Add {
        kind: ElementKind,
        name: Option<String>,
    },
    OverrideLayout,
    OverrideSettings,
    RefreshUi,
    CenterText,
    Delete,
    PrintInfo,
    ToggleDebug,
    SaveHierarchy,
    LoadHierarchy,
    ListMenus,
    DeleteMenu(String),
    AddExclusion(String, String),
    RemoveExclusion(String, String),
}

impl Command {
    /// Parse one command line
    pub fn parse(line: &str) -> Result<Command, DevModeError> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        if line.trim().is_empty() {
            return Err(DevModeError::parse("empty command"));
        }

        for spec in COMMANDS {
            if let Some(arg) = spec.form.matches(spec.prefix, line) {
                tracing::debug!("Command '{}' matched prefix '{}'", line, spec.prefix);
                return (spec.build)(arg);
            }
        }

        Err(DevModeError::parse(format!("unrecognized command: {}", line)))
    }

    /// Whether the command edits the selected element
    pub fn requires_selection(&self) -> bool {
        !matches!(
            self,
            Command::ToggleDevMode
                | Command::Add { .. }
                | Command::Delete
                | Command::OverrideLayout
                | Command::OverrideSettings
                | Command::RefreshUi
                | Command::ToggleDebug
                | Command::SaveHierarchy
                | Command::LoadHierarchy
                | Command::ListMenus
                | Command::DeleteMenu(_)
                | Command::AddExclusion(..)
                | Command::RemoveExclusion(..)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Form {
    Exact,
    Keyword,
    Prefix,
}

impl Form {
    /// Returns the argument text when `line` matches `prefix` in this form
    fn matches<'a>(self, prefix: &str, line: &'a str) -> Option<&'a str> {
        match self {
            Form::Exact => (line.trim_end() == prefix).then_some(""),
            Form::Keyword => {
                let rest = line.strip_prefix(prefix)?;
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    Some(rest.trim())
                } else {
                    None
                }
            }
            Form::Prefix => line.strip_prefix(prefix),
        }
    }
}

struct CommandSpec {
    prefix: &'static str,
    form: Form,
    build: fn(&str) -> Result<Command, DevModeError>,
}

const fn spec(
    prefix: &'static str,
    form: Form,
    build: fn(&str) -> Result<Command, DevModeError>,
) -> CommandSpec {
    CommandSpec {
        prefix,
        form,
        build,
    }
}

/// Dispatch table, longest prefix first
const COMMANDS: &[CommandSpec] = &[
    spec("removeexclusion", Form::Keyword, |a| {
        let (first, second) = menu_pair("removeexclusion", a)?;
        Ok(Command::RemoveExclusion(first, second))
    }),
    spec("savehierarchy", Form::Exact, |_| Ok(Command::SaveHierarchy)),
    spec("loadhierarchy", Form::Exact, |_| Ok(Command::LoadHierarchy)),
    spec("addexclusion", Form::Keyword, |a| {
        let (first, second) = menu_pair("addexclusion", a)?;
        Ok(Command::AddExclusion(first, second))
    }),
    spec("toggle_debug", Form::Exact, |_| Ok(Command::ToggleDebug)),
    spec("deletemenu", Form::Keyword, build_delete_menu),
    spec("centertext", Form::Exact, |_| Ok(Command::CenterText)),
    spec("print_info", Form::Exact, |_| Ok(Command::PrintInfo)),
    spec("overridel", Form::Exact, |_| Ok(Command::OverrideLayout)),
    spec("overrides", Form::Exact, |_| Ok(Command::OverrideSettings)),
    spec("refreshui", Form::Exact, |_| Ok(Command::RefreshUi)),
    spec("listmenus", Form::Exact, |_| Ok(Command::ListMenus)),
    spec("align", Form::Keyword, build_align),
    spec("tflip", Form::Exact, |_| Ok(Command::ToggleFlip)),
    spec("toff", Form::Exact, |_| Ok(Command::ToggleOff)),
    spec("smin", Form::Prefix, |a| Ok(Command::SliderMin(number_arg("smin", a)?))),
    spec("smax", Form::Prefix, |a| Ok(Command::SliderMax(number_arg("smax", a)?))),
    spec("ton", Form::Exact, |_| Ok(Command::ToggleOn)),
    spec("add", Form::Keyword, build_add),
    spec("del", Form::Exact, |_| Ok(Command::Delete)),
    spec("set", Form::Keyword, build_set),
    spec("sv", Form::Prefix, |a| Ok(Command::SliderValue(number_arg("sv", a)?))),
    spec("tc", Form::Prefix, |a| Ok(Command::TextColor(rgb_arg("tc", a)?))),
    spec("hc", Form::Prefix, |a| Ok(Command::HandleColor(rgb_arg("hc", a)?))),
    spec("fs", Form::Prefix, build_font_size),
    spec("0", Form::Exact, |_| Ok(Command::ToggleDevMode)),
    spec("x", Form::Prefix, |a| Ok(Command::X(coord_arg("x", a)?))),
    spec("y", Form::Prefix, |a| Ok(Command::Y(coord_arg("y", a)?))),
    spec("w", Form::Prefix, |a| Ok(Command::Width(size_arg("w", a)?))),
    spec("h", Form::Prefix, |a| Ok(Command::Height(size_arg("h", a)?))),
    spec("c", Form::Prefix, |a| Ok(Command::FillColor(rgb_arg("c", a)?))),
    spec("t", Form::Prefix, |a| Ok(Command::Text(a.to_string()))),
    spec("n", Form::Prefix, build_rename),
    spec("a", Form::Prefix, |a| {
        Ok(Command::Alpha(clamp_channel(int_arg("a", a)?)))
    }),
];

/// Parse an integer, saturating at the i64 bounds instead of failing on overflow
fn saturating_int(text: &str) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn int_arg(cmd: &str, arg: &str) -> Result<i64, DevModeError> {
    saturating_int(arg.trim()).ok_or_else(|| {
        DevModeError::parse(format!("'{}' expects an integer, got '{}'", cmd, arg.trim()))
    })
}

fn coord_arg(cmd: &str, arg: &str) -> Result<i32, DevModeError> {
    let value = int_arg(cmd, arg)?;
    i32::try_from(value)
        .map_err(|_| DevModeError::validation(format!("'{}' value {} is out of range", cmd, value)))
}

/// Width/height: must be strictly positive
fn size_arg(cmd: &str, arg: &str) -> Result<i32, DevModeError> {
    let value = coord_arg(cmd, arg)?;
    if value <= 0 {
        return Err(DevModeError::validation(format!(
            "'{}' must be greater than 0, got {}",
            cmd, value
        )));
    }
    Ok(value)
}

fn number_arg(cmd: &str, arg: &str) -> Result<f64, DevModeError> {
    match arg.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DevModeError::parse(format!(
            "'{}' expects a number, got '{}'",
            cmd,
            arg.trim()
        ))),
    }
}

/// `r,g,b` with each channel clamped to 0-255
fn rgb_arg(cmd: &str, arg: &str) -> Result<Rgb, DevModeError> {
    let usage = || {
        DevModeError::parse(format!(
            "invalid color '{}', use: {}r,g,b",
            arg.trim(),
            cmd
        ))
    };
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(usage());
    }
    let mut channels = [0i64; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        *slot = saturating_int(part).ok_or_else(usage)?;
    }
    Ok(Rgb::clamped(channels[0], channels[1], channels[2]))
}

fn bool_arg(cmd: &str, arg: &str) -> Result<bool, DevModeError> {
    match arg.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        other => Err(DevModeError::parse(format!(
            "'{}' expects true/false, got '{}'",
            cmd, other
        ))),
    }
}

fn build_font_size(arg: &str) -> Result<Command, DevModeError> {
    let value = int_arg("fs", arg)?;
    if value <= 0 {
        return Err(DevModeError::validation(format!(
            "font size must be greater than 0, got {}",
            value
        )));
    }
    // Capped at i32::MAX so text extents stay in screen coordinates
    if value > i64::from(i32::MAX) {
        return Err(DevModeError::validation(format!(
            "font size {} is too large",
            value
        )));
    }
    Ok(Command::FontSize(value as u32))
}

fn build_align(arg: &str) -> Result<Command, DevModeError> {
    Alignment::from_str(arg).map(Command::Align).ok_or_else(|| {
        DevModeError::parse(format!(
            "unknown alignment '{}', use left, center or right",
            arg
        ))
    })
}

fn build_rename(arg: &str) -> Result<Command, DevModeError> {
    let name = arg.trim();
    if name.is_empty() {
        return Err(DevModeError::validation("element name cannot be empty"));
    }
    Ok(Command::Rename(name.to_string()))
}

fn build_add(arg: &str) -> Result<Command, DevModeError> {
    if arg.is_empty() {
        return Err(DevModeError::parse("usage: add <type> [name]"));
    }
    let (kind_str, name) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
    let kind = ElementKind::from_str(kind_str).ok_or_else(|| {
        let known: Vec<&str> = ElementKind::ALL.iter().map(|k| k.as_str()).collect();
        DevModeError::validation(format!(
            "unknown element type '{}' (expected one of: {})",
            kind_str,
            known.join(", ")
        ))
    })?;
    let name = name.trim();
    Ok(Command::Add {
        kind,
        name: (!name.is_empty()).then(|| name.to_string()),
    })
}

fn build_delete_menu(arg: &str) -> Result<Command, DevModeError> {
    let mut parts = arg.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(name), None) => Ok(Command::DeleteMenu(name.to_string())),
        _ => Err(DevModeError::parse("usage: deletemenu <menu_name>")),
    }
}

fn menu_pair(cmd: &str, arg: &str) -> Result<(String, String), DevModeError> {
    let parts: Vec<&str> = arg.split_whitespace().collect();
    match parts.as_slice() {
        [first, second] => Ok((first.to_string(), second.to_string())),
        _ => Err(DevModeError::parse(format!(
            "usage: {} <menu1> <menu2>",
            cmd
        ))),
    }
}

/// Generic setter: `set <attr> <value>`, routed through the dedicated builders
fn build_set(arg: &str) -> Result<Command, DevModeError> {
    let (attr, value) = arg.split_once(' ').unwrap_or((arg, ""));
    match attr {
        "x" => Ok(Command::X(coord_arg("x", value)?)),
        "y" => Ok(Command::Y(coord_arg("y", value)?)),
        "width" => Ok(Command::Width(size_arg("width", value)?)),
        "height" => Ok(Command::Height(size_arg("height", value)?)),
        "fill_color" => Ok(Command::FillColor(rgb_arg("c", value)?)),
        "text_color" => Ok(Command::TextColor(rgb_arg("tc", value)?)),
        "handle_color" => Ok(Command::HandleColor(rgb_arg("hc", value)?)),
        "text" => Ok(Command::Text(value.to_string())),
        "font_size" => build_font_size(value),
        "alignment" => build_align(value.trim()),
        "alpha" => Ok(Command::Alpha(clamp_channel(int_arg("alpha", value)?))),
        "slider_value" => Ok(Command::SliderValue(number_arg("slider_value", value)?)),
        "slider_min" => Ok(Command::SliderMin(number_arg("slider_min", value)?)),
        "slider_max" => Ok(Command::SliderMax(number_arg("slider_max", value)?)),
        "toggle_state" => Ok(if bool_arg("toggle_state", value)? {
            Command::ToggleOn
        } else {
            Command::ToggleOff
        }),
        "visible" => Ok(Command::Visible(bool_arg("visible", value)?)),
        "image_path" => {
            let path = value.trim();
            Ok(Command::ImagePath(
                (!path.is_empty() && path != "none").then(|| path.to_string()),
            ))
        }
        "name" => build_rename(value),
        "" => Err(DevModeError::parse("usage: set <attr> <value>")),
        other => Err(DevModeError::parse(format!("unknown attribute: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_longest_prefix_first() {
        for pair in COMMANDS.windows(2) {
            assert!(
                pair[0].prefix.len() >= pair[1].prefix.len(),
                "'{}' listed before longer '{}'",
                pair[0].prefix,
                pair[1].prefix
            );
        }
    }

    #[test]
    fn test_overlapping_t_prefixes() {
        assert_eq!(Command::parse("tflip").unwrap(), Command::ToggleFlip);
        assert_eq!(Command::parse("ton").unwrap(), Command::ToggleOn);
        assert_eq!(Command::parse("toff").unwrap(), Command::ToggleOff);
        assert_eq!(
            Command::parse("tc10,20,30").unwrap(),
            Command::TextColor(Rgb(10, 20, 30))
        );
        assert_eq!(
            Command::parse("tHello World").unwrap(),
            Command::Text("Hello World".to_string())
        );
        // Argument-less keywords only match the whole line
        assert_eq!(
            Command::parse("toffee").unwrap(),
            Command::Text("offee".to_string())
        );
        assert_eq!(Command::parse("t").unwrap(), Command::Text(String::new()));
    }

    #[test]
    fn test_numeric_commands() {
        assert_eq!(Command::parse("x100").unwrap(), Command::X(100));
        assert_eq!(Command::parse("x-50").unwrap(), Command::X(-50));
        assert_eq!(Command::parse("y 20").unwrap(), Command::Y(20));
        assert_eq!(Command::parse("w200").unwrap(), Command::Width(200));
        assert_eq!(Command::parse("sv75").unwrap(), Command::SliderValue(75.0));
        assert_eq!(Command::parse("smin-2.5").unwrap(), Command::SliderMin(-2.5));
        assert_eq!(Command::parse("smax100").unwrap(), Command::SliderMax(100.0));
        assert_eq!(Command::parse("fs18").unwrap(), Command::FontSize(18));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("xabc"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("c255,0"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("cred"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("svnan"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("align middle"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("zoom"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("   "), Err(DevModeError::Parse(_))));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(Command::parse("w0"), Err(DevModeError::Validation(_))));
        assert!(matches!(Command::parse("h-5"), Err(DevModeError::Validation(_))));
        assert!(matches!(Command::parse("fs0"), Err(DevModeError::Validation(_))));
        assert!(matches!(
            Command::parse("add spaceship"),
            Err(DevModeError::Validation(_))
        ));
        assert!(matches!(Command::parse("n   "), Err(DevModeError::Validation(_))));
        assert!(matches!(
            Command::parse("fs2147483648"),
            Err(DevModeError::Validation(_))
        ));
        assert!(matches!(
            Command::parse("x99999999999999999999"),
            Err(DevModeError::Validation(_))
        ));
        assert_eq!(
            Command::parse("fs2147483647").unwrap(),
            Command::FontSize(2147483647)
        );
    }

    #[test]
    fn test_colors_are_clamped() {
        assert_eq!(
            Command::parse("c300,-1,128").unwrap(),
            Command::FillColor(Rgb(255, 0, 128))
        );
        assert_eq!(
            Command::parse("hc 1, 2, 3").unwrap(),
            Command::HandleColor(Rgb(1, 2, 3))
        );
        assert_eq!(Command::parse("a999").unwrap(), Command::Alpha(255));
        assert_eq!(Command::parse("a-4").unwrap(), Command::Alpha(0));
    }

    #[test]
    fn test_integers_beyond_i64_are_clamped() {
        assert_eq!(
            Command::parse("c99999999999999999999,0,0").unwrap(),
            Command::FillColor(Rgb(255, 0, 0))
        );
        assert_eq!(
            Command::parse("tc0,-99999999999999999999,7").unwrap(),
            Command::TextColor(Rgb(0, 0, 7))
        );
        assert_eq!(
            Command::parse("a-99999999999999999999").unwrap(),
            Command::Alpha(0)
        );
        assert_eq!(
            Command::parse("a99999999999999999999").unwrap(),
            Command::Alpha(255)
        );
        // Still rejected when the text is not an integer at all
        assert!(matches!(Command::parse("c9x,0,0"), Err(DevModeError::Parse(_))));
        assert!(matches!(Command::parse("a--1"), Err(DevModeError::Parse(_))));
    }

    #[test]
    fn test_add_variants() {
        assert_eq!(
            Command::parse("add button foo").unwrap(),
            Command::Add {
                kind: ElementKind::Button,
                name: Some("foo".to_string())
            }
        );
        assert_eq!(
            Command::parse("add text_display").unwrap(),
            Command::Add {
                kind: ElementKind::TextDisplay,
                name: None
            }
        );
        assert!(matches!(Command::parse("add"), Err(DevModeError::Parse(_))));
    }

    #[test]
    fn test_keywords_need_separator() {
        assert_eq!(
            Command::parse("align right").unwrap(),
            Command::Align(Alignment::Right)
        );
        // "addx" is not "add": falls through to alpha and fails there
        assert!(matches!(Command::parse("addx"), Err(DevModeError::Parse(_))));
        assert_eq!(Command::parse("del").unwrap(), Command::Delete);
        assert_eq!(
            Command::parse("deletemenu pause").unwrap(),
            Command::DeleteMenu("pause".to_string())
        );
    }

    #[test]
    fn test_menu_commands() {
        assert_eq!(
            Command::parse("addexclusion settings pause").unwrap(),
            Command::AddExclusion("settings".to_string(), "pause".to_string())
        );
        assert!(matches!(
            Command::parse("removeexclusion settings"),
            Err(DevModeError::Parse(_))
        ));
        assert_eq!(Command::parse("listmenus").unwrap(), Command::ListMenus);
    }

    #[test]
    fn test_set_routes_through_builders() {
        assert_eq!(Command::parse("set x 12").unwrap(), Command::X(12));
        assert_eq!(
            Command::parse("set fill_color 1,2,3").unwrap(),
            Command::FillColor(Rgb(1, 2, 3))
        );
        assert_eq!(
            Command::parse("set text Roll dice").unwrap(),
            Command::Text("Roll dice".to_string())
        );
        assert_eq!(Command::parse("set toggle_state on").unwrap(), Command::ToggleOn);
        assert_eq!(
            Command::parse("set image_path none").unwrap(),
            Command::ImagePath(None)
        );
        assert!(matches!(
            Command::parse("set width 0"),
            Err(DevModeError::Validation(_))
        ));
        assert!(matches!(
            Command::parse("set colour 1,2,3"),
            Err(DevModeError::Parse(_))
        ));
    }

    #[test]
    fn test_trailing_newline_is_ignored() {
        assert_eq!(Command::parse("0\n").unwrap(), Command::ToggleDevMode);
        assert_eq!(
            Command::parse("tHi\r\n").unwrap(),
            Command::Text("Hi".to_string())
        );
    }

    #[test]
    fn test_selection_requirements() {
        assert!(Command::X(1).requires_selection());
        assert!(Command::PrintInfo.requires_selection());
        assert!(!Command::Delete.requires_selection());
        assert!(!Command::OverrideLayout.requires_selection());
        assert!(!Command::ToggleDevMode.requires_selection());
    }
}
