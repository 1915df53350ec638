//! UI element model - the records DevMode edits
//!
//! Every element shares an `ElementBase` (geometry, colors, text) and carries
//! type-specific data in its enum variant. The enum is internally tagged by
//! `type` so a layout document reads like a list of typed element tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Approximate glyph advance as a fraction of the font size (used by centertext)
const GLYPH_ADVANCE_RATIO: f64 = 0.6;

/// RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build a color from arbitrary integers, clamping each channel to 0-255
    pub fn clamped(r: i64, g: i64, b: i64) -> Self {
        Rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

/// Clamp an integer into the 0-255 range used by color channels and alpha
pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Horizontal text alignment inside an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Element type, as named by the `add` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Slider,
    Toggle,
    Image,
    TextDisplay,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Button,
        ElementKind::Slider,
        ElementKind::Toggle,
        ElementKind::Image,
        ElementKind::TextDisplay,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "button" => Some(Self::Button),
            "slider" => Some(Self::Slider),
            "toggle" => Some(Self::Toggle),
            "image" => Some(Self::Image),
            "text_display" => Some(Self::TextDisplay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Slider => "slider",
            Self::Toggle => "toggle",
            Self::Image => "image",
            Self::TextDisplay => "text_display",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_width() -> i32 {
    100
}

fn default_height() -> i32 {
    50
}

fn default_font_size() -> u32 {
    24
}

fn default_alpha() -> u8 {
    255
}

fn default_true() -> bool {
    true
}

/// Properties shared by ALL element types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBase {
    pub name: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub fill_color: Rgb,
    #[serde(default)]
    pub text_color: Rgb,
    #[serde(default)]
    pub handle_color: Rgb,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Menu this element belongs to (None = lives directly in the game state)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
    /// Top-left corner of the rendered text, set by centertext
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_anchor: Option<(i32, i32)>,
}

impl ElementBase {
    fn new(name: &str, width: i32, height: i32) -> Self {
        Self {
            name: name.to_string(),
            x: 100,
            y: 100,
            width,
            height,
            fill_color: Rgb::default(),
            text_color: Rgb::default(),
            handle_color: Rgb::default(),
            text: String::new(),
            font_size: default_font_size(),
            alignment: Alignment::Center,
            alpha: default_alpha(),
            visible: true,
            menu: None,
            text_anchor: None,
        }
    }

    /// Estimated rendered size of the current text
    pub fn text_extent(&self) -> (i64, i64) {
        let chars = self.text.chars().count() as f64;
        let width = (chars * self.font_size as f64 * GLYPH_ADVANCE_RATIO).round() as i64;
        (width, i64::from(self.font_size))
    }

    /// Place the text anchor so the text is centered within the element bounds
    /// and return it. Fails without touching the element when there is no text
    /// or the anchor does not fit in screen coordinates.
    pub fn center_text(&mut self) -> Result<(i32, i32), &'static str> {
        if self.text.is_empty() {
            return Err("has no text to center");
        }
        let (text_w, text_h) = self.text_extent();
        let x = i64::from(self.x) + (i64::from(self.width) - text_w) / 2;
        let y = i64::from(self.y) + (i64::from(self.height) - text_h) / 2;
        let anchor = match (i32::try_from(x), i32::try_from(y)) {
            (Ok(x), Ok(y)) => (x, y),
            _ => return Err("would place its text outside the coordinate range"),
        };
        self.text_anchor = Some(anchor);
        self.alignment = Alignment::Center;
        Ok(anchor)
    }
}

/// Slider-specific data; `min <= value <= max` holds after every setter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderData {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_slider_max")]
    pub max: f64,
}

fn default_slider_max() -> f64 {
    100.0
}

impl SliderData {
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        let mut data = Self { value, min, max };
        data.normalize();
        data
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Set the lower bound, raising max to match if it would be exceeded
    pub fn set_min(&mut self, min: f64) {
        self.min = min;
        if self.min > self.max {
            self.max = self.min;
        }
        self.value = self.value.clamp(self.min, self.max);
    }

    /// Set the upper bound, lowering min to match if it would be undercut
    pub fn set_max(&mut self, max: f64) {
        self.max = max;
        if self.max < self.min {
            self.min = self.max;
        }
        self.value = self.value.clamp(self.min, self.max);
    }

    /// False when any of value/min/max is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.min.is_finite() && self.max.is_finite()
    }

    /// Restore the ordering invariant on data that came from outside (config files).
    /// Callers must reject non-finite data first.
    pub fn normalize(&mut self) {
        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }
        self.value = self.value.clamp(self.min, self.max);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToggleData {
    #[serde(default)]
    pub on: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// One on-screen control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiElement {
    Button {
        #[serde(flatten)]
        base: ElementBase,
    },
    Slider {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        data: SliderData,
    },
    Toggle {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        data: ToggleData,
    },
    Image {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        data: ImageData,
    },
    TextDisplay {
        #[serde(flatten)]
        base: ElementBase,
    },
}

impl UiElement {
    /// Create an element of the given kind with the DevMode `add` defaults
    pub fn with_defaults(kind: ElementKind, name: &str) -> Self {
        match kind {
            ElementKind::Button => {
                let mut base = ElementBase::new(name, 150, 50);
                base.fill_color = Rgb(0, 100, 0);
                base.text_color = Rgb(255, 255, 255);
                base.text = "new button".to_string();
                UiElement::Button { base }
            }
            ElementKind::Slider => {
                let mut base = ElementBase::new(name, 200, 40);
                base.fill_color = Rgb(100, 0, 0);
                base.handle_color = Rgb(200, 200, 200);
                UiElement::Slider {
                    base,
                    data: SliderData::new(0.0, 100.0, 50.0),
                }
            }
            ElementKind::Toggle => {
                let mut base = ElementBase::new(name, 150, 50);
                base.fill_color = Rgb(90, 90, 90);
                base.handle_color = Rgb(230, 230, 230);
                UiElement::Toggle {
                    base,
                    data: ToggleData { on: false },
                }
            }
            ElementKind::Image => UiElement::Image {
                base: ElementBase::new(name, 100, 100),
                data: ImageData::default(),
            },
            ElementKind::TextDisplay => {
                let mut base = ElementBase::new(name, 200, 50);
                base.fill_color = Rgb(200, 200, 200);
                base.text = "new text display".to_string();
                UiElement::TextDisplay { base }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            UiElement::Button { .. } => ElementKind::Button,
            UiElement::Slider { .. } => ElementKind::Slider,
            UiElement::Toggle { .. } => ElementKind::Toggle,
            UiElement::Image { .. } => ElementKind::Image,
            UiElement::TextDisplay { .. } => ElementKind::TextDisplay,
        }
    }

    pub fn base(&self) -> &ElementBase {
        match self {
            UiElement::Button { base }
            | UiElement::Slider { base, .. }
            | UiElement::Toggle { base, .. }
            | UiElement::Image { base, .. }
            | UiElement::TextDisplay { base } => base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            UiElement::Button { base }
            | UiElement::Slider { base, .. }
            | UiElement::Toggle { base, .. }
            | UiElement::Image { base, .. }
            | UiElement::TextDisplay { base } => base,
        }
    }

    pub fn slider(&self) -> Option<&SliderData> {
        match self {
            UiElement::Slider { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn slider_mut(&mut self) -> Option<&mut SliderData> {
        match self {
            UiElement::Slider { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Option<&ToggleData> {
        match self {
            UiElement::Toggle { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn toggle_mut(&mut self) -> Option<&mut ToggleData> {
        match self {
            UiElement::Toggle { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageData> {
        match self {
            UiElement::Image { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Fix up values loaded from disk so the element invariants hold
    pub fn normalize(&mut self) {
        if let Some(slider) = self.slider_mut() {
            slider.normalize();
        }
        let base = self.base_mut();
        base.width = base.width.max(1);
        base.height = base.height.max(1);
        base.font_size = base.font_size.max(1);
    }

    /// Multi-line summary used by `print_info`
    pub fn describe(&self) -> String {
        let base = self.base();
        let mut lines = vec![
            format!("{} ({})", base.name, self.kind()),
            format!(
                "  rect: x={} y={} w={} h={}",
                base.x, base.y, base.width, base.height
            ),
            format!(
                "  colors: fill={} text={} handle={} alpha={}",
                base.fill_color, base.text_color, base.handle_color, base.alpha
            ),
            format!(
                "  text: {:?} (size {}, {})",
                base.text,
                base.font_size,
                base.alignment.as_str()
            ),
            format!("  visible: {}", base.visible),
        ];
        if let Some(menu) = &base.menu {
            lines.push(format!("  menu: {}", menu));
        }
        match self {
            UiElement::Slider { data, .. } => lines.push(format!(
                "  slider: value={} min={} max={}",
                data.value, data.min, data.max
            )),
            UiElement::Toggle { data, .. } => lines.push(format!("  toggle: on={}", data.on)),
            UiElement::Image { data, .. } => lines.push(format!(
                "  image: {}",
                data.image_path.as_deref().unwrap_or("(none)")
            )),
            _ => {}
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_clamps_channels() {
        assert_eq!(Rgb::clamped(300, -20, 128), Rgb(255, 0, 128));
    }

    #[test]
    fn test_slider_defaults_satisfy_invariant() {
        let slider = UiElement::with_defaults(ElementKind::Slider, "s1");
        let data = slider.slider().expect("slider data");
        assert_eq!(data.min, 0.0);
        assert!(data.min <= data.value && data.value <= data.max);
    }

    #[test]
    fn test_slider_min_above_max_raises_max() {
        let mut data = SliderData::new(0.0, 100.0, 50.0);
        data.set_min(150.0);
        assert_eq!(data.min, 150.0);
        assert_eq!(data.max, 150.0);
        assert_eq!(data.value, 150.0);
    }

    #[test]
    fn test_slider_max_below_min_lowers_min() {
        let mut data = SliderData::new(10.0, 100.0, 50.0);
        data.set_max(5.0);
        assert_eq!(data.max, 5.0);
        assert_eq!(data.min, 5.0);
        assert_eq!(data.value, 5.0);
    }

    #[test]
    fn test_center_text() {
        let mut base = ElementBase::new("b", 200, 50);
        base.x = 0;
        base.y = 0;
        base.font_size = 10;
        base.text = "abcd".to_string();
        base.alignment = Alignment::Left;

        // 4 chars * 10 * 0.6 = 24 wide, 10 tall
        assert_eq!(base.center_text(), Ok((88, 20)));
        assert_eq!(base.text_anchor, Some((88, 20)));
        assert_eq!(base.alignment, Alignment::Center);

        base.text.clear();
        assert!(base.center_text().is_err());
    }

    #[test]
    fn test_center_text_with_extreme_geometry() {
        let mut base = ElementBase::new("b", i32::MAX, i32::MAX);
        base.x = i32::MAX;
        base.y = i32::MAX;
        base.text = "A".to_string();
        base.alignment = Alignment::Left;
        assert!(base.center_text().is_err());
        assert_eq!(base.text_anchor, None);
        assert_eq!(base.alignment, Alignment::Left);

        // Huge font with tiny bounds lands far off-screen but still fits in i32
        let mut base = ElementBase::new("b", 10, 10);
        base.font_size = u32::MAX;
        base.text = "A".to_string();
        assert!(base.center_text().is_ok());
        assert!(base.text_extent().1 > 0);
    }

    #[test]
    fn test_kind_names() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ElementKind::from_str("scrollable_area"), None);
    }

    #[test]
    fn test_element_toml_tagging() {
        let element = UiElement::with_defaults(ElementKind::Toggle, "sound");
        let text = toml::to_string(&element).expect("serialize");
        assert!(text.contains("type = \"toggle\""));
        let back: UiElement = toml::from_str(&text).expect("deserialize");
        assert_eq!(back, element);
    }
}
