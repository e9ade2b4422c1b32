//! Widget options: the closed set of recognized property names and their
//! typed values.
//!
//! Keyword-style options are parsed into [`Prop`] via `FromStr`; unknown names
//! are rejected with [`PropError::UnknownProp`] instead of being carried along.

use std::fmt;
use std::str::FromStr;

use crate::geometry::Spacing;

/// Errors from setting or parsing widget options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropError {
    #[error("unknown widget option `{0}`")]
    UnknownProp(String),
    #[error("{kind} does not accept option `{prop}`")]
    Unsupported { kind: super::node::NodeKind, prop: Prop },
    #[error("option `{prop}` expects a {expected} value")]
    WrongType { prop: Prop, expected: ValueType },
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("invalid alignment `{0}`")]
    InvalidAlignment(String),
    #[error("invalid kind variant {0}")]
    InvalidVariant(u8),
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A color packed as `0xAARRGGBB`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const TRANSPARENT: Color = Color(0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    /// Color from ARGB components.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse `#rgb`, `#rrggbb` or `#aarrggbb`.
    pub fn from_hex(s: &str) -> Result<Self, PropError> {
        let invalid = || PropError::InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            3 => {
                let r = ((value >> 8) & 0xF) as u8;
                let g = ((value >> 4) & 0xF) as u8;
                let b = (value & 0xF) as u8;
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => Ok(Color(0xFF00_0000 | value)),
            8 => Ok(Color(value)),
            _ => Err(invalid()),
        }
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "#{:06x}", self.0 & 0x00FF_FFFF)
        } else {
            write!(f, "#{:08x}", self.0)
        }
    }
}

impl FromStr for Color {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Horizontal alignment of text or children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        })
    }
}

impl FromStr for Alignment {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(PropError::InvalidAlignment(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Visual variant ("kind") of a button.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Variant {
    #[default]
    Normal = 0,
    Info = 1,
    Success = 2,
    Warning = 3,
    Danger = 4,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Normal,
        Variant::Info,
        Variant::Success,
        Variant::Warning,
        Variant::Danger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Normal => "normal",
            Variant::Info => "info",
            Variant::Success => "success",
            Variant::Warning => "warning",
            Variant::Danger => "danger",
        }
    }
}

impl TryFrom<u8> for Variant {
    type Error = PropError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Variant::ALL
            .get(value as usize)
            .copied()
            .ok_or(PropError::InvalidVariant(value))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Prop / PropValue
// ---------------------------------------------------------------------------

/// Recognized widget option names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    Text,
    Padding,
    Spacing,
    FontSize,
    Color,
    Background,
    Align,
    Width,
    Height,
    Checked,
    Kind,
    Placeholder,
    Value,
}

impl Prop {
    /// The value type this option carries.
    pub fn value_type(self) -> ValueType {
        match self {
            Prop::Text | Prop::Placeholder | Prop::Value => ValueType::Text,
            Prop::Padding => ValueType::Spacing,
            Prop::Spacing | Prop::FontSize | Prop::Width | Prop::Height => ValueType::Number,
            Prop::Color | Prop::Background => ValueType::Color,
            Prop::Align => ValueType::Align,
            Prop::Checked => ValueType::Bool,
            Prop::Kind => ValueType::Variant,
        }
    }

    /// Keyword spelling, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Prop::Text => "text",
            Prop::Padding => "padding",
            Prop::Spacing => "spacing",
            Prop::FontSize => "font_size",
            Prop::Color => "color",
            Prop::Background => "background",
            Prop::Align => "align",
            Prop::Width => "width",
            Prop::Height => "height",
            Prop::Checked => "checked",
            Prop::Kind => "kind",
            Prop::Placeholder => "placeholder",
            Prop::Value => "value",
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prop {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "text" | "label" => Prop::Text,
            "padding" => Prop::Padding,
            "spacing" => Prop::Spacing,
            "font_size" => Prop::FontSize,
            "color" => Prop::Color,
            "background" | "bg" => Prop::Background,
            "align" => Prop::Align,
            "width" | "fixed_width" => Prop::Width,
            "height" | "fixed_height" => Prop::Height,
            "checked" => Prop::Checked,
            "kind" => Prop::Kind,
            "placeholder" => Prop::Placeholder,
            "value" => Prop::Value,
            other => return Err(PropError::UnknownProp(other.to_owned())),
        })
    }
}

/// Value type tags, for error messages and validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Number,
    Color,
    Align,
    Variant,
    Bool,
    Spacing,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Text => "text",
            ValueType::Number => "number",
            ValueType::Color => "color",
            ValueType::Align => "alignment",
            ValueType::Variant => "kind",
            ValueType::Bool => "boolean",
            ValueType::Spacing => "spacing",
        })
    }
}

/// A typed option value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropValue {
    Text(String),
    Number(u32),
    Color(Color),
    Align(Alignment),
    Variant(Variant),
    Bool(bool),
    Spacing(Spacing),
}

impl PropValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            PropValue::Text(_) => ValueType::Text,
            PropValue::Number(_) => ValueType::Number,
            PropValue::Color(_) => ValueType::Color,
            PropValue::Align(_) => ValueType::Align,
            PropValue::Variant(_) => ValueType::Variant,
            PropValue::Bool(_) => ValueType::Bool,
            PropValue::Spacing(_) => ValueType::Spacing,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Parse a keyword-style option value for `prop`.
    pub fn parse(prop: Prop, raw: &str) -> Result<Self, PropError> {
        let wrong = || PropError::WrongType { prop, expected: prop.value_type() };
        Ok(match prop.value_type() {
            ValueType::Text => PropValue::Text(raw.to_owned()),
            ValueType::Number => PropValue::Number(raw.parse().map_err(|_| wrong())?),
            ValueType::Color => PropValue::Color(raw.parse()?),
            ValueType::Align => PropValue::Align(raw.parse()?),
            ValueType::Variant => {
                let n: u8 = raw.parse().map_err(|_| wrong())?;
                PropValue::Variant(Variant::try_from(n)?)
            }
            ValueType::Bool => PropValue::Bool(raw.parse().map_err(|_| wrong())?),
            ValueType::Spacing => PropValue::Spacing(Spacing::all(raw.parse().map_err(|_| wrong())?)),
        })
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => write!(f, "{s:?}"),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Color(c) => write!(f, "{c}"),
            PropValue::Align(a) => write!(f, "{a}"),
            PropValue::Variant(v) => write!(f, "{v}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Spacing(s) => write!(f, "{s}"),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
