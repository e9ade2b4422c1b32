//! Named color palettes and the current-theme setting.
//!
//! The registry is process configuration shared by reference (`Rc`) between
//! the app, the renderer and any component that switches themes from a click
//! handler. `view()` never reads it: a component that displays the active
//! theme keeps its own state cell for that.

use std::cell::Cell;
use std::fmt;

use crate::view::{Color, Variant};

/// Errors selecting a theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
    #[error("theme index {0} out of range")]
    IndexOutOfRange(usize),
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// One named palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub background: Color,
    pub surface: Color,
    pub foreground: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,
}

impl Palette {
    /// Color used for a button of the given visual variant.
    pub fn variant_color(&self, variant: Variant) -> Color {
        match variant {
            Variant::Normal => self.accent,
            Variant::Info => self.info,
            Variant::Success => self.success,
            Variant::Warning => self.warning,
            Variant::Danger => self.danger,
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub const TOKYO_NIGHT: Palette = Palette {
    name: "Tokyo Night",
    background: Color(0xFF1A1B26),
    surface: Color(0xFF24283B),
    foreground: Color(0xFFC0CAF5),
    accent: Color(0xFF7AA2F7),
    success: Color(0xFF9ECE6A),
    warning: Color(0xFFE0AF68),
    danger: Color(0xFFF7768E),
    info: Color(0xFF7DCFFF),
};

pub const NORD: Palette = Palette {
    name: "Nord",
    background: Color(0xFF2E3440),
    surface: Color(0xFF3B4252),
    foreground: Color(0xFFECEFF4),
    accent: Color(0xFF88C0D0),
    success: Color(0xFFA3BE8C),
    warning: Color(0xFFEBCB8B),
    danger: Color(0xFFBF616A),
    info: Color(0xFF81A1C1),
};

pub const DRACULA: Palette = Palette {
    name: "Dracula",
    background: Color(0xFF282A36),
    surface: Color(0xFF44475A),
    foreground: Color(0xFFF8F8F2),
    accent: Color(0xFFBD93F9),
    success: Color(0xFF50FA7B),
    warning: Color(0xFFF1FA8C),
    danger: Color(0xFFFF5555),
    info: Color(0xFF8BE9FD),
};

pub const CATPPUCCIN: Palette = Palette {
    name: "Catppuccin",
    background: Color(0xFF1E1E2E),
    surface: Color(0xFF313244),
    foreground: Color(0xFFCDD6F4),
    accent: Color(0xFF89B4FA),
    success: Color(0xFFA6E3A1),
    warning: Color(0xFFF9E2AF),
    danger: Color(0xFFF38BA8),
    info: Color(0xFF89DCEB),
};

/// The built-in palettes, in display order.
pub const BUILTIN: [Palette; 4] = [TOKYO_NIGHT, NORD, DRACULA, CATPPUCCIN];

// ---------------------------------------------------------------------------
// ThemeRegistry
// ---------------------------------------------------------------------------

/// A fixed list of palettes plus the index of the active one.
///
/// The setter takes `&self` so a shared `Rc<ThemeRegistry>` can be switched
/// from inside a click handler.
#[derive(Debug)]
pub struct ThemeRegistry {
    palettes: Vec<Palette>,
    current: Cell<usize>,
    /// Bumped on every change, so renderers can tell when to repaint.
    generation: Cell<u64>,
}

impl ThemeRegistry {
    /// Registry over `palettes`, with the first one active.
    pub fn new(palettes: Vec<Palette>) -> Self {
        Self {
            palettes,
            current: Cell::new(0),
            generation: Cell::new(0),
        }
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.palettes.iter().map(|p| p.name)
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    /// Index of a palette by name (ASCII case-insensitive).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.palettes.iter().position(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn current_index(&self) -> usize {
        self.current.get()
    }

    /// The active palette. Falls back to Tokyo Night on an empty registry.
    pub fn current(&self) -> Palette {
        self.palettes.get(self.current.get()).copied().unwrap_or(TOKYO_NIGHT)
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Activate the palette at `index`.
    pub fn set_current_index(&self, index: usize) -> Result<&Palette, ThemeError> {
        let palette = self.palettes.get(index).ok_or(ThemeError::IndexOutOfRange(index))?;
        if self.current.replace(index) != index {
            self.generation.set(self.generation.get() + 1);
            tracing::debug!(theme = palette.name, "theme changed");
        }
        Ok(palette)
    }

    /// Activate the palette called `name`.
    pub fn set_current(&self, name: &str) -> Result<&Palette, ThemeError> {
        let index = self
            .position(name)
            .ok_or_else(|| ThemeError::UnknownTheme(name.to_owned()))?;
        self.set_current_index(index)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(BUILTIN.to_vec())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
