//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a real
//! terminal. Use [`tree_to_string`] and related helpers to capture trees and
//! patches as plain text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{lines_to_string, paint_to_string, patch_to_string, tree_to_string, widgets_to_string};
