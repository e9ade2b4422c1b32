//! Everything a component author usually needs.
//!
//! ```ignore
//! use kumiki_core::prelude::*;
//! ```

pub use crate::app::{App, AppConfig};
pub use crate::component::{Component, RenderError, Scope, ViewResult};
pub use crate::host::{HeadlessHost, Host, HostError, TerminalHost};
pub use crate::reactive::{ComponentId, Mailbox, Remote, State, StateAccessError};
pub use crate::reconcile::{Patch, PatchOp};
pub use crate::theme::{Palette, ThemeRegistry};
pub use crate::view::chained::{button, checkbox, column, container, divider, input, row, spacer, text};
pub use crate::view::nested::{self, Options, Ui};
pub use crate::view::{Alignment, Attributes, Color, Handler, Key, NodeKind, Variant, ViewNode};
