//! Declarative view trees and the two builder front-ends.
//!
//! - [`ViewNode`] — the single tree representation both builders produce.
//! - [`chained`] — children as an ordered argument list, options by chaining.
//! - [`nested`] — options up front, children appended by a block.
//! - [`props`] — the closed option set and typed values.
//! - [`Handler`] — click handlers with an explicit capture record.

pub mod chained;
pub mod handler;
pub mod nested;
pub mod node;
pub mod props;

pub use handler::{Capture, Handler, HandlerResult};
pub use node::{Attributes, Key, NodeKind, ViewNode};
pub use props::{Alignment, Color, Prop, PropError, PropValue, ValueType, Variant};
