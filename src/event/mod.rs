//! Event system: terminal input, key commands, activation dispatch.

pub mod dispatch;
pub mod input;

pub use dispatch::{dispatch, find_activatable, node_at, Activation, DispatchError};
pub use input::{Command, InputEvent, Key, KeyEvent, Modifiers};
