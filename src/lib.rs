// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. commands::CommandMap)
    clippy::module_name_repetitions
)]

//! # Markcraft
//!
//! Selection-aware markdown formatting commands.
//!
//! Markcraft applies bold, italic, headings, lists, links, quotes and code
//! markup to a span of text addressed by a selection range, and toggles the
//! inline markers back off when they are already present.
//!
//! ## Architecture
//!
//! Data flows one way:
//! - **Dispatcher** reads the current buffer state
//! - **Command** decides how to mutate text and selection
//! - **Buffer** applies each mutation and returns a fresh snapshot
//!
//! The dispatcher never touches a UI surface directly; anything that
//! implements [`TextBuffer`] can be driven.
//!
//! ## Modules
//!
//! - [`text`]: Selection ranges, snapshots, the buffer contract and pure helpers
//! - [`commands`]: The command bundle, the registry and the standard catalog
//! - [`dispatch`]: One-at-a-time command execution with undo detection
//! - [`editor`]: Rope-backed buffer adapter
//! - [`config`]: Saved defaults for the command-line host

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod text;

pub use error::{Error, Result};
pub use text::TextBuffer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commands::{Command, CommandContext, CommandMap, ExecuteOptions};
    pub use crate::dispatch::{CommandDispatcher, Execution};
    pub use crate::editor::{BufferHandle, EditorBuffer};
    pub use crate::error::{Error, Result};
    pub use crate::text::{SelectionRange, TextBuffer, TextState};
}
