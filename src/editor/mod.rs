//! Text buffer adapters for hosts without a UI surface of their own.
//!
//! Provides a rope-backed text buffer with a selection, and a detachable
//! handle that implements [`TextBuffer`](crate::text::TextBuffer) on top of
//! it.

mod buffer;
mod handle;

pub use buffer::EditorBuffer;
pub use handle::BufferHandle;
