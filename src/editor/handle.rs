use std::cell::RefCell;
use std::rc::Rc;

use super::EditorBuffer;
use crate::error::{Error, Result};
use crate::text::{SelectionRange, TextBuffer, TextState};

/// A shared reference to an [`EditorBuffer`] that may not be attached yet.
///
/// Clones point at the same slot, so a host can hand one clone to a
/// dispatcher and keep another to mount, unmount or inspect the buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferHandle {
    slot: Rc<RefCell<Option<EditorBuffer>>>,
}

impl BufferHandle {
    /// A handle attached to `buffer`.
    pub fn new(buffer: EditorBuffer) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(buffer))),
        }
    }

    /// A handle with nothing attached.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Attach `buffer`, returning the one it replaced.
    pub fn attach(&self, buffer: EditorBuffer) -> Option<EditorBuffer> {
        self.slot.borrow_mut().replace(buffer)
    }

    /// Detach and return the current buffer.
    pub fn detach(&self) -> Option<EditorBuffer> {
        self.slot.borrow_mut().take()
    }

    pub fn is_attached(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Full text of the attached buffer.
    pub fn text(&self) -> Option<String> {
        self.slot.borrow().as_ref().map(EditorBuffer::text)
    }

    fn with_live<R>(&self, f: impl FnOnce(&mut EditorBuffer) -> R) -> Result<R> {
        let mut slot = self.slot.borrow_mut();
        let Some(buffer) = slot.as_mut() else {
            tracing::warn!("text buffer accessed while detached");
            return Err(Error::BufferUnavailable(
                "no editor buffer is attached".to_string(),
            ));
        };
        Ok(f(buffer))
    }
}

impl TextBuffer for BufferHandle {
    fn state(&self) -> Result<TextState> {
        self.with_live(|buffer| buffer.snapshot())
    }

    fn set_selection_range(&self, range: SelectionRange) -> Result<TextState> {
        self.with_live(|buffer| {
            buffer.select(range);
            buffer.snapshot()
        })
    }

    fn replace_selection(&self, text: &str) -> Result<TextState> {
        self.with_live(|buffer| {
            buffer.replace_selection(text);
            buffer.snapshot()
        })
    }
}
