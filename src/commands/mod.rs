//! Markdown formatting commands and the registry that names them.
//!
//! A [`Command`] is a declarative bundle: a required `execute` transition,
//! plus an optional `should_undo` predicate and `undo` transition. The
//! standard catalog lives in [`inline`] (markers wrapped around a word or
//! span) and [`block`] (headings, lists, quotes, fenced code).

pub mod block;
pub mod inline;

use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use crate::error::Result;
use crate::text::{TextBuffer, TextState};

pub use block::{
    checked_list, code_block, heading, make_list, ordered_list, quote, set_header, unordered_list,
};
pub use inline::{
    DEFAULT_IMAGE_PLACEHOLDER, bold, code, image, image_with_placeholder, italic, link,
    strikethrough,
};

/// Free-form metadata handed through to a command's `execute`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub kind: String,
}

impl CommandContext {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Arguments of a deferred `execute` transition.
///
/// Everything is owned so the returned future can outlive the call that
/// started it; the dispatcher keeps it until it settles.
pub struct ExecuteOptions {
    /// Buffer state captured when the command was started.
    pub initial_state: TextState,
    pub text_api: Rc<dyn TextBuffer>,
    pub context: Option<CommandContext>,
}

type ImmediateFn = Box<dyn Fn(&TextState, &dyn TextBuffer) -> Result<()>>;
type DeferredFn = Box<dyn Fn(ExecuteOptions) -> LocalBoxFuture<'static, Result<()>>>;
type PredicateFn = Box<dyn Fn(&TextState) -> bool>;

enum Execute {
    /// Runs to completion before `execute_command` returns.
    Immediate(ImmediateFn),
    /// May suspend, e.g. to wait for input from the host.
    Deferred(DeferredFn),
}

/// How a command's `execute` transition was started.
pub(crate) enum Started {
    Finished(Result<()>),
    Pending(LocalBoxFuture<'static, Result<()>>),
}

/// A formatting command.
pub struct Command {
    execute: Execute,
    should_undo: Option<PredicateFn>,
    undo: Option<ImmediateFn>,
}

impl Command {
    /// A command whose `execute` runs synchronously.
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(&TextState, &dyn TextBuffer) -> Result<()> + 'static,
    {
        Self {
            execute: Execute::Immediate(Box::new(execute)),
            should_undo: None,
            undo: None,
        }
    }

    /// A command whose `execute` returns a future, awaited by the dispatcher.
    pub fn deferred<F, Fut>(execute: F) -> Self
    where
        F: Fn(ExecuteOptions) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        Self {
            execute: Execute::Deferred(Box::new(move |options| execute(options).boxed_local())),
            should_undo: None,
            undo: None,
        }
    }

    /// Predicate deciding whether the dispatcher runs `undo` instead of
    /// `execute`.
    #[must_use]
    pub fn with_should_undo<P>(mut self, should_undo: P) -> Self
    where
        P: Fn(&TextState) -> bool + 'static,
    {
        self.should_undo = Some(Box::new(should_undo));
        self
    }

    /// Transition reversing a previous `execute`.
    #[must_use]
    pub fn with_undo<U>(mut self, undo: U) -> Self
    where
        U: Fn(&TextState, &dyn TextBuffer) -> Result<()> + 'static,
    {
        self.undo = Some(Box::new(undo));
        self
    }

    /// Whether `undo` should run for `state`. Always false without a
    /// predicate.
    pub fn should_undo(&self, state: &TextState) -> bool {
        self.should_undo.as_ref().is_some_and(|p| p(state))
    }

    pub const fn has_undo(&self) -> bool {
        self.undo.is_some()
    }

    pub const fn is_deferred(&self) -> bool {
        matches!(self.execute, Execute::Deferred(_))
    }

    /// Run `undo` against `buffer`. `None` if the command has no undo.
    ///
    /// The caller must have checked [`Command::should_undo`]: undo assumes
    /// the markers it strips are present.
    pub fn undo(&self, state: &TextState, buffer: &dyn TextBuffer) -> Option<Result<()>> {
        self.undo.as_ref().map(|undo| undo(state, buffer))
    }

    /// Start `execute`. Immediate commands have finished when this returns.
    pub(crate) fn start(
        &self,
        initial_state: TextState,
        buffer: Rc<dyn TextBuffer>,
        context: Option<&CommandContext>,
    ) -> Started {
        match &self.execute {
            Execute::Immediate(execute) => Started::Finished(execute(&initial_state, &*buffer)),
            Execute::Deferred(execute) => Started::Pending(execute(ExecuteOptions {
                initial_state,
                text_api: buffer,
                context: context.cloned(),
            })),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("deferred", &self.is_deferred())
            .field("should_undo", &self.should_undo.is_some())
            .field("undo", &self.undo.is_some())
            .finish()
    }
}

/// Commands registered by name. Names are unique.
#[derive(Debug, Default)]
pub struct CommandMap {
    commands: HashMap<String, Command>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard markdown catalog:
    /// `bold`, `italic`, `strikethrough`, `code`, `code-block`, `link`,
    /// `image`, `quote`, `heading-1` to `heading-6`, `unordered-list`,
    /// `ordered-list` and `checked-list`.
    pub fn standard() -> Self {
        let mut map = Self::new()
            .with("bold", bold())
            .with("italic", italic())
            .with("strikethrough", strikethrough())
            .with("code", code())
            .with("code-block", code_block())
            .with("link", link())
            .with("image", image())
            .with("quote", quote())
            .with("unordered-list", unordered_list())
            .with("ordered-list", ordered_list())
            .with("checked-list", checked_list());
        for (name, command) in block::standard_headings() {
            map.insert(name, command);
        }
        map
    }

    /// Register `command` under `name`, returning the command it replaced.
    pub fn insert(&mut self, name: impl Into<String>, command: Command) -> Option<Command> {
        self.commands.insert(name.into(), command)
    }

    /// Builder form of [`CommandMap::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, command: Command) -> Self {
        self.insert(name, command);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::SelectionRange;

    #[test]
    fn test_standard_catalog_names() {
        let map = CommandMap::standard();
        assert_eq!(map.len(), 17);
        for name in [
            "bold",
            "italic",
            "strikethrough",
            "code",
            "code-block",
            "link",
            "image",
            "quote",
            "heading-1",
            "heading-6",
            "unordered-list",
            "ordered-list",
            "checked-list",
        ] {
            assert!(map.contains(name), "missing {name}");
        }
        assert!(!map.contains("heading-7"));
    }

    #[test]
    fn test_names_are_sorted() {
        let map = CommandMap::new()
            .with("quote", quote())
            .with("bold", bold())
            .with("link", link());
        assert_eq!(map.names(), vec!["bold", "link", "quote"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut map = CommandMap::new().with("x", bold());
        let replaced = map.insert("x", italic());
        assert!(replaced.is_some());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_undo_capabilities() {
        assert!(bold().has_undo());
        assert!(italic().has_undo());
        assert!(code().has_undo());
        assert!(!strikethrough().has_undo());
        assert!(!link().has_undo());
        assert!(!image().has_undo());
        assert!(!quote().has_undo());
    }

    #[test]
    fn test_should_undo_defaults_to_false() {
        let state = TextState::new("**x**", SelectionRange::new(2, 3));
        assert!(!strikethrough().should_undo(&state));
        assert!(bold().should_undo(&state));
    }

    #[test]
    fn test_undo_without_transition_is_none() {
        let handle = test_support::buffer("x", 0, 1);
        let state = handle.state().unwrap();
        assert!(link().undo(&state, &handle).is_none());
    }

    #[test]
    fn test_standard_headings_cover_every_level() {
        let map = CommandMap::standard();
        for level in 1..=6 {
            let command = map.get(&format!("heading-{level}")).unwrap();
            let state = test_support::run(command, "x", 0, 0);
            assert_eq!(state.text, format!("{} x", "#".repeat(level)));
        }
    }

    #[test]
    fn test_context_kind() {
        assert_eq!(CommandContext::new("toolbar").kind, "toolbar");
    }
}
