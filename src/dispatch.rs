//! Command dispatcher.
//!
//! Runs one command at a time against a single [`TextBuffer`], choosing
//! between a command's `execute` and `undo` transitions. The dispatcher is
//! either idle or executing; a call made while executing is dropped rather
//! than queued, because a queued command's preconditions (selection,
//! surrounding markers) may no longer hold once the running one has
//! changed the buffer.
//!
//! A started command is never abandoned. A deferred transition lives in
//! the dispatcher, not in the [`Execution`] handed to the caller, so the
//! dispatcher stays busy until that transition settles even if the handle
//! is dropped; [`CommandDispatcher::drive`] resumes it.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, ready};

use futures_util::future::LocalBoxFuture;

use crate::commands::{CommandContext, CommandMap, Started};
use crate::error::{Error, Result};
use crate::text::TextBuffer;

/// Clears the busy flag when dropped.
struct ExecutingGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ExecutingGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }

    /// Leave the flag set; whoever settles the in-flight transition clears it.
    fn keep(self) {
        std::mem::forget(self);
    }
}

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Busy flag plus the deferred transition still running, if any.
#[derive(Default)]
struct InFlight {
    executing: Cell<bool>,
    pending: RefCell<Option<LocalBoxFuture<'static, Result<()>>>>,
}

impl InFlight {
    /// Poll the pending transition. The dispatcher goes idle once it
    /// settles, panics included. `None` if nothing is pending.
    fn poll_pending(&self, cx: &mut Context<'_>) -> Poll<Option<Result<()>>> {
        let Some(mut future) = self.pending.borrow_mut().take() else {
            return Poll::Ready(None);
        };
        let guard = ExecutingGuard::acquire(&self.executing);
        match future.as_mut().poll(cx) {
            Poll::Ready(result) => Poll::Ready(Some(result)),
            Poll::Pending => {
                *self.pending.borrow_mut() = Some(future);
                guard.keep();
                Poll::Pending
            }
        }
    }
}

enum Outcome<'a> {
    /// Dropped because another command was running.
    Skipped,
    /// The transition already ran; the guard holds the dispatcher until
    /// the result is taken or the execution is dropped.
    Finished(Option<Result<()>>, Option<ExecutingGuard<'a>>),
    /// A deferred transition owned by the dispatcher.
    Deferred(&'a InFlight),
}

/// A started command.
///
/// Awaiting it yields the transition's result. Dropping it before a
/// deferred transition settles does not cancel that transition: the
/// dispatcher stays busy until [`CommandDispatcher::drive`] runs it to the
/// end.
#[must_use = "the result of the command is only reported by awaiting the execution"]
pub struct Execution<'a> {
    outcome: Outcome<'a>,
}

impl<'a> Execution<'a> {
    const fn skipped() -> Self {
        Self {
            outcome: Outcome::Skipped,
        }
    }

    fn finished(result: Result<()>, guard: ExecutingGuard<'a>) -> Self {
        Self {
            outcome: Outcome::Finished(Some(result), Some(guard)),
        }
    }

    const fn deferred(in_flight: &'a InFlight) -> Self {
        Self {
            outcome: Outcome::Deferred(in_flight),
        }
    }

    /// True if the call was dropped because another command was running.
    pub const fn was_skipped(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped)
    }
}

impl std::fmt::Debug for Execution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let outcome = match &self.outcome {
            Outcome::Skipped => "skipped",
            Outcome::Finished(Some(_), _) => "ready",
            Outcome::Finished(None, _) => "done",
            Outcome::Deferred(_) => "deferred",
        };
        f.debug_struct("Execution").field("outcome", &outcome).finish()
    }
}

impl Future for Execution<'_> {
    type Output = Result<()>;

    /// A deferred transition settled through another handle reports `Ok`;
    /// its result went to whoever drove it.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let result = match &mut this.outcome {
            Outcome::Skipped => Ok(()),
            Outcome::Finished(result, guard) => {
                guard.take();
                result.take().unwrap_or(Ok(()))
            }
            Outcome::Deferred(in_flight) => {
                let result = ready!(in_flight.poll_pending(cx)).unwrap_or(Ok(()));
                this.outcome = Outcome::Finished(None, None);
                result
            }
        };
        Poll::Ready(result)
    }
}

/// Serializes commands from a [`CommandMap`] against one buffer.
pub struct CommandDispatcher<B> {
    buffer: Rc<B>,
    commands: CommandMap,
    in_flight: InFlight,
}

impl<B: TextBuffer + 'static> CommandDispatcher<B> {
    pub fn new(buffer: B, commands: CommandMap) -> Self {
        Self {
            buffer: Rc::new(buffer),
            commands,
            in_flight: InFlight::default(),
        }
    }

    /// Whether a command is in flight.
    pub fn is_executing(&self) -> bool {
        self.in_flight.executing.get()
    }

    /// Whether a deferred transition is waiting to be driven.
    pub fn has_pending(&self) -> bool {
        self.in_flight.pending.borrow().is_some()
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub const fn commands(&self) -> &CommandMap {
        &self.commands
    }

    /// Start the command registered as `name`.
    ///
    /// While another command is in flight the call is a no-op and the
    /// returned execution reports [`Execution::was_skipped`]. Otherwise the
    /// buffer state is read and, if the command's `should_undo` holds and it
    /// has an `undo`, `undo` runs; if not, `execute` is started. Immediate
    /// transitions have already run when this returns; deferred ones run as
    /// the execution (or [`CommandDispatcher::drive`]) is polled.
    ///
    /// # Errors
    /// Returns [`Error::CommandNotFound`] for an unregistered name, before
    /// the dispatcher becomes busy, and propagates a failure to read the
    /// buffer state. Errors raised by the transition itself are the output
    /// of the returned execution.
    pub fn execute_command(
        &self,
        name: &str,
        context: Option<&CommandContext>,
    ) -> Result<Execution<'_>> {
        if self.is_executing() {
            tracing::debug!(command = name, "command dropped while another is executing");
            return Ok(Execution::skipped());
        }
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| Error::CommandNotFound(name.to_string()))?;

        let guard = ExecutingGuard::acquire(&self.in_flight.executing);
        let initial_state = self.buffer.state()?;

        if command.should_undo(&initial_state) {
            if let Some(result) = command.undo(&initial_state, &*self.buffer) {
                tracing::debug!(command = name, selection = %initial_state.selection, "undo");
                return Ok(Execution::finished(result, guard));
            }
        }

        tracing::debug!(command = name, selection = %initial_state.selection, "execute");
        let buffer = Rc::clone(&self.buffer) as Rc<dyn TextBuffer>;
        Ok(match command.start(initial_state, buffer, context) {
            Started::Finished(result) => Execution::finished(result, guard),
            Started::Pending(future) => {
                *self.in_flight.pending.borrow_mut() = Some(future);
                guard.keep();
                Execution::deferred(&self.in_flight)
            }
        })
    }

    /// Resume the deferred transition left running by a dropped
    /// [`Execution`]. `None` when nothing is pending.
    pub fn drive(&self) -> Option<Execution<'_>> {
        self.has_pending()
            .then(|| Execution::deferred(&self.in_flight))
    }

    /// Run `name` to completion.
    ///
    /// # Errors
    /// Everything [`CommandDispatcher::execute_command`] or the command's
    /// transition returns.
    pub async fn run(&self, name: &str, context: Option<&CommandContext>) -> Result<()> {
        self.execute_command(name, context)?.await
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for CommandDispatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("buffer", &self.buffer)
            .field("commands", &self.commands.names())
            .field("executing", &self.in_flight.executing.get())
            .field("pending", &self.in_flight.pending.borrow().is_some())
            .finish()
    }
}
