//! State Manager
//!
//! Owns the stack of states and is the only thing that mutates it. Ticks and
//! UI events go to the top state only; states underneath stay paused until a
//! pop exposes them again.
//!
//! # Transitions
//!
//! - push: suspend the current top, add the new state, initialize it
//! - pop: clean up the top, resume the state beneath with its exit value
//! - swap: clean up the top and drop its exit value, add and initialize the
//!   replacement; nothing is suspended or resumed
//!
//! A push whose `initialize` fails is rolled back: the state beneath is
//! resumed and the error is returned.
//!
//! Popping the root state is a protocol violation. It fails with a fatal
//! [`StateError::StackUnderflow`] and leaves the stack untouched.

use super::base::{LifecyclePhase, State, StateContext, StateKind, Transition};
use crate::error::{StackOperation, StateError};
use crate::game::GameContext;
use crate::ui::{GuiOverlay, UiEvent};

struct StackEntry {
    state: Box<dyn State>,
    phase: LifecyclePhase,
}

#[derive(Default)]
pub struct StateManager {
    stack: Vec<StackEntry>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The active state, or `None` when the stack is empty
    pub fn current_state(&self) -> Option<&dyn State> {
        self.stack.last().map(|entry| entry.state.as_ref())
    }

    pub fn current_kind(&self) -> Option<StateKind> {
        self.current_state().map(|state| state.kind())
    }

    pub fn current_phase(&self) -> Option<LifecyclePhase> {
        self.stack.last().map(|entry| entry.phase)
    }

    /// Kinds from the root to the top
    pub fn kinds(&self) -> Vec<StateKind> {
        self.stack.iter().map(|entry| entry.state.kind()).collect()
    }

    pub fn is_game_running(&self) -> bool {
        self.current_state()
            .is_some_and(|state| state.activity().is_game_running())
    }

    pub fn push_state(
        &mut self,
        new_state: Box<dyn State>,
        ctx: &mut StateContext<'_>,
    ) -> Result<(), StateError> {
        if let Some(top) = self.stack.last_mut() {
            if top.phase != LifecyclePhase::Active {
                let err = StateError::LifecycleViolation {
                    kind: top.state.kind(),
                    hook: "suspend",
                    phase: top.phase,
                };
                tracing::error!(%err, "refusing to push over an inactive state");
                return Err(err);
            }
            top.state.suspend(ctx);
            top.phase = LifecyclePhase::Suspended;
        }

        tracing::info!(state = %new_state.kind(), depth = self.stack.len() + 1, "push state");
        self.stack.push(StackEntry {
            state: new_state,
            phase: LifecyclePhase::Uninitialized,
        });

        if let Err(err) = self.initialize_top(ctx) {
            self.roll_back_push(ctx, &err)?;
            return Err(err);
        }
        Ok(())
    }

    /// Undoes a push whose `initialize` failed: the new state is cleaned up
    /// and dropped, and the state it would have covered becomes active again.
    fn roll_back_push(
        &mut self,
        ctx: &mut StateContext<'_>,
        cause: &StateError,
    ) -> Result<(), StateError> {
        let Some(mut failed) = self.stack.pop() else {
            return Ok(());
        };
        tracing::warn!(state = %failed.state.kind(), %cause, "initialize failed, rolling back push");
        // Exit value of a state that never started is dropped
        let _ = failed.state.cleanup(ctx);
        drop(failed);

        if let Some(top) = self.stack.last_mut() {
            top.state.resume(ctx, None)?;
            top.phase = LifecyclePhase::Active;
        }
        Ok(())
    }

    pub fn pop_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        let depth = self.stack.len();
        if depth < 2 {
            let err = StateError::StackUnderflow {
                operation: StackOperation::Pop,
                depth,
            };
            tracing::error!(%err, "refusing to pop the root state");
            return Err(err);
        }

        let beneath = &self.stack[depth - 2];
        if beneath.phase != LifecyclePhase::Suspended {
            return Err(StateError::LifecycleViolation {
                kind: beneath.state.kind(),
                hook: "resume",
                phase: beneath.phase,
            });
        }

        let Some(mut popped) = self.stack.pop() else {
            return Err(StateError::EmptyStack);
        };
        let exit_value = popped.state.cleanup(ctx);
        tracing::info!(
            state = %popped.state.kind(),
            depth = self.stack.len(),
            exit_value = ?exit_value.as_ref().map(|v| v.origin()),
            "pop state"
        );
        drop(popped);

        let Some(top) = self.stack.last_mut() else {
            return Err(StateError::EmptyStack);
        };
        top.state.resume(ctx, exit_value)?;
        top.phase = LifecyclePhase::Active;
        Ok(())
    }

    pub fn swap_state(
        &mut self,
        new_state: Box<dyn State>,
        ctx: &mut StateContext<'_>,
    ) -> Result<(), StateError> {
        let Some(mut replaced) = self.stack.pop() else {
            let err = StateError::StackUnderflow {
                operation: StackOperation::Swap,
                depth: 0,
            };
            tracing::error!(%err, "nothing to swap out");
            return Err(err);
        };

        // The replacement is a fresh peer, not a caller waiting for a result
        if let Some(discarded) = replaced.state.cleanup(ctx) {
            tracing::debug!(origin = %discarded.origin(), "swap discards exit value");
        }
        tracing::info!(
            from = %replaced.state.kind(),
            to = %new_state.kind(),
            depth = self.stack.len() + 1,
            "swap state"
        );
        drop(replaced);

        self.stack.push(StackEntry {
            state: new_state,
            phase: LifecyclePhase::Uninitialized,
        });
        self.initialize_top(ctx)
    }

    fn initialize_top(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        let Some(top) = self.stack.last_mut() else {
            return Err(StateError::EmptyStack);
        };
        top.state.initialize(ctx)?;
        top.phase = LifecyclePhase::Active;
        Ok(())
    }

    /// Applies a transition returned by a hook
    pub fn apply(
        &mut self,
        transition: Transition,
        ctx: &mut StateContext<'_>,
    ) -> Result<(), StateError> {
        match transition {
            Transition::None => Ok(()),
            Transition::Push(state) => self.push_state(state, ctx),
            Transition::Pop => self.pop_state(ctx),
            Transition::Swap(state) => self.swap_state(state, ctx),
        }
    }

    fn top_mut(&mut self) -> Result<&mut Box<dyn State>, StateError> {
        self.stack
            .last_mut()
            .map(|entry| &mut entry.state)
            .ok_or(StateError::EmptyStack)
    }

    pub fn update(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        let transition = self.top_mut()?.update(ctx)?;
        self.apply(transition, ctx)
    }

    pub fn fixed_update(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        let transition = self.top_mut()?.fixed_update(ctx)?;
        self.apply(transition, ctx)
    }

    /// Routes a UI event to the top state if the source widget belongs to
    /// the top state's view. Events from any other widget are stale and
    /// dropped.
    pub fn handle_ui_event(
        &mut self,
        ctx: &mut StateContext<'_>,
        event: &UiEvent,
    ) -> Result<(), StateError> {
        let top = self.top_mut()?;
        let owner = ctx.ui.owner_of(event.source);
        if owner.is_none() || owner != top.view() {
            tracing::debug!(
                widget = event.source.0,
                state = %top.kind(),
                "ignoring UI event from a widget the active state does not own"
            );
            return Ok(());
        }

        let transition = top.handle_ui_event(ctx, event)?;
        self.apply(transition, ctx)
    }

    pub fn on_gui(&self, game: &GameContext, overlay: &mut GuiOverlay) {
        if let Some(top) = self.current_state() {
            top.on_gui(game, overlay);
        }
    }
}
