//! Third-party license text

use super::base::{State, StateContext, StateKind, StateResult, Transition};
use super::exit_value::StateExitValue;
use crate::error::StateError;
use crate::ui::views::LicenseDialogView;
use crate::ui::{StateUi, UiEvent, ViewId};

#[derive(Default)]
pub struct LicenseDialog {
    ui: StateUi<LicenseDialogView>,
}

impl LicenseDialog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for LicenseDialog {
    fn kind(&self) -> StateKind {
        StateKind::LicenseDialog
    }

    fn view(&self) -> Option<ViewId> {
        self.ui.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        self.ui.spawn(ctx.ui)?;
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        _exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.ui.hide(ctx.ui);
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.ui.destroy(ctx.ui);
        None
    }

    fn handle_ui_event(&mut self, _ctx: &mut StateContext<'_>, event: &UiEvent) -> StateResult {
        match self.ui.get() {
            Some(dialog) if event.source == dialog.back => Ok(Transition::Pop),
            _ => Ok(Transition::None),
        }
    }
}
