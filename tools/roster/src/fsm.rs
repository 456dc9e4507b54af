use crate::errors::RosterError;
use crate::menu::MenuAction;
use crate::types::ConsoleState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSnapshot {
    pub state: ConsoleState,
    pub iterations: u64,
    pub invalid_choices: u64,
}

impl Default for ConsoleSnapshot {
    fn default() -> Self {
        Self {
            state: ConsoleState::MenuPrompt,
            iterations: 0,
            invalid_choices: 0,
        }
    }
}

impl ConsoleSnapshot {
    pub fn transition(&mut self, next: ConsoleState) -> Result<(), RosterError> {
        validate_transition(self.state, next)?;
        self.state = next;
        Ok(())
    }

    /// Moves out of the menu according to the user's choice. `None` means the
    /// input matched no menu entry and the menu is shown again.
    pub fn apply_choice(&mut self, action: Option<MenuAction>) -> Result<(), RosterError> {
        if self.state != ConsoleState::MenuPrompt {
            return Err(RosterError::IllegalTransition(format!(
                "menu choice applied in {} state",
                self.state.as_str()
            )));
        }
        self.iterations = self.iterations.saturating_add(1);
        let next = match action {
            Some(MenuAction::Add) => ConsoleState::AddFlow,
            Some(MenuAction::Fetch) => ConsoleState::FetchFlow,
            Some(MenuAction::Quit) => ConsoleState::Exit,
            None => {
                self.invalid_choices = self.invalid_choices.saturating_add(1);
                ConsoleState::MenuPrompt
            }
        };
        self.transition(next)
    }

    pub fn finish_flow(&mut self) -> Result<(), RosterError> {
        self.transition(ConsoleState::MenuPrompt)
    }
}

pub fn validate_transition(from: ConsoleState, to: ConsoleState) -> Result<(), RosterError> {
    use ConsoleState as S;

    let allowed = match from {
        S::MenuPrompt => true,
        S::AddFlow | S::FetchFlow => matches!(to, S::MenuPrompt | S::Exit),
        S::Exit => false,
    };

    if !allowed {
        return Err(RosterError::IllegalTransition(format!(
            "{} -> {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}
