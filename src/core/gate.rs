//! Confirmation in front of every mutating command.
//!
//! The presentation layer is reached only through [`Prompter`]. The gate turns
//! a [`PendingCommand`] into the literal text the user reads and reduces every
//! answer to a plain `bool`: declining and dismissing look the same.

use crate::core::state::PendingCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

/// Interactive collaborator supplied by the front-end
pub trait Prompter {
    /// Yes/no question; anything but an explicit yes is `false`
    fn confirm(&self, title: &str, message: &str) -> bool;
    /// Free text; `None` when dismissed
    fn ask_text(&self, title: &str, prompt: &str, default: Option<&str>) -> Option<String>;
    /// Pick one of `options`; `None` when dismissed
    fn choose(&self, title: &str, options: &[String], default: Option<&str>) -> Option<String>;
    fn notify(&self, notice: Notice);
}

pub struct ConfirmationGate<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> ConfirmationGate<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Show the steps about to run and wait for a yes
    pub fn confirm_command(&self, title: &str, pending: &PendingCommand) -> bool {
        let message = format_steps(pending);
        let accepted = self.prompter.confirm(title, &message);
        log::debug!("{title}: confirmation {}", if accepted { "accepted" } else { "declined" });
        accepted
    }

    /// Yes/no with `warning`, then the exact phrase `delete <name>`
    pub fn confirm_destructive(&self, name: &str, warning: &str) -> bool {
        if !self.prompter.confirm("DELETE REPO", warning) {
            return false;
        }

        let phrase = format!("delete {name}");
        let typed = self.prompter.ask_text(
            "ARE YOU SURE?",
            &format!("Type '{phrase}' to confirm:"),
            None,
        );
        match typed {
            Some(typed) if typed == phrase => true,
            Some(typed) => {
                log::debug!("Typed phrase '{typed}' does not match '{phrase}'");
                false
            }
            None => false,
        }
    }
}

/// One paragraph per step, exactly as it will run
pub fn format_steps(pending: &PendingCommand) -> String {
    pending
        .steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}
