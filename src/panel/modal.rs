use crate::prelude::*;

/// Confirmation dialog for a pending command. While one is open the rest of
/// the panel is frozen and the selector viewport is pinned; the offset
/// captured at open time is handed back when the dialog resolves, whichever
/// way it resolves.
///
/// `resolve` takes the modal by value so a dialog cannot be answered twice.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmModal {
    command: PanelCommand,
    saved_scroll: usize,
}

impl ConfirmModal {
    pub fn open(command: PanelCommand, saved_scroll: usize) -> Self {
        Self {
            command,
            saved_scroll,
        }
    }

    pub fn command(&self) -> &PanelCommand {
        &self.command
    }

    pub fn resolve(self) -> (PanelCommand, usize) {
        (self.command, self.saved_scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OutputSourcePriority;

    #[test]
    fn resolve_returns_command_and_saved_scroll() {
        let command =
            PanelCommand::SetOutputPriority("2212190000000000".to_string(), OutputSourcePriority::Sbu);
        let modal = ConfirmModal::open(command.clone(), 7);

        assert_eq!(modal.command(), &command);
        assert_eq!(modal.resolve(), (command, 7));
    }
}
