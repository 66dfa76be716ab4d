use std::path::PathBuf;

use crate::engine::EngineError;
use crate::models::Month;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Table,
    Analytics,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Table, Self::Analytics]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "Table"),
            Self::Analytics => write!(f, "Analytics"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    Reset,
    /// Switching years drops unsaved edits.
    SwitchYear(i32),
    /// Reloading the save drops unsaved edits.
    Reload,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) session: Session,
    pub(crate) month_index: usize,
    pub(crate) month_scroll: usize,
    pub(crate) export_dir: PathBuf,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(session: Session, export_dir: PathBuf) -> Self {
        Self {
            running: true,
            screen: Screen::Table,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            session,
            month_index: 0,
            month_scroll: 0,
            export_dir,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 12,
        }
    }

    pub(crate) fn selected_month(&self) -> Month {
        Month::from_index(self.month_index).unwrap_or(Month::January)
    }

    pub(crate) fn select_month(&mut self, month: Month) {
        self.month_index = month.index();
        let page = self.visible_rows.max(1);
        if self.month_index < self.month_scroll {
            self.month_scroll = self.month_index;
        } else if self.month_index >= self.month_scroll + page {
            self.month_scroll = self.month_index + 1 - page;
        }
    }

    /// Ask for confirmation before running `action`.
    pub(crate) fn confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        self.confirm_message = message.into();
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Show an engine error in the status line. The session already kept its
    /// last valid table, so there is nothing else to undo.
    pub(crate) fn report(&mut self, err: &EngineError) {
        tracing::warn!(error = %err, "interaction rejected");
        self.set_status(err.to_string());
    }
}
