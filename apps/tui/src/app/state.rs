use ratatui::layout::Rect;
use std::cell::Cell;
use study_radar_tui::controller::{Completion, EditCommand, EditRejected};
use study_radar_tui::dashboard::{Dashboard, DashboardEvent};
use study_radar_tui::nav::Route;
use study_radar_tui::render::TableRow;
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Overview,
    Progress,
}

/// What a text prompt will do with its input once confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewModule,
    RenameModule { old_name: String },
    AddSubject,
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            Self::NewModule => "New module".to_string(),
            Self::RenameModule { old_name } => format!("Rename \"{old_name}\""),
            Self::AddSubject => "Add subject".to_string(),
        }
    }

    pub fn into_command(self, input: String) -> EditCommand {
        match self {
            Self::NewModule => EditCommand::CreateModule { name: input },
            Self::RenameModule { old_name } => EditCommand::RenameModule {
                old_name,
                new_name: input,
            },
            Self::AddSubject => EditCommand::AddSubject { name: input },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputState {
    Browsing,
    Typing { kind: PromptKind, buffer: String },
    /// Destructive edit waiting for y/n.
    Confirming { prompt: String, command: EditCommand },
}

pub struct App {
    pub running: bool,
    pub dashboard: Dashboard,
    pub input_state: InputState,
    pub selected_row: usize,
    pub status_message: String,
    pub throbber: ThrobberState,
    /// Where the radar canvas was last drawn, for mouse hit testing.
    pub radar_area: Cell<Rect>,
    pub screen_area: Cell<Rect>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            running: true,
            dashboard,
            input_state: InputState::Browsing,
            selected_row: 0,
            status_message: String::new(),
            throbber: ThrobberState::default(),
            radar_area: Cell::new(Rect::default()),
            screen_area: Cell::new(Rect::default()),
        }
    }

    pub fn screen(&self) -> AppScreen {
        match self.dashboard.route() {
            Route::Overview => AppScreen::Overview,
            Route::Progress { .. } => AppScreen::Progress,
        }
    }

    pub fn update(&mut self) {
        if self.dashboard.is_busy() {
            self.throbber.calc_next();
        }
        self.clamp_selection();
    }

    /// Applies every finished fetch and edit, in arrival order.
    pub fn drain_events(&mut self) {
        let completions = self.dashboard.drain_events();
        for completion in &completions {
            self.finish_edit(completion);
        }
    }

    pub fn apply_event(&mut self, event: DashboardEvent) {
        if let Some(completion) = self.dashboard.apply(event) {
            self.finish_edit(&completion);
        }
    }

    fn finish_edit(&mut self, completion: &Completion) {
        debug!(?completion, "edit finished");
        if self.dashboard.controller().in_flight_count() == 0 {
            self.status_message = match completion {
                Completion::Applied { .. } => "Saved".to_string(),
                Completion::Failed { .. } => String::new(),
            };
        }
    }

    pub fn table_len(&self) -> usize {
        self.dashboard.session().table().map_or(0, |table| table.len())
    }

    pub fn selected_table_row(&self) -> Option<&TableRow> {
        self.dashboard
            .session()
            .table()
            .and_then(|table| table.row(self.selected_row))
    }

    pub fn clamp_selection(&mut self) {
        let len = self.table_len();
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    pub fn navigate(&mut self, route: Route) {
        self.dashboard.navigate(route);
        self.selected_row = 0;
        self.status_message.clear();
    }

    pub fn submit(&mut self, command: EditCommand) {
        match self.dashboard.dispatch(command) {
            Ok(ticket) => {
                debug!(ticket, "edit dispatched");
                self.status_message = "Saving...".to_string();
            }
            Err(EditRejected::Empty) => {}
            Err(rejected @ EditRejected::InFlight(_)) => {
                self.status_message = rejected.to_string();
            }
        }
    }

    pub fn start_prompt(&mut self, kind: PromptKind) {
        let buffer = match &kind {
            PromptKind::RenameModule { old_name } => old_name.clone(),
            PromptKind::NewModule | PromptKind::AddSubject => String::new(),
        };
        self.input_state = InputState::Typing { kind, buffer };
    }

    pub fn confirm(&mut self, prompt: String, command: EditCommand) {
        self.input_state = InputState::Confirming { prompt, command };
    }

    pub fn reset_input(&mut self) {
        self.input_state = InputState::Browsing;
    }
}
