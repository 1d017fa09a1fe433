use crate::app::App;
use crate::ui::screens::{render_status_section, render_title};
use crate::ui::widgets::charts::render_points_barchart;
use crate::ui::widgets::tables::render_progress_table;
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::Frame;

const SHORTCUTS: &str =
    "Up/Down row | <-/-> change status | a add subject | x delete subject | Esc back | q quit";

pub fn render_progress(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    let subtitle = app
        .dashboard
        .cache()
        .filter()
        .map_or_else(|| "all modules".to_string(), |module| format!("module {module}"));
    render_title(f, layout[0], &subtitle);

    let session = app.dashboard.session();
    if let Some(bar) = session.bar() {
        render_points_barchart(f, layout[1], bar);
    }
    if let Some(table) = session.table() {
        let controller = app.dashboard.controller();
        render_progress_table(f, layout[2], table, app.selected_row, |target| {
            controller.is_submitting(target)
        });
    }

    render_status_section(app, f, layout[3], SHORTCUTS);
}
