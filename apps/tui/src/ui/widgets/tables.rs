use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use study_radar_tui::controller::EditTarget;
use study_radar_tui::render::{TableRow, TableSpec};

use crate::ui::widgets::charts::status_color;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

fn row_target(row: &TableRow) -> EditTarget {
    EditTarget {
        module: row.module.clone(),
        subject: Some(row.subject.clone()),
    }
}

/// Subject table with a status selector on the selected row. `saving`
/// reports whether an edit for that row is still in flight.
pub fn render_progress_table(
    f: &mut Frame<'_>,
    area: Rect,
    spec: &TableSpec,
    selected: usize,
    saving: impl Fn(&EditTarget) -> bool,
) {
    let block = Block::default()
        .title("Subjects")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if spec.is_empty() {
        let paragraph = Paragraph::new("No subjects. Press 'a' to add one.")
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let mut header = Vec::new();
    if spec.show_module_column {
        header.push(Cell::from("Module"));
    }
    header.extend([Cell::from("Subject"), Cell::from("Status"), Cell::from("Points")]);
    let header = Row::new(header).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(spec.len(), max_visible_rows, selected);

    let rows = spec
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, row)| {
            let is_selected = index == selected;
            let status = if saving(&row_target(row)) {
                format!("{} (saving)", row.status.label())
            } else if is_selected {
                format!("< {} >", row.status.label())
            } else {
                row.status.label().to_string()
            };

            let mut cells = Vec::new();
            if spec.show_module_column {
                cells.push(Cell::from(row.module.clone()));
            }
            cells.push(Cell::from(row.subject.clone()));
            cells.push(Cell::from(status).style(Style::default().fg(status_color(row.status))));
            cells.push(Cell::from(row.status.points().to_string()));

            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        });

    let widths = if spec.show_module_column {
        vec![
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(28),
            Constraint::Percentage(12),
        ]
    } else {
        vec![
            Constraint::Percentage(50),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
        ]
    };

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
