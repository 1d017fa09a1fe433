use ratatui::layout::{Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line as TextLine;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;
use study_radar_tui::domain::Status;
use study_radar_tui::render::BarChartSpec;

pub const fn status_color(status: Status) -> Color {
    match status {
        Status::Done => Color::Green,
        Status::InProgress => Color::Yellow,
        Status::NotDone => Color::Red,
        Status::Empty => Color::Gray,
    }
}

const fn points_color(points: u32) -> Color {
    match points {
        2 => Color::Green,
        1 => Color::Yellow,
        _ => Color::Gray,
    }
}

/// One horizontal bar per subject, on the fixed 0..2 points scale.
pub fn render_points_barchart(f: &mut Frame<'_>, area: Rect, spec: &BarChartSpec) {
    let block = Block::default()
        .title("Points per subject")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if spec.is_empty() {
        let paragraph = Paragraph::new("No subjects yet")
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let bars: Vec<Bar<'_>> = spec
        .categories
        .iter()
        .map(|category| {
            Bar::default()
                .value(u64::from(category.value))
                .label(TextLine::from(category.label.as_str()))
                .text_value(category.value.to_string())
                .style(Style::default().fg(points_color(category.value)))
                .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(u64::from(spec.y_max))
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}
