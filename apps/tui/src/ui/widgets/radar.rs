use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::Frame;
use study_radar_tui::nav::RadarSelection;
use study_radar_tui::render::{Point, RadarGeometry, RadarSpec};

const GRID_COLOR: Color = Color::DarkGray;
const AREA_COLOR: Color = Color::Cyan;
const SELECTED_COLOR: Color = Color::Yellow;

/// Largest square that fits in `area`, centred. Hit testing must use the same
/// rect the canvas was drawn in.
pub fn radar_square(area: Rect) -> Rect {
    let size = area.width.min(area.height);
    Rect {
        x: area.x + (area.width - size) / 2,
        y: area.y + (area.height - size) / 2,
        width: size,
        height: size,
    }
}

fn line(from: Point, to: Point, color: Color) -> CanvasLine {
    CanvasLine {
        x1: from.x,
        y1: from.y,
        x2: to.x,
        y2: to.y,
        color,
    }
}

/// Draws the radar into `area` and returns the canvas rect.
pub fn render_study_radar(
    f: &mut Frame<'_>,
    area: Rect,
    spec: &RadarSpec,
    selection: RadarSelection,
) -> Rect {
    let square = radar_square(area);
    if square.width < 4 {
        return square;
    }

    let width = f64::from(square.width);
    let height = f64::from(square.height);
    let geometry = RadarGeometry::new(width, height);
    let count = spec.axes.len();
    let scale_max = spec.scale_max();
    let ticks = spec.ticks();
    let vertices = spec.vertices(&geometry);

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                for tick in &ticks {
                    for index in 0..count {
                        let from = geometry.vertex(index, count, *tick, scale_max);
                        let to = geometry.vertex((index + 1) % count, count, *tick, scale_max);
                        ctx.draw(&line(from, to, GRID_COLOR));
                    }
                }

                for (index, axis) in spec.axes.iter().enumerate() {
                    let end = geometry.axis_end(index, count);
                    ctx.draw(&line(geometry.center, end, GRID_COLOR));
                    let label_color = if axis.is_placeholder() {
                        GRID_COLOR
                    } else {
                        Color::White
                    };
                    ctx.print(
                        end.x,
                        end.y,
                        ratatui::text::Span::styled(
                            axis.label.clone(),
                            ratatui::style::Style::default().fg(label_color),
                        ),
                    );
                }

                ctx.layer();

                // Absent values break the outline instead of joining it
                for pair in vertices.windows(2) {
                    let ((a, from), (b, to)) = (pair[0], pair[1]);
                    if b == a + 1 {
                        ctx.draw(&line(from, to, AREA_COLOR));
                    }
                }
                if let (Some((first, start)), Some((last, end))) = (vertices.first(), vertices.last()) {
                    if *first == 0 && *last == count - 1 && count > 1 {
                        ctx.draw(&line(*end, *start, AREA_COLOR));
                    }
                }

                for (index, point) in &vertices {
                    let selected = selection.axis() == Some(*index);
                    ctx.draw(&Circle {
                        x: point.x,
                        y: point.y,
                        radius: if selected { 0.8 } else { 0.4 },
                        color: if selected { SELECTED_COLOR } else { AREA_COLOR },
                    });
                }
            })
            .x_bounds([0.0, width])
            .y_bounds([0.0, height]),
        square,
    );

    square
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_is_centred_in_wide_areas() {
        let square = radar_square(Rect::new(0, 0, 40, 10));
        assert_eq!(square, Rect::new(15, 0, 10, 10));
    }
}
