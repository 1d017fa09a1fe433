//! Screen routing and radar selection.
//!
//! Screens are addressed with relative locations such as
//! `progress?module=Civil%20Law`, the same shape the radar uses to link to
//! the progress screen.

use crate::render::{Point, RadarGeometry, RadarSpec};
use ratatui::layout::Rect;
use reqwest::Url;

pub const OVERVIEW_PATH: &str = "overview";
pub const PROGRESS_PATH: &str = "progress";
const MODULE_PARAM: &str = "module";
const LOCATION_BASE: &str = "http://study-radar.local/";

/// Clicks closer than this (in cells) to a vertex hit it.
pub const HIT_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid location `{0}`")]
    Invalid(String),
    #[error("unknown screen `{0}`")]
    UnknownScreen(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Radar of every module.
    #[default]
    Overview,
    /// Bar chart and table, optionally restricted to one module.
    Progress { module: Option<String> },
}

impl Route {
    pub fn progress(module: impl Into<String>) -> Self {
        Self::Progress {
            module: Some(module.into()),
        }
    }

    pub fn parse(location: &str) -> Result<Self, RouteError> {
        let base = Url::parse(LOCATION_BASE).map_err(|e| RouteError::Invalid(e.to_string()))?;
        let url = base
            .join(location.trim())
            .map_err(|_| RouteError::Invalid(location.to_string()))?;

        match url.path().trim_matches('/') {
            "" | OVERVIEW_PATH => Ok(Self::Overview),
            PROGRESS_PATH => {
                let module = url
                    .query_pairs()
                    .find(|(key, _)| key == MODULE_PARAM)
                    .map(|(_, value)| value.into_owned())
                    .filter(|value| !value.is_empty());
                Ok(Self::Progress { module })
            }
            other => Err(RouteError::UnknownScreen(other.to_string())),
        }
    }

    /// Location string for this route, with the module parameter encoded.
    pub fn href(&self) -> String {
        match self {
            Self::Overview => OVERVIEW_PATH.to_string(),
            Self::Progress { module: None } => PROGRESS_PATH.to_string(),
            Self::Progress {
                module: Some(module),
            } => {
                let query = Url::parse(LOCATION_BASE)
                    .map(|mut url| {
                        url.query_pairs_mut().append_pair(MODULE_PARAM, module);
                        url.query().unwrap_or_default().to_string()
                    })
                    .unwrap_or_default();
                format!("{PROGRESS_PATH}?{query}")
            }
        }
    }

    pub fn module_filter(&self) -> Option<&str> {
        match self {
            Self::Progress { module } => module.as_deref(),
            Self::Overview => None,
        }
    }
}

/// Highlighted radar axis. Lives in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadarSelection {
    axis: Option<usize>,
}

impl RadarSelection {
    pub const fn axis(self) -> Option<usize> {
        self.axis
    }

    pub fn clear(&mut self) {
        self.axis = None;
    }

    pub fn select(&mut self, axis: usize) {
        self.axis = Some(axis);
    }

    /// Moves to the next real (non-placeholder) axis, wrapping around.
    pub fn next(&mut self, spec: &RadarSpec) {
        let real = spec.real_axes().map(|(index, _)| index).collect::<Vec<_>>();
        self.axis = match self.axis.and_then(|axis| real.iter().position(|i| *i == axis)) {
            Some(position) => real.get((position + 1) % real.len()).copied(),
            None => real.first().copied(),
        };
    }

    pub fn prev(&mut self, spec: &RadarSpec) {
        let real = spec.real_axes().map(|(index, _)| index).collect::<Vec<_>>();
        self.axis = match self.axis.and_then(|axis| real.iter().position(|i| *i == axis)) {
            Some(0) => real.last().copied(),
            Some(position) => real.get(position - 1).copied(),
            None => real.last().copied(),
        };
    }

    pub fn module<'a>(&self, spec: &'a RadarSpec) -> Option<&'a str> {
        self.axis
            .and_then(|axis| spec.axes.get(axis))
            .and_then(|axis| axis.module.as_deref())
    }
}

/// Result of clicking on the radar canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadarClick {
    Miss,
    Single { axis: usize, module: String },
    /// Several modules share the clicked spot.
    Multiple { modules: Vec<String>, anchor: (u16, u16) },
}

/// Works out which module vertices lie under the clicked cell of `area`.
pub fn hit_test(spec: &RadarSpec, area: Rect, column: u16, row: u16) -> RadarClick {
    if !area.contains(ratatui::layout::Position::new(column, row)) {
        return RadarClick::Miss;
    }

    let width = f64::from(area.width);
    let height = f64::from(area.height);
    let geometry = RadarGeometry::new(width, height);
    let click = Point::new(
        f64::from(column - area.x) + 0.5,
        height - f64::from(row - area.y) - 0.5,
    );

    let mut hits: Vec<(usize, Point, &str)> = Vec::new();
    for (axis, point) in spec.vertices(&geometry) {
        let Some(module) = spec.axes.get(axis).and_then(|a| a.module.as_deref()) else {
            continue;
        };
        if point.distance(click) <= HIT_RADIUS && !hits.iter().any(|(_, _, m)| *m == module) {
            hits.push((axis, point, module));
        }
    }

    match hits.as_slice() {
        [] => RadarClick::Miss,
        [(axis, _, module)] => RadarClick::Single {
            axis: *axis,
            module: (*module).to_string(),
        },
        many => {
            #[allow(clippy::cast_precision_loss)]
            let count = many.len() as f64;
            let sum = many
                .iter()
                .fold(Point::new(0.0, 0.0), |acc, (_, p, _)| Point::new(acc.x + p.x, acc.y + p.y));
            let average = Point::new(sum.x / count, sum.y / count);
            RadarClick::Multiple {
                modules: many.iter().map(|(_, _, m)| (*m).to_string()).collect(),
                anchor: to_cell(area, average),
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_cell(area: Rect, point: Point) -> (u16, u16) {
    let max_x = f64::from(area.width.saturating_sub(1));
    let max_y = f64::from(area.height.saturating_sub(1));
    let x = point.x.floor().clamp(0.0, max_x) as u16;
    let y = (f64::from(area.height) - point.y).floor().clamp(0.0, max_y) as u16;
    (area.x + x, area.y + y)
}

/// Pop-up list used to pick one of several overlapping radar points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserMenu {
    entries: Vec<String>,
    anchor: (u16, u16),
    highlighted: usize,
}

impl ChooserMenu {
    pub const fn new(entries: Vec<String>, anchor: (u16, u16)) -> Self {
        Self {
            entries,
            anchor,
            highlighted: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self) {
        if !self.entries.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.entries.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.entries.is_empty() {
            self.highlighted =
                (self.highlighted + self.entries.len() - 1) % self.entries.len();
        }
    }

    pub fn highlighted_entry(&self) -> Option<&str> {
        self.entries.get(self.highlighted).map(String::as_str)
    }

    /// Where the menu is drawn: just right of the anchor, kept on screen.
    pub fn rect(&self, screen: Rect) -> Rect {
        let widest = self
            .entries
            .iter()
            .map(|entry| entry.chars().count())
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 4).unwrap_or(u16::MAX).min(screen.width);
        let height = u16::try_from(self.entries.len() + 2)
            .unwrap_or(u16::MAX)
            .min(screen.height);

        let right_edge = screen.x + screen.width;
        let bottom_edge = screen.y + screen.height;
        let x = (self.anchor.0 + 1).min(right_edge.saturating_sub(width)).max(screen.x);
        let y = self.anchor.1.min(bottom_edge.saturating_sub(height)).max(screen.y);

        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Entry under a click inside the menu, if any.
    pub fn entry_at(&self, screen: Rect, column: u16, row: u16) -> Option<&str> {
        let rect = self.rect(screen);
        if !rect.contains(ratatui::layout::Position::new(column, row)) {
            return None;
        }
        let index = usize::from(row.checked_sub(rect.y + 1)?);
        self.entries.get(index).map(String::as_str)
    }

    pub fn contains(&self, screen: Rect, column: u16, row: u16) -> bool {
        self.rect(screen)
            .contains(ratatui::layout::Position::new(column, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{History, Snapshot, Status, Subject};
    use crate::render::radar_chart;
    use std::collections::BTreeMap;

    fn spec(entries: &[(&str, u32)]) -> RadarSpec {
        let modules = entries
            .iter()
            .map(|(name, _)| ((*name).to_string(), vec![Subject::new("s", Status::Done)]))
            .collect();
        let historical = entries
            .iter()
            .map(|(name, points)| {
                (
                    (*name).to_string(),
                    History::from([("2024-01-01".to_string(), *points)]),
                )
            })
            .collect::<BTreeMap<_, _>>();
        radar_chart(&Snapshot::new(modules, historical, None))
    }

    #[test]
    fn progress_route_round_trips_encoded_module() {
        let route = Route::progress("Civil Law & Co");
        let href = route.href();
        assert!(href.starts_with("progress?module="));
        assert!(!href.contains(' '));
        assert_eq!(Route::parse(&href).unwrap(), route);
    }

    #[test]
    fn parses_overview_and_bare_progress() {
        assert_eq!(Route::parse("overview").unwrap(), Route::Overview);
        assert_eq!(Route::parse("").unwrap(), Route::Overview);
        assert_eq!(
            Route::parse("progress").unwrap(),
            Route::Progress { module: None }
        );
        assert_eq!(
            Route::parse("progress?module=").unwrap(),
            Route::Progress { module: None }
        );
        assert_eq!(
            Route::parse("progress?module=Math%20II").unwrap(),
            Route::progress("Math II")
        );
    }

    #[test]
    fn unknown_screen_is_rejected() {
        assert_eq!(
            Route::parse("settings"),
            Err(RouteError::UnknownScreen("settings".to_string()))
        );
    }

    #[test]
    fn selection_skips_placeholders_and_wraps() {
        let spec = spec(&[("A", 1), ("B", 2)]);
        let mut selection = RadarSelection::default();

        selection.next(&spec);
        assert_eq!(selection.module(&spec), Some("A"));
        selection.next(&spec);
        assert_eq!(selection.module(&spec), Some("B"));
        selection.next(&spec);
        assert_eq!(selection.module(&spec), Some("A"));
        selection.prev(&spec);
        assert_eq!(selection.module(&spec), Some("B"));

        selection.clear();
        assert_eq!(selection.axis(), None);
    }

    #[test]
    fn click_on_a_lone_vertex_selects_it() {
        // 20x20 canvas: axis 0 at full scale sits at canvas (10, 19), cell (10, 0)
        let spec = spec(&[("A", 10), ("B", 4)]);
        let area = Rect::new(0, 0, 20, 20);

        assert_eq!(
            hit_test(&spec, area, 10, 0),
            RadarClick::Single {
                axis: 0,
                module: "A".to_string()
            }
        );
        assert_eq!(hit_test(&spec, area, 0, 19), RadarClick::Miss);
        assert_eq!(hit_test(&spec, area, 30, 30), RadarClick::Miss);
    }

    #[test]
    fn overlapping_vertices_open_a_chooser() {
        // zero-point modules all sit on the centre
        let spec = spec(&[("A", 0), ("B", 0), ("C", 0)]);
        let area = Rect::new(5, 2, 20, 20);

        match hit_test(&spec, area, 15, 11) {
            RadarClick::Multiple { modules, anchor } => {
                assert_eq!(modules, vec!["A", "B", "C"]);
                assert_eq!(anchor, (15, 12));
            }
            other => panic!("expected a chooser, got {other:?}"),
        }
    }

    #[test]
    fn chooser_sits_next_to_anchor_and_stays_on_screen() {
        let screen = Rect::new(0, 0, 40, 20);
        let menu = ChooserMenu::new(vec!["Math".to_string(), "Law".to_string()], (10, 5));
        assert_eq!(menu.rect(screen), Rect::new(11, 5, 8, 4));
        assert_eq!(menu.entry_at(screen, 12, 6), Some("Math"));
        assert_eq!(menu.entry_at(screen, 12, 7), Some("Law"));
        assert_eq!(menu.entry_at(screen, 12, 5), None);
        assert!(!menu.contains(screen, 0, 0));

        let menu = ChooserMenu::new(vec!["Math".to_string()], (39, 19));
        let rect = menu.rect(screen);
        assert!(rect.x + rect.width <= 40);
        assert!(rect.y + rect.height <= 20);
    }

    #[test]
    fn chooser_highlight_wraps() {
        let mut menu = ChooserMenu::new(vec!["A".to_string(), "B".to_string()], (0, 0));
        menu.highlight_prev();
        assert_eq!(menu.highlighted_entry(), Some("B"));
        menu.highlight_next();
        assert_eq!(menu.highlighted_entry(), Some("A"));
    }
}
