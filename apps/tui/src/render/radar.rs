use crate::domain::Snapshot;
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Below this many modules the radar is padded so it keeps a hexagon shape.
pub const MIN_AXES: usize = 6;
pub const SUGGESTED_MIN: f64 = 0.0;
pub const SUGGESTED_MAX: f64 = 10.0;
pub const TICK_STEP: f64 = 2.0;
pub const PLACEHOLDER_LABEL: &str = "(empty)";

/// Value plotted on one axis. Placeholder axes are `Absent` so they draw no
/// vertex instead of collapsing to the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Present(u32),
    Absent,
}

impl AxisValue {
    pub const fn points(self) -> Option<u32> {
        match self {
            Self::Present(points) => Some(points),
            Self::Absent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarAxis {
    pub label: String,
    /// `None` for placeholder axes.
    pub module: Option<String>,
    pub value: AxisValue,
}

impl RadarAxis {
    pub const fn is_placeholder(&self) -> bool {
        self.module.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSpec {
    pub axes: Vec<RadarAxis>,
    pub suggested_min: f64,
    pub suggested_max: f64,
    pub tick_step: f64,
}

impl RadarSpec {
    /// Outer edge of the scale: the suggested maximum, widened to the next
    /// tick when a module has more points than that.
    pub fn scale_max(&self) -> f64 {
        let largest = self
            .axes
            .iter()
            .filter_map(|axis| axis.value.points())
            .max()
            .map_or(0.0, f64::from);
        let widened = (largest / self.tick_step).ceil() * self.tick_step;
        self.suggested_max.max(widened)
    }

    pub fn ticks(&self) -> Vec<f64> {
        let max = self.scale_max();
        let mut ticks = Vec::new();
        let mut tick = self.suggested_min + self.tick_step;
        while tick <= max {
            ticks.push(tick);
            tick += self.tick_step;
        }
        ticks
    }

    pub fn real_axes(&self) -> impl Iterator<Item = (usize, &RadarAxis)> {
        self.axes
            .iter()
            .enumerate()
            .filter(|(_, axis)| !axis.is_placeholder())
    }

    /// Positions of every drawn vertex, keyed by axis index.
    pub fn vertices(&self, geometry: &RadarGeometry) -> Vec<(usize, Point)> {
        let count = self.axes.len();
        let max = self.scale_max();
        self.axes
            .iter()
            .enumerate()
            .filter_map(|(index, axis)| {
                axis.value
                    .points()
                    .map(|points| (index, geometry.vertex(index, count, f64::from(points), max)))
            })
            .collect()
    }
}

/// One axis per module, valued at the module's historical point total.
pub fn radar_chart(snapshot: &Snapshot) -> RadarSpec {
    let mut axes = snapshot
        .modules()
        .map(|module| RadarAxis {
            label: module.name.clone(),
            module: Some(module.name.clone()),
            value: AxisValue::Present(module.historical_total()),
        })
        .collect::<Vec<_>>();

    while axes.len() < MIN_AXES {
        axes.push(RadarAxis {
            label: PLACEHOLDER_LABEL.to_string(),
            module: None,
            value: AxisValue::Absent,
        });
    }

    RadarSpec {
        axes,
        suggested_min: SUGGESTED_MIN,
        suggested_max: SUGGESTED_MAX,
        tick_step: TICK_STEP,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Radar layout inside a `width` x `height` canvas whose y axis points up.
/// Axis 0 is at twelve o'clock and the rest follow clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarGeometry {
    pub center: Point,
    pub radius: f64,
}

impl RadarGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius: width.min(height) / 2.0 * 0.9,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn angle(index: usize, count: usize) -> f64 {
        if count == 0 {
            return FRAC_PI_2;
        }
        FRAC_PI_2 - TAU * (index as f64) / (count as f64)
    }

    pub fn axis_end(&self, index: usize, count: usize) -> Point {
        self.along(index, count, self.radius)
    }

    pub fn vertex(&self, index: usize, count: usize, value: f64, scale_max: f64) -> Point {
        let ratio = if scale_max > 0.0 {
            (value / scale_max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.along(index, count, self.radius * ratio)
    }

    fn along(&self, index: usize, count: usize, distance: f64) -> Point {
        let angle = Self::angle(index, count);
        Point::new(
            angle.cos().mul_add(distance, self.center.x),
            angle.sin().mul_add(distance, self.center.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{History, Status, Subject};
    use std::collections::BTreeMap;

    fn snapshot_with_history(entries: &[(&str, u32)]) -> Snapshot {
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
        Snapshot::new(modules, historical, None)
    }

    #[test]
    fn three_modules_pad_to_six_axes() {
        let spec = radar_chart(&snapshot_with_history(&[("A", 2), ("B", 0), ("C", 4)]));

        assert_eq!(spec.axes.len(), 6);
        assert_eq!(spec.real_axes().count(), 3);
        let placeholders = spec
            .axes
            .iter()
            .filter(|axis| axis.is_placeholder())
            .collect::<Vec<_>>();
        assert_eq!(placeholders.len(), 3);
        assert!(placeholders
            .iter()
            .all(|axis| axis.value == AxisValue::Absent && axis.label == PLACEHOLDER_LABEL));
        // a real module with no points still plots at zero
        assert_eq!(spec.axes[1].value, AxisValue::Present(0));
    }

    #[test]
    fn placeholders_serialize_as_null() {
        let spec = radar_chart(&snapshot_with_history(&[("A", 3)]));
        let json = serde_json::to_value(&spec.axes).unwrap();
        assert_eq!(json[0]["value"], serde_json::json!(3));
        assert!(json[1]["value"].is_null());
    }

    #[test]
    fn six_or_more_modules_are_not_padded() {
        let names = [("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1), ("F", 1), ("G", 1)];
        let spec = radar_chart(&snapshot_with_history(&names));
        assert_eq!(spec.axes.len(), 7);
        assert!(spec.axes.iter().all(|axis| !axis.is_placeholder()));
    }

    #[test]
    fn scale_keeps_suggested_range_and_widens_by_tick() {
        let spec = radar_chart(&snapshot_with_history(&[("A", 3)]));
        assert!((spec.scale_max() - 10.0).abs() < f64::EPSILON);
        assert_eq!(spec.ticks(), vec![2.0, 4.0, 6.0, 8.0, 10.0]);

        let spec = radar_chart(&snapshot_with_history(&[("A", 13)]));
        assert!((spec.scale_max() - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn placeholders_have_no_vertex() {
        let spec = radar_chart(&snapshot_with_history(&[("A", 10), ("B", 0)]));
        let geometry = RadarGeometry::new(20.0, 20.0);
        let vertices = spec.vertices(&geometry);

        assert_eq!(vertices.len(), 2);
        let (index, top) = vertices[0];
        assert_eq!(index, 0);
        assert!((top.x - 10.0).abs() < 1e-9);
        assert!((top.y - 19.0).abs() < 1e-9);
        // zero points sit on the centre
        assert!(vertices[1].1.distance(geometry.center) < 1e-9);
    }
}
