use super::{radar_chart, render_view, BarChartSpec, RadarSpec, TableSpec};
use crate::cache::{ViewError, ViewStateCache};
use tracing::debug;

/// A live chart: the spec it was built from and the snapshot generation it
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle<S> {
    spec: S,
    generation: u64,
}

impl<S> ChartHandle<S> {
    pub const fn spec(&self) -> &S {
        &self.spec
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the one live chart per canvas.
///
/// Every [`RenderSession::render`] destroys the previous handles before
/// installing new ones, so a canvas never shows two generations at once.
#[derive(Debug, Default)]
pub struct RenderSession {
    bar: Option<ChartHandle<BarChartSpec>>,
    radar: Option<ChartHandle<RadarSpec>>,
    table: Option<TableSpec>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every view from the cache.
    ///
    /// The radar always covers the whole snapshot. The bar chart and table
    /// follow the module filter; when the filter cannot be resolved they are
    /// left empty and the error is returned.
    pub fn render(&mut self, cache: &ViewStateCache) -> Result<(), ViewError> {
        self.destroy();

        let generation = cache.generation();
        if let Some(snapshot) = cache.snapshot() {
            self.radar = Some(ChartHandle {
                spec: radar_chart(snapshot),
                generation,
            });
        }

        let specs = cache.with_current_view(render_view)?;
        self.bar = Some(ChartHandle {
            spec: specs.bar,
            generation,
        });
        self.table = Some(specs.table);
        debug!(generation, "charts rebuilt");
        Ok(())
    }

    pub fn destroy(&mut self) {
        if let Some(old) = self.bar.take() {
            debug!(generation = old.generation, "bar chart destroyed");
        }
        if let Some(old) = self.radar.take() {
            debug!(generation = old.generation, "radar chart destroyed");
        }
        self.table = None;
    }

    pub fn bar(&self) -> Option<&BarChartSpec> {
        self.bar.as_ref().map(ChartHandle::spec)
    }

    pub fn radar(&self) -> Option<&RadarSpec> {
        self.radar.as_ref().map(ChartHandle::spec)
    }

    pub const fn table(&self) -> Option<&TableSpec> {
        self.table.as_ref()
    }

    pub fn generation(&self) -> Option<u64> {
        self.radar.as_ref().map(ChartHandle::generation)
    }
}
