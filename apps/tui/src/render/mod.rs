//! Pure view builders: snapshot in, chart and table specs out.
//!
//! Nothing in here touches the terminal; `ui::widgets` draws the specs.

pub mod bar;
pub mod radar;
mod session;
pub mod table;

pub use bar::{bar_chart, BarCategory, BarChartSpec};
pub use radar::{radar_chart, AxisValue, Point, RadarAxis, RadarGeometry, RadarSpec};
pub use session::{ChartHandle, RenderSession};
pub use table::{table, TableRow, TableSpec};

use crate::cache::ViewData;
use serde::Serialize;

/// Everything the progress screen draws for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSpecs {
    pub bar: BarChartSpec,
    pub table: TableSpec,
}

pub fn render_view(view: ViewData<'_>) -> ProgressSpecs {
    ProgressSpecs {
        bar: bar_chart(view),
        table: table(view),
    }
}
