use crate::cache::ViewData;
use serde::Serialize;

/// Fixed y-axis range: a subject scores at most 2 points.
pub const BAR_Y_MIN: u32 = 0;
pub const BAR_Y_MAX: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarCategory {
    pub label: String,
    pub module: String,
    pub subject: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChartSpec {
    pub categories: Vec<BarCategory>,
    pub y_min: u32,
    pub y_max: u32,
}

impl BarChartSpec {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// One bar per (module, subject) pair, labelled `"<module> - <subject>"`.
pub fn bar_chart(view: ViewData<'_>) -> BarChartSpec {
    let categories = view
        .modules
        .iter()
        .flat_map(|module| {
            module.subjects.iter().map(move |subject| BarCategory {
                label: format!("{} - {}", module.name, subject.name),
                module: module.name.clone(),
                subject: subject.name.clone(),
                value: subject.status.points(),
            })
        })
        .collect();

    BarChartSpec {
        categories,
        y_min: BAR_Y_MIN,
        y_max: BAR_Y_MAX,
    }
}
