use crate::cache::ViewData;
use crate::domain::Status;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub module: String,
    pub subject: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
    pub rows: Vec<TableRow>,
    /// False when the view is filtered to a single module.
    pub show_module_column: bool,
    pub status_options: [Status; 4],
}

impl TableSpec {
    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn table(view: ViewData<'_>) -> TableSpec {
    let rows = view
        .modules
        .iter()
        .flat_map(|module| {
            module.subjects.iter().map(move |subject| TableRow {
                module: module.name.clone(),
                subject: subject.name.clone(),
                status: subject.status,
            })
        })
        .collect();

    TableSpec {
        rows,
        show_module_column: view.filter.is_none(),
        status_options: Status::ALL,
    }
}
