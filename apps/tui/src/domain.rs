use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subject name used when a module is created without any real subject.
pub const PLACEHOLDER_SUBJECT: &str = "placeholder";

/// Module that receives new subjects when no module filter is active.
pub const DEFAULT_MODULE: &str = "DefaultModule";

/// Progress state of a single subject.
///
/// The wire vocabulary is fixed by the backend: `Done`, `En cours`,
/// `Pas fait`, `vide`. Anything else decodes as [`Status::NotDone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Done,
    InProgress,
    NotDone,
    Empty,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::Done, Self::InProgress, Self::NotDone, Self::Empty];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::InProgress => "En cours",
            Self::NotDone => "Pas fait",
            Self::Empty => "vide",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Done),
            1 => Some(Self::InProgress),
            2 => Some(Self::NotDone),
            3 => Some(Self::Empty),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Done => 0,
            Self::InProgress => 1,
            Self::NotDone => 2,
            Self::Empty => 3,
        }
    }

    /// Strict parse of the wire vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Done" => Some(Self::Done),
            "En cours" => Some(Self::InProgress),
            "Pas fait" => Some(Self::NotDone),
            "vide" => Some(Self::Empty),
            _ => None,
        }
    }

    /// Lenient parse used for data coming from the backend.
    pub fn normalize(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::NotDone)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::InProgress => "In progress",
            Self::NotDone => "Not done",
            Self::Empty => "Empty",
        }
    }

    pub const fn points(self) -> u32 {
        match self {
            Self::Done => 2,
            Self::InProgress => 1,
            Self::NotDone | Self::Empty => 0,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Done => Self::InProgress,
            Self::InProgress => Self::NotDone,
            Self::NotDone => Self::Empty,
            Self::Empty => Self::Done,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Done => Self::Empty,
            Self::InProgress => Self::Done,
            Self::NotDone => Self::InProgress,
            Self::Empty => Self::NotDone,
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded for a raw status string; unknown strings score zero.
pub fn points_of(status: &str) -> u32 {
    Status::normalize(status).points()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub name: String,
    pub status: Status,
}

impl Subject {
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Per-day points keyed by `YYYY-MM-DD`.
pub type History = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub subjects: Vec<Subject>,
    pub history: History,
}

impl Module {
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.name == name)
    }

    /// Sum of every recorded day's points.
    pub fn historical_total(&self) -> u32 {
        self.history.values().sum()
    }

    /// Points of the current statuses, the value the backend records for today.
    pub fn current_points(&self) -> u32 {
        self.subjects.iter().map(|subject| subject.status.points()).sum()
    }
}

/// Full server state as returned by one fetch.
///
/// Never mutated after construction; a successful edit replaces it whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Snapshot {
    modules: BTreeMap<String, Module>,
    historical: BTreeMap<String, History>,
    last_reset: Option<String>,
}

impl Snapshot {
    /// Builds a snapshot, attaching each module's history. Callers are
    /// expected to have enforced the naming invariants already.
    pub fn new(
        modules: Vec<(String, Vec<Subject>)>,
        historical: BTreeMap<String, History>,
        last_reset: Option<String>,
    ) -> Self {
        let modules = modules
            .into_iter()
            .map(|(name, subjects)| {
                let history = historical.get(&name).cloned().unwrap_or_default();
                let module = Module {
                    name: name.clone(),
                    subjects,
                    history,
                };
                (name, module)
            })
            .collect();

        Self {
            modules,
            historical,
            last_reset,
        }
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn historical(&self) -> &BTreeMap<String, History> {
        &self.historical
    }

    pub fn last_reset(&self) -> Option<&str> {
        self.last_reset.as_deref()
    }

    pub fn subject_count(&self) -> usize {
        self.modules.values().map(|module| module.subjects.len()).sum()
    }
}
