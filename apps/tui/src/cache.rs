use crate::domain::{Module, Snapshot};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("nothing has been loaded yet")]
    NotLoaded,
    #[error("module \"{filter}\" does not exist")]
    FilterNotFound {
        filter: String,
        suggestion: Option<String>,
    },
}

/// Modules visible under the active filter, in display order.
#[derive(Debug, Clone, Copy)]
pub struct ViewData<'a> {
    pub modules: &'a [&'a Module],
    /// Name of the module the view is restricted to, if any.
    pub filter: Option<&'a str>,
}

/// Holds the last fetched snapshot and the active module filter.
#[derive(Debug, Default)]
pub struct ViewStateCache {
    snapshot: Option<Snapshot>,
    filter: Option<String>,
    generation: u64,
}

impl ViewStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Drops the held snapshot and installs `snapshot` in its place.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.generation += 1;
    }

    /// Bumped on every [`Self::replace`]; zero until the first load.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Sets the module filter. Blank names clear it.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|name| !name.trim().is_empty());
    }

    /// Resolves the modules the view should show.
    ///
    /// The returned list borrows from the cache; callers pass it to
    /// [`ViewData`] while they render.
    pub fn visible_modules(&self) -> Result<Vec<&Module>, ViewError> {
        let snapshot = self.snapshot.as_ref().ok_or(ViewError::NotLoaded)?;

        match self.filter.as_deref() {
            Some(filter) => snapshot.module(filter).map(|module| vec![module]).ok_or_else(|| {
                ViewError::FilterNotFound {
                    filter: filter.to_string(),
                    suggestion: closest_module(snapshot, filter),
                }
            }),
            None => Ok(snapshot.modules().collect()),
        }
    }

    /// Runs `f` over the current view.
    pub fn with_current_view<T>(&self, f: impl FnOnce(ViewData<'_>) -> T) -> Result<T, ViewError> {
        let modules = self.visible_modules()?;
        let filter = self.filter.as_deref();
        Ok(f(ViewData {
            modules: &modules,
            filter,
        }))
    }
}

fn closest_module(snapshot: &Snapshot, wanted: &str) -> Option<String> {
    let matcher = SkimMatcherV2::default().ignore_case();
    snapshot
        .module_names()
        .filter_map(|name| matcher.fuzzy_match(name, wanted).map(|score| (score, name)))
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Status, Subject};
    use std::collections::BTreeMap;

    fn snapshot(names: &[&str]) -> Snapshot {
        let modules = names
            .iter()
            .map(|name| {
                (
                    (*name).to_string(),
                    vec![Subject::new("Intro", Status::NotDone)],
                )
            })
            .collect();
        Snapshot::new(modules, BTreeMap::new(), None)
    }

    #[test]
    fn unfiltered_view_lists_every_module() {
        let mut cache = ViewStateCache::new();
        cache.replace(snapshot(&["A", "B"]));

        let names = cache
            .with_current_view(|view| {
                view.modules
                    .iter()
                    .map(|module| module.name.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn filter_restricts_to_one_module() {
        let mut cache = ViewStateCache::new();
        cache.replace(snapshot(&["A", "B"]));
        cache.set_filter(Some("B".to_string()));

        let (count, filter) = cache
            .with_current_view(|view| (view.modules.len(), view.filter.map(str::to_string)))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(filter.as_deref(), Some("B"));
    }

    #[test]
    fn missing_filter_signals_filter_not_found() {
        let mut cache = ViewStateCache::new();
        cache.replace(snapshot(&["A", "B"]));
        cache.set_filter(Some("C".to_string()));

        let error = cache.visible_modules().unwrap_err();
        assert!(matches!(error, ViewError::FilterNotFound { ref filter, .. } if filter == "C"));
    }

    #[test]
    fn filter_not_found_suggests_a_close_name() {
        let mut cache = ViewStateCache::new();
        cache.replace(snapshot(&["Math", "Programming"]));
        cache.set_filter(Some("prog".to_string()));

        let error = cache.visible_modules().unwrap_err();
        assert_eq!(
            error,
            ViewError::FilterNotFound {
                filter: "prog".to_string(),
                suggestion: Some("Programming".to_string()),
            }
        );
    }

    #[test]
    fn nothing_visible_before_first_load() {
        let cache = ViewStateCache::new();
        assert_eq!(cache.visible_modules().unwrap_err(), ViewError::NotLoaded);
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn replace_swaps_the_whole_snapshot() {
        let mut cache = ViewStateCache::new();
        cache.replace(snapshot(&["A", "B"]));
        cache.replace(snapshot(&["C"]));

        assert_eq!(cache.generation(), 2);
        let snapshot = cache.snapshot().unwrap();
        assert_eq!(snapshot.module_names().collect::<Vec<_>>(), vec!["C"]);
    }

    #[test]
    fn blank_filter_is_cleared() {
        let mut cache = ViewStateCache::new();
        cache.set_filter(Some("  ".to_string()));
        assert_eq!(cache.filter(), None);
    }
}
