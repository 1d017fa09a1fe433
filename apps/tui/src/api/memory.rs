use super::{ApiError, Endpoint, RemoteStore, StoreFuture};
use crate::domain::{History, Module, Snapshot, Status, Subject};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::info;

/// In-process store that follows the progress backend's rules.
///
/// Used by `--demo` mode and by tests that need a store without a network.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Clone)]
struct MemoryState {
    modules: BTreeMap<String, Vec<Subject>>,
    historical: BTreeMap<String, History>,
    last_reset: NaiveDate,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self::from_parts(BTreeMap::new(), BTreeMap::new(), today())
    }

    /// The data a fresh backend starts with.
    pub fn seeded() -> Self {
        let seed = [
            ("Math", ["Algebra", "Analysis"]),
            ("Programming", ["Python", "C++"]),
            ("Law", ["Civil Law", "Criminal Law"]),
        ];
        let modules = seed
            .into_iter()
            .map(|(module, subjects)| {
                let subjects = subjects
                    .into_iter()
                    .map(|name| Subject::new(name, Status::NotDone))
                    .collect();
                (module.to_string(), subjects)
            })
            .collect();

        Self::from_parts(modules, BTreeMap::new(), today())
    }

    pub fn from_parts(
        modules: BTreeMap<String, Vec<Subject>>,
        historical: BTreeMap<String, History>,
        last_reset: NaiveDate,
    ) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                modules,
                historical,
                last_reset,
            }),
        }
    }
}

impl MemoryState {
    fn daily_reset(&mut self, today: NaiveDate) {
        if today <= self.last_reset {
            return;
        }
        for subject in self.modules.values_mut().flatten() {
            subject.status = Status::NotDone;
        }
        self.last_reset = today;
        info!(%today, "daily reset applied");
    }

    fn snapshot(&self) -> Snapshot {
        let modules = self
            .modules
            .iter()
            .map(|(name, subjects)| (name.clone(), subjects.clone()))
            .collect();
        Snapshot::new(
            modules,
            self.historical.clone(),
            Some(self.last_reset.to_string()),
        )
    }

    fn set_status(&mut self, module: &str, subject: &str, status: Status, day: NaiveDate) {
        let subjects = self.modules.entry(module.to_string()).or_default();
        match subjects.iter_mut().find(|s| s.name == subject) {
            Some(existing) => existing.status = status,
            None => subjects.push(Subject::new(subject, status)),
        }

        let total = subjects.iter().map(|s| s.status.points()).sum();
        self.historical
            .entry(module.to_string())
            .or_default()
            .insert(day.to_string(), total);
    }

    fn delete_subject(&mut self, module: &str, subject: &str) -> Result<(), ApiError> {
        let subjects = self
            .modules
            .get_mut(module)
            .ok_or_else(|| not_found_subject(module, subject))?;
        let before = subjects.len();
        subjects.retain(|s| s.name != subject);
        if subjects.len() == before {
            return Err(not_found_subject(module, subject));
        }
        Ok(())
    }

    fn delete_module(&mut self, module: &str) -> Result<(), ApiError> {
        if self.modules.remove(module).is_none() {
            return Err(ApiError::remote(404, format!("Module '{module}' not found")));
        }
        self.historical.remove(module);
        Ok(())
    }

    fn rename_module(&mut self, old_name: &str, new_name: &str) -> Result<(), ApiError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ApiError::remote(400, "New module name is empty"));
        }
        if !self.modules.contains_key(old_name) {
            return Err(ApiError::remote(404, format!("Module '{old_name}' not found")));
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.modules.contains_key(new_name) {
            return Err(ApiError::remote(
                409,
                format!("Module '{new_name}' already exists"),
            ));
        }

        if let Some(subjects) = self.modules.remove(old_name) {
            self.modules.insert(new_name.to_string(), subjects);
        }
        if let Some(history) = self.historical.remove(old_name) {
            self.historical.insert(new_name.to_string(), history);
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn fetch_snapshot(&self) -> StoreFuture<'_, Snapshot> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            state.daily_reset(today());
            Ok(state.snapshot())
        })
    }

    fn fetch_module<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Module> {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(Module {
                name: name.to_string(),
                subjects: state.modules.get(name).cloned().unwrap_or_default(),
                history: state.historical.get(name).cloned().unwrap_or_default(),
            })
        })
    }

    fn set_status<'a>(
        &'a self,
        module: &'a str,
        subject: &'a str,
        status: Status,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if module.trim().is_empty() || subject.trim().is_empty() {
                return Err(ApiError::remote(400, "Missing fields"));
            }
            let mut state = self.state.lock().await;
            state.set_status(module, subject, status, today());
            Ok(())
        })
    }

    fn delete_subject<'a>(&'a self, module: &'a str, subject: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            Endpoint::DeleteSubject.resolve(state.delete_subject(module, subject))
        })
    }

    fn delete_module<'a>(&'a self, module: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            Endpoint::DeleteModule.resolve(state.delete_module(module))
        })
    }

    fn rename_module<'a>(&'a self, old_name: &'a str, new_name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            Endpoint::RenameModule.resolve(state.rename_module(old_name, new_name))
        })
    }
}

fn not_found_subject(module: &str, subject: &str) -> ApiError {
    ApiError::remote(
        404,
        format!("Subject '{subject}' not found in module '{module}'"),
    )
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_status_is_idempotent_and_visible_in_snapshot() {
        let store = MemoryStore::seeded();
        store.set_status("Math", "Algebra", Status::Done).await.unwrap();
        let first = store.fetch_snapshot().await.unwrap();
        store.set_status("Math", "Algebra", Status::Done).await.unwrap();
        let second = store.fetch_snapshot().await.unwrap();

        assert_eq!(first, second);
        let algebra = second.module("Math").unwrap().subject("Algebra").unwrap();
        assert_eq!(algebra.status, Status::Done);
    }

    #[tokio::test]
    async fn set_status_records_todays_points() {
        let store = MemoryStore::empty();
        store.set_status("Math", "Algebra", Status::Done).await.unwrap();
        store.set_status("Math", "Analysis", Status::InProgress).await.unwrap();

        let snapshot = store.fetch_snapshot().await.unwrap();
        let history = &snapshot.module("Math").unwrap().history;
        assert_eq!(history.get(&today().to_string()), Some(&3));
    }

    #[tokio::test]
    async fn deleting_a_missing_subject_is_a_no_op() {
        let store = MemoryStore::seeded();
        store.delete_subject("Math", "Topology").await.unwrap();
        store.delete_subject("Nowhere", "Topology").await.unwrap();
        assert_eq!(store.fetch_snapshot().await.unwrap().subject_count(), 6);
    }

    #[tokio::test]
    async fn deleting_a_missing_module_is_an_error() {
        let store = MemoryStore::seeded();
        let error = store.delete_module("Nowhere").await.unwrap_err();
        assert_eq!(error.user_message(), "Module 'Nowhere' not found");
    }

    #[tokio::test]
    async fn rename_moves_subjects_and_history() {
        let store = MemoryStore::empty();
        store.set_status("Math", "Algebra", Status::Done).await.unwrap();
        store.rename_module("Math", "Maths").await.unwrap();

        let snapshot = store.fetch_snapshot().await.unwrap();
        assert!(snapshot.module("Math").is_none());
        let maths = snapshot.module("Maths").unwrap();
        assert_eq!(maths.subjects.len(), 1);
        assert_eq!(maths.historical_total(), 2);
    }

    #[tokio::test]
    async fn rename_onto_existing_module_reports_conflict() {
        let store = MemoryStore::seeded();
        let error = store.rename_module("Math", "Law").await.unwrap_err();
        assert!(matches!(error, ApiError::Remote { code: 409, .. }));
    }

    #[tokio::test]
    async fn daily_reset_clears_statuses_once_per_day() {
        let yesterday = today().pred_opt().unwrap();
        let mut modules = BTreeMap::new();
        modules.insert(
            "Math".to_string(),
            vec![Subject::new("Algebra", Status::Done)],
        );
        let store = MemoryStore::from_parts(modules, BTreeMap::new(), yesterday);

        let snapshot = store.fetch_snapshot().await.unwrap();
        let algebra = snapshot.module("Math").unwrap().subject("Algebra").unwrap();
        assert_eq!(algebra.status, Status::NotDone);
        assert_eq!(snapshot.last_reset(), Some(today().to_string().as_str()));
    }

    #[tokio::test]
    async fn unknown_module_fetches_as_empty() {
        let store = MemoryStore::seeded();
        let module = store.fetch_module("Nowhere").await.unwrap();
        assert!(module.subjects.is_empty());
        assert!(module.history.is_empty());
    }
}
