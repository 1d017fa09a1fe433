use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use study_radar_tui::api::{ApiError, Endpoint, RemoteStore, StoreFuture};
use study_radar_tui::controller::{EditCommand, EditPhase, EditRejected};
use study_radar_tui::dashboard::Dashboard;
use study_radar_tui::domain::{Module, Snapshot, Status, Subject};
use study_radar_tui::nav::Route;
use tokio::sync::oneshot;

/// Store whose fetches block until the test releases them.
struct GatedStore {
    gates: Mutex<VecDeque<oneshot::Receiver<Snapshot>>>,
    fetches: AtomicUsize,
}

impl GatedStore {
    fn new(gates: Vec<oneshot::Receiver<Snapshot>>) -> Arc<Self> {
        Arc::new(Self {
            gates: Mutex::new(gates.into()),
            fetches: AtomicUsize::new(0),
        })
    }
}

impl RemoteStore for GatedStore {
    fn fetch_snapshot(&self) -> StoreFuture<'_, Snapshot> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(gate) => gate
                    .await
                    .map_err(|_| ApiError::Network("gate dropped".to_string())),
                None => Err(ApiError::Network("no gate left".to_string())),
            }
        })
    }

    fn fetch_module<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Module> {
        Box::pin(async move {
            Ok(Module {
                name: name.to_string(),
                subjects: Vec::new(),
                history: BTreeMap::new(),
            })
        })
    }

    fn set_status<'a>(
        &'a self,
        _module: &'a str,
        _subject: &'a str,
        _status: Status,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    fn delete_subject<'a>(&'a self, _module: &'a str, _subject: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async {
            Endpoint::DeleteSubject.resolve(Err(ApiError::remote(404, "Subject not found")))
        })
    }

    fn delete_module<'a>(&'a self, _module: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    fn rename_module<'a>(&'a self, _old_name: &'a str, new_name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            Err(ApiError::remote(
                409,
                format!("Module '{new_name}' already exists"),
            ))
        })
    }
}

fn snapshot(subject: &str, status: Status) -> Snapshot {
    Snapshot::new(
        vec![("Math".to_string(), vec![Subject::new(subject, status)])],
        BTreeMap::new(),
        None,
    )
}

fn set_status(subject: &str, status: Status) -> EditCommand {
    EditCommand::SetStatus {
        module: "Math".to_string(),
        subject: subject.to_string(),
        status,
    }
}

async fn apply_next(dashboard: &mut Dashboard) {
    let event = dashboard.next_event().await.unwrap();
    dashboard.apply(event);
}

#[tokio::test]
async fn fetch_that_resolves_last_wins() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let store = GatedStore::new(vec![first_rx, second_rx]);
    let mut dashboard = Dashboard::new(store.clone(), Route::Overview);

    dashboard.dispatch(set_status("Algebra", Status::Done)).unwrap();
    dashboard
        .dispatch(set_status("Analysis", Status::InProgress))
        .unwrap();

    let resolved_first = snapshot("Analysis", Status::InProgress);
    let resolved_last = snapshot("Algebra", Status::Done);

    // Release the gates in reverse order
    second_tx.send(resolved_first.clone()).unwrap();
    apply_next(&mut dashboard).await;
    assert_eq!(dashboard.cache().snapshot(), Some(&resolved_first));

    first_tx.send(resolved_last.clone()).unwrap();
    apply_next(&mut dashboard).await;

    assert_eq!(dashboard.cache().snapshot(), Some(&resolved_last));
    assert_eq!(dashboard.cache().generation(), 2);
    assert_eq!(dashboard.phase(), EditPhase::Idle);
    assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn deleting_an_absent_subject_still_refreshes() {
    let (tx, rx) = oneshot::channel();
    let store = GatedStore::new(vec![rx]);
    let mut dashboard = Dashboard::new(store.clone(), Route::progress("Math"));

    dashboard
        .dispatch(EditCommand::DeleteSubject {
            module: "Math".to_string(),
            subject: "Topology".to_string(),
        })
        .unwrap();
    let refreshed = snapshot("Algebra", Status::NotDone);
    tx.send(refreshed.clone()).unwrap();
    apply_next(&mut dashboard).await;

    assert_eq!(dashboard.cache().snapshot(), Some(&refreshed));
    assert!(dashboard.notice().is_none());
    assert_eq!(dashboard.session().table().map(|table| table.len()), Some(1));
}

#[tokio::test]
async fn failed_edit_leaves_snapshot_untouched() {
    let (tx, rx) = oneshot::channel();
    let store = GatedStore::new(vec![rx]);
    let mut dashboard = Dashboard::new(store.clone(), Route::Overview);

    let loaded = snapshot("Algebra", Status::Done);
    dashboard.request_refresh();
    tx.send(loaded.clone()).unwrap();
    apply_next(&mut dashboard).await;

    dashboard
        .dispatch(EditCommand::RenameModule {
            old_name: "Math".to_string(),
            new_name: "Law".to_string(),
        })
        .unwrap();
    apply_next(&mut dashboard).await;

    assert_eq!(dashboard.cache().snapshot(), Some(&loaded));
    assert_eq!(dashboard.cache().generation(), 1);
    assert_eq!(
        dashboard.notice().map(|notice| notice.message.as_str()),
        Some("Module 'Law' already exists")
    );
    // no refetch after a failed call
    assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn second_edit_on_same_target_is_rejected_while_in_flight() {
    let (_tx, rx) = oneshot::channel();
    let store = GatedStore::new(vec![rx]);
    let mut dashboard = Dashboard::new(store, Route::Overview);

    dashboard.dispatch(set_status("Algebra", Status::Done)).unwrap();
    let again = dashboard.dispatch(set_status("Algebra", Status::NotDone));

    assert!(matches!(again, Err(EditRejected::InFlight(_))));
    assert!(dashboard
        .dispatch(set_status("Analysis", Status::Done))
        .is_ok());
    assert_eq!(dashboard.phase(), EditPhase::Submitting);
}
