//! Ties the store, cache, controller and render session together.
//!
//! Network work runs on spawned tasks. Their results come back as
//! [`DashboardEvent`]s and are applied one at a time by [`Dashboard::apply`],
//! in the order they arrive.

use crate::api::{ApiError, RemoteStore};
use crate::cache::{ViewError, ViewStateCache};
use crate::controller::{
    execute, Completion, EditCommand, EditController, EditOutcome, EditPhase, EditRejected,
};
use crate::domain::Snapshot;
use crate::nav::{hit_test, ChooserMenu, RadarClick, RadarSelection, Route, RouteError};
use crate::render::RenderSession;
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum DashboardEvent {
    Loaded(Result<Snapshot, ApiError>),
    EditFinished(EditOutcome),
}

/// A blocking message; the user has to dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

pub struct Dashboard {
    store: Arc<dyn RemoteStore>,
    cache: ViewStateCache,
    controller: EditController,
    session: RenderSession,
    route: Route,
    selection: RadarSelection,
    menu: Option<ChooserMenu>,
    notices: VecDeque<Notice>,
    loading: bool,
    events_tx: UnboundedSender<DashboardEvent>,
    events_rx: UnboundedReceiver<DashboardEvent>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn RemoteStore>, route: Route) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let mut cache = ViewStateCache::new();
        cache.set_filter(route.module_filter().map(str::to_string));

        Self {
            store,
            cache,
            controller: EditController::new(),
            session: RenderSession::new(),
            route,
            selection: RadarSelection::default(),
            menu: None,
            notices: VecDeque::new(),
            loading: false,
            events_tx,
            events_rx,
        }
    }

    pub const fn cache(&self) -> &ViewStateCache {
        &self.cache
    }

    pub const fn session(&self) -> &RenderSession {
        &self.session
    }

    pub const fn route(&self) -> &Route {
        &self.route
    }

    pub const fn selection(&self) -> RadarSelection {
        self.selection
    }

    pub const fn menu(&self) -> Option<&ChooserMenu> {
        self.menu.as_ref()
    }

    /// The oldest notice the user has not dismissed yet.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    pub const fn controller(&self) -> &EditController {
        &self.controller
    }

    pub fn phase(&self) -> EditPhase {
        self.controller.phase()
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while anything is waiting on the network.
    pub fn is_busy(&self) -> bool {
        self.loading || self.controller.in_flight_count() > 0
    }

    /// Fetches a fresh snapshot in the background.
    pub fn request_refresh(&mut self) {
        self.loading = true;
        let store = Arc::clone(&self.store);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = store.fetch_snapshot().await;
            if events.send(DashboardEvent::Loaded(result)).is_err() {
                debug!("dashboard gone before the snapshot arrived");
            }
        });
    }

    /// Submits an edit. The call and the refetch after it run in the
    /// background.
    pub fn dispatch(&mut self, command: EditCommand) -> Result<u64, EditRejected> {
        let submission = self.controller.submit(command, self.cache.filter())?;
        let ticket = submission.ticket;
        let store = Arc::clone(&self.store);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(store.as_ref(), submission).await;
            if events.send(DashboardEvent::EditFinished(outcome)).is_err() {
                debug!(ticket, "dashboard gone before the edit finished");
            }
        });
        Ok(ticket)
    }

    pub fn try_next_event(&mut self) -> Option<DashboardEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Waits for the next background result.
    pub async fn next_event(&mut self) -> Option<DashboardEvent> {
        self.events_rx.recv().await
    }

    /// Applies every result that has already arrived and returns the edit
    /// completions among them.
    pub fn drain_events(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Some(event) = self.try_next_event() {
            completions.extend(self.apply(event));
        }
        completions
    }

    /// Applies one result. Edit results also report how the edit ended.
    pub fn apply(&mut self, event: DashboardEvent) -> Option<Completion> {
        match event {
            DashboardEvent::Loaded(Ok(snapshot)) => {
                self.loading = false;
                info!(modules = snapshot.module_count(), "snapshot loaded");
                self.install(snapshot);
                None
            }
            DashboardEvent::Loaded(Err(err)) => {
                self.loading = false;
                error!(error = %err, "failed to load progress");
                self.raise(Notice::new("Could not load progress", err.user_message()));
                None
            }
            DashboardEvent::EditFinished(outcome) => {
                let completion = self.controller.complete(outcome, &mut self.cache);
                match &completion {
                    Completion::Applied { .. } => self.after_refresh(),
                    Completion::Failed { message } => {
                        self.raise(Notice::new("Edit failed", message.clone()));
                    }
                }
                Some(completion)
            }
        }
    }

    /// Queues a notice behind any the user has not dismissed yet.
    fn raise(&mut self, notice: Notice) {
        if let Some(pending) = self.notices.back() {
            warn!(
                pending = %pending.title,
                queued = %notice.title,
                "notice queued behind an undismissed one"
            );
        }
        self.notices.push_back(notice);
    }

    fn install(&mut self, snapshot: Snapshot) {
        self.cache.replace(snapshot);
        self.after_refresh();
    }

    fn after_refresh(&mut self) {
        self.selection.clear();
        self.menu = None;
        self.rerender();
    }

    fn rerender(&mut self) {
        match self.session.render(&self.cache) {
            Ok(()) | Err(ViewError::NotLoaded) => {}
            Err(ViewError::FilterNotFound { filter, suggestion }) => {
                warn!(%filter, ?suggestion, "module filter not found, back to overview");
                let message = match suggestion {
                    Some(name) => format!("Module \"{filter}\" does not exist. Did you mean \"{name}\"?"),
                    None => format!("Module \"{filter}\" does not exist."),
                };
                self.raise(Notice::new("Unknown module", message));
                self.navigate(Route::Overview);
            }
        }
    }

    pub fn navigate(&mut self, route: Route) {
        info!(location = %route.href(), "navigate");
        self.cache.set_filter(route.module_filter().map(str::to_string));
        self.route = route;
        self.menu = None;
        self.rerender();
    }

    pub fn navigate_href(&mut self, location: &str) -> Result<(), RouteError> {
        let route = Route::parse(location)?;
        self.navigate(route);
        Ok(())
    }

    /// Opens the progress screen for the selected radar axis, if any.
    pub fn open_selected(&mut self) {
        let module = self
            .session
            .radar()
            .and_then(|spec| self.selection.module(spec))
            .map(str::to_string);
        if let Some(module) = module {
            self.navigate(Route::progress(module));
        }
    }

    pub fn select_next_axis(&mut self) {
        if let Some(spec) = self.session.radar() {
            self.selection.next(spec);
        }
    }

    pub fn select_prev_axis(&mut self) {
        if let Some(spec) = self.session.radar() {
            self.selection.prev(spec);
        }
    }

    /// Handles a mouse click on the radar drawn in `area`.
    pub fn click_radar(&mut self, area: Rect, column: u16, row: u16) {
        let Some(spec) = self.session.radar() else {
            return;
        };
        match hit_test(spec, area, column, row) {
            RadarClick::Miss => self.menu = None,
            RadarClick::Single { axis, module } => {
                self.selection.select(axis);
                self.navigate(Route::progress(module));
            }
            RadarClick::Multiple { modules, anchor } => {
                self.open_menu(ChooserMenu::new(modules, anchor));
            }
        }
    }

    pub fn open_menu(&mut self, menu: ChooserMenu) {
        debug!(entries = menu.entries().len(), "chooser menu opened");
        self.menu = Some(menu);
    }

    pub fn menu_mut(&mut self) -> Option<&mut ChooserMenu> {
        self.menu.as_mut()
    }

    /// Opens the module picked in the chooser menu.
    pub fn choose(&mut self, module: &str) {
        self.menu = None;
        self.navigate(Route::progress(module));
    }

    pub fn dismiss_menu(&mut self) {
        self.menu = None;
    }

    /// Dismisses the oldest notice; the next queued one, if any, shows next.
    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
        if self.notices.is_empty() {
            self.controller.acknowledge_failure();
        }
    }
}
