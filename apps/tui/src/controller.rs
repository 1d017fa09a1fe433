use crate::api::{ApiError, RemoteStore};
use crate::cache::ViewStateCache;
use crate::domain::{Snapshot, Status, DEFAULT_MODULE, PLACEHOLDER_SUBJECT};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

/// A user edit, as produced by the screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    SetStatus {
        module: String,
        subject: String,
        status: Status,
    },
    /// New subject typed into the add box. Goes to the filtered module, or
    /// [`DEFAULT_MODULE`] when nothing is filtered.
    AddSubject { name: String },
    DeleteSubject { module: String, subject: String },
    DeleteModule { module: String },
    RenameModule { old_name: String, new_name: String },
    /// Modules exist once they hold a subject, so this writes a placeholder.
    CreateModule { name: String },
}

/// The single backend call an [`EditCommand`] turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    SetStatus {
        module: String,
        subject: String,
        status: Status,
    },
    DeleteSubject { module: String, subject: String },
    DeleteModule { module: String },
    RenameModule { old_name: String, new_name: String },
}

/// What an edit touches; two edits with the same target never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditTarget {
    pub module: String,
    pub subject: Option<String>,
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{} / {subject}", self.module),
            None => f.write_str(&self.module),
        }
    }
}

impl EditCommand {
    /// Turns the command into a backend call. `None` means there is nothing
    /// to send, e.g. a blank name.
    pub fn resolve(self, filter: Option<&str>) -> Option<RemoteCall> {
        match self {
            Self::SetStatus {
                module,
                subject,
                status,
            } => Some(RemoteCall::SetStatus {
                module,
                subject,
                status,
            }),
            Self::AddSubject { name } => {
                let subject = name.trim();
                if subject.is_empty() {
                    return None;
                }
                Some(RemoteCall::SetStatus {
                    module: filter.unwrap_or(DEFAULT_MODULE).to_string(),
                    subject: subject.to_string(),
                    status: Status::Empty,
                })
            }
            Self::DeleteSubject { module, subject } => {
                Some(RemoteCall::DeleteSubject { module, subject })
            }
            Self::DeleteModule { module } => Some(RemoteCall::DeleteModule { module }),
            Self::RenameModule { old_name, new_name } => {
                let new_name = new_name.trim();
                if new_name.is_empty() {
                    return None;
                }
                Some(RemoteCall::RenameModule {
                    old_name,
                    new_name: new_name.to_string(),
                })
            }
            Self::CreateModule { name } => {
                let module = name.trim();
                if module.is_empty() {
                    return None;
                }
                Some(RemoteCall::SetStatus {
                    module: module.to_string(),
                    subject: PLACEHOLDER_SUBJECT.to_string(),
                    status: Status::Empty,
                })
            }
        }
    }
}

impl RemoteCall {
    pub fn target(&self) -> EditTarget {
        match self {
            Self::SetStatus {
                module, subject, ..
            }
            | Self::DeleteSubject { module, subject } => EditTarget {
                module: module.clone(),
                subject: Some(subject.clone()),
            },
            Self::DeleteModule { module }
            | Self::RenameModule {
                old_name: module, ..
            } => EditTarget {
                module: module.clone(),
                subject: None,
            },
        }
    }

    async fn send(&self, store: &dyn RemoteStore) -> Result<(), ApiError> {
        match self {
            Self::SetStatus {
                module,
                subject,
                status,
            } => store.set_status(module, subject, *status).await,
            Self::DeleteSubject { module, subject } => store.delete_subject(module, subject).await,
            Self::DeleteModule { module } => store.delete_module(module).await,
            Self::RenameModule { old_name, new_name } => {
                store.rename_module(old_name, new_name).await
            }
        }
    }
}

/// Overall state of the edit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    Submitting,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditRejected {
    #[error("nothing to submit")]
    Empty,
    #[error("{0} is already being saved")]
    InFlight(EditTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: u64,
    pub call: RemoteCall,
}

/// Result of a submission: the call itself followed by a full refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub ticket: u64,
    pub target: EditTarget,
    pub result: Result<Snapshot, ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The refetched snapshot is now in the cache.
    Applied { generation: u64 },
    /// Nothing changed locally; `message` is for the user.
    Failed { message: String },
}

/// Sends the call then refetches the whole snapshot. Never retries.
pub async fn execute(store: &dyn RemoteStore, submission: Submission) -> EditOutcome {
    let Submission { ticket, call } = submission;
    let target = call.target();

    let result = match call.send(store).await {
        Ok(()) => store.fetch_snapshot().await,
        Err(error) => Err(error),
    };

    EditOutcome {
        ticket,
        target,
        result,
    }
}

/// Tracks in-flight edits and applies their outcomes.
///
/// Outcomes are applied in the order they arrive, so the cache always holds
/// the snapshot of the most recently resolved fetch.
#[derive(Debug, Default)]
pub struct EditController {
    next_ticket: u64,
    in_flight: HashMap<EditTarget, u64>,
    last_failure: Option<String>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EditPhase {
        if !self.in_flight.is_empty() {
            return EditPhase::Submitting;
        }
        self.last_failure
            .as_ref()
            .map_or(EditPhase::Idle, |message| EditPhase::Failed {
                message: message.clone(),
            })
    }

    pub fn is_submitting(&self, target: &EditTarget) -> bool {
        self.in_flight.contains_key(target)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Moves a command into `Submitting`.
    pub fn submit(
        &mut self,
        command: EditCommand,
        filter: Option<&str>,
    ) -> Result<Submission, EditRejected> {
        let call = command.resolve(filter).ok_or(EditRejected::Empty)?;
        let target = call.target();
        if self.in_flight.contains_key(&target) {
            warn!(%target, "edit rejected: already in flight");
            return Err(EditRejected::InFlight(target));
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight.insert(target.clone(), ticket);
        self.last_failure = None;
        info!(ticket, %target, call = ?call, "edit submitted");

        Ok(Submission { ticket, call })
    }

    /// Applies a finished edit. Success replaces the cached snapshot whole;
    /// failure leaves it untouched.
    pub fn complete(&mut self, outcome: EditOutcome, cache: &mut ViewStateCache) -> Completion {
        if self.in_flight.get(&outcome.target) == Some(&outcome.ticket) {
            self.in_flight.remove(&outcome.target);
        }

        match outcome.result {
            Ok(snapshot) => {
                cache.replace(snapshot);
                info!(ticket = outcome.ticket, target = %outcome.target, "edit applied");
                Completion::Applied {
                    generation: cache.generation(),
                }
            }
            Err(error) => {
                warn!(ticket = outcome.ticket, target = %outcome.target, %error, "edit failed");
                let message = error.user_message();
                self.last_failure = Some(message.clone());
                Completion::Failed { message }
            }
        }
    }

    /// Clears a reported failure once the user has seen it.
    pub fn acknowledge_failure(&mut self) {
        self.last_failure = None;
    }
}
