//! Client side of the progress API.
//!
//! Every call is a single request/response exchange. Nothing here retries,
//! batches or caches; the caller decides when to refetch.

mod http;
mod memory;
mod wire;

pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::domain::{Module, Snapshot, Status};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`RemoteStore`] methods so the trait stays object safe.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),
    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The server answered with a failure.
    #[error("server returned {code}: {message}")]
    Remote { code: u16, message: String },
}

impl ApiError {
    pub fn remote(code: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Text shown to the user: the server's own message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Remote { code, .. } => format!("The server rejected the request (HTTP {code})."),
            Self::Network(_) => "Could not reach the progress server.".to_string(),
            Self::Decode(_) => "The progress server sent an unreadable response.".to_string(),
        }
    }
}

/// What an endpoint does when the entity it targets does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// A "not found" answer counts as success.
    NoOp,
    /// A "not found" answer is reported to the user.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Modules,
    Module,
    Progress,
    DeleteSubject,
    DeleteModule,
    RenameModule,
}

impl Endpoint {
    pub const fn segments(self) -> &'static [&'static str] {
        match self {
            Self::Modules => &["api", "modules"],
            Self::Module => &["api", "module"],
            Self::Progress => &["api", "progress"],
            Self::DeleteSubject => &["api", "delete"],
            Self::DeleteModule => &["api", "delete_module"],
            Self::RenameModule => &["api", "rename_module"],
        }
    }

    pub const fn absent_policy(self) -> AbsentPolicy {
        match self {
            Self::DeleteSubject => AbsentPolicy::NoOp,
            Self::Modules
            | Self::Module
            | Self::Progress
            | Self::DeleteModule
            | Self::RenameModule => AbsentPolicy::Error,
        }
    }

    /// Applies this endpoint's absent-entity contract to a raw outcome.
    pub fn resolve(self, outcome: Result<(), ApiError>) -> Result<(), ApiError> {
        match outcome {
            Err(ApiError::Remote { code: 404, message })
                if self.absent_policy() == AbsentPolicy::NoOp =>
            {
                tracing::debug!(endpoint = ?self, %message, "absent entity treated as no-op");
                Ok(())
            }
            other => other,
        }
    }
}

/// The remote progress store.
pub trait RemoteStore: Send + Sync {
    fn fetch_snapshot(&self) -> StoreFuture<'_, Snapshot>;

    /// One module with its history. Unknown names yield an empty module.
    fn fetch_module<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Module>;

    /// Upserts a subject. Repeating the same call leaves the same state.
    fn set_status<'a>(
        &'a self,
        module: &'a str,
        subject: &'a str,
        status: Status,
    ) -> StoreFuture<'a, ()>;

    fn delete_subject<'a>(&'a self, module: &'a str, subject: &'a str) -> StoreFuture<'a, ()>;

    fn delete_module<'a>(&'a self, module: &'a str) -> StoreFuture<'a, ()>;

    fn rename_module<'a>(&'a self, old_name: &'a str, new_name: &'a str) -> StoreFuture<'a, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_subject_swallows_not_found() {
        let outcome = Endpoint::DeleteSubject.resolve(Err(ApiError::remote(404, "missing")));
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn other_endpoints_keep_not_found() {
        for endpoint in [Endpoint::DeleteModule, Endpoint::RenameModule, Endpoint::Progress] {
            let outcome = endpoint.resolve(Err(ApiError::remote(404, "missing")));
            assert_eq!(outcome, Err(ApiError::remote(404, "missing")));
        }
    }

    #[test]
    fn delete_subject_keeps_other_failures() {
        let outcome = Endpoint::DeleteSubject.resolve(Err(ApiError::remote(500, "boom")));
        assert!(matches!(outcome, Err(ApiError::Remote { code: 500, .. })));
    }

    #[test]
    fn user_message_prefers_server_text() {
        let error = ApiError::remote(409, "Module 'Math' already exists");
        assert_eq!(error.user_message(), "Module 'Math' already exists");

        let error = ApiError::remote(500, "  ");
        assert!(error.user_message().contains("500"));

        let error = ApiError::Network("connection refused".to_string());
        assert_eq!(error.user_message(), "Could not reach the progress server.");
    }
}
