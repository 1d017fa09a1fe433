use super::wire::{
    DeleteModuleRequest, DeleteSubjectRequest, Envelope, ModuleResponse, ModulesResponse,
    ProgressRequest, RenameModuleRequest,
};
use super::{ApiError, Endpoint, RemoteStore, StoreFuture};
use crate::domain::{Module, Snapshot, Status};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// [`RemoteStore`] backed by the HTTP progress API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base: Url,
}

impl HttpStore {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Network(format!("invalid API url `{base_url}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Network(format!(
                "invalid API url `{base_url}`: not a base url"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, endpoint: Endpoint, extra: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.segments());
            if let Some(extra) = extra {
                segments.push(extra);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(remote_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post<B: Serialize + Sync>(&self, endpoint: Endpoint, body: &B) -> Result<(), ApiError> {
        let url = self.url(endpoint, None);
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        let outcome = if status.is_success() {
            // Some endpoints answer 200 with `{error}`.
            match serde_json::from_str::<Envelope>(&text) {
                Ok(Envelope { error: Some(error) }) => Err(ApiError::remote(status.as_u16(), error)),
                _ => Ok(()),
            }
        } else {
            Err(remote_error(status, &text))
        };

        endpoint.resolve(outcome)
    }
}

impl RemoteStore for HttpStore {
    fn fetch_snapshot(&self) -> StoreFuture<'_, Snapshot> {
        Box::pin(async move {
            let response: ModulesResponse = self.get_json(self.url(Endpoint::Modules, None)).await?;
            Ok(response.into_snapshot())
        })
    }

    fn fetch_module<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Module> {
        Box::pin(async move {
            let response: ModuleResponse = self
                .get_json(self.url(Endpoint::Module, Some(name)))
                .await?;
            Ok(response.into_module(name))
        })
    }

    fn set_status<'a>(
        &'a self,
        module: &'a str,
        subject: &'a str,
        status: Status,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let body = ProgressRequest {
                module,
                subject,
                status,
            };
            self.post(Endpoint::Progress, &body).await
        })
    }

    fn delete_subject<'a>(&'a self, module: &'a str, subject: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let body = DeleteSubjectRequest { module, subject };
            self.post(Endpoint::DeleteSubject, &body).await
        })
    }

    fn delete_module<'a>(&'a self, module: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let body = DeleteModuleRequest { module };
            self.post(Endpoint::DeleteModule, &body).await
        })
    }

    fn rename_module<'a>(&'a self, old_name: &'a str, new_name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let body = RenameModuleRequest { old_name, new_name };
            self.post(Endpoint::RenameModule, &body).await
        })
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        warn!(%error, "request failed");
        ApiError::Network(error.to_string())
    }
}

fn remote_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_default();
    ApiError::remote(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls_under_the_base_path() {
        let store = HttpStore::new("http://127.0.0.1:5000", None).unwrap();
        assert_eq!(
            store.url(Endpoint::Modules, None).as_str(),
            "http://127.0.0.1:5000/api/modules"
        );

        let store = HttpStore::new("http://example.test/tracker/", None).unwrap();
        assert_eq!(
            store.url(Endpoint::RenameModule, None).as_str(),
            "http://example.test/tracker/api/rename_module"
        );
    }

    #[test]
    fn module_names_are_path_encoded() {
        let store = HttpStore::new("http://127.0.0.1:5000", None).unwrap();
        assert_eq!(
            store.url(Endpoint::Module, Some("Civil Law/2")).as_str(),
            "http://127.0.0.1:5000/api/module/Civil%20Law%2F2"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpStore::new("not a url", None),
            Err(ApiError::Network(_))
        ));
        assert!(HttpStore::new("mailto:me@example.test", None).is_err());
    }

    #[test]
    fn remote_error_uses_error_field() {
        let error = remote_error(StatusCode::BAD_REQUEST, r#"{"error": "Missing fields"}"#);
        assert_eq!(error, ApiError::remote(400, "Missing fields"));

        let error = remote_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(error, ApiError::remote(500, ""));
    }
}
