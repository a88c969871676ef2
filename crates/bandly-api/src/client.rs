// The single chokepoint for all HTTP calls to the backend.
//
// Base path: /api/v1/
// Auth: `Authorization: Bearer <token>` default header
//
// Every response passes through the envelope handlers below, so error
// normalization and null-coercion live in exactly one place. The facade
// never retries on its own.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{Envelope, ErrorBody, ListQuery, Page, PageEnvelope};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Bandly platform REST API.
///
/// Holds no per-request state; the resource modules
/// ([`resources`](crate::resources)) are stateless `impl` blocks layered
/// on the verb helpers here.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    ///
    /// Injects `Authorization: Bearer ...` as a sensitive default header
    /// on every request.
    pub fn new(
        base_url: &str,
        token: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Validation {
                field: "token".into(),
                reason: format!("not a valid header value: {e}"),
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL with the `/api/v1/` prefix appended once.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/v1/"));
        }

        Ok(url)
    }

    /// Absolute URL for the notification stream endpoint.
    pub fn stream_url(&self) -> Url {
        self.url("notifications/stream")
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"users"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/v1/`, so joining `users/…` works.
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_envelope(resp).await
    }

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, Error> {
        let url = self.url(path);
        let params = query.to_params();
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(&params).send().await?;
        self.handle_page(resp, query).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_envelope(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        self.handle_envelope(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Envelope handling ────────────────────────────────────────────

    /// Parse a `{success, data, error}` envelope, requiring `data`.
    async fn handle_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let envelope: Envelope<T> = parse_body(&body)?;
        if !envelope.success {
            return Err(server_error(status, envelope.error));
        }

        envelope.data.ok_or_else(|| Error::Parse {
            message: "envelope is missing the `data` field".into(),
            body,
        })
    }

    /// Parse an envelope where no payload is expected back.
    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        // Some mutation endpoints return 204 with no body at all.
        if body.trim().is_empty() {
            return Ok(());
        }

        let envelope: Envelope<serde_json::Value> = parse_body(&body)?;
        if envelope.success {
            Ok(())
        } else {
            Err(server_error(status, envelope.error))
        }
    }

    /// Parse a list envelope into a total [`Page`], coercing `data: null`
    /// to an empty sequence.
    async fn handle_page<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        query: &ListQuery,
    ) -> Result<Page<T>, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let envelope: PageEnvelope<T> = parse_body(&body)?;
        if !envelope.success {
            return Err(server_error(status, envelope.error));
        }

        Ok(envelope.into_page(query.cursor))
    }
}

// ── Error construction helpers ───────────────────────────────────────

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        Error::Parse {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Derive a [`Error::Server`] from a non-2xx body, falling back to the
/// HTTP status line when the envelope's `error` field is absent.
fn error_from_body(status: reqwest::StatusCode, body: &str) -> Error {
    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        #[serde(default)]
        error: Option<ErrorBody>,
    }

    let error = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error);
    server_error(status, error)
}

fn server_error(status: reqwest::StatusCode, error: Option<ErrorBody>) -> Error {
    let (code, message, details) = match error {
        Some(e) => (
            e.code.unwrap_or_else(|| "SERVER".to_owned()),
            e.message.unwrap_or_else(|| status.to_string()),
            e.details,
        ),
        None => ("SERVER".to_owned(), status.to_string(), None),
    };
    Error::Server {
        status: status.as_u16(),
        code,
        message,
        details,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_prefix_once() {
        let client =
            ApiClient::from_reqwest("https://learn.example.com", reqwest::Client::new()).unwrap();
        assert_eq!(
            client.url("users").as_str(),
            "https://learn.example.com/api/v1/users"
        );

        let client =
            ApiClient::from_reqwest("https://learn.example.com/api/v1/", reqwest::Client::new())
                .unwrap();
        assert_eq!(
            client.url("users").as_str(),
            "https://learn.example.com/api/v1/users"
        );
    }

    #[test]
    fn stream_url_points_at_notifications() {
        let client =
            ApiClient::from_reqwest("https://learn.example.com", reqwest::Client::new()).unwrap();
        assert_eq!(
            client.stream_url().as_str(),
            "https://learn.example.com/api/v1/notifications/stream"
        );
    }

    #[test]
    fn error_body_fallback_is_status_line() {
        let err = error_from_body(reqwest::StatusCode::BAD_GATEWAY, "not json");
        match err {
            Error::Server { status, code, .. } => {
                assert_eq!(status, 502);
                assert_eq!(code, "SERVER");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }
}
