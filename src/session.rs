//
//  bitbucket-client
//  session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Resilient HTTP Session
//!
//! This module provides the HTTP collaborator the resource layer talks
//! through. It owns everything transport-related so the core never has to:
//!
//! - Authentication header injection
//! - Automatic retry with exponential backoff on idempotent requests
//! - Extraction of human-readable messages from API error bodies
//!
//! The resource layer treats the session as a black box satisfying
//! "perform HTTP verb, return response or raise". Retry policy lives here
//! and only here — callers never re-issue failed requests themselves.
//!
//! ## Error Body Formats
//!
//! Bitbucket Server reports errors in a handful of shapes, tried in order:
//!
//! ```json
//! {"message": "Human readable message"}
//! {"errorMessages": ["Human readable message"]}
//! {"errors": [{"message": "Human readable message"}]}
//! {"errors": {"field": "Human readable message"}}
//! ```
//!
//! On a 403 the `x-authentication-denied-reason` header takes precedence
//! over the body. If nothing matches, the raw body text is used.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_client::{AuthCredential, Options, Session};
//!
//! let session = Session::new(Options::new("https://bitbucket.example.com"))?
//!     .with_auth(AuthCredential::basic("jdoe", "secret"));
//!
//! let response = session
//!     .get("https://bitbucket.example.com/rest/api/1.0/projects", &[])
//!     .await?;
//! let body = response.json()?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Options;
use crate::error::{Error, Result};

/// Authentication credentials applied to outgoing requests.
///
/// Credentials are static header injection — there is no session handshake
/// or renewal flow. Use a personal access token where possible.
#[derive(Debug, Clone)]
pub enum AuthCredential {
    /// Basic HTTP authentication with username and password.
    Basic {
        /// The username for authentication.
        username: String,
        /// The password for authentication.
        password: String,
    },

    /// Personal Access Token for Bitbucket Server/Data Center.
    ///
    /// Sent as a bearer token in the `Authorization` header.
    PersonalAccessToken {
        /// The personal access token string.
        token: String,
    },
}

impl AuthCredential {
    /// Creates basic-auth credentials.
    pub fn basic(username: &str, password: &str) -> Self {
        Self::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Creates personal-access-token credentials.
    pub fn token(token: &str) -> Self {
        Self::PersonalAccessToken {
            token: token.to_string(),
        }
    }

    /// Applies these credentials to a request builder.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::PersonalAccessToken { token } => request.bearer_auth(token),
        }
    }
}

/// A response as delivered by the session.
///
/// Body text is buffered eagerly so the response can be inspected and
/// parsed without further I/O.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: String,
}

impl Response {
    /// The HTTP status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The effective URL the response was served from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The raw body text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON.
    ///
    /// An empty body parses to an empty JSON object — the resource layer
    /// decides whether that is acceptable. A non-empty body that is not
    /// valid JSON fails with [`Error::MalformedBody`] carrying the
    /// offending text.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.body).map_err(|source| {
            error!(url = %self.url, body = %self.body, "response body is not valid JSON");
            Error::MalformedBody {
                text: self.body.clone(),
                source,
            }
        })
    }
}

/// HTTP session with automatic retry and authentication.
///
/// Cheap to clone: the underlying connection pool and options are shared
/// between clones, so every materialized resource can carry its own handle.
///
/// Idempotent requests (GET) are retried up to the configured
/// `max_retries` on 429, 5xx and transport errors, with exponential
/// backoff. Non-idempotent requests are never retried — retrying a merge
/// with a stale version token could merge the wrong revision.
#[derive(Debug, Clone)]
pub struct Session {
    http: Client,
    options: Arc<Options>,
    auth: Option<AuthCredential>,
}

impl Session {
    /// Creates a session from client options.
    ///
    /// Fails with [`Error::Config`] if a configured default header cannot
    /// be parsed.
    pub fn new(options: Options) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid header value for {name:?}: {e}")))?;
            headers.insert(name, value);
        }

        let http = Client::builder()
            .user_agent(format!("bitbucket-client/{}", crate::VERSION))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            options: Arc::new(options),
            auth: None,
        })
    }

    /// Sets the authentication credentials for this session.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// The options this session was built from.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Performs a GET request.
    ///
    /// Retried on transient failures up to the configured budget.
    pub async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Response> {
        self.request(Method::GET, url, params, None).await
    }

    /// Performs a POST request with optional query params and JSON body.
    ///
    /// Never retried.
    pub async fn post(
        &self,
        url: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response> {
        self.request(Method::POST, url, params, body).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response> {
        // Only idempotent methods get a retry budget.
        let retries = if method == Method::GET {
            self.options.max_retries
        } else {
            0
        };

        let mut attempt: u32 = 0;
        loop {
            let mut builder = self.http.request(method.clone(), url);
            if !params.is_empty() {
                builder = builder.query(params);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }
            if let Some(auth) = &self.auth {
                builder = auth.apply_to_request(builder);
            }

            debug!(%method, url, attempt, "sending request");

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if retryable_status(status) && attempt < retries {
                        attempt += 1;
                        warn!(%status, url, attempt, "transient status, retrying");
                        tokio::time::sleep(backoff(attempt)).await;
                        continue;
                    }

                    let headers = response.headers().clone();
                    let final_url = response.url().clone();
                    let text = response.text().await?;

                    if !status.is_success() {
                        return Err(Error::Http {
                            status: status.as_u16(),
                            message: api_error_message(status, &headers, &text),
                            url: final_url.to_string(),
                        });
                    }

                    return Ok(Response {
                        status,
                        headers,
                        url: final_url,
                        body: text,
                    });
                }
                Err(err) => {
                    if (err.is_connect() || err.is_timeout()) && attempt < retries {
                        attempt += 1;
                        warn!(error = %err, url, attempt, "transport error, retrying");
                        tokio::time::sleep(backoff(attempt)).await;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }
}

fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(250 * 2u64.saturating_pow(attempt))
}

/// Extracts a human-readable message from an API error response.
fn api_error_message(status: StatusCode, headers: &HeaderMap, text: &str) -> String {
    if status == StatusCode::FORBIDDEN {
        if let Some(reason) = headers
            .get("x-authentication-denied-reason")
            .and_then(|v| v.to_str().ok())
        {
            return reason.to_string();
        }
    }

    if let Ok(json) = serde_json::from_str::<Value>(text) {
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }

        if let Some(message) = json
            .get("errorMessages")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        if let Some(errors) = json.get("errors") {
            if let Some(message) = errors
                .as_array()
                .and_then(|arr| arr.first())
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return message.to_string();
            }

            if let Some(map) = errors.as_object() {
                let joined = map
                    .values()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !joined.is_empty() {
                    return joined;
                }
            }
        }
    }

    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn session_for(server: &mockito::ServerGuard, max_retries: u32) -> Session {
        let mut options = Options::new(&server.url());
        options.max_retries = max_retries;
        Session::new(options).unwrap()
    }

    #[test]
    fn test_error_message_from_message_field() {
        let message = api_error_message(
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            r#"{"message": "Branch not found"}"#,
        );
        assert_eq!(message, "Branch not found");
    }

    #[test]
    fn test_error_message_from_error_messages_list() {
        let message = api_error_message(
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            r#"{"errorMessages": ["first", "second"]}"#,
        );
        assert_eq!(message, "first");
    }

    #[test]
    fn test_error_message_from_errors_array() {
        let message = api_error_message(
            StatusCode::CONFLICT,
            &HeaderMap::new(),
            r#"{"errors": [{"context": null, "message": "Version is out of date"}]}"#,
        );
        assert_eq!(message, "Version is out of date");
    }

    #[test]
    fn test_error_message_from_errors_map() {
        let message = api_error_message(
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            r#"{"errors": {"name": "may not be empty", "slug": "invalid"}}"#,
        );
        assert!(message.contains("may not be empty"));
        assert!(message.contains("invalid"));
    }

    #[test]
    fn test_error_message_prefers_denied_reason_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-authentication-denied-reason",
            HeaderValue::from_static("CAPTCHA_CHALLENGE"),
        );
        let message = api_error_message(StatusCode::FORBIDDEN, &headers, r#"{"message": "nope"}"#);
        assert_eq!(message, "CAPTCHA_CHALLENGE");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_text() {
        let message = api_error_message(
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            "<html>gateway</html>",
        );
        assert_eq!(message, "<html>gateway</html>");
    }

    #[tokio::test]
    async fn test_get_retries_transient_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/boom")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let session = session_for(&server, 2);
        let err = session
            .get(&format!("{}/boom", server.url()), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { status: 500, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_is_never_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/boom")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let session = session_for(&server, 3);
        let err = session
            .post(&format!("{}/boom", server.url()), &[], None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { status: 500, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_basic_auth_header_applied() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "Basic amRvZTpzZWNyZXQ=")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let session = session_for(&server, 0).with_auth(AuthCredential::basic("jdoe", "secret"));
        session
            .get(&format!("{}/user", server.url()), &[])
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_carries_extracted_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body(r#"{"errors": [{"message": "Project MISSING does not exist"}]}"#)
            .create_async()
            .await;

        let session = session_for(&server, 0);
        let err = session
            .get(&format!("{}/missing", server.url()), &[])
            .await
            .unwrap_err();

        match err {
            Error::Http {
                status, message, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Project MISSING does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_parses_to_empty_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let session = session_for(&server, 0);
        let response = session
            .get(&format!("{}/empty", server.url()), &[])
            .await
            .unwrap();
        assert_eq!(response.json().unwrap(), serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_malformed_body_keeps_offending_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/garbled")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let session = session_for(&server, 0);
        let response = session
            .get(&format!("{}/garbled", server.url()), &[])
            .await
            .unwrap();

        match response.json().unwrap_err() {
            Error::MalformedBody { text, .. } => assert_eq!(text, "not json at all"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
