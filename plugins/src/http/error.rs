use escoba_core::api::{CatalogUnavailable, TransportError};
use std::{error::Error as StdError, fmt};

pub(crate) const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl HttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct HttpError {
    kind: HttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl HttpError {
    pub fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            HttpErrorKind::Timeout
        } else if err.is_connect() {
            HttpErrorKind::Connect
        } else if err.is_request() {
            HttpErrorKind::Request
        } else if err.is_body() {
            HttpErrorKind::Body
        } else if err.is_decode() {
            HttpErrorKind::Decode
        } else {
            HttpErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        HttpError {
            kind,
            status,
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub(crate) fn status_error(status: u16, url: String, message: String) -> Self {
        HttpError {
            kind: HttpErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message,
            source: None,
        }
    }

    pub(crate) fn decode_error(
        status: u16,
        url: String,
        err: serde_json::Error,
        preview: String,
    ) -> Self {
        let message = format!("failed to decode response body: {} | body={}", err, preview);
        HttpError {
            kind: HttpErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    /// Short text for the session log; the URL stays in tracing output only.
    fn summary(&self) -> String {
        match self.kind {
            HttpErrorKind::Status => self.message.clone(),
            kind => format!("{} error: {}", kind, self.message),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl From<HttpError> for TransportError {
    fn from(err: HttpError) -> Self {
        TransportError::new(err.status, err.summary())
    }
}

impl From<HttpError> for CatalogUnavailable {
    fn from(err: HttpError) -> Self {
        CatalogUnavailable::new(err.to_string())
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

/// `"<reason>: <detail>"` for a non-2xx reply. The simulation service answers
/// failures with `{"error": "..."}`; other bodies are previewed as-is.
pub(crate) fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
    match detail {
        Some(detail) => format!("{}: {}", reason, detail),
        None if body.trim().is_empty() => reason.to_string(),
        None => format!("{}: {}", reason, preview_body(body)),
    }
}
