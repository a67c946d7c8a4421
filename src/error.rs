use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not retrieve cookies for {domain}: {source}")]
    CookieRetrieval {
        domain: String,
        #[source]
        source: CookieFailure,
    },

    #[error("{platform} request failed ({}): {source}", describe_failure(.status, .source))]
    PlatformRequest {
        platform: String,
        status: Option<StatusCode>,
        #[source]
        source: reqwest::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why the cookie store did not hand over cookies.
#[derive(Debug, Error)]
pub enum CookieFailure {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Anything but `200 OK`, including other 2xx codes.
    #[error("unexpected HTTP {0}")]
    Status(StatusCode),
}

impl CookieFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Status(s) => Some(*s),
        }
    }
}

impl AppError {
    pub fn cookie_retrieval(domain: &str, source: impl Into<CookieFailure>) -> Self {
        Self::CookieRetrieval {
            domain: domain.to_string(),
            source: source.into(),
        }
    }

    pub fn platform_request(platform: &str, source: reqwest::Error) -> Self {
        Self::PlatformRequest {
            platform: platform.to_string(),
            status: source.status(),
            source,
        }
    }
}

fn describe_failure(status: &Option<StatusCode>, source: &reqwest::Error) -> String {
    match status {
        Some(s) => format!("HTTP {s}"),
        None if source.is_decode() => "malformed body".to_string(),
        None => "no response".to_string(),
    }
}
