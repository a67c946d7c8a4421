use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::{ACCESS_KEY_HEADER, COOKIES_PATH};
use crate::error::{AppError, CookieFailure};

/// Client for the local cookie store that holds the browser's session cookies.
pub struct CookieStore {
    client: Client,
    base_url: String,
    access_key: String,
}

/// One `name=value` pair as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieJarEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct CookiesResponse {
    cookies: Vec<Vec<serde_json::Value>>,
}

impl CookiesResponse {
    fn into_entries(self) -> Vec<CookieJarEntry> {
        self.cookies
            .iter()
            .map(|fields| CookieJarEntry {
                name: field_text(fields.first()),
                value: field_text(fields.get(1)),
            })
            .collect()
    }
}

// Name and value are strings in practice; anything else is kept in its JSON text form.
fn field_text(field: Option<&serde_json::Value>) -> String {
    match field {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

impl CookieStore {
    /// `base_url` is expected without a trailing slash.
    pub fn new(base_url: &str, access_key: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("subcount/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            access_key: access_key.to_string(),
        })
    }

    /// Fetch the cookies for `domain` and serialize them into a `Cookie` header value.
    pub async fn fetch_cookie_header(&self, domain: &str) -> Result<String, AppError> {
        let entries = self.fetch_cookies(domain).await?;
        tracing::debug!("Cookie store returned {} cookie(s) for {domain}", entries.len());
        Ok(serialize_cookies(&entries))
    }

    pub async fn fetch_cookies(&self, domain: &str) -> Result<Vec<CookieJarEntry>, AppError> {
        let url = format!("{}{}", self.base_url, COOKIES_PATH);
        tracing::debug!("GET {url}?domain={domain}");

        let resp = self
            .client
            .get(&url)
            .query(&[("domain", domain)])
            .header(ACCESS_KEY_HEADER, &self.access_key)
            .send()
            .await
            .map_err(|e| AppError::cookie_retrieval(domain, e))?;

        if resp.status() != StatusCode::OK {
            return Err(AppError::cookie_retrieval(
                domain,
                CookieFailure::Status(resp.status()),
            ));
        }

        let body: CookiesResponse = resp
            .json()
            .await
            .map_err(|e| AppError::cookie_retrieval(domain, e))?;

        Ok(body.into_entries())
    }
}

/// Join entries as `name=value; name=value` in the order given. Duplicates are kept.
pub fn serialize_cookies(entries: &[CookieJarEntry]) -> String {
    entries
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}
