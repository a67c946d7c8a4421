use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{COOKIE, ORIGIN, REFERER};
use serde::Deserialize;

use super::SubscriptionPlatform;
use crate::config::{FANBOX_API_URL, FANBOX_COOKIE_DOMAIN, FANBOX_ORIGIN, FANBOX_REFERER};
use crate::error::AppError;
use crate::report::{ReportableRow, TotalUnit};

/// Fanbox plans the user supports. Fees are whole yen.
pub struct FanboxClient {
    client: Client,
    base_url: String,
}

impl FanboxClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(FANBOX_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("subcount/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// The API rejects requests without a browser-like referer and origin.
    pub async fn fetch_supporting(
        &self,
        cookie_header: &str,
    ) -> Result<SupportingResponse, AppError> {
        let url = format!("{}/plan.listSupporting", self.base_url);
        tracing::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .header(COOKIE, cookie_header)
            .header(REFERER, FANBOX_REFERER)
            .header(ORIGIN, FANBOX_ORIGIN)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::platform_request(self.name(), e))?;

        resp.json()
            .await
            .map_err(|e| AppError::platform_request(self.name(), e))
    }
}

#[derive(Debug, Deserialize)]
pub struct SupportingResponse {
    pub body: Vec<SupportRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRecord {
    pub creator_id: String,
    pub fee: i64,
    pub user: PlanUser,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub has_adult_content: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl SupportRecord {
    /// The user's name, with the creator id appended when it says something new.
    /// Falls back to the creator id when the name is missing.
    pub fn display_name(&self) -> String {
        match self.user.name.as_deref() {
            Some(name) if name != self.creator_id => format!("{name} ({})", self.creator_id),
            _ => self.creator_id.clone(),
        }
    }

    pub fn profile_url(&self) -> String {
        format!("https://fanbox.cc/@{}", self.creator_id)
    }
}

pub fn normalize_support(resp: &SupportingResponse) -> Vec<ReportableRow> {
    resp.body
        .iter()
        .map(|plan| ReportableRow {
            name: Some(plan.display_name()),
            pledge: format!("{} JPY", plan.fee),
            url: Some(plan.profile_url()),
            amount: plan.fee,
        })
        .collect()
}

#[async_trait]
impl SubscriptionPlatform for FanboxClient {
    fn id(&self) -> &str {
        "fanbox"
    }

    fn name(&self) -> &str {
        "Fanbox"
    }

    fn cookie_domain(&self) -> &str {
        FANBOX_COOKIE_DOMAIN
    }

    fn total_unit(&self) -> TotalUnit {
        TotalUnit::Whole("JPY")
    }

    async fn fetch_rows(&self, cookie_header: &str) -> Result<Vec<ReportableRow>, AppError> {
        let resp = self.fetch_supporting(cookie_header).await?;
        tracing::debug!("Fanbox returned {} supported plan(s)", resp.body.len());
        Ok(normalize_support(&resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PlatformReport;
    use crate::test_support::serve_once;

    const SAMPLE: &str = r#"{
        "body": [
            {
                "id": "1001",
                "title": "Basic",
                "fee": 100,
                "description": "",
                "coverImageUrl": null,
                "creatorId": "alice",
                "hasAdultContent": false,
                "paymentMethod": "paypal",
                "user": {"userId": "11", "name": "alice", "iconUrl": "https://example.com/a.png"}
            },
            {
                "id": "1002",
                "title": "Premium",
                "fee": 200,
                "creatorId": "bobart",
                "user": {"userId": "12", "name": "Bob"}
            }
        ]
    }"#;

    fn parse(json: &str) -> SupportingResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_display_name_suffix() {
        let rows = normalize_support(&parse(SAMPLE));
        assert_eq!(rows[0].name.as_deref(), Some("alice"));
        assert_eq!(rows[1].name.as_deref(), Some("Bob (bobart)"));
    }

    #[test]
    fn test_fee_and_url() {
        let rows = normalize_support(&parse(SAMPLE));
        assert_eq!(rows[0].pledge, "100 JPY");
        assert_eq!(rows[0].url.as_deref(), Some("https://fanbox.cc/@alice"));
        assert_eq!(rows[1].pledge, "200 JPY");
        assert_eq!(rows[1].url.as_deref(), Some("https://fanbox.cc/@bobart"));
    }

    #[test]
    fn test_total_is_whole_yen() {
        let rows = normalize_support(&parse(SAMPLE));
        let report = PlatformReport::build("Fanbox", rows, TotalUnit::Whole("JPY"));
        assert_eq!(report.total.total, 300);
        assert_eq!(report.summary_line(), "Fanbox 2 subs total: 300 JPY");
    }

    #[test]
    fn test_missing_user_name_falls_back_to_creator_id() {
        let json = r#"{
            "body": [
                {"creatorId": "carol", "fee": 300, "user": {"userId": "13", "name": null}},
                {"creatorId": "dave", "fee": 400, "user": {}}
            ]
        }"#;
        let rows = normalize_support(&parse(json));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("carol"));
        assert_eq!(rows[1].name.as_deref(), Some("dave"));
        assert_eq!(rows[1].pledge, "400 JPY");
    }

    #[test]
    fn test_empty_body() {
        assert!(normalize_support(&parse(r#"{"body": []}"#)).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rows_sends_browser_headers() {
        let (base, handle) = serve_once(200, SAMPLE).await;
        let client = FanboxClient::with_base_url(&base).unwrap();

        let rows = client.fetch_rows("FANBOXSESSID=s3cr3t").await.unwrap();
        assert_eq!(rows.len(), 2);

        let req = handle.await.unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.target, "/plan.listSupporting");
        assert_eq!(req.header("cookie"), Some("FANBOXSESSID=s3cr3t"));
        assert_eq!(req.header("referer"), Some("https://www.fanbox.cc/"));
        assert_eq!(req.header("origin"), Some("https://www.fanbox.cc"));
    }

    #[tokio::test]
    async fn test_error_body_is_platform_error() {
        let (base, _handle) = serve_once(200, r#"{"error": "general_error"}"#).await;
        let client = FanboxClient::with_base_url(&base).unwrap();

        match client.fetch_rows("a=b").await.unwrap_err() {
            AppError::PlatformRequest {
                platform,
                status,
                source,
            } => {
                assert_eq!(platform, "Fanbox");
                assert!(status.is_none());
                assert!(source.is_decode());
            }
            other => panic!("expected PlatformRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_platform_error() {
        let (base, _handle) = serve_once(500, "{}").await;
        let client = FanboxClient::with_base_url(&base).unwrap();

        let err = client.fetch_rows("a=b").await.unwrap_err();
        assert!(matches!(err, AppError::PlatformRequest { ref platform, .. } if platform == "Fanbox"));
    }
}
