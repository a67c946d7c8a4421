use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;

use super::SubscriptionPlatform;
use crate::config::{PATREON_API_URL, PATREON_COOKIE_DOMAIN};
use crate::error::AppError;
use crate::report::{ReportableRow, TotalUnit, format_minor_units};

/// Patreon pledges, read from the private JSON:API endpoint the web app uses.
pub struct PatreonClient {
    client: Client,
    base_url: String,
}

impl PatreonClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(PATREON_API_URL)
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

    /// Campaigns are requested as the only side collection so the response
    /// shape does not depend on Patreon's default includes.
    pub async fn fetch_pledges(&self, cookie_header: &str) -> Result<PledgesResponse, AppError> {
        let url = format!("{}/pledges", self.base_url);
        tracing::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("include", "campaign"),
                ("json-api-use-default-includes", "false"),
            ])
            .header(COOKIE, cookie_header)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::platform_request(self.name(), e))?;

        resp.json()
            .await
            .map_err(|e| AppError::platform_request(self.name(), e))
    }
}

// ---------------------------------------------------------------------------
// Response deserialization
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PledgesResponse {
    pub data: Vec<PledgeRecord>,
    #[serde(default)]
    pub included: IncludedResources,
}

#[derive(Debug, Deserialize)]
pub struct PledgeRecord {
    pub id: String,
    pub attributes: PledgeAttributes,
    #[serde(default)]
    pub relationships: PledgeRelationships,
}

impl PledgeRecord {
    /// Id of the campaign this pledge belongs to, if the relationship is present.
    pub fn campaign_ref(&self) -> Option<&str> {
        self.relationships
            .campaign
            .as_ref()
            .and_then(|rel| rel.data.as_ref())
            .map(|ident| ident.id.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct PledgeAttributes {
    pub amount_cents: i64,
    pub currency: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PledgeRelationships {
    #[serde(default)]
    pub campaign: Option<Relationship>,
}

#[derive(Debug, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<ResourceIdentifier>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignAttributes {
    pub name: Option<String>,
    pub url: Option<String>,
    pub creation_name: Option<String>,
    pub summary: Option<String>,
    pub one_liner: Option<String>,
    pub pay_per_name: Option<String>,
    pub currency: Option<String>,
    pub patron_count: Option<u64>,
    pub is_monthly: Option<bool>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CampaignRecord {
    pub id: String,
    pub attributes: CampaignAttributes,
}

/// One entry of the `included` side collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawIncluded")]
pub enum IncludedResource {
    Campaign(CampaignRecord),
    Other {
        id: String,
        kind: Option<String>,
        name: Option<String>,
        url: Option<String>,
    },
}

#[derive(Deserialize)]
struct RawIncluded {
    id: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    attributes: serde_json::Value,
}

impl From<RawIncluded> for IncludedResource {
    fn from(raw: RawIncluded) -> Self {
        if raw.kind.as_deref() == Some("campaign")
            && let Ok(attributes) = serde_json::from_value::<CampaignAttributes>(raw.attributes.clone())
        {
            return Self::Campaign(CampaignRecord {
                id: raw.id,
                attributes,
            });
        }

        let text = |key: &str| {
            raw.attributes
                .get(key)
                .and_then(|v| v.as_str())
                .map(String::from)
        };
        Self::Other {
            name: text("name"),
            url: text("url"),
            id: raw.id,
            kind: raw.kind,
        }
    }
}

impl IncludedResource {
    pub fn id(&self) -> &str {
        match self {
            Self::Campaign(c) => &c.id,
            Self::Other { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Campaign(c) => c.attributes.name.as_deref(),
            Self::Other { name, .. } => name.as_deref(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Campaign(c) => c.attributes.url.as_deref(),
            Self::Other { url, .. } => url.as_deref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct IncludedResources(pub Vec<IncludedResource>);

impl IncludedResources {
    /// First resource with this id, whatever its type.
    pub fn find_by_id(&self, id: &str) -> Option<&IncludedResource> {
        self.0.iter().find(|r| r.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// A pledge paired with the campaign its foreign key points at.
#[derive(Debug)]
pub struct JoinedPledge<'a> {
    pub pledge: &'a PledgeRecord,
    pub campaign: Option<&'a IncludedResource>,
}

pub fn join_pledges(resp: &PledgesResponse) -> Vec<JoinedPledge<'_>> {
    resp.data
        .iter()
        .map(|pledge| {
            let campaign = pledge
                .campaign_ref()
                .and_then(|id| resp.included.find_by_id(id));
            if campaign.is_none() {
                tracing::warn!(
                    "Pledge {} references campaign {:?} which is not in the response",
                    pledge.id,
                    pledge.campaign_ref()
                );
            }
            JoinedPledge { pledge, campaign }
        })
        .collect()
}

pub fn normalize_pledges(resp: &PledgesResponse) -> Vec<ReportableRow> {
    join_pledges(resp)
        .into_iter()
        .map(|JoinedPledge { pledge, campaign }| ReportableRow {
            name: campaign.and_then(|c| c.name()).map(String::from),
            pledge: format!(
                "{} {}",
                format_minor_units(pledge.attributes.amount_cents),
                pledge.attributes.currency
            ),
            url: campaign.and_then(|c| c.url()).map(String::from),
            amount: pledge.attributes.amount_cents,
        })
        .collect()
}

#[async_trait]
impl SubscriptionPlatform for PatreonClient {
    fn id(&self) -> &str {
        "patreon"
    }

    fn name(&self) -> &str {
        "Patreon"
    }

    fn cookie_domain(&self) -> &str {
        PATREON_COOKIE_DOMAIN
    }

    fn total_unit(&self) -> TotalUnit {
        TotalUnit::MinorUnits
    }

    async fn fetch_rows(&self, cookie_header: &str) -> Result<Vec<ReportableRow>, AppError> {
        let resp = self.fetch_pledges(cookie_header).await?;
        tracing::debug!(
            "Patreon returned {} pledge(s), {} included resource(s)",
            resp.data.len(),
            resp.included.0.len()
        );
        Ok(normalize_pledges(&resp))
    }
}
