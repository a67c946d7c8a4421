pub mod fanbox;
pub mod patreon;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::PlatformSelection;
use crate::error::AppError;
use crate::report::{ReportableRow, TotalUnit};

/// A funding platform whose private API lists the subscriptions of the
/// logged-in user.
#[async_trait]
pub trait SubscriptionPlatform: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Domain whose browser cookies authenticate requests to this platform.
    fn cookie_domain(&self) -> &str;
    fn total_unit(&self) -> TotalUnit;
    /// One authenticated request, normalized into report rows.
    async fn fetch_rows(&self, cookie_header: &str) -> Result<Vec<ReportableRow>, AppError>;
}

/// Build the selected platforms, in the order they are reported.
pub fn build_platform_registry(
    selection: PlatformSelection,
) -> Result<Vec<Arc<dyn SubscriptionPlatform>>, AppError> {
    let mut platforms: Vec<Arc<dyn SubscriptionPlatform>> = Vec::new();

    if selection.patreon {
        platforms.push(Arc::new(patreon::PatreonClient::new()?));
    }
    if selection.fanbox {
        platforms.push(Arc::new(fanbox::FanboxClient::new()?));
    }

    Ok(platforms)
}
