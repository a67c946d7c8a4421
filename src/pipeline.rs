use crate::cookies::CookieStore;
use crate::error::AppError;
use crate::platform::SubscriptionPlatform;
use crate::report::PlatformReport;

/// Cookies, then the platform request, then aggregation. The first failure
/// ends this platform's run; nothing is retried.
pub async fn run_platform(
    store: &CookieStore,
    platform: &dyn SubscriptionPlatform,
) -> Result<PlatformReport, AppError> {
    tracing::info!(
        "Fetching {} cookies for {}",
        platform.cookie_domain(),
        platform.name()
    );
    let cookie_header = store.fetch_cookie_header(platform.cookie_domain()).await?;

    tracing::info!("Requesting {} subscriptions", platform.name());
    let rows = platform.fetch_rows(&cookie_header).await?;

    Ok(PlatformReport::build(
        platform.name(),
        rows,
        platform.total_unit(),
    ))
}
