use std::sync::Arc;

use crate::config::Config;
use crate::cookies::CookieStore;
use crate::pipeline;
use crate::platform::{self, SubscriptionPlatform};
use crate::report::Report;

/// Outcome of running every selected platform.
pub struct CheckOutcome {
    pub report: Report,
    pub failed: Vec<String>,
}

pub async fn check(config: &Config) -> anyhow::Result<()> {
    if config.platforms.is_empty() {
        tracing::debug!("No platform selected, nothing to do");
        return Ok(());
    }

    let store = CookieStore::new(&config.api_url, &config.api_key)?;
    let platforms = platform::build_platform_registry(config.platforms)?;

    let outcome = check_platforms(&store, &platforms).await;
    print!("{}", outcome.report.render(&config.output)?);

    if !outcome.failed.is_empty() {
        anyhow::bail!("Failed to check {}", outcome.failed.join(", "));
    }
    Ok(())
}

/// Run the platforms one after another. A failure is reported and the next
/// platform still runs.
pub async fn check_platforms(
    store: &CookieStore,
    platforms: &[Arc<dyn SubscriptionPlatform>],
) -> CheckOutcome {
    let mut reports = Vec::new();
    let mut failed = Vec::new();

    for platform in platforms {
        eprintln!("Checking {}...", platform.name());
        match pipeline::run_platform(store, platform.as_ref()).await {
            Ok(report) => {
                tracing::info!(
                    "{}: {} subscription(s)",
                    platform.name(),
                    report.total.count
                );
                reports.push(report);
            }
            Err(e) => {
                tracing::error!("Error checking {}: {}", platform.id(), e);
                eprintln!("  Error: {e}");
                failed.push(platform.name().to_string());
            }
        }
    }

    CheckOutcome {
        report: Report::new(reports),
        failed,
    }
}
