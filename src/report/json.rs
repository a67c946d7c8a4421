use serde::Serialize;

use super::{PlatformReport, Report, ReportableRow};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: &'a str,
    platforms: Vec<JsonPlatform<'a>>,
}

#[derive(Serialize)]
struct JsonPlatform<'a> {
    platform: &'a str,
    subscriptions: &'a [ReportableRow],
    total: JsonTotal,
}

#[derive(Serialize)]
struct JsonTotal {
    count: usize,
    total: i64,
    display: String,
}

impl<'a> From<&'a PlatformReport> for JsonPlatform<'a> {
    fn from(report: &'a PlatformReport) -> Self {
        Self {
            platform: &report.platform,
            subscriptions: &report.rows,
            total: JsonTotal {
                count: report.total.count,
                total: report.total.total,
                display: report.total.display_amount(),
            },
        }
    }
}

pub fn render(report: &Report) -> anyhow::Result<String> {
    let view = JsonReport {
        generated_at: &report.generated_at,
        platforms: report.platforms.iter().map(JsonPlatform::from).collect(),
    };
    let mut out = serde_json::to_string_pretty(&view)?;
    out.push('\n');
    Ok(out)
}
