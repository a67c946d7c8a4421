pub mod json;
pub mod terminal;

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

/// Table options passed through from the command line.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub format: ReportFormat,
    /// Show the URL column.
    pub extended: bool,
    pub no_header: bool,
    /// Column to sort by; a leading `-` sorts descending.
    pub sort: Option<String>,
}

/// One subscription, in the shape shared by every platform.
#[derive(Debug, Clone, Serialize)]
pub struct ReportableRow {
    pub name: Option<String>,
    pub pledge: String,
    pub url: Option<String>,
    /// Raw amount in the platform's unit, before display formatting.
    pub amount: i64,
}

/// How a platform's summed amount is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalUnit {
    /// Amounts are in a currency's minor units; shown divided by 100, no suffix.
    MinorUnits,
    /// Amounts are whole currency units; shown as-is with a suffix.
    Whole(&'static str),
}

#[derive(Debug, Clone)]
pub struct PlatformTotal {
    pub count: usize,
    pub total: i64,
    pub unit: TotalUnit,
}

impl PlatformTotal {
    pub fn display_amount(&self) -> String {
        match self.unit {
            TotalUnit::MinorUnits => format_minor_units(self.total),
            TotalUnit::Whole(suffix) => format!("{} {suffix}", self.total),
        }
    }
}

impl fmt::Display for PlatformTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_amount())
    }
}

/// Sum `amount` over `items` starting from zero.
pub fn aggregate<T>(items: &[T], amount: impl Fn(&T) -> i64, unit: TotalUnit) -> PlatformTotal {
    PlatformTotal {
        count: items.len(),
        total: items.iter().map(amount).fold(0, |acc, a| acc + a),
        unit,
    }
}

/// `amount / 100` in its shortest decimal form (1500 -> "15", 1999 -> "19.99").
/// Assumes a two-decimal currency.
pub fn format_minor_units(amount: i64) -> String {
    (amount as f64 / 100.0).to_string()
}

#[derive(Debug)]
pub struct PlatformReport {
    pub platform: String,
    pub rows: Vec<ReportableRow>,
    pub total: PlatformTotal,
}

impl PlatformReport {
    pub fn build(platform: &str, rows: Vec<ReportableRow>, unit: TotalUnit) -> Self {
        let total = aggregate(&rows, |r| r.amount, unit);
        Self {
            platform: platform.to_string(),
            rows,
            total,
        }
    }

    /// `"{Platform} {count} subs total: {total}"`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} subs total: {}",
            self.platform, self.total.count, self.total
        )
    }

    /// Rows in display order according to `sort`.
    pub fn sorted_rows(&self, sort: Option<&str>) -> Vec<&ReportableRow> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        let Some(key) = sort else {
            return rows;
        };
        let (column, descending) = match key.strip_prefix('-') {
            Some(c) => (c, true),
            None => (key, false),
        };

        let compare: fn(&ReportableRow, &ReportableRow) -> Ordering = match column {
            "name" => |a, b| a.name.cmp(&b.name),
            "pledge" => |a, b| a.amount.cmp(&b.amount),
            "url" => |a, b| a.url.cmp(&b.url),
            other => {
                tracing::warn!("Unknown sort column '{other}', keeping platform order");
                return rows;
            }
        };

        rows.sort_by(|a, b| {
            let ord = compare(a, b);
            if descending { ord.reverse() } else { ord }
        });
        rows
    }
}

#[derive(Debug)]
pub struct Report {
    pub generated_at: String,
    pub platforms: Vec<PlatformReport>,
}

impl Report {
    pub fn new(platforms: Vec<PlatformReport>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            platforms,
        }
    }

    pub fn render(&self, options: &OutputOptions) -> anyhow::Result<String> {
        match options.format {
            ReportFormat::Table => terminal::render(self, options),
            ReportFormat::Json => json::render(self),
        }
    }
}
