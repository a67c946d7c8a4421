use comfy_table::{Cell, Table};

use super::{OutputOptions, PlatformReport, Report};

pub fn render(report: &Report, options: &OutputOptions) -> anyhow::Result<String> {
    let mut output = String::new();

    for platform in &report.platforms {
        output.push_str(&render_platform(platform, options));
        output.push('\n');
    }

    Ok(output)
}

/// Listing table, summary line, then a blank line.
pub fn render_platform(report: &PlatformReport, options: &OutputOptions) -> String {
    let mut output = String::new();

    if !report.rows.is_empty() {
        let mut table = Table::new();
        if !options.no_header {
            let mut header = vec!["Name", "Pledge"];
            if options.extended {
                header.push("URL");
            }
            table.set_header(header);
        }

        for r in report.sorted_rows(options.sort.as_deref()) {
            let mut cells = vec![
                Cell::new(r.name.as_deref().unwrap_or("")),
                Cell::new(&r.pledge),
            ];
            if options.extended {
                cells.push(Cell::new(r.url.as_deref().unwrap_or("")));
            }
            table.add_row(cells);
        }

        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&report.summary_line());
    output.push('\n');
    output
}
