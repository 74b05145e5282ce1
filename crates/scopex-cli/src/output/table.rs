use scopex_core::extraction::{BBox, PageLayout};
use scopex_core::model::DocumentReport;
use scopex_core::period::PeriodSource;
use std::fmt::Write;

pub fn print(reports: &[DocumentReport]) {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_report(report));
    }
}

pub fn format_report(report: &DocumentReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===\n", report.document);
    if let Some(ref label) = report.label {
        let _ = writeln!(out, "  {}", label);
    }
    let _ = writeln!(
        out,
        "  Period: {} ({})",
        report.period_labels.join(" / "),
        match report.period.source {
            PeriodSource::Filename => "from file name",
            PeriodSource::FirstPage => "from first page",
            PeriodSource::Default => "default",
        }
    );
    let _ = writeln!(out, "  Unit:   {}", report.unit.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  Pages:  {} processed", report.pages_processed);
    out.push('\n');

    let max_name = report.groups.keys().map(|g| g.len()).max().unwrap_or(5).max(5);
    let _ = writeln!(
        out,
        "  {:<width$}  {:<28}  {:<14}  Table",
        "Group",
        "Values",
        "Pages",
        width = max_name
    );
    let _ = writeln!(out, "  {}", "-".repeat(max_name + 2 + 28 + 2 + 14 + 2 + 12));

    for (group, result) in &report.groups {
        let _ = writeln!(
            out,
            "  {:<width$}  {:<28}  {:<14}  {}",
            group,
            join_or_dash(&result.values),
            join_pages(&result.pages),
            join_or_dash(&result.table.values),
            width = max_name
        );
    }

    if !report.failed_pages.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "  Skipped pages:");
        for failure in &report.failed_pages {
            let _ = writeln!(out, "    page {}: {}", failure.page_number, failure.reason);
        }
    }

    out
}

/// Page / container / line dump with boxes.
pub fn format_layout(pages: &[PageLayout]) -> String {
    let mut out = String::new();
    for page in pages {
        let _ = writeln!(out, "--- Page {} ---", page.page_number);
        for (ci, container) in page.containers.iter().enumerate() {
            let _ = writeln!(out, "  [{}] {}", ci, format_bbox(&container.bbox));
            for line in &container.lines {
                let _ = writeln!(out, "      {}  {}", format_bbox(&line.bbox), line.text());
            }
        }
    }
    out
}

fn format_bbox(bbox: &BBox) -> String {
    format!(
        "({:>7.1}, {:>7.1}, {:>7.1}, {:>7.1})",
        bbox.x0, bbox.y0, bbox.x1, bbox.y1
    )
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

fn join_pages(pages: &[usize]) -> String {
    if pages.is_empty() {
        return "-".to_string();
    }
    pages
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
