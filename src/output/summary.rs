//! Terminal rendering of a metrics report.

use crate::aggregator::{AbcClass, GroupedAggregate};
use crate::report::{recommendations, MetricsReport};
use colored::*;

const RULE: &str = "---------------------------------------------------\n";

/// Human-readable summary of `report` for the terminal
pub fn render_summary(report: &MetricsReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));

    if report.is_empty() {
        out.push_str(&"No data to analyze".yellow().to_string());
        out.push('\n');
        return out;
    }

    out.push_str(&render_breakdown("Top categories", &report.category_aggregate));
    out.push_str(&render_breakdown("Top entities", &report.entity_aggregate));
    out.push_str(&render_classes(report));
    out.push_str(&render_savings(report));
    out.push_str(&render_recommendations(report));
    out
}

fn render_header(report: &MetricsReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Metrics Summary".bold().to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push_str(&format!("Records:     {}\n", report.record_count));
    out.push_str(&format!("Total value: {:.2}\n", report.total_value));
    out.push_str(&format!("Period:      {} days\n", report.period_days));
    out.push_str(RULE);
    out
}

fn render_breakdown(title: &str, aggregate: &GroupedAggregate) -> String {
    let mut out = String::new();
    if aggregate.is_empty() {
        return out;
    }

    out.push_str(&format!("\n{}:\n", title.bold()));
    for row in aggregate.rows.iter().take(5) {
        out.push_str(&format!(
            "  {:<24} {:>14.2} ({:.1}%)\n",
            row.key, row.value, row.percentage
        ));
    }
    out
}

fn render_classes(report: &MetricsReport) -> String {
    let mut out = String::new();

    if !report.abc.is_empty() {
        out.push_str(&format!("\n{}", "ABC classes".bold()));
        if let Some(column) = report.abc.group_by {
            out.push_str(&format!(" (by {})", column));
        }
        out.push_str(":\n");
        for class in [AbcClass::A, AbcClass::B, AbcClass::C] {
            out.push_str(&format!(
                "  {}: {} groups, {:.2}\n",
                class,
                report.abc.class_count(class),
                report.abc.class_total(class)
            ));
        }
    }

    if !report.pareto.is_empty() {
        out.push_str(&format!(
            "\nPareto frontier: {} of {} entities, {:.2}\n",
            report.pareto.frontier_count(),
            report.pareto.rows.len(),
            report.frontier_value
        ));
    }
    out.push_str(&format!("Peak periods:    {:.2}\n", report.peak_value));
    out
}

fn render_savings(report: &MetricsReport) -> String {
    let s = &report.savings;
    let p = &report.scenarios;

    let mut out = String::new();
    out.push('\n');
    out.push_str(&"What-if savings".bold().to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push_str(&format!("  A-class  (-{}%): {}\n", p.reduce_a, s.a));
    out.push_str(&format!("  Peak     (-{}%): {}\n", p.reduce_peak, s.peak));
    out.push_str(&format!("  Frontier (-{}%): {}\n", p.reduce_frontier, s.frontier));
    out.push_str(&format!("  Total:          {}\n", s.total));
    out.push_str(&format!(
        "  Annual:         {}\n",
        s.annual.to_string().green().bold()
    ));
    out.push_str(&format!(
        "  ROI:            {:.1}% on {:.0}\n",
        report.roi, p.investments
    ));
    out
}

fn render_recommendations(report: &MetricsReport) -> String {
    let recs = recommendations(report);
    let mut out = String::new();
    if recs.is_empty() {
        return out;
    }

    out.push('\n');
    out.push_str(&"Recommendations".bold().to_string());
    out.push('\n');
    for (i, rec) in recs.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, rec));
    }
    out
}
