//! Plain-text rendering of an analysis report.

use std::fmt::Write;

use crate::processing::analysis::AnalysisReport;

/// Render the report as a sequence of titled sections.
pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let summary = &report.summary;
    section(out, "Dataset")?;
    writeln!(
        out,
        "  Rows: {}\n  Columns: {} ({} numeric, {} categorical, {} datetime)",
        summary.rows, summary.columns, summary.numeric, summary.categorical, summary.temporal
    )?;
    for profile in &summary.column_profiles {
        writeln!(
            out,
            "  {:<20} {:<12} distinct: {:<6} missing: {:<6} e.g. {}",
            profile.name,
            profile.kind.label(),
            profile.distinct,
            profile.missing,
            profile.example.as_deref().unwrap_or("-")
        )?;
    }

    if !report.description.is_empty() {
        section(out, "Description")?;
        for d in &report.description {
            writeln!(
                out,
                "{}:\n  Count: {}\n  Mean: {:.3}\n  Std Dev: {:.3}\n  Min: {:.3}\n  Q1: {:.3}\n  Median: {:.3}\n  Q3: {:.3}\n  Max: {:.3}\n  IQR: {:.3}\n  Missing: {}",
                d.column, d.count, d.mean, d.std, d.min, d.q1, d.median, d.q3, d.max, d.iqr, d.missing
            )?;
        }
    }

    if !report.reliability.is_empty() {
        section(out, "30% rule")?;
        for (name, v) in report.reliability.iter() {
            writeln!(
                out,
                "  {name}: mean {} std {} ({}%) -> use {} ({})",
                v.mean,
                v.std,
                v.std_percent,
                v.recommended.label().to_lowercase(),
                if v.mean_reliable { "reliable" } else { "unreliable" }
            )?;
        }
    }

    section(out, "Normality")?;
    for (name, v) in report.normality.iter() {
        writeln!(
            out,
            "  {name}: skewness {} ({}), kurtosis {} ({}){}",
            v.skewness,
            v.skew_class.label(),
            v.kurtosis,
            v.kurt_class.label(),
            if v.is_normal { " normal" } else { "" }
        )?;
    }
    writeln!(out, "  {}", report.normality_summary.describe())?;

    if !report.outliers.is_empty() {
        section(out, "Outliers (1.5 x IQR)")?;
        for (name, o) in report.outliers.iter() {
            writeln!(
                out,
                "  {name}: {} ({}%, {} burden) outside [{}, {}]",
                o.count,
                o.percentage,
                o.burden().label(),
                o.lower_bound,
                o.upper_bound
            )?;
        }
    }

    if !report.correlation_methods.is_empty() {
        section(out, "Correlation method")?;
        for (name, s) in report.correlation_methods.iter() {
            writeln!(out, "  {name}: {} ({}, {:?})", s.method.label(), s.reason, s.severity)?;
        }
        if let Some(method) = report.overall_method {
            writeln!(out, "  Overall: {} - {}", method.label(), method.guidance())?;
        }
    }

    if let Some(matrix) = &report.correlation {
        section(out, &format!("{} correlation", matrix.method.label()))?;
        let width = matrix.columns.iter().map(String::len).max().unwrap_or(0).max(8);
        write!(out, "  {:width$}", "")?;
        for name in &matrix.columns {
            write!(out, " {name:>width$}")?;
        }
        writeln!(out)?;
        for (name, row) in matrix.columns.iter().zip(&matrix.values) {
            write!(out, "  {name:<width$}")?;
            for r in row {
                write!(out, " {r:>width$.3}")?;
            }
            writeln!(out)?;
        }

        if !report.high_correlations.is_empty() {
            writeln!(out, "  Potentially redundant pairs:")?;
            for pair in &report.high_correlations {
                writeln!(
                    out,
                    "    {} ~ {}: {:.3} ({})",
                    pair.first,
                    pair.second,
                    pair.coefficient,
                    pair.strength.label()
                )?;
            }
        }
    }

    section(out, "Advisories")?;
    if report.has_advisories() {
        for message in &report.advisories {
            writeln!(out, "  - {}", message.text)?;
        }
    } else {
        writeln!(out, "  No issues found: the data looks ready for analysis.")?;
    }
    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    if !out.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "== {title} ==")
}
