//! Text report generation.
//!
//! This module renders a [`SummaryReport`] into the fixed-layout
//! `summary.txt` document. Formatting is pure: the same report always
//! produces byte-identical text.

use super::{Section, SummaryReport};
use crate::analysis::{
    AblationMStats, DatasetStats, DepthStats, JosephusStats, OstStats, PatternStats, PomStats,
};
use crate::models::Field;
use anyhow::{Context, Result};
use std::path::Path;

const RULE_WIDTH: usize = 70;
const UNIT: &str = "μs";

const CONCLUSION: [&str; 4] = [
    "The augmented data structures (OST and POM trees) demonstrate",
    "consistent O(log n) performance across all operations, with",
    "significant speedups over naive implementations, especially",
    "for large problem sizes.",
];

/// Generate the complete summary text.
pub fn generate_summary(report: &SummaryReport) -> String {
    let mut output = String::new();

    output.push_str(&generate_header());

    for section in report.sections() {
        output.push_str(&generate_section(section));
    }

    output.push_str(&generate_conclusion());

    output
}

/// Write the summary text to `path`.
pub fn write_summary(report: &SummaryReport, path: &Path) -> Result<()> {
    let content = generate_summary(report);
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}

fn double_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn generate_header() -> String {
    let mut header = String::new();

    header.push_str(&double_rule());
    header.push('\n');
    header.push_str("ABLATION STUDY SUMMARY REPORT\n");
    header.push_str("Augmented Data Structures: OST & POM Trees\n");
    header.push_str(&double_rule());
    header.push_str("\n\n");

    header
}

fn generate_section(section: &Section) -> String {
    let mut block = String::new();

    block.push_str(section.dataset.heading());
    block.push('\n');
    block.push_str(&"-".repeat(RULE_WIDTH));
    block.push('\n');

    let lines = match &section.outcome {
        Ok(DatasetStats::Ost(stats)) => ost_lines(stats),
        Ok(DatasetStats::Josephus(stats)) => josephus_lines(stats),
        Ok(DatasetStats::Pom(stats)) => pom_lines(stats),
        Ok(DatasetStats::AblationM(stats)) => ablation_m_lines(stats),
        Ok(DatasetStats::Depth(stats)) => depth_lines(stats),
        Ok(DatasetStats::Patterns(stats)) => pattern_lines(stats),
        Err(err) => vec![format!("Unavailable: {}", err.source)],
    };

    for line in lines {
        block.push_str("   ");
        block.push_str(&line);
        block.push('\n');
    }
    block.push('\n');

    block
}

fn ost_lines(stats: &OstStats) -> Vec<String> {
    vec![
        format!(
            "Tested sizes: {} to {} elements",
            plain(stats.min_n),
            plain(stats.max_n)
        ),
        format!(
            "Insert time (n={}): {} {}",
            group_digits(&plain(stats.last_n)),
            group_digits(&plain(stats.last_insert_time)),
            UNIT
        ),
        format!(
            "Avg select time per operation: {:.4} {}",
            stats.avg_select_per_op, UNIT
        ),
    ]
}

fn josephus_lines(stats: &JosephusStats) -> Vec<String> {
    vec![
        format!("Maximum speedup: {:.2}x", stats.max_speedup),
        format!(
            "Achieved at: n={}, m={}",
            plain(stats.max_at_n),
            plain(stats.max_at_m)
        ),
        format!("Average speedup: {:.2}x", stats.avg_speedup),
    ]
}

fn pom_lines(stats: &PomStats) -> Vec<String> {
    vec![
        format!(
            "Tested interval counts: {} to {}",
            plain(stats.min_intervals),
            plain(stats.max_intervals)
        ),
        format!(
            "FindPOM query time (n={}): {:.2} {}",
            group_digits(&plain(stats.last_intervals)),
            stats.last_findpom_time,
            UNIT
        ),
    ]
}

fn ablation_m_lines(stats: &AblationMStats) -> Vec<String> {
    vec![
        format!(
            "Varying m from {} to {}",
            plain(stats.min_m),
            plain(stats.max_m)
        ),
        format!(
            "Best speedup at m={}: {:.2}x",
            plain(stats.best.x),
            stats.best.y
        ),
        format!(
            "Worst speedup at m={}: {:.2}x",
            plain(stats.worst.x),
            stats.worst.y
        ),
    ]
}

fn depth_lines(stats: &DepthStats) -> Vec<String> {
    let verdict = if stats.logarithmic {
        "consistent with"
    } else {
        "deviates from"
    };

    vec![
        format!(
            "Linear regression: time = {:.4} * log₂(n) + {:.4}",
            stats.fit.slope, stats.fit.intercept
        ),
        format!(
            "R² = {:.4}: {} O(log n) growth",
            stats.fit.r_squared, verdict
        ),
    ]
}

fn pattern_lines(stats: &PatternStats) -> Vec<String> {
    stats
        .patterns
        .iter()
        .map(|p| {
            format!(
                "{:<15}: Insert={:>7} {}, FindPOM={:>6} {}",
                title_case(&p.pattern),
                fixed_grouped(p.insert_time, 0),
                UNIT,
                fixed_grouped(p.findpom_time, 2),
                UNIT
            )
        })
        .collect()
}

fn generate_conclusion() -> String {
    let mut footer = String::new();

    footer.push_str(&double_rule());
    footer.push('\n');
    footer.push_str("CONCLUSION\n");
    footer.push_str(&double_rule());
    footer.push('\n');
    for line in CONCLUSION {
        footer.push_str(line);
        footer.push('\n');
    }

    footer
}

/// A number as loaded: integers without a decimal point.
fn plain(value: f64) -> String {
    Field::Number(value).to_string()
}

/// Insert thousands separators into the integer part of a decimal string.
pub fn group_digits(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}

/// Fixed decimals with thousands separators: `1234.5, 2` becomes `1,234.50`.
pub fn fixed_grouped(value: f64, decimals: usize) -> String {
    group_digits(&format!("{:.*}", decimals, value))
}

/// Underscores to spaces, then capitalize every letter that follows a non-letter.
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut prev_is_letter = false;

    for c in label.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
