use crate::filter::MatcherSet;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table, presets};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;

/// Per-rule hit count over one evaluated line set.
#[derive(Debug, Clone, Serialize)]
pub struct RuleHit {
    pub index: usize,
    pub fragment: String,
    pub count: usize,
}

/// Verdict for a single candidate line.
#[derive(Debug, Clone, Serialize)]
pub struct LineVerdict {
    pub line_number: usize,
    pub matched: bool,
    /// Index of the first rule that matched, in extraction order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
    pub line: String,
}

/// Result of running a set of candidate lines through a matcher set.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub filter: String,
    pub total_lines: usize,
    pub matched_lines: usize,
    pub rule_hits: Vec<RuleHit>,
    pub verdicts: Vec<LineVerdict>,
}

/// Evaluate candidate lines against the matcher set in stored order.
pub fn evaluate_lines<'a>(
    set: &MatcherSet,
    filter: &str,
    lines: impl IntoIterator<Item = &'a str>,
) -> MatchReport {
    let mut rule_hits: Vec<RuleHit> = set
        .rules()
        .iter()
        .enumerate()
        .map(|(index, rule)| RuleHit {
            index,
            fragment: rule.fragment.clone(),
            count: 0,
        })
        .collect();

    let mut verdicts = Vec::new();
    let mut matched_lines = 0;

    for (idx, line) in lines.into_iter().enumerate() {
        let hit = set
            .rules()
            .iter()
            .position(|rule| rule.regex.is_match(line));
        if let Some(rule_index) = hit {
            matched_lines += 1;
            rule_hits[rule_index].count += 1;
        }
        verdicts.push(LineVerdict {
            line_number: idx + 1,
            matched: hit.is_some(),
            rule_index: hit,
            line: line.to_string(),
        });
    }

    MatchReport {
        filter: filter.to_string(),
        total_lines: verdicts.len(),
        matched_lines,
        rule_hits,
        verdicts,
    }
}

/// Format the compile status of a filter as text.
pub fn format_check_text(filter: &str, set: &MatcherSet) -> String {
    let mut out = String::new();
    let total = set.len() + set.diagnostics().len();
    let _ = writeln!(
        out,
        "CHECK {}: {} of {} fragment{} compiled",
        filter,
        set.len(),
        total,
        if total == 1 { "" } else { "s" }
    );

    if total == 0 {
        let _ = writeln!(out, "No failregex fragments found.");
        return out;
    }

    if set.diagnostics().is_empty() {
        let _ = writeln!(out, "\n{}", "All fragments compiled.".green());
    } else {
        out.push('\n');
        for diagnostic in set.diagnostics() {
            let _ = writeln!(out, " {} {}", "FAILED".red().bold(), diagnostic.fragment);
            let _ = writeln!(out, "        {}", diagnostic.error);
        }
    }

    out
}

/// Format the extracted rules and their expanded patterns as a table.
pub fn format_rules_text(filter: &str, set: &MatcherSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "RULES {}: {} compiled, {} failed",
        filter,
        set.len(),
        set.diagnostics().len()
    );

    if set.is_empty() && set.diagnostics().is_empty() {
        let _ = writeln!(out, "No failregex fragments found.");
        return out;
    }

    let mut table = create_styled_table(&["#", "Fragment", "Pattern"]);
    for (index, rule) in set.rules().iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&rule.fragment),
            Cell::new(&rule.pattern),
        ]);
    }
    let _ = writeln!(out, "{table}");

    for diagnostic in set.diagnostics() {
        let _ = writeln!(
            out,
            "{} {} ({})",
            "skipped:".yellow(),
            diagnostic.fragment,
            diagnostic.error
        );
    }

    out
}

/// JSON envelope shared by `check` and `info`.
pub fn format_rules_json(filter: &str, set: &MatcherSet) -> String {
    let rules: Vec<_> = set
        .rules()
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            json!({
                "index": index,
                "fragment": rule.fragment,
                "pattern": rule.pattern,
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "filter": filter,
        "generated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "compiled_count": set.len(),
        "failed_count": set.diagnostics().len(),
        "rules": rules,
        "diagnostics": set.diagnostics(),
    }))
    .unwrap_or_else(|_| "{\"error\":\"failed to serialize rules output\"}".into())
}

/// Format a match run as text: summary, per-rule hit table, verdicts.
///
/// Line verdicts are listed when `show_lines` is set (the `match`
/// subcommand and verbose `test` runs).
pub fn format_match_text(report: &MatchReport, show_lines: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "MATCHES {}: {} of {} line{}",
        report.filter,
        report.matched_lines,
        report.total_lines,
        if report.total_lines == 1 { "" } else { "s" }
    );

    if report.total_lines == 0 {
        let _ = writeln!(out, "No candidate lines supplied.");
        return out;
    }

    if !report.rule_hits.is_empty() {
        let mut table = create_styled_table(&["#", "Fragment", "Hits"]);
        for hit in &report.rule_hits {
            table.add_row(vec![
                Cell::new(hit.index + 1),
                Cell::new(&hit.fragment),
                Cell::new(hit.count),
            ]);
        }
        let _ = writeln!(out, "{table}");
    }

    if show_lines {
        for verdict in &report.verdicts {
            let label = if verdict.matched {
                "match   ".green()
            } else {
                "no-match".dimmed()
            };
            let _ = writeln!(out, " {:>4} {} {}", verdict.line_number, label, verdict.line);
        }
    }

    out
}

pub fn format_match_json(report: &MatchReport) -> String {
    serde_json::to_string_pretty(&json!({
        "generated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "report": report,
    }))
    .unwrap_or_else(|_| "{\"error\":\"failed to serialize match output\"}".into())
}

/// Create a table with the house style shared by all tabular output.
fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    table
}
