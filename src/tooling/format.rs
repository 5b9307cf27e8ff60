//! Format rubrics, reports and class summaries as text.

use crate::aggregate::{format_grade, ClassSummary, StudentReport};
use crate::tree::GradingTree;
use crate::validation::{ScoreWarning, ValidationReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{CellAlignment, Table};
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn indented(label: &str, depth: usize) -> String {
    let label = if label.trim().is_empty() {
        "(unlabeled)"
    } else {
        label
    };
    format!("{}{}", "  ".repeat(depth), label)
}

fn right_align(table: &mut Table, columns: &[usize]) {
    for &index in columns {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Rubric as an indented table with each component's weight and raw maximum.
pub fn format_tree_text(course: &str, tree: &GradingTree) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Grading configuration: {}", course))
    );
    if tree.is_empty() {
        out.push_str("No grading components.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Component", "Key", "Weight", "Raw max"]);
    for entry in tree.walk() {
        let raw_max = if entry.component.is_leaf() {
            "-".to_string()
        } else {
            number(entry.component.raw_max_points())
        };
        table.add_row(vec![
            indented(&entry.component.label, entry.depth),
            entry.path.full_key(),
            number(entry.component.weight),
            raw_max,
        ]);
    }
    right_align(&mut table, &[2, 3]);
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Top-level weight total: {}\n", number(tree.total_weight())));
    out
}

pub fn format_validation_text(report: &ValidationReport) -> String {
    let mut out = if report.is_valid() {
        format!(
            "{} ({}/{} checks passed)",
            "Validation passed".green(),
            report.passed_checks(),
            report.checks.len()
        )
    } else {
        format!("{}", "Validation failed".red())
    };
    if !report.issues.is_empty() {
        out.push_str(&format!("\n\nErrors ({}):", report.issues.len()));
        for issue in &report.issues {
            out.push_str(&format!("\n  - {}", issue));
        }
    }
    if !report.warnings.is_empty() {
        out.push_str(&format!("\n\nWarnings ({}):", report.warnings.len()));
        for warning in &report.warnings {
            out.push_str(&format!("\n  - {}", warning));
        }
    }
    out
}

pub fn format_score_warnings(warnings: &[ScoreWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("  {} {}", "warning:".yellow(), w))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Student breakdown. Internal components show their rescaled contribution.
pub fn format_report_text(report: &StudentReport) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("{} / {}", report.course, report.student_id))
    );

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Component", "Score", "Max"]);
    for line in &report.lines {
        table.add_row(vec![
            indented(&line.label, line.depth),
            number(line.score),
            number(line.max),
        ]);
    }
    right_align(&mut table, &[1, 2]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!(
        "Total: {} / {} ({:.1}%)\n",
        number(report.total),
        number(report.max_total),
        report.percentage
    ));
    out.push_str(&format!("Grade: {}\n", format_grade(report.grade).bold()));
    out
}

pub fn format_summary_text(course: &str, summary: &ClassSummary) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Class summary: {}", course))
    );
    if summary.results.is_empty() {
        out.push_str("No students.\n");
        return out;
    }

    out.push_str(&format!(
        "Students: {}  Average: {:.2}  Passing: {}  At risk: {}\n\n",
        summary.results.len(),
        summary.average,
        summary.passing_count,
        summary.at_risk.len()
    ));

    let mut results = Table::new();
    results.load_preset(UTF8_BORDERS_ONLY);
    results.set_header(vec!["Student", "Total", "Grade"]);
    for result in &summary.results {
        results.add_row(vec![
            result.student_id.clone(),
            number(result.total),
            format_grade(result.grade),
        ]);
    }
    right_align(&mut results, &[1, 2]);
    out.push_str(&format!("{}\n\n", results));

    out.push_str(&format!("{}\n\n", format_section_heading("Grade distribution")));
    let mut distribution = Table::new();
    distribution.load_preset(UTF8_BORDERS_ONLY);
    distribution.set_header(vec!["Grade", "Students"]);
    for (grade, count) in summary.distribution.iter().rev() {
        distribution.add_row(vec![grade.clone(), count.to_string()]);
    }
    right_align(&mut distribution, &[1]);
    out.push_str(&format!("{}\n", distribution));

    if !summary.at_risk.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("At risk")));
        for result in &summary.at_risk {
            out.push_str(&format!(
                "  {} {}\n",
                result.student_id.red(),
                number(result.total)
            ));
        }
    }
    out
}
