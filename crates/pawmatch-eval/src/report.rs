use crate::metrics::{DistributionSummary, MetricsReport};

/// Render a deterministic markdown report from metrics.
pub fn render_report(metrics: &MetricsReport) -> String {
    let dataset = &metrics.dataset;
    let mut lines = Vec::new();

    lines.push("# Pawmatch Evaluation Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", metrics.run_id));
    if let Some(plan) = &metrics.plan_ref {
        lines.push(format!("- plan_version: {}", plan.plan_version));
        lines.push(format!("- seed: {}", plan.seed));
        lines.push(format!("- preference_weight: {}", plan.preference_weight));
    }
    lines.push(String::new());

    lines.push("## Targets and row counts".to_string());
    lines.push("| table | rows_expected | rows_found |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    for table in &metrics.tables {
        let expected = table
            .rows_expected
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "| {} | {} | {} |",
            table.table, expected, table.rows_found
        ));
    }
    lines.push(String::new());

    lines.push("## Matching".to_string());
    lines.push(format!(
        "- user-pet matrix density: {:.2}%",
        dataset.density_percent
    ));
    let match_rate = dataset
        .preference_match_rate
        .map(|rate| format!("{:.2}%", rate * 100.0))
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("- adoptions matching preferred type: {match_rate}"));
    lines.push(format!(
        "- users without adoptions: {}",
        dataset.users_without_adoptions
    ));
    lines.push(String::new());

    lines.push("## Adoptions per user".to_string());
    match &dataset.adoptions_per_user {
        Some(summary) => push_summary(&mut lines, summary),
        None => lines.push("- no adoptions recorded".to_string()),
    }
    lines.push(String::new());

    lines.push("## Adoptions by pet type".to_string());
    lines.push("| pet_type | adoptions |".to_string());
    lines.push("| --- | --- |".to_string());
    for entry in &dataset.adoptions_by_pet_type {
        lines.push(format!("| {} | {} |", entry.pet_type, entry.count));
    }
    lines.push(String::new());

    lines.push("## Breeds".to_string());
    lines.push(format!("- distinct breeds: {}", dataset.distinct_breeds));
    if !dataset.breed_frequency.is_empty() {
        lines.push("| breed | pets |".to_string());
        lines.push("| --- | --- |".to_string());
        for entry in &dataset.breed_frequency {
            lines.push(format!("| {} | {} |", entry.breed, entry.count));
        }
    }
    lines.push(String::new());

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(metrics));
    lines.join("\n")
}

fn push_summary(lines: &mut Vec<String>, summary: &DistributionSummary) {
    let std = summary
        .std
        .map(|value| format!("{value:.4}"))
        .unwrap_or_else(|| "-".to_string());
    lines.push("| stat | value |".to_string());
    lines.push("| --- | --- |".to_string());
    lines.push(format!("| count | {} |", summary.count));
    lines.push(format!("| mean | {:.4} |", summary.mean));
    lines.push(format!("| std | {std} |"));
    lines.push(format!("| min | {} |", summary.min));
    lines.push(format!("| 25% | {} |", summary.p25));
    lines.push(format!("| 50% | {} |", summary.p50));
    lines.push(format!("| 75% | {} |", summary.p75));
    lines.push(format!("| max | {} |", summary.max));
}

fn recommendations(metrics: &MetricsReport) -> Vec<String> {
    let dataset = &metrics.dataset;
    let mut lines = Vec::new();

    let short = metrics.tables.iter().any(|table| {
        table
            .rows_expected
            .is_some_and(|expected| table.rows_found < expected)
    });
    if short {
        lines.push(
            "- fewer rows than planned; check stop_reason in generation_report.json.".to_string(),
        );
    }
    if dataset.adoptions == 0 && dataset.pets > 0 && dataset.users > 0 {
        lines.push("- no adoptions; user budgets may not cover any adoption fee.".to_string());
    }
    if dataset.users_without_adoptions > 0 && dataset.adoptions > 0 {
        lines.push(format!(
            "- {} user(s) adopted nothing; raise the adoption target or budgets for wider coverage.",
            dataset.users_without_adoptions
        ));
    }
    if lines.is_empty() {
        lines.push("- no issues detected; compare metrics across runs for drift.".to_string());
    }
    lines
}
