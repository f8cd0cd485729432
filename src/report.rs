use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AssessmentResult, BatchRecord, DerivedMetrics, RiskTier, TierSummary};

const DISCLAIMER: &str = "This assessment is for informational purposes only and is not a \
substitute for professional medical advice. Always consult with a qualified healthcare \
provider for proper diagnosis and treatment.";

fn whr_label(metrics: &DerivedMetrics) -> String {
    match metrics.whr {
        Some(ratio) => format!("{ratio:.2}"),
        None => "n/a".to_string(),
    }
}

fn ratio_label(metrics: &DerivedMetrics) -> String {
    if metrics.fsh_provided {
        format!("{:.2}", metrics.fsh_lh_ratio)
    } else {
        "not provided".to_string()
    }
}

pub fn render_text(result: &AssessmentResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "PCOS Risk Assessment");
    let _ = writeln!(output, "Risk score: {:.1}%", result.risk_score);
    let _ = writeln!(output, "Risk level: {}", result.tier.label());
    let _ = writeln!(output);
    let _ = writeln!(output, "BMI: {:.1}", result.metrics.bmi);
    let _ = writeln!(output, "Waist-to-Hip Ratio: {}", whr_label(&result.metrics));
    let _ = writeln!(output, "FSH/LH Ratio: {}", ratio_label(&result.metrics));

    if !result.factors.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Contributing factors:");
        for factor in &result.factors {
            let _ = writeln!(output, "  +{:<3} {}", factor.points, factor.rule.label());
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Recommendations:");
    for recommendation in &result.recommendations {
        let _ = writeln!(output, "  • {recommendation}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Understanding your risk score:");
    for tier in RiskTier::ALL {
        let _ = writeln!(
            output,
            "  {:<12} {:<7} {}",
            tier.label(),
            tier.range_label(),
            tier.summary()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Medical disclaimer: {DISCLAIMER}");
    output
}

pub fn render_markdown(result: &AssessmentResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "## Assessment Results");
    let _ = writeln!(
        output,
        "**{:.1}%** ({}, `{}`)",
        result.risk_score,
        result.tier.label(),
        result.style_tag
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "BMI {:.1} | Waist-to-Hip Ratio {} | FSH/LH Ratio {}",
        result.metrics.bmi,
        whr_label(&result.metrics),
        ratio_label(&result.metrics)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "### Recommendations");
    for recommendation in &result.recommendations {
        let _ = writeln!(output, "- {recommendation}");
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "### Understanding Your Risk Score");
    let _ = writeln!(output, "| Level | Range | Meaning |");
    let _ = writeln!(output, "|---|---|---|");
    for tier in RiskTier::ALL {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            tier.label(),
            tier.range_label(),
            tier.summary()
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "> **Medical Disclaimer:** {DISCLAIMER}");
    output
}

pub fn render_json(result: &AssessmentResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn summarize_by_tier(records: &[BatchRecord]) -> Vec<TierSummary> {
    let mut map: std::collections::BTreeMap<RiskTier, (usize, f64)> =
        std::collections::BTreeMap::new();

    for result in records.iter().filter_map(|record| record.outcome.as_ref().ok()) {
        let entry = map.entry(result.tier).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += result.risk_score;
    }

    map.into_iter()
        .map(|(tier, (count, total_score))| TierSummary {
            tier,
            count,
            avg_score: if count == 0 {
                0.0
            } else {
                total_score / count as f64
            },
        })
        .collect()
}

pub fn build_batch_report(
    source: &str,
    generated_on: NaiveDate,
    records: &[BatchRecord],
    limit: usize,
) -> String {
    let summaries = summarize_by_tier(records);
    let mut scored: Vec<(&BatchRecord, &AssessmentResult)> = records
        .iter()
        .filter_map(|record| record.outcome.as_ref().ok().map(|result| (record, result)))
        .collect();
    scored.sort_by(|a, b| {
        b.1.risk_score
            .partial_cmp(&a.1.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let rejected: Vec<(&BatchRecord, &String)> = records
        .iter()
        .filter_map(|record| record.outcome.as_ref().err().map(|err| (record, err)))
        .collect();

    let mut output = String::new();

    let _ = writeln!(output, "# PCOS Risk Batch Report");
    let _ = writeln!(
        output,
        "Generated {} from {} ({} rows, {} rejected)",
        generated_on,
        source,
        records.len(),
        rejected.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Tier Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No assessments scored in this batch.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {} ({}): {} assessments (avg score {:.1})",
                summary.tier.label(),
                summary.tier.range_label(),
                summary.count,
                summary.avg_score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Risk Assessments");

    if scored.is_empty() {
        let _ = writeln!(output, "No assessments scored in this batch.");
    } else {
        for (record, result) in scored.iter().take(limit) {
            let _ = writeln!(
                output,
                "- row {} ({}): {:.1}% {}",
                record.row,
                record.label.as_deref().unwrap_or("unlabelled"),
                result.risk_score,
                result.tier.label()
            );
        }
    }

    if !rejected.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Rejected Rows");
        for (record, err) in rejected {
            let _ = writeln!(output, "- row {}: {}", record.row, err);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "> {DISCLAIMER}");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssessmentInput;
    use crate::risk;

    fn record(row: usize, label: &str, input: &AssessmentInput) -> BatchRecord {
        BatchRecord {
            row,
            label: Some(label.to_string()),
            outcome: Ok(risk::compute_assessment(input)),
        }
    }

    #[test]
    fn text_report_lists_tier_recommendations() {
        let result = risk::compute_assessment(&AssessmentInput::default());
        let text = render_text(&result);

        assert!(text.contains("Risk score: 27.0%"));
        assert!(text.contains("Risk level: Low Risk"));
        assert!(text.contains("BMI: 23.4"));
        assert!(text.contains("Waist-to-Hip Ratio: 0.78"));
        assert!(text.contains("FSH/LH Ratio: not provided"));
        assert!(text.contains("• Continue monitoring menstrual cycle patterns"));
        assert!(text.contains("Medical disclaimer"));
    }

    #[test]
    fn ratio_shown_whenever_fsh_was_measured() {
        let input = AssessmentInput {
            fsh: 5.0,
            lh: 0.0,
            ..AssessmentInput::default()
        };
        let text = render_text(&risk::compute_assessment(&input));
        assert!(text.contains("FSH/LH Ratio: 0.00"));
    }

    #[test]
    fn markdown_report_carries_style_tag() {
        let input = AssessmentInput {
            stress_level: 9,
            sleep_hours: 5.0,
            ..AssessmentInput::default()
        };
        let result = risk::compute_assessment(&input);
        assert_eq!(result.risk_score, 45.0);

        let markdown = render_markdown(&result);
        assert!(markdown.contains("**45.0%** (Medium Risk, `risk-medium`)"));
        assert!(markdown.contains("- Consider hormone level tests"));
        assert!(markdown.contains("| High Risk | > 60% | Multiple risk factors |"));
    }

    #[test]
    fn json_output_exposes_contract_fields() {
        let result = risk::compute_assessment(&AssessmentInput::default());
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&result).unwrap()).unwrap();

        assert_eq!(json["tier"], "Low");
        assert_eq!(json["style_tag"], "risk-low");
        assert_eq!(json["recommendations"].as_array().unwrap().len(), 3);
        assert_eq!(json["factors"][0]["rule"], "age");
    }

    #[test]
    fn tier_summary_averages_scored_rows() {
        let records = vec![
            record(1, "a", &AssessmentInput::default()),
            record(
                2,
                "b",
                &AssessmentInput {
                    age: 40,
                    ..AssessmentInput::default()
                },
            ),
            BatchRecord {
                row: 3,
                label: None,
                outcome: Err("Invalid input: hip_cm must be greater than zero".to_string()),
            },
        ];

        let summaries = summarize_by_tier(&records);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].tier, RiskTier::Low);
        assert_eq!(summaries[0].count, 2);
        assert!((summaries[0].avg_score - 19.5).abs() < 1e-9);
    }

    #[test]
    fn batch_report_orders_by_score_and_lists_rejections() {
        let high = AssessmentInput {
            cycle_regularity: crate::models::CycleRegularity::Irregular,
            stress_level: 8,
            symptoms: crate::models::Symptoms {
                hirsutism: true,
                acne: true,
                ..Default::default()
            },
            ..AssessmentInput::default()
        };
        let records = vec![
            record(1, "low", &AssessmentInput::default()),
            record(2, "high", &high),
            BatchRecord {
                row: 3,
                label: None,
                outcome: Err("Invalid input: hip_cm must be greater than zero".to_string()),
            },
        ];

        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report = build_batch_report("intake.csv", date, &records, 10);

        assert!(report.contains("Generated 2026-10-19 from intake.csv (3 rows, 1 rejected)"));
        let high_pos = report.find("row 2 (high)").unwrap();
        let low_pos = report.find("row 1 (low)").unwrap();
        assert!(high_pos < low_pos);
        assert!(report.contains("## Rejected Rows"));
        assert!(report.contains("- row 3: Invalid input: hip_cm"));
    }

    #[test]
    fn empty_batch_reports_nothing_scored() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report = build_batch_report("empty.csv", date, &[], 10);
        assert!(report.contains("No assessments scored in this batch."));
        assert!(!report.contains("## Rejected Rows"));
    }
}
