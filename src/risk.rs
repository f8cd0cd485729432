use crate::models::{
    AssessmentInput, AssessmentResult, CycleRegularity, DerivedMetrics, ExerciseFrequency,
    RiskFactor, RiskRule, RiskTier,
};

pub const MAX_SCORE: f64 = 100.0;
pub const MEDIUM_THRESHOLD: f64 = 30.0;
pub const HIGH_THRESHOLD: f64 = 60.0;
pub const POINTS_PER_SYMPTOM: f64 = 8.0;

pub fn age_points(age: u32) -> f64 {
    if (18..=35).contains(&age) {
        15.0
    } else {
        0.0
    }
}

/// Only one band applies: 25 <= bmi < 30 scores 20, bmi >= 30 scores 30.
pub fn bmi_points(bmi: f64) -> f64 {
    if (25.0..30.0).contains(&bmi) {
        20.0
    } else if bmi >= 30.0 {
        30.0
    } else {
        0.0
    }
}

pub fn waist_to_hip_points(whr: Option<f64>) -> f64 {
    match whr {
        Some(ratio) if ratio > 0.85 => 15.0,
        _ => 0.0,
    }
}

pub fn cycle_points(cycle: CycleRegularity) -> f64 {
    match cycle {
        CycleRegularity::Irregular => 25.0,
        CycleRegularity::Regular => 0.0,
    }
}

pub fn sleep_points(sleep_hours: f64) -> f64 {
    if sleep_hours < 6.0 {
        8.0
    } else {
        0.0
    }
}

pub fn stress_points(stress_level: u32) -> f64 {
    if stress_level >= 7 {
        10.0
    } else {
        0.0
    }
}

pub fn exercise_points(exercise: ExerciseFrequency) -> f64 {
    match exercise {
        ExerciseFrequency::Sedentary => 12.0,
        ExerciseFrequency::Light => 6.0,
        ExerciseFrequency::Moderate => 3.0,
        ExerciseFrequency::Active => 0.0,
    }
}

pub fn hormone_points(fsh: f64, lh: f64) -> f64 {
    if fsh > 0.0 && lh > fsh {
        20.0
    } else {
        0.0
    }
}

pub fn amh_points(amh: f64) -> f64 {
    if amh > 4.9 {
        15.0
    } else {
        0.0
    }
}

/// Evaluates every rule independently and returns the ones that added points,
/// in rule order. Hirsutism and weight gain count in the symptom total and
/// again as named bonuses.
pub fn score_factors(input: &AssessmentInput, metrics: &DerivedMetrics) -> Vec<RiskFactor> {
    let symptoms = &input.symptoms;
    let candidates = [
        (RiskRule::Age, age_points(input.age)),
        (RiskRule::Bmi, bmi_points(metrics.bmi)),
        (RiskRule::WaistToHip, waist_to_hip_points(metrics.whr)),
        (RiskRule::IrregularCycle, cycle_points(input.cycle_regularity)),
        (
            RiskRule::SymptomCount,
            symptoms.count() as f64 * POINTS_PER_SYMPTOM,
        ),
        (RiskRule::Hirsutism, if symptoms.hirsutism { 10.0 } else { 0.0 }),
        (RiskRule::WeightGain, if symptoms.weight_gain { 8.0 } else { 0.0 }),
        (RiskRule::ShortSleep, sleep_points(input.sleep_hours)),
        (RiskRule::HighStress, stress_points(input.stress_level)),
        (RiskRule::Exercise, exercise_points(input.exercise_frequency)),
        (RiskRule::LhAboveFsh, hormone_points(input.fsh, input.lh)),
        (RiskRule::ElevatedAmh, amh_points(input.amh)),
    ];

    candidates
        .into_iter()
        .filter(|(_, points)| *points > 0.0)
        .map(|(rule, points)| RiskFactor { rule, points })
        .collect()
}

pub fn raw_score(factors: &[RiskFactor]) -> f64 {
    factors.iter().map(|factor| factor.points).sum()
}

pub fn classify(score: f64) -> RiskTier {
    if score >= HIGH_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

pub fn compute_assessment(input: &AssessmentInput) -> AssessmentResult {
    let metrics = DerivedMetrics::from_input(input);
    let factors = score_factors(input, &metrics);
    let raw = raw_score(&factors);
    let risk_score = raw.min(MAX_SCORE);
    let tier = classify(risk_score);

    tracing::debug!(
        raw_score = raw,
        risk_score,
        tier = tier.label(),
        factors = factors.len(),
        "assessment scored"
    );

    AssessmentResult {
        risk_score,
        tier,
        recommendations: tier
            .recommendations()
            .iter()
            .map(|text| text.to_string())
            .collect(),
        style_tag: tier.style_tag().to_string(),
        metrics,
        factors,
    }
}
