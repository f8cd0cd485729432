use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CycleRegularity {
    #[serde(alias = "Regular", alias = "Regular (21-35 days)")]
    Regular,
    #[serde(alias = "Irregular", alias = "Irregular (<21 or >35 days)")]
    Irregular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
    #[serde(alias = "Sedentary")]
    Sedentary,
    #[serde(alias = "Light")]
    Light,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "Active")]
    Active,
}

/// Self-reported symptoms. Each flag counts once toward the symptom total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symptoms {
    pub acne: bool,
    pub hair_loss: bool,
    pub hirsutism: bool,
    pub skin_darkening: bool,
    pub weight_gain: bool,
    pub fatigue: bool,
    pub mood_swings: bool,
    pub sleep_issues: bool,
}

impl Symptoms {
    pub fn count(&self) -> usize {
        [
            self.acne,
            self.hair_loss,
            self.hirsutism,
            self.skin_darkening,
            self.weight_gain,
            self.fatigue,
            self.mood_swings,
            self.sleep_issues,
        ]
        .iter()
        .filter(|flag| **flag)
        .count()
    }
}

/// One questionnaire submission. Lab values of 0.0 mean "not provided".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub hip_cm: f64,
    pub cycle_regularity: CycleRegularity,
    pub period_duration_days: u32,
    pub sleep_hours: f64,
    pub stress_level: u32,
    pub exercise_frequency: ExerciseFrequency,
    #[serde(flatten)]
    pub symptoms: Symptoms,
    #[serde(default)]
    pub fsh: f64,
    #[serde(default)]
    pub lh: f64,
    #[serde(default)]
    pub amh: f64,
}

impl Default for AssessmentInput {
    fn default() -> Self {
        Self {
            age: 25,
            height_cm: 160.0,
            weight_kg: 60.0,
            waist_cm: 70.0,
            hip_cm: 90.0,
            cycle_regularity: CycleRegularity::Regular,
            period_duration_days: 5,
            sleep_hours: 7.0,
            stress_level: 5,
            exercise_frequency: ExerciseFrequency::Sedentary,
            symptoms: Symptoms::default(),
            fsh: 0.0,
            lh: 0.0,
            amh: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub bmi: f64,
    /// `None` when the hip measurement is not positive.
    pub whr: Option<f64>,
    /// 0.0 when FSH was not provided.
    pub fsh_lh_ratio: f64,
    pub fsh_provided: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    Age,
    Bmi,
    WaistToHip,
    IrregularCycle,
    SymptomCount,
    Hirsutism,
    WeightGain,
    ShortSleep,
    HighStress,
    Exercise,
    LhAboveFsh,
    ElevatedAmh,
}

impl RiskRule {
    pub fn label(self) -> &'static str {
        match self {
            RiskRule::Age => "Age 18-35",
            RiskRule::Bmi => "BMI 25 or above",
            RiskRule::WaistToHip => "Waist-to-hip ratio above 0.85",
            RiskRule::IrregularCycle => "Irregular menstrual cycle",
            RiskRule::SymptomCount => "Reported symptoms",
            RiskRule::Hirsutism => "Excess facial/body hair",
            RiskRule::WeightGain => "Unexplained weight gain",
            RiskRule::ShortSleep => "Under 6 hours of sleep",
            RiskRule::HighStress => "Stress level 7 or above",
            RiskRule::Exercise => "Low exercise frequency",
            RiskRule::LhAboveFsh => "LH above FSH",
            RiskRule::ElevatedAmh => "AMH above 4.9 ng/mL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskFactor {
    pub rule: RiskRule,
    pub points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Display hint for renderers; carries no scoring meaning.
    pub fn style_tag(self) -> &'static str {
        match self {
            RiskTier::Low => "risk-low",
            RiskTier::Medium => "risk-medium",
            RiskTier::High => "risk-high",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            RiskTier::Low => "< 30%",
            RiskTier::Medium => "30-60%",
            RiskTier::High => "> 60%",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            RiskTier::Low => "Minimal risk factors",
            RiskTier::Medium => "Some risk factors present",
            RiskTier::High => "Multiple risk factors",
        }
    }

    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            RiskTier::Low => &[
                "Maintain healthy lifestyle with balanced diet and exercise",
                "Continue monitoring menstrual cycle patterns",
                "Schedule regular check-ups with healthcare provider",
            ],
            RiskTier::Medium => &[
                "Consult with healthcare provider for proper diagnosis",
                "Consider lifestyle modifications",
                "Monitor symptoms and keep records",
                "Consider hormone level tests",
            ],
            RiskTier::High => &[
                "Schedule appointment with healthcare provider ASAP",
                "Request comprehensive PCOS diagnostic tests",
                "Implement lifestyle changes focusing on weight management",
                "Consider consulting with endocrinologist or gynecologist",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub risk_score: f64,
    pub tier: RiskTier,
    pub recommendations: Vec<String>,
    pub style_tag: String,
    pub metrics: DerivedMetrics,
    pub factors: Vec<RiskFactor>,
}

/// One row of a batch run; rejected rows keep their error message.
#[derive(Debug, Clone)]
pub struct BatchRecord {
    pub row: usize,
    pub label: Option<String>,
    pub outcome: Result<AssessmentResult, String>,
}

#[derive(Debug, Clone)]
pub struct TierSummary {
    pub tier: RiskTier,
    pub count: usize,
    pub avg_score: f64,
}
