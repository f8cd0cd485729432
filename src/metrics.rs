use crate::models::{AssessmentInput, DerivedMetrics};

pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn waist_to_hip(waist_cm: f64, hip_cm: f64) -> Option<f64> {
    if hip_cm > 0.0 {
        Some(waist_cm / hip_cm)
    } else {
        None
    }
}

pub fn fsh_lh_ratio(fsh: f64, lh: f64) -> f64 {
    if fsh > 0.0 {
        lh / fsh
    } else {
        0.0
    }
}

impl DerivedMetrics {
    pub fn from_input(input: &AssessmentInput) -> Self {
        Self {
            bmi: bmi(input.height_cm, input.weight_kg),
            whr: waist_to_hip(input.waist_cm, input.hip_cm),
            fsh_lh_ratio: fsh_lh_ratio(input.fsh, input.lh),
            fsh_provided: input.fsh > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_uses_height_in_metres() {
        assert!((bmi(160.0, 60.0) - 23.4375).abs() < 1e-9);
        assert!((bmi(175.0, 70.0) - 22.857).abs() < 0.001);
    }

    #[test]
    fn waist_to_hip_requires_positive_hip() {
        let ratio = waist_to_hip(70.0, 90.0).unwrap();
        assert!((ratio - 0.7778).abs() < 0.001);
        assert_eq!(waist_to_hip(70.0, 0.0), None);
        assert_eq!(waist_to_hip(70.0, -5.0), None);
    }

    #[test]
    fn ratio_is_zero_without_fsh() {
        assert_eq!(fsh_lh_ratio(0.0, 8.0), 0.0);
        assert!((fsh_lh_ratio(5.0, 8.0) - 1.6).abs() < 1e-9);
    }

    #[test]
    fn derives_all_metrics_from_form_defaults() {
        let metrics = DerivedMetrics::from_input(&AssessmentInput::default());
        assert!((metrics.bmi - 23.4375).abs() < 1e-9);
        assert!(metrics.whr.is_some());
        assert_eq!(metrics.fsh_lh_ratio, 0.0);
        assert!(!metrics.fsh_provided);
    }

    #[test]
    fn zero_lh_still_counts_as_provided_fsh() {
        let input = AssessmentInput {
            fsh: 5.0,
            lh: 0.0,
            ..AssessmentInput::default()
        };
        let metrics = DerivedMetrics::from_input(&input);
        assert!(metrics.fsh_provided);
        assert_eq!(metrics.fsh_lh_ratio, 0.0);
    }
}
