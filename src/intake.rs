use std::io::Read;
use std::path::Path;

use crate::error::{AssessmentError, Result};
use crate::models::{
    AssessmentInput, BatchRecord, CycleRegularity, ExerciseFrequency, Symptoms,
};
use crate::risk;

/// Each numeric field with the bounds of its questionnaire widget.
/// Values outside those bounds are accepted with a warning.
fn checked_fields(input: &AssessmentInput) -> [(&'static str, f64, f64, f64); 11] {
    [
        ("age", input.age as f64, 15.0, 50.0),
        ("height_cm", input.height_cm, 100.0, 250.0),
        ("weight_kg", input.weight_kg, 30.0, 200.0),
        ("waist_cm", input.waist_cm, 50.0, 150.0),
        ("hip_cm", input.hip_cm, 60.0, 200.0),
        ("period_duration_days", input.period_duration_days as f64, 1.0, 10.0),
        ("sleep_hours", input.sleep_hours, 3.0, 12.0),
        ("stress_level", input.stress_level as f64, 1.0, 10.0),
        ("fsh", input.fsh, 0.0, 20.0),
        ("lh", input.lh, 0.0, 20.0),
        ("amh", input.amh, 0.0, 20.0),
    ]
}

const LAB_FIELDS: [&str; 3] = ["fsh", "lh", "amh"];

/// Rejects inputs the scorer cannot meaningfully evaluate. Values outside the
/// questionnaire's usual ranges are accepted and logged.
pub fn validate(input: &AssessmentInput) -> Result<()> {
    for (field, value, _, _) in checked_fields(input) {
        if !value.is_finite() {
            return Err(AssessmentError::invalid(field, "must be a finite number"));
        }
        if LAB_FIELDS.contains(&field) {
            if value < 0.0 {
                return Err(AssessmentError::invalid(field, "must not be negative"));
            }
        } else if value <= 0.0 {
            return Err(AssessmentError::invalid(field, "must be greater than zero"));
        }
    }

    for warning in range_warnings(input) {
        tracing::warn!("{warning}");
    }
    Ok(())
}

pub fn range_warnings(input: &AssessmentInput) -> Vec<String> {
    checked_fields(input)
        .into_iter()
        .filter(|(_, value, min, max)| value < min || value > max)
        .map(|(field, value, min, max)| {
            format!("{field} = {value} is outside the usual range {min}-{max}")
        })
        .collect()
}

/// Reads a single JSON assessment from `path`, or from stdin when `path` is `-`.
pub fn load_json(path: &Path) -> Result<AssessmentInput> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| AssessmentError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        buffer
    } else {
        std::fs::read_to_string(path).map_err(|source| AssessmentError::Io {
            path: path.display().to_string(),
            source,
        })?
    };

    let input: AssessmentInput = serde_json::from_str(&raw)?;
    tracing::debug!(path = %path.display(), "loaded assessment input");
    Ok(input)
}

/// Scores every row of a CSV batch. A malformed or rejected row is recorded
/// with its error and the remaining rows are still assessed.
pub fn assess_csv(csv_path: &Path) -> Result<Vec<BatchRecord>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        label: Option<String>,
        age: u32,
        height_cm: f64,
        weight_kg: f64,
        waist_cm: f64,
        hip_cm: f64,
        cycle_regularity: CycleRegularity,
        period_duration_days: u32,
        sleep_hours: f64,
        stress_level: u32,
        exercise_frequency: ExerciseFrequency,
        #[serde(default)]
        acne: bool,
        #[serde(default)]
        hair_loss: bool,
        #[serde(default)]
        hirsutism: bool,
        #[serde(default)]
        skin_darkening: bool,
        #[serde(default)]
        weight_gain: bool,
        #[serde(default)]
        fatigue: bool,
        #[serde(default)]
        mood_swings: bool,
        #[serde(default)]
        sleep_issues: bool,
        #[serde(default)]
        fsh: Option<f64>,
        #[serde(default)]
        lh: Option<f64>,
        #[serde(default)]
        amh: Option<f64>,
    }

    let file = std::fs::File::open(csv_path).map_err(|source| AssessmentError::Io {
        path: csv_path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(row = row_number, error = %err, "skipping malformed row");
                records.push(BatchRecord {
                    row: row_number,
                    label: None,
                    outcome: Err(AssessmentError::from(err).to_string()),
                });
                continue;
            }
        };

        let input = AssessmentInput {
            age: row.age,
            height_cm: row.height_cm,
            weight_kg: row.weight_kg,
            waist_cm: row.waist_cm,
            hip_cm: row.hip_cm,
            cycle_regularity: row.cycle_regularity,
            period_duration_days: row.period_duration_days,
            sleep_hours: row.sleep_hours,
            stress_level: row.stress_level,
            exercise_frequency: row.exercise_frequency,
            symptoms: Symptoms {
                acne: row.acne,
                hair_loss: row.hair_loss,
                hirsutism: row.hirsutism,
                skin_darkening: row.skin_darkening,
                weight_gain: row.weight_gain,
                fatigue: row.fatigue,
                mood_swings: row.mood_swings,
                sleep_issues: row.sleep_issues,
            },
            fsh: row.fsh.unwrap_or(0.0),
            lh: row.lh.unwrap_or(0.0),
            amh: row.amh.unwrap_or(0.0),
        };

        let outcome = match validate(&input) {
            Ok(()) => Ok(risk::compute_assessment(&input)),
            Err(err) => {
                tracing::warn!(row = row_number, error = %err, "rejected row");
                Err(err.to_string())
            }
        };

        records.push(BatchRecord {
            row: row_number,
            label: row.label.filter(|label| !label.is_empty()),
            outcome,
        });
    }

    tracing::info!(rows = records.len(), path = %csv_path.display(), "batch assessed");
    Ok(records)
}
