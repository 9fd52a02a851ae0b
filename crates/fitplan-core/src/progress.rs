//! Weight progression simulation.
//!
//! Display-only: after a workout is logged, each recorded weight is bumped by
//! a random 5-10% to suggest next week's load. This is deliberately kept
//! apart from plan generation, which stays deterministic. The random source
//! is injected so callers (and tests) control it.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// Weight marker for bodyweight exercises; never progressed.
pub const BODYWEIGHT: &str = "BW";

/// Lower bound of the per-exercise increase, inclusive.
pub const MIN_INCREASE: f64 = 0.05;

/// Upper bound of the per-exercise increase, exclusive.
pub const MAX_INCREASE: f64 = 0.10;

/// One logged exercise. Fields other than `weight` are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseLog {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "weight_text"
    )]
    pub weight: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ExerciseLog {
    pub fn with_weight(weight: impl Into<String>) -> Self {
        Self {
            weight: Some(weight.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Body of `POST /api/update-weights`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeightsRequest {
    pub exercise_data: Vec<ExerciseLog>,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

/// Response of `POST /api/update-weights`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeightsResponse {
    pub success: bool,
    pub message: String,
    pub updated_weights: Vec<ExerciseLog>,
}

impl UpdateWeightsResponse {
    pub fn new(updated_weights: Vec<ExerciseLog>) -> Self {
        Self {
            success: true,
            message: "Weights updated successfully".to_owned(),
            updated_weights,
        }
    }
}

/// Suggest next weights for `logs`.
///
/// Entries without a weight, with an empty weight, or marked [`BODYWEIGHT`]
/// are returned unchanged, as are weights without a leading integer.
/// Otherwise the leading integer is scaled by `1 + U[0.05, 0.10)` and
/// rounded to the nearest whole number.
pub fn simulate_weight_progression<R: Rng>(
    logs: &[ExerciseLog],
    rng: &mut R,
) -> Vec<ExerciseLog> {
    logs.iter()
        .map(|log| {
            let Some(current) = log
                .weight
                .as_deref()
                .filter(|w| !w.is_empty() && *w != BODYWEIGHT)
                .and_then(leading_integer)
            else {
                return log.clone();
            };
            let increase = rng.random_range(MIN_INCREASE..MAX_INCREASE);
            let next = (current as f64 * (1.0 + increase)).round() as i64;
            ExerciseLog {
                weight: Some(next.to_string()),
                extra: log.extra.clone(),
            }
        })
        .collect()
}

/// Parse the integer prefix of `text` ("135 lbs" -> 135), ignoring leading
/// whitespace and accepting one sign.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}

/// Accept weights sent as JSON strings or numbers.
fn weight_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn leading_integer_parsing() {
        assert_eq!(leading_integer("135"), Some(135));
        assert_eq!(leading_integer("  135 lbs"), Some(135));
        assert_eq!(leading_integer("22.5"), Some(22));
        assert_eq!(leading_integer("-10"), Some(-10));
        assert_eq!(leading_integer("heavy"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn weights_increase_between_five_and_ten_percent() {
        let logs: Vec<ExerciseLog> = (0..200).map(|_| ExerciseLog::with_weight("100")).collect();
        let updated = simulate_weight_progression(&logs, &mut rng());
        for log in updated {
            let w: i64 = log.weight.unwrap().parse().unwrap();
            assert!((105..=110).contains(&w), "got {w}");
        }
    }

    #[test]
    fn bodyweight_and_missing_weights_pass_through() {
        let logs = vec![
            ExerciseLog::with_weight("BW"),
            ExerciseLog::default(),
            ExerciseLog::with_weight(""),
            ExerciseLog::with_weight("light"),
        ];
        let updated = simulate_weight_progression(&logs, &mut rng());
        assert_eq!(updated, logs);
    }

    #[test]
    fn same_seed_same_suggestions() {
        let logs = vec![ExerciseLog::with_weight("95"), ExerciseLog::with_weight("225")];
        let a = simulate_weight_progression(&logs, &mut rng());
        let b = simulate_weight_progression(&logs, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn other_fields_are_preserved() {
        let request: UpdateWeightsRequest = serde_json::from_value(json!({
            "exerciseData": [
                { "name": "Squat", "sets": 4, "weight": "200" },
                { "name": "Push-ups", "weight": "BW" },
                { "name": "Row", "weight": 80 }
            ],
            "week": 2,
            "day": 1
        }))
        .unwrap();
        assert_eq!(request.week, Some(2));
        assert_eq!(request.exercise_data[2].weight.as_deref(), Some("80"));

        let updated = simulate_weight_progression(&request.exercise_data, &mut rng());
        let body = serde_json::to_value(UpdateWeightsResponse::new(updated)).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Weights updated successfully");
        let weights = body["updatedWeights"].as_array().unwrap();
        assert_eq!(weights[0]["name"], "Squat");
        assert_eq!(weights[0]["sets"], 4);
        assert_ne!(weights[0]["weight"], "200");
        assert_eq!(weights[1], json!({ "name": "Push-ups", "weight": "BW" }));
    }
}
