use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Window used by every "recent submissions" signal (anti-farming, trend, suggestions).
pub const RECENT_WINDOW: usize = 5;

/// Problem difficulty. Anything the platform reports outside the three known
/// labels lands in `Unknown`, which the engines map to their fallback constants.
/// Events that omit the field default to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    pub fn parse(label: &str) -> Self {
        match label {
            "Easy" => Difficulty::Easy,
            "Medium" => Difficulty::Medium,
            "Hard" => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Difficulty::parse(&label))
    }
}

/// Outcome of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttemptResult {
    Accepted,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Missing, `null` and empty labels all mean `Medium`.
fn event_difficulty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Difficulty, D::Error> {
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(match label.as_deref() {
        None | Some("") => Difficulty::default(),
        Some(label) => Difficulty::parse(label),
    })
}

/// Raw attempt event as delivered by the event source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "event_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    #[serde(default, alias = "timeTakenMinutes", deserialize_with = "null_as_default")]
    pub time_taken: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: AttemptResult,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub efficiency: Option<f64>,
}

/// One entry of the append-only attempt log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(rename = "timeTaken", alias = "timeTakenMinutes")]
    pub time_taken_minutes: f64,
    pub result: AttemptResult,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

impl AttemptRecord {
    /// Build a record from an event, filling defaults for whatever the event left out.
    /// Negative or non-finite durations are clamped to zero.
    pub fn from_event(event: &AttemptEvent, now_ms: i64) -> Self {
        let time_taken_minutes = if event.time_taken.is_finite() {
            event.time_taken.max(0.0)
        } else {
            0.0
        };

        AttemptRecord {
            slug: event.slug.clone(),
            title: event.title.clone(),
            difficulty: event.difficulty,
            topics: event.topics.clone(),
            time_taken_minutes,
            result: event.result,
            timestamp: event.timestamp.unwrap_or(now_ms),
            efficiency: event.efficiency,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result == AttemptResult::Accepted
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

/// An accepted attempt enriched with its skill contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(flatten)]
    pub attempt: AttemptRecord,
    pub delta_skill: f64,
    pub efficiency: f64,
    pub skill_after: f64,
}

impl SubmissionRecord {
    /// The outer `efficiency` is authoritative; the embedded attempt's copy is
    /// cleared so the flattened JSON carries a single `efficiency` key.
    pub fn new(
        attempt: &AttemptRecord,
        delta_skill: f64,
        efficiency: f64,
        skill_after: f64,
    ) -> Self {
        SubmissionRecord {
            attempt: AttemptRecord {
                efficiency: None,
                ..attempt.clone()
            },
            delta_skill,
            efficiency,
            skill_after,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.attempt.difficulty
    }

    pub fn topics(&self) -> &[String] {
        &self.attempt.topics
    }

    pub fn timestamp(&self) -> i64 {
        self.attempt.timestamp
    }
}

/// Last `n` entries of a chronological log (fewer if the log is shorter).
pub fn last_n<T>(log: &[T], n: usize) -> &[T] {
    &log[log.len().saturating_sub(n)..]
}

/// The recency window over the submission log.
pub fn recent_submissions(submissions: &[SubmissionRecord]) -> &[SubmissionRecord] {
    last_n(submissions, RECENT_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_falls_back_to_unknown() {
        assert_eq!(Difficulty::parse("Hard"), Difficulty::Hard);
        assert_eq!(Difficulty::parse("hard"), Difficulty::Unknown);
        assert_eq!(Difficulty::parse(""), Difficulty::Unknown);
    }

    #[test]
    fn test_event_defaults() {
        let event: AttemptEvent = serde_json::from_str(r#"{"slug": "two-sum"}"#).unwrap();
        assert_eq!(event.difficulty, Difficulty::Medium);
        assert!(event.topics.is_empty());
        assert_eq!(event.time_taken, 0.0);
        assert_eq!(event.result, AttemptResult::Unknown);

        let record = AttemptRecord::from_event(&event, 42);
        assert_eq!(record.timestamp, 42);
        assert_eq!(record.efficiency, None);
    }

    #[test]
    fn test_event_unrecognized_labels() {
        let event: AttemptEvent = serde_json::from_str(
            r#"{"slug": "x", "difficulty": "Insane",
                "result": "Time Limit Exceeded", "timeTakenMinutes": 12.5}"#,
        )
        .unwrap();
        assert_eq!(event.difficulty, Difficulty::Unknown);
        assert_eq!(event.result, AttemptResult::Unknown);
        assert_eq!(event.time_taken, 12.5);
    }

    #[test]
    fn test_event_null_fields_take_defaults() {
        let event: AttemptEvent = serde_json::from_str(
            r#"{"slug": "x", "title": null, "difficulty": null, "topics": null,
                "timeTaken": null, "result": null, "timestamp": null, "efficiency": null}"#,
        )
        .unwrap();
        assert_eq!(event.title, "");
        assert_eq!(event.difficulty, Difficulty::Medium);
        assert!(event.topics.is_empty());
        assert_eq!(event.time_taken, 0.0);
        assert_eq!(event.result, AttemptResult::Unknown);
        assert_eq!(event.timestamp, None);
        assert_eq!(event.efficiency, None);
    }

    #[test]
    fn test_event_empty_difficulty_is_medium() {
        let event: AttemptEvent =
            serde_json::from_str(r#"{"slug": "x", "difficulty": ""}"#).unwrap();
        assert_eq!(event.difficulty, Difficulty::Medium);

        // Stored records keep the plain label mapping.
        let stored: Difficulty = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(stored, Difficulty::Unknown);
    }

    #[test]
    fn test_negative_time_is_clamped() {
        let event = AttemptEvent {
            time_taken: -3.0,
            ..Default::default()
        };
        assert_eq!(AttemptRecord::from_event(&event, 0).time_taken_minutes, 0.0);
    }

    #[test]
    fn test_submission_flattens_attempt() {
        let attempt = AttemptRecord {
            slug: "two-sum".into(),
            title: "Two Sum".into(),
            difficulty: Difficulty::Easy,
            topics: vec!["Array".into()],
            time_taken_minutes: 4.0,
            result: AttemptResult::Accepted,
            timestamp: 1_700_000_000_000,
            efficiency: Some(1.5),
        };
        let submission = SubmissionRecord::new(&attempt, 0.0, 1.5, 100.0);
        assert_eq!(submission.attempt.efficiency, None);

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["efficiency"], 1.5);
        assert_eq!(json["slug"], "two-sum");
        assert_eq!(json["difficulty"], "Easy");
        assert_eq!(json["skillAfter"], 100.0);
        assert_eq!(json["timeTaken"], 4.0);
    }

    #[test]
    fn test_last_n_short_log() {
        let log = [1, 2, 3];
        assert_eq!(last_n(&log, 5), &[1, 2, 3]);
        assert_eq!(last_n(&log, 2), &[2, 3]);
    }
}
