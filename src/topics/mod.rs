use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use crate::config::EngineConfig;
use crate::history::{
    recent_submissions, AttemptRecord, Difficulty, SubmissionRecord, RECENT_WINDOW,
};

/// Attempts needed before a topic's score is trusted in full.
const CONFIDENCE_ATTEMPTS: f64 = 10.0;

const WEIGHT_ACCEPT: f64 = 0.4;
const WEIGHT_EFFICIENCY: f64 = 0.2;
const WEIGHT_DIFFICULTY: f64 = 0.2;
const WEIGHT_TREND: f64 = 0.2;

const EASY_WEIGHT: f64 = 0.3;
const MEDIUM_WEIGHT: f64 = 0.5;
const HARD_WEIGHT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Strong,
    Average,
    Weak,
}

impl Classification {
    /// Strong is checked first, so equal thresholds classify as Strong.
    pub fn from_score(score: f64, config: &EngineConfig) -> Self {
        if score >= config.strong_topic_threshold {
            Classification::Strong
        } else if score >= config.weak_topic_threshold {
            Classification::Average
        } else {
            Classification::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStat {
    pub attempts: u32,
    pub accepted: u32,
    pub easy_solved: u32,
    pub medium_solved: u32,
    pub hard_solved: u32,
    pub total_efficiency: f64,
    pub accept_pct: f64,
    pub avg_efficiency: f64,
    pub strength_score: f64,
    pub classification: Classification,
}

impl TopicStat {
    fn empty() -> Self {
        TopicStat {
            attempts: 0,
            accepted: 0,
            easy_solved: 0,
            medium_solved: 0,
            hard_solved: 0,
            total_efficiency: 0.0,
            accept_pct: 0.0,
            avg_efficiency: 0.0,
            strength_score: 0.0,
            classification: Classification::Weak,
        }
    }

    fn record(&mut self, attempt: &AttemptRecord) {
        self.attempts += 1;
        if !attempt.is_accepted() {
            return;
        }
        self.accepted += 1;
        match attempt.difficulty {
            Difficulty::Easy => self.easy_solved += 1,
            Difficulty::Medium => self.medium_solved += 1,
            Difficulty::Hard => self.hard_solved += 1,
            Difficulty::Unknown => {}
        }
        if let Some(efficiency) = attempt.efficiency {
            self.total_efficiency += efficiency;
        }
    }

    /// Fill the derived fields from the counters.
    fn finalize(&mut self, recent_count: usize, config: &EngineConfig) {
        let accept_pct = ratio(self.accepted as f64, self.attempts as f64);
        let confidence = (self.attempts as f64 / CONFIDENCE_ATTEMPTS).min(1.0);
        let avg_efficiency = ratio(self.total_efficiency, self.accepted as f64);
        let efficiency_score = (avg_efficiency / config.max_efficiency).clamp(0.0, 1.0);

        let solved = self.easy_solved + self.medium_solved + self.hard_solved;
        let difficulty_weight = ratio(
            EASY_WEIGHT * self.easy_solved as f64
                + MEDIUM_WEIGHT * self.medium_solved as f64
                + HARD_WEIGHT * self.hard_solved as f64,
            solved as f64,
        );

        let recent_trend = (recent_count as f64 / RECENT_WINDOW as f64).min(1.0);

        let composite = WEIGHT_ACCEPT * accept_pct
            + WEIGHT_EFFICIENCY * efficiency_score
            + WEIGHT_DIFFICULTY * difficulty_weight
            + WEIGHT_TREND * recent_trend;
        let strength_score = composite * confidence;

        self.accept_pct = accept_pct;
        self.avg_efficiency = avg_efficiency;
        self.strength_score = strength_score;
        self.classification = Classification::from_score(strength_score, config);
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Topic → stat map that iterates in first-seen order of the attempt log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicStats {
    order: Vec<String>,
    stats: HashMap<String, TopicStat>,
}

impl TopicStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, topic: &str) -> Option<&TopicStat> {
        self.stats.get(topic)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TopicStat)> + '_ {
        self.order
            .iter()
            .filter_map(move |topic| self.stats.get(topic).map(|s| (topic.as_str(), s)))
    }

    pub fn topics_with(&self, classification: Classification) -> Vec<String> {
        self.iter()
            .filter(|(_, s)| s.classification == classification)
            .map(|(t, _)| t.to_string())
            .collect()
    }

    fn entry(&mut self, topic: &str) -> &mut TopicStat {
        if !self.stats.contains_key(topic) {
            self.order.push(topic.to_string());
        }
        self.stats
            .entry(topic.to_string())
            .or_insert_with(TopicStat::empty)
    }

    fn insert(&mut self, topic: String, stat: TopicStat) {
        if !self.stats.contains_key(&topic) {
            self.order.push(topic.clone());
        }
        self.stats.insert(topic, stat);
    }
}

impl Serialize for TopicStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (topic, stat) in self.iter() {
            map.serialize_entry(topic, stat)?;
        }
        map.end()
    }
}

struct TopicStatsVisitor;

impl<'de> Visitor<'de> for TopicStatsVisitor {
    type Value = TopicStats;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of topic name to topic stats")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut stats = TopicStats::new();
        while let Some((topic, stat)) = access.next_entry::<String, TopicStat>()? {
            stats.insert(topic, stat);
        }
        Ok(stats)
    }
}

impl<'de> Deserialize<'de> for TopicStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TopicStatsVisitor)
    }
}

/// Rebuild every topic's stats from the two logs.
///
/// Counters come from the attempt log; the recency signal comes from the last
/// five submissions. Nothing is carried over between calls.
pub fn compute_topic_stats(
    attempts: &[AttemptRecord],
    submissions: &[SubmissionRecord],
    config: &EngineConfig,
) -> TopicStats {
    let mut stats = TopicStats::new();

    for attempt in attempts {
        for topic in &attempt.topics {
            stats.entry(topic).record(attempt);
        }
    }

    let recent = recent_submissions(submissions);
    for topic in &stats.order {
        let recent_count = recent
            .iter()
            .filter(|s| s.topics().iter().any(|t| t == topic))
            .count();
        if let Some(stat) = stats.stats.get_mut(topic) {
            stat.finalize(recent_count, config);
        }
    }

    stats
}
