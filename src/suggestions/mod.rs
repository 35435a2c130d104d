use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::history::{recent_submissions, SubmissionRecord};
use crate::profile::ProfileData;
use crate::topics::{Classification, TopicStats};

pub const MAX_SUGGESTIONS: usize = 5;
const MAX_CANDIDATES: usize = 10;

/// Seed topic when there is nothing else to go on but a profile exists.
pub const FALLBACK_TOPIC: &str = "Array";

const SEARCH_URL: &str = "https://leetcode.com/problemset/all/?search=";

pub const REASON_GOAL: &str = "Matches your goal";
pub const REASON_WEAK: &str = "Identified weak topic";
pub const REASON_RECENT: &str = "Worked recently — try deeper problems";
pub const REASON_DEFAULT: &str = "Practice this topic";
const REASON_SEPARATOR: &str = " · ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub url: String,
    pub reason: String,
}

/// Rank what to practice next: goals first, then weak topics, then a fallback.
///
/// Deterministic for identical inputs; at most [`MAX_SUGGESTIONS`] entries.
pub fn generate_suggestions(
    goals: &[String],
    topic_stats: &TopicStats,
    submissions: &[SubmissionRecord],
    profile: Option<&ProfileData>,
) -> Vec<Suggestion> {
    let weak_topics = topic_stats.topics_with(Classification::Weak);
    let recent = recent_submissions(submissions);

    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = goals
        .iter()
        .chain(weak_topics.iter())
        .filter(|&topic| seen.insert(topic.as_str()))
        .cloned()
        .collect();

    if candidates.is_empty() {
        if profile.is_some() {
            candidates.push(FALLBACK_TOPIC.to_string());
        } else {
            candidates.extend(recent.iter().flat_map(|s| s.topics().iter().cloned()));
        }
    }

    let recent_topics: HashSet<&str> = recent
        .iter()
        .flat_map(|s| s.topics().iter().map(String::as_str))
        .collect();

    candidates
        .iter()
        .take(MAX_CANDIDATES)
        .map(|topic| {
            let mut reasons = Vec::new();
            if goals.contains(topic) {
                reasons.push(REASON_GOAL);
            }
            if weak_topics.contains(topic) {
                reasons.push(REASON_WEAK);
            }
            if recent_topics.contains(topic.as_str()) {
                reasons.push(REASON_RECENT);
            }
            let reason = if reasons.is_empty() {
                REASON_DEFAULT.to_string()
            } else {
                reasons.join(REASON_SEPARATOR)
            };

            Suggestion {
                title: format!("Practice: {}", topic),
                url: format!("{}{}", SEARCH_URL, encode_uri_component(topic)),
                reason,
            }
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
