use thiserror::Error;

/// Unified error type for the tracker.
/// The scoring engines are total and never return it; only the edges do
/// (config loading, event/state decoding, the per-user registry).
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("[io] {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[json] {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("[config] failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("[config] invalid config: {0}")]
    InvalidConfig(String),

    #[error("[state] unknown user: {0}")]
    UnknownUser(String),

    #[error("[logging] {0}")]
    Logging(String),
}

impl TrackerError {
    pub fn io<S: Into<String>>(message: S, source: std::io::Error) -> Self {
        TrackerError::Io {
            message: message.into(),
            source,
        }
    }

    pub fn json<S: Into<String>>(message: S, source: serde_json::Error) -> Self {
        TrackerError::Json {
            message: message.into(),
            source,
        }
    }

    /// Short tag naming the stage that failed, used as a structured log field.
    pub fn stage(&self) -> &'static str {
        match self {
            TrackerError::Io { .. } => "io",
            TrackerError::Json { .. } => "json",
            TrackerError::ConfigParse(_) | TrackerError::InvalidConfig(_) => "config",
            TrackerError::UnknownUser(_) => "state",
            TrackerError::Logging(_) => "logging",
        }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::io(format!("I/O error: {}", err), err)
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::json(format!("JSON error: {}", err), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_stage_tags() {
        assert_eq!(TrackerError::UnknownUser("x".into()).stage(), "state");
        assert_eq!(TrackerError::InvalidConfig("bad".into()).stage(), "config");
        assert_eq!(TrackerError::Logging("twice".into()).stage(), "logging");
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: TrackerError = io.into();
        assert_eq!(error.stage(), "io");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: TrackerError = json_err.into();
        assert_eq!(error.stage(), "json");
        assert!(error.to_string().starts_with("[json]"));
    }

    #[test]
    fn test_error_display() {
        let error = TrackerError::UnknownUser("alice".into());
        let display = format!("{}", error);
        assert!(display.contains("state"));
        assert!(display.contains("alice"));
    }
}
