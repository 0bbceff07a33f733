use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::sgf::coord::MAX_BOARD_SIZE;

/// How the reader treats a node it cannot apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Skip the offending move, log it and keep going.
    #[default]
    Lenient,
    /// Fail the load on the first bad node.
    Strict,
}

impl fmt::Display for ReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadPolicy::Lenient => write!(f, "lenient"),
            ReadPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for ReadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(ReadPolicy::Lenient),
            "strict" => Ok(ReadPolicy::Strict),
            _ => Err(format!("unknown read policy: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub board_size: u8,
    pub komi: f64,
    /// Longest engine candidate line embedded on save.
    pub variation_limit: usize,
    pub embed_candidates: bool,
    pub read_policy: ReadPolicy,
    /// Written as `AP`.
    pub producer: String,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            board_size: 19,
            komi: 7.5,
            variation_limit: 10,
            embed_candidates: false,
            read_policy: ReadPolicy::Lenient,
            producer: "go-record".to_string(),
        }
    }
}

impl RecordConfig {
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        let config: RecordConfig =
            serde_json::from_str(text).map_err(|e| RecordError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(RecordError::Config(format!(
                "board size {} is outside 1..={MAX_BOARD_SIZE}",
                self.board_size
            )));
        }
        if !self.komi.is_finite() {
            return Err(RecordError::Config(format!("komi {} is not finite", self.komi)));
        }
        if self.producer.is_empty() {
            return Err(RecordError::Config("producer must not be empty".into()));
        }
        Ok(())
    }
}
