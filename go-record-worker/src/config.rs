use std::fs;
use std::str::FromStr;

use go_record::{ReadPolicy, RecordConfig, RecordError};

pub const CONFIG_FILE_VAR: &str = "GO_RECORD_CONFIG";

/// Build the record settings from the process environment.
pub fn config_from_env() -> Result<RecordConfig, RecordError> {
    config_from_vars(|name| std::env::var(name).ok())
}

/// Settings from a variable lookup: `GO_RECORD_CONFIG` names a JSON file
/// used as the base, the other `GO_RECORD_*` variables override its fields.
pub fn config_from_vars(var: impl Fn(&str) -> Option<String>) -> Result<RecordConfig, RecordError> {
    let mut config = match var(CONFIG_FILE_VAR) {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| RecordError::io(&path, e))?;
            RecordConfig::from_json(&text)?
        }
        None => RecordConfig::default(),
    };

    if let Some(size) = parsed(&var, "GO_RECORD_BOARD_SIZE")? {
        config.board_size = size;
    }
    if let Some(komi) = parsed(&var, "GO_RECORD_KOMI")? {
        config.komi = komi;
    }
    if let Some(limit) = parsed(&var, "GO_RECORD_VARIATION_LIMIT")? {
        config.variation_limit = limit;
    }
    if let Some(embed) = parsed(&var, "GO_RECORD_EMBED_CANDIDATES")? {
        config.embed_candidates = embed;
    }
    if let Some(strict) = parsed(&var, "GO_RECORD_STRICT")? {
        config.read_policy = if strict {
            ReadPolicy::Strict
        } else {
            ReadPolicy::Lenient
        };
    }

    config.validate()?;
    Ok(config)
}

fn parsed<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, RecordError> {
    match var(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RecordError::Config(format!("{name}: cannot parse '{raw}'"))),
    }
}
