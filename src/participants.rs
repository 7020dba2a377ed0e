//! Participant source
//!
//! Supplies the identities that seed a battle roster. Externally fetched
//! follower lists are used when they are long enough; otherwise a built-in
//! list takes over.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// One battle participant (identity + visual tag)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(alias = "open_id")]
    pub id: String,
    #[serde(alias = "display_name")]
    pub name: String,
    #[serde(default, alias = "avatar")]
    pub avatar_url: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }
}

/// Number of entries in the built-in list
pub const FALLBACK_LEN: usize = 20;

/// Built-in participant list, always the same 20 entries
pub fn fallback_participants() -> Vec<Participant> {
    (1..=FALLBACK_LEN)
        .map(|i| Participant::new(i.to_string(), format!("User{i}")))
        .collect()
}

/// Take the first `count` participants from `source`, falling back to the
/// built-in list when the source is absent or too short.
///
/// Duplicate ids in the source are skipped; a roster is unique by identity.
/// Returns the selection and whether the fallback was used.
pub fn select_participants(source: Option<&[Participant]>, count: usize) -> (Vec<Participant>, bool) {
    let unique = source.map(|list| {
        let mut seen = HashSet::new();
        list.iter()
            .filter(|p| seen.insert(p.id.as_str()))
            .take(count)
            .cloned()
            .collect::<Vec<_>>()
    });

    match unique {
        Some(list) if list.len() >= count => (list, false),
        other => {
            let reason = match other {
                Some(list) => format!("has only {} unique entries", list.len()),
                None => "missing".to_string(),
            };
            log::warn!("Participant source {reason} for {count} balls, using built-in list");
            let mut list = fallback_participants();
            list.truncate(count);
            (list, true)
        }
    }
}

/// Parse a follower list (JSON array)
pub fn participants_from_json(json: &str) -> Result<Vec<Participant>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a follower list from a JSON file
pub fn load_participants(path: impl AsRef<Path>) -> Result<Vec<Participant>, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let list = participants_from_json(&json)?;
    log::info!("Loaded {} participants from {}", list.len(), path.display());
    Ok(list)
}
