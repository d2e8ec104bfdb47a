//! Instance-description file loading.
//!
//! The file is operator-supplied JSON mapping field id to instance index to
//! description, optionally wrapped under one reserved top-level key. It is
//! an optional input: unreadable or malformed files degrade to an empty map
//! with a warning rather than failing the run.

use std::fs;
use std::path::Path;

use tracing::warn;

use ukb_model::InstanceMap;

/// Reserved wrapper key accepted at the top level of the instance file.
const INSTANCES_KEY: &str = "__instances__";

/// Load an instance-description file, best-effort.
pub fn load_instance_map(path: &Path) -> InstanceMap {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(path = %path.display(), %error, "instance map unreadable, continuing without it");
            return InstanceMap::default();
        }
    };
    match parse_instance_map(&raw) {
        Ok(map) => map,
        Err(error) => {
            warn!(path = %path.display(), %error, "instance map malformed, continuing without it");
            InstanceMap::default()
        }
    }
}

/// Parse instance-description JSON, unwrapping the reserved key when present.
pub fn parse_instance_map(raw: &str) -> serde_json::Result<InstanceMap> {
    let mut value: serde_json::Value = serde_json::from_str(raw)?;
    if let Some(object) = value.as_object_mut()
        && let Some(inner) = object.remove(INSTANCES_KEY)
    {
        return serde_json::from_value(inner);
    }
    serde_json::from_value(value)
}
