// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Reads and deserializes a JSON file; `what` names the contents in errors.
pub fn read_json<T: DeserializeOwned>(path: &str, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("reading {} from {}", what, path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {} in {}", what, path))
}

pub fn parse_flag<T>(matches: &clap::ArgMatches, name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match matches.get_one::<String>(name) {
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value {:?} for --{}: {}", s, name, e)),
        None => Ok(None),
    }
}

pub fn bool_flag(matches: &clap::ArgMatches, name: &str) -> Option<bool> {
    matches.get_one::<String>(name).map(|s| s == "true")
}
