use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a configuration piped on stdin (JSON, or YAML as a fallback).
/// Returns None when stdin is a TTY or the pipe is empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|yaml_err| {
                Box::<dyn std::error::Error>::from(format!(
                    "stdin is neither JSON ({json_err}) nor YAML ({yaml_err})"
                ))
            }),
    }
}
