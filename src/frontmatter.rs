//! Splits YAML front matter from the body of a source file. Both documents
//! and layouts use the same format:
//!
//! ```text
//! ---
//! title: Hello
//! tags: [greet]
//! ---
//! body
//! ```

use serde_yaml::{Mapping, Value};
use std::fmt;

const FENCE: &str = "---";

/// A source file split into its raw front matter and its body.
#[derive(Debug, PartialEq)]
pub struct Split<'a> {
    pub yaml: &'a str,
    pub body: &'a str,
}

/// Splits `input` into front matter and body. Returns `Ok(None)` if `input`
/// doesn't open with a fence line, and an error if the opening fence is never
/// closed.
pub fn split(input: &str) -> Result<Option<Split<'_>>> {
    let rest = match input.strip_prefix(FENCE) {
        Some(rest) => match strip_newline(rest) {
            Some(rest) => rest,
            None => return Ok(None),
        },
        None => return Ok(None),
    };

    // The closing fence is matched against the text *after* the opening line
    // so that a front matter block can be empty.
    let mut offset = 0;
    loop {
        let start = if offset == 0 && rest.starts_with(FENCE) {
            offset
        } else {
            match rest[offset..].find("\n---") {
                Some(i) => offset + i + 1,
                None => return Err(Error::MissingEndFence),
            }
        };
        let after = start + FENCE.len();
        let tail = &rest[after..];
        if tail.is_empty() {
            return Ok(Some(Split {
                yaml: &rest[..start],
                body: tail,
            }));
        }
        if let Some(body) = strip_newline(tail) {
            return Ok(Some(Split {
                yaml: &rest[..start],
                body,
            }));
        }
        offset = after;
    }
}

fn strip_newline(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}

/// Parses raw front matter into a mapping. An empty block yields an empty
/// mapping.
pub fn parse_mapping(yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(Error::NotAMapping),
    }
}

/// The result of a fallible front matter operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading front matter.
#[derive(Debug)]
pub enum Error {
    /// Returned when the opening `---` fence is never closed.
    MissingEndFence,

    /// Returned when the front matter isn't valid YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the front matter is valid YAML but not a mapping.
    NotAMapping,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEndFence => write!(f, "Missing closing `---`"),
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::NotAMapping => {
                write!(f, "Front matter must be a mapping of names to values")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::NotAMapping => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
