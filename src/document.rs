//! Defines the [`Document`] type, the read-only view of a content item that the
//! host hands to [`crate::tag::collect`].

use serde_yaml::{Mapping, Value};

/// The front matter attribute holding a document's tags.
pub const TAGS_ATTRIBUTE: &str = "tags";

/// A content item (e.g., a blog post) with its front matter attributes. Only
/// the `tags` attribute is interpreted; everything else is carried for the
/// host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// Identifies the document in log output, typically the source path
    /// relative to the documents directory.
    pub id: String,

    /// The document's attributes.
    pub data: Mapping,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Mapping) -> Document {
        Document {
            id: id.into(),
            data,
        }
    }

    /// Looks up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(&Value::String(name.to_owned()))
    }

    /// Returns the raw tag strings of this document. Malformed metadata never
    /// fails; it is reduced according to these rules:
    ///
    /// * absent or `null` contributes nothing;
    /// * a string, number, or bool contributes its string form;
    /// * a sequence contributes each scalar entry as above, skipping `null`,
    ///   nested sequences, and mappings;
    /// * a mapping contributes nothing;
    /// * empty strings are always skipped.
    pub fn tags(&self) -> Vec<String> {
        match self.get(TAGS_ATTRIBUTE) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(entries)) => entries
                .iter()
                .filter_map(|entry| {
                    let tag = scalar_to_string(entry);
                    if tag.is_none() && !entry.is_null() {
                        log::warn!(
                            "Skipping non-scalar entry in `{}` of document `{}`",
                            TAGS_ATTRIBUTE,
                            self.id
                        );
                    }
                    tag
                })
                .filter(|tag| !tag.is_empty())
                .collect(),
            Some(Value::Mapping(_)) => {
                log::warn!(
                    "Ignoring `{}` of document `{}`: expected a string or a list",
                    TAGS_ATTRIBUTE,
                    self.id
                );
                Vec::new()
            }
            Some(value) => scalar_to_string(value)
                .filter(|tag| !tag.is_empty())
                .into_iter()
                .collect(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
pub(crate) fn doc(id: &str, yaml: &str) -> Document {
    Document::new(id, crate::frontmatter::parse_mapping(yaml).unwrap())
}
