//! Conversions from YAML values and [`PageDescriptor`]s into [`Value`]s for
//! templating.

use crate::page::PageDescriptor;
use gtmpl_value::Value;
use serde_yaml::Value as Yaml;
use std::collections::HashMap;

/// Converts a YAML value into a template value. Mapping keys that aren't
/// strings are dropped.
pub fn from_yaml(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64().map_or(Value::Nil, Value::from)
            }
        }
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(items.iter().map(from_yaml).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .iter()
                .filter_map(|(key, value)| match key {
                    Yaml::String(key) => Some((key.clone(), from_yaml(value))),
                    _ => None,
                })
                .collect(),
        ),
    }
}

impl From<&PageDescriptor> for Value {
    /// Converts a [`PageDescriptor`] into a [`Value::Object`] holding the
    /// page's variables.
    fn from(page: &PageDescriptor) -> Value {
        let m: HashMap<String, Value> = page
            .variables()
            .iter()
            .map(|(name, value)| (name.clone(), from_yaml(value)))
            .collect();
        Value::Object(m)
    }
}
