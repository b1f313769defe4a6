//! Platform-scoped list values.
//!
//! A selector is either a plain list that applies everywhere, or a mapping
//! from selector key (`all`, `linux`, or an exact platform id) to a list.
//! Evaluation concatenates the matching branches from broadest to narrowest:
//!
//! ```text
//! pip:                      ubuntu  => [black, ruff, pynvim]
//!   all:   [black, ruff]    macos   => [black, ruff]
//!   linux: [pynvim]
//! ```
use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::platform::{PlatformId, SELECTOR_ALL};

/// A list value optionally scoped by platform selector keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    /// Items included on every platform.
    Flat(Vec<T>),
    /// Items grouped by selector key. Keys that hold `null` map to an empty
    /// list.
    Keyed(BTreeMap<String, Vec<T>>),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl<T: Clone> Selector<T> {
    /// Items applicable to `platform`, in `all → family → exact` order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use dotsetup::config::selector::Selector;
    /// use dotsetup::platform::PlatformId;
    ///
    /// let sel = Selector::Keyed(BTreeMap::from([
    ///     ("ubuntu".to_string(), vec!["c"]),
    ///     ("all".to_string(), vec!["a"]),
    ///     ("linux".to_string(), vec!["b"]),
    ///     ("macos".to_string(), vec!["z"]),
    /// ]));
    /// assert_eq!(sel.evaluate(PlatformId::Ubuntu), vec!["a", "b", "c"]);
    /// assert_eq!(sel.evaluate(PlatformId::Macos), vec!["a", "z"]);
    /// ```
    #[must_use]
    pub fn evaluate(&self, platform: PlatformId) -> Vec<T> {
        match self {
            Self::Flat(items) => items.clone(),
            Self::Keyed(branches) => platform
                .selector_keys()
                .into_iter()
                .filter_map(|key| branches.get(key))
                .flatten()
                .cloned()
                .collect(),
        }
    }
}

impl<T> Selector<T> {
    /// Every item in every branch, regardless of platform.
    pub fn all_items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            Self::Flat(items) => Box::new(items.iter()),
            Self::Keyed(branches) => Box::new(branches.values().flatten()),
        }
    }

    /// Keys of a keyed selector that match no known selector key.
    pub fn unknown_keys(&self) -> Vec<&str> {
        match self {
            Self::Flat(_) => Vec::new(),
            Self::Keyed(branches) => branches
                .keys()
                .map(String::as_str)
                .filter(|k| !is_known_key(k))
                .collect(),
        }
    }

    /// Whether the selector contributes nothing on any platform.
    pub fn is_empty(&self) -> bool {
        self.all_items().next().is_none()
    }
}

fn is_known_key(key: &str) -> bool {
    key == SELECTOR_ALL
        || PlatformId::ALL
            .iter()
            .any(|p| p.key() == key || p.family().is_some_and(|f| f.key() == key))
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Selector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::default()),
            value @ Value::Sequence(_) => serde_yaml::from_value(value)
                .map(Self::Flat)
                .map_err(D::Error::custom),
            Value::Mapping(map) => {
                let mut branches = BTreeMap::new();
                for (key, value) in map {
                    let Value::String(key) = key else {
                        return Err(D::Error::custom(format!(
                            "selector keys must be strings, got {key:?}"
                        )));
                    };
                    let items = match value {
                        Value::Null => Vec::new(),
                        value @ Value::Sequence(_) => serde_yaml::from_value(value)
                            .map_err(|e| D::Error::custom(format!("selector '{key}': {e}")))?,
                        other => {
                            return Err(D::Error::custom(format!(
                                "selector '{key}' must be a list, got {}",
                                describe(&other)
                            )));
                        }
                    };
                    branches.insert(key, items);
                }
                Ok(Self::Keyed(branches))
            }
            other => Err(D::Error::custom(format!(
                "expected a list or a platform-keyed mapping, got {}",
                describe(&other)
            ))),
        }
    }
}

/// Short name of a YAML value's kind for error messages.
pub(crate) const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
