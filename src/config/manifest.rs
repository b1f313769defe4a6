//! Typed model of `setup/dependencies.yaml`.
//!
//! Every field is checked for shape once, at parse time. Absent or `null`
//! optional fields become empty values.
use std::collections::BTreeMap;
use std::path::Path;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

use super::selector::{Selector, describe};
use crate::error::ManifestError;

/// Manifest path relative to the repository root.
pub const MANIFEST_PATH: &str = "setup/dependencies.yaml";

/// Root document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Profile name → profile.
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: BTreeMap<String, Profile>,
    /// Module name → module. A `null` module body is an empty module.
    #[serde(default, deserialize_with = "map_of_nullable")]
    pub modules: BTreeMap<String, Module>,
    /// Free-form settings handed to actions unmodified.
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Mapping,
}

/// A named bundle of profiles and modules.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Member names, each a profile or a module.
    pub modules: Vec<String>,
    /// Optional human-readable summary.
    #[serde(default)]
    pub description: Option<String>,
}

/// A named unit of installable content.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Module {
    /// Optional human-readable summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Manager id → package entries.
    #[serde(default, deserialize_with = "map_of_nullable")]
    pub packages: BTreeMap<String, Vec<PackageEntry>>,
    /// Manager id → cask names (only `brew` is consumed).
    #[serde(default, deserialize_with = "map_of_nullable")]
    pub casks: BTreeMap<String, Vec<String>>,
    /// `pip install --user` packages.
    #[serde(default)]
    pub pip: Selector<String>,
    /// `pipx install` applications.
    #[serde(default)]
    pub pipx: Selector<PipxEntry>,
    /// Global npm packages.
    #[serde(default)]
    pub npm: Selector<String>,
    /// Named actions.
    #[serde(default)]
    pub actions: Selector<String>,
}

/// A package request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageEntry {
    /// A concrete package name.
    Literal(String),
    /// Interchangeable candidates, resolved to exactly one. Never empty.
    Alternatives(Vec<String>),
}

impl PackageEntry {
    /// Every name this entry mentions.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        match self {
            Self::Literal(name) => std::slice::from_ref(name),
            Self::Alternatives(names) => names,
        }
    }
}

impl<'de> Deserialize<'de> for PackageEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(Self::Literal(name)),
            Value::Mapping(map) => {
                let candidates = ["alternatives", "any_of"]
                    .into_iter()
                    .find_map(|key| map.get(key))
                    .ok_or_else(|| {
                        D::Error::custom("package entry mapping needs an 'alternatives' list")
                    })?;
                let candidates: Vec<String> = serde_yaml::from_value(candidates.clone())
                    .map_err(|e| D::Error::custom(format!("alternatives: {e}")))?;
                if candidates.is_empty() {
                    return Err(D::Error::custom("alternatives list must not be empty"));
                }
                Ok(Self::Alternatives(candidates))
            }
            other => Err(D::Error::custom(format!(
                "package entry must be a name or an alternatives mapping, got {} ({})",
                describe(&other),
                serde_yaml::to_string(&other).unwrap_or_default().trim()
            ))),
        }
    }
}

/// A `pipx` application, optionally pinned to an interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipxEntry {
    /// Package name.
    pub name: String,
    /// Interpreter passed as `--python`.
    pub python: Option<String>,
}

impl<'de> Deserialize<'de> for PipxEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Detailed {
            name: String,
            #[serde(default)]
            python: Option<String>,
        }

        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(Self { name, python: None }),
            value @ Value::Mapping(_) => {
                let Detailed { name, python } = serde_yaml::from_value(value)
                    .map_err(|e| D::Error::custom(format!("pipx entry: {e}")))?;
                if name.trim().is_empty() {
                    return Err(D::Error::custom("pipx entry name must not be empty"));
                }
                let python = python.filter(|p| !p.trim().is_empty());
                Ok(Self { name, python })
            }
            other => Err(D::Error::custom(format!(
                "pipx entry must be a name or a {{name, python}} mapping, got {}",
                describe(&other)
            ))),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn map_of_nullable<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned + Default,
{
    let raw: Option<BTreeMap<String, Option<V>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

impl Manifest {
    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the parser error, prefixed with the offending field path,
    /// when the document does not match the expected shape.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        let manifest: Option<Self> = serde_yaml::from_str(text)?;
        Ok(manifest.unwrap_or_default())
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read and
    /// [`ManifestError::Shape`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ManifestError::Shape {
            path: path.to_path_buf(),
            source,
        })
    }
}
