//! # Catalog
//! The in-memory form of a `registry.yaml` document.
//!
//! ```yaml
//! agents:
//!   pull_request_creator:
//!     current_version: v2
//!     path: pull_request_creator/v2.txt
//!     description: Writes pull request descriptions
//!     model: gpt-4o-mini
//! ```
//!
//! Structure is checked when the document is parsed: the top level and the `agents` value must be mappings, each
//! entry must be a mapping (or empty) and every field value must be a scalar. Whether an entry has all the
//! [REQUIRED_FIELDS] is only checked when that entry is looked up, see
//! [PromptRegistry::get_prompt](crate::registry::PromptRegistry::get_prompt).

use std::collections::BTreeMap;
use serde_yaml::{Mapping, Value};
use crate::catalog::errors::MalformedCatalog;

/// The top-level key every prompt entry is declared under.
pub const NAMESPACE_KEY: &str = "agents";

/// Fields an entry must have to be resolved, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 3] = ["current_version", "path", "description"];

/// One record of the catalog. Every field is optional here so an incomplete entry can still be loaded and
/// reported precisely when it is requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptEntry {
    pub current_version: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
}

impl PromptEntry {
    /// Required fields this entry lacks, in [REQUIRED_FIELDS] order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [&self.current_version, &self.path, &self.description];
        REQUIRED_FIELDS.iter()
            .zip(present)
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect()
    }

    fn from_yaml(id: &str, value: &Value) -> Result<Self, MalformedCatalog> {
        let fields = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(fields) => fields,
            _ => return Err(MalformedCatalog::new(format!("entry '{}' must be a mapping", id))),
        };
        Ok(Self {
            current_version: scalar_field(id, fields, "current_version")?,
            path: scalar_field(id, fields, "path")?,
            description: scalar_field(id, fields, "description")?,
            model: scalar_field(id, fields, "model")?,
        })
    }
}

/// Every prompt entry of a catalog document, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptCatalog {
    entries: BTreeMap<String, PromptEntry>,
}

impl PromptCatalog {
    /// Parse and structurally validate a catalog document.
    pub fn from_yaml(text: &str) -> Result<Self, MalformedCatalog> {
        let mut document: Value = serde_yaml::from_str(text)
            .map_err(|e| MalformedCatalog::new(format!("not a valid YAML document: {}", e)))?;
        // entries may share fields through `<<: *anchor`
        document.apply_merge()
            .map_err(|e| MalformedCatalog::new(format!("invalid merge key: {}", e)))?;
        let root = match document {
            Value::Mapping(root) => root,
            _ => return Err(MalformedCatalog::new("document must be a mapping at the top level")),
        };
        let namespace = root.get(NAMESPACE_KEY)
            .ok_or_else(|| MalformedCatalog::new(format!("registry must contain '{}' key", NAMESPACE_KEY)))?;
        let agents = match namespace {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(agents) => agents,
            _ => return Err(MalformedCatalog::new(format!("'{}' must be a mapping of prompt entries", NAMESPACE_KEY))),
        };

        let mut entries = BTreeMap::new();
        for (key, value) in agents {
            let id = scalar_to_string(key)
                .ok_or_else(|| MalformedCatalog::new(format!("prompt identifiers under '{}' must be scalars", NAMESPACE_KEY)))?;
            let entry = PromptEntry::from_yaml(&id, value)?;
            if entries.insert(id.clone(), entry).is_some() {
                return Err(MalformedCatalog::new(format!("prompt '{}' is declared more than once", id)));
            }
        }
        Ok(Self { entries })
    }

    /// Identifiers of all entries, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, id: &str) -> Option<&PromptEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scalar_field(id: &str, fields: &Mapping, name: &str) -> Result<Option<String>, MalformedCatalog> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value)
            .map(Some)
            .ok_or_else(|| MalformedCatalog::new(format!("field '{}' of entry '{}' must be a scalar", name, id))),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when a catalog document does not have the expected structure.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MalformedCatalog {
        pub reason: String,
    }

    impl MalformedCatalog {
        pub(crate) fn new(reason: impl Into<String>) -> Self {
            Self { reason: reason.into() }
        }
    }

    impl fmt::Display for MalformedCatalog {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "MalformedCatalog: {}", self.reason)
        }
    }

    impl Error for MalformedCatalog {}
}
