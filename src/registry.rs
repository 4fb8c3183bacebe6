//! # Registry
//! Resolves symbolic prompt identifiers to prompt files on disk.
//!
//! A prompts directory holds a catalog document (`registry.yaml` by default) and the prompt files it points to:
//!
//! ```text
//! prompts/
//! ├── registry.yaml
//! ├── log_classifier.txt
//! └── pull_request_creator/
//!     └── v2.txt
//! ```
//!
//! The catalog is read and validated once, when the [PromptRegistry] is constructed, and never reloaded. Every call
//! to [PromptRegistry::get_prompt] checks the entry and the existence of its file again, so the returned
//! [PromptInfo] always points at a file that existed at the time of the call.
//!
//! There is no global registry. Construct one and pass it to whatever needs prompts.
//!
//! ```
//! use promptreg::registry::{PromptRegistry, RegistryError};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(
//!     dir.path().join("registry.yaml"),
//!     "agents:\n  greeter:\n    current_version: '1.0'\n    path: greeter.txt\n    description: says hello\n",
//! ).unwrap();
//! std::fs::write(dir.path().join("greeter.txt"), "Say hello to {name}.").unwrap();
//!
//! let registry = PromptRegistry::new(dir.path(), "registry.yaml").unwrap();
//! let info = registry.get_prompt("greeter").unwrap();
//! assert_eq!(info.version, "1.0");
//! assert_eq!(info.path, dir.path().join("greeter.txt"));
//!
//! match registry.get_prompt("farewell") {
//!     Err(RegistryError::PromptNotFound { available, .. }) => assert_eq!(available, vec!["greeter"]),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use crate::catalog::PromptCatalog;
use crate::prompt::PromptTemplate;
use crate::utils::JsonMap;

pub use crate::registry::errors::RegistryError;

pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_REGISTRY_FILENAME: &str = "registry.yaml";

/// Where to find the prompts directory and the catalog inside it.
///
/// Deserializable, so it can be nested in an application's own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding the catalog and the prompt files. Relative paths are resolved against the working directory.
    pub prompts_dir: PathBuf,
    /// File name of the catalog inside `prompts_dir`.
    pub registry_filename: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
            registry_filename: DEFAULT_REGISTRY_FILENAME.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn with_prompts_dir(mut self, prompts_dir: impl Into<PathBuf>) -> Self {
        self.prompts_dir = prompts_dir.into();
        self
    }

    pub fn with_registry_filename(mut self, registry_filename: impl Into<String>) -> Self {
        self.registry_filename = registry_filename.into();
        self
    }
}

/// A resolved prompt: catalog metadata plus the absolute path of a prompt file that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
#[readonly::make]
pub struct PromptInfo {
    /// The identifier it was requested with
    pub id: String,
    /// The entry's `current_version`
    pub version: String,
    /// Absolute path of the prompt file
    pub path: PathBuf,
    pub description: String,
    /// Model hint, if the entry has one
    pub model: Option<String>,
}

impl PromptInfo {
    /// The descriptor as JSON metadata, as attached to templates from [PromptInfo::load_template].
    pub fn to_metadata(&self) -> JsonMap {
        let mut metadata = JsonMap::new();
        metadata.insert("id".to_string(), Value::from(self.id.as_str()));
        metadata.insert("version".to_string(), Value::from(self.version.as_str()));
        metadata.insert("path".to_string(), Value::from(self.path.to_string_lossy().into_owned()));
        metadata.insert("description".to_string(), Value::from(self.description.as_str()));
        metadata.insert("model".to_string(), self.model.as_deref().map_or(Value::Null, Value::from));
        metadata
    }

    /// Read the prompt file into a [PromptTemplate] carrying this descriptor as metadata.
    pub fn load_template(&self) -> Result<PromptTemplate, RegistryError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| RegistryError::PromptFileUnreadable {
                id: self.id.clone(),
                path: self.path.clone(),
                source,
            })?;
        Ok(PromptTemplate::with_metadata(text, self.to_metadata()))
    }
}

/// Catalog of prompts loaded from a prompts directory. Immutable once constructed, so it can be shared across
/// threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    prompts_dir: PathBuf,
    registry_path: PathBuf,
    catalog: PromptCatalog,
}

impl PromptRegistry {
    /// Load the catalog `registry_filename` from `prompts_dir`.
    pub fn new(prompts_dir: impl AsRef<Path>, registry_filename: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let prompts_dir = prompts_dir.as_ref();
        let prompts_dir = absolutize(prompts_dir)
            .map_err(|source| RegistryError::CatalogUnreadable { path: prompts_dir.to_path_buf(), source })?;
        let registry_path = prompts_dir.join(registry_filename);
        let catalog = load_catalog(&registry_path)?;
        debug!("Loaded prompt registry {} with {} prompts", registry_path.display(), catalog.len());
        Ok(Self {
            prompts_dir,
            registry_path,
            catalog,
        })
    }

    pub fn initialize(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Self::new(&config.prompts_dir, &config.registry_filename)
    }

    /// Load `prompts/registry.yaml` relative to the working directory.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        Self::initialize(&RegistryConfig::default())
    }

    /// Resolve `id` to a [PromptInfo].
    ///
    /// Fails when the identifier is unknown, when the entry lacks any of `current_version`, `path` or
    /// `description`, or when the file it points to does not exist.
    pub fn get_prompt(&self, id: &str) -> Result<PromptInfo, RegistryError> {
        let entry = self.catalog.get(id)
            .ok_or_else(|| RegistryError::PromptNotFound {
                id: id.to_string(),
                available: self.catalog.ids(),
            })?;

        let (version, relative_path, description) = match (&entry.current_version, &entry.path, &entry.description) {
            (Some(version), Some(path), Some(description)) => (version, path, description),
            _ => return Err(RegistryError::IncompletePromptEntry {
                id: id.to_string(),
                missing_fields: entry.missing_fields(),
            }),
        };

        let path = self.prompts_dir.join(relative_path);
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {}
            found => return Err(RegistryError::PromptFileMissing {
                id: id.to_string(),
                is_directory: found.map_or(false, |metadata| metadata.is_dir()),
                path,
            }),
        }
        debug!("Resolved prompt '{}' version {} to {}", id, version, path.display());

        Ok(PromptInfo {
            id: id.to_string(),
            version: version.clone(),
            path,
            description: description.clone(),
            model: entry.model.clone(),
        })
    }

    /// Resolve `id` and read its file into a [PromptTemplate].
    pub fn load_template(&self, id: &str) -> Result<PromptTemplate, RegistryError> {
        self.get_prompt(id)?.load_template()
    }

    /// All identifiers in the catalog, sorted.
    pub fn available_prompts(&self) -> Vec<String> {
        self.catalog.ids()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.catalog.get(id).is_some()
    }

    /// Absolute path of the prompts directory.
    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }

    /// Absolute path of the catalog document.
    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }
}

fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn load_catalog(registry_path: &Path) -> Result<PromptCatalog, RegistryError> {
    let bytes = std::fs::read(registry_path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => RegistryError::CatalogNotFound { path: registry_path.to_path_buf() },
        _ => RegistryError::CatalogUnreadable { path: registry_path.to_path_buf(), source },
    })?;
    let text = std::str::from_utf8(&bytes).map_err(|e| RegistryError::CatalogMalformed {
        path: registry_path.to_path_buf(),
        reason: format!("not valid UTF-8: {}", e),
    })?;
    PromptCatalog::from_yaml(text).map_err(|e| RegistryError::CatalogMalformed {
        path: registry_path.to_path_buf(),
        reason: e.reason,
    })
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;
    use std::io;
    use std::path::PathBuf;

    /// Everything that can go wrong while loading a catalog or resolving a prompt.
    ///
    /// The `Catalog*` variants only come from construction. The others come from lookups and leave the registry
    /// usable.
    #[derive(Debug)]
    pub enum RegistryError {
        /// No catalog file at the resolved path.
        CatalogNotFound { path: PathBuf },
        /// The catalog exists but could not be read.
        CatalogUnreadable { path: PathBuf, source: io::Error },
        /// The catalog is not valid YAML or does not have the expected structure.
        CatalogMalformed { path: PathBuf, reason: String },
        /// The identifier is not in the catalog. `available` lists every identifier that is.
        PromptNotFound { id: String, available: Vec<String> },
        /// The entry lacks required fields. A problem in the catalog, not in the request.
        IncompletePromptEntry { id: String, missing_fields: Vec<&'static str> },
        /// The entry does not point at a regular file. `is_directory` is set when a directory sits at `path`.
        PromptFileMissing { id: String, path: PathBuf, is_directory: bool },
        /// The prompt file exists but could not be read as text.
        PromptFileUnreadable { id: String, path: PathBuf, source: io::Error },
    }

    impl fmt::Display for RegistryError {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match self {
                RegistryError::CatalogNotFound { path } =>
                    write!(f, "CatalogNotFound: registry not found: {}", path.display()),
                RegistryError::CatalogUnreadable { path, source } =>
                    write!(f, "CatalogUnreadable: failed to read registry {}: {}", path.display(), source),
                RegistryError::CatalogMalformed { path, reason } =>
                    write!(f, "CatalogMalformed: registry {} is malformed: {}", path.display(), reason),
                RegistryError::PromptNotFound { id, available } =>
                    write!(f, "PromptNotFound: prompt '{}' not found. Available: {:?}", id, available),
                RegistryError::IncompletePromptEntry { id, missing_fields } =>
                    write!(f, "IncompletePromptEntry: missing required fields for prompt '{}': {:?}", id, missing_fields),
                RegistryError::PromptFileMissing { id, path, is_directory: true } =>
                    write!(f, "PromptFileMissing: prompt file for '{}' is a directory: {}", id, path.display()),
                RegistryError::PromptFileMissing { id, path, is_directory: false } =>
                    write!(f, "PromptFileMissing: prompt file for '{}' does not exist: {}", id, path.display()),
                RegistryError::PromptFileUnreadable { id, path, source } =>
                    write!(f, "PromptFileUnreadable: failed to read prompt file for '{}' at {}: {}", id, path.display(), source),
            }
        }
    }

    impl Error for RegistryError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                RegistryError::CatalogUnreadable { source, .. } |
                RegistryError::PromptFileUnreadable { source, .. } => Some(source),
                _ => None,
            }
        }
    }
}
