//! Service registry backed by a directory of fragment files
//!
//! Each `.json`, `.yaml` or `.yml` file under the root is one service, named
//! after its lowercased file stem. Label, description and type are read from
//! the fragment's `info.title`, `info.description` and `x-service-type`.

use crate::collaborators::{ServiceHandle, ServiceRegistry};
use apidoc_aggregator_common::{AccessProfile, ApiDocError, Result};
use apidoc_aggregator_compose::openapi::FragmentFormat;
use apidoc_aggregator_compose::{Fragment, FragmentParser};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

const DEFAULT_SERVICE_TYPE: &str = "file";

/// One fragment file exposed as a service
#[derive(Debug)]
pub struct FileService {
    name: String,
    path: PathBuf,
    label: String,
    description: String,
    service_type: String,
    /// Last successfully parsed fragment
    cached: Mutex<Option<Fragment>>,
}

impl FileService {
    /// Read the file once to pick up metadata; a broken file still registers
    fn open(name: String, path: PathBuf) -> Self {
        let loaded = FragmentParser::from_file(&path, &name).map(FragmentParser::into_fragment);
        let fragment = match loaded {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                tracing::warn!(service = %name, error = %e, "Failed to read fragment file");
                None
            }
        };

        let info = |field: &str| {
            fragment
                .as_ref()
                .and_then(|f| f.info_field(field))
                .map(String::from)
        };
        let label = info("title").unwrap_or_else(|| name.clone());
        let description = info("description").unwrap_or_default();
        let service_type = fragment
            .as_ref()
            .and_then(|f| f.extension("x-service-type"))
            .unwrap_or(DEFAULT_SERVICE_TYPE)
            .to_string();

        Self {
            name,
            path,
            label,
            description,
            service_type,
            cached: Mutex::new(fragment),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Fragment> {
        FragmentParser::from_file(&self.path, &self.name)
            .map(FragmentParser::into_fragment)
            .map_err(|e| ApiDocError::Fetch {
                service: self.name.clone(),
                reason: e.to_string(),
            })
    }
}

impl ServiceHandle for FileService {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn service_type(&self) -> String {
        self.service_type.clone()
    }

    fn api_doc(&self, refresh: bool) -> Result<Option<Fragment>> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let fragment = match cached.as_ref() {
            Some(fragment) if !refresh => fragment.clone(),
            _ => {
                let fragment = self.load()?;
                *cached = Some(fragment.clone());
                fragment
            }
        };

        if fragment.is_empty() {
            return Ok(None);
        }
        Ok(Some(fragment))
    }
}

/// Registry over every fragment file found below a root directory
#[derive(Default)]
pub struct DirectoryRegistry {
    services: IndexMap<String, Arc<dyn ServiceHandle>>,
}

impl DirectoryRegistry {
    /// Scan `root` recursively for fragment files
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ApiDocError::Config(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let mut services = IndexMap::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                ApiDocError::Config(format!("Failed to scan {}: {}", root.display(), e))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || FragmentFormat::from_path(path).is_none() {
                continue;
            }

            let Some(name) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_lowercase)
            else {
                continue;
            };

            if services.contains_key(&name) {
                tracing::warn!(
                    service = %name,
                    path = %path.display(),
                    "Duplicate service name, keeping the first file"
                );
                continue;
            }

            let service = FileService::open(name.clone(), path.to_path_buf());
            services.insert(name, Arc::new(service) as Arc<dyn ServiceHandle>);
        }

        services.sort_keys();
        tracing::info!(root = %root.display(), services = services.len(), "Scanned fragment directory");

        Ok(Self { services })
    }

    /// Add a service that is not backed by a file, keeping name order
    ///
    /// Returns false (and leaves the registry unchanged) if the name is taken.
    pub fn register(&mut self, handle: Arc<dyn ServiceHandle>) -> bool {
        let name = handle.name().to_lowercase();
        if self.services.contains_key(&name) {
            tracing::warn!(service = %name, "Service name already registered");
            return false;
        }
        self.services.insert(name, handle);
        self.services.sort_keys();
        true
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceRegistry for DirectoryRegistry {
    fn list_visible_service_names(&self, _profile: &AccessProfile) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    fn resolve(&self, name: &str) -> Option<Arc<dyn ServiceHandle>> {
        self.services
            .get(&name.to_lowercase())
            .map(Arc::clone)
    }
}
