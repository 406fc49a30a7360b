//! Template store: named PNG files under a fixed templates root

use super::error::{TemplateError, TemplateResult};
use super::types::Template;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct TemplateStore {
    root: PathBuf,
    cache: HashMap<String, Arc<Template>>,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the full path of a template file
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether the named template file is present on disk
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    /// Load a template, checking on every call that the file is still present.
    /// Decoded pixels are cached since templates never change during a run.
    pub fn load(&mut self, name: &str) -> TemplateResult<Arc<Template>> {
        let path = self.resolve(name);
        if !path.is_file() {
            return Err(TemplateError::Missing { path });
        }
        if let Some(template) = self.cache.get(name) {
            return Ok(Arc::clone(template));
        }

        let image = image::open(&path)
            .map_err(|source| TemplateError::Decode {
                path: path.clone(),
                source,
            })?
            .to_luma8();
        log::debug!(
            "📐 Loaded template '{}' ({}x{}) from {}",
            name,
            image.width(),
            image.height(),
            path.display()
        );

        let template = Arc::new(Template::new(name, path, image));
        self.cache.insert(name.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Scan the root for PNG template files, sorted by name
    pub fn available(&self) -> TemplateResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| TemplateError::Directory {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            if let Some(file_name) = entry.file_name().to_str()
                && file_name.to_lowercase().ends_with(".png")
                && entry.path().is_file()
            {
                names.push(file_name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Names from `required` that have no file under the root
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.exists(name))
            .collect()
    }
}
