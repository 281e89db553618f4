use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::foundation::error::{LayercastError, LayercastResult};
use crate::scene::model::Template;

/// Single-slot template storage.
///
/// `save` replaces the slot wholesale; `load` returns the last saved template or `None`.
pub trait TemplateRepository: Send + Sync {
    /// Read the slot.
    fn load(&self) -> LayercastResult<Option<Template>>;
    /// Overwrite the slot.
    fn save(&self, template: &Template) -> LayercastResult<()>;
}

/// Process-local slot, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    slot: Mutex<Option<Template>>,
}

impl InMemoryTemplateRepository {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn load(&self) -> LayercastResult<Option<Template>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| LayercastError::storage("template slot lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, template: &Template) -> LayercastResult<()> {
        template.validate()?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| LayercastError::storage("template slot lock poisoned"))?;
        *slot = Some(template.clone());
        Ok(())
    }
}

/// Slot backed by one JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileTemplateRepository {
    path: PathBuf,
}

impl JsonFileTemplateRepository {
    /// Slot at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the slot.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateRepository for JsonFileTemplateRepository {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> LayercastResult<Option<Template>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("template slot is empty");
                return Ok(None);
            }
            Err(e) => {
                return Err(LayercastError::storage(format!(
                    "failed to read template '{}': {e}",
                    self.path.display()
                )));
            }
        };
        let template: Template = serde_json::from_slice(&bytes)?;
        template.validate()?;
        Ok(Some(template))
    }

    #[tracing::instrument(skip(self, template), fields(path = %self.path.display(), layers = template.layers.len()))]
    fn save(&self, template: &Template) -> LayercastResult<()> {
        template.validate()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                LayercastError::storage(format!(
                    "failed to create template dir '{}': {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_vec_pretty(template)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json).map_err(|e| {
            LayercastError::storage(format!("failed to write '{}': {e}", tmp.display()))
        })?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(LayercastError::storage(format!(
                "failed to replace template '{}': {e}",
                self.path.display()
            )));
        }
        tracing::info!("template saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/repository.rs"]
mod tests;
