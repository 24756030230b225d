use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};

use crate::game::math::Rect2F;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read model file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model file '{path}' has no parts")]
    EmptyModel { path: String },
}

/// One colored rect of a model, in local coordinates around the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPart {
    pub rect: Rect2F,
    pub color: [u8; 3],
}

/// A `.model` asset: a list of colored rects drawn relative to the owning
/// entity's transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub parts: Vec<ModelPart>,
}

/// Loads and caches model assets by path.
#[derive(Default)]
pub struct ResourceManager {
    models: HashMap<String, Arc<ModelAsset>>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<ModelAsset>, AssetError> {
        let key = path.as_ref().to_string_lossy().to_string();
        if let Some(model) = self.models.get(&key) {
            return Ok(model.clone());
        }

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| AssetError::Io {
            path: key.clone(),
            source,
        })?;
        let model: ModelAsset =
            serde_json::from_str(&content).map_err(|source| AssetError::Parse {
                path: key.clone(),
                source,
            })?;
        if model.parts.is_empty() {
            return Err(AssetError::EmptyModel { path: key });
        }

        log::info!("Loaded model '{key}' with {} parts", model.parts.len());
        let model = Arc::new(model);
        self.models.insert(key, model.clone());
        Ok(model)
    }

    /// Missing or broken assets fall back to a built-in model so the
    /// sandbox always starts.
    pub fn load_model_or_default<P: AsRef<Path>>(&mut self, path: P) -> Arc<ModelAsset> {
        match self.load_model(path.as_ref()) {
            Ok(model) => model,
            Err(e) => {
                log::warn!("{e}, using built-in model");
                Arc::new(default_house_model())
            }
        }
    }

    pub fn cached_model_count(&self) -> usize {
        self.models.len()
    }
}

/// Stand-in for `assets/house.model`: walls, roof and a door.
pub fn default_house_model() -> ModelAsset {
    ModelAsset {
        parts: vec![
            ModelPart {
                rect: Rect2F::new(-96.0, -64.0, 192.0, 128.0),
                color: [188, 129, 82],
            },
            ModelPart {
                rect: Rect2F::new(-112.0, -112.0, 224.0, 48.0),
                color: [142, 50, 38],
            },
            ModelPart {
                rect: Rect2F::new(-24.0, 0.0, 48.0, 64.0),
                color: [84, 55, 33],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_model_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_model_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let model = ModelAsset {
            parts: vec![ModelPart {
                rect: Rect2F::new(0.0, 0.0, 10.0, 10.0),
                color: [1, 2, 3],
            }],
        };
        let path = write_model_file(&dir, "house.model", &serde_json::to_string(&model).unwrap());

        let mut manager = ResourceManager::new();
        let loaded = manager.load_model(&path).unwrap();
        assert_eq!(*loaded, model);
    }

    #[test]
    fn test_load_model_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let model = default_house_model();
        let path = write_model_file(&dir, "house.model", &serde_json::to_string(&model).unwrap());

        let mut manager = ResourceManager::new();
        let first = manager.load_model(&path).unwrap();

        // Cache must serve the old copy even if the file goes away
        std::fs::remove_file(&path).unwrap();
        let second = manager.load_model(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.cached_model_count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut manager = ResourceManager::new();
        let result = manager.load_model("no/such/file.model");
        assert!(matches!(result, Err(AssetError::Io { .. })));
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_model_file(&dir, "bad.model", "not json at all");

        let mut manager = ResourceManager::new();
        let result = manager.load_model(&path);
        assert!(matches!(result, Err(AssetError::Parse { .. })));
    }

    #[test]
    fn test_empty_model_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_model_file(&dir, "empty.model", r#"{"parts":[]}"#);

        let mut manager = ResourceManager::new();
        let result = manager.load_model(&path);
        assert!(matches!(result, Err(AssetError::EmptyModel { .. })));
    }

    #[test]
    fn test_fallback_model_on_missing_asset() {
        let mut manager = ResourceManager::new();
        let model = manager.load_model_or_default("no/such/house.model");
        assert!(!model.parts.is_empty());
    }
}
