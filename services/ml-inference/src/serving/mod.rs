//! Model serving infrastructure
//!
//! The registry maps `(family, crop)` to a loaded model. Entries are created
//! on first successful load and never replaced; failed loads leave no trace,
//! so an artifact copied into the model directory later is picked up by the
//! next resolve.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use agripredict_common::{CROPS, CropDescriptor, ModelFamily, StorageConfig};
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::models::{ModelError, PredictionModel, parse_artifact};

/// Registry key: family plus crop for the per-crop families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKey {
    family: ModelFamily,
    crop: Option<&'static str>,
}

impl ModelKey {
    /// Key for a crop; the crop is dropped for singleton families
    #[must_use]
    pub const fn for_crop(family: ModelFamily, crop: &CropDescriptor) -> Self {
        let crop = if family.is_per_crop() {
            Some(crop.canonical_name)
        } else {
            None
        };
        Self { family, crop }
    }

    #[must_use]
    pub const fn fertilizer() -> Self {
        Self {
            family: ModelFamily::Fertilizer,
            crop: None,
        }
    }

    #[must_use]
    pub const fn crop_recommendation() -> Self {
        Self {
            family: ModelFamily::CropRecommendation,
            crop: None,
        }
    }

    #[must_use]
    pub const fn family(&self) -> ModelFamily {
        self.family
    }

    #[must_use]
    pub const fn crop(&self) -> Option<&'static str> {
        self.crop
    }

    /// File name under the model directory
    #[must_use]
    pub fn artifact_name(&self, extension: &str) -> String {
        match (self.family, self.crop) {
            (ModelFamily::Production, Some(crop)) => format!("{crop}_pro_model.{extension}"),
            (ModelFamily::Price, Some(crop)) => format!("{crop}_pri_model.{extension}"),
            (ModelFamily::DistrictDemand, Some(crop)) => {
                format!("{crop}_district_model.{extension}")
            }
            (ModelFamily::CropRecommendation, _) => format!("model.{extension}"),
            (family, _) => format!("{family}.{extension}"),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.crop {
            Some(crop) => write!(f, "{}/{crop}", self.family),
            None => write!(f, "{}", self.family),
        }
    }
}

/// Source of serialized artifacts
pub trait ArtifactStore: Send + Sync + fmt::Debug {
    /// Whether an artifact exists, without reading it
    fn contains(&self, name: &str) -> bool;

    /// Read an artifact's contents
    fn load(&self, name: &str) -> Result<String, ModelError>;
}

/// Artifacts stored as files in one directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn contains(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    fn load(&self, name: &str) -> Result<String, ModelError> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ModelError::NotFound(path)
            } else {
                ModelError::Io { path, source }
            }
        })
    }
}

/// Process-wide model cache
#[derive(Debug)]
pub struct ModelRegistry {
    store: Arc<dyn ArtifactStore>,
    extension: String,
    models: DashMap<ModelKey, Arc<dyn PredictionModel>>,
}

impl ModelRegistry {
    pub fn new(store: Arc<dyn ArtifactStore>, extension: impl Into<String>) -> Self {
        Self {
            store,
            extension: extension.into(),
            models: DashMap::new(),
        }
    }

    /// Registry over the configured model directory
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            Arc::new(FsArtifactStore::new(&config.model_dir)),
            config.artifact_extension.clone(),
        )
    }

    /// Cached model, loading it on a miss
    ///
    /// Returns `None` when the artifact is missing or fails to load. The
    /// failure is logged and not remembered.
    pub fn resolve(&self, key: ModelKey) -> Option<Arc<dyn PredictionModel>> {
        if let Some(model) = self.models.get(&key) {
            return Some(Arc::clone(model.value()));
        }

        match self.load(key) {
            Ok(model) => {
                // Racing loaders converge on whichever handle landed first
                let model = Arc::clone(self.models.entry(key).or_insert(model).value());
                record_load(key.family, "loaded");
                metrics::gauge!("agripredict_models_cached").set(self.models.len() as f64);
                info!(model = %key, name = model.name(), "Model loaded");
                Some(model)
            }
            Err(ModelError::NotFound(path)) => {
                record_load(key.family, "missing");
                debug!(model = %key, path = %path.display(), "Artifact not present");
                None
            }
            Err(e) => {
                record_load(key.family, "failed");
                warn!(model = %key, error = %e, "Failed to load model");
                None
            }
        }
    }

    /// Seed an entry without touching storage; an existing entry is kept
    pub fn register(&self, key: ModelKey, model: Arc<dyn PredictionModel>) -> Arc<dyn PredictionModel> {
        let model = Arc::clone(self.models.entry(key).or_insert(model).value());
        metrics::gauge!("agripredict_models_cached").set(self.models.len() as f64);
        model
    }

    fn load(&self, key: ModelKey) -> Result<Arc<dyn PredictionModel>, ModelError> {
        let name = key.artifact_name(&self.extension);
        let contents = self.store.load(&name)?;
        parse_artifact(&contents)
    }

    /// Attempt to load every known artifact, returning how many are cached
    pub fn preload_all(&self) -> usize {
        for key in Self::all_keys() {
            self.resolve(key);
        }
        for family in ModelFamily::ALL {
            info!(family = %family, loaded = self.loaded_count(family), "Preload finished");
        }
        self.models.len()
    }

    /// Cache membership only, no I/O
    #[must_use]
    pub fn is_loaded(&self, key: ModelKey) -> bool {
        self.models.contains_key(&key)
    }

    /// Cached models of one family
    #[must_use]
    pub fn loaded_count(&self, family: ModelFamily) -> usize {
        self.models.iter().filter(|entry| entry.key().family == family).count()
    }

    /// Whether the artifact exists in storage, without loading it
    #[must_use]
    pub fn artifact_present(&self, key: ModelKey) -> bool {
        self.store.contains(&key.artifact_name(&self.extension))
    }

    /// Every key the service can serve
    #[must_use]
    pub fn all_keys() -> Vec<ModelKey> {
        let mut keys: Vec<ModelKey> = ModelFamily::PER_CROP
            .iter()
            .flat_map(|&family| CROPS.iter().map(move |crop| ModelKey::for_crop(family, crop)))
            .collect();
        keys.push(ModelKey::fertilizer());
        keys.push(ModelKey::crop_recommendation());
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn record_load(family: ModelFamily, outcome: &'static str) {
    metrics::counter!(
        "agripredict_model_loads_total",
        "family" => family.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
