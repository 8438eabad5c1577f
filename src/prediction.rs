//! Prediction service.
//!
//! Holds the process-wide model reference and moves between two states:
//! Unloaded and Loaded. Loading never fails from the caller's point of view;
//! a model that cannot be read or synthesized leaves the service Unloaded and
//! only `/predict/` degrades.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::errors::{LabError, LabResult, SafeReadLock, SafeWriteLock};
use crate::linear_model::{FeatureVector, LinearModel};
use crate::training::ModelSource;

const RESOURCE: &str = "model_reference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelState {
    Unloaded,
    Loaded,
}

struct LoadedModel {
    model: LinearModel,
    path: Option<PathBuf>,
}

pub struct PredictionService {
    model: RwLock<Option<LoadedModel>>,
    source: Arc<dyn ModelSource>,
}

impl PredictionService {
    pub fn new(source: Arc<dyn ModelSource>) -> Self {
        Self {
            model: RwLock::new(None),
            source,
        }
    }

    /// Load the model at `path`, synthesizing and persisting a default one
    /// when the file is missing or unreadable.
    pub fn load_model(&self, path: impl AsRef<Path>) -> ModelState {
        let path = path.as_ref();

        let model = match LinearModel::load(path) {
            Ok(model) => model,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Error loading ML model: {e}. Creating a default model...");
                } else {
                    tracing::warn!(
                        "Model file not found at {}. Creating a default model...",
                        path.display()
                    );
                }
                match self.synthesize(path) {
                    Ok(model) => model,
                    Err(e) => {
                        tracing::error!("Failed to create default model: {e}");
                        return self.state();
                    }
                }
            }
        };

        match self.model.safe_write(RESOURCE) {
            Ok(mut slot) => {
                *slot = Some(LoadedModel {
                    model,
                    path: Some(path.to_path_buf()),
                });
                tracing::info!("ML model loaded successfully from {}", path.display());
                ModelState::Loaded
            }
            Err(e) => {
                tracing::error!("Failed to install model: {e}");
                ModelState::Unloaded
            }
        }
    }

    fn synthesize(&self, path: &Path) -> LabResult<LinearModel> {
        let trained = self.source.produce()?;
        trained.model.save(path)?;
        tracing::info!("Model saved to {}", path.display());
        LinearModel::load(path)
    }

    /// Install an already fitted model without touching the filesystem.
    pub fn install(&self, model: LinearModel) -> LabResult<()> {
        let mut slot = self.model.safe_write(RESOURCE)?;
        *slot = Some(LoadedModel { model, path: None });
        Ok(())
    }

    /// Release the model reference.
    pub fn unload(&self) -> LabResult<()> {
        let mut slot = self.model.safe_write(RESOURCE)?;
        if slot.take().is_some() {
            tracing::info!("ML model unloaded");
        }
        Ok(())
    }

    pub fn predict(&self, features: &FeatureVector) -> LabResult<f64> {
        features.validate()?;

        let slot = self.model.safe_read(RESOURCE)?;
        let loaded = slot.as_ref().ok_or(LabError::ModelUnavailable)?;

        let prediction = loaded.model.predict(features);
        if !prediction.is_finite() {
            tracing::error!(?features, "model produced a non-finite prediction");
            return Err(LabError::prediction(format!(
                "model produced non-finite output {prediction}"
            )));
        }
        Ok(prediction)
    }

    pub fn state(&self) -> ModelState {
        match self.model.safe_read(RESOURCE) {
            Ok(slot) if slot.is_some() => ModelState::Loaded,
            _ => ModelState::Unloaded,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == ModelState::Loaded
    }

    pub fn status(&self) -> serde_json::Value {
        let slot = match self.model.safe_read(RESOURCE) {
            Ok(slot) => slot,
            Err(e) => return serde_json::json!({ "state": "unknown", "error": e.to_string() }),
        };
        match slot.as_ref() {
            Some(loaded) => serde_json::json!({
                "state": ModelState::Loaded,
                "model_path": loaded.path.as_ref().map(|p| p.display().to_string()),
                "intercept": loaded.model.intercept,
                "coefficients": loaded.model.coefficients,
                "trained_at": loaded.model.trained_at.to_rfc3339(),
            }),
            None => serde_json::json!({ "state": ModelState::Unloaded }),
        }
    }
}
