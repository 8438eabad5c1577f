use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{LabError, LabResult};

pub const FEATURE_COUNT: usize = 3;

/// Feature vector for prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub feature1: f64,
    pub feature2: f64,
    pub feature3: f64,
}

impl FeatureVector {
    pub fn new(feature1: f64, feature2: f64, feature3: f64) -> Self {
        Self {
            feature1,
            feature2,
            feature3,
        }
    }

    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [self.feature1, self.feature2, self.feature3]
    }

    pub fn validate(&self) -> LabResult<()> {
        let names = ["feature1", "feature2", "feature3"];
        for (name, value) in names.iter().zip(self.to_vector()) {
            if !value.is_finite() {
                return Err(LabError::validation(*name, format!("{value} is not a finite number")));
            }
        }
        Ok(())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

/// Ordinary least squares regressor over three features.
///
/// Serialized as-is to the model file; the training fields are metadata and
/// do not take part in prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: [f64; FEATURE_COUNT],
    pub trained_at: DateTime<Utc>,
    #[serde(default)]
    pub samples: usize,
    #[serde(default)]
    pub train_r2: Option<f64>,
    #[serde(default)]
    pub test_r2: Option<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: [f64; FEATURE_COUNT]) -> Self {
        Self {
            intercept,
            coefficients,
            trained_at: Utc::now(),
            samples: 0,
            train_r2: None,
            test_r2: None,
        }
    }

    /// intercept + sum(coefficient_i * feature_i)
    pub fn evaluate(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        self.intercept
            + features
                .iter()
                .zip(self.coefficients.iter())
                .map(|(f, w)| f * w)
                .sum::<f64>()
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        self.evaluate(&features.to_vector())
    }

    pub fn load(path: &Path) -> LabResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| LabError::io(format!("reading model {}", path.display()), e))?;
        serde_json::from_str(&content)
            .map_err(|e| LabError::serialization(format!("parsing model {}", path.display()), e))
    }

    pub fn save(&self, path: &Path) -> LabResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| LabError::io(format!("creating {}", parent.display()), e))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LabError::serialization("encoding model", e))?;
        fs::write(path, content)
            .map_err(|e| LabError::io(format!("writing model {}", path.display()), e))
    }
}
