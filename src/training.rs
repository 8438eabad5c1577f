//! Model sources.
//!
//! The prediction service only sees [`ModelSource`]; the synthetic trainer is
//! the default source used when no model file is available.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::errors::{LabError, LabResult};
use crate::linear_model::{LinearModel, FEATURE_COUNT};

/// Weights of the synthetic ground truth: target = 2·f1 + 1.5·f2 + 0.5·f3 + noise.
pub const TRUE_COEFFICIENTS: [f64; FEATURE_COUNT] = [2.0, 1.5, 0.5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub samples: usize,
    pub seed: u64,
    pub noise_std: f64,
    pub feature_scale: f64,
    pub test_fraction: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            seed: 42,
            noise_std: 0.5,
            feature_scale: 10.0,
            test_fraction: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub train_r2: f64,
    pub test_r2: f64,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: LinearModel,
    pub report: TrainingReport,
}

/// Anything that can hand the prediction service a fitted model.
pub trait ModelSource: Send + Sync {
    fn produce(&self) -> LabResult<TrainedModel>;
}

/// Fits OLS on seeded synthetic data.
#[derive(Debug, Clone, Default)]
pub struct SyntheticTrainer {
    config: TrainingConfig,
}

pub struct Dataset {
    pub rows: Vec<[f64; FEATURE_COUNT]>,
    pub targets: Vec<f64>,
}

impl SyntheticTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Features first, then noise, both from the same seeded stream.
    pub fn generate(&self) -> LabResult<Dataset> {
        let cfg = &self.config;
        if cfg.noise_std.is_nan() || cfg.noise_std < 0.0 {
            return Err(LabError::training(format!(
                "noise_std must be non-negative, got {}",
                cfg.noise_std
            )));
        }
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let noise = Normal::new(0.0, cfg.noise_std)
            .map_err(|e| LabError::training(format!("invalid noise distribution: {e}")))?;

        let rows: Vec<[f64; FEATURE_COUNT]> = (0..cfg.samples)
            .map(|_| {
                [
                    rng.random::<f64>() * cfg.feature_scale,
                    rng.random::<f64>() * cfg.feature_scale,
                    rng.random::<f64>() * cfg.feature_scale,
                ]
            })
            .collect();

        let targets = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(TRUE_COEFFICIENTS.iter())
                    .map(|(f, w)| f * w)
                    .sum::<f64>()
                    + noise.sample(&mut rng)
            })
            .collect();

        Ok(Dataset { rows, targets })
    }

    /// Shuffled train/test index split.
    fn split(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);

        let test_len = (n as f64 * self.config.test_fraction).round() as usize;
        let train = indices.split_off(test_len);
        (train, indices)
    }
}

impl ModelSource for SyntheticTrainer {
    fn produce(&self) -> LabResult<TrainedModel> {
        let data = self.generate()?;
        let (train_idx, test_idx) = self.split(data.rows.len());

        let pick = |idx: &[usize]| -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
            idx.iter().map(|&i| (data.rows[i], data.targets[i])).unzip()
        };
        let (train_rows, train_targets) = pick(&train_idx);
        let (test_rows, test_targets) = pick(&test_idx);

        let mut model = fit_ols(&train_rows, &train_targets)?;
        let train_r2 = r2_score(&model, &train_rows, &train_targets);
        let test_r2 = r2_score(&model, &test_rows, &test_targets);

        model.samples = data.rows.len();
        model.train_r2 = Some(train_r2);
        model.test_r2 = Some(test_r2);

        tracing::info!(
            samples = model.samples,
            "Model trained - Train R²: {train_r2:.4}, Test R²: {test_r2:.4}"
        );

        Ok(TrainedModel {
            model,
            report: TrainingReport {
                samples: data.rows.len(),
                train_r2,
                test_r2,
            },
        })
    }
}

/// Ordinary least squares with an intercept, solved through the normal
/// equations (XᵀX)β = Xᵀy.
pub fn fit_ols(rows: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> LabResult<LinearModel> {
    let params = FEATURE_COUNT + 1;
    if rows.len() != targets.len() {
        return Err(LabError::training(format!(
            "{} rows but {} targets",
            rows.len(),
            targets.len()
        )));
    }
    if rows.len() < params {
        return Err(LabError::training(format!(
            "need at least {params} samples, got {}",
            rows.len()
        )));
    }

    let x = DMatrix::from_fn(rows.len(), params, |r, c| {
        if c == 0 {
            1.0
        } else {
            rows[r][c - 1]
        }
    });
    let y = DVector::from_column_slice(targets);

    let xt = x.transpose();
    let beta = (&xt * &x)
        .cholesky()
        .ok_or_else(|| LabError::training("design matrix is singular"))?
        .solve(&(&xt * &y));

    Ok(LinearModel::new(beta[0], [beta[1], beta[2], beta[3]]))
}

/// Coefficient of determination.
pub fn r2_score(model: &LinearModel, rows: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let mean = targets.iter().sum::<f64>() / targets.len() as f64;
    let (ss_res, ss_tot) = rows
        .iter()
        .zip(targets)
        .fold((0.0, 0.0), |(res, tot), (row, &y)| {
            let err = y - model.evaluate(row);
            (res + err * err, tot + (y - mean) * (y - mean))
        });
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
