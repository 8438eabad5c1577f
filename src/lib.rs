//! Library root for the `itemlab` crate

// Core error handling
pub mod api_errors;
pub mod errors;

// Items
pub mod item_store;

// Model, training and prediction
pub mod linear_model;
pub mod prediction;
pub mod training;

// Configuration & CLI
pub mod cli;
pub mod config;
pub mod logging;

// Web server interface
pub mod app_state;
pub mod routes;
pub mod server;


pub use app_state::AppState;
pub use errors::{LabError, LabResult};
pub use item_store::{InMemoryItemStore, Item, ItemStore};
pub use linear_model::{FeatureVector, LinearModel};
pub use prediction::{ModelState, PredictionService};
