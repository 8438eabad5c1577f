//! Error handling for the item lab service
//!
//! Domain errors live here; `api_errors` maps them onto HTTP responses.

use thiserror::Error;

/// Main error type for the item lab
#[derive(Error, Debug)]
pub enum LabError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Model is not loaded")]
    ModelUnavailable,

    #[error("Prediction failed: {message}")]
    PredictionFailure { message: String },

    #[error("Model training failed: {message}")]
    Training { message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Lock poisoned: {resource}")]
    MutexPoisoned { resource: String },
}

/// Result alias used throughout the crate.
pub type LabResult<T> = Result<T, LabError>;

impl LabError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::PredictionFailure {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::Training {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}

/// Read access to a `RwLock` that reports poisoning as a `LabError`
/// instead of panicking.
pub trait SafeReadLock<T: ?Sized> {
    fn safe_read(&self, resource: &str) -> LabResult<std::sync::RwLockReadGuard<'_, T>>;
}

impl<T: ?Sized> SafeReadLock<T> for std::sync::RwLock<T> {
    fn safe_read(&self, resource: &str) -> LabResult<std::sync::RwLockReadGuard<'_, T>> {
        self.read().map_err(|_| LabError::MutexPoisoned {
            resource: resource.to_string(),
        })
    }
}

/// Write access counterpart of [`SafeReadLock`].
pub trait SafeWriteLock<T: ?Sized> {
    fn safe_write(&self, resource: &str) -> LabResult<std::sync::RwLockWriteGuard<'_, T>>;
}

impl<T: ?Sized> SafeWriteLock<T> for std::sync::RwLock<T> {
    fn safe_write(&self, resource: &str) -> LabResult<std::sync::RwLockWriteGuard<'_, T>> {
        self.write().map_err(|_| LabError::MutexPoisoned {
            resource: resource.to_string(),
        })
    }
}

impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::serialization("json_operation", err)
    }
}

impl From<std::io::Error> for LabError {
    fn from(err: std::io::Error) -> Self {
        LabError::io("io_operation", err)
    }
}
