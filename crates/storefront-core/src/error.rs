//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Closed set: InvalidRequest | NotFound | Internal│
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What the client sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← DbError                           │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                          ApiError → Client                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, cart item id)
//! 3. Callers branch on [`ErrorKind`], never on message text

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors surfaced by the cart and checkout services.
///
/// Every failure is one of three kinds. Store backends convert their own
/// errors into [`CoreError::Internal`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or malformed input.
    ///
    /// ## When This Occurs
    /// - Adding with quantity < 1
    /// - Checkout with an empty item list
    /// - Checkout without customer name or email
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A referenced product or cart line does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The underlying store failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The three error kinds, for mapping to transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    NotFound,
    Internal,
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidRequest error.
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidRequest(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CoreError::Internal(message.into())
    }

    /// Which of the three kinds this error is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// They always surface as [`CoreError::InvalidRequest`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be at least 1.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Arithmetic on the value left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::InvalidRequest(err.to_string())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
