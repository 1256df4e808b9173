//! Error types for the cleaning operations engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing payroll, talking
//! to the table store, or rendering receipts.

use thiserror::Error;

/// The main error type for the cleaning operations engine.
///
/// Every error is scoped to the single operation that raised it; nothing
/// here is fatal to the process.
///
/// # Example
///
/// ```
/// use cleaning_ops::error::OpsError;
///
/// let error = OpsError::ConfigNotFound {
///     path: "/missing/dashboard.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/dashboard.yaml");
/// ```
#[derive(Debug, Error)]
pub enum OpsError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required field was missing or a computed value was out of range.
    ///
    /// Raised before any store call is made.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field (or derived value) that failed validation.
        field: String,
        /// A user-facing description of the problem.
        message: String,
    },

    /// The table store rejected a request or could not be reached.
    #[error("Store {operation} on '{collection}' failed: {message}")]
    Store {
        /// The collection the operation targeted.
        collection: String,
        /// The operation that failed (list, filter, create, update, delete).
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// A record with the given id does not exist in the collection.
    #[error("Record '{id}' not found in '{collection}'")]
    RecordNotFound {
        /// The collection that was searched.
        collection: String,
        /// The id that was not found.
        id: String,
    },

    /// A stored row could not be decoded into its domain record.
    #[error("Malformed '{collection}' record: {message}")]
    MalformedRecord {
        /// The collection the row came from.
        collection: String,
        /// A description of the decode failure.
        message: String,
    },

    /// A payment's embedded work log could not be parsed.
    #[error("Invalid work log on payment '{payment_id}': {message}")]
    WorkLogParse {
        /// The payment whose work log failed to parse.
        payment_id: String,
        /// A description of the parse error.
        message: String,
    },

    /// A receipt could not be rendered.
    #[error("Receipt rendering failed: {message}")]
    Receipt {
        /// A description of the failure.
        message: String,
    },

    /// Reading or writing a local file failed.
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// The path involved.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl OpsError {
    /// Shorthand for a [`OpsError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`OpsError::Store`] error.
    pub fn store(
        collection: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Store {
            collection: collection.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors raised by local validation, before any store call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// A type alias for Results that return OpsError.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = OpsError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = OpsError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = OpsError::validation("staff_name", "select a staff member");
        assert_eq!(
            error.to_string(),
            "Validation failed for 'staff_name': select a staff member"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn test_store_error_displays_operation_and_collection() {
        let error = OpsError::store("Branch", "update", "connection refused");
        assert_eq!(
            error.to_string(),
            "Store update on 'Branch' failed: connection refused"
        );
        assert!(!error.is_validation());
    }

    #[test]
    fn test_record_not_found_displays_id() {
        let error = OpsError::RecordNotFound {
            collection: "Complaint".to_string(),
            id: "c-42".to_string(),
        };
        assert_eq!(error.to_string(), "Record 'c-42' not found in 'Complaint'");
    }

    #[test]
    fn test_work_log_parse_displays_payment() {
        let error = OpsError::WorkLogParse {
            payment_id: "PAY-1".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid work log on payment 'PAY-1': expected value"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<OpsError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_store_error() -> OpsResult<()> {
            Err(OpsError::store("SalaryLog", "create", "timeout"))
        }

        fn propagates_error() -> OpsResult<()> {
            returns_store_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
