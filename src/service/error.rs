//! Error types for the coupon service.

use std::fmt;

use crate::store::StoreError;

/// Error type for single-coupon service operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Storage failure, including a missing code.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A discount was applied to a basket whose value is zero or negative.
    #[error("tried to apply discount to negative or zero value")]
    InvalidBasketState,
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Store(e) if e.is_not_found())
    }
}

/// One failed lookup inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the code in the input.
    pub index: usize,
    pub code: String,
    pub cause: StoreError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, index: {}, error: {}",
            self.code, self.index, self.cause
        )
    }
}

/// Every failed lookup of a batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    failures: Vec<BatchFailure>,
}

impl BatchError {
    /// Returns `None` when there is nothing to report.
    pub(crate) fn from_failures(failures: Vec<BatchFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    /// Input indices that failed, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.failures.iter().map(|f| f.index)
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| &f.cause as &(dyn std::error::Error + 'static))
    }
}
