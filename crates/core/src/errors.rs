use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product {0} is not in the catalog")]
    ProductNotFound(ProductId),
    #[error("catalog lists product {0} more than once")]
    DuplicateProductId(ProductId),
    #[error("unknown menu category `{0}` (expected starters|mains|dessert|drinks)")]
    UnknownCategory(String),
    #[error("adding product {0} would push the cart total past the largest supported amount")]
    TotalOverflow(ProductId),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class, used in CLI payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::ProductNotFound(_)) => "product_not_found",
            Self::Domain(_) => "domain_validation",
            Self::Persistence(_) => "persistence",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::ProductNotFound(_)) => {
                "That item is no longer on the menu."
            }
            Self::Domain(DomainError::TotalOverflow(_)) => {
                "That quantity is more than the cart can hold."
            }
            Self::Domain(_) => "The request could not be processed. Check inputs and try again.",
            Self::Persistence(_) => "Your cart could not be saved. Changes may be lost on reload.",
            Self::Configuration(_) => "Check the delish configuration file and DELISH_* variables.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn product_not_found_has_dedicated_class() {
        let error = ApplicationError::from(DomainError::ProductNotFound(ProductId(999)));

        assert_eq!(error.error_class(), "product_not_found");
        assert_eq!(error.to_string(), "product 999 is not in the catalog");
    }

    #[test]
    fn other_domain_errors_map_to_validation_class() {
        let error = ApplicationError::from(DomainError::InvariantViolation("bad".to_owned()));

        assert_eq!(error.error_class(), "domain_validation");
        assert_eq!(
            error.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn persistence_error_has_user_safe_message() {
        let error = ApplicationError::Persistence("disk full".to_owned());

        assert_eq!(error.error_class(), "persistence");
        assert!(!error.user_message().contains("disk full"));
    }
}
