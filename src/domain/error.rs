use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Integrity error: {message}")]
    Integrity { message: String },

    #[error("Signing key unavailable: {message}")]
    KeyUnavailable { message: String },

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("Malformed token: {message}")]
    MalformedToken { message: String },

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Stable, machine-readable classification of a [`DomainError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Storage,
    Integrity,
    KeyUnavailable,
    Signing,
    MalformedToken,
    InvalidToken,
    TokenExpired,
    Configuration,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
            Self::Integrity => "integrity",
            Self::KeyUnavailable => "key_unavailable",
            Self::Signing => "signing",
            Self::MalformedToken => "malformed_token",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "token_expired",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }

    /// True for the kinds produced by a failed token verification
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken | Self::InvalidToken | Self::TokenExpired
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    pub fn key_unavailable(message: impl Into<String>) -> Self {
        Self::KeyUnavailable {
            message: message.into(),
        }
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::KeyUnavailable { .. } => ErrorKind::KeyUnavailable,
            Self::Signing { .. } => ErrorKind::Signing,
            Self::MalformedToken { .. } => ErrorKind::MalformedToken,
            Self::InvalidToken { .. } => ErrorKind::InvalidToken,
            Self::TokenExpired => ErrorKind::TokenExpired,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Login 'a@b.com' not found");
        assert_eq!(error.to_string(), "Not found: Login 'a@b.com' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Resource already exists");
        assert_eq!(error.to_string(), "Conflict: Resource already exists");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_token_rejection_kinds() {
        assert!(DomainError::TokenExpired.kind().is_token_rejection());
        assert!(DomainError::invalid_token("bad signature").kind().is_token_rejection());
        assert!(DomainError::malformed_token("garbage").kind().is_token_rejection());
        assert!(!DomainError::key_unavailable("no secret").kind().is_token_rejection());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::KeyUnavailable.to_string(), "key_unavailable");
        assert_eq!(DomainError::TokenExpired.kind().as_str(), "token_expired");
    }
}
