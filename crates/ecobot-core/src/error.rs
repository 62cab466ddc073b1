use thiserror::Error;

/// Top-level error type for EcoBot.
///
/// Subsystem crates either map their failures into one of these variants or
/// define their own error type for caller-facing validation (see
/// `ecobot_chat::ChatError`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EcobotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid forum entry: {0}")]
    InvalidForumEntry(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Failures surfaced by an identity provider.
///
/// The shell turns these into a short notice for the user; none of them are
/// fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Credenciais inválidas.")]
    InvalidCredentials,

    #[error("E-mail já cadastrado: {0}")]
    EmailTaken(String),

    #[error("E-mail inválido: {0}")]
    InvalidEmail(String),

    #[error("A senha deve ter pelo menos {0} caracteres.")]
    WeakPassword(usize),

    #[error("Nenhuma sessão ativa.")]
    NotSignedIn,
}

impl From<toml::de::Error> for EcobotError {
    fn from(err: toml::de::Error) -> Self {
        EcobotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for EcobotError {
    fn from(err: toml::ser::Error) -> Self {
        EcobotError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for EcobotError {
    fn from(err: serde_json::Error) -> Self {
        EcobotError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for EcoBot operations.
pub type Result<T> = std::result::Result<T, EcobotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EcobotError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = EcobotError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");

        let err = EcobotError::InvalidForumEntry("title cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid forum entry: title cannot be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EcobotError = io_err.into();
        assert!(matches!(err, EcobotError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_auth_error_conversion() {
        let err: EcobotError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, EcobotError::Auth(AuthError::InvalidCredentials)));
        assert!(err.to_string().contains("Credenciais inválidas"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: EcobotError = parse_err.into();
        assert!(matches!(err, EcobotError::Config(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: EcobotError = parse_err.into();
        assert!(matches!(err, EcobotError::Serialization(_)));
    }

    #[test]
    fn test_weak_password_message_carries_minimum() {
        let err = AuthError::WeakPassword(6);
        assert_eq!(err.to_string(), "A senha deve ter pelo menos 6 caracteres.");
    }
}
