use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Could not parse resource id: {value}")]
    InvalidResourceId { value: String },

    #[error("{name} was not provided")]
    MissingArgument { name: &'static str },

    #[error("Couldn't retrieve home directory")]
    HomeDirNotFound,

    #[error("You can't use both entry and entry_id or entry_path")]
    ConflictingEntryFlags,

    #[error("Could not find storage folder: {name}")]
    StorageNotFound { name: String },

    #[error("A backup was already created this second")]
    BackupCollision,

    #[error("Index error: {message}")]
    IndexError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ArkError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重試後可能成功的錯誤
            ArkError::IoError(_) | ArkError::HttpError(_) => ErrorSeverity::Medium,

            ArkError::HomeDirNotFound => ErrorSeverity::Critical,

            ArkError::BackupCollision => ErrorSeverity::Low,

            ArkError::SerializationError(_)
            | ArkError::InvalidResourceId { .. }
            | ArkError::MissingArgument { .. }
            | ArkError::ConflictingEntryFlags
            | ArkError::StorageNotFound { .. }
            | ArkError::IndexError { .. }
            | ArkError::StorageError { .. }
            | ArkError::ConfigError { .. }
            | ArkError::InvalidConfigValueError { .. }
            | ArkError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ArkError::IoError(e) => format!("A file operation failed: {}", e),
            ArkError::HttpError(e) => format!("A network request failed: {}", e),
            ArkError::HomeDirNotFound => {
                "Your home directory could not be determined".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ArkError::IoError(_) => {
                "Check that the path exists and you have permission to access it"
            }
            ArkError::HttpError(_) => "Check your network connection and retry",
            ArkError::InvalidResourceId { .. } => {
                "Resource ids look like '1024-3817149052' (size, then content hash)"
            }
            ArkError::MissingArgument { .. } => {
                "Run the command with --help to see the expected arguments"
            }
            ArkError::HomeDirNotFound => {
                "Set the HOME environment variable, or override paths with ARK_HOME"
            }
            ArkError::ConflictingEntryFlags => {
                "Pass either --entry, or one of --entry-id/--entry-path, not both"
            }
            ArkError::StorageNotFound { .. } => {
                "Use a known storage label (tags, scores, properties, previews) or an existing path"
            }
            ArkError::BackupCollision => "Wait at least 1 second, please!",
            _ => "Run with --verbose for more detail",
        }
    }
}

pub type Result<T> = std::result::Result<T, ArkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let io = ArkError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(io.severity(), ErrorSeverity::Medium);
        assert_eq!(
            ArkError::HomeDirNotFound.severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(ArkError::BackupCollision.severity(), ErrorSeverity::Low);
        assert_eq!(
            ArkError::InvalidResourceId {
                value: "bogus".to_string()
            }
            .severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_missing_argument_message_shape() {
        let err = ArkError::MissingArgument { name: "Url" };
        assert_eq!(err.to_string(), "Url was not provided");
    }
}
