//! Error types for sandboxed file access and keyed lookups.

use std::path::PathBuf;

/// Result type for sandboxed file operations.
pub type FsResult<T> = Result<T, FsError>;

/// Errors raised while validating a candidate name or touching the file it names.
///
/// Every variant carries the caller-supplied candidate so the registration
/// layer can build its own message.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Candidate was empty or only whitespace.
    #[error("file name must not be empty")]
    EmptyName { candidate: String },

    /// Candidate contains a separator or starts with a dot (flat policy).
    #[error("invalid file name: {candidate}")]
    InvalidName { candidate: String },

    /// Candidate is an absolute path.
    #[error("absolute paths are not allowed: {candidate}")]
    AbsolutePathRejected { candidate: String },

    /// Candidate contains `..`.
    #[error("parent directory access (..) is not allowed: {candidate}")]
    TraversalRejected { candidate: String },

    /// Canonical form of the candidate escapes the allowed root.
    #[error("path resolves outside the allowed root: {candidate}")]
    OutsideRoot { candidate: String },

    /// Nothing exists at the resolved path.
    #[error("file not found: {candidate}")]
    NotFound { candidate: String },

    /// The resolved path exists but is not a regular file.
    #[error("not a file: {candidate}")]
    NotAFile { candidate: String },

    /// Underlying filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        candidate: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyName { .. } => "empty_name",
            Self::InvalidName { .. } => "invalid_name",
            Self::AbsolutePathRejected { .. } => "absolute_path_rejected",
            Self::TraversalRejected { .. } => "traversal_rejected",
            Self::OutsideRoot { .. } => "outside_root",
            Self::NotFound { .. } => "not_found",
            Self::NotAFile { .. } => "not_a_file",
            Self::Io { .. } => "io",
        }
    }

    /// The candidate string the caller supplied.
    pub fn candidate(&self) -> &str {
        match self {
            Self::EmptyName { candidate }
            | Self::InvalidName { candidate }
            | Self::AbsolutePathRejected { candidate }
            | Self::TraversalRejected { candidate }
            | Self::OutsideRoot { candidate }
            | Self::NotFound { candidate }
            | Self::NotAFile { candidate }
            | Self::Io { candidate, .. } => candidate,
        }
    }

    /// Rejections that may indicate a deliberate escape attempt.
    pub fn is_suspicious(&self) -> bool {
        matches!(
            self,
            Self::TraversalRejected { .. } | Self::OutsideRoot { .. }
        )
    }

    /// Whether the candidate was refused before any file was touched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyName { .. }
                | Self::InvalidName { .. }
                | Self::AbsolutePathRejected { .. }
                | Self::TraversalRejected { .. }
                | Self::OutsideRoot { .. }
        )
    }

    pub(crate) fn io(candidate: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            candidate: candidate.to_string(),
            path: path.into(),
            source,
        }
    }
}

/// Failed lookup in a [`ResourceTable`](crate::lookup::ResourceTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No record under `key`; `available` lists every valid key in table order.
    #[error("'{key}' not found; available: {}", available.join(", "))]
    NotFound { key: String, available: Vec<String> },
}

impl LookupError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key, .. } => key,
        }
    }

    pub fn available(&self) -> &[String] {
        match self {
            Self::NotFound { available, .. } => available,
        }
    }
}

/// Errors raised while populating a table at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record stored under one key names itself differently.
    #[error("record keyed '{key}' is named '{name}'")]
    KeyMismatch { key: String, name: String },

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
}
