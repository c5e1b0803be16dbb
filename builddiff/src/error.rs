/// Problems with operator input that are detected before any request is made.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    /// The pattern's named groups are not exactly the key and value groups.
    #[error("regex should have exactly the named groups {expected}, but has {found}")]
    GroupMismatch { expected: String, found: String },

    #[error("invalid regex: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("unknown regex flag '{0}', expected some of: i, m, s, x, U")]
    UnknownFlag(char),

    #[error("unknown build field '{0}'")]
    UnknownField(String),

    #[error("invalid filter '{0}', expected FIELD=REGEX")]
    InvalidFilter(String),

    #[error("no job given; pass --job or set job.name in .bdiff.toml")]
    MissingJob,
}
