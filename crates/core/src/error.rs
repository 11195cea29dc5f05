use thiserror::Error;

#[derive(Debug, Error)]
pub enum TracefallError {
    #[error(
        "unclassifiable trace: {roots} roots, {orphans} orphans, {orphan_errors} orphan errors"
    )]
    UnclassifiableTrace {
        roots: usize,
        orphans: usize,
        orphan_errors: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("api error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TracefallError>;
