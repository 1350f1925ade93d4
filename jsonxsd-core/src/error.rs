//! Error taxonomy: one `thiserror` enum, fatal at the call site, carrying
//! enough detail to name either the offending path (`malformed-input`) or
//! the offending type kind (`not-implemented` / `unsupported-union`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonXsdError {
    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("unsupported union at {path}: member kind {kind} is not a primitive")]
    UnsupportedUnion { path: String, kind: &'static str },

    #[error("malformed input at {path}: {msg}")]
    MalformedInput { path: String, msg: String },

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("xml parse error: {0}")]
    XmlParse(#[from] xmltree::ParseError),

    #[error("xml write error: {0}")]
    XmlWrite(#[from] xmltree::Error),
}

pub type Result<T> = std::result::Result<T, JsonXsdError>;
