use thiserror::Error;
use wasm_bindgen::JsValue;

/// Setup failures. Runtime UI misses (unknown anchor, node already gone) are
/// not errors and never reach this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("malformed page config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid page config: {0}")]
    InvalidConfig(String),

    #[error("dom call failed: {0}")]
    Js(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
