// Failures from the host page while setting up or drawing the overlay, plus
// rejected field settings.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    #[error("canvas has no 2d context")]
    NoContext,

    // A web API call threw
    #[error("DOM call failed: {0}")]
    Dom(String),

    #[error("invalid field config: {0}")]
    Config(&'static str),
}

impl OverlayError {
    pub fn dom(err: JsValue) -> Self {
        OverlayError::Dom(format!("{:?}", err))
    }
}

impl From<OverlayError> for JsValue {
    fn from(err: OverlayError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OverlayError>;
