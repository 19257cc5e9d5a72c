/// Result alias carrying [`DeckError`].
pub type Result<T> = std::result::Result<T, DeckError>;

/// Everything that can go wrong inside the deck.
///
/// None of these ever reach navigation: effect failures are absorbed by the
/// registry and dispatcher, and DOM failures at start-up are surfaced once at
/// the wasm entry point.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeckError {
    /// The rendering capability an effect needs is missing (no WebGL2,
    /// no 2D context, ...).
    #[error("effect unavailable: {0}")]
    EffectUnavailable(String),
    /// A required element could not be found in the document.
    #[error("element not found: {0}")]
    MissingElement(String),
    /// An exception thrown by a browser API, rendered as text.
    #[error("javascript error: {0}")]
    Js(String),
    /// The deck configuration document could not be parsed.
    #[error("invalid deck config: {0}")]
    Config(String),
}

impl DeckError {
    pub fn unavailable<T: Into<String>>(what: T) -> Self {
        Self::EffectUnavailable(what.into())
    }

    pub fn missing<T: Into<String>>(what: T) -> Self {
        Self::MissingElement(what.into())
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DeckError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DeckError> for wasm_bindgen::JsValue {
    fn from(value: DeckError) -> Self {
        wasm_bindgen::JsValue::from_str(&value.to_string())
    }
}
