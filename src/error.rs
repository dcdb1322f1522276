use wasm_bindgen::JsValue;

/// Result alias carrying [`EffectsError`].
pub type Result<T> = std::result::Result<T, EffectsError>;

/// Everything that can go wrong around the effects. The simulations
/// themselves never fail; errors come from configuration and from the host page.
#[derive(Debug, thiserror::Error)]
pub enum EffectsError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// No element with the requested id, or it is not the expected type.
    #[error("missing element `{0}`")]
    MissingElement(String),
    /// The host lacks a 2D rendering context for the canvas.
    #[error("2d rendering context unavailable")]
    ContextUnavailable,
    #[error("javascript error: {0}")]
    Js(String),
}

impl EffectsError {
    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<JsValue> for EffectsError {
    fn from(value: JsValue) -> Self {
        Self::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<EffectsError> for JsValue {
    fn from(err: EffectsError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
