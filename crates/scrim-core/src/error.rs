use thiserror::Error;

/// Problems found while loading or validating an overlay configuration.
///
/// Runtime evaluation never produces these; anything that slips past
/// validation is treated fail-closed (hidden, unadjusted) instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid overlay config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid length `{0}` (expected px, % or calc(% ± px))")]
    InvalidLength(String),

    #[error("duplicate widget id `{0}`")]
    DuplicateWidgetId(String),

    #[error("widget `{widget}` uses a custom trigger with an empty condition name")]
    EmptyCondition { widget: String },

    #[error("offset ladder step {0} must be finite and positive")]
    InvalidOffsetStep(f32),

    #[error("widget `{widget}` has an invalid size {width}x{height}")]
    InvalidWidgetSize {
        widget: String,
        width: f32,
        height: f32,
    },
}
