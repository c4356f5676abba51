use chrono::NaiveDate;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised by the browser-facing parts of the widget
#[derive(Debug, Error)]
pub enum FlowerError {
    #[error("WebGL2 is not available: {0}")]
    ContextUnavailable(String),

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("program linking failed: {0}")]
    ProgramLink(String),

    #[error("failed to create {0}")]
    Allocation(&'static str),

    #[error("framebuffer incomplete (status {0:#x})")]
    FramebufferIncomplete(u32),

    #[error("texture upload failed: {0}")]
    TextureUpload(String),

    #[error("local storage is unavailable")]
    StorageUnavailable,

    #[error("storage access failed: {0}")]
    Storage(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("start date {0} lies in the future")]
    FutureDate(NaiveDate),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("animation loop is already running")]
    AlreadyRunning,

    #[error("browser call failed: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, FlowerError>;

impl From<JsValue> for FlowerError {
    fn from(value: JsValue) -> Self {
        FlowerError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<FlowerError> for JsValue {
    fn from(err: FlowerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FlowerError::InvalidDate("2024-13-01".into()).to_string(),
            "invalid date \"2024-13-01\", expected YYYY-MM-DD"
        );
        assert_eq!(
            FlowerError::FramebufferIncomplete(0x8cd6).to_string(),
            "framebuffer incomplete (status 0x8cd6)"
        );
    }

    #[test]
    fn test_yaml_errors_convert() {
        let err: FlowerError = serde_yaml::from_str::<u32>("[not, a, number]").unwrap_err().into();
        assert!(matches!(err, FlowerError::ConfigParse(_)));
    }
}
