use std::fmt;

/// Model invocation failure with the raw output attached, so a 500 detail
/// string can say what the upstream actually returned.
#[derive(Debug, Clone)]
pub struct ModelDiagnosticsError {
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
}

impl fmt::Display for ModelDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model analysis failed (stage={}): {}", self.stage, self.detail)
    }
}

impl std::error::Error for ModelDiagnosticsError {}
