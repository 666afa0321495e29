use thiserror::Error;

/// Errors raised while reading JSON text into the value model.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid JSON text: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("JSON nesting deeper than {limit} levels at line {line} column {column}")]
    DepthLimitExceeded {
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl JsonError {
    /// 1-based line and column of the failure.
    pub fn location(&self) -> (usize, usize) {
        match self {
            JsonError::Syntax(e) => (e.line(), e.column()),
            JsonError::DepthLimitExceeded { line, column, .. } => (*line, *column),
        }
    }
}
