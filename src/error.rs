/// Coarse failure categories. Each maps to its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid arguments or client configuration.
    Config,
    /// Transport-level failure (connect, timeout).
    Connection,
    /// Non-2xx status or a payload that doesn't match the expected shape.
    Response,
    /// Inputs that can't be turned into a report (empty series, empty join, ...).
    Data,
    /// Chart rendering or file writing.
    Output,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Connection => 3,
            ErrorKind::Response => 4,
            ErrorKind::Data => 5,
            ErrorKind::Output => 6,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ErrorKind::Config => "Configuration error",
            ErrorKind::Connection => "Connection error",
            ErrorKind::Response => "Request error",
            ErrorKind::Data => "Data processing error",
            ErrorKind::Output => "Output error",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Response, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Output, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let kinds = [
            ErrorKind::Config,
            ErrorKind::Connection,
            ErrorKind::Response,
            ErrorKind::Data,
            ErrorKind::Output,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|&c| c != 0));
    }

    #[test]
    fn display_prefixes_category() {
        let err = AppError::data("No overlapping dates.");
        assert_eq!(err.to_string(), "Data processing error: No overlapping dates.");
        assert_eq!(err.exit_code(), 5);
    }
}
