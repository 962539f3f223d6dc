use {miette::ErrReport, thiserror::Error};

/// Exit statuses the reference scanner used for its two fatal lexical
/// conditions. Documented behavior, not load-bearing values.
pub const EXIT_UNTERMINATED_STRING: i32 = 21;
pub const EXIT_UNCLOSED_COMMENT: i32 = 69;

/// Fatal lexical conditions. The scanner cannot establish where the lexeme
/// ends, so no token is produced and the scan stops at the detection point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unterminated string, line {line}")]
    UnterminatedString {
        line: usize,
        span: std::ops::Range<usize>,
    },
    #[error("Unclosed comment (* *) block, line {line}")]
    UnclosedComment {
        line: usize,
        span: std::ops::Range<usize>,
    },
}

impl ScanError {
    /// Byte span of the lexeme left open when input ran out.
    pub fn span(&self) -> std::ops::Range<usize> {
        match self {
            ScanError::UnterminatedString { span, .. } => span.clone(),
            ScanError::UnclosedComment { span, .. } => span.clone(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::UnterminatedString { .. } => EXIT_UNTERMINATED_STRING,
            ScanError::UnclosedComment { .. } => EXIT_UNCLOSED_COMMENT,
        }
    }
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Usage: {0}")]
    Usage(ErrReport),
    #[error("Could not read source input")]
    IoError(#[from] std::io::Error),
}
