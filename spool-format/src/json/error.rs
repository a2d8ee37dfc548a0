use super::{Kind, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid JSON at byte {offset} (line {line}, column {column}): {message}.")]
    Syntax {
        offset: usize,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("JSON ended unexpectedly at byte {offset}.")]
    UnexpectedEnd { offset: usize },

    #[error("Invalid UTF-8 at byte {offset}.")]
    InvalidUtf8 { offset: usize },

    #[error("Type mismatch at {}: expected {expected}, found {actual}.", field_label(.field))]
    TypeMismatch {
        /// Path from the decoded root, e.g. `comments[0].author`. Empty for the root itself.
        field: String,
        expected: &'static str,
        actual: Kind,
    },

    #[error("Value cannot be encoded as JSON: {0}.")]
    Unencodable(String),
}

fn field_label(field: &str) -> String {
    if field.is_empty() {
        "document root".into()
    } else {
        format!("`{}`", field)
    }
}

impl CodecError {
    pub(crate) fn mismatch(expected: &'static str, actual: &Value) -> CodecError {
        CodecError::TypeMismatch {
            field: String::new(),
            expected,
            actual: actual.kind(),
        }
    }

    /// Prefix the field path of a type mismatch with `segment`, which is either
    /// a key or an index in the form `[n]`.
    pub fn within(self, segment: &str) -> CodecError {
        match self {
            CodecError::TypeMismatch {
                field,
                expected,
                actual,
            } => {
                let field = if field.is_empty() {
                    segment.to_string()
                } else if field.starts_with('[') {
                    format!("{}{}", segment, field)
                } else {
                    format!("{}.{}", segment, field)
                };
                CodecError::TypeMismatch {
                    field,
                    expected,
                    actual,
                }
            }
            other => other,
        }
    }

    pub(crate) fn from_json(err: serde_json::Error, input: &[u8]) -> CodecError {
        use serde_json::error::Category;

        match err.classify() {
            Category::Eof => CodecError::UnexpectedEnd {
                offset: input.len(),
            },
            Category::Syntax | Category::Data | Category::Io => {
                let message = err.to_string();
                // serde_json appends " at line N column M" to positioned errors.
                let message = match message.rfind(" at line ") {
                    Some(i) => message[..i].to_string(),
                    None => message,
                };
                CodecError::Syntax {
                    offset: byte_offset(input, err.line(), err.column()),
                    line: err.line(),
                    column: err.column(),
                    message,
                }
            }
        }
    }
}

/// Translate serde_json's 1-based line and column into the index of the byte it points at.
fn byte_offset(input: &[u8], line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        input
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)
            .unwrap_or(input.len())
    };
    (line_start + column.saturating_sub(1)).min(input.len())
}
