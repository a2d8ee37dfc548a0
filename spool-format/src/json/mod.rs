//! JSON text to and from the dynamic [Value] shape, and typed records on top of it.

mod de;
mod error;
mod number;
mod record;
mod ser;
mod value;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

pub use self::error::CodecError;
pub use self::number::Number;
pub use self::record::{Decode, Encode, Field, FieldReader, FieldWriter, Schema};
pub use self::value::{Kind, Map, Value};

/// Parse a complete JSON document.
pub fn decode(bytes: &[u8]) -> Result<Value, CodecError> {
    let text = std::str::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    serde_json::from_str(text).map_err(|e| CodecError::from_json(e, bytes))
}

pub fn decode_str(text: &str) -> Result<Value, CodecError> {
    decode(text.as_bytes())
}

/// Parse a document and project it onto `T`.
pub fn decode_into<T: Decode>(bytes: &[u8]) -> Result<T, CodecError> {
    let value = decode(bytes)?;
    T::decode_value(&value)
}

/// Output layout for [encode_with].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// `None` for compact output; otherwise one nesting level is indented by this unit.
    pub indent: Option<String>,
}

impl EncodeOptions {
    pub fn compact() -> EncodeOptions {
        EncodeOptions { indent: None }
    }

    pub fn pretty(unit: impl Into<String>) -> EncodeOptions {
        EncodeOptions {
            indent: Some(unit.into()),
        }
    }
}

/// Compact JSON.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    encode_with(value, &EncodeOptions::compact())
}

/// Multi-line JSON, each level indented by `indent`.
pub fn encode_pretty<T: Encode + ?Sized>(value: &T, indent: &str) -> Result<Vec<u8>, CodecError> {
    encode_with(value, &EncodeOptions::pretty(indent))
}

pub fn encode_with<T: Encode + ?Sized>(
    value: &T,
    options: &EncodeOptions,
) -> Result<Vec<u8>, CodecError> {
    let value = value.encode_value()?;
    let mut out = Vec::new();

    let result = match &options.indent {
        None => value.serialize(&mut Serializer::new(&mut out)),
        Some(unit) => {
            let formatter = PrettyFormatter::with_indent(unit.as_bytes());
            value.serialize(&mut Serializer::with_formatter(&mut out, formatter))
        }
    };
    result.map_err(|e| CodecError::Unencodable(e.to_string()))?;

    tracing::trace!(bytes = out.len(), pretty = options.indent.is_some(), "encoded JSON");
    Ok(out)
}

pub fn encode_to_string<T: Encode + ?Sized>(value: &T) -> Result<String, CodecError> {
    let bytes = encode(value)?;
    // serde_json only ever emits UTF-8.
    String::from_utf8(bytes).map_err(|e| CodecError::Unencodable(e.to_string()))
}
