use super::{CodecError, Map, Value};

/// Conversion out of the dynamic [Value] shape.
pub trait Decode: Sized {
    fn decode_value(value: &Value) -> Result<Self, CodecError>;
}

/// Conversion into the dynamic [Value] shape.
pub trait Encode {
    fn encode_value(&self) -> Result<Value, CodecError>;
}

/// One field of a record: its declared name and the optional JSON key (tag)
/// that replaces it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub tag: Option<&'static str>,
}

impl Field {
    pub const fn new(name: &'static str, tag: Option<&'static str>) -> Field {
        Field { name, tag }
    }

    /// The JSON key this field reads from and writes to.
    pub const fn key(&self) -> &'static str {
        match self.tag {
            Some(tag) => tag,
            None => self.name,
        }
    }
}

/// The fixed field table of a record type, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Schema {
        Schema { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn key_of<'a>(&self, name: &'a str) -> &'a str {
        match self.field(name) {
            Some(field) => field.key(),
            None => name,
        }
    }
}

/// Reads the fields of one record out of an object value.
pub struct FieldReader<'a> {
    schema: &'a Schema,
    map: &'a Map,
}

impl<'a> FieldReader<'a> {
    pub fn new(schema: &'a Schema, value: &'a Value) -> Result<FieldReader<'a>, CodecError> {
        match value {
            Value::Object(map) => Ok(FieldReader { schema, map }),
            other => Err(CodecError::mismatch("object", other)),
        }
    }

    /// Decode the field declared as `name`. A missing key, or an explicit
    /// `null`, yields the type's default.
    pub fn read<T: Decode + Default>(&self, name: &str) -> Result<T, CodecError> {
        let key = self.schema.key_of(name);
        match self.map.get_ignore_case(key) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::decode_value(value).map_err(|e| e.within(key)),
        }
    }
}

/// Builds the object for one record, keys in field declaration order.
pub struct FieldWriter<'a> {
    schema: &'a Schema,
    map: Map,
}

impl<'a> FieldWriter<'a> {
    pub fn new(schema: &'a Schema) -> FieldWriter<'a> {
        FieldWriter {
            schema,
            map: Map::with_capacity(schema.fields.len()),
        }
    }

    pub fn write<T: Encode + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), CodecError> {
        let key = self.schema.key_of(name);
        let value = value.encode_value().map_err(|e| e.within(key))?;
        self.map.insert(key, value);
        Ok(())
    }

    pub fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

impl Decode for Value {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        Ok(value.clone())
    }
}

impl Decode for Map {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| CodecError::mismatch("object", value))
    }
}

impl Decode for bool {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        value
            .as_bool()
            .ok_or_else(|| CodecError::mismatch("boolean", value))
    }
}

impl Decode for String {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CodecError::mismatch("string", value))
    }
}

impl Decode for f64 {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        value
            .as_f64()
            .ok_or_else(|| CodecError::mismatch("number", value))
    }
}

macro_rules! decode_int {
    ($expected:literal, $as:ident => $($ty:ty),*) => {
        $(
            impl Decode for $ty {
                fn decode_value(value: &Value) -> Result<Self, CodecError> {
                    value
                        .$as()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or_else(|| CodecError::mismatch($expected, value))
                }
            }
        )*
    };
}

decode_int!("unsigned integer", as_u64 => u64, u32);
decode_int!("integer", as_i64 => i64, i32);

impl<T: Decode> Decode for Option<T> {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Null => Ok(None),
            value => T::decode_value(value).map(Some),
        }
    }
}

/// Element-wise; the first failing element fails the whole sequence.
impl<T: Decode> Decode for Vec<T> {
    fn decode_value(value: &Value) -> Result<Self, CodecError> {
        let items = value
            .as_array()
            .ok_or_else(|| CodecError::mismatch("array", value))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode_value(item).map_err(|e| e.within(&format!("[{}]", i))))
            .collect()
    }
}

impl Encode for Value {
    fn encode_value(&self) -> Result<Value, CodecError> {
        Ok(self.clone())
    }
}

impl Encode for Map {
    fn encode_value(&self) -> Result<Value, CodecError> {
        Ok(Value::Object(self.clone()))
    }
}

impl Encode for str {
    fn encode_value(&self) -> Result<Value, CodecError> {
        Ok(Value::from(self))
    }
}

impl Encode for String {
    fn encode_value(&self) -> Result<Value, CodecError> {
        Ok(Value::from(self.as_str()))
    }
}

macro_rules! encode_scalar {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode_value(&self) -> Result<Value, CodecError> {
                    Ok(Value::from(*self))
                }
            }
        )*
    };
}

encode_scalar!(bool, u64, u32, i64, i32, f64);

impl<T: Encode> Encode for Option<T> {
    fn encode_value(&self) -> Result<Value, CodecError> {
        match self {
            Some(value) => value.encode_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode_value(&self) -> Result<Value, CodecError> {
        self.iter()
            .enumerate()
            .map(|(i, item)| item.encode_value().map_err(|e| e.within(&format!("[{}]", i))))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_value(&self) -> Result<Value, CodecError> {
        self.as_slice().encode_value()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode_value(&self) -> Result<Value, CodecError> {
        (**self).encode_value()
    }
}

/// Declare a struct together with its [Schema] and [Decode]/[Encode] impls.
///
/// Each field names the JSON key it is declared as, and optionally a tag that
/// replaces that key on the wire:
///
/// ```
/// spool_format::json_record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Author {
///         pub name: String => "Name" as "name",
///         pub email: String => "Email",
///     }
/// }
///
/// let author: Author = spool_format::json::decode_into(br#"{"name":"Maria","EMAIL":"m@x"}"#).unwrap();
/// assert_eq!(author.email, "m@x");
/// ```
///
/// Every field type must implement [Decode], [Encode] and [Default].
#[macro_export]
macro_rules! json_record {
    (@field $name:literal) => {
        $crate::json::Field::new($name, ::core::option::Option::None)
    };
    (@field $name:literal $tag:literal) => {
        $crate::json::Field::new($name, ::core::option::Option::Some($tag))
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $record:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $name:literal $(as $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $record {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $record {
            pub const SCHEMA: $crate::json::Schema = $crate::json::Schema::new(
                ::core::stringify!($record),
                &[$($crate::json_record!(@field $name $($tag)?)),*],
            );
        }

        impl $crate::json::Decode for $record {
            fn decode_value(
                value: &$crate::json::Value,
            ) -> ::core::result::Result<Self, $crate::json::CodecError> {
                let reader = $crate::json::FieldReader::new(&Self::SCHEMA, value)?;
                ::core::result::Result::Ok($record {
                    $($field: reader.read($name)?,)*
                })
            }
        }

        impl $crate::json::Encode for $record {
            fn encode_value(
                &self,
            ) -> ::core::result::Result<$crate::json::Value, $crate::json::CodecError> {
                let mut writer = $crate::json::FieldWriter::new(&Self::SCHEMA);
                $(writer.write($name, &self.$field)?;)*
                ::core::result::Result::Ok(writer.finish())
            }
        }
    };
}
