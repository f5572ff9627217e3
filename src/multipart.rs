//! Ordered form fields for `multipart/form-data` POST bodies.

use std::fmt;

use reqwest::multipart::{Form, Part};

/// Name of the field that carries a binary document upload.
pub const DOCUMENT_FIELD: &str = "document";

/// Filename sent along with the [`DOCUMENT_FIELD`] part.
pub const DOCUMENT_FILENAME: &str = "document.pdf";

/// A value for one form field before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Unsigned(n) => write!(f, "{n}"),
            // PHP-style truthiness, which is what the API expects
            FieldValue::Bool(true) => f.write_str("1"),
            FieldValue::Bool(false) => f.write_str("0"),
            FieldValue::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

impl FieldValue {
    fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Bytes(bytes) => bytes.is_empty(),
            FieldValue::Integer(_) | FieldValue::Unsigned(_) | FieldValue::Bool(_) => false,
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            FieldValue::Bytes(bytes) => bytes,
            FieldValue::Text(text) => text.into_bytes(),
            other => other.to_string().into_bytes(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Bytes(value.to_vec())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

/// Contents of an encoded part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldContents {
    Text(String),
    Binary(Vec<u8>),
}

/// One encoded part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartField {
    pub name: String,
    pub contents: FieldContents,
    pub filename: Option<String>,
}

impl MultipartField {
    fn encode(name: String, value: FieldValue) -> Self {
        if name == DOCUMENT_FIELD {
            MultipartField {
                name,
                contents: FieldContents::Binary(value.into_bytes()),
                filename: Some(DOCUMENT_FILENAME.to_owned()),
            }
        } else {
            MultipartField {
                name,
                contents: FieldContents::Text(value.to_string()),
                filename: None,
            }
        }
    }

    fn into_part(self) -> (String, Part) {
        let part = match self.contents {
            FieldContents::Text(text) => Part::text(text),
            FieldContents::Binary(bytes) => Part::bytes(bytes),
        };

        let part = match self.filename {
            Some(filename) => part.file_name(filename),
            None => part,
        };

        (self.name, part)
    }
}

/// Flat, ordered map of fields for a POST call.
///
/// Fields are sent in insertion order. Callers only push fields they consider set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    fields: Vec<(String, FieldValue)>,
}

impl PostFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Appends a field only if it is present and not an empty string.
    pub fn push_opt<V: Into<FieldValue>>(
        &mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(value) = value.map(Into::into) {
            if !value.is_empty() {
                self.fields.push((name.into(), value));
            }
        }
        self
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Field names in send order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encodes the fields into parts, keeping their order.
    pub fn encode(self) -> Vec<MultipartField> {
        self.fields
            .into_iter()
            .map(|(name, value)| MultipartField::encode(name, value))
            .collect()
    }

    pub(crate) fn into_form(self) -> Form {
        self.encode()
            .into_iter()
            .map(MultipartField::into_part)
            .fold(Form::new(), |form, (name, part)| form.part(name, part))
    }
}

impl<K, V> FromIterator<(K, V)> for PostFields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PostFields {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
