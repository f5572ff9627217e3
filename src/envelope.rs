//! Turning decoded response bodies into typed records.
//!
//! Every body first goes through [`check()`], which turns an embedded `errorCode` into
//! [`Error::Api`] before anything else in the body is looked at. Records then take only the fields
//! they know about; anything else the server adds is ignored.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ErrorEnvelope, Result};

/// A decoded JSON response body with no fixed shape.
pub type RawPayload = Value;

/// Fails with [`Error::Api`] if the body carries an error code, otherwise hands it back.
pub fn check(raw: RawPayload) -> Result<RawPayload> {
    let envelope = ErrorEnvelope::of(&raw);

    if envelope.error_code.is_none() {
        return Ok(raw);
    }

    let err = envelope.into_api_error(None, || "unknown API error".to_owned());
    log::debug!("API returned error: {err}");
    Err(Error::Api(err))
}

/// Decodes a body holding a single record.
pub fn decode_record<T: DeserializeOwned>(raw: RawPayload) -> Result<T> {
    let raw = check(raw)?;
    Ok(serde_json::from_value(raw)?)
}

/// A page of records, as returned by list resources.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope<T> {
    /// Records in the order the server sent them.
    pub items: Vec<T>,

    /// Total number of records across all pages.
    ///
    /// Falls back to the number of items when the server does not say.
    pub total: u64,

    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub pages: Option<u64>,
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        ListEnvelope {
            items: Vec::new(),
            total: 0,
            page: None,
            limit: None,
            pages: None,
        }
    }
}

impl<T: DeserializeOwned> ListEnvelope<T> {
    /// Decodes a list body whose records sit in the array at JSON `pointer`
    /// (e.g. `/_embedded/products`).
    ///
    /// A missing or `null` array gives an empty list. Anything other than an array is an error.
    pub fn decode(raw: RawPayload, pointer: &str) -> Result<Self> {
        let mut raw = check(raw)?;

        if !raw.is_object() {
            return Err(Error::decode(format!(
                "expected a JSON object holding {pointer}, found {}",
                kind(&raw)
            )));
        }

        let counter = |name: &str| raw.get(name).and_then(Value::as_u64);
        let (total, page, limit, pages) = (
            counter("total"),
            counter("page"),
            counter("limit"),
            counter("pages"),
        );

        let items = match raw.pointer_mut(pointer).map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()?,
            Some(other) => {
                return Err(Error::decode(format!(
                    "expected an array at {pointer}, found {}",
                    kind(&other)
                )))
            }
        };

        Ok(ListEnvelope {
            total: total.unwrap_or(items.len() as u64),
            items,
            page,
            limit,
            pages,
        })
    }
}

impl<T> ListEnvelope<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for ListEnvelope<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ListEnvelope<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
