//! Tagged value codec.
//!
//! Sequences and maps are stored in plain text columns wrapped in a one-key JSON object
//! that names their shape: `{"list": [...]}` or `{"dict": {...}}`. The text uses `": "`
//! and `", "` separators so payloads written by other clients of the same schema decode
//! unchanged.
//!
//! A text value that merely *looks* like an envelope (for instance the literal string
//! `{"list": [1]}`) decodes as a container. There is no escape mechanism; callers storing
//! free-form text that may start with a tag prefix get the container back.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::SimpleSqlError;
use crate::types::RowValues;

/// Discriminator key for ordered sequences.
pub const LIST_TAG: &str = "list";
/// Discriminator key for key/value maps.
pub const MAP_TAG: &str = "dict";

#[derive(Debug, Serialize, Deserialize)]
enum Envelope<'a> {
    #[serde(rename = "list")]
    List(std::borrow::Cow<'a, [JsonValue]>),
    #[serde(rename = "dict")]
    Dict(std::borrow::Cow<'a, Map<String, JsonValue>>),
}

/// Writes `", "` between elements and `": "` after keys.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_envelope_text(envelope: &Envelope<'_>) -> Result<String, SimpleSqlError> {
    let mut buf = Vec::with_capacity(64);
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    envelope.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| {
        SimpleSqlError::CodecError(<serde_json::Error as serde::ser::Error>::custom(e))
    })
}

/// Encode a sequence as `{"list": [...]}`.
///
/// # Errors
/// Returns `SimpleSqlError::CodecError` if serialization fails.
pub fn encode_list(items: &[JsonValue]) -> Result<String, SimpleSqlError> {
    to_envelope_text(&Envelope::List(std::borrow::Cow::Borrowed(items)))
}

/// Encode a map as `{"dict": {...}}`.
///
/// # Errors
/// Returns `SimpleSqlError::CodecError` if serialization fails.
pub fn encode_map(map: &Map<String, JsonValue>) -> Result<String, SimpleSqlError> {
    to_envelope_text(&Envelope::Dict(std::borrow::Cow::Borrowed(map)))
}

/// Wrap compound values into their textual envelope; scalars pass through untouched.
///
/// # Errors
/// Returns `SimpleSqlError::CodecError` if serialization fails.
pub fn encode(value: &RowValues) -> Result<RowValues, SimpleSqlError> {
    match value {
        RowValues::List(items) => Ok(RowValues::Text(encode_list(items)?)),
        RowValues::Map(map) => Ok(RowValues::Text(encode_map(map)?)),
        other => Ok(other.clone()),
    }
}

/// True when `text` starts with a tag prefix, with or without the space after the colon.
#[must_use]
pub fn is_tagged(text: &str) -> bool {
    tag_of(text).is_some()
}

fn tag_of(text: &str) -> Option<&'static str> {
    let rest = text.strip_prefix("{\"")?;
    [LIST_TAG, MAP_TAG].into_iter().find(|tag| {
        rest.strip_prefix(tag)
            .and_then(|r| r.strip_prefix("\":"))
            .is_some()
    })
}

/// Unwrap an envelope back into `List`/`Map`.
///
/// Text that is not an envelope comes back as `Text`. So does text that starts with a
/// tag prefix but is not valid JSON or carries the wrong payload shape.
#[must_use]
pub fn decode_text(text: String) -> RowValues {
    if tag_of(&text).is_none() {
        return RowValues::Text(text);
    }
    match serde_json::from_str::<Envelope<'static>>(&text) {
        Ok(Envelope::List(items)) => RowValues::List(items.into_owned()),
        Ok(Envelope::Dict(map)) => RowValues::Map(map.into_owned()),
        Err(_) => RowValues::Text(text),
    }
}

/// Decode a value read from the database; only `Text` is inspected.
#[must_use]
pub fn decode(value: RowValues) -> RowValues {
    match value {
        RowValues::Text(text) => decode_text(text),
        other => other,
    }
}
