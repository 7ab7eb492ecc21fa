//! Reading text attributes out of a data set.
//!
//! Attribute values are reached through [`AttributeSource`], which only
//! promises an optional byte view of a value. Requests for a list of tags
//! are expressed as [`TagRequest`]s, written `gggg|eeee`, with a leading `@`
//! when the value should be decoded through the Specific Character Set of
//! the data set.

use crate::charset::CharsetList;

use dicom::core::Tag;
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;
use std::{borrow::Cow, collections::BTreeMap, str::FromStr};
use thiserror::Error;

/// Prefix of a tag request asking for character set decoding.
const DECODE_PREFIX: char = '@';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagRequestError {
    #[error("Tag request `{0}` is not of the form gggg|eeee")]
    Malformed(String),

    #[error("Tag request `{0}` has a non hexadecimal group or element")]
    NotHex(String),
}

/// Typed access to the attribute values of one data set.
pub trait AttributeSource {
    /// The value of `tag` viewed as text bytes, if present and representable.
    fn text_bytes(&self, tag: Tag) -> Option<Cow<'_, [u8]>>;

    /// Raw value of Specific Character Set (0008,0005).
    fn specific_character_set(&self) -> Option<String> {
        self.text_bytes(tags::SPECIFIC_CHARACTER_SET)
            .map(|value| String::from_utf8_lossy(&value).into_owned())
    }

    /// Character sets declared by the data set.
    fn charsets(&self) -> CharsetList {
        CharsetList::configure(&self.specific_character_set().unwrap_or_default())
    }
}

/// Attribute values held as raw bytes, exactly as stored in the file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttributeMap {
    values: BTreeMap<Tag, Vec<u8>>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: Tag, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.values.insert(tag, value.into())
    }

    pub fn with(mut self, tag: Tag, value: impl Into<Vec<u8>>) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Tag, Vec<u8>)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (Tag, Vec<u8>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl AttributeSource for AttributeMap {
    fn text_bytes(&self, tag: Tag) -> Option<Cow<'_, [u8]>> {
        self.values.get(&tag).map(|v| Cow::Borrowed(v.as_slice()))
    }
}

/// The parser of an in-memory object has already decoded its text values
/// into Unicode, so they are handed out as UTF-8.
impl AttributeSource for InMemDicomObject {
    fn text_bytes(&self, tag: Tag) -> Option<Cow<'_, [u8]>> {
        let text = self.element(tag).ok()?.to_str().ok()?;
        Some(Cow::Owned(text.into_owned().into_bytes()))
    }

    fn specific_character_set(&self) -> Option<String> {
        Some("ISO_IR 192".to_string())
    }
}

/// One attribute to read, and whether to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    key: String,
    tag: Tag,
    decode: bool,
}

impl TagRequest {
    /// The request as written, without the decode prefix.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn decode(&self) -> bool {
        self.decode
    }
}

impl FromStr for TagRequest {
    type Err = TagRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, decode) = match s.strip_prefix(DECODE_PREFIX) {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let (group, element) = key
            .split_once('|')
            .filter(|(g, e)| g.len() == 4 && e.len() == 4)
            .ok_or_else(|| TagRequestError::Malformed(s.to_string()))?;
        let group =
            u16::from_str_radix(group, 16).map_err(|_| TagRequestError::NotHex(s.to_string()))?;
        let element =
            u16::from_str_radix(element, 16).map_err(|_| TagRequestError::NotHex(s.to_string()))?;

        Ok(Self {
            key: key.to_string(),
            tag: Tag(group, element),
            decode,
        })
    }
}

/// Read the requested attributes of one data set.
///
/// The result is keyed by each request's `gggg|eeee` text. Absent values
/// read as empty strings, and trailing NUL or space padding is removed.
pub fn read_tags<S>(source: &S, requests: &[TagRequest]) -> BTreeMap<String, String>
where
    S: AttributeSource + ?Sized,
{
    let mut charsets = None;

    requests
        .iter()
        .map(|request| {
            let value = match source.text_bytes(request.tag) {
                None => String::new(),
                Some(bytes) if request.decode => charsets
                    .get_or_insert_with(|| source.charsets())
                    .decode(&bytes),
                Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            };
            let value = value.trim_end_matches(['\0', ' ']).to_string();
            (request.key.clone(), value)
        })
        .collect()
}
