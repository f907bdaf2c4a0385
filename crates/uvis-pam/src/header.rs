//! Science header keywords.
//!
//! [`ScienceHeader`] is a plain keyword → value map. It is filled from the
//! cards of a FITS HDU, or built by hand when the pixels come from elsewhere.

use std::collections::BTreeMap;

use fitsio_pure::header::Card;
use fitsio_pure::value::Value;

use crate::error::{Error, Result};

/// Negated column offset of the subarray origin.
pub const LTV1: &str = "LTV1";
/// Negated row offset of the subarray origin.
pub const LTV2: &str = "LTV2";
/// Number of columns.
pub const NAXIS1: &str = "NAXIS1";
/// Number of rows.
pub const NAXIS2: &str = "NAXIS2";
/// Detector chip that produced the image.
pub const CCDCHIP: &str = "CCDCHIP";
/// Extension name, `SCI` for science data.
pub const EXTNAME: &str = "EXTNAME";

/// Space-padded 8-byte keyword field of a header card.
pub fn keyword(name: &str) -> [u8; 8] {
    let mut k = [b' '; 8];
    let bytes = name.as_bytes();
    let len = bytes.len().min(8);
    k[..len].copy_from_slice(&bytes[..len]);
    k
}

/// A header value.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        HeaderValue::Logical(v)
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        HeaderValue::Integer(v)
    }
}

impl From<i32> for HeaderValue {
    fn from(v: i32) -> Self {
        HeaderValue::Integer(v.into())
    }
}

impl From<usize> for HeaderValue {
    fn from(v: usize) -> Self {
        HeaderValue::Integer(v as i64)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        HeaderValue::Real(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Text(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::Text(v)
    }
}

/// Keyword → value mapping for one image.
///
/// Keywords are stored trimmed and upper-cased, so lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScienceHeader {
    values: BTreeMap<String, HeaderValue>,
}

fn normalize(keyword: &str) -> String {
    keyword.trim().to_ascii_uppercase()
}

impl ScienceHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, keyword: &str, value: impl Into<HeaderValue>) -> Self {
        self.insert(keyword, value);
        self
    }

    /// Sets `keyword`, returning the value it replaces.
    pub fn insert(&mut self, keyword: &str, value: impl Into<HeaderValue>) -> Option<HeaderValue> {
        self.values.insert(normalize(keyword), value.into())
    }

    /// Removes `keyword`, returning its value.
    pub fn remove(&mut self, keyword: &str) -> Option<HeaderValue> {
        self.values.remove(&normalize(keyword))
    }

    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.values.get(&normalize(keyword))
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Integer value of `keyword`. Reals with no fractional part are accepted.
    pub fn integer(&self, keyword: &'static str) -> Result<i64> {
        match self.get(keyword) {
            Some(HeaderValue::Integer(n)) => Ok(*n),
            Some(HeaderValue::Real(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(*f as i64)
            }
            Some(_) => Err(Error::InvalidKeyword {
                keyword: keyword.to_string(),
                reason: "expected an integer",
            }),
            None => Err(Error::MissingKeyword(keyword)),
        }
    }

    /// Real value of `keyword`. Integers are promoted.
    pub fn real(&self, keyword: &'static str) -> Result<f64> {
        match self.get(keyword) {
            Some(HeaderValue::Real(f)) => Ok(*f),
            Some(HeaderValue::Integer(n)) => Ok(*n as f64),
            Some(_) => Err(Error::InvalidKeyword {
                keyword: keyword.to_string(),
                reason: "expected a number",
            }),
            None => Err(Error::MissingKeyword(keyword)),
        }
    }

    /// Trimmed string value of `keyword`, if it is a string.
    pub fn text(&self, keyword: &str) -> Option<&str> {
        match self.get(keyword) {
            Some(HeaderValue::Text(s)) => Some(s.trim()),
            _ => None,
        }
    }

    /// Non-negative axis length stored under `keyword`.
    pub fn axis_len(&self, keyword: &'static str) -> Result<usize> {
        let n = self.integer(keyword)?;
        usize::try_from(n).map_err(|_| Error::InvalidKeyword {
            keyword: keyword.to_string(),
            reason: "negative axis length",
        })
    }

    /// The CCDCHIP identifier. A missing keyword means no map can be chosen.
    pub fn ccdchip(&self) -> Result<i64> {
        match self.integer(CCDCHIP) {
            Err(Error::MissingKeyword(_)) => Err(Error::UnsupportedChip(None)),
            other => other,
        }
    }

    /// Collects every valued card. Commentary cards and END carry no value
    /// and are skipped; the first occurrence of a repeated keyword wins.
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut header = Self::new();
        for card in cards {
            if card.is_end() || card.is_commentary() {
                continue;
            }
            let value = match &card.value {
                Some(Value::Logical(b)) => HeaderValue::Logical(*b),
                Some(Value::Integer(n)) => HeaderValue::Integer(*n),
                Some(Value::Float(f)) => HeaderValue::Real(*f),
                Some(Value::String(s)) => HeaderValue::Text(s.trim_end().to_string()),
                _ => continue,
            };
            let keyword = normalize(card.keyword_str());
            header.values.entry(keyword).or_insert(value);
        }
        header
    }
}
