//! Leaf filters
//!
//! A leaf filter normalizes one scalar to one target type. Every filter shares
//! the same entry discipline: containers, `null` and empty strings are rejected
//! up front, the text is stripped to the filter's character set, validated
//! unless [`Flag::NoValidation`] is set, and finally rejected again if nothing
//! is left.

use super::charset;
use super::validators;
use crate::core::flags::{Flag, Flags};
use crate::core::policy::{Expected, Rejection};
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use unicode_normalization::{UnicodeNormalization, is_nfc};

/// Signature of a caller-supplied filter; `None` rejects the value
pub type CustomFn = dyn Fn(&Value, Flags) -> Option<Value> + Send + Sync;

/// The target type of a leaf filter
#[derive(Clone)]
pub enum LeafKind {
    Raw,
    Boolean,
    Integer,
    Double,
    Float,
    String,
    Filename,
    Filepath,
    Url,
    Email,
    Year,
    Timestamp,
    Date,
    DateTime,
    Custom(Arc<CustomFn>),
}

impl LeafKind {
    /// Expected type reported when the filter rejects a value
    pub fn expected(&self) -> Option<Expected> {
        match self {
            LeafKind::Raw => None,
            LeafKind::Boolean => Some(Expected::Boolean),
            LeafKind::Integer => Some(Expected::Integer),
            LeafKind::Double => Some(Expected::Double),
            LeafKind::Float => Some(Expected::Float),
            LeafKind::String => Some(Expected::String),
            LeafKind::Filename => Some(Expected::Filename),
            LeafKind::Filepath => Some(Expected::Filepath),
            LeafKind::Url => Some(Expected::Url),
            LeafKind::Email => Some(Expected::Email),
            LeafKind::Year => Some(Expected::Year),
            LeafKind::Timestamp => Some(Expected::Timestamp),
            LeafKind::Date => Some(Expected::Date),
            LeafKind::DateTime => Some(Expected::DateTime),
            LeafKind::Custom(_) => Some(Expected::Custom),
        }
    }
}

impl fmt::Debug for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::Raw => f.write_str("Raw"),
            LeafKind::Custom(_) => f.write_str("Custom(..)"),
            other => match other.expected() {
                Some(expected) => write!(f, "{:?}", expected),
                None => f.write_str("Raw"),
            },
        }
    }
}

/// A leaf filter with its bound flags
#[derive(Debug, Clone)]
pub struct LeafFilter {
    kind: LeafKind,
    flags: Flags,
}

impl LeafFilter {
    pub fn new(kind: LeafKind) -> Self {
        Self {
            kind,
            flags: Flags::empty(),
        }
    }

    /// Bind an additional flag
    pub fn with(mut self, flag: Flag) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Bind a set of flags
    pub fn with_flags(mut self, flags: impl Into<Flags>) -> Self {
        self.flags = self.flags.union(flags.into());
        self
    }

    pub fn kind(&self) -> &LeafKind {
        &self.kind
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn expected(&self) -> Option<Expected> {
        self.kind.expected()
    }

    /// Run the filter
    ///
    /// `inherited` are the flags passed down the recursion; they are united
    /// with the filter's own flags.
    pub fn apply(&self, value: &Value, inherited: Flags) -> Result<Value, Rejection> {
        let flags = self.flags.union(inherited);
        match &self.kind {
            LeafKind::Raw => Ok(value.clone()),
            LeafKind::Custom(func) => func(value, flags)
                .ok_or_else(|| Rejection::invalid(Expected::Custom).received(value)),
            LeafKind::Boolean => sanitize_boolean(value, flags),
            LeafKind::Integer => numeric(value, flags, NumericKind::Integer),
            LeafKind::Double => numeric(value, flags, NumericKind::Double),
            LeafKind::Float => numeric(value, flags, NumericKind::Float),
            LeafKind::String => sanitize_string(value, flags),
            LeafKind::Filename => path_like(value, flags, Expected::Filename),
            LeafKind::Filepath => path_like(value, flags, Expected::Filepath),
            LeafKind::Url => sanitize_url(value, flags),
            LeafKind::Email => sanitize_email(value, flags),
            LeafKind::Year => sanitize_year(value, flags),
            LeafKind::Timestamp => sanitize_timestamp(value, flags),
            LeafKind::Date => sanitize_date(value, flags, Expected::Date),
            LeafKind::DateTime => sanitize_date(value, flags, Expected::DateTime),
        }
    }
}

// === Constructors ===

/// No sanitization; the value passes through unchanged
pub fn raw() -> LeafFilter {
    LeafFilter::new(LeafKind::Raw)
}

pub fn boolean() -> LeafFilter {
    LeafFilter::new(LeafKind::Boolean)
}

/// Integer (flags: `Strict`, `NoValidation`, `OnlyPositive`, `OnlyNegative`)
pub fn integer() -> LeafFilter {
    LeafFilter::new(LeafKind::Integer)
}

/// Double precision number (flags: `Strict`, `NoValidation`, `OnlyPositive`, `OnlyNegative`)
pub fn double() -> LeafFilter {
    LeafFilter::new(LeafKind::Double)
}

/// Number within single precision range (same flags as [`double`])
pub fn float() -> LeafFilter {
    LeafFilter::new(LeafKind::Float)
}

/// Free text (flags: `AllowQuotes`, `NoTrim`, `NoHtmlStrip`, `DenyExtendedAlphabet`)
pub fn string() -> LeafFilter {
    LeafFilter::new(LeafKind::String)
}

pub fn filename() -> LeafFilter {
    LeafFilter::new(LeafKind::Filename)
}

pub fn filepath() -> LeafFilter {
    LeafFilter::new(LeafKind::Filepath)
}

pub fn url() -> LeafFilter {
    LeafFilter::new(LeafKind::Url)
}

pub fn email() -> LeafFilter {
    LeafFilter::new(LeafKind::Email)
}

pub fn year() -> LeafFilter {
    LeafFilter::new(LeafKind::Year)
}

pub fn timestamp() -> LeafFilter {
    LeafFilter::new(LeafKind::Timestamp)
}

pub fn date() -> LeafFilter {
    LeafFilter::new(LeafKind::Date)
}

pub fn datetime() -> LeafFilter {
    LeafFilter::new(LeafKind::DateTime)
}

/// Wrap a caller-supplied function
///
/// The function receives the value as-is (no entry discipline is applied) and
/// returns `None` to reject it.
pub fn custom<F>(func: F) -> LeafFilter
where
    F: Fn(&Value, Flags) -> Option<Value> + Send + Sync + 'static,
{
    LeafFilter::new(LeafKind::Custom(Arc::new(func)))
}

// === Shared entry discipline ===

/// Text form of a sanitizable scalar, NFC-normalized
fn scalar_text(value: &Value, expected: Expected) -> Result<Cow<'_, str>, Rejection> {
    let reject = || Rejection::invalid(expected).received(value);
    match value {
        Value::String(s) if s.is_empty() => Err(reject()),
        Value::String(s) if is_nfc(s) => Ok(Cow::Borrowed(s.as_str())),
        Value::String(s) => Ok(Cow::Owned(s.nfc().collect())),
        Value::Number(n) => Ok(Cow::Owned(n.to_string())),
        Value::Bool(true) => Ok(Cow::Borrowed("1")),
        Value::Bool(false) => Ok(Cow::Borrowed("0")),
        _ => Err(reject()),
    }
}

/// Final guard: an empty result is no result
fn non_empty(text: String, expected: Expected) -> Result<Value, Rejection> {
    if text.is_empty() {
        Err(Rejection::invalid(expected))
    } else {
        Ok(Value::String(text))
    }
}

fn validated(
    text: String,
    flags: Flags,
    expected: Expected,
    check: impl Fn(&str) -> bool,
) -> Result<Value, Rejection> {
    if text.is_empty() || flags.contains(Flag::NoValidation) || check(&text) {
        non_empty(text, expected)
    } else {
        Err(Rejection::invalid(expected))
    }
}

// === Boolean ===

fn sanitize_boolean(value: &Value, flags: Flags) -> Result<Value, Rejection> {
    let reject = || Rejection::invalid(Expected::Boolean).received(value);
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Ok(Value::Bool(true)),
            Some(x) if x == 0.0 => Ok(Value::Bool(false)),
            Some(_) if flags.contains(Flag::NoValidation) => Ok(Value::Bool(true)),
            _ => Err(reject()),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(Value::Bool(true)),
            "0" | "false" | "off" | "no" => Ok(Value::Bool(false)),
            "" => Err(reject()),
            _ if flags.contains(Flag::NoValidation) => Ok(Value::Bool(true)),
            _ => Err(reject()),
        },
        _ => Err(reject()),
    }
}

// === Numbers ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericKind {
    Integer,
    Double,
    Float,
}

impl NumericKind {
    fn expected(self) -> Expected {
        match self {
            NumericKind::Integer => Expected::Integer,
            NumericKind::Double => Expected::Double,
            NumericKind::Float => Expected::Float,
        }
    }
}

/// A parsed number, remembering whether it was written as an integer
#[derive(Debug, Clone, Copy, PartialEq)]
enum Parsed {
    Int(i64),
    Real(f64),
}

impl Parsed {
    fn from_text(text: &str) -> Option<Self> {
        if !text.contains('.') {
            if let Ok(i) = text.parse::<i64>() {
                return Some(Parsed::Int(i));
            }
        }
        let normalized = text.strip_prefix('+').unwrap_or(text);
        normalized.parse::<f64>().ok().map(Parsed::Real)
    }

    fn from_number(number: &Number) -> Option<Self> {
        match number.as_i64() {
            Some(i) => Some(Parsed::Int(i)),
            None => number.as_f64().map(Parsed::Real),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Parsed::Int(i) => i as f64,
            Parsed::Real(f) => f,
        }
    }
}

fn numeric(value: &Value, flags: Flags, kind: NumericKind) -> Result<Value, Rejection> {
    let expected = kind.expected();
    let reject = || Rejection::invalid(expected).received(value);
    let no_validation = flags.contains(Flag::NoValidation);

    let parsed = match value {
        Value::Number(n) => Parsed::from_number(n).ok_or_else(reject)?,
        _ => {
            let text = scalar_text(value, expected)?;
            let kept = charset::retain(&text, charset::number_char);
            let candidate = if no_validation {
                validators::numeric_prefix(&kept).ok_or_else(reject)?
            } else if validators::is_numeric(&kept) {
                kept.as_str()
            } else {
                return Err(reject());
            };
            Parsed::from_text(candidate).ok_or_else(reject)?
        }
    };

    let x = parsed.as_f64();
    if (flags.contains(Flag::OnlyPositive) && x < 0.0)
        || (flags.contains(Flag::OnlyNegative) && x > 0.0)
    {
        return Err(reject());
    }

    if flags.contains(Flag::Strict) && !no_validation {
        let exact = match (kind, parsed) {
            (NumericKind::Integer, Parsed::Int(_)) => true,
            (NumericKind::Double | NumericKind::Float, Parsed::Real(_)) => true,
            _ => false,
        };
        if !exact {
            return Err(reject());
        }
    }

    match kind {
        NumericKind::Integer => match parsed {
            Parsed::Int(i) => Ok(Value::from(i)),
            Parsed::Real(f) => truncate(f).map(Value::from).ok_or_else(reject),
        },
        NumericKind::Double => Number::from_f64(x).map(Value::Number).ok_or_else(reject),
        NumericKind::Float => {
            if x.abs() > f32::MAX as f64 {
                return Err(reject());
            }
            Number::from_f64(x).map(Value::Number).ok_or_else(reject)
        }
    }
}

/// Truncate toward zero, rejecting values outside `i64`
fn truncate(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let t = f.trunc();
    (t.is_finite() && t >= -LIMIT && t < LIMIT).then_some(t as i64)
}

// === Text ===

fn sanitize_string(value: &Value, flags: Flags) -> Result<Value, Rejection> {
    let text = scalar_text(value, Expected::String)?;
    let text = if flags.contains(Flag::NoHtmlStrip) {
        text
    } else {
        Cow::Owned(charset::strip_tags(&text).into_owned())
    };
    let kept = charset::retain(&text, |c| charset::string_char(c, flags));
    // trimmed last: dropped characters can expose new edge whitespace
    let kept = if flags.contains(Flag::NoTrim) {
        kept
    } else {
        kept.trim().to_string()
    };
    non_empty(kept, Expected::String)
}

fn path_like(value: &Value, flags: Flags, expected: Expected) -> Result<Value, Rejection> {
    let text = scalar_text(value, expected)?;
    let stripped = charset::strip_tags(&text);
    let kept = match expected {
        Expected::Filepath => charset::retain(&stripped, |c| charset::filepath_char(c, flags)),
        _ => charset::retain(&stripped, |c| charset::filename_char(c, flags)),
    };
    non_empty(kept.trim().to_string(), expected)
}

fn sanitize_url(value: &Value, flags: Flags) -> Result<Value, Rejection> {
    let text = scalar_text(value, Expected::Url)?;
    let kept = charset::retain(&charset::printable_ascii(&text), charset::url_char);
    validated(kept, flags, Expected::Url, validators::is_url)
}

fn sanitize_email(value: &Value, flags: Flags) -> Result<Value, Rejection> {
    let text = scalar_text(value, Expected::Email)?;
    let kept = charset::retain(&charset::printable_ascii(&text), charset::email_char);
    validated(kept, flags, Expected::Email, validators::is_email)
}

// === Dates and times ===

fn integer_digits(
    value: &Value,
    flags: Flags,
    expected: Expected,
    check: impl Fn(&str) -> bool,
) -> Result<Value, Rejection> {
    let reject = || Rejection::invalid(expected).received(value);
    let text = scalar_text(value, expected)?;
    let kept = charset::retain(&text, charset::integer_char);
    let candidate = if flags.contains(Flag::NoValidation) {
        validators::numeric_prefix(&kept).ok_or_else(reject)?
    } else if check(&kept) {
        kept.as_str()
    } else {
        return Err(reject());
    };
    candidate
        .strip_prefix('+')
        .unwrap_or(candidate)
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| reject())
}

fn sanitize_year(value: &Value, flags: Flags) -> Result<Value, Rejection> {
    integer_digits(value, flags, Expected::Year, validators::is_year)
}

fn sanitize_timestamp(value: &Value, flags: Flags) -> Result<Value, Rejection> {
    integer_digits(value, flags, Expected::Timestamp, validators::is_timestamp)
}

fn sanitize_date(value: &Value, flags: Flags, expected: Expected) -> Result<Value, Rejection> {
    let text = scalar_text(value, expected)?;
    let stripped = charset::strip_tags(text.trim()).into_owned();
    if expected == Expected::DateTime {
        let kept = charset::retain(&stripped, charset::datetime_char);
        validated(kept, flags, expected, validators::is_datetime)
    } else {
        let kept = charset::retain(&stripped, charset::date_char);
        validated(kept, flags, expected, validators::is_date)
    }
}
