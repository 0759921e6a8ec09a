//! Character allow-lists and text stripping helpers used by the leaf filters

use crate::core::flags::{Flag, Flags};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Letters admitted on top of ASCII unless `DenyExtendedAlphabet` is set
pub const EXTENDED_ALPHABET: &str = "æøåÆØÅ";

const STRING_SYMBOLS: &str = ",.-/=$|*+[]!?_:;@#%&() \n\r\t";
const URL_SYMBOLS: &str = "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=";
const EMAIL_SYMBOLS: &str = "!#$%&'*+-=?^_`{|}~@.[]";

/// Keep only the characters accepted by `allowed`
pub fn retain(text: &str, allowed: impl Fn(char) -> bool) -> String {
    text.chars().filter(|c| allowed(*c)).collect()
}

/// Remove HTML/XML tags, including an unterminated trailing tag
///
/// A tag opens with `<` directly followed by a letter, `/` or `!`. A bare `<`
/// (as in `5 < 10`) is left for the allow-list to handle.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[a-zA-Z/!][^<>]*(?:>|$)").unwrap());
    tag.replace_all(text, "")
}

/// Drop everything outside printable ASCII (accents, control characters, spaces)
pub fn printable_ascii(text: &str) -> String {
    retain(text, |c| c.is_ascii_graphic())
}

fn extended(c: char, flags: Flags) -> bool {
    !flags.contains(Flag::DenyExtendedAlphabet) && EXTENDED_ALPHABET.contains(c)
}

/// Whitespace as understood by the filename and datetime sets
fn blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

pub fn string_char(c: char, flags: Flags) -> bool {
    c.is_ascii_alphanumeric()
        || STRING_SYMBOLS.contains(c)
        || extended(c, flags)
        || (flags.contains(Flag::AllowQuotes) && matches!(c, '"' | '\''))
        || (flags.contains(Flag::NoHtmlStrip) && matches!(c, '<' | '>'))
}

pub fn filename_char(c: char, flags: Flags) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') || blank(c) || extended(c, flags)
}

pub fn filepath_char(c: char, flags: Flags) -> bool {
    filename_char(c, flags) || matches!(c, '\\' | '/' | ':')
}

/// Digits, sign and decimal point
pub fn number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
}

/// Digits and sign only
pub fn integer_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-')
}

pub fn date_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '.' | '\\' | '/' | ':')
}

pub fn datetime_char(c: char) -> bool {
    date_char(c) || blank(c)
}

pub fn url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || URL_SYMBOLS.contains(c)
}

pub fn email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || EMAIL_SYMBOLS.contains(c)
}
