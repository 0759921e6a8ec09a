//! Named options that tune leaf filters and the container recursion

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A single named option
///
/// Flags travel unchanged through the recursion. Each leaf filter only looks at
/// the flags that concern its own type and ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    /// Keep single and double quotes in strings
    #[serde(alias = "ALLOW_QUOTES")]
    AllowQuotes,
    /// Keep leading and trailing whitespace in strings
    #[serde(alias = "NO_TRIM")]
    NoTrim,
    /// Keep HTML tags (and admit `<` `>`) in strings
    #[serde(alias = "NO_HTMLSTRIP")]
    NoHtmlStrip,
    /// Drop `æøåÆØÅ` from the allowed character sets
    #[serde(alias = "DENY_NORWEGIAN")]
    DenyExtendedAlphabet,
    /// Numeric filters only accept their exact type
    #[serde(alias = "STRICT")]
    Strict,
    /// Skip the final validation step of a leaf filter
    #[serde(alias = "NO_VALIDATION")]
    NoValidation,
    /// Broadcast a single filter through every nesting level
    #[serde(alias = "DEEP_ARRAY")]
    DeepRecursion,
    /// Decode JSON-encoded strings before filtering
    #[serde(alias = "EXPECT_JSON")]
    ExpectJson,
    /// Numeric filters reject negative values
    #[serde(alias = "ONLY_POSITIVE")]
    OnlyPositive,
    /// Numeric filters reject positive values
    #[serde(alias = "ONLY_NEGATIVE")]
    OnlyNegative,
}

impl Flag {
    /// Every flag, in declaration order
    pub const ALL: [Flag; 10] = [
        Flag::AllowQuotes,
        Flag::NoTrim,
        Flag::NoHtmlStrip,
        Flag::DenyExtendedAlphabet,
        Flag::Strict,
        Flag::NoValidation,
        Flag::DeepRecursion,
        Flag::ExpectJson,
        Flag::OnlyPositive,
        Flag::OnlyNegative,
    ];

    /// Canonical kebab-case name
    pub fn name(self) -> &'static str {
        match self {
            Flag::AllowQuotes => "allow-quotes",
            Flag::NoTrim => "no-trim",
            Flag::NoHtmlStrip => "no-html-strip",
            Flag::DenyExtendedAlphabet => "deny-extended-alphabet",
            Flag::Strict => "strict",
            Flag::NoValidation => "no-validation",
            Flag::DeepRecursion => "deep-recursion",
            Flag::ExpectJson => "expect-json",
            Flag::OnlyPositive => "only-positive",
            Flag::OnlyNegative => "only-negative",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown flag name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flag '{0}'")]
pub struct UnknownFlag(pub String);

impl FromStr for Flag {
    type Err = UnknownFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let flag = match normalized.as_str() {
            "allow-quotes" => Flag::AllowQuotes,
            "no-trim" => Flag::NoTrim,
            "no-html-strip" | "no-htmlstrip" => Flag::NoHtmlStrip,
            "deny-extended-alphabet" | "deny-norwegian" => Flag::DenyExtendedAlphabet,
            "strict" | "strict-numeric" => Flag::Strict,
            "no-validation" => Flag::NoValidation,
            "deep-recursion" | "deep-array" => Flag::DeepRecursion,
            "expect-json" => Flag::ExpectJson,
            "only-positive" => Flag::OnlyPositive,
            "only-negative" => Flag::OnlyNegative,
            _ => return Err(UnknownFlag(s.to_string())),
        };
        Ok(flag)
    }
}

/// A set of [`Flag`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Flag>", into = "Vec<Flag>")]
pub struct Flags(u16);

impl Flags {
    /// The empty set
    pub const fn empty() -> Self {
        Flags(0)
    }

    pub fn contains(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    /// Set with `flag` added
    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    pub fn union(self, other: Flags) -> Self {
        Flags(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the flags in declaration order
    pub fn iter(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |flag| self.contains(*flag))
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags(flag.bit())
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Flags::empty(), |flags, flag| flags.with(flag))
    }
}

impl<const N: usize> From<[Flag; N]> for Flags {
    fn from(flags: [Flag; N]) -> Self {
        flags.into_iter().collect()
    }
}

impl From<Vec<Flag>> for Flags {
    fn from(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<Flags> for Vec<Flag> {
    fn from(flags: Flags) -> Self {
        flags.iter().collect()
    }
}

impl BitOr for Flag {
    type Output = Flags;

    fn bitor(self, rhs: Flag) -> Flags {
        Flags::from(self).with(rhs)
    }
}

impl BitOr<Flag> for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flag) -> Flags {
        self.with(rhs)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl BitOrAssign<Flag> for Flags {
    fn bitor_assign(&mut self, rhs: Flag) {
        self.insert(rhs);
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Flag::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_contains_nothing() {
        let flags = Flags::empty();
        assert!(flags.is_empty());
        assert!(Flag::ALL.iter().all(|f| !flags.contains(*f)));
    }

    #[test]
    fn test_bitor_builds_set() {
        let flags = Flag::Strict | Flag::NoTrim;
        assert!(flags.contains(Flag::Strict));
        assert!(flags.contains(Flag::NoTrim));
        assert!(!flags.contains(Flag::ExpectJson));
    }

    #[test]
    fn test_union_merges_both_sides() {
        let a = Flags::from(Flag::ExpectJson);
        let b = Flags::from([Flag::DeepRecursion, Flag::Strict]);
        let merged = a.union(b);
        assert_eq!(merged.iter().count(), 3);
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let flags = Flags::from([Flag::OnlyNegative, Flag::AllowQuotes]);
        let listed: Vec<Flag> = flags.iter().collect();
        assert_eq!(listed, vec![Flag::AllowQuotes, Flag::OnlyNegative]);
    }

    #[test]
    fn test_from_str_accepts_legacy_names() {
        assert_eq!("DENY_NORWEGIAN".parse::<Flag>(), Ok(Flag::DenyExtendedAlphabet));
        assert_eq!("DEEP_ARRAY".parse::<Flag>(), Ok(Flag::DeepRecursion));
        assert_eq!("no-html-strip".parse::<Flag>(), Ok(Flag::NoHtmlStrip));
        assert_eq!("NO_HTMLSTRIP".parse::<Flag>(), Ok(Flag::NoHtmlStrip));
        assert_eq!("strict-numeric".parse::<Flag>(), Ok(Flag::Strict));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "shout".parse::<Flag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown flag 'shout'");
    }

    #[test]
    fn test_serde_uses_kebab_case_list() {
        let flags = Flag::ExpectJson | Flag::DeepRecursion;
        let json = serde_json::to_string(&flags).expect("serialize should succeed");
        assert_eq!(json, r#"["deep-recursion","expect-json"]"#);

        let restored: Flags =
            serde_json::from_str(r#"["EXPECT_JSON","deep-recursion"]"#).expect("should parse");
        assert_eq!(restored, flags);
    }

    #[test]
    fn test_display_lists_names() {
        let flags = Flag::Strict | Flag::NoValidation;
        assert_eq!(flags.to_string(), "[strict, no-validation]");
    }
}
