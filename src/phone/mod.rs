//! Phone-number pattern matching
//!
//! The grammar is purely syntactic: a run of 3-4 digits, an optional single
//! separator (hyphen, dot, or whitespace), then a run of 7-8 digits, with a
//! word boundary on both sides. No area-code validation is attempted.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern used for every phone-number scan
///
/// The lazy `??` prefers the separator-less reading, matching the grammar's
/// "optional separator" without swallowing a trailing digit run.
pub const PHONE_PATTERN: &str = r"\b\d{3,4}[-.\s]??\d{7,8}\b";

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("hardcoded phone pattern is valid"));

/// A single match found in a text, with its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneMatch<'t> {
    /// Byte offset of the first character of the match
    pub start: usize,
    /// Byte offset one past the last character of the match
    pub end: usize,
    /// The matched text, exactly as it appears in the input
    pub text: &'t str,
}

/// Compiled phone-number matcher
///
/// Cloning is cheap; the compiled program is shared.
#[derive(Debug, Clone)]
pub struct PhoneMatcher {
    regex: Regex,
}

impl Default for PhoneMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneMatcher {
    /// Creates a matcher for the standard phone-number grammar
    pub fn new() -> Self {
        Self {
            regex: PHONE_REGEX.clone(),
        }
    }

    /// Returns every non-overlapping match, in order of appearance
    ///
    /// # Example
    ///
    /// ```
    /// use phone_harvest::PhoneMatcher;
    ///
    /// let matcher = PhoneMatcher::new();
    /// assert_eq!(matcher.find_all("Call 021-12345678 now"), vec!["021-12345678"]);
    /// assert!(matcher.find_all("").is_empty());
    /// ```
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.regex.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Returns every non-overlapping match with its position in `text`
    pub fn find_spans<'t>(&self, text: &'t str) -> Vec<PhoneMatch<'t>> {
        self.regex
            .find_iter(text)
            .map(|m| PhoneMatch {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            })
            .collect()
    }
}
