/// Link state definitions for classifying fan-out results
///
/// Every extracted link ends the crawl in exactly one of these states.
use std::fmt;

/// Final classification of one extracted link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkState {
    // ===== Success States =====
    /// Page fetched and at least one phone number found
    Matched,

    /// Page fetched but no phone number found
    NoMatches,

    // ===== Soft Failure States =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned some other non-success status
    HttpError,

    /// Connection could not be established (DNS, refused, TLS)
    Unreachable,

    /// Fetch exceeded the per-fetch timeout
    TimedOut,

    /// Page Content-Type is not text
    ContentMismatch,

    /// Any other fetch failure (body decoding, redirect limit, ...)
    Failed,

    /// Task ended without reporting (panicked or aborted by cancellation)
    Lost,
}

impl LinkState {
    /// Returns true if the page was fetched successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Matched | Self::NoMatches)
    }

    /// Returns true if this represents a soft failure
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NoMatches => "no_matches",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::TimedOut => "timed_out",
            Self::ContentMismatch => "content_mismatch",
            Self::Failed => "failed",
            Self::Lost => "lost",
        }
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched => "Matched",
            Self::NoMatches => "No Matches",
            Self::DeadLink => "Dead Link (404/410)",
            Self::HttpError => "HTTP Error",
            Self::Unreachable => "Unreachable",
            Self::TimedOut => "Timed Out",
            Self::ContentMismatch => "Content Mismatch",
            Self::Failed => "Failed",
            Self::Lost => "Lost",
        }
    }

    /// Returns all possible link states, in report order
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Matched,
            Self::NoMatches,
            Self::DeadLink,
            Self::HttpError,
            Self::Unreachable,
            Self::TimedOut,
            Self::ContentMismatch,
            Self::Failed,
            Self::Lost,
        ]
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
