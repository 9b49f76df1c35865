/// Crawl phase definitions for the orchestration state machine
///
/// `Idle -> FetchingSeed -> ExtractingLinks -> FanningOut -> AwaitingCompletion -> Done`,
/// with `Aborted` reachable from the seed fetch (unreachable seed) and from the
/// wait (caller-initiated cancellation).
use crate::HarvestError;
use std::fmt;

/// Phase of a single crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing has happened yet
    #[default]
    Idle,

    /// Fetching the search-results page
    FetchingSeed,

    /// Pulling absolute links out of the seed page
    ExtractingLinks,

    /// Spawning one task per extracted link
    FanningOut,

    /// Waiting at the join barrier for every spawned task
    AwaitingCompletion,

    /// All tasks have finished
    Done,

    /// The run ended early: seed unreachable or cancelled by the caller
    Aborted,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if the transition `self -> next` is legal
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::FetchingSeed)
                | (Self::FetchingSeed, Self::ExtractingLinks)
                | (Self::FetchingSeed, Self::Aborted)
                | (Self::ExtractingLinks, Self::FanningOut)
                | (Self::FanningOut, Self::AwaitingCompletion)
                | (Self::AwaitingCompletion, Self::Done)
                | (Self::AwaitingCompletion, Self::Aborted)
        )
    }

    /// Moves to `next`, or fails with `InvalidTransition`
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), HarvestError> {
        if !self.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        tracing::debug!("Crawl phase: {} -> {}", self, next);
        *self = next;
        Ok(())
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingSeed => "fetching_seed",
            Self::ExtractingLinks => "extracting_links",
            Self::FanningOut => "fanning_out",
            Self::AwaitingCompletion => "awaiting_completion",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
