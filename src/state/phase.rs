/// Phase definitions for a single category's crawl
///
/// A category moves through
/// `Init → DiscoveringSets → (ExpandingSet → ExtractingCards)* → Done`.
use std::fmt;

/// Represents the current phase of a category crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Loading previously stored card URLs
    Init,

    /// Collecting set URLs from the category page
    DiscoveringSets,

    /// Collecting card URLs from one set page
    ExpandingSet,

    /// Extracting the new cards of one set
    ExtractingCards,

    /// All sets visited and the buffer flushed
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Init, DiscoveringSets)
                | (Init, Done)
                | (DiscoveringSets, ExpandingSet)
                | (DiscoveringSets, Done)
                | (ExpandingSet, ExtractingCards)
                | (ExpandingSet, ExpandingSet)
                | (ExpandingSet, Done)
                | (ExtractingCards, ExpandingSet)
                | (ExtractingCards, Done)
        )
    }

    /// Returns true once the category needs no further work
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::DiscoveringSets => "discovering_sets",
            Self::ExpandingSet => "expanding_set",
            Self::ExtractingCards => "extracting_cards",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
