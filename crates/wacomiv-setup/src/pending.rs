use wacomiv_tablet::{ResponseKind, ResponseOutcome};

/// Correlates the one outstanding text query with the response that
/// completes it.
///
/// `Idle -> Awaiting -> Satisfied | TimedOut`, re-armed for every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingRequest {
    #[default]
    Idle,
    Awaiting(ResponseKind),
    Satisfied {
        expected: ResponseKind,
        outcome: ResponseOutcome,
    },
    TimedOut(ResponseKind),
}

impl PendingRequest {
    /// Start waiting for a response of `kind`, replacing any earlier request.
    pub fn arm(&mut self, kind: ResponseKind) {
        *self = PendingRequest::Awaiting(kind);
    }

    /// Record a completed response. Returns true if a request was waiting
    /// for it; responses that arrive with nothing outstanding are ignored.
    pub fn complete(&mut self, outcome: ResponseOutcome) -> bool {
        match *self {
            PendingRequest::Awaiting(expected) => {
                *self = PendingRequest::Satisfied { expected, outcome };
                true
            }
            _ => false,
        }
    }

    /// Give up on the outstanding request.
    pub fn expire(&mut self) {
        if let PendingRequest::Awaiting(kind) = *self {
            *self = PendingRequest::TimedOut(kind);
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, PendingRequest::Awaiting(_))
    }

    /// True once a response arrived whose tag differs from the query's.
    pub fn is_mismatched(&self) -> bool {
        match self {
            PendingRequest::Satisfied { expected, outcome } => outcome.kind() != Some(*expected),
            _ => false,
        }
    }
}
