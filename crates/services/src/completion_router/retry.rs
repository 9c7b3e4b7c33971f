use config::RetryPolicyMode;
use inference_providers::{CompletionError, ErrorClass};

/// What the router does after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDecision {
    /// Retry the same model with the next credential (if any remain)
    NextCredential,
    /// Give up on this model and move to the next candidate
    NextModel,
    /// Stop routing altogether
    Abort,
}

/// Decides which failures are worth another credential on the same model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Try the next credential for every error; only cancellation aborts
    #[default]
    Blanket,
    /// Skip to the next model when the failure cannot depend on the credential
    Classified,
}

impl RetryPolicy {
    pub fn decide(&self, error: &CompletionError) -> AttemptDecision {
        let class = error.class();
        if class == ErrorClass::Cancelled {
            return AttemptDecision::Abort;
        }
        match self {
            Self::Blanket => AttemptDecision::NextCredential,
            Self::Classified => match class {
                ErrorClass::ModelUnavailable | ErrorClass::Rejected => AttemptDecision::NextModel,
                _ => AttemptDecision::NextCredential,
            },
        }
    }
}

impl From<RetryPolicyMode> for RetryPolicy {
    fn from(mode: RetryPolicyMode) -> Self {
        match mode {
            RetryPolicyMode::Blanket => Self::Blanket,
            RetryPolicyMode::Classified => Self::Classified,
        }
    }
}
