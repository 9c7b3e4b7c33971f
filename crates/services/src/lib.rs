pub mod completion_router;

pub use completion_router::{
    AttemptDecision, AttemptFailure, CompletionRouter, CounterRotation, CredentialPool,
    ModelAliases, ModelFallbackList, RetryPolicy, RotationStrategy, RoutedCompletion, RouterError,
    TimeBucketRotation,
};
