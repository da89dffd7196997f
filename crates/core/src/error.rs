use thiserror::Error;

/// Failures raised while composing or finalizing a turn.
///
/// Every variant is fatal to the current turn; the dispatcher decides how
/// to surface it to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A mutation was attempted after the response was computed. Usually a
    /// handler kicked off async work and did not await it before returning.
    #[error(
        "response has already been sent; is this being used in an async call that \
         was not awaited before the handler returned?"
    )]
    ResponseAlreadyDigested,

    /// The turn was finalized a second time.
    #[error("response has already been digested")]
    AlreadyFinalized,

    /// A third simple response was added; the wire format allows an opening
    /// and a closing line only.
    #[error("error adding simple response: two simple responses already defined")]
    TooManySimples,

    /// The 8-chip suggestion cap was exceeded.
    #[error("error adding suggestion: max number of suggestions (8) already added")]
    TooManySuggestions,

    /// `append` was called with something other than plain text.
    #[error("append only supports plain text")]
    UnsupportedAppendType,

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}
