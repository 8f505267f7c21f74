use thiserror::Error;

/// Everything that can go wrong between "build the prompt" and "have raw
/// outline text". None of these reach the caller of
/// [`crate::OutlineClient::generate_outline`]; they are absorbed by the
/// fallback path.
#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("chat completion returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response carried no message content")]
    MalformedResponse,

    #[error("outline JSON did not parse: {0}")]
    Parse(#[from] serde_json::Error),
}
