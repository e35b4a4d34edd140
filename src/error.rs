use reqwest::StatusCode;

/// Errors raised at the HTTP boundary with the backend
///
/// Display output is the raw, human-readable description of the failure;
/// samplers store it verbatim as the sample's error text.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection failure, timeout, or an error reading the body
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a status other than the one expected
    #[error("{}", describe_status(.status, .body))]
    Status { status: StatusCode, body: String },

    /// The body could not be decoded into the expected shape
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered but flagged the request as unsuccessful
    #[error("{0}")]
    Rejected(String),
}

fn describe_status(status: &StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}
