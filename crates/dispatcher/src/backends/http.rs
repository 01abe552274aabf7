//! Shared plumbing for the HTTP-based backends

use contracts::{UploadError, UploadRequest};

/// Response body excerpt length kept in failure reasons
const BODY_EXCERPT_LEN: usize = 256;

/// Build the HTTP client a backend holds for its lifetime
pub(crate) fn build_client(destination: &str) -> Result<reqwest::Client, UploadError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| UploadError::configuration(destination, format!("http client: {e}")))
}

/// Read the request's file into memory for a single-shot upload body
pub(crate) async fn read_source(
    destination: &str,
    request: &UploadRequest,
) -> Result<Vec<u8>, UploadError> {
    tokio::fs::read(request.source()).await.map_err(|e| {
        UploadError::transfer(
            destination,
            format!("read '{}': {e}", request.source().display()),
        )
    })
}

/// Map a non-2xx response into a transfer error carrying a body excerpt
pub(crate) async fn expect_success(
    destination: &str,
    response: reqwest::Response,
) -> Result<(), UploadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > BODY_EXCERPT_LEN {
        let mut cut = BODY_EXCERPT_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(UploadError::transfer(
        destination,
        format!("HTTP {status}: {body}"),
    ))
}
