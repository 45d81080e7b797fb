//! Image reference resolution.
//!
//! A caller-supplied reference is either an inline data URL
//! (`data:<mime>;base64,<payload>`) or a location: a bare filesystem path,
//! a `file://` URL, or an `http(s)://` URL. Either way the result is the
//! raw bytes of the referenced image.

use base64::Engine;
use regex::Regex;
use std::sync::LazyLock;

/// Header pattern for inline data URLs. The payload starts right after
/// the match.
static DATA_URL_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:.+?;base64,").expect("data URL pattern is valid"));

/// Why an image reference could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("the image reference could not be parsed: {0}")]
    Parse(String),
    #[error("the base64 payload could not be decoded: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("the image reference could not be read: {0}")]
    Read(String),
}

/// Resolve an image reference to its raw bytes.
///
/// Remote `http(s)` references are fetched over the network, which is why
/// this is async; data URLs and local files resolve without awaiting.
pub async fn load(reference: &str) -> Result<Vec<u8>, LoadError> {
    if reference.starts_with("data:") {
        decode_data_url(reference)
    } else {
        read_location(reference).await
    }
}

/// Decode the base64 payload of a data URL.
fn decode_data_url(url: &str) -> Result<Vec<u8>, LoadError> {
    let header = DATA_URL_HEADER
        .find(url)
        .ok_or_else(|| LoadError::Parse(format!("not a base64 data URL: {}", truncate(url))))?;
    let payload = &url[header.end()..];
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

/// Read a location reference: URL schemes are dispatched explicitly, anything
/// without a scheme is treated as a filesystem path.
async fn read_location(reference: &str) -> Result<Vec<u8>, LoadError> {
    if !reference.contains("://") {
        return std::fs::read(reference)
            .map_err(|e| LoadError::Read(format!("{}: {}", reference, e)));
    }

    let url = reqwest::Url::parse(reference)
        .map_err(|e| LoadError::Parse(format!("{}: {}", reference, e)))?;

    match url.scheme() {
        "http" | "https" => {
            let response = reqwest::get(url)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| LoadError::Read(format!("{}: {}", reference, e)))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| LoadError::Read(format!("{}: {}", reference, e)))?;
            Ok(bytes.to_vec())
        }
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| LoadError::Parse(format!("not a local file URL: {}", reference)))?;
            std::fs::read(&path)
                .map_err(|e| LoadError::Read(format!("{}: {}", path.display(), e)))
        }
        scheme => Err(LoadError::Parse(format!(
            "unsupported scheme '{}': {}",
            scheme, reference
        ))),
    }
}

/// Keep log/error output readable when the reference is a multi-KB data URL.
fn truncate(reference: &str) -> String {
    const MAX: usize = 64;
    match reference.char_indices().nth(MAX) {
        None => reference.to_string(),
        Some((idx, _)) => format!("{}…", &reference[..idx]),
    }
}
