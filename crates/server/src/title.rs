//! Title-fetch collaborator: given a site's stored URL, performs an outbound
//! GET and extracts the first `<title>` text from the returned markup. Fetch
//! and parse failures surface as one opaque error; the ordering engine never
//! sees any of this.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TitleError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("no title element in response")]
    Missing,
}

pub async fn fetch_title(client: &reqwest::Client, url: &str) -> Result<String, TitleError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    extract_title(&body).ok_or(TitleError::Missing)
}

/// First `<title>` element's trimmed text content, matched case-insensitively.
/// ASCII lowercasing preserves byte offsets, so indices found in the lowered
/// copy are valid in the original.
fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let content_start = open + lower[open..].find('>')? + 1;
    let content_end = content_start + lower[content_start..].find("</title")?;
    let title = html[content_start..content_end].trim();
    (!title.is_empty()).then(|| title.to_string())
}
