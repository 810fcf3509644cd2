use reqwest::Client;
use url::Url;

use crate::Result;

/// Requests a results page and returns a `Result<String>` containing the HTML.
/// A non-success status is as fatal as a failed connection; nothing is retried.
pub(crate) async fn fetch_page(client: &Client, url: Url) -> Result<String> {
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}
