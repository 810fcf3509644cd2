use chrono::Local;
use tokio::task::spawn_blocking;
use url::Url;

use crate::parse::{parse_results, MunicipalityRecord};
use crate::request::fetch_page;
use crate::write::save_to_csv;
use crate::{info_time, Result, BASE_URL};

/// Runs the whole pipeline for one results page: resolve the address,
/// fetch the page, extract the municipality rows and write them to `output`.
pub async fn process_page(relative_url: &str, output: &str) -> Result<()> {
    let start_time = Local::now();
    let url = Url::parse(BASE_URL)?.join(relative_url)?;
    info_time!("Requesting page: {}", url);

    let client = reqwest::Client::new();
    let html = fetch_page(&client, url).await?;

    let records = extract_records(html).await?;
    info_time!("Extracted {} municipalities", records.len());

    save_to_csv(&records, output)?;
    info_time!(start_time, "Wrote the results to file: {}", output);

    Ok(())
}

/// Parsing the document tree is CPU bound, so it runs off the async runtime.
async fn extract_records(html: String) -> Result<Vec<MunicipalityRecord>> {
    spawn_blocking(move || parse_results(&html)).await?
}
