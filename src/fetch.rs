use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::error::ConvertError;

fn fetch_error(url: &str, reason: impl ToString) -> ConvertError {
    ConvertError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Single GET, no retries. Any status outside 2xx is a failure.
pub(crate) fn fetch_html(url: &str, user_agent: &str) -> Result<String, ConvertError> {
    let parsed = Url::parse(url).map_err(|error| fetch_error(url, error))?;
    let client = Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|error| fetch_error(url, error))?;

    let response = client
        .get(parsed)
        .send()
        .map_err(|error| fetch_error(url, error))?;
    let status = response.status();
    debug!(%url, %status, "fetched source page");
    if !status.is_success() {
        return Err(fetch_error(url, format!("status {status}")));
    }

    response.text().map_err(|error| fetch_error(url, error))
}
