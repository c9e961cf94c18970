use crate::Error;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Issues the single GET request for an archive and classifies the response.
///
/// The returned response body is unconsumed; the unpacker drives it as an
/// `io::Read`. There is no retry, no authentication, and no read timeout:
/// the call blocks until the transport resolves or fails.
pub fn fetch(url: &str) -> Result<reqwest::blocking::Response, Error> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(None)
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound(url.to_string()));
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(Error::Server(status.as_u16()));
    }
    Ok(response)
}
