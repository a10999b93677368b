mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::{Method, Request, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// GETs `url` and decodes the JSON body.
///
/// A non-success status becomes [`Error::UpstreamUnavailable`].
pub async fn fetch_json<C, T>(client: &C, url: Url) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    debug!(%url, "GET");
    let req = Request::new(Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::UpstreamUnavailable {
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Upstream(format!("invalid JSON body: {e}")))
}

/// POSTs `body` as JSON to `url`, returning the response status code.
pub async fn post_json<C, B>(client: &C, url: Url, body: &B) -> Result<u16>
where
    C: HttpClient + ?Sized,
    B: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(body).map_err(|e| Error::Upstream(e.to_string()))?;

    let mut req = Request::new(Method::POST, url);
    req.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    *req.body_mut() = Some(payload.into());

    let resp = client.execute(req).await?;
    Ok(resp.status().as_u16())
}
