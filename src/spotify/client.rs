use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Res, SpotiviewError, config, debug, types::Paging};

/// The single access point to the Spotify Web API.
///
/// Every request goes through [`ApiClient::call`], which attaches the bearer
/// token and maps non-success statuses to [`SpotiviewError::RequestFailed`].
/// There is no caching, no retry and no token refresh.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client against the configured `SPOTIFY_API_URL`.
    pub fn from_env() -> Self {
        Self::new(config::spotify_apiurl())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calls the Web API and returns the JSON body verbatim.
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint path such as `/me/playlists`, or a full URL that
    ///   already starts with the API base (a "next page" reference)
    /// * `token` - Bearer token; `None` fails with
    ///   [`SpotiviewError::Unauthenticated`] before any request is made
    /// * `method` - HTTP method
    /// * `body` - Optional JSON request body
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - Parsed body, `Value::Null` for an empty body
    /// - `Err(RequestFailed { status })` - Non-success status
    /// - `Err(MalformedResponse)` - Body is not valid JSON
    /// - `Err(Network)` - The request could not be sent
    pub async fn call(
        &self,
        path: &str,
        token: Option<&str>,
        method: Method,
        body: Option<&Value>,
    ) -> Res<Value> {
        let token = token.ok_or(SpotiviewError::Unauthenticated)?;
        let url = self.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("{} answered {}", url, status);
            return Err(SpotiviewError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| SpotiviewError::MalformedResponse(e.to_string()))
    }

    /// `GET`s `path` and deserializes the body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Res<T> {
        let value = self.call(path, token, Method::GET, None).await?;
        serde_json::from_value(value).map_err(|e| SpotiviewError::MalformedResponse(e.to_string()))
    }

    /// Follows a paginated listing until its `next` reference is exhausted.
    ///
    /// Pages are fetched one after another, each request issued only once the
    /// previous page has arrived, and their items are concatenated in server
    /// order. There is no page limit: termination relies on the provider's
    /// `next` chain ending.
    ///
    /// A `next` reference outside the API base is rejected with
    /// [`SpotiviewError::MalformedResponse`] so the token never leaves the API host.
    pub async fn drain<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Res<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(path.to_string());

        while let Some(current) = next.take() {
            let page: Paging<T> = self.get(&current, token).await?;
            items.extend(page.items);

            if let Some(reference) = page.next {
                if !self.is_api_url(&reference) {
                    return Err(SpotiviewError::MalformedResponse(format!(
                        "next page reference outside API base: {}",
                        reference
                    )));
                }
                next = Some(reference);
            }
        }

        Ok(items)
    }

    fn endpoint(&self, path: &str) -> String {
        if self.is_api_url(path) {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn is_api_url(&self, path: &str) -> bool {
        path.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    }
}
