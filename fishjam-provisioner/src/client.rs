//! Fishjam HTTP Client
//!
//! Pure HTTP client for the Fishjam room management API, no workflow logic.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use tracing::debug;
use url::Url;

use crate::config::ServerConfig;
use crate::error::{check_response, json_with_limit, FishjamError};
use crate::types::{Component, ComponentOptions, CreatedRoom, DataResp, RoomOptions};

/// Fishjam HTTP Client
///
/// Provides methods for interacting with the Fishjam API:
/// - Room creation (`POST /room`)
/// - Component attachment (`POST /room/{room_id}/component`)
///
/// Building a client performs no network I/O; connections are opened on the
/// first request.
pub struct FishjamClient {
    base_url: Url,
    token: String,
    client: Client,
}

impl FishjamClient {
    /// Create a new client for the given server endpoint
    pub fn new(server: &ServerConfig) -> Result<Self, FishjamError> {
        let base_url = Url::parse(&server.base_url())?;

        // Redirects are disabled so the bearer token never leaves the configured host.
        let client = Client::builder()
            .connect_timeout(server.connect_timeout())
            .timeout(server.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FishjamError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            token: server.token.clone(),
            client,
        })
    }

    /// Get server base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build request headers
    fn build_headers(&self) -> Result<HeaderMap, FishjamError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FishjamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FishjamError::InvalidConfig(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Create a room
    ///
    /// Returns the address of the Fishjam instance hosting the room together
    /// with the room itself.
    pub async fn create_room(&self, options: &RoomOptions) -> Result<CreatedRoom, FishjamError> {
        let url = self.endpoint(&["room"])?;
        debug!(codec = %options.video_codec, max_peers = ?options.max_peers, "Creating room");

        let response = self
            .client
            .post(url)
            .headers(self.build_headers()?)
            .json(options)
            .send()
            .await?;

        let response = check_response(response).await?;
        let resp: DataResp<CreatedRoom> = json_with_limit(response).await?;

        if resp.data.room.id.is_empty() {
            return Err(FishjamError::Parse("Missing room id in response".to_string()));
        }

        Ok(resp.data)
    }

    /// Attach a component to an existing room
    ///
    /// Success only means the server accepted the component; media starts
    /// flowing (or fails to) asynchronously.
    pub async fn add_component(
        &self,
        room_id: &str,
        options: &ComponentOptions,
    ) -> Result<Component, FishjamError> {
        if room_id.is_empty() {
            return Err(FishjamError::InvalidConfig("Missing room_id".to_string()));
        }
        if let ComponentOptions::Rtsp(rtsp) = options {
            if rtsp.source_uri.trim().is_empty() {
                return Err(FishjamError::InvalidConfig(
                    "RTSP source URI must not be empty".to_string(),
                ));
            }
        }

        let url = self.endpoint(&["room", room_id, "component"])?;
        debug!(room_id, kind = %options.kind(), "Adding component");

        let response = self
            .client
            .post(url)
            .headers(self.build_headers()?)
            .json(options)
            .send()
            .await?;

        let response = check_response(response).await?;
        let resp: DataResp<Component> = json_with_limit(response).await?;

        if resp.data.id.is_empty() {
            return Err(FishjamError::Parse("Missing component id in response".to_string()));
        }

        Ok(resp.data)
    }
}
