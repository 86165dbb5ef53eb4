//! Read-only snapshot capture over the WebDriver HTTP protocol.
//!
//! The session must already be open; this module never creates, navigates or
//! closes it. Only two endpoints are used: `GET /session/{id}/source` and
//! `GET /session/{id}/screenshot`.

use crate::error::{DetectorError, Result};
use crate::page_source::PageSourceParser;
use crate::types::{Bitmap, ScreenSnapshot};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// An open automation session on a driver server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    server_url: Url,
    session_id: String,
}

impl SessionHandle {
    pub fn new(server_url: &str, session_id: impl Into<String>) -> Result<Self> {
        let mut server_url = Url::parse(server_url)?;
        if !server_url.path().ends_with('/') {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }
        Ok(Self {
            server_url,
            session_id: session_id.into(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn endpoint(&self, command: &str) -> Result<Url> {
        Ok(self
            .server_url
            .join(&format!("session/{}/{}", self.session_id, command))?)
    }
}

/// Produces a [`ScreenSnapshot`] for the item currently on screen
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Partial failures are folded into the snapshot as missing evidence; an
    /// error means nothing usable could be captured.
    async fn capture(&self, session: &SessionHandle, with_image: bool) -> Result<ScreenSnapshot>;
}

#[derive(Deserialize)]
struct WebDriverValue {
    value: String,
}

pub struct WebDriverSnapshotSource {
    client: reqwest::Client,
    parser: PageSourceParser,
}

impl WebDriverSnapshotSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            parser: PageSourceParser::new()?,
        })
    }

    async fn fetch_value(&self, session: &SessionHandle, command: &str) -> Result<String> {
        let url = session.endpoint(command)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectorError::DriverStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body: WebDriverValue = response.json().await?;
        Ok(body.value)
    }

    pub async fn page_source(&self, session: &SessionHandle) -> Result<String> {
        self.fetch_value(session, "source").await
    }

    pub async fn screenshot(&self, session: &SessionHandle) -> Result<Bitmap> {
        let encoded = self.fetch_value(session, "screenshot").await?;
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| DetectorError::ImageDecode(e.to_string()))?;
        Bitmap::decode(&bytes)
    }
}

#[async_trait]
impl SnapshotSource for WebDriverSnapshotSource {
    async fn capture(&self, session: &SessionHandle, with_image: bool) -> Result<ScreenSnapshot> {
        let source = self.page_source(session).await;

        let image = if with_image {
            match self.screenshot(session).await {
                Ok(bitmap) => Some(bitmap),
                Err(e) => {
                    warn!("Screenshot unavailable for session {}: {}", session.session_id, e);
                    None
                }
            }
        } else {
            None
        };

        let snapshot = match (source, image) {
            (Ok(xml), image) => {
                let snapshot = self.parser.parse(&xml);
                match image {
                    Some(bitmap) => snapshot.with_image(bitmap),
                    None => snapshot,
                }
            }
            (Err(e), Some(bitmap)) => {
                warn!("Page source unavailable, continuing with screenshot only: {}", e);
                ScreenSnapshot::new(Vec::<String>::new(), vec![])
                    .with_unavailable_elements(e.to_string())
                    .with_image(bitmap)
            }
            (Err(e), None) => return Err(e),
        };

        debug!(
            "Captured snapshot: {} texts, image: {}",
            snapshot.text_contents().len(),
            snapshot.image().is_some()
        );
        Ok(snapshot)
    }
}
