//! Async task management for non-blocking API operations.
//!
//! Network work runs in background tasks that report back through a channel:
//! 1. A UI action asks `TaskSpawner` for work (a search, a download)
//! 2. `TaskSpawner` spawns a tokio task holding a clone of the sender
//! 3. The main loop keeps rendering and handling input
//! 4. The task sends an `ApiMessage` when done
//! 5. The main loop drains the channel with `try_recv()` and updates state
//!
//! Tag lookups are the exception: they are handed to the autocomplete's
//! debouncer as a future, so the spawner only builds them.

use std::future::Future;

use image::DynamicImage;
use tokio::sync::mpsc;
use tracing::{debug, debug_span, warn, Instrument};

use crate::api::{ApiError, BooruClient, Post, Tag};
use crate::autocomplete::LookupRequest;
use crate::navigation::SearchParams;

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Suggestions for one autocomplete lookup
    TagsFetched {
        request: LookupRequest,
        result: Result<Vec<Tag>, String>,
    },

    /// Posts for a search
    PostsFetched {
        params: SearchParams,
        result: Result<Vec<Post>, ApiError>,
    },

    /// Decoded preview image for a post
    ImageFetched {
        post_id: u64,
        result: Result<DynamicImage, ApiError>,
    },
}

/// Spawns background tasks for async operations.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Build the lookup for `request` without running it.
    ///
    /// The returned future sends `ApiMessage::TagsFetched` when it completes.
    pub fn tag_lookup(
        &self,
        client: &BooruClient,
        request: LookupRequest,
        limit: u32,
    ) -> impl Future<Output = ()> + Send + 'static {
        let tx = self.tx.clone();
        let client = client.clone();
        let span = debug_span!("tag_lookup", id = request.id, token = %request.token);
        async move {
            debug!("Running tag lookup");
            let result = client
                .lookup_tags(&request.token, limit)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::TagsFetched { request, result });
        }
        .instrument(span)
    }

    /// Spawn a task to search posts with `params`.
    pub fn spawn_search_posts(&self, client: &BooruClient, params: SearchParams) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.search_posts(&params).await;
            let _ = tx.send(ApiMessage::PostsFetched { params, result });
        });
    }

    /// Spawn a task to download and decode the image at `url`.
    ///
    /// Decoding runs on the blocking pool.
    pub fn spawn_fetch_image(&self, client: &BooruClient, post_id: u64, url: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        let span = debug_span!("fetch_image", post_id);
        tokio::spawn(
            async move {
                let result = match client.fetch_image(&url).await {
                    Ok(bytes) => decode_image(bytes).await,
                    Err(e) => {
                        warn!("Image download failed: {}", e);
                        Err(e)
                    }
                };
                let _ = tx.send(ApiMessage::ImageFetched { post_id, result });
            }
            .instrument(span),
        );
    }
}

async fn decode_image(bytes: Vec<u8>) -> Result<DynamicImage, ApiError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Create a new task channel and spawner.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    #[tokio::test]
    async fn test_decode_image_png() {
        let mut bytes = Vec::new();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(bytes).await.unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[tokio::test]
    async fn test_decode_image_garbage() {
        let result = decode_image(b"not an image".to_vec()).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_tag_lookup_reports_failure_with_request() {
        let (mut rx, spawner) = create_task_channel();
        // Nothing listens on port 1.
        let client = BooruClient::new("http://127.0.0.1:1").unwrap();
        let request = LookupRequest {
            id: 7,
            token: "cat".to_string(),
        };

        spawner.tag_lookup(&client, request.clone(), 10).await;

        match rx.recv().await {
            Some(ApiMessage::TagsFetched { request: got, result }) => {
                assert_eq!(got, request);
                assert!(result.is_err());
            }
            other => panic!("Expected TagsFetched, got {:?}", other),
        }
    }
}
