//! MJPEG video feed route
//!
//! Unbounded multipart stream paced at a fixed frame interval. A failed
//! capture or encode skips one segment and the loop continues; the
//! stream only ends when the consumer disconnects and hyper drops it.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use camera_capture::encoder::{self, STREAM_BOUNDARY};

use crate::AppState;

/// Minimum delay between yielded frames (~30 fps)
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Stream the live camera feed as multipart JPEG segments
pub async fn video_feed(State(state): State<Arc<AppState>>) -> Response {
    let camera = state.camera.clone();

    let segments = stream! {
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            // The pacing sleep holds no lock.
            ticker.tick().await;

            let frame = match camera.read_frame().await {
                Ok(frame) => frame,
                Err(err) => {
                    warn!("Stream capture failed: {}", err);
                    continue;
                }
            };

            let Some(mut image) = frame.to_image() else {
                warn!("Dropping malformed frame {}", frame.sequence);
                continue;
            };
            encoder::annotate_status(&mut image);

            match encoder::encode_jpeg(&image) {
                Ok(jpeg) => yield Ok::<_, Infallible>(encoder::multipart_chunk(&jpeg)),
                Err(err) => warn!("Frame encoding failed: {}", err),
            }
        }
    };

    (
        [
            (
                header::CONTENT_TYPE,
                format!("multipart/x-mixed-replace; boundary={}", STREAM_BOUNDARY),
            ),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        Body::from_stream(segments),
    )
        .into_response()
}
