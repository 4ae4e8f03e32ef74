//! HTTP upload surface.
//!
//! A small `axum` application: `GET /` serves the embedded upload page,
//! `POST /commentary` accepts a multipart video upload, runs the pipeline,
//! and returns the rendered report as plain text. One request is processed
//! fully synchronously end to end — sampling, then one sequential API call
//! per frame.

use std::{io::Write, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::{error::PlaycallError, pipeline::Commentator, sampler::SampledFrame};

/// Uploads beyond this size are rejected outright; the expected input is a
/// short clip, not a full broadcast.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

const UPLOAD_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>playcall</title>
  <style>
    body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    textarea { width: 100%; min-height: 20rem; font-family: monospace; }
    button { margin-left: 0.5rem; }
  </style>
</head>
<body>
  <h1>playcall</h1>
  <p>Upload a short video clip (5&ndash;10 seconds, MP4) and get sports-style AI commentary.</p>
  <form id="upload">
    <input type="file" name="video" accept="video/mp4" required>
    <button type="submit">Commentate</button>
  </form>
  <h2>Commentary</h2>
  <textarea id="output" readonly placeholder="The play-by-play shows up here."></textarea>
  <script>
    const form = document.getElementById('upload');
    const output = document.getElementById('output');
    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      output.value = 'Generating commentary…';
      try {
        const response = await fetch('/commentary', {
          method: 'POST',
          body: new FormData(form),
        });
        output.value = await response.text();
      } catch (error) {
        output.value = 'Request failed: ' + error;
      }
    });
  </script>
</body>
</html>
"#;

/// Shared application state.
#[derive(Clone)]
struct AppState {
    commentator: Arc<Commentator>,
}

/// Build the application router.
pub fn router(commentator: Arc<Commentator>) -> Router {
    Router::new()
        .route("/", get(upload_page))
        .route("/commentary", post(commentary))
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(AppState { commentator })
}

/// Bind and serve until the process is stopped.
///
/// # Errors
///
/// Returns [`PlaycallError::Io`] if the listener cannot bind or the server
/// loop fails.
pub async fn serve(addr: SocketAddr, commentator: Arc<Commentator>) -> Result<(), PlaycallError> {
    let app = router(commentator);
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

/// `POST /commentary` — the upload-to-report path.
async fn commentary(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    // Pull the uploaded clip out of the form data.
    let mut payload: Option<Vec<u8>> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("video") {
                    match field.bytes().await {
                        Ok(bytes) => {
                            payload = Some(bytes.to_vec());
                            break;
                        }
                        Err(error) => {
                            log::warn!("failed to read upload: {error}");
                            return (StatusCode::BAD_REQUEST, "failed to read upload")
                                .into_response();
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(error) => {
                log::warn!("malformed multipart body: {error}");
                return (StatusCode::BAD_REQUEST, "malformed multipart body").into_response();
            }
        }
    }

    let Some(payload) = payload else {
        return (StatusCode::BAD_REQUEST, "missing `video` upload field").into_response();
    };
    log::debug!("received {} byte upload", payload.len());

    // Stage 1 runs on the blocking pool: FFmpeg decoding is CPU-bound. The
    // temp file lives exactly as long as the sampling pass needs it.
    let commentator = state.commentator.clone();
    let sampled = tokio::task::spawn_blocking(move || -> Result<Vec<SampledFrame>, PlaycallError> {
        let mut clip_file = tempfile::Builder::new()
            .prefix("playcall-")
            .suffix(".mp4")
            .tempfile()?;
        clip_file.write_all(&payload)?;
        clip_file.flush()?;
        commentator.sample_clip(clip_file.path())
    })
    .await;

    let frames = match sampled {
        Ok(Ok(frames)) => frames,
        Ok(Err(error)) => {
            log::error!("sampling failed: {error}");
            return (StatusCode::BAD_GATEWAY, "commentary generation failed").into_response();
        }
        Err(error) => {
            log::error!("sampling task panicked: {error}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
        }
    };

    // Stages 2 and 3: sequential API calls, then assembly. An empty frame
    // list renders as an empty report.
    match state.commentator.narrate(&frames).await {
        Ok(report) => (StatusCode::OK, report.render()).into_response(),
        Err(error) => {
            log::error!("commentary request failed: {error}");
            (StatusCode::BAD_GATEWAY, "commentary generation failed").into_response()
        }
    }
}
