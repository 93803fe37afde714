// Chunked JSON streaming of render models
use crate::domain::dashboard::RenderModel;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast;

/// Create a chunked streaming response, one length-prefixed frame per model
pub async fn chunked_json_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = RenderModel> + Send + 'static,
{
    let byte_stream = stream.then(move |model| async move { serialize_chunk(&model, compress).await });

    let body = Body::from_stream(byte_stream);

    // Chunks are compressed individually, so no Content-Encoding on the response.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson-framed")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single render model to a `[u32 length][payload]` frame
pub async fn serialize_chunk(model: &RenderModel, compress: bool) -> Result<Bytes, std::io::Error> {
    let buffer = serde_json::to_vec(model)?;

    let payload = if compress {
        let cursor = std::io::Cursor::new(buffer);
        let mut encoder = BrotliEncoder::new(cursor);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await?;
        compressed
    } else {
        buffer
    };

    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Stream the current snapshot, then every model the presenter broadcasts
pub fn render_stream(
    initial: RenderModel,
    mut rx: broadcast::Receiver<RenderModel>,
) -> impl Stream<Item = RenderModel> + Send + 'static {
    async_stream::stream! {
        yield initial;
        loop {
            match rx.recv().await {
                Ok(model) => yield model,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Slow viewer skipped {} render models", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

/// Helper to create a streaming response from a presenter subscription
pub async fn stream_from_receiver(
    initial: RenderModel,
    rx: broadcast::Receiver<RenderModel>,
    compress: bool,
) -> impl IntoResponse {
    match chunked_json_stream(render_stream(initial, rx), compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
