use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::{blob_status, error_response};
use crate::store::BlobStore;

/// Serves stored documents at the URLs the blob store hands out.
pub fn files_router<B>(blobs: Arc<B>) -> Router
where
    B: BlobStore + 'static,
{
    Router::new()
        .route("/api/files/:bucket/:id", get(download_handler::<B>))
        .with_state(blobs)
}

async fn download_handler<B>(
    State(blobs): State<Arc<B>>,
    Path((bucket, id)): Path<(String, String)>,
) -> Response
where
    B: BlobStore + 'static,
{
    match blobs.get(&bucket, &id) {
        Ok(Some(blob)) => {
            let disposition = format!("inline; filename=\"{}\"", blob.file_name.replace('"', ""));
            (
                [
                    (header::CONTENT_TYPE, blob.content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                blob.bytes,
            )
                .into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "file not found"),
        Err(err) => error_response(blob_status(&err), err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{buckets, BlobUpload, InMemoryBlobStore};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn stored_files_are_downloadable() {
        let blobs = Arc::new(InMemoryBlobStore::default());
        let reference = blobs
            .put(
                buckets::RECEIPTS,
                BlobUpload {
                    file_name: "teller.png".to_string(),
                    content_type: None,
                    bytes: vec![0x89, b'P', b'N', b'G'],
                },
            )
            .expect("stored");

        let response = files_router(blobs)
            .oneshot(
                Request::get(format!("/api/files/receipts/{}", reference.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        assert_eq!(&body[..], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn unknown_files_return_not_found() {
        let response = files_router(Arc::new(InMemoryBlobStore::default()))
            .oneshot(
                Request::get("/api/files/receipts/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
