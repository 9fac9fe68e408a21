use std::collections::BTreeMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::error_response;
use crate::store::BlobUpload;

/// Multipart body split into text fields and file parts, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: BTreeMap<String, String>,
    pub files: BTreeMap<String, BlobUpload>,
}

#[derive(Debug)]
pub struct MultipartRejection(MultipartError);

impl IntoResponse for MultipartRejection {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let status = if status.is_server_error() {
            StatusCode::BAD_REQUEST
        } else {
            status
        };
        error_response(status, self.0.body_text())
    }
}

impl From<MultipartError> for MultipartRejection {
    fn from(error: MultipartError) -> Self {
        Self(error)
    }
}

/// Drain a multipart request. Parts with a file name become uploads; a file input left empty by
/// the browser (no name, no bytes) is skipped.
pub async fn read_form(mut multipart: Multipart) -> Result<MultipartForm, MultipartRejection> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    BlobUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            }
            None => {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
