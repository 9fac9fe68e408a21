use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{Applicant, ApplicationDocuments, ApplicationForm};
use super::repository::ApplicantRepository;
use super::service::{AdmissionService, AdmissionServiceError};
use crate::http::{read_form, AdminSession};
use crate::ids::ApplicantId;
use crate::store::BlobStore;
use crate::workflows::academics::AcademicRepository;
use crate::workflows::students::StudentRepository;

type Shared<S, B> = State<Arc<AdmissionService<S, B>>>;

/// Router exposing intake, status lookup, and the review endpoints.
pub fn admissions_router<S, B>(service: Arc<AdmissionService<S, B>>) -> Router
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    Router::new()
        .route("/api/admissions/apply", post(apply_handler::<S, B>))
        .route("/api/admissions/status/:email", get(status_handler::<S, B>))
        .route("/api/admissions", get(list_handler::<S, B>))
        .route(
            "/api/admissions/:applicant_id/accept",
            patch(accept_handler::<S, B>),
        )
        .route(
            "/api/admissions/:applicant_id/reject",
            patch(reject_handler::<S, B>),
        )
        .with_state(service)
}

pub(crate) async fn apply_handler<S, B>(
    State(service): Shared<S, B>,
    multipart: Multipart,
) -> Response
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };

    let application = ApplicationForm::from_fields(form.fields);
    let documents = ApplicationDocuments::from_files(form.files);

    match service.submit(application, documents) {
        Ok(applicant) => {
            let payload = json!({
                "message": "Application submitted successfully",
                "applicant": applicant,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn status_handler<S, B>(
    State(service): Shared<S, B>,
    Path(email): Path<String>,
) -> Result<Json<Applicant>, AdmissionServiceError>
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    service.check_status(&email).map(Json)
}

pub(crate) async fn list_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
) -> Result<Json<Vec<Applicant>>, AdmissionServiceError>
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    service.list_applicants().map(Json)
}

pub(crate) async fn accept_handler<S, B>(
    admin: AdminSession,
    State(service): Shared<S, B>,
    Path(applicant_id): Path<ApplicantId>,
) -> Result<Json<serde_json::Value>, AdmissionServiceError>
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    let student = service.approve(&applicant_id, &admin.reviewer)?;
    Ok(Json(json!({
        "message": "Application accepted",
        "student": student,
    })))
}

pub(crate) async fn reject_handler<S, B>(
    admin: AdminSession,
    State(service): Shared<S, B>,
    Path(applicant_id): Path<ApplicantId>,
) -> Result<Json<serde_json::Value>, AdmissionServiceError>
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    service.reject(&applicant_id, &admin.reviewer)?;
    Ok(Json(json!({ "message": "Application rejected" })))
}
