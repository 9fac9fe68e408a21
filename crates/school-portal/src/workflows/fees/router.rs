use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use super::domain::{Fee, NewFee, PaidStudent, Payment, PaymentSubmission, VerifyRequest};
use super::repository::{FeeRepository, PaymentRepository};
use super::service::{FeeService, FeeServiceError};
use crate::http::{read_form, AdminSession};
use crate::ids::{FeeId, PaymentId, StudentId};
use crate::store::BlobStore;
use crate::workflows::students::{Student, StudentRepository};

type Shared<S, B> = State<Arc<FeeService<S, B>>>;

/// Router exposing the fee catalog and payment endpoints.
///
/// `/api/fees/:id/...` carries a fee id for the admin reports and a student id for `pay` and
/// `payments`.
pub fn fees_router<S, B>(service: Arc<FeeService<S, B>>) -> Router
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    Router::new()
        .route(
            "/api/fees",
            post(create_fee_handler::<S, B>).get(list_fees_handler::<S, B>),
        )
        .route("/api/fees/payments", get(list_payments_handler::<S, B>))
        .route(
            "/api/fees/verify/:payment_id",
            put(verify_handler::<S, B>),
        )
        .route("/api/fees/:id/paid", get(paid_handler::<S, B>))
        .route("/api/fees/:id/unpaid", get(unpaid_handler::<S, B>))
        .route("/api/fees/:id/roster", get(roster_handler::<S, B>))
        .route("/api/fees/:id/pay", post(pay_handler::<S, B>))
        .route(
            "/api/fees/:id/payments",
            get(student_payments_handler::<S, B>),
        )
        .route(
            "/api/students/:student_id/fees/:fee_id/approve",
            put(approve_fee_handler::<S, B>),
        )
        .with_state(service)
}

pub(crate) async fn create_fee_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
    Json(request): Json<NewFee>,
) -> Result<(StatusCode, Json<Fee>), FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    let fee = service.create_fee(request)?;
    Ok((StatusCode::CREATED, Json(fee)))
}

pub(crate) async fn list_fees_handler<S, B>(
    State(service): Shared<S, B>,
) -> Result<Json<Vec<Fee>>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.list_fees().map(Json)
}

pub(crate) async fn list_payments_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
) -> Result<Json<Vec<Payment>>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.list_payments().map(Json)
}

pub(crate) async fn verify_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
    Path(payment_id): Path<PaymentId>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<Payment>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.verify(&payment_id, &request.status).map(Json)
}

pub(crate) async fn paid_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
    Path(fee_id): Path<FeeId>,
) -> Result<Json<Vec<PaidStudent>>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.paid_students(&fee_id).map(Json)
}

pub(crate) async fn unpaid_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
    Path(fee_id): Path<FeeId>,
) -> Result<Json<Vec<Student>>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.unpaid_students(&fee_id).map(Json)
}

pub(crate) async fn roster_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
    Path(fee_id): Path<FeeId>,
) -> Result<Response, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    let csv = service.roster(&fee_id)?;
    let disposition = format!("attachment; filename=\"fee-{fee_id}-roster.csv\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

pub(crate) async fn pay_handler<S, B>(
    State(service): Shared<S, B>,
    Path(student_id): Path<StudentId>,
    multipart: Multipart,
) -> Response
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };

    match service.pay(&student_id, PaymentSubmission::from_form(form)) {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn student_payments_handler<S, B>(
    State(service): Shared<S, B>,
    Path(student_id): Path<StudentId>,
) -> Result<Json<Vec<Payment>>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.student_payments(&student_id).map(Json)
}

pub(crate) async fn approve_fee_handler<S, B>(
    _admin: AdminSession,
    State(service): Shared<S, B>,
    Path((student_id, fee_id)): Path<(StudentId, FeeId)>,
) -> Result<Json<Payment>, FeeServiceError>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    service.approve_fee_payment(&student_id, &fee_id).map(Json)
}
