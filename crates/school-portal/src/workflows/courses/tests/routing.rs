use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::{Extension, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::courses::courses_router;

fn router(fixture: &Fixture) -> Router {
    courses_router(fixture.service.clone()).layer(Extension(admin_gate()))
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn create_request(payload: &Value, token: Option<&str>) -> Request<Body> {
    let mut request = Request::post("/api/courses").header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    request.body(Body::from(payload.to_string())).unwrap()
}

#[tokio::test]
async fn course_creation_is_admin_only() {
    let fixture = fixture();
    let payload = json!({
        "title": "Discrete Mathematics",
        "code": "mth112",
        "department": fixture.department.id,
        "semester": "Rain",
        "level": "100",
        "unit": 3,
    });

    let anonymous = router(&fixture)
        .oneshot(create_request(&payload, None))
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let created = router(&fixture)
        .oneshot(create_request(&payload, Some(ADMIN_TOKEN)))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let course = json_body(created).await;
    assert_eq!(course["code"], "MTH112");
    assert_eq!(course["level"], "100");
}

#[tokio::test]
async fn department_listing_honours_query_filters() {
    let fixture = fixture();
    course(&fixture, "CSC101", 3);
    let mut upper = new_course(&fixture.department, "CSC301", 2);
    upper.level = crate::workflows::courses::Level::L300;
    fixture.service.create_course(upper).expect("created");

    let uri = format!(
        "/api/courses/department/{}?level=300",
        fixture.department.id
    );
    let response = router(&fixture)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let courses = json_body(response).await;
    assert_eq!(courses.as_array().map(Vec::len), Some(1));
    assert_eq!(courses[0]["code"], "CSC301");
}

#[tokio::test]
async fn registration_round_trip_over_http() {
    let fixture = fixture();
    let intro = course(&fixture, "CSC101", 3);
    let student_id = fixture.student.id;

    let register = Request::put(format!("/api/students/register-courses/{student_id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "courseIds": [intro.id] }).to_string()))
        .unwrap();
    let response = router(&fixture)
        .oneshot(register)
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let student = json_body(response).await;
    assert_eq!(student["courses"], json!([intro.id]));

    let listing = router(&fixture)
        .oneshot(
            Request::get(format!("/api/students/courses/{student_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(json_body(listing).await[0]["code"], "CSC101");
}
