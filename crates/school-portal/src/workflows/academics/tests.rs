use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Extension;
use tower::ServiceExt;

use super::*;
use crate::config::AdminConfig;
use crate::http::AdminGate;
use crate::ids::FacultyId;
use crate::store::{InMemoryRecordStore, RepositoryError, UniqueKey};

fn service() -> AcademicsService<InMemoryRecordStore> {
    AcademicsService::new(Arc::new(InMemoryRecordStore::new()))
}

fn unit(name: &str, code: &str) -> NewUnit {
    NewUnit {
        name: name.to_string(),
        code: code.to_string(),
    }
}

#[test]
fn departments_are_grouped_under_their_faculty() {
    let service = service();
    let science = service
        .create_faculty(unit("Science", "sci"))
        .expect("faculty created");
    assert_eq!(science.code, "SCI");

    let computing = service
        .add_department(&science.id, unit("Computer Science", "csc"))
        .expect("department created");
    service
        .create_department(NewDepartment {
            name: "General Studies".to_string(),
            code: "GST".to_string(),
            faculty: None,
        })
        .expect("standalone department");

    let grouped = service
        .faculty_departments(&science.id)
        .expect("faculty exists");
    assert_eq!(grouped.faculty, "Science");
    assert_eq!(grouped.departments, vec![computing]);
    assert_eq!(service.list_departments().expect("listable").len(), 2);
}

#[test]
fn unknown_faculty_and_blank_fields_are_refused() {
    let service = service();
    assert!(matches!(
        service.add_department(&FacultyId::new(), unit("Physics", "PHY")),
        Err(AcademicsServiceError::FacultyNotFound)
    ));
    assert!(matches!(
        service.faculty_departments(&FacultyId::new()),
        Err(AcademicsServiceError::FacultyNotFound)
    ));

    let err = service
        .create_faculty(unit("   ", "ART"))
        .expect_err("name required");
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn duplicate_codes_conflict() {
    let service = service();
    service
        .create_faculty(unit("Arts", "ART"))
        .expect("first faculty");
    let err = service
        .create_faculty(unit("Fine Arts", " art "))
        .expect_err("code already used");
    assert!(matches!(
        err,
        AcademicsServiceError::Repository(RepositoryError::Conflict(UniqueKey::FacultyCode))
    ));
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn catalog_writes_need_an_admin_token() {
    let gate = AdminGate::new(AdminConfig {
        email: "admin@demo.com".to_string(),
        password: "admin".to_string(),
        token: "catalog-token".to_string(),
        reviewer: "registrar".to_string(),
    });
    let router = academics_router(Arc::new(service())).layer(Extension(gate));
    let create = |token: Option<&str>| {
        let mut request = Request::post("/api/faculties")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request
            .body(Body::from(r#"{"name":"Law","code":"law"}"#))
            .unwrap()
    };

    let anonymous = router
        .clone()
        .oneshot(create(None))
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let created = router
        .clone()
        .oneshot(create(Some("catalog-token")))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);

    let listing = router
        .oneshot(Request::get("/api/faculties").body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(listing.status(), StatusCode::OK);
    let body = axum::body::to_bytes(listing.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let faculties: Vec<Faculty> = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(faculties.len(), 1);
    assert_eq!(faculties[0].code, "LAW");
}
