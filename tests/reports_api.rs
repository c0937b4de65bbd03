use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use httpmock::prelude::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use reports_backend::{
    build_router,
    config::{AppState, Settings},
    models::auth::{Claims, Role},
    upstream::UpstreamRepository,
};

const SECRET: &str = "segredo-de-teste";

fn token(role: Role, branch_id: Option<i64>, student_id: Option<i64>) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "usuario.teste".to_string(),
        role,
        branch_id,
        student_id,
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_ref())).unwrap()
}

// API de origem simulada. Devolve tudo sem filtrar: o recorte local é quem protege.
async fn upstream(payments_status: u16) -> MockServer {
    upstream_expecting(payments_status, None).await
}

// `students_branch` exige que a consulta de alunos chegue com `?branchId=`
async fn upstream_expecting(payments_status: u16, students_branch: Option<i64>) -> MockServer {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/branches");
            then.status(200).json_body(json!([
                { "id": 1, "code": "CEN", "name": "Centro", "isMain": true },
                { "id": 2, "code": "NOR", "name": "Norte" }
            ]));
        })
        .await;
    server
        .mock_async(move |when, then| {
            let mut when = when.method(GET).path("/students");
            if let Some(branch_id) = students_branch {
                when = when.query_param("branchId", branch_id.to_string());
            }
            then.status(200).json_body(json!([
                { "id": 1, "firstName": "Laura", "lastName": "Gómez", "documentNumber": "111", "active": true, "branchId": 1 },
                { "id": 2, "firstName": "Andrés", "lastName": "Ruiz", "documentNumber": "222", "active": true, "branchId": 2 }
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/courses");
            then.status(200).json_body(json!([
                { "id": 1, "name": "Licencia B1", "price": 1000000, "totalHours": 40, "active": true }
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/enrollments");
            then.status(200).json_body(json!([
                { "id": 10, "studentId": 1, "courseId": 1, "enrollmentDate": "2024-03-01", "totalAmount": 1000000, "paidAmount": 400000, "active": true },
                { "id": 11, "studentId": 2, "courseId": 1, "enrollmentDate": "2024-04-01", "totalAmount": 800000, "paidAmount": 0, "active": true }
            ]));
        })
        .await;
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/payments");
            then.status(payments_status).json_body(json!([
                { "id": 100, "enrollmentId": 10, "amount": 400000, "paymentDate": "2024-03-20T10:30:00", "type": "ABONO", "status": "CONFIRMADO", "paymentMethodName": "Efectivo" },
                { "id": 101, "enrollmentId": 11, "amount": 50000, "paymentDate": "2024-04-02T09:00:00", "type": "ABONO", "status": "ANULADO", "paymentMethodName": "Transferencia" }
            ]));
        })
        .await;

    server
}

fn app(server: &MockServer) -> Router {
    let settings = Settings {
        upstream_api_url: server.base_url(),
        jwt_secret: SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        upstream_timeout: Duration::from_secs(5),
    };
    let source = UpstreamRepository::new(&settings.upstream_api_url, settings.upstream_timeout).unwrap();
    build_router(AppState::from_parts(settings, Arc::new(source)))
}

async fn get(app: Router, uri: &str, headers: &[(&str, String)]) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, value);
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn bearer(token: String) -> (&'static str, String) {
    ("authorization", format!("Bearer {token}"))
}

#[tokio::test]
async fn health_needs_no_token() {
    let server = upstream(200).await;

    let response = app(&server)
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_rejected_in_callers_language() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/dashboard",
        &[("accept-language", "pt-BR,pt;q=0.9".to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
}

#[tokio::test]
async fn admin_sees_only_own_branch_debt() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/students-with-debt",
        &[bearer(token(Role::Admin, Some(1), None)), ("x-branch-id", "2".to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let debts = body.as_array().unwrap();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0]["studentId"], 1);
    assert_eq!(debts[0]["studentName"], "Laura Gómez");
    assert_eq!(debts[0]["totalDebt"].as_f64(), Some(600000.0));
}

#[tokio::test]
async fn super_admin_selection_is_forwarded_upstream() {
    // Sem `?branchId=2` a consulta de alunos cai em 404 e a lista sairia vazia
    let server = upstream_expecting(200, Some(2)).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/students-with-debt",
        &[bearer(token(Role::SuperAdmin, None, None)), ("x-branch-id", "2".to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["studentId"], 2);
    assert_eq!(body[0]["totalDebt"].as_f64(), Some(800000.0));
}

#[tokio::test]
async fn failed_collection_still_renders_dashboard() {
    let server = upstream(500).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/dashboard",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalPayments"], 0);
    assert_eq!(body["stats"]["totalEnrollments"], 2);
    assert_eq!(body["stats"]["pendingAmount"].as_f64(), Some(1400000.0));
    assert_eq!(body["recentPayments"], json!([]));
}

#[tokio::test]
async fn voided_payment_stays_out_of_revenue() {
    let server = upstream(200).await;

    let (_, body) = get(
        app(&server),
        "/api/reports/dashboard",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(body["stats"]["totalPayments"], 1);
    assert_eq!(body["stats"]["totalRevenue"].as_f64(), Some(400000.0));
}

#[tokio::test]
async fn progress_outside_scope_is_not_found() {
    let server = upstream(200).await;
    let admin = token(Role::Admin, Some(1), None);

    let (status, body) = get(
        app(&server),
        "/api/reports/enrollments/10/progress",
        &[bearer(admin.clone())],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["percent"], 40);

    let (status, body) = get(
        app(&server),
        "/api/reports/enrollments/11/progress",
        &[bearer(admin), ("accept-language", "es".to_string())],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Matrícula no encontrada.");
}

#[tokio::test]
async fn monthly_income_validates_year() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/monthly-income?year=1999",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["year"].is_array());
}

#[tokio::test]
async fn monthly_income_for_selected_branch() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/monthly-income?year=2024&branchId=1",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["month"], "Marzo");
    assert_eq!(rows[0]["branchName"], "Centro");
    assert_eq!(rows[0]["totalPaid"].as_f64(), Some(400000.0));
    assert_eq!(body["summary"]["bestMonth"]["month"], "Marzo 2024");
}

#[tokio::test]
async fn invalid_branch_header_is_bad_request() {
    let server = upstream(200).await;

    let (status, _) = get(
        app(&server),
        "/api/session",
        &[bearer(token(Role::SuperAdmin, None, None)), ("x-branch-id", "centro".to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_reports_capabilities() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/session",
        &[bearer(token(Role::Student, Some(1), Some(1)))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"]["role"], "STUDENT");
    assert_eq!(body["scope"]["studentId"], 1);
    assert_eq!(body["capabilities"]["canSelectBranch"], false);
}

#[tokio::test]
async fn payment_listing_is_filtered_and_paginated() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/listings/payments?search=laura&perPage=5",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["perPage"], 5);
    assert_eq!(body["items"][0]["enrollmentLabel"], "Laura Gómez - Licencia B1");
    assert_eq!(body["items"][0]["type"], "ABONO");
}

#[tokio::test]
async fn student_sees_only_own_enrollments() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/listings/enrollments",
        &[bearer(token(Role::Student, Some(2), Some(2)))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], 11);
    assert_eq!(body["items"][0]["progress"]["percent"], 0);
}

#[tokio::test]
async fn monthly_query_branch_overrides_selector() {
    // Alunos só respondem com `?branchId=2`; o seletor aponta para a sede 1
    let server = upstream_expecting(200, Some(2)).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/monthly-income?year=2024&branchId=2",
        &[bearer(token(Role::SuperAdmin, None, None)), ("x-branch-id", "1".to_string())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branchId"], 2);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["month"], "Abril");
    assert_eq!(rows[0]["branchName"], "Norte");
    assert_eq!(rows[0]["totalSales"].as_f64(), Some(800000.0));
}

#[tokio::test]
async fn global_monthly_income_has_a_row_per_branch() {
    let server = upstream(200).await;

    let (status, body) = get(
        app(&server),
        "/api/reports/monthly-income?year=2024",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branchId"], Value::Null);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0]["month"].as_str(), rows[0]["branchId"].as_i64()), (Some("Abril"), Some(2)));
    assert_eq!(rows[0]["branchName"], "Norte");
    assert_eq!((rows[1]["month"].as_str(), rows[1]["branchId"].as_i64()), (Some("Marzo"), Some(1)));
    assert_eq!(rows[1]["branchName"], "Centro");
}

#[tokio::test]
async fn malformed_payment_does_not_hide_the_rest() {
    let server = MockServer::start_async().await;
    for (path, body) in [
        ("/branches", json!([])),
        ("/students", json!([])),
        ("/courses", json!([])),
        ("/enrollments", json!([])),
        (
            "/payments",
            json!([
                { "id": 100, "enrollmentId": 10, "amount": 400000, "paymentDate": "2024-03-20T10:30:00", "type": "ABONO", "status": "CONFIRMADO", "paymentMethodName": "Efectivo" },
                { "id": 101, "enrollmentId": 10, "amount": 90000, "paymentDate": "2024-03-21T10:30:00", "type": "ABONO", "status": null, "paymentMethodName": "Efectivo" }
            ]),
        ),
    ] {
        server
            .mock_async(move |when, then| {
                when.method(GET).path(path);
                then.status(200).json_body(body);
            })
            .await;
    }

    let (status, body) = get(
        app(&server),
        "/api/reports/dashboard",
        &[bearer(token(Role::SuperAdmin, None, None))],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalPayments"], 1);
    assert_eq!(body["stats"]["totalRevenue"].as_f64(), Some(400000.0));
}
