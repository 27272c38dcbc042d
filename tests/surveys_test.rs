mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;

use common::{body_json, TestApp};

const BOUNDARY: &str = "------------------------survey-test-boundary";

/// Builds a multipart/form-data body from text fields and an optional file.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn submit(app: &TestApp, body: Vec<u8>) -> (StatusCode, Value) {
    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/api/encuestas")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn survey_without_score_is_rejected_and_not_stored() {
    let app = TestApp::spawn().await;

    let (status, _) = submit(
        &app,
        multipart_body(&[("comentario", "sin puntuacion")], None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let cookie = app.login().await;
    let listing = body_json(app.authed_get("/api/admin/encuestas", &cookie).await).await;
    assert_eq!(listing["encuestas"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn survey_submission_coerces_recommendation_flag() {
    let app = TestApp::spawn().await;

    let (status, created) = submit(
        &app,
        multipart_body(
            &[
                ("email", "ana@example.com"),
                ("comentario", "Muy bueno"),
                ("recomendar", "on"),
                ("puntuacion", "9"),
            ],
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["ok"], true);
    assert_eq!(created["encuesta"]["puntuacion"], 9);
    assert_eq!(created["encuesta"]["recomendar"], true);

    let (status, created) = submit(
        &app,
        multipart_body(&[("recomendar", "off"), ("puntuacion", "2")], None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["encuesta"]["recomendar"], false);

    let cookie = app.login().await;
    let listing = body_json(app.authed_get("/api/admin/encuestas", &cookie).await).await;
    assert_eq!(listing["encuestas"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn survey_image_is_stored_and_referenced() {
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let dir_path = upload_dir.path().to_str().unwrap().to_string();
    let app = TestApp::spawn_with_config(|cfg| cfg.upload_dir = dir_path).await;

    let (status, created) = submit(
        &app,
        multipart_body(
            &[("puntuacion", "7")],
            Some(("imagen", "foto.png", b"not-really-a-png")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let imagen = created["encuesta"]["imagen"].as_str().expect("image path");
    assert!(imagen.starts_with("/public/images/"));
    assert!(imagen.ends_with(".png"));

    let stored = std::fs::read_dir(upload_dir.path()).unwrap().count();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn non_image_upload_is_rejected_and_not_stored() {
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let dir_path = upload_dir.path().to_str().unwrap().to_string();
    let app = TestApp::spawn_with_config(|cfg| cfg.upload_dir = dir_path).await;

    let (status, _) = submit(
        &app,
        multipart_body(
            &[("puntuacion", "7")],
            Some(("imagen", "payload.exe", b"MZ-not-an-image")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(std::fs::read_dir(upload_dir.path()).unwrap().count(), 0);

    let cookie = app.login().await;
    let listing = body_json(app.authed_get("/api/admin/encuestas", &cookie).await).await;
    assert_eq!(listing["encuestas"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn survey_listing_filters_by_submission_date() {
    let app = TestApp::spawn().await;

    let (status, _) = submit(&app, multipart_body(&[("puntuacion", "5")], None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let cookie = app.login().await;

    let listing = body_json(
        app.authed_get("/api/admin/encuestas?desde=2000-01-01&hasta=2000-01-31", &cookie)
            .await,
    )
    .await;
    assert_eq!(listing["encuestas"].as_array().unwrap().len(), 0);

    let today = chrono::Utc::now().date_naive();
    let uri = format!("/api/admin/encuestas?desde=2000-01-01&hasta={}", today);
    let listing = body_json(app.authed_get(&uri, &cookie).await).await;
    assert_eq!(listing["encuestas"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_range_score_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = submit(&app, multipart_body(&[("puntuacion", "11")], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
