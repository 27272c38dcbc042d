mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::{body_json, seed_product, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn product_crud_roundtrip() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    let response = app
        .authed_json(
            "POST",
            "/api/productos",
            &cookie,
            json!({
                "titulo": "El Aleph",
                "tipo": "libro",
                "descripcion": "Cuentos",
                "precio": "15.50"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["titulo"], "El Aleph");
    assert_eq!(created["estado"], true);
    let id = created["id"].as_i64().unwrap();

    let fetched = body_json(app.get(&format!("/api/productos/{}", id)).await).await;
    assert_eq!(fetched["tipo"], "libro");

    let response = app
        .authed_json(
            "PUT",
            &format!("/api/productos/{}", id),
            &cookie,
            json!({ "titulo": "El Aleph (2a ed.)", "tipo": "libro", "precio": "18.00" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["titulo"], "El Aleph (2a ed.)");

    let response = app
        .authed_json("DELETE", &format!("/api/productos/{}", id), &cookie, json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let deactivated = body_json(response).await;
    assert_eq!(deactivated["estado"], false);

    let response = app
        .authed_json(
            "PUT",
            &format!("/api/productos/{}/activar", id),
            &cookie,
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let reactivated = body_json(response).await;
    assert_eq!(reactivated["estado"], true);
}

#[tokio::test]
async fn product_validation_rejects_bad_payloads() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    for body in [
        json!({ "titulo": "", "tipo": "libro", "precio": "10.00" }),
        json!({ "titulo": "X", "tipo": "revista", "precio": "10.00" }),
        json!({ "titulo": "X", "tipo": "libro", "precio": "0" }),
    ] {
        let response = app.authed_json("POST", "/api/productos", &cookie, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn product_listing_paginates_and_filters() {
    let app = TestApp::spawn().await;
    for i in 0..3 {
        seed_product(&app, &format!("Libro {}", i), "libro", "10.00").await;
    }
    seed_product(&app, "Una Peli", "pelicula", "12.00").await;

    let page = body_json(app.get("/api/productos?page=1&limit=2").await).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["totalItems"], 4);
    assert_eq!(page["totalPages"], 2);

    let filtered = body_json(app.get("/api/productos?tipo=pelicula").await).await;
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["data"][0]["titulo"], "Una Peli");
}

#[tokio::test]
async fn missing_product_returns_404() {
    let app = TestApp::spawn().await;
    let response = app.get("/api/productos/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/admin/login",
            json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_json(
            "/admin/login",
            json!({ "email": "nobody@test.local", "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    let response = app
        .request(
            axum::http::Request::builder()
                .method("POST")
                .uri("/admin/logout")
                .header(header::COOKIE, &cookie)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.authed_get("/api/registros/estadisticas", &cookie).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_admin_email_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/usuarios",
            json!({ "nombre": "Otro", "email": ADMIN_EMAIL, "password": "abcd" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/api/usuarios",
            json!({ "nombre": "Otro", "email": "otro@test.local", "password": "abcd" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["email"], "otro@test.local");
    assert!(created.get("passwordHash").is_none());
}
