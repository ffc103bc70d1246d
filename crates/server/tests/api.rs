use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{NewUser, Role};
use migration::MigratorTrait;

/// Builds the router plus a second engine handle over the same database for
/// seeding, with an administrator already in place.
async fn app_with_admin() -> (Router, engine::Engine) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let seed = engine::Engine::builder().database(db.clone()).build().unwrap();
    seed.create_user(
        NewUser {
            username: "root".to_string(),
            password: "rootpw".to_string(),
            role: Role::Administrator,
            tax_id: None,
            birth_date: None,
            address: None,
            phone: None,
        },
        true,
    )
    .await
    .unwrap();

    let engine = engine::Engine::builder().database(db).build().unwrap();
    (server::app(engine), seed)
}

fn request(method: &str, uri: &str, auth: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user, password)) = auth {
        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{user}:{password}"));
        builder = builder.header(header::AUTHORIZATION, format!("Basic {credentials}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn register_donate_and_distribute_end_to_end() {
    let (app, _seed) = app_with_admin().await;

    // Self-registration: a donor and a volunteer.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/register",
            None,
            Some(json!({
                "username": "alice",
                "password": "alicepw",
                "role": "donor",
                "tax_id": "52998224725",
                "birth_date": null,
                "address": "Main St 1",
                "phone": "11987654321"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/register",
            None,
            Some(json!({
                "username": "vera",
                "password": "verapw",
                "role": "volunteer",
                "tax_id": null,
                "birth_date": null,
                "address": null,
                "phone": null
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The volunteer is inactive until an administrator flips the switch.
    let (status, _) = send(&app, request("GET", "/stock", Some(("vera", "verapw")), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            "/users/vera/status",
            Some(("root", "rootpw")),
            Some(json!({ "active": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Admin seeds the registries.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/categories",
            Some(("root", "rootpw")),
            Some(json!({ "name": "Rice" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/locations",
            Some(("root", "rootpw")),
            Some(json!({ "name": "Warehouse" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let location_id = body["id"].as_str().unwrap().to_string();

    // The donor hands in 10 units of rice.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/donations",
            Some(("alice", "alicepw")),
            Some(json!({
                "location_id": location_id,
                "description": null,
                "items": [
                    { "category_id": category_id, "quantity": 10, "description": null }
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ids"].as_array().unwrap().len(), 1);

    // The volunteer sees the stock and registers a recipient.
    let (status, body) = send(&app, request("GET", "/stock", Some(("vera", "verapw")), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["levels"][0]["available"], json!(10));

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/recipients",
            Some(("vera", "verapw")),
            Some(json!({
                "name": "Shelter",
                "tax_id": "12345678000195",
                "address": "Main St 1",
                "phone": null
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let recipient_id = body["id"].as_str().unwrap().to_string();

    // Distribute 7 units.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/distributions",
            Some(("vera", "verapw")),
            Some(json!({
                "recipient_id": recipient_id,
                "items": [{ "category_id": category_id, "quantity": 7 }],
                "best_effort": null
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let granted: i64 = body["distributions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["quantity"].as_i64().unwrap())
        .sum();
    assert_eq!(granted, 7);

    let (status, body) = send(&app, request("GET", "/stock", Some(("vera", "verapw")), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["levels"][0]["available"], json!(3));

    // Strict over-request fails without touching the remaining stock.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/distributions",
            Some(("vera", "verapw")),
            Some(json!({
                "recipient_id": recipient_id,
                "items": [{ "category_id": category_id, "quantity": 5 }],
                "best_effort": null
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Best-effort drains what is left.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/distributions",
            Some(("vera", "verapw")),
            Some(json!({
                "recipient_id": recipient_id,
                "items": [{ "category_id": category_id, "quantity": 5 }],
                "best_effort": true
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let granted: i64 = body["distributions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["quantity"].as_i64().unwrap())
        .sum();
    assert_eq!(granted, 3);

    // Admin reads the report: everything donated shows up exactly once.
    let (status, body) = send(
        &app,
        request("GET", "/reports/donations", Some(("root", "rootpw")), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(10));

    let (status, body) = send(&app, request("GET", "/stats", Some(("root", "rootpw")), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!(3));
}

#[tokio::test]
async fn role_guards_reject_the_wrong_actor() {
    let (app, seed) = app_with_admin().await;

    seed.create_user(
        NewUser {
            username: "alice".to_string(),
            password: "alicepw".to_string(),
            role: Role::Donor,
            tax_id: None,
            birth_date: None,
            address: None,
            phone: None,
        },
        true,
    )
    .await
    .unwrap();

    // Donors cannot see stock or distribute.
    let (status, _) = send(&app, request("GET", "/stock", Some(("alice", "alicepw")), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Volunteers and donors cannot touch the admin surface.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/categories",
            Some(("alice", "alicepw")),
            Some(json!({ "name": "Rice" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Administrators cannot register donations.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/donations",
            Some(("root", "rootpw")),
            Some(json!({
                "location_id": "00000000-0000-0000-0000-000000000000",
                "description": null,
                "items": []
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Bad credentials never get through.
    let (status, _) = send(&app, request("GET", "/stock", Some(("alice", "wrong")), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Missing credentials are a client error.
    let (status, _) = send(&app, request("GET", "/stock", None, None)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn admins_cannot_delete_themselves() {
    let (app, _seed) = app_with_admin().await;

    let (status, body) = send(
        &app,
        request("DELETE", "/users/root", Some(("root", "rootpw")), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("Forbidden: cannot delete yourself"));
}
