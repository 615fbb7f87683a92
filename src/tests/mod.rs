mod listing;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
};
use rotibank_backend::{account::Role, config::Config, store::mem::MemStore};
use serde::Serialize;
use tower::util::ServiceExt;

/// Router over a fresh in-memory store.
fn app() -> axum::Router {
    crate::router(crate::Global::new(
        Arc::new(MemStore::open(None).unwrap()),
        Config::ephemeral(),
    ))
}

/// Sends a POST request and returns the status with the json body,
/// `Null` if the body is empty.
async fn call<T: Serialize>(
    app: &axum::Router,
    uri: &str,
    auth: Option<&(u64, String)>,
    body: &T,
) -> (StatusCode, serde_json::Value) {
    let mut req = Request::builder()
        .uri(uri)
        .method("POST")
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some((id, token)) = auth {
        req = req
            .header("AccountId", id.to_string())
            .header("Token", token.as_str());
    }

    let res = app
        .clone()
        .oneshot(req.body(Body::from(serde_json::to_vec(body).unwrap())).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers an account and logs it in, returning its id and token.
async fn signup(app: &axum::Router, email: &str, role: Role) -> (u64, String) {
    let (status, _) = call(
        app,
        "/api/account/register",
        None,
        &serde_json::json!({
            "email": email,
            "password": "password123456",
            "role": role,
            "profile": { "organization_name": format!("org of {email}") },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, res) = call(
        app,
        "/api/account/login",
        None,
        &serde_json::json!({ "email": email, "password": "password123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        res["id"].as_u64().unwrap(),
        res["token"].as_str().unwrap().to_owned(),
    )
}
