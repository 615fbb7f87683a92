use super::*;

use chrono::{Duration, Utc};
use rotibank_backend::listing::handle::{CreateListingReq, ListingReq};

fn sandwiches(expiry_in: Duration) -> CreateListingReq {
    CreateListingReq {
        title: "Sandwiches".to_owned(),
        description: "Fresh sandwiches".to_owned(),
        quantity: "50 sandwiches".to_owned(),
        expiry_time: Utc::now() + expiry_in,
        pickup_location: Some("123 Main Street".to_owned()),
    }
}

async fn create(app: &axum::Router, auth: &(u64, String), req: &CreateListingReq) -> u64 {
    let (status, res) = call(app, "/api/listing/create", Some(auth), req).await;
    assert_eq!(status, StatusCode::OK);
    res["id"].as_u64().unwrap()
}

/// Calls a route targeting a single listing.
async fn on_listing(
    app: &axum::Router,
    uri: &str,
    auth: &(u64, String),
    listing: u64,
) -> (StatusCode, serde_json::Value) {
    call(app, uri, Some(auth), &ListingReq { listing }).await
}

/// Listings returned by a route without a body.
async fn listings(
    app: &axum::Router,
    uri: &str,
    auth: &(u64, String),
) -> Vec<serde_json::Value> {
    let (status, res) = call(app, uri, Some(auth), &serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    res["listings"].as_array().unwrap().clone()
}

/// A restaurant lists food, one volunteer claims it and a second one is
/// turned away.
#[tokio::test]
async fn claim_flow() {
    let app = app();
    let restaurant = signup(&app, "om.sharma@example.org", Role::Restaurant).await;
    let v1 = signup(&app, "v1@example.org", Role::Volunteer).await;
    let v2 = signup(&app, "v2@example.org", Role::Volunteer).await;

    let id = create(&app, &restaurant, &sandwiches(Duration::hours(2))).await;

    let available = listings(&app, "/api/listing/available", &v1).await;
    assert_eq!(available[0]["id"], id);
    assert_eq!(available[0]["status"], "available");
    assert!(available[0]["volunteer"].is_null());

    let (status, res) = on_listing(&app, "/api/listing/claim", &v1, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["status"], "accepted");
    assert_eq!(res["volunteer"], v1.0);

    let (status, _) = on_listing(&app, "/api/listing/claim", &v2, id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let available = listings(&app, "/api/listing/available", &v2).await;
    assert!(available.is_empty());

    let (_, res) = on_listing(&app, "/api/listing/get", &v2, id).await;
    assert_eq!(res["volunteer"], v1.0);

    let mine = listings(&app, "/api/listing/mine", &v1).await;
    assert_eq!(mine[0]["id"], id);
    let mine = listings(&app, "/api/listing/mine", &v2).await;
    assert!(mine.is_empty());
    let mine = listings(&app, "/api/listing/mine", &restaurant).await;
    assert_eq!(mine[0]["status"], "accepted");

    let empty = serde_json::json!({});
    let (_, res) = call(&app, "/api/account/self-info", Some(&restaurant), &empty).await;
    assert_eq!(res["points"], 50);
    assert_eq!(res["meals_shared"], 1);
    let (_, res) = call(&app, "/api/account/self-info", Some(&v1), &empty).await;
    assert_eq!(res["meals_delivered"], 1);

    let (_, res) = call(
        &app,
        "/api/account/leaderboard",
        None,
        &serde_json::json!({ "role": "volunteer" }),
    )
    .await;
    assert_eq!(res[0]["id"], v1.0);
    assert_eq!(res[0]["meals_delivered"], 1);
    assert_eq!(res[1]["id"], v2.0);
}

#[tokio::test]
async fn roles_are_enforced() {
    let app = app();
    let restaurant = signup(&app, "kitchen@example.org", Role::Restaurant).await;
    let volunteer = signup(&app, "vol@example.org", Role::Volunteer).await;
    let ngo = signup(&app, "ngo@example.org", Role::Ngo).await;

    let req = sandwiches(Duration::hours(1));
    let (status, _) = call(&app, "/api/listing/create", Some(&volunteer), &req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let id = create(&app, &restaurant, &req).await;
    for auth in [&restaurant, &ngo] {
        let (status, _) = on_listing(&app, "/api/listing/claim", auth, id).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = on_listing(&app, "/api/listing/cancel", &volunteer, id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, "/api/listing/create", None, &req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_listing() {
    let app = app();
    let restaurant = signup(&app, "kitchen@example.org", Role::Restaurant).await;
    let volunteer = signup(&app, "vol@example.org", Role::Volunteer).await;

    let id = create(&app, &restaurant, &sandwiches(-Duration::minutes(5))).await;

    let available = listings(&app, "/api/listing/available", &volunteer).await;
    assert!(available.is_empty());

    let (status, _) = on_listing(&app, "/api/listing/claim", &volunteer, id).await;
    assert_eq!(status, StatusCode::GONE);

    let (_, res) = on_listing(&app, "/api/listing/get", &volunteer, id).await;
    assert!(res["volunteer"].is_null());
}

#[tokio::test]
async fn cancel_and_missing() {
    let app = app();
    let restaurant = signup(&app, "kitchen@example.org", Role::Restaurant).await;
    let volunteer = signup(&app, "vol@example.org", Role::Volunteer).await;

    let id = create(&app, &restaurant, &sandwiches(Duration::hours(1))).await;
    let (status, res) = on_listing(&app, "/api/listing/cancel", &restaurant, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["status"], "cancelled");

    let (status, _) = on_listing(&app, "/api/listing/claim", &volunteer, id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = on_listing(&app, "/api/listing/get", &volunteer, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = on_listing(&app, "/api/listing/claim", &volunteer, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pickup_defaults_to_address() {
    let app = app();
    let restaurant = signup(&app, "kitchen@example.org", Role::Restaurant).await;
    call(
        &app,
        "/api/account/modify",
        Some(&restaurant),
        &serde_json::json!({ "address": "9 Baker Lane" }),
    )
    .await;

    let req = CreateListingReq {
        pickup_location: None,
        ..sandwiches(Duration::hours(1))
    };
    let id = create(&app, &restaurant, &req).await;
    let (_, res) = on_listing(&app, "/api/listing/get", &restaurant, id).await;
    assert_eq!(res["pickup_location"], "9 Baker Lane");
}
