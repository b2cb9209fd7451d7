use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cafe_orders::api::rest::router;
use cafe_orders::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup() -> axum::Router {
    let state = AppState::connect("sqlite::memory:", 1).await.unwrap();
    router(Arc::new(state))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn place_order(app: &axum::Router, body: Value) -> Value {
    let res = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["menu_categories"], 5);
}

#[tokio::test]
async fn metrics_count_placed_orders() {
    let app = setup().await;
    place_order(&app, json!({ "items": [], "table_number": 4 })).await;

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("orders_created_total 1"));
}

#[tokio::test]
async fn full_menu_lists_every_category() {
    let app = setup().await;
    let response = app.oneshot(get_request("/api/menu")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let keys: HashSet<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        HashSet::from(["coffee", "cold", "tea", "pastries", "breakfast"])
    );
    assert_eq!(body["coffee"]["items"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn tea_category_has_five_fixed_items() {
    let app = setup().await;
    let response = app.oneshot(get_request("/api/menu/tea")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "Tea & Other Drinks");
    assert_eq!(body["icon"], "🍵");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(
        items[2],
        json!({
            "id": "earl-grey",
            "name": "Earl Grey",
            "description": "Classic black tea with bergamot",
            "price": 90,
            "image": "🍵"
        })
    );
}

#[tokio::test]
async fn unknown_category_returns_404() {
    let app = setup().await;
    let response = app.oneshot(get_request("/api/menu/unknown")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Category not found");
}

#[tokio::test]
async fn create_order_computes_total_and_eta() {
    let app = setup().await;
    let body = place_order(
        &app,
        json!({
            "table_number": 5,
            "items": [
                { "price": 150, "quantity": 2 },
                { "price": 80, "quantity": 1 }
            ]
        }),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["total_amount"].as_f64(), Some(380.0));
    assert_eq!(body["estimated_time"], 11);
    assert_eq!(body["message"], "Order placed successfully!");

    let id = body["order_id"].as_str().unwrap();
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[tokio::test]
async fn invalid_table_numbers_are_rejected_without_writing() {
    let app = setup().await;

    for table in [json!(0), json!(51), json!(2.5), json!("7")] {
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/orders",
                json!({ "items": [{ "price": 10 }], "table_number": table }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["error"], "Table number must be between 1 and 50");
    }

    let res = app.oneshot(get_request("/api/orders")).await.unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn missing_fields_return_400() {
    let app = setup().await;
    let res = app
        .oneshot(json_request("POST", "/api/orders", json!({ "table_number": 3 })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Missing required fields: items, table_number");
}

#[tokio::test]
async fn malformed_json_returns_400_with_error_body() {
    let app = setup().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let res = app.oneshot(request).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn created_order_round_trips_through_get() {
    let app = setup().await;
    let items = json!([
        { "id": "latte", "name": "Latte", "price": 150, "quantity": 2, "image": "🥛" },
        { "id": "banana-bread", "price": 60, "note": "warm it up" }
    ]);
    let created = place_order(
        &app,
        json!({ "items": items.clone(), "table_number": 12, "customer_name": "Mina" }),
    )
    .await;
    let id = created["order_id"].as_str().unwrap();

    let res = app
        .oneshot(get_request(&format!("/api/orders/{id}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let order = body_json(res).await;
    assert_eq!(order["id"], id);
    assert_eq!(order["customer_name"], "Mina");
    assert_eq!(order["table_number"], 12);
    assert_eq!(order["items"], items);
    assert_eq!(order["total_amount"].as_f64(), Some(360.0));
    assert_eq!(order["status"], "pending");
    assert_eq!(order["estimated_time"], 11);
    assert!(order["order_time"].is_string());
}

#[tokio::test]
async fn get_nonexistent_order_returns_404() {
    let app = setup().await;
    let response = app
        .oneshot(get_request("/api/orders/DEADBEEF"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn list_orders_newest_first() {
    let app = setup().await;
    let first = place_order(&app, json!({ "items": [], "table_number": 1 })).await;
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    let second = place_order(&app, json!({ "items": [], "table_number": 2 })).await;

    let res = app.oneshot(get_request("/api/orders")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let orders = body_json(res).await;
    let ids: Vec<&str> = orders
        .as_array()
        .unwrap()
        .iter()
        .map(|order| order["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            second["order_id"].as_str().unwrap(),
            first["order_id"].as_str().unwrap()
        ]
    );
}

#[tokio::test]
async fn update_status_is_visible_immediately() {
    let app = setup().await;
    let created = place_order(&app, json!({ "items": [], "table_number": 9 })).await;
    let id = created["order_id"].as_str().unwrap();

    for status in ["preparing", "ready", "pending", "cancelled"] {
        let res = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/orders/{id}/status"),
                json!({ "status": status }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], format!("Order status updated to {status}"));

        let res = app
            .clone()
            .oneshot(get_request(&format!("/api/orders/{id}")))
            .await
            .unwrap();
        assert_eq!(body_json(res).await["status"], status);
    }
}

#[tokio::test]
async fn update_status_rejects_unknown_status_and_missing_order() {
    let app = setup().await;
    let created = place_order(&app, json!({ "items": [], "table_number": 9 })).await;
    let id = created["order_id"].as_str().unwrap();

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{id}/status"),
            json!({ "status": "served" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{id}/status"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Status is required");

    let res = app
        .oneshot(json_request(
            "PUT",
            "/api/orders/NOPE0000/status",
            json!({ "status": "ready" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_empty_store() {
    let app = setup().await;
    let res = app.oneshot(get_request("/api/stats")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["today"]["total_orders"], 0);
    assert_eq!(body["today"]["total_revenue"].as_f64(), Some(0.0));
    assert_eq!(body["status_breakdown"], json!({}));
}

#[tokio::test]
async fn stats_roll_up_todays_orders() {
    let app = setup().await;
    let created = place_order(
        &app,
        json!({ "items": [{ "price": 120, "quantity": 2 }], "table_number": 3 }),
    )
    .await;
    place_order(
        &app,
        json!({ "items": [{ "price": 90 }], "table_number": 4 }),
    )
    .await;

    let id = created["order_id"].as_str().unwrap();
    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{id}/status"),
            json!({ "status": "completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.oneshot(get_request("/api/stats")).await.unwrap();
    let body = body_json(res).await;
    assert_eq!(body["today"]["total_orders"], 2);
    assert_eq!(body["today"]["total_revenue"].as_f64(), Some(330.0));
    assert_eq!(
        body["status_breakdown"],
        json!({ "completed": 1, "pending": 1 })
    );
}

#[tokio::test]
async fn oversized_quantities_and_totals_return_400() {
    let app = setup().await;
    let bodies = [
        r#"{"table_number":1,"items":[{"price":1,"quantity":9223372036854775808}]}"#,
        r#"{"table_number":1,"items":[{"quantity":18446744073709551615},{"quantity":5}]}"#,
        r#"{"table_number":1,"items":[{"price":1e308,"quantity":1000}]}"#,
    ];

    for raw in bodies {
        let request = Request::builder()
            .method("POST")
            .uri("/api/orders")
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap();
        let res = app.clone().oneshot(request).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {raw}");
        assert!(body_json(res).await["error"].is_string());
    }

    let res = app.oneshot(get_request("/api/orders")).await.unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn item_keys_keep_submitted_order() {
    let app = setup().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"table_number":2,"items":[{"quantity":1,"price":140,"name":"Cappuccino","id":"cappuccino"}]}"#,
        ))
        .unwrap();
    let res = app.clone().oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let id = body_json(res).await["order_id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(get_request(&format!("/api/orders/{id}")))
        .await
        .unwrap();
    let order = body_json(res).await;
    let keys: Vec<&str> = order["items"][0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["quantity", "price", "name", "id"]);
}
