// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notes dashboard, editor and public view tests (offline backends).

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use futures_util::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{create_test_app, get, post, send, sign_out, sign_up};

async fn create_note(app: &axum::Router, draft: Value) -> String {
    let (status, _, body) = post(app, "/new-note", draft).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

fn card_ids(view: &Value) -> Vec<String> {
    assert_eq!(view["notes"]["state"], "loaded", "view: {view}");
    view["notes"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_new_note_derives_title_from_content() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "title@example.com").await;

    let (status, _, body) = post(
        &app,
        "/new-note",
        json!({ "title": "", "content": "Buy milk\nand eggs" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(body["message"], "Note saved successfully!");
    let id = body["id"].as_str().unwrap();
    assert_eq!(body["redirect"], format!("/note/{id}"));

    let (status, _, editor) = get(&app, &format!("/note/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(editor["note"]["title"], "Buy milk");
    assert_eq!(editor["note"]["content"], "Buy milk\nand eggs");
}

#[tokio::test]
async fn test_dashboard_shows_only_own_notes() {
    let (app, state) = create_test_app();

    sign_up(&app, &state, "alice@example.com").await;
    let alice_note = create_note(&app, json!({ "title": "Alice's plan" })).await;
    sign_out(&app, &state).await;

    sign_up(&app, &state, "bob@example.com").await;
    let bob_note = create_note(&app, json!({ "title": "Bob's list" })).await;

    let (_, _, view) = get(&app, "/notes").await;
    assert_eq!(card_ids(&view), vec![bob_note]);

    let (status, _, body) = get(&app, &format!("/note/{alice_note}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You do not have permission to view this note");

    let (status, _, _) = send(&app, Method::DELETE, &format!("/note/{alice_note}"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_empty_dashboard_messages() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "empty@example.com").await;

    let (_, _, view) = get(&app, "/notes").await;
    assert!(card_ids(&view).is_empty());
    assert_eq!(view["empty"]["heading"], "No notes");

    create_note(&app, json!({ "title": "Groceries" })).await;
    let (_, _, view) = get(&app, "/notes?search=zzz").await;
    assert!(card_ids(&view).is_empty());
    assert_eq!(view["empty"]["heading"], "No matching notes found");
}

#[tokio::test]
async fn test_search_category_and_sort() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "sorter@example.com").await;

    let groceries = create_note(
        &app,
        json!({ "title": "Groceries", "content": "milk", "category": "personal" }),
    )
    .await;
    let standup = create_note(
        &app,
        json!({ "title": "Standup", "content": "MILK the deadline", "category": "work" }),
    )
    .await;
    let idea = create_note(&app, json!({ "title": "Idea", "category": "ideas" })).await;

    let (_, _, view) = get(&app, "/notes?search=Milk").await;
    let mut found = card_ids(&view);
    found.sort();
    let mut expected = vec![groceries.clone(), standup.clone()];
    expected.sort();
    assert_eq!(found, expected);

    let (_, _, view) = get(&app, "/notes?category=work").await;
    assert_eq!(card_ids(&view), vec![standup.clone()]);

    let (status, _, _) = get(&app, "/notes?category=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, desc) = get(&app, "/notes?sort=desc").await;
    let (_, _, asc) = get(&app, "/notes?sort=asc").await;
    let mut reversed = card_ids(&asc);
    reversed.reverse();
    assert_eq!(card_ids(&desc), reversed);
    assert_eq!(card_ids(&desc).len(), 3);
    assert!(card_ids(&desc).contains(&idea));
}

#[tokio::test]
async fn test_update_and_delete_one_note() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "editor@example.com").await;

    let keep = create_note(&app, json!({ "title": "Keep me" })).await;
    let drop = create_note(&app, json!({ "title": "Drop me" })).await;

    let (status, _, body) = send(
        &app,
        Method::PUT,
        &format!("/note/{keep}"),
        Some(json!({ "title": "Kept", "content": "  padded  ", "color": "#FFF9C4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (_, _, editor) = get(&app, &format!("/note/{keep}")).await;
    assert_eq!(editor["note"]["title"], "Kept");
    assert_eq!(editor["note"]["content"], "padded");
    assert_eq!(editor["note"]["color"], "#fff9c4");

    let (status, _, body) = send(&app, Method::DELETE, &format!("/note/{drop}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/notes");

    let (_, _, view) = get(&app, "/notes").await;
    assert_eq!(card_ids(&view), vec![keep]);

    let (status, _, body) = get(&app, &format!("/note/{drop}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Note not found");
}

#[tokio::test]
async fn test_unsupported_color_is_rejected() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "colors@example.com").await;

    let (status, _, _) = post(&app, "/new-note", json!({ "color": "#123456" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_share_link_lifecycle() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "sharer@example.com").await;
    let origin = state.config.public_origin.clone();

    // Draft: preview link
    let (status, _, body) = post(
        &app,
        "/editor/toggle-public",
        json!({ "isPublic": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPublic"], true);
    let preview = body["shareLink"].as_str().unwrap();
    assert!(preview.starts_with(&format!("{origin}/view/note/temp-")));

    // Saved public: permanent link
    let (_, _, saved) = post(
        &app,
        "/new-note",
        json!({ "title": "Shared", "content": "hello", "isPublic": true }),
    )
    .await;
    let id = saved["id"].as_str().unwrap().to_string();
    assert_eq!(saved["message"], "Note saved! Your permanent link is ready.");
    assert_eq!(saved["shareLink"], format!("{origin}/view/note/{id}"));

    // Anyone can read it
    sign_out(&app, &state).await;
    let (status, _, view) = get(&app, &format!("/view/note/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "Shared");
    assert_eq!(view["content"], "hello");

    // Toggling a saved note back to private clears the link
    let (_, _, _) = post(
        &app,
        "/signin",
        json!({ "email": "sharer@example.com", "password": "secret123" }),
    )
    .await;
    let (_, _, body) = post(
        &app,
        "/editor/toggle-public",
        json!({ "id": id, "isPublic": true }),
    )
    .await;
    assert_eq!(body["isPublic"], false);
    assert!(body["shareLink"].is_null());

    let (_, _, saved) = send(
        &app,
        Method::PUT,
        &format!("/note/{id}"),
        Some(json!({ "title": "Shared", "content": "hello", "isPublic": false })),
    )
    .await;
    assert!(saved["shareLink"].is_null());

    let (status, _, body) = get(&app, &format!("/view/note/{id}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "This note is private");
}

#[tokio::test]
async fn test_public_view_of_missing_note() {
    let (app, _) = create_test_app();

    let (status, _, body) = get(&app, "/view/note/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Note not found");
}

#[tokio::test]
async fn test_image_upload_inline() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "images@example.com").await;

    let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/uploads?fileName=pic.png")
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .body(Body::from(png))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/uploads?fileName=notes.txt")
                .body(Body::from("just text"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_live_dashboard_streams_snapshots() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "live@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/notes/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let mut events = response.into_body().into_data_stream();
    let first = events.next().await.unwrap().unwrap();
    let first = String::from_utf8_lossy(&first);
    assert!(first.contains("event: notes"), "{first}");
    assert!(first.contains("No notes"), "{first}");

    create_note(&app, json!({ "title": "Streamed" })).await;

    let next = tokio::time::timeout(std::time::Duration::from_secs(2), events.next())
        .await
        .expect("no snapshot after create")
        .unwrap()
        .unwrap();
    let next = String::from_utf8_lossy(&next);
    assert!(next.contains("Streamed"), "{next}");
}

#[tokio::test]
async fn test_pin_and_image_routes_persist() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "pinner@example.com").await;
    let id = create_note(&app, json!({ "title": "Moodboard" })).await;

    let (status, _, editor) = post(&app, &format!("/note/{id}/pin"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(editor["note"]["pinned"], true);

    let url = "https://res.cloudinary.com/demo/image/upload/sample.jpg";
    post(&app, &format!("/note/{id}/images"), json!({ "url": url })).await;
    let (_, _, editor) = post(&app, &format!("/note/{id}/images"), json!({ "url": url })).await;
    assert_eq!(editor["note"]["imageUrls"], json!([url]));

    let (_, _, editor) = get(&app, &format!("/note/{id}")).await;
    assert_eq!(editor["note"]["pinned"], true);
    assert_eq!(editor["note"]["imageUrls"], json!([url]));

    let (status, _, editor) = send(
        &app,
        Method::DELETE,
        &format!("/note/{id}/images"),
        Some(json!({ "url": url })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(editor["note"]["imageUrls"], json!([]));

    sign_out(&app, &state).await;
    sign_up(&app, &state, "stranger@example.com").await;
    let (status, _, _) = post(&app, &format!("/note/{id}/pin"), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_save_restamps_update_time_only() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "stamps@example.com").await;
    let id = create_note(&app, json!({ "title": "Draft" })).await;

    let stamp = |editor: &Value, field: &str| {
        editor["note"][field]
            .as_str()
            .unwrap()
            .parse::<chrono::DateTime<chrono::Utc>>()
            .unwrap()
    };

    let (_, _, first) = get(&app, &format!("/note/{id}")).await;
    let created = stamp(&first, "createdAt");
    let updated = stamp(&first, "updatedAt");
    assert_eq!(created, updated);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    send(
        &app,
        Method::PUT,
        &format!("/note/{id}"),
        Some(json!({ "title": "Final" })),
    )
    .await;

    let (_, _, second) = get(&app, &format!("/note/{id}")).await;
    assert_eq!(stamp(&second, "createdAt"), created);
    assert!(stamp(&second, "updatedAt") > updated);
}
