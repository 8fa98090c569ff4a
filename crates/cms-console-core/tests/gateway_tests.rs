//! API gateway and resource forwarder tests against a wiremock backend

mod common;

use cms_console_core::auth::LOGIN_ROUTE;
use cms_console_core::models::{ModerationDecision, ViewsPeriod};
use cms_console_core::{ApiError, ListParams, SessionState};
use common::{auth_body, Harness, NoAuthorization};
use serde_json::{json, Value};
use wiremock::{
    matchers::{
        body_json, body_string_contains, header, method, path, query_param,
        query_param_is_missing,
    },
    Mock, ResponseTemplate,
};

async fn logged_in() -> Harness {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("tok123")))
        .mount(&h.server)
        .await;
    h.manager.login("admin", "password").await.unwrap();
    h
}

#[tokio::test]
async fn test_bearer_token_attached_when_logged_in() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = h.api().categories().list().await.unwrap();
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_request_sent_without_token_when_logged_out() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.api().tags().list().await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_list_clears_session_and_redirects() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let err = h.api().videos().list(&ListParams::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(h.stored_token(), None);
    assert_eq!(h.stored_user(), None);
    assert_eq!(h.navigator.last().as_deref(), Some(LOGIN_ROUTE));
    assert!(!h.manager.is_authenticated());
    assert_eq!(h.manager.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_unauthorized_clears_store_exactly_once() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&h.server)
        .await;

    assert!(h.api().videos().list(&ListParams::new()).await.is_err());
    h.api().categories().list().await.unwrap();
    h.api().categories().list().await.unwrap();

    assert_eq!(h.store.token_removals(), 1);
    assert_eq!(h.navigator.routes(), vec![LOGIN_ROUTE.to_string()]);
}

#[tokio::test]
async fn test_other_errors_pass_through_untouched() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "data": null,
            "error": { "status": 404, "name": "NotFoundError", "message": "Not Found" }
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/3"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&h.server)
        .await;

    match h.api().videos().get("missing").await.unwrap_err() {
        ApiError::NotFound(msg) => assert_eq!(msg, "Not Found"),
        other => panic!("unexpected error: {other:?}"),
    }
    match h.api().categories().delete("3").await.unwrap_err() {
        ApiError::AccessDenied(msg) => assert_eq!(msg, "Forbidden"),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(h.manager.is_authenticated());
    assert_eq!(h.stored_token().as_deref(), Some("tok123"));
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_response() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&h.server)
        .await;

    let err = h.api().analytics().stats().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_video_list_forwards_query_params() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("populate", "*"))
        .and(query_param("sort", "views:desc"))
        .and(query_param("filters[status][$eq]", "published"))
        .and(query_param("pagination[page]", "2"))
        .and(query_param("pagination[pageSize]", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "title": "Intro to React", "views": 15400 }],
            "meta": { "pagination": { "page": 2, "pageSize": 10, "pageCount": 2, "total": 11 } }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let params = ListParams::new()
        .populate("*")
        .sort("views:desc")
        .filter("status", "published")
        .page(2, 10);
    let body = h.api().videos().list(&params).await.unwrap();

    assert_eq!(body["data"][0]["title"], "Intro to React");
    assert_eq!(body["meta"]["pagination"]["total"], 11);
}

#[tokio::test]
async fn test_video_get_populates_relations() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/videos/v1"))
        .and(query_param("populate", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1 } })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.api().videos().get("v1").await.unwrap();
}

#[tokio::test]
async fn test_ids_stay_inside_one_path_segment() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/1%3Fpopulate=*"))
        .and(query_param_is_missing("populate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1 } })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/2%2Fdelete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.api().categories().get("1?populate=*").await.unwrap();
    h.api().users().delete("2/delete").await.unwrap();
}

#[tokio::test]
async fn test_create_and_update_wrap_payload_in_data() {
    let h = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .and(body_json(json!({ "data": { "name": "Science" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": 5, "name": "Science" } })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/playlists/p1"))
        .and(body_json(json!({ "data": { "isPublic": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1 } })))
        .expect(1)
        .mount(&h.server)
        .await;

    let created = h
        .api()
        .categories()
        .create(&json!({ "name": "Science" }))
        .await
        .unwrap();
    assert_eq!(created["data"]["id"], 5);

    h.api()
        .playlists()
        .update("p1", &json!({ "isPublic": true }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_update_sends_bare_payload() {
    let h = logged_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/2"))
        .and(body_json(json!({ "blocked": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 2, "blocked": true })))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = h.api().users().update("2", &json!({ "blocked": true })).await.unwrap();
    assert_eq!(body["blocked"], true);
}

#[tokio::test]
async fn test_comment_moderation() {
    let h = logged_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/comments/c5"))
        .and(body_json(json!({ "data": { "status": "approved" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 5, "content": "Great", "author": "Maria", "status": "approved" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = h
        .api()
        .comments()
        .moderate("c5", ModerationDecision::Approve)
        .await
        .unwrap();
    assert_eq!(body["data"]["status"], "approved");
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_null() {
    let h = logged_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/subscriptions/s1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = h.api().subscriptions().delete("s1").await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_settings_and_analytics_paths() {
    let h = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/setting"))
        .and(query_param("populate", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1, "siteName": "VideoHub" } })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/setting"))
        .and(body_json(json!({ "data": { "siteName": "VideoHub 2" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1 } })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/views"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "views": [1, 2, 3] })))
        .expect(1)
        .mount(&h.server)
        .await;

    let settings = h.api().settings().get().await.unwrap();
    assert_eq!(settings["data"]["siteName"], "VideoHub");
    h.api()
        .settings()
        .update(&json!({ "siteName": "VideoHub 2" }))
        .await
        .unwrap();
    let views = h.api().analytics().views(ViewsPeriod::Week).await.unwrap();
    assert_eq!(views["views"][2], 3);
}

#[tokio::test]
async fn test_upload_sends_multipart_files_field() {
    let h = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header("authorization", "Bearer tok123"))
        .and(body_string_contains("name=\"files\""))
        .and(body_string_contains("filename=\"thumb.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "url": "/uploads/thumb.png", "name": "thumb.png" }
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = h
        .api()
        .videos()
        .upload_file("thumb.png", b"fake png bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(body[0]["id"], 9);
}
