use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, API_KEY, MAXAUTH_TOKEN};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_len(response: axum::response::Response) -> usize {
    response.into_body().collect().await.unwrap().to_bytes().len()
}

fn authed(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::HOST, "maximo.test")
        .header("maxauth", MAXAUTH_TOKEN)
}

fn get(uri: &str) -> Request<String> {
    authed("GET", uri).body(String::new()).unwrap()
}

fn json_post(uri: &str) -> http::request::Builder {
    authed("POST", uri).header(http::header::CONTENT_TYPE, "application/json")
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_return_error_envelope() {
    let resp = app()
        .oneshot(Request::builder().uri("/oslc/whoami").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["Error"]["statusCode"], "401");
    assert!(body["Error"]["message"].as_str().unwrap().starts_with("BMXAA7901E"));
}

#[tokio::test]
async fn api_key_is_accepted() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/whoami")
                .header("apikey", API_KEY)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["userName"], "MAXADMIN");
}

#[tokio::test]
async fn login_answers_with_empty_body() {
    let resp = app()
        .oneshot(authed("POST", "/oslc/login").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_len(resp).await, 0);
}

#[tokio::test]
async fn system_info_is_json() {
    let resp = app().oneshot(get("/oslc/systeminfo")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["appServer"], "WebSphere Liberty");
}

// --- collection queries ---

#[tokio::test]
async fn collection_without_select_lists_hrefs() {
    let resp = app().oneshot(get("/oslc/os/mxasset?lean=1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["href"], "http://maximo.test/oslc/os/mxasset");
    assert_eq!(
        body["member"],
        json!([
            {"href": "http://maximo.test/oslc/os/mxasset/_QkVERk9SRC8xMTQzMA--"},
            {"href": "http://maximo.test/oslc/os/mxasset/_QkVERk9SRC8xMTQ1MA--"}
        ])
    );
}

#[tokio::test]
async fn collection_filters_selects_and_orders() {
    let uri = "/oslc/os/mxasset?oslc.where=siteid%3D%22BEDFORD%22&oslc.select=assetnum&oslc.orderBy=-assetid&oslc.pageSize=1";
    let resp = app().oneshot(get(uri)).await.unwrap();

    let body = body_json(resp).await;
    let member = body["member"].as_array().unwrap();
    assert_eq!(member.len(), 1);
    assert_eq!(member[0]["assetnum"], "11450");
    assert!(member[0].get("status").is_none());
}

#[tokio::test]
async fn count_only_returns_total() {
    let uri = "/oslc/os/mxasset?count=1&oslc.where=status%3D%22OPERATING%22";
    let resp = app().oneshot(get(uri)).await.unwrap();
    assert_eq!(body_json(resp).await, json!({"totalCount": 1}));
}

#[tokio::test]
async fn unknown_object_structure_is_empty() {
    let resp = app().oneshot(get("/oslc/os/mxwo")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["member"], json!([]));
}

// --- single records ---

#[tokio::test]
async fn get_record_returns_all_fields() {
    let resp = app()
        .oneshot(get("/oslc/os/mxasset/_QkVERk9SRC8xMTQzMA--"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["assetid"], 21);
    assert_eq!(body["status"], "OPERATING");
    assert_eq!(
        body["href"],
        "http://maximo.test/oslc/os/mxasset/_QkVERk9SRC8xMTQzMA--"
    );
}

#[tokio::test]
async fn get_missing_record_is_404_envelope() {
    let resp = app().oneshot(get("/oslc/os/mxasset/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    let body = body_json(resp).await;
    assert_eq!(body["Error"]["reasonCode"], "BMXAA8727E");
    assert_eq!(body["Error"]["statusCode"], "404");
}

// --- create ---

#[tokio::test]
async fn create_returns_location_and_empty_body() {
    let body = r#"{"description":"Leak"}"#;
    let resp = app()
        .oneshot(json_post("/oslc/os/mxsr").body(body.to_string()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()[http::header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("http://maximo.test/oslc/os/mxsr/"));
    assert_eq!(body_len(resp).await, 0);
}

#[tokio::test]
async fn create_with_properties_echoes_record() {
    let body = r#"{"description":"Leak","reportedby":"MAXADMIN"}"#;
    let resp = app()
        .oneshot(
            json_post("/oslc/os/mxsr")
                .header("properties", "description")
                .body(body.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["description"], "Leak");
    assert!(created.get("reportedby").is_none());
    assert!(created["href"].as_str().unwrap().contains("/oslc/os/mxsr/"));
}

#[tokio::test]
async fn create_rejects_non_json() {
    let resp = app()
        .oneshot(json_post("/oslc/os/mxsr").body("not json".to_string()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["Error"]["statusCode"], "400");
}

// --- update ---

#[tokio::test]
async fn patch_merges_and_returns_204() {
    let app = app();
    let body = r#"{"status":"BROKEN"}"#;
    let resp = app
        .clone()
        .oneshot(
            json_post("/oslc/os/mxasset/_QkVERk9SRC8xMTQzMA--")
                .header("x-method-override", "PATCH")
                .header("patchtype", "MERGE")
                .body(body.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(get("/oslc/os/mxasset/_QkVERk9SRC8xMTQzMA--?oslc.select=status,assetnum"))
        .await
        .unwrap();
    let record = body_json(resp).await;
    assert_eq!(record["status"], "BROKEN");
    assert_eq!(record["assetnum"], "11430");
}

#[tokio::test]
async fn post_to_record_without_override_is_rejected() {
    let body = r#"{"status":"BROKEN"}"#;
    let resp = app()
        .oneshot(
            json_post("/oslc/os/mxasset/_QkVERk9SRC8xMTQzMA--")
                .body(body.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sync_creates_each_item() {
    let app = app();
    let body = r#"[{"wonum":"1000"},{"wonum":"1001"}]"#;
    let resp = app
        .clone()
        .oneshot(
            json_post("/oslc/os/mxwo")
                .header("x-method-override", "SYNC")
                .body(body.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.oneshot(get("/oslc/os/mxwo?count=1")).await.unwrap();
    assert_eq!(body_json(resp).await["totalCount"], 2);
}

// --- delete ---

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(
            authed("DELETE", "/oslc/os/mxasset/_QkVERk9SRC8xMTQ1MA--")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(get("/oslc/os/mxasset/_QkVERk9SRC8xMTQ1MA--"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
