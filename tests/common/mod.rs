#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Request, Response};
use report_hub::catalog::MemoryCatalog;
use report_hub::{SsoConfig, SsoSecret, codec, router};
use tower::ServiceExt;

pub const SECRET: &str = "integration-shared-secret";
pub const HUB: &str = "https://hub.example.com";

pub fn secret() -> SsoSecret {
    SsoSecret::new(SECRET).unwrap()
}

pub fn sso_config() -> SsoConfig {
    SsoConfig::new(Some(secret()))
        .with_hub_base_url(HUB)
        .with_secure_cookies(false)
}

pub fn app() -> Router {
    router(sso_config(), MemoryCatalog::with_sample_items())
}

/// Sign `payload_json` the way the identity hub does.
pub fn issue(payload_json: &str) -> String {
    let payload_segment = codec::encode(payload_json);
    let signature = codec::encode(secret().sign(payload_segment.as_bytes()));
    format!("{payload_segment}.{signature}")
}

pub fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).header("host", "app.test");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn send_json(method: &str, uri: &str, cookie: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "app.test")
        .header(COOKIE, cookie)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()["location"].to_str().unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Redeem a fresh token and return the `name=value` pair to send back.
pub async fn sign_in(app: &Router) -> String {
    let token = issue(&format!(
        r#"{{"email":"ana@example.com","name":"Ana","exp":{}}}"#,
        now() + 3600
    ));
    let response = send(app, get(&format!("/sso?token={token}"), None)).await;
    let header = set_cookie(&response).expect("session cookie");
    header.split(';').next().unwrap().to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
