//! Instagram private (mobile) API client.
//!
//! Only the four calls the bot needs are implemented: password login,
//! timeline probe, photo upload (`rupload_igphoto`) and media configure.
//! Authentication state lives entirely in [`SessionSettings`], so a client
//! can be rebuilt from a persisted blob without touching the network.

use super::{DeviceIds, PlatformClient, PlatformError, PostedMedia, SessionSettings};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

const APP_ID: &str = "567067343352427";
const CAPABILITIES: &str = "3brTvw==";
const RETRY_CONTEXT: &str =
    r#"{"num_step_auto_retry":0,"num_reupload":0,"num_step_manual_retry":0}"#;
const IMAGE_COMPRESSION: &str = r#"{"lib_name":"moz","lib_version":"3.1.m","quality":"80"}"#;

/// Instagram client speaking the mobile private API.
pub struct InstagramClient {
    http: reqwest::Client,
    api_base: String,
    settings: SessionSettings,
}

impl InstagramClient {
    /// Create an unauthenticated client with a brand-new device identity.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            settings: SessionSettings::fresh(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v1/{endpoint}", self.api_base)
    }

    /// Attach device, auth and cookie headers to a request.
    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        let ids = &self.settings.uuids;
        let mut builder = builder
            .header("User-Agent", &self.settings.user_agent)
            .header("X-IG-App-ID", APP_ID)
            .header("X-IG-Capabilities", CAPABILITIES)
            .header("X-IG-Connection-Type", "WIFI")
            .header("X-IG-Device-ID", &ids.uuid)
            .header("X-IG-Android-ID", &ids.android_device_id)
            .header("X-Pigeon-Session-Id", &ids.client_session_id)
            .header("Accept-Language", "en-US");

        if let Some(auth) = &self.settings.authorization {
            builder = builder.header("Authorization", auth);
        }
        if let Some(user_id) = &self.settings.user_id {
            builder = builder.header("IG-U-DS-USER-ID", user_id);
        }
        if !self.settings.cookies.is_empty() {
            let cookie = self
                .settings
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header("Cookie", cookie);
        }
        builder
    }

    /// Fold session-mutating response headers back into the settings.
    fn absorb_headers(&mut self, headers: &HeaderMap) {
        if let Some(auth) = headers
            .get("ig-set-authorization")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty() && !v.trim_end().ends_with(':'))
        {
            self.settings.authorization = Some(auth.to_string());
        }
        if let Some(user_id) = headers
            .get("ig-set-ig-u-ds-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
        {
            self.settings.user_id = Some(user_id.to_string());
        }
        for cookie in headers.get_all(SET_COOKIE) {
            let Ok(raw) = cookie.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                self.settings
                    .cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    /// Send, absorb headers, and decode the JSON body.
    async fn execute(&mut self, builder: RequestBuilder) -> Result<Value, PlatformError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        self.absorb_headers(resp.headers());

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        let ok = body.get("status").and_then(Value::as_str) == Some("ok");
        if !status.is_success() || !ok {
            return Err(classify_failure(status, &body, &text));
        }
        Ok(body)
    }

    fn require_session(&self) -> Result<(), PlatformError> {
        if self.settings.is_authenticated() {
            Ok(())
        } else {
            Err(PlatformError::LoginRequired)
        }
    }
}

fn signed_body(data: &Value) -> String {
    format!("SIGNATURE.{data}")
}

fn jazoest(phone_id: &str) -> String {
    let sum: u32 = phone_id.bytes().map(u32::from).sum();
    format!("2{sum}")
}

fn classify_failure(status: StatusCode, body: &Value, raw: &str) -> PlatformError {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let error_type = body
        .get("error_type")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if message == "login_required" || status == StatusCode::UNAUTHORIZED {
        return PlatformError::LoginRequired;
    }
    if matches!(error_type, "bad_password" | "invalid_user" | "invalid_parameters") {
        return PlatformError::BadCredentials(if message.is_empty() {
            error_type.to_string()
        } else {
            message
        });
    }
    if matches!(message.as_str(), "challenge_required" | "checkpoint_required")
        || body.get("two_factor_required").and_then(Value::as_bool) == Some(true)
    {
        return PlatformError::Checkpoint(message);
    }
    if status.is_success() && body.is_null() {
        return PlatformError::Protocol(format!("non-JSON response: {raw}"));
    }
    PlatformError::Http {
        status: status.as_u16(),
        message: if message.is_empty() {
            raw.to_string()
        } else {
            message
        },
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl PlatformClient for InstagramClient {
    fn settings(&self) -> SessionSettings {
        self.settings.clone()
    }

    fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    fn set_device_ids(&mut self, ids: DeviceIds) {
        self.settings.uuids = ids;
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<(), PlatformError> {
        if self.settings.is_authenticated() {
            tracing::debug!("Reusing stored authorization for {username}");
            return Ok(());
        }

        let ids = self.settings.uuids.clone();
        let data = json!({
            "jazoest": jazoest(&ids.phone_id),
            "country_codes": "[{\"country_code\":\"1\",\"source\":[\"default\"]}]",
            "phone_id": ids.phone_id,
            "enc_password": format!("#PWD_INSTAGRAM:0:{}:{password}", Utc::now().timestamp()),
            "username": username,
            "adid": ids.advertising_id,
            "guid": ids.uuid,
            "device_id": ids.android_device_id,
            "google_tokens": "[]",
            "login_attempt_count": "0",
        });

        let request = self
            .decorate(self.http.post(self.api_url("accounts/login/")))
            .form(&[("signed_body", signed_body(&data))]);
        let body = self.execute(request).await?;

        let user_id = body
            .pointer("/logged_in_user/pk")
            .and_then(id_string)
            .ok_or_else(|| {
                PlatformError::Protocol("login response missing logged_in_user.pk".to_string())
            })?;
        self.settings.user_id = Some(user_id);

        if self.settings.authorization.is_none() {
            return Err(PlatformError::Protocol(
                "login response carried no authorization header".to_string(),
            ));
        }
        self.settings.last_login = Some(Utc::now());
        Ok(())
    }

    async fn timeline_feed(&mut self) -> Result<(), PlatformError> {
        self.require_session()?;
        let ids = self.settings.uuids.clone();
        let request = self
            .decorate(self.http.post(self.api_url("feed/timeline/")))
            .form(&[
                ("reason", "cold_start_fetch"),
                ("is_pull_to_refresh", "0"),
                ("phone_id", ids.phone_id.as_str()),
                ("device_id", ids.uuid.as_str()),
                ("_uuid", ids.uuid.as_str()),
                ("battery_level", "100"),
                ("is_charging", "1"),
                ("timezone_offset", "0"),
            ]);
        self.execute(request).await?;
        Ok(())
    }

    async fn upload_photo(
        &mut self,
        path: &Path,
        caption: &str,
    ) -> Result<PostedMedia, PlatformError> {
        self.require_session()?;
        let bytes = tokio::fs::read(path).await?;

        let upload_id = Utc::now().timestamp_millis().to_string();
        let entity_name = format!(
            "{upload_id}_0_{}",
            rand::thread_rng().gen_range(1_000_000_000u64..10_000_000_000)
        );
        let rupload_params = json!({
            "retry_context": RETRY_CONTEXT,
            "media_type": "1",
            "upload_id": upload_id,
            "xsharing_user_ids": "[]",
            "image_compression": IMAGE_COMPRESSION,
        });

        let request = self
            .decorate(
                self.http
                    .post(format!("{}/rupload_igphoto/{entity_name}", self.api_base)),
            )
            .header("X-Instagram-Rupload-Params", rupload_params.to_string())
            .header("X_FB_PHOTO_WATERFALL_ID", uuid::Uuid::new_v4().to_string())
            .header("X-Entity-Type", "image/jpeg")
            .header("X-Entity-Name", &entity_name)
            .header("X-Entity-Length", bytes.len().to_string())
            .header("Offset", "0")
            .header("Content-Type", "application/octet-stream")
            .body(bytes);
        self.execute(request).await?;
        tracing::debug!("Uploaded photo bytes as {upload_id}");

        let ids = self.settings.uuids.clone();
        let data = json!({
            "upload_id": upload_id,
            "caption": caption,
            "source_type": "4",
            "media_folder": "Camera",
            "device_id": ids.android_device_id,
            "_uuid": ids.uuid,
            "_uid": self.settings.user_id,
            "timezone_offset": "0",
        });
        let request = self
            .decorate(self.http.post(self.api_url("media/configure/")))
            .form(&[("signed_body", signed_body(&data))]);
        let body = self.execute(request).await?;

        let media_id = body
            .pointer("/media/pk")
            .and_then(id_string)
            .ok_or_else(|| {
                PlatformError::Protocol("configure response missing media.pk".to_string())
            })?;
        let code = body
            .pointer("/media/code")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(PostedMedia { media_id, code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> InstagramClient {
        InstagramClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn authenticated(server: &MockServer) -> InstagramClient {
        let mut client = client_for(server);
        let mut settings = SessionSettings::fresh();
        settings.authorization = Some("Bearer IGT:2:stored".to_string());
        settings.user_id = Some("42".to_string());
        client.set_settings(settings);
        client
    }

    #[tokio::test]
    async fn test_password_login_stores_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .and(body_string_contains("signed_body=SIGNATURE."))
            .and(header("X-IG-App-ID", APP_ID))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ig-set-authorization", "Bearer IGT:2:fresh")
                    .insert_header("set-cookie", "csrftoken=abc123; Path=/; Secure")
                    .set_body_json(json!({
                        "status": "ok",
                        "logged_in_user": {"pk": 42, "username": "artgossip"}
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        client.login("artgossip", "hunter2").await.unwrap();

        let settings = client.settings();
        assert_eq!(settings.authorization.as_deref(), Some("Bearer IGT:2:fresh"));
        assert_eq!(settings.user_id.as_deref(), Some("42"));
        assert_eq!(settings.cookies.get("csrftoken").map(String::as_str), Some("abc123"));
        assert!(settings.last_login.is_some());
    }

    #[tokio::test]
    async fn test_bad_password_is_bad_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "The password you entered is incorrect.",
                "error_type": "bad_password",
                "status": "fail"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .login("artgossip", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::BadCredentials(_)));
    }

    #[tokio::test]
    async fn test_challenge_is_checkpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "challenge_required",
                "status": "fail"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .login("artgossip", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Checkpoint(_)));
    }

    #[tokio::test]
    async fn test_login_with_stored_authorization_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let mut client = authenticated(&server);
        client.login("artgossip", "hunter2").await.unwrap();
    }

    #[tokio::test]
    async fn test_timeline_probe_sends_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/feed/timeline/"))
            .and(header("Authorization", "Bearer IGT:2:stored"))
            .and(header("IG-U-DS-USER-ID", "42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ig-set-authorization", "Bearer IGT:2:rotated")
                    .set_body_json(json!({"status": "ok", "feed_items": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client = authenticated(&server);
        client.timeline_feed().await.unwrap();
        assert_eq!(
            client.settings().authorization.as_deref(),
            Some("Bearer IGT:2:rotated")
        );
    }

    #[tokio::test]
    async fn test_timeline_login_required() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/feed/timeline/"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "login_required",
                "status": "fail"
            })))
            .mount(&server)
            .await;

        let err = authenticated(&server).timeline_feed().await.unwrap_err();
        assert!(matches!(err, PlatformError::LoginRequired));
    }

    #[tokio::test]
    async fn test_timeline_without_session_is_login_required() {
        let server = MockServer::start().await;
        let err = client_for(&server).timeline_feed().await.unwrap_err();
        assert!(matches!(err, PlatformError::LoginRequired));
    }

    #[tokio::test]
    async fn test_upload_photo_then_configure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/rupload_igphoto/\d+_0_\d+$"))
            .and(header_exists("X-Instagram-Rupload-Params"))
            .and(header("X-Entity-Length", "4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "upload_id": "1"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/media/configure/"))
            .and(body_string_contains("signed_body=SIGNATURE."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "media": {"pk": "3141592653", "code": "Cxyz123"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        let mut client = authenticated(&server);
        let posted = client
            .upload_photo(file.path(), "if we really had to price it")
            .await
            .unwrap();
        assert_eq!(posted.media_id, "3141592653");
        assert_eq!(posted.code.as_deref(), Some("Cxyz123"));
    }

    #[tokio::test]
    async fn test_upload_rejected_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/rupload_igphoto/.+"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [0u8; 8]).unwrap();

        let err = authenticated(&server)
            .upload_photo(file.path(), "caption")
            .await
            .unwrap_err();
        match err {
            PlatformError::Http { status, message } => {
                assert_eq!(status, 413);
                assert!(message.contains("too large"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_jazoest() {
        assert_eq!(jazoest("ab"), "2195");
    }
}
