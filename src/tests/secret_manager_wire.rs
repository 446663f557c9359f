#[cfg(test)]
mod test {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use http::StatusCode;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    use crate::error::{RefreshError, Stage};
    use crate::secrets::{SecretRef, SecretStore};
    use crate::tests::common::{static_secret_manager, IDENTITY_TOKEN, PROJECT};

    const ACCESS_PATH: &str = "/v1/projects/test-project/secrets/api-access-token/versions/latest:access";
    const ADD_VERSION_PATH: &str = "/v1/projects/test-project/secrets/api-access-token:addVersion";

    fn token_secret() -> SecretRef {
        SecretRef::new(PROJECT, "api-access-token")
    }

    #[tokio::test]
    async fn get_decodes_latest_version() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(ACCESS_PATH)
                    .header("Authorization", format!("Bearer {}", IDENTITY_TOKEN));
                then.status(200).json_body(json!({
                    "name": "projects/123/secrets/api-access-token/versions/7",
                    "payload": { "data": STANDARD.encode("tok-cached") }
                }));
            })
            .await;
        let store = static_secret_manager(&server.base_url());

        let value = store.get(&token_secret()).await.unwrap();

        assert_eq!(value, "tok-cached");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn set_then_get_round_trips_arbitrary_text() {
        let values = [
            "tok-new",
            "",
            "line one\nline two\r\n",
            "ünïcødé ✓ 令牌",
            "{\"json\": [1, 2, 3]}",
            "  padded  ",
        ];
        for value in values {
            let server = MockServer::start_async().await;
            let encoded = STANDARD.encode(value);
            let write = server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path(ADD_VERSION_PATH)
                        .header("Authorization", format!("Bearer {}", IDENTITY_TOKEN))
                        .json_body(json!({ "payload": { "data": encoded } }));
                    then.status(200).json_body(json!({
                        "name": "projects/123/secrets/api-access-token/versions/8"
                    }));
                })
                .await;
            let read = server
                .mock_async(|when, then| {
                    when.method(GET).path(ACCESS_PATH);
                    then.status(200).json_body(json!({ "payload": { "data": encoded } }));
                })
                .await;
            let store = static_secret_manager(&server.base_url());

            store.set(&token_secret(), value).await.unwrap();
            let read_back = store.get(&token_secret()).await.unwrap();

            assert_eq!(read_back, value);
            write.assert_async().await;
            read.assert_async().await;
        }
    }

    #[tokio::test]
    async fn set_reports_rejected_write() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ADD_VERSION_PATH);
                then.status(403).json_body(json!({ "error": { "code": 403, "status": "PERMISSION_DENIED" } }));
            })
            .await;
        let store = static_secret_manager(&server.base_url());

        let err = store.set(&token_secret(), "tok-new").await.unwrap_err();

        assert!(matches!(
            err,
            RefreshError::UpstreamRejection { stage: Stage::SecretWrite, status: StatusCode::FORBIDDEN }
        ));
    }

    #[tokio::test]
    async fn get_rejects_malformed_base64() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(ACCESS_PATH);
                then.status(200).json_body(json!({ "payload": { "data": "%%not-base64%%" } }));
            })
            .await;
        let store = static_secret_manager(&server.base_url());

        let err = store.get(&token_secret()).await.unwrap_err();

        assert!(matches!(err, RefreshError::Decode { stage: Stage::SecretRead, .. }));
    }

    #[tokio::test]
    async fn get_rejects_body_without_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(ACCESS_PATH);
                then.status(200).json_body(json!({ "name": "projects/123/secrets/x/versions/1" }));
            })
            .await;
        let store = static_secret_manager(&server.base_url());

        let err = store.get(&token_secret()).await.unwrap_err();

        assert!(matches!(err, RefreshError::Decode { stage: Stage::SecretRead, .. }));
    }

    #[tokio::test]
    async fn get_propagates_missing_secret() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(ACCESS_PATH);
                then.status(404);
            })
            .await;
        let store = static_secret_manager(&server.base_url());

        let err = store.get(&token_secret()).await.unwrap_err();

        assert!(matches!(
            err,
            RefreshError::UpstreamRejection { stage: Stage::SecretRead, status: StatusCode::NOT_FOUND }
        ));
    }
}
