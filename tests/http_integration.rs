//! Integration tests for the HTTP requester and deferred operations.
//!
//! These tests run real HTTP requests against a local wiremock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cordkit::core::config::{ClientConfig, Config};
use cordkit::core::types::Snowflake;
use cordkit::entity::Entity;
use cordkit::rest::{ActionError, TransportError};
use cordkit::session::Session;

fn config(server: &MockServer, account_type: &str) -> Config {
    Config::from_client(ClientConfig {
        api_base: Some(server.uri()),
        account_type: Some(account_type.to_string()),
        request_timeout_secs: Some(1),
        ..Default::default()
    })
    .unwrap()
}

fn session(server: &MockServer) -> Session {
    Session::builder("tok")
        .config(config(server, "client"))
        .build()
        .unwrap()
}

fn webhook_payload(token: Option<&str>) -> serde_json::Value {
    let mut value = json!({
        "id": "50",
        "guild_id": "1",
        "channel_id": "2",
        "name": "hook",
        "user": {"id": "7", "username": "creator"}
    });
    if let Some(token) = token {
        value["token"] = json!(token);
    }
    value
}

// =============================================================================
// Authentication
// =============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn client_token_sent_raw() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/applications"))
            .and(header("authorization", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let apps = session(&server)
            .as_client()
            .unwrap()
            .applications()
            .complete()
            .await
            .unwrap();

        assert!(apps.is_empty());
    }

    #[tokio::test]
    async fn bot_token_prefixed() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/webhooks/50"))
            .and(header("authorization", "Bot tok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::builder("tok")
            .config(config(&server, "bot"))
            .build()
            .unwrap();
        let hook = session
            .ingest()
            .upsert_webhook(&webhook_payload(None))
            .unwrap();

        hook.delete().complete().await.unwrap();
    }
}

// =============================================================================
// Applications
// =============================================================================

mod application_tests {
    use super::*;

    #[tokio::test]
    async fn list_and_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "123456789012345", "name": "demo", "icon": "f00d", "secret": "s"},
                {"id": "2", "name": "other"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/oauth2/applications/123456789012345"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "123456789012345", "name": "demo"})),
            )
            .mount(&server)
            .await;

        let client = session(&server).as_client().unwrap();

        let apps = client.applications().complete().await.unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(
            apps[0].icon_url().as_deref(),
            Some("https://cdn.discordapp.com/app-icons/123456789012345/f00d.jpg")
        );

        let app = client
            .application_by_id(Snowflake::new(123456789012345))
            .complete()
            .await
            .unwrap();
        assert_eq!(app, apps[0]);
    }

    #[tokio::test]
    async fn text_body_on_success_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/tokens"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = session(&server)
            .as_client()
            .unwrap()
            .authorized_applications()
            .complete()
            .await;

        assert!(matches!(result, Err(ActionError::Malformed(_))));
    }
}

// =============================================================================
// Webhooks
// =============================================================================

mod webhook_tests {
    use super::*;

    #[tokio::test]
    async fn delete_missing_webhook_fails_and_keeps_registry_entry() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/webhooks/50"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"code": 10015, "message": "Unknown Webhook"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        let hook = session
            .ingest()
            .upsert_webhook(&webhook_payload(None))
            .unwrap();

        let err = hook.delete().complete().await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            err.response().and_then(|r| r.error_message()),
            Some("Unknown Webhook")
        );
        assert!(session.webhooks().contains(hook.id()));
    }

    #[tokio::test]
    async fn successful_delete_does_not_evict() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/webhooks/50/secret"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        let hook = session
            .ingest()
            .upsert_webhook(&webhook_payload(Some("secret")))
            .unwrap();

        hook.delete().complete().await.unwrap();
        assert!(session.webhooks().contains(hook.id()));

        session.ingest().remove_webhook(hook.id());
        assert!(!session.webhooks().contains(hook.id()));
    }

    #[tokio::test]
    async fn channel_webhooks_are_registered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels/2/webhooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                webhook_payload(Some("secret")),
                {"id": "51", "guild_id": "1", "channel_id": "2", "name": "other"}
            ])))
            .mount(&server)
            .await;

        let session = session(&server);
        let channel = session
            .ingest()
            .upsert_text_channel(Snowflake::new(2), Snowflake::new(1), "general");

        let hooks = channel.webhooks().complete().await.unwrap();

        assert_eq!(hooks.len(), 2);
        assert_eq!(session.webhooks().len(), 2);
        let hook = session.webhooks().get(Snowflake::new(50)).unwrap();
        assert!(Arc::ptr_eq(&hook.channel().unwrap(), &channel));
        assert_eq!(
            hook.url(),
            Some(format!("{}/webhooks/50/secret", server.uri()))
        );
    }

    #[tokio::test]
    async fn staged_update_sends_one_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/webhooks/50"))
            .and(body_json(json!({"name": "renamed", "channel_id": "3"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "50",
                "guild_id": "1",
                "channel_id": "3",
                "name": "renamed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        let hook = session
            .ingest()
            .upsert_webhook(&webhook_payload(Some("secret")))
            .unwrap();

        let manager = hook.manager_updatable();
        manager.stage_name("renamed");
        manager.stage_channel(Snowflake::new(3));
        manager.update().complete().await.unwrap();

        let current = session.webhooks().get(Snowflake::new(50)).unwrap();
        assert_eq!(current.channel_id(), Snowflake::new(3));
        assert_eq!(current.name().as_deref(), Some("renamed"));
        assert_eq!(current.token().as_deref(), Some("secret"));
    }
}

// =============================================================================
// Failure classification
// =============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn rate_limit_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/applications"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "5")
                    .set_body_json(json!({"message": "You are being rate limited."})),
            )
            .expect(1) // No retries
            .mount(&server)
            .await;

        let err = session(&server)
            .as_client()
            .unwrap()
            .applications()
            .complete()
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert_eq!(err.response().unwrap().header("Retry-After"), Some("5"));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/tokens"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let result = session(&server)
            .as_client()
            .unwrap()
            .authorized_applications()
            .complete()
            .await;

        assert!(matches!(
            result,
            Err(ActionError::Transport(TransportError::Timeout))
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let server = MockServer::start().await;
        let config = config(&server, "client");
        drop(server);

        let session = Session::builder("tok").config(config).build().unwrap();
        let result = session
            .as_client()
            .unwrap()
            .applications()
            .complete()
            .await;

        assert!(matches!(
            result,
            Err(ActionError::Transport(TransportError::Network(_)))
        ));
    }
}
