// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the device API client using wiremock.

use std::sync::Arc;
use std::time::Duration;

use eolia_lib::command::UpdateDeviceRequest;
use eolia_lib::coordinator::{ApplianceCoordinator, CoordinatorConfig};
use eolia_lib::protocol::{ClientConfig, EoliaClient};
use eolia_lib::types::{OperationMode, WindVolume};
use eolia_lib::{Error, ProtocolError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_USER_AGENT: &str = "%E3%82%A8%E3%82%AA%E3%83%AA%E3%82%A2/81 CFNetwork/3826.600.31 Darwin/24.6.0";

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_api_base_url(server.uri())
        .with_auth_base_url(server.uri())
}

fn client(server: &MockServer) -> EoliaClient {
    EoliaClient::from_tokens(config(server), "access-1", "refresh-1").unwrap()
}

fn status_body(token: &str) -> serde_json::Value {
    json!({
        "appliance_id": "A1",
        "operation_status": true,
        "operation_mode": "Cooling",
        "temperature": 26.0,
        "wind_volume": 0,
        "wind_direction": 0,
        "inside_temp": 28.0,
        "inside_humidity": 55,
        "outside_temp": 31.5,
        "timer_value": 0,
        "air_flow": "not_set",
        "wind_direction_horizon": "auto",
        "operation_token": token
    })
}

// ============================================================================
// Reads
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn list_devices_sends_app_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices"))
            .and(header("Authorization", "Bearer access-1"))
            .and(header("Content-Type", "application/Json; charset=UTF-8"))
            .and(header("Accept", "application/json"))
            .and(header("User-Agent", APP_USER_AGENT))
            .and(header_exists("X-Eolia-Date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ac_list": [
                    {"appliance_id": "A1", "nickname": "Living room", "product_code": "CS-X400D2"},
                    {"appliance_id": "B2", "vpa_enable": true}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let devices = client(&server).list_devices().await.unwrap().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].display_name(), "Living room");
        assert_eq!(devices[1].display_name(), "B2");
    }

    #[tokio::test]
    async fn get_status_encodes_appliance_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1%2BB%2FC/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("tok-1")))
            .expect(1)
            .mount(&server)
            .await;

        let status = client(&server).get_status("A1+B/C").await.unwrap().unwrap();
        assert_eq!(status.mode(), Some(OperationMode::Cooling));
        assert_eq!(status.fan_volume(), Some(WindVolume::Auto));
        assert_eq!(status.inside_humidity, Some(55.0));
        assert_eq!(status.operation_token.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn server_error_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(500).set_body_string("maintenance"))
            .mount(&server)
            .await;

        assert!(client(&server).get_status("A1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn timeout_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ac_list": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = config(&server).with_timeout(Duration::from_millis(200));
        let client = EoliaClient::from_tokens(config, "access-1", "refresh-1").unwrap();

        assert!(client.list_devices().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).get_status("A1").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn product_functions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/products/CS-X400D2/functions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ac_function_list": [{"function_id": "nanoex", "function_value": "1"}],
                "product_code": "CS-X400D2"
            })))
            .mount(&server)
            .await;

        let functions = client(&server)
            .get_product_functions("CS-X400D2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(functions.function("nanoex"), Some(&json!("1")));
    }
}

// ============================================================================
// Writes
// ============================================================================

mod writes {
    use super::*;

    #[tokio::test]
    async fn put_refills_missing_token_from_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("tok-9")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .and(body_partial_json(json!({
                "operation_token": "tok-9",
                "temperature": "24.0",
                "operation_mode": "Cooling"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("tok-10")))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest::default()
            .with_mode(OperationMode::Cooling, true)
            .with_temperature(24.0);

        let status = client(&server).put_status("A1", &request).await.unwrap().unwrap();
        assert_eq!(status.operation_token.as_deref(), Some("tok-10"));
    }

    #[tokio::test]
    async fn put_uses_empty_token_when_status_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .and(body_partial_json(json!({"operation_token": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("tok-1")))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest::default().with_power(false);
        assert!(client(&server).put_status("A1", &request).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn put_keeps_supplied_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("other")))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .and(body_partial_json(json!({"operation_token": "mine"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("next")))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest::default().with_operation_token(Some("mine".to_string()));
        assert!(client(&server).put_status("A1", &request).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn conflict_means_locked() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest::default().with_operation_token(Some(String::new()));
        let err = client(&server).put_status("A1", &request).await.unwrap_err();
        assert!(err.is_device_locked());
    }

    #[tokio::test]
    async fn lock_error_code_means_locked() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "EOLIA-4008",
                "message": "another device is operating"
            })))
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest::default().with_operation_token(Some(String::new()));
        let err = client(&server).put_status("A1", &request).await.unwrap_err();
        assert!(matches!(err, Error::DeviceLocked { ref appliance_id } if appliance_id == "A1"));
    }

    #[tokio::test]
    async fn other_rejection_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"code": "EOLIA-4001"})))
            .mount(&server)
            .await;

        let request = UpdateDeviceRequest::default().with_operation_token(Some(String::new()));
        assert!(client(&server).put_status("A1", &request).await.unwrap().is_none());
    }
}

// ============================================================================
// Session recovery
// ============================================================================

mod session {
    use super::*;

    async fn mount_refresh(server: &MockServer, status: u16, body: serde_json::Value, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_partial_json(json!({
                "grant_type": "refresh_token",
                "refresh_token": "refresh-1"
            })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(calls)
            .mount(server)
            .await;
    }

    async fn mount_devices(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices"))
            .and(header("Authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices"))
            .and(header("Authorization", "Bearer access-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ac_list": [{"appliance_id": "A1"}]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unauthorized_refreshes_and_retries() {
        let server = MockServer::start().await;
        mount_devices(&server).await;
        mount_refresh(
            &server,
            200,
            json!({"access_token": "access-2", "expires_in": 86400, "token_type": "Bearer"}),
            1,
        )
        .await;

        let client = client(&server);
        let devices = client.list_devices().await.unwrap().unwrap();
        assert_eq!(devices[0].appliance_id, "A1");

        let tokens = client.tokens().unwrap();
        assert_eq!(tokens.access_token, "access-2");
        assert_eq!(tokens.refresh_token, "refresh-1");
    }

    #[tokio::test]
    async fn rotated_refresh_token_is_kept() {
        let server = MockServer::start().await;
        mount_refresh(
            &server,
            200,
            json!({"access_token": "access-2", "refresh_token": "refresh-2"}),
            1,
        )
        .await;

        let client = client(&server);
        client.refresh().await.unwrap();
        assert_eq!(client.tokens().unwrap().refresh_token, "refresh-2");
    }

    #[tokio::test]
    async fn concurrent_rejections_refresh_once() {
        let server = MockServer::start().await;
        mount_devices(&server).await;
        mount_refresh(&server, 200, json!({"access_token": "access-2"}), 1).await;

        let client = client(&server);
        let (first, second) = tokio::join!(client.list_devices(), client.list_devices());
        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_some());
    }

    #[tokio::test]
    async fn failed_refresh_without_credentials_surfaces() {
        let server = MockServer::start().await;
        mount_devices(&server).await;
        mount_refresh(&server, 403, json!({"error": "invalid_grant"}), 1).await;

        let err = client(&server).list_devices().await.unwrap_err();
        assert!(matches!(err, Error::TokenRefresh(_)));
    }

    #[tokio::test]
    async fn refresh_without_access_token_fails() {
        let server = MockServer::start().await;
        mount_refresh(&server, 200, json!({"token_type": "Bearer"}), 1).await;

        let err = client(&server).refresh().await.unwrap_err();
        assert!(matches!(err, Error::TokenRefresh(_)));
    }

    #[tokio::test]
    async fn unauthenticated_client_makes_no_request() {
        let server = MockServer::start().await;
        let client = EoliaClient::new(
            config(&server),
            eolia_lib::Credentials::new("user@example.com", "secret"),
        )
        .unwrap();

        let err = client.list_devices().await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_a_protocol_error() {
        let config = ClientConfig::new().with_api_base_url("http://127.0.0.1:9");
        let client = EoliaClient::from_tokens(config, "access-1", "refresh-1").unwrap();

        let err = client.list_devices().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::Http(_))));
    }
}

// ============================================================================
// Coordinator over HTTP
// ============================================================================

mod coordinator {
    use super::*;

    #[tokio::test]
    async fn set_temperature_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("from-poll")))
            .mount(&server)
            .await;

        // No fresh token is cached, so the client refills it from the status.
        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .and(body_partial_json(json!({
                "temperature": "24.5",
                "operation_mode": "Cooling",
                "wind_volume": 0,
                "operation_token": "from-poll"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("tok-1")))
            .expect(1)
            .mount(&server)
            .await;

        let appliance = serde_json::from_value(json!({"appliance_id": "A1"})).unwrap();
        let coordinator =
            ApplianceCoordinator::new(Arc::new(client(&server)), appliance, CoordinatorConfig::new());

        let status = coordinator.set_temperature(24.5).await.unwrap();
        assert_eq!(status.operation_token.as_deref(), Some("tok-1"));
        assert!(coordinator.last_update_succeeded());
    }

    #[tokio::test]
    async fn echoed_string_scalars_keep_the_new_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eolia/v6/devices/A1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("from-poll")))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .and(body_partial_json(json!({"operation_token": "from-poll"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "appliance_id": "A1",
                "operation_status": true,
                "operation_mode": "Cooling",
                "temperature": "24.0",
                "timer_value": "0",
                "device_errstatus": 0,
                "operation_token": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/eolia/v6/devices/A1/status"))
            .and(body_partial_json(json!({"operation_token": "t1", "temperature": "23.0"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("t2")))
            .expect(1)
            .mount(&server)
            .await;

        let appliance = serde_json::from_value(json!({"appliance_id": "A1"})).unwrap();
        let coordinator =
            ApplianceCoordinator::new(Arc::new(client(&server)), appliance, CoordinatorConfig::new());

        let status = coordinator.set_temperature(24.0).await.unwrap();
        assert_eq!(status.temperature, Some(24.0));
        assert_eq!(status.device_errstatus, Some(false));

        let status = coordinator.set_temperature(23.0).await.unwrap();
        assert_eq!(status.operation_token.as_deref(), Some("t2"));
    }
}
