//! Integration tests for the provisioning workflow
//!
//! Runs the workflow through the real HTTP client against a mock Fishjam
//! server and checks which requests actually reach it.
//!
//! Run with: cargo test --test provision_integration_test

use std::sync::atomic::{AtomicUsize, Ordering};

use fishjam_provisioner::{
    FishjamClient, FishjamError, ProvisionError, ProvisionStage, ProvisionStep, Provisioner,
    ServerConfig,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const STREAM_URI: &str = "rtsp://camera.local/stream1";

fn server_config(server: &MockServer) -> ServerConfig {
    ServerConfig {
        host: server.address().ip().to_string(),
        port: server.address().port(),
        token: "development".to_string(),
        ..ServerConfig::default()
    }
}

fn provisioner(server: &MockServer) -> Provisioner<FishjamClient> {
    let client = FishjamClient::new(&server_config(server)).expect("client");
    Provisioner::new(client)
}

fn room_body(id: &str) -> serde_json::Value {
    json!({
        "data": {
            "fishjam_address": "localhost:5002",
            "room": {
                "id": id,
                "config": { "videoCodec": "h264", "maxPeers": null },
                "components": [],
                "peers": []
            }
        }
    })
}

fn component_body(id: &str, kind: &str) -> serde_json::Value {
    json!({ "data": { "id": id, "type": kind } })
}

/// Hands out a fresh room id on every call
struct SequentialRooms(AtomicUsize);

impl Respond for SequentialRooms {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.0.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(201).set_body_json(room_body(&format!("room-{n}")))
    }
}

async fn mount_room(server: &MockServer, id: &str, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/room"))
        .and(header("authorization", "Bearer development"))
        .and(body_partial_json(json!({ "videoCodec": "h264" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(room_body(id)))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_component(
    server: &MockServer,
    room_id: &str,
    kind: &str,
    response: ResponseTemplate,
    expected: u64,
) {
    Mock::given(method("POST"))
        .and(path(format!("/room/{room_id}/component")))
        .and(header("authorization", "Bearer development"))
        .and(body_partial_json(json!({ "type": kind })))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_provisioning() {
    let server = MockServer::start().await;
    mount_room(&server, "room-123", 1).await;
    mount_component(
        &server,
        "room-123",
        "hls",
        ResponseTemplate::new(201).set_body_json(component_body("hls-1", "hls")),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/room/room-123/component"))
        .and(body_partial_json(json!({
            "type": "rtsp",
            "options": { "sourceUri": STREAM_URI }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(component_body("rtsp-1", "rtsp")))
        .expect(1)
        .mount(&server)
        .await;

    let report = provisioner(&server).provision(STREAM_URI).await.unwrap();

    assert_eq!(report.room_id(), "room-123");
    assert_eq!(report.stage, ProvisionStage::FullyProvisioned);
    assert!(!report.hls.id.is_empty());
    assert!(!report.rtsp.id.is_empty());
    assert_ne!(report.hls.id, report.rtsp.id);
}

#[tokio::test]
async fn test_create_room_failure_issues_no_attach() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/room"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "errors": "room limit reached" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/room/.+/component$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = provisioner(&server).provision(STREAM_URI).await.unwrap_err();

    assert_eq!(err.failed_step(), Some(ProvisionStep::CreateRoom));
    assert!(err.to_string().contains("room limit reached"));
    assert!(matches!(
        err,
        ProvisionError::ServerCommunication {
            source: FishjamError::Http { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_hls_failure_issues_no_rtsp_attach() {
    let server = MockServer::start().await;
    mount_room(&server, "room-5", 1).await;
    mount_component(
        &server,
        "room-5",
        "hls",
        ResponseTemplate::new(400).set_body_json(json!({ "errors": "HLS already attached" })),
        1,
    )
    .await;
    mount_component(&server, "room-5", "rtsp", ResponseTemplate::new(201), 0).await;

    let err = provisioner(&server).provision(STREAM_URI).await.unwrap_err();

    assert!(matches!(
        err,
        ProvisionError::ServerCommunication {
            step: ProvisionStep::AttachHls,
            reached: ProvisionStage::RoomCreated,
            ..
        }
    ));
    assert_eq!(err.room_id(), Some("room-5"));
    assert!(err.to_string().contains("room: room-5"));
}

#[tokio::test]
async fn test_rtsp_rejected_by_server() {
    let server = MockServer::start().await;
    mount_room(&server, "room-6", 1).await;
    mount_component(
        &server,
        "room-6",
        "hls",
        ResponseTemplate::new(201).set_body_json(component_body("hls-6", "hls")),
        1,
    )
    .await;
    mount_component(
        &server,
        "room-6",
        "rtsp",
        ResponseTemplate::new(400).set_body_json(json!({ "errors": "Invalid source URI" })),
        1,
    )
    .await;

    let err = provisioner(&server).provision("camera.local").await.unwrap_err();

    assert_eq!(err.failed_step(), Some(ProvisionStep::AttachRtsp));
    assert!(err.to_string().contains("Invalid source URI"));
}

#[tokio::test]
async fn test_empty_stream_uri_sends_nothing() {
    let server = MockServer::start().await;

    let err = provisioner(&server).provision("").await.unwrap_err();

    assert!(err.is_configuration());
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_repeated_provisioning_creates_distinct_rooms() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/room"))
        .respond_with(SequentialRooms(AtomicUsize::new(1)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/room/room-\d+/component$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(component_body("c-1", "hls")))
        .expect(4)
        .mount(&server)
        .await;

    let provisioner = provisioner(&server);
    let first = provisioner.provision(STREAM_URI).await.unwrap();
    let second = provisioner.provision(STREAM_URI).await.unwrap();

    assert_ne!(first.room_id(), second.room_id());
}
