//! Backend client tests against a local HTTP server

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use deploy_api::models::{DeployStatus, HostStatus, TagTarget};
use deploy_console::actions::Action;
use deploy_console::app::state::load_page;
use deploy_console::errors::ConsoleError;
use deploy_console::http::client::HttpClient;
use deploy_console::http::repo::{CommandSink, StatusSource};
use deploy_console::view::BadgeStyle;
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

const STATUS_BODY: &str = r#"{
    "status": 1,
    "task_running": "r0.0.3",
    "stage": "rsync to hosts",
    "hosts_status": {"web01": 2, "web02": 3},
    "last_commit": "abc",
    "last_commit_tag": "r0.0.2",
    "task_waiting": ["r0.0.4"],
    "cancel_flag": false,
    "auto_deploy_enable": true,
    "process_percent": 40
}"#;

/// Idle repository as reported right after backend startup
const IDLE_AT_STARTUP: &str = r#"{
    "status": 3,
    "hosts_status": {"web01": 1, "web02": 1},
    "stage": null,
    "last_commit": "abc",
    "last_commit_tag": "",
    "cancel_flag": false,
    "auto_deploy_enable": true,
    "task_running": "",
    "process_percent": 0,
    "task_waiting": []
}"#;

/// Idle repository after a finished deployment of a tagged commit
const IDLE_AFTER_DEPLOY: &str = r#"{
    "status": 3,
    "hosts_status": {"web01": 3, "web02": 4},
    "stage": null,
    "last_commit": "abc",
    "last_commit_tag": "r0.0.2",
    "cancel_flag": false,
    "auto_deploy_enable": false,
    "task_running": "",
    "process_percent": 100,
    "task_waiting": []
}"#;

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<String>>>,
}

async fn record(State(reply): State<Reply>, method: Method, uri: Uri) -> Response {
    reply
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}", method, uri.path()));
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// Backend stand-in answering every request with the same response and
/// recording the method and path it saw
struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    async fn start(status: StatusCode, body: &'static str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record).with_state(Reply {
            status,
            body,
            requests: requests.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/deploy", addr),
            requests,
        }
    }

    fn client(&self) -> HttpClient {
        HttpClient::new(&self.base_url, None).unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_fetch_status_decodes_snapshot() {
    let server = TestServer::start(StatusCode::OK, STATUS_BODY).await;

    let snapshot = assert_ok!(server.client().fetch_status("shop").await);

    assert_eq!(snapshot.status, DeployStatus::Running);
    assert_eq!(snapshot.task_running, "r0.0.3");
    assert_eq!(snapshot.hosts_status["web01"], HostStatus::Deploying);
    assert_eq!(snapshot.hosts_status["web02"], HostStatus::Success);
    assert_eq!(snapshot.task_waiting, vec!["r0.0.4".to_string()]);
    assert_eq!(snapshot.process_percent, 40);
    assert_eq!(
        server.requests(),
        vec!["GET /deploy/repo/shop/status".to_string()]
    );
}

#[tokio::test]
async fn test_fetch_idle_snapshot_with_null_stage() {
    let server = TestServer::start(StatusCode::OK, IDLE_AT_STARTUP).await;

    let snapshot = assert_ok!(server.client().fetch_status("shop").await);

    assert_eq!(snapshot.status, DeployStatus::Idle);
    assert_eq!(snapshot.stage, "");
    assert_eq!(snapshot.task_running, "");
    assert_eq!(snapshot.last_commit_tag, "");
    assert_eq!(snapshot.hosts_status["web01"], HostStatus::Normal);
}

#[tokio::test]
async fn test_idle_repository_page_loads() {
    let server = TestServer::start(StatusCode::OK, IDLE_AT_STARTUP).await;

    let view = assert_ok!(load_page(&server.client(), "shop", &[]).await);

    assert_eq!(view.status().style, Some(BadgeStyle::Primary));
    assert_eq!(view.status().text, "idle");
    assert_eq!(view.stage(), "");
    assert_eq!(view.task_running(), "none");
    assert_eq!(view.commit_label(), "abc");
    assert!(view.deploy_status_hidden());
    assert_eq!(view.progress_text(), "0%");
}

#[tokio::test]
async fn test_page_loads_after_finished_deployment() {
    let server = TestServer::start(StatusCode::OK, IDLE_AFTER_DEPLOY).await;
    let tags = [TagTarget::new("r0.0.1", "aaa")];

    let view = assert_ok!(load_page(&server.client(), "shop", &tags).await);

    assert_eq!(view.stage(), "");
    assert_eq!(view.host("web01").unwrap().text, "deploy succeeded");
    assert_eq!(view.host("web02").unwrap().text, "deploy failed");
    assert_eq!(view.commit_label(), "abc / r0.0.2");
    assert_eq!(view.visible_tags(), vec!["r0.0.2"]);
    assert!(view.auto_deploy_disable().active);
}

#[tokio::test]
async fn test_fetch_status_error_response() {
    let server = TestServer::start(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;

    let result = server.client().fetch_status("shop").await;

    assert!(matches!(result, Err(ConsoleError::FetchError(_))));
}

#[tokio::test]
async fn test_fetch_status_unknown_code_is_an_error() {
    let server = TestServer::start(StatusCode::OK, r#"{"status": 9}"#).await;

    assert_err!(server.client().fetch_status("shop").await);
}

#[tokio::test]
async fn test_commands_use_put_endpoints() {
    let server = TestServer::start(StatusCode::OK, "").await;
    let client = server.client();

    let actions = [
        Action::CancelAndRollbackNow,
        Action::EnableAutoDeploy,
        Action::DisableAutoDeploy,
        Action::RollbackToTag(TagTarget::new("r0.0.1", "aaa")),
    ];
    for action in &actions {
        assert_ok!(client.send("shop", action).await);
    }

    assert_eq!(
        server.requests(),
        vec![
            "PUT /deploy/repo/shop/cancel".to_string(),
            "PUT /deploy/repo/shop/enable_auto".to_string(),
            "PUT /deploy/repo/shop/disable_auto".to_string(),
            "PUT /deploy/repo/shop/rollback/aaa/r0.0.1".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_command_error_response() {
    let server = TestServer::start(StatusCode::CONFLICT, r#"{"error": "busy"}"#).await;

    let result = server
        .client()
        .send("shop", &Action::CancelAndRollbackNow)
        .await;

    assert!(matches!(result, Err(ConsoleError::CommandError(_))));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = HttpClient::new(&format!("http://{}/deploy", addr), None).unwrap();

    assert!(client.fetch_status("shop").await.is_err());
    assert!(matches!(
        client.send("shop", &Action::EnableAutoDeploy).await,
        Err(ConsoleError::CommandError(_))
    ));
}
