//! Integration tests for the reports channel.
//!
//! Each test serves the real router on an ephemeral port with in-memory stores
//! and talks to it over WebSocket / HTTP.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use futures_util::{SinkExt, StreamExt};
use jsonwebtoken::{EncodingKey, Header};
use reportcast_server::{
    domain::{
        ReportEvent, ReportId, ReportPriority, ReportStatus, Role, UnitId, UserId, UserRecord,
    },
    infrastructure::{
        credential::{JwtClaims, JwtCredentialVerifier},
        repository::{InMemoryReportStore, InMemoryUserStore},
    },
    ui::{
        router,
        state::{AppState, Dependencies},
    },
    usecase::EventBroadcaster,
};
use reportcast_shared::time::FixedClock;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        Message,
        client::IntoClientRequest,
        http::{HeaderValue, header::AUTHORIZATION},
    },
};

const SECRET: &str = "integration-secret";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// In-process server with handles to its stores and broadcaster
struct TestServer {
    addr: SocketAddr,
    reports: Arc<InMemoryReportStore>,
    broadcaster: Arc<EventBroadcaster>,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        users.insert(user("admin-1", Role::Admin, None)).await;
        users.insert(user("sup-infra", Role::Supervisor, Some("infra"))).await;
        users.insert(user("worker-infra", Role::Worker, Some("infra"))).await;
        users
            .insert(user("worker-sanitation", Role::Worker, Some("sanitation")))
            .await;
        users.insert(user("student-1", Role::Student, None)).await;

        let reports = Arc::new(InMemoryReportStore::new());
        reports.add_unit(unit("infra")).await;
        reports.add_unit(unit("sanitation")).await;

        let state = AppState::new(Dependencies {
            verifier: Arc::new(JwtCredentialVerifier::new(SECRET)),
            users,
            reports: reports.clone(),
            clock: Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
            )),
            utc_offset: chrono::FixedOffset::east_opt(0).unwrap(),
            page_limit: 100,
        });
        let broadcaster = state.event_broadcaster.clone();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::new(state));
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            reports,
            broadcaster,
            task,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws/reports", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Connect with `?token=` and wait for `authenticated`
    async fn connect_as(&self, user_id: &str) -> Socket {
        let url = format!("{}?token={}", self.ws_url(), token(user_id));
        let (mut socket, _) = connect_async(url).await.unwrap();
        let event = next_event(&mut socket).await;
        assert_eq!(event["event"], "authenticated", "unexpected first frame: {event}");
        socket
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn unit(id: &str) -> UnitId {
    UnitId::new(id.to_string()).unwrap()
}

fn user(id: &str, role: Role, unit_id: Option<&str>) -> UserRecord {
    UserRecord {
        id: UserId::new(id.to_string()).unwrap(),
        role,
        supervised_unit: unit_id.filter(|_| role == Role::Supervisor).map(unit),
        assigned_unit: unit_id.filter(|_| role == Role::Worker).map(unit),
    }
}

fn token(user_id: &str) -> String {
    let claims = JwtClaims {
        id: user_id.to_string(),
        exp: Utc::now().timestamp() + 3600,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn report(id: &str, unit_id: &str, status: ReportStatus, priority: ReportPriority) -> ReportEvent {
    let created_at = Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap();
    ReportEvent {
        id: ReportId::new(id.to_string()).unwrap(),
        unit_id: unit(unit_id),
        title: format!("Report {id}"),
        description: "Needs attention".to_string(),
        location: "Campus".to_string(),
        status,
        priority,
        student_id: Some(UserId::new("student-1".to_string()).unwrap()),
        created_at,
        updated_at: created_at,
        unit_name: None,
        student_name: None,
        image_urls: Vec::new(),
    }
}

/// Next text frame as JSON; panics after 2 seconds
async fn next_event(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Whether the server closes the socket without sending another text frame
async fn closes_without_text(socket: &mut Socket) -> bool {
    loop {
        match tokio::time::timeout(Duration::from_secs(2), socket.next()).await {
            Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(Message::Text(_)))) | Err(_) => return false,
            Ok(Some(Ok(_))) => continue,
        }
    }
}

async fn send(socket: &mut Socket, event: &str) {
    let frame = json!({ "event": event }).to_string();
    socket.send(Message::text(frame)).await.unwrap();
}

#[tokio::test]
async fn test_missing_credential_is_rejected_then_closed() {
    // テスト項目: 資格情報なしの接続は auth エラーを 1 件受け取って切断される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();

    // then (期待する結果):
    let event = next_event(&mut socket).await;
    assert_eq!(
        event,
        json!({"event": "error", "data": {"type": "auth", "message": "missing credential"}})
    );
    assert!(closes_without_text(&mut socket).await);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    // テスト項目: 別の鍵で署名されたトークンは invalid credential で拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let forged = jsonwebtoken::encode(
        &Header::default(),
        &JwtClaims {
            id: "admin-1".to_string(),
            exp: Utc::now().timestamp() + 3600,
        },
        &EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    // when (操作):
    let url = format!("{}?token={}", server.ws_url(), forged);
    let (mut socket, _) = connect_async(url).await.unwrap();

    // then (期待する結果):
    let event = next_event(&mut socket).await;
    assert_eq!(event["data"]["type"], "auth");
    assert_eq!(event["data"]["message"], "invalid credential");
}

#[tokio::test]
async fn test_authorization_header_with_bearer_prefix() {
    // テスト項目: Authorization ヘッダーの Bearer トークンで認証できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut request = server.ws_url().into_client_request().unwrap();
    let value = HeaderValue::from_str(&format!("Bearer {}", token("admin-1"))).unwrap();
    request.headers_mut().insert(AUTHORIZATION, value);

    // when (操作):
    let (mut socket, _) = connect_async(request).await.unwrap();

    // then (期待する結果):
    assert_eq!(next_event(&mut socket).await["event"], "authenticated");
}

#[tokio::test]
async fn test_rooms_follow_roles() {
    // テスト項目: 管理者は admins、監督者とワーカーは自ユニットのルームに参加し、学生はどこにも参加しない
    // given (前提条件):
    let server = TestServer::start().await;
    let _admin = server.connect_as("admin-1").await;
    let _supervisor = server.connect_as("sup-infra").await;
    let _worker = server.connect_as("worker-infra").await;
    let _student = server.connect_as("student-1").await;

    // when (操作):
    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        rooms,
        json!([
            {"id": "admins", "members": 1},
            {"id": "unit_infra", "members": 2}
        ])
    );
}

#[tokio::test]
async fn test_new_report_reaches_admins_and_its_unit_only() {
    // テスト項目: sanitation のレポートは管理者と sanitation のワーカーに届き、infra のワーカーには届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut admin = server.connect_as("admin-1").await;
    let mut infra = server.connect_as("worker-infra").await;
    let mut sanitation = server.connect_as("worker-sanitation").await;
    let created = report("r1", "sanitation", ReportStatus::Pending, ReportPriority::High);
    server.reports.insert(created.clone()).await;

    // when (操作):
    server.broadcaster.broadcast_created(&created).await;

    // then (期待する結果):
    let admin_event = next_event(&mut admin).await;
    assert_eq!(admin_event["event"], "newReport");
    assert_eq!(admin_event["data"]["id"], "r1");
    assert_eq!(next_event(&mut admin).await["event"], "metrics");

    assert_eq!(next_event(&mut sanitation).await["event"], "newReport");
    let sanitation_metrics = next_event(&mut sanitation).await;
    assert_eq!(sanitation_metrics["event"], "metrics");
    assert_eq!(sanitation_metrics["data"]["scope"], "sanitation");

    let infra_event = next_event(&mut infra).await;
    assert_eq!(infra_event["event"], "metrics");
    assert_eq!(infra_event["data"]["scope"], "infra");
    assert_eq!(infra_event["data"]["totalReports"], 0);
}

#[tokio::test]
async fn test_metrics_request_for_infra_supervisor() {
    // テスト項目: infra の 6 件（pending 3 / in_progress 2 / completed 1）が監督者のメトリクスに反映される
    // given (前提条件):
    let server = TestServer::start().await;
    for (id, status) in [
        ("r1", ReportStatus::Pending),
        ("r2", ReportStatus::Pending),
        ("r3", ReportStatus::Pending),
        ("r4", ReportStatus::InProgress),
        ("r5", ReportStatus::InProgress),
        ("r6", ReportStatus::Completed),
    ] {
        server
            .reports
            .insert(report(id, "infra", status, ReportPriority::Medium))
            .await;
    }
    let mut supervisor = server.connect_as("sup-infra").await;

    // when (操作):
    send(&mut supervisor, "getInitialMetrics").await;

    // then (期待する結果):
    let event = next_event(&mut supervisor).await;
    assert_eq!(event["event"], "metrics");
    assert_eq!(
        event["data"],
        json!({
            "scope": "infra",
            "totalReports": 6,
            "reportsPending": 3,
            "reportsInProgress": 2,
            "reportsCompleted": 1,
            "lowPriorityReports": 0,
            "mediumPriorityReports": 6,
            "highPriorityReports": 0
        })
    );
}

#[tokio::test]
async fn test_global_total_equals_status_sum() {
    // テスト項目: 管理者が受け取るグローバルの total はステータス別の合計と一致する
    // given (前提条件):
    let server = TestServer::start().await;
    server
        .reports
        .insert(report("r1", "infra", ReportStatus::InProgress, ReportPriority::Low))
        .await;
    server
        .reports
        .insert(report("r2", "sanitation", ReportStatus::Completed, ReportPriority::High))
        .await;
    let mut admin = server.connect_as("admin-1").await;

    // when (操作):
    send(&mut admin, "getInitialMetrics").await;

    // then (期待する結果):
    let event = next_event(&mut admin).await;
    let data = &event["data"];
    assert_eq!(data["scope"], "global");
    let sum = data["reportsPending"].as_u64().unwrap()
        + data["reportsInProgress"].as_u64().unwrap()
        + data["reportsCompleted"].as_u64().unwrap();
    assert_eq!(data["totalReports"].as_u64().unwrap(), sum);
    assert_eq!(sum, 2);
}

#[tokio::test]
async fn test_recent_reports_are_unit_scoped() {
    // テスト項目: ワーカーの getInitialRecentReports は自ユニットの今日のレポートだけを返す
    // given (前提条件):
    let server = TestServer::start().await;
    server
        .reports
        .insert(report("r1", "infra", ReportStatus::Pending, ReportPriority::Low))
        .await;
    server
        .reports
        .insert(report("r2", "sanitation", ReportStatus::Pending, ReportPriority::Low))
        .await;
    let mut worker = server.connect_as("worker-infra").await;

    // when (操作):
    send(&mut worker, "getInitialRecentReports").await;

    // then (期待する結果):
    let event = next_event(&mut worker).await;
    assert_eq!(event["event"], "initialRecentReports");
    assert_eq!(event["data"]["count"], 1);
    assert_eq!(event["data"]["page"], 1);
    assert_eq!(event["data"]["limit"], 100);
    assert_eq!(event["data"]["data"][0]["id"], "r1");
}

#[tokio::test]
async fn test_unknown_request_keeps_connection_open() {
    // テスト項目: 未知のリクエストには request エラーを返し、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut admin = server.connect_as("admin-1").await;

    // when (操作):
    send(&mut admin, "getEverything").await;
    let error = next_event(&mut admin).await;
    send(&mut admin, "getAnnualReports").await;

    // then (期待する結果):
    assert_eq!(error["data"]["type"], "request");
    assert_eq!(next_event(&mut admin).await["event"], "annualReports");
}

#[tokio::test]
async fn test_disconnect_during_broadcast() {
    // テスト項目: ブロードキャスト中に切断してもエラーにならず、ルームからメンバーが外れる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut admin = server.connect_as("admin-1").await;
    let leaving = server.connect_as("worker-infra").await;
    let created = report("r1", "infra", ReportStatus::Pending, ReportPriority::Low);

    // when (操作):
    let broadcast = {
        let broadcaster = server.broadcaster.clone();
        let created = created.clone();
        tokio::spawn(async move { broadcaster.broadcast_created(&created).await })
    };
    drop(leaving);
    broadcast.await.unwrap();

    // then (期待する結果):
    assert_eq!(next_event(&mut admin).await["event"], "newReport");
    let client = reqwest::Client::new();
    let mut unit_room_gone = false;
    for _ in 0..40 {
        let status = client
            .get(server.http_url("/api/rooms/unit_infra"))
            .bearer_auth(token("admin-1"))
            .send()
            .await
            .unwrap()
            .status();
        if status == reqwest::StatusCode::NOT_FOUND {
            unit_room_gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(unit_room_gone);
}

#[tokio::test]
async fn test_report_notice_endpoint() {
    // テスト項目: 管理者トークン付きの通知は配信され、ワーカーのトークンは拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut admin = server.connect_as("admin-1").await;
    let client = reqwest::Client::new();
    let body = json!({
        "kind": "deleted",
        "id": "r7",
        "unitId": "infra"
    });

    // when (操作):
    let forbidden = client
        .post(server.http_url("/api/report-events"))
        .bearer_auth(token("worker-infra"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let accepted = client
        .post(server.http_url("/api/report-events"))
        .bearer_auth(token("admin-1"))
        .json(&body)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(forbidden.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(accepted.status(), reqwest::StatusCode::NO_CONTENT);
    let event = next_event(&mut admin).await;
    assert_eq!(
        event,
        json!({"event": "reportDeleted", "data": {"id": "r7", "unitId": "infra"}})
    );
}

#[tokio::test]
async fn test_room_detail_requires_admin() {
    // テスト項目: ルーム詳細は管理者トークンがある場合だけ接続 ID を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let _worker = server.connect_as("worker-infra").await;
    let client = reqwest::Client::new();
    let url = server.http_url("/api/rooms/unit_infra");

    // when (操作):
    let anonymous = client.get(&url).send().await.unwrap();
    let worker = client
        .get(&url)
        .bearer_auth(token("worker-infra"))
        .send()
        .await
        .unwrap();
    let admin = client
        .get(&url)
        .bearer_auth(token("admin-1"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(anonymous.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(worker.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(admin.status(), reqwest::StatusCode::OK);
    let detail: Value = admin.json().await.unwrap();
    assert_eq!(detail["id"], "unit_infra");
    assert_eq!(detail["members"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_report_notice_checks_token_before_body() {
    // テスト項目: トークンなしの通知は本文が不正でも 401 になり、管理者の不正な本文は 400 / 422 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let url = server.http_url("/api/report-events");

    // when (操作):
    let anonymous = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let malformed = client
        .post(&url)
        .bearer_auth(token("admin-1"))
        .body("{not json")
        .send()
        .await
        .unwrap();
    let unknown_kind = client
        .post(&url)
        .bearer_auth(token("admin-1"))
        .json(&json!({"kind": "archived", "id": "r1"}))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(anonymous.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(malformed.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(unknown_kind.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}
