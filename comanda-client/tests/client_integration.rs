// comanda-client/tests/client_integration.rs
// Integration tests against an in-process mock backend

use axum::{Json, Router, routing::post};
use comanda_client::{BackendClient, ClientError, EndpointError};
use serde_json::{Value, json};
use shared::feed::{FeedEvent, FeedSender};
use shared::models::{OrderId, OrderKind};
use shared::settings::{Settings, SettingsHandle};
use std::time::Duration;

/// Spawn a mock backend and return its host string (`127.0.0.1:<port>`,
/// which normalization keeps on plain http).
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/webservices/pedidos/", post(pedidos))
        .route("/webservices/lojas/", post(lojas));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("127.0.0.1:{}", addr.port())
}

async fn pedidos(Json(payload): Json<Value>) -> Json<Value> {
    if payload.get("listar").and_then(Value::as_str) == Some("queue") {
        return Json(json!({
            "data": {
                "waiting": 2,
                "lista": [
                    { "id": 41, "delivery": 0 },
                    { "id": "42", "delivery": "1" },
                ]
            }
        }));
    }

    match payload.get("id").and_then(Value::as_i64) {
        Some(7) => Json(json!({ "data": { "id": 7, "delivery": 1 } })),
        _ => Json(json!({ "data": [] })),
    }
}

async fn lojas(Json(_): Json<Value>) -> Json<Value> {
    Json(json!({
        "data": [
            { "id": 1, "nome": "Matriz" },
            { "id": "2", "nome": "Filial" },
        ]
    }))
}

fn client_for(host: &str) -> (BackendClient, tokio::sync::mpsc::UnboundedReceiver<FeedEvent>) {
    let settings = Settings {
        host: host.to_string(),
        backoff_secs: 0,
        ..Settings::default()
    };
    let (feed, rx) = FeedSender::channel();
    (BackendClient::new(SettingsHandle::new(settings), feed), rx)
}

#[tokio::test]
async fn fetches_order_by_id() {
    let host = spawn_backend().await;
    let (client, _rx) = client_for(&host);

    let order = client.get_order_by_id(OrderId(7)).await.unwrap().unwrap();
    assert_eq!(order.id, OrderId(7));
    assert_eq!(order.kind, OrderKind::Delivery);
}

#[tokio::test]
async fn missing_order_is_none() {
    let host = spawn_backend().await;
    let (client, _rx) = client_for(&host);

    assert!(client.get_order_by_id(OrderId(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn fetches_store_list() {
    let host = spawn_backend().await;
    let (client, _rx) = client_for(&host);

    let stores = client.get_stores().await.unwrap();
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].name, "Matriz");
    assert_eq!(stores[1].id, 2);
}

#[tokio::test]
async fn fetches_waiting_queue() {
    let host = spawn_backend().await;
    let (client, _rx) = client_for(&host);

    let queue = client.get_waiting_orders(1).await.unwrap();
    assert_eq!(queue.waiting, 2);
    assert_eq!(queue.lista.len(), 2);
    assert_eq!(queue.lista[1].id, OrderId(42));
    assert_eq!(queue.lista[1].kind, OrderKind::Delivery);
}

#[tokio::test]
async fn empty_host_alerts_without_network() {
    let (client, mut rx) = client_for("");

    let result = client.get_order_by_id(OrderId(1)).await;
    assert!(matches!(
        result,
        Err(ClientError::Endpoint(EndpointError::Missing))
    ));

    // the configuration alert is raised, and no progress signaling
    // happened because no attempt was ever started
    match rx.try_recv() {
        Ok(FeedEvent::Alert { title, .. }) => assert_eq!(title, "Erro 400"),
        other => panic!("expected alert, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn retry_exhaustion_degrades_to_empty_queue() {
    // unreachable local port; every attempt fails fast with a transport
    // error and the zero backoff keeps the test quick
    let (client, mut rx) = client_for("127.0.0.1:1");

    let queue = tokio::time::timeout(Duration::from_secs(20), client.get_waiting_orders(1))
        .await
        .expect("retry loop must not hang")
        .unwrap();

    assert_eq!(queue.waiting, 0);
    assert!(queue.lista.is_empty());

    // progress was signaled on and back off even though every attempt failed
    let mut signals = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let FeedEvent::Progress(busy) = event {
            signals.push(busy);
        }
    }
    assert_eq!(signals, vec![true, false]);
}

#[tokio::test]
async fn busy_signal_follows_requests() {
    let host = spawn_backend().await;
    let (client, _rx) = client_for(&host);

    let busy = client.busy_signal();
    assert!(!*busy.borrow());

    client.get_stores().await.unwrap();
    assert!(!*busy.borrow());
}
