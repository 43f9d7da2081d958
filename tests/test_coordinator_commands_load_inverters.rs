mod common;
use common::*;

use axpert_panel::coordinator::commands::load_inverters::LoadInverters;
use axpert_panel::prelude::*;
use mockito::Server;
use serde_json::json;

#[tokio::test]
async fn happy_path() {
    common_setup();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/inverters")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "inverters": [
                    {"serialno": "92931805100001", "model": "Axpert VM III 5K"},
                    {"serialno": "92931805100002"}
                ],
                "count": 2
            })
            .to_string(),
        )
        .create_async()
        .await;

    let channels = Channels::new();
    let mut to_panel = channels.to_panel.subscribe();
    let subject = LoadInverters::new(Factory::gateway(&server.url()), channels.clone());

    let list = subject.run().await.unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].serialno, "92931805100001");
    assert_eq!(list[0].model.as_deref(), Some("Axpert VM III 5K"));
    assert_eq!(list[1].model, None);

    assert_eq!(
        recv_panel(&mut to_panel).await,
        panel::ChannelData::Inverters(list.clone())
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn gateway_failure_notifies_panel() {
    common_setup();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/inverters")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let channels = Channels::new();
    let mut to_panel = channels.to_panel.subscribe();
    let subject = LoadInverters::new(Factory::gateway(&server.url()), channels.clone());

    let result = subject.run().await;

    assert!(result
        .unwrap_err()
        .to_string()
        .starts_with("inverter list fetch failed"));
    assert_eq!(
        recv_panel(&mut to_panel).await,
        panel::ChannelData::InvertersFailed
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn panel_not_receiving() {
    common_setup();

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/inverters")
        .with_status(200)
        .with_body(json!({"inverters": [], "count": 0}).to_string())
        .create_async()
        .await;

    let channels = Channels::new();
    let subject = LoadInverters::new(Factory::gateway(&server.url()), channels.clone());

    let result = subject.run().await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "send(to_panel) failed - channel closed?"
    );
}
