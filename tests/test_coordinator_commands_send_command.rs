mod common;
use common::*;

use axpert_panel::coordinator::commands::send_command::SendCommand;
use axpert_panel::prelude::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn happy_path() {
    common_setup();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/command/setChargerPriority")
        .match_body(Matcher::Json(json!({
            "value": "solarandutility",
            "serialno": "92931805100001"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "command": "setChargerPriority",
                "value": "solarandutility",
                "status": "success",
                "message": "Command executed successfully"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let command = PanelCommand::SetChargerPriority(
        "92931805100001".to_string(),
        ChargerSourcePriority::SolarAndUtility,
    );
    let channels = Channels::new();
    let mut to_panel = channels.to_panel.subscribe();
    let subject = SendCommand::new(
        Factory::gateway(&server.url()),
        channels.clone(),
        command.clone(),
    );

    let result = subject.run().await.unwrap();

    assert_eq!(result, CommandResult::Success);
    assert_eq!(
        recv_panel(&mut to_panel).await,
        panel::ChannelData::CommandOutcome(command, CommandResult::Success)
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn rejection_carries_the_gateway_message() {
    common_setup();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/command/setOutputPriority")
        .with_status(403)
        .with_body("Control API is disabled\n")
        .create_async()
        .await;

    let command = PanelCommand::SetOutputPriority(
        "92931805100001".to_string(),
        OutputSourcePriority::Sbu,
    );
    let channels = Channels::new();
    let mut to_panel = channels.to_panel.subscribe();
    let subject = SendCommand::new(
        Factory::gateway(&server.url()),
        channels.clone(),
        command.clone(),
    );

    let result = subject.run().await.unwrap();

    assert_eq!(
        result,
        CommandResult::Failed("Control API is disabled".to_string())
    );
    assert_eq!(
        recv_panel(&mut to_panel).await,
        panel::ChannelData::CommandOutcome(command, result)
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn transport_error_becomes_operator_message() {
    common_setup();

    let command =
        PanelCommand::SetMaxChargeCurrent("92931805100001".to_string(), "30".to_string());
    let channels = Channels::new();
    let mut to_panel = channels.to_panel.subscribe();
    let gateway = GatewayClient::new("http://127.0.0.1:1", Duration::from_millis(200)).unwrap();
    let subject = SendCommand::new(gateway, channels.clone(), command.clone());

    let result = subject.run().await.unwrap();

    assert_eq!(
        result,
        CommandResult::Failed("Network error - please try again".to_string())
    );
    assert_eq!(
        recv_panel(&mut to_panel).await,
        panel::ChannelData::CommandOutcome(command, result)
    );
}

#[tokio::test]
async fn panel_not_receiving() {
    common_setup();

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/command/setOutputPriority")
        .with_status(200)
        .with_body(
            json!({
                "command": "setOutputPriority",
                "value": "solar",
                "status": "success",
                "message": "Command executed successfully"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let command = PanelCommand::SetOutputPriority(
        "92931805100001".to_string(),
        OutputSourcePriority::Solar,
    );
    let channels = Channels::new();
    let subject = SendCommand::new(Factory::gateway(&server.url()), channels.clone(), command);

    let result = subject.run().await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "send(to_panel) failed - channel closed?"
    );
}
