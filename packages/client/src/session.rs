//! WebSocket client session management.

use chrono::FixedOffset;
use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use reportcast_server::infrastructure::dto::websocket::{ClientRequest, ServerEvent};

use crate::{
    domain::{connect_url, parse_command},
    error::ClientError,
    formatter::DashboardFormatter,
    ui::{PROMPT, redisplay_prompt},
};

/// How a session's read side ended
enum ReadOutcome {
    Closed,
    Rejected(String),
}

/// Run one WebSocket session until the user exits or the connection ends
pub async fn run_client_session(
    url: &str,
    token: &str,
    offset: FixedOffset,
) -> Result<(), ClientError> {
    let url = connect_url(url, token)?;

    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to reports channel");
    println!("\nType 'help' for commands. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(ServerEvent::Error(payload)) if payload.r#type == "auth" => {
                            return ReadOutcome::Rejected(payload.message);
                        }
                        Ok(event) => {
                            print!("{}", DashboardFormatter::format_event(&event, offset));
                        }
                        Err(_) => {
                            print!("{}", DashboardFormatter::format_raw_message(text.as_str()));
                        }
                    }
                    redisplay_prompt();
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", DashboardFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        ReadOutcome::Closed
    });

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // rustyline blocks, so it gets its own thread
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let Some(event) = parse_command(&line).and_then(|command| command.request_event())
            else {
                print!("{}", DashboardFormatter::format_help());
                redisplay_prompt();
                continue;
            };

            let json = match serde_json::to_string(&ClientRequest::new(event)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize request: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send request: {}", e);
                return true;
            }
        }

        false
    });

    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            match read_result {
                Ok(ReadOutcome::Rejected(reason)) => Err(ClientError::AuthRejected(reason)),
                _ => Err(ClientError::ConnectionError("Connection lost".to_string())),
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            Ok(())
        }
    }
}
