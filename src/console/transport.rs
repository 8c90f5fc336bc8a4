//! WebSocket 传输（tokio-tungstenite）
//!
//! open 在后台任务中建立连接，读写都在该任务里完成；任务只通过事件通道向外回报，
//! 出站文本经无界队列交给任务写出。close 通过 CancellationToken 结束任务，并尽量发送关闭帧。

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tokio_util::sync::CancellationToken;

use super::connection::{ConnectionEvent, Transport, ABNORMAL_CLOSURE, NO_STATUS_RECEIVED};
use crate::core::ConsoleError;

#[derive(Default)]
pub struct WsTransport {
    outbound: Option<mpsc::UnboundedSender<String>>,
    cancel: CancellationToken,
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for WsTransport {
    fn open(&mut self, endpoint: &str, events: mpsc::UnboundedSender<ConnectionEvent>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        self.outbound = Some(out_tx);
        tokio::spawn(run_socket(
            endpoint.to_string(),
            out_rx,
            events,
            self.cancel.clone(),
        ));
    }

    fn send(&mut self, text: &str) -> Result<(), ConsoleError> {
        let outbound = self.outbound.as_ref().ok_or(ConsoleError::NotConnected)?;
        outbound
            .send(text.to_string())
            .map_err(|e| ConsoleError::SendFailed(e.to_string()))
    }

    fn close(&mut self) {
        self.outbound = None;
        self.cancel.cancel();
    }
}

async fn run_socket(
    endpoint: String,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    cancel: CancellationToken,
) {
    let connected = tokio::select! {
        _ = cancel.cancelled() => return,
        result = connect_async(endpoint.as_str()) => result,
    };

    let ws_stream = match connected {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            let _ = events.send(ConnectionEvent::Error(e.to_string()));
            let _ = events.send(ConnectionEvent::Closed(ABNORMAL_CLOSURE));
            return;
        }
    };
    let _ = events.send(ConnectionEvent::Opened);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = write.send(WsMessage::Close(None)).await;
                tracing::debug!("Socket task cancelled");
                break;
            }
            Some(text) = outbound_rx.recv() => {
                if let Err(e) = write.send(WsMessage::Text(text)).await {
                    let _ = events.send(ConnectionEvent::Error(e.to_string()));
                    let _ = events.send(ConnectionEvent::Closed(ABNORMAL_CLOSURE));
                    break;
                }
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        let _ = events.send(ConnectionEvent::Message(text));
                    }
                    Some(Ok(WsMessage::Binary(data))) => {
                        let text = String::from_utf8_lossy(&data).into_owned();
                        let _ = events.send(ConnectionEvent::Message(text));
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        let code = frame
                            .map(|f| u16::from(f.code))
                            .unwrap_or(NO_STATUS_RECEIVED);
                        let _ = events.send(ConnectionEvent::Closed(code));
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let _ = events.send(ConnectionEvent::Error(e.to_string()));
                        let _ = events.send(ConnectionEvent::Closed(ABNORMAL_CLOSURE));
                        break;
                    }
                    None => {
                        let _ = events.send(ConnectionEvent::Closed(ABNORMAL_CLOSURE));
                        break;
                    }
                }
            }
        }
    }
}
