use std::{
    future::Future,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use rmcp::{
    model::ServerJsonRpcMessage,
    service::{serve_directly, RoleClient, RxJsonRpcMessage, ServiceExt, TxJsonRpcMessage},
    transport::Transport as RmcpTransport,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::transport::MCPRunningService;

/// How the scripted server answers one request.
pub(crate) enum ScriptedReply {
    Result(Value),
    Error { code: i64, message: String },
    Ignore,
}

impl ScriptedReply {
    pub(crate) fn result(value: Value) -> Self {
        Self::Result(value)
    }

    pub(crate) fn error(code: i64, message: &str) -> Self {
        Self::Error {
            code,
            message: message.to_string(),
        }
    }
}

struct ChannelRmcpTransport {
    outbound: UnboundedSender<TxJsonRpcMessage<RoleClient>>,
    inbound: UnboundedReceiver<RxJsonRpcMessage<RoleClient>>,
    close_calls: Arc<AtomicUsize>,
}

impl RmcpTransport<RoleClient> for ChannelRmcpTransport {
    type Error = io::Error;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleClient>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        let tx = self.outbound.clone();
        async move {
            tx.send(item).map_err(|_| {
                io::Error::new(io::ErrorKind::BrokenPipe, "scripted rmcp channel closed")
            })
        }
    }

    async fn receive(&mut self) -> Option<RxJsonRpcMessage<RoleClient>> {
        self.inbound.recv().await
    }

    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.inbound.close();
        std::future::ready(Ok(()))
    }
}

/// An initialized client service whose server side is a closure over
/// `(method, params)`. Also returns a counter of transport closes.
pub(crate) fn scripted_running_service<F>(handler: F) -> (MCPRunningService, Arc<AtomicUsize>)
where
    F: Fn(&str, &Value) -> ScriptedReply + Send + 'static,
{
    let (outbound_tx, mut outbound_rx) = unbounded_channel::<TxJsonRpcMessage<RoleClient>>();
    let (inbound_tx, inbound_rx) = unbounded_channel::<RxJsonRpcMessage<RoleClient>>();
    let close_calls = Arc::new(AtomicUsize::new(0));
    let transport = ChannelRmcpTransport {
        outbound: outbound_tx,
        inbound: inbound_rx,
        close_calls: Arc::clone(&close_calls),
    };

    tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let Ok(value) = serde_json::to_value(message) else {
                continue;
            };
            let Some(method) = value.get("method").and_then(|m| m.as_str()) else {
                continue;
            };
            let Some(id) = value.get("id").cloned() else {
                continue; // notification
            };
            let params = value.get("params").cloned().unwrap_or(Value::Null);

            let body = match handler(method, &params) {
                ScriptedReply::Result(result) => json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                }),
                ScriptedReply::Error { code, message } => json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": code, "message": message }
                }),
                ScriptedReply::Ignore => continue,
            };

            let response: ServerJsonRpcMessage =
                serde_json::from_value(body).expect("scripted response should deserialize");
            if inbound_tx.send(response).is_err() {
                return;
            }
        }
    });

    (serve_directly(().into_dyn(), transport, None), close_calls)
}
