//! Sync engine - message loop processing session operations and gateway completions

use tokio::sync::{mpsc, watch};

use crate::messages::{GatewayCommand, GatewayResponse, SessionOp, SessionSnapshot};
use crate::session::store::SessionStore;

/// Engine actor that owns the session store and orchestrates all flows.
///
/// One logical flow of control: operations from the presentation layer and
/// completions from the gateway are interleaved through a single `select!`
/// loop, so every state change happens in exactly one place. A snapshot is
/// published after each processed message.
pub struct SyncEngine {
    pub(crate) store: SessionStore,
    pub(crate) next_op_id: u64,
    pub(crate) pending_fetch: Option<u64>,
    pub(crate) gateway_tx: mpsc::UnboundedSender<GatewayCommand>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SyncEngine {
    pub fn new(
        gateway_tx: mpsc::UnboundedSender<GatewayCommand>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
    ) -> Self {
        SyncEngine {
            store: SessionStore::new(),
            next_op_id: 1,
            pending_fetch: None,
            gateway_tx,
            snapshot_tx,
        }
    }

    /// Allocate a unique operation ID
    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next_op_id;
        self.next_op_id += 1;
        id
    }

    /// Run the engine message loop
    pub async fn run(
        mut self,
        mut op_rx: mpsc::UnboundedReceiver<SessionOp>,
        mut gateway_rx: mpsc::UnboundedReceiver<GatewayResponse>,
    ) {
        // Publish the initial (anonymous) snapshot
        let _ = self.snapshot_tx.send(self.store.snapshot());

        loop {
            tokio::select! {
                Some(op) = op_rx.recv() => {
                    if self.handle_op(op) {
                        // Shutdown requested
                        let _ = self.gateway_tx.send(GatewayCommand::Shutdown);
                        break;
                    }
                    let _ = self.snapshot_tx.send(self.store.snapshot());
                }
                Some(response) = gateway_rx.recv() => {
                    self.handle_response(response);
                    let _ = self.snapshot_tx.send(self.store.snapshot());
                }
                else => break,
            }
        }
    }
}
