//! Gateway actor - runs remote service calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::ClientConfig;
use crate::gateway::client;
use crate::messages::{GatewayCommand, GatewayResponse};

/// Actor that processes gateway commands against the remote service.
///
/// Each command is spawned into a `JoinSet`, so several operations can be in
/// flight at once and their completions reach the engine in whatever order
/// they resolve.
pub struct GatewayActor {
    client: reqwest::Client,
    base_url: String,
    response_tx: mpsc::UnboundedSender<GatewayResponse>,
    in_flight: JoinSet<()>,
}

impl GatewayActor {
    pub fn new(config: &ClientConfig, response_tx: mpsc::UnboundedSender<GatewayResponse>) -> Self {
        GatewayActor {
            client: client::create_client(config.timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            response_tx,
            in_flight: JoinSet::new(),
        }
    }

    /// Run the gateway actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<GatewayCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(GatewayCommand::FetchSessionData { id, user_id, role }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.in_flight.spawn(async move {
                                tracing::info!(id, user_id, role = role.as_str(), "fetching session data");
                                let result =
                                    client::fetch_session_data(&client, &base_url, id, user_id, role).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(GatewayCommand::UpdateStatus { id, user_id, status }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.in_flight.spawn(async move {
                                tracing::info!(id, user_id, status = status.as_str(), "updating status");
                                let result =
                                    client::update_user_status(&client, &base_url, id, user_id, status).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(GatewayCommand::AddReceipt { id, user_id, draft }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.in_flight.spawn(async move {
                                tracing::info!(id, user_id, "creating receipt");
                                let result =
                                    client::add_receipt(&client, &base_url, id, user_id, draft).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(GatewayCommand::AddPlan { id, user_id, draft }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.in_flight.spawn(async move {
                                tracing::info!(id, user_id, "creating financial plan");
                                let result =
                                    client::add_financial_plan(&client, &base_url, id, user_id, draft).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(GatewayCommand::UpdateBudgets { id, user_id, budgets }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.in_flight.spawn(async move {
                                tracing::info!(id, user_id, categories = budgets.len(), "updating budgets");
                                let result =
                                    client::update_user_budgets(&client, &base_url, id, user_id, budgets).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(GatewayCommand::Shutdown) => break,

                        None => break,
                    }
                }

                // Reap completed tasks
                Some(_result) = self.in_flight.join_next() => {}
            }
        }
    }
}
