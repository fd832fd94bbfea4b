//! Channel client: the public orchestrator for queries and transactions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::commit;
use crate::config::ClientConfig;
use crate::dispatch;
use crate::error::{ClientError, Result};
use crate::filter::PayloadConsistencyFilter;
use crate::options::{ExecuteOptions, QueryOptions};
use crate::proposal::{
    ContractEvent, EndorsementResponse, ExecuteResponse, Peer, ProposalRequest, TransactionId,
};
use crate::traits::{
    DiscoveryService, EventService, ProposalSender, Registration, ResponseFilter, SelectionService,
};

/// Single-shot channel for out-of-band query results.
pub type QueryNotifier = oneshot::Sender<Result<Vec<u8>>>;

/// Single-shot channel for out-of-band execute outcomes.
pub type ExecuteNotifier = oneshot::Sender<Result<ExecuteResponse>>;

/// Client for one channel of a permissioned ledger network.
///
/// Composes discovery, endorser selection, proposal transmission, and event
/// subscription into two operations: read-only queries and state-changing
/// transaction execution. Each operation has a blocking form and an
/// `_async` fire-and-forget form that delivers its outcome to a
/// caller-supplied single-shot channel.
pub struct ChannelClient {
    discovery: Arc<dyn DiscoveryService>,
    selection: Option<Arc<dyn SelectionService>>,
    sender: Arc<dyn ProposalSender>,
    events: Arc<dyn EventService>,
    config: ClientConfig,
}

impl std::fmt::Debug for ChannelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ChannelClient`].
#[derive(Default)]
pub struct ChannelClientBuilder {
    discovery: Option<Arc<dyn DiscoveryService>>,
    selection: Option<Arc<dyn SelectionService>>,
    sender: Option<Arc<dyn ProposalSender>>,
    events: Option<Arc<dyn EventService>>,
    config: Option<ClientConfig>,
}

impl ChannelClientBuilder {
    /// Set the peer discovery service (required).
    pub fn discovery(mut self, discovery: Arc<dyn DiscoveryService>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Set the endorser selection service. Without one, all discovered peers
    /// endorse.
    pub fn selection(mut self, selection: Arc<dyn SelectionService>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Set the proposal sender (required).
    pub fn sender(mut self, sender: Arc<dyn ProposalSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the event subscription service (required).
    pub fn events(mut self, events: Arc<dyn EventService>) -> Self {
        self.events = Some(events);
        self
    }

    /// Set the client configuration. Defaults apply otherwise.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ChannelClient> {
        Ok(ChannelClient {
            discovery: self
                .discovery
                .ok_or_else(|| ClientError::InvalidRequest("discovery service is required".into()))?,
            selection: self.selection,
            sender: self
                .sender
                .ok_or_else(|| ClientError::InvalidRequest("proposal sender is required".into()))?,
            events: self
                .events
                .ok_or_else(|| ClientError::InvalidRequest("event service is required".into()))?,
            config: self.config.unwrap_or_default(),
        })
    }
}

impl ChannelClient {
    /// Start building a client.
    pub fn builder() -> ChannelClientBuilder {
        ChannelClientBuilder::default()
    }

    /// Submit a read-only query with default options and return the agreed
    /// payload.
    pub async fn query(&self, request: ProposalRequest) -> Result<Vec<u8>> {
        self.query_with_opts(request, QueryOptions::default()).await
    }

    /// Submit a read-only query, blocking until the agreed payload arrives
    /// or the timeout elapses.
    pub async fn query_with_opts(
        &self,
        request: ProposalRequest,
        opts: QueryOptions,
    ) -> Result<Vec<u8>> {
        request.validate()?;
        let targets = self.resolve_targets(opts.targets, &request.contract_id).await?;
        let timeout = opts.timeout.unwrap_or_else(|| self.config.query_timeout());
        let filter = effective_filter(opts.filter);

        let tx_id = TransactionId::generate();
        debug!(tx_id = %tx_id, contract = %request.contract_id, targets = targets.len(),
            "dispatching query proposal");

        let (notifier, outcome) = oneshot::channel();
        dispatch::spawn_query(self.sender.clone(), filter, request, targets, tx_id, notifier);

        match tokio::time::timeout(timeout, outcome).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ClientError::Transmission(
                "query dispatch task ended without reporting".to_string(),
            )),
            Err(_) => Err(ClientError::QueryTimeout(timeout)),
        }
    }

    /// Submit a read-only query in fire-and-forget mode.
    ///
    /// Returns as soon as the dispatch task is running; the outcome is later
    /// published exactly once on `notifier`. The caller owns the channel's
    /// lifecycle; if the receiver is dropped the result is discarded.
    pub async fn query_async(
        &self,
        request: ProposalRequest,
        opts: QueryOptions,
        notifier: QueryNotifier,
    ) -> Result<()> {
        request.validate()?;
        let targets = self.resolve_targets(opts.targets, &request.contract_id).await?;
        let filter = effective_filter(opts.filter);

        let tx_id = TransactionId::generate();
        debug!(tx_id = %tx_id, contract = %request.contract_id, targets = targets.len(),
            "dispatching query proposal, async delivery");

        dispatch::spawn_query(self.sender.clone(), filter, request, targets, tx_id, notifier);
        Ok(())
    }

    /// Execute a state-changing transaction with default options, blocking
    /// until the ledger commits or rejects it.
    pub async fn execute(&self, request: ProposalRequest) -> Result<ExecuteResponse> {
        self.execute_with_opts(request, ExecuteOptions::default())
            .await
    }

    /// Execute a state-changing transaction: endorse, submit for ordering,
    /// and wait for the commit verdict.
    ///
    /// On [`ClientError::CommitTimeout`] the outcome is unknown — the
    /// transaction may still commit; the error retains the transaction id so
    /// the caller can reconcile later.
    pub async fn execute_with_opts(
        &self,
        request: ProposalRequest,
        opts: ExecuteOptions,
    ) -> Result<ExecuteResponse> {
        let timeout = opts.timeout.unwrap_or_else(|| self.config.execute_timeout());
        let (tx_id, responses) = self.endorse_for_execute(request, opts).await?;

        let (notifier, outcome) = oneshot::channel();
        self.spawn_commit(tx_id.clone(), responses, timeout, notifier);

        // Backstop race: the commit task carries its own timer over the same
        // duration and reports the timeout itself.
        match tokio::time::timeout(timeout, outcome).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ClientError::EventService(
                "commit task ended without reporting".to_string(),
            )),
            Err(_) => Err(ClientError::CommitTimeout {
                transaction_id: tx_id,
                timeout,
            }),
        }
    }

    /// Execute a state-changing transaction in fire-and-forget mode.
    ///
    /// Endorsement still happens before this returns; the commit wait runs in
    /// the background and its outcome is published exactly once on
    /// `notifier`. Returns the transaction id for correlation.
    pub async fn execute_async(
        &self,
        request: ProposalRequest,
        opts: ExecuteOptions,
        notifier: ExecuteNotifier,
    ) -> Result<TransactionId> {
        let timeout = opts.timeout.unwrap_or_else(|| self.config.execute_timeout());
        let (tx_id, responses) = self.endorse_for_execute(request, opts).await?;
        self.spawn_commit(tx_id.clone(), responses, timeout, notifier);
        Ok(tx_id)
    }

    /// Release client resources: disconnect the event service if connected.
    /// Idempotent.
    pub async fn close(&self) -> Result<()> {
        if self.events.is_connected() {
            self.events.disconnect().await
        } else {
            Ok(())
        }
    }

    /// Register for events emitted by a contract, delivered to `notify`.
    /// The returned handle is passed to [`Self::unregister_contract_event`].
    pub async fn register_contract_event(
        &self,
        contract_id: &str,
        event_name: &str,
        notify: mpsc::Sender<ContractEvent>,
    ) -> Registration {
        self.events
            .register_contract_event(contract_id, event_name, notify)
            .await
    }

    /// Remove a contract-event registration.
    ///
    /// Handles of any other shape are rejected with
    /// [`ClientError::UnsupportedRegistration`] and no unregistration is
    /// attempted.
    pub async fn unregister_contract_event(&self, registration: Registration) -> Result<()> {
        match registration {
            Registration::ContractEvent(_) => self.events.unregister(registration).await,
            _ => Err(ClientError::UnsupportedRegistration),
        }
    }

    /// Validate, resolve targets, and endorse; shared by both execute forms.
    async fn endorse_for_execute(
        &self,
        request: ProposalRequest,
        opts: ExecuteOptions,
    ) -> Result<(TransactionId, Vec<EndorsementResponse>)> {
        request.validate()?;
        let targets = self.resolve_targets(opts.targets, &request.contract_id).await?;
        let filter = effective_filter(opts.filter);

        let tx_id = TransactionId::generate();
        debug!(tx_id = %tx_id, contract = %request.contract_id, targets = targets.len(),
            "sending transaction proposal");

        let responses =
            dispatch::endorse(&*self.sender, &*filter, &request, &targets, &tx_id).await?;
        Ok((tx_id, responses))
    }

    fn spawn_commit(
        &self,
        tx_id: TransactionId,
        responses: Vec<EndorsementResponse>,
        timeout: Duration,
        notifier: ExecuteNotifier,
    ) {
        let sender = self.sender.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let id = tx_id.clone();
            let outcome = commit::submit_and_wait(sender, events, tx_id, responses, timeout).await;
            if notifier.send(outcome).is_err() {
                debug!(tx_id = %id, "commit outcome discarded, caller no longer waiting");
            }
        });
    }

    /// Resolve the endorsing set: caller-supplied targets win; otherwise
    /// discovery, narrowed by selection when one is configured. An empty
    /// resolved set is a precondition failure, not a network error.
    async fn resolve_targets(
        &self,
        supplied: Option<Vec<Peer>>,
        contract_id: &str,
    ) -> Result<Vec<Peer>> {
        let targets = match supplied {
            Some(targets) => targets,
            None => {
                let peers = self
                    .discovery
                    .peers()
                    .await
                    .map_err(|e| ClientError::Discovery(format!("get peers failed: {e}")))?;
                match &self.selection {
                    Some(selection) => selection
                        .endorsers_for(peers, contract_id)
                        .await
                        .map_err(|e| {
                            ClientError::Selection(format!("get endorsers failed: {e}"))
                        })?,
                    None => peers,
                }
            }
        };
        if targets.is_empty() {
            return Err(ClientError::InvalidRequest(
                "no endorsing peers available".to_string(),
            ));
        }
        Ok(targets)
    }
}

fn effective_filter(supplied: Option<Arc<dyn ResponseFilter>>) -> Arc<dyn ResponseFilter> {
    supplied.unwrap_or_else(|| Arc::new(PayloadConsistencyFilter))
}
