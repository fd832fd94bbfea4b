//! Mock collaborators for testing.
//!
//! Every collaborator trait has a mock with failure toggles, call counters,
//! and scripted outcomes, so orchestration behavior can be exercised without
//! a network.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::error::{ClientError, Result};
use crate::proposal::{
    ContractEvent, EndorsementResponse, Peer, ProposalRequest, TransactionId, ValidationCode,
};
use crate::traits::{
    DiscoveryService, EventHandle, EventService, ProposalSender, Registration, SelectionService,
};

/// Shared journal recording the order of operations across mocks.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Create an empty journal.
pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn record(journal: &Option<Journal>, entry: &str) {
    if let Some(journal) = journal {
        journal.lock().expect("journal lock").push(entry.to_string());
    }
}

/// Mock peer discovery returning a fixed peer set.
pub struct MockDiscovery {
    peers: Vec<Peer>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockDiscovery {
    pub fn new(peers: Vec<Peer>) -> Self {
        Self {
            peers,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Two peers, the usual fixture.
    pub fn with_default_peers() -> Self {
        Self::new(vec![
            Peer::new("peer0", "peer0.example.com:7051"),
            Peer::new("peer1", "peer1.example.com:7051"),
        ])
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryService for MockDiscovery {
    async fn peers(&self) -> Result<Vec<Peer>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Transmission(
                "mock discovery outage".to_string(),
            ));
        }
        Ok(self.peers.clone())
    }
}

/// Mock endorser selection, optionally narrowing to the first `keep` peers.
pub struct MockSelection {
    keep: Option<usize>,
    fail: AtomicBool,
}

impl MockSelection {
    pub fn new() -> Self {
        Self {
            keep: None,
            fail: AtomicBool::new(false),
        }
    }

    /// Narrow every selection to the first `keep` peers.
    pub fn keeping(keep: usize) -> Self {
        Self {
            keep: Some(keep),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SelectionService for MockSelection {
    async fn endorsers_for(&self, mut peers: Vec<Peer>, _contract_id: &str) -> Result<Vec<Peer>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Transmission(
                "mock selection outage".to_string(),
            ));
        }
        if let Some(keep) = self.keep {
            peers.truncate(keep);
        }
        Ok(peers)
    }
}

/// Mock proposal sender with scripted responses.
pub struct MockProposalSender {
    responses: Mutex<Option<Vec<EndorsementResponse>>>,
    fail_on_send: AtomicBool,
    fail_on_submit: AtomicBool,
    hang_on_send: AtomicBool,
    send_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    journal: Option<Journal>,
}

impl MockProposalSender {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(None),
            fail_on_send: AtomicBool::new(false),
            fail_on_submit: AtomicBool::new(false),
            hang_on_send: AtomicBool::new(false),
            send_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// Record sends and submits in `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Script the responses returned by every send. Without a script, one
    /// successful `b"ok"` response per target is produced.
    pub fn set_responses(&self, responses: Vec<EndorsementResponse>) {
        *self.responses.lock().expect("responses lock") = Some(responses);
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail_on_send.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_on_submit(&self, fail: bool) {
        self.fail_on_submit.store(fail, Ordering::SeqCst);
    }

    /// Make every send wait forever, for timeout tests.
    pub fn set_hang_on_send(&self, hang: bool) {
        self.hang_on_send.store(hang, Ordering::SeqCst);
    }

    pub fn send_count(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProposalSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProposalSender for MockProposalSender {
    async fn send_proposal(
        &self,
        _request: &ProposalRequest,
        targets: &[Peer],
        _tx_id: &TransactionId,
    ) -> Result<Vec<EndorsementResponse>> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        record(&self.journal, "send_proposal");
        if self.hang_on_send.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_on_send.load(Ordering::SeqCst) {
            return Err(ClientError::Transmission("mock send failure".to_string()));
        }
        let scripted = self.responses.lock().expect("responses lock").clone();
        Ok(scripted.unwrap_or_else(|| {
            targets
                .iter()
                .map(|_| EndorsementResponse::success(b"ok".to_vec()))
                .collect()
        }))
    }

    async fn submit_transaction(
        &self,
        _tx_id: &TransactionId,
        _responses: &[EndorsementResponse],
    ) -> Result<()> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        record(&self.journal, "submit_transaction");
        if self.fail_on_submit.load(Ordering::SeqCst) {
            return Err(ClientError::Transmission(
                "mock submit failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mock event service with a scriptable commit verdict.
pub struct MockEventService {
    connected: AtomicBool,
    fail_on_connect: AtomicBool,
    disconnects: AtomicUsize,
    verdict: Mutex<Option<ValidationCode>>,
    pending: Mutex<Vec<oneshot::Sender<ValidationCode>>>,
    contract_listeners: Mutex<Vec<mpsc::Sender<ContractEvent>>>,
    unregistered: Mutex<Vec<Registration>>,
    next_handle: AtomicU64,
    journal: Option<Journal>,
}

impl MockEventService {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            fail_on_connect: AtomicBool::new(false),
            disconnects: AtomicUsize::new(0),
            verdict: Mutex::new(None),
            pending: Mutex::new(Vec::new()),
            contract_listeners: Mutex::new(Vec::new()),
            unregistered: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
            journal: None,
        }
    }

    /// Record registrations in `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Deliver this verdict to every commit registration. Without one, the
    /// registration stays pending and the waiter times out.
    pub fn set_verdict(&self, code: ValidationCode) {
        *self.verdict.lock().expect("verdict lock") = Some(code);
    }

    pub fn set_fail_on_connect(&self, fail: bool) {
        self.fail_on_connect.store(fail, Ordering::SeqCst);
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Registrations removed through `unregister`.
    pub fn unregistered(&self) -> Vec<Registration> {
        self.unregistered.lock().expect("unregistered lock").clone()
    }

    /// Push a contract event to every contract-event listener.
    pub async fn emit_contract_event(&self, event: ContractEvent) {
        let listeners = self
            .contract_listeners
            .lock()
            .expect("listeners lock")
            .clone();
        for listener in listeners {
            let _ = listener.send(event.clone()).await;
        }
    }

    fn mint_handle(&self) -> EventHandle {
        EventHandle(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for MockEventService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventService for MockEventService {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        if self.fail_on_connect.load(Ordering::SeqCst) {
            return Err(ClientError::EventService(
                "mock connect failure".to_string(),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn register_commit_event(
        &self,
        _tx_id: &TransactionId,
    ) -> (Registration, oneshot::Receiver<ValidationCode>) {
        record(&self.journal, "register_commit");
        let (tx, rx) = oneshot::channel();
        match *self.verdict.lock().expect("verdict lock") {
            Some(code) => {
                let _ = tx.send(code);
            }
            // Keep the sender alive so the waiter blocks until its timer.
            None => self.pending.lock().expect("pending lock").push(tx),
        }
        (Registration::Commit(self.mint_handle()), rx)
    }

    async fn register_contract_event(
        &self,
        _contract_id: &str,
        _event_name: &str,
        notify: mpsc::Sender<ContractEvent>,
    ) -> Registration {
        self.contract_listeners
            .lock()
            .expect("listeners lock")
            .push(notify);
        Registration::ContractEvent(self.mint_handle())
    }

    async fn unregister(&self, registration: Registration) -> Result<()> {
        self.unregistered
            .lock()
            .expect("unregistered lock")
            .push(registration);
        Ok(())
    }
}
