//! Collaborator traits for the channel client.
//!
//! Discovery, selection, proposal transmission, and event subscription are
//! external services; the client orchestrates them but never implements
//! them. Implement these traits to plug in real network collaborators or
//! mocks for testing (see [`crate::testing`]).

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::error::Result;
use crate::proposal::{
    ContractEvent, EndorsementResponse, Peer, ProposalRequest, TransactionId, ValidationCode,
};

/// Provider of the current set of network peers.
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// Return the currently known peers.
    async fn peers(&self) -> Result<Vec<Peer>>;
}

/// Narrows discovered peers down to an endorsing set for a contract.
#[async_trait]
pub trait SelectionService: Send + Sync {
    /// Select the endorsers for the given contract from the candidate peers.
    async fn endorsers_for(&self, peers: Vec<Peer>, contract_id: &str) -> Result<Vec<Peer>>;
}

/// Constructs, signs, and transmits proposals and endorsed transactions.
///
/// `send_proposal` returns one response per target, in target order. The
/// client does not retry on failure; transmission errors surface as-is.
#[async_trait]
pub trait ProposalSender: Send + Sync {
    /// Send a proposal to all targets and collect their responses.
    async fn send_proposal(
        &self,
        request: &ProposalRequest,
        targets: &[Peer],
        tx_id: &TransactionId,
    ) -> Result<Vec<EndorsementResponse>>;

    /// Submit an endorsed transaction for ordering and commit.
    async fn submit_transaction(
        &self,
        tx_id: &TransactionId,
        responses: &[EndorsementResponse],
    ) -> Result<()>;
}

/// Handle returned by an event registration, used to unregister.
///
/// The shape of the handle records what kind of registration produced it;
/// unregister entry points reject shapes they do not manage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A contract-event registration.
    ContractEvent(EventHandle),
    /// A commit-event registration. Commit registrations are owned by the
    /// execute flow and are not unregisterable through the contract-event
    /// entry point.
    Commit(EventHandle),
}

/// Opaque token minted by an event service for one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle(pub u64);

/// Pub/sub service producing commit verdicts and contract events.
///
/// A commit verdict is produced at most once per transaction id, or never
/// (a dropped event); callers must not assume delivery. `connect` and
/// `disconnect` must be idempotent and safe under concurrent callers that
/// both observe "not connected".
#[async_trait]
pub trait EventService: Send + Sync {
    /// Whether the service is currently connected.
    fn is_connected(&self) -> bool;

    /// Connect to the event source.
    async fn connect(&self) -> Result<()>;

    /// Disconnect from the event source.
    async fn disconnect(&self) -> Result<()>;

    /// Register interest in the commit verdict for a transaction.
    ///
    /// The receiver yields the validation code when the ledger commits or
    /// rejects the transaction. The registration handle is retained by the
    /// service until shutdown; late verdicts after the receiver is dropped
    /// are the service's concern.
    async fn register_commit_event(
        &self,
        tx_id: &TransactionId,
    ) -> (Registration, oneshot::Receiver<ValidationCode>);

    /// Register for events emitted by a contract, delivered to `notify`.
    async fn register_contract_event(
        &self,
        contract_id: &str,
        event_name: &str,
        notify: mpsc::Sender<ContractEvent>,
    ) -> Registration;

    /// Remove a registration.
    async fn unregister(&self, registration: Registration) -> Result<()>;
}

/// Strategy for validating a set of endorsement responses before they are
/// accepted.
///
/// The default is [`crate::filter::PayloadConsistencyFilter`]; callers may
/// inject an alternative per call. Implementations must be pure: same input,
/// same verdict, no side effects.
pub trait ResponseFilter: Send + Sync {
    /// Validate the response set, returning it unchanged on success.
    fn process(&self, responses: Vec<EndorsementResponse>) -> Result<Vec<EndorsementResponse>>;
}
