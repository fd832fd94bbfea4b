//! Client-side transaction orchestration for permissioned ledger networks.
//!
//! This crate coordinates the endorse / order / commit lifecycle from the
//! application's side of the wire: it submits read-only queries to a set of
//! endorsing peers and returns a single agreed-upon result, and it executes
//! state-changing transactions by collecting endorsements, submitting the
//! endorsed transaction for ordering, and awaiting the ledger's commit
//! verdict — all under bounded time.
//!
//! Network collaborators (discovery, endorser selection, proposal
//! transmission, event subscription) are trait seams, not implementations;
//! see [`traits`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ledger_client::{ChannelClient, ProposalRequest};
//!
//! async fn example(client: &ChannelClient) -> ledger_client::Result<()> {
//!     // Read-only query: one agreed payload from the endorsing set.
//!     let value = client
//!         .query(ProposalRequest::new("asset", "read").with_arg("asset-1"))
//!         .await?;
//!
//!     // State-changing transaction: endorse, order, wait for commit.
//!     let response = client
//!         .execute(
//!             ProposalRequest::new("asset", "transfer")
//!                 .with_arg("asset-1")
//!                 .with_arg("alice"),
//!         )
//!         .await?;
//!     println!("committed {}", response.transaction_id);
//!     Ok(())
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Every collaborator is a trait; [`testing`] ships mocks for all of them:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ledger_client::testing::{MockDiscovery, MockEventService, MockProposalSender};
//! use ledger_client::ChannelClient;
//!
//! let client = ChannelClient::builder()
//!     .discovery(Arc::new(MockDiscovery::with_default_peers()))
//!     .sender(Arc::new(MockProposalSender::new()))
//!     .events(Arc::new(MockEventService::new()))
//!     .build()?;
//! ```

pub mod channel;
mod commit;
pub mod config;
mod dispatch;
pub mod error;
pub mod filter;
pub mod identity;
pub mod options;
pub mod proposal;
pub mod testing;
pub mod traits;

// Re-export main types at crate root
pub use channel::{ChannelClient, ChannelClientBuilder, ExecuteNotifier, QueryNotifier};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use filter::PayloadConsistencyFilter;
pub use options::{ExecuteOptions, QueryOptions};
pub use proposal::{
    ContractEvent, EndorsementResponse, ExecuteResponse, Peer, ProposalRequest, TransactionId,
    ValidationCode, ENDORSEMENT_SUCCESS_STATUS,
};
pub use traits::{
    DiscoveryService, EventHandle, EventService, ProposalSender, Registration, ResponseFilter,
    SelectionService,
};
