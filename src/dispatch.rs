//! Proposal dispatch: sends a proposal to the chosen endorsers and validates
//! the collected responses.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::proposal::{EndorsementResponse, Peer, ProposalRequest, TransactionId};
use crate::traits::{ProposalSender, ResponseFilter};

/// Send a proposal to all targets and run the filter over the responses.
///
/// Transmission errors surface as-is; no retry. Used inline by the execute
/// flow and from a spawned task by the query flow.
pub(crate) async fn endorse(
    sender: &dyn ProposalSender,
    filter: &dyn ResponseFilter,
    request: &ProposalRequest,
    targets: &[Peer],
    tx_id: &TransactionId,
) -> Result<Vec<EndorsementResponse>> {
    let responses = sender.send_proposal(request, targets, tx_id).await?;
    filter.process(responses)
}

/// Spawn the query dispatch task.
///
/// The task sends the proposal, validates the responses, and publishes the
/// first payload (or the error) to `notifier` exactly once, then terminates.
/// If the receiving side has gone away the result is discarded; the send is
/// best-effort and never blocks.
pub(crate) fn spawn_query(
    sender: Arc<dyn ProposalSender>,
    filter: Arc<dyn ResponseFilter>,
    request: ProposalRequest,
    targets: Vec<Peer>,
    tx_id: TransactionId,
    notifier: oneshot::Sender<Result<Vec<u8>>>,
) {
    tokio::spawn(async move {
        let outcome = query_payload(&*sender, &*filter, &request, &targets, &tx_id).await;
        if notifier.send(outcome).is_err() {
            debug!(tx_id = %tx_id, "query result discarded, caller no longer waiting");
        }
    });
}

async fn query_payload(
    sender: &dyn ProposalSender,
    filter: &dyn ResponseFilter,
    request: &ProposalRequest,
    targets: &[Peer],
    tx_id: &TransactionId,
) -> Result<Vec<u8>> {
    let responses = endorse(sender, filter, request, targets, tx_id).await?;
    let first = responses.into_iter().next().ok_or_else(|| {
        ClientError::Transmission("no endorsement responses returned".to_string())
    })?;
    Ok(first.payload)
}
