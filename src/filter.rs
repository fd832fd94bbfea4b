//! Default endorsement response filter.

use crate::error::{ClientError, Result};
use crate::proposal::{EndorsementResponse, ENDORSEMENT_SUCCESS_STATUS};
use crate::traits::ResponseFilter;

/// Rejects response sets containing a non-success status or payloads that
/// diverge from the first response.
///
/// The first response is the reference: every later payload is compared
/// byte-for-byte against response 0, not all-pairs. Equality is transitive,
/// so the verdict is the same; the comparison cost stays linear in the
/// number of endorsers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadConsistencyFilter;

impl ResponseFilter for PayloadConsistencyFilter {
    fn process(&self, responses: Vec<EndorsementResponse>) -> Result<Vec<EndorsementResponse>> {
        let mut reference: Option<&[u8]> = None;
        for response in &responses {
            if response.status != ENDORSEMENT_SUCCESS_STATUS {
                return Err(ClientError::EndorsementFailure {
                    status: response.status,
                    message: response.message.clone(),
                });
            }
            match reference {
                None => reference = Some(response.payload.as_slice()),
                Some(first) => {
                    if first != response.payload.as_slice() {
                        return Err(ClientError::EndorsementMismatch);
                    }
                }
            }
        }
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, payload: &[u8]) -> Vec<EndorsementResponse> {
        (0..n)
            .map(|_| EndorsementResponse::success(payload.to_vec()))
            .collect()
    }

    #[test]
    fn test_uniform_set_returned_unchanged() {
        let responses = uniform(3, b"state");
        let expected = responses.clone();
        let result = PayloadConsistencyFilter.process(responses).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_single_success_response_passes() {
        let result = PayloadConsistencyFilter.process(uniform(1, b"x")).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_payloads_pass() {
        let result = PayloadConsistencyFilter.process(uniform(2, b"")).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_mismatch_at_any_index_is_mismatch_not_failure() {
        for k in 1..4 {
            let mut responses = uniform(4, b"agreed");
            responses[k] = EndorsementResponse::success(b"diverged".to_vec());
            let err = PayloadConsistencyFilter.process(responses).unwrap_err();
            assert!(
                matches!(err, ClientError::EndorsementMismatch),
                "index {k}: expected mismatch, got {err}"
            );
        }
    }

    #[test]
    fn test_single_bad_status_is_endorsement_failure() {
        let responses = vec![EndorsementResponse::failure(500, "simulation failed")];
        let err = PayloadConsistencyFilter.process(responses).unwrap_err();
        match err {
            ClientError::EndorsementFailure { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "simulation failed");
            }
            other => panic!("expected endorsement failure, got {other}"),
        }
    }

    #[test]
    fn test_bad_status_reported_even_with_matching_payloads() {
        let mut responses = uniform(3, b"same");
        responses[2] = EndorsementResponse {
            status: 503,
            payload: b"same".to_vec(),
            message: "unavailable".to_string(),
        };
        let err = PayloadConsistencyFilter.process(responses).unwrap_err();
        assert!(matches!(
            err,
            ClientError::EndorsementFailure { status: 503, .. }
        ));
    }

    #[test]
    fn test_empty_set_passes_vacuously() {
        let result = PayloadConsistencyFilter.process(Vec::new()).unwrap();
        assert!(result.is_empty());
    }
}
