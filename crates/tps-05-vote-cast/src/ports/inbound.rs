//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use shared_types::{CandidateId, ElectionId, TpsError, VoterId};

use crate::domain::VoteReceipt;

/// Vote-cast API
#[async_trait]
pub trait VoteCastApi: Send + Sync {
    /// Cast the voter's single ballot against their approved check-in.
    ///
    /// Atomic: either the vote row, the `has_voted` flip and the VOTED
    /// check-in all commit, or none of them do.
    async fn cast_vote(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<VoteReceipt, TpsError>;
}
