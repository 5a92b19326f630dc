//! # End-to-End Voting Scenario
//!
//! One voter walks through a station:
//!
//! 1. **Scan** `PEMIRA|TPS01|abc123` → PENDING check-in, CHECKIN_NEW broadcast
//! 2. **Approve** by the station operator → APPROVED, expires 15 minutes later
//! 3. **Cast** → one vote row, voter status flipped, check-in VOTED
//! 4. **Cast again** → ALREADY_VOTED, nothing written

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::Duration;
    use shared_types::{
        CheckinStatus, ErrorKind, StationEvent, TimeSource, TpsError, VoteChannel, VotingMethod,
    };
    use tokio::time::timeout;
    use tps_04_checkin::CheckinApi;
    use tps_05_vote_cast::VoteCastApi;

    use crate::fixtures::{World, SEEDED_PAYLOAD};

    #[tokio::test]
    async fn test_scan_approve_vote_flow() {
        let world = World::new();
        let voter = world.add_voter();
        let mut station_feed = world
            .container
            .hub
            .subscribe(world.station.id)
            .await
            .expect("subscribe");

        // Step 1: scan
        let scanned = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .expect("scan");
        assert!(scanned.created);
        assert_eq!(scanned.checkin.status, CheckinStatus::Pending);
        assert_eq!(scanned.checkin.station_id, world.station.id);

        let event = timeout(StdDuration::from_secs(1), station_feed.recv())
            .await
            .expect("timeout")
            .expect("event");
        match event {
            StationEvent::CheckinNew {
                checkin_id, voter: summary, ..
            } => {
                assert_eq!(checkin_id, scanned.checkin.id);
                assert_eq!(summary.id, voter.id);
                assert_eq!(summary.identifier, voter.identifier);
            }
            other => panic!("expected CHECKIN_NEW, got {other:?}"),
        }

        // Step 2: approve
        let approved = world
            .container
            .checkin
            .approve(world.operator.operator_id, world.station.id, scanned.checkin.id)
            .await
            .expect("approve");
        let now = world.clock.now();
        assert_eq!(approved.status, CheckinStatus::Approved);
        assert_eq!(approved.approved_at, Some(now));
        assert_eq!(approved.expires_at, Some(now + Duration::minutes(15)));
        assert_eq!(approved.approved_by, Some(world.operator.operator_id));

        // Step 3: vote
        let candidate = &world.candidates[0];
        let receipt = world
            .container
            .vote_cast
            .cast_vote(voter.id, world.election.id, candidate.id)
            .await
            .expect("cast");
        assert_eq!(receipt.checkin_id, scanned.checkin.id);
        assert_eq!(receipt.station_id, world.station.id);

        let votes = world.container.store.votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].candidate_id, candidate.id);
        assert_eq!(votes[0].channel, VoteChannel::Tps);
        assert_eq!(votes[0].station_id, Some(world.station.id));
        assert_ne!(votes[0].token_hash, receipt.receipt_token);

        let status = world
            .container
            .store
            .voter_status(world.election.id, voter.id)
            .expect("status row");
        assert!(status.has_voted);
        assert_eq!(status.voted_at, Some(now));
        assert_eq!(status.voting_method, Some(VotingMethod::Tps));
        assert_eq!(status.tps_id, Some(world.station.id));

        let checkin = world
            .container
            .store
            .checkin(scanned.checkin.id)
            .expect("checkin row");
        assert_eq!(checkin.status, CheckinStatus::Voted);

        // Step 4: second vote
        let err = world
            .container
            .vote_cast
            .cast_vote(voter.id, world.election.id, world.candidates[1].id)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::AlreadyVoted);
        assert_eq!(world.container.store.votes().len(), 1);

        world.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_magic_rejected_without_write() {
        let world = World::new();
        let voter = world.add_voter();

        let err = world
            .container
            .checkin
            .scan(voter.id, "WRONG|TPS01|abc123")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QrInvalid);
        assert_eq!(err.kind().code(), "QR_INVALID");
        assert!(world
            .container
            .store
            .checkins_for_voter(world.election.id, voter.id)
            .is_empty());
    }

    #[tokio::test]
    async fn test_rescan_returns_same_checkin() {
        let world = World::new();
        let voter = world.add_voter();

        let first = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();
        let second = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.checkin.id, second.checkin.id);
    }

    #[tokio::test]
    async fn test_rejected_voter_can_scan_again() {
        let world = World::new();
        let voter = world.add_voter();

        let first = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();
        let rejected = world
            .container
            .checkin
            .reject(
                world.operator.operator_id,
                world.station.id,
                first.checkin.id,
                Some("wrong person".into()),
            )
            .await
            .unwrap();
        assert_eq!(rejected.status, CheckinStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("wrong person"));

        let err = world
            .container
            .vote_cast
            .cast_vote(voter.id, world.election.id, world.candidates[0].id)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::NoApprovedCheckin);

        let again = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();
        assert!(again.created);
        assert_ne!(again.checkin.id, first.checkin.id);
    }

    #[tokio::test]
    async fn test_eligibility_tracks_the_flow() {
        let world = World::new();
        let voter = world.add_voter();
        let api = &world.container.checkin;

        let before = api.get_eligibility(voter.id, world.election.id).await.unwrap();
        assert!(before.eligible);
        assert!(!before.has_voted);
        assert!(before.active_checkin.is_none());

        let approved = world.approved_checkin(&voter).await;
        let during = api.get_eligibility(voter.id, world.election.id).await.unwrap();
        assert_eq!(during.active_checkin.map(|c| c.id), Some(approved.id));

        world
            .container
            .vote_cast
            .cast_vote(voter.id, world.election.id, world.candidates[0].id)
            .await
            .unwrap();
        let after = api.get_eligibility(voter.id, world.election.id).await.unwrap();
        assert!(after.has_voted);
        assert!(after.voted_at.is_some());
        assert!(after.active_checkin.is_none());
    }
}
