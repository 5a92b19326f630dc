//! # Concurrency Flows
//!
//! Races the services must resolve without double effects:
//!
//! - 50 simultaneous `castVote` calls for one approved voter → one vote
//! - Simultaneous scans by one voter → one check-in, same id everywhere
//! - Approve racing reject on one check-in → exactly one winner
//! - Many voters voting in parallel → one vote each, no lock leaks

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::join_all;
    use shared_types::{CheckinStatus, TpsError};
    use tps_04_checkin::CheckinApi;
    use tps_05_vote_cast::VoteCastApi;

    use crate::fixtures::{World, SEEDED_PAYLOAD};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fifty_concurrent_casts_record_one_vote() {
        let world = World::new();
        let voter = world.add_voter();
        world.approved_checkin(&voter).await;
        let voter_id = voter.id;

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = Arc::clone(&world.container.vote_cast);
                let election = world.election.id;
                let candidate = world.candidates[i % 2].id;
                tokio::spawn(async move { service.cast_vote(voter_id, election, candidate).await })
            })
            .collect();

        let mut ok = 0;
        let mut already_voted = 0;
        for result in join_all(handles).await {
            match result.expect("join") {
                Ok(_) => ok += 1,
                Err(TpsError::AlreadyVoted) => already_voted += 1,
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(already_voted, 49);
        assert_eq!(world.container.store.votes().len(), 1);
        assert!(
            world
                .container
                .store
                .voter_status(world.election.id, voter.id)
                .unwrap()
                .has_voted
        );
        assert_eq!(world.container.store.tracked_locks(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scans_share_one_checkin() {
        let world = World::new();
        let voter = world.add_voter();
        let voter_id = voter.id;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let service = Arc::clone(&world.container.checkin);
                tokio::spawn(async move { service.scan(voter_id, SEEDED_PAYLOAD).await })
            })
            .collect();

        let outcomes: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.expect("join").expect("scan"))
            .collect();

        let first_id = outcomes[0].checkin.id;
        assert!(outcomes.iter().all(|o| o.checkin.id == first_id));
        assert_eq!(outcomes.iter().filter(|o| o.created).count(), 1);
        assert_eq!(
            world
                .container
                .store
                .checkins_for_voter(world.election.id, voter.id)
                .len(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_approve_reject_race_has_one_winner() {
        let world = World::new();

        for _ in 0..10 {
            let voter = world.add_voter();
            let scanned = world
                .container
                .checkin
                .scan(voter.id, SEEDED_PAYLOAD)
                .await
                .unwrap();
            let checkin_id = scanned.checkin.id;

            let approve = {
                let service = Arc::clone(&world.container.checkin);
                let (operator, station) = (world.operator.operator_id, world.station.id);
                tokio::spawn(async move { service.approve(operator, station, checkin_id).await })
            };
            let reject = {
                let service = Arc::clone(&world.container.checkin);
                let (operator, station) = (world.admin.operator_id, world.station.id);
                tokio::spawn(async move {
                    service
                        .reject(operator, station, checkin_id, Some("duplicate".into()))
                        .await
                })
            };

            let approve = approve.await.expect("join");
            let reject = reject.await.expect("join");
            let final_status = world.container.store.checkin(checkin_id).unwrap().status;

            match (&approve, &reject) {
                (Ok(approved), Err(TpsError::CheckinNotPending { status })) => {
                    assert_eq!(approved.status, CheckinStatus::Approved);
                    assert_eq!(*status, CheckinStatus::Approved);
                    assert_eq!(final_status, CheckinStatus::Approved);
                }
                (Err(TpsError::CheckinNotPending { status }), Ok(rejected)) => {
                    assert_eq!(rejected.status, CheckinStatus::Rejected);
                    assert_eq!(*status, CheckinStatus::Rejected);
                    assert_eq!(final_status, CheckinStatus::Rejected);
                }
                other => panic!("expected exactly one winner, got {other:?}"),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_voters_each_vote_once() {
        let world = World::new();
        let mut voters = Vec::new();
        for _ in 0..25 {
            let voter = world.add_voter();
            world.approved_checkin(&voter).await;
            voters.push(voter);
        }

        let handles: Vec<_> = voters
            .iter()
            .map(|voter| {
                let service = Arc::clone(&world.container.vote_cast);
                let (voter_id, election) = (voter.id, world.election.id);
                let candidate = world.candidates[0].id;
                tokio::spawn(async move { service.cast_vote(voter_id, election, candidate).await })
            })
            .collect();

        for result in join_all(handles).await {
            result.expect("join").expect("cast");
        }

        assert_eq!(world.container.store.votes().len(), voters.len());
        for voter in &voters {
            let checkins = world
                .container
                .store
                .checkins_for_voter(world.election.id, voter.id);
            assert_eq!(checkins.len(), 1);
            assert_eq!(checkins[0].status, CheckinStatus::Voted);
        }
        assert_eq!(world.container.store.tracked_locks(), 0);
    }
}
