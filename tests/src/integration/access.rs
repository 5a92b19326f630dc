//! # Access Isolation Flows
//!
//! A station operator acts only on their own station's check-ins; platform
//! admins act anywhere. Denied decisions leave the check-in untouched.

#[cfg(test)]
mod tests {
    use shared_types::{
        CheckinStatus, Election, ElectionId, ElectionPhase, OperatorId, Station, TpsError,
    };
    use tps_04_checkin::CheckinApi;

    use crate::fixtures::{World, SEEDED_PAYLOAD};

    #[tokio::test]
    async fn test_operator_cannot_act_on_other_station() {
        let world = World::new();
        let (station_b, operator_b, _) = world.add_station("TPS02");
        let voter = world.add_voter();
        let scanned = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();
        let checkin_id = scanned.checkin.id;

        // Claiming TPS01 while bound to TPS02
        let err = world
            .container
            .checkin
            .approve(operator_b.operator_id, world.station.id, checkin_id)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::AccessDenied);

        // Own station, foreign check-in
        let err = world
            .container
            .checkin
            .reject(operator_b.operator_id, station_b.id, checkin_id, None)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::AccessDenied);

        let stored = world.container.store.checkin(checkin_id).unwrap();
        assert_eq!(stored.status, CheckinStatus::Pending);
        assert!(stored.approved_by.is_none());
    }

    #[tokio::test]
    async fn test_unknown_operator_denied() {
        let world = World::new();
        let voter = world.add_voter();
        let scanned = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();

        let err = world
            .container
            .checkin
            .approve(OperatorId::new(), world.station.id, scanned.checkin.id)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::AccessDenied);
        assert_eq!(err.kind().http_status(), 403);
    }

    #[tokio::test]
    async fn test_removed_operator_loses_access() {
        let world = World::new();
        let voter = world.add_voter();
        let scanned = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();

        world.container.operators.remove(world.operator.operator_id);
        let err = world
            .container
            .checkin
            .approve(world.operator.operator_id, world.station.id, scanned.checkin.id)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::AccessDenied);
    }

    #[tokio::test]
    async fn test_admin_can_decide_at_any_station() {
        let world = World::new();
        let (station_b, _, payload_b) = world.add_station("TPS02");
        let voter = world.add_voter();
        let scanned = world
            .container
            .checkin
            .scan(voter.id, &payload_b)
            .await
            .unwrap();
        assert_eq!(scanned.checkin.station_id, station_b.id);

        let approved = world
            .container
            .checkin
            .approve(world.admin.operator_id, station_b.id, scanned.checkin.id)
            .await
            .unwrap();
        assert_eq!(approved.status, CheckinStatus::Approved);
        assert_eq!(approved.approved_by, Some(world.admin.operator_id));
    }

    #[tokio::test]
    async fn test_station_moved_to_other_election_is_mismatch() {
        let world = World::new();
        let voter = world.add_voter();
        let scanned = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();

        let other = Election {
            id: ElectionId::new(),
            name: "Pemira Fakultas".into(),
            phase: ElectionPhase::Voting,
            ..world.election.clone()
        };
        world.container.store.insert_election(other.clone());
        world.container.store.insert_station(Station {
            election_id: other.id,
            ..world.station.clone()
        });

        let err = world
            .container
            .checkin
            .approve(world.operator.operator_id, world.station.id, scanned.checkin.id)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::StationMismatch);
    }

    #[tokio::test]
    async fn test_unknown_station() {
        let world = World::new();
        let voter = world.add_voter();
        let scanned = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap();

        let err = world
            .container
            .checkin
            .approve(
                world.admin.operator_id,
                shared_types::StationId::new(),
                scanned.checkin.id,
            )
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::StationNotFound);
    }
}
