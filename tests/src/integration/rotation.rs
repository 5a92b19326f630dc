//! # QR Rotation Flows
//!
//! Rotation revokes every previously active QR of the station in the same
//! transaction that activates the new one. Old payloads stop working at once.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::join_all;
    use shared_types::{ErrorKind, TimeSource, TpsError};
    use tps_01_qr_codec::{decode, QrRotationApi};
    use tps_04_checkin::CheckinApi;

    use crate::fixtures::{World, SEEDED_PAYLOAD, SEEDED_SECRET};

    #[tokio::test]
    async fn test_rotation_revokes_old_payload() {
        let world = World::new();
        let voter = world.add_voter();

        let rotated = world
            .container
            .qr_rotation
            .rotate(world.station.id)
            .await
            .expect("rotate");
        assert_eq!(rotated.revoked, 1);

        let payload = decode(&rotated.payload).expect("rotated payload decodes");
        assert_eq!(payload.station_code, "TPS01");
        assert_ne!(payload.secret, SEEDED_SECRET);

        let err = world
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::QrRevoked);
        assert_eq!(err.kind(), ErrorKind::QrRevoked);

        let scanned = world
            .container
            .checkin
            .scan(voter.id, &rotated.payload)
            .await
            .expect("scan with fresh QR");
        assert!(scanned.created);

        let qrs = world.container.store.station_qrs(world.station.id);
        assert_eq!(qrs.len(), 2);
        let old = qrs.iter().find(|qr| qr.secret == SEEDED_SECRET).unwrap();
        assert!(!old.active);
        assert_eq!(old.revoked_at, Some(world.clock.now()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rotations_leave_one_active() {
        let world = World::new();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = Arc::clone(&world.container.qr_rotation);
                let station_id = world.station.id;
                tokio::spawn(async move { service.rotate(station_id).await })
            })
            .collect();

        let rotations: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.expect("join").expect("rotate"))
            .collect();

        // Rotations serialize on the station's QR set; each revokes exactly
        // the one row its predecessor activated.
        assert!(rotations.iter().all(|r| r.revoked == 1));

        let qrs = world.container.store.station_qrs(world.station.id);
        assert_eq!(qrs.len(), 11);
        let active: Vec<_> = qrs.iter().filter(|qr| qr.active).collect();
        assert_eq!(active.len(), 1);
        assert!(qrs
            .iter()
            .filter(|qr| !qr.active)
            .all(|qr| qr.revoked_at.is_some()));

        let winner = rotations
            .iter()
            .find(|r| r.qr.id == active[0].id)
            .expect("active row came from one of the rotations");
        let voter = world.add_voter();
        world
            .container
            .checkin
            .scan(voter.id, &winner.payload)
            .await
            .expect("latest payload scans");
    }

    #[tokio::test]
    async fn test_rotating_unknown_station() {
        let world = World::new();
        let err = world
            .container
            .qr_rotation
            .rotate(shared_types::StationId::new())
            .await
            .unwrap_err();
        assert_eq!(err, TpsError::StationNotFound);
    }
}
