//! Shared fixture for this crate's unit tests.

use chrono::{Duration, TimeZone, Utc};
use shared_types::{
    Election, ElectionId, ElectionPhase, ManualTimeSource, OperatorId, Station, StationId,
    StationStatus, TimeSource, Voter, VoterId, VoterStatus,
};
use std::sync::Arc;
use tps_01_qr_codec::{QrConfig, QrRotationApi, QrRotationService};
use tps_02_notification_hub::{HubConfig, HubHandle};
use tps_03_access_guard::{AccessGuard, InMemoryOperatorDirectory, OperatorContext};
use tps_store::{MemoryAuditSink, MemoryStore};

use crate::application::{CheckinService, ExpirySweeper};
use crate::config::{CheckinConfig, SweepConfig};

pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub hub: HubHandle,
    pub clock: Arc<ManualTimeSource>,
    pub audit: Arc<MemoryAuditSink>,
    pub directory: Arc<InMemoryOperatorDirectory>,
    pub rotation: QrRotationService,
    pub service: CheckinService,
    pub election: Election,
    pub station: Station,
    pub voter: Voter,
    pub operator: OperatorContext,
    pub admin: OperatorContext,
    pub payload: String,
}

impl Fixture {
    /// One open election, one active station with a fresh QR, one eligible
    /// voter, a bound operator and an admin. Clock at 09:00 WIB.
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let (hub, _task) = HubHandle::spawn(&HubConfig::default());
        let clock = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap(),
        ));
        let audit = Arc::new(MemoryAuditSink::new());
        let directory = Arc::new(InMemoryOperatorDirectory::new());

        let now = clock.now();
        let election = Election {
            id: ElectionId::new(),
            name: "Pemira 2026".into(),
            phase: ElectionPhase::Voting,
            voting_starts_at: Some(now - Duration::hours(1)),
            voting_ends_at: Some(now + Duration::hours(8)),
        };
        store.insert_election(election.clone());

        let station = Station {
            id: StationId::new(),
            code: "TPS01".into(),
            name: "TPS 01".into(),
            location: "Aula Barat".into(),
            status: StationStatus::Active,
            election_id: election.id,
            voting_date: None,
            open_time: None,
            close_time: None,
        };
        store.insert_station(station.clone());

        let operator = OperatorContext::station_operator(OperatorId::new(), station.id);
        let admin = OperatorContext::platform_admin(OperatorId::new());
        directory.insert(operator.clone());
        directory.insert(admin.clone());

        let rotation = QrRotationService::new(
            Arc::new(store.clone()),
            audit.clone(),
            clock.clone(),
            QrConfig::default(),
        );
        let payload = rotation.rotate(station.id).await.unwrap().payload;

        let service = CheckinService::new(
            Arc::new(store.clone()),
            Arc::new(AccessGuard::new(directory.clone())),
            Arc::new(hub.clone()),
            audit.clone(),
            clock.clone(),
            CheckinConfig::default(),
        );

        let voter = seed_voter(&store, election.id, true);

        Self {
            store,
            hub,
            clock,
            audit,
            directory,
            rotation,
            service,
            election,
            station,
            voter,
            operator,
            admin,
            payload,
        }
    }

    /// Put a new voter on the roll.
    pub fn add_voter(&self, eligible: bool) -> Voter {
        seed_voter(&self.store, self.election.id, eligible)
    }

    /// A second station in the same election with its own bound operator.
    pub fn add_station(&self, code: &str) -> (Station, OperatorContext) {
        let station = Station {
            id: StationId::new(),
            code: code.into(),
            ..self.station.clone()
        };
        self.store.insert_station(station.clone());
        let operator = OperatorContext::station_operator(OperatorId::new(), station.id);
        self.directory.insert(operator.clone());
        (station, operator)
    }

    /// Rotate the seeded station's QR; returns the new payload.
    pub async fn rotate(&self) -> String {
        self.rotation.rotate(self.station.id).await.unwrap().payload
    }

    /// Apply `f` to the seeded station and store the result.
    pub fn update_station(&self, f: impl FnOnce(&mut Station)) {
        let mut station = self.station.clone();
        f(&mut station);
        self.store.insert_station(station);
    }

    /// Apply `f` to the seeded election and store the result.
    pub fn update_election(&self, f: impl FnOnce(&mut Election)) {
        let mut election = self.election.clone();
        f(&mut election);
        self.store.insert_election(election);
    }

    pub fn mark_voted(&self, voter_id: VoterId) {
        self.store.put_voter_status(VoterStatus {
            has_voted: true,
            voted_at: Some(self.clock.now()),
            ..VoterStatus::not_voted(self.election.id, voter_id)
        });
    }

    pub fn sweeper(&self) -> ExpirySweeper {
        ExpirySweeper::new(
            Arc::new(self.store.clone()),
            Arc::new(self.hub.clone()),
            self.audit.clone(),
            self.clock.clone(),
            &SweepConfig::default(),
        )
    }
}

fn seed_voter(store: &MemoryStore, election_id: ElectionId, eligible: bool) -> Voter {
    let id = VoterId::new();
    let voter = Voter {
        id,
        identifier: format!("NIM-{}", &id.to_string()[..8]),
        name: "Voter".into(),
        eligible,
    };
    store.insert_voter(voter.clone());
    store.enroll_voter(election_id, id);
    voter
}
