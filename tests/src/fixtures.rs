//! Runtime-backed test world.
//!
//! Every flow runs through a real `TpsRuntime` container (memory store, hub
//! actor, guard, services) driven by a manual clock.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use shared_types::{
    Candidate, CandidateId, Checkin, Election, ElectionId, ElectionPhase, ManualTimeSource,
    OperatorId, Station, StationId, StationQr, StationQrId, StationStatus, TimeSource, Voter,
    VoterId,
};
use tps_03_access_guard::OperatorContext;
use tps_04_checkin::CheckinApi;
use tps_runtime::{RuntimeConfig, ServiceContainer, TpsRuntime};

/// Secret of the QR seeded for the first station.
pub const SEEDED_SECRET: &str = "abc123";
/// Payload a voter scans at the first station.
pub const SEEDED_PAYLOAD: &str = "PEMIRA|TPS01|abc123";

pub struct World {
    pub runtime: TpsRuntime,
    pub container: Arc<ServiceContainer>,
    pub clock: Arc<ManualTimeSource>,
    pub election: Election,
    pub station: Station,
    pub operator: OperatorContext,
    pub admin: OperatorContext,
    pub candidates: Vec<Candidate>,
}

impl World {
    /// One open election with two candidates, station TPS01 holding the
    /// `abc123` QR and a bound operator. Clock at 09:00 WIB.
    pub fn new() -> Self {
        let mut config = RuntimeConfig::default();
        config.vote_cast.receipt_hmac_key = [0x42; 32];
        config.sweep.enabled = false;

        let clock = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap(),
        ));
        let runtime = TpsRuntime::with_time_source(config, clock.clone()).expect("runtime");
        let container = runtime.container();
        let now = clock.now();

        let election = Election {
            id: ElectionId::new(),
            name: "Pemira 2026".into(),
            phase: ElectionPhase::Voting,
            voting_starts_at: Some(now - Duration::hours(1)),
            voting_ends_at: Some(now + Duration::hours(8)),
        };
        container.store.insert_election(election.clone());

        let candidates: Vec<Candidate> = (1..=2)
            .map(|number| Candidate {
                id: CandidateId::new(),
                election_id: election.id,
                number,
                name: format!("Paslon {number}"),
            })
            .collect();
        for candidate in &candidates {
            container.store.insert_candidate(candidate.clone());
        }

        let station = station(election.id, "TPS01");
        container.store.insert_station(station.clone());
        container.store.insert_station_qr(StationQr {
            id: StationQrId::new(),
            station_id: station.id,
            secret: SEEDED_SECRET.into(),
            active: true,
            revoked_at: None,
            created_at: now,
        });

        let operator = OperatorContext::station_operator(OperatorId::new(), station.id);
        let admin = OperatorContext::platform_admin(OperatorId::new());
        container.operators.insert(operator.clone());
        container.operators.insert(admin.clone());

        Self {
            runtime,
            container,
            clock,
            election,
            station,
            operator,
            admin,
            candidates,
        }
    }

    /// Put a new eligible voter on the roll.
    pub fn add_voter(&self) -> Voter {
        let id = VoterId::new();
        let voter = Voter {
            id,
            identifier: format!("NIM-{}", &id.to_string()[..8]),
            name: "Voter".into(),
            eligible: true,
        };
        self.container.store.insert_voter(voter.clone());
        self.container.store.enroll_voter(self.election.id, id);
        voter
    }

    /// A second station in the same election with its own bound operator.
    /// Returns its scannable payload too.
    pub fn add_station(&self, code: &str) -> (Station, OperatorContext, String) {
        let station = station(self.election.id, code);
        self.container.store.insert_station(station.clone());
        let secret = format!("secret{code}");
        self.container.store.insert_station_qr(StationQr {
            id: StationQrId::new(),
            station_id: station.id,
            secret: secret.clone(),
            active: true,
            revoked_at: None,
            created_at: self.clock.now(),
        });
        let operator = OperatorContext::station_operator(OperatorId::new(), station.id);
        self.container.operators.insert(operator.clone());
        (station, operator, format!("PEMIRA|{code}|{secret}"))
    }

    /// Scan at TPS01 and approve as the bound operator.
    pub async fn approved_checkin(&self, voter: &Voter) -> Checkin {
        let scanned = self
            .container
            .checkin
            .scan(voter.id, SEEDED_PAYLOAD)
            .await
            .expect("scan");
        self.container
            .checkin
            .approve(self.operator.operator_id, self.station.id, scanned.checkin.id)
            .await
            .expect("approve")
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn station(election_id: ElectionId, code: &str) -> Station {
    Station {
        id: StationId::new(),
        code: code.into(),
        name: format!("TPS {code}"),
        location: "Gedung Serbaguna".into(),
        status: StationStatus::Active,
        election_id,
        voting_date: None,
        open_time: None,
        close_time: None,
    }
}
