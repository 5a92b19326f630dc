//! # Identifiers
//!
//! Strongly-typed UUID identifiers for every TPS entity. Mixing up a voter id
//! and a station id is a compile error rather than a silent lookup miss.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Identifier of a polling station (TPS).
    StationId
);
define_id!(
    /// Identifier of a station QR record.
    StationQrId
);
define_id!(
    /// Identifier of a check-in record.
    CheckinId
);
define_id!(
    /// Identifier of a voter on the roll.
    VoterId
);
define_id!(
    /// Identifier of an election.
    ElectionId
);
define_id!(
    /// Identifier of a candidate.
    CandidateId
);
define_id!(
    /// Identifier of a station operator or platform admin.
    OperatorId
);
define_id!(
    /// Identifier of a committed vote row.
    VoteId
);
