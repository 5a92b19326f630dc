//! # Shared Types Crate
//!
//! Domain entities, identifiers, station events and the error taxonomy
//! shared by every TPS subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Typed identifiers**: every entity id is a distinct newtype.
//! - **Exhaustive errors**: `TpsError` maps totally onto transport codes.

pub mod entities;
pub mod errors;
pub mod events;
pub mod ids;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use ids::*;
pub use time::*;
