//! # Scrapforge Common
//!
//! Common types shared by the Scrapforge weapon crates.
//!
//! This crate provides:
//! - ID types (EntityId, ProjectileId)
//! - Simulation timestamps
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod time;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::time::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_keep_host_values() {
        let owner = EntityId::from_raw(42);
        assert_eq!(owner.raw(), 42);
        assert_eq!(owner.to_string(), "entity#42");
        assert_eq!(ProjectileId::new(3).to_string(), "projectile#3");
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let start = Timestamp::from_secs(10.0);
        let later = start.after(1.5);

        assert_eq!(later, Timestamp::from_secs(11.5));
        assert_eq!(later.since(start), 1.5);
        assert!(later > start);
    }
}
