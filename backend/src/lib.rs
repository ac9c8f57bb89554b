//! Skill-swap marketplace core.
//!
//! This crate owns the swap lifecycle state machine, the derived-rating
//! aggregation engine, and the moderation layer that drives them. Transport
//! concerns (HTTP routing, authentication, pagination) live in collaborating
//! services; they talk to this crate through the driving ports in
//! [`domain::ports`] and supply persistence through the driven ports defined
//! there. [`outbound::memory`] ships reference adapters backing the
//! integration tests.

pub mod domain;
pub mod outbound;
