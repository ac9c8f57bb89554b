//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`SwapRepository`], [`FeedbackRepository`], [`UserDirectory`])
//! are implemented by persistence adapters; driving ports ([`SwapLifecycle`],
//! [`RatingEngine`], [`Moderation`]) are implemented by the engines and
//! consumed by inbound adapters.

mod feedback_repository;
mod moderation;
mod rating_engine;
mod swap_lifecycle;
mod swap_repository;
mod user_directory;

#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub use feedback_repository::{
    FeedbackPersistenceError, FeedbackRepository, FixtureFeedbackRepository,
};
pub use moderation::{BanOutcome, Moderation};
#[cfg(test)]
pub use rating_engine::MockRatingEngine;
pub use rating_engine::{EditFeedbackRequest, RatingEngine, SubmitFeedbackRequest};
#[cfg(test)]
pub use swap_lifecycle::MockSwapLifecycle;
pub use swap_lifecycle::{CreateSwapRequest, SwapLifecycle, SwapStats};
#[cfg(test)]
pub use swap_repository::MockSwapRepository;
pub use swap_repository::{FixtureSwapRepository, SwapPersistenceError, SwapRepository};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
