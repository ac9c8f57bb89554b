//! Domain entities, services, and ports.
//!
//! Purpose: define the strongly typed swap, feedback, and user-directory
//! entities together with the engines that mutate them. Types are immutable
//! outside their own transition methods; each type documents its invariants
//! and serialisation contract (serde) in its Rustdoc.
//!
//! Public surface:
//! - [`DomainError`] / [`ErrorCode`] — typed failures returned by every engine.
//! - [`Swap`] / [`SwapStatus`] — the swap aggregate and its state machine.
//! - [`Feedback`] / [`Rating`] — post-completion reviews.
//! - [`UserProfile`] / [`RatingSummary`] — the directory view the engines
//!   consume and the aggregate they maintain.
//! - [`SwapLifecycleService`], [`RatingService`], [`ModerationService`] —
//!   engine implementations of the driving ports in [`ports`].

pub mod error;
pub mod feedback;
pub mod moderation_service;
pub mod ports;
pub mod rating;
pub mod rating_service;
pub mod skill;
pub mod swap;
pub mod swap_service;
pub mod user;

pub use self::error::{DomainError, ErrorCode};
pub use self::feedback::{
    CategoryRatings, Feedback, FeedbackDraft, FeedbackId, FeedbackValidationError, Rating,
};
pub use self::moderation_service::ModerationService;
pub use self::rating::{CategoryAverages, FeedbackSummary, RatingDistribution, RatingSummary};
pub use self::rating_service::RatingService;
pub use self::skill::{SkillDescriptor, SkillName, SkillValidationError};
pub use self::swap::{
    CompletionOutcome, Participant, Swap, SwapDraft, SwapId, SwapStatus, SwapValidationError,
    TransitionError,
};
pub use self::swap_service::SwapLifecycleService;
pub use self::user::{UserId, UserProfile};
