//! The swap aggregate and its state machine.
//!
//! Transition legality lives on [`Swap`] itself: every status move goes
//! through one of the transition methods below, which validate before
//! mutating. Actor identity and collaborator guards (skill possession,
//! provider availability) are the service layer's concern.

mod status;

pub use status::SwapStatus;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::skill::SkillDescriptor;
use crate::domain::user::UserId;

/// Maximum accepted request message length, in characters.
pub const MESSAGE_MAX: usize = 500;

/// Validation errors returned by [`Swap::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapValidationError {
    SelfSwap,
    MessageTooLong { max: usize },
}

impl fmt::Display for SwapValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfSwap => write!(f, "requester and provider must differ"),
            Self::MessageTooLong { max } => {
                write!(f, "message must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for SwapValidationError {}

/// A transition rejected by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    from: SwapStatus,
    action: &'static str,
}

impl TransitionError {
    const fn new(from: SwapStatus, action: &'static str) -> Self {
        Self { from, action }
    }

    /// The status the swap was in when the transition was refused.
    pub const fn from_status(&self) -> SwapStatus {
        self.from
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} a swap that is {}", self.action, self.from)
    }
}

impl std::error::Error for TransitionError {}

/// Stable swap identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapId(Uuid);

impl SwapId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`SwapId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which side of a swap a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Requester,
    Provider,
}

/// Outcome of recording one participant's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The caller had already marked their side; nothing changed.
    AlreadyRecorded,
    /// The caller's flag is now set; the counterpart has not confirmed yet.
    Recorded,
    /// Both flags are set; the swap just transitioned to completed.
    Completed,
}

/// Input payload for [`Swap::new`].
#[derive(Debug, Clone)]
pub struct SwapDraft {
    pub id: SwapId,
    pub requester: UserId,
    pub provider: UserId,
    pub offered: SkillDescriptor,
    pub requested: SkillDescriptor,
    pub message: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A proposed or executing exchange of one member's offered skill for
/// another's.
///
/// ## Invariants
/// - `requester != provider`.
/// - `status` moves only along the transition graph; `completed` implies both
///   completion flags and a `completed_at` timestamp.
/// - `revision` increments on every persisted update; stores compare-and-set
///   on it so concurrent writers cannot both commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    id: SwapId,
    requester: UserId,
    provider: UserId,
    offered: SkillDescriptor,
    requested: SkillDescriptor,
    status: SwapStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    requester_completed: bool,
    provider_completed: bool,
    contact_exchanged: bool,
    flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    flag_reason: Option<String>,
    created_at: DateTime<Utc>,
    revision: u64,
}

impl Swap {
    /// Create a validated pending swap.
    pub fn new(draft: SwapDraft) -> Result<Self, SwapValidationError> {
        let SwapDraft {
            id,
            requester,
            provider,
            offered,
            requested,
            message,
            scheduled_date,
            created_at,
        } = draft;

        if requester == provider {
            return Err(SwapValidationError::SelfSwap);
        }
        if let Some(text) = message.as_deref()
            && text.len() > MESSAGE_MAX
        {
            return Err(SwapValidationError::MessageTooLong { max: MESSAGE_MAX });
        }

        Ok(Self {
            id,
            requester,
            provider,
            offered,
            requested,
            status: SwapStatus::Pending,
            message,
            rejection_reason: None,
            cancel_reason: None,
            scheduled_date,
            completed_at: None,
            requester_completed: false,
            provider_completed: false,
            contact_exchanged: false,
            flagged: false,
            flag_reason: None,
            created_at,
            revision: 0,
        })
    }

    /// Stable swap identifier.
    pub const fn id(&self) -> &SwapId {
        &self.id
    }

    /// The member who proposed the exchange.
    pub const fn requester(&self) -> &UserId {
        &self.requester
    }

    /// The member whose skill was requested.
    pub const fn provider(&self) -> &UserId {
        &self.provider
    }

    /// What the requester brings to the exchange.
    pub const fn offered(&self) -> &SkillDescriptor {
        &self.offered
    }

    /// What the requester asks of the provider.
    pub const fn requested(&self) -> &SkillDescriptor {
        &self.requested
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> SwapStatus {
        self.status
    }

    /// Message attached to the request, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Reason recorded with a rejection.
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Reason recorded with a cancellation.
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    /// Agreed date for the exchange, if scheduled.
    pub const fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        self.scheduled_date
    }

    /// When both sides confirmed completion.
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Whether the requester confirmed completion.
    pub const fn requester_completed(&self) -> bool {
        self.requester_completed
    }

    /// Whether the provider confirmed completion.
    pub const fn provider_completed(&self) -> bool {
        self.provider_completed
    }

    /// Whether contact details were exchanged when work started.
    pub const fn contact_exchanged(&self) -> bool {
        self.contact_exchanged
    }

    /// Whether a moderator flagged this swap.
    pub const fn flagged(&self) -> bool {
        self.flagged
    }

    /// Reason recorded with the moderation flag.
    pub fn flag_reason(&self) -> Option<&str> {
        self.flag_reason.as_deref()
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Optimistic-concurrency token; increments on every persisted update.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Which side of this swap the user is on, if any.
    pub fn participant(&self, user: &UserId) -> Option<Participant> {
        if *user == self.requester {
            Some(Participant::Requester)
        } else if *user == self.provider {
            Some(Participant::Provider)
        } else {
            None
        }
    }

    /// The other participant, when `user` is one of the two.
    pub fn counterpart(&self, user: &UserId) -> Option<&UserId> {
        match self.participant(user)? {
            Participant::Requester => Some(&self.provider),
            Participant::Provider => Some(&self.requester),
        }
    }

    /// pending → accepted.
    pub fn accept(&mut self) -> Result<(), TransitionError> {
        if self.status != SwapStatus::Pending {
            return Err(TransitionError::new(self.status, "accept"));
        }
        self.status = SwapStatus::Accepted;
        Ok(())
    }

    /// pending → rejected, recording the optional reason.
    pub fn reject(&mut self, reason: Option<String>) -> Result<(), TransitionError> {
        if self.status != SwapStatus::Pending {
            return Err(TransitionError::new(self.status, "reject"));
        }
        self.status = SwapStatus::Rejected;
        self.rejection_reason = reason;
        Ok(())
    }

    /// Any cancellable state → cancelled, recording the optional reason.
    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), TransitionError> {
        if !self.status.can_be_cancelled() {
            return Err(TransitionError::new(self.status, "cancel"));
        }
        self.status = SwapStatus::Cancelled;
        self.cancel_reason = reason;
        Ok(())
    }

    /// accepted → in_progress; marks contact details as exchanged.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.status != SwapStatus::Accepted {
            return Err(TransitionError::new(self.status, "start"));
        }
        self.status = SwapStatus::InProgress;
        self.contact_exchanged = true;
        Ok(())
    }

    /// Record one side's completion while in_progress.
    ///
    /// Idempotent per side. When the second side confirms, the swap moves to
    /// completed and `completed_at` is stamped with `now`.
    pub fn record_completion(
        &mut self,
        side: Participant,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, TransitionError> {
        if self.status != SwapStatus::InProgress {
            return Err(TransitionError::new(self.status, "mark completion on"));
        }

        let flag = match side {
            Participant::Requester => &mut self.requester_completed,
            Participant::Provider => &mut self.provider_completed,
        };
        if *flag {
            return Ok(CompletionOutcome::AlreadyRecorded);
        }
        *flag = true;

        if self.requester_completed && self.provider_completed {
            self.status = SwapStatus::Completed;
            self.completed_at = Some(now);
            Ok(CompletionOutcome::Completed)
        } else {
            Ok(CompletionOutcome::Recorded)
        }
    }

    /// Set the moderation flag. Works in any state; flagging does not touch
    /// the lifecycle.
    pub fn flag(&mut self, reason: Option<String>) {
        self.flagged = true;
        self.flag_reason = reason;
    }

    /// Advance the concurrency token. Store adapters call this when
    /// committing an update.
    pub const fn bump_revision(&mut self) {
        self.revision += 1;
    }
}
