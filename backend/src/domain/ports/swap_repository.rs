//! Port for swap persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::skill::SkillName;
use crate::domain::swap::{Swap, SwapId};
use crate::domain::user::UserId;

/// Persistence errors raised by swap store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapPersistenceError {
    /// Store connection could not be established.
    #[error("swap store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("swap store query failed: {message}")]
    Query { message: String },
    /// A concurrent writer committed first; the caller's copy is stale.
    #[error("swap {id} was updated concurrently (stale revision {observed})")]
    RevisionConflict { id: SwapId, observed: u64 },
    /// The pending-request dedup index refused the insert.
    #[error("an equivalent pending swap request already exists")]
    DuplicatePending,
}

impl SwapPersistenceError {
    /// Construct a [`SwapPersistenceError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`SwapPersistenceError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for swap persistence.
///
/// Adapters must provide two guarantees beyond plain CRUD: `insert` enforces
/// a uniqueness constraint over (requester, provider, offered skill,
/// requested skill) among `pending` swaps, and `update` is a compare-and-set
/// on [`Swap::revision`] so two concurrent writers cannot both commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapRepository: Send + Sync {
    /// Persist a new swap, enforcing the pending dedup constraint.
    async fn insert(&self, swap: &Swap) -> Result<(), SwapPersistenceError>;

    /// Fetch a swap by identifier.
    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError>;

    /// Find a pending swap matching the dedup tuple, if one exists.
    async fn find_matching_pending(
        &self,
        requester: &UserId,
        provider: &UserId,
        offered: &SkillName,
        requested: &SkillName,
    ) -> Result<Option<Swap>, SwapPersistenceError>;

    /// All pending swaps in which the user participates.
    async fn list_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Swap>, SwapPersistenceError>;

    /// All swaps in which the user participates, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Swap>, SwapPersistenceError>;

    /// Commit an update via compare-and-set on the revision carried by
    /// `swap`; returns the stored entity with its advanced revision.
    async fn update(&self, swap: &Swap) -> Result<Swap, SwapPersistenceError>;

    /// Permanently remove a swap record.
    async fn delete(&self, id: &SwapId) -> Result<(), SwapPersistenceError>;
}

/// Fixture implementation for tests that do not exercise swap persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSwapRepository;

#[async_trait]
impl SwapRepository for FixtureSwapRepository {
    async fn insert(&self, _swap: &Swap) -> Result<(), SwapPersistenceError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError> {
        Ok(None)
    }

    async fn find_matching_pending(
        &self,
        _requester: &UserId,
        _provider: &UserId,
        _offered: &SkillName,
        _requested: &SkillName,
    ) -> Result<Option<Swap>, SwapPersistenceError> {
        Ok(None)
    }

    async fn list_pending_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Swap>, SwapPersistenceError> {
        Ok(Vec::new())
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Swap>, SwapPersistenceError> {
        Ok(Vec::new())
    }

    async fn update(&self, swap: &Swap) -> Result<Swap, SwapPersistenceError> {
        let mut stored = swap.clone();
        stored.bump_revision();
        Ok(stored)
    }

    async fn delete(&self, _id: &SwapId) -> Result<(), SwapPersistenceError> {
        Ok(())
    }
}
