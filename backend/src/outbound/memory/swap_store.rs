//! In-memory swap store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{SwapPersistenceError, SwapRepository};
use crate::domain::skill::SkillName;
use crate::domain::swap::{Swap, SwapId, SwapStatus};
use crate::domain::user::UserId;

fn matches_pending_tuple(
    swap: &Swap,
    requester: &UserId,
    provider: &UserId,
    offered: &SkillName,
    requested: &SkillName,
) -> bool {
    swap.status() == SwapStatus::Pending
        && swap.requester() == requester
        && swap.provider() == provider
        && swap.offered().skill() == offered
        && swap.requested().skill() == requested
}

/// Swap store backed by a map behind an async lock.
///
/// The write lock makes every mutation atomic, which is what gives the
/// dedup index and the revision compare-and-set their guarantees.
#[derive(Debug, Default)]
pub struct InMemorySwapRepository {
    records: RwLock<HashMap<SwapId, Swap>>,
}

impl InMemorySwapRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SwapRepository for InMemorySwapRepository {
    async fn insert(&self, swap: &Swap) -> Result<(), SwapPersistenceError> {
        let mut records = self.records.write().await;
        if swap.status() == SwapStatus::Pending
            && records.values().any(|existing| {
                matches_pending_tuple(
                    existing,
                    swap.requester(),
                    swap.provider(),
                    swap.offered().skill(),
                    swap.requested().skill(),
                )
            })
        {
            return Err(SwapPersistenceError::DuplicatePending);
        }
        records.insert(swap.id().clone(), swap.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_matching_pending(
        &self,
        requester: &UserId,
        provider: &UserId,
        offered: &SkillName,
        requested: &SkillName,
    ) -> Result<Option<Swap>, SwapPersistenceError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|swap| matches_pending_tuple(swap, requester, provider, offered, requested))
            .cloned())
    }

    async fn list_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Swap>, SwapPersistenceError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|swap| {
                swap.status() == SwapStatus::Pending && swap.participant(user_id).is_some()
            })
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Swap>, SwapPersistenceError> {
        let records = self.records.read().await;
        let mut swaps: Vec<Swap> = records
            .values()
            .filter(|swap| swap.participant(user_id).is_some())
            .cloned()
            .collect();
        swaps.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(swaps)
    }

    async fn update(&self, swap: &Swap) -> Result<Swap, SwapPersistenceError> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(swap.id())
            .ok_or_else(|| SwapPersistenceError::query(format!("swap {} not found", swap.id())))?;
        if stored.revision() != swap.revision() {
            debug!(swap = %swap.id(), stale = swap.revision(), current = stored.revision(),
                "rejected stale swap update");
            return Err(SwapPersistenceError::RevisionConflict {
                id: swap.id().clone(),
                observed: swap.revision(),
            });
        }
        let mut committed = swap.clone();
        committed.bump_revision();
        *stored = committed.clone();
        Ok(committed)
    }

    async fn delete(&self, id: &SwapId) -> Result<(), SwapPersistenceError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
