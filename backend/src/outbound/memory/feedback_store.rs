//! In-memory feedback store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::feedback::{Feedback, FeedbackId};
use crate::domain::ports::{FeedbackPersistenceError, FeedbackRepository};
use crate::domain::swap::SwapId;
use crate::domain::user::UserId;

/// Feedback store backed by a map behind an async lock, with the
/// (swap, reviewer) unique index enforced on insert.
#[derive(Debug, Default)]
pub struct InMemoryFeedbackRepository {
    records: RwLock<HashMap<FeedbackId, Feedback>>,
}

impl InMemoryFeedbackRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackPersistenceError> {
        let mut records = self.records.write().await;
        let duplicate = records.values().any(|existing| {
            existing.swap_id() == feedback.swap_id() && existing.reviewer() == feedback.reviewer()
        });
        if duplicate {
            return Err(FeedbackPersistenceError::DuplicateFeedback);
        }
        records.insert(feedback.id().clone(), feedback.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_swap_and_reviewer(
        &self,
        swap_id: &SwapId,
        reviewer: &UserId,
    ) -> Result<Option<Feedback>, FeedbackPersistenceError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.swap_id() == swap_id && record.reviewer() == reviewer)
            .cloned())
    }

    async fn list_for_reviewee(
        &self,
        reviewee: &UserId,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
        let records = self.records.read().await;
        let mut listed: Vec<Feedback> = records
            .values()
            .filter(|record| record.reviewee() == reviewee)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(listed)
    }

    async fn update(&self, feedback: &Feedback) -> Result<(), FeedbackPersistenceError> {
        let mut records = self.records.write().await;
        let stored = records.get_mut(feedback.id()).ok_or_else(|| {
            FeedbackPersistenceError::query(format!("feedback {} not found", feedback.id()))
        })?;
        *stored = feedback.clone();
        Ok(())
    }

    async fn delete(&self, id: &FeedbackId) -> Result<(), FeedbackPersistenceError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
