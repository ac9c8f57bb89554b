//! In-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::rating::RatingSummary;
use crate::domain::user::{UserId, UserProfile};

/// Directory backed by a map behind an async lock.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    records: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile; registration is the real directory's concern.
    pub async fn insert(&self, profile: UserProfile) {
        self.records
            .write()
            .await
            .insert(profile.id().clone(), profile);
    }

    async fn with_profile(
        &self,
        id: &UserId,
        mutate: impl FnOnce(&mut UserProfile) + Send,
    ) -> Result<(), UserDirectoryError> {
        let mut records = self.records.write().await;
        let profile = records
            .get_mut(id)
            .ok_or_else(|| UserDirectoryError::query(format!("user {id} not found")))?;
        mutate(profile);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn increment_completed_swaps(&self, id: &UserId) -> Result<(), UserDirectoryError> {
        self.with_profile(id, UserProfile::record_completed_swap)
            .await
    }

    async fn update_rating_summary(
        &self,
        id: &UserId,
        summary: RatingSummary,
    ) -> Result<(), UserDirectoryError> {
        self.with_profile(id, |profile| profile.set_rating(summary))
            .await
    }

    async fn ban(
        &self,
        id: &UserId,
        reason: Option<String>,
        banned_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError> {
        self.with_profile(id, |profile| profile.ban(reason, banned_at))
            .await
    }

    async fn reactivate(&self, id: &UserId) -> Result<(), UserDirectoryError> {
        self.with_profile(id, UserProfile::reactivate).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserDirectoryError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
