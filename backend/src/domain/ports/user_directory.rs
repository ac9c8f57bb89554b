//! Port for the user directory collaborator.
//!
//! The directory owns registration, profile editing, and search. The engines
//! read availability and skill tags through [`UserDirectory::get`] and write
//! back only the fields they own: the rating aggregate and the completed-swap
//! counter, plus ban status on behalf of the moderation layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::rating::RatingSummary;
use crate::domain::user::{UserId, UserProfile};

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// Directory connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user directory query failed: {message}")]
    Query { message: String },
}

impl UserDirectoryError {
    /// Construct a [`UserDirectoryError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`UserDirectoryError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port onto the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a member's profile.
    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError>;

    /// Add one to the member's completed-swap counter.
    async fn increment_completed_swaps(&self, id: &UserId) -> Result<(), UserDirectoryError>;

    /// Overwrite the member's aggregate rating.
    async fn update_rating_summary(
        &self,
        id: &UserId,
        summary: RatingSummary,
    ) -> Result<(), UserDirectoryError>;

    /// Mark the member banned with the given reason and timestamp.
    async fn ban(
        &self,
        id: &UserId,
        reason: Option<String>,
        banned_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError>;

    /// Reactivate the member and clear ban metadata.
    async fn reactivate(&self, id: &UserId) -> Result<(), UserDirectoryError>;

    /// Remove the member's directory record.
    async fn delete(&self, id: &UserId) -> Result<(), UserDirectoryError>;
}

/// Fixture implementation for tests that do not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn get(&self, _id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(None)
    }

    async fn increment_completed_swaps(&self, _id: &UserId) -> Result<(), UserDirectoryError> {
        Ok(())
    }

    async fn update_rating_summary(
        &self,
        _id: &UserId,
        _summary: RatingSummary,
    ) -> Result<(), UserDirectoryError> {
        Ok(())
    }

    async fn ban(
        &self,
        _id: &UserId,
        _reason: Option<String>,
        _banned_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError> {
        Ok(())
    }

    async fn reactivate(&self, _id: &UserId) -> Result<(), UserDirectoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &UserId) -> Result<(), UserDirectoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn connection_error_formats_message() {
        let err = UserDirectoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_get_returns_none() {
        let directory = FixtureUserDirectory;
        let found = directory
            .get(&UserId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }
}
