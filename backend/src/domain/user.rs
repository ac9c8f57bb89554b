//! User directory view consumed by the engines.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rating::RatingSummary;
use crate::domain::skill::SkillName;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Directory record for a marketplace member.
///
/// The directory itself (registration, profile editing, search) is a
/// collaborating service; the engines read availability and skill tags from
/// this view and write back only through the mutators below. Rating fields
/// are owned by the rating engine, the completion counter by the swap
/// lifecycle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    id: UserId,
    display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    offered_skills: Vec<SkillName>,
    wanted_skills: Vec<SkillName>,
    active: bool,
    banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ban_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    banned_at: Option<DateTime<Utc>>,
    is_admin: bool,
    rating: RatingSummary,
    completed_swaps: u32,
}

impl UserProfile {
    /// Build an active, unbanned profile with no skills advertised yet.
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            location: None,
            offered_skills: Vec::new(),
            wanted_skills: Vec::new(),
            active: true,
            banned: false,
            ban_reason: None,
            banned_at: None,
            is_admin: false,
            rating: RatingSummary::empty(),
            completed_swaps: 0,
        }
    }

    /// Replace the advertised offered-skill tags.
    #[must_use]
    pub fn with_offered_skills(mut self, skills: Vec<SkillName>) -> Self {
        self.offered_skills = skills;
        self
    }

    /// Replace the advertised wanted-skill tags.
    #[must_use]
    pub fn with_wanted_skills(mut self, skills: Vec<SkillName>) -> Self {
        self.wanted_skills = skills;
        self
    }

    /// Set the free-form location string.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Mark the profile as an administrator.
    #[must_use]
    pub const fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Stable user identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other members.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Free-form location, when shared.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Skill tags the member offers.
    pub fn offered_skills(&self) -> &[SkillName] {
        self.offered_skills.as_slice()
    }

    /// Skill tags the member wants to learn.
    pub fn wanted_skills(&self) -> &[SkillName] {
        self.wanted_skills.as_slice()
    }

    /// Whether the member advertises the given skill.
    pub fn offers_skill(&self, skill: &SkillName) -> bool {
        self.offered_skills.contains(skill)
    }

    /// Whether the account is active.
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Whether a moderator banned the account.
    pub const fn banned(&self) -> bool {
        self.banned
    }

    /// Reason recorded with the ban, if any.
    pub fn ban_reason(&self) -> Option<&str> {
        self.ban_reason.as_deref()
    }

    /// When the ban was applied.
    pub const fn banned_at(&self) -> Option<DateTime<Utc>> {
        self.banned_at
    }

    /// Whether the member may participate in new swaps.
    pub const fn is_available(&self) -> bool {
        self.active && !self.banned
    }

    /// Whether the member holds moderator privileges.
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Aggregate rating maintained by the rating engine.
    pub const fn rating(&self) -> RatingSummary {
        self.rating
    }

    /// Number of swaps the member completed.
    pub const fn completed_swaps(&self) -> u32 {
        self.completed_swaps
    }

    /// Apply a ban: deactivates the account and records the reason.
    pub fn ban(&mut self, reason: Option<String>, banned_at: DateTime<Utc>) {
        self.active = false;
        self.banned = true;
        self.ban_reason = reason;
        self.banned_at = Some(banned_at);
    }

    /// Lift a ban and reactivate the account, clearing ban metadata.
    pub fn reactivate(&mut self) {
        self.active = true;
        self.banned = false;
        self.ban_reason = None;
        self.banned_at = None;
    }

    /// Overwrite the aggregate rating. Rating-engine use only.
    pub const fn set_rating(&mut self, rating: RatingSummary) {
        self.rating = rating;
    }

    /// Record one more completed swap. Lifecycle-engine use only.
    pub const fn record_completed_swap(&mut self) {
        self.completed_swaps = self.completed_swaps.saturating_add(1);
    }
}
