//! Skill names and the descriptors exchanged in swap requests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by skill constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillValidationError {
    EmptySkillName,
    EstimatedHoursOutOfRange { min: u8, max: u8 },
}

impl fmt::Display for SkillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySkillName => write!(f, "skill name must not be empty"),
            Self::EstimatedHoursOutOfRange { min, max } => {
                write!(f, "estimated hours must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for SkillValidationError {}

/// Minimum accepted estimate for a skill exchange.
pub const ESTIMATED_HOURS_MIN: u8 = 1;
/// Maximum accepted estimate for a skill exchange.
pub const ESTIMATED_HOURS_MAX: u8 = 100;

/// A skill tag as advertised on a profile or named in a swap.
///
/// ## Invariants
/// - Non-empty once trimmed of surrounding whitespace; stored trimmed so two
///   tags differing only in padding compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    /// Validate and construct a [`SkillName`].
    pub fn new(name: impl Into<String>) -> Result<Self, SkillValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SkillValidationError::EmptySkillName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SkillName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SkillName> for String {
    fn from(value: SkillName) -> Self {
        value.0
    }
}

impl TryFrom<String> for SkillName {
    type Error = SkillValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One side of a proposed exchange: which skill, and optionally how much of
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDescriptor {
    skill: SkillName,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_hours: Option<u8>,
}

impl SkillDescriptor {
    /// Build a descriptor carrying only the skill name.
    pub const fn new(skill: SkillName) -> Self {
        Self {
            skill,
            description: None,
            estimated_hours: None,
        }
    }

    /// Fallible constructor validating the hour estimate.
    pub fn try_new(
        skill: SkillName,
        description: Option<String>,
        estimated_hours: Option<u8>,
    ) -> Result<Self, SkillValidationError> {
        if let Some(hours) = estimated_hours
            && !(ESTIMATED_HOURS_MIN..=ESTIMATED_HOURS_MAX).contains(&hours)
        {
            return Err(SkillValidationError::EstimatedHoursOutOfRange {
                min: ESTIMATED_HOURS_MIN,
                max: ESTIMATED_HOURS_MAX,
            });
        }
        Ok(Self {
            skill,
            description,
            estimated_hours,
        })
    }

    /// The skill being offered or requested.
    pub const fn skill(&self) -> &SkillName {
        &self.skill
    }

    /// Free-form description of the exchange terms.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Estimated effort in hours, when the member supplied one.
    pub const fn estimated_hours(&self) -> Option<u8> {
        self.estimated_hours
    }
}
