// ABOUTME: Reference exercise entry from the external exercise dataset
// ABOUTME: Read-only grounding input; field names follow the published snake_case JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// One known exercise from the reference dataset
///
/// Only `name` is required; every other field defaults so that partially
/// filled dataset entries still contribute to grounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceExercise {
    /// Canonical exercise name
    pub name: String,
    /// Dataset category, e.g. `"strength"` or `"cardio"`
    #[serde(default)]
    pub category: String,
    /// Equipment needed
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Primary muscles worked
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    /// Secondary muscles worked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_muscles: Option<Vec<String>>,
    /// Alternate names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    /// Step-by-step instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    /// Coaching tips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    /// Prose description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Demonstration video URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Tempo prescription, e.g. `"3-1-1"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
}

impl ReferenceExercise {
    /// Create an entry with just a name and category
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            equipment: Vec::new(),
            primary_muscles: Vec::new(),
            secondary_muscles: None,
            aliases: None,
            instructions: None,
            tips: None,
            description: None,
            video: None,
            tempo: None,
        }
    }

    /// Set the aliases
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    /// Set the equipment
    #[must_use]
    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment = equipment.into_iter().map(Into::into).collect();
        self
    }

    /// Set the primary muscles
    #[must_use]
    pub fn with_primary_muscles<I, S>(mut self, muscles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_muscles = muscles.into_iter().map(Into::into).collect();
        self
    }

    /// Set the secondary muscles
    #[must_use]
    pub fn with_secondary_muscles<I, S>(mut self, muscles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secondary_muscles = Some(muscles.into_iter().map(Into::into).collect());
        self
    }

    /// Aliases as a slice, empty when absent
    #[must_use]
    pub fn alias_list(&self) -> &[String] {
        self.aliases.as_deref().unwrap_or_default()
    }

    /// Whether `name` matches this entry's name or one of its aliases, ignoring case
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self
                .alias_list()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}
