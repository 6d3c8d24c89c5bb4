// ABOUTME: In-memory exercise reference index used to ground the language model
// ABOUTME: Fail-open loading, bounded grounding subset, search filters, and option lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Reference Index
//!
//! The reference library is a large public exercise dataset. It is only ever
//! read: the pipeline embeds a bounded prefix of it into the system prompt so
//! the model prefers canonical exercise names.
//!
//! Loading is fail-open. A library that is not a JSON array is treated as
//! empty, and individual entries that do not look like exercises are skipped.
//! The HTTP adapter checks the array shape itself before calling in here.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};
use workout_core::constants::pipeline::DEFAULT_GROUNDING_LIMIT;
use workout_core::errors::{AppError, AppResult, ErrorCode, FormatError};
use workout_core::models::ReferenceExercise;

/// Filter options for [`ExerciseLibrary::search`]
///
/// Empty fields do not filter. Non-empty fields are combined with AND; within
/// a list field any single match is enough.
#[derive(Debug, Clone, Default)]
pub struct LibraryFilter {
    /// Keep exercises using any of these equipment names
    pub equipment: Vec<String>,
    /// Keep exercises working any of these muscles, primary or secondary
    pub muscle_groups: Vec<String>,
    /// Keep exercises in this category
    pub category: Option<String>,
}

impl LibraryFilter {
    /// Filter on equipment
    #[must_use]
    pub fn with_equipment<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment = equipment.into_iter().map(Into::into).collect();
        self
    }

    /// Filter on muscle groups
    #[must_use]
    pub fn with_muscle_groups<I, S>(mut self, muscle_groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.muscle_groups = muscle_groups.into_iter().map(Into::into).collect();
        self
    }

    /// Filter on category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn matches(&self, exercise: &ReferenceExercise) -> bool {
        let equipment_ok = self.equipment.is_empty()
            || self.equipment.iter().any(|wanted| {
                exercise
                    .equipment
                    .iter()
                    .any(|have| have.eq_ignore_ascii_case(wanted))
            });

        let muscles_ok = self.muscle_groups.is_empty()
            || self.muscle_groups.iter().any(|wanted| {
                exercise
                    .primary_muscles
                    .iter()
                    .chain(exercise.secondary_muscles.iter().flatten())
                    .any(|have| have.eq_ignore_ascii_case(wanted))
            });

        let category_ok = self
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .map_or(true, |category| exercise.category.eq_ignore_ascii_case(category));

        equipment_ok && muscles_ok && category_ok
    }
}

/// Read-only collection of reference exercises
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseLibrary {
    exercises: Vec<ReferenceExercise>,
}

impl ExerciseLibrary {
    /// Wrap already-parsed entries
    #[must_use]
    pub const fn new(exercises: Vec<ReferenceExercise>) -> Self {
        Self { exercises }
    }

    /// Build a library from arbitrary JSON, failing open
    ///
    /// A non-array becomes an empty library. Array entries that do not
    /// deserialize as a [`ReferenceExercise`] are skipped.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(entries) => Self::from_entries(entries),
            other => {
                warn!(
                    kind = json_kind(&other),
                    "Exercise library is not an array, grounding without it"
                );
                Self::default()
            }
        }
    }

    /// Build a library from JSON, rejecting a non-array at the outer boundary
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidLibrary`] when `value` is not an array.
    pub fn try_from_value(value: Value) -> Result<Self, FormatError> {
        match value {
            Value::Array(entries) => Ok(Self::from_entries(entries)),
            _ => Err(FormatError::InvalidLibrary),
        }
    }

    fn from_entries(entries: Vec<Value>) -> Self {
        let total = entries.len();
        let exercises: Vec<ReferenceExercise> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value(entry)
                    .map_err(|e| warn!(index, error = %e, "Skipping malformed library entry"))
                    .ok()
            })
            .collect();

        debug!(
            loaded = exercises.len(),
            skipped = total - exercises.len(),
            "Exercise library loaded"
        );
        Self { exercises }
    }

    /// Load a library from a JSON file
    ///
    /// The file content is parsed fail-open like [`Self::from_value`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub async fn load_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).await.map_err(|e| {
            let code = if e.kind() == ErrorKind::NotFound {
                ErrorCode::ResourceNotFound
            } else {
                ErrorCode::InvalidInput
            };
            AppError::new(
                code,
                format!("Cannot read exercise library {}: {e}", path.display()),
            )
        })?;

        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            AppError::new(
                ErrorCode::InvalidFormat,
                format!("Exercise library {} is not valid JSON: {e}", path.display()),
            )
        })?;

        Ok(Self::from_value(value))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the library has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// All entries, in source order
    #[must_use]
    pub fn exercises(&self) -> &[ReferenceExercise] {
        &self.exercises
    }

    /// Render the first `limit` entries as prompt grounding lines
    ///
    /// Each line is `- <name>` followed by ` (aliases: a, b)` when the entry
    /// has at least one alias. Lines are joined with `\n`. The output never
    /// holds more than `limit` lines and depends only on the library order.
    #[must_use]
    pub fn select_grounding_subset(&self, limit: usize) -> String {
        self.exercises
            .iter()
            .take(limit)
            .map(grounding_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Grounding subset with the default limit
    #[must_use]
    pub fn default_grounding_subset(&self) -> String {
        self.select_grounding_subset(DEFAULT_GROUNDING_LIMIT)
    }

    /// Search by name or alias substring, then apply `filter`
    ///
    /// Matching is case-insensitive. A blank query matches every entry.
    #[must_use]
    pub fn search(&self, query: &str, filter: &LibraryFilter) -> Vec<&ReferenceExercise> {
        let query = query.trim().to_lowercase();
        self.exercises
            .iter()
            .filter(|exercise| {
                query.is_empty()
                    || exercise.name.to_lowercase().contains(&query)
                    || exercise
                        .alias_list()
                        .iter()
                        .any(|alias| alias.to_lowercase().contains(&query))
            })
            .filter(|exercise| filter.matches(exercise))
            .collect()
    }

    /// Exact lookup by name or alias, ignoring case
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ReferenceExercise> {
        let name = name.trim();
        self.exercises
            .iter()
            .find(|exercise| exercise.matches_name(name))
    }

    /// Sorted distinct equipment names, excluding `"none"`
    #[must_use]
    pub fn equipment_options(&self) -> Vec<String> {
        self.exercises
            .iter()
            .flat_map(|exercise| exercise.equipment.iter())
            .filter(|equipment| !equipment.is_empty() && !equipment.eq_ignore_ascii_case("none"))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct primary and secondary muscle names
    #[must_use]
    pub fn muscle_group_options(&self) -> Vec<String> {
        self.exercises
            .iter()
            .flat_map(|exercise| {
                exercise
                    .primary_muscles
                    .iter()
                    .chain(exercise.secondary_muscles.iter().flatten())
            })
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl From<Vec<ReferenceExercise>> for ExerciseLibrary {
    fn from(exercises: Vec<ReferenceExercise>) -> Self {
        Self::new(exercises)
    }
}

fn grounding_line(exercise: &ReferenceExercise) -> String {
    let aliases = exercise.alias_list();
    if aliases.is_empty() {
        format!("- {}", exercise.name)
    } else {
        format!("- {} (aliases: {})", exercise.name, aliases.join(", "))
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
