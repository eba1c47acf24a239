//! Recovery of structured workout plans from free-text model output
//!
//! Generative models rarely answer with clean JSON. The engine runs an ordered
//! list of extractors over the response and keeps the first non-empty plan:
//!
//! 1. [`StructuredJsonExtractor`] decodes a JSON object found in the text.
//! 2. [`ExerciseLineExtractor`] salvages "Squat: 4 sets x 8 reps" style lines.
//! 3. Anything else is returned verbatim as a [`RawFallbackRecord`].
//!
//! Recovery never fails. A worse response only yields a less structured plan.

use crate::models::workout::{DEFAULT_REPS, DEFAULT_SETS};
use crate::models::{DaySession, Exercise, RawFallbackRecord, WorkoutPlan};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Maximum number of exercises salvaged from prose
pub const MAX_EXTRACTED_EXERCISES: usize = 6;

/// Day key and display name for exercises salvaged from prose
pub const EXTRACTED_DAY_KEY: &str = "day_1";
pub const EXTRACTED_SESSION_NAME: &str = "Workout (extracted from text)";

/// Tokens that the count-first pattern can mistake for an exercise name
const COUNT_WORDS: [&str; 10] = [
  "x", "set", "sets", "rep", "reps", "serie", "ripetizioni", "of", "da", "di",
];

/// Leading words of a captured phrase that are not part of the exercise name
const FILLER_WORDS: [&str; 16] = [
  "i", "you", "we", "do", "then", "and", "try", "perform", "with", "also", "next", "finally",
  "the", "a", "some", "poi",
];

/// ---------------------------------------------------------------------------
/// Patterns
/// ---------------------------------------------------------------------------

/// Brace patterns, tightest first
///
/// The two wide patterns both start at the first brace, so any object they
/// can yield has already been tried by [`leading_object`]. They stay as the
/// last resort of the cascade.
static OBJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  [
    // object with at most one level of nested objects
    r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}",
    // block running to the end of the text
    r"(?s)\{.*\}\z",
    // widest span
    r"(?s)\{.*\}",
  ]
  .iter()
  .filter_map(|pattern| Regex::new(pattern).ok())
  .collect()
});

/// Exercise patterns, each capturing `first`, `second` and `third`: a name and
/// two counts in pattern-specific order. Names are at most three words.
static EXERCISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  [
    // "Squat: 4 sets x 8 reps", "Bench press - 3 x 10"
    r"(?i)\b(?P<first>[\p{L}][\p{L}'\-]*(?:[ \t]+[\p{L}][\p{L}'\-]*){0,2})[ \t]*[:\-–][ \t]*(?P<second>\d+)[ \t]*(?:sets?|serie|x|×)[ \t]*(?:x|×|of|da|di)?[ \t]*(?P<third>\d+)",
    // "3x12 Lunges", "4 sets of 8 reps of Deadlift"; `lead` marks counts that
    // belong to a preceding "Name:" entry
    r"(?i)(?P<lead>[:\-–][ \t]*)?\b(?P<first>\d+)[ \t]*(?:x|×|sets?[ \t]*(?:x|×|of)?|serie[ \t]*(?:da|di)?)[ \t]*(?P<second>\d+)[ \t]*(?:reps?\b|ripetizioni\b)?[ \t]*(?:(?:of|di|da)[ \t]+)?(?P<third>[\p{L}][\p{L}'\-]*(?:[ \t]+[\p{L}][\p{L}'\-]*){0,2})",
    // "Pull ups 3x8", "Squat 4 sets 8 reps"
    r"(?i)\b(?P<first>[\p{L}][\p{L}'\-]*(?:[ \t]+[\p{L}][\p{L}'\-]*){0,2})[ \t]+(?P<second>\d+)[ \t]*(?:x|×|sets?[ \t]*(?:x|×|of)?|serie[ \t]*(?:da|di)?)[ \t]*(?P<third>\d+)",
  ]
  .iter()
  .filter_map(|pattern| Regex::new(pattern).ok())
  .collect()
});

/// ---------------------------------------------------------------------------
/// Engine Types
/// ---------------------------------------------------------------------------

/// Which stage of the cascade produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTier {
  Structured,
  Extracted,
  Raw,
}

/// A recovered plan and the tier that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
  pub plan: WorkoutPlan,
  pub tier: RecoveryTier,
}

/// One strategy in the recovery cascade
pub trait PlanExtractor: Send + Sync {
  fn tier(&self) -> RecoveryTier;

  /// A plan if this strategy found one; `None` passes to the next strategy
  fn extract(&self, text: &str) -> Option<WorkoutPlan>;
}

/// Runs extractors in order, falling back to the raw text
pub struct RecoveryEngine {
  extractors: Vec<Box<dyn PlanExtractor>>,
}

impl Default for RecoveryEngine {
  fn default() -> Self {
    Self::new(vec![
      Box::new(StructuredJsonExtractor),
      Box::new(ExerciseLineExtractor),
    ])
  }
}

impl RecoveryEngine {
  pub fn new(extractors: Vec<Box<dyn PlanExtractor>>) -> Self {
    Self { extractors }
  }

  /// Recover a plan from model output. Always returns a non-empty plan.
  pub fn recover(&self, text: &str) -> Recovery {
    for extractor in &self.extractors {
      if let Some(plan) = extractor.extract(text).filter(|plan| !plan.is_empty()) {
        debug!(tier = ?extractor.tier(), days = plan.len(), "Recovered workout plan");
        return Recovery {
          plan,
          tier: extractor.tier(),
        };
      }
    }

    debug!(chars = text.chars().count(), "No structure recovered, passing raw text through");
    Recovery {
      plan: RawFallbackRecord::new(text).into(),
      tier: RecoveryTier::Raw,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tier 1: JSON Objects
/// ---------------------------------------------------------------------------

/// Decodes the first JSON object found in the text, verbatim
///
/// Candidates are tried in order: the text as a continuation of a prompt that
/// ended on `{`, the object opening at the first brace, then every match of
/// each [`OBJECT_PATTERNS`] entry.
pub struct StructuredJsonExtractor;

impl PlanExtractor for StructuredJsonExtractor {
  fn tier(&self) -> RecoveryTier {
    RecoveryTier::Structured
  }

  fn extract(&self, text: &str) -> Option<WorkoutPlan> {
    let trimmed = text.trim();

    if trimmed.starts_with('"') {
      if let Some(map) = leading_object(&format!("{{{}", trimmed)) {
        return Some(WorkoutPlan::Structured(map));
      }
    }

    if let Some(map) = leading_object(trimmed) {
      return Some(WorkoutPlan::Structured(map));
    }

    OBJECT_PATTERNS
      .iter()
      .flat_map(|pattern| pattern.find_iter(trimmed))
      .find_map(|candidate| decode_object(candidate.as_str()))
      .map(WorkoutPlan::Structured)
  }
}

/// Strictly decode a non-empty JSON object
fn decode_object(candidate: &str) -> Option<Map<String, Value>> {
  serde_json::from_str::<Map<String, Value>>(candidate)
    .ok()
    .filter(|map| !map.is_empty())
}

/// Decode the complete object that opens at the first brace, ignoring what follows it
fn leading_object(text: &str) -> Option<Map<String, Value>> {
  let start = text.find('{')?;
  serde_json::Deserializer::from_str(&text[start..])
    .into_iter::<Map<String, Value>>()
    .next()?
    .ok()
    .filter(|map| !map.is_empty())
}

/// ---------------------------------------------------------------------------
/// Tier 2: Exercise Lines
/// ---------------------------------------------------------------------------

/// Salvages exercises mentioned in prose into a single session
pub struct ExerciseLineExtractor;

impl PlanExtractor for ExerciseLineExtractor {
  fn tier(&self) -> RecoveryTier {
    RecoveryTier::Extracted
  }

  fn extract(&self, text: &str) -> Option<WorkoutPlan> {
    let exercises: Vec<Exercise> = EXERCISE_PATTERNS
      .iter()
      .flat_map(|pattern| pattern.captures_iter(text))
      .filter(|caps| caps.name("lead").is_none())
      .filter_map(|caps| {
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        resolve_exercise([group("first"), group("second"), group("third")])
      })
      .take(MAX_EXTRACTED_EXERCISES)
      .collect();

    if exercises.is_empty() {
      return None;
    }

    let session = DaySession::new(EXTRACTED_SESSION_NAME, exercises);
    Some(WorkoutPlan::Sessions(vec![(
      EXTRACTED_DAY_KEY.to_string(),
      session,
    )]))
  }
}

fn is_numeric(group: &str) -> bool {
  !group.is_empty() && group.chars().all(|c| c.is_ascii_digit())
}

/// Turn three captured groups into an exercise, whatever their order
///
/// The name is the first non-numeric group, minus leading filler words.
/// Numeric groups become sets then reps in order; a missing, zero or
/// overflowing count takes its default. Weight is unknown at this tier.
fn resolve_exercise(groups: [&str; 3]) -> Option<Exercise> {
  let groups = groups.map(str::trim);

  let phrase = groups
    .iter()
    .find(|group| !group.is_empty() && !is_numeric(group))?;

  let words: Vec<&str> = phrase
    .split_whitespace()
    .skip_while(|word| FILLER_WORDS.contains(&word.to_lowercase().as_str()))
    .collect();

  let first_word = words.first()?.to_lowercase();
  if COUNT_WORDS.contains(&first_word.as_str()) {
    return None;
  }
  let name = words.join(" ");

  let mut counts = groups
    .iter()
    .filter(|group| is_numeric(group))
    .map(|group| group.parse::<u32>().ok().filter(|n| *n > 0));

  let sets = counts.next().flatten().unwrap_or(DEFAULT_SETS);
  let reps = counts.next().flatten().unwrap_or(DEFAULT_REPS);

  Some(Exercise::bodyweight(name, sets, reps))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
