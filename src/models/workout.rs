use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Day key reserved for the unstructured fallback record
pub const RAW_FALLBACK_KEY: &str = "raw_response";

/// Display name of the unstructured fallback record
pub const RAW_FALLBACK_NAME: &str = "Model response (unstructured)";

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REPS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub name: String,
  pub sets: u32,
  pub reps: u32,
  /// Load in kg; 0 means bodyweight or unknown
  pub weight: f64,
}

impl Exercise {
  /// Bodyweight exercise with the given set and rep counts
  pub fn bodyweight(name: impl Into<String>, sets: u32, reps: u32) -> Self {
    Self {
      name: name.into(),
      sets,
      reps,
      weight: 0.0,
    }
  }
}

/// One training day: a display name and its exercises in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySession {
  pub name: String,
  pub exercises: Vec<Exercise>,
  /// Only set on the unstructured fallback record
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub raw_text: Option<String>,
}

impl DaySession {
  pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
    Self {
      name: name.into(),
      exercises,
      raw_text: None,
    }
  }
}

/// Terminal degraded result: the model's text with no recovered exercises
#[derive(Debug, Clone, PartialEq)]
pub struct RawFallbackRecord {
  pub text: String,
}

impl RawFallbackRecord {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into() }
  }
}

impl From<RawFallbackRecord> for WorkoutPlan {
  fn from(record: RawFallbackRecord) -> Self {
    let session = DaySession {
      name: RAW_FALLBACK_NAME.to_string(),
      exercises: Vec::new(),
      raw_text: Some(record.text),
    };
    WorkoutPlan::Sessions(vec![(RAW_FALLBACK_KEY.to_string(), session)])
  }
}

/// ---------------------------------------------------------------------------
/// Workout Plan
/// ---------------------------------------------------------------------------

/// Ordered mapping from day key to session
///
/// A plan decoded from the model's own JSON is kept verbatim so nothing the
/// model emitted is lost; plans assembled by the recovery engine are typed.
/// Both serialize to the same shape: a JSON object keyed by day.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutPlan {
  Structured(Map<String, Value>),
  Sessions(Vec<(String, DaySession)>),
}

impl WorkoutPlan {
  pub fn len(&self) -> usize {
    match self {
      WorkoutPlan::Structured(map) => map.len(),
      WorkoutPlan::Sessions(days) => days.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Day keys in insertion order
  pub fn day_keys(&self) -> Vec<&str> {
    match self {
      WorkoutPlan::Structured(map) => map.keys().map(String::as_str).collect(),
      WorkoutPlan::Sessions(days) => days.iter().map(|(key, _)| key.as_str()).collect(),
    }
  }

  /// Typed session for a day key. Verbatim plans are not reinterpreted.
  pub fn session(&self, key: &str) -> Option<&DaySession> {
    match self {
      WorkoutPlan::Structured(_) => None,
      WorkoutPlan::Sessions(days) => days
        .iter()
        .find(|(day, _)| day == key)
        .map(|(_, session)| session),
    }
  }

  /// The unparsed model text, when this plan is the fallback record
  pub fn raw_text(&self) -> Option<&str> {
    self
      .session(RAW_FALLBACK_KEY)
      .and_then(|session| session.raw_text.as_deref())
  }

  pub fn to_value(&self) -> Value {
    match self {
      WorkoutPlan::Structured(map) => Value::Object(map.clone()),
      WorkoutPlan::Sessions(days) => Value::Object(
        days
          .iter()
          .map(|(key, session)| {
            let value = serde_json::to_value(session).unwrap_or(Value::Null);
            (key.clone(), value)
          })
          .collect(),
      ),
    }
  }
}

impl Serialize for WorkoutPlan {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self {
      WorkoutPlan::Structured(map) => map.serialize(serializer),
      WorkoutPlan::Sessions(days) => {
        let mut out = serializer.serialize_map(Some(days.len()))?;
        for (key, session) in days {
          out.serialize_entry(key, session)?;
        }
        out.end()
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
