use serde::Deserialize;

/// ---------------------------------------------------------------------------
/// Profile Defaults
/// ---------------------------------------------------------------------------

pub const DEFAULT_AGE: u32 = 25;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_GOAL: &str = "hypertrophy";
pub const DEFAULT_LEVEL: &str = "beginner";
pub const DEFAULT_DAYS_PER_WEEK: u32 = 3;

/// ---------------------------------------------------------------------------
/// Request Body
/// ---------------------------------------------------------------------------

/// A scalar that HTML forms send as a string and API clients send as a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
  Number(f64),
  Text(String),
}

impl NumberOrText {
  /// Numeric value, if the field holds a finite number or a numeric string
  pub fn as_f64(&self) -> Option<f64> {
    let value = match self {
      NumberOrText::Number(n) => *n,
      NumberOrText::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
  }

  /// Non-negative whole number (fractions are truncated)
  pub fn as_u32(&self) -> Option<u32> {
    self
      .as_f64()
      .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
      .map(|n| n as u32)
  }

  /// Textual form, with whole numbers rendered without a fractional part
  pub fn as_text(&self) -> String {
    match self {
      NumberOrText::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
      NumberOrText::Number(n) => n.to_string(),
      NumberOrText::Text(s) => s.trim().to_string(),
    }
  }
}

/// Free-text keywords, sent either as one comma-separated string or as a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
  List(Vec<String>),
  Text(String),
}

impl TextOrList {
  /// Trimmed, non-empty entries in their original order
  pub fn items(&self) -> Vec<String> {
    let raw: Vec<&str> = match self {
      TextOrList::List(items) => items.iter().map(String::as_str).collect(),
      TextOrList::Text(text) => text.split(',').collect(),
    };

    raw
      .into_iter()
      .map(str::trim)
      .filter(|item| !item.is_empty())
      .map(str::to_string)
      .collect()
  }

  pub fn joined(&self) -> String {
    self.items().join(", ")
  }
}

/// Body of `POST /generate` and `POST /generate/rules`
///
/// Both naming schemes of the web form are accepted (`activity_level` or
/// `livello`, `days_per_week` or `giorni`). Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateRequest {
  #[serde(default)]
  pub age: Option<NumberOrText>,

  #[serde(default)]
  pub weight: Option<NumberOrText>,

  #[serde(default)]
  pub goal: Option<String>,

  #[serde(default, alias = "livello")]
  pub activity_level: Option<String>,

  #[serde(default, alias = "giorni")]
  pub days_per_week: Option<NumberOrText>,

  #[serde(default)]
  pub preferences: Option<TextOrList>,

  #[serde(default)]
  pub injuries: Option<TextOrList>,
}

/// ---------------------------------------------------------------------------
/// User Fitness Profile
/// ---------------------------------------------------------------------------

/// Normalized user parameters, built once per request with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct UserFitnessProfile {
  pub age: u32,
  pub weight_kg: f64,
  pub goal: String,
  pub level: String,
  pub days_per_week: u32,
  pub preferences: String,
  pub injuries: String,
}

impl Default for UserFitnessProfile {
  fn default() -> Self {
    Self {
      age: DEFAULT_AGE,
      weight_kg: DEFAULT_WEIGHT_KG,
      goal: DEFAULT_GOAL.to_string(),
      level: DEFAULT_LEVEL.to_string(),
      days_per_week: DEFAULT_DAYS_PER_WEEK,
      preferences: String::new(),
      injuries: String::new(),
    }
  }
}

impl From<&GenerateRequest> for UserFitnessProfile {
  fn from(request: &GenerateRequest) -> Self {
    let defaults = Self::default();

    Self {
      age: request
        .age
        .as_ref()
        .and_then(NumberOrText::as_u32)
        .unwrap_or(defaults.age),
      weight_kg: request
        .weight
        .as_ref()
        .and_then(NumberOrText::as_f64)
        .filter(|w| *w >= 0.0)
        .unwrap_or(defaults.weight_kg),
      goal: non_blank(request.goal.as_deref()).unwrap_or(defaults.goal),
      level: non_blank(request.activity_level.as_deref()).unwrap_or(defaults.level),
      days_per_week: request
        .days_per_week
        .as_ref()
        .and_then(NumberOrText::as_u32)
        .unwrap_or(defaults.days_per_week),
      preferences: request
        .preferences
        .as_ref()
        .map(TextOrList::joined)
        .unwrap_or_default(),
      injuries: request
        .injuries
        .as_ref()
        .map(TextOrList::joined)
        .unwrap_or_default(),
    }
  }
}

fn non_blank(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
