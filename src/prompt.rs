//! Prompt construction for AI-generated workout plans
//!
//! Renders a [`UserFitnessProfile`] into a single instruction for a
//! text-generation model. The prompt shows the exact JSON shape expected back
//! and ends on an opening brace so the model continues straight into JSON.

use crate::models::UserFitnessProfile;

/// Schema examples are capped to keep the prompt short
const MAX_SCHEMA_DAYS: u32 = 7;

const SESSION_EXAMPLES: [(&str, &str); 7] = [
  ("Upper body", "Bench press"),
  ("Lower body", "Back squat"),
  ("Full body", "Deadlift"),
  ("Push", "Overhead press"),
  ("Pull", "Barbell row"),
  ("Legs", "Leg press"),
  ("Conditioning", "Kettlebell swing"),
];

/// ---------------------------------------------------------------------------
/// Goal and Level Mapping
/// ---------------------------------------------------------------------------

/// Reps-per-set range for a training goal
pub fn reps_range(goal: &str) -> &'static str {
  match goal.trim().to_lowercase().as_str() {
    "strength" | "forza" => "6-8",
    "endurance" | "resistenza" => "10-15",
    _ => "8-12",
  }
}

fn load_guidance(level: &str) -> &'static str {
  match level.trim().to_lowercase().as_str() {
    "advanced" | "avanzato" => "challenging loads close to the user's working maximum",
    "intermediate" | "intermedio" => "moderate loads that leave one or two reps in reserve",
    _ => "light loads that allow clean technique on every rep",
  }
}

fn or_none(value: &str) -> &str {
  if value.trim().is_empty() {
    "none"
  } else {
    value
  }
}

/// ---------------------------------------------------------------------------
/// Prompt Builder
/// ---------------------------------------------------------------------------

/// Build the workout-generation prompt for a profile
pub fn build_workout_prompt(profile: &UserFitnessProfile) -> String {
  let days = profile.days_per_week.max(1);
  let reps = reps_range(&profile.goal);

  let mut prompt = String::with_capacity(2048);

  prompt.push_str(
    "You are an expert personal trainer. Create a personalized weekly gym workout plan \
     for the user described below.\n\n",
  );

  prompt.push_str("USER PROFILE:\n");
  prompt.push_str(&format!("- Age: {} years\n", profile.age));
  prompt.push_str(&format!("- Body weight: {} kg\n", profile.weight_kg));
  prompt.push_str(&format!("- Goal: {}\n", profile.goal));
  prompt.push_str(&format!("- Experience level: {}\n", profile.level));
  prompt.push_str(&format!("- Training days per week: {}\n", profile.days_per_week));
  prompt.push_str(&format!("- Preferences: {}\n", or_none(&profile.preferences)));
  prompt.push_str(&format!(
    "- Injuries or limitations: {}\n\n",
    or_none(&profile.injuries)
  ));

  prompt.push_str("OUTPUT FORMAT (follow this structure exactly):\n");
  prompt.push_str(&schema_example(days));
  prompt.push_str("\n\n");

  prompt.push_str("RULES:\n");
  prompt.push_str(&format!(
    "- Plan exactly {} training days, keyed day_1 to day_{}.\n",
    days, days
  ));
  prompt.push_str("- Include 6-7 exercises per day.\n");
  prompt.push_str("- Use 3-4 sets per exercise.\n");
  prompt.push_str(&format!("- Use {} reps per set.\n", reps));
  prompt.push_str(&format!(
    "- Give weight in kg, scaled to a body weight of {} kg and a {} level: {}. Use 0 for bodyweight exercises.\n",
    profile.weight_kg,
    profile.level,
    load_guidance(&profile.level)
  ));
  prompt.push_str("- Write exercise names in the same language as the user profile.\n");

  if !profile.injuries.trim().is_empty() {
    prompt.push_str(&format!(
      "- Avoid any exercise that loads or aggravates: {}.\n",
      profile.injuries
    ));
  }

  if !profile.preferences.trim().is_empty() {
    prompt.push_str(&format!(
      "- Prioritize these exercises or training styles: {}.\n",
      profile.preferences
    ));
  }

  prompt.push_str("\nAnswer with the JSON object only, without explanations or markdown.\n");
  prompt.push('{');

  prompt
}

/// Example plan in the exact nesting the recovery engine understands best
fn schema_example(days: u32) -> String {
  let entries: Vec<String> = (1..=days.min(MAX_SCHEMA_DAYS))
    .map(|day| {
      let (session, exercise) = SESSION_EXAMPLES[(day as usize - 1) % SESSION_EXAMPLES.len()];
      format!(
        "  \"day_{day}\": {{\n    \"name\": \"Day {day} - {session}\",\n    \"exercises\": [\n      {{\"name\": \"{exercise}\", \"sets\": 4, \"reps\": 10, \"weight\": 40}}\n    ]\n  }}"
      )
    })
    .collect();

  format!("{{\n{}\n}}", entries.join(",\n"))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
