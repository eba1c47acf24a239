//! Rule-based workout recommendations
//!
//! Maps the form inputs (goal, activity level, days per week, injuries,
//! preferences) onto a fixed table of Italian recommendation lines. No model
//! is involved; the same request always yields the same lines.

use crate::models::GenerateRequest;

const GOAL_LOSE_WEIGHT: &str = "perdere peso";
const GOAL_GAIN_MASS: &str = "aumentare massa";

fn goal_lines(goal: &str) -> &'static [&'static str] {
  match goal {
    GOAL_LOSE_WEIGHT => &[
      "Cardio: 30 minuti a intensità moderata",
      "Esercizi di forza: 3 set di squat, affondi, push-up",
    ],
    GOAL_GAIN_MASS => &[
      "Esercizi di forza: 4 set di squat, panca, deadlift",
      "Cardio: 20 minuti a bassa intensità",
    ],
    _ => &[],
  }
}

fn level_line(level: &str) -> Option<&'static str> {
  match level {
    "principiante" => Some("Esercizi a corpo libero: squat, push-up, plank"),
    "intermedio" => Some("Esercizi con pesi leggeri: deadlift, panca, squat"),
    "avanzato" => Some("Esercizi con pesi pesanti: squat, panca, stacco da terra"),
    _ => None,
  }
}

fn schedule_line(days: &str) -> Option<&'static str> {
  match days {
    "3" => Some(
      "Allenamento 3 giorni a settimana: giorno 1 - forza, giorno 2 - cardio, giorno 3 - corpo libero",
    ),
    "5" => Some("Allenamento 5 giorni a settimana: giorni alternati di forza e cardio"),
    _ => None,
  }
}

fn normalized(value: Option<&str>) -> String {
  value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// Build the recommendation list for a request
///
/// Lines are emitted in a fixed order: goal, level, schedule, injuries,
/// preferences. Unknown values contribute nothing, so the list may be empty.
pub fn generate_rule_based_plan(request: &GenerateRequest) -> Vec<String> {
  let mut plan: Vec<String> = Vec::new();

  let goal = normalized(request.goal.as_deref());
  plan.extend(goal_lines(&goal).iter().map(|line| line.to_string()));

  let level = normalized(request.activity_level.as_deref());
  if let Some(line) = level_line(&level) {
    plan.push(line.to_string());
  }

  let days = request
    .days_per_week
    .as_ref()
    .map(|d| d.as_text())
    .unwrap_or_default();
  if let Some(line) = schedule_line(&days) {
    plan.push(line.to_string());
  }

  let injuries = request
    .injuries
    .as_ref()
    .map(|i| i.joined())
    .unwrap_or_default();
  if !injuries.is_empty() {
    plan.push(format!("Aggiustamenti: Evitare esercizi che causano {}", injuries));
  }

  let preferences = request
    .preferences
    .as_ref()
    .map(|p| p.joined())
    .unwrap_or_default();
  if !preferences.is_empty() {
    plan.push(format!("Preferenze: Include esercizi come {}", preferences));
  }

  plan
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
