pub mod profile;
pub mod workout;

pub use profile::{GenerateRequest, NumberOrText, TextOrList, UserFitnessProfile};
pub use workout::{DaySession, Exercise, RawFallbackRecord, WorkoutPlan};
