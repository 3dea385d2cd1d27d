//! Energy and macro targets derived from a user profile.

mod evaluator;
mod profile;

pub use evaluator::{evaluate, NutritionTarget, RoundedTarget};
pub use profile::{ActivityLevel, Gender, Goal, Profile};
