pub mod badge;
pub mod hormone;
pub mod sleep;
pub mod workout;

pub use badge::AwardedBadge;
pub use hormone::HormoneTestRecord;
pub use sleep::SleepRecord;
pub use workout::{Exercise, WorkoutSession, WorkoutSet};
