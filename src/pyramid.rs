//! Pyramid workout arithmetic
//!
//! A pyramid climbs 1, 2, ..., N then steps back down to 1, performing every
//! exercise of the round at each step.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::Exercise;

/// Peak range offered to users
pub const MIN_PEAK: u32 = 6;
pub const MAX_PEAK: u32 = 15;

// Per-exercise work time and inter-round rest, in seconds
const EXERCISE_SECS_MIN: u32 = 30;
const EXERCISE_SECS_MAX: u32 = 45;
const REST_SECS_MIN: u32 = 60;
const REST_SECS_MAX: u32 = 90;

// ---------------------------------------------------------------------------
/// Sequence & Totals
// ---------------------------------------------------------------------------

/// `1..=peak` then back down to 1, the peak counted once. Empty for 0.
pub fn generate_pyramid_sequence(peak: u32) -> Vec<u32> {
    (1..=peak).chain((1..peak).rev()).collect()
}

pub fn total_rounds(peak: u32) -> u32 {
    if peak == 0 {
        0
    } else {
        peak.saturating_mul(2) - 1
    }
}

/// Reps across the whole session for `exercise_count` movements per round.
/// A pyramid to `peak` holds `peak²` reps per movement; saturates at `u32::MAX`.
pub fn calculate_total_reps(peak: u32, exercise_count: u32) -> u32 {
    peak.saturating_mul(peak).saturating_mul(exercise_count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

pub fn estimate_workout_duration(peak: u32) -> DurationRange {
    estimate_workout_duration_with_config(peak, &EngineConfig::default())
}

/// Whole-minute [min, max] estimate for a pyramid
pub fn estimate_workout_duration_with_config(peak: u32, config: &EngineConfig) -> DurationRange {
    let rounds = total_rounds(peak) as f64;
    let exercises = config.exercises_per_round;

    let min_secs_per_round = f64::from(exercises) * f64::from(EXERCISE_SECS_MIN) + f64::from(REST_SECS_MIN);
    let max_secs_per_round = f64::from(exercises) * f64::from(EXERCISE_SECS_MAX) + f64::from(REST_SECS_MAX);

    DurationRange {
        min: (rounds * min_secs_per_round / 60.0).round() as u32,
        max: (rounds * max_secs_per_round / 60.0).round() as u32,
    }
}

/// Rough duration of a logged session from what was actually done
pub fn estimate_session_minutes(total_reps: u32, set_count: u32) -> u32 {
    (total_reps as f64 * 0.8 + set_count as f64 * 2.0).round() as u32
}

// ---------------------------------------------------------------------------
/// Coaching Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartingWeight {
    pub kg: u32,
    pub notes: &'static str,
}

pub fn recommend_starting_weight(exercise: Exercise, level: ExperienceLevel) -> StartingWeight {
    use ExperienceLevel::*;

    let (kg, notes) = match (exercise, level) {
        (Exercise::Swing, Beginner) => (8, "Kettlebell or dumbbell, focus on technique"),
        (Exercise::Swing, Intermediate) => (12, "Explosive hip drive"),
        (Exercise::Swing, Advanced) => (16, "Maximum power, perfect control"),
        (Exercise::Squat, Beginner) => (0, "Bodyweight, controlled descent"),
        (Exercise::Squat, Intermediate) => (8, "Goblet dumbbell or kettlebell"),
        (Exercise::Squat, Advanced) => (16, "Progressive load, full range of motion"),
        (Exercise::Press, Beginner) => (4, "Light dumbbells, strict movement"),
        (Exercise::Press, Intermediate) => (6, "Military press, core engaged"),
        (Exercise::Press, Advanced) => (10, "Heavy load, perfect stability"),
        (Exercise::Pushup, Beginner) => (0, "On your knees if needed"),
        (Exercise::Pushup, Intermediate) => (0, "Classic push-ups, controlled tempo"),
        (Exercise::Pushup, Advanced) => (0, "Harder variations (decline, diamond)"),
    };

    StartingWeight { kg, notes }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseTips {
    pub setup: &'static str,
    pub execution: &'static str,
    pub breathing: &'static str,
    pub common_mistakes: [&'static str; 3],
}

pub fn exercise_tips(exercise: Exercise) -> ExerciseTips {
    match exercise {
        Exercise::Swing => ExerciseTips {
            setup: "Feet shoulder-width apart, weight in front of you",
            execution: "Explosive hip drive, arms straight",
            breathing: "Inhale on the way down, exhale hard on the way up",
            common_mistakes: [
                "Bending the knees instead of hinging the hips",
                "Lifting with the arms instead of the hips",
                "Not engaging the glutes",
            ],
        },
        Exercise::Squat => ExerciseTips {
            setup: "Feet shoulder-width apart, toes slightly turned out",
            execution: "Controlled descent, thighs parallel to the floor",
            breathing: "Inhale on the way down, exhale on the way up",
            common_mistakes: [
                "Knees caving inward",
                "Rounding the back",
                "Not going low enough",
            ],
        },
        Exercise::Press => ExerciseTips {
            setup: "Standing, feet planted, core engaged",
            execution: "Strict vertical press, no leg drive",
            breathing: "Inhale at the bottom, exhale as you press",
            common_mistakes: [
                "Arching the back excessively",
                "Using momentum from the legs",
                "Pressing off the vertical line",
            ],
        },
        Exercise::Pushup => ExerciseTips {
            setup: "Perfect plank, hands under the shoulders",
            execution: "Controlled descent, chest close to the floor",
            breathing: "Inhale on the way down, exhale as you push",
            common_mistakes: [
                "Hips rising or sagging",
                "Partial range of motion",
                "Hands too wide",
            ],
        },
    }
}

// ---------------------------------------------------------------------------
/// Progression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionAction {
    Increase,
    Maintain,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionSuggestion {
    pub next_peak: u32,
    pub action: ProgressionAction,
    pub reasoning: &'static str,
}

/// Next pyramid peak from recent sessions at the current level.
///
/// Rules are checked in order: easy sessions move up, very hard sessions move
/// down, a solid block at a working effort moves up, anything else holds.
pub fn suggest_progression(current_peak: u32, completed_sessions: u32, avg_effort: f64) -> ProgressionSuggestion {
    let up = current_peak.saturating_add(1).min(MAX_PEAK);
    let down = current_peak.saturating_sub(1).max(MIN_PEAK);

    if completed_sessions >= 3 && avg_effort <= 6.0 {
        ProgressionSuggestion {
            next_peak: up,
            action: ProgressionAction::Increase,
            reasoning: "Your average effort is low, you can move up",
        }
    } else if avg_effort >= 9.0 {
        ProgressionSuggestion {
            next_peak: down,
            action: ProgressionAction::Decrease,
            reasoning: "Your effort is very high, consolidate first",
        }
    } else if completed_sessions >= 6 && (7.0..=8.0).contains(&avg_effort) {
        ProgressionSuggestion {
            next_peak: up,
            action: ProgressionAction::Increase,
            reasoning: "Steady progress, you are ready for the next step",
        }
    } else {
        ProgressionSuggestion {
            next_peak: current_peak,
            action: ProgressionAction::Maintain,
            reasoning: "Stay at this level to consolidate your gains",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_small_peaks() {
        assert_eq!(generate_pyramid_sequence(1), vec![1]);
        assert_eq!(generate_pyramid_sequence(3), vec![1, 2, 3, 2, 1]);
        assert!(generate_pyramid_sequence(0).is_empty());
    }

    #[test]
    fn test_sequence_length_and_sum() {
        for peak in 1..=20 {
            let seq = generate_pyramid_sequence(peak);
            assert_eq!(seq.len() as u32, 2 * peak - 1);
            assert_eq!(seq.len() as u32, total_rounds(peak));
            assert_eq!(seq.iter().sum::<u32>(), peak * peak);
        }
    }

    #[test]
    fn test_total_reps() {
        // 10^2 reps per exercise, 4 exercises
        assert_eq!(calculate_total_reps(10, 4), 400);
        assert_eq!(calculate_total_reps(6, 1), 36);
        assert_eq!(calculate_total_reps(0, 4), 0);
    }

    #[test]
    fn test_totals_saturate_for_huge_peaks() {
        assert_eq!(total_rounds(u32::MAX), u32::MAX - 1);
        assert_eq!(calculate_total_reps(70_000, 4), u32::MAX);
        assert_eq!(calculate_total_reps(u32::MAX, 0), 0);
        assert_eq!(estimate_workout_duration(u32::MAX).max, u32::MAX);
    }

    #[test]
    fn test_duration_estimate() {
        // 19 rounds * 3 min = 57, 19 rounds * 4.5 min = 85.5 -> 86
        assert_eq!(estimate_workout_duration(10), DurationRange { min: 57, max: 86 });
        // 11 rounds -> 33 / 49.5 -> 50
        assert_eq!(estimate_workout_duration(6), DurationRange { min: 33, max: 50 });
    }

    #[test]
    fn test_duration_estimate_follows_exercise_count() {
        let config = EngineConfig {
            exercises_per_round: 2,
            ..EngineConfig::default()
        };
        // 2*30+60 = 120 s, 2*45+90 = 180 s per round, 5 rounds
        assert_eq!(
            estimate_workout_duration_with_config(3, &config),
            DurationRange { min: 10, max: 15 }
        );
    }

    #[test]
    fn test_session_minutes() {
        assert_eq!(estimate_session_minutes(100, 4), 88);
        assert_eq!(estimate_session_minutes(0, 0), 0);
        assert_eq!(estimate_session_minutes(3, 1), 4); // 4.4
    }

    #[test]
    fn test_starting_weights() {
        let w = recommend_starting_weight(Exercise::Swing, ExperienceLevel::Beginner);
        assert_eq!(w.kg, 8);
        let w = recommend_starting_weight(Exercise::Squat, ExperienceLevel::Advanced);
        assert_eq!(w.kg, 16);
        for level in [ExperienceLevel::Beginner, ExperienceLevel::Intermediate, ExperienceLevel::Advanced] {
            assert_eq!(recommend_starting_weight(Exercise::Pushup, level).kg, 0);
        }
    }

    #[test]
    fn test_every_exercise_has_tips() {
        for exercise in Exercise::all() {
            let tips = exercise_tips(exercise);
            assert!(!tips.setup.is_empty());
            assert!(tips.common_mistakes.iter().all(|m| !m.is_empty()));
        }
    }

    #[test]
    fn test_progression_easy_sessions_move_up() {
        let s = suggest_progression(8, 3, 5.5);
        assert_eq!(s.action, ProgressionAction::Increase);
        assert_eq!(s.next_peak, 9);
    }

    #[test]
    fn test_progression_capped_at_max() {
        let s = suggest_progression(15, 10, 5.0);
        assert_eq!(s.action, ProgressionAction::Increase);
        assert_eq!(s.next_peak, 15);
    }

    #[test]
    fn test_progression_hard_sessions_move_down() {
        let s = suggest_progression(10, 1, 9.5);
        assert_eq!(s.action, ProgressionAction::Decrease);
        assert_eq!(s.next_peak, 9);

        let s = suggest_progression(6, 4, 9.0);
        assert_eq!(s.next_peak, 6);
    }

    #[test]
    fn test_progression_solid_block_moves_up() {
        let s = suggest_progression(10, 6, 7.5);
        assert_eq!(s.action, ProgressionAction::Increase);
        assert_eq!(s.next_peak, 11);
    }

    #[test]
    fn test_progression_holds_otherwise() {
        let s = suggest_progression(10, 5, 7.5);
        assert_eq!(s.action, ProgressionAction::Maintain);
        assert_eq!(s.next_peak, 10);

        // Too few sessions to judge an easy effort
        let s = suggest_progression(10, 2, 4.0);
        assert_eq!(s.action, ProgressionAction::Maintain);
    }

    #[test]
    fn test_progression_never_overflows_peak() {
        let s = suggest_progression(u32::MAX, 3, 5.0);
        assert_eq!(s.action, ProgressionAction::Increase);
        assert_eq!(s.next_peak, MAX_PEAK);

        let s = suggest_progression(u32::MAX, 1, 9.5);
        assert_eq!(s.next_peak, u32::MAX - 1);
    }
}
