use alphavital_lib::afterburn::estimate_afterburn_hours_with;
use alphavital_lib::hormone::{
    calculate_scores, generate_recommendations, priority_order, AnswerSet, HormoneCategory,
};
use alphavital_lib::pyramid::{calculate_total_reps, generate_pyramid_sequence, total_rounds};
use alphavital_lib::sleep::sleep_consistency;
use alphavital_lib::{EngineConfig, SleepRecord};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn all_question_ids() -> Vec<&'static str> {
    HormoneCategory::all()
        .into_iter()
        .flat_map(|c| c.question_ids().iter().copied())
        .collect()
}

fn arb_answers() -> impl Strategy<Value = AnswerSet> {
    let ids = all_question_ids();
    let known = prop::collection::vec(any::<Option<bool>>(), ids.len()).prop_map(move |picks| {
        ids.iter()
            .zip(picks)
            .filter_map(|(id, pick)| pick.map(|yes| (id.to_string(), yes)))
            .collect::<AnswerSet>()
    });
    let noise = prop::collection::hash_map("[a-z_]{1,12}[0-9]{0,2}", any::<bool>(), 0..6);
    (known, noise).prop_map(|(mut known, noise)| {
        for (key, value) in noise {
            known.entry(key).or_insert(value);
        }
        known
    })
}

// ── Hormone scoring ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn scores_count_yes_answers_within_bounds(answers in arb_answers()) {
        let scores = calculate_scores(&answers);

        for (category, score) in scores.iter() {
            prop_assert!(score <= 5);
            let expected = category
                .question_ids()
                .iter()
                .filter(|id| answers.get(**id) == Some(&true))
                .count() as u32;
            prop_assert_eq!(score, expected);
        }
    }

    #[test]
    fn priority_order_is_a_permutation_with_flagged_first(answers in arb_answers()) {
        let scores = calculate_scores(&answers);
        let order = priority_order(&scores);

        let unique: HashSet<_> = order.iter().collect();
        prop_assert_eq!(order.len(), 4);
        prop_assert_eq!(unique.len(), 4);

        let flagged: Vec<HormoneCategory> = order.iter().copied().take_while(|c| scores.get(*c) >= 3).collect();
        let expected: Vec<HormoneCategory> = HormoneCategory::all()
            .into_iter()
            .filter(|c| scores.get(*c) >= 3)
            .collect();
        prop_assert_eq!(flagged, expected);

        // Remaining categories never increase in score
        let rest: Vec<u32> = order.iter().skip_while(|c| scores.get(**c) >= 3).map(|c| scores.get(*c)).collect();
        prop_assert!(rest.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(rest.iter().all(|s| *s < 3));
    }

    #[test]
    fn recommendations_cover_exactly_flagged_categories(answers in arb_answers()) {
        let scores = calculate_scores(&answers);
        let order = priority_order(&scores);
        let bundle = generate_recommendations(&scores, &order);

        let in_bundle: HashSet<_> = bundle.categories().collect();
        let flagged: HashSet<_> = HormoneCategory::all()
            .into_iter()
            .filter(|c| scores.get(*c) >= 3)
            .collect();
        prop_assert_eq!(in_bundle, flagged);
        for (_, advice) in bundle.iter() {
            prop_assert!((3..=5).contains(&advice.len()));
        }
    }
}

// ── Pyramid ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pyramid_shape(peak in 1u32..100) {
        let sequence = generate_pyramid_sequence(peak);

        prop_assert_eq!(sequence.len() as u32, 2 * peak - 1);
        prop_assert_eq!(total_rounds(peak), 2 * peak - 1);
        prop_assert_eq!(sequence.iter().sum::<u32>(), peak * peak);
        prop_assert_eq!(sequence.iter().max().copied(), Some(peak));

        let reversed: Vec<u32> = sequence.iter().rev().copied().collect();
        prop_assert_eq!(&reversed, &sequence);
        prop_assert_eq!(calculate_total_reps(peak, 4), 4 * peak * peak);
    }
}

// ── Afterburn ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn afterburn_draw_stays_in_band(
        seed in any::<u64>(),
        peak in 6u32..=15,
        duration in 10u32..60,
        effort in prop::option::of(1u8..=10),
    ) {
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let hours = estimate_afterburn_hours_with(&mut rng, peak, duration, effort, &config);

        let high = peak >= 10 && duration <= 30 && effort.unwrap_or(0) >= 7;
        if high {
            prop_assert!((36..=48).contains(&hours));
        } else {
            prop_assert!((24..=36).contains(&hours));
        }
    }
}

// ── Sleep ──────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn consistency_is_a_percentage(bedtimes in prop::collection::vec((0u32..24, 0u32..60), 0..20)) {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let records: Vec<SleepRecord> = bedtimes
            .iter()
            .enumerate()
            .map(|(i, (h, m))| {
                let mut record = SleepRecord::new(start + Duration::days(i as i64));
                record.bedtime = record.date.and_hms_opt(*h, *m, 0);
                record
            })
            .collect();

        let consistency = sleep_consistency(&records);
        prop_assert!((0.0..=100.0).contains(&consistency));
    }
}
