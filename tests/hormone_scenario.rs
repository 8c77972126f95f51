use alphavital_lib::hormone::{score_delta, HormoneCategory};
use alphavital_lib::{score_hormone_test, AnswerSet, HormoneScores};

/// First `n` questions of a category answered "yes", the rest "no"
fn answer_category(answers: &mut AnswerSet, category: HormoneCategory, yes: usize) {
    for (i, id) in category.question_ids().iter().enumerate() {
        answers.insert(id.to_string(), i < yes);
    }
}

#[test]
fn stress_dominant_questionnaire() {
    // Arrange
    let mut answers = AnswerSet::new();
    answer_category(&mut answers, HormoneCategory::CortisolMelatonin, 4);
    answer_category(&mut answers, HormoneCategory::InsulinGlucagon, 1);
    answer_category(&mut answers, HormoneCategory::TestoEstrogen, 1);
    answer_category(&mut answers, HormoneCategory::GhrelinLeptin, 1);

    // Act
    let result = score_hormone_test(&answers);

    // Assert
    assert_eq!(
        result.scores,
        HormoneScores {
            cortisol_melatonin: 4,
            insulin_glucagon: 1,
            testo_estrogen: 1,
            ghrelin_leptin: 1,
        }
    );
    assert_eq!(result.priority_order[0], HormoneCategory::CortisolMelatonin);

    let topics: Vec<_> = result.recommendations.topics().collect();
    assert_eq!(topics, vec!["Stress & Sleep"]);

    assert!(result.summary.contains("Cortisol/Melatonin"));
    assert!(result.summary.contains("4/5"));
    assert!(!result.summary.contains("In addition"));
}

#[test]
fn result_serializes_for_the_client() {
    let mut answers = AnswerSet::new();
    answer_category(&mut answers, HormoneCategory::TestoEstrogen, 5);
    answer_category(&mut answers, HormoneCategory::GhrelinLeptin, 3);

    let json = serde_json::to_value(score_hormone_test(&answers)).unwrap();

    assert_eq!(json["scores"]["testoEstrogen"], 5);
    assert_eq!(json["priorityOrder"][0], "testoEstrogen");
    assert_eq!(json["priorityOrder"][1], "ghrelinLeptin");
    assert_eq!(json["recommendations"].as_object().map(|m| m.len()), Some(2));
    assert!(json["recommendations"]["Satiety & Appetite"].is_array());
    assert!(json["summary"].as_str().unwrap().contains("Ghrelin/Leptin"));
}

#[test]
fn balanced_questionnaire_and_follow_up() {
    let before = score_hormone_test(&AnswerSet::new());
    assert!(before.recommendations.is_empty());
    assert!(before.summary.contains("balanced"));

    let mut answers = AnswerSet::new();
    answer_category(&mut answers, HormoneCategory::InsulinGlucagon, 3);
    let after = score_hormone_test(&answers);

    let delta = score_delta(&before.scores, &after.scores);
    assert_eq!(delta[1], (HormoneCategory::InsulinGlucagon, 3));
    assert!(delta.iter().filter(|(c, _)| *c != HormoneCategory::InsulinGlucagon).all(|(_, d)| *d == 0));
}
