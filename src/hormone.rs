//! Hormonal-balance questionnaire scoring
//!
//! A flat set of yes/no answers flows one way through four stages:
//! answers -> per-category scores -> priority order -> advice bundle and
//! narrative summary. Nothing here holds state between calls.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use crate::config::EngineConfig;

/// Question id -> "yes" answer
pub type AnswerSet = HashMap<String, bool>;

pub const QUESTIONS_PER_CATEGORY: usize = 5;
pub const MAX_CATEGORY_SCORE: u32 = QUESTIONS_PER_CATEGORY as u32;

const BALANCED_SUMMARY: &str = "Your hormonal profile looks balanced! Keep up your good habits and keep an eye on how your scores evolve.";

/// ---------------------------------------------------------------------------
/// Hormone Categories (reference data)
/// ---------------------------------------------------------------------------

/// The four hormonal duos, declared in base precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HormoneCategory {
  /// Stress and sleep regulation
  #[serde(alias = "cortisolMelatonine")]
  CortisolMelatonin,
  /// Blood sugar and energy regulation
  #[serde(alias = "insulineGlucagon")]
  InsulinGlucagon,
  /// Strength and motivation
  #[serde(alias = "testoOestro")]
  TestoEstrogen,
  /// Appetite and satiety
  #[serde(alias = "ghrelineLeptine")]
  GhrelinLeptin,
}

impl HormoneCategory {
  pub fn all() -> [HormoneCategory; 4] {
    [
      HormoneCategory::CortisolMelatonin,
      HormoneCategory::InsulinGlucagon,
      HormoneCategory::TestoEstrogen,
      HormoneCategory::GhrelinLeptin,
    ]
  }

  /// Fixed urgency rank, 1 = address first
  pub fn base_precedence(&self) -> u8 {
    match self {
      HormoneCategory::CortisolMelatonin => 1,
      HormoneCategory::InsulinGlucagon => 2,
      HormoneCategory::TestoEstrogen => 3,
      HormoneCategory::GhrelinLeptin => 4,
    }
  }

  pub fn key(&self) -> &'static str {
    match self {
      HormoneCategory::CortisolMelatonin => "cortisolMelatonin",
      HormoneCategory::InsulinGlucagon => "insulinGlucagon",
      HormoneCategory::TestoEstrogen => "testoEstrogen",
      HormoneCategory::GhrelinLeptin => "ghrelinLeptin",
    }
  }

  /// Hormone pair name used in the narrative summary
  pub fn label(&self) -> &'static str {
    match self {
      HormoneCategory::CortisolMelatonin => "Cortisol/Melatonin",
      HormoneCategory::InsulinGlucagon => "Insulin/Glucagon",
      HormoneCategory::TestoEstrogen => "Testosterone/Estrogen",
      HormoneCategory::GhrelinLeptin => "Ghrelin/Leptin",
    }
  }

  /// Heading of the category in the recommendation bundle
  pub fn topic(&self) -> &'static str {
    match self {
      HormoneCategory::CortisolMelatonin => "Stress & Sleep",
      HormoneCategory::InsulinGlucagon => "Blood Sugar & Energy",
      HormoneCategory::TestoEstrogen => "Strength & Motivation",
      HormoneCategory::GhrelinLeptin => "Satiety & Appetite",
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      HormoneCategory::CortisolMelatonin => {
        "Cortisol and melatonin drive your stress response and your sleep-wake cycle. An imbalance shows up as poor sleep and constant tension."
      }
      HormoneCategory::InsulinGlucagon => {
        "Insulin and glucagon control your blood sugar and energy storage. An imbalance can cause fatigue and weight gain."
      }
      HormoneCategory::TestoEstrogen => {
        "Testosterone and estrogen influence your strength, motivation, libido and body composition."
      }
      HormoneCategory::GhrelinLeptin => {
        "Ghrelin and leptin signal hunger and fullness. An imbalance leads to cravings and constant snacking."
      }
    }
  }

  /// Identifiers the questionnaire form submits for this category
  pub fn question_ids(&self) -> &'static [&'static str; QUESTIONS_PER_CATEGORY] {
    match self {
      HormoneCategory::CortisolMelatonin => &[
        "cortisol_melatonine_0",
        "cortisol_melatonine_1",
        "cortisol_melatonine_2",
        "cortisol_melatonine_3",
        "cortisol_melatonine_4",
      ],
      HormoneCategory::InsulinGlucagon => &[
        "insuline_glucagon_0",
        "insuline_glucagon_1",
        "insuline_glucagon_2",
        "insuline_glucagon_3",
        "insuline_glucagon_4",
      ],
      HormoneCategory::TestoEstrogen => &[
        "testo_oestro_0",
        "testo_oestro_1",
        "testo_oestro_2",
        "testo_oestro_3",
        "testo_oestro_4",
      ],
      HormoneCategory::GhrelinLeptin => &[
        "ghreline_leptine_0",
        "ghreline_leptine_1",
        "ghreline_leptine_2",
        "ghreline_leptine_3",
        "ghreline_leptine_4",
      ],
    }
  }

  pub fn questions(&self) -> &'static [&'static str; QUESTIONS_PER_CATEGORY] {
    match self {
      HormoneCategory::CortisolMelatonin => &[
        "I have trouble falling asleep at night",
        "I often wake up during the night",
        "I feel stressed even without an obvious reason",
        "I often have muscle tension",
        "My sleep does not feel restorative",
      ],
      HormoneCategory::InsulinGlucagon => &[
        "I feel drained after meals",
        "I crave sweets in the late afternoon",
        "My energy swings a lot during the day",
        "I tend to store fat easily",
        "I get hypoglycemic episodes (shaking, sweating)",
      ],
      HormoneCategory::TestoEstrogen => &[
        "I lack motivation for my personal projects",
        "I struggle to build muscle despite training",
        "My libido has dropped in recent months",
        "I feel less confident than before",
        "I tend to accumulate fat around the belly",
      ],
      HormoneCategory::GhrelinLeptin => &[
        "I am often hungry even after eating",
        "I snack frequently between meals",
        "I have sugar cravings that are hard to control",
        "I do not feel full quickly",
        "My appetite varies a lot from day to day",
      ],
    }
  }

  /// Short imperative advice shown when the category needs attention
  pub fn advice(&self) -> &'static [&'static str] {
    match self {
      HormoneCategory::CortisolMelatonin => &[
        "Set a fixed bedtime routine (same time every evening)",
        "Practice 10 minutes of meditation or deep breathing",
        "Avoid screens 90 minutes before bed",
        "Keep your bedroom at 19°C maximum",
        "Use stress management techniques (journaling, walking)",
      ],
      HormoneCategory::InsulinGlucagon => &[
        "Start every meal with protein and fiber",
        "Limit fast sugars and processed foods",
        "Eat at regular times (3 meals plus 1-2 snacks if needed)",
        "Avoid caffeine after 2pm",
        "Take a 10-15 minute walk after main meals",
      ],
      HormoneCategory::TestoEstrogen => &[
        "Prioritize resistance training (HIRT 3x per week)",
        "Sleep 7-9 hours every night on a regular schedule",
        "Eat healthy fats (avocado, nuts, olive oil)",
        "Limit alcohol and endocrine disruptors",
        "Get natural light exposure in the morning",
      ],
      HormoneCategory::GhrelinLeptin => &[
        "Eat slowly and chew well (at least 20 minutes per meal)",
        "Stay hydrated (2-3L of water per day)",
        "Avoid extreme restrictive diets",
        "Favor foods rich in fiber and protein",
        "Get enough sleep (fatigue increases hunger)",
      ],
    }
  }

  /// Long-form advice used in the narrative summary
  pub fn advice_paragraph(&self) -> &'static str {
    match self {
      HormoneCategory::CortisolMelatonin => {
        "Improve how you manage stress and sleep. Practice meditation, keep a regular bedtime routine, and create an environment that supports rest."
      }
      HormoneCategory::InsulinGlucagon => {
        "Stabilize your blood sugar by favoring protein and fiber at every meal, limiting fast sugars, and keeping regular meal times."
      }
      HormoneCategory::TestoEstrogen => {
        "Build strength and motivation with regular resistance training, quality sleep, and a diet rich in healthy fats."
      }
      HormoneCategory::GhrelinLeptin => {
        "Regulate your hunger signals by keeping consistent meal times, getting enough sleep, and avoiding extreme calorie restriction."
      }
    }
  }

  /// Reverse lookup from a submitted question id
  pub fn from_question_id(id: &str) -> Option<HormoneCategory> {
    HormoneCategory::all()
      .into_iter()
      .find(|c| c.question_ids().contains(&id))
  }
}

impl std::fmt::Display for HormoneCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.key())
  }
}

impl std::str::FromStr for HormoneCategory {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    HormoneCategory::all()
      .into_iter()
      .find(|c| c.key() == s)
      .ok_or_else(|| format!("Unknown hormone category: {}", s))
  }
}

/// ---------------------------------------------------------------------------
/// Scores
/// ---------------------------------------------------------------------------

/// Count of "yes" answers per category.
///
/// Also reads the keys stored by earlier app versions (`cortisolMelatonine`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HormoneScores {
  #[serde(alias = "cortisolMelatonine")]
  pub cortisol_melatonin: u32,
  #[serde(alias = "insulineGlucagon")]
  pub insulin_glucagon: u32,
  #[serde(alias = "testoOestro")]
  pub testo_estrogen: u32,
  #[serde(alias = "ghrelineLeptine")]
  pub ghrelin_leptin: u32,
}

impl HormoneScores {
  pub fn get(&self, category: HormoneCategory) -> u32 {
    match category {
      HormoneCategory::CortisolMelatonin => self.cortisol_melatonin,
      HormoneCategory::InsulinGlucagon => self.insulin_glucagon,
      HormoneCategory::TestoEstrogen => self.testo_estrogen,
      HormoneCategory::GhrelinLeptin => self.ghrelin_leptin,
    }
  }

  pub fn set(&mut self, category: HormoneCategory, score: u32) {
    match category {
      HormoneCategory::CortisolMelatonin => self.cortisol_melatonin = score,
      HormoneCategory::InsulinGlucagon => self.insulin_glucagon = score,
      HormoneCategory::TestoEstrogen => self.testo_estrogen = score,
      HormoneCategory::GhrelinLeptin => self.ghrelin_leptin = score,
    }
  }

  /// (category, score) pairs in base precedence order
  pub fn iter(&self) -> impl Iterator<Item = (HormoneCategory, u32)> + '_ {
    HormoneCategory::all().into_iter().map(move |c| (c, self.get(c)))
  }

  /// Score at or above the default attention threshold
  pub fn needs_attention(&self, category: HormoneCategory) -> bool {
    self.needs_attention_with_config(category, &EngineConfig::default())
  }

  pub fn needs_attention_with_config(&self, category: HormoneCategory, config: &EngineConfig) -> bool {
    self.get(category) >= config.attention_threshold
  }
}

/// Count affirmative answers among each category's five known questions.
///
/// Unknown keys are ignored and a category with no matching keys scores 0.
pub fn calculate_scores(answers: &AnswerSet) -> HormoneScores {
  let mut scores = HormoneScores::default();

  for category in HormoneCategory::all() {
    let yes = category
      .question_ids()
      .iter()
      .filter(|id| answers.get(**id).copied().unwrap_or(false))
      .count() as u32;
    scores.set(category, yes);
  }

  let ignored = answers
    .keys()
    .filter(|k| HormoneCategory::from_question_id(k).is_none())
    .count();
  if ignored > 0 {
    tracing::debug!(ignored, "Ignoring unrecognized hormone answer keys");
  }

  scores
}

/// Per-category change between two questionnaires (latest - previous).
/// Negative values mean fewer symptoms.
pub fn score_delta(previous: &HormoneScores, latest: &HormoneScores) -> Vec<(HormoneCategory, i64)> {
  HormoneCategory::all()
    .into_iter()
    .map(|c| (c, latest.get(c) as i64 - previous.get(c) as i64))
    .collect()
}

/// ---------------------------------------------------------------------------
/// Priority Ranking
/// ---------------------------------------------------------------------------

pub fn priority_order(scores: &HormoneScores) -> Vec<HormoneCategory> {
  priority_order_with_config(scores, &EngineConfig::default())
}

/// Categories needing attention come first in base precedence order, the
/// rest follow by descending score (ties keep base precedence order).
pub fn priority_order_with_config(scores: &HormoneScores, config: &EngineConfig) -> Vec<HormoneCategory> {
  let (mut high, mut low): (Vec<_>, Vec<_>) = HormoneCategory::all()
    .into_iter()
    .partition(|c| scores.needs_attention_with_config(*c, config));

  high.sort_by_key(|c| c.base_precedence());
  // sort_by is stable
  low.sort_by(|a, b| scores.get(*b).cmp(&scores.get(*a)));

  high.extend(low);
  high
}

/// ---------------------------------------------------------------------------
/// Recommendations & Summary
/// ---------------------------------------------------------------------------

/// Topic heading -> advice list, in priority order.
///
/// Serializes as a JSON object keyed by topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationBundle {
  entries: Vec<(HormoneCategory, Vec<String>)>,
}

impl RecommendationBundle {
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn topics(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.entries.iter().map(|(c, _)| c.topic())
  }

  pub fn categories(&self) -> impl Iterator<Item = HormoneCategory> + '_ {
    self.entries.iter().map(|(c, _)| *c)
  }

  pub fn get(&self, topic: &str) -> Option<&[String]> {
    self
      .entries
      .iter()
      .find(|(c, _)| c.topic() == topic)
      .map(|(_, advice)| advice.as_slice())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
    self.entries.iter().map(|(c, advice)| (c.topic(), advice.as_slice()))
  }
}

impl Serialize for RecommendationBundle {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (topic, advice) in self.iter() {
      map.serialize_entry(topic, advice)?;
    }
    map.end()
  }
}

pub fn generate_recommendations(scores: &HormoneScores, order: &[HormoneCategory]) -> RecommendationBundle {
  generate_recommendations_with_config(scores, order, &EngineConfig::default())
}

/// Static advice for every category at or above the attention threshold
pub fn generate_recommendations_with_config(
  scores: &HormoneScores,
  order: &[HormoneCategory],
  config: &EngineConfig,
) -> RecommendationBundle {
  let mut entries: Vec<(HormoneCategory, Vec<String>)> = Vec::new();

  for category in order {
    if !scores.needs_attention_with_config(*category, config) {
      continue;
    }
    if entries.iter().any(|(c, _)| c == category) {
      continue;
    }
    let advice = category.advice().iter().map(|s| s.to_string()).collect();
    entries.push((*category, advice));
  }

  RecommendationBundle { entries }
}

pub fn generate_summary(scores: &HormoneScores, order: &[HormoneCategory]) -> String {
  generate_summary_with_config(scores, order, &EngineConfig::default())
}

/// Narrative naming the top priority category, its score and its advice,
/// plus a pointer to the runner-up when it also needs attention.
pub fn generate_summary_with_config(
  scores: &HormoneScores,
  order: &[HormoneCategory],
  config: &EngineConfig,
) -> String {
  let mut flagged = order
    .iter()
    .copied()
    .filter(|c| scores.needs_attention_with_config(*c, config));

  let Some(top) = flagged.next() else {
    return BALANCED_SUMMARY.to_string();
  };

  let mut summary = format!(
    "Your hormonal profile shows that your {} balance needs priority attention (score: {}/{}). {}",
    top.label(),
    scores.get(top),
    MAX_CATEGORY_SCORE,
    top.advice_paragraph()
  );

  if let Some(second) = flagged.next() {
    summary.push_str(&format!(" In addition, work on your {} balance.", second.label()));
  }

  summary
}

/// ---------------------------------------------------------------------------
/// Full Pipeline
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HormoneTestResult {
  pub scores: HormoneScores,
  pub priority_order: Vec<HormoneCategory>,
  pub summary: String,
  pub recommendations: RecommendationBundle,
}

pub fn score_hormone_test(answers: &AnswerSet) -> HormoneTestResult {
  score_hormone_test_with_config(answers, &EngineConfig::default())
}

pub fn score_hormone_test_with_config(answers: &AnswerSet, config: &EngineConfig) -> HormoneTestResult {
  let scores = calculate_scores(answers);
  let priority_order = priority_order_with_config(&scores, config);
  let recommendations = generate_recommendations_with_config(&scores, &priority_order, config);
  let summary = generate_summary_with_config(&scores, &priority_order, config);

  tracing::debug!(
    ?scores,
    top = %priority_order[0],
    flagged = recommendations.len(),
    "Scored hormone questionnaire"
  );

  HormoneTestResult {
    scores,
    priority_order,
    summary,
    recommendations,
  }
}
