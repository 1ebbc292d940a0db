//! Recommendation scoring: answer set + knowledge base → ranked professions.
//!
//! `AppState` holds an `Arc<dyn RecommendationScorer>`; the default and only
//! backend is `WeightedRuleScorer`, parameterised by an `AnswerPolicy`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::knowledge_base::KnowledgeBase;
use crate::scoring::policy::AnswerPolicy;

// ────────────────────────────────────────────────────────────────────────────
// Input / output models
// ────────────────────────────────────────────────────────────────────────────

/// An answer index as submitted by the quiz: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Index(i64),
    Text(String),
}

/// question id → selected answer index (0-based).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet(BTreeMap<String, usize>);

impl AnswerSet {
    pub fn from_raw(raw: HashMap<String, RawAnswer>) -> Result<Self, AppError> {
        let mut answers = BTreeMap::new();
        for (question_id, value) in raw {
            let index = match &value {
                RawAnswer::Index(i) => usize::try_from(*i).ok(),
                RawAnswer::Text(s) => s.trim().parse::<usize>().ok(),
            }
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Answer for question '{question_id}' is not a valid answer index: {value:?}"
                ))
            })?;
            answers.insert(question_id, index);
        }
        Ok(Self(answers))
    }

    pub fn get(&self, question_id: &str) -> Option<usize> {
        self.0.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<const N: usize> From<[(&str, usize); N]> for AnswerSet {
    fn from(pairs: [(&str, usize); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(q, i)| (q.to_string(), i))
                .collect(),
        )
    }
}

/// A profession paired with its match strength.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub score: f64,
    pub max_score: u64,
    pub percentage: f64, // 0.0 – 100.0, one decimal
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the endpoint.
#[async_trait]
pub trait RecommendationScorer: Send + Sync {
    /// Every profession, sorted by descending percentage, ties by id.
    async fn score(
        &self,
        kb: &KnowledgeBase,
        answers: &AnswerSet,
    ) -> Result<Vec<Recommendation>, AppError>;

    /// Label for logs, e.g. `"weighted-rules/graded"`.
    fn backend(&self) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedRuleScorer
// ────────────────────────────────────────────────────────────────────────────

/// Linear aggregation over weighted rules.
///
/// Algorithm:
/// 1. Every profession starts at score 0, ceiling 0.
/// 2. For each question (catalog order) with a rule, each weighted profession
///    gets `weight` added to its ceiling and `weight × credit` to its score,
///    where `credit` comes from the `AnswerPolicy`.
/// 3. percentage = 100 × score / ceiling, one decimal; ceiling 0 → 0.0.
/// 4. Sort by percentage descending, profession id ascending.
pub struct WeightedRuleScorer {
    policy: AnswerPolicy,
}

impl WeightedRuleScorer {
    pub fn new(policy: AnswerPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl RecommendationScorer for WeightedRuleScorer {
    async fn score(
        &self,
        kb: &KnowledgeBase,
        answers: &AnswerSet,
    ) -> Result<Vec<Recommendation>, AppError> {
        compute_recommendations(kb, answers, &self.policy)
    }

    fn backend(&self) -> String {
        format!("weighted-rules/{}", self.policy)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

struct Tally {
    score: f64,
    max_score: u64,
}

fn compute_recommendations(
    kb: &KnowledgeBase,
    answers: &AnswerSet,
    policy: &AnswerPolicy,
) -> Result<Vec<Recommendation>, AppError> {
    validate_answers(kb, answers)?;

    let mut rules = HashMap::with_capacity(kb.rules.len());
    for rule in &kb.rules {
        if kb.question(&rule.question_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Rule references unknown question '{}'",
                rule.question_id
            )));
        }
        rules.insert(rule.question_id.as_str(), rule);
    }

    let mut tallies: HashMap<&str, Tally> = kb
        .professions
        .iter()
        .map(|p| {
            (
                p.id.as_str(),
                Tally {
                    score: 0.0,
                    max_score: 0,
                },
            )
        })
        .collect();

    for question in &kb.questions {
        let Some(rule) = rules.get(question.id.as_str()) else {
            continue;
        };
        // validate_answers guarantees presence and range
        let index = answers.get(&question.id).unwrap_or_default();
        let credit = policy.credit(index, question.option_count());

        for (profession_id, weight) in &rule.professions {
            let tally = tallies.get_mut(profession_id.as_str()).ok_or_else(|| {
                AppError::NotFound(format!(
                    "Rule for question '{}' references unknown profession '{profession_id}'",
                    question.id
                ))
            })?;
            tally.max_score += u64::from(*weight);
            tally.score += f64::from(*weight) * credit;
        }
    }

    let mut results: Vec<Recommendation> = kb
        .professions
        .iter()
        .map(|p| {
            let tally = &tallies[p.id.as_str()];
            Recommendation {
                id: p.id.clone(),
                name: p.name.clone(),
                description: p.description.clone(),
                score: tally.score,
                max_score: tally.max_score,
                percentage: percentage(tally.score, tally.max_score),
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(results)
}

/// Rejects answer sets that skip a known question, name an unknown one, or
/// pick an index outside the question's options.
fn validate_answers(kb: &KnowledgeBase, answers: &AnswerSet) -> Result<(), AppError> {
    let missing: Vec<&str> = kb
        .questions
        .iter()
        .filter(|q| answers.get(&q.id).is_none())
        .map(|q| q.id.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Please answer every question; missing: {}",
            missing.join(", ")
        )));
    }

    for question_id in answers.question_ids() {
        let question = kb.question(question_id).ok_or_else(|| {
            AppError::Validation(format!("Answer given for unknown question '{question_id}'"))
        })?;
        let index = answers.get(question_id).unwrap_or_default();
        if index >= question.option_count() {
            return Err(AppError::Validation(format!(
                "Answer {index} is out of range for question '{question_id}' ({} options)",
                question.option_count()
            )));
        }
    }

    Ok(())
}

fn percentage(score: f64, max_score: u64) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    let raw = score / max_score as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Profession, Question, Rule};
    use serde_json::json;

    fn question(id: &str, answers: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Prompt {id}"),
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn profession(id: &str) -> Profession {
        Profession {
            id: id.to_string(),
            name: format!("Name {id}"),
            description: format!("About {id}"),
        }
    }

    fn rule(qid: &str, weights: &[(&str, u32)]) -> Rule {
        Rule {
            question_id: qid.to_string(),
            professions: weights.iter().map(|(p, w)| (p.to_string(), *w)).collect(),
        }
    }

    fn yes_no_kb() -> KnowledgeBase {
        KnowledgeBase {
            questions: vec![question("Q1", &["Yes", "No"])],
            professions: vec![profession("P1"), profession("P2")],
            rules: vec![rule("Q1", &[("P1", 3), ("P2", 1)])],
        }
    }

    fn four_level_kb() -> KnowledgeBase {
        let scale = ["Definitely not", "Rather not", "Rather yes", "Definitely yes"];
        KnowledgeBase {
            questions: vec![
                question("q1", &scale),
                question("q2", &scale),
                question("q3", &scale),
            ],
            professions: vec![profession("dev"), profession("designer"), profession("nurse")],
            rules: vec![
                rule("q1", &[("dev", 3), ("designer", 1)]),
                rule("q2", &[("designer", 3)]),
                rule("q3", &[("dev", 1), ("designer", 2)]),
            ],
        }
    }

    fn find<'a>(recs: &'a [Recommendation], id: &str) -> &'a Recommendation {
        recs.iter().find(|r| r.id == id).unwrap()
    }

    #[test]
    fn test_any_answer_policy_reaches_full_match() {
        let recs = compute_recommendations(
            &yes_no_kb(),
            &AnswerSet::from([("Q1", 0)]),
            &AnswerPolicy::AnyAnswer,
        )
        .unwrap();
        assert_eq!(find(&recs, "P1").percentage, 100.0);
        assert_eq!(find(&recs, "P2").percentage, 100.0);
    }

    #[test]
    fn test_positive_policy_negative_answer_scores_zero() {
        let policy: AnswerPolicy = "positive:0".parse().unwrap();
        let recs =
            compute_recommendations(&yes_no_kb(), &AnswerSet::from([("Q1", 1)]), &policy).unwrap();
        assert_eq!(find(&recs, "P1").percentage, 0.0);
        assert_eq!(find(&recs, "P2").percentage, 0.0);
        assert_eq!(find(&recs, "P1").max_score, 3);
    }

    #[test]
    fn test_graded_policy_mixes_answers() {
        // q1 = 3/3, q2 = 0/3, q3 = 2/3
        let answers = AnswerSet::from([("q1", 3), ("q2", 0), ("q3", 2)]);
        let recs =
            compute_recommendations(&four_level_kb(), &answers, &AnswerPolicy::Graded).unwrap();

        // dev: (3*1 + 1*2/3) / 4 = 91.7%
        assert_eq!(find(&recs, "dev").percentage, 91.7);
        assert_eq!(find(&recs, "dev").max_score, 4);
        // designer: (1*1 + 3*0 + 2*2/3) / 6 = 38.9%
        assert_eq!(find(&recs, "designer").percentage, 38.9);
        assert_eq!(recs[0].id, "dev");
    }

    #[test]
    fn test_profession_without_rules_reports_zero() {
        let answers = AnswerSet::from([("q1", 3), ("q2", 3), ("q3", 3)]);
        let recs =
            compute_recommendations(&four_level_kb(), &answers, &AnswerPolicy::Graded).unwrap();
        let nurse = find(&recs, "nurse");
        assert_eq!(nurse.percentage, 0.0);
        assert_eq!(nurse.max_score, 0);
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn test_sorted_descending_with_id_tie_break() {
        let answers = AnswerSet::from([("q1", 3), ("q2", 3), ("q3", 3)]);
        let recs =
            compute_recommendations(&four_level_kb(), &answers, &AnswerPolicy::Graded).unwrap();
        let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        // designer and dev both 100%, designer < dev alphabetically
        assert_eq!(ids, vec!["designer", "dev", "nurse"]);
        assert!(recs
            .windows(2)
            .all(|w| w[0].percentage >= w[1].percentage));
    }

    #[test]
    fn test_every_complete_answer_set_is_sorted() {
        let kb = four_level_kb();
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    let answers = AnswerSet::from([("q1", a), ("q2", b), ("q3", c)]);
                    let recs =
                        compute_recommendations(&kb, &answers, &AnswerPolicy::Graded).unwrap();
                    assert!(recs.windows(2).all(|w| w[0].percentage >= w[1].percentage));
                    assert!(recs.iter().all(|r| (0.0..=100.0).contains(&r.percentage)));
                }
            }
        }
    }

    #[test]
    fn test_missing_answer_is_rejected() {
        let err = compute_recommendations(
            &four_level_kb(),
            &AnswerSet::from([("q1", 1), ("q3", 1)]),
            &AnswerPolicy::Graded,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("q2")));
    }

    #[test]
    fn test_out_of_range_answer_is_rejected() {
        let err = compute_recommendations(
            &yes_no_kb(),
            &AnswerSet::from([("Q1", 2)]),
            &AnswerPolicy::Graded,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unknown_question_in_answers_is_rejected() {
        let err = compute_recommendations(
            &yes_no_kb(),
            &AnswerSet::from([("Q1", 0), ("Q9", 0)]),
            &AnswerPolicy::Graded,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Q9")));
    }

    #[test]
    fn test_dangling_profession_is_not_found() {
        let mut kb = yes_no_kb();
        kb.professions.remove(1);
        let err =
            compute_recommendations(&kb, &AnswerSet::from([("Q1", 0)]), &AnswerPolicy::AnyAnswer)
                .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("P2")));
    }

    #[test]
    fn test_empty_knowledge_base_scores_nothing() {
        let recs = compute_recommendations(
            &KnowledgeBase::default(),
            &AnswerSet::default(),
            &AnswerPolicy::Graded,
        )
        .unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_raw_answers_accept_numeric_strings() {
        let raw: HashMap<String, RawAnswer> =
            serde_json::from_value(json!({"q1": 2, "q2": "3", "q3": " 0 "})).unwrap();
        let answers = AnswerSet::from_raw(raw).unwrap();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers.get("q2"), Some(3));
        assert_eq!(answers.get("q3"), Some(0));
    }

    #[test]
    fn test_raw_answers_reject_negative_and_words() {
        let negative: HashMap<String, RawAnswer> =
            serde_json::from_value(json!({"q1": -1})).unwrap();
        assert!(AnswerSet::from_raw(negative).is_err());

        let word: HashMap<String, RawAnswer> =
            serde_json::from_value(json!({"q1": "yes"})).unwrap();
        assert!(AnswerSet::from_raw(word).is_err());
    }

    #[tokio::test]
    async fn test_scorer_trait_object_delegates() {
        let scorer: Box<dyn RecommendationScorer> =
            Box::new(WeightedRuleScorer::new(AnswerPolicy::AnyAnswer));
        let recs = scorer
            .score(&yes_no_kb(), &AnswerSet::from([("Q1", 1)]))
            .await
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(scorer.backend(), "weighted-rules/any");
    }
}
