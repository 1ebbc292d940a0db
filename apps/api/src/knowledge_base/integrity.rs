use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::knowledge_base::KnowledgeBase;

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub passed: bool,
    pub problems: Vec<String>,
}

/// Checks a whole document before it may replace the store.
///
/// FAIL conditions:
/// - duplicate question, profession, or rule (per question) ids
/// - blank or whitespace-padded ids, blank question text or profession name
/// - a question with fewer than two answer options, or a blank option
/// - a rule with no weights, or any weight of 0
/// - a rule referencing a missing question or profession
pub fn check_integrity(kb: &KnowledgeBase) -> IntegrityReport {
    let mut problems = Vec::new();

    let mut question_ids = HashSet::new();
    for question in &kb.questions {
        if !question_ids.insert(question.id.as_str()) {
            problems.push(format!("Duplicate question id '{}'", question.id));
        }
        if let Some(problem) = id_problem("Question", &question.id) {
            problems.push(problem);
        }
        if question.text.trim().is_empty() {
            problems.push(format!("Question '{}' has blank text", question.id));
        }
        if question.option_count() < 2 {
            problems.push(format!(
                "Question '{}' needs at least two answer options",
                question.id
            ));
        }
        if question.answers.iter().any(|a| a.trim().is_empty()) {
            problems.push(format!("Question '{}' has a blank answer option", question.id));
        }
    }

    let mut profession_ids = HashSet::new();
    for profession in &kb.professions {
        if !profession_ids.insert(profession.id.as_str()) {
            problems.push(format!("Duplicate profession id '{}'", profession.id));
        }
        if let Some(problem) = id_problem("Profession", &profession.id) {
            problems.push(problem);
        }
        if profession.name.trim().is_empty() {
            problems.push(format!("Profession '{}' has blank name", profession.id));
        }
    }

    let mut ruled_questions = HashSet::new();
    for rule in &kb.rules {
        let qid = rule.question_id.as_str();
        if !ruled_questions.insert(qid) {
            problems.push(format!("More than one rule for question '{qid}'"));
        }
        if !question_ids.contains(qid) {
            problems.push(format!("Rule references missing question '{qid}'"));
        }
        if rule.professions.is_empty() {
            problems.push(format!("Rule for question '{qid}' has no weights"));
        }
        for (pid, weight) in &rule.professions {
            if !profession_ids.contains(pid.as_str()) {
                problems.push(format!(
                    "Rule for question '{qid}' references missing profession '{pid}'"
                ));
            }
            if *weight == 0 {
                problems.push(format!(
                    "Rule for question '{qid}' has zero weight for profession '{pid}'"
                ));
            }
        }
    }

    IntegrityReport {
        passed: problems.is_empty(),
        problems,
    }
}

/// Ids must be non-blank and carry no surrounding whitespace, as the editor
/// trims them on create.
fn id_problem(kind: &str, id: &str) -> Option<String> {
    if id.trim().is_empty() {
        Some(format!("{kind} with blank id"))
    } else if id.trim() != id {
        Some(format!("{kind} id '{id}' has surrounding whitespace"))
    } else {
        None
    }
}

pub fn ensure_integrity(kb: &KnowledgeBase) -> Result<(), AppError> {
    let report = check_integrity(kb);
    if report.passed {
        Ok(())
    } else {
        Err(AppError::Integrity(report.problems.join("; ")))
    }
}
