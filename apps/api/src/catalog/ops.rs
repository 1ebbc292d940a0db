//! Catalog mutations. Each function works on a draft document handed out by
//! `KnowledgeBaseStore::mutate`, so an `Err` discards the whole change.

use crate::catalog::models::{
    NewProfession, NewQuestion, NewRule, ProfessionUpdate, QuestionUpdate, RuleUpdate,
};
use crate::catalog::validation::{require_text, validate_answer_labels, validate_weights};
use crate::errors::AppError;
use crate::models::catalog::{Profession, Question, Rule, DEFAULT_ANSWERS};
use crate::models::knowledge_base::KnowledgeBase;

// ── Questions ───────────────────────────────────────────────────────────────

pub fn create_question(kb: &mut KnowledgeBase, req: NewQuestion) -> Result<Question, AppError> {
    let text = require_text("text", &req.text)?;
    let answers = match req.answers {
        Some(labels) => validate_answer_labels(&labels)?,
        None => DEFAULT_ANSWERS.iter().map(|a| a.to_string()).collect(),
    };
    let id = match req.id {
        Some(id) => {
            let id = require_text("id", &id)?;
            if kb.question(&id).is_some() {
                return Err(AppError::Conflict(format!("Question '{id}' already exists")));
            }
            id
        }
        None => next_question_id(kb)?,
    };

    let question = Question { id, text, answers };
    kb.questions.push(question.clone());
    Ok(question)
}

/// `q<N>` where N is one past the highest numeric `q` suffix in use.
fn next_question_id(kb: &KnowledgeBase) -> Result<String, AppError> {
    let highest = kb
        .questions
        .iter()
        .filter_map(|q| q.id.strip_prefix('q')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let id = highest
        .checked_add(1)
        .map(|n| format!("q{n}"))
        .ok_or_else(|| {
            AppError::Conflict(
                "No generated question id is left; supply an explicit id".to_string(),
            )
        })?;
    if kb.question(&id).is_some() {
        return Err(AppError::Conflict(format!("Question '{id}' already exists")));
    }
    Ok(id)
}

pub fn update_question(
    kb: &mut KnowledgeBase,
    id: &str,
    req: QuestionUpdate,
) -> Result<Question, AppError> {
    let text = req.text.as_deref().map(|t| require_text("text", t)).transpose()?;
    let answers = req
        .answers
        .as_deref()
        .map(validate_answer_labels)
        .transpose()?;

    let question = kb
        .question_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("Question '{id}' not found")))?;
    if let Some(text) = text {
        question.text = text;
    }
    if let Some(answers) = answers {
        question.answers = answers;
    }
    Ok(question.clone())
}

/// Removes the question and its rule.
pub fn delete_question(kb: &mut KnowledgeBase, id: &str) -> Result<(), AppError> {
    let before = kb.questions.len();
    kb.questions.retain(|q| q.id != id);
    if kb.questions.len() == before {
        return Err(AppError::NotFound(format!("Question '{id}' not found")));
    }
    kb.rules.retain(|r| r.question_id != id);
    Ok(())
}

// ── Professions ─────────────────────────────────────────────────────────────

pub fn create_profession(
    kb: &mut KnowledgeBase,
    req: NewProfession,
) -> Result<Profession, AppError> {
    let id = require_text("id", &req.id)?;
    let name = require_text("name", &req.name)?;
    if kb.profession(&id).is_some() {
        return Err(AppError::Conflict(format!("Profession '{id}' already exists")));
    }

    let profession = Profession {
        id,
        name,
        description: req.description.trim().to_string(),
    };
    kb.professions.push(profession.clone());
    Ok(profession)
}

pub fn update_profession(
    kb: &mut KnowledgeBase,
    id: &str,
    req: ProfessionUpdate,
) -> Result<Profession, AppError> {
    let name = req.name.as_deref().map(|n| require_text("name", n)).transpose()?;

    let profession = kb
        .profession_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("Profession '{id}' not found")))?;
    if let Some(name) = name {
        profession.name = name;
    }
    if let Some(description) = req.description {
        profession.description = description.trim().to_string();
    }
    Ok(profession.clone())
}

/// Removes the profession, its weight from every rule, and any rule left empty.
pub fn delete_profession(kb: &mut KnowledgeBase, id: &str) -> Result<(), AppError> {
    let before = kb.professions.len();
    kb.professions.retain(|p| p.id != id);
    if kb.professions.len() == before {
        return Err(AppError::NotFound(format!("Profession '{id}' not found")));
    }
    for rule in &mut kb.rules {
        rule.professions.remove(id);
    }
    kb.rules.retain(|r| !r.professions.is_empty());
    Ok(())
}

// ── Rules ───────────────────────────────────────────────────────────────────

pub fn create_rule(kb: &mut KnowledgeBase, req: NewRule) -> Result<Rule, AppError> {
    let question_id = req.question_id.trim();
    if kb.question(question_id).is_none() {
        return Err(AppError::NotFound(format!("Question '{question_id}' not found")));
    }
    if kb.rule(question_id).is_some() {
        return Err(AppError::Conflict(format!(
            "A rule for question '{question_id}' already exists"
        )));
    }
    validate_weights(kb, &req.professions)?;

    let rule = Rule {
        question_id: question_id.to_string(),
        professions: req.professions,
    };
    kb.rules.push(rule.clone());
    Ok(rule)
}

pub fn update_rule(
    kb: &mut KnowledgeBase,
    question_id: &str,
    req: RuleUpdate,
) -> Result<Rule, AppError> {
    validate_weights(kb, &req.professions)?;
    let rule = kb.rule_mut(question_id).ok_or_else(|| {
        AppError::NotFound(format!("Rule for question '{question_id}' not found"))
    })?;
    rule.professions = req.professions;
    Ok(rule.clone())
}

pub fn delete_rule(kb: &mut KnowledgeBase, question_id: &str) -> Result<(), AppError> {
    let before = kb.rules.len();
    kb.rules.retain(|r| r.question_id != question_id);
    if kb.rules.len() == before {
        return Err(AppError::NotFound(format!(
            "Rule for question '{question_id}' not found"
        )));
    }
    Ok(())
}
