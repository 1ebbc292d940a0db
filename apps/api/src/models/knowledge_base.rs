use serde::{Deserialize, Serialize};

use crate::models::catalog::{Profession, Question, Rule};

/// The whole document: what gets persisted, exported and imported.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeBase {
    pub questions: Vec<Question>,
    pub professions: Vec<Profession>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeBaseStats {
    pub questions: usize,
    pub professions: usize,
    pub rules: usize,
}

impl KnowledgeBase {
    pub fn stats(&self) -> KnowledgeBaseStats {
        KnowledgeBaseStats {
            questions: self.questions.len(),
            professions: self.professions.len(),
            rules: self.rules.len(),
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id == id)
    }

    pub fn profession(&self, id: &str) -> Option<&Profession> {
        self.professions.iter().find(|p| p.id == id)
    }

    pub fn profession_mut(&mut self, id: &str) -> Option<&mut Profession> {
        self.professions.iter_mut().find(|p| p.id == id)
    }

    pub fn rule(&self, question_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.question_id == question_id)
    }

    pub fn rule_mut(&mut self, question_id: &str) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.question_id == question_id)
    }
}
