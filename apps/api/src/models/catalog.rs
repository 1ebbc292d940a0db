use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Answer labels used when a question is created without its own list,
/// ordered from strongest disagreement to strongest agreement.
pub const DEFAULT_ANSWERS: [&str; 4] = [
    "Definitely not",
    "Rather not",
    "Rather yes",
    "Definitely yes",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Positionally indexed from 0; the quiz submits the index, never the label.
    pub answers: Vec<String>,
}

impl Question {
    pub fn option_count(&self) -> usize {
        self.answers.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profession {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Weighted association between one question and a set of professions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub question_id: String,
    /// profession id → weight (≥ 1)
    pub professions: BTreeMap<String, u32>,
}
