use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    /// Generated as `q<N>` when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub answers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionUpdate {
    pub text: Option<String>,
    pub answers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfession {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRule {
    pub question_id: String,
    pub professions: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleUpdate {
    pub professions: BTreeMap<String, u32>,
}
