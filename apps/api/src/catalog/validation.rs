use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::models::knowledge_base::KnowledgeBase;

/// Trims `value`, rejecting it if nothing is left.
pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("'{field}' must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Answer options: at least two, none blank. Labels are trimmed.
pub fn validate_answer_labels(labels: &[String]) -> Result<Vec<String>, AppError> {
    if labels.len() < 2 {
        return Err(AppError::Validation(
            "A question needs at least two answer options".to_string(),
        ));
    }
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| require_text(&format!("answers[{i}]"), label))
        .collect()
}

/// Rule weights: non-empty, every weight ≥ 1, every profession known.
pub fn validate_weights(
    kb: &KnowledgeBase,
    weights: &BTreeMap<String, u32>,
) -> Result<(), AppError> {
    if weights.is_empty() {
        return Err(AppError::Validation(
            "Select at least one profession for the rule".to_string(),
        ));
    }
    for (profession_id, weight) in weights {
        if *weight == 0 {
            return Err(AppError::Validation(format!(
                "Weight for profession '{profession_id}' must be at least 1"
            )));
        }
        if kb.profession(profession_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Profession '{profession_id}' not found"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Profession;

    fn kb_with_dev() -> KnowledgeBase {
        KnowledgeBase {
            professions: vec![Profession {
                id: "dev".into(),
                name: "Developer".into(),
                description: String::new(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("name", "  Nurse ").unwrap(), "Nurse");
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(matches!(
            require_text("name", "   "),
            Err(AppError::Validation(msg)) if msg.contains("name")
        ));
    }

    #[test]
    fn test_answer_labels_need_two() {
        assert!(validate_answer_labels(&["Only".to_string()]).is_err());
        assert!(validate_answer_labels(&["Yes".to_string(), " ".to_string()]).is_err());
        assert_eq!(
            validate_answer_labels(&[" No".to_string(), "Yes ".to_string()]).unwrap(),
            vec!["No", "Yes"]
        );
    }

    #[test]
    fn test_weights_must_be_positive() {
        let weights = BTreeMap::from([("dev".to_string(), 0)]);
        assert!(matches!(
            validate_weights(&kb_with_dev(), &weights),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_weights_must_reference_known_professions() {
        let weights = BTreeMap::from([("dev".to_string(), 2), ("chef".to_string(), 1)]);
        assert!(matches!(
            validate_weights(&kb_with_dev(), &weights),
            Err(AppError::NotFound(msg)) if msg.contains("chef")
        ));
    }

    #[test]
    fn test_empty_weights_rejected() {
        assert!(validate_weights(&kb_with_dev(), &BTreeMap::new()).is_err());
    }
}
