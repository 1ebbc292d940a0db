use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};

/// Maps a selected answer index to the share of a rule's weight it earns.
///
/// - `Graded`: options run from strongest disagreement (0) to strongest
///   agreement (last); credit grows linearly, `index / (options - 1)`.
/// - `AnyAnswer`: answering at all earns the full weight.
/// - `Positive`: only the listed indices earn the full weight, others earn nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnswerPolicy {
    #[default]
    Graded,
    AnyAnswer,
    Positive(BTreeSet<usize>),
}

impl AnswerPolicy {
    /// Credit in `[0.0, 1.0]`. `index` must already be checked against `option_count`.
    pub fn credit(&self, index: usize, option_count: usize) -> f64 {
        match self {
            AnswerPolicy::Graded => {
                if option_count <= 1 {
                    1.0
                } else {
                    (index as f64 / (option_count - 1) as f64).clamp(0.0, 1.0)
                }
            }
            AnswerPolicy::AnyAnswer => 1.0,
            AnswerPolicy::Positive(indices) => {
                if indices.contains(&index) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl FromStr for AnswerPolicy {
    type Err = anyhow::Error;

    /// Accepts `graded`, `any`, or `positive:0,2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "graded" => return Ok(AnswerPolicy::Graded),
            "any" => return Ok(AnswerPolicy::AnyAnswer),
            _ => {}
        }

        let Some(list) = lower.strip_prefix("positive:") else {
            bail!("unknown answer policy '{s}'");
        };
        let indices = list
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<usize>()
                    .with_context(|| format!("'{part}' is not an answer index"))
            })
            .collect::<anyhow::Result<BTreeSet<_>>>()?;
        if indices.is_empty() {
            bail!("positive policy needs at least one answer index");
        }
        Ok(AnswerPolicy::Positive(indices))
    }
}

impl fmt::Display for AnswerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerPolicy::Graded => write!(f, "graded"),
            AnswerPolicy::AnyAnswer => write!(f, "any"),
            AnswerPolicy::Positive(indices) => {
                let list: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "positive:{}", list.join(","))
            }
        }
    }
}
