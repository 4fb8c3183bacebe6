//! # Filler
//! Anything that fills one or more placeholders in a [PartialPrompt].
//!
//! A filler declares the placeholders it is able to fill via [FillPlaceholders] and does the filling in [Fill].
//! Fillers are applied with [PartialPrompt::apply], so a prompt can be filled by several fillers in stages.

use std::collections::HashMap;
use crate::prompt::PartialPrompt;
use anyhow::Result;

pub trait FillPlaceholders {
    /// The placeholder names this filler can provide values for.
    fn placeholders_to_fill(&self) -> Vec<&str>;
}

pub trait Fill: FillPlaceholders {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()>;
}

/// Fills placeholders from a name-to-value map, the shape in which prompt variables usually arrive.
///
/// Only placeholders present in the prompt are filled; other keys are skipped so one map can serve several prompts.
///
/// ```
/// use promptreg::filler::MapFiller;
/// use promptreg::prompt::PromptTemplate;
///
/// let filler = MapFiller::from([("issue_number", "42"), ("unused", "skipped")]);
/// let mut prompt = PromptTemplate::new("Closes #{issue_number}").construct_prompt();
/// prompt.apply(&filler).unwrap();
/// assert_eq!(prompt.complete().unwrap(), "Closes #42");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapFiller {
    values: HashMap<String, String>,
}

impl MapFiller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one value.
    pub fn with(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(placeholder.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for MapFiller {
    fn from(pairs: [(K, V); N]) -> Self {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<HashMap<String, String>> for MapFiller {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl FillPlaceholders for MapFiller {
    fn placeholders_to_fill(&self) -> Vec<&str> {
        let mut placeholders: Vec<&str> = self.values.keys().map(String::as_str).collect();
        placeholders.sort_unstable();
        placeholders
    }
}

impl Fill for MapFiller {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()> {
        for (placeholder, value) in &self.values {
            if partial_prompt.has_placeholder(placeholder) {
                partial_prompt.try_fill(placeholder.as_str(), value.as_str())?;
            }
        }
        Ok(())
    }
}
