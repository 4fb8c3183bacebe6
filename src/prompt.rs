//! # Prompt
//! A prompt is simply a string.
//!
//! ## PromptTemplate
//! A prompt template is a string with placeholders. It can also carry metadata in JSON format, e.g. the
//! [PromptInfo](crate::registry::PromptInfo) of the registry entry it was loaded from.
//!
//! ## Placeholder
//! A placeholder is written as `{name}`, where the name starts with a letter or `_` followed by letters, digits
//! or `_`. Literal braces are written doubled: `{{` and `}}`. So `{{name}}` is the literal text `{name}`, not a
//! placeholder.
//!
//! ## PartialPrompt
//! A partial prompt is a prompt template with some placeholders filled. It can be only constructed from a
//! prompt template via [PromptTemplate::construct_prompt].
//!
//! Placeholders get filled via [PartialPrompt::try_fill] or by a [Fill](crate::filler::Fill) implementor via
//! [PartialPrompt::apply]. Filling an already filled placeholder updates its value.
//! When all placeholders are filled, [PartialPrompt::complete] replaces them with their values.
//!
//! ```
//! use promptreg::prompt::PromptTemplate;
//!
//! let template = PromptTemplate::new("Classify the log severity.\nInput: {log_line}\nOutput:");
//! let mut prompt = template.construct_prompt();
//! assert!(prompt.complete().is_err());
//! prompt.try_fill("log_line", "Disk usage at 85%.").unwrap();
//! assert_eq!(
//!     prompt.complete().unwrap(),
//!     "Classify the log severity.\nInput: Disk usage at 85%.\nOutput:"
//! );
//! ```


use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::filler::Fill;
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};
use crate::utils::prompt_processing::{get_placeholders, replace_all_placeholders};
use log::warn;
use crate::utils::JsonMap;


/// A prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template of the partial prompt, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Mapping from placeholder name to its filling value
    pub(crate) placeholder_to_vals: HashMap<String, Option<String>>,

    /// Record the placeholders that are not filled yet
    pub(crate) unfilled_placeholders: HashSet<String>,
}

impl PartialPrompt {
    /// Fill a placeholder with the given value, overwriting any previous value.
    /// Returns an error if the template has no such placeholder.
    pub fn try_fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        if self.placeholder_to_vals.contains_key(&placeholder) {
            self.unfilled_placeholders.remove(&placeholder);
            self.placeholder_to_vals.insert(placeholder, Some(value.into()));
            Ok(self)
        } else {
            Err(PlaceholderNotExist::new(placeholder, value, &self.template.placeholders))
        }
    }

    /// Let a filler fill this partial prompt.
    pub fn apply(&mut self, filler: &impl Fill) -> anyhow::Result<&mut Self> {
        filler.fill(self)?;
        Ok(self)
    }

    /// Whether the template has a placeholder with this name.
    pub fn has_placeholder(&self, placeholder: &str) -> bool {
        self.placeholder_to_vals.contains_key(placeholder)
    }

    /// Names of the placeholders that are still unfilled, sorted.
    pub fn unfilled(&self) -> Vec<String> {
        let mut unfilled: Vec<String> = self.unfilled_placeholders.iter().cloned().collect();
        unfilled.sort();
        unfilled
    }

    /// Complete the partial prompt and return the completed prompt.
    /// Returns an error if there are still unfilled placeholders.
    pub fn complete(&self) -> Result<String, UnfilledPlaceholders> {
        if self.unfilled_placeholders.is_empty() {
            Ok(replace_all_placeholders(self.template.str(), &self.placeholder_to_vals))
        } else {
            let mut all_placeholders: Vec<String> = self.template.placeholders.iter().cloned().collect();
            all_placeholders.sort();
            Err(UnfilledPlaceholders {
                all_placeholders,
                unfilled_placeholders: self.unfilled(),
            })
        }
    }
}

/// A prompt template with placeholders. It can also have metadata in JSON format.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    /// The template text, immutable
    template: Arc<String>,

    /// The placeholders in the template, readonly
    #[readonly]
    pub placeholders: HashSet<String>,

    /// The metadata of the prompt template, readonly
    #[readonly]
    pub meta_data: Arc<JsonMap>,
}

impl PromptTemplate {
    /// Create a prompt template from a string without metadata.
    pub fn new(template: impl Into<String>) -> Self {
        Self::with_metadata(template, JsonMap::new())
    }

    /// Create a prompt template from a string with metadata. Warns if the template does not have any placeholder.
    pub fn with_metadata(template: impl Into<String>, metadata: JsonMap) -> Self {
        let template = template.into();
        let placeholders = get_placeholders(&template);
        if placeholders.is_empty() {
            warn!("Your prompt template does not have a placeholder. If this is intended, ignore this message. \
            Otherwise, check whether you have written placeholders like {{name}}.\n\
            Got prompt template:\n\
            {}", template);
        }
        Self {
            template: Arc::new(template),
            meta_data: Arc::new(metadata),
            placeholders,
        }
    }

    /// Get the prompt template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    /// Construct a partial prompt from the prompt template.
    pub fn construct_prompt(&self) -> PartialPrompt {
        PartialPrompt {
            template: self.clone(),
            placeholder_to_vals: self.placeholders.iter().map(|p| (p.clone(), None)).collect(),
            unfilled_placeholders: self.placeholders.clone(),
        }
    }
}

pub mod errors {
    use std::collections::HashSet;
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Returned by [PartialPrompt::complete](super::PartialPrompt::complete) while some `{name}` slots are empty. Both lists are sorted.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UnfilledPlaceholders {
        pub unfilled_placeholders: Vec<String>,
        pub all_placeholders: Vec<String>,
    }

    impl fmt::Display for UnfilledPlaceholders {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            let unfilled: Vec<String> = self.unfilled_placeholders.iter().map(|p| format!("{{{}}}", p)).collect();
            write!(f, "UnfilledPlaceholders: {} still empty (template uses {} placeholders: {:?})",
                   unfilled.join(", "), self.all_placeholders.len(), self.all_placeholders)
        }
    }

    impl Error for UnfilledPlaceholders {}

    /// Returned when filling a name the template has no `{name}` slot for.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PlaceholderNotExist {
        pub try_fill_placeholder: String,
        pub value: String,
        pub available_placeholders: Vec<String>,
    }

    impl PlaceholderNotExist {
        pub(crate) fn new(try_fill_placeholder: impl Into<String>,
                          value: impl Into<String>,
                          available_placeholders: &HashSet<String>) -> Self {
            let mut available_placeholders: Vec<String> = available_placeholders.iter().cloned().collect();
            available_placeholders.sort();
            PlaceholderNotExist {
                try_fill_placeholder: try_fill_placeholder.into(),
                value: value.into(),
                available_placeholders,
            }
        }
    }

    impl fmt::Display for PlaceholderNotExist {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "PlaceholderNotExist: template has no {{{}}} (value {:?} not used); placeholders are {:?}",
                   self.try_fill_placeholder,
                   self.value,
                   self.available_placeholders)
        }
    }

    impl Error for PlaceholderNotExist {}
}

#[cfg(test)]
mod test_prompt {
    use crate::prompt::PromptTemplate;
    use crate::utils::JsonMap;

    const PR_TEMPLATE: &str = "Write a pull request for branch {branch_name}.\n\
        Summary: {changes_summary}\n\
        Issue: #{issue_number}\n\
        Answer as {{\"title\": ..., \"body\": ...}}";

    #[test]
    fn test_template_placeholders() {
        let template = PromptTemplate::new(PR_TEMPLATE);
        let mut placeholders: Vec<&str> = template.placeholders.iter().map(String::as_str).collect();
        placeholders.sort();
        assert_eq!(vec!["branch_name", "changes_summary", "issue_number"], placeholders);
        assert!(template.meta_data.is_empty());
        assert_eq!(PR_TEMPLATE, template.str());
    }

    #[test]
    fn test_fill_and_complete() {
        let template = PromptTemplate::new(PR_TEMPLATE);
        let mut prompt = template.construct_prompt();
        prompt.try_fill("branch_name", "feature/add-cache-system").unwrap()
            .try_fill("changes_summary", "cache layer").unwrap();

        let unfilled = prompt.complete().expect_err("issue_number is still unfilled");
        assert_eq!(vec!["issue_number".to_string()], unfilled.unfilled_placeholders);
        assert_eq!(3, unfilled.all_placeholders.len());
        assert_eq!(vec!["issue_number".to_string()], prompt.unfilled());
        assert!(unfilled.to_string().contains("{issue_number} still empty"));

        prompt.try_fill("issue_number", "42").unwrap();
        assert_eq!(
            "Write a pull request for branch feature/add-cache-system.\n\
            Summary: cache layer\n\
            Issue: #42\n\
            Answer as {\"title\": ..., \"body\": ...}",
            prompt.complete().unwrap()
        );
    }

    #[test]
    fn test_refill_overwrites() {
        let mut prompt = PromptTemplate::new("Hello {name}").construct_prompt();
        prompt.try_fill("name", "first").unwrap();
        prompt.try_fill("name", "second").unwrap();
        assert_eq!("Hello second", prompt.complete().unwrap());
    }

    #[test]
    fn test_fill_unknown_placeholder() {
        let mut prompt = PromptTemplate::new("Hello {name} from {place}").construct_prompt();
        let error = prompt.try_fill("nickname", "ana").expect_err("nickname is not a placeholder");
        assert_eq!("nickname", error.try_fill_placeholder);
        assert_eq!("ana", error.value);
        assert_eq!(vec!["name".to_string(), "place".to_string()], error.available_placeholders);
        assert!(error.to_string().contains("{nickname}"));
        assert!(!prompt.has_placeholder("nickname"));
        assert!(prompt.has_placeholder("name"));
    }

    #[test]
    fn test_template_without_placeholders() {
        let template = PromptTemplate::new("What's France's capital?");
        assert!(template.placeholders.is_empty());
        assert_eq!("What's France's capital?", template.construct_prompt().complete().unwrap());
    }

    #[test]
    fn test_metadata_is_kept() {
        let mut metadata = JsonMap::new();
        metadata.insert("version".to_string(), "v2".into());
        let template = PromptTemplate::with_metadata("{a}", metadata);
        let prompt = template.construct_prompt();
        assert_eq!("v2", prompt.template.meta_data["version"]);
    }
}
