use std::collections::{HashMap, HashSet};
use regex::{Captures, Regex};
use lazy_static::lazy_static;


lazy_static! {
    /// Either a brace escape (`{{` or `}}`) or a named placeholder like `{topic}`.
    static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// Collects the names of all placeholders in a template. Escaped braces never produce a placeholder.
pub(crate) fn get_placeholders(string: &str) -> HashSet<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Substitutes placeholders with their values and turns `{{`/`}}` into literal braces.
///
/// A placeholder without a value (absent from `mapping` or mapped to `None`) is left as written.
pub(crate) fn replace_all_placeholders(original: &str, mapping: &HashMap<String, Option<String>>) -> String {
    PLACEHOLDER_MATCH_RE.replace_all(original, |captures: &Captures| {
        match captures.get(1) {
            Some(name) => mapping.get(name.as_str())
                .and_then(|value| value.clone())
                .unwrap_or_else(|| captures[0].to_string()),
            // escapes are two identical braces
            None => captures[0][..1].to_string(),
        }
    }).into_owned()
}

#[cfg(test)]
mod prompt_processing_tests {
    use std::collections::{HashMap, HashSet};
    use super::{get_placeholders, replace_all_placeholders};

    #[test]
    fn test_get_keys() {
        let keys = get_placeholders("{a}");
        assert_eq!(HashSet::from(["a".to_string()]), keys);

        let keys = get_placeholders("{a\n}");
        assert_eq!(0, keys.len());

        let keys = get_placeholders("{a}    {b_2} {a}");
        assert_eq!(HashSet::from(["a".to_string(), "b_2".to_string()]), keys);

        let keys = get_placeholders("{1a} { a } {a-b}");
        assert!(keys.is_empty());
    }

    #[test]
    fn test_escaped_braces_are_not_placeholders() {
        let keys = get_placeholders("{{a}} and {{\"json\": 1}} and {b}");
        assert_eq!(HashSet::from(["b".to_string()]), keys);
    }

    #[test]
    fn test_replace() {
        let string = "{a} and {b} and {a}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("alice".to_string())),
            ("b".to_string(), Some("bob".to_string())),
        ]);
        assert_eq!("alice and bob and alice", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_replace_unescapes_and_keeps_unfilled() {
        let string = "{{\"user\": \"{name}\"}} asks about {topic}";
        let mapping = HashMap::from([
            ("name".to_string(), Some("ana".to_string())),
            ("topic".to_string(), None),
        ]);
        assert_eq!("{\"user\": \"ana\"} asks about {topic}", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let mapping = HashMap::from([("a".to_string(), Some("{b} {{".to_string()))]);
        assert_eq!("{b} {{", replace_all_placeholders("{a}", &mapping));
    }
}
