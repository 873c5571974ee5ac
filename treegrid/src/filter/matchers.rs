//! Match-mode predicate registry.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::value::Value;

/// Predicate signature: the node's resolved field value (if any) against
/// the filter value.
pub type MatchPredicate = Arc<dyn Fn(Option<&Value>, &Value) -> bool + Send + Sync>;

/// Injected lookup table from match-mode name to predicate.
///
/// The filter engine never consults a process-wide table; callers hand a
/// registry in and can register custom predicates (locale-aware matching,
/// domain comparisons) under new names or override the built-ins.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use treegrid::filter::FilterRegistry;
/// use treegrid::value::Value;
///
/// let mut registry = FilterRegistry::default();
/// registry.register("isEven", Arc::new(|value, _filter| {
///     value.and_then(Value::as_f64).is_some_and(|n| n as i64 % 2 == 0)
/// }));
/// assert!(registry.get("isEven").is_some());
/// ```
#[derive(Clone)]
pub struct FilterRegistry {
    modes: HashMap<String, MatchPredicate>,
}

impl FilterRegistry {
    /// A registry with no modes at all.
    pub fn empty() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }

    /// Register (or override) a predicate under a mode name.
    pub fn register(&mut self, name: impl Into<String>, predicate: MatchPredicate) {
        self.modes.insert(name.into(), predicate);
    }

    /// Look up a predicate by mode name.
    pub fn get(&self, name: &str) -> Option<&MatchPredicate> {
        self.modes.get(name)
    }
}

impl Default for FilterRegistry {
    /// The built-in modes: `startsWith`, `contains`, `notContains`,
    /// `endsWith`, `equals`, `notEquals`, `in`, `lt`, `lte`, `gt`, `gte`,
    /// `between`, `fuzzy`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("startsWith", Arc::new(starts_with));
        registry.register("contains", Arc::new(contains));
        registry.register("notContains", Arc::new(|v, f| !contains(v, f)));
        registry.register("endsWith", Arc::new(ends_with));
        registry.register("equals", Arc::new(equals));
        registry.register("notEquals", Arc::new(|v, f| !equals(v, f)));
        registry.register("in", Arc::new(is_in));
        registry.register("lt", Arc::new(|v, f| ordered(v, f, &[Ordering::Less])));
        registry.register(
            "lte",
            Arc::new(|v, f| ordered(v, f, &[Ordering::Less, Ordering::Equal])),
        );
        registry.register("gt", Arc::new(|v, f| ordered(v, f, &[Ordering::Greater])));
        registry.register(
            "gte",
            Arc::new(|v, f| ordered(v, f, &[Ordering::Greater, Ordering::Equal])),
        );
        registry.register("between", Arc::new(between));
        registry.register("fuzzy", Arc::new(fuzzy));
        registry
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.modes.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FilterRegistry").field("modes", &names).finish()
    }
}

/// Lowercased text of a present, non-null value.
fn text_of(value: Option<&Value>) -> Option<String> {
    value
        .filter(|v| !v.is_null())
        .map(|v| v.to_string().to_lowercase())
}

fn starts_with(value: Option<&Value>, filter: &Value) -> bool {
    if filter.is_null() {
        return true;
    }
    let query = filter.to_string().to_lowercase();
    text_of(value).is_some_and(|text| text.starts_with(&query))
}

fn contains(value: Option<&Value>, filter: &Value) -> bool {
    if filter.is_null() {
        return true;
    }
    let query = filter.to_string().to_lowercase();
    text_of(value).is_some_and(|text| text.contains(&query))
}

fn ends_with(value: Option<&Value>, filter: &Value) -> bool {
    if filter.is_null() {
        return true;
    }
    let query = filter.to_string().to_lowercase();
    text_of(value).is_some_and(|text| text.ends_with(&query))
}

fn equals(value: Option<&Value>, filter: &Value) -> bool {
    if filter.is_null() {
        return true;
    }
    match value {
        Some(Value::String(s)) => match filter.as_str() {
            Some(q) => s.eq_ignore_ascii_case(q),
            None => false,
        },
        Some(v) if !v.is_null() => v.compare(filter) == Ordering::Equal,
        _ => false,
    }
}

fn is_in(value: Option<&Value>, filter: &Value) -> bool {
    match filter.as_list() {
        Some(items) => items.iter().any(|item| equals(value, item)),
        None => equals(value, filter),
    }
}

fn ordered(value: Option<&Value>, filter: &Value, accepted: &[Ordering]) -> bool {
    if filter.is_null() {
        return true;
    }
    match value {
        Some(v) if !v.is_null() => accepted.contains(&v.compare(filter)),
        _ => false,
    }
}

fn between(value: Option<&Value>, filter: &Value) -> bool {
    let Some([low, high]) = filter.as_list().and_then(|items| <&[Value; 2]>::try_from(items).ok())
    else {
        return false;
    };
    match value {
        Some(v) if !v.is_null() => {
            v.compare(low) != Ordering::Less && v.compare(high) != Ordering::Greater
        }
        _ => false,
    }
}

/// Fuzzy matching via nucleo-matcher; an empty query matches everything.
fn fuzzy(value: Option<&Value>, filter: &Value) -> bool {
    let query = filter.to_string();
    if query.is_empty() {
        return true;
    }
    let Some(text) = value.filter(|v| !v.is_null()).map(ToString::to_string) else {
        return false;
    };
    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        &query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut buf = Vec::new();
    let haystack = Utf32Str::new(&text, &mut buf);
    pattern.score(haystack, &mut matcher).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_modes_ignore_case() {
        let value = Value::from("Amsterdam");
        assert!(starts_with(Some(&value), &Value::from("ams")));
        assert!(contains(Some(&value), &Value::from("STER")));
        assert!(ends_with(Some(&value), &Value::from("Dam")));
        assert!(!starts_with(Some(&value), &Value::from("dam")));
    }

    #[test]
    fn test_missing_value_never_matches() {
        assert!(!contains(None, &Value::from("x")));
        assert!(!equals(Some(&Value::Null), &Value::from("x")));
        assert!(!ordered(None, &Value::from(3), &[Ordering::Less]));
    }

    #[test]
    fn test_numeric_comparisons() {
        let value = Value::from(5);
        assert!(ordered(Some(&value), &Value::from(10), &[Ordering::Less]));
        assert!(equals(Some(&value), &Value::from(5.0)));
        assert!(between(
            Some(&value),
            &Value::List(vec![Value::from(1), Value::from(9)])
        ));
        assert!(!between(
            Some(&value),
            &Value::List(vec![Value::from(6), Value::from(9)])
        ));
    }

    #[test]
    fn test_in_mode() {
        let value = Value::from("blue");
        let options = Value::List(vec![Value::from("red"), Value::from("Blue")]);
        assert!(is_in(Some(&value), &options));
        assert!(!is_in(Some(&Value::from("green")), &options));
    }

    #[test]
    fn test_fuzzy_mode() {
        let value = Value::from("alphabetical");
        assert!(fuzzy(Some(&value), &Value::from("alpha")));
        assert!(fuzzy(Some(&value), &Value::from("abc")));
        assert!(!fuzzy(Some(&value), &Value::from("xyzzy")));
    }
}
