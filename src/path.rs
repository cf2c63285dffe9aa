use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Sentinel every comparison path is rooted at.
pub(crate) const ROOT: &str = "$";

const FIELD_SEPARATOR: char = '.';

fn index_pattern() -> &'static Regex {
    static INDEX_RE: OnceLock<Regex> = OnceLock::new();
    INDEX_RE.get_or_init(|| Regex::new(r"\[\d+\]").expect("index pattern is valid"))
}

/// Extends `path` with an object field segment: `$.items` + `id` -> `$.items.id`.
pub(crate) fn append_field(path: &str, field: &str) -> String {
    format!("{}{}{}", path, FIELD_SEPARATOR, field)
}

/// Extends `path` with an array index segment: `$.items` + `3` -> `$.items[3]`.
pub(crate) fn append_index(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// Replaces every concrete array index with the `[*]` wildcard, so
/// `$.employees[1].skills` and `$.employees[*].skills` resolve to the same
/// configuration rule. Only used for rule lookup; diff entries always carry
/// the concrete path.
pub(crate) fn normalize(path: &str) -> Cow<'_, str> {
    index_pattern().replace_all(path, "[*]")
}

/// Prefixes an externally supplied path with the root sentinel if it is not
/// rooted already. An empty path is the root itself.
pub(crate) fn rooted(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        Cow::Borrowed(ROOT)
    } else if path.starts_with(ROOT) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{}{}{}", ROOT, FIELD_SEPARATOR, path))
    }
}
