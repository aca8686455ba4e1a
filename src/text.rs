use std::collections::HashSet;

/// Lower-cases `text` and drops every whitespace character, not only the
/// leading and trailing ones. Used for usernames, emails and tag names.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalizes every item and keeps each distinct value once, in order of
/// first appearance.
pub fn unique_normalized<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let value = normalize(item.as_ref());
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

/// Names present in `old` but missing from `new`.
pub fn missing_from<'a>(old: &'a [String], new: &[String]) -> Vec<&'a str> {
    let keep: HashSet<&str> = new.iter().map(String::as_str).collect();
    old.iter()
        .map(String::as_str)
        .filter(|name| !keep.contains(name))
        .collect()
}
