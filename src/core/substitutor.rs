use crate::domain::model::VariableProvider;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // [##name##]
    PATTERN.get_or_init(|| Regex::new(r"\[##([^#\[\]]+)##\]").expect("placeholder pattern is valid"))
}

/// Replaces `[##name##]` placeholders declared in `variables`.
///
/// The input is scanned once, so replacement values are never expanded again.
/// Undeclared placeholders stay in the output as written.
pub fn substitute<'a>(text: &'a str, variables: &VariableProvider) -> Cow<'a, str> {
    if variables.is_empty() || !text.contains("[##") {
        return Cow::Borrowed(text);
    }

    placeholder_pattern().replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        match variables.get(name) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    })
}
