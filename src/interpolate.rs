//! `{name}` placeholder substitution.

use std::borrow::Cow;

use crate::types::VarsMap;

/// Substitute every `{name}` token whose `name` is a key of `vars`.
///
/// The template is scanned once from left to right and tokens are matched as
/// exact substrings, so variable names are never compiled into a pattern and
/// substituted values are never rescanned. Tokens without a matching entry are
/// copied through verbatim. A name containing `}` can never match.
///
/// # Examples
/// ```
/// use live_i18n::interpolate::interpolate;
/// use live_i18n::types::VarsMap;
///
/// let vars = VarsMap::from([("n".to_string(), "Sam".to_string())]);
/// assert_eq!(interpolate("Hi {n}, {n}! {other}", &vars), "Hi Sam, Sam! {other}");
/// ```
#[must_use]
pub fn interpolate<'a>(template: &'a str, vars: &VarsMap) -> Cow<'a, str> {
    if vars.is_empty() || !template.contains('{') {
        return Cow::Borrowed(template);
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((before, after_open)) = rest.split_once('{') {
        result.push_str(before);

        let substituted = after_open.split_once('}').and_then(|(name, after_close)| {
            vars.get(name).map(|value| (value, after_close))
        });

        let Some((value, after_close)) = substituted else {
            result.push('{');
            rest = after_open;
            continue;
        };
        result.push_str(value);
        rest = after_close;
    }
    result.push_str(rest);

    Cow::Owned(result)
}
