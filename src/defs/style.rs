//! Inline `style` attribute handling

use std::borrow::Cow;
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(.*?)\s*:\s*(.*?)\s*$").expect("BUG: invalid DECLARATION_RE regex literal")
});

static URL_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"url\(#([a-zA-Z0-9_\-]*)\)").expect("BUG: invalid URL_REF_RE regex literal")
});

/// Parsed style declarations, ordered by property name
pub type Style = BTreeMap<String, String>;

/// Parse `key: value; key: value` pairs.
///
/// Items without a colon are skipped; a repeated property keeps its last value.
pub fn parse_style(value: &str) -> Style {
    let mut style = Style::new();
    for item in value.split(';') {
        let Some(captures) = DECLARATION_RE.captures(item) else {
            continue;
        };
        let key = &captures[1];
        if key.is_empty() {
            continue;
        }
        style.insert(key.to_string(), captures[2].to_string());
    }
    style
}

/// Join declarations back into `key: value; key: value`
pub fn format_style(style: &Style) -> String {
    style
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Drop editor-private `-inkscape*` properties and re-emit in sorted order
pub fn clean_style(value: &str) -> String {
    let mut style = parse_style(value);
    style.retain(|key, _| !key.starts_with("-inkscape"));
    format_style(&style)
}

/// Rewrite every `url(#id)` reference through `resolve`.
///
/// `resolve` returns the replacement id, or None to leave the reference as is.
pub fn rewrite_url_refs<F>(value: &str, mut resolve: F) -> Cow<'_, str>
where
    F: FnMut(&str) -> Option<String>,
{
    URL_REF_RE.replace_all(value, |captures: &Captures| {
        let id = &captures[1];
        match resolve(id) {
            Some(replacement) => format!("url(#{replacement})"),
            None => format!("url(#{id})"),
        }
    })
}

/// Ids referenced with `url(#id)` in `value`, in order of appearance
pub fn url_refs(value: &str) -> impl Iterator<Item = &str> + '_ {
    URL_REF_RE
        .captures_iter(value)
        .filter_map(|captures| captures.get(1))
        .map(|id| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        let style = parse_style("fill:red; stroke : blue ;;bogus; fill: green");
        assert_eq!(style.len(), 2);
        assert_eq!(style["fill"], "green");
        assert_eq!(style["stroke"], "blue");
    }

    #[test]
    fn test_clean_style_sorts_and_strips_editor_keys() {
        let cleaned = clean_style("stroke:#000;-inkscape-font-specification:Sans;fill:none");
        assert_eq!(cleaned, "fill: none; stroke: #000");
    }

    #[test]
    fn test_clean_style_empty() {
        assert_eq!(clean_style(""), "");
        assert_eq!(clean_style("-inkscape-stroke:none"), "");
    }

    #[test]
    fn test_rewrite_url_refs() {
        let rewritten = rewrite_url_refs("fill:url(#a);stroke:url(#b)", |id| {
            (id == "a").then(|| "svg-def-1".to_string())
        });
        assert_eq!(rewritten, "fill:url(#svg-def-1);stroke:url(#b)");
    }

    #[test]
    fn test_url_refs() {
        let ids: Vec<_> = url_refs("fill: url(#fade); stroke: url(#edge-2); mask: url(x)").collect();
        assert_eq!(ids, ["fade", "edge-2"]);
    }

    #[test]
    fn test_rewrite_without_refs_borrows() {
        let rewritten = rewrite_url_refs("fill: red", |_| None);
        assert!(matches!(rewritten, Cow::Borrowed(_)));
    }
}
