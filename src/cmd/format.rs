/*!
format.rs

Rendering of DLP responses for stdout.

Text output is strictly line-oriented so it pipes cleanly:
  findings     -> "<INFO_TYPE>"
  content      -> "<text>"            (one line per returned item)
  info types   -> "<INFO_TYPE>"
  categories   -> "<NAME> (<Display name>)"

JSON output is the pretty-printed response body followed by a newline.
Each renderer returns the complete output so callers can write it in one go.
*/

use serde::Serialize;
use std::fmt::Write as _;

use crate::dlp::model::{CategoryDescription, ContentItem, Finding, InfoTypeDescription};

pub fn findings(findings: &[Finding]) -> String {
    lines(findings.iter().map(|f| f.info_type.name.as_str()))
}

pub fn items(items: &[ContentItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}", item.text());
    }
    out
}

pub fn info_types(info_types: &[InfoTypeDescription]) -> String {
    lines(info_types.iter().map(|i| i.name.as_str()))
}

pub fn categories(categories: &[CategoryDescription]) -> String {
    let mut out = String::new();
    for c in categories {
        let _ = writeln!(out, "{} ({})", c.name, c.display_name);
    }
    out
}

pub fn json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut s = serde_json::to_string_pretty(value)?;
    s.push('\n');
    Ok(s)
}

fn lines<'a>(it: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for l in it {
        out.push_str(l);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlp::model::{InfoType, Likelihood};

    #[test]
    fn categories_use_name_and_display_name() {
        let cats = vec![
            CategoryDescription {
                name: "FINANCE".into(),
                display_name: "Finance".into(),
            },
            CategoryDescription {
                name: "PII".into(),
                display_name: "".into(),
            },
        ];
        assert_eq!(categories(&cats), "FINANCE (Finance)\nPII ()\n");
    }

    #[test]
    fn findings_one_line_each_in_order() {
        let f = |n: &str| Finding {
            info_type: InfoType::named(n),
            likelihood: Likelihood::Likely,
            quote: None,
        };
        assert_eq!(
            findings(&[f("US_SOCIAL_SECURITY_NUMBER"), f("EMAIL_ADDRESS")]),
            "US_SOCIAL_SECURITY_NUMBER\nEMAIL_ADDRESS\n"
        );
        assert_eq!(findings(&[]), "");
    }

    #[test]
    fn items_render_text_unchanged() {
        let it = ContentItem::text_plain("My SSN is [redacted]");
        assert_eq!(items(&[it]), "My SSN is [redacted]\n");
    }

    #[test]
    fn json_is_pretty_with_trailing_newline() {
        let s = json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(s, "{\n  \"a\": 1\n}\n");
    }
}
