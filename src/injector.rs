//! The marker injector: applies an ordered rule set to document text.
//!
//! Each rule's literal pattern is compiled into a regular expression by
//! escaping every regex metacharacter and collapsing each whitespace
//! run to `\s+`. A match is therefore order-sensitive in its tokens but
//! insensitive to line breaks and indentation between them, which is
//! what markup formatting drifts on.
//!
//! Rules are applied strictly in order, each pass operating on the
//! output of the previous one. A rule that matches nowhere is skipped
//! and reported, never an error. A rule whose key is already present
//! as a `data-i18n` attribute is skipped too, so a second run over
//! already-marked output is a no-op.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use tracing::debug;

use crate::error::{Error, Result};
use crate::rules::{Rule, RuleSet};

lazy_static! {
    /// Matches an existing marker attribute and captures its key.
    static ref MARKER: Regex = Regex::new(r#"data-i18n="([^"]+)""#).unwrap();
}

/// What happened to a single rule during a transform pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The pattern matched; all occurrences were replaced.
    Replaced(usize),
    /// The pattern matched nowhere. Not an error; the fragment may
    /// have drifted or been removed from the document.
    NoMatch,
    /// The document already carries this rule's key; the rule was
    /// skipped to keep reruns idempotent.
    AlreadyMarked,
}

/// Per-rule record of a transform pass, in rule order.
#[derive(Debug, Clone)]
pub struct RuleReport {
    pub key: String,
    pub outcome: RuleOutcome,
}

/// Compiles a literal pattern into its whitespace-tolerant regex.
///
/// Metacharacter escaping follows `regex_syntax::escape`; whitespace
/// runs become `\s+`, which also spans line breaks.
fn compile_pattern(rule: &Rule) -> Result<Regex> {
    let pattern = &rule.pattern;
    let mut buf = String::with_capacity(pattern.len() + 8);
    let mut in_whitespace = false;
    for c in pattern.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                buf.push_str(r"\s+");
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if is_meta_character(c) {
            buf.push('\\');
        }
        buf.push(c);
    }
    Regex::new(&buf).map_err(|source| Error::Pattern {
        key: rule.key.clone(),
        source,
    })
}

pub fn is_meta_character(c: char) -> bool {
    matches!(
        c,
        '\\' | '.'
            | '+'
            | '*'
            | '?'
            | '('
            | ')'
            | '|'
            | '['
            | ']'
            | '{'
            | '}'
            | '^'
            | '$'
            | '#'
            | '&'
            | '-'
            | '~'
    )
}

/// Applies every rule of `rules`, in order, to `document`.
///
/// Pure with respect to the filesystem: takes document text, returns
/// transformed text plus a per-rule report. The caller owns all I/O.
///
/// # Returns
///
/// * `Ok((transformed, reports))`; `transformed` equals the input
///   when no rule matched.
/// * `Err(Error::Pattern)` if a rule's pattern fails to compile.
pub fn transform(document: &str, rules: &RuleSet) -> Result<(String, Vec<RuleReport>)> {
    // Keys already present in the document, so reruns never double-mark.
    let mut marked: HashSet<String> = MARKER
        .captures_iter(document)
        .map(|caps| caps[1].to_string())
        .collect();

    let mut doc = document.to_string();
    let mut reports = Vec::with_capacity(rules.len());

    for rule in rules.iter() {
        if marked.contains(&rule.key) {
            debug!(key = %rule.key, "already marked, skipping");
            reports.push(RuleReport {
                key: rule.key.clone(),
                outcome: RuleOutcome::AlreadyMarked,
            });
            continue;
        }

        let re = compile_pattern(rule)?;
        let count = re.find_iter(&doc).count();
        if count == 0 {
            debug!(key = %rule.key, "no match");
            reports.push(RuleReport {
                key: rule.key.clone(),
                outcome: RuleOutcome::NoMatch,
            });
            continue;
        }

        // NoExpand: templates are verbatim text, not capture references.
        doc = re
            .replace_all(&doc, NoExpand(rule.template.as_str()))
            .into_owned();
        debug!(key = %rule.key, occurrences = count, "marked");

        // The template may inject keys beyond the rule's own (cluster
        // rules); all of them now guard later rules.
        for caps in MARKER.captures_iter(&rule.template) {
            marked.insert(caps[1].to_string());
        }

        reports.push(RuleReport {
            key: rule.key.clone(),
            outcome: RuleOutcome::Replaced(count),
        });
    }

    Ok((doc, reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{builtin_rules, Rule, RuleSet};

    fn single_rule(key: &str, pattern: &str, template: &str) -> RuleSet {
        RuleSet::new(vec![Rule {
            pattern: pattern.to_string(),
            key: key.to_string(),
            template: template.to_string(),
        }])
        .unwrap()
    }

    #[test]
    fn test_careers_heading_is_marked() {
        let doc = "<footer>\n    <h4>Кариери</h4>\n</footer>\n";
        let (out, reports) = transform(doc, builtin_rules()).unwrap();
        assert!(out.contains(r#"<h4 data-i18n="footer.careers">Кариери</h4>"#));
        // Nothing else on that line changes.
        assert!(out.starts_with("<footer>\n    <h4"));
        assert!(out.ends_with("</h4>\n</footer>\n"));

        let careers = reports
            .iter()
            .find(|r| r.key == "footer.careers")
            .unwrap();
        assert_eq!(careers.outcome, RuleOutcome::Replaced(1));
        // Every other rule mismatches silently.
        let replaced = reports
            .iter()
            .filter(|r| matches!(r.outcome, RuleOutcome::Replaced(_)))
            .count();
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_untouched_document_is_returned_unchanged() {
        let doc = "<html><body><p>Nothing to mark here.</p></body></html>";
        let (out, reports) = transform(doc, builtin_rules()).unwrap();
        assert_eq!(out, doc);
        assert!(reports
            .iter()
            .all(|r| r.outcome == RuleOutcome::NoMatch));
    }

    #[test]
    fn test_whitespace_variation_still_matches() {
        // Pattern written on one line, document split across lines.
        let rules = single_rule(
            "products.storage.tagline",
            r#"<p class="product-tagline">Сигурно и ефективно съхранение на данни, оптимизирано за съвременните кибер заплахи</p>"#,
            r#"<p class="product-tagline" data-i18n="products.storage.tagline">Сигурно и ефективно съхранение на данни, оптимизирано за съвременните кибер заплахи</p>"#,
        );
        let doc = "<p class=\"product-tagline\">Сигурно и ефективно съхранение на данни, оптимизирано за\n                        съвременните кибер заплахи</p>";
        let (out, reports) = transform(doc, &rules).unwrap();
        assert!(out.contains(r#"data-i18n="products.storage.tagline""#));
        assert_eq!(reports[0].outcome, RuleOutcome::Replaced(1));
    }

    #[test]
    fn test_all_occurrences_are_replaced() {
        let rules = single_rule(
            "footer.help",
            "<h4>Помощ</h4>",
            r#"<h4 data-i18n="footer.help">Помощ</h4>"#,
        );
        let doc = "<h4>Помощ</h4>\n<h4>Помощ</h4>\n";
        let (out, reports) = transform(doc, &rules).unwrap();
        assert_eq!(reports[0].outcome, RuleOutcome::Replaced(2));
        assert_eq!(out.matches(r#"data-i18n="footer.help""#).count(), 2);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let doc = "<h4>Кариери</h4>\n<h4>Медия център</h4>\n";
        let (once, _) = transform(doc, builtin_rules()).unwrap();
        let (twice, reports) = transform(&once, builtin_rules()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            reports
                .iter()
                .find(|r| r.key == "footer.careers")
                .unwrap()
                .outcome,
            RuleOutcome::AlreadyMarked
        );
        // No marker is ever duplicated.
        assert_eq!(twice.matches(r#"data-i18n="footer.careers""#).count(), 1);
    }

    #[test]
    fn test_cluster_template_keys_guard_later_rules() {
        // A template that injects a secondary key blocks a later rule
        // carrying that key as its own.
        let rules = RuleSet::new(vec![
            Rule {
                pattern: "<h2>Title</h2> <p>Body</p>".to_string(),
                key: "card.title".to_string(),
                template: concat!(
                    r#"<h2 data-i18n="card.title">Title</h2>"#,
                    "\n",
                    r#"<p data-i18n="card.body">Body</p>"#
                )
                .to_string(),
            },
            Rule {
                pattern: "<p>Body</p>".to_string(),
                key: "card.body".to_string(),
                template: r#"<p data-i18n="card.body">Body</p>"#.to_string(),
            },
        ])
        .unwrap();

        let doc = "<h2>Title</h2>\n<p>Body</p>";
        let (out, reports) = transform(doc, &rules).unwrap();
        assert_eq!(reports[0].outcome, RuleOutcome::Replaced(1));
        assert_eq!(reports[1].outcome, RuleOutcome::AlreadyMarked);
        assert_eq!(out.matches(r#"data-i18n="card.body""#).count(), 1);
    }

    #[test]
    fn test_metacharacters_in_patterns_are_literal() {
        // '.', '&', '-' and '#' all appear in real rules; none may act
        // as regex syntax.
        let rules = single_rule(
            "footer.copyright",
            "<p>&copy; 2025 А1 България. Всички права запазени.</p>",
            r#"<p data-i18n="footer.copyright">&copy; 2025 А1 България. Всички права запазени.</p>"#,
        );
        // The '.' must not match an arbitrary character.
        let doc = "<p>&copy; 2025 А1 БългарияX Всички права запазениX</p>";
        let (out, reports) = transform(doc, &rules).unwrap();
        assert_eq!(out, doc);
        assert_eq!(reports[0].outcome, RuleOutcome::NoMatch);
    }

    #[test]
    fn test_full_page_fixture() {
        // A condensed fixture with one fragment per page section.
        let doc = concat!(
            "<nav>\n",
            "    <li><a href=\"#solutions\">Защо да изберете нас<svg></svg></a></li>\n",
            "    <span class=\"dark-mode-label\">Тъмен режим</span>\n",
            "</nav>\n",
            "<section>\n",
            "    <h2 class=\"section-title\">Заявете консултация с експерт</h2>\n",
            "    <h3>Следващи стъпки</h3>\n",
            "</section>\n",
            "<footer>\n",
            "    <h4>За А1</h4>\n",
            "    <li><a href=\"https://www.a1.bg/5g\" target=\"_blank\">5G мрежа</a></li>\n",
            "    <p>&copy; 2025 А1 България. Всички права запазени.</p>\n",
            "</footer>\n"
        );
        let (out, reports) = transform(doc, builtin_rules()).unwrap();
        for key in [
            "nav.whyChooseUs",
            "nav.darkMode",
            "contact.sectionTitle",
            "contact.nextStepsTitle",
            "footer.aboutA1",
            "footer.network5g",
            "footer.copyright",
        ] {
            let marker = format!(r#"data-i18n="{key}""#);
            assert_eq!(out.matches(&marker).count(), 1, "missing marker {key}");
            assert_eq!(
                reports.iter().find(|r| r.key == key).unwrap().outcome,
                RuleOutcome::Replaced(1)
            );
        }
        // Visible text is preserved.
        for text in ["Защо да изберете нас", "Тъмен режим", "5G мрежа"] {
            assert!(out.contains(text));
        }
    }
}
