use crate::html::{self, SegmentKind};
use forgeview_core::catalog::{IssueLookup, LinkBuilder};
use forgeview_core::config::ReferencesConfig;
use forgeview_core::constants;
use forgeview_core::types::{Issue, IssueNumber, Project};
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// One `#<digits>` occurrence inside a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMatch {
    /// Byte offset of the marker.
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
    pub number: IssueNumber,
}

/// Output of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub html: String,
    /// Resolved issues, once each, in order of first occurrence.
    pub references: Vec<Issue>,
}

/// Replaces issue references in rendered content with links.
#[derive(Debug, Clone)]
pub struct ReferenceRewriter<L, U> {
    lookup: L,
    links: U,
    marker: char,
    pattern: Regex,
    link_class: String,
    skip_elements: Vec<String>,
}

impl<L, U> ReferenceRewriter<L, U>
where
    L: IssueLookup,
    U: LinkBuilder,
{
    pub fn new(lookup: L, links: U) -> Self {
        Self::with_config(lookup, links, &ReferencesConfig::default())
    }

    /// Build a rewriter from a validated [`ReferencesConfig`].
    pub fn with_config(lookup: L, links: U, config: &ReferencesConfig) -> Self {
        let marker = config.marker_char();
        let link_class = if config.link_class.trim().is_empty() {
            constants::DEFAULT_LINK_CLASS.to_string()
        } else {
            config.link_class.clone()
        };
        Self {
            lookup,
            links,
            marker,
            pattern: reference_pattern(marker),
            link_class,
            skip_elements: config.skip_elements.clone(),
        }
    }

    /// Rewrite every resolvable reference in `content`, scoped to `project`.
    ///
    /// Unknown issue numbers are left byte-identical. Text inside skipped
    /// elements (links and code by default) is never touched.
    pub fn rewrite(&self, content: &str, project: &Project) -> Rewritten {
        let mut out = String::with_capacity(content.len());
        let mut references = Vec::new();
        let mut seen = HashSet::new();
        let mut found = 0usize;

        for segment in html::segments(content, &self.skip_elements) {
            if segment.kind != SegmentKind::Text {
                out.push_str(segment.text);
                continue;
            }

            let text = segment.text;
            let mut cursor = 0;
            for m in find_matches(&self.pattern, self.marker, text) {
                found += 1;
                let Some(issue) = self.lookup.find_issue(project, m.number) else {
                    continue;
                };
                out.push_str(&text[cursor..m.start]);
                out.push_str(&self.link_fragment(&issue, &text[m.start..m.end]));
                cursor = m.end;
                if seen.insert(issue.number) {
                    references.push(issue);
                }
            }
            out.push_str(&text[cursor..]);
        }

        debug!(
            project = %project.path,
            found,
            linked = references.len(),
            "rewrite issue references"
        );
        Rewritten {
            html: out,
            references,
        }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    fn link_fragment(&self, issue: &Issue, visible: &str) -> String {
        format!(
            "<a href='{}' class='{}'>{}</a>",
            html::escape_attr(&self.links.issue_url(issue)),
            html::escape_attr(&self.link_class),
            visible
        )
    }
}

fn reference_pattern(marker: char) -> Regex {
    let source = format!("{}([0-9]+)", regex::escape(&marker.to_string()));
    Regex::new(&source).expect("reference pattern is built from an escaped literal")
}

/// Find `marker` + digit runs in plain text that stand alone as tokens.
///
/// A match must not follow a word character or `&` (which would make it part
/// of a word or a numeric character entity) and must not be followed by a word
/// character or another marker, so glued tokens like `#1#2` stay literal.
/// Numbers that overflow `u64` are ignored.
pub fn scan_references(text: &str, marker: char) -> Vec<ReferenceMatch> {
    find_matches(&reference_pattern(marker), marker, text)
}

fn find_matches(pattern: &Regex, marker: char, text: &str) -> Vec<ReferenceMatch> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let digits = caps.get(1)?;
            let before = text[..whole.start()].chars().next_back();
            if before.is_some_and(|c| is_word_char(c) || c == '&') {
                return None;
            }
            let after = text[whole.end()..].chars().next();
            if after.is_some_and(|c| is_word_char(c) || c == marker) {
                return None;
            }
            let number = digits.as_str().parse().ok()?;
            Some(ReferenceMatch {
                start: whole.start(),
                end: whole.end(),
                number,
            })
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
