use regex::Regex;
use std::sync::LazyLock;

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<[A-Za-z/!?](?:[^>"']|"[^"]*"|'[^']*')*>"#)
        .expect("markup regex must compile")
});

static TAG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9-]*)").expect("tag name regex must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A tag, comment, doctype or processing instruction.
    Markup,
    /// Text that may be scanned and rewritten.
    Text,
    /// Text nested inside a skipped element.
    SkippedText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

/// Split an HTML fragment into markup and text segments.
///
/// Concatenating the `text` of every returned segment reproduces `html`
/// exactly. Text inside any element named in `skip_elements` (compared
/// case-insensitively) is reported as [`SegmentKind::SkippedText`]. Unbalanced
/// closing tags are ignored.
pub fn segments<'a, S: AsRef<str>>(html: &'a str, skip_elements: &[S]) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut skip_depth = 0usize;
    let mut cursor = 0usize;

    let text_kind = |depth: usize| {
        if depth > 0 {
            SegmentKind::SkippedText
        } else {
            SegmentKind::Text
        }
    };

    for m in MARKUP_RE.find_iter(html) {
        if m.start() > cursor {
            out.push(Segment {
                kind: text_kind(skip_depth),
                text: &html[cursor..m.start()],
            });
        }
        let tag = m.as_str();
        out.push(Segment {
            kind: SegmentKind::Markup,
            text: tag,
        });
        cursor = m.end();

        let Some(caps) = TAG_NAME_RE.captures(tag) else {
            continue;
        };
        let closing = !caps[1].is_empty();
        let name = &caps[2];
        if !skip_elements
            .iter()
            .any(|s| s.as_ref().eq_ignore_ascii_case(name))
        {
            continue;
        }
        if closing {
            skip_depth = skip_depth.saturating_sub(1);
        } else if !tag.ends_with("/>") {
            skip_depth += 1;
        }
    }

    if cursor < html.len() {
        out.push(Segment {
            kind: text_kind(skip_depth),
            text: &html[cursor..],
        });
    }
    out
}

/// Escape a value for use inside a quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
