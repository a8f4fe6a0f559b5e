//! Excerpt derivation
//!
//! Posts without a `description` get a short summary taken from the start
//! of their body. The plain excerpt is text only; the HTML excerpt keeps
//! inline formatting and closes every element it opened.

use pulldown_cmark::{html, Event, Parser, TagEnd};

use super::markdown::options;

/// Marker that ends the excerpt source early
pub const MORE_MARKER: &str = "<!-- more -->";

const ELLIPSIS: char = '\u{2026}';

/// Limit the excerpt source to the text before `<!-- more -->`
fn excerpt_source(markdown: &str) -> &str {
    match markdown.find(MORE_MARKER) {
        Some(pos) => &markdown[..pos],
        None => markdown,
    }
}

/// Plain-text excerpt of at most `max_chars` characters, including the
/// trailing ellipsis when the text had to be cut
pub fn plain_excerpt(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();

    for event in Parser::new_ext(excerpt_source(markdown), options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(end) if is_block_end(&end) => text.push(' '),
            // Raw HTML, footnote references, rules: no readable text
            _ => {}
        }
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_words(&collapsed, max_chars)
}

/// HTML excerpt holding at most `max_chars` characters of text.
/// Raw inline HTML is dropped so every emitted tag is one the Markdown
/// renderer opened, and all open tags are closed at the cut.
pub fn html_excerpt(markdown: &str, max_chars: usize) -> String {
    let mut events: Vec<Event> = Vec::new();
    let mut open: Vec<TagEnd> = Vec::new();
    let mut used = 0;

    for event in Parser::new_ext(excerpt_source(markdown), options()) {
        match event {
            Event::Start(tag) => {
                open.push(tag.to_end());
                events.push(Event::Start(tag));
            }
            Event::End(end) => {
                open.pop();
                events.push(Event::End(end));
            }
            Event::Text(t) if used + t.chars().count() > max_chars => {
                let cut = truncate_words(&t, max_chars - used);
                events.push(Event::Text(cut.into()));
                break;
            }
            Event::Code(t) if used + t.chars().count() > max_chars => {
                let cut = truncate_words(&t, max_chars - used);
                if !cut.is_empty() {
                    events.push(Event::Code(cut.into()));
                }
                break;
            }
            Event::Text(t) => {
                used += t.chars().count();
                events.push(Event::Text(t));
            }
            Event::Code(t) => {
                used += t.chars().count();
                events.push(Event::Code(t));
            }
            Event::Html(_) | Event::InlineHtml(_) => {}
            other => events.push(other),
        }
    }

    while let Some(end) = open.pop() {
        events.push(Event::End(end));
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out.trim_end().to_string()
}

fn is_block_end(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote { .. }
            | TagEnd::CodeBlock
            | TagEnd::Item
            | TagEnd::TableCell
            | TagEnd::TableRow
            | TagEnd::FootnoteDefinition
    )
}

/// Cut `text` to at most `max_chars` characters, preferring a word
/// boundary, and mark the cut with an ellipsis
fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    // Leave room for the ellipsis
    let keep = max_chars - 1;
    let head: String = text.chars().take(keep).collect();
    let next_is_space = text.chars().nth(keep).is_some_and(char::is_whitespace);

    let cut = if next_is_space {
        head.as_str()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(pos) if pos > 0 => &head[..pos],
            _ => head.as_str(),
        }
    };

    let mut out = cut.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}
