//! Markdown → HTML preview.
//!
//! `render` is pure and never fails: a fragment that cannot be produced (unknown fence
//! language, malformed math) degrades on its own without touching the rest of the document.

pub mod highlight;
pub mod math;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

/// The renderer seam the session talks to.
pub trait PreviewRenderer: Send {
    fn render(&self, markdown: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl PreviewRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        render(markdown)
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH
}

pub fn render(markdown: &str) -> String {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut code: Option<(Option<String>, String)> = None;
    let mut run: Vec<(CowStr<'_>, bool)> = Vec::new();

    for (event, range) in Parser::new_ext(markdown, options()).into_offset_iter() {
        if code.is_some() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, body)) = code.take() {
                        events.push(Event::Html(CowStr::from(code_block_html(
                            lang.as_deref(),
                            &body,
                        ))));
                    }
                }
                Event::Text(text) => {
                    if let Some((_, body)) = code.as_mut() {
                        body.push_str(&text);
                    }
                }
                _ => {}
            }
            continue;
        }

        if let Event::Text(text) = event {
            // an escaped or entity-encoded `$` never delimits math
            let escaped = markdown.get(range.clone()) != Some(&*text)
                || markdown[..range.start].ends_with('\\');
            run.push((text, escaped));
            continue;
        }
        flush_text(&mut run, &mut events);

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                code = Some((lang, String::new()));
            }
            Event::InlineMath(tex) => {
                events.push(Event::InlineHtml(CowStr::from(math_fragment(&tex, false))));
            }
            Event::DisplayMath(tex) => {
                events.push(Event::InlineHtml(CowStr::from(math_fragment(&tex, true))));
            }
            other => events.push(other),
        }
    }

    flush_text(&mut run, &mut events);
    // unterminated fence at end of input
    if let Some((lang, body)) = code.take() {
        events.push(Event::Html(CowStr::from(code_block_html(lang.as_deref(), &body))));
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// pulldown-cmark refuses a `$…$` span whose braces do not balance and leaves it as text.
/// Such spans still go through the math check, which then drops them.
fn flush_text<'a>(run: &mut Vec<(CowStr<'a>, bool)>, events: &mut Vec<Event<'a>>) {
    if run.is_empty() {
        return;
    }
    let mut text = String::new();
    let mut guarded = Vec::new();
    for (piece, escaped) in run.drain(..) {
        text.push_str(&piece);
        guarded.extend(std::iter::repeat(escaped).take(piece.len()));
    }

    let mut cursor = 0;
    for span in stray_math_spans(&text, &guarded) {
        if span.start > cursor {
            events.push(Event::Text(CowStr::from(text[cursor..span.start].to_string())));
        }
        let tex = &text[span.inner.clone()];
        events.push(Event::InlineHtml(CowStr::from(math_fragment(tex, span.display))));
        cursor = span.end;
    }
    if cursor < text.len() {
        events.push(Event::Text(CowStr::from(text[cursor..].to_string())));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StraySpan {
    start: usize,
    end: usize,
    inner: std::ops::Range<usize>,
    display: bool,
}

/// Dollar spans in a text run, using the same flanking rules as inline math: the opening
/// `$` is not followed by whitespace, the closing one is not preceded by whitespace nor
/// followed by a digit. `$$…$$` has no flanking rule.
fn stray_math_spans(text: &str, guarded: &[bool]) -> Vec<StraySpan> {
    let bytes = text.as_bytes();
    let is_delim =
        |i: usize| bytes.get(i) == Some(&b'$') && !guarded.get(i).copied().unwrap_or(true);

    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !is_delim(i) {
            i += 1;
            continue;
        }
        let display = is_delim(i + 1);
        let width = if display { 2 } else { 1 };
        let body = i + width;

        let opens = display || bytes.get(body).is_some_and(|b| !b.is_ascii_whitespace());
        let close = if !opens {
            None
        } else if display {
            (body..bytes.len()).find(|&j| is_delim(j) && is_delim(j + 1))
        } else {
            (body..bytes.len()).find(|&j| {
                is_delim(j)
                    && !bytes[j - 1].is_ascii_whitespace()
                    && !bytes.get(j + 1).is_some_and(u8::is_ascii_digit)
            })
        };

        match close {
            Some(j) if j > body => {
                spans.push(StraySpan {
                    start: i,
                    end: j + width,
                    inner: body..j,
                    display,
                });
                i = j + width;
            }
            _ => i += width,
        }
    }
    spans
}

fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace()
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Highlighted fences get a language flair in front of the code. When highlighting yields
/// nothing the block falls back to plain escaped code.
fn code_block_html(lang: Option<&str>, body: &str) -> String {
    let Some(lang) = lang else {
        return format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(body));
    };

    let class = html_escape::encode_double_quoted_attribute(lang);
    let highlighted = highlight_fragment(lang, body);
    if highlighted.is_empty() {
        return format!(
            "<pre><code class=\"language-{class}\">{}</code></pre>\n",
            html_escape::encode_text(body)
        );
    }
    highlighted_block(&class, &html_escape::encode_text(lang), &highlighted)
}

fn highlighted_block(class: &str, label: &str, highlighted: &str) -> String {
    format!(
        "<pre><code class=\"language-{class}\"><div class=\"code-flair\">{label}</div>{highlighted}</code></pre>\n"
    )
}

fn highlight_fragment(lang: &str, body: &str) -> String {
    match highlight::highlight(lang, body) {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(error = %e, "code fence left unhighlighted");
            String::new()
        }
    }
}

fn math_fragment(tex: &str, display_mode: bool) -> String {
    match math::render_math(tex, display_mode) {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(error = %e, display_mode, "math fragment dropped");
            String::new()
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/preview.rs"]
mod tests;
