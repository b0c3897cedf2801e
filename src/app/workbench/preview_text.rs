//! 预览面板：把渲染出的 HTML 压成终端可读的文本行

/// Tags that end a visual block; they become line breaks.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "blockquote", "ul",
    "ol", "table", "hr", "br",
];

pub fn preview_lines(html: &str) -> Vec<String> {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name == "li" && !tag.starts_with('/') {
            text.push_str("• ");
        } else if BLOCK_TAGS.contains(&name.as_str())
            && (tag.starts_with('/') || matches!(name.as_str(), "br" | "hr"))
        {
            text.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    text.push_str(rest);

    let decoded = html_escape::decode_html_entities(&text);
    let mut lines: Vec<String> = decoded.lines().map(str::to_string).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}
