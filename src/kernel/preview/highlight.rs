//! Code fence highlighting with tree-sitter.
//!
//! Produces escaped HTML with `hljs-*` span classes so existing highlight.js themes apply.

use tree_sitter::{Parser, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageId {
    Rust,
    Go,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
}

impl LanguageId {
    /// Resolves a code fence info word (`rust`, `py`, `ts`, ...).
    pub fn from_fence(lang: &str) -> Option<Self> {
        match lang.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Some(Self::Rust),
            "go" | "golang" => Some(Self::Go),
            "python" | "py" | "python3" => Some(Self::Python),
            "javascript" | "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Comment,
    String,
    Keyword,
    Type,
    Number,
    Attribute,
    Lifetime,
}

impl HighlightKind {
    fn css_class(self) -> &'static str {
        match self {
            HighlightKind::Comment => "hljs-comment",
            HighlightKind::String => "hljs-string",
            HighlightKind::Keyword => "hljs-keyword",
            HighlightKind::Type => "hljs-type",
            HighlightKind::Number => "hljs-number",
            HighlightKind::Attribute => "hljs-meta",
            HighlightKind::Lifetime => "hljs-symbol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HighlightSpan {
    start: usize,
    end: usize,
    kind: HighlightKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    UnsupportedLanguage(String),
    GrammarUnavailable(LanguageId),
    ParseFailed(LanguageId),
}

impl std::fmt::Display for HighlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HighlightError::UnsupportedLanguage(lang) => {
                write!(f, "unsupported highlight language: {}", lang)
            }
            HighlightError::GrammarUnavailable(lang) => {
                write!(f, "grammar could not be loaded: {:?}", lang)
            }
            HighlightError::ParseFailed(lang) => write!(f, "parse failed: {:?}", lang),
        }
    }
}

impl std::error::Error for HighlightError {}

/// Highlights `code` written in the fence language `lang`.
pub fn highlight(lang: &str, code: &str) -> Result<String, HighlightError> {
    let language = LanguageId::from_fence(lang)
        .ok_or_else(|| HighlightError::UnsupportedLanguage(lang.to_string()))?;
    let tree = parse(language, code)?;
    let spans = collect_highlights(language, &tree);
    Ok(spans_to_html(code, &spans))
}

fn parse(language: LanguageId, code: &str) -> Result<Tree, HighlightError> {
    let mut parser = Parser::new();
    let language_set = match language {
        LanguageId::Rust => parser.set_language(tree_sitter_rust::language()).is_ok(),
        LanguageId::Go => parser.set_language(tree_sitter_go::language()).is_ok(),
        LanguageId::Python => parser.set_language(tree_sitter_python::language()).is_ok(),
        LanguageId::JavaScript => parser
            .set_language(tree_sitter_javascript::language())
            .is_ok(),
        LanguageId::TypeScript => parser
            .set_language(tree_sitter_typescript::language_typescript())
            .is_ok(),
        LanguageId::Tsx => parser
            .set_language(tree_sitter_typescript::language_tsx())
            .is_ok(),
    };
    if !language_set {
        return Err(HighlightError::GrammarUnavailable(language));
    }

    parser
        .parse(code, None)
        .ok_or(HighlightError::ParseFailed(language))
}

fn spans_to_html(code: &str, spans: &[HighlightSpan]) -> String {
    let mut out = String::with_capacity(code.len() + spans.len() * 32);
    let mut pos = 0usize;
    for span in spans {
        // nested/overlapping nodes: the outermost (earliest) span wins
        if span.start < pos || span.end > code.len() || span.start >= span.end {
            continue;
        }
        let (Some(gap), Some(body)) = (code.get(pos..span.start), code.get(span.start..span.end))
        else {
            continue;
        };
        out.push_str(&html_escape::encode_text(gap));
        out.push_str("<span class=\"");
        out.push_str(span.kind.css_class());
        out.push_str("\">");
        out.push_str(&html_escape::encode_text(body));
        out.push_str("</span>");
        pos = span.end;
    }
    if let Some(tail) = code.get(pos..) {
        out.push_str(&html_escape::encode_text(tail));
    }
    out
}

fn collect_highlights(language: LanguageId, tree: &Tree) -> Vec<HighlightSpan> {
    let root = tree.root_node();
    let mut stack = vec![root];
    let mut spans = Vec::new();

    while let Some(node) = stack.pop() {
        if let Some(kind) = classify_node(language, node.kind()) {
            spans.push(HighlightSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                kind,
            });

            if matches!(
                kind,
                HighlightKind::Comment | HighlightKind::String | HighlightKind::Attribute
            ) {
                continue;
            }
        }

        let child_count = node.child_count();
        for i in (0..child_count).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    spans
}

fn classify_node(language: LanguageId, kind: &str) -> Option<HighlightKind> {
    if kind.contains("comment") {
        return Some(HighlightKind::Comment);
    }
    if kind.contains("string") || matches!(kind, "char_literal" | "byte_literal") {
        return Some(HighlightKind::String);
    }
    if kind.contains("integer") || kind.contains("float") || kind.contains("number") {
        return Some(HighlightKind::Number);
    }
    if kind.ends_with("_literal") && (kind.contains("int") || kind.contains("imaginary")) {
        return Some(HighlightKind::Number);
    }
    if matches!(
        kind,
        "type_identifier" | "primitive_type" | "predefined_type"
    ) {
        return Some(HighlightKind::Type);
    }
    if matches!(
        kind,
        "attribute_item" | "inner_attribute_item" | "decorator"
    ) {
        return Some(HighlightKind::Attribute);
    }
    if kind == "lifetime" {
        return Some(HighlightKind::Lifetime);
    }
    if is_keyword(language, kind) {
        return Some(HighlightKind::Keyword);
    }
    None
}

fn is_keyword(language: LanguageId, kind: &str) -> bool {
    let words: &[&str] = match language {
        LanguageId::Rust => RUST_KEYWORDS,
        LanguageId::Go => GO_KEYWORDS,
        LanguageId::Python => PYTHON_KEYWORDS,
        LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx => JS_TS_KEYWORDS,
    };
    words.contains(&kind)
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "case", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const JS_TS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for", "from",
    "function", "if", "import", "in", "instanceof", "interface", "let", "new", "null", "of",
    "private", "protected", "public", "readonly", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "type", "typeof", "undefined", "var", "void", "while", "with",
    "yield",
];
