use super::*;

#[test]
fn renders_plain_markdown() {
    let html = render("# Title\n\nSome *emphasis*.");
    assert!(html.contains("<h1>Title</h1>"), "{html}");
    assert!(html.contains("<em>emphasis</em>"), "{html}");
}

#[test]
fn empty_document_renders_empty() {
    assert_eq!(render(""), "");
}

#[test]
fn supported_fence_gets_flair_and_highlight() {
    let html = render("```rust\nfn main() {}\n```\n");
    assert!(
        html.contains("<pre><code class=\"language-rust\"><div class=\"code-flair\">rust</div>"),
        "{html}"
    );
    assert!(html.contains("hljs-keyword"), "{html}");
}

#[test]
fn unsupported_fence_falls_back_to_escaped_code() {
    let html = render("```cobol\nX < Y\n```\n");
    assert_eq!(
        html,
        "<pre><code class=\"language-cobol\">X &lt; Y\n</code></pre>\n"
    );
}

#[test]
fn indented_code_is_escaped() {
    let html = render("    a && b\n");
    assert_eq!(html, "<pre><code>a &amp;&amp; b\n</code></pre>\n");
}

#[test]
fn fence_failure_does_not_affect_rest_of_document() {
    let html = render("```cobol\nx\n```\n\n# After\n");
    assert!(html.contains("<h1>After</h1>"), "{html}");
}

#[test]
fn inline_math_expands_macros() {
    let html = render("Let $x \\in \\RR$ hold.");
    assert!(
        html.contains("<span class=\"math math-inline\">x \\in \\mathbb{R}</span>"),
        "{html}"
    );
}

#[test]
fn display_math_is_tagged() {
    let html = render("$$\\RR^n$$");
    assert!(
        html.contains("<div class=\"math math-display\">\\mathbb{R}^n</div>"),
        "{html}"
    );
}

#[test]
fn malformed_math_degrades_to_nothing() {
    let html = render("before $\\frac{1$ after");
    assert!(!html.contains("frac"), "{html}");
    assert!(html.contains("before "), "{html}");
    assert!(html.contains(" after"), "{html}");
}

#[test]
fn malformed_display_math_degrades_to_nothing() {
    let html = render("a $$\\sqrt{x$$ b");
    assert!(!html.contains("sqrt"), "{html}");
    assert!(!html.contains('$'), "{html}");
    assert!(html.contains("a "), "{html}");
    assert!(html.contains(" b"), "{html}");
}

#[test]
fn math_keeps_rendering_around_a_dropped_fragment() {
    let html = render("$\\frac{1$ then $x^2$ then $$y$$");
    assert!(!html.contains("frac"), "{html}");
    assert!(html.contains("<span class=\"math math-inline\">x^2</span>"), "{html}");
    assert!(html.contains("<div class=\"math math-display\">y</div>"), "{html}");
}

#[test]
fn lone_and_escaped_dollars_stay_text() {
    let html = render("costs $5 today");
    assert!(html.contains("costs $5 today"), "{html}");
    assert!(!html.contains("math"), "{html}");

    let html = render("\\$\\frac{1\\$");
    assert!(html.contains("$\\frac{1$"), "{html}");
}

#[test]
fn renderer_trait_matches_free_function() {
    let text = "- [x] done\n- [ ] todo\n";
    assert_eq!(MarkdownRenderer.render(text), render(text));
}
