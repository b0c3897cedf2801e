//! TeX math fragments: macro expansion, a structural sanity check and HTML emission.
//!
//! Typesetting is left to the viewer; the preview only carries escaped TeX in tagged
//! elements. A fragment that fails the check renders as nothing.

/// `(name, expansion)`; names are matched as whole control words.
const MACROS: &[(&str, &str)] = &[("\\RR", "\\mathbb{R}")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    Empty,
    UnbalancedBraces,
    DanglingBackslash,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MathError::Empty => write!(f, "empty math expression"),
            MathError::UnbalancedBraces => write!(f, "unbalanced braces in math expression"),
            MathError::DanglingBackslash => write!(f, "math expression ends with a backslash"),
        }
    }
}

impl std::error::Error for MathError {}

pub fn expand_macros(tex: &str) -> String {
    let mut out = String::with_capacity(tex.len());
    let mut rest = tex;
    'outer: while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        for (name, expansion) in MACROS {
            if let Some(after) = tail.strip_prefix(name) {
                if !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    out.push_str(expansion);
                    rest = after;
                    continue 'outer;
                }
            }
        }
        // Not a macro: copy the backslash and the escaped char together so `\\RR` stays literal.
        let mut chars = tail.chars();
        chars.next();
        match chars.next() {
            Some(c) => {
                out.push('\\');
                out.push(c);
                rest = &tail[1 + c.len_utf8()..];
            }
            None => {
                out.push('\\');
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn validate(tex: &str) -> Result<(), MathError> {
    if tex.trim().is_empty() {
        return Err(MathError::Empty);
    }

    let mut depth = 0usize;
    let mut chars = tex.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return Err(MathError::DanglingBackslash);
                }
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1).ok_or(MathError::UnbalancedBraces)?;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(MathError::UnbalancedBraces);
    }
    Ok(())
}

pub fn render_math(tex: &str, display: bool) -> Result<String, MathError> {
    let expanded = expand_macros(tex.trim());
    validate(&expanded)?;
    let escaped = html_escape::encode_text(&expanded);
    Ok(if display {
        format!("<div class=\"math math-display\">{escaped}</div>")
    } else {
        format!("<span class=\"math math-inline\">{escaped}</span>")
    })
}
