use super::conditions::eval_condition;
use super::{DefineTable, HeaderError};

struct Frame {
    opened_at: usize,
    parent_active: bool,
    active: bool,
    taken: bool,
    seen_else: bool,
}

impl DefineTable {
    /// Run a header through `#define`/`#undef` and conditional blocks.
    ///
    /// Commented-out directives (`//#define X`) and anything inside `/* */`
    /// are ignored.
    pub fn parse(text: &str) -> Result<Self, HeaderError> {
        let mut table = DefineTable::default();
        let mut frames: Vec<Frame> = Vec::new();
        let mut in_block_comment = false;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let code = strip_comments(raw, &mut in_block_comment);
            let Some(directive) = code.trim().strip_prefix('#') else {
                continue;
            };
            let (keyword, rest) = split_keyword(directive.trim_start());
            let active = frames.last().is_none_or(|f| f.active);

            match keyword {
                "if" | "ifdef" | "ifndef" => {
                    let cond = match keyword {
                        "ifdef" => table.is_defined(rest.trim()),
                        "ifndef" => !table.is_defined(rest.trim()),
                        _ => active && eval_condition(rest, &table),
                    };
                    frames.push(Frame {
                        opened_at: line_no,
                        parent_active: active,
                        active: active && cond,
                        taken: cond,
                        seen_else: false,
                    });
                }
                "elif" => {
                    let frame = frames
                        .last_mut()
                        .ok_or_else(|| unbalanced(line_no, keyword))?;
                    if frame.seen_else {
                        return Err(unbalanced(line_no, keyword));
                    }
                    if frame.taken {
                        frame.active = false;
                    } else {
                        let cond = frame.parent_active && eval_condition(rest, &table);
                        frame.active = cond;
                        frame.taken = cond;
                    }
                }
                "else" => {
                    let frame = frames
                        .last_mut()
                        .ok_or_else(|| unbalanced(line_no, keyword))?;
                    if frame.seen_else {
                        return Err(HeaderError::DuplicateElse { line: line_no });
                    }
                    frame.seen_else = true;
                    frame.active = frame.parent_active && !frame.taken;
                    frame.taken = true;
                }
                "endif" => {
                    frames.pop().ok_or_else(|| unbalanced(line_no, keyword))?;
                }
                "define" if active => {
                    let (name, value) =
                        parse_define(rest).ok_or(HeaderError::MalformedDefine { line: line_no })?;
                    table.insert(name, value);
                }
                "undef" if active => {
                    table.remove(rest.trim());
                }
                _ => {}
            }
        }

        if let Some(frame) = frames.last() {
            return Err(HeaderError::Unterminated {
                line: frame.opened_at,
            });
        }
        Ok(table)
    }
}

fn unbalanced(line: usize, directive: &str) -> HeaderError {
    HeaderError::UnbalancedDirective {
        line,
        directive: directive.to_string(),
    }
}

fn split_keyword(directive: &str) -> (&str, &str) {
    let end = directive
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(directive.len());
    (&directive[..end], &directive[end..])
}

fn parse_define(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let name = &rest[..end];
    let mut value = &rest[end..];

    // Function-like macro: drop the parameter list.
    if let Some(params) = value.strip_prefix('(') {
        let close = params.find(')')?;
        value = &params[close + 1..];
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Remove `//` and `/* */` comments outside string and char literals.
fn strip_comments(line: &str, in_block_comment: &mut bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if *in_block_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block_comment = false;
                out.push(' ');
            }
            continue;
        }
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block_comment = true;
            }
            _ => out.push(c),
        }
    }
    out
}

/// Decode a C string literal such as `"PEI1"`.
pub(super) fn decode_c_string(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                '0' => out.push('\0'),
                other => out.push(other),
            },
            '"' => return None,
            _ => out.push(c),
        }
    }
    Some(out)
}

/// Encode text as a C string literal.
pub(super) fn encode_c_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[path = "../tests/header/defines_tests.rs"]
mod tests;
