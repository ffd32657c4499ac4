//! Recovery of a JSON object from free-form completion text
//! 从自由格式补全文本中提取JSON对象
//!
//! Models frequently wrap their answer in markdown fences or add a sentence
//! before it. `extract_json_candidate` returns the text most likely to be the
//! intended JSON value; it never fails; parsing is left to the caller.

const FENCE: &str = "```";

/// Line-based markdown fence stripper / 基于行的markdown代码块剥离
///
/// Delimiter lines toggle the "inside fence" state and are dropped. Lines are
/// kept while inside a fence or from the first line starting with `{`, and
/// collection stops after the first line that ends with `}`.
pub fn strip_markdown_fences(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut inside = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(FENCE) {
            inside = !inside;
            continue;
        }
        if inside || trimmed.starts_with('{') || !kept.is_empty() {
            kept.push(line);
            if trimmed.ends_with('}') {
                break;
            }
        }
    }

    kept.join("\n")
}

/// Balanced `{...}` span opening at byte `start` / 从`start`开始的括号平衡片段
///
/// Braces inside JSON string literals (including escaped quotes) do not count.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Balanced spans in order of appearance / 按出现顺序的括号平衡片段
///
/// Scanning resumes after the end of each span, so objects nested inside an
/// earlier span are not yielded on their own. An opening brace that never
/// closes encloses the rest of the text and ends the scan.
fn balanced_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut from = Some(0usize);
    std::iter::from_fn(move || {
        let offset = from?;
        let start = offset + text[offset..].find('{')?;
        let span = balanced_object_at(text, start);
        from = span.map(|s| start + s.len());
        span
    })
}

/// Finds the first balanced `{...}` span / 查找第一个括号平衡的`{...}`片段
///
/// Returns `None` when no opening brace ever closes.
pub fn find_balanced_object(text: &str) -> Option<&str> {
    balanced_objects(text).next()
}

/// Candidate JSON text for a raw completion / 原始补全的候选JSON文本
///
/// The first balanced span that parses as a JSON object wins; spans such as
/// `{score}` in a preamble are passed over. If none parses, the first balanced
/// span is returned so the caller sees the malformed text. With no balanced
/// span at all, fenced completions are unwrapped so a fenced non-object value
/// still reaches the parser intact; anything else is returned trimmed.
pub fn extract_json_candidate(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(object) = balanced_objects(trimmed).find(|span| {
        matches!(
            serde_json::from_str::<serde_json::Value>(span),
            Ok(serde_json::Value::Object(_))
        )
    }) {
        return object.to_string();
    }

    if let Some(object) = find_balanced_object(trimmed) {
        return object.to_string();
    }

    if trimmed.starts_with(FENCE) {
        return strip_markdown_fences(trimmed).trim().to_string();
    }

    trimmed.to_string()
}
