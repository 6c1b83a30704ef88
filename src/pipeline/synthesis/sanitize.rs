// Sanitize free text before it is rendered into the model payload.
// Strips invisible Unicode and instruction-override lines, normalizes whitespace.
// The consistency checker never sees this output; it works on the raw answers.

/// Maximum length of a single free-text field sent to the model (characters).
const MAX_FIELD_LENGTH: usize = 4_000;

/// Sanitize a free-text field for the prompt.
pub fn sanitize_prompt_text(raw: &str) -> String {
    sanitize_prompt_text_with_audit(raw, None)
}

/// Sanitize a free-text field, logging how many lines were dropped.
/// Only the field name is logged, never the content (PHI risk).
pub fn sanitize_prompt_text_with_audit(raw: &str, field: Option<&str>) -> String {
    let cleaned = remove_invisible_chars(raw);
    let (no_injection, removed_count) = remove_injection_lines(&cleaned);

    if removed_count > 0 {
        tracing::warn!(
            field = field.unwrap_or("unknown"),
            removed_lines = removed_count,
            "Instruction-like lines removed from prompt input"
        );
    }

    let normalized = normalize_whitespace(&no_injection);
    truncate_to_max_length(&normalized, MAX_FIELD_LENGTH)
}

/// Remove zero-width, bidi-control and other invisible characters.
/// Keeps space, tab and newline.
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t') {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

fn is_role_marker(lower: &str) -> bool {
    const MARKERS: &[&str] = &[
        "system:",
        "assistant:",
        "user:",
        "[system]",
        "[assistant]",
        "[inst]",
        "[/inst]",
        "<<sys>>",
        "note to ai:",
    ];
    MARKERS.iter().any(|m| lower.starts_with(m))
}

fn is_override_attempt(lower: &str) -> bool {
    const PHRASES: &[&str] = &[
        "ignore previous instructions",
        "ignore all instructions",
        "ignore the above instructions",
        "disregard your instructions",
        "disregard all instructions",
        "forget your instructions",
        "new instructions:",
        "override:",
    ];
    PHRASES.iter().any(|p| lower.contains(p))
}

/// Drop lines that try to speak as a chat role or override the directive.
/// Returns (cleaned_text, removed_line_count).
fn remove_injection_lines(text: &str) -> (String, usize) {
    let mut kept: Vec<&str> = Vec::new();
    let mut removed = 0usize;

    for line in text.lines() {
        let lower = line.trim().to_lowercase();
        if is_role_marker(&lower) || is_override_attempt(&lower) {
            removed += 1;
        } else {
            kept.push(line);
        }
    }

    (kept.join("\n"), removed)
}

/// Trim each line, collapse runs of blank lines, drop leading/trailing blanks.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = true;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_blank {
                lines.push("");
            }
            prev_blank = true;
        } else {
            lines.push(trimmed);
            prev_blank = false;
        }
    }

    if lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}

/// Truncate to max characters, breaking at the last word boundary.
fn truncate_to_max_length(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let truncated = &text[..cut];
    match truncated.rfind(char::is_whitespace) {
        Some(pos) => format!("{}…[TRUNCATED]", &text[..pos]),
        None => format!("{truncated}…[TRUNCATED]"),
    }
}
