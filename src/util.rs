//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Strip a Markdown code fence wrapping, if present.
///
/// Models sometimes answer "```json\n{...}\n```" even when asked for bare
/// JSON. Removes the opening fence (with an optional language tag up to the
/// first newline) and the closing fence, trimming surrounding whitespace.
/// Input without fences comes back trimmed but otherwise untouched.
pub fn strip_code_fences(s: &str) -> &str {
  let trimmed = s.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed;
  };
  // Drop the language tag on the opening fence line, if any.
  let rest = match rest.find('\n') {
    Some(i) => &rest[i + 1..],
    None => rest,
  };
  match rest.trim_end().strip_suffix("```") {
    Some(inner) => inner.trim(),
    None => rest.trim(),
  }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}
