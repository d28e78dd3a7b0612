//! Log formatting for text that came from chat users.
//!
//! Chat messages may carry newlines or terminal control bytes, and replies can
//! run to thousands of characters. Anything user-supplied goes through
//! [escape_log] before it reaches a log record.

/// Characters of user text kept in a log line.
const MAX_PREVIEW: usize = 160;

/// One-line preview of `s`: backslashes and control characters are written in
/// Rust escape syntax (`\n`, `\u{7}`), everything else passes through. Input
/// over [MAX_PREVIEW] characters ends in `…`.
pub fn escape_log(s: &str) -> String {
    let mut rest = s.chars();
    let mut out = rest
        .by_ref()
        .take(MAX_PREVIEW)
        .fold(String::with_capacity(s.len().min(MAX_PREVIEW)), |mut acc, c| {
            if c == '\\' || c.is_control() {
                acc.extend(c.escape_debug());
            } else {
                acc.push(c);
            }
            acc
        });
    if rest.next().is_some() {
        out.push('…');
    }
    out
}

/// `author@channel: text`, every part escaped.
pub fn command_line(author: &str, channel: &str, text: &str) -> String {
    format!("{}@{}: {}", escape_log(author), escape_log(channel), escape_log(text))
}
