/// Split one CSV line into its fields.
///
/// Double quotes group text containing commas. A quote preceded by a backslash is kept
/// as a literal (together with the backslash) instead of toggling the quoted state; this
/// is the escaping the spreadsheet exports we read rely on, not RFC 4180 `""` doubling.
/// Every field is trimmed and loses one leading and one trailing `"` if present.
///
/// Never fails: unbalanced quotes simply swallow the remaining separators.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut prev: Option<char> = None;

    for c in line.chars() {
        if c == '"' && prev != Some('\\') {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            fields.push(finish_field(&current));
            current.clear();
        } else {
            current.push(c);
        }
        prev = Some(c);
    }

    fields.push(finish_field(&current));
    fields
}

fn finish_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}
