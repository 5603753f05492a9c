//! Label escaping for writing Newick and NEXUS output.
//!
//! Tip names in sequencing projects routinely carry characters that are
//! structural in Newick, such as parentheses in strain names or spaces.
//! These helpers quote labels on writing and undo the quoting when needed.

/// Characters that force a label into single quotes.
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks if a label is already safe to write:
/// - wrapped in single quotes with each internal single quote doubled, or
/// - free of spaces and special characters
///
/// # Examples
/// ```
/// # use phylokit::parser::utils::is_escaped;
/// assert_eq!(is_escaped("hCoV-19/Wuhan/WH01/2019"), true);
/// assert_eq!(is_escaped("A/swine(H1N1)"), false);
/// assert_eq!(is_escaped("sample 12"), false);
/// assert_eq!(is_escaped("'sample 12'"), true);
/// assert_eq!(is_escaped("'patient''s_isolate'"), true);
/// assert_eq!(is_escaped("'patient's isolate'"), false);
/// ```
pub fn is_escaped(label: &str) -> bool {
    if is_single_quoted(label) {
        let inner = &label[1..label.len() - 1];
        let mut prev = ' ';
        for char in inner.chars() {
            if prev == '\'' {
                if char != '\'' {
                    return false;
                }
                // pair complete
                prev = ' ';
            } else {
                prev = char;
            }
        }

        prev != '\''
    } else {
        !label.chars().any(|c| c == ' ' || SPECIAL_CHARS.contains(&c))
    }
}

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use phylokit::parser::utils::is_single_quoted;
/// assert_eq!(is_single_quoted("EPI_ISL_402124"), false);
/// assert_eq!(is_single_quoted("'EPI ISL 402124'"), true);
/// assert_eq!(is_single_quoted("'"), false);
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.starts_with('\'') && label.ends_with('\'') && label.len() >= 2
}

/// Escapes a label for use in NEXUS and Newick output.
///
/// Labels with special characters are wrapped in single quotes with
/// internal quotes doubled. Otherwise spaces are replaced by underscores.
/// Already escaped labels are returned as-is.
///
/// # Examples
/// ```
/// # use phylokit::parser::utils::escape_label;
/// assert_eq!(escape_label("MN908947_2019-12-26"), "MN908947_2019-12-26");
/// assert_eq!(escape_label("A/swine(H1N1)"), "'A/swine(H1N1)'");
/// assert_eq!(escape_label("sample 12"), "sample_12");
/// assert_eq!(escape_label("'sample 12'"), "'sample 12'");
/// assert_eq!(escape_label("patient's isolate"), "'patient''s isolate'");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_escaped(label) {
        return label.to_string();
    }

    if is_single_quoted(label) {
        // Repair unescaped internal quotes
        let inner = &label[1..label.len() - 1];
        let mut fixed = String::with_capacity(inner.len() + 4);
        let mut chars = inner.chars().peekable();

        fixed.push('\'');
        while let Some(ch) = chars.next() {
            fixed.push(ch);
            if ch == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                }
                fixed.push('\'');
            }
        }
        fixed.push('\'');

        return fixed;
    }

    if label.chars().any(|c| SPECIAL_CHARS.contains(&c)) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}
