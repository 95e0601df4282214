//! Label escaping and unescaping for Newick output and input.
//!
//! Labels with spaces or special characters are wrapped in single quotes
//! when written. The Newick reader strips those quotes again, so written
//! labels read back unchanged.

/// Characters that cannot appear in an unquoted label
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks if a label is already escaped:
/// - wrapped in single quotes and each internal single quote doubled, or
/// - no space and no special characters
///
/// # Examples
/// ```
/// # use acgtree::parser::utils::is_escaped;
/// assert!(is_escaped("Kea"));
/// assert!(!is_escaped("Ke[a]"));
/// assert!(!is_escaped("South Island Kokako"));
/// assert!(is_escaped("South_Island_Kokako"));
/// assert!(is_escaped("'South Island Kokako'"));
/// assert!(is_escaped("'Haast''s Eagle'"));
/// assert!(!is_escaped("'Haast's Eagle'"));
/// ```
pub fn is_escaped(label: &str) -> bool {
    if is_single_quoted(label) {
        let inner = &label[1..label.len() - 1];
        // Every quote inside must come as a pair
        inner.split("''").all(|part| !part.contains('\''))
    } else {
        !label.contains(' ') && !label.contains(SPECIAL_CHARS)
    }
}

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use acgtree::parser::utils::is_single_quoted;
/// assert!(!is_single_quoted("Kea"));
/// assert!(is_single_quoted("'Blue duck'"));
/// assert!(!is_single_quoted("'"));
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('\'') && label.ends_with('\'')
}

/// Escapes a label for use in a Newick string.
///
/// Labels containing spaces or special characters are wrapped in single
/// quotes with internal single quotes doubled. Underscores are kept, so
/// `Blue duck` and `Blue_duck` stay distinct. Already escaped labels are
/// returned as-is.
///
/// # Examples
/// ```
/// # use acgtree::parser::utils::escape_label;
/// assert_eq!(escape_label("Kea"), "Kea");
/// assert_eq!(escape_label("Ke[a]"), "'Ke[a]'");
/// assert_eq!(escape_label("Blue duck"), "'Blue duck'");
/// assert_eq!(escape_label("Blue_duck"), "Blue_duck");
/// assert_eq!(escape_label("'Blue duck'"), "'Blue duck'");
/// assert_eq!(escape_label("Haast's Eagle"), "'Haast''s Eagle'");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_escaped(label) {
        return label.to_string();
    }

    if is_single_quoted(label) {
        // Keep the quotes, double any lone internal quote
        let inner = &label[1..label.len() - 1];
        let fixed: Vec<String> = inner.split("''").map(|part| part.replace('\'', "''")).collect();
        return format!("'{}'", fixed.join("''"));
    }

    format!("'{}'", label.replace('\'', "''"))
}

/// Unescapes a label written by [escape_label], the same way the Newick
/// reader does: removes surrounding single quotes and un-doubles internal quotes.
///
/// # Examples
/// ```
/// # use acgtree::parser::utils::unescape_label;
/// assert_eq!(unescape_label("Blue_duck"), "Blue_duck");
/// assert_eq!(unescape_label("'Blue duck'"), "Blue duck");
/// assert_eq!(unescape_label("'Haast''s Eagle'"), "Haast's Eagle");
/// ```
pub fn unescape_label(label: &str) -> String {
    if is_single_quoted(label) {
        label[1..label.len() - 1].replace("''", "'")
    } else {
        label.to_string()
    }
}
