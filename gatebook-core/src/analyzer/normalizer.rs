use serde_json::Value;

#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\t' | b'\r' | b'\x0c')
}

/// Folds labels into comparison keys.
///
/// Performs the following operations:
/// - Converts all characters to lowercase (Unicode-aware)
/// - Collapses consecutive whitespace into single spaces
/// - Removes leading/trailing whitespace
///
/// Folded keys are only used for deduplication and ordering; display text
/// always keeps its original casing.
///
/// # Examples
///
/// ```
/// use gatebook_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(normalizer.normalize("  Oak   PARK  "), "oak park");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Creates a new normalizer.
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let mut pending_space = false;
        for ch in input.chars() {
            if ch.is_ascii() {
                let b = ch as u8;
                if is_ascii_ws(b) {
                    pending_space = !out.is_empty();
                    continue;
                }
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(b.to_ascii_lowercase() as char);
            } else if ch.is_whitespace() {
                pending_space = !out.is_empty();
            } else {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.extend(ch.to_lowercase());
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Coerces a raw field value into a trimmed string.
///
/// Missing values and `null` become empty. Numbers and booleans use their
/// JSON text form. Arrays and objects are not scalars and are treated as
/// missing.
pub fn scalar_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(_) | Value::Object(_)) => {
            tracing::trace!("ignoring non-scalar field value");
            String::new()
        }
    }
}

/// Strips a leading `#` and any whitespace after it from a code.
///
/// ```
/// use gatebook_core::analyzer::normalizer::normalize_code;
///
/// assert_eq!(normalize_code("# 4521"), "4521");
/// assert_eq!(normalize_code("#4521"), "4521");
/// ```
pub fn normalize_code(code: &str) -> String {
    let code = code.trim();
    match code.strip_prefix('#') {
        Some(rest) => rest.trim_start().to_owned(),
        None => code.to_owned(),
    }
}

/// Cleans a community, neighborhood or business label.
///
/// - A trailing 5-digit postal code in parentheses is removed.
/// - Whitespace runs collapse to one space.
/// - A standalone dash (`-`, `–`, `—`, `--`) becomes `—`.
///
/// ```
/// use gatebook_core::analyzer::normalizer::normalize_label;
///
/// assert_eq!(normalize_label("Foothills (85750)"), "Foothills");
/// assert_eq!(normalize_label("North - Ridge"), "North — Ridge");
/// ```
pub fn normalize_label(label: &str) -> String {
    let label = strip_postal_suffix(label.trim());

    let mut out = String::with_capacity(label.len() + 2);
    for word in label.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        if is_dash(word) {
            out.push('—');
        } else {
            out.push_str(word);
        }
    }
    out
}

fn strip_postal_suffix(label: &str) -> &str {
    let Some(body) = label.strip_suffix(')') else {
        return label;
    };
    let Some(open) = body.rfind('(') else {
        return label;
    };
    let inner = body[open + 1..].trim();
    if inner.len() == 5 && inner.bytes().all(|b| b.is_ascii_digit()) {
        body[..open].trim_end()
    } else {
        label
    }
}

#[inline]
fn is_dash(word: &str) -> bool {
    matches!(word, "-" | "--" | "–" | "—")
}
