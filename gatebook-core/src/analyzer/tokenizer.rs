//! Word tokenizer for label heuristics.
//!
//! Splits a label into alphanumeric words. Tokens are slices of the input, so
//! tokenizing never allocates:
//!
//! ```ignore
//! "Joe's Plumbing, LLC" -> "Joe" "s" "Plumbing" "LLC"
//! ```
//!
//! Matching is case-insensitive through [`Tokenizer::contains_any`], so callers
//! can pass labels as they appear in the record.

/// Streaming tokenizer over alphanumeric runs.
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Emits every word of `text` in order.
    ///
    /// A word is a maximal run of alphanumeric characters.
    ///
    /// ```
    /// use gatebook_core::analyzer::Tokenizer;
    ///
    /// let mut words = Vec::new();
    /// Tokenizer::new().tokenize("Oak-Park Plaza", |word| words.push(word));
    /// assert_eq!(words, ["Oak", "Park", "Plaza"]);
    /// ```
    #[inline]
    pub fn tokenize<'a, F>(&self, text: &'a str, mut emit: F)
    where
        F: FnMut(&'a str),
    {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .for_each(&mut emit);
    }

    /// Returns `true` if any word of `text` equals one of `words`, ignoring
    /// ASCII case. `words` are expected in lowercase.
    pub fn contains_any(&self, text: &str, words: &[&str]) -> bool {
        let mut found = false;
        self.tokenize(text, |word| {
            if !found {
                found = words.iter().any(|w| word.eq_ignore_ascii_case(w));
            }
        });
        found
    }
}
