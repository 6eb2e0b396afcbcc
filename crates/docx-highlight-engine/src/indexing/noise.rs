//! Classification of "noise" characters (punctuation and separators) that are
//! left out of filtered position counting.

use std::collections::BTreeSet;

/// Latin punctuation and symbols. Backslashes are members too.
pub const LATIN_PUNCTUATION: &str = r#"~!@#$%^&*()_-+={}[]|\`:\"\'<>?/.,;"#;

/// CJK (full-width) punctuation and symbols.
pub const CJK_PUNCTUATION: &str = "·~！@#￥%……&*（）——+-={}|【】：“‘；：”’《》，。？、";

/// Space, newline, tab and the ideographic space.
pub const SEPARATORS: [char; 4] = [' ', '\n', '\t', '\u{3000}'];

/// A fixed set of characters treated as noise. Membership is literal: no
/// normalization or case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseFilter {
    chars: BTreeSet<char>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::from_parts([LATIN_PUNCTUATION, CJK_PUNCTUATION], SEPARATORS)
    }
}

impl NoiseFilter {
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    /// Build a filter from punctuation strings (every character is a member)
    /// plus individual separator characters.
    pub fn from_parts<'a>(
        punctuation: impl IntoIterator<Item = &'a str>,
        separators: impl IntoIterator<Item = char>,
    ) -> Self {
        let mut chars: BTreeSet<char> = punctuation.into_iter().flat_map(str::chars).collect();
        chars.extend(separators);
        Self { chars }
    }

    pub fn is_noise(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// `s` with every noise character removed, order preserved.
    pub fn strip(&self, s: &str) -> String {
        s.chars().filter(|&c| !self.is_noise(c)).collect()
    }

    pub fn noise_count(&self, s: &str) -> usize {
        s.chars().filter(|&c| self.is_noise(c)).count()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}
