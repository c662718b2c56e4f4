//! Prompt matching for device output.
//!
//! CNOS prompts are plain substrings (`>`, `#`, `(config)#`), so the default
//! matcher is a literal search. A wait may accept several literals, e.g. a
//! copy command that either asks to confirm a host key or goes straight to a
//! password prompt.

use std::fmt;

use memchr::memmem;

/// A located prompt inside a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptMatch {
    /// Which alternative matched (always 0 for single-pattern matchers).
    pub index: usize,

    /// Byte offset where the match starts.
    pub start: usize,

    /// Byte offset just past the match.
    pub end: usize,
}

/// Something a wait can look for in device output.
pub trait PromptMatcher: Send + Sync {
    /// Returns the earliest match in `data`, if any.
    fn find_match(&self, data: &[u8]) -> Option<PromptMatch>;

    /// Longest byte sequence a match can span, used to size the overlap
    /// when scanning incrementally.
    fn max_len(&self) -> usize;

    /// Check if the data matches the pattern.
    fn is_match(&self, data: &[u8]) -> bool {
        self.find_match(data).is_some()
    }
}

/// One or more literal prompt strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    literals: Vec<String>,
}

impl Prompt {
    /// A prompt made of a single literal.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            literals: vec![text.into()],
        }
    }

    /// A prompt satisfied by whichever literal appears first.
    pub fn any<I, T>(literals: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            literals: literals.into_iter().map(Into::into).collect(),
        }
    }

    /// The literal at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.literals.get(index).map(String::as_str)
    }

    /// All literals of this prompt.
    pub fn literals(&self) -> &[String] {
        &self.literals
    }
}

impl PromptMatcher for Prompt {
    fn find_match(&self, data: &[u8]) -> Option<PromptMatch> {
        self.literals
            .iter()
            .enumerate()
            .filter(|(_, lit)| !lit.is_empty())
            .filter_map(|(index, lit)| {
                memmem::find(data, lit.as_bytes()).map(|start| PromptMatch {
                    index,
                    start,
                    end: start + lit.len(),
                })
            })
            // Earliest start wins, longer literal on a tie.
            .min_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)))
    }

    fn max_len(&self) -> usize {
        self.literals.iter().map(String::len).max().unwrap_or(0)
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.literals.iter().map(|l| format!("'{}'", l)).collect();
        write!(f, "{}", quoted.join(" or "))
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_prompt() {
        let prompt = Prompt::literal("#");
        let m = prompt.find_match(b"show version\r\nswitch#").unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.start, 20);
        assert_eq!(m.end, 21);
        assert!(!prompt.is_match(b"switch>"));
    }

    #[test]
    fn test_any_prompt_reports_alternative() {
        let prompt = Prompt::any(["(yes/no)", "password:"]);
        let m = prompt.find_match(b"Enter password:").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(prompt.get(m.index), Some("password:"));

        let m = prompt
            .find_match(b"continue connecting (yes/no)? password:")
            .unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn test_earliest_and_longest_on_tie() {
        let prompt = Prompt::any(["#", "(config)#"]);
        let m = prompt.find_match(b"switch(config)#").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.start, 6);
        assert_eq!(m.end, 15);

        let prompt = Prompt::any(["ab", "abc"]);
        let m = prompt.find_match(b"xxabc").unwrap();
        assert_eq!(m.index, 1);
    }

    #[test]
    fn test_empty_literal_never_matches() {
        let prompt = Prompt::literal("");
        assert!(!prompt.is_match(b"anything"));
    }

    #[test]
    fn test_max_len() {
        assert_eq!(Prompt::any(["#", "(config)#"]).max_len(), 9);
    }

    #[test]
    fn test_display() {
        assert_eq!(Prompt::any([">", "#"]).to_string(), "'>' or '#'");
    }
}
