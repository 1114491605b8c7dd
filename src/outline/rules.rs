//! Ordered, named regex rule tables.

use regex::Regex;

/// Character class bodies shared by the rule tables.
pub(crate) mod class {
    /// CJK unified ideographs.
    pub const HAN: &str = r"\x{4e00}-\x{9fff}";
    /// Hiragana and Katakana.
    pub const KANA: &str = r"\x{3040}-\x{309f}\x{30a0}-\x{30ff}";
    /// Hangul syllables.
    pub const HANGUL: &str = r"\x{ac00}-\x{d7af}";
    /// Every CJK script.
    pub const CJK: &str = r"\x{4e00}-\x{9fff}\x{3040}-\x{309f}\x{30a0}-\x{30ff}\x{ac00}-\x{d7af}";
    /// Arabic block.
    pub const ARABIC: &str = r"\x{0600}-\x{06ff}";
    /// Cyrillic block.
    pub const CYRILLIC: &str = r"\x{0400}-\x{04ff}";
    /// Bullet symbols, including CJK bullets.
    pub const BULLETS: &str = "•·▪▫■□○●◦‣⁃・※";
}

/// A single named rule.
#[derive(Debug, Clone)]
pub struct Rule<T> {
    name: String,
    regex: Regex,
    result: T,
}

impl<T> Rule<T> {
    /// Stable rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Value produced when the rule matches.
    pub fn result(&self) -> &T {
        &self.result
    }

    /// Search the text for the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered list of rules; the first match wins.
#[derive(Debug, Clone)]
pub struct RuleTable<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleTable<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> RuleTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    ///
    /// A pattern that fails to compile is logged and left out of the table.
    pub fn rule(mut self, name: impl Into<String>, pattern: &str, result: T) -> Self {
        let name = name.into();
        match Regex::new(pattern) {
            Ok(regex) => self.rules.push(Rule {
                name,
                regex,
                result,
            }),
            Err(e) => log::warn!("Skipping rule {}: {}", name, e),
        }
        self
    }

    /// Append every rule of another table.
    pub fn extend(mut self, other: RuleTable<T>) -> Self {
        self.rules.extend(other.rules);
        self
    }

    /// First rule whose pattern matches the text.
    pub fn first_match(&self, text: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|rule| rule.is_match(text))
    }

    /// Check whether any rule matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Look up a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Iterate over the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<T>> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: Copy> RuleTable<T> {
    /// Result of the first matching rule.
    pub fn classify(&self, text: &str) -> Option<T> {
        self.first_match(text).map(|rule| rule.result)
    }
}
