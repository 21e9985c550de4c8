use std::fmt;

/// The fused prompt read from the screen.
///
/// Always empty or 2–3 uppercase ASCII letters, so it can be used directly
/// as an n-gram key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub const MAX_LEN: usize = 3;

    pub fn empty() -> Self {
        Self::default()
    }

    /// Accepts a fused candidate; anything that is not 2–3 letters becomes empty.
    pub fn from_candidate(candidate: &str) -> Self {
        let valid = (2..=Self::MAX_LEN).contains(&candidate.len())
            && candidate.chars().all(|c| c.is_ascii_uppercase());
        if valid {
            Self(candidate.to_string())
        } else {
            Self::empty()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Picks the prompt among per-slot readings: longest first, then alphabetical.
    pub fn select<'a, I>(candidates: I) -> Token
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let mut ranked: Vec<&Token> = candidates.into_iter().filter(|t| !t.is_empty()).collect();
        ranked.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.0.cmp(&b.0)));
        ranked.first().map(|t| (*t).clone()).unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_candidate_accepts_two_and_three() {
        assert_eq!(Token::from_candidate("AB").as_str(), "AB");
        assert_eq!(Token::from_candidate("ING").as_str(), "ING");
    }

    #[test]
    fn test_from_candidate_rejects_other_lengths() {
        assert!(Token::from_candidate("").is_empty());
        assert!(Token::from_candidate("I").is_empty());
        assert!(Token::from_candidate("ABCD").is_empty());
        assert!(Token::from_candidate("ab").is_empty());
    }

    #[test]
    fn test_select_prefers_longer_then_alphabetical() {
        let tokens = [
            Token::from_candidate("ZZ"),
            Token::from_candidate("TER"),
            Token::empty(),
            Token::from_candidate("ANT"),
        ];
        assert_eq!(Token::select(&tokens).as_str(), "ANT");
        assert!(Token::select(&[Token::empty(), Token::empty()]).is_empty());
    }
}
