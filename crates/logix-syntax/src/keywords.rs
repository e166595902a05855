//! Reserved words of Logix.
//!
//! The lookup table is derived from [`TokenKind::keyword`] the first time it
//! is used, so adding a keyword only touches the token module.

use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::token::TokenKind;

static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    TokenKind::ALL
        .iter()
        .filter_map(|&kind| kind.keyword().map(|text| (text, kind)))
        .collect()
});

/// Returns the keyword kind spelled `text`, if any.
///
/// ```
/// use logix_syntax::keywords;
/// use logix_syntax::token::TokenKind;
///
/// assert_eq!(keywords::lookup("elif"), Some(TokenKind::Elif));
/// assert_eq!(keywords::lookup("in"), None);
/// ```
pub fn lookup(text: &str) -> Option<TokenKind> {
    KEYWORDS.get(text).copied()
}

/// Number of reserved words.
pub fn count() -> usize {
    KEYWORDS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_count() {
        assert_eq!(count(), 18);
    }

    #[test]
    fn test_every_keyword_round_trips() {
        for kind in TokenKind::ALL.iter().filter(|k| k.is_keyword()) {
            let text = kind.keyword().unwrap();
            assert_eq!(lookup(text), Some(*kind));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup("fn"), Some(TokenKind::Fn));
        assert_eq!(lookup("Fn"), None);
        assert_eq!(lookup("IF"), None);
    }
}
