use crate::analysis::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;

    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

/// Splits on any code point that is neither a Unicode letter nor a Unicode
/// number. Empty fragments are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|fragment| !fragment.is_empty())
            .enumerate()
            .map(|(position, fragment)| Token::new(fragment.to_string(), position as u32))
            .collect()
    }

    fn name(&self) -> &str {
        "standard"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: Vec<Token>) -> Vec<String> {
        tokens.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let tokens = StandardTokenizer.tokenize("Xi'an Famous Foods");
        assert_eq!(texts(tokens), vec!["Xi", "an", "Famous", "Foods"]);
    }

    #[test]
    fn hyphens_split() {
        let tokens = StandardTokenizer.tokenize("state-of-the-art");
        assert_eq!(texts(tokens), vec!["state", "of", "the", "art"]);
    }

    #[test]
    fn numbers_are_tokens() {
        let tokens = StandardTokenizer.tokenize("postcode 80000");
        assert_eq!(texts(tokens), vec!["postcode", "80000"]);
    }

    #[test]
    fn unicode_letters_are_kept_together() {
        let tokens = StandardTokenizer.tokenize("Café déjà-vu");
        assert_eq!(texts(tokens), vec!["Café", "déjà", "vu"]);
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert!(StandardTokenizer.tokenize("").is_empty());
        assert!(StandardTokenizer.tokenize("... --- !!!").is_empty());
    }

    #[test]
    fn positions_are_sequential() {
        let tokens = StandardTokenizer.tokenize("a b c");
        let positions: Vec<u32> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }
}
