//! Lexer (tokenizer) for filter expressions.

use crate::vocabulary::Markers;

/// Classification of a lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A single hash marker (`#`).
    Hash,
    /// The confirmation marker (`##`).
    Confirm,
    /// The shorthand separator (`:`).
    Colon,
    /// A run of whitespace.
    Space,
    /// A run of any other characters.
    Word,
}

/// A token borrowing its text from the input.
///
/// `text` is always exactly `&input[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokenKind,
    /// Borrowed slice of the input for this token.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// Lexer for tokenizing filter expressions.
///
/// Marker characters come from [`Markers`], so the lexer follows whatever
/// vocabulary the caller configured.
pub struct Lexer<'a, 'm> {
    input: &'a str,
    markers: &'m Markers,
    position: usize,
}

impl<'a, 'm> Lexer<'a, 'm> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str, markers: &'m Markers) -> Self {
        Self {
            input,
            markers,
            position: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn at_confirm(&self, offset: usize) -> bool {
        !self.markers.confirm.is_empty() && self.input[offset..].starts_with(&self.markers.confirm)
    }

    fn is_boundary(&self, c: char) -> bool {
        c == self.markers.hash || c == self.markers.shorthand || c.is_whitespace()
    }

    fn token(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let start = self.position;
        self.position += len;
        Token {
            kind,
            text: &self.input[start..self.position],
            start,
            end: self.position,
        }
    }

    /// Returns the next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let rest = self.rest();
        let c = rest.chars().next()?;

        if self.at_confirm(self.position) {
            return Some(self.token(TokenKind::Confirm, self.markers.confirm.len()));
        }
        if c == self.markers.hash {
            return Some(self.token(TokenKind::Hash, c.len_utf8()));
        }
        if c == self.markers.shorthand {
            return Some(self.token(TokenKind::Colon, c.len_utf8()));
        }
        if c.is_whitespace() {
            let len = rest
                .char_indices()
                .find(|(_, ch)| !ch.is_whitespace())
                .map_or(rest.len(), |(i, _)| i);
            return Some(self.token(TokenKind::Space, len));
        }

        let len = rest
            .char_indices()
            .find(|&(i, ch)| self.is_boundary(ch) || self.at_confirm(self.position + i))
            .map_or(rest.len(), |(i, _)| i);
        Some(self.token(TokenKind::Word, len))
    }

    /// Collects all tokens into a vector.
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        let markers = Markers::default();
        Lexer::new(input, &markers)
            .tokenize()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_tokenize_field() {
        assert_eq!(
            kinds("#base_price"),
            vec![(TokenKind::Hash, "#"), (TokenKind::Word, "base_price")]
        );
    }

    #[test]
    fn test_tokenize_condition() {
        assert_eq!(
            kinds("#stock #lessThan 10"),
            vec![
                (TokenKind::Hash, "#"),
                (TokenKind::Word, "stock"),
                (TokenKind::Space, " "),
                (TokenKind::Hash, "#"),
                (TokenKind::Word, "lessThan"),
                (TokenKind::Space, " "),
                (TokenKind::Word, "10"),
            ]
        );
    }

    #[test]
    fn test_tokenize_confirm_marker() {
        assert_eq!(
            kinds("10##"),
            vec![(TokenKind::Word, "10"), (TokenKind::Confirm, "##")]
        );
    }

    #[test]
    fn test_tokenize_triple_hash() {
        assert_eq!(
            kinds("###"),
            vec![(TokenKind::Confirm, "##"), (TokenKind::Hash, "#")]
        );
    }

    #[test]
    fn test_tokenize_colon_shorthand() {
        assert_eq!(
            kinds("#name:para"),
            vec![
                (TokenKind::Hash, "#"),
                (TokenKind::Word, "name"),
                (TokenKind::Colon, ":"),
                (TokenKind::Word, "para"),
            ]
        );
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(
            kinds("a \t b"),
            vec![
                (TokenKind::Word, "a"),
                (TokenKind::Space, " \t "),
                (TokenKind::Word, "b"),
            ]
        );
    }

    #[test]
    fn test_tokenize_positions_are_byte_offsets() {
        let markers = Markers::default();
        let tokens = Lexer::new("#naïve #x", &markers).tokenize();
        assert_eq!(tokens[1].text, "naïve");
        assert_eq!(tokens[1].start, 1);
        assert_eq!(tokens[1].end, 7);
        assert_eq!(tokens[3].start, 8);
    }

    #[test]
    fn test_tokenize_custom_markers() {
        let markers = Markers {
            hash: '@',
            confirm: "@@".to_string(),
            ..Markers::default()
        };
        let tokens: Vec<TokenKind> = Lexer::new("@name @equals x@@", &markers)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            tokens,
            vec![
                TokenKind::Hash,
                TokenKind::Word,
                TokenKind::Space,
                TokenKind::Hash,
                TokenKind::Word,
                TokenKind::Space,
                TokenKind::Word,
                TokenKind::Confirm,
            ]
        );
    }
}
