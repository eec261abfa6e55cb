use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

pub struct Lexer<'a> {
    text: &'a str,
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { text: source, source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<Error>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.line, self.column));
                break;
            }

            match self.next_token() {
                Ok(Some(tok)) => tokens.push(tok),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let line = self.line;
        let col = self.column;
        let after_separator = self.follows_separator();
        let ch = self.advance();

        let kind = match ch {
            b'+' => TokenKind::Plus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'=' => TokenKind::Eq,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,

            b'-' => {
                if after_separator && !self.is_at_end() && !self.peek().is_ascii_whitespace() {
                    TokenKind::Negate
                } else {
                    TokenKind::Minus
                }
            }
            b'<' => {
                if self.peek() == b'=' { self.advance(); TokenKind::LtEq }
                else if self.peek() == b'>' { self.advance(); TokenKind::NotEq }
                else { TokenKind::Lt }
            }
            b'>' => {
                if self.peek() == b'=' { self.advance(); TokenKind::GtEq }
                else { TokenKind::Gt }
            }

            b';' => { self.skip_line(); return Ok(None); }

            b'"' => {
                let word = self.read_word();
                if word.is_empty() {
                    return Err(Error::new(ErrorCode::L002, line, col, "empty word after `\"`"));
                }
                TokenKind::Word(word)
            }
            b':' => {
                let name = self.read_name();
                if name.is_empty() {
                    return Err(Error::new(ErrorCode::L002, line, col, "empty variable name after `:`"));
                }
                TokenKind::Variable(name.to_ascii_lowercase())
            }

            b'0'..=b'9' => TokenKind::Number(self.read_number(ch)),
            b'.' if self.peek().is_ascii_digit() => TokenKind::Number(self.read_number(ch)),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let mut ident = self.read_name();
                ident.insert(0, ch as char);
                keyword_or_ident(ident.to_ascii_lowercase())
            }

            _ => {
                let other = self.take_char();
                return Err(Error::new(ErrorCode::L001, line, col,
                    format!("unexpected character `{other}`")));
            }
        };

        Ok(Some(Token::new(kind, line, col)))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    /// Columns count characters, so UTF-8 continuation bytes do not advance them.
    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else if ch & 0xC0 != 0x80 { self.column += 1; }
        ch
    }

    /// Finishes the character whose first byte was just consumed.
    fn take_char(&mut self) -> char {
        let start = self.pos - 1;
        let ch = self.text.get(start..).and_then(|t| t.chars().next()).unwrap_or(char::REPLACEMENT_CHARACTER);
        while self.pos < start + ch.len_utf8() && !self.is_at_end() {
            self.advance();
        }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// True at the start of input or right after whitespace or an opening bracket.
    fn follows_separator(&self) -> bool {
        match self.pos.checked_sub(1).map(|i| self.source[i]) {
            None => true,
            Some(b) => b.is_ascii_whitespace() || b == b'[' || b == b'(',
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => { self.advance(); }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Word literals run up to whitespace or a bracket, and may hold any UTF-8 text.
    fn read_word(&mut self) -> String {
        let start = self.pos;
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' | b'[' | b']' | b'(' | b')' => break,
                _ => { self.advance(); }
            }
        }
        self.text[start..self.pos].to_string()
    }

    fn read_name(&mut self) -> String {
        let mut s = String::new();
        while !self.is_at_end() && is_name_byte(self.peek()) {
            s.push(self.advance() as char);
        }
        s
    }

    /// Digits and dots are taken greedily; `1.2.3` is rejected later by the builder.
    fn read_number(&mut self, first: u8) -> String {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && (self.peek().is_ascii_digit() || self.peek() == b'.') {
            s.push(self.advance() as char);
        }
        s
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'?')
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(src: &str) -> Vec<Error> {
        Lexer::new(src).tokenize().unwrap_err()
    }

    fn num(s: &str) -> TokenKind { TokenKind::Number(s.into()) }
    fn ident(s: &str) -> TokenKind { TokenKind::Ident(s.into()) }

    #[test]
    fn empty() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn numbers_keep_source_text() {
        assert_eq!(lex("42"),   vec![num("42"),   TokenKind::Eof]);
        assert_eq!(lex("3.14"), vec![num("3.14"), TokenKind::Eof]);
        assert_eq!(lex(".5"),   vec![num(".5"),   TokenKind::Eof]);
    }

    #[test]
    fn malformed_number_is_left_for_the_builder() {
        assert_eq!(lex("1.2.3"), vec![num("1.2.3"), TokenKind::Eof]);
    }

    #[test]
    fn identifiers_are_lower_cased() {
        assert_eq!(lex("FD Forward"), vec![ident("fd"), ident("forward"), TokenKind::Eof]);
    }

    #[test]
    fn predicate_names_keep_question_mark() {
        assert_eq!(lex("less? 1 2"), vec![ident("less?"), num("1"), num("2"), TokenKind::Eof]);
    }

    #[test]
    fn keywords() {
        assert_eq!(lex("TO end thing"), vec![TokenKind::To, TokenKind::End, TokenKind::Thing, TokenKind::Eof]);
    }

    #[test]
    fn word_keeps_case_and_stops_at_bracket() {
        assert_eq!(
            lex("\"Red]"),
            vec![TokenKind::Word("Red".into()), TokenKind::RBracket, TokenKind::Eof]
        );
        assert_eq!(lex("\"#FF00ff"), vec![TokenKind::Word("#FF00ff".into()), TokenKind::Eof]);
    }

    #[test]
    fn variable_is_lower_cased() {
        assert_eq!(lex(":Size"), vec![TokenKind::Variable("size".into()), TokenKind::Eof]);
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(lex("<="), vec![TokenKind::LtEq,  TokenKind::Eof]);
        assert_eq!(lex(">="), vec![TokenKind::GtEq,  TokenKind::Eof]);
        assert_eq!(lex("<>"), vec![TokenKind::NotEq, TokenKind::Eof]);
    }

    #[test]
    fn minus_glued_after_whitespace_negates() {
        assert_eq!(
            lex("modulo 3 -2"),
            vec![ident("modulo"), num("3"), TokenKind::Negate, num("2"), TokenKind::Eof]
        );
    }

    #[test]
    fn spaced_or_glued_minus_is_binary() {
        assert_eq!(lex("3 - 2"), vec![num("3"), TokenKind::Minus, num("2"), TokenKind::Eof]);
        assert_eq!(lex("3-2"),   vec![num("3"), TokenKind::Minus, num("2"), TokenKind::Eof]);
    }

    #[test]
    fn minus_after_bracket_negates() {
        assert_eq!(
            lex("[-1 2]"),
            vec![TokenKind::LBracket, TokenKind::Negate, num("1"), num("2"), TokenKind::RBracket, TokenKind::Eof]
        );
    }

    #[test]
    fn comment_skipped() {
        assert_eq!(lex("; draw a square\nfd 10"), vec![ident("fd"), num("10"), TokenKind::Eof]);
    }

    #[test]
    fn empty_word_error() {
        let errs = lex_err("make \" 1");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L002);
    }

    #[test]
    fn empty_variable_error() {
        let errs = lex_err(": ");
        assert_eq!(errs[0].code, ErrorCode::L002);
    }

    #[test]
    fn unexpected_character_error() {
        let errs = lex_err("fd 10 & 3");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L001);
        assert_eq!((errs[0].line, errs[0].column), (1, 7));
    }

    #[test]
    fn words_keep_utf8_text() {
        assert_eq!(lex("\"café [\"ünï]"), vec![
            TokenKind::Word("café".into()),
            TokenKind::LBracket,
            TokenKind::Word("ünï".into()),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn multibyte_character_is_one_error() {
        let errs = lex_err("fd 1 é\nrt 2 🐢");
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.code == ErrorCode::L001));
        assert!(errs[0].message.contains('é'));
        assert!(errs[1].message.contains('🐢'));
        assert_eq!((errs[1].line, errs[1].column), (2, 6));
    }

    #[test]
    fn columns_count_characters() {
        let tokens = Lexer::new("\"née fd").tokenize().unwrap();
        assert_eq!((tokens[1].line, tokens[1].column), (1, 6));
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = Lexer::new("fd\n  rt").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }

    #[test]
    fn keywords_are_flagged() {
        assert!(TokenKind::To.is_keyword());
        assert!(TokenKind::End.is_keyword());
        assert!(!ident("fd").is_keyword());
    }
}
