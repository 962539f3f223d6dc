use {
    crate::{
        error::ScanError,
        token::{self, SourcePosition, Token, TokenKind},
    },
    culpa::{throw, throws},
    std::collections::HashMap,
};

trait IsIdentifier {
    fn is_identifier(&self) -> bool;
}

impl IsIdentifier for char {
    fn is_identifier(&self) -> bool {
        self.is_alphanumeric() || *self == '_'
    }
}

/// Current scanner state for iterating over the source input.
///
/// `start` and `current` are byte offsets into the utf8 source; `start` marks
/// the first character of the lexeme in progress, `current` the next unread
/// character. Lookahead is bounded at two characters.
pub struct Scanner<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    start: usize,
    current: usize,
    line: usize,
    keywords: &'static HashMap<&'static str, TokenKind>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            keywords: token::keywords(),
        }
    }

    /// Scan the whole source, ending with a zero-length `END_OF_FILE` token.
    ///
    /// Fatal lexical conditions (unterminated string, unclosed comment) are
    /// returned to the caller; no token is emitted for the open lexeme and
    /// scanning stops at the detection point.
    #[throws(ScanError)]
    pub fn scan_tokens(mut self) -> Vec<Token<'src>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.start = self.current;
        self.add_token(TokenKind::Eof);
        self.tokens
    }

    #[throws(ScanError)]
    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '+' => {
                let kind = if self.matches('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::PlusOp
                };
                self.add_token(kind);
            }
            '-' => {
                let kind = if self.matches('=') {
                    TokenKind::MinusEqual
                } else {
                    TokenKind::MinusOp
                };
                self.add_token(kind);
            }
            '*' => {
                let kind = if self.matches('=') {
                    TokenKind::MultEqual
                } else {
                    TokenKind::MultOp
                };
                self.add_token(kind);
            }
            ':' => {
                let kind = if self.matches('=') {
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') {
                    TokenKind::LtEq
                } else if self.matches('>') {
                    TokenKind::Ne
                } else {
                    TokenKind::Lt
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    // A line comment goes until the end of the line and
                    // leaves no token, unlike block comment markers.
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.matches('=') {
                    self.add_token(TokenKind::DivEqual);
                } else {
                    self.add_token(TokenKind::DivOp);
                }
            }
            '=' => self.add_token(TokenKind::Equal),
            '^' => self.add_token(TokenKind::Carat),
            ';' => self.add_token(TokenKind::Semicolon),
            ',' => self.add_token(TokenKind::Comma),
            '(' => {
                if self.matches('*') {
                    self.block_comment()?;
                } else {
                    self.add_token(TokenKind::LeftParen);
                }
            }
            ')' => self.add_token(TokenKind::RightParen),
            '[' => self.add_token(TokenKind::LeftBracket),
            ']' => self.add_token(TokenKind::RightBracket),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            '\'' => self.string()?,
            '0'..='9' => self.number(),
            d if d.is_alphabetic() || d == '_' => self.identifier(),
            ' ' | '\r' | '\t' => {
                // Ignore whitespace.
            }
            '\n' => {
                self.line += 1;
            }
            _ => {
                crate::error(
                    self.source,
                    self.start..self.current,
                    &format!("Unexpected character `{}`", c),
                );
            }
        }
    }

    /// Nested block comments. Every `(*`/`*)` pair emits its own
    /// `LCOMMENT`/`RCOMMENT` marker tokens; the comment body is discarded.
    /// Depth is tracked with a counter rather than recursion, so nesting in
    /// untrusted input cannot exhaust the call stack.
    #[throws(ScanError)]
    fn block_comment(&mut self) {
        let opened = self.start..self.current;
        self.add_token(TokenKind::LeftComment);
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_at_end() {
                throw!(ScanError::UnclosedComment {
                    line: self.line,
                    span: opened,
                });
            }
            let c = self.advance();
            match c {
                '\n' => self.line += 1,
                '*' if self.peek() == ')' => {
                    self.start = self.current - 1;
                    self.advance();
                    self.add_token(TokenKind::RightComment);
                    depth -= 1;
                }
                '(' if self.peek() == '*' => {
                    self.start = self.current - 1;
                    self.advance();
                    self.add_token(TokenKind::LeftComment);
                    depth += 1;
                }
                _ => {}
            }
        }
    }

    /// Strings run from `'` to `'` and may span lines; the token keeps the
    /// line of the opening quote.
    #[throws(ScanError)]
    fn string(&mut self) {
        let line = self.line;
        while self.peek() != '\'' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        if self.is_at_end() {
            throw!(ScanError::UnterminatedString {
                line: self.line,
                span: self.start..self.current,
            });
        }
        // The closing '.
        self.advance();
        self.add_token_on_line(TokenKind::String, line);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        // A dot starts a fractional part only when a digit follows it, so a
        // trailing range or record-access dot is left for the next token.
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            self.add_token(TokenKind::Real);
        } else {
            self.add_token(TokenKind::Integer);
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_identifier() {
            self.advance();
        }

        // Reserved words match case-insensitively and on the whole lexeme.
        let upper = self.lexeme().to_uppercase();
        match self.keywords.get(upper.as_str()) {
            Some(kind) => self.add_token(*kind),
            None => self.add_token(TokenKind::Identifier),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current..]
            .chars()
            .next()
            .expect("Got past end of input");
        self.current += c.len_utf8();
        c
    }

    /// Return true and advance if the next character is the expected one.
    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() {
            return false;
        }
        if self.peek() != expected {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn peek(&self) -> char {
        self.peek_offset(0)
    }

    fn peek_next(&self) -> char {
        self.peek_offset(1)
    }

    // @internal
    fn peek_offset(&self, offset: usize) -> char {
        self.source[self.current..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_token_on_line(kind, self.line);
    }

    // The lexeme is exactly `[start, current)` at the moment the token is
    // appended.
    fn add_token_on_line(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token {
            kind,
            lexeme: self.lexeme(),
            position: SourcePosition {
                line,
                span: self.start..self.current,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::{EXIT_UNCLOSED_COMMENT, EXIT_UNTERMINATED_STRING},
        pretty_assertions::assert_eq,
        rstest::rstest,
    };

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source)
            .scan_tokens()
            .expect("scan should succeed")
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).iter().map(|t| t.kind).collect()
    }

    #[rstest]
    #[case("+", TokenKind::PlusOp)]
    #[case("+=", TokenKind::PlusEqual)]
    #[case("-", TokenKind::MinusOp)]
    #[case("-=", TokenKind::MinusEqual)]
    #[case("*", TokenKind::MultOp)]
    #[case("*=", TokenKind::MultEqual)]
    #[case("/", TokenKind::DivOp)]
    #[case("/=", TokenKind::DivEqual)]
    #[case(":", TokenKind::Colon)]
    #[case(":=", TokenKind::Assign)]
    #[case("=", TokenKind::Equal)]
    #[case("<", TokenKind::Lt)]
    #[case("<=", TokenKind::LtEq)]
    #[case("<>", TokenKind::Ne)]
    #[case(">", TokenKind::Gt)]
    #[case(">=", TokenKind::GtEq)]
    #[case("^", TokenKind::Carat)]
    #[case(";", TokenKind::Semicolon)]
    #[case(",", TokenKind::Comma)]
    #[case("(", TokenKind::LeftParen)]
    #[case(")", TokenKind::RightParen)]
    #[case("[", TokenKind::LeftBracket)]
    #[case("]", TokenKind::RightBracket)]
    #[case("{", TokenKind::LeftBrace)]
    #[case("}", TokenKind::RightBrace)]
    fn operator_disambiguation(#[case] source: &str, #[case] expected: TokenKind) {
        let tokens = scan(source);
        assert_eq!(tokens[0].kind, expected);
        assert_eq!(tokens[0].lexeme, source);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[rstest]
    #[case("begin")]
    #[case("BEGIN")]
    #[case("BeGiN")]
    fn keywords_match_case_insensitively(#[case] source: &str) {
        let tokens = scan(source);
        assert_eq!(tokens[0].kind, TokenKind::KwBegin);
        assert_eq!(tokens[0].lexeme, source);
    }

    #[rstest]
    #[case("forward")]
    #[case("BEGINNING")]
    #[case("_tmp42")]
    fn identifiers_use_maximal_munch(#[case] source: &str) {
        let tokens = scan(source);
        assert_eq!(
            tokens[0],
            Token {
                kind: TokenKind::Identifier,
                lexeme: source,
                position: SourcePosition {
                    line: 1,
                    span: 0..source.len(),
                },
            }
        );
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn number_classification() {
        let tokens = scan("123 12.5");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].lexeme, "123");
        assert_eq!(tokens[1].kind, TokenKind::Real);
        assert_eq!(tokens[1].lexeme, "12.5");
    }

    #[test]
    fn trailing_dot_is_not_a_fraction() {
        // The dot itself matches no token class and is reported and skipped.
        let tokens = scan("12.");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].lexeme, "12");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn string_literal_keeps_quotes_in_lexeme() {
        let tokens = scan("'silly string'");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "'silly string'");
    }

    #[test]
    fn multiline_string_keeps_opening_line() {
        let tokens = scan("\n'a\nb'\nx");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].position.line, 2);
        // The newline inside the literal still advanced the line counter.
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].position.line, 4);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = Scanner::new("'abc").scan_tokens().unwrap_err();
        assert_eq!(
            err,
            ScanError::UnterminatedString { line: 1, span: 0..4 }
        );
        assert_eq!(err.exit_code(), EXIT_UNTERMINATED_STRING);
    }

    #[test]
    fn nested_comments_balance_marker_tokens() {
        let tokens = scan("(* outer (* inner *) still outer *)");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftComment,
                TokenKind::LeftComment,
                TokenKind::RightComment,
                TokenKind::RightComment,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].lexeme, "(*");
        assert_eq!(tokens[1].lexeme, "(*");
        assert_eq!(tokens[2].lexeme, "*)");
        assert_eq!(tokens[3].lexeme, "*)");
    }

    #[test]
    fn deeply_nested_comments_do_not_recurse() {
        let mut source = String::new();
        for _ in 0..10_000 {
            source.push_str("(*");
        }
        for _ in 0..10_000 {
            source.push_str("*)");
        }
        let tokens = scan(&source);
        assert_eq!(tokens.len(), 20_001);
    }

    #[test]
    fn unclosed_comment_is_fatal() {
        let err = Scanner::new("(* no end\n").scan_tokens().unwrap_err();
        assert_eq!(err, ScanError::UnclosedComment { line: 2, span: 0..2 });
        assert_eq!(err.exit_code(), EXIT_UNCLOSED_COMMENT);
    }

    #[test]
    fn inner_unclosed_comment_is_fatal() {
        let err = Scanner::new("(* a (* b *)").scan_tokens().unwrap_err();
        assert_eq!(err, ScanError::UnclosedComment { line: 1, span: 0..2 });
    }

    #[test]
    fn line_comments_emit_no_tokens() {
        assert_eq!(
            kinds("x // trailing (* text *) ignored\ny"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn empty_input_yields_only_eof() {
        let tokens = scan("");
        assert_eq!(
            tokens,
            vec![Token {
                kind: TokenKind::Eof,
                lexeme: "",
                position: SourcePosition { line: 1, span: 0..0 },
            }]
        );
    }

    #[test]
    fn eof_is_zero_length_on_final_line() {
        let tokens = scan("begin\nend\n");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.lexeme, "");
        assert_eq!(eof.position.line, 3);
        assert_eq!(eof.position.span, 10..10);
    }

    #[test]
    fn unexpected_characters_are_skipped() {
        assert_eq!(
            kinds("a ? b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn assignment_statement_scans_in_order() {
        let tokens = scan("x := 1;");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, ":=");
    }

    #[test]
    fn lexemes_are_exact_source_slices() {
        let source = "program Demo;\nvar x := 12.5; // init\n'str' (* c *)\n";
        let tokens = scan(source);
        let mut previous_end = 0;
        for token in &tokens {
            let span = token.position.span.clone();
            assert_eq!(token.lexeme, &source[span.clone()]);
            // Spans are ordered and disjoint, so nothing scanned is lost.
            assert!(span.start >= previous_end);
            previous_end = span.end;
        }
    }

    #[test]
    fn line_numbers_are_monotonic_and_newline_driven() {
        let source = "begin\n  x := 1;\n  // note\n  y := 2;\nend";
        let tokens = scan(source);
        let mut previous = 0;
        for token in &tokens {
            assert!(token.position.line >= previous);
            previous = token.position.line;
            let newlines_before = source[..token.position.span.start]
                .bytes()
                .filter(|b| *b == b'\n')
                .count();
            assert_eq!(token.position.line, newlines_before + 1);
        }
        assert_eq!(tokens.last().unwrap().position.line, 5);
    }

    #[test]
    fn keyword_heavy_program_scans_fully() {
        let source = "program P;\nbegin\n  if x <> 0 then\n    y := x div 2;\nend";
        let kinds: Vec<_> = scan(source).iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwProgram,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::KwBegin,
                TokenKind::KwIf,
                TokenKind::Identifier,
                TokenKind::Ne,
                TokenKind::Integer,
                TokenKind::KwThen,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Identifier,
                TokenKind::KwDiv,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::KwEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_keyword_and_literal_share_a_kind() {
        let tokens = scan("string 'text'");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "string");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, "'text'");
    }

    #[test]
    fn compound_assignment_inside_expression() {
        assert_eq!(
            kinds("x += y * (z - 1)"),
            vec![
                TokenKind::Identifier,
                TokenKind::PlusEqual,
                TokenKind::Identifier,
                TokenKind::MultOp,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::MinusOp,
                TokenKind::Integer,
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }
}
