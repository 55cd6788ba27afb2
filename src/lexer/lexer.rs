use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    context::Context,
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_SPAN, MK_TOKEN,
};

use super::tokens::{
    describe_delimiters, Token, TokenKind, RESERVED_LOOKUP, SPLIT_KEYWORDS, SYMBOL_LOOKUP,
};

lazy_static! {
    static ref IDENTIFIER_PATTERN: Regex = Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap();
    static ref NUMBER_PATTERN: Regex = Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of a successful [`Lexer::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekMatch {
    /// Where the matched target starts.
    pub position: Position,
    /// Index into the searched targets.
    pub target: usize,
}

/// A position in the line buffer that can step forwards and backwards,
/// wrapping across line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn at(&self, lines: &[Vec<char>]) -> Option<char> {
        lines
            .get(self.line)
            .and_then(|line| line.get(self.column))
            .copied()
    }

    pub fn at_eof(&self, lines: &[Vec<char>]) -> bool {
        self.line >= lines.len()
            || (self.line + 1 == lines.len() && self.column >= lines[self.line].len())
    }

    /// Moves `n` characters forward. Returns false once end-of-file is hit.
    pub fn advance(&mut self, lines: &[Vec<char>], n: usize) -> bool {
        for _ in 0..n {
            if self.at_eof(lines) {
                return false;
            }

            self.column += 1;
            while self.column >= lines[self.line].len() && self.line + 1 < lines.len() {
                self.line += 1;
                self.column = 0;
            }
        }

        !self.at_eof(lines)
    }

    /// Moves `n` characters backward. Returns false when asked to move before
    /// the first character; the cursor then stays at the beginning of file.
    pub fn reverse(&mut self, lines: &[Vec<char>], n: usize) -> bool {
        for _ in 0..n {
            if self.column > 0 {
                self.column -= 1;
                continue;
            }

            let mut line = self.line;
            loop {
                if line == 0 {
                    return false;
                }
                line -= 1;
                if !lines[line].is_empty() {
                    break;
                }
            }

            self.line = line;
            self.column = lines[line].len() - 1;
        }

        true
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub struct Lexer<'a> {
    lines: Vec<Vec<char>>,
    cursor: Cursor,
    tokens: Vec<Token>,
    errors: Vec<Error>,
    /// Open single `[` brackets; while positive, `]]` closes indices.
    bracket_depth: usize,
    /// Inside the `|...|` expression part of an interpolated string.
    in_interpolation: bool,
    context: &'a mut Context,
}

impl<'a> Lexer<'a> {
    pub fn new(lines: &[String], context: &'a mut Context) -> Lexer<'a> {
        Lexer {
            lines: lines.iter().map(|line| line.chars().collect()).collect(),
            cursor: Cursor::default(),
            tokens: vec![],
            errors: vec![],
            bracket_depth: 0,
            in_interpolation: false,
            context,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    pub fn at(&self) -> Option<char> {
        self.cursor.at(&self.lines)
    }

    pub fn at_eof(&self) -> bool {
        self.cursor.at_eof(&self.lines)
    }

    pub fn advance(&mut self, n: usize) -> bool {
        self.cursor.advance(&self.lines, n)
    }

    pub fn reverse(&mut self, n: usize) -> bool {
        self.cursor.reverse(&self.lines, n)
    }

    fn current_line(&self) -> &[char] {
        self.lines
            .get(self.cursor.line)
            .map(|line| line.as_slice())
            .unwrap_or(&[])
    }

    /// The rest of the current line, starting at the cursor.
    pub fn remainder(&self) -> String {
        self.current_line()
            .iter()
            .skip(self.cursor.column)
            .collect::<String>()
    }

    fn lexeme(&self, width: usize) -> String {
        self.current_line()
            .iter()
            .skip(self.cursor.column)
            .take(width)
            .collect::<String>()
    }

    fn follower(&self, width: usize) -> Option<char> {
        self.current_line().get(self.cursor.column + width).copied()
    }

    /// Width of the current line's remaining text, newline excluded.
    fn rest_of_line_width(&self) -> usize {
        self.current_line()
            .iter()
            .skip(self.cursor.column)
            .take_while(|c| **c != '\n')
            .count()
    }

    fn skip_empty_lines(&mut self) -> bool {
        while !self.at_eof() && self.at().is_none() {
            self.cursor.line += 1;
            self.cursor.column = 0;
        }
        !self.at_eof()
    }

    /// Compares the upcoming characters on the current line with
    /// `candidate`. With `ignore_space`, every space in the candidate matches
    /// a run of one or more blanks. Returns the number of characters matched.
    pub fn peek_match(&self, candidate: &str, ignore_space: bool) -> Option<usize> {
        let line = self.current_line();
        let start = self.cursor.column;
        let mut column = start;

        for expected in candidate.chars() {
            if ignore_space && expected == ' ' {
                let run_start = column;
                while matches!(line.get(column), Some(' ') | Some('\t')) {
                    column += 1;
                }
                if column == run_start {
                    return None;
                }
            } else {
                if line.get(column) != Some(&expected) {
                    return None;
                }
                column += 1;
            }
        }

        Some(column - start)
    }

    fn matches_at(&self, position: Position, target: &str) -> bool {
        let Some(line) = self.lines.get(position.line) else {
            return false;
        };

        target
            .chars()
            .enumerate()
            .all(|(offset, c)| line.get(position.column + offset) == Some(&c))
    }

    /// Searches from `from` for the nearest occurrence of any of `targets`,
    /// looking at most `line_limit` lines away from the starting line.
    ///
    /// Forward searches start at `from` itself, backward searches at the
    /// character before it and report the start of a target that ends there.
    /// With `skip_space` only the nearest non-blank text is compared.
    pub fn seek(
        &self,
        from: Cursor,
        targets: &[&str],
        direction: Direction,
        line_limit: usize,
        skip_space: bool,
    ) -> Option<SeekMatch> {
        let mut cursor = from;
        let first_line = from.line.saturating_sub(line_limit);
        let last_line = from.line + line_limit;

        if direction == Direction::Backward && !cursor.reverse(&self.lines, 1) {
            return None;
        }

        loop {
            if cursor.line < first_line || cursor.line > last_line || cursor.at_eof(&self.lines) {
                return None;
            }

            let c = cursor.at(&self.lines)?;

            if skip_space && is_blank(c) {
                let moved = match direction {
                    Direction::Forward => cursor.advance(&self.lines, 1),
                    Direction::Backward => cursor.reverse(&self.lines, 1),
                };
                if !moved {
                    return None;
                }
                continue;
            }

            for (index, target) in targets.iter().enumerate() {
                let width = target.chars().count();
                let start = match direction {
                    Direction::Forward => Some(cursor.position()),
                    Direction::Backward => (cursor.column + 1)
                        .checked_sub(width)
                        .map(|column| Position::new(cursor.line, column)),
                };

                if let Some(start) = start {
                    if self.matches_at(start, target) {
                        return Some(SeekMatch {
                            position: start,
                            target: index,
                        });
                    }
                }
            }

            if skip_space {
                return None;
            }

            let moved = match direction {
                Direction::Forward => cursor.advance(&self.lines, 1),
                Direction::Backward => cursor.reverse(&self.lines, 1),
            };
            if !moved {
                return None;
            }
        }
    }

    pub fn push(&mut self, token: Token) {
        log::trace!("{} at {}", token.debug(), token.span.start);
        self.tokens.push(token);
    }

    fn error(&mut self, error_impl: ErrorImpl, width: usize) {
        let span = MK_SPAN!(self.position(), width.max(1));
        self.errors.push(Error::new(error_impl, span));
    }

    /// Emits `width` characters as a token of `kind` if the character after
    /// them is an allowed delimiter; otherwise records a delimiter error.
    /// Either way the cursor moves past the lexeme.
    fn accept(&mut self, kind: TokenKind, width: usize) -> bool {
        let lexeme = self.lexeme(width);

        if let (Some(follower), Some(expected)) = (self.follower(width), kind.delimiters()) {
            if !expected.contains(&follower) {
                self.error(
                    ErrorImpl::DelimiterError {
                        lexeme,
                        expected: describe_delimiters(expected),
                        actual: follower.to_string(),
                    },
                    width,
                );
                self.advance(width);
                return false;
            }
        }

        let span = MK_SPAN!(self.position(), width);
        self.push(MK_TOKEN!(kind, lexeme, span));
        self.advance(width);
        true
    }

    fn lex_blank(&mut self) {
        let width = self
            .current_line()
            .iter()
            .skip(self.cursor.column)
            .take_while(|c| matches!(c, ' ' | '\t' | '\r'))
            .count();
        self.accept(TokenKind::Whitespace, width);
    }

    fn lex_newline(&mut self) {
        if self.in_interpolation {
            self.in_interpolation = false;
            self.error(
                ErrorImpl::UnterminatedString {
                    lexeme: String::from("|"),
                },
                1,
            );
        }
        self.accept(TokenKind::Newline, 1);
    }

    fn lex_number(&mut self) {
        let remainder = self.remainder();
        let Some(matched) = NUMBER_PATTERN.find(&remainder) else {
            self.error(
                ErrorImpl::UnrecognisedToken {
                    token: self.lexeme(1),
                },
                1,
            );
            self.advance(1);
            return;
        };

        let kind = if matched.as_str().contains('.') {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.accept(kind, matched.as_str().len());
    }

    /// Whether the nearest text before the cursor is the `cwass` keyword,
    /// possibly on an earlier line.
    fn follows_class_keyword(&self) -> bool {
        let lines_back = self.cursor.line;
        match self.seek(self.cursor, &["cwass"], Direction::Backward, lines_back, true) {
            Some(found) => {
                found.position.column == 0
                    || !self.lines[found.position.line][found.position.column - 1]
                        .is_ascii_alphanumeric()
            }
            None => false,
        }
    }

    fn lex_word(&mut self) {
        let remainder = self.remainder();
        let Some(matched) = IDENTIFIER_PATTERN.find(&remainder) else {
            self.error(
                ErrorImpl::UnrecognisedToken {
                    token: self.lexeme(1),
                },
                1,
            );
            self.advance(1);
            return;
        };
        let word = matched.as_str().to_string();
        let width = word.len();

        for (candidate, kind) in SPLIT_KEYWORDS.iter() {
            if candidate.split(' ').next() != Some(word.as_str()) {
                continue;
            }
            if let Some(split_width) = self.peek_match(candidate, true) {
                let runs_on = self
                    .follower(split_width)
                    .map(|c| c.is_ascii_alphanumeric() || c == '_')
                    .unwrap_or(false);
                if !runs_on {
                    self.accept(*kind, split_width);
                    return;
                }
            }
        }

        if let Some(kind) = RESERVED_LOOKUP.get(word.as_str()) {
            self.accept(*kind, width);
            return;
        }

        if self.follower(width).is_none() {
            self.error(ErrorImpl::UnterminatedIdentifier { lexeme: word }, width);
            self.advance(width);
            return;
        }

        let kind = if self.follows_class_keyword() {
            TokenKind::ClassId(self.context.intern_class(&word))
        } else if let Some(id) = self.context.class_id(&word) {
            TokenKind::ClassId(id)
        } else {
            TokenKind::Identifier(self.context.intern_identifier(&word))
        };
        self.accept(kind, width);
    }

    /// Finds the `"` or `|` closing a string segment that starts at
    /// `from_column` on the current line, skipping escaped characters.
    fn find_segment_end(&self, from_column: usize) -> Option<(usize, char)> {
        let line = self.current_line();
        let mut from = Cursor {
            line: self.cursor.line,
            column: from_column,
        };

        loop {
            if from.column >= line.len() {
                return None;
            }

            let found = self.seek(from, &["\"", "|"], Direction::Forward, 0, false)?;
            let column = found.position.column;

            let backslashes = line[..column]
                .iter()
                .rev()
                .take_while(|c| **c == '\\')
                .count();
            if backslashes % 2 == 1 {
                from.column = column + 1;
                continue;
            }

            return Some((column, line[column]));
        }
    }

    fn lex_unterminated_string(&mut self) {
        let width = self.rest_of_line_width();
        self.error(
            ErrorImpl::UnterminatedString {
                lexeme: self.lexeme(width),
            },
            width,
        );
        self.in_interpolation = false;
        self.advance(width);
    }

    fn lex_string(&mut self) {
        let start = self.cursor.column;

        match self.find_segment_end(start + 1) {
            Some((end, '"')) => {
                self.accept(TokenKind::StringLiteral, end - start + 1);
            }
            Some((end, _)) => {
                self.in_interpolation = true;
                self.accept(TokenKind::StringPartStart, end - start + 1);
            }
            None => self.lex_unterminated_string(),
        }
    }

    fn lex_string_continuation(&mut self) {
        let start = self.cursor.column;

        match self.find_segment_end(start + 1) {
            Some((end, '"')) => {
                self.in_interpolation = false;
                self.accept(TokenKind::StringPartEnd, end - start + 1);
            }
            Some((end, _)) => {
                self.accept(TokenKind::StringPartMid, end - start + 1);
            }
            None => self.lex_unterminated_string(),
        }
    }

    fn lex_symbol(&mut self) {
        for (symbol, kind) in SYMBOL_LOOKUP.iter() {
            if self.peek_match(symbol, false).is_none() {
                continue;
            }

            match kind {
                TokenKind::Comment => {
                    let width = self.rest_of_line_width();
                    self.accept(TokenKind::Comment, width);
                    return;
                }
                TokenKind::DoubleCloseBracket if self.bracket_depth > 0 => continue,
                TokenKind::OpenBracket => self.bracket_depth += 1,
                TokenKind::CloseBracket => {
                    self.bracket_depth = self.bracket_depth.saturating_sub(1)
                }
                _ => {}
            }

            self.accept(*kind, symbol.chars().count());
            return;
        }

        self.error(
            ErrorImpl::UnrecognisedToken {
                token: self.lexeme(1),
            },
            1,
        );
        self.advance(1);
    }

    /// Class names can be used before the class is declared, so identifiers
    /// are re-classified once every `cwass` name is known.
    fn resolve_class_names(&mut self) {
        for token in self.tokens.iter_mut() {
            if let TokenKind::Identifier(_) = token.kind {
                if let Some(id) = self.context.class_id(&token.lexeme) {
                    token.kind = TokenKind::ClassId(id);
                }
            }
        }
    }

    fn end_position(&self) -> Position {
        match self.lines.last() {
            Some(line) => Position::new(self.lines.len() - 1, line.len()),
            None => Position::null(),
        }
    }
}

/// Converts source lines into tokens. Never fails: malformed regions are
/// reported in the returned error list and skipped.
pub fn tokenize(lines: &[String], context: &mut Context) -> (Vec<Token>, Vec<Error>) {
    let mut lex = Lexer::new(lines, context);

    while lex.skip_empty_lines() {
        let Some(c) = lex.at() else {
            break;
        };

        match c {
            '\n' => lex.lex_newline(),
            ' ' | '\t' | '\r' => lex.lex_blank(),
            '"' => lex.lex_string(),
            '|' if lex.in_interpolation => lex.lex_string_continuation(),
            c if c.is_ascii_digit() => lex.lex_number(),
            c if c.is_ascii_alphabetic() || c == '_' => lex.lex_word(),
            _ => lex.lex_symbol(),
        }
    }

    if lex.in_interpolation {
        let end = lex.end_position();
        lex.errors.push(Error::new(
            ErrorImpl::UnterminatedString {
                lexeme: String::from("|"),
            },
            Span::new(end, end),
        ));
    }

    lex.resolve_class_names();

    let end = lex.end_position();
    lex.push(MK_TOKEN!(TokenKind::EOF, String::new(), Span::new(end, end)));

    log::debug!(
        "lexed {} tokens with {} errors",
        lex.tokens.len(),
        lex.errors.len()
    );

    (lex.tokens, lex.errors)
}
