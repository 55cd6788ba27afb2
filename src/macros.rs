//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_SPAN!` - Creates a single-line Span from a start position and width

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$lexeme` - The token's source text
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntLiteral, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $lexeme:expr, $span:expr) => {
        Token {
            kind: $kind,
            lexeme: $lexeme,
            span: $span,
        }
    };
}

/// Creates a Span covering `$width` characters of one line, starting at
/// `$start`. The end column is inclusive, so a width of zero yields an
/// empty span at `$start`.
///
/// # Example
///
/// ```ignore
/// let span = MK_SPAN!(Position::new(0, 4), 3); // columns 4..=6
/// ```
#[macro_export]
macro_rules! MK_SPAN {
    ($start:expr, $width:expr) => {{
        let start: $crate::Position = $start;
        let width: usize = $width;
        $crate::Span {
            start,
            end: $crate::Position {
                line: start.line,
                column: start.column + width.saturating_sub(1),
            },
        }
    }};
}
