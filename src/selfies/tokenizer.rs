use crate::selfies::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A bracketed symbol, brackets included.
    Symbol { text: &'a str, pos: usize },
    /// A `.` fragment separator.
    Dot(usize),
}

impl<'a> Token<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Token::Symbol { text, .. } => text,
            Token::Dot(_) => ".",
        }
    }
}

/// Split `input` into bracketed symbols and `.` separators.
///
/// Anything outside brackets other than `.` is skipped. Brackets do not
/// nest: a symbol runs from `[` to the next `]`.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, DecodeError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                let close = input[i + 1..]
                    .find(']')
                    .ok_or(DecodeError::UnclosedBracket { pos: i })?;
                let end = i + 1 + close + 1;
                tokens.push(Token::Symbol {
                    text: &input[i..end],
                    pos: i,
                });
                i = end;
            }
            b'.' => {
                tokens.push(Token::Dot(i));
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    Ok(tokens)
}

/// The bracketed symbols of `input` in order, with each separator reported
/// as `"."`.
pub fn split_symbols(input: &str) -> Result<Vec<&str>, DecodeError> {
    Ok(tokenize(input)?.iter().map(|t| t.text()).collect())
}

/// Number of bracketed symbols in `input`, separators excluded.
pub fn symbol_count(input: &str) -> Result<usize, DecodeError> {
    Ok(tokenize(input)?
        .iter()
        .filter(|t| matches!(t, Token::Symbol { .. }))
        .count())
}
