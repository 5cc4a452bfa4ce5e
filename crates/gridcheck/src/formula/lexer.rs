//! Tokenizer for formula expressions.

use super::FormulaError;

/// A formula token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Quoted column reference, trimmed and lowercased.
    Column(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Split formula text into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '=' | '!' | '<' | '>' => {
                let next_is_eq = chars.get(pos + 1) == Some(&'=');
                let token = match (ch, next_is_eq) {
                    ('=', true) => Token::Eq,
                    ('!', true) => Token::Ne,
                    ('<', true) => Token::Le,
                    ('>', true) => Token::Ge,
                    ('<', false) => Token::Lt,
                    ('>', false) => Token::Gt,
                    _ => return Err(FormulaError::Syntax(format!("unexpected '{}'", ch))),
                };
                pos += if next_is_eq { 2 } else { 1 };
                tokens.push(token);
                continue;
            }
            '\'' => {
                let start = pos + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&c| c == '\'')
                    .map(|offset| start + offset)
                    .ok_or_else(|| FormulaError::Syntax("unterminated column reference".to_string()))?;
                let name: String = chars[start..end].iter().collect();
                let name = name.trim().to_lowercase();
                if name.is_empty() {
                    return Err(FormulaError::Syntax("empty column reference".to_string()));
                }
                tokens.push(Token::Column(name));
                pos = end + 1;
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let (number, next) = read_number(&chars, pos)?;
                tokens.push(Token::Number(number));
                pos = next;
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                let token = if word.eq_ignore_ascii_case("and") {
                    Token::And
                } else if word.eq_ignore_ascii_case("or") {
                    Token::Or
                } else {
                    return Err(FormulaError::UnknownName(word));
                };
                tokens.push(token);
                continue;
            }
            other => return Err(FormulaError::Syntax(format!("unexpected '{}'", other))),
        };

        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

/// Read a numeric literal starting at `start`, returning it and the next position.
fn read_number(chars: &[char], start: usize) -> Result<(f64, usize), FormulaError> {
    let mut pos = start;
    while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
        pos += 1;
    }

    // Exponent, only when digits follow.
    if pos < chars.len() && matches!(chars[pos], 'e' | 'E') {
        let mut look = pos + 1;
        if look < chars.len() && matches!(chars[look], '+' | '-') {
            look += 1;
        }
        if look < chars.len() && chars[look].is_ascii_digit() {
            pos = look;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }

    let text: String = chars[start..pos].iter().collect();
    text.parse::<f64>()
        .map(|n| (n, pos))
        .map_err(|_| FormulaError::Syntax(format!("invalid number '{}'", text)))
}
