//! Translation of Fortran rate expressions (as found in KROME network
//! files) into C. Handles the d/D double-precision exponent, the `**`
//! power operator and the `n(idx_X)` abundance-array syntax; everything
//! else (function calls, parentheses, arithmetic) passes through with
//! normalized spacing.
use crate::error::ChemNetError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
    Comma,
}

fn bad(expr: &str, reason: &str) -> ChemNetError {
    ChemNetError::RateExpression(format!("{} in \"{}\"", reason, expr))
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ChemNetError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Power);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '0'..='9' | '.' => {
                let mut num = String::new();
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    num.push(chars[i]);
                    i += 1;
                }
                // exponent marker, with d/D normalized to e
                if i < chars.len() && matches!(chars[i], 'e' | 'E' | 'd' | 'D') {
                    let mut j = i + 1;
                    let mut exp = String::new();
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        exp.push(chars[j]);
                        j += 1;
                    }
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        exp.push(chars[j]);
                        j += 1;
                    }
                    if exp.chars().any(|c| c.is_ascii_digit()) {
                        num.push('e');
                        num.push_str(&exp);
                        i = j;
                    }
                }
                tokens.push(Token::Number(num));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    ident.push(chars[i]);
                    i += 1;
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(bad(expr, &format!("unexpected character '{}'", other))),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    expr: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expect(&mut self, tok: Token) -> Result<(), ChemNetError> {
        if self.next() == Some(&tok) {
            Ok(())
        } else {
            Err(bad(self.expr, &format!("expected {:?}", tok)))
        }
    }

    fn expression(&mut self) -> Result<String, ChemNetError> {
        let mut out = self.term()?;
        while let Some(op) = self.peek() {
            let op = match op {
                Token::Plus => " + ",
                Token::Minus => " - ",
                _ => break,
            };
            self.pos += 1;
            out.push_str(op);
            out.push_str(&self.term()?);
        }
        Ok(out)
    }

    fn term(&mut self) -> Result<String, ChemNetError> {
        let mut out = self.unary()?;
        while let Some(op) = self.peek() {
            let op = match op {
                Token::Star => "*",
                Token::Slash => "/",
                _ => break,
            };
            self.pos += 1;
            out.push_str(op);
            out.push_str(&self.unary()?);
        }
        Ok(out)
    }

    fn unary(&mut self) -> Result<String, ChemNetError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(format!("-{}", self.unary()?))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    /// `**` is right-associative and becomes a pow() call.
    fn power(&mut self) -> Result<String, ChemNetError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            Ok(format!("pow({}, {})", base, exponent))
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> Result<String, ChemNetError> {
        match self.next().cloned() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Ident(name)) => {
                if self.peek() != Some(&Token::LParen) {
                    return Ok(name);
                }
                self.pos += 1;
                let mut args = vec![self.expression()?];
                while self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                    args.push(self.expression()?);
                }
                self.expect(Token::RParen)?;
                // n(idx_X) is the Fortran abundance array
                if name == "n" && args.len() == 1 && args[0].starts_with("idx_") {
                    return Ok(format!("y[{}]", args[0]));
                }
                let name = if name == "dexp" { "exp".to_string() } else { name };
                Ok(format!("{}({})", name, args.join(", ")))
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(format!("({})", inner))
            }
            _ => Err(bad(self.expr, "unexpected end of expression")),
        }
    }
}

/// Convert a Fortran arithmetic expression to C.
pub fn fortran_to_c(expr: &str) -> Result<String, ChemNetError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        expr,
    };
    let out = parser.expression()?;
    if parser.pos != tokens.len() {
        return Err(bad(expr, "trailing tokens"));
    }
    Ok(out)
}
