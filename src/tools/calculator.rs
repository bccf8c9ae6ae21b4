//! Arithmetic tool.
//!
//! Expressions are evaluated by a small recursive-descent parser over the
//! fixed grammar below. There are no identifiers, calls or attribute access,
//! so nothing but arithmetic is reachable from user input.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! number  := digits ['.' digits*] | '.' digits
//! ```

use crate::tools::registry::{ArgSpec, Tool, ToolArgs, ToolError};
use async_trait::async_trait;

pub const INVALID_EXPRESSION: &str =
    "Invalid math expression. Only numbers and basic operators are allowed.";
pub const CALCULATION_FAILED: &str = "Calculation failed. Check the math expression.";

const MAX_DEPTH: usize = 64;

const CALCULATOR_ARGS: &[ArgSpec] = &[ArgSpec::string("expression")];

/// True if `text` is non-empty and made only of digits, whitespace and
/// `+ - * / ( ) .`. Lexical only; says nothing about well-formedness.
pub fn is_arithmetic_expression(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(c))
}

/// Validate, evaluate and format an expression. Always returns display text.
pub fn calculate(expression: &str) -> String {
    if !is_arithmetic_expression(expression) {
        return INVALID_EXPRESSION.to_string();
    }
    match evaluate(expression) {
        Ok(value) => format_number(value),
        Err(err) => {
            tracing::error!("Calculator error: {}", err);
            CALCULATION_FAILED.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected token {0:?}")]
    UnexpectedToken(Token),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression nested too deeply")]
    TooDeep,
    #[error("result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    _ => Token::RParen,
                });
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                let mut dots = 0;
                while let Some(&(idx, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        end = idx + 1;
                        chars.next();
                    } else if d == '.' {
                        dots += 1;
                        end = idx + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                if dots > 1 || literal == "." {
                    return Err(CalcError::InvalidNumber(literal.to_string()));
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(literal.to_string()))?;
                tokens.push(Token::Number(value));
            }
            other => return Err(CalcError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.advance();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.advance();
            let rhs = self.unary()?;
            value = if op == Token::Star {
                value * rhs
            } else {
                if rhs == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                value / rhs
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        let value = match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.unary()?
            }
            Some(Token::Minus) => {
                self.advance();
                -self.unary()?
            }
            _ => self.primary()?,
        };
        self.depth -= 1;
        Ok(value)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(CalcError::UnexpectedToken(other)),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(other) => Err(CalcError::UnexpectedToken(other)),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(trailing) = parser.peek() {
        return Err(CalcError::UnexpectedToken(trailing));
    }
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(value)
}

/// Integral values print without a fractional part (`6`, not `6.0`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Use ONLY for evaluating simple, direct arithmetic expressions like '4 * (3 + 2)'. \
         This tool cannot handle abstract math concepts, variables, or word problems like \
         'what is calculus?'."
    }

    fn arguments(&self) -> &[ArgSpec] {
        CALCULATOR_ARGS
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        Ok(calculate(args.str("expression")?))
    }
}
