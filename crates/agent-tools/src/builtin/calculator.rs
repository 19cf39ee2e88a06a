use crate::Tool;
use agent_core::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

/// Largest integer an f64 holds exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Deepest nesting of parentheses, signs and exponents the parser follows
const MAX_DEPTH: usize = 256;

/// Evaluates arithmetic
///
/// Accepts either an infix expression (`"2 + 3 * (4 - 1)"`) or a JSON object
/// such as `{"num1": 5, "num2": 3, "operation": "subtract"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCalculator;

#[async_trait]
impl Tool for BasicCalculator {
    async fn invoke(&self, input: &str) -> Result<Value> {
        let trimmed = input.trim();
        let result = if trimmed.starts_with('{') {
            let operands: Operands = serde_json::from_str(trimmed)
                .map_err(|e| Error::InvalidInput(format!("Invalid calculator object: {e}")))?;
            operands.evaluate()?
        } else {
            Parser::new(trimmed).parse()?
        };
        to_json_number(result)
    }

    fn name(&self) -> &str {
        "basic_calculator"
    }

    fn description(&self) -> &str {
        "Performs basic arithmetic. tool_input is either an expression such as \
         \"2 + 3 * (4 - 1)\" using + - * / % ^ and parentheses, or a JSON object \
         {\"num1\": number, \"num2\": number, \"operation\": \"add\" | \"subtract\" | \
         \"multiply\" | \"divide\" | \"modulus\" | \"power\"}."
    }
}

#[derive(Debug, Deserialize)]
struct Operands {
    num1: f64,
    num2: f64,
    operation: String,
}

impl Operands {
    fn evaluate(&self) -> Result<f64> {
        let op = match self.operation.trim().to_lowercase().as_str() {
            "add" | "plus" | "+" => '+',
            "subtract" | "minus" | "-" => '-',
            "multiply" | "times" | "*" => '*',
            "divide" | "/" => '/',
            "modulus" | "mod" | "%" => '%',
            "power" | "pow" | "^" | "**" => '^',
            other => {
                return Err(Error::InvalidInput(format!(
                    "Unsupported operation: {other}"
                )));
            }
        };
        apply(op, self.num1, self.num2)
    }
}

fn apply(op: char, lhs: f64, rhs: f64) -> Result<f64> {
    let value = match op {
        '+' => lhs + rhs,
        '-' => lhs - rhs,
        '*' => lhs * rhs,
        '/' | '%' if rhs == 0.0 => {
            return Err(Error::InvalidInput("Division by zero".to_string()));
        }
        '/' => lhs / rhs,
        '%' => lhs % rhs,
        '^' => lhs.powf(rhs),
        _ => return Err(Error::InvalidInput(format!("Unknown operator '{op}'"))),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput("Result is not a finite number".to_string()))
    }
}

/// Integral results are returned as JSON integers so `2+2` shows as `4`
fn to_json_number(value: f64) -> Result<Value> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT {
        Ok(json!(value as i64))
    } else {
        Ok(json!(value))
    }
}

/// Recursive-descent evaluator
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/' | '%') unary)*
/// unary   := ('-' | '+') unary | power
/// power   := primary ('^' unary)?
/// primary := number | '(' expr ')'
/// ```
struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        // `**` is accepted as an alias for `^`
        let normalized = input.replace("**", "^");
        Self {
            chars: normalized.chars().filter(|c| !c.is_whitespace()).collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<f64> {
        if self.chars.is_empty() {
            return Err(Error::InvalidInput("Empty expression".to_string()));
        }
        let value = self.expr()?;
        match self.peek() {
            None => Ok(value),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        while let Some(op @ ('*' | '/' | '%')) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.nested(Self::unary)?)
            }
            Some('+') => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.primary()?;
        if self.peek() == Some('^') {
            self.pos += 1;
            let exponent = self.nested(Self::unary)?;
            return apply('^', base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.nested(Self::expr)?;
                if self.peek() != Some(')') {
                    return Err(Error::InvalidInput("Missing closing parenthesis".to_string()));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(self.unexpected(c)),
            None => Err(Error::InvalidInput("Unexpected end of expression".to_string())),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid number '{literal}'")))
    }

    /// Run `rule` one level deeper, refusing input nested past [`MAX_DEPTH`]
    fn nested(&mut self, rule: fn(&mut Self) -> Result<f64>) -> Result<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::InvalidInput("Expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn unexpected(&self, c: char) -> Error {
        Error::InvalidInput(format!("Unexpected character '{c}' at position {}", self.pos))
    }
}
