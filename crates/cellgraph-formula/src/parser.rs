//! Formula parser
//!
//! A recursive descent parser over the token stream with the usual
//! arithmetic precedence. Binary operators are left-associative and unary
//! minus binds tighter than `*` and `/`.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::token::{tokenize, Token};
use cellgraph_core::CellId;

/// Default limit on nested parentheses and unary minus
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserOptions {
    /// Maximum nesting of `(` and unary `-` before parsing fails
    pub max_nesting_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use cellgraph_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=A1*B2+C3*D4").unwrap();
/// let ast = parse_formula("=-(A1+3)/2").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    parse_formula_with_options(formula, &ParserOptions::default())
}

/// Parse a formula string with explicit parser options
pub fn parse_formula_with_options(
    formula: &str,
    options: &ParserOptions,
) -> FormulaResult<FormulaExpr> {
    let tokens = tokenize(formula)?;
    parse_tokens(&tokens, options)
}

/// Parse an already tokenized formula body
///
/// The whole token slice must form exactly one expression.
pub fn parse_tokens(tokens: &[Token], options: &ParserOptions) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(tokens, options.max_nesting_depth);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    let rest = parser.remaining();
    if !rest.is_empty() {
        let rendered: Vec<String> = rest.iter().map(Token::to_string).collect();
        return Err(FormulaError::TrailingTokens(rendered.join(" ")));
    }

    Ok(expr)
}

/// Formula parser
struct FormulaParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(tokens: &'a [Token], max_depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    // === Helper methods ===

    fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) {
        self.pos += 1;
    }

    fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    fn enter_nested(&mut self) -> FormulaResult<()> {
        if self.depth >= self.max_depth {
            return Err(FormulaError::NestingTooDeep(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave_nested(&mut self) {
        self.depth -= 1;
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: -
    // 4. Primary: references, numbers, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Some(Token::Star) => BinaryOperator::Multiply,
                Some(Token::Slash) => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            let right = self.parse_unary()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        if matches!(self.current_token(), Some(Token::Minus)) {
            self.consume();

            // i64::MIN has no positive counterpart, so it is only reachable
            // as a negated literal
            if let Some(Token::Number(text)) = self.current_token() {
                if text.parse::<u64>().ok() == Some(i64::MIN.unsigned_abs()) {
                    self.consume();
                    return Ok(FormulaExpr::Constant(i64::MIN));
                }
            }

            self.enter_nested()?;
            let operand = self.parse_unary()?;
            self.leave_nested();
            return Ok(FormulaExpr::unary(UnaryOperator::Negate, operand));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        let token = self.current_token().ok_or(FormulaError::UnexpectedEnd)?;

        match token {
            Token::Ident(text) => {
                let address = CellId::parse(text)
                    .map_err(|_| FormulaError::UnexpectedToken(text.clone()))?;
                self.consume();
                Ok(FormulaExpr::CellRef(address))
            }

            Token::Number(text) => {
                let value: i64 = text
                    .parse()
                    .map_err(|_| FormulaError::InvalidNumber(text.clone()))?;
                self.consume();
                Ok(FormulaExpr::Constant(value))
            }

            Token::LeftParen => {
                self.consume();
                self.enter_nested()?;
                let expr = self.parse_expression()?;
                self.leave_nested();
                match self.current_token() {
                    Some(Token::RightParen) => {
                        self.consume();
                        Ok(expr)
                    }
                    _ => Err(FormulaError::UnclosedParen),
                }
            }

            other => Err(FormulaError::UnexpectedToken(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn val(n: i64) -> FormulaExpr {
        FormulaExpr::Constant(n)
    }

    fn cell(row: u32, col: u32) -> FormulaExpr {
        FormulaExpr::CellRef(CellId::new(row, col))
    }

    fn neg(x: FormulaExpr) -> FormulaExpr {
        FormulaExpr::unary(UnaryOperator::Negate, x)
    }

    fn add(x: FormulaExpr, y: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Add, x, y)
    }

    fn sub(x: FormulaExpr, y: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Subtract, x, y)
    }

    fn mul(x: FormulaExpr, y: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Multiply, x, y)
    }

    fn div(x: FormulaExpr, y: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Divide, x, y)
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse_formula("=1+1").unwrap(), add(val(1), val(1)));
        assert_eq!(parse_formula("=42").unwrap(), val(42));
        assert_eq!(parse_formula("=A1*13").unwrap(), mul(cell(0, 0), val(13)));
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        let spaced = parse_formula("=  12 + 14").unwrap();
        assert_eq!(spaced, add(val(12), val(14)));
        assert_eq!(spaced, parse_formula("=12+14").unwrap());
    }

    #[test]
    fn test_parse_mul_before_add() {
        let ast = parse_formula("=A1*B2+C3*D4").unwrap();
        assert_eq!(
            ast,
            add(mul(cell(0, 0), cell(1, 1)), mul(cell(2, 2), cell(3, 3)))
        );
    }

    #[test]
    fn test_parse_complex_formula() {
        let ast = parse_formula("=123 + C4*32 + B33*5 + 354").unwrap();
        assert_eq!(
            ast,
            add(
                add(add(val(123), mul(cell(2, 3), val(32))), mul(cell(1, 32), val(5))),
                val(354)
            )
        );
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(parse_formula("=-123").unwrap(), neg(val(123)));
        assert_eq!(
            parse_formula("=-123*-456").unwrap(),
            mul(neg(val(123)), neg(val(456)))
        );
        assert_eq!(
            parse_formula("=-123-456").unwrap(),
            sub(neg(val(123)), val(456))
        );
        assert_eq!(parse_formula("=--A1").unwrap(), neg(neg(cell(0, 0))));
    }

    #[test]
    fn test_parse_most_negative_literal() {
        assert_eq!(
            parse_formula("=-9223372036854775808").unwrap(),
            val(i64::MIN)
        );
        assert_eq!(
            parse_formula("=A1*-9223372036854775808").unwrap(),
            mul(cell(0, 0), val(i64::MIN))
        );
        assert_eq!(
            parse_formula("=--9223372036854775808").unwrap(),
            neg(val(i64::MIN))
        );
        // Smaller magnitudes keep the explicit negation
        assert_eq!(
            parse_formula("=-9223372036854775807").unwrap(),
            neg(val(i64::MAX))
        );
        assert_eq!(
            parse_formula("=9223372036854775808"),
            Err(FormulaError::InvalidNumber("9223372036854775808".into()))
        );
        assert_eq!(
            parse_formula("=-9223372036854775809"),
            Err(FormulaError::InvalidNumber("9223372036854775809".into()))
        );
    }

    #[test]
    fn test_parse_left_associative() {
        assert_eq!(
            parse_formula("=A1/B2/C3/D4").unwrap(),
            div(div(div(cell(0, 0), cell(1, 1)), cell(2, 2)), cell(3, 3))
        );
        assert_eq!(
            parse_formula("=10-4-3").unwrap(),
            sub(sub(val(10), val(4)), val(3))
        );
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(
            parse_formula("=(1+2)*3").unwrap(),
            mul(add(val(1), val(2)), val(3))
        );
        assert_eq!(
            parse_formula("=-(A1+2)").unwrap(),
            neg(add(cell(0, 0), val(2)))
        );
        assert_eq!(parse_formula("=((7))").unwrap(), val(7));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_formula("=A1*"), Err(FormulaError::UnexpectedEnd));
        assert_eq!(parse_formula("="), Err(FormulaError::UnexpectedEnd));
        assert_eq!(parse_formula("A1"), Err(FormulaError::MissingPrefix));
        assert_eq!(parse_formula("=(1+2"), Err(FormulaError::UnclosedParen));
        assert_eq!(
            parse_formula("=1+2)"),
            Err(FormulaError::TrailingTokens(")".into()))
        );
        assert_eq!(
            parse_formula("=1 2 3"),
            Err(FormulaError::TrailingTokens("2 3".into()))
        );
        assert_eq!(
            parse_formula("=ABC"),
            Err(FormulaError::UnexpectedToken("ABC".into()))
        );
        assert_eq!(
            parse_formula("=A0"),
            Err(FormulaError::UnexpectedToken("A0".into()))
        );
        assert_eq!(
            parse_formula("=*3"),
            Err(FormulaError::UnexpectedToken("*".into()))
        );
        assert_eq!(
            parse_formula("=()"),
            Err(FormulaError::UnexpectedToken(")".into()))
        );
        assert_eq!(
            parse_formula("=99999999999999999999"),
            Err(FormulaError::InvalidNumber("99999999999999999999".into()))
        );
    }

    #[test]
    fn test_parse_nesting_limit() {
        let options = ParserOptions {
            max_nesting_depth: 3,
        };
        assert_eq!(
            parse_formula_with_options("=(((1)))", &options).unwrap(),
            val(1)
        );
        assert_eq!(
            parse_formula_with_options("=((((1))))", &options),
            Err(FormulaError::NestingTooDeep(3))
        );
        assert_eq!(
            parse_formula_with_options("=----1", &options),
            Err(FormulaError::NestingTooDeep(3))
        );

        let deep = format!("={}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            parse_formula(&deep),
            Err(FormulaError::NestingTooDeep(DEFAULT_MAX_NESTING_DEPTH))
        );
    }

    #[test]
    fn test_parse_tokens_directly() {
        let tokens = tokenize("=B2-1").unwrap();
        let ast = parse_tokens(&tokens, &ParserOptions::default()).unwrap();
        assert_eq!(ast, sub(cell(1, 1), val(1)));
    }
}
