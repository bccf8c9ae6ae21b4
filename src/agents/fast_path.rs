//! Lexical check that lets pure arithmetic skip the model entirely.

use crate::tools::calculator::is_arithmetic_expression;

/// True when the trimmed query holds only digits, whitespace and
/// `+ - * / ( ) .`.
///
/// This is a character-class test, not a parse: `"1 +"` qualifies and is left
/// for the calculator to reject.
pub fn is_arithmetic(query: &str) -> bool {
    is_arithmetic_expression(query.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2 + 2")]
    #[case("  4 * (3 + 2)  ")]
    #[case("10/4")]
    #[case("-3.5 * 2")]
    #[case("1 +")]
    fn test_arithmetic_queries(#[case] query: &str) {
        assert!(is_arithmetic(query));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("what is 2 + 2")]
    #[case("2^3")]
    #[case("x * 2")]
    #[case("weather in Paris")]
    fn test_non_arithmetic_queries(#[case] query: &str) {
        assert!(!is_arithmetic(query));
    }
}
