//! Tests for expression parsing and evaluation.
use factor::prelude::*;

fn parse_err(source: &str) -> ParseError {
    match evaluate(source) {
        Err(ExprError::Parse(e)) => e,
        other => panic!("expected a parse error for '{}', got {:?}", source, other),
    }
}

#[test]
fn test_integer_arithmetic_is_exact() {
    assert_eq!(evaluate("2+3*4"), Ok(14.0));
    assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
    assert_eq!(evaluate("10-4-3"), Ok(3.0));
    assert_eq!(evaluate("2*3*4-5"), Ok(19.0));
    assert_eq!(evaluate("9007199254740991 - 1"), Ok(9007199254740990.0));
}

#[test]
fn test_division_is_floating_point() {
    assert_eq!(evaluate("1/6"), Ok(1.0 / 6.0));
    assert_eq!(evaluate("7/2"), Ok(3.5));
    assert_eq!(evaluate("100/10/2"), Ok(5.0));
}

#[test]
fn test_unary_minus_and_decimals() {
    assert_eq!(evaluate("-3*-2"), Ok(6.0));
    assert_eq!(evaluate("--4"), Ok(4.0));
    assert_eq!(evaluate("-(1+2)"), Ok(-3.0));
    assert_eq!(evaluate("1.5+.5"), Ok(2.0));
    assert_eq!(evaluate("2."), Ok(2.0));
    assert_eq!(evaluate("0.1 * 3"), Ok(0.1 * 3.0));
}

#[test]
fn test_whitespace_is_ignored() {
    assert_eq!(evaluate("  1 +\t2 *\n3 "), Ok(7.0));
}

#[test]
fn test_division_by_zero_is_eval_error() {
    assert_eq!(
        evaluate("1/0"),
        Err(ExprError::Eval(EvalError::DivisionByZero))
    );
    assert_eq!(
        evaluate("5/(2-2)"),
        Err(ExprError::Eval(EvalError::DivisionByZero))
    );
    assert_eq!(
        evaluate("1/-0"),
        Err(ExprError::Eval(EvalError::DivisionByZero))
    );
}

#[test]
fn test_overflowing_literal_is_eval_error() {
    let huge = format!("1{}", "0".repeat(400));
    assert!(matches!(
        evaluate(&huge),
        Err(ExprError::Eval(EvalError::Overflow { .. }))
    ));
}

#[test]
fn test_unclosed_parenthesis() {
    assert_eq!(
        parse_err("(2+3"),
        ParseError::UnclosedParenthesis { opened_at: 0 }
    );
}

#[test]
fn test_unmatched_closing_parenthesis() {
    assert_eq!(
        parse_err("2+3)"),
        ParseError::UnmatchedParenthesis { position: 3 }
    );
    assert_eq!(parse_err(")"), ParseError::UnmatchedParenthesis { position: 0 });
}

#[test]
fn test_malformed_input() {
    assert_eq!(parse_err(""), ParseError::Empty);
    assert_eq!(parse_err("   "), ParseError::Empty);
    assert_eq!(parse_err("2+"), ParseError::UnexpectedEnd);
    assert_eq!(
        parse_err("2 3"),
        ParseError::UnexpectedToken {
            found: "3".to_string(),
            position: 2
        }
    );
    assert_eq!(
        parse_err("()"),
        ParseError::UnexpectedToken {
            found: ")".to_string(),
            position: 1
        }
    );
    assert_eq!(
        parse_err("2*(3)x"),
        ParseError::UnexpectedCharacter {
            found: 'x',
            position: 5
        }
    );
    assert_eq!(
        parse_err("2(3)"),
        ParseError::UnexpectedToken {
            found: "(".to_string(),
            position: 1
        }
    );
}

#[test]
fn test_no_variables_or_functions() {
    assert!(matches!(
        parse_err("x + 1"),
        ParseError::UnexpectedCharacter { found: 'x', .. }
    ));
    assert!(matches!(
        parse_err("sin(1)"),
        ParseError::UnexpectedCharacter { found: 's', .. }
    ));
    assert!(matches!(
        parse_err("2^3"),
        ParseError::UnexpectedCharacter { found: '^', .. }
    ));
}

#[test]
fn test_nesting_limit() {
    let ok = format!("{}1{}", "(".repeat(64), ")".repeat(64));
    assert_eq!(evaluate(&ok), Ok(1.0));

    let too_deep = format!("{}1{}", "(".repeat(65), ")".repeat(65));
    assert_eq!(parse_err(&too_deep), ParseError::NestingTooDeep { limit: 64 });

    // Rejected before the unclosed parentheses are noticed.
    let unclosed = "(".repeat(1000);
    assert_eq!(parse_err(&unclosed), ParseError::NestingTooDeep { limit: 64 });
}

#[test]
fn test_length_limit() {
    let long = "1+".repeat(3000);
    assert_eq!(
        parse_err(&long),
        ParseError::TooLong {
            length: 6000,
            limit: 4096
        }
    );
}

#[test]
fn test_long_chains_evaluate() {
    let chain = format!("{}1", "1+".repeat(1000));
    assert_eq!(evaluate(&chain), Ok(1001.0));

    let minus_run = format!("{}5", "-".repeat(1001));
    assert_eq!(evaluate(&minus_run), Ok(-5.0));
}

#[test]
fn test_custom_limits() {
    let evaluator = Evaluator::new(ExpressionLimits {
        max_length: 8,
        max_depth: 2,
    });
    assert_eq!(evaluator.evaluate("((1))"), Ok(1.0));
    assert_eq!(
        evaluator.evaluate("(((1)))"),
        Err(ExprError::Parse(ParseError::NestingTooDeep { limit: 2 }))
    );
    assert_eq!(
        evaluator.evaluate("123456789"),
        Err(ExprError::Parse(ParseError::TooLong {
            length: 9,
            limit: 8
        }))
    );
}

#[test]
fn test_expression_display_is_canonical() {
    let evaluator = Evaluator::default();
    let cases = [
        ("1-(2-3)", "1 - (2 - 3)"),
        ("(1+2)*3", "(1 + 2) * 3"),
        ("1+2*3", "1 + 2 * 3"),
        ("(1+2)+3", "1 + 2 + 3"),
        ("-(1+2)", "-(1 + 2)"),
        ("8/(4/2)", "8 / (4 / 2)"),
        ("0.5", "0.5"),
    ];
    for (source, expected) in cases {
        let expr = evaluator.parse(source).unwrap();
        assert_eq!(expr.to_string(), expected);
        // Printing and re-parsing keeps the value.
        let reparsed = evaluator.parse(&expr.to_string()).unwrap();
        assert_eq!(
            factor::evaluator::eval_ast(&reparsed),
            factor::evaluator::eval_ast(&expr)
        );
    }
}

#[test]
fn test_ast_shape() {
    let expr = Evaluator::default().parse("1-2-3").unwrap();
    assert_eq!(
        expr,
        Expression::subtract(
            Expression::subtract(Expression::Literal(1.0), Expression::Literal(2.0)),
            Expression::Literal(3.0)
        )
    );
    assert_eq!(expr.node_count(), 5);
}
