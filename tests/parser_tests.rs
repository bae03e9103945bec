// tests/parser_tests.rs

use odata_filter::ast::{ComparisonOp, FieldPath, FilterNode, FunctionName, Literal};
use odata_filter::lexer::tokenize;
use odata_filter::parser::{DEFAULT_MAX_HEIGHT, Parser, SyntaxError, parse, parse_filter};
use odata_filter::{FilterError, LexError};
use rust_decimal::Decimal;
use std::str::FromStr;

fn parse_ok(input: &str) -> FilterNode {
    parse_filter(input).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e))
}

fn syntax_err(input: &str) -> SyntaxError {
    match parse_filter(input) {
        Err(FilterError::Syntax(e)) => e,
        other => panic!("expected syntax error for {:?}, got {:?}", input, other),
    }
}

fn path(p: &str) -> FieldPath {
    FieldPath::parse(p).unwrap()
}

fn cmp(field: &str, value: i64) -> FilterNode {
    FilterNode::comparison(path(field), ComparisonOp::Eq, value)
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_simple_comparison() {
    assert_eq!(
        parse_ok("Name eq 'Milk'"),
        FilterNode::Comparison {
            field_path: FieldPath::new(["Name"]),
            operator: ComparisonOp::Eq,
            value: Literal::String("Milk".into()),
        }
    );
}

#[test]
fn test_every_comparison_operator() {
    let test_cases = vec![
        ("eq", ComparisonOp::Eq),
        ("ne", ComparisonOp::Ne),
        ("gt", ComparisonOp::Gt),
        ("ge", ComparisonOp::Ge),
        ("lt", ComparisonOp::Lt),
        ("le", ComparisonOp::Le),
    ];

    for (keyword, op) in test_cases {
        let input = format!("Price {} 10", keyword);
        assert_eq!(
            parse_ok(&input),
            FilterNode::comparison(path("Price"), op, 10),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_literal_types() {
    let test_cases = vec![
        ("a eq 'x'", Literal::String("x".into())),
        ("a eq -2.5", Literal::Number(Decimal::from_str("-2.5").unwrap())),
        ("a eq true", Literal::Boolean(true)),
        ("a eq FALSE", Literal::Boolean(false)),
        ("a eq null", Literal::Null),
    ];

    for (input, expected) in test_cases {
        match parse_ok(input) {
            FilterNode::Comparison { value, .. } => assert_eq!(value, expected, "Failed for input: {}", input),
            other => panic!("Expected comparison, got {:?}", other),
        }
    }
}

#[test]
fn test_navigation_path() {
    match parse_ok("Address/City ne 'Berlin'") {
        FilterNode::Comparison { field_path, .. } => {
            assert_eq!(field_path.segments(), ["Address".to_string(), "City".to_string()]);
            assert!(field_path.is_navigation());
        }
        other => panic!("Expected comparison, got {:?}", other),
    }
}

#[test]
fn test_quote_escaping() {
    assert_eq!(
        parse_ok("Name eq 'O''Brien'"),
        FilterNode::comparison(path("Name"), ComparisonOp::Eq, "O'Brien")
    );
}

#[test]
fn test_keywords_case_insensitive() {
    assert_eq!(parse_ok("a EQ 1 AND NOT b Eq 2"), parse_ok("a eq 1 and not b eq 2"));
}

// ============================================================================
// Precedence and Associativity
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        parse_ok("a eq 1 or b eq 2 and c eq 3"),
        FilterNode::or(cmp("a", 1), FilterNode::and(cmp("b", 2), cmp("c", 3)))
    );
}

#[test]
fn test_and_is_left_associative() {
    assert_eq!(
        parse_ok("a eq 1 and b eq 2 and c eq 3"),
        FilterNode::and(FilterNode::and(cmp("a", 1), cmp("b", 2)), cmp("c", 3))
    );
}

#[test]
fn test_or_is_left_associative() {
    assert_eq!(
        parse_ok("a eq 1 or b eq 2 or c eq 3"),
        FilterNode::or(FilterNode::or(cmp("a", 1), cmp("b", 2)), cmp("c", 3))
    );
}

#[test]
fn test_grouping_overrides_precedence() {
    assert_eq!(
        parse_ok("(a eq 1 or b eq 2) and c eq 3"),
        FilterNode::and(FilterNode::or(cmp("a", 1), cmp("b", 2)), cmp("c", 3))
    );
}

#[test]
fn test_grouping_on_the_right() {
    assert_eq!(
        parse_ok("a eq 1 and (b eq 2 and c eq 3)"),
        FilterNode::and(cmp("a", 1), FilterNode::and(cmp("b", 2), cmp("c", 3)))
    );
}

#[test]
fn test_redundant_parentheses_leave_no_trace() {
    assert_eq!(parse_ok("((((a eq 1))))"), cmp("a", 1));
}

#[test]
fn test_not_binds_to_next_comparison() {
    assert_eq!(
        parse_ok("not a eq 1 and b eq 2"),
        FilterNode::and(FilterNode::not(cmp("a", 1)), cmp("b", 2))
    );
}

#[test]
fn test_not_group() {
    assert_eq!(
        parse_ok("not (a eq 1 or b eq 2)"),
        FilterNode::not(FilterNode::or(cmp("a", 1), cmp("b", 2)))
    );
}

#[test]
fn test_double_not() {
    assert_eq!(parse_ok("not not a eq 1"), FilterNode::not(FilterNode::not(cmp("a", 1))));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_function_call() {
    assert_eq!(
        parse_ok("contains(Name,'foo')"),
        FilterNode::FunctionCall {
            name: FunctionName::Contains,
            field_path: FieldPath::new(["Name"]),
            argument: Literal::String("foo".into()),
        }
    );
}

#[test]
fn test_all_functions() {
    let test_cases = vec![
        ("contains(a, 'x')", FunctionName::Contains),
        ("StartsWith(a, 'x')", FunctionName::StartsWith),
        ("endswith (a , 'x')", FunctionName::EndsWith),
    ];

    for (input, name) in test_cases {
        assert_eq!(
            parse_ok(input),
            FilterNode::function_call(name, path("a"), "x"),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_function_in_logical_expression() {
    assert_eq!(
        parse_ok("startswith(Address/City, 'Ber') and not endswith(Code, 'X')"),
        FilterNode::and(
            FilterNode::function_call(FunctionName::StartsWith, path("Address/City"), "Ber"),
            FilterNode::not(FilterNode::function_call(FunctionName::EndsWith, path("Code"), "X")),
        )
    );
}

#[test]
fn test_field_named_like_function() {
    assert_eq!(
        parse_ok("contains eq 'x'"),
        FilterNode::comparison(path("contains"), ComparisonOp::Eq, "x")
    );
}

#[test]
fn test_function_arity() {
    let test_cases = vec![
        ("contains()", 0),
        ("contains(Name)", 1),
        ("contains(Name, 'a', 'b')", 3),
    ];

    for (input, found) in test_cases {
        assert_eq!(
            syntax_err(input),
            SyntaxError::FunctionArity {
                function: FunctionName::Contains,
                expected: 2,
                found,
                position: 0,
            },
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_function_argument_types() {
    assert!(matches!(
        syntax_err("contains('foo', Name)"),
        SyntaxError::InvalidArgument {
            function: FunctionName::Contains,
            position: 9,
            ..
        }
    ));
    assert!(matches!(
        syntax_err("startswith(Name, 5)"),
        SyntaxError::InvalidArgument {
            function: FunctionName::StartsWith,
            position: 17,
            ..
        }
    ));
    assert!(matches!(
        syntax_err("endswith(Name, Other)"),
        SyntaxError::InvalidArgument { position: 15, .. }
    ));
}

#[test]
fn test_function_argument_messages() {
    let test_cases = vec![
        ("startswith(Name, 5)", "found a number literal"),
        ("endswith(Name, null)", "found a null literal"),
        ("contains(Name, true)", "found a boolean literal"),
        ("contains(Name, Other)", "found identifier 'Other'"),
        ("contains(5, 'x')", "found number 5"),
    ];

    for (input, expected) in test_cases {
        let message = syntax_err(input).to_string();
        assert!(message.contains(expected), "Failed for input: {}: {}", input, message);
    }
}

#[test]
fn test_unsupported_function() {
    assert_eq!(
        syntax_err("tolower(Name) eq 'x'"),
        SyntaxError::UnsupportedFunction {
            name: "tolower".into(),
            position: 0,
        }
    );
    let message = syntax_err("a eq 1 and foo(b, 'x')").to_string();
    assert!(message.contains("unsupported function 'foo'"), "{}", message);
}

#[test]
fn test_function_missing_close() {
    assert_eq!(
        syntax_err("contains(Name, 'x'"),
        SyntaxError::UnmatchedParen { position: 8 }
    );
    assert_eq!(syntax_err("contains(Name,"), SyntaxError::UnmatchedParen { position: 8 });
}

#[test]
fn test_function_trailing_comma() {
    assert!(matches!(
        syntax_err("contains(Name,)"),
        SyntaxError::UnexpectedToken { position: 14, .. }
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(syntax_err(""), SyntaxError::EmptyInput);
    assert_eq!(syntax_err("   "), SyntaxError::EmptyInput);
    assert_eq!(parse(&[]), Err(SyntaxError::EmptyInput));
}

#[test]
fn test_missing_literal() {
    let err = syntax_err("a eq");
    assert!(matches!(err, SyntaxError::UnexpectedEnd { .. }));
    assert_eq!(err.position(), None);
}

#[test]
fn test_unterminated_string_is_lex_error() {
    assert!(matches!(
        parse_filter("a eq 'unterminated"),
        Err(FilterError::Lex(LexError::UnterminatedString { position: 5 }))
    ));
}

#[test]
fn test_unclosed_paren() {
    assert_eq!(syntax_err("(a eq 1"), SyntaxError::UnmatchedParen { position: 0 });
    assert_eq!(
        syntax_err("a eq 1 and ((b eq 2)"),
        SyntaxError::UnmatchedParen { position: 11 }
    );
}

#[test]
fn test_stray_close_paren() {
    assert_eq!(syntax_err("a eq 1)"), SyntaxError::UnmatchedParen { position: 6 });
    assert_eq!(syntax_err("(a eq 1))"), SyntaxError::UnmatchedParen { position: 8 });
    assert_eq!(syntax_err(") a eq 1"), SyntaxError::UnmatchedParen { position: 0 });
    assert_eq!(syntax_err("a eq 1 and )"), SyntaxError::UnmatchedParen { position: 11 });
    assert_eq!(syntax_err("not )"), SyntaxError::UnmatchedParen { position: 4 });
}

#[test]
fn test_close_paren_inside_open_group() {
    // The `)` closes the group, it just arrives where an operand belongs
    assert!(matches!(
        syntax_err("(a eq 1 and )"),
        SyntaxError::UnexpectedToken { position: 12, .. }
    ));
}

#[test]
fn test_unexpected_token_inside_group() {
    assert!(matches!(
        syntax_err("(a eq 1 b eq 2)"),
        SyntaxError::UnexpectedToken { position: 8, .. }
    ));
}

#[test]
fn test_empty_group() {
    assert!(matches!(
        syntax_err("()"),
        SyntaxError::UnexpectedToken { position: 1, .. }
    ));
}

#[test]
fn test_reversed_comparison_rejected() {
    assert!(matches!(
        syntax_err("'x' eq Name"),
        SyntaxError::UnexpectedToken { position: 0, .. }
    ));
    assert!(matches!(
        syntax_err("1 eq a"),
        SyntaxError::UnexpectedToken { position: 0, .. }
    ));
}

#[test]
fn test_field_on_right_rejected() {
    assert!(matches!(
        syntax_err("a eq b"),
        SyntaxError::UnexpectedToken { position: 5, .. }
    ));
}

#[test]
fn test_unsupported_operator() {
    assert_eq!(
        syntax_err("Price between 5"),
        SyntaxError::UnsupportedOperator {
            operator: "between".into(),
            position: 6,
        }
    );
}

#[test]
fn test_missing_operator() {
    assert!(matches!(syntax_err("Price"), SyntaxError::UnexpectedEnd { .. }));
    assert!(matches!(
        syntax_err("Price 5"),
        SyntaxError::UnexpectedToken { position: 6, .. }
    ));
}

#[test]
fn test_dangling_logical_operator() {
    assert!(matches!(syntax_err("a eq 1 and"), SyntaxError::UnexpectedEnd { .. }));
    assert!(matches!(syntax_err("not"), SyntaxError::UnexpectedEnd { .. }));
    assert!(matches!(
        syntax_err("and a eq 1"),
        SyntaxError::UnexpectedToken { position: 0, .. }
    ));
    assert!(matches!(
        syntax_err("a eq 1 or or b eq 2"),
        SyntaxError::UnexpectedToken { position: 10, .. }
    ));
}

#[test]
fn test_trailing_tokens() {
    assert_eq!(
        syntax_err("a eq 1 b"),
        SyntaxError::TrailingTokens {
            found: "identifier 'b'".into(),
            position: 7,
        }
    );
    assert!(matches!(
        syntax_err("a eq 1 2"),
        SyntaxError::TrailingTokens { position: 7, .. }
    ));
}

#[test]
fn test_invalid_field_paths() {
    assert_eq!(
        syntax_err("a//b eq 1"),
        SyntaxError::InvalidFieldPath {
            path: "a//b".into(),
            position: 0,
        }
    );
    assert!(matches!(syntax_err("a/ eq 1"), SyntaxError::InvalidFieldPath { .. }));
    assert!(matches!(
        syntax_err("contains(a/, 'x')"),
        SyntaxError::InvalidFieldPath { position: 9, .. }
    ));
}

#[test]
fn test_nesting_limit() {
    let deep = format!("{}a eq 1{}", "(".repeat(200), ")".repeat(200));
    assert!(matches!(
        syntax_err(&deep),
        SyntaxError::NestingTooDeep { limit: 128, .. }
    ));

    let nots = format!("{}a eq 1", "not ".repeat(200));
    assert!(matches!(syntax_err(&nots), SyntaxError::NestingTooDeep { .. }));

    let tokens = tokenize("((a eq 1))").unwrap();
    assert!(Parser::new(&tokens).with_max_depth(2).parse().is_ok());
    assert_eq!(
        Parser::new(&tokens).with_max_depth(1).parse(),
        Err(SyntaxError::NestingTooDeep { limit: 1, position: 1 })
    );
}

fn chain(operator: &str, terms: usize) -> String {
    vec!["a eq 1"; terms].join(&format!(" {} ", operator))
}

#[test]
fn test_long_chain_rejected() {
    for operator in ["and", "or"] {
        let input = chain(operator, 50_000);
        let err = syntax_err(&input);
        assert!(
            matches!(err, SyntaxError::ExpressionTooDeep { limit: DEFAULT_MAX_HEIGHT, .. }),
            "Failed for operator: {}: {:?}",
            operator,
            err
        );
    }

    // The first operator that would make the tree too tall
    let position = match syntax_err(&chain("and", 50_000)) {
        SyntaxError::ExpressionTooDeep { position, .. } => position,
        other => panic!("Expected ExpressionTooDeep, got {:?}", other),
    };
    assert_eq!(position, 11 * DEFAULT_MAX_HEIGHT - 4);
}

#[test]
fn test_chain_at_height_limit_is_usable() {
    let input = chain("and", DEFAULT_MAX_HEIGHT);
    let node = parse_ok(&input);

    assert_eq!(node.field_paths().len(), DEFAULT_MAX_HEIGHT);
    let printed = node.to_string();
    assert_eq!(printed, input);
    assert_eq!(parse_ok(&printed), node);
    drop(node);
}

#[test]
fn test_height_limit() {
    let tokens = tokenize("a eq 1 and b eq 2 and c eq 3").unwrap();
    assert!(Parser::new(&tokens).with_max_height(3).parse().is_ok());
    assert_eq!(
        Parser::new(&tokens).with_max_height(2).parse(),
        Err(SyntaxError::ExpressionTooDeep { limit: 2, position: 18 })
    );

    // Grouping adds no height, `not` adds one level
    let tokens = tokenize("not ((a eq 1))").unwrap();
    assert!(Parser::new(&tokens).with_max_height(2).parse().is_ok());
    assert_eq!(
        Parser::new(&tokens).with_max_height(1).parse(),
        Err(SyntaxError::ExpressionTooDeep { limit: 1, position: 0 })
    );

    // Height is the taller side of each operator
    let tokens = tokenize("a eq 1 or (b eq 2 and c eq 3)").unwrap();
    assert!(Parser::new(&tokens).with_max_height(3).parse().is_ok());
    assert_eq!(
        Parser::new(&tokens).with_max_height(2).parse(),
        Err(SyntaxError::ExpressionTooDeep { limit: 2, position: 7 })
    );
}

#[test]
fn test_parse_from_tokens() {
    let tokens = tokenize("a eq 1 and b eq 2").unwrap();
    assert_eq!(parse(&tokens).unwrap(), FilterNode::and(cmp("a", 1), cmp("b", 2)));
    // Tokens are borrowed, so the same sequence parses again
    assert_eq!(parse(&tokens).unwrap(), Parser::new(&tokens).parse().unwrap());
}

#[test]
fn test_error_positions() {
    let test_cases = vec![
        ("a eq 1 and b gt", None),
        ("a eq 1 and b gt )", Some(16)),
        ("(a eq 1", Some(0)),
        ("a eq 'x", Some(5)),
        ("a eq 1.", Some(5)),
    ];

    for (input, position) in test_cases {
        let err = parse_filter(input).unwrap_err();
        assert_eq!(err.position(), position, "Failed for input: {}", input);
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        syntax_err("contains(Name)").to_string(),
        "function 'contains' expects 2 arguments, found 1 at position 0"
    );
    assert_eq!(
        parse_filter("a eq 'x").unwrap_err().to_string(),
        "lex error: unterminated string literal starting at position 5"
    );
}
