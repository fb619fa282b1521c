//! Integration tests for the symexpr library
//! These tests run whole sessions: match, extract, load, evaluate.

use symexpr::{
    BracketMap, ExprError, Expression, Real, SymbolTables, assert_approx_eq, build_symbols,
    interp, is_legally_matched, load_symbol_values,
};

fn no_values() -> Vec<&'static str> {
    Vec::new()
}

#[test]
fn test_documented_scenarios() {
    assert_eq!(interp("x+1", ["x 5"]).unwrap(), 6.0);
    assert_eq!(interp("A[1+1]", ["A 3 (2,9)"]).unwrap(), 9.0);
    assert_eq!(interp("2+3*4", no_values()).unwrap(), 14.0);
    assert_eq!(interp("(2+3)*4", no_values()).unwrap(), 20.0);
    assert_eq!(interp("((1+2))*3", no_values()).unwrap(), 9.0);
}

#[test]
fn test_unknown_symbol_lines_do_not_affect_result() {
    let with_noise = interp("a*b", ["q 100", "a 6", "Z 3 (0,1)", "b 7", "zz 1"]).unwrap();
    let without = interp("a*b", ["a 6", "b 7"]).unwrap();
    assert_eq!(with_noise, 42.0);
    assert_eq!(with_noise, without);
}

#[test]
fn test_whitespace_is_insignificant() {
    let spaced = interp(" ( a + B [ 2 ] ) * 3 ", ["a 1", "B 3 (2,4)"]).unwrap();
    let tight = interp("(a+B[2])*3", ["a 1", "B 3 (2,4)"]).unwrap();
    assert_eq!(spaced, 15.0);
    assert_eq!(spaced, tight);
}

#[test]
fn test_mixed_expression() {
    let values = [
        "varx 3",
        "vary 2",
        "arrayA 5 (0,1) (1,2) (2,3) (3,4) (4,5)",
        "arrayB 3 (2,7)",
    ];
    let result = interp("arrayA[arrayB[2]-varx*vary+1]/(vary*2)", values);
    // arrayB[2] - 6 + 1 = 2, arrayA[2] = 3, 3 / 4
    assert_approx_eq!(result.unwrap(), 0.75 as Real);
}

#[test]
fn test_structural_errors_stop_evaluation() {
    for bad in ["(a+b", "a+b)", "A[1)", "((a]]", "]["] {
        assert!(!is_legally_matched(bad), "{} should not match", bad);
        let err = interp(bad, ["a 1", "b 2"]).unwrap_err();
        assert!(
            matches!(
                err,
                ExprError::UnmatchedBracket { .. }
                    | ExprError::MismatchedBracket { .. }
                    | ExprError::UnclosedBracket { .. }
            ),
            "unexpected error for {}: {:?}",
            bad,
            err
        );
    }
}

#[test]
fn test_malformed_values_abort_loading() {
    let err = interp("x + 1", ["x 1x"]).unwrap_err();
    assert!(matches!(err, ExprError::Parse(_)));
    assert!(err.to_string().starts_with("Parse error"));
}

#[test]
fn test_reader_loading() {
    let mut expr = Expression::new("total - C[i]");
    expr.build_symbols().unwrap();
    let source = "total 50\n\nC 4 (3,8)\ni 3\nunused 1\n";
    expr.load_symbol_values_from_reader(source.as_bytes()).unwrap();
    assert_eq!(expr.evaluate().unwrap(), 42.0);
}

#[test]
fn test_display_of_tables() {
    let mut expr = Expression::new("k + M[0]");
    expr.build_symbols().unwrap();
    expr.load_symbol_values(["k 2", "M 3 (1,5)"]).unwrap();
    let scalars: Vec<String> = expr.scalars().iter().map(|s| s.to_string()).collect();
    let arrays: Vec<String> = expr.arrays().iter().map(|a| a.to_string()).collect();
    assert_eq!(scalars, vec!["k=2"]);
    assert_eq!(arrays, vec!["M=[0, 5, 0]"]);
}

#[test]
fn test_symbol_tables_snapshot() {
    let mut symbols = build_symbols("p + Q[p]").unwrap();
    load_symbol_values(&mut symbols, ["p 1", "Q 2 (1,11)"]).unwrap();

    let json = serde_json::to_string(&symbols).unwrap();
    let restored: SymbolTables = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.scalar("p").unwrap().value, 1);
    assert_eq!(restored.array("Q").unwrap().values, Some(vec![0, 11]));

    let brackets = BracketMap::match_brackets("p + Q[p]").unwrap();
    let json = serde_json::to_string(&brackets).unwrap();
    let restored: BracketMap = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, brackets);
    assert_eq!(
        symexpr::evaluate("p + Q[p]", &restored, &symbols).unwrap(),
        12.0
    );
}

