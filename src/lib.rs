#![doc = r#"
# symexpr

An evaluator for integer arithmetic expressions over scalar variables and
one-dimensional array variables with subscript expressions.

## Overview

An expression such as `a + B[i * 2] / (c - 1)` is evaluated in four steps:

1. **Bracket matching** validates that `(` `)` and `[` `]` are balanced and
   correctly nested, and records the closing position for every opener.
2. **Symbol extraction** discovers each distinct scalar and array name. A name
   immediately followed by `[` is an array, every other name is a scalar.
3. **Value loading** binds values from `name value` and
   `name size (index,value) (index,value) ...` lines.
4. **Evaluation** walks the expression, recursing into every bracketed
   subexpression and indexing arrays with the truncated subscript value.

Supported operators are `+ - * /`, with `*` and `/` binding tighter than
`+` and `-`. Literals are integers; all arithmetic happens in [`Real`].

## Quick Start

```rust
use symexpr::interp;

let result = interp("x + A[1 + 1] * 2", ["x 5", "A 3 (2,9)"]).unwrap();
assert_eq!(result, 23.0);
```

## Step by step

```rust
use symexpr::Expression;

let mut expr = Expression::new("(a+(b-c))*(d+A[4])");
assert!(expr.is_legally_matched());
assert_eq!(expr.bracket_map().unwrap().opening_indices(), &[0, 3, 10, 14]);
assert_eq!(expr.bracket_map().unwrap().closing_indices(), &[8, 7, 17, 16]);

expr.build_symbols().unwrap();
expr.load_symbol_values(["a 1", "b 7", "c 2", "d 3", "A 5 (4,10)", "zz 99"])
    .unwrap();

assert_eq!(expr.evaluate().unwrap(), 78.0); // (1 + 5) * (3 + 10)
```

## Error Handling

```rust
use symexpr::{Expression, ExprError};

let expr = Expression::new("(a + b]");
match expr.evaluate() {
    Err(ExprError::MismatchedBracket { position, .. }) => assert_eq!(position, 6),
    other => panic!("unexpected: {:?}", other),
}

// Division by zero follows floating-point semantics.
assert!(symexpr::interp("1 / 0", Vec::<&str>::new()).unwrap().is_infinite());
```

## Feature Flags

- `f32`: use 32-bit floating point for results instead of the default `f64`.
"#]

pub mod brackets;
pub mod error;
pub mod eval;
pub mod expression;
pub mod lexer;
pub mod loader;
pub mod symbols;
pub mod types;

pub use brackets::*;
pub use error::ExprError;
pub use eval::*;
pub use expression::*;
pub use loader::*;
pub use symbols::*;
pub use types::*;

/// Define the floating-point type based on feature flags
#[cfg(feature = "f32")]
pub type Real = f32;

#[cfg(not(feature = "f32"))]
pub type Real = f64;

pub mod constants {
    use super::Real;

    #[cfg(feature = "f32")]
    pub const TEST_PRECISION: Real = 1e-6;

    #[cfg(not(feature = "f32"))]
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Whether `left` and `right` are within `eps` of each other.
///
/// Two NaNs compare equal, as do two infinities of the same sign.
#[doc(hidden)]
pub fn approx_eq(left: Real, right: Real, eps: Real) -> bool {
    if left.is_nan() || right.is_nan() {
        return left.is_nan() && right.is_nan();
    }
    if left.is_infinite() || right.is_infinite() {
        return left == right;
    }
    (left - right).abs() < eps
}

/// Assert that two [`Real`] values are equal within an epsilon, which
/// defaults to [`constants::TEST_PRECISION`].
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    ($left:expr, $right:expr, $eps:expr $(,)?) => {{
        let (left, right, eps): ($crate::Real, $crate::Real, $crate::Real) = ($left, $right, $eps);
        assert!(
            $crate::approx_eq(left, right, eps),
            "values differ by more than {}: left `{}`, right `{}`",
            eps,
            left,
            right
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_special_values() {
        assert!(approx_eq(Real::NAN, Real::NAN, 0.1));
        assert!(approx_eq(Real::INFINITY, Real::INFINITY, 0.1));
        assert!(!approx_eq(Real::INFINITY, Real::NEG_INFINITY, 0.1));
        assert!(!approx_eq(Real::NAN, 1.0, 0.1));
        assert!(!approx_eq(Real::INFINITY, Real::MAX, 0.1));
        assert_approx_eq!(0.1 + 0.2, 0.3);
    }
}
