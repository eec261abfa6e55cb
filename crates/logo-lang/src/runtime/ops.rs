//! Numeric semantics of every expression operator.

use crate::error::RuntimeErrorKind;
use crate::runtime::value::{as_bool, as_float};
use crate::syntax::ast::Operator;

/// Applies `op` to already-evaluated operands.
pub fn apply(op: Operator, args: &[f32]) -> Result<f32, RuntimeErrorKind> {
    let arity = op.arity();
    if !arity.accepts(args.len()) {
        return Err(RuntimeErrorKind::Arity {
            op: op.name().to_string(),
            expected: arity,
            found: args.len(),
        });
    }

    let unary = || args[0];
    let binary = || (args[0], args[1]);

    let result: f32 = match op {
        Operator::Sum => args.iter().sum(),
        Operator::Product => args.iter().product(),
        Operator::Difference => { let (a, b) = binary(); a - b }
        Operator::Minus => -unary(),
        Operator::Quotient => match *args {
            [d] => divide(1.0, d)?,
            [a, d] => divide(a, d)?,
            _ => unreachable!("arity checked above"),
        },
        Operator::Power => { let (a, b) = binary(); a.powf(b) }
        Operator::Remainder => {
            let (a, b) = binary();
            nonzero(b)?;
            (a % b).abs() * a.signum()
        }
        Operator::Modulo => {
            let (a, b) = binary();
            nonzero(b)?;
            (a % b).abs() * b.signum()
        }
        Operator::Abs => unary().abs(),
        Operator::Int => unary().trunc(),
        Operator::Round => (unary() + 0.5).trunc(),
        Operator::Sqrt => unary().sqrt(),
        Operator::Exp => unary().exp(),
        Operator::Ln => unary().ln(),
        Operator::Log10 => unary().log10(),
        Operator::Sin => unary().sin(),
        Operator::Cos => unary().cos(),
        Operator::Tan => unary().tan(),
        Operator::RadSin => unary().to_radians().sin(),
        Operator::RadCos => unary().to_radians().cos(),
        Operator::RadTan => unary().to_radians().tan(),
        Operator::ArcTan => arctan(args),
        Operator::RadArcTan => {
            let radians: Vec<f32> = args.iter().map(|a| a.to_radians()).collect();
            arctan(&radians)
        }
        Operator::Less => { let (a, b) = binary(); as_float(a < b) }
        Operator::Greater => { let (a, b) = binary(); as_float(a > b) }
        Operator::LessEqual => { let (a, b) = binary(); as_float(a <= b) }
        Operator::GreaterEqual => { let (a, b) = binary(); as_float(a >= b) }
        Operator::Equal => { let (a, b) = binary(); as_float(a == b) }
        Operator::NotEqual => { let (a, b) = binary(); as_float(a != b) }
        Operator::And => as_float(args.iter().all(|v| as_bool(*v))),
        Operator::Or => as_float(args.iter().any(|v| as_bool(*v))),
        Operator::Xor => as_float(args.iter().fold(false, |acc, v| acc ^ as_bool(*v))),
        Operator::Not => as_float(!as_bool(unary())),
        Operator::True => as_float(true),
        Operator::False => as_float(false),
    };
    Ok(result)
}

fn nonzero(divisor: f32) -> Result<(), RuntimeErrorKind> {
    if divisor == 0.0 { Err(RuntimeErrorKind::DivideByZero) } else { Ok(()) }
}

fn divide(a: f32, d: f32) -> Result<f32, RuntimeErrorKind> {
    nonzero(d)?;
    Ok(a / d)
}

fn arctan(args: &[f32]) -> f32 {
    match *args {
        [x] => x.atan(),
        [y, x] => y.atan2(x),
        _ => unreachable!("arity checked by caller"),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
