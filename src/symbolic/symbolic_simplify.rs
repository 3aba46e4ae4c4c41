//! # Symbolic Expression Simplification Module
//!
//! Light-weight algebraic clean-up applied to generated expressions (Jacobian entries,
//! parametric solution families) before they are inspected or printed:
//!
//! 1. **Constant Folding**: evaluates arithmetic on numerical constants
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x * 0 = 0, x ^ 1 = x, x ^ 0 = 1
//! 3. **Sign Folding**: (-1) * c = -c for constants

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Simplifies the expression bottom-up. The result evaluates to the same values as the
    /// input wherever the input is defined.
    ///
    /// ## Examples
    ///
    /// - `0 * (x + y)` → `0`
    /// - `(2 + 3) * x` → `5 * x`
    /// - `x ^ 1` → `x`
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let (lhs, rhs) = (lhs.simplify_(), rhs.simplify_());
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (Expr::Const(a), _) if *a == 0.0 => rhs,
                    (_, Expr::Const(b)) if *b == 0.0 => lhs,
                    _ => Expr::Add(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (lhs, rhs) = (lhs.simplify_(), rhs.simplify_());
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    (_, Expr::Const(b)) if *b == 0.0 => lhs,
                    (Expr::Const(a), _) if *a == 0.0 => {
                        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs)).simplify_()
                    }
                    _ if lhs == rhs => Expr::Const(0.0),
                    _ => Expr::Sub(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let (lhs, rhs) = (lhs.simplify_(), rhs.simplify_());
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    (Expr::Const(a), _) | (_, Expr::Const(a)) if *a == 0.0 => Expr::Const(0.0),
                    (Expr::Const(a), _) if *a == 1.0 => rhs,
                    (_, Expr::Const(b)) if *b == 1.0 => lhs,
                    (Expr::Const(a), Expr::Mul(inner_l, inner_r)) => match inner_l.as_ref() {
                        Expr::Const(b) => Expr::Mul(Box::new(Expr::Const(a * b)), inner_r.clone()),
                        _ => Expr::Mul(Box::new(lhs.clone()), Box::new(rhs.clone())),
                    },
                    (_, Expr::Const(_)) => Expr::Mul(Box::new(rhs), Box::new(lhs)),
                    _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Div(lhs, rhs) => {
                let (lhs, rhs) = (lhs.simplify_(), rhs.simplify_());
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
                    (_, Expr::Const(b)) if *b == 1.0 => lhs,
                    _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Pow(base, exp) => {
                let (base, exp) = (base.simplify_(), exp.simplify_());
                match (&base, &exp) {
                    (Expr::Const(_), Expr::Const(_)) => {
                        let folded = Expr::Pow(Box::new(base.clone()), Box::new(exp.clone()));
                        match folded.try_constant() {
                            Some(value) => Expr::Const(value),
                            None => folded,
                        }
                    }
                    (_, Expr::Const(e)) if *e == 1.0 => base,
                    (_, Expr::Const(e)) if *e == 0.0 => Expr::Const(1.0),
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            _ => match self.as_function() {
                Some((ctor, arg)) => {
                    let folded = ctor(Box::new(arg.simplify_()));
                    match folded.try_constant() {
                        Some(value) => Expr::Const(value),
                        None => folded,
                    }
                }
                None => self.clone(),
            },
        }
    }
}
