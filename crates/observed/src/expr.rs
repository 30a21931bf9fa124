use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

use symindex_core::{Name, Symbolic, SymbolicType, SymbolicTypeOf};

/// A unary function that can appear in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Exp,
    Ln,
    Sin,
    Cos,
    Sqrt,
    Abs,
}

impl Func {
    /// Applies the function to a value.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Exp => x.exp(),
            Self::Ln => x.ln(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Sqrt => x.sqrt(),
            Self::Abs => x.abs(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }
}

/// A binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Applies the operation to two values.
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Pow => a.powf(b),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }
}

/// A scalar expression over symbols of type `N`.
///
/// Expressions are the observed quantities of an [`ObservedSystem`]. A bare
/// [`Expr::Sym`] refers to a variable, parameter, independent variable, or
/// named observed quantity; everything else is a compound expression.
///
/// Build expressions with the arithmetic operators:
///
/// ```
/// use symindex_core::Name;
/// use symindex_observed::Expr;
///
/// let x: Expr = Expr::sym("x");
/// let k: Expr = Expr::sym("k");
/// let energy = 0.5 * k * x.clone() * x;
///
/// assert_eq!(energy.to_string(), "(((0.5 * k) * x) * x)");
/// assert_eq!(energy.free_symbols(), vec![&Name::from("k"), &Name::from("x")]);
/// ```
///
/// [`ObservedSystem`]: crate::ObservedSystem
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<N = Name> {
    Sym(N),
    Const(f64),
    Neg(Box<Expr<N>>),
    Binary(BinaryOp, Box<Expr<N>>, Box<Expr<N>>),
    Call(Func, Box<Expr<N>>),
}

impl<N> Expr<N> {
    /// Creates a symbol leaf.
    pub fn sym(name: impl Into<N>) -> Self {
        Self::Sym(name.into())
    }

    /// Creates a constant leaf.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::Const(value)
    }

    /// Returns the symbol if this expression is a bare symbol.
    #[must_use]
    pub fn as_sym(&self) -> Option<&N> {
        match self {
            Self::Sym(name) => Some(name),
            _ => None,
        }
    }

    /// Raises this expression to the power of another expression.
    #[must_use]
    pub fn pow(self, exponent: Expr<N>) -> Self {
        Self::Binary(BinaryOp::Pow, Box::new(self), Box::new(exponent))
    }

    /// Raises this expression to a constant power.
    #[must_use]
    pub fn powf(self, exponent: f64) -> Self {
        self.pow(Self::Const(exponent))
    }

    /// Applies a unary function to this expression.
    #[must_use]
    pub fn call(self, func: Func) -> Self {
        Self::Call(func, Box::new(self))
    }

    #[must_use]
    pub fn exp(self) -> Self {
        self.call(Func::Exp)
    }

    #[must_use]
    pub fn ln(self) -> Self {
        self.call(Func::Ln)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        self.call(Func::Sin)
    }

    #[must_use]
    pub fn cos(self) -> Self {
        self.call(Func::Cos)
    }

    #[must_use]
    pub fn sqrt(self) -> Self {
        self.call(Func::Sqrt)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        self.call(Func::Abs)
    }
}

impl<N: PartialEq> Expr<N> {
    /// Returns the distinct symbols in the expression, in order of first appearance.
    #[must_use]
    pub fn free_symbols(&self) -> Vec<&N> {
        let mut found = Vec::new();
        self.collect_symbols(&mut found);
        found
    }

    fn collect_symbols<'a>(&'a self, found: &mut Vec<&'a N>) {
        match self {
            Self::Sym(name) => {
                if !found.contains(&name) {
                    found.push(name);
                }
            }
            Self::Const(_) => {}
            Self::Neg(inner) | Self::Call(_, inner) => inner.collect_symbols(found),
            Self::Binary(_, lhs, rhs) => {
                lhs.collect_symbols(found);
                rhs.collect_symbols(found);
            }
        }
    }
}

impl<N> From<N> for Expr<N> {
    fn from(name: N) -> Self {
        Self::Sym(name)
    }
}

impl<N> SymbolicTypeOf for Expr<N> {
    const SYMBOLIC_TYPE: SymbolicType = SymbolicType::ScalarSymbolic;
}

impl<N: Symbolic> Symbolic for Expr<N> {
    fn name(&self) -> Option<Name> {
        self.as_sym().and_then(Symbolic::name)
    }
}

impl<N: fmt::Display> fmt::Display for Expr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sym(name) => write!(f, "{name}"),
            Self::Const(value) => write!(f, "{value}"),
            Self::Neg(inner) => write!(f, "-{inner}"),
            Self::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Call(func, inner) => write!(f, "{}({inner})", func.label()),
        }
    }
}

macro_rules! binary_ops {
    ($(($Trait:ident, $method:ident, $op:expr)),* $(,)?) => {$(
        impl<N> $Trait for Expr<N> {
            type Output = Expr<N>;

            fn $method(self, rhs: Expr<N>) -> Expr<N> {
                Expr::Binary($op, Box::new(self), Box::new(rhs))
            }
        }

        impl<N> $Trait<f64> for Expr<N> {
            type Output = Expr<N>;

            fn $method(self, rhs: f64) -> Expr<N> {
                Expr::Binary($op, Box::new(self), Box::new(Expr::Const(rhs)))
            }
        }

        impl<N> $Trait<Expr<N>> for f64 {
            type Output = Expr<N>;

            fn $method(self, rhs: Expr<N>) -> Expr<N> {
                Expr::Binary($op, Box::new(Expr::Const(self)), Box::new(rhs))
            }
        }
    )*};
}

binary_ops!(
    (Add, add, BinaryOp::Add),
    (Sub, sub, BinaryOp::Sub),
    (Mul, mul, BinaryOp::Mul),
    (Div, div, BinaryOp::Div),
);

impl<N> Neg for Expr<N> {
    type Output = Expr<N>;

    fn neg(self) -> Expr<N> {
        Expr::Neg(Box::new(self))
    }
}
