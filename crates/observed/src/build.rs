use std::fmt::Display;

use symindex_core::{Error, ObservedFn, StateOrder, SymbolicIndexing};

use crate::{
    BuildError,
    expr::{BinaryOp, Expr, Func},
};

/// An expression with every symbol resolved to a slot.
#[derive(Debug, Clone)]
enum Node {
    State(usize),
    Param(usize),
    Time,
    Const(f64),
    Observed(ObservedFn),
    Neg(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

impl Node {
    fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        match (&lhs, &rhs) {
            (Node::Const(a), Node::Const(b)) => Node::Const(op.apply(*a, *b)),
            _ => Node::Binary(op, Box::new(lhs), Box::new(rhs)),
        }
    }

    fn eval(&self, u: &[f64], p: &[f64], t: Option<f64>) -> Result<f64, Error> {
        match self {
            Node::State(index) => lookup(u, *index),
            Node::Param(index) => lookup(p, *index),
            Node::Time => t.ok_or(Error::MissingTime),
            Node::Const(value) => Ok(*value),
            Node::Observed(f) => f.call_scalar(u, p, t),
            Node::Neg(inner) => Ok(-inner.eval(u, p, t)?),
            Node::Binary(op, lhs, rhs) => Ok(op.apply(lhs.eval(u, p, t)?, rhs.eval(u, p, t)?)),
            Node::Call(func, inner) => Ok(func.apply(inner.eval(u, p, t)?)),
        }
    }
}

fn lookup(values: &[f64], index: usize) -> Result<f64, Error> {
    values.get(index).copied().ok_or(Error::OutOfBounds {
        index,
        len: values.len(),
    })
}

/// Builds a function that evaluates `expr` against the numeric state of `system`.
///
/// Every symbol in `expr` is resolved now, once:
///
/// - a variable becomes a position in the state vector, taken from `order`
///   when given (an explicit symbol list, or a time index passed to
///   [`SymbolicIndexing::variable_index_at`]) and from
///   [`SymbolicIndexing::variable_index`] otherwise
/// - a parameter becomes a position in the parameter vector
/// - an independent variable becomes the time argument
/// - an observed quantity becomes a call to the function returned by
///   [`SymbolicIndexing::observed`] (or [`SymbolicIndexing::observed_at`])
///
/// The returned function only holds these resolved slots. It takes a time
/// argument if and only if `system` is time dependent.
///
/// # Errors
///
/// Returns a [`BuildError`] if a symbol cannot be resolved or a nested
/// observed quantity cannot be built.
pub fn build<N, Sys>(
    system: &Sys,
    expr: &Expr<N>,
    order: Option<StateOrder<'_, N>>,
) -> Result<ObservedFn, BuildError>
where
    N: Clone + PartialEq + Display,
    Sys: SymbolicIndexing<N> + ?Sized,
{
    let node = resolve(system, expr, order)?;
    let time_dependent = system.is_time_dependent();
    tracing::debug!(%expr, time_dependent, "built observed function");

    Ok(if time_dependent {
        ObservedFn::timed(move |u, p, t| Ok(vec![node.eval(u, p, Some(t))?]))
    } else {
        ObservedFn::new(move |u, p| Ok(vec![node.eval(u, p, None)?]))
    })
}

fn resolve<N, Sys>(
    system: &Sys,
    expr: &Expr<N>,
    order: Option<StateOrder<'_, N>>,
) -> Result<Node, BuildError>
where
    N: Clone + PartialEq + Display,
    Sys: SymbolicIndexing<N> + ?Sized,
{
    Ok(match expr {
        Expr::Sym(sym) => resolve_symbol(system, sym, order)?,
        Expr::Const(value) => Node::Const(*value),
        Expr::Neg(inner) => match resolve(system, inner, order)? {
            Node::Const(value) => Node::Const(-value),
            node => Node::Neg(Box::new(node)),
        },
        Expr::Binary(op, lhs, rhs) => Node::binary(
            *op,
            resolve(system, lhs, order)?,
            resolve(system, rhs, order)?,
        ),
        Expr::Call(func, inner) => match resolve(system, inner, order)? {
            Node::Const(value) => Node::Const(func.apply(value)),
            node => Node::Call(*func, Box::new(node)),
        },
    })
}

fn resolve_symbol<N, Sys>(
    system: &Sys,
    sym: &N,
    order: Option<StateOrder<'_, N>>,
) -> Result<Node, BuildError>
where
    N: Clone + PartialEq + Display,
    Sys: SymbolicIndexing<N> + ?Sized,
{
    let unresolved = || BuildError::Unresolved(sym.to_string());

    match order {
        Some(StateOrder::Symbols(states)) => {
            if let Some(index) = states.iter().position(|s| s == sym) {
                return Ok(Node::State(index));
            }
        }
        Some(StateOrder::TimeIndex(i)) => {
            if system.is_variable(sym) {
                return system
                    .variable_index_at(sym, i)
                    .map(Node::State)
                    .ok_or_else(unresolved);
            }
        }
        None => {
            if system.is_variable(sym) {
                return system
                    .variable_index(sym)
                    .map(Node::State)
                    .ok_or_else(unresolved);
            }
        }
    }

    if system.is_parameter(sym) {
        let index = match order {
            Some(StateOrder::TimeIndex(i)) => system.parameter_index_at(sym, i),
            _ => system.parameter_index(sym),
        };
        return index.map(Node::Param).ok_or_else(unresolved);
    }

    if system.is_independent_variable(sym) {
        if !system.is_time_dependent() {
            return Err(BuildError::TimeWithoutIndependentVariable(sym.to_string()));
        }
        return Ok(Node::Time);
    }

    if system.is_observed(sym) {
        let nested = match order {
            Some(order) => system.observed_at(sym, order),
            None => system.observed(sym),
        };
        return nested
            .map(Node::Observed)
            .map_err(|source| BuildError::Nested {
                symbol: sym.to_string(),
                source,
            });
    }

    Err(unresolved())
}
