//! Conversion of a parsed expression into a [`Value`].

use std::collections::BTreeSet;

use crate::{
    evaluator::{
        ConversionError, ConversionKind, DataEvalError, UnsafeKind, UnsafeSourceError,
        constructors,
    },
    parser::{BinaryOp, Expr, Literal, ParsedExpr, Span, UnaryOp},
    values::{Mapping, Value},
};

/// Bare names that may appear in a data expression, matched case-insensitively.
const NAME_CONSTANTS: [(&str, Value); 3] = [
    ("none", Value::None),
    ("true", Value::Bool(true)),
    ("false", Value::Bool(false)),
];

/// Result of a signed-number subtree. Integers are exact while the subtree is
/// folded and must fit `i64` once it is complete.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn as_float(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Walks a syntax tree and builds the value it describes, rejecting any node
/// outside the allow-list.
pub struct Converter<'a> {
    parsed: &'a ParsedExpr<'a>,
}

impl<'a> Converter<'a> {
    pub fn new(parsed: &'a ParsedExpr<'a>) -> Self {
        Self { parsed }
    }

    pub fn convert(&self) -> Result<Value, DataEvalError> {
        self.convert_expr(self.parsed.expr)
    }

    fn span_of(&self, expr: &Expr<'a>) -> Span {
        self.parsed
            .ann
            .span_of(expr)
            .unwrap_or_else(|| Span::new(0, self.parsed.ann.source.len()))
    }

    fn snippet(&self, expr: &Expr<'a>) -> String {
        self.parsed.ann.snippet(self.span_of(expr)).to_string()
    }

    fn unsafe_error(&self, expr: &Expr<'a>, kind: UnsafeKind) -> DataEvalError {
        UnsafeSourceError {
            kind,
            src: self.parsed.ann.source.to_string(),
            span: self.span_of(expr),
        }
        .into()
    }

    fn conversion_error(&self, expr: &Expr<'a>, kind: ConversionKind) -> DataEvalError {
        ConversionError {
            kind,
            src: self.parsed.ann.source.to_string(),
            span: self.span_of(expr),
        }
        .into()
    }

    fn malformed(&self, expr: &Expr<'a>) -> DataEvalError {
        self.unsafe_error(
            expr,
            UnsafeKind::MalformedNode {
                snippet: self.snippet(expr),
                dump: format!("{:?}", expr),
            },
        )
    }

    fn convert_expr(&self, expr: &'a Expr<'a>) -> Result<Value, DataEvalError> {
        tracing::trace!(node = expr.kind_name(), "converting");

        match expr {
            Expr::Literal(Literal::Str(s)) => Ok(Value::Str((*s).to_string())),
            Expr::Literal(Literal::Bytes(b)) => Ok(Value::Bytes(b.to_vec())),
            Expr::Literal(Literal::Int(_) | Literal::BigInt(_)) => self.convert_signed(expr),
            Expr::Literal(Literal::Float(f)) => Ok(Value::Float(*f)),
            Expr::Tuple(items) => Ok(Value::Tuple(self.convert_items(items)?)),
            Expr::List(items) => Ok(Value::List(self.convert_items(items)?)),
            Expr::Set(items) => {
                let mut set = BTreeSet::new();
                for item in items.iter() {
                    set.insert(self.convert_expr(item)?);
                }
                Ok(Value::Set(set))
            }
            Expr::Dict { keys, values } => {
                let mut mapping = Mapping::new();
                for (key, value) in keys.iter().zip(values.iter()) {
                    // `**mapping` unpacking has no key.
                    let Some(key) = key else {
                        return Err(self.malformed(value));
                    };
                    let key = self.convert_expr(key)?;
                    let value = self.convert_expr(value)?;
                    mapping.insert(key, value);
                }
                Ok(Value::Dict(mapping))
            }
            Expr::Name(name) => {
                let lowered = name.to_lowercase();
                NAME_CONSTANTS
                    .iter()
                    .find(|(candidate, _)| *candidate == lowered)
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| {
                        self.unsafe_error(
                            expr,
                            UnsafeKind::UnsupportedName {
                                name: (*name).to_string(),
                            },
                        )
                    })
            }
            Expr::Unary {
                op: UnaryOp::Pos | UnaryOp::Neg,
                ..
            }
            | Expr::Binary {
                op: BinaryOp::Add | BinaryOp::Sub,
                ..
            } => self.convert_signed(expr),
            Expr::Call {
                func,
                args,
                keywords,
            } => self.convert_call(expr, func, args, keywords.is_empty()),
            _ => Err(self.malformed(expr)),
        }
    }

    fn convert_items(&self, items: &'a [&'a Expr<'a>]) -> Result<Vec<Value>, DataEvalError> {
        items.iter().map(|item| self.convert_expr(item)).collect()
    }

    fn overflow(&self, expr: &'a Expr<'a>) -> DataEvalError {
        self.conversion_error(
            expr,
            ConversionKind::IntegerOverflow {
                snippet: self.snippet(expr),
            },
        )
    }

    /// Converts an integer literal or a sign or add/sub node, narrowing the
    /// folded result to `i64`.
    fn convert_signed(&self, expr: &'a Expr<'a>) -> Result<Value, DataEvalError> {
        match self.convert_number(expr)? {
            Number::Int(i) => i64::try_from(i)
                .map(Value::Int)
                .map_err(|_| self.overflow(expr)),
            Number::Float(f) => Ok(Value::Float(f)),
        }
    }

    /// Converts a sign or add/sub node whose operands are numeric literals or
    /// further sign and add/sub nodes.
    fn convert_number(&self, expr: &'a Expr<'a>) -> Result<Number, DataEvalError> {
        tracing::trace!(node = expr.kind_name(), "converting number");

        let overflow = || self.overflow(expr);

        match expr {
            Expr::Literal(Literal::Int(i)) => Ok(Number::Int(i128::from(*i))),
            Expr::Literal(Literal::BigInt(_)) => Err(overflow()),
            Expr::Literal(Literal::Float(f)) => Ok(Number::Float(*f)),
            Expr::Unary { op, expr: operand } => {
                let operand = self.convert_number(operand)?;
                match (op, operand) {
                    (UnaryOp::Pos, n) => Ok(n),
                    (UnaryOp::Neg, Number::Int(i)) => {
                        i.checked_neg().map(Number::Int).ok_or_else(overflow)
                    }
                    (UnaryOp::Neg, Number::Float(f)) => Ok(Number::Float(-f)),
                    _ => Err(self.malformed(expr)),
                }
            }
            Expr::Binary { op, left, right } => {
                if !matches!(op, BinaryOp::Add | BinaryOp::Sub) {
                    return Err(self.malformed(expr));
                }
                let left = self.convert_number(left)?;
                let right = self.convert_number(right)?;
                match (op, left, right) {
                    (BinaryOp::Add, Number::Int(a), Number::Int(b)) => {
                        a.checked_add(b).map(Number::Int).ok_or_else(overflow)
                    }
                    (BinaryOp::Sub, Number::Int(a), Number::Int(b)) => {
                        a.checked_sub(b).map(Number::Int).ok_or_else(overflow)
                    }
                    (BinaryOp::Add, a, b) => Ok(Number::Float(a.as_float() + b.as_float())),
                    _ => Ok(Number::Float(left.as_float() - right.as_float())),
                }
            }
            _ => Err(self.malformed(expr)),
        }
    }

    fn convert_call(
        &self,
        expr: &'a Expr<'a>,
        func: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
        no_keywords: bool,
    ) -> Result<Value, DataEvalError> {
        let Expr::Attribute { attr, .. } = func else {
            return Err(self.unsafe_error(
                expr,
                UnsafeKind::NotAConstructor {
                    snippet: self.snippet(expr),
                },
            ));
        };

        let starred = args.iter().any(|arg| matches!(arg, Expr::Starred(_)));
        if !no_keywords || starred {
            return Err(self.unsafe_error(
                expr,
                UnsafeKind::KeywordArguments {
                    snippet: self.snippet(expr),
                },
            ));
        }

        let Some((constructor, build)) = constructors::lookup(attr) else {
            return Err(self.conversion_error(
                expr,
                ConversionKind::UnknownConstructor {
                    name: (*attr).to_string(),
                },
            ));
        };

        let args = self.convert_items(args)?;
        tracing::trace!(constructor, arity = args.len(), "calling constructor");
        build(&args).map_err(|message| {
            self.conversion_error(
                expr,
                ConversionKind::InvalidArguments {
                    constructor,
                    message,
                },
            )
        })
    }
}

/// Convert a parsed expression into a value.
pub fn convert<'a>(parsed: &'a ParsedExpr<'a>) -> Result<Value, DataEvalError> {
    Converter::new(parsed).convert()
}
