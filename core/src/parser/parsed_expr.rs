use crate::parser::{BinaryOp, BoolOp, ComparisonOp, UnaryOp, syntax::AnnotatedSource};

#[derive(Debug)]
pub struct ParsedExpr<'a> {
    pub expr: &'a Expr<'a>,
    pub ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

/// One node of an expression's syntax tree.
///
/// The tree covers every expression form the grammar recognises, not only the
/// ones the converter accepts, so that rejections can name what they found.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Literal(Literal<'a>),
    /// An f-string (or an implicit concatenation containing one), kept as
    /// source text.
    FormatStr(&'a str),
    Ellipsis,
    Name(&'a str),
    Tuple(&'a [&'a Expr<'a>]),
    List(&'a [&'a Expr<'a>]),
    Set(&'a [&'a Expr<'a>]),
    Dict {
        // REQUIRES: keys.len() == values.len()
        // A `None` key marks a `**mapping` unpacking entry.
        keys: &'a [Option<&'a Expr<'a>>],
        values: &'a [&'a Expr<'a>],
    },
    Starred(&'a Expr<'a>),
    Unary {
        op: UnaryOp,
        expr: &'a Expr<'a>,
    },
    Binary {
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Boolean {
        op: BoolOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Comparison {
        op: ComparisonOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Call {
        func: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
        keywords: &'a [Keyword<'a>],
    },
    Attribute {
        value: &'a Expr<'a>,
        attr: &'a str,
    },
    Subscript {
        value: &'a Expr<'a>,
        index: &'a Expr<'a>,
    },
    Slice {
        lower: Option<&'a Expr<'a>>,
        upper: Option<&'a Expr<'a>>,
        step: Option<&'a Expr<'a>>,
    },
    IfExp {
        test: &'a Expr<'a>,
        body: &'a Expr<'a>,
        orelse: &'a Expr<'a>,
    },
    Lambda {
        params: &'a [&'a str],
        body: &'a Expr<'a>,
    },
    NamedExpr {
        target: &'a str,
        value: &'a Expr<'a>,
    },
    Comprehension {
        kind: ComprehensionKind,
        element: &'a Expr<'a>,
        // Only set for dict comprehensions.
        value: Option<&'a Expr<'a>>,
        clauses: &'a [ComprehensionClause<'a>],
    },
}

impl<'a> Expr<'a> {
    pub fn as_ptr(&self) -> *const Self {
        self as *const _
    }

    /// Short human-readable name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(Literal::Str(_)) => "string literal",
            Expr::Literal(Literal::Bytes(_)) => "bytes literal",
            Expr::Literal(Literal::Int(_) | Literal::BigInt(_)) => "integer literal",
            Expr::Literal(Literal::Float(_)) => "float literal",
            Expr::Literal(Literal::Imaginary(_)) => "imaginary literal",
            Expr::FormatStr(_) => "f-string",
            Expr::Ellipsis => "ellipsis",
            Expr::Name(_) => "name",
            Expr::Tuple(_) => "tuple",
            Expr::List(_) => "list",
            Expr::Set(_) => "set",
            Expr::Dict { .. } => "dict",
            Expr::Starred(_) => "starred expression",
            Expr::Unary { .. } => "unary operation",
            Expr::Binary { .. } => "binary operation",
            Expr::Boolean { .. } => "boolean operation",
            Expr::Comparison { .. } => "comparison",
            Expr::Call { .. } => "call",
            Expr::Attribute { .. } => "attribute access",
            Expr::Subscript { .. } => "subscript",
            Expr::Slice { .. } => "slice",
            Expr::IfExp { .. } => "conditional expression",
            Expr::Lambda { .. } => "lambda",
            Expr::NamedExpr { .. } => "assignment expression",
            Expr::Comprehension { .. } => "comprehension",
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Literal<'a> {
    /// Integer literals carry no sign; `-1` is a unary minus.
    Int(u64),
    /// An integer literal too large for [`Literal::Int`], kept as written.
    BigInt(&'a str),
    Float(f64),
    Imaginary(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> core::fmt::Debug for Literal<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "Int({value})"),
            Literal::BigInt(text) => write!(f, "BigInt({text})"),
            Literal::Float(value) => write!(f, "Float({value:?})"),
            Literal::Imaginary(value) => write!(f, "Imaginary({value:?}j)"),
            Literal::Str(s) => write!(f, "Str({s:?})"),
            Literal::Bytes(bytes) => write!(f, "Bytes({bytes:?})"),
        }
    }
}

/// A keyword argument of a call. `name` is `None` for `**mapping`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword<'a> {
    pub name: Option<&'a str>,
    pub value: &'a Expr<'a>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComprehensionClause<'a> {
    For {
        target: &'a str,
        iter: &'a Expr<'a>,
        is_async: bool,
    },
    If(&'a Expr<'a>),
}
