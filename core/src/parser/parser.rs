use bumpalo::Bump;
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::error::{ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::parsed_expr::{ComprehensionClause, ComprehensionKind, Keyword};
use crate::parser::syntax::AnnotatedSource;
use crate::parser::{
    BinaryOp, BoolOp, ComparisonOp, Expr, Literal, ParsedExpr, UnaryOp, syntax::Span,
};
use crate::syntax::{bytes_literal, string_literal};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or_op, Assoc::Left))          // `or`
        .op(Op::infix(Rule::and_op, Assoc::Left))         // `and`
        .op(Op::prefix(Rule::not_op))                     // `not`

        // Comparison operators.
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::in_op, Assoc::Left) |
            Op::infix(Rule::not_in, Assoc::Left) |
            Op::infix(Rule::is_op, Assoc::Left) |
            Op::infix(Rule::is_not, Assoc::Left)
        )

        // Bitwise operators.
        .op(Op::infix(Rule::bit_or, Assoc::Left))         // `|`
        .op(Op::infix(Rule::bit_xor, Assoc::Left))        // `^`
        .op(Op::infix(Rule::bit_and, Assoc::Left))        // `&`
        .op(
            Op::infix(Rule::lshift, Assoc::Left) |
            Op::infix(Rule::rshift, Assoc::Left)
        )                                                 // `<<`, `>>`

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                 // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::matmul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::floordiv, Assoc::Left) |
            Op::infix(Rule::modulo, Assoc::Left)
        )                                                 // `*`, `@`, `/`, `//`, `%`
        .op(
            Op::prefix(Rule::neg) |
            Op::prefix(Rule::pos) |
            Op::prefix(Rule::invert)
        )                                                 // `-x`, `+x`, `~x`
        .op(Op::infix(Rule::pow, Assoc::Right))           // `**` (right-assoc)

        // Postfix operators.
        .op(
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::attr_op)
        )                                                 // `()`, `[]`, `.`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

type ParseResult<T> = Result<T, ParseError>;

struct ParseContext<'a, 'input> {
    arena: &'a Bump,
    original_source: &'input str, // To "transfer" slices to the arena allocated string.
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
    depth: core::cell::Cell<usize>,
    max_depth: usize,
}

impl<'a, 'input> ParseContext<'a, 'input> {
    // Returns a slice into `self.source` covering the same byte range that `s`
    // occupies within `self.original_source`.
    fn reslice(&self, s: &str) -> &'a str {
        let start = s.as_ptr() as usize - self.original_source.as_ptr() as usize;
        let end = start + s.len();
        &self.ann.source[start..end]
    }

    fn error(&self, kind: ParseErrorKind, span: impl Into<Span>) -> ParseError {
        ParseError::new(kind, self.original_source, span.into())
    }

    fn missing(&self, what: &str, span: pest::Span<'_>) -> ParseError {
        self.error(
            ParseErrorKind::Other {
                message: format!("missing {what}"),
            },
            span,
        )
    }

    fn next_pair<'p>(
        &self,
        pairs: &mut Pairs<'p, Rule>,
        what: &str,
        span: pest::Span<'_>,
    ) -> ParseResult<Pair<'p, Rule>> {
        pairs.next().ok_or_else(|| self.missing(what, span))
    }

    // A rule that ends in an optional or repeated part also covers the
    // whitespace and comments skipped before it. This span stops at the last
    // token instead.
    fn pair_span(&self, pair: &Pair<Rule>) -> Span {
        let span = pair.as_span();
        let Some(floor) = pair
            .clone()
            .into_inner()
            .flatten()
            .filter(|p| p.clone().into_inner().next().is_none())
            .map(|p| p.as_span().end())
            .max()
        else {
            return span.into();
        };

        let mut end = floor;
        let mut in_comment = false;
        for (i, c) in self.original_source[floor..span.end()].char_indices() {
            match c {
                '\n' | '\r' => in_comment = false,
                _ if in_comment => {}
                '#' => in_comment = true,
                ' ' | '\t' | '\x0C' | '\\' => {}
                _ => end = floor + i + c.len_utf8(),
            }
        }
        if end == floor {
            let text = &self.original_source[span.start()..floor];
            end = span.start() + text.trim_end().len();
        }
        Span::new(span.start(), end)
    }

    fn span_of(&self, expr: &'a Expr<'a>) -> Span {
        self.ann.span_of(expr).unwrap_or_else(|| Span::new(0, 0))
    }

    fn check_depth(&self, pair: &Pair<Rule>) -> ParseResult<()> {
        let current_depth = self.depth.get();
        if current_depth >= self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    depth: current_depth + 1,
                    max_depth: self.max_depth,
                },
                pair.as_span(),
            ));
        }
        self.depth.set(current_depth + 1);
        Ok(())
    }

    // Helper to allocate an expression with its span
    fn alloc_with_span(&self, expr: Expr<'a>, span: impl Into<Span>) -> &'a Expr<'a> {
        let node = self.arena.alloc(expr);
        self.ann.add_span(node, span.into());
        node
    }

    fn parse_expr(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        self.check_depth(&pair)?;
        let result = match pair.as_rule() {
            Rule::conditional => self.parse_conditional(pair),
            Rule::lambda_expr => self.parse_lambda(pair),
            Rule::operation => self.parse_operation(pair),
            Rule::starred => self.parse_starred(pair),
            Rule::named_expr => self.parse_named_expr(pair),
            Rule::paren => self.parse_paren(pair),
            Rule::list => self.parse_list(pair),
            Rule::brace => self.parse_brace(pair),
            Rule::kwargs_unpack => self.parse_expr_child(pair),
            Rule::ellipsis => Ok(self.alloc_with_span(Expr::Ellipsis, pair.as_span())),
            Rule::string => self.parse_string(pair),
            Rule::imaginary => self.parse_imaginary(pair),
            Rule::float => self.parse_float(pair),
            Rule::integer => self.parse_integer(pair),
            Rule::ident => self.parse_ident(pair),
            _ => Err(self.error(
                ParseErrorKind::Other {
                    message: format!("Unhandled rule: {:?}", pair.as_rule()),
                },
                pair.as_span(),
            )),
        };
        self.depth.set(self.depth.get() - 1);
        result
    }

    // Parses the single expression child of a wrapper rule.
    fn parse_expr_child(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        self.parse_expr(self.next_pair(&mut inner, "expression", span)?)
    }

    fn parse_main(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::EOI);
        let first = inner.next().ok_or_else(|| self.missing("expression", span))?;
        let first = self.parse_expr(first)?;
        match inner.next() {
            Some(rest) if rest.as_rule() == Rule::tuple_rest => {
                let end = self.pair_span(&rest).0.end;
                let items = self.parse_tuple_items(first, rest)?;
                let start = self.span_of(first).0.start;
                Ok(self.alloc_with_span(Expr::Tuple(items), Span::new(start, end)))
            }
            _ => Ok(first),
        }
    }

    fn parse_tuple_items(
        &self,
        first: &'a Expr<'a>,
        rest: Pair<Rule>,
    ) -> ParseResult<&'a [&'a Expr<'a>]> {
        let mut items = vec![first];
        for p in rest.into_inner() {
            items.push(self.parse_expr(p)?);
        }
        Ok(self.arena.alloc_slice_copy(&items))
    }

    fn parse_conditional(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let node_span = self.pair_span(&pair);
        let mut inner = pair
            .into_inner()
            .filter(|p| !matches!(p.as_rule(), Rule::kw_if | Rule::kw_else));
        let body = inner.next().ok_or_else(|| self.missing("expression", span))?;
        let body = self.parse_expr(body)?;
        let Some(test) = inner.next() else {
            return Ok(body);
        };
        let test = self.parse_expr(test)?;
        let orelse = inner.next().ok_or_else(|| self.missing("else branch", span))?;
        let orelse = self.parse_expr(orelse)?;
        Ok(self.alloc_with_span(Expr::IfExp { test, body, orelse }, node_span))
    }

    fn parse_lambda(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let node_span = self.pair_span(&pair);
        let mut params: &'a [&'a str] = &[];
        let mut body = None;
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::kw_lambda => {}
                Rule::lambda_params => {
                    let names: Vec<&'a str> = p
                        .into_inner()
                        .map(|param| self.reslice(param.as_str()))
                        .collect();
                    params = self.arena.alloc_slice_copy(&names);
                }
                _ => body = Some(self.parse_expr(p)?),
            }
        }
        let body = body.ok_or_else(|| self.missing("lambda body", span))?;
        Ok(self.alloc_with_span(Expr::Lambda { params, body }, node_span))
    }

    fn parse_starred(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = self.pair_span(&pair);
        let value = self.parse_expr_child(pair)?;
        Ok(self.alloc_with_span(Expr::Starred(value), span))
    }

    fn parse_named_expr(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let node_span = self.pair_span(&pair);
        let mut inner = pair.into_inner();
        let target = self.next_pair(&mut inner, "assignment target", span)?;
        let target = self.reslice(target.as_str());
        let value = self.parse_expr(self.next_pair(&mut inner, "expression", span)?)?;
        Ok(self.alloc_with_span(Expr::NamedExpr { target, value }, node_span))
    }

    // Every operator token adds at most one level to the tree, so the whole
    // chain is charged against the depth budget before the Pratt parser runs.
    fn parse_operation(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let operators = pair
            .clone()
            .into_inner()
            .filter(|p| is_operator(p.as_rule()))
            .count();
        let current_depth = self.depth.get();
        if current_depth + operators > self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    depth: current_depth + operators,
                    max_depth: self.max_depth,
                },
                pair.as_span(),
            ));
        }
        self.depth.set(current_depth + operators);
        let result = self.parse_operators(pair);
        self.depth.set(current_depth);
        result
    }

    fn parse_operators(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        PRATT_PARSER
            .map_primary(|primary| self.parse_expr(primary))
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                let span = Span::combine(&op.as_span().into(), &self.span_of(rhs));
                let op = match op.as_rule() {
                    Rule::neg => UnaryOp::Neg,
                    Rule::pos => UnaryOp::Pos,
                    Rule::invert => UnaryOp::Invert,
                    Rule::not_op => UnaryOp::Not,
                    rule => return Err(self.unknown_operator(rule, op.as_span())),
                };
                Ok(self.alloc_with_span(Expr::Unary { op, expr: rhs }, span))
            })
            .map_infix(|lhs, op, rhs| {
                let left = lhs?;
                let right = rhs?;
                let span = Span::combine(&self.span_of(left), &self.span_of(right));
                self.parse_infix_op(op, left, right, span)
            })
            .map_postfix(|lhs, op| {
                let value = lhs?;
                let span = Span::combine(&self.span_of(value), &op.as_span().into());
                match op.as_rule() {
                    Rule::call_op => self.parse_call(value, op, span),
                    Rule::index_op => self.parse_subscript(value, op, span),
                    Rule::attr_op => self.parse_attribute(value, op, span),
                    rule => Err(self.unknown_operator(rule, op.as_span())),
                }
            })
            .parse(pair.into_inner())
    }

    fn unknown_operator(&self, rule: Rule, span: pest::Span<'_>) -> ParseError {
        self.error(
            ParseErrorKind::Other {
                message: format!("Unknown operator: {:?}", rule),
            },
            span,
        )
    }

    fn parse_infix_op(
        &self,
        op: Pair<Rule>,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: Span,
    ) -> ParseResult<&'a Expr<'a>> {
        let binary = |op| Expr::Binary { op, left, right };
        let boolean = |op| Expr::Boolean { op, left, right };
        let comparison = |op| Expr::Comparison { op, left, right };

        let expr = match op.as_rule() {
            Rule::or_op => boolean(BoolOp::Or),
            Rule::and_op => boolean(BoolOp::And),
            Rule::eq => comparison(ComparisonOp::Eq),
            Rule::ne => comparison(ComparisonOp::Neq),
            Rule::lt => comparison(ComparisonOp::Lt),
            Rule::gt => comparison(ComparisonOp::Gt),
            Rule::le => comparison(ComparisonOp::Le),
            Rule::ge => comparison(ComparisonOp::Ge),
            Rule::in_op => comparison(ComparisonOp::In),
            Rule::not_in => comparison(ComparisonOp::NotIn),
            Rule::is_op => comparison(ComparisonOp::Is),
            Rule::is_not => comparison(ComparisonOp::IsNot),
            Rule::bit_or => binary(BinaryOp::BitOr),
            Rule::bit_xor => binary(BinaryOp::BitXor),
            Rule::bit_and => binary(BinaryOp::BitAnd),
            Rule::lshift => binary(BinaryOp::LShift),
            Rule::rshift => binary(BinaryOp::RShift),
            Rule::add => binary(BinaryOp::Add),
            Rule::sub => binary(BinaryOp::Sub),
            Rule::mul => binary(BinaryOp::Mul),
            Rule::matmul => binary(BinaryOp::MatMul),
            Rule::div => binary(BinaryOp::Div),
            Rule::floordiv => binary(BinaryOp::FloorDiv),
            Rule::modulo => binary(BinaryOp::Mod),
            Rule::pow => binary(BinaryOp::Pow),
            rule => return Err(self.unknown_operator(rule, op.as_span())),
        };
        Ok(self.alloc_with_span(expr, span))
    }

    fn parse_call(
        &self,
        func: &'a Expr<'a>,
        op: Pair<Rule>,
        span: Span,
    ) -> ParseResult<&'a Expr<'a>> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for arg in op.into_inner() {
            let arg_span = arg.as_span();
            match arg.as_rule() {
                Rule::keyword_arg => {
                    let mut inner = arg.into_inner();
                    let name = self.next_pair(&mut inner, "keyword name", arg_span)?;
                    let name = self.reslice(name.as_str());
                    let value = self.parse_expr(self.next_pair(&mut inner, "value", arg_span)?)?;
                    keywords.push(Keyword {
                        name: Some(name),
                        value,
                    });
                }
                Rule::kwargs_unpack => {
                    let value = self.parse_expr(arg)?;
                    keywords.push(Keyword { name: None, value });
                }
                Rule::positional_arg => {
                    let node_span = self.pair_span(&arg);
                    let mut inner = arg.into_inner();
                    let element = self.parse_expr(self.next_pair(&mut inner, "argument", arg_span)?)?;
                    match inner.next() {
                        Some(clause) => args.push(self.parse_comprehension(
                            ComprehensionKind::Generator,
                            element,
                            None,
                            clause,
                            node_span,
                        )?),
                        None => args.push(element),
                    }
                }
                _ => args.push(self.parse_expr(arg)?),
            }
        }
        Ok(self.alloc_with_span(
            Expr::Call {
                func,
                args: self.arena.alloc_slice_copy(&args),
                keywords: self.arena.alloc_slice_clone(&keywords),
            },
            span,
        ))
    }

    fn parse_subscript(
        &self,
        value: &'a Expr<'a>,
        op: Pair<Rule>,
        span: Span,
    ) -> ParseResult<&'a Expr<'a>> {
        let op_span = op.as_span();
        let mut inner = op.into_inner();
        let first = self.parse_subscript_item(self.next_pair(&mut inner, "subscript", op_span)?)?;
        let index = match inner.next() {
            Some(rest) => {
                let mut items = vec![first];
                for item in rest.into_inner() {
                    items.push(self.parse_subscript_item(item)?);
                }
                let inner_span = Span::new(op_span.start() + 1, op_span.end() - 1);
                self.alloc_with_span(Expr::Tuple(self.arena.alloc_slice_copy(&items)), inner_span)
            }
            None => first,
        };
        Ok(self.alloc_with_span(Expr::Subscript { value, index }, span))
    }

    fn parse_subscript_item(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let node_span = self.pair_span(&pair);
        let mut lower = None;
        let mut slice = None;
        for p in pair.into_inner() {
            if p.as_rule() == Rule::slice_tail {
                slice = Some(p);
            } else {
                lower = Some(self.parse_expr(p)?);
            }
        }
        let Some(tail) = slice else {
            return lower.ok_or_else(|| self.missing("subscript", span));
        };
        let mut upper = None;
        let mut step = None;
        for p in tail.into_inner() {
            let bound = Some(self.parse_expr_child(p.clone())?);
            match p.as_rule() {
                Rule::slice_upper => upper = bound,
                _ => step = bound,
            }
        }
        Ok(self.alloc_with_span(Expr::Slice { lower, upper, step }, node_span))
    }

    fn parse_attribute(
        &self,
        value: &'a Expr<'a>,
        op: Pair<Rule>,
        span: Span,
    ) -> ParseResult<&'a Expr<'a>> {
        let op_span = op.as_span();
        let mut inner = op.into_inner();
        let attr = self.next_pair(&mut inner, "attribute name", op_span)?;
        Ok(self.alloc_with_span(
            Expr::Attribute {
                value,
                attr: self.reslice(attr.as_str()),
            },
            span,
        ))
    }

    fn parse_paren(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let Some(first) = inner.next() else {
            return Ok(self.alloc_with_span(Expr::Tuple(&[]), span));
        };
        let first = self.parse_expr(first)?;
        match inner.next() {
            None => Ok(first),
            Some(rest) if rest.as_rule() == Rule::tuple_rest => {
                let items = self.parse_tuple_items(first, rest)?;
                Ok(self.alloc_with_span(Expr::Tuple(items), span))
            }
            Some(clause) => self.parse_comprehension(
                ComprehensionKind::Generator,
                first,
                None,
                clause,
                span.into(),
            ),
        }
    }

    fn parse_list(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let mut items = Vec::new();
        for p in pair.into_inner() {
            if p.as_rule() == Rule::comp_clause {
                let element = items
                    .pop()
                    .ok_or_else(|| self.missing("comprehension element", span))?;
                return self.parse_comprehension(
                    ComprehensionKind::List,
                    element,
                    None,
                    p,
                    span.into(),
                );
            }
            items.push(self.parse_expr(p)?);
        }
        Ok(self.alloc_with_span(Expr::List(self.arena.alloc_slice_copy(&items)), span))
    }

    fn parse_brace(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let Some(first) = inner.next() else {
            return Ok(self.alloc_with_span(
                Expr::Dict {
                    keys: &[],
                    values: &[],
                },
                span,
            ));
        };

        if first.as_rule() == Rule::kwargs_unpack {
            let value = self.parse_expr(first)?;
            let rest = self.next_pair(&mut inner, "dict entries", span)?;
            return self.parse_dict(vec![None], vec![value], rest, span.into());
        }

        let first = self.parse_expr(first)?;
        let second = self.next_pair(&mut inner, "set or dict body", span)?;
        match second.as_rule() {
            Rule::dict_value => {
                let value = self.parse_expr_child(second)?;
                let third = self.next_pair(&mut inner, "dict entries", span)?;
                if third.as_rule() == Rule::comp_clause {
                    self.parse_comprehension(
                        ComprehensionKind::Dict,
                        first,
                        Some(value),
                        third,
                        span.into(),
                    )
                } else {
                    self.parse_dict(vec![Some(first)], vec![value], third, span.into())
                }
            }
            Rule::comp_clause => self.parse_comprehension(
                ComprehensionKind::Set,
                first,
                None,
                second,
                span.into(),
            ),
            _ => {
                let mut items = vec![first];
                for p in second.into_inner() {
                    items.push(self.parse_expr(p)?);
                }
                Ok(self.alloc_with_span(Expr::Set(self.arena.alloc_slice_copy(&items)), span))
            }
        }
    }

    fn parse_dict(
        &self,
        mut keys: Vec<Option<&'a Expr<'a>>>,
        mut values: Vec<&'a Expr<'a>>,
        rest: Pair<Rule>,
        span: Span,
    ) -> ParseResult<&'a Expr<'a>> {
        let rest_span = rest.as_span();
        let mut pending_key = None;
        for p in rest.into_inner() {
            match p.as_rule() {
                Rule::kwargs_unpack => {
                    keys.push(None);
                    values.push(self.parse_expr(p)?);
                }
                Rule::dict_value => {
                    let key = pending_key
                        .take()
                        .ok_or_else(|| self.missing("dict key", rest_span))?;
                    keys.push(Some(key));
                    values.push(self.parse_expr_child(p)?);
                }
                _ => pending_key = Some(self.parse_expr(p)?),
            }
        }
        Ok(self.alloc_with_span(
            Expr::Dict {
                keys: self.arena.alloc_slice_copy(&keys),
                values: self.arena.alloc_slice_copy(&values),
            },
            span,
        ))
    }

    fn parse_comprehension(
        &self,
        kind: ComprehensionKind,
        element: &'a Expr<'a>,
        value: Option<&'a Expr<'a>>,
        clause: Pair<Rule>,
        span: Span,
    ) -> ParseResult<&'a Expr<'a>> {
        let mut clauses = Vec::new();
        for c in clause.into_inner() {
            let c_span = c.as_span();
            match c.as_rule() {
                Rule::comp_for => {
                    let mut is_async = false;
                    let mut target = None;
                    let mut iter = None;
                    for p in c.into_inner() {
                        match p.as_rule() {
                            Rule::kw_async => is_async = true,
                            Rule::kw_for | Rule::kw_in => {}
                            Rule::comp_target => {
                                let target_span = self.pair_span(&p);
                                target = Some(self.ann.snippet(target_span));
                            }
                            _ => iter = Some(self.parse_expr(p)?),
                        }
                    }
                    clauses.push(ComprehensionClause::For {
                        target: target.ok_or_else(|| self.missing("loop target", c_span))?,
                        iter: iter.ok_or_else(|| self.missing("loop iterable", c_span))?,
                        is_async,
                    });
                }
                _ => {
                    let cond = c
                        .into_inner()
                        .find(|p| p.as_rule() != Rule::kw_if)
                        .ok_or_else(|| self.missing("condition", c_span))?;
                    clauses.push(ComprehensionClause::If(self.parse_expr(cond)?));
                }
            }
        }
        Ok(self.alloc_with_span(
            Expr::Comprehension {
                kind,
                element,
                value,
                clauses: self.arena.alloc_slice_clone(&clauses),
            },
            span,
        ))
    }

    fn parse_string(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let node_span = self.pair_span(&pair);
        let mut text = String::new();
        let mut bytes: Vec<u8> = Vec::new();
        let mut saw_bytes = false;
        let mut saw_str = false;
        let mut saw_format = false;

        for piece in pair.into_inner() {
            let piece_span = piece.as_span();
            let mut prefix = "";
            let mut body = None;
            for p in piece.into_inner() {
                match p.as_rule() {
                    Rule::string_prefix => prefix = p.as_str(),
                    _ => body = Some(p),
                }
            }
            let body = body.ok_or_else(|| self.missing("string body", piece_span))?;
            let prefix = prefix.to_ascii_lowercase();
            let raw = prefix.contains('r');
            let literal_error = |message: String| {
                self.error(ParseErrorKind::InvalidLiteral { message }, piece_span)
            };

            if prefix.contains('b') {
                saw_bytes = true;
                let decoded = bytes_literal::unescape_bytes(body.as_str(), raw)
                    .map_err(|e| literal_error(format!("Invalid bytes literal: {}", e)))?;
                bytes.extend_from_slice(&decoded);
            } else {
                saw_str = true;
                saw_format |= prefix.contains('f');
                string_literal::unescape_string_into(&mut text, body.as_str(), raw)
                    .map_err(|e| literal_error(format!("Invalid string literal: {}", e)))?;
            }
        }

        if saw_bytes && saw_str {
            return Err(self.error(
                ParseErrorKind::InvalidLiteral {
                    message: "cannot mix bytes and nonbytes literals".to_string(),
                },
                span,
            ));
        }

        let expr = if saw_format {
            Expr::FormatStr(self.ann.snippet(node_span.clone()))
        } else if saw_bytes {
            Expr::Literal(Literal::Bytes(self.arena.alloc_slice_copy(&bytes)))
        } else {
            Expr::Literal(Literal::Str(self.arena.alloc_str(&text)))
        };
        Ok(self.alloc_with_span(expr, node_span))
    }

    fn parse_integer(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let integer_type = self.next_pair(&mut inner, "integer digits", span)?;
        let number_str = integer_type.as_str().replace('_', "");

        let value = match integer_type.as_rule() {
            Rule::dec_integer => number_str.parse::<u64>(),
            Rule::bin_integer => u64::from_str_radix(&number_str[2..], 2),
            Rule::oct_integer => u64::from_str_radix(&number_str[2..], 8),
            Rule::hex_integer => u64::from_str_radix(&number_str[2..], 16),
            rule => {
                return Err(self.error(
                    ParseErrorKind::Other {
                        message: format!("Unknown integer format: {:?}", rule),
                    },
                    span,
                ));
            }
        };

        // The grammar only admits digits, so the only failure left is size.
        let literal = match value {
            Ok(value) => Literal::Int(value),
            Err(_) => Literal::BigInt(self.reslice(span.as_str())),
        };
        Ok(self.alloc_with_span(Expr::Literal(literal), span))
    }

    fn parse_float(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let value = self.parse_float_text(pair.as_str(), span)?;
        Ok(self.alloc_with_span(Expr::Literal(Literal::Float(value)), span))
    }

    fn parse_imaginary(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        let text = pair.as_str();
        let value = self.parse_float_text(&text[..text.len() - 1], span)?;
        Ok(self.alloc_with_span(Expr::Literal(Literal::Imaginary(value)), span))
    }

    fn parse_float_text(&self, text: &str, span: pest::Span<'_>) -> ParseResult<f64> {
        text.replace('_', "").parse::<f64>().map_err(|_| {
            self.error(
                ParseErrorKind::InvalidNumber {
                    text: span.as_str().to_string(),
                },
                span,
            )
        })
    }

    fn parse_ident(&self, pair: Pair<Rule>) -> ParseResult<&'a Expr<'a>> {
        let span = pair.as_span();
        Ok(self.alloc_with_span(Expr::Name(self.reslice(pair.as_str())), span))
    }
}

fn is_operator(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::not_op
            | Rule::neg
            | Rule::pos
            | Rule::invert
            | Rule::or_op
            | Rule::and_op
            | Rule::not_in
            | Rule::is_not
            | Rule::in_op
            | Rule::is_op
            | Rule::eq
            | Rule::ne
            | Rule::le
            | Rule::lt
            | Rule::ge
            | Rule::gt
            | Rule::bit_or
            | Rule::bit_xor
            | Rule::bit_and
            | Rule::lshift
            | Rule::rshift
            | Rule::add
            | Rule::sub
            | Rule::pow
            | Rule::mul
            | Rule::matmul
            | Rule::floordiv
            | Rule::div
            | Rule::modulo
            | Rule::call_op
            | Rule::index_op
            | Rule::attr_op
    )
}

/// Default maximum nesting depth for expression parsing.
/// This prevents stack overflow from deeply nested expressions like `[[[[...]]]]`.
pub const DEFAULT_MAX_PARSE_DEPTH: usize = 500;

/// Parses a single expression with the default maximum nesting depth.
///
/// For custom depth limits, use [`parse_with_max_depth`].
pub fn parse<'a, 'i>(arena: &'a Bump, source: &'i str) -> Result<&'a ParsedExpr<'a>, ParseError>
where
    'i: 'a,
{
    parse_with_max_depth(arena, source, DEFAULT_MAX_PARSE_DEPTH)
}

/// Parses a single expression with a custom maximum nesting depth.
///
/// The `max_depth` parameter controls how deeply expressions can be nested
/// (parentheses, containers, operators, ...) before returning an error. The
/// default limit used by [`parse`] is [`DEFAULT_MAX_PARSE_DEPTH`].
pub fn parse_with_max_depth<'a, 'i>(
    arena: &'a Bump,
    source: &'i str,
    max_depth: usize,
) -> Result<&'a ParsedExpr<'a>, ParseError>
where
    'i: 'a,
{
    let mut pairs = ExpressionParser::parse(Rule::main, source).map_err(|e| {
        tracing::debug!("Pest parser failed with: {:?}", e);
        convert_pest_error(e, source)
    })?;
    let context = ParseContext {
        arena,
        original_source: source, // To "transfer" slices to the arena allocated string.
        ann: arena.alloc(AnnotatedSource::new(arena, source)),
        depth: core::cell::Cell::new(0),
        max_depth,
    };
    let main = pairs.next().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::Other {
                message: "empty parse result".to_string(),
            },
            source,
            Span::new(0, source.len()),
        )
    })?;
    let expr = context.parse_main(main)?;
    Ok(arena.alloc(ParsedExpr {
        expr,
        ann: context.ann,
    }))
}
