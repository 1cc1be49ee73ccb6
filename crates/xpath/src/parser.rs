//! A `nom`-based parser for the selector expression language.

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{map, map_res, not, opt, peek, recognize},
    multi::{many0, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
};

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(XPathError::Empty);
    }
    match expression(trimmed) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(XPathError::XPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(XPathError::XPathParse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// A keyword operator (`and`, `div`, ...) must not run into a following name.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag_no_case(word), not(satisfy(is_name_char)))
}

/// Folds `operand (op operand)*` into a left-associative tree, using `build`
/// to create the node for this precedence level.
fn binary_level<'a, O, F, G>(
    operand: F,
    operator: G,
    build: fn(O, Expression, Expression) -> Expression,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &'a str| {
        let (input, mut left) = operand.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(operator.clone()), operand.clone())).parse(input)?;

        for (op, right) in remainder {
            left = build(op, left, right);
        }
        Ok((input, left))
    }
}

fn logical(op: LogicalOperator, left: Expression, right: Expression) -> Expression {
    Expression::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn equality(op: EqualityOperator, left: Expression, right: Expression) -> Expression {
    Expression::Equality {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn relational(op: RelationalOperator, left: Expression, right: Expression) -> Expression {
    Expression::Relational {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn arithmetic(op: ArithmeticOperator, left: Expression, right: Expression) -> Expression {
    Expression::Arithmetic {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn union(_: (), left: Expression, right: Expression) -> Expression {
    Expression::Union {
        left: Box::new(left),
        right: Box::new(right),
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, LogicalOperator> {
    map(keyword("or"), |_| LogicalOperator::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, LogicalOperator> {
    map(keyword("and"), |_| LogicalOperator::And).parse(input)
}

fn equality_op(input: &str) -> IResult<&str, EqualityOperator> {
    alt((
        map(tag("="), |_| EqualityOperator::Equals),
        map(tag("!="), |_| EqualityOperator::NotEquals),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> IResult<&str, RelationalOperator> {
    alt((
        map(tag("<="), |_| RelationalOperator::LessThanOrEqual),
        map(tag("&lt;="), |_| RelationalOperator::LessThanOrEqual),
        map(tag(">="), |_| RelationalOperator::GreaterThanOrEqual),
        map(tag("&gt;="), |_| RelationalOperator::GreaterThanOrEqual),
        map(tag("<"), |_| RelationalOperator::LessThan),
        map(tag("&lt;"), |_| RelationalOperator::LessThan),
        map(tag(">"), |_| RelationalOperator::GreaterThan),
        map(tag("&gt;"), |_| RelationalOperator::GreaterThan),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, ArithmeticOperator> {
    alt((
        map(char('+'), |_| ArithmeticOperator::Plus),
        map(char('-'), |_| ArithmeticOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, ArithmeticOperator> {
    alt((
        map(char('*'), |_| ArithmeticOperator::Multiply),
        map(keyword("div"), |_| ArithmeticOperator::Divide),
        map(keyword("mod"), |_| ArithmeticOperator::Modulo),
    ))
    .parse(input)
}

fn union_op(input: &str) -> IResult<&str, ()> {
    map(char('|'), |_| ()).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(and_expr, or_op, logical)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(equality_expr, and_op, logical)(input)
}

fn equality_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(relational_expr, equality_op, equality)(input)
}

fn relational_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(additive_expr, relational_op, relational)(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(multiplicative_expr, additive_op, arithmetic)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(unary_expr, multiplicative_op, arithmetic)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let (i, neg_op) = opt(ws(char('-'))).parse(input)?;
    let (i, expr) = union_expr(i)?;

    if neg_op.is_some() {
        Ok((i, Expression::Negate(Box::new(expr))))
    } else {
        Ok((i, expr))
    }
}

fn union_expr(input: &str) -> IResult<&str, Expression> {
    binary_level(path_expr, union_op, union)(input)
}

/// Primary expressions are tried first: a function call like `last()` would
/// otherwise be taken for a step named `last`.
fn path_expr(input: &str) -> IResult<&str, Expression> {
    alt((primary_expr, map(location_path, Expression::Path))).parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        variable_reference,
        map(number, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    )))
    .parse(input)
}

// --- Literal Parsers ---

/// A number starts with a digit or `.`, so `inf`, `nan` and signs are left
/// to the name and unary parsers.
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        preceded(peek(satisfy(|c| c.is_ascii_digit() || c == '.')), double),
        |n: f64| if n.is_finite() { Ok(n) } else { Err("number out of range") },
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn variable_reference(input: &str) -> IResult<&str, Expression> {
    map(preceded(char('$'), q_name), Expression::Variable).parse(input)
}

// --- Name and NodeTest Parsers ---

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_char))).parse(input)
}

fn q_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(nc_name, opt(pair(tag(":"), nc_name)))),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn node_type_test(input: &str) -> IResult<&str, NodeTest> {
    map(
        terminated(
            alt((
                tag("text"),
                tag("node"),
                tag("comment"),
                tag("processing-instruction"),
            )),
            pair(ws(char('(')), char(')')),
        ),
        |node_type: &str| match node_type {
            "text" => NodeTest::NodeType(NodeTypeTest::Text),
            "comment" => NodeTest::NodeType(NodeTypeTest::Comment),
            "processing-instruction" => NodeTest::NodeType(NodeTypeTest::ProcessingInstruction),
            _ => NodeTest::NodeType(NodeTypeTest::Node),
        },
    )
    .parse(input)
}

pub fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        map(tag("*"), |_| NodeTest::Wildcard),
        node_type_test,
        map(q_name, NodeTest::Name),
    ))
    .parse(input)
}

// --- Path Parsers ---

fn axis(input: &str) -> IResult<&str, Axis> {
    map(
        terminated(
            alt((
                tag("child"),
                tag("descendant-or-self"),
                tag("descendant"),
                tag("attribute"),
                tag("parent"),
                tag("ancestor-or-self"),
                tag("ancestor"),
                tag("self"),
                tag("following-sibling"),
                tag("preceding-sibling"),
                tag("following"),
                tag("preceding"),
            )),
            tag("::"),
        ),
        |axis_str: &str| match axis_str {
            "descendant-or-self" => Axis::DescendantOrSelf,
            "descendant" => Axis::Descendant,
            "attribute" => Axis::Attribute,
            "parent" => Axis::Parent,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "ancestor" => Axis::Ancestor,
            "self" => Axis::SelfAxis,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "following" => Axis::Following,
            "preceding" => Axis::Preceding,
            _ => Axis::Child,
        },
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    let (i, (axis, node_test)) = alt((
        map(tag(".."), |_| {
            (Axis::Parent, NodeTest::NodeType(NodeTypeTest::Node))
        }),
        map(tag("."), |_| {
            (Axis::SelfAxis, NodeTest::NodeType(NodeTypeTest::Node))
        }),
        map(preceded(char('@'), node_test), |nt| (Axis::Attribute, nt)),
        map(pair(opt(axis), node_test), |(ax, nt)| {
            (ax.unwrap_or(Axis::Child), nt)
        }),
    ))
    .parse(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    Ok((
        i,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

fn location_path(input: &str) -> IResult<&str, LocationPath> {
    let (i, (is_absolute, mut steps)) =
        if let Ok((rem, _)) = tag::<&str, &str, nom::error::Error<&str>>("//").parse(input) {
            let (rem, first_step) = step(rem)?;
            (rem, (true, vec![Step::descendant_or_self(), first_step]))
        } else if let Ok((rem, _)) = tag::<&str, &str, nom::error::Error<&str>>("/").parse(input)
        {
            match step(rem) {
                Ok((rem, first_step)) => (rem, (true, vec![first_step])),
                // The document root on its own: "/"
                Err(_) => (rem, (true, vec![])),
            }
        } else {
            let (rem, first_step) = step(input)?;
            (rem, (false, vec![first_step]))
        };

    // After the first step, subsequent steps MUST be preceded by / or //.
    let (i, remainder) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(i)?;

    for (sep, next_step) in remainder {
        if sep == "//" {
            steps.push(Step::descendant_or_self());
        }
        steps.push(next_step);
    }

    Ok((i, LocationPath { is_absolute, steps }))
}

fn function_call(input: &str) -> IResult<&str, Expression> {
    // A QName only starts a function call when '(' follows; `foo` in `foo/bar` is a step.
    let (i, name) = q_name(input)?;
    let (i, _) = peek(ws(char('('))).parse(i)?;

    // Node-type tests like text() are handled by the step parser.
    if name == "text" || name == "node" || name == "comment" || name == "processing-instruction" {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let (i, _) = multispace0(i)?;
    let (i, args) = delimited(
        char('('),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(i)?;

    Ok((i, Expression::FunctionCall { name, args }))
}
