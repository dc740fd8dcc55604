use std::fmt;

/// The Abstract Syntax Tree of a numeric field expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Arithmetic
    Sum(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),

    // Leaf
    Literal(f64),
}

impl Expression {
    pub fn sum(l: Expression, r: Expression) -> Self {
        Expression::Sum(Box::new(l), Box::new(r))
    }

    pub fn subtract(l: Expression, r: Expression) -> Self {
        Expression::Subtract(Box::new(l), Box::new(r))
    }

    pub fn multiply(l: Expression, r: Expression) -> Self {
        Expression::Multiply(Box::new(l), Box::new(r))
    }

    pub fn divide(l: Expression, r: Expression) -> Self {
        Expression::Divide(Box::new(l), Box::new(r))
    }

    pub fn negate(v: Expression) -> Self {
        Expression::Negate(Box::new(v))
    }

    /// Binding strength used when printing; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            Expression::Sum(..) | Expression::Subtract(..) => 1,
            Expression::Multiply(..) | Expression::Divide(..) => 2,
            Expression::Negate(_) => 3,
            Expression::Literal(_) => 4,
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Sum(l, r)
            | Expression::Subtract(l, r)
            | Expression::Multiply(l, r)
            | Expression::Divide(l, r) => 1 + l.node_count() + r.node_count(),
            Expression::Negate(v) => 1 + v.node_count(),
            Expression::Literal(_) => 1,
        }
    }
}

/// Prints canonical infix, adding parentheses only where precedence or
/// left-associativity requires them.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(n) => write!(f, "{}", n),
            Expression::Negate(v) => {
                write!(f, "-")?;
                fmt_operand(v, self.precedence(), false, f)
            }
            Expression::Sum(l, r) => fmt_binary(self, "+", l, r, f),
            Expression::Subtract(l, r) => fmt_binary(self, "-", l, r, f),
            Expression::Multiply(l, r) => fmt_binary(self, "*", l, r, f),
            Expression::Divide(l, r) => fmt_binary(self, "/", l, r, f),
        }
    }
}

fn fmt_binary(
    parent: &Expression,
    op: &str,
    l: &Expression,
    r: &Expression,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let precedence = parent.precedence();
    fmt_operand(l, precedence, false, f)?;
    write!(f, " {} ", op)?;
    fmt_operand(r, precedence, true, f)
}

fn fmt_operand(
    expr: &Expression,
    parent_precedence: u8,
    is_right: bool,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    // A right operand of equal precedence needs parentheses: a - (b - c).
    let needs_parens = expr.precedence() < parent_precedence
        || (is_right && expr.precedence() == parent_precedence);
    if needs_parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}
