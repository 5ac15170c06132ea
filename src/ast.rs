use std::fmt;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment {
        name: String,
        value: Expression,
    },
    Expression(Expression),
}

/// One node per production. The parser decides which variants may appear
/// where, so e.g. `Arithmetic::operands` only ever holds numbers and nested
/// arithmetic forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(String),
    Quoted(Vec<Expression>),
    Arithmetic {
        operator: ArithmeticOperator,
        operands: Vec<Expression>,
    },
    List(Vec<Expression>),
    Car(Box<Expression>),
    Cdr(Box<Expression>),
    Define {
        name: String,
        value: Literal,
    },
    Comparison(Comparison),
    If {
        condition: Comparison,
        consequent: Option<Box<Expression>>,
        alternative: Option<Box<Expression>>,
    },
    Length(Box<Expression>),
    Print(String),
    Cons(Vec<Expression>),
    IsNull(Vec<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operator: ComparisonOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    Eq,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl ArithmeticOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Power => "^",
        }
    }
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::Less => "<",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::LessEqual => "<=",
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Statement {
    /// Rejects `car`/`cdr` applied to anything but a quoted list.
    ///
    /// Runs before evaluation, so a bad shape never lets a side effect
    /// elsewhere in the statement happen.
    pub fn check_shape(&self) -> Result<()> {
        match self {
            Statement::Assignment { value, .. } => value.check_shape(),
            Statement::Expression(expression) => expression.check_shape(),
        }
    }
}

impl Expression {
    pub fn check_shape(&self) -> Result<()> {
        match self {
            Expression::Car(operand) => Self::check_selector("car", operand),
            Expression::Cdr(operand) => Self::check_selector("cdr", operand),
            Expression::Literal(_)
            | Expression::Variable(_)
            | Expression::Define { .. }
            | Expression::Print(_) => Ok(()),
            Expression::Quoted(items)
            | Expression::List(items)
            | Expression::Cons(items)
            | Expression::IsNull(items)
            | Expression::Arithmetic { operands: items, .. } => {
                items.iter().try_for_each(Expression::check_shape)
            }
            Expression::Comparison(comparison) => comparison.check_shape(),
            Expression::If { condition, consequent, alternative } => {
                condition.check_shape()?;
                consequent.iter().chain(alternative.iter()).try_for_each(|e| e.check_shape())
            }
            Expression::Length(target) => target.check_shape(),
        }
    }

    fn check_selector(form: &'static str, operand: &Expression) -> Result<()> {
        match operand {
            Expression::Quoted(items) => items.iter().try_for_each(Expression::check_shape),
            _ => Err(Error::StructuralMismatch { form }),
        }
    }
}

impl Comparison {
    fn check_shape(&self) -> Result<()> {
        self.left.check_shape()?;
        self.right.check_shape()
    }
}
