use chumsky::error::Simple;
use chumsky::stream::Stream;
use chumsky::{select, Parser};
use chumsky::prelude::{choice, end, just, recursive};
use crate::ast::{ArithmeticOperator, Comparison, ComparisonOperator, Expression, Literal, Statement};
use crate::error::Result;
use crate::lexer::{Span, Token};

/// Parses exactly one statement: `name = <expr>` or a bare `<expr>`.
pub fn parse(tokens: Vec<(Token, Span)>, source_len: usize) -> Result<Statement> {
    let stream = Stream::from_iter(source_len..source_len + 1, tokens.into_iter());
    let statement = parser().parse(stream)?;

    Ok(statement)
}

pub fn parser() -> impl Parser<Token, Statement, Error = Simple<Token>> {
    let assignment = identifier()
        .then_ignore(just(Token::Equal))
        .then(expression())
        .map(|(name, value)| Statement::Assignment { name, value });

    assignment
        .or(expression().map(Statement::Expression))
        .then_ignore(end())
}

/// Every form that may stand on its own at the top level.
pub fn expression() -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    recursive(|expression| {
        let quoted = quoted_list();

        let list = just(Token::List)
            .ignore_then(list_item(quoted.clone()).repeated())
            .map(Expression::List);

        // Anything other than a quoted list is accepted here and rejected
        // by `Statement::check_shape` as a structural mismatch.
        let selector_operand = quoted.clone()
            .map(Expression::Quoted)
            .or(expression)
            .or(literal().map(Expression::Literal))
            .or(identifier().map(Expression::Variable));

        let car = just(Token::Car)
            .ignore_then(selector_operand.clone())
            .map(|operand| Expression::Car(Box::new(operand)));

        let cdr = just(Token::Cdr)
            .ignore_then(selector_operand)
            .map(|operand| Expression::Cdr(Box::new(operand)));

        let define = just(Token::Define)
            .ignore_then(identifier())
            .then(literal())
            .map(|(name, value)| Expression::Define { name, value });

        let is_null = just(Token::NullP)
            .ignore_then(quoted)
            .map(Expression::IsNull);

        let keyword_form = choice((list, car, cdr, define, is_null))
            .delimited_by(just(Token::LeftParen), just(Token::RightParen));

        choice((
            arithmetic(),
            print(),
            keyword_form,
            comparison().map(Expression::Comparison),
            cons(),
            conditional(),
            length(),
        ))
    })
}

fn identifier() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! { Token::Identifier(name) => name }
}

fn number() -> impl Parser<Token, f64, Error = Simple<Token>> + Clone {
    select! { Token::Number(digits) => digits }
        .try_map(|digits: String, span| {
            digits.parse::<f64>().map_err(|e| Simple::custom(span, e.to_string()))
        })
}

fn text() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! { Token::Text(value) => value }
}

fn literal() -> impl Parser<Token, Literal, Error = Simple<Token>> + Clone {
    choice((
        number().map(Literal::Number),
        text().map(Literal::Text),
        just(Token::True).to(Literal::Boolean(true)),
        just(Token::False).to(Literal::Boolean(false)),
    ))
}

fn list_item(
    quoted: impl Parser<Token, Vec<Expression>, Error = Simple<Token>> + Clone,
) -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    literal()
        .map(Expression::Literal)
        .or(quoted.map(Expression::Quoted))
}

/// `' ( item* )`
fn quoted_list() -> impl Parser<Token, Vec<Expression>, Error = Simple<Token>> + Clone {
    recursive(|quoted| {
        just(Token::Quote).ignore_then(
            list_item(quoted)
                .repeated()
                .delimited_by(just(Token::LeftParen), just(Token::RightParen)),
        )
    })
}

fn arithmetic_operator() -> impl Parser<Token, ArithmeticOperator, Error = Simple<Token>> + Clone {
    choice((
        just(Token::Plus).to(ArithmeticOperator::Add),
        just(Token::Minus).to(ArithmeticOperator::Subtract),
        just(Token::Star).to(ArithmeticOperator::Multiply),
        just(Token::Slash).to(ArithmeticOperator::Divide),
        just(Token::Caret).to(ArithmeticOperator::Power),
    ))
}

fn arithmetic() -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    recursive(|arithmetic| {
        let item = number()
            .map(|value| Expression::Literal(Literal::Number(value)))
            .or(arithmetic);

        arithmetic_operator()
            .then(item.repeated())
            .delimited_by(just(Token::LeftParen), just(Token::RightParen))
            .map(|(operator, operands)| Expression::Arithmetic { operator, operands })
    })
}

fn comparison_operator() -> impl Parser<Token, ComparisonOperator, Error = Simple<Token>> + Clone {
    choice((
        just(Token::Equal).to(ComparisonOperator::Equal),
        just(Token::Eq).to(ComparisonOperator::Eq),
        just(Token::GreaterEqual).to(ComparisonOperator::GreaterEqual),
        just(Token::LessEqual).to(ComparisonOperator::LessEqual),
        just(Token::Greater).to(ComparisonOperator::Greater),
        just(Token::Less).to(ComparisonOperator::Less),
    ))
}

fn comparison() -> impl Parser<Token, Comparison, Error = Simple<Token>> + Clone {
    let item = literal()
        .map(Expression::Literal)
        .or(length())
        .or(identifier().map(Expression::Variable));

    comparison_operator()
        .then(item.clone())
        .then(item)
        .delimited_by(just(Token::LeftParen), just(Token::RightParen))
        .map(|((operator, left), right)| Comparison {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
}

/// `( if <comparison> <branch>? <branch>? )`
fn conditional() -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    recursive(|conditional| {
        let branch = choice((
            arithmetic(),
            conditional,
            print(),
            literal().map(Expression::Literal),
            identifier().map(Expression::Variable),
        ))
        .map(Box::new);

        just(Token::If)
            .ignore_then(comparison())
            .then(branch.clone().or_not())
            .then(branch.or_not())
            .delimited_by(just(Token::LeftParen), just(Token::RightParen))
            .map(|((condition, consequent), alternative)| Expression::If {
                condition,
                consequent,
                alternative,
            })
    })
}

fn length() -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    let target = text()
        .map(|value| Expression::Literal(Literal::Text(value)))
        .or(quoted_list().map(Expression::Quoted));

    just(Token::Length)
        .ignore_then(target)
        .delimited_by(just(Token::LeftParen), just(Token::RightParen))
        .map(|target| Expression::Length(Box::new(target)))
}

fn print() -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    just(Token::Print)
        .ignore_then(text())
        .delimited_by(just(Token::LeftParen), just(Token::RightParen))
        .map(Expression::Print)
}

/// `( cons item* )`, where an item may itself be a `cons` form.
fn cons() -> impl Parser<Token, Expression, Error = Simple<Token>> + Clone {
    recursive(|cons| {
        let item = literal().map(Expression::Literal).or(cons);

        just(Token::Cons)
            .ignore_then(item.repeated())
            .delimited_by(just(Token::LeftParen), just(Token::RightParen))
            .map(Expression::Cons)
    })
}
