use crate::{
    cst::cst::{SyntaxKind, SyntaxNode},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<SyntaxNode, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than `bp`, keep extending lhs
    while parser.current_bp() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        let current_bp = parser.current_bp();
        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => Ok(parser.leaf(SyntaxKind::Number)),
        TokenKind::Identifier => Ok(parser.leaf(SyntaxKind::VariableName)),
        TokenKind::String => Ok(parser.leaf(SyntaxKind::String)),
        TokenKind::True | TokenKind::False => Ok(parser.leaf(SyntaxKind::Boolean)),
        TokenKind::None => Ok(parser.leaf(SyntaxKind::None)),
        _ => Err(parser.unexpected()),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: SyntaxNode, bp: BindingPower) -> Result<SyntaxNode, Error> {
    let operator = parser.leaf(SyntaxKind::Operator);
    let right = parse_expr(parser, bp)?;

    Ok(SyntaxNode::branch(
        SyntaxKind::BinaryExpression,
        vec![left, operator, right],
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let bp = if parser.current_token_kind() == TokenKind::Not {
        BindingPower::LogicalNot
    } else {
        BindingPower::Unary
    };

    let operator = parser.leaf(SyntaxKind::Operator);
    let operand = parse_expr(parser, bp)?;

    Ok(SyntaxNode::branch(
        SyntaxKind::UnaryExpression,
        vec![operator, operand],
    ))
}

/// `then if cond else otherwise`, right associative.
pub fn parse_conditional_expr(parser: &mut Parser, left: SyntaxNode, _bp: BindingPower) -> Result<SyntaxNode, Error> {
    let if_keyword = parser.leaf(SyntaxKind::Keyword);
    let condition = parse_expr(parser, BindingPower::Ternary)?;
    let else_keyword = parser.expect_leaf(TokenKind::Else, SyntaxKind::Keyword)?;
    let otherwise = parse_expr(parser, BindingPower::Default)?;

    Ok(SyntaxNode::branch(
        SyntaxKind::ConditionalExpression,
        vec![left, if_keyword, condition, else_keyword, otherwise],
    ))
}

/// `( expr )` or a generator comprehension. A missing `)` is left in the
/// tree as an absent child.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let open = parser.leaf(SyntaxKind::Punctuation);
    let expr = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::For {
        return parse_comprehension_tail(parser, SyntaxKind::ComprehensionExpression, open, expr);
    }

    let mut children = vec![open, expr];
    if parser.current_token_kind() == TokenKind::CloseParen {
        children.push(parser.leaf(SyntaxKind::Punctuation));
    }

    Ok(SyntaxNode::branch(SyntaxKind::ParenthesizedExpression, children))
}

/// `[a, b, ...]` or a list comprehension.
pub fn parse_array_expr(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let open = parser.leaf(SyntaxKind::Punctuation);

    if parser.current_token_kind() == TokenKind::CloseBracket {
        let close = parser.leaf(SyntaxKind::Punctuation);
        return Ok(SyntaxNode::branch(SyntaxKind::ArrayExpression, vec![open, close]));
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::For {
        return parse_comprehension_tail(parser, SyntaxKind::ArrayComprehensionExpression, open, first);
    }

    let mut children = vec![open, first];

    loop {
        match parser.current_token_kind() {
            TokenKind::Comma => {
                children.push(parser.leaf(SyntaxKind::Punctuation));
                if parser.current_token_kind() != TokenKind::CloseBracket {
                    children.push(parse_expr(parser, BindingPower::Default)?);
                }
            }
            TokenKind::CloseBracket => {
                children.push(parser.leaf(SyntaxKind::Punctuation));
                break;
            }
            _ => break,
        }
    }

    Ok(SyntaxNode::branch(SyntaxKind::ArrayExpression, children))
}

/// `{ ... }` only appears as a set comprehension.
pub fn parse_set_expr(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let open = parser.leaf(SyntaxKind::Punctuation);
    let result = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::For {
        return Err(parser.unexpected_detailed("only set comprehensions are supported"));
    }

    parse_comprehension_tail(parser, SyntaxKind::SetComprehensionExpression, open, result)
}

/// `for item in iterable [if cond] <close>` after the result expression.
///
/// Any closing bracket is accepted; pairing it with the opening one is left
/// to the AST builder.
fn parse_comprehension_tail(
    parser: &mut Parser,
    kind: SyntaxKind,
    open: SyntaxNode,
    result: SyntaxNode,
) -> Result<SyntaxNode, Error> {
    let mut children = vec![open, result];

    children.push(parser.expect_leaf(TokenKind::For, SyntaxKind::Keyword)?);
    children.push(parser.expect_leaf(TokenKind::Identifier, SyntaxKind::VariableName)?);
    children.push(parser.expect_leaf(TokenKind::In, SyntaxKind::Keyword)?);
    children.push(parse_expr(parser, BindingPower::Ternary)?);

    if parser.current_token_kind() == TokenKind::If {
        children.push(parser.leaf(SyntaxKind::Keyword));
        children.push(parse_expr(parser, BindingPower::Ternary)?);
    }

    let closers = [TokenKind::CloseParen, TokenKind::CloseBracket, TokenKind::CloseCurly];
    if !parser.current_token().is_one_of_many(&closers) {
        return Err(parser.unexpected_detailed("expected a closing bracket"));
    }
    children.push(parser.leaf(SyntaxKind::Punctuation));

    Ok(SyntaxNode::branch(kind, children))
}

/// `callee(args)`
pub fn parse_call_expr(parser: &mut Parser, left: SyntaxNode, _bp: BindingPower) -> Result<SyntaxNode, Error> {
    let arguments = parse_arg_list(parser)?;

    Ok(SyntaxNode::branch(
        SyntaxKind::CallExpression,
        vec![left, arguments],
    ))
}

/// `ArgList["(", (expr, ","?)*, ")"]`, shared by calls and class bases.
pub fn parse_arg_list(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.expect_leaf(TokenKind::OpenParen, SyntaxKind::Punctuation)?];

    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::Comma {
            children.push(parser.leaf(SyntaxKind::Punctuation));
        } else {
            children.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    children.push(parser.expect_leaf(TokenKind::CloseParen, SyntaxKind::Punctuation)?);

    Ok(SyntaxNode::branch(SyntaxKind::ArgList, children))
}

/// `obj.name`
pub fn parse_member_expr(parser: &mut Parser, left: SyntaxNode, _bp: BindingPower) -> Result<SyntaxNode, Error> {
    let dot = parser.leaf(SyntaxKind::Punctuation);
    let property = parser.expect_leaf(TokenKind::Identifier, SyntaxKind::PropertyName)?;

    Ok(SyntaxNode::branch(
        SyntaxKind::MemberExpression,
        vec![left, dot, property],
    ))
}

/// `obj[...]`, keeping every `:` and `,` so the builder can validate them.
pub fn parse_index_expr(parser: &mut Parser, left: SyntaxNode, _bp: BindingPower) -> Result<SyntaxNode, Error> {
    let mut children = vec![left, parser.leaf(SyntaxKind::Punctuation)];

    while parser.current_token_kind() != TokenKind::CloseBracket {
        if parser.current_token().is_one_of_many(&[TokenKind::Colon, TokenKind::Comma]) {
            children.push(parser.leaf(SyntaxKind::Punctuation));
        } else {
            children.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    children.push(parser.leaf(SyntaxKind::Punctuation));

    Ok(SyntaxNode::branch(SyntaxKind::MemberExpression, children))
}
