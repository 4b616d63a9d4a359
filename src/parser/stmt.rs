use crate::{
    cst::cst::{SyntaxKind, SyntaxNode},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_arg_list, parse_expr},
    lookups::BindingPower,
    parser::Parser,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    let stmt = match parser.current_token_kind() {
        TokenKind::Colon => {
            let mut children = vec![expr, parse_type_def(parser, TokenKind::Colon)?];
            if parser.current_token_kind() == TokenKind::Assignment {
                children.push(parser.leaf(SyntaxKind::AssignOp));
                children.push(parse_expr(parser, BindingPower::Default)?);
            }
            SyntaxNode::branch(SyntaxKind::AssignStatement, children)
        }
        TokenKind::Assignment => {
            let assign = parser.leaf(SyntaxKind::AssignOp);
            let value = parse_expr(parser, BindingPower::Default)?;
            SyntaxNode::branch(SyntaxKind::AssignStatement, vec![expr, assign, value])
        }
        _ => SyntaxNode::branch(SyntaxKind::ExpressionStatement, vec![expr]),
    };

    parser.expect(TokenKind::Newline)?;

    Ok(stmt)
}

/// `TypeDef[":" | "->", type]`
fn parse_type_def(parser: &mut Parser, marker: TokenKind) -> Result<SyntaxNode, Error> {
    let marker = parser.expect_leaf(marker, SyntaxKind::Punctuation)?;
    let ty = parse_expr(parser, BindingPower::Default)?;

    Ok(SyntaxNode::branch(SyntaxKind::TypeDef, vec![marker, ty]))
}

/// `Body[":", stmt...]`, either an indented block or a single statement on
/// the same line. A missing `:` is not reported here.
pub fn parse_block(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![];

    if parser.current_token_kind() == TokenKind::Colon {
        children.push(parser.leaf(SyntaxKind::Punctuation));
    }

    if parser.current_token_kind() != TokenKind::Newline {
        children.push(parse_stmt(parser)?);
        return Ok(SyntaxNode::branch(SyntaxKind::Body, children));
    }

    parser.advance();
    parser.expect(TokenKind::Indent)?;

    while parser.current_token_kind() != TokenKind::Dedent && parser.has_tokens() {
        children.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::Dedent)?;

    Ok(SyntaxNode::branch(SyntaxKind::Body, children))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.leaf(SyntaxKind::Keyword)];
    children.push(parse_expr(parser, BindingPower::Default)?);
    children.push(parse_block(parser)?);

    while parser.current_token_kind() == TokenKind::Elif {
        children.push(parser.leaf(SyntaxKind::Keyword));
        children.push(parse_expr(parser, BindingPower::Default)?);
        children.push(parse_block(parser)?);
    }

    if parser.current_token_kind() == TokenKind::Else {
        children.push(parser.leaf(SyntaxKind::Keyword));
        children.push(parse_block(parser)?);
    }

    Ok(SyntaxNode::branch(SyntaxKind::IfStatement, children))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let keyword = parser.leaf(SyntaxKind::Keyword);
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(SyntaxNode::branch(
        SyntaxKind::WhileStatement,
        vec![keyword, condition, body],
    ))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.leaf(SyntaxKind::Keyword)];
    children.push(parser.expect_leaf(TokenKind::Identifier, SyntaxKind::VariableName)?);
    children.push(parser.expect_leaf(TokenKind::In, SyntaxKind::Keyword)?);
    children.push(parse_expr(parser, BindingPower::Default)?);
    children.push(parse_block(parser)?);

    if parser.current_token_kind() == TokenKind::Else {
        children.push(parser.leaf(SyntaxKind::Keyword));
        children.push(parse_block(parser)?);
    }

    Ok(SyntaxNode::branch(SyntaxKind::ForStatement, children))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.leaf(SyntaxKind::Keyword)];

    if parser.current_token_kind() != TokenKind::Newline {
        children.push(parse_expr(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::Newline)?;

    Ok(SyntaxNode::branch(SyntaxKind::ReturnStatement, children))
}

/// `pass`, `continue` and `break`.
pub fn parse_keyword_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let kind = match parser.current_token_kind() {
        TokenKind::Pass => SyntaxKind::PassStatement,
        TokenKind::Continue => SyntaxKind::ContinueStatement,
        TokenKind::Break => SyntaxKind::BreakStatement,
        _ => return Err(parser.unexpected()),
    };

    let keyword = parser.leaf(SyntaxKind::Keyword);
    parser.expect(TokenKind::Newline)?;

    Ok(SyntaxNode::branch(kind, vec![keyword]))
}

pub fn parse_fn_def_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.leaf(SyntaxKind::Keyword)];
    children.push(parser.expect_leaf(TokenKind::Identifier, SyntaxKind::VariableName)?);
    children.push(parse_param_list(parser)?);

    if parser.current_token_kind() == TokenKind::Arrow {
        children.push(parse_type_def(parser, TokenKind::Arrow)?);
    }

    children.push(parse_block(parser)?);

    Ok(SyntaxNode::branch(SyntaxKind::FunctionDefinition, children))
}

/// `ParamList["(", (VariableName, TypeDef[":", type]?, ","?)*, ")"]`
fn parse_param_list(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.expect_leaf(TokenKind::OpenParen, SyntaxKind::Punctuation)?];

    while parser.current_token_kind() != TokenKind::CloseParen {
        children.push(parser.expect_leaf(TokenKind::Identifier, SyntaxKind::VariableName)?);

        if parser.current_token_kind() == TokenKind::Colon {
            children.push(parse_type_def(parser, TokenKind::Colon)?);
        }

        match parser.current_token_kind() {
            TokenKind::Comma => children.push(parser.leaf(SyntaxKind::Punctuation)),
            TokenKind::CloseParen => {}
            _ => return Err(parser.unexpected_detailed("expected `,` or `)` in parameter list")),
        }
    }

    children.push(parser.leaf(SyntaxKind::Punctuation));

    Ok(SyntaxNode::branch(SyntaxKind::ParamList, children))
}

pub fn parse_class_def_stmt(parser: &mut Parser) -> Result<SyntaxNode, Error> {
    let mut children = vec![parser.leaf(SyntaxKind::Keyword)];
    children.push(parser.expect_leaf(TokenKind::Identifier, SyntaxKind::VariableName)?);

    if parser.current_token_kind() == TokenKind::OpenParen {
        children.push(parse_arg_list(parser)?);
    }

    children.push(parse_block(parser)?);

    Ok(SyntaxNode::branch(SyntaxKind::ClassDefinition, children))
}
