//! Converts a concrete syntax tree into the untyped AST.
//!
//! Every traversal method expects the cursor on the node it converts and
//! leaves it there on success. The first malformed construct aborts the
//! whole build with a parse-kind [`Error`].

use tracing::debug;

use crate::{
    ast::{
        ast::{
            BinOp, Class, ComprehensionKind, Expr, ExprKind, FunDef, Literal, LiteralValue,
            Parameter, Program, Stmt, StmtKind, UniOp, VarInit,
        },
        types::Type,
    },
    cst::cst::{Cursor, SyntaxKind},
    errors::errors::{Error, ErrorImpl},
    SourceLocation, SourceMap,
};

type Located<T> = Result<T, Error>;

pub struct AstBuilder<'s> {
    source: &'s str,
    map: SourceMap<'s>,
}

impl<'s> AstBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        AstBuilder {
            source,
            map: SourceMap::new(source),
        }
    }

    fn text<C: Cursor>(&self, c: &C) -> &'s str {
        self.source.get(c.from()..c.to()).unwrap_or("")
    }

    fn location<C: Cursor>(&self, c: &C) -> SourceLocation {
        self.map.location(c.from())
    }

    fn error<C: Cursor>(&self, error: ErrorImpl, c: &C) -> Error {
        Error::new(error, self.location(c))
    }

    /// Whether the cursor sits on the keyword or punctuation `text`.
    fn is_token<C: Cursor>(&self, c: &C, text: &str) -> bool {
        matches!(
            c.kind(),
            SyntaxKind::Keyword | SyntaxKind::Punctuation | SyntaxKind::Operator | SyntaxKind::AssignOp
        ) && self.text(c) == text
    }

    /// Builds the program rooted at a `Script` node.
    pub fn build<C: Cursor>(&self, c: &mut C) -> Located<Program<SourceLocation>> {
        let a = self.location(c);

        if c.kind() != SyntaxKind::Script {
            return Err(self.error(ErrorImpl::InvalidProgram, c));
        }

        let mut inits = vec![];
        let mut funs = vec![];
        let mut classes = vec![];
        let mut stmts = vec![];

        let entered = c.first_child();
        let mut has_child = entered;

        while has_child {
            if self.is_var_init(c) {
                inits.push(self.var_init(c)?);
            } else if self.is_fun_def(c) {
                funs.push(self.fun_def(c)?);
            } else if self.is_class_def(c) {
                classes.push(self.class(c)?);
            } else {
                break;
            }
            has_child = c.next_sibling();
        }

        while has_child {
            if self.is_var_init(c) || self.is_fun_def(c) || self.is_class_def(c) {
                let name = self.declared_name(c);
                return Err(self.error(ErrorImpl::DeclarationAfterStatement { name }, c));
            }
            stmts.push(self.stmt(c)?);
            has_child = c.next_sibling();
        }

        if entered {
            c.parent();
        }

        debug!(
            inits = inits.len(),
            funs = funs.len(),
            classes = classes.len(),
            stmts = stmts.len(),
            "built program"
        );

        Ok(Program {
            a,
            inits,
            funs,
            classes,
            stmts,
        })
    }

    /// Name introduced by a declaration node, its first name-like child.
    fn declared_name<C: Cursor>(&self, c: &mut C) -> String {
        let mut name = String::new();

        if c.first_child() {
            loop {
                if c.kind() == SyntaxKind::VariableName {
                    name = self.text(c).to_string();
                    break;
                }
                if c.kind() != SyntaxKind::Keyword || !c.next_sibling() {
                    name = self.text(c).to_string();
                    break;
                }
            }
            c.parent();
        }

        name
    }

    pub fn is_var_init<C: Cursor>(&self, c: &mut C) -> bool {
        if c.kind() != SyntaxKind::AssignStatement || !c.first_child() {
            return false;
        }

        let is_var = c.next_sibling() && c.kind() == SyntaxKind::TypeDef;
        c.parent();
        is_var
    }

    pub fn is_fun_def<C: Cursor>(&self, c: &C) -> bool {
        c.kind() == SyntaxKind::FunctionDefinition
    }

    pub fn is_class_def<C: Cursor>(&self, c: &C) -> bool {
        c.kind() == SyntaxKind::ClassDefinition
    }

    pub fn literal<C: Cursor>(&self, c: &mut C) -> Located<Literal<SourceLocation>> {
        let a = self.location(c);
        let text = self.text(c);

        let value = match c.kind() {
            SyntaxKind::Number => LiteralValue::Num(text.parse::<i64>().map_err(|_| {
                self.error(
                    ErrorImpl::NumberParseError {
                        token: text.to_string(),
                    },
                    c,
                )
            })?),
            SyntaxKind::Boolean => LiteralValue::Bool(text == "True"),
            SyntaxKind::None => LiteralValue::None,
            SyntaxKind::CallExpression if self.callee_text(c) == "TypeVar" => LiteralValue::TypeVar,
            _ => {
                return Err(self.error(
                    ErrorImpl::NotALiteral {
                        text: text.to_string(),
                    },
                    c,
                ))
            }
        };

        Ok(Literal { a, value })
    }

    fn callee_text<C: Cursor>(&self, c: &mut C) -> &'s str {
        if !c.first_child() {
            return "";
        }
        let text = self.text(c);
        c.parent();
        text
    }

    pub fn expr<C: Cursor>(&self, c: &mut C) -> Located<Expr<SourceLocation>> {
        let a = self.location(c);

        let kind = match c.kind() {
            SyntaxKind::Number | SyntaxKind::Boolean | SyntaxKind::None => {
                ExprKind::Literal(self.literal(c)?)
            }
            SyntaxKind::VariableName => ExprKind::Id {
                name: self.text(c).to_string(),
            },
            SyntaxKind::CallExpression => return self.call(c),
            SyntaxKind::ArrayExpression => self.list(c)?,
            SyntaxKind::BinaryExpression => {
                c.first_child();
                let left = self.expr(c)?;
                c.next_sibling();
                let op = BinOp::from_lexeme(self.text(c)).ok_or_else(|| {
                    self.error(
                        ErrorImpl::UnknownOperator {
                            op: self.text(c).to_string(),
                        },
                        c,
                    )
                })?;
                c.next_sibling();
                let right = self.expr(c)?;
                c.parent();

                ExprKind::BinOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            SyntaxKind::UnaryExpression => {
                c.first_child();
                let op = UniOp::from_lexeme(self.text(c)).ok_or_else(|| {
                    self.error(
                        ErrorImpl::UnknownOperator {
                            op: self.text(c).to_string(),
                        },
                        c,
                    )
                })?;
                c.next_sibling();
                let expr = self.expr(c)?;
                c.parent();

                ExprKind::UniOp {
                    op,
                    expr: Box::new(expr),
                }
            }
            SyntaxKind::ParenthesizedExpression => {
                c.first_child(); // (
                c.next_sibling();
                let expr = self.expr(c)?;
                let closed = c.next_sibling() && self.is_token(c, ")");
                c.parent();

                if !closed {
                    return Err(Error::new(
                        ErrorImpl::MissingDelimiter {
                            expected: String::from(")"),
                        },
                        a,
                    ));
                }

                return Ok(expr);
            }
            SyntaxKind::MemberExpression => self.member(c, &a)?,
            SyntaxKind::ConditionalExpression => {
                c.first_child();
                let expr_if_true = self.expr(c)?;
                c.next_sibling(); // if
                c.next_sibling();
                let cond = self.expr(c)?;
                c.next_sibling(); // else
                c.next_sibling();
                let expr_if_false = self.expr(c)?;
                c.parent();

                ExprKind::Ternary {
                    expr_if_true: Box::new(expr_if_true),
                    cond: Box::new(cond),
                    expr_if_false: Box::new(expr_if_false),
                }
            }
            kind if kind.is_comprehension() => self.comprehension(c, &a)?,
            _ => {
                return Err(self.error(
                    ErrorImpl::UnsupportedExpression {
                        text: self.text(c).to_string(),
                    },
                    c,
                ))
            }
        };

        Ok(Expr { a, kind })
    }

    fn call<C: Cursor>(&self, c: &mut C) -> Located<Expr<SourceLocation>> {
        let a = self.location(c);

        c.first_child(); // callee

        if let Some((name, generic_args)) = self.generic_callee(c)? {
            c.next_sibling();
            let arguments = self.arguments(c)?;
            c.parent();

            return Ok(Expr {
                a,
                kind: ExprKind::Call {
                    name,
                    generic_args,
                    arguments,
                },
            });
        }

        let callee = self.expr(c)?;
        let callee_text = self.text(c);

        if matches!(&callee.kind, ExprKind::Id { name } if name == "TypeVar") {
            c.parent();
            return Ok(Expr {
                a: a.clone(),
                kind: ExprKind::Literal(Literal {
                    a,
                    value: LiteralValue::TypeVar,
                }),
            });
        }

        c.next_sibling(); // ArgList
        let arguments = self.arguments(c)?;
        c.parent();

        let kind = match callee.kind {
            ExprKind::Lookup { obj, field } => ExprKind::MethodCall {
                obj,
                method: field,
                arguments,
            },
            ExprKind::Id { name } => match name.as_str() {
                "print" | "abs" => {
                    let [arg] = self.builtin_arguments::<1>(&name, arguments, &a)?;
                    ExprKind::Builtin1 {
                        name,
                        arg: Box::new(arg),
                    }
                }
                "max" | "min" | "pow" => {
                    let [left, right] = self.builtin_arguments::<2>(&name, arguments, &a)?;
                    ExprKind::Builtin2 {
                        name,
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                }
                _ => ExprKind::Call {
                    name,
                    generic_args: vec![],
                    arguments,
                },
            },
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnsupportedCallee {
                        text: callee_text.to_string(),
                    },
                    callee.a,
                ))
            }
        };

        Ok(Expr { a, kind })
    }

    fn builtin_arguments<const N: usize>(
        &self,
        name: &str,
        arguments: Vec<Expr<SourceLocation>>,
        a: &SourceLocation,
    ) -> Located<[Expr<SourceLocation>; N]> {
        let received = arguments.len();

        arguments.try_into().map_err(|_| {
            Error::new(
                ErrorImpl::BuiltinArity {
                    name: name.to_string(),
                    expected: N,
                    received,
                },
                a.clone(),
            )
        })
    }

    /// `Name[T, ...]` in callee position: a generic call rather than indexing.
    fn generic_callee<C: Cursor>(&self, c: &mut C) -> Located<Option<(String, Vec<Type>)>> {
        if c.kind() != SyntaxKind::MemberExpression || !c.first_child() {
            return Ok(None);
        }

        let name = self.text(c).to_string();
        let mut is_generic = c.kind() == SyntaxKind::VariableName && c.next_sibling() && self.is_token(c, "[");

        let mut has_args = false;
        while is_generic && c.next_sibling() && !self.is_token(c, "]") {
            match c.kind() {
                SyntaxKind::VariableName | SyntaxKind::ArrayExpression | SyntaxKind::None => has_args = true,
                SyntaxKind::Punctuation if self.is_token(c, ",") => {}
                _ => is_generic = false,
            }
        }
        c.parent();

        if !is_generic || !has_args {
            return Ok(None);
        }

        c.first_child(); // name
        c.next_sibling(); // [
        let mut generic_args = vec![];
        while c.next_sibling() && !self.is_token(c, "]") {
            if !self.is_token(c, ",") {
                generic_args.push(self.ty(c)?);
            }
        }
        c.parent();

        Ok(Some((name, generic_args)))
    }

    /// Arguments of an `ArgList`, in order.
    pub fn arguments<C: Cursor>(&self, c: &mut C) -> Located<Vec<Expr<SourceLocation>>> {
        let mut arguments = vec![];

        if !c.first_child() {
            return Ok(arguments);
        }

        while c.next_sibling() {
            if self.is_token(c, ")") {
                break;
            }
            if self.is_token(c, ",") {
                continue;
            }
            arguments.push(self.expr(c)?);
        }

        c.parent();
        Ok(arguments)
    }

    fn list<C: Cursor>(&self, c: &mut C) -> Located<ExprKind<SourceLocation>> {
        let a = self.location(c);
        let mut elements = vec![];
        let mut closed = false;

        c.first_child(); // [

        while c.next_sibling() {
            if self.is_token(c, "]") {
                closed = true;
                break;
            }
            if self.is_token(c, ",") {
                return Err(self.error(
                    ErrorImpl::MalformedList {
                        text: String::from(","),
                    },
                    c,
                ));
            }

            elements.push(self.expr(c)?);

            if !c.next_sibling() {
                break;
            }
            if self.is_token(c, "]") {
                closed = true;
                break;
            }
            if !self.is_token(c, ",") {
                return Err(self.error(
                    ErrorImpl::MalformedList {
                        text: self.text(c).to_string(),
                    },
                    c,
                ));
            }
        }

        c.parent();

        if !closed {
            return Err(Error::new(
                ErrorImpl::MissingDelimiter {
                    expected: String::from("]"),
                },
                a,
            ));
        }

        Ok(ExprKind::ListLiteral { elements })
    }

    /// `obj.field` or `obj[index]`. Only the leading index expression is kept.
    fn member<C: Cursor>(&self, c: &mut C, a: &SourceLocation) -> Located<ExprKind<SourceLocation>> {
        c.first_child();
        let obj = self.expr(c)?;
        c.next_sibling();

        if self.is_token(c, ".") {
            c.next_sibling();
            let field = self.text(c).to_string();
            c.parent();

            return Ok(ExprKind::Lookup {
                obj: Box::new(obj),
                field,
            });
        }

        if !self.is_token(c, "[") {
            let text = self.text(c).to_string();
            return Err(self.error(ErrorImpl::UnsupportedExpression { text }, c));
        }

        let mut index = None;
        let mut empty = true;
        let mut leading_colon = false;
        let mut colons = 0;

        while c.next_sibling() && !self.is_token(c, "]") {
            if self.is_token(c, ":") {
                leading_colon |= empty;
                colons += 1;
            } else if !self.is_token(c, ",") && index.is_none() && colons == 0 {
                index = Some(self.expr(c)?);
            }
            empty = false;
        }

        c.parent();

        if empty {
            return Err(Error::new(ErrorImpl::EmptyIndex, a.clone()));
        }

        if colons + 1 > 3 {
            return Err(Error::new(
                ErrorImpl::TooManySliceIndices { count: colons + 1 },
                a.clone(),
            ));
        }

        match index {
            Some(index) if !leading_colon => Ok(ExprKind::Index {
                obj: Box::new(obj),
                index: Box::new(index),
            }),
            _ => Err(Error::new(
                ErrorImpl::UnsupportedExpression {
                    text: String::from(":"),
                },
                a.clone(),
            )),
        }
    }

    fn comprehension<C: Cursor>(&self, c: &mut C, a: &SourceLocation) -> Located<ExprKind<SourceLocation>> {
        c.first_child();
        let open = self.text(c).to_string();
        c.next_sibling();
        let lhs = self.expr(c)?;
        c.next_sibling(); // for
        c.next_sibling();
        let item = self.text(c).to_string();
        c.next_sibling(); // in
        c.next_sibling();
        let iterable = self.expr(c)?;

        let mut cond = None;
        let mut close = String::new();

        if c.next_sibling() {
            if self.is_token(c, "if") {
                c.next_sibling();
                cond = Some(Box::new(self.expr(c)?));
                if c.next_sibling() {
                    close = self.text(c).to_string();
                }
            } else {
                close = self.text(c).to_string();
            }
        }

        c.parent();

        let kind = ComprehensionKind::from_delimiters(&open, &close).ok_or_else(|| {
            Error::new(ErrorImpl::ComprehensionMismatch { open, close }, a.clone())
        })?;

        Ok(ExprKind::Comprehension {
            kind,
            lhs: Box::new(lhs),
            item,
            iterable: Box::new(iterable),
            cond,
        })
    }

    pub fn stmt<C: Cursor>(&self, c: &mut C) -> Located<Stmt<SourceLocation>> {
        let a = self.location(c);

        let kind = match c.kind() {
            SyntaxKind::ReturnStatement => {
                c.first_child(); // return
                let value = if c.next_sibling() {
                    self.expr(c)?
                } else {
                    Expr {
                        a: a.clone(),
                        kind: ExprKind::Literal(Literal {
                            a: a.clone(),
                            value: LiteralValue::None,
                        }),
                    }
                };
                c.parent();

                StmtKind::Return(value)
            }
            SyntaxKind::AssignStatement => {
                c.first_child();
                let target_text = self.text(c).to_string();
                let target = self.expr(c)?;
                c.next_sibling();

                if c.kind() == SyntaxKind::TypeDef {
                    c.parent();
                    return Err(Error::new(
                        ErrorImpl::DeclarationAfterStatement { name: target_text },
                        a,
                    ));
                }

                c.next_sibling(); // value
                let value = self.expr(c)?;
                c.parent();

                match target.kind {
                    ExprKind::Id { name } => StmtKind::Assign { name, value },
                    ExprKind::Lookup { obj, field } => StmtKind::FieldAssign {
                        obj: *obj,
                        field,
                        value,
                    },
                    ExprKind::Index { obj, index } => StmtKind::IndexAssign {
                        obj: *obj,
                        index: *index,
                        value,
                    },
                    _ => {
                        return Err(Error::new(
                            ErrorImpl::UnsupportedAssignTarget { text: target_text },
                            a,
                        ))
                    }
                }
            }
            SyntaxKind::ExpressionStatement => {
                c.first_child();
                let expr = self.expr(c)?;
                c.parent();

                StmtKind::Expr(expr)
            }
            SyntaxKind::IfStatement => {
                c.first_child(); // if
                c.next_sibling();
                let cond = self.expr(c)?;
                c.next_sibling();
                let thn = self.block(c, &a)?;
                let els = self.if_tail(c, &a)?;
                c.parent();

                StmtKind::If { cond, thn, els }
            }
            SyntaxKind::WhileStatement => {
                c.first_child(); // while
                c.next_sibling();
                let cond = self.expr(c)?;
                c.next_sibling();
                let body = self.block(c, &a)?;
                c.parent();

                StmtKind::While { cond, body }
            }
            SyntaxKind::ForStatement => {
                c.first_child(); // for
                c.next_sibling();
                if c.kind() != SyntaxKind::VariableName {
                    let text = self.text(c).to_string();
                    return Err(self.error(ErrorImpl::UnsupportedAssignTarget { text }, c));
                }
                let var = self.text(c).to_string();
                c.next_sibling(); // in
                c.next_sibling();
                let iterable = self.expr(c)?;
                c.next_sibling();
                let body = self.block(c, &a)?;

                let els = if c.next_sibling() && self.is_token(c, "else") {
                    c.next_sibling();
                    self.block(c, &a)?
                } else {
                    vec![]
                };
                c.parent();

                StmtKind::For {
                    var,
                    iterable,
                    body,
                    els,
                }
            }
            SyntaxKind::PassStatement => StmtKind::Pass,
            SyntaxKind::ContinueStatement => StmtKind::Continue,
            SyntaxKind::BreakStatement => StmtKind::Break,
            _ => {
                return Err(self.error(
                    ErrorImpl::UnsupportedStatement {
                        text: self.text(c).to_string(),
                    },
                    c,
                ))
            }
        };

        Ok(Stmt { a, kind })
    }

    /// Everything after the `then` block of an if statement. `elif` chains
    /// become a nested `if` in the else branch.
    fn if_tail<C: Cursor>(&self, c: &mut C, owner: &SourceLocation) -> Located<Vec<Stmt<SourceLocation>>> {
        if !c.next_sibling() {
            return Ok(vec![]);
        }

        if self.is_token(c, "else") {
            c.next_sibling();
            return self.block(c, owner);
        }

        if !self.is_token(c, "elif") {
            let text = self.text(c).to_string();
            return Err(self.error(ErrorImpl::UnsupportedStatement { text }, c));
        }

        let a = self.location(c);
        c.next_sibling();
        let cond = self.expr(c)?;
        c.next_sibling();
        let thn = self.block(c, &a)?;
        let els = self.if_tail(c, &a)?;

        Ok(vec![Stmt {
            a,
            kind: StmtKind::If { cond, thn, els },
        }])
    }

    /// Statements of a `Body`, after checking its opening `:`.
    fn block<C: Cursor>(&self, c: &mut C, owner: &SourceLocation) -> Located<Vec<Stmt<SourceLocation>>> {
        self.open_body(c, owner)?;

        let mut stmts = vec![];
        while c.next_sibling() {
            stmts.push(self.stmt(c)?);
        }

        c.parent();
        Ok(stmts)
    }

    /// Enters a `Body` node, leaving the cursor on its `:`.
    fn open_body<C: Cursor>(&self, c: &mut C, owner: &SourceLocation) -> Located<()> {
        if c.kind() != SyntaxKind::Body || !c.first_child() {
            return Err(Error::new(
                ErrorImpl::MissingDelimiter {
                    expected: String::from(":"),
                },
                owner.clone(),
            ));
        }

        if !self.is_token(c, ":") {
            c.parent();
            return Err(Error::new(
                ErrorImpl::MissingDelimiter {
                    expected: String::from(":"),
                },
                owner.clone(),
            ));
        }

        Ok(())
    }

    /// Converts a type annotation expression.
    pub fn ty<C: Cursor>(&self, c: &mut C) -> Located<Type> {
        let invalid = |c: &C| {
            self.error(
                ErrorImpl::InvalidTypeAnnotation {
                    text: self.text(c).to_string(),
                },
                c,
            )
        };

        match c.kind() {
            SyntaxKind::VariableName => Ok(match self.text(c) {
                "int" => Type::Num,
                "bool" => Type::Bool,
                "TypeVar" => Type::TypeVar,
                name => Type::class(name),
            }),
            SyntaxKind::None => Ok(Type::None),
            SyntaxKind::ArrayExpression => {
                let error = invalid(&*c);
                c.first_child(); // [
                if !c.next_sibling() || self.is_token(c, "]") {
                    c.parent();
                    return Err(error);
                }
                let element = self.ty(c)?;
                let closed = c.next_sibling() && self.is_token(c, "]");
                c.parent();

                if !closed {
                    return Err(error);
                }
                Ok(Type::list(element))
            }
            SyntaxKind::MemberExpression => {
                let error = invalid(&*c);
                c.first_child();
                let name = self.text(c).to_string();
                let named = c.kind() == SyntaxKind::VariableName;

                if !named || !c.next_sibling() || !self.is_token(c, "[") {
                    c.parent();
                    return Err(error);
                }

                let mut generic_args = vec![];
                while c.next_sibling() && !self.is_token(c, "]") {
                    if !self.is_token(c, ",") {
                        generic_args.push(self.ty(c)?);
                    }
                }
                c.parent();

                Ok(Type::generic_class(name, generic_args))
            }
            _ => Err(invalid(&*c)),
        }
    }

    /// The type inside a `TypeDef[":" | "->", type]`.
    fn type_def<C: Cursor>(&self, c: &mut C) -> Located<Type> {
        c.first_child(); // : or ->
        c.next_sibling();
        let ty = self.ty(c)?;
        c.parent();
        Ok(ty)
    }

    pub fn parameters<C: Cursor>(&self, c: &mut C) -> Located<Vec<Parameter>> {
        let mut parameters = vec![];

        if !c.first_child() {
            return Ok(parameters);
        }

        while c.next_sibling() {
            if self.is_token(c, ")") {
                break;
            }
            if self.is_token(c, ",") {
                continue;
            }

            let name = self.text(c).to_string();
            let name_location = self.location(c);

            if !c.next_sibling() || c.kind() != SyntaxKind::TypeDef {
                return Err(Error::new(
                    ErrorImpl::MissingTypeAnnotation { name },
                    name_location,
                ));
            }

            let ty = self.type_def(c)?;
            parameters.push(Parameter { name, ty });
        }

        c.parent();
        Ok(parameters)
    }

    /// `name: type = literal`
    pub fn var_init<C: Cursor>(&self, c: &mut C) -> Located<VarInit<SourceLocation>> {
        let a = self.location(c);

        c.first_child();
        let name = self.text(c).to_string();

        if c.kind() != SyntaxKind::VariableName {
            return Err(Error::new(ErrorImpl::InvalidVarInit { name }, a));
        }

        c.next_sibling();
        if c.kind() != SyntaxKind::TypeDef {
            return Err(Error::new(ErrorImpl::InvalidVarInit { name }, a));
        }
        let ty = self.type_def(c)?;

        if !c.next_sibling() || !self.is_token(c, "=") || !c.next_sibling() {
            return Err(Error::new(ErrorImpl::InvalidVarInit { name }, a));
        }

        let value = self.literal(c)?;
        c.parent();

        Ok(VarInit { a, name, ty, value })
    }

    pub fn fun_def<C: Cursor>(&self, c: &mut C) -> Located<FunDef<SourceLocation>> {
        let a = self.location(c);

        c.first_child(); // def
        c.next_sibling();
        let name = self.text(c).to_string();
        c.next_sibling();
        let parameters = self.parameters(c)?;
        c.next_sibling();

        let mut ret = Type::None;
        if c.kind() == SyntaxKind::TypeDef {
            ret = self.type_def(c)?;
            c.next_sibling();
        }

        self.open_body(c, &a)?;

        let mut inits = vec![];
        let mut body = vec![];
        let mut has_child = c.next_sibling();

        while has_child && self.is_var_init(c) {
            inits.push(self.var_init(c)?);
            has_child = c.next_sibling();
        }

        while has_child {
            body.push(self.stmt(c)?);
            has_child = c.next_sibling();
        }

        c.parent(); // Body
        c.parent(); // FunctionDefinition

        Ok(FunDef {
            a,
            name,
            parameters,
            ret,
            inits,
            body,
        })
    }

    /// Type variable names declared through the class bases.
    ///
    /// `object` is ignored, `Generic[T, ...]` contributes `T, ...`.
    pub fn generics<C: Cursor>(&self, c: &mut C) -> Located<Vec<String>> {
        let mut generics = vec![];

        if !c.first_child() {
            return Ok(generics);
        }

        while c.next_sibling() {
            if self.is_token(c, ")") {
                break;
            }
            if self.is_token(c, ",") {
                continue;
            }

            match c.kind() {
                SyntaxKind::VariableName if self.text(c) == "object" => {}
                SyntaxKind::MemberExpression => {
                    let base = self.text(c).to_string();
                    let unsupported = self.error(ErrorImpl::UnsupportedBaseClass { text: base }, c);

                    c.first_child();
                    let is_generic = c.kind() == SyntaxKind::VariableName
                        && self.text(c) == "Generic"
                        && c.next_sibling()
                        && self.is_token(c, "[");

                    if !is_generic {
                        return Err(unsupported);
                    }

                    while c.next_sibling() && !self.is_token(c, "]") {
                        if self.is_token(c, ",") {
                            continue;
                        }
                        if c.kind() != SyntaxKind::VariableName {
                            let text = self.text(c).to_string();
                            return Err(self.error(ErrorImpl::InvalidGenericParameter { text }, c));
                        }
                        generics.push(self.text(c).to_string());
                    }
                    c.parent();
                }
                _ => {
                    let text = self.text(c).to_string();
                    return Err(self.error(ErrorImpl::UnsupportedBaseClass { text }, c));
                }
            }
        }

        c.parent();
        Ok(generics)
    }

    pub fn class<C: Cursor>(&self, c: &mut C) -> Located<Class<SourceLocation>> {
        let a = self.location(c);

        c.first_child(); // class
        c.next_sibling();
        let name = self.text(c).to_string();
        c.next_sibling();

        let mut generics = vec![];
        if c.kind() == SyntaxKind::ArgList {
            generics = self.generics(c)?;
            c.next_sibling();
        }

        self.open_body(c, &a)?;

        let mut fields = vec![];
        let mut methods = vec![];

        while c.next_sibling() {
            if self.is_var_init(c) {
                fields.push(self.var_init(c)?);
            } else if self.is_fun_def(c) {
                methods.push(self.fun_def(c)?);
            } else if c.kind() != SyntaxKind::PassStatement {
                return Err(Error::new(ErrorImpl::InvalidClassBody { class: name }, a));
            }
        }

        c.parent(); // Body
        c.parent(); // ClassDefinition

        if !methods.iter().any(|method| method.name == "__init__") {
            let generic_args = generics.iter().map(Type::class).collect();
            methods.push(FunDef {
                a: a.clone(),
                name: String::from("__init__"),
                parameters: vec![Parameter {
                    name: String::from("self"),
                    ty: Type::generic_class(name.clone(), generic_args),
                }],
                ret: Type::None,
                inits: vec![],
                body: vec![],
            });
        }

        Ok(Class {
            a,
            name,
            generics,
            fields,
            methods,
        })
    }
}
