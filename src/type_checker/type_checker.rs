use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{
            BinOp, Class, Expr, ExprKind, FunDef, Literal, LiteralValue, Program, Stmt, StmtKind,
            UniOp, VarInit,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    SourceLocation,
};

use super::{
    environment::{equal_types, is_assignable, FunctionSignature, GlobalTypeEnv, LocalTypeEnv},
    typed_ast::Typed,
};

/// Checks programs against a global environment that grows with every
/// successfully checked program.
#[derive(Debug, Default)]
pub struct TypeChecker {
    pub env: GlobalTypeEnv,
    /// Last number handed out per comprehension item name.
    compvars: HashMap<String, usize>,
}

impl TypeChecker {
    pub fn new(env: GlobalTypeEnv) -> Self {
        TypeChecker {
            env,
            compvars: HashMap::new(),
        }
    }

    pub fn into_env(self) -> GlobalTypeEnv {
        self.env
    }

    /// Checks `program`, keeping its declarations and top-level bindings in
    /// the environment. On error the environment is left as it was.
    pub fn check(&mut self, program: Program<SourceLocation>) -> Result<Program<Typed>, Error> {
        let augmented = self.env.augment(&program);
        let previous = std::mem::replace(&mut self.env, augmented);

        let result = type_check_program(self, program);
        if result.is_err() {
            self.env = previous;
        }

        result
    }

    /// `compvar$<item><n>`, numbered per item name from 1.
    fn fresh_compvar(&mut self, item: &str) -> String {
        let base = format!("compvar${}", item);
        let counter = self.compvars.entry(base.clone()).or_insert(0);
        *counter += 1;

        format!("{}{}", base, counter)
    }

    fn lookup_var(&self, locals: &LocalTypeEnv, name: &str) -> Option<Type> {
        locals
            .vars
            .get(name)
            .or_else(|| self.env.globals.get(name))
            .cloned()
    }
}

/// Checks `program` on top of `env`, returning the typed program and the
/// augmented environment.
pub fn type_check(
    env: &GlobalTypeEnv,
    program: Program<SourceLocation>,
) -> Result<(Program<Typed>, GlobalTypeEnv), Error> {
    let mut type_checker = TypeChecker::new(env.clone());
    let program = type_checker.check(program)?;

    Ok((program, type_checker.into_env()))
}

fn type_check_program(
    type_checker: &mut TypeChecker,
    program: Program<SourceLocation>,
) -> Result<Program<Typed>, Error> {
    debug!(
        inits = program.inits.len(),
        funs = program.funs.len(),
        classes = program.classes.len(),
        stmts = program.stmts.len(),
        "type checking program"
    );

    let inits = program
        .inits
        .into_iter()
        .map(type_check_init)
        .collect::<Result<Vec<_>, Error>>()?;

    let funs = program
        .funs
        .into_iter()
        .map(|fun| type_check_fun_def(type_checker, fun))
        .collect::<Result<Vec<_>, Error>>()?;

    let classes = program
        .classes
        .into_iter()
        .map(|class| type_check_class(type_checker, class))
        .collect::<Result<Vec<_>, Error>>()?;

    let mut locals = LocalTypeEnv::top_level();
    let stmts = type_check_block(type_checker, &mut locals, program.stmts)?;

    for (name, ty) in locals.vars {
        type_checker.env.globals.insert(name, ty);
    }

    let ty = stmts.last().map(|stmt| stmt.ty().clone()).unwrap_or(Type::None);

    Ok(Program {
        a: (ty, program.a),
        inits,
        funs,
        classes,
        stmts,
    })
}

fn type_check_literal(literal: Literal<SourceLocation>) -> Literal<Typed> {
    let ty = match literal.value {
        LiteralValue::Num(_) => Type::Num,
        LiteralValue::Bool(_) => Type::Bool,
        LiteralValue::None => Type::None,
        LiteralValue::TypeVar => Type::TypeVar,
    };

    Literal {
        a: (ty, literal.a),
        value: literal.value,
    }
}

pub fn type_check_init(init: VarInit<SourceLocation>) -> Result<VarInit<Typed>, Error> {
    let value = type_check_literal(init.value);

    if !is_assignable(&value.a.0, &init.ty) {
        return Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: init.ty,
                received: value.a.0,
            },
            init.a,
        ));
    }

    Ok(VarInit {
        a: (Type::None, init.a),
        name: init.name,
        ty: init.ty,
        value,
    })
}

#[tracing::instrument(level = "debug", skip_all, fields(name = %fun.name))]
pub fn type_check_fun_def(
    type_checker: &mut TypeChecker,
    fun: FunDef<SourceLocation>,
) -> Result<FunDef<Typed>, Error> {
    let mut locals = LocalTypeEnv::function(fun.ret.clone());

    for parameter in fun.parameters.iter() {
        locals.vars.insert(parameter.name.clone(), parameter.ty.clone());
    }

    let mut inits = vec![];
    for init in fun.inits {
        let init = type_check_init(init)?;
        locals.vars.insert(init.name.clone(), init.ty.clone());
        inits.push(init);
    }

    let body = type_check_block(type_checker, &mut locals, fun.body)?;

    if !is_assignable(&locals.actual_ret, &locals.expected_ret) {
        return Err(Error::new(
            ErrorImpl::ReturnTypeMismatch {
                expected: locals.expected_ret,
                received: locals.actual_ret,
            },
            fun.a,
        ));
    }

    Ok(FunDef {
        a: (Type::None, fun.a),
        name: fun.name,
        parameters: fun.parameters,
        ret: fun.ret,
        inits,
        body,
    })
}

#[tracing::instrument(level = "debug", skip_all, fields(name = %class.name))]
pub fn type_check_class(
    type_checker: &mut TypeChecker,
    class: Class<SourceLocation>,
) -> Result<Class<Typed>, Error> {
    let fields = class
        .fields
        .into_iter()
        .map(type_check_init)
        .collect::<Result<Vec<_>, Error>>()?;

    let methods = class
        .methods
        .into_iter()
        .map(|method| type_check_fun_def(type_checker, method))
        .collect::<Result<Vec<_>, Error>>()?;

    let init = methods.iter().find(|method| method.name == "__init__");
    let valid_init = init.is_some_and(|init| {
        init.parameters.len() == 1
            && init.parameters[0].name == "self"
            && init.parameters[0].ty == Type::class(class.name.as_str())
            && init.ret == Type::None
    });

    if !valid_init {
        return Err(Error::new(
            ErrorImpl::InitSignatureOverridden { class: class.name },
            class.a,
        ));
    }

    Ok(Class {
        a: (Type::None, class.a),
        name: class.name,
        generics: class.generics,
        fields,
        methods,
    })
}

pub fn type_check_block(
    type_checker: &mut TypeChecker,
    locals: &mut LocalTypeEnv,
    stmts: Vec<Stmt<SourceLocation>>,
) -> Result<Vec<Stmt<Typed>>, Error> {
    stmts
        .into_iter()
        .map(|stmt| type_check_stmt(type_checker, locals, stmt))
        .collect()
}

fn expect_bool(condition: &Expr<Typed>) -> Result<(), Error> {
    if *condition.ty() != Type::Bool {
        return Err(Error::new(
            ErrorImpl::ConditionNotBool {
                received: condition.ty().clone(),
            },
            condition.a.1.clone(),
        ));
    }
    Ok(())
}

fn expect_index(index: &Expr<Typed>) -> Result<(), Error> {
    if *index.ty() != Type::Num {
        return Err(Error::new(
            ErrorImpl::IndexNotInteger {
                received: index.ty().clone(),
            },
            index.a.1.clone(),
        ));
    }
    Ok(())
}

fn expect_in_loop(locals: &LocalTypeEnv, keyword: &str, location: &SourceLocation) -> Result<(), Error> {
    if !locals.in_loop() {
        return Err(Error::new(
            ErrorImpl::OutsideLoop {
                keyword: keyword.to_string(),
            },
            location.clone(),
        ));
    }
    Ok(())
}

fn expect_iterable(type_checker: &TypeChecker, iterable: &Expr<Typed>) -> Result<Type, Error> {
    type_checker
        .env
        .iterable_element(iterable.ty())
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::NotIterable {
                    received: iterable.ty().clone(),
                },
                iterable.a.1.clone(),
            )
        })
}

/// The class name of an object receiver, or `NotAnObject`.
fn expect_object<'t>(
    operation: &str,
    object: &'t Expr<Typed>,
    location: &SourceLocation,
) -> Result<&'t str, Error> {
    object.ty().class_name().ok_or_else(|| {
        Error::new(
            ErrorImpl::NotAnObject {
                operation: operation.to_string(),
                received: object.ty().clone(),
            },
            location.clone(),
        )
    })
}

/// The declared type of `field` on the object's class.
fn field_type(
    type_checker: &TypeChecker,
    operation: &str,
    object: &Expr<Typed>,
    field: &str,
    location: &SourceLocation,
) -> Result<Type, Error> {
    let class_name = expect_object(operation, object, location)?;
    let class = type_checker.env.class(class_name).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownClass {
                name: class_name.to_string(),
            },
            location.clone(),
        )
    })?;

    class.fields.get(field).cloned().ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownField {
                class: class_name.to_string(),
                field: field.to_string(),
            },
            location.clone(),
        )
    })
}

/// Checks call arguments positionally against `parameters`.
fn check_arguments(
    name: &str,
    parameters: &[Type],
    arguments: &[Expr<Typed>],
    location: &SourceLocation,
) -> Result<(), Error> {
    if parameters.len() != arguments.len() {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                name: name.to_string(),
                expected: parameters.len(),
                received: arguments.len(),
            },
            location.clone(),
        ));
    }

    for (parameter, argument) in parameters.iter().zip(arguments.iter()) {
        if !is_assignable(argument.ty(), parameter) {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    expected: parameter.clone(),
                    received: argument.ty().clone(),
                },
                argument.a.1.clone(),
            ));
        }
    }

    Ok(())
}

fn function_signature(
    type_checker: &TypeChecker,
    name: &str,
    location: &SourceLocation,
) -> Result<FunctionSignature, Error> {
    type_checker.env.functions.get(name).cloned().ok_or_else(|| {
        Error::new(
            ErrorImpl::UndefinedFunction {
                name: name.to_string(),
            },
            location.clone(),
        )
    })
}

fn type_check_exprs(
    type_checker: &mut TypeChecker,
    locals: &mut LocalTypeEnv,
    exprs: Vec<Expr<SourceLocation>>,
) -> Result<Vec<Expr<Typed>>, Error> {
    exprs
        .into_iter()
        .map(|expr| type_check_expr(type_checker, locals, expr))
        .collect()
}

fn type_check_boxed(
    type_checker: &mut TypeChecker,
    locals: &mut LocalTypeEnv,
    expr: Box<Expr<SourceLocation>>,
) -> Result<Box<Expr<Typed>>, Error> {
    Ok(Box::new(type_check_expr(type_checker, locals, *expr)?))
}

pub fn type_check_stmt(
    type_checker: &mut TypeChecker,
    locals: &mut LocalTypeEnv,
    stmt: Stmt<SourceLocation>,
) -> Result<Stmt<Typed>, Error> {
    let location = stmt.a;

    let (ty, kind) = match stmt.kind {
        StmtKind::Assign { name, value } => {
            let value = type_check_expr(type_checker, locals, value)?;
            let Some(target) = type_checker.lookup_var(locals, &name) else {
                return Err(Error::new(ErrorImpl::UnboundId { name }, location));
            };

            if !is_assignable(value.ty(), &target) {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: target,
                        received: value.ty().clone(),
                    },
                    location,
                ));
            }

            (Type::None, StmtKind::Assign { name, value })
        }
        StmtKind::FieldAssign { obj, field, value } => {
            let obj = type_check_expr(type_checker, locals, obj)?;
            let value = type_check_expr(type_checker, locals, value)?;
            let target = field_type(type_checker, "field assignment", &obj, &field, &location)?;

            if !is_assignable(value.ty(), &target) {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: target,
                        received: value.ty().clone(),
                    },
                    location,
                ));
            }

            (Type::None, StmtKind::FieldAssign { obj, field, value })
        }
        StmtKind::IndexAssign { obj, index, value } => {
            let obj = type_check_expr(type_checker, locals, obj)?;
            let index = type_check_expr(type_checker, locals, index)?;
            let value = type_check_expr(type_checker, locals, value)?;

            expect_index(&index)?;

            let Type::List(element) = obj.ty() else {
                return Err(Error::new(
                    ErrorImpl::ItemAssignmentUnsupported {
                        received: obj.ty().clone(),
                    },
                    location,
                ));
            };

            if !is_assignable(value.ty(), element) {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: (**element).clone(),
                        received: value.ty().clone(),
                    },
                    location,
                ));
            }

            (Type::None, StmtKind::IndexAssign { obj, index, value })
        }
        StmtKind::Expr(expr) => {
            let expr = type_check_expr(type_checker, locals, expr)?;
            (expr.ty().clone(), StmtKind::Expr(expr))
        }
        StmtKind::Return(value) => {
            if locals.top_level {
                return Err(Error::new(ErrorImpl::ReturnOutsideFunction, location));
            }

            let value = type_check_expr(type_checker, locals, value)?;
            if !is_assignable(value.ty(), &locals.expected_ret) {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeMismatch {
                        expected: locals.expected_ret.clone(),
                        received: value.ty().clone(),
                    },
                    location,
                ));
            }

            locals.actual_ret = value.ty().clone();
            (value.ty().clone(), StmtKind::Return(value))
        }
        StmtKind::If { cond, thn, els } => {
            let cond = type_check_expr(type_checker, locals, cond)?;
            expect_bool(&cond)?;

            let thn = type_check_block(type_checker, locals, thn)?;
            let thn_ret = std::mem::replace(&mut locals.actual_ret, Type::None);

            let els = type_check_block(type_checker, locals, els)?;
            if thn_ret != locals.actual_ret {
                let els_ret = std::mem::replace(&mut locals.actual_ret, Type::None);
                locals.actual_ret = Type::either(thn_ret.clone(), els_ret);
            }

            (thn_ret, StmtKind::If { cond, thn, els })
        }
        StmtKind::While { cond, body } => {
            let cond = type_check_expr(type_checker, locals, cond)?;
            expect_bool(&cond)?;

            locals.loop_depth += 1;
            let body = type_check_block(type_checker, locals, body);
            locals.loop_depth -= 1;

            (Type::None, StmtKind::While { cond, body: body? })
        }
        StmtKind::For { var, iterable, body, els } => {
            let iterable = type_check_expr(type_checker, locals, iterable)?;
            let element = expect_iterable(type_checker, &iterable)?;

            let Some(target) = type_checker.lookup_var(locals, &var) else {
                return Err(Error::new(ErrorImpl::UnboundId { name: var }, location));
            };
            if !is_assignable(&element, &target) {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: target,
                        received: element,
                    },
                    location,
                ));
            }

            locals.loop_depth += 1;
            let body = type_check_block(type_checker, locals, body);
            locals.loop_depth -= 1;
            let body = body?;

            let els = type_check_block(type_checker, locals, els)?;

            (
                Type::None,
                StmtKind::For {
                    var,
                    iterable,
                    body,
                    els,
                },
            )
        }
        StmtKind::Pass => (Type::None, StmtKind::Pass),
        StmtKind::Continue => {
            expect_in_loop(locals, "continue", &location)?;
            (Type::None, StmtKind::Continue)
        }
        StmtKind::Break => {
            expect_in_loop(locals, "break", &location)?;
            (Type::None, StmtKind::Break)
        }
    };

    Ok(Stmt {
        a: (ty, location),
        kind,
    })
}

pub fn type_check_expr(
    type_checker: &mut TypeChecker,
    locals: &mut LocalTypeEnv,
    expr: Expr<SourceLocation>,
) -> Result<Expr<Typed>, Error> {
    let location = expr.a;

    let (ty, kind) = match expr.kind {
        ExprKind::Literal(literal) => {
            let literal = type_check_literal(literal);
            (literal.a.0.clone(), ExprKind::Literal(literal))
        }
        ExprKind::Id { name } => {
            if let Some((renamed, ty)) = locals.comprehension_var(&name) {
                (ty.clone(), ExprKind::Id { name: renamed.clone() })
            } else if let Some(ty) = type_checker.lookup_var(locals, &name) {
                (ty, ExprKind::Id { name })
            } else {
                return Err(Error::new(ErrorImpl::UnboundId { name }, location));
            }
        }
        ExprKind::BinOp { op, left, right } => {
            let left = type_check_boxed(type_checker, locals, left)?;
            let right = type_check_boxed(type_checker, locals, right)?;
            let ty = type_check_binop(op, &left, &right, &location)?;

            (ty, ExprKind::BinOp { op, left, right })
        }
        ExprKind::UniOp { op, expr } => {
            let expr = type_check_boxed(type_checker, locals, expr)?;
            let expected = match op {
                UniOp::Neg => Type::Num,
                UniOp::Not => Type::Bool,
            };

            if *expr.ty() != expected {
                return Err(Error::new(
                    ErrorImpl::UnaryOperatorTypeMismatch {
                        op: op.to_string(),
                        operand: expr.ty().clone(),
                    },
                    location,
                ));
            }

            (expr.ty().clone(), ExprKind::UniOp { op, expr })
        }
        ExprKind::Builtin1 { name, arg } => {
            let arg = type_check_boxed(type_checker, locals, arg)?;

            let ty = if name == "print" {
                if arg.ty().is_class() {
                    return Err(Error::new(ErrorImpl::PrintObject, location));
                }
                arg.ty().clone()
            } else {
                let signature = function_signature(type_checker, &name, &location)?;
                check_arguments(&name, &signature.parameters, std::slice::from_ref(&*arg), &location)?;
                signature.ret
            };

            (ty, ExprKind::Builtin1 { name, arg })
        }
        ExprKind::Builtin2 { name, left, right } => {
            let left = type_check_expr(type_checker, locals, *left)?;
            let right = type_check_expr(type_checker, locals, *right)?;

            let signature = function_signature(type_checker, &name, &location)?;
            let arguments = [left, right];
            check_arguments(&name, &signature.parameters, &arguments, &location)?;
            let [left, right] = arguments;

            (
                signature.ret,
                ExprKind::Builtin2 {
                    name,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            )
        }
        ExprKind::Call {
            name,
            generic_args,
            arguments,
        } => {
            let arguments = type_check_exprs(type_checker, locals, arguments)?;

            if let Some(class) = type_checker.env.class(&name) {
                if let Some(init) = class.methods.get("__init__") {
                    let parameters = init.parameters.get(1..).unwrap_or_default();
                    check_arguments(&name, parameters, &arguments, &location)?;

                    if init.ret != Type::None {
                        return Err(Error::new(ErrorImpl::InitReturnNotNone { class: name }, location));
                    }
                }

                (
                    Type::generic_class(name.as_str(), generic_args),
                    ExprKind::Construct { name, arguments },
                )
            } else {
                let signature = function_signature(type_checker, &name, &location)?;
                check_arguments(&name, &signature.parameters, &arguments, &location)?;

                (
                    signature.ret,
                    ExprKind::Call {
                        name,
                        generic_args,
                        arguments,
                    },
                )
            }
        }
        ExprKind::Construct { name, arguments } => {
            // Only produced by this checker; re-checking is a plain lookup.
            if type_checker.env.class(&name).is_none() {
                return Err(Error::new(ErrorImpl::UnknownClass { name }, location));
            }
            let arguments = type_check_exprs(type_checker, locals, arguments)?;

            (Type::class(name.as_str()), ExprKind::Construct { name, arguments })
        }
        ExprKind::Lookup { obj, field } => {
            let obj = type_check_boxed(type_checker, locals, obj)?;
            let ty = field_type(type_checker, "field lookup", &obj, &field, &location)?;

            (ty, ExprKind::Lookup { obj, field })
        }
        ExprKind::MethodCall {
            obj,
            method,
            arguments,
        } => {
            let obj = type_check_boxed(type_checker, locals, obj)?;
            let arguments = type_check_exprs(type_checker, locals, arguments)?;

            let class_name = expect_object("method call", &obj, &location)?;
            let class = type_checker.env.class(class_name).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownClass {
                        name: class_name.to_string(),
                    },
                    location.clone(),
                )
            })?;
            let signature = class.methods.get(&method).cloned().ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownMethod {
                        class: class_name.to_string(),
                        method: method.clone(),
                    },
                    location.clone(),
                )
            })?;

            let receiver = signature.parameters.first().ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnexpectedArguments {
                        name: method.clone(),
                        expected: 0,
                        received: arguments.len() + 1,
                    },
                    location.clone(),
                )
            })?;
            if !is_assignable(obj.ty(), receiver) {
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        expected: receiver.clone(),
                        received: obj.ty().clone(),
                    },
                    obj.a.1.clone(),
                ));
            }
            check_arguments(&method, &signature.parameters[1..], &arguments, &location)?;

            (
                signature.ret,
                ExprKind::MethodCall {
                    obj,
                    method,
                    arguments,
                },
            )
        }
        ExprKind::Index { obj, index } => {
            let obj = type_check_boxed(type_checker, locals, obj)?;
            let index = type_check_boxed(type_checker, locals, index)?;

            expect_index(&index)?;

            let Type::List(element) = obj.ty() else {
                return Err(Error::new(
                    ErrorImpl::CannotIndex {
                        received: obj.ty().clone(),
                    },
                    location,
                ));
            };

            ((**element).clone(), ExprKind::Index { obj, index })
        }
        ExprKind::ListLiteral { elements } => {
            let elements = type_check_exprs(type_checker, locals, elements)?;

            let element = match elements.first() {
                Some(first) => first.ty().clone(),
                None => Type::None,
            };

            if let Some(mismatch) = elements
                .iter()
                .skip(1)
                .find(|candidate| !is_assignable(candidate.ty(), &element))
            {
                return Err(Error::new(
                    ErrorImpl::IncompatibleListElements {
                        first: element,
                        element: mismatch.ty().clone(),
                    },
                    mismatch.a.1.clone(),
                ));
            }

            (Type::list(element), ExprKind::ListLiteral { elements })
        }
        ExprKind::Ternary {
            expr_if_true,
            cond,
            expr_if_false,
        } => {
            let expr_if_true = type_check_boxed(type_checker, locals, expr_if_true)?;
            let cond = type_check_boxed(type_checker, locals, cond)?;
            let expr_if_false = type_check_boxed(type_checker, locals, expr_if_false)?;

            expect_bool(&cond)?;

            let ty = if equal_types(expr_if_true.ty(), expr_if_false.ty()) {
                expr_if_true.ty().clone()
            } else {
                Type::either(expr_if_true.ty().clone(), expr_if_false.ty().clone())
            };

            (
                ty,
                ExprKind::Ternary {
                    expr_if_true,
                    cond,
                    expr_if_false,
                },
            )
        }
        ExprKind::Comprehension {
            kind,
            lhs,
            item,
            iterable,
            cond,
        } => {
            let iterable = type_check_boxed(type_checker, locals, iterable)?;
            let element = expect_iterable(type_checker, &iterable)?;

            let renamed = type_checker.fresh_compvar(&item);
            trace!(item = %item, renamed = %renamed, "comprehension variable");

            let mut scope = HashMap::new();
            scope.insert(item, (renamed.clone(), element.clone()));
            locals.comprehension_scopes.push(scope);

            let checked = type_check_comprehension_body(type_checker, locals, lhs, cond);
            locals.comprehension_scopes.pop();
            let (lhs, cond) = checked?;

            (
                kind.container_of(element),
                ExprKind::Comprehension {
                    kind,
                    lhs,
                    item: renamed,
                    iterable,
                    cond,
                },
            )
        }
    };

    Ok(Expr {
        a: (ty, location),
        kind,
    })
}

/// The filter and result expression, checked with the item in scope.
fn type_check_comprehension_body(
    type_checker: &mut TypeChecker,
    locals: &mut LocalTypeEnv,
    lhs: Box<Expr<SourceLocation>>,
    cond: Option<Box<Expr<SourceLocation>>>,
) -> Result<(Box<Expr<Typed>>, Option<Box<Expr<Typed>>>), Error> {
    let cond = match cond {
        Some(cond) => {
            let cond = type_check_boxed(type_checker, locals, cond)?;
            expect_bool(&cond)?;
            Some(cond)
        }
        None => None,
    };

    let lhs = type_check_boxed(type_checker, locals, lhs)?;

    Ok((lhs, cond))
}

fn type_check_binop(
    op: BinOp,
    left: &Expr<Typed>,
    right: &Expr<Typed>,
    location: &SourceLocation,
) -> Result<Type, Error> {
    let (left, right) = (left.ty(), right.ty());

    let mismatch = || {
        Error::new(
            ErrorImpl::OperatorTypeMismatch {
                op: op.to_string(),
                left: left.clone(),
                right: right.clone(),
            },
            location.clone(),
        )
    };

    match op {
        BinOp::Plus | BinOp::Minus | BinOp::Mul | BinOp::IDiv | BinOp::Mod => {
            if *left == Type::Num && *right == Type::Num {
                Ok(Type::Num)
            } else {
                Err(mismatch())
            }
        }
        BinOp::Eq | BinOp::Neq => {
            if left.is_class() || right.is_class() {
                return Err(Error::new(
                    ErrorImpl::ClassEquality { op: op.to_string() },
                    location.clone(),
                ));
            }
            if left == right {
                Ok(Type::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinOp::Lte | BinOp::Gte | BinOp::Lt | BinOp::Gt => {
            if *left == Type::Num && *right == Type::Num {
                Ok(Type::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinOp::And | BinOp::Or => {
            if *left == Type::Bool && *right == Type::Bool {
                Ok(Type::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinOp::Is => {
            if left.is_reference() && right.is_reference() {
                Ok(Type::Bool)
            } else {
                Err(Error::new(
                    ErrorImpl::IsOperandsNotObjects {
                        left: left.clone(),
                        right: right.clone(),
                    },
                    location.clone(),
                ))
            }
        }
    }
}
