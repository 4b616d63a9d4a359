//! Integration tests for the whole front end.
//!
//! These tests run source text through tokenization, parsing, AST building
//! and type checking.

use pyfront::{
    ast::{
        ast::{ExprKind, StmtKind},
        types::Type,
    },
    check_program,
    errors::errors::{ErrorImpl, ErrorKind},
    lexer::lexer::tokenize,
    parse_program,
    parser::parser::parse,
    type_checker::environment::GlobalTypeEnv,
};

#[test]
fn test_check_simple_program() {
    let (program, _) = check_program("2 + 3", &GlobalTypeEnv::builtins()).unwrap();

    assert_eq!(program.ty(), &Type::Num);
    assert_eq!(program.stmts.len(), 1);
}

#[test]
fn test_check_function() {
    let source = "def f(x : int) -> int: return x + 1\nf(5)";
    let (program, env) = check_program(source, &GlobalTypeEnv::builtins()).unwrap();

    assert_eq!(program.ty(), &Type::Num);
    assert_eq!(program.funs.len(), 1);
    assert_eq!(program.funs[0].name, "f");
    assert_eq!(env.functions["f"].parameters, vec![Type::Num]);
}

#[test]
fn test_check_builtin() {
    let (program, _) = check_program("abs(0 - 5)", &GlobalTypeEnv::builtins()).unwrap();

    assert_eq!(program.ty(), &Type::Num);
    let StmtKind::Expr(expr) = &program.stmts[0].kind else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&expr.kind, ExprKind::Builtin1 { name, .. } if name == "abs"));
}

#[test]
fn test_check_class_with_synthesized_init() {
    let source = "\
class Point(object):
    x : int = 0
    y : int = 0
    def sum(self : Point) -> int:
        return self.x + self.y

p : Point = None
p = Point()
p.x = 3
p.sum()
";
    let (program, env) = check_program(source, &GlobalTypeEnv::builtins()).unwrap();

    assert_eq!(program.ty(), &Type::Num);

    let class = &program.classes[0];
    let init = class.method("__init__").unwrap();
    assert_eq!(init.parameters.len(), 1);
    assert_eq!(init.parameters[0].ty, Type::class("Point"));
    assert_eq!(init.ret, Type::None);

    assert!(env.classes["Point"].methods.contains_key("sum"));
    assert_eq!(env.globals["p"], Type::class("Point"));
}

#[test]
fn test_reject_mixed_list() {
    let error = check_program("[1, True]", &GlobalTypeEnv::builtins()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::TypeCheck);
    assert_eq!(error.get_error_name(), "IncompatibleListElements");
}

#[test]
fn test_reject_indexing_an_object() {
    let source = "class C(object):\n    x : int = 0\nc : C = None\nc[0]\n";
    let error = check_program(source, &GlobalTypeEnv::builtins()).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::CannotIndex { received: Type::class("C") }
    );
    assert_eq!(error.get_location().line, 4);
}

#[test]
fn test_comprehension_hygiene() {
    let source = "x : int = 7\n[x for x in [True]]\n[x for x in [1]]\nx";
    let (program, env) = check_program(source, &GlobalTypeEnv::builtins()).unwrap();

    let items: Vec<&str> = program.stmts[..2]
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Comprehension { item, .. } => Some(item.as_str()),
                _ => None,
            },
            _ => None,
        })
        .collect();

    assert_eq!(items, vec!["compvar$x1", "compvar$x2"]);
    assert_eq!(program.ty(), &Type::Num);
    assert!(env.globals.keys().all(|name| !name.starts_with("compvar$")));
}

#[test]
fn test_either_for_disagreeing_branches() {
    let source = "def f(b : bool) -> int:\n    if b:\n        pass\n    else:\n        return 2\n";
    let error = check_program(source, &GlobalTypeEnv::builtins()).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ReturnTypeMismatch {
            expected: Type::Num,
            received: Type::either(Type::None, Type::Num),
        }
    );

    let source = "def f(b : bool) -> int:\n    if b:\n        return 1\n    return 2\n";
    assert!(check_program(source, &GlobalTypeEnv::builtins()).is_ok());
}

#[test]
fn test_none_assignability() {
    let source = "class C(object):\n    x : int = 0\nc : C = None\nxs : [int] = None\nc = None\n";
    assert!(check_program(source, &GlobalTypeEnv::builtins()).is_ok());

    let error = check_program("b : bool = None\n", &GlobalTypeEnv::builtins()).unwrap_err();
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_constructor_arity() {
    let source = "class C(object):\n    x : int = 0\nC(1, 2)\n";
    let error = check_program(source, &GlobalTypeEnv::builtins()).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedArguments {
            name: String::from("C"),
            expected: 0,
            received: 2,
        }
    );
}

#[test]
fn test_environment_carries_between_programs() {
    let (_, env) = check_program("def double(n : int) -> int:\n    return n * 2\n", &GlobalTypeEnv::builtins()).unwrap();
    let (program, _) = check_program("double(4)", &env).unwrap();

    assert_eq!(program.ty(), &Type::Num);
}

#[test]
fn test_lex_error_invalid_token() {
    let error = tokenize("x = 1 $ 2").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Parse);
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_parse_error_unexpected_token() {
    let source = "x = )";
    let error = parse(tokenize(source).unwrap(), source).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_build_error_declaration_after_statement() {
    let error = parse_program("print(1)\nx : int = 1\n").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::DeclarationAfterStatement { name: String::from("x") }
    );
    assert_eq!(error.get_location().line, 2);
}

#[test]
fn test_build_error_missing_annotation() {
    let error = parse_program("def f(x):\n    pass\n").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingTypeAnnotation { name: String::from("x") }
    );
}
