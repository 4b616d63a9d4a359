//! Unit tests for the type checker module.

use super::{
    environment::{equal_types, is_assignable, GlobalTypeEnv},
    type_checker::{type_check, TypeChecker},
    typed_ast::Typed,
};
use crate::{
    ast::{
        ast::{ComprehensionKind, ExprKind, Program, StmtKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, ErrorKind},
    parse_program,
};

fn check(source: &str) -> Result<(Program<Typed>, GlobalTypeEnv), Error> {
    type_check(&GlobalTypeEnv::builtins(), parse_program(source).unwrap())
}

fn check_ok(source: &str) -> Program<Typed> {
    match check(source) {
        Ok((program, _)) => program,
        Err(error) => panic!("unexpected error: {}", error),
    }
}

fn check_err(source: &str) -> Error {
    match check(source) {
        Ok(_) => panic!("expected a type error for {:?}", source),
        Err(error) => error,
    }
}

fn expr_of(program: &Program<Typed>, index: usize) -> &crate::ast::ast::Expr<Typed> {
    match &program.stmts[index].kind {
        StmtKind::Expr(expr) => expr,
        other => panic!("expected an expression statement, found {:?}", other),
    }
}

#[test]
fn test_arithmetic() {
    let program = check_ok("1 + 2 * 3");
    assert_eq!(program.ty(), &Type::Num);
    assert_eq!(expr_of(&program, 0).ty(), &Type::Num);
}

#[test]
fn test_arithmetic_mismatch() {
    let error = check_err("1 + True");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::OperatorTypeMismatch {
            op: String::from("+"),
            left: Type::Num,
            right: Type::Bool,
        }
    );
    assert_eq!(error.kind(), ErrorKind::TypeCheck);
}

#[test]
fn test_comparisons_and_logic() {
    assert_eq!(check_ok("1 < 2").ty(), &Type::Bool);
    assert_eq!(check_ok("True == False").ty(), &Type::Bool);
    assert_eq!(check_ok("1 < 2 and not False").ty(), &Type::Bool);
    assert_eq!(check_ok("None is None").ty(), &Type::Bool);
}

#[test]
fn test_equality_requires_same_types() {
    let error = check_err("1 == True");
    assert_eq!(error.get_error_name(), "OperatorTypeMismatch");
}

#[test]
fn test_class_equality_rejected() {
    let source = "class C(object):\n    x : int = 0\nC() == C()\n";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ClassEquality { op: String::from("==") }
    );
}

#[test]
fn test_is_requires_objects() {
    let error = check_err("1 is None");
    assert_eq!(error.get_error_name(), "IsOperandsNotObjects");
}

#[test]
fn test_unary_operators() {
    assert_eq!(check_ok("-5").ty(), &Type::Num);
    assert_eq!(check_ok("not True").ty(), &Type::Bool);

    let error = check_err("not 5");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnaryOperatorTypeMismatch {
            op: String::from("not"),
            operand: Type::Num,
        }
    );
}

#[test]
fn test_unbound_id() {
    let error = check_err("y + 1");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnboundId { name: String::from("y") }
    );
    assert_eq!(error.get_location().line, 1);
    assert_eq!(error.get_location().column, 1);
}

#[test]
fn test_globals_and_assignment() {
    let program = check_ok("x : int = 1\nx = x + 1\nx");
    assert_eq!(program.ty(), &Type::Num);
    assert_eq!(program.stmts[0].ty(), &Type::None);

    let error = check_err("x : int = 1\nx = True\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: Type::Num,
            received: Type::Bool,
        }
    );
}

#[test]
fn test_var_init_mismatch() {
    let error = check_err("x : bool = 1\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: Type::Bool,
            received: Type::Num,
        }
    );
}

#[test]
fn test_none_assignable_to_objects() {
    let source = "class C(object):\n    x : int = 0\nc : C = None\nc = C()\nc = None\n";
    check_ok(source);

    let error = check_err("x : int = None\n");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_assignability() {
    assert!(is_assignable(&Type::None, &Type::class("C")));
    assert!(is_assignable(&Type::None, &Type::list(Type::Num)));
    assert!(is_assignable(&Type::list(Type::None), &Type::list(Type::Num)));
    assert!(is_assignable(&Type::generator(Type::Num), &Type::class("generator")));
    assert!(is_assignable(
        &Type::generator(Type::None),
        &Type::generator(Type::class("C"))
    ));

    assert!(!is_assignable(&Type::None, &Type::Num));
    assert!(!is_assignable(&Type::Bool, &Type::Num));
    assert!(!is_assignable(&Type::list(Type::Num), &Type::list(Type::Bool)));
    assert!(!is_assignable(&Type::generator(Type::Num), &Type::class("C")));
}

#[test]
fn test_function_call() {
    let program = check_ok("def f(x : int) -> int:\n    return x + 1\nf(5)");
    assert_eq!(program.ty(), &Type::Num);
    assert_eq!(program.funs[0].a.0, Type::None);
}

#[test]
fn test_function_call_arity_and_types() {
    let source = "def f(x : int) -> int:\n    return x\nf(1, 2)";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedArguments {
            name: String::from("f"),
            expected: 1,
            received: 2,
        }
    );

    let source = "def f(x : int) -> int:\n    return x\nf(True)";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: Type::Num,
            received: Type::Bool,
        }
    );
}

#[test]
fn test_undefined_function() {
    let error = check_err("g(1)");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UndefinedFunction { name: String::from("g") }
    );
}

#[test]
fn test_function_locals() {
    let source = "def f(x : int) -> int:\n    y : int = 2\n    return x * y\nf(3)";
    assert_eq!(check_ok(source).ty(), &Type::Num);
}

#[test]
fn test_return_checks() {
    let error = check_err("return 1");
    assert_eq!(error.get_internal_error(), &ErrorImpl::ReturnOutsideFunction);

    let error = check_err("def f() -> int:\n    return True\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ReturnTypeMismatch {
            expected: Type::Num,
            received: Type::Bool,
        }
    );
}

#[test]
fn test_missing_return() {
    let error = check_err("def f() -> int:\n    pass\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ReturnTypeMismatch {
            expected: Type::Num,
            received: Type::None,
        }
    );
}

#[test]
fn test_if_branches_agree() {
    let source = "def f(x : int) -> int:\n    if x > 0:\n        return 1\n    else:\n        return 2\nf(1)";
    assert_eq!(check_ok(source).ty(), &Type::Num);
}

#[test]
fn test_if_branches_disagree() {
    let source = "def f(x : int) -> int:\n    if x > 0:\n        return 1\nf(1)";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ReturnTypeMismatch {
            expected: Type::Num,
            received: Type::either(Type::Num, Type::None),
        }
    );
}

#[test]
fn test_condition_must_be_bool() {
    let error = check_err("if 1:\n    pass\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ConditionNotBool { received: Type::Num }
    );

    let error = check_err("while 0:\n    pass\n");
    assert_eq!(error.get_error_name(), "ConditionNotBool");
}

#[test]
fn test_ternary() {
    assert_eq!(check_ok("1 if True else 2").ty(), &Type::Num);
    assert_eq!(
        check_ok("1 if True else False").ty(),
        &Type::either(Type::Num, Type::Bool)
    );

    let error = check_err("1 if 2 else 3");
    assert_eq!(error.get_error_name(), "ConditionNotBool");
}

#[test]
fn test_builtins() {
    assert_eq!(check_ok("abs(0 - 5)").ty(), &Type::Num);
    assert_eq!(check_ok("max(1, 2)").ty(), &Type::Num);
    assert_eq!(check_ok("print(True)").ty(), &Type::Bool);

    let error = check_err("pow(1, True)");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: Type::Num,
            received: Type::Bool,
        }
    );
}

#[test]
fn test_print_object_rejected() {
    let source = "class C(object):\n    x : int = 0\nprint(C())\n";
    let error = check_err(source);
    assert_eq!(error.get_internal_error(), &ErrorImpl::PrintObject);
}

#[test]
fn test_builtins_need_environment() {
    let program = parse_program("abs(1)").unwrap();
    let error = type_check(&GlobalTypeEnv::default(), program).unwrap_err();
    assert_eq!(error.get_error_name(), "UndefinedFunction");
}

#[test]
fn test_classes() {
    let source = "class C(object):\n    x : int = 1\n    def get(self : C) -> int:\n        return self.x\nc : C = None\nc = C()\nc.x = 5\nc.get()";
    let (program, env) = check(source).unwrap();

    assert_eq!(program.ty(), &Type::Num);
    assert!(matches!(
        &program.stmts[0].kind,
        StmtKind::Assign { value, .. } if matches!(&value.kind, ExprKind::Construct { name, .. } if name == "C")
    ));

    let class = env.class("C").unwrap();
    assert_eq!(class.fields.get("x"), Some(&Type::Num));
    assert!(class.methods.contains_key("__init__"));
    assert!(class.methods.contains_key("get"));
}

#[test]
fn test_constructor_arity() {
    let source = "class C(object):\n    x : int = 0\nC(1)\n";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedArguments {
            name: String::from("C"),
            expected: 0,
            received: 1,
        }
    );
}

#[test]
fn test_init_signature_overridden() {
    let source = "class C(object):\n    def __init__(self : C, x : int):\n        pass\n";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::InitSignatureOverridden { class: String::from("C") }
    );
}

#[test]
fn test_member_errors() {
    let class = "class C(object):\n    x : int = 0\n";

    let error = check_err(&format!("{}C().y\n", class));
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnknownField {
            class: String::from("C"),
            field: String::from("y"),
        }
    );

    let error = check_err(&format!("{}C().go()\n", class));
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnknownMethod {
            class: String::from("C"),
            method: String::from("go"),
        }
    );

    let error = check_err("x : int = 1\nx.y\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::NotAnObject {
            operation: String::from("field lookup"),
            received: Type::Num,
        }
    );
}

#[test]
fn test_method_arguments() {
    let source = "class C(object):\n    def add(self : C, n : int) -> int:\n        return n\nC().add(True)\n";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: Type::Num,
            received: Type::Bool,
        }
    );
}

#[test]
fn test_lists() {
    assert_eq!(check_ok("[1, 2, 3]").ty(), &Type::list(Type::Num));
    assert_eq!(check_ok("[]").ty(), &Type::list(Type::None));
    assert_eq!(check_ok("[1, 2][0]").ty(), &Type::Num);

    let error = check_err("[1, True]");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::IncompatibleListElements {
            first: Type::Num,
            element: Type::Bool,
        }
    );
}

#[test]
fn test_empty_list_assignable() {
    check_ok("xs : [int] = None\nxs = []\nxs = [1]\n");
}

#[test]
fn test_indexing() {
    let error = check_err("[1, 2][True]");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::IndexNotInteger { received: Type::Bool }
    );

    let source = "class C(object):\n    x : int = 0\nC()[0]\n";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::CannotIndex { received: Type::class("C") }
    );
}

#[test]
fn test_index_assignment() {
    check_ok("xs : [int] = None\nxs[0] = 1\n");

    let error = check_err("xs : [int] = None\nxs[0] = True\n");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = check_err("x : int = 0\nx[0] = 1\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ItemAssignmentUnsupported { received: Type::Num }
    );
}

#[test]
fn test_comprehension_renames_item() {
    let program = check_ok("[x * 2 for x in [1, 2] if x > 1]");
    let expr = expr_of(&program, 0);

    assert_eq!(expr.ty(), &Type::list(Type::Num));
    let ExprKind::Comprehension { kind, lhs, item, cond, .. } = &expr.kind else {
        panic!("expected a comprehension, found {:?}", expr.kind);
    };
    assert_eq!(*kind, ComprehensionKind::List);
    assert_eq!(item, "compvar$x1");
    assert!(cond.is_some());

    let ExprKind::BinOp { left, .. } = &lhs.kind else {
        panic!("expected a binary result expression");
    };
    assert_eq!(left.kind, ExprKind::Id { name: String::from("compvar$x1") });
}

#[test]
fn test_comprehension_names_are_distinct() {
    let program = check_ok("(x for x in [1])\n(x for x in [True])\n");

    let names: Vec<&str> = program
        .stmts
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Comprehension { item, .. } => item.as_str(),
                _ => panic!("expected a comprehension"),
            },
            _ => panic!("expected an expression statement"),
        })
        .collect();

    assert_eq!(names, vec!["compvar$x1", "compvar$x2"]);
    assert_eq!(program.ty(), &Type::generator(Type::Bool));
}

#[test]
fn test_comprehension_item_does_not_leak() {
    let error = check_err("(x for x in [1])\nx\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnboundId { name: String::from("x") }
    );
}

#[test]
fn test_comprehension_shadows_global() {
    let program = check_ok("x : bool = True\n[x for x in [1]]\nx");
    assert_eq!(expr_of(&program, 0).ty(), &Type::list(Type::Num));
    assert_eq!(program.ty(), &Type::Bool);
}

#[test]
fn test_comprehension_errors() {
    let error = check_err("[x for x in 5]");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::NotIterable { received: Type::Num }
    );

    let error = check_err("[x for x in [1] if x]");
    assert_eq!(error.get_error_name(), "ConditionNotBool");
}

#[test]
fn test_iterable_class() {
    let source = "class R(object):\n    n : int = 0\n    def next(self : R) -> int:\n        return self.n\n    def hasnext(self : R) -> bool:\n        return False\n{i for i in R()}";
    assert_eq!(check_ok(source).ty(), &Type::set(Type::Num));
}

#[test]
fn test_for_loops() {
    check_ok("i : int = 0\nfor i in [1, 2]:\n    pass\n");

    let error = check_err("for i in [1]:\n    pass\n");
    assert_eq!(error.get_error_name(), "UnboundId");

    let error = check_err("b : bool = False\nfor b in [1]:\n    pass\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: Type::Bool,
            received: Type::Num,
        }
    );
}

#[test]
fn test_break_and_continue() {
    check_ok("while True:\n    break\n");
    check_ok("i : int = 0\nfor i in [1]:\n    continue\n");

    let error = check_err("break\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::OutsideLoop { keyword: String::from("break") }
    );
}

#[test]
fn test_checker_keeps_environment() {
    let mut checker = TypeChecker::new(GlobalTypeEnv::builtins());

    checker.check(parse_program("x : int = 1\n").unwrap()).unwrap();
    let program = checker.check(parse_program("x + 1").unwrap()).unwrap();
    assert_eq!(program.ty(), &Type::Num);

    assert!(checker.check(parse_program("y : int = True\n").unwrap()).is_err());
    assert!(!checker.env.globals.contains_key("y"));

    // Counters survive between programs.
    let program = checker.check(parse_program("[x for x in [1]]").unwrap()).unwrap();
    let program2 = checker.check(parse_program("[x for x in [1]]").unwrap()).unwrap();
    let item = |program: &Program<Typed>| match &expr_of(program, 0).kind {
        ExprKind::Comprehension { item, .. } => item.clone(),
        _ => panic!("expected a comprehension"),
    };
    assert_eq!(item(&program), "compvar$x1");
    assert_eq!(item(&program2), "compvar$x2");
}

#[test]
fn test_type_check_leaves_input_environment() {
    let env = GlobalTypeEnv::builtins();
    let (_, augmented) = type_check(&env, parse_program("x : int = 1\n").unwrap()).unwrap();

    assert!(augmented.globals.contains_key("x"));
    assert!(!env.globals.contains_key("x"));
}

#[test]
fn test_comprehension_typed_by_iterable_element() {
    let program = check_ok("[x > 1 for x in [1, 2]]");
    assert_eq!(expr_of(&program, 0).ty(), &Type::list(Type::Num));

    let program = check_ok("(True for x in [1, 2])");
    assert_eq!(expr_of(&program, 0).ty(), &Type::generator(Type::Num));

    let ExprKind::Comprehension { lhs, .. } = &expr_of(&program, 0).kind else {
        panic!("expected a comprehension");
    };
    assert_eq!(lhs.ty(), &Type::Bool);
}

#[test]
fn test_nested_empty_list_assignable() {
    check_ok("l : [[int]] = None\nl = [[]]\n");

    let error = check_err("l : [[int]] = None\nl = [[True]]\n");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: Type::list(Type::list(Type::Num)),
            received: Type::list(Type::list(Type::Bool)),
        }
    );
}

#[test]
fn test_ternary_with_empty_list_branch() {
    let program = check_ok("l : [int] = None\n[] if True else l");
    assert_eq!(program.ty(), &Type::list(Type::None));
}

#[test]
fn test_equal_types_placeholder() {
    assert!(equal_types(&Type::list(Type::None), &Type::list(Type::Num)));
    assert!(equal_types(
        &Type::list(Type::list(Type::None)),
        &Type::list(Type::list(Type::Bool))
    ));
    assert!(!equal_types(&Type::list(Type::Num), &Type::list(Type::None)));
    assert!(!equal_types(&Type::list(Type::Num), &Type::Num));
}

#[test]
fn test_class_members_checked_before_init_signature() {
    let source = "class C(object):\n    x : int = True\n    def __init__(self : C, y : int):\n        pass\n";
    let error = check_err(source);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            expected: Type::Num,
            received: Type::Bool,
        }
    );
}
