//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::ast::types::Type;
use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::SourceLocation;

fn location(line: usize, column: usize) -> SourceLocation {
    SourceLocation {
        line,
        column,
        src_code: String::from("x = 1"),
    }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        location(1, 1),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Parse);
}

#[test]
fn test_error_location() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        location(4, 7),
    );

    assert_eq!(error.get_location().line, 4);
    assert_eq!(error.get_location().column, 7);
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            expected: Type::Num,
            received: Type::Bool,
        },
        location(1, 1),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.kind(), ErrorKind::TypeCheck);
    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `int`, received `bool`"
    );
}

#[test]
fn test_list_and_item_assignment_errors_are_type_errors() {
    let list = ErrorImpl::IncompatibleListElements {
        first: Type::Num,
        element: Type::Bool,
    };
    let item = ErrorImpl::ItemAssignmentUnsupported {
        received: Type::class("C"),
    };

    assert_eq!(list.kind(), ErrorKind::TypeCheck);
    assert_eq!(item.kind(), ErrorKind::TypeCheck);
}

#[test]
fn test_builder_errors_are_parse_errors() {
    for error in [
        ErrorImpl::UnknownOperator { op: "**".to_string() },
        ErrorImpl::ComprehensionMismatch {
            open: "[".to_string(),
            close: ")".to_string(),
        },
        ErrorImpl::EmptyIndex,
        ErrorImpl::InvalidProgram,
    ] {
        assert_eq!(error.kind(), ErrorKind::Parse);
    }
}

#[test]
fn test_unbound_id_error() {
    let error = Error::new(
        ErrorImpl::UnboundId {
            name: "foo".to_string(),
        },
        location(1, 1),
    );

    assert_eq!(error.get_error_name(), "UnboundId");
    assert_eq!(error.get_tip().to_string(), "Variable `foo` not declared");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        location(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        location(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_location() {
    let error = Error::new(ErrorImpl::ReturnOutsideFunction, location(3, 5));

    assert_eq!(
        error.to_string(),
        "cannot return outside of functions at line 3, column 5"
    );
}

#[test]
fn test_unexpected_arguments_error() {
    let error = Error::new(
        ErrorImpl::UnexpectedArguments {
            name: "f".to_string(),
            expected: 2,
            received: 3,
        },
        location(1, 1),
    );

    assert_eq!(error.get_error_name(), "UnexpectedArguments");
    assert_eq!(error.get_tip().to_string(), "Expected 2 arguments, received 3");
}

#[test]
fn test_checker_errors_are_type_errors() {
    for error in [
        ErrorImpl::PrintObject,
        ErrorImpl::ReturnOutsideFunction,
        ErrorImpl::OutsideLoop { keyword: "break".to_string() },
        ErrorImpl::UnknownClass { name: "C".to_string() },
        ErrorImpl::NotIterable { received: Type::Num },
    ] {
        assert_eq!(error.kind(), ErrorKind::TypeCheck);
    }
}
