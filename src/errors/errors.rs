use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::Type, SourceLocation};

/// The two families every failure falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed concrete syntax relative to the AST grammar.
    Parse,
    /// A well-formed AST that violates a typing rule.
    TypeCheck,
}

#[derive(Error, Debug, Clone)]
#[error("{internal_error} at line {}, column {}", .location.line, .location.column)]
pub struct Error {
    internal_error: ErrorImpl,
    location: SourceLocation,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, location: SourceLocation) -> Self {
        Error {
            internal_error: error_impl,
            location,
        }
    }

    pub fn get_location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::InconsistentIndentation => "InconsistentIndentation",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::NotALiteral { .. } => "NotALiteral",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::UnsupportedCallee { .. } => "UnsupportedCallee",
            ErrorImpl::BuiltinArity { .. } => "BuiltinArity",
            ErrorImpl::UnsupportedExpression { .. } => "UnsupportedExpression",
            ErrorImpl::UnsupportedStatement { .. } => "UnsupportedStatement",
            ErrorImpl::UnsupportedAssignTarget { .. } => "UnsupportedAssignTarget",
            ErrorImpl::DeclarationAfterStatement { .. } => "DeclarationAfterStatement",
            ErrorImpl::MissingDelimiter { .. } => "MissingDelimiter",
            ErrorImpl::MalformedList { .. } => "MalformedList",
            ErrorImpl::EmptyIndex => "EmptyIndex",
            ErrorImpl::TooManySliceIndices { .. } => "TooManySliceIndices",
            ErrorImpl::ComprehensionMismatch { .. } => "ComprehensionMismatch",
            ErrorImpl::MissingTypeAnnotation { .. } => "MissingTypeAnnotation",
            ErrorImpl::InvalidTypeAnnotation { .. } => "InvalidTypeAnnotation",
            ErrorImpl::InvalidVarInit { .. } => "InvalidVarInit",
            ErrorImpl::InvalidGenericParameter { .. } => "InvalidGenericParameter",
            ErrorImpl::UnsupportedBaseClass { .. } => "UnsupportedBaseClass",
            ErrorImpl::InvalidClassBody { .. } => "InvalidClassBody",
            ErrorImpl::InvalidProgram => "InvalidProgram",
            ErrorImpl::UnboundId { .. } => "UnboundId",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::OperatorTypeMismatch { .. } => "OperatorTypeMismatch",
            ErrorImpl::UnaryOperatorTypeMismatch { .. } => "UnaryOperatorTypeMismatch",
            ErrorImpl::ClassEquality { .. } => "ClassEquality",
            ErrorImpl::IsOperandsNotObjects { .. } => "IsOperandsNotObjects",
            ErrorImpl::ConditionNotBool { .. } => "ConditionNotBool",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::InitReturnNotNone { .. } => "InitReturnNotNone",
            ErrorImpl::InitSignatureOverridden { .. } => "InitSignatureOverridden",
            ErrorImpl::NotAnObject { .. } => "NotAnObject",
            ErrorImpl::UnknownClass { .. } => "UnknownClass",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::UnknownMethod { .. } => "UnknownMethod",
            ErrorImpl::PrintObject => "PrintObject",
            ErrorImpl::IndexNotInteger { .. } => "IndexNotInteger",
            ErrorImpl::CannotIndex { .. } => "CannotIndex",
            ErrorImpl::ItemAssignmentUnsupported { .. } => "ItemAssignmentUnsupported",
            ErrorImpl::IncompatibleListElements { .. } => "IncompatibleListElements",
            ErrorImpl::NotIterable { .. } => "NotIterable",
            ErrorImpl::OutsideLoop { .. } => "OutsideLoop",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::InconsistentIndentation => ErrorTip::Suggestion(String::from(
                "Dedent does not match any outer indentation level",
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::MissingDelimiter { expected } => {
                ErrorTip::Suggestion(format!("Expected `{}` here", expected))
            }
            ErrorImpl::DeclarationAfterStatement { name } => ErrorTip::Suggestion(format!(
                "Move the declaration of `{}` above the first statement",
                name
            )),
            ErrorImpl::MissingTypeAnnotation { name } => ErrorTip::Suggestion(format!(
                "Add a type annotation, e.g. `{}: int`",
                name
            )),
            ErrorImpl::InvalidVarInit { name } => ErrorTip::Suggestion(format!(
                "Declare `{}` with a type and a literal value, e.g. `{}: int = 0`",
                name, name
            )),
            ErrorImpl::UnsupportedBaseClass { .. } => ErrorTip::Suggestion(String::from(
                "Only `object` and `Generic[...]` are allowed as bases",
            )),
            ErrorImpl::UnboundId { name } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", name))
            }
            ErrorImpl::UnexpectedArguments { expected, received, .. } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ClassEquality { .. } => {
                ErrorTip::Suggestion(String::from("Use `is` to compare objects"))
            }
            ErrorImpl::InitSignatureOverridden { class } => ErrorTip::Suggestion(format!(
                "`__init__` must be declared as `def __init__(self: {}):`",
                class
            )),
            ErrorImpl::PrintObject => {
                ErrorTip::Suggestion(String::from("Print one of the object's fields instead"))
            }
            ErrorImpl::NotIterable { .. } => ErrorTip::Suggestion(String::from(
                "Classes are iterable when they declare `next` and `hasnext`",
            )),
            _ => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing and concrete syntax
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("inconsistent indentation")]
    InconsistentIndentation,
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },

    // AST building
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("not a literal: {text:?}")]
    NotALiteral { text: String },
    #[error("could not parse operator: {op:?}")]
    UnknownOperator { op: String },
    #[error("unsupported call target: {text:?}")]
    UnsupportedCallee { text: String },
    #[error("builtin {name:?} takes {expected} argument(s), received {received}")]
    BuiltinArity { name: String, expected: usize, received: usize },
    #[error("could not parse expression: {text:?}")]
    UnsupportedExpression { text: String },
    #[error("could not parse statement: {text:?}")]
    UnsupportedStatement { text: String },
    #[error("unknown target while parsing assignment: {text:?}")]
    UnsupportedAssignTarget { text: String },
    #[error("declaration of {name:?} after the first statement")]
    DeclarationAfterStatement { name: String },
    #[error("missing {expected:?}")]
    MissingDelimiter { expected: String },
    #[error("malformed list near {text:?}")]
    MalformedList { text: String },
    #[error("there should be at least one value inside the brackets")]
    EmptyIndex,
    #[error("too many indices ({count}), maximum is three")]
    TooManySliceIndices { count: usize },
    #[error("comprehension start and end mismatch: {open:?} and {close:?}")]
    ComprehensionMismatch { open: String, close: String },
    #[error("missed type annotation for parameter {name:?}")]
    MissingTypeAnnotation { name: String },
    #[error("invalid type annotation: {text:?}")]
    InvalidTypeAnnotation { text: String },
    #[error("invalid variable init: {name:?}")]
    InvalidVarInit { name: String },
    #[error("expected TypeVar in Generic[] args, found {text:?}")]
    InvalidGenericParameter { text: String },
    #[error("unsupported base class {text:?}")]
    UnsupportedBaseClass { text: String },
    #[error("could not parse the body of class {class:?}")]
    InvalidClassBody { class: String },
    #[error("could not parse program")]
    InvalidProgram,

    // Type checking
    #[error("unbound id: {name:?}")]
    UnboundId { name: String },
    #[error("undefined function: {name:?}")]
    UndefinedFunction { name: String },
    #[error("types do not match: expected `{expected}`, received `{received}`")]
    TypeMatchError { expected: Type, received: Type },
    #[error("type mismatch for operator `{op}`: `{left}` and `{right}`")]
    OperatorTypeMismatch { op: String, left: Type, right: Type },
    #[error("type mismatch for operator `{op}`: `{operand}`")]
    UnaryOperatorTypeMismatch { op: String, operand: Type },
    #[error("cannot apply operator `{op}` on class types")]
    ClassEquality { op: String },
    #[error("`is` operands must be objects, received `{left}` and `{right}`")]
    IsOperandsNotObjects { left: Type, right: Type },
    #[error("condition expression must be a bool, received `{received}`")]
    ConditionNotBool { received: Type },
    #[error("cannot return outside of functions")]
    ReturnOutsideFunction,
    #[error("expected return type `{expected}`; got type `{received}`")]
    ReturnTypeMismatch { expected: Type, received: Type },
    #[error("unexpected arguments for {name:?}: expected {expected}, received {received}")]
    UnexpectedArguments { name: String, expected: usize, received: usize },
    #[error("argument types do not match: expected `{expected}`, received `{received}`")]
    ArgumentTypeMatchError { expected: Type, received: Type },
    #[error("__init__ of {class:?} must have a None return type")]
    InitReturnNotNone { class: String },
    #[error("cannot override __init__ type signature of {class:?}")]
    InitSignatureOverridden { class: String },
    #[error("{operation} requires an object, received `{received}`")]
    NotAnObject { operation: String, received: Type },
    #[error("unknown class {name:?}")]
    UnknownClass { name: String },
    #[error("could not find field {field:?} in class {class:?}")]
    UnknownField { class: String, field: String },
    #[error("could not find method {method:?} in class {class:?}")]
    UnknownMethod { class: String, method: String },
    #[error("print can't be called on objects")]
    PrintObject,
    #[error("index is of non-integer type `{received}`")]
    IndexNotInteger { received: Type },
    #[error("cannot index into type `{received}`")]
    CannotIndex { received: Type },
    #[error("type `{received}` does not support item assignment")]
    ItemAssignmentUnsupported { received: Type },
    #[error("list has incompatible types: `{element}` and `{first}`")]
    IncompatibleListElements { first: Type, element: Type },
    #[error("type `{received}` is not iterable")]
    NotIterable { received: Type },
    #[error("{keyword:?} outside of a loop")]
    OutsideLoop { keyword: String },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::InconsistentIndentation
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::NotALiteral { .. }
            | ErrorImpl::UnknownOperator { .. }
            | ErrorImpl::UnsupportedCallee { .. }
            | ErrorImpl::BuiltinArity { .. }
            | ErrorImpl::UnsupportedExpression { .. }
            | ErrorImpl::UnsupportedStatement { .. }
            | ErrorImpl::UnsupportedAssignTarget { .. }
            | ErrorImpl::DeclarationAfterStatement { .. }
            | ErrorImpl::MissingDelimiter { .. }
            | ErrorImpl::MalformedList { .. }
            | ErrorImpl::EmptyIndex
            | ErrorImpl::TooManySliceIndices { .. }
            | ErrorImpl::ComprehensionMismatch { .. }
            | ErrorImpl::MissingTypeAnnotation { .. }
            | ErrorImpl::InvalidTypeAnnotation { .. }
            | ErrorImpl::InvalidVarInit { .. }
            | ErrorImpl::InvalidGenericParameter { .. }
            | ErrorImpl::UnsupportedBaseClass { .. }
            | ErrorImpl::InvalidClassBody { .. }
            | ErrorImpl::InvalidProgram => ErrorKind::Parse,
            ErrorImpl::UnboundId { .. }
            | ErrorImpl::UndefinedFunction { .. }
            | ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::OperatorTypeMismatch { .. }
            | ErrorImpl::UnaryOperatorTypeMismatch { .. }
            | ErrorImpl::ClassEquality { .. }
            | ErrorImpl::IsOperandsNotObjects { .. }
            | ErrorImpl::ConditionNotBool { .. }
            | ErrorImpl::ReturnOutsideFunction
            | ErrorImpl::ReturnTypeMismatch { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::InitReturnNotNone { .. }
            | ErrorImpl::InitSignatureOverridden { .. }
            | ErrorImpl::NotAnObject { .. }
            | ErrorImpl::UnknownClass { .. }
            | ErrorImpl::UnknownField { .. }
            | ErrorImpl::UnknownMethod { .. }
            | ErrorImpl::PrintObject
            | ErrorImpl::IndexNotInteger { .. }
            | ErrorImpl::CannotIndex { .. }
            | ErrorImpl::ItemAssignmentUnsupported { .. }
            | ErrorImpl::IncompatibleListElements { .. }
            | ErrorImpl::NotIterable { .. }
            | ErrorImpl::OutsideLoop { .. } => ErrorKind::TypeCheck,
        }
    }
}
