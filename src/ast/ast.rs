use std::fmt::Display;

use super::types::Type;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Mul,
    IDiv,
    Mod,
    Eq,
    Neq,
    Lte,
    Gte,
    Lt,
    Gt,
    Is,
    And,
    Or,
}

impl BinOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(BinOp::Plus),
            "-" => Some(BinOp::Minus),
            "*" => Some(BinOp::Mul),
            "//" => Some(BinOp::IDiv),
            "%" => Some(BinOp::Mod),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::Neq),
            "<=" => Some(BinOp::Lte),
            ">=" => Some(BinOp::Gte),
            "<" => Some(BinOp::Lt),
            ">" => Some(BinOp::Gt),
            "is" => Some(BinOp::Is),
            "and" => Some(BinOp::And),
            "or" => Some(BinOp::Or),
            _ => None,
        }
    }

    pub fn lexeme(&self) -> &'static str {
        match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Mul => "*",
            BinOp::IDiv => "//",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lte => "<=",
            BinOp::Gte => ">=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Is => "is",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniOp {
    Neg,
    Not,
}

impl UniOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "-" => Some(UniOp::Neg),
            "not" => Some(UniOp::Not),
            _ => None,
        }
    }
}

impl Display for UniOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniOp::Neg => write!(f, "-"),
            UniOp::Not => write!(f, "not"),
        }
    }
}

/// The container a comprehension builds, chosen by its opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComprehensionKind {
    /// `( ... )`
    Generator,
    /// `[ ... ]`
    List,
    /// `{ ... }`
    Set,
}

impl ComprehensionKind {
    pub fn from_delimiters(open: &str, close: &str) -> Option<Self> {
        match (open, close) {
            ("(", ")") => Some(ComprehensionKind::Generator),
            ("[", "]") => Some(ComprehensionKind::List),
            ("{", "}") => Some(ComprehensionKind::Set),
            _ => None,
        }
    }

    pub fn container_of(&self, element: Type) -> Type {
        match self {
            ComprehensionKind::Generator => Type::generator(element),
            ComprehensionKind::List => Type::list(element),
            ComprehensionKind::Set => Type::set(element),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Num(i64),
    Bool(bool),
    None,
    /// `TypeVar('T')`
    TypeVar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal<A> {
    pub a: A,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr<A> {
    pub a: A,
    pub kind: ExprKind<A>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind<A> {
    Literal(Literal<A>),
    Id {
        name: String,
    },
    BinOp {
        op: BinOp,
        left: Box<Expr<A>>,
        right: Box<Expr<A>>,
    },
    UniOp {
        op: UniOp,
        expr: Box<Expr<A>>,
    },
    Call {
        name: String,
        generic_args: Vec<Type>,
        arguments: Vec<Expr<A>>,
    },
    /// A call of a class name, resolved by the type checker.
    Construct {
        name: String,
        arguments: Vec<Expr<A>>,
    },
    Builtin1 {
        name: String,
        arg: Box<Expr<A>>,
    },
    Builtin2 {
        name: String,
        left: Box<Expr<A>>,
        right: Box<Expr<A>>,
    },
    MethodCall {
        obj: Box<Expr<A>>,
        method: String,
        arguments: Vec<Expr<A>>,
    },
    Lookup {
        obj: Box<Expr<A>>,
        field: String,
    },
    Index {
        obj: Box<Expr<A>>,
        index: Box<Expr<A>>,
    },
    ListLiteral {
        elements: Vec<Expr<A>>,
    },
    Ternary {
        expr_if_true: Box<Expr<A>>,
        cond: Box<Expr<A>>,
        expr_if_false: Box<Expr<A>>,
    },
    Comprehension {
        kind: ComprehensionKind,
        lhs: Box<Expr<A>>,
        item: String,
        iterable: Box<Expr<A>>,
        cond: Option<Box<Expr<A>>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt<A> {
    pub a: A,
    pub kind: StmtKind<A>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind<A> {
    Assign {
        name: String,
        value: Expr<A>,
    },
    FieldAssign {
        obj: Expr<A>,
        field: String,
        value: Expr<A>,
    },
    IndexAssign {
        obj: Expr<A>,
        index: Expr<A>,
        value: Expr<A>,
    },
    Expr(Expr<A>),
    Return(Expr<A>),
    If {
        cond: Expr<A>,
        thn: Vec<Stmt<A>>,
        els: Vec<Stmt<A>>,
    },
    While {
        cond: Expr<A>,
        body: Vec<Stmt<A>>,
    },
    For {
        var: String,
        iterable: Expr<A>,
        body: Vec<Stmt<A>>,
        els: Vec<Stmt<A>>,
    },
    Pass,
    Continue,
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

/// `name: ty = value` where `value` is always a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInit<A> {
    pub a: A,
    pub name: String,
    pub ty: Type,
    pub value: Literal<A>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunDef<A> {
    pub a: A,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ret: Type,
    pub inits: Vec<VarInit<A>>,
    pub body: Vec<Stmt<A>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class<A> {
    pub a: A,
    pub name: String,
    /// Type variable names from `Generic[...]`.
    pub generics: Vec<String>,
    pub fields: Vec<VarInit<A>>,
    pub methods: Vec<FunDef<A>>,
}

impl<A> Class<A> {
    pub fn method(&self, name: &str) -> Option<&FunDef<A>> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// A module: declarations first, then top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program<A> {
    pub a: A,
    pub inits: Vec<VarInit<A>>,
    pub funs: Vec<FunDef<A>>,
    pub classes: Vec<Class<A>>,
    pub stmts: Vec<Stmt<A>>,
}
