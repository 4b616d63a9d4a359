use std::fmt::Display;

use crate::Span;

/// Node kinds of the concrete syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Script,
    Body,

    // Statements
    AssignStatement,
    ExpressionStatement,
    ReturnStatement,
    PassStatement,
    ContinueStatement,
    BreakStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    FunctionDefinition,
    ClassDefinition,

    TypeDef,
    ParamList,
    ArgList,

    // Expressions
    CallExpression,
    MemberExpression,
    BinaryExpression,
    UnaryExpression,
    ParenthesizedExpression,
    ArrayExpression,
    ConditionalExpression,
    ComprehensionExpression,
    ArrayComprehensionExpression,
    SetComprehensionExpression,

    // Leaves
    VariableName,
    PropertyName,
    Number,
    Boolean,
    None,
    String,
    Keyword,
    Punctuation,
    Operator,
    AssignOp,
}

impl SyntaxKind {
    pub fn is_comprehension(&self) -> bool {
        matches!(
            self,
            SyntaxKind::ComprehensionExpression
                | SyntaxKind::ArrayComprehensionExpression
                | SyntaxKind::SetComprehensionExpression
        )
    }
}

impl Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(kind: SyntaxKind, span: Span) -> Self {
        SyntaxNode {
            kind,
            span,
            children: vec![],
        }
    }

    /// A node spanning from its first to its last child.
    pub fn branch(kind: SyntaxKind, children: Vec<SyntaxNode>) -> Self {
        let from = children.first().map(|child| child.span.from).unwrap_or(0);
        let to = children.last().map(|child| child.span.to).unwrap_or(from);

        SyntaxNode {
            kind,
            span: Span::new(from, to),
            children,
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }
}

/// Prints the tree shape as `Kind(Child, Child(..))`, leaves by kind only.
impl Display for SyntaxNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.children.is_empty() {
            let children = self
                .children
                .iter()
                .map(|child| child.to_string())
                .collect::<Vec<String>>();
            write!(f, "({})", children.join(","))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode) -> Self {
        SyntaxTree { root }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn cursor(&self) -> TreeCursor<'_> {
        TreeCursor::new(&self.root)
    }
}

impl Display for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Stateful navigation over a concrete syntax tree.
///
/// The movement methods return `false` and leave the cursor in place when
/// there is nowhere to go.
pub trait Cursor {
    fn kind(&self) -> SyntaxKind;
    fn from(&self) -> usize;
    fn to(&self) -> usize;
    fn first_child(&mut self) -> bool;
    fn next_sibling(&mut self) -> bool;
    fn parent(&mut self) -> bool;

    fn span(&self) -> Span {
        Span::new(self.from(), self.to())
    }
}

pub struct TreeCursor<'a> {
    node: &'a SyntaxNode,
    /// Ancestors of `node`, each with the index of the child we descended into.
    path: Vec<(&'a SyntaxNode, usize)>,
}

impl<'a> TreeCursor<'a> {
    pub fn new(root: &'a SyntaxNode) -> Self {
        TreeCursor {
            node: root,
            path: vec![],
        }
    }

    pub fn node(&self) -> &'a SyntaxNode {
        self.node
    }
}

impl<'a> Cursor for TreeCursor<'a> {
    fn kind(&self) -> SyntaxKind {
        self.node.kind
    }

    fn from(&self) -> usize {
        self.node.span.from
    }

    fn to(&self) -> usize {
        self.node.span.to
    }

    fn first_child(&mut self) -> bool {
        match self.node.children.first() {
            Some(child) => {
                self.path.push((self.node, 0));
                self.node = child;
                true
            }
            None => false,
        }
    }

    fn next_sibling(&mut self) -> bool {
        let Some((parent, index)) = self.path.last_mut() else {
            return false;
        };
        let parent: &'a SyntaxNode = *parent;

        match parent.children.get(*index + 1) {
            Some(sibling) => {
                *index += 1;
                self.node = sibling;
                true
            }
            None => false,
        }
    }

    fn parent(&mut self) -> bool {
        match self.path.pop() {
            Some((parent, _)) => {
                self.node = parent;
                true
            }
            None => false,
        }
    }
}
