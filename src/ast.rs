/// A parsed TyC program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Struct(decl) => Some(decl),
            Item::Function(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(decl) => Some(decl),
            Item::Struct(_) => None,
        })
    }
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Struct(StructDecl),
    Function(FuncDecl),
}

/// `struct Name { members };`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub ty: Type,
    pub name: String,
}

/// Function declaration. `return_type` is `None` when omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub return_type: Option<Type>,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: Type,
    pub name: String,
}

/// Explicit type. `auto` is not a type; see [`VarDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    String,
    Void,
    /// Struct type referenced by name.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub items: Vec<BlockItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockItem {
    Decl(VarDecl),
    Stmt(Stmt),
}

impl From<ForInit> for BlockItem {
    fn from(init: ForInit) -> Self {
        match init {
            ForInit::Decl(decl) => Self::Decl(decl),
            ForInit::Expr(expr) => Self::Stmt(Stmt::Expr(expr)),
        }
    }
}

/// Local variable. `ty` is `None` for `auto`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub ty: Option<Type>,
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<ForInit>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    Switch {
        scrutinee: Expr,
        cases: Vec<SwitchCase>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    Expr(Expr),
    /// Lone `;`.
    Empty,
}

/// First segment of a `for` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForInit {
    Decl(VarDecl),
    Expr(Expr),
}

/// One label and the items following it. Stacked labels have
/// empty bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCase {
    pub label: CaseLabel,
    pub body: Vec<BlockItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseLabel {
    Case(Expr),
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    PreInc,
    PreDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Expression. Literal payloads are the raw lexemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Int(String),
    Float(String),
    Str(String),
    /// Parenthesized expression.
    Group(Box<Expr>),
    /// `{a, b, ...}`
    StructLiteral(Vec<Expr>),
    Member {
        object: Box<Expr>,
        field: String,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl Expr {
    pub(crate) fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// An identifier optionally followed by member accesses and calls.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        match self {
            Self::Ident(_) => true,
            Self::Member { object, .. } => object.is_assignable(),
            Self::Call { callee, .. } => callee.is_assignable(),
            _ => false,
        }
    }
}
