use std::fmt;

/// Binding strength of an expression form, loosest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponent,
    Prefix,
    Postfix,
    New,
    Call,
    Member,
    Primary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            | UnaryOp::Plus => "+",
            | UnaryOp::Minus => "-",
            | UnaryOp::Not => "!",
            | UnaryOp::BitNot => "~",
            | UnaryOp::Typeof => "typeof",
            | UnaryOp::Void => "void",
            | UnaryOp::Delete => "delete",
        }
    }
    /// Keyword operators need a space before their operand.
    pub fn is_keyword(&self) -> bool {
        matches!(self, UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            | UpdateOp::Increment => "++",
            | UpdateOp::Decrement => "--",
        }
    }
}

/// Every infix operator, including the comma and the short-circuiting ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Sequence,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Instanceof,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            | BinaryOp::Sequence => ",",
            | BinaryOp::Or => "||",
            | BinaryOp::And => "&&",
            | BinaryOp::BitOr => "|",
            | BinaryOp::BitXor => "^",
            | BinaryOp::BitAnd => "&",
            | BinaryOp::Eq => "==",
            | BinaryOp::NotEq => "!=",
            | BinaryOp::StrictEq => "===",
            | BinaryOp::StrictNotEq => "!==",
            | BinaryOp::Lt => "<",
            | BinaryOp::Le => "<=",
            | BinaryOp::Gt => ">",
            | BinaryOp::Ge => ">=",
            | BinaryOp::In => "in",
            | BinaryOp::Instanceof => "instanceof",
            | BinaryOp::Shl => "<<",
            | BinaryOp::Shr => ">>",
            | BinaryOp::UShr => ">>>",
            | BinaryOp::Add => "+",
            | BinaryOp::Sub => "-",
            | BinaryOp::Mul => "*",
            | BinaryOp::Div => "/",
            | BinaryOp::Rem => "%",
            | BinaryOp::Exp => "**",
        }
    }
    pub fn precedence(&self) -> Precedence {
        use BinaryOp::*;
        match self {
            | Sequence => Precedence::Sequence,
            | Or => Precedence::LogicalOr,
            | And => Precedence::LogicalAnd,
            | BitOr => Precedence::BitwiseOr,
            | BitXor => Precedence::BitwiseXor,
            | BitAnd => Precedence::BitwiseAnd,
            | Eq | NotEq | StrictEq | StrictNotEq => Precedence::Equality,
            | Lt | Le | Gt | Ge | In | Instanceof => Precedence::Relational,
            | Shl | Shr | UShr => Precedence::Shift,
            | Add | Sub => Precedence::Additive,
            | Mul | Div | Rem => Precedence::Multiplicative,
            | Exp => Precedence::Exponent,
        }
    }
    pub fn is_right_associative(&self) -> bool {
        matches!(self, BinaryOp::Exp)
    }
    /// `==`, `!=`, `===` and `!==`.
    pub fn is_equality(&self) -> bool {
        self.precedence() == Precedence::Equality
    }
    /// The operator with the opposite outcome, for the four equality operators.
    pub fn negated(&self) -> Option<BinaryOp> {
        match self {
            | BinaryOp::Eq => Some(BinaryOp::NotEq),
            | BinaryOp::NotEq => Some(BinaryOp::Eq),
            | BinaryOp::StrictEq => Some(BinaryOp::StrictNotEq),
            | BinaryOp::StrictNotEq => Some(BinaryOp::StrictEq),
            | _ => None,
        }
    }
}

/// `op=` assignment operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompoundOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
}

impl CompoundOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            | CompoundOp::Add => "+=",
            | CompoundOp::Sub => "-=",
            | CompoundOp::Mul => "*=",
            | CompoundOp::Div => "/=",
            | CompoundOp::Rem => "%=",
            | CompoundOp::Exp => "**=",
            | CompoundOp::Shl => "<<=",
            | CompoundOp::Shr => ">>=",
            | CompoundOp::UShr => ">>>=",
            | CompoundOp::BitAnd => "&=",
            | CompoundOp::BitOr => "|=",
            | CompoundOp::BitXor => "^=",
        }
    }
    /// The infix operator applied before the store.
    pub fn binary(&self) -> BinaryOp {
        match self {
            | CompoundOp::Add => BinaryOp::Add,
            | CompoundOp::Sub => BinaryOp::Sub,
            | CompoundOp::Mul => BinaryOp::Mul,
            | CompoundOp::Div => BinaryOp::Div,
            | CompoundOp::Rem => BinaryOp::Rem,
            | CompoundOp::Exp => BinaryOp::Exp,
            | CompoundOp::Shl => BinaryOp::Shl,
            | CompoundOp::Shr => BinaryOp::Shr,
            | CompoundOp::UShr => BinaryOp::UShr,
            | CompoundOp::BitAnd => BinaryOp::BitAnd,
            | CompoundOp::BitOr => BinaryOp::BitOr,
            | CompoundOp::BitXor => BinaryOp::BitXor,
        }
    }
}

/// `var`, `let` or `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            | VarKind::Var => "var",
            | VarKind::Let => "let",
            | VarKind::Const => "const",
        }
    }
    pub fn is_lexical(&self) -> bool {
        !matches!(self, VarKind::Var)
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}
impl_display_as_str!(UnaryOp, UpdateOp, BinaryOp, CompoundOp, VarKind);
