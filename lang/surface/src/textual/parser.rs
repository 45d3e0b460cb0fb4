//! Recursive-descent parser from tokens to [`Tree`]s.

use super::{
    err::{ParseError, ParseErrorKind, Result},
    escape::{parse_number, unescape_string},
    lexer::{Lexeme, Lexer, Slashed, Tok},
};
use unminify_syntax::*;
use unminify_utils::span::{FileInfo, Span};

/// Parses a whole script.
pub fn parse(source: &str, info: &FileInfo) -> Result<Tree> {
    let run = || {
        let tokens = Lexer::new(source).tokenize()?;
        Parser::new(source, tokens).script()
    };
    run().map_err(|err| err.located(info))
}

/// Parses a script that did not come from a file.
pub fn parse_str(source: &str) -> Result<Tree> {
    parse(source, &FileInfo::new(source, None))
}

pub struct Parser<'input> {
    source: &'input str,
    tokens: Vec<Lexeme<'input>>,
    pos: usize,
    /// Inside a `for` head, where `in` ends the expression.
    no_in: bool,
}

impl<'input> Parser<'input> {
    pub fn new(source: &'input str, tokens: Vec<Lexeme<'input>>) -> Self {
        Parser { source, tokens, pos: 0, no_in: false }
    }

    /* --------------------------------- Tokens --------------------------------- */

    fn peek(&self) -> Option<Tok<'input>> {
        self.peek_at(0)
    }
    fn peek_at(&self, n: usize) -> Option<Tok<'input>> {
        self.tokens.get(self.pos + n).map(|l| l.tok.clone())
    }
    fn at(&self, tok: &Tok<'input>) -> bool {
        self.tokens.get(self.pos).is_some_and(|l| &l.tok == tok)
    }
    fn at_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Some(Tok::Ident(s)) if s == name)
    }
    fn newline_before(&self) -> bool {
        self.tokens.get(self.pos).is_some_and(|l| l.newline_before)
    }
    fn span(&self) -> Span {
        match self.tokens.get(self.pos) {
            | Some(l) => l.span,
            | None => Span::new(self.source.len(), self.source.len()),
        }
    }
    fn bump(&mut self) {
        self.pos += 1;
    }
    fn eat(&mut self, tok: &Tok<'input>) -> bool {
        if self.at(tok) {
            self.bump();
            true
        } else {
            false
        }
    }
    fn expect(&mut self, tok: &Tok<'input>) -> Result<()> {
        if self.eat(tok) { Ok(()) } else { Err(self.unexpected(&[&tok.to_string()])) }
    }
    fn unexpected(&self, expected: &[&str]) -> ParseError {
        let expected = expected.iter().map(|s| format!("`{s}`")).collect();
        match self.tokens.get(self.pos) {
            | Some(l) => ParseError::new(
                ParseErrorKind::UnexpectedToken { found: l.tok.to_string(), expected },
                l.span,
            ),
            | None => ParseError::new(ParseErrorKind::UnexpectedEof { expected }, self.span()),
        }
    }
    fn unsupported(&self, what: &str) -> ParseError {
        ParseError::new(ParseErrorKind::Unsupported(what.to_string()), self.span())
    }
    /// Automatic semicolon insertion: a `;`, or a `}`, the end of input or a line break ahead.
    fn semicolon(&mut self) -> Result<()> {
        if self.eat(&Tok::Semicolon) {
            return Ok(());
        }
        if self.peek().is_none() || self.at(&Tok::BraceClose) || self.newline_before() {
            return Ok(());
        }
        Err(self.unexpected(&[";"]))
    }
    /// Whether a restricted production (`return`, `break`, ...) ends right here.
    fn ends_statement(&self) -> bool {
        self.peek().is_none()
            || self.at(&Tok::Semicolon)
            || self.at(&Tok::BraceClose)
            || self.newline_before()
    }
    fn with_in<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let res = f(self);
        self.no_in = saved;
        res
    }

    /* -------------------------------- Programs -------------------------------- */

    pub fn script(&mut self) -> Result<Tree> {
        let directives = self.directives();
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.statement()?);
        }
        Ok(mk(Script { directives, statements }))
    }

    fn directives(&mut self) -> Vec<String> {
        let mut directives = Vec::new();
        while let Some(Tok::Str(raw)) = self.peek() {
            let next = self.tokens.get(self.pos + 1);
            let alone = match next {
                | None => true,
                | Some(l) => {
                    matches!(l.tok, Tok::Semicolon | Tok::BraceClose)
                        || (l.newline_before && !continues_expression(&l.tok))
                }
            };
            if !alone {
                break;
            }
            directives.push(raw.to_string());
            self.bump();
            self.eat(&Tok::Semicolon);
        }
        directives
    }

    fn function_body(&mut self) -> Result<Tree> {
        self.expect(&Tok::BraceOpen)?;
        self.with_in(|p| {
            let directives = p.directives();
            let mut statements = Vec::new();
            while !p.at(&Tok::BraceClose) {
                if p.peek().is_none() {
                    return Err(p.unexpected(&["}"]));
                }
                statements.push(p.statement()?);
            }
            p.bump();
            Ok(mk(FunctionBody { directives, statements }))
        })
    }

    /* ------------------------------- Statements ------------------------------- */

    fn statement(&mut self) -> Result<Tree> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected(&["statement"]));
        };
        match tok {
            | Tok::BraceOpen => {
                let statements = self.block_statements()?;
                Ok(block(statements))
            }
            | Tok::Var | Tok::Let | Tok::Const => {
                let decl = self.variable_declaration()?;
                self.semicolon()?;
                Ok(decl)
            }
            | Tok::Semicolon => {
                self.bump();
                Ok(empty_statement())
            }
            | Tok::If => {
                self.bump();
                let test = self.paren_expression()?;
                let consequent = self.statement()?;
                let alternate = if self.eat(&Tok::Else) { Some(self.statement()?) } else { None };
                Ok(if_statement(test, consequent, alternate))
            }
            | Tok::For => self.for_statement(),
            | Tok::While => {
                self.bump();
                let test = self.paren_expression()?;
                let body = self.statement()?;
                Ok(mk(WhileStatement { test, body }))
            }
            | Tok::Do => {
                self.bump();
                let body = self.statement()?;
                self.expect(&Tok::While)?;
                let test = self.paren_expression()?;
                self.eat(&Tok::Semicolon);
                Ok(mk(DoWhileStatement { body, test }))
            }
            | Tok::Continue | Tok::Break => {
                self.bump();
                let label = match self.peek() {
                    | Some(Tok::Ident(label)) if !self.newline_before() => {
                        self.bump();
                        Some(label.to_string())
                    }
                    | _ => None,
                };
                self.semicolon()?;
                Ok(if tok == Tok::Break {
                    mk(BreakStatement { label })
                } else {
                    mk(ContinueStatement { label })
                })
            }
            | Tok::Return => {
                self.bump();
                let expression = if self.ends_statement() { None } else { Some(self.expression()?) };
                self.semicolon()?;
                Ok(return_statement(expression))
            }
            | Tok::Throw => {
                self.bump();
                let expression = self.expression()?;
                self.semicolon()?;
                Ok(mk(ThrowStatement { expression }))
            }
            | Tok::Try => self.try_statement(),
            | Tok::Switch => self.switch_statement(),
            | Tok::Function => {
                self.bump();
                if self.at(&Tok::Star) {
                    return Err(self.unsupported("generator functions"));
                }
                let name = match self.peek() {
                    | Some(Tok::Ident(name)) => {
                        self.bump();
                        binding_identifier(name)
                    }
                    | _ => return Err(self.unexpected(&["identifier"])),
                };
                let params = self.formal_parameters()?;
                let body = self.function_body()?;
                Ok(mk(FunctionDeclaration { name, params, body }))
            }
            | Tok::Debugger => {
                self.bump();
                self.semicolon()?;
                Ok(mk(DebuggerStatement {}))
            }
            | Tok::With => Err(self.unsupported("`with` statements")),
            | Tok::Ident(label) if self.peek_at(1) == Some(Tok::Colon) => {
                self.bump();
                self.bump();
                let body = self.statement()?;
                Ok(mk(LabeledStatement { label: label.to_string(), body }))
            }
            | Tok::Ident("class") => Err(self.unsupported("classes")),
            | Tok::Ident("async") if self.peek_at(1) == Some(Tok::Function) => {
                Err(self.unsupported("async functions"))
            }
            | _ => {
                let expression = self.expression()?;
                self.semicolon()?;
                Ok(expression_statement(expression))
            }
        }
    }

    fn block_statements(&mut self) -> Result<Vec<Tree>> {
        self.expect(&Tok::BraceOpen)?;
        let mut statements = Vec::new();
        while !self.at(&Tok::BraceClose) {
            if self.peek().is_none() {
                return Err(self.unexpected(&["}"]));
            }
            statements.push(self.statement()?);
        }
        self.bump();
        Ok(statements)
    }

    fn paren_expression(&mut self) -> Result<Tree> {
        self.expect(&Tok::ParenOpen)?;
        let expr = self.with_in(|p| p.expression())?;
        self.expect(&Tok::ParenClose)?;
        Ok(expr)
    }

    fn variable_declaration(&mut self) -> Result<Tree> {
        let kind = match self.peek() {
            | Some(Tok::Var) => VarKind::Var,
            | Some(Tok::Let) => VarKind::Let,
            | Some(Tok::Const) => VarKind::Const,
            | _ => return Err(self.unexpected(&["var", "let", "const"])),
        };
        self.bump();
        let mut declarators = Vec::new();
        loop {
            let binding = self.binding_target()?;
            let init = if self.eat(&Tok::Assign) { Some(self.assignment()?) } else { None };
            declarators.push(declarator(binding, init));
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        Ok(var_declaration(kind, declarators))
    }

    fn for_statement(&mut self) -> Result<Tree> {
        self.expect(&Tok::For)?;
        self.expect(&Tok::ParenOpen)?;
        let saved = std::mem::replace(&mut self.no_in, true);
        let head = match self.peek() {
            | Some(Tok::Semicolon) => Ok(None),
            | Some(Tok::Var | Tok::Let | Tok::Const) => self.variable_declaration().map(Some),
            | _ => self.expression().map(Some),
        };
        self.no_in = saved;
        let head = head?;
        if let Some(left) = head.clone() {
            let is_decl = matches!(&*left, Node::VariableDeclaration(_));
            if self.eat(&Tok::In) {
                let left = if is_decl { left } else { self.assignment_target(left)? };
                let right = self.with_in(|p| p.expression())?;
                self.expect(&Tok::ParenClose)?;
                let body = self.statement()?;
                return Ok(mk(ForInStatement { left, right, body }));
            }
            if self.at_ident("of") {
                self.bump();
                let left = if is_decl { left } else { self.assignment_target(left)? };
                let right = self.with_in(|p| p.assignment())?;
                self.expect(&Tok::ParenClose)?;
                let body = self.statement()?;
                return Ok(mk(ForOfStatement { left, right, body }));
            }
        }
        self.expect(&Tok::Semicolon)?;
        let test = if self.at(&Tok::Semicolon) {
            None
        } else {
            Some(self.with_in(|p| p.expression())?)
        };
        self.expect(&Tok::Semicolon)?;
        let update = if self.at(&Tok::ParenClose) {
            None
        } else {
            Some(self.with_in(|p| p.expression())?)
        };
        self.expect(&Tok::ParenClose)?;
        let body = self.statement()?;
        Ok(mk(ForStatement { init: head, test, update, body }))
    }

    fn try_statement(&mut self) -> Result<Tree> {
        self.expect(&Tok::Try)?;
        let block_ = block(self.block_statements()?);
        let handler = if self.eat(&Tok::Catch) {
            let binding = if self.eat(&Tok::ParenOpen) {
                let binding = self.binding_target()?;
                self.expect(&Tok::ParenClose)?;
                Some(binding)
            } else {
                None
            };
            let body = block(self.block_statements()?);
            Some(mk(CatchClause { binding, body }))
        } else {
            None
        };
        let finalizer =
            if self.eat(&Tok::Finally) { Some(block(self.block_statements()?)) } else { None };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected(&["catch", "finally"]));
        }
        Ok(mk(TryStatement { block: block_, handler, finalizer }))
    }

    fn switch_statement(&mut self) -> Result<Tree> {
        self.expect(&Tok::Switch)?;
        let discriminant = self.paren_expression()?;
        self.expect(&Tok::BraceOpen)?;
        let mut cases = Vec::new();
        while !self.eat(&Tok::BraceClose) {
            let test = match self.peek() {
                | Some(Tok::Case) => {
                    self.bump();
                    Some(self.with_in(|p| p.expression())?)
                }
                | Some(Tok::Default) => {
                    self.bump();
                    None
                }
                | _ => return Err(self.unexpected(&["case", "default", "}"])),
            };
            self.expect(&Tok::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(self.peek(), Some(Tok::Case | Tok::Default | Tok::BraceClose) | None) {
                consequent.push(self.statement()?);
            }
            cases.push(mk(SwitchCase { test, consequent }));
        }
        Ok(mk(SwitchStatement { discriminant, cases }))
    }

    /* -------------------------------- Bindings -------------------------------- */

    fn binding_target(&mut self) -> Result<Tree> {
        match self.peek() {
            | Some(Tok::Ident(name)) => {
                self.bump();
                Ok(binding_identifier(name))
            }
            | Some(Tok::BracketOpen) => self.array_binding(),
            | Some(Tok::BraceOpen) => self.object_binding(),
            | _ => Err(self.unexpected(&["identifier", "[", "{"])),
        }
    }

    /// A binding target with an optional default.
    fn binding_element(&mut self) -> Result<Tree> {
        let binding = self.binding_target()?;
        if self.eat(&Tok::Assign) {
            let init = self.with_in(|p| p.assignment())?;
            return Ok(mk(BindingWithDefault { binding, init }));
        }
        Ok(binding)
    }

    fn array_binding(&mut self) -> Result<Tree> {
        self.expect(&Tok::BracketOpen)?;
        let mut elements = Vec::new();
        let mut rest = None;
        loop {
            match self.peek() {
                | Some(Tok::BracketClose) => break,
                | Some(Tok::Comma) => {
                    self.bump();
                    elements.push(None);
                    continue;
                }
                | Some(Tok::Ellipsis) => {
                    self.bump();
                    rest = Some(self.binding_target()?);
                    break;
                }
                | _ => elements.push(Some(self.binding_element()?)),
            }
            if !self.at(&Tok::BracketClose) {
                self.expect(&Tok::Comma)?;
            }
        }
        self.expect(&Tok::BracketClose)?;
        Ok(mk(ArrayBinding { elements, rest }))
    }

    fn object_binding(&mut self) -> Result<Tree> {
        self.expect(&Tok::BraceOpen)?;
        let mut properties = Vec::new();
        while !self.at(&Tok::BraceClose) {
            let shorthand = matches!(self.peek(), Some(Tok::Ident(_)))
                && matches!(
                    self.peek_at(1),
                    Some(Tok::Comma | Tok::BraceClose | Tok::Assign)
                );
            if let (true, Some(Tok::Ident(name))) = (shorthand, self.peek()) {
                self.bump();
                let init = if self.eat(&Tok::Assign) {
                    Some(self.with_in(|p| p.assignment())?)
                } else {
                    None
                };
                properties
                    .push(mk(BindingPropertyIdentifier { binding: binding_identifier(name), init }));
            } else {
                let name = self.property_name()?;
                self.expect(&Tok::Colon)?;
                let binding = self.binding_element()?;
                properties.push(mk(BindingPropertyProperty { name, binding }));
            }
            if !self.at(&Tok::BraceClose) {
                self.expect(&Tok::Comma)?;
            }
        }
        self.bump();
        Ok(mk(ObjectBinding { properties }))
    }

    fn formal_parameters(&mut self) -> Result<Tree> {
        self.expect(&Tok::ParenOpen)?;
        let mut items = Vec::new();
        let mut rest = None;
        while !self.at(&Tok::ParenClose) {
            if self.eat(&Tok::Ellipsis) {
                rest = Some(self.binding_target()?);
                break;
            }
            items.push(self.binding_element()?);
            if !self.at(&Tok::ParenClose) {
                self.expect(&Tok::Comma)?;
            }
        }
        self.expect(&Tok::ParenClose)?;
        Ok(mk(FormalParameters { items, rest }))
    }

    /* ------------------------------- Expressions ------------------------------ */

    pub fn expression(&mut self) -> Result<Tree> {
        let mut left = self.assignment()?;
        while self.eat(&Tok::Comma) {
            let right = self.assignment()?;
            left = binary(left, BinaryOp::Sequence, right);
        }
        Ok(left)
    }

    fn assignment(&mut self) -> Result<Tree> {
        if self.arrow_ahead() {
            return self.arrow();
        }
        let lhs = self.conditional()?;
        let op = match self.peek() {
            | Some(Tok::Assign) => None,
            | Some(Tok::CompoundAssign(op)) => Some(op),
            | Some(Tok::Slash(Slashed::DivAssign)) => Some(CompoundOp::Div),
            | _ => return Ok(lhs),
        };
        let binding = self.assignment_target(lhs)?;
        self.bump();
        let expression = self.assignment()?;
        Ok(match op {
            | None => mk(AssignmentExpression { binding, expression }),
            | Some(operator) => {
                mk(CompoundAssignmentExpression { binding, operator, expression })
            }
        })
    }

    /// Reinterprets an already parsed expression as something that can be stored to.
    fn assignment_target(&self, expr: Tree) -> Result<Tree> {
        match &*expr {
            | Node::IdentifierExpression(IdentifierExpression { name }) => {
                Ok(mk(AssignmentTargetIdentifier { name: name.clone() }))
            }
            | Node::StaticMemberExpression(StaticMemberExpression { object, property }) => {
                Ok(mk(StaticMemberAssignmentTarget {
                    object: object.clone(),
                    property: property.clone(),
                }))
            }
            | Node::ComputedMemberExpression(ComputedMemberExpression { object, expression }) => {
                Ok(mk(ComputedMemberAssignmentTarget {
                    object: object.clone(),
                    expression: expression.clone(),
                }))
            }
            | Node::ArrayExpression(_) | Node::ObjectExpression(_) => {
                Err(self.unsupported("destructuring assignment"))
            }
            | _ => Err(ParseError::new(ParseErrorKind::InvalidAssignmentTarget, self.span())),
        }
    }

    /// `x =>` or a parenthesized list followed by `=>`.
    fn arrow_ahead(&self) -> bool {
        match self.peek() {
            | Some(Tok::Ident(_)) => self.peek_at(1) == Some(Tok::FatArrow),
            | Some(Tok::ParenOpen) => {
                let mut depth = 0usize;
                for (i, lexeme) in self.tokens[self.pos..].iter().enumerate() {
                    match lexeme.tok {
                        | Tok::ParenOpen | Tok::BracketOpen | Tok::BraceOpen => depth += 1,
                        | Tok::ParenClose | Tok::BracketClose | Tok::BraceClose => {
                            depth -= 1;
                            if depth == 0 {
                                return self.peek_at(i + 1) == Some(Tok::FatArrow);
                            }
                        }
                        | _ => {}
                    }
                }
                false
            }
            | _ => false,
        }
    }

    fn arrow(&mut self) -> Result<Tree> {
        let params = match self.peek() {
            | Some(Tok::Ident(name)) => {
                self.bump();
                mk(FormalParameters { items: vec![binding_identifier(name)], rest: None })
            }
            | _ => self.formal_parameters()?,
        };
        self.expect(&Tok::FatArrow)?;
        let body =
            if self.at(&Tok::BraceOpen) { self.function_body()? } else { self.assignment()? };
        Ok(mk(ArrowExpression { params, body }))
    }

    fn conditional(&mut self) -> Result<Tree> {
        let test = self.binary(Precedence::LogicalOr as u8)?;
        if !self.eat(&Tok::Question) {
            return Ok(test);
        }
        let consequent = self.with_in(|p| p.assignment())?;
        self.expect(&Tok::Colon)?;
        let alternate = self.assignment()?;
        Ok(mk(ConditionalExpression { test, consequent, alternate }))
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        let op = match self.peek()? {
            | Tok::PipePipe => BinaryOp::Or,
            | Tok::AmpAmp => BinaryOp::And,
            | Tok::Pipe => BinaryOp::BitOr,
            | Tok::Caret => BinaryOp::BitXor,
            | Tok::Amp => BinaryOp::BitAnd,
            | Tok::EqEq => BinaryOp::Eq,
            | Tok::NotEq => BinaryOp::NotEq,
            | Tok::EqEqEq => BinaryOp::StrictEq,
            | Tok::NotEqEq => BinaryOp::StrictNotEq,
            | Tok::Lt => BinaryOp::Lt,
            | Tok::Le => BinaryOp::Le,
            | Tok::Gt => BinaryOp::Gt,
            | Tok::Ge => BinaryOp::Ge,
            | Tok::In if !self.no_in => BinaryOp::In,
            | Tok::Instanceof => BinaryOp::Instanceof,
            | Tok::Shl => BinaryOp::Shl,
            | Tok::Shr => BinaryOp::Shr,
            | Tok::UShr => BinaryOp::UShr,
            | Tok::Plus => BinaryOp::Add,
            | Tok::Minus => BinaryOp::Sub,
            | Tok::Star => BinaryOp::Mul,
            | Tok::Slash(Slashed::Div) => BinaryOp::Div,
            | Tok::Percent => BinaryOp::Rem,
            | Tok::StarStar => BinaryOp::Exp,
            | _ => return None,
        };
        Some(op)
    }

    /// Precedence climbing over operators at least as tight as `min`.
    fn binary(&mut self, min: u8) -> Result<Tree> {
        let mut left = self.unary()?;
        while let Some(op) = self.binary_op() {
            let prec = op.precedence() as u8;
            if prec < min {
                break;
            }
            self.bump();
            let right =
                if op.is_right_associative() { self.binary(prec)? } else { self.binary(prec + 1)? };
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Tree> {
        let op = match self.peek() {
            | Some(Tok::Bang) => UnaryOp::Not,
            | Some(Tok::Minus) => UnaryOp::Minus,
            | Some(Tok::Plus) => UnaryOp::Plus,
            | Some(Tok::Tilde) => UnaryOp::BitNot,
            | Some(Tok::Typeof) => UnaryOp::Typeof,
            | Some(Tok::Void) => UnaryOp::Void,
            | Some(Tok::Delete) => UnaryOp::Delete,
            | Some(tok @ (Tok::PlusPlus | Tok::MinusMinus)) => {
                self.bump();
                let operand = self.unary()?;
                let operand = self.assignment_target(operand)?;
                let operator =
                    if tok == Tok::PlusPlus { UpdateOp::Increment } else { UpdateOp::Decrement };
                return Ok(mk(UpdateExpression { prefix: true, operator, operand }));
            }
            | _ => return self.postfix(),
        };
        self.bump();
        let operand = self.unary()?;
        Ok(unary(op, operand))
    }

    fn postfix(&mut self) -> Result<Tree> {
        let expr = self.left_hand_side()?;
        let operator = match self.peek() {
            | Some(Tok::PlusPlus) if !self.newline_before() => UpdateOp::Increment,
            | Some(Tok::MinusMinus) if !self.newline_before() => UpdateOp::Decrement,
            | _ => return Ok(expr),
        };
        let operand = self.assignment_target(expr)?;
        self.bump();
        Ok(mk(UpdateExpression { prefix: false, operator, operand }))
    }

    fn left_hand_side(&mut self) -> Result<Tree> {
        let mut expr = if self.at(&Tok::New) { self.new_expression()? } else { self.primary()? };
        loop {
            match self.peek() {
                | Some(Tok::Dot) => {
                    self.bump();
                    let property = self.identifier_name()?;
                    expr = mk(StaticMemberExpression { object: expr, property });
                }
                | Some(Tok::BracketOpen) => {
                    self.bump();
                    let expression = self.with_in(|p| p.expression())?;
                    self.expect(&Tok::BracketClose)?;
                    expr = mk(ComputedMemberExpression { object: expr, expression });
                }
                | Some(Tok::ParenOpen) => {
                    let arguments = self.arguments()?;
                    expr = mk(CallExpression { callee: expr, arguments });
                }
                | _ => break Ok(expr),
            }
        }
    }

    fn new_expression(&mut self) -> Result<Tree> {
        self.expect(&Tok::New)?;
        if self.at(&Tok::Dot) {
            return Err(self.unsupported("`new.target`"));
        }
        let mut callee = if self.at(&Tok::New) { self.new_expression()? } else { self.primary()? };
        loop {
            match self.peek() {
                | Some(Tok::Dot) => {
                    self.bump();
                    let property = self.identifier_name()?;
                    callee = mk(StaticMemberExpression { object: callee, property });
                }
                | Some(Tok::BracketOpen) => {
                    self.bump();
                    let expression = self.with_in(|p| p.expression())?;
                    self.expect(&Tok::BracketClose)?;
                    callee = mk(ComputedMemberExpression { object: callee, expression });
                }
                | _ => break,
            }
        }
        let arguments = if self.at(&Tok::ParenOpen) { self.arguments()? } else { Vec::new() };
        Ok(mk(NewExpression { callee, arguments }))
    }

    fn arguments(&mut self) -> Result<Vec<Tree>> {
        self.expect(&Tok::ParenOpen)?;
        let arguments = self.with_in(|p| {
            let mut arguments = Vec::new();
            while !p.at(&Tok::ParenClose) {
                if p.eat(&Tok::Ellipsis) {
                    let expression = p.assignment()?;
                    arguments.push(mk(SpreadElement { expression }));
                } else {
                    arguments.push(p.assignment()?);
                }
                if !p.at(&Tok::ParenClose) {
                    p.expect(&Tok::Comma)?;
                }
            }
            Ok(arguments)
        })?;
        self.expect(&Tok::ParenClose)?;
        Ok(arguments)
    }

    /// A name after `.`, where keywords are allowed.
    fn identifier_name(&mut self) -> Result<String> {
        let name = match self.peek() {
            | Some(Tok::Ident(name)) => name.to_string(),
            | Some(tok) => match tok.keyword() {
                | Some(kw) => kw.to_string(),
                | None => return Err(self.unexpected(&["identifier"])),
            },
            | None => return Err(self.unexpected(&["identifier"])),
        };
        self.bump();
        Ok(name)
    }

    fn primary(&mut self) -> Result<Tree> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected(&["expression"]));
        };
        let span = self.span();
        let invalid =
            |lit: &str| ParseError::new(ParseErrorKind::InvalidLiteral(lit.to_string()), span);
        match tok {
            | Tok::Ident("class") => Err(self.unsupported("classes")),
            | Tok::Ident("async") if self.peek_at(1) == Some(Tok::Function) => {
                Err(self.unsupported("async functions"))
            }
            | Tok::Ident(name) => {
                self.bump();
                Ok(identifier(name))
            }
            | Tok::Number(lit) => {
                self.bump();
                let value = parse_number(lit).ok_or_else(|| invalid(lit))?;
                Ok(number(value))
            }
            | Tok::Str(lit) => {
                self.bump();
                let value = unescape_string(lit).map_err(|_| invalid(lit))?;
                Ok(string(value))
            }
            | Tok::True | Tok::False => {
                self.bump();
                Ok(boolean(tok == Tok::True))
            }
            | Tok::Null => {
                self.bump();
                Ok(null())
            }
            | Tok::This => {
                self.bump();
                Ok(mk(ThisExpression {}))
            }
            | Tok::Slash(Slashed::Regex(lit)) => {
                self.bump();
                let close = lit.rfind('/').unwrap_or(0);
                if close == 0 {
                    return Err(invalid(lit));
                }
                Ok(mk(LiteralRegExpExpression {
                    pattern: lit[1..close].to_string(),
                    flags: lit[close + 1..].to_string(),
                }))
            }
            | Tok::ParenOpen => self.paren_expression(),
            | Tok::BracketOpen => self.array_expression(),
            | Tok::BraceOpen => self.object_expression(),
            | Tok::Function => {
                self.bump();
                if self.at(&Tok::Star) {
                    return Err(self.unsupported("generator functions"));
                }
                let name = match self.peek() {
                    | Some(Tok::Ident(name)) => {
                        self.bump();
                        Some(binding_identifier(name))
                    }
                    | _ => None,
                };
                let params = self.formal_parameters()?;
                let body = self.function_body()?;
                Ok(mk(FunctionExpression { name, params, body }))
            }
            | _ => Err(self.unexpected(&["expression"])),
        }
    }

    fn array_expression(&mut self) -> Result<Tree> {
        self.expect(&Tok::BracketOpen)?;
        let elements = self.with_in(|p| {
            let mut elements = Vec::new();
            loop {
                match p.peek() {
                    | Some(Tok::BracketClose) => break,
                    | Some(Tok::Comma) => {
                        p.bump();
                        elements.push(None);
                        continue;
                    }
                    | Some(Tok::Ellipsis) => {
                        p.bump();
                        let expression = p.assignment()?;
                        elements.push(Some(mk(SpreadElement { expression })));
                    }
                    | _ => elements.push(Some(p.assignment()?)),
                }
                if !p.at(&Tok::BracketClose) {
                    p.expect(&Tok::Comma)?;
                }
            }
            Ok(elements)
        })?;
        self.expect(&Tok::BracketClose)?;
        Ok(mk(ArrayExpression { elements }))
    }

    fn object_expression(&mut self) -> Result<Tree> {
        self.expect(&Tok::BraceOpen)?;
        let properties = self.with_in(|p| {
            let mut properties = Vec::new();
            while !p.at(&Tok::BraceClose) {
                properties.push(p.property()?);
                if !p.at(&Tok::BraceClose) {
                    p.expect(&Tok::Comma)?;
                }
            }
            Ok(properties)
        })?;
        self.expect(&Tok::BraceClose)?;
        Ok(mk(ObjectExpression { properties }))
    }

    fn property(&mut self) -> Result<Tree> {
        let follows_key =
            |tok: Option<Tok<'_>>| matches!(tok, Some(Tok::Colon | Tok::ParenOpen | Tok::Comma | Tok::BraceClose));
        match self.peek() {
            | Some(Tok::Ident(accessor @ ("get" | "set"))) if !follows_key(self.peek_at(1)) => {
                self.bump();
                let name = self.property_name()?;
                if accessor == "get" {
                    self.expect(&Tok::ParenOpen)?;
                    self.expect(&Tok::ParenClose)?;
                    let body = self.function_body()?;
                    Ok(mk(Getter { name, body }))
                } else {
                    self.expect(&Tok::ParenOpen)?;
                    let param = self.binding_element()?;
                    self.expect(&Tok::ParenClose)?;
                    let body = self.function_body()?;
                    Ok(mk(Setter { name, param, body }))
                }
            }
            | Some(Tok::Ellipsis) => Err(self.unsupported("object spread")),
            | Some(Tok::Ident(name))
                if matches!(self.peek_at(1), Some(Tok::Comma | Tok::BraceClose)) =>
            {
                self.bump();
                Ok(mk(ShorthandProperty { name: identifier(name) }))
            }
            | _ => {
                let name = self.property_name()?;
                if self.eat(&Tok::Colon) {
                    let expression = self.assignment()?;
                    return Ok(mk(DataProperty { name, expression }));
                }
                if self.at(&Tok::ParenOpen) {
                    let params = self.formal_parameters()?;
                    let body = self.function_body()?;
                    return Ok(mk(MethodDefinition { name, params, body }));
                }
                Err(self.unexpected(&[":", "("]))
            }
        }
    }

    fn property_name(&mut self) -> Result<Tree> {
        let span = self.span();
        let value = match self.peek() {
            | Some(Tok::Ident(name)) => name.to_string(),
            | Some(Tok::Str(lit)) => unescape_string(lit)
                .map_err(|_| ParseError::new(ParseErrorKind::InvalidLiteral(lit.to_string()), span))?
                .to_string_lossy(),
            | Some(Tok::Number(lit)) => {
                let value = parse_number(lit).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::InvalidLiteral(lit.to_string()), span)
                })?;
                number_to_string(value)
            }
            | Some(Tok::BracketOpen) => {
                self.bump();
                let expression = self.with_in(|p| p.assignment())?;
                self.expect(&Tok::BracketClose)?;
                return Ok(mk(ComputedPropertyName { expression }));
            }
            | Some(tok) => match tok.keyword() {
                | Some(kw) => kw.to_string(),
                | None => return Err(self.unexpected(&["property name"])),
            },
            | None => return Err(self.unexpected(&["property name"])),
        };
        self.bump();
        Ok(mk(StaticPropertyName { value }))
    }
}

/// Tokens that keep an expression going across a line break.
fn continues_expression(tok: &Tok<'_>) -> bool {
    matches!(
        tok,
        Tok::Dot
            | Tok::ParenOpen
            | Tok::BracketOpen
            | Tok::Comma
            | Tok::Question
            | Tok::Colon
            | Tok::Lt
            | Tok::Gt
            | Tok::Le
            | Tok::Ge
            | Tok::EqEq
            | Tok::NotEq
            | Tok::EqEqEq
            | Tok::NotEqEq
            | Tok::Plus
            | Tok::Minus
            | Tok::Star
            | Tok::Percent
            | Tok::StarStar
            | Tok::Shl
            | Tok::Shr
            | Tok::UShr
            | Tok::Amp
            | Tok::Pipe
            | Tok::Caret
            | Tok::AmpAmp
            | Tok::PipePipe
            | Tok::Assign
            | Tok::CompoundAssign(_)
            | Tok::Slash(Slashed::Div | Slashed::DivAssign)
            | Tok::In
            | Tok::Instanceof
    )
}
