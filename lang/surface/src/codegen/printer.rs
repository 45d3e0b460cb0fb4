//! Layout of trees back into source text.

use super::strings;
use pretty::RcDoc;
use unminify_syntax::*;

/* -------------------------------- Formatter ------------------------------- */

pub use unminify_syntax::{Pretty, Ugly};

/// Print settings.
pub struct Formatter {
    pub indent: isize,
    pub width: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter { indent: 2, width: 80 }
    }
}

impl Formatter {
    pub fn new(width: usize) -> Self {
        Formatter { width, ..Formatter::default() }
    }
}

/// Formats a script (or any node) at the given width.
pub fn generate(tree: &Tree, width: usize) -> String {
    let f = Formatter::new(width);
    tree.ugly(&f)
}

impl<'a> Ugly<'a, Formatter> for Node {
    fn ugly(&self, f: &'a Formatter) -> String {
        self.layout(f, f.width)
    }
}

impl<'a> Pretty<'a, Formatter> for Node {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        match self {
            | Node::Script(Script { directives, statements }) => {
                let mut items: Vec<RcDoc<'a>> =
                    directives.iter().map(|d| RcDoc::text(format!("{d};"))).collect();
                items.extend(statements.iter().map(|s| f.statement(s)));
                RcDoc::intersperse(items, RcDoc::hardline())
            }
            | Node::FunctionBody(_) | Node::FormalParameters(_) => f.function_part(self),
            | _ if is_statement(self) => f.statement(self),
            | _ => f.expr(self, Precedence::Sequence),
        }
    }
}

fn is_statement(node: &Node) -> bool {
    matches!(
        node,
        Node::BlockStatement(_)
            | Node::VariableDeclaration(_)
            | Node::EmptyStatement(_)
            | Node::ExpressionStatement(_)
            | Node::IfStatement(_)
            | Node::ForStatement(_)
            | Node::ForInStatement(_)
            | Node::ForOfStatement(_)
            | Node::WhileStatement(_)
            | Node::DoWhileStatement(_)
            | Node::ReturnStatement(_)
            | Node::ThrowStatement(_)
            | Node::BreakStatement(_)
            | Node::ContinueStatement(_)
            | Node::LabeledStatement(_)
            | Node::SwitchStatement(_)
            | Node::TryStatement(_)
            | Node::DebuggerStatement(_)
            | Node::FunctionDeclaration(_)
    )
}

/* ------------------------------- Precedence ------------------------------- */

fn precedence(node: &Node) -> Precedence {
    match node {
        | Node::BinaryExpression(BinaryExpression { operator, .. }) => operator.precedence(),
        | Node::AssignmentExpression(_)
        | Node::CompoundAssignmentExpression(_)
        | Node::ArrowExpression(_) => Precedence::Assignment,
        | Node::ConditionalExpression(_) => Precedence::Conditional,
        | Node::UnaryExpression(_) => Precedence::Prefix,
        | Node::UpdateExpression(UpdateExpression { prefix: true, .. }) => Precedence::Prefix,
        | Node::UpdateExpression(_) => Precedence::Postfix,
        | Node::CallExpression(_) => Precedence::Call,
        | Node::NewExpression(_)
        | Node::StaticMemberExpression(_)
        | Node::ComputedMemberExpression(_) => Precedence::Member,
        | Node::LiteralNumericExpression(LiteralNumericExpression { value })
            if value.is_sign_negative() && !value.is_nan() =>
        {
            Precedence::Prefix
        }
        | _ => Precedence::Primary,
    }
}

/// The next tighter level.
fn tighter(p: Precedence) -> Precedence {
    use Precedence::*;
    match p {
        | Sequence => Assignment,
        | Assignment => Conditional,
        | Conditional => LogicalOr,
        | LogicalOr => LogicalAnd,
        | LogicalAnd => BitwiseOr,
        | BitwiseOr => BitwiseXor,
        | BitwiseXor => BitwiseAnd,
        | BitwiseAnd => Equality,
        | Equality => Relational,
        | Relational => Shift,
        | Shift => Additive,
        | Additive => Multiplicative,
        | Multiplicative => Exponent,
        | Exponent => Prefix,
        | Prefix => Postfix,
        | Postfix => New,
        | New => Call,
        | Call => Member,
        | Member | Primary => Primary,
    }
}

/// Whether the printed text would begin with `{` or `function`, which a statement cannot.
fn starts_ambiguously(node: &Node) -> bool {
    match node {
        | Node::ObjectExpression(_) | Node::FunctionExpression(_) => true,
        | Node::BinaryExpression(BinaryExpression { left, .. }) => starts_ambiguously(left),
        | Node::CallExpression(CallExpression { callee, .. }) => {
            !callee.is_function_like() && starts_ambiguously(callee)
        }
        | Node::StaticMemberExpression(StaticMemberExpression { object, .. })
        | Node::ComputedMemberExpression(ComputedMemberExpression { object, .. })
        | Node::StaticMemberAssignmentTarget(StaticMemberAssignmentTarget { object, .. })
        | Node::ComputedMemberAssignmentTarget(ComputedMemberAssignmentTarget { object, .. }) => {
            !object.is_function_like() && starts_ambiguously(object)
        }
        | Node::ConditionalExpression(ConditionalExpression { test, .. }) => {
            starts_ambiguously(test)
        }
        | Node::AssignmentExpression(AssignmentExpression { binding, .. })
        | Node::CompoundAssignmentExpression(CompoundAssignmentExpression { binding, .. }) => {
            starts_ambiguously(binding)
        }
        | Node::UpdateExpression(UpdateExpression { prefix: false, operand, .. }) => {
            starts_ambiguously(operand)
        }
        | _ => false,
    }
}

/// An `in` operator outside any nested function, which would end a `for` head early.
fn contains_in(node: &Node) -> bool {
    if let Node::BinaryExpression(BinaryExpression { operator: BinaryOp::In, .. }) = node {
        return true;
    }
    node.children().into_iter().any(|child| {
        exists(child, &mut |n| match &**n {
            | n if n.is_function_like() => Some(false),
            | Node::BinaryExpression(BinaryExpression { operator: BinaryOp::In, .. }) => Some(true),
            | _ => None,
        })
    })
}

/// A callee of `new` whose member chain holds a call must be parenthesized.
fn chain_has_call(node: &Node) -> bool {
    match node {
        | Node::CallExpression(_) => true,
        | Node::StaticMemberExpression(StaticMemberExpression { object, .. })
        | Node::ComputedMemberExpression(ComputedMemberExpression { object, .. }) => {
            chain_has_call(object)
        }
        | _ => false,
    }
}

/// An `if` without `else` at the end of a statement would capture a following `else`.
fn dangles(node: &Node) -> bool {
    match node {
        | Node::IfStatement(IfStatement { alternate: None, .. }) => true,
        | Node::IfStatement(IfStatement { alternate: Some(alt), .. }) => dangles(alt),
        | Node::WhileStatement(WhileStatement { body, .. })
        | Node::ForStatement(ForStatement { body, .. })
        | Node::ForInStatement(ForInStatement { body, .. })
        | Node::ForOfStatement(ForOfStatement { body, .. })
        | Node::LabeledStatement(LabeledStatement { body, .. }) => dangles(body),
        | _ => false,
    }
}

fn parens<'a>(doc: RcDoc<'a>) -> RcDoc<'a> {
    RcDoc::text("(").append(doc).append(RcDoc::text(")"))
}

fn comma_list<'a>(items: Vec<RcDoc<'a>>) -> RcDoc<'a> {
    RcDoc::intersperse(items, RcDoc::text(", "))
}

/* ------------------------------- Statements ------------------------------- */

impl Formatter {
    fn statement<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::BlockStatement(BlockStatement { statements }) => self.braced(&[], statements),
            | Node::VariableDeclaration(_) => {
                self.variable_declaration(node, false).append(RcDoc::text(";"))
            }
            | Node::EmptyStatement(_) => RcDoc::text(";"),
            | Node::ExpressionStatement(ExpressionStatement { expression }) => {
                let doc = self.expr(expression, Precedence::Sequence);
                let doc = if starts_ambiguously(expression) { parens(doc) } else { doc };
                doc.append(RcDoc::text(";"))
            }
            | Node::IfStatement(IfStatement { test, consequent, alternate }) => {
                let head = RcDoc::text("if ")
                    .append(parens(self.expr(test, Precedence::Sequence)))
                    .append(RcDoc::space());
                match alternate {
                    | None => head.append(self.statement(consequent)),
                    | Some(alternate) => {
                        let consequent = if dangles(consequent) {
                            self.braced(&[], std::slice::from_ref(consequent))
                        } else {
                            self.statement(consequent)
                        };
                        head.append(consequent)
                            .append(RcDoc::text(" else "))
                            .append(self.statement(alternate))
                    }
                }
            }
            | Node::ForStatement(ForStatement { init, test, update, body }) => {
                let init = match init.as_deref() {
                    | None => RcDoc::nil(),
                    | Some(decl @ Node::VariableDeclaration(_)) => {
                        self.variable_declaration(decl, true)
                    }
                    | Some(expr) => {
                        let doc = self.expr(expr, Precedence::Sequence);
                        if contains_in(expr) { parens(doc) } else { doc }
                    }
                };
                let part = |e: &Option<Tree>| match e {
                    | Some(e) => RcDoc::space().append(self.expr(e, Precedence::Sequence)),
                    | None => RcDoc::nil(),
                };
                RcDoc::text("for (")
                    .append(init)
                    .append(RcDoc::text(";"))
                    .append(part(test))
                    .append(RcDoc::text(";"))
                    .append(part(update))
                    .append(RcDoc::text(") "))
                    .append(self.statement(body))
            }
            | Node::ForInStatement(ForInStatement { left, right, body }) => {
                self.for_each("in", left, right, body)
            }
            | Node::ForOfStatement(ForOfStatement { left, right, body }) => {
                self.for_each("of", left, right, body)
            }
            | Node::WhileStatement(WhileStatement { test, body }) => RcDoc::text("while ")
                .append(parens(self.expr(test, Precedence::Sequence)))
                .append(RcDoc::space())
                .append(self.statement(body)),
            | Node::DoWhileStatement(DoWhileStatement { body, test }) => RcDoc::text("do ")
                .append(self.statement(body))
                .append(RcDoc::text(" while "))
                .append(parens(self.expr(test, Precedence::Sequence)))
                .append(RcDoc::text(";")),
            | Node::ReturnStatement(ReturnStatement { expression }) => match expression {
                | Some(e) => RcDoc::text("return ")
                    .append(self.expr(e, Precedence::Sequence))
                    .append(RcDoc::text(";")),
                | None => RcDoc::text("return;"),
            },
            | Node::ThrowStatement(ThrowStatement { expression }) => RcDoc::text("throw ")
                .append(self.expr(expression, Precedence::Sequence))
                .append(RcDoc::text(";")),
            | Node::BreakStatement(BreakStatement { label }) => match label {
                | Some(label) => RcDoc::text(format!("break {label};")),
                | None => RcDoc::text("break;"),
            },
            | Node::ContinueStatement(ContinueStatement { label }) => match label {
                | Some(label) => RcDoc::text(format!("continue {label};")),
                | None => RcDoc::text("continue;"),
            },
            | Node::LabeledStatement(LabeledStatement { label, body }) => {
                RcDoc::text(format!("{label}: ")).append(self.statement(body))
            }
            | Node::SwitchStatement(SwitchStatement { discriminant, cases }) => {
                let cases: Vec<_> = cases.iter().map(|case| self.switch_case(case)).collect();
                let head = RcDoc::text("switch ")
                    .append(parens(self.expr(discriminant, Precedence::Sequence)))
                    .append(RcDoc::text(" {"));
                if cases.is_empty() {
                    return head.append(RcDoc::text("}"));
                }
                head.append(
                    RcDoc::hardline()
                        .append(RcDoc::intersperse(cases, RcDoc::hardline()))
                        .nest(self.indent),
                )
                .append(RcDoc::hardline())
                .append(RcDoc::text("}"))
            }
            | Node::TryStatement(TryStatement { block, handler, finalizer }) => {
                let mut doc = RcDoc::text("try ").append(self.statement(block));
                if let Some(handler) = handler {
                    if let Node::CatchClause(CatchClause { binding, body }) = &**handler {
                        doc = doc.append(RcDoc::text(" catch "));
                        if let Some(binding) = binding {
                            doc = doc.append(parens(self.binding(binding))).append(RcDoc::space());
                        }
                        doc = doc.append(self.statement(body));
                    }
                }
                if let Some(finalizer) = finalizer {
                    doc = doc.append(RcDoc::text(" finally ")).append(self.statement(finalizer));
                }
                doc
            }
            | Node::DebuggerStatement(_) => RcDoc::text("debugger;"),
            | Node::FunctionDeclaration(FunctionDeclaration { name, params, body }) => {
                RcDoc::text("function ")
                    .append(self.binding(name))
                    .append(self.function_part(params))
                    .append(RcDoc::space())
                    .append(self.function_part(body))
            }
            | other => self.expr(other, Precedence::Sequence),
        }
    }

    fn braced<'a>(&self, directives: &[String], statements: &[Tree]) -> RcDoc<'a> {
        if directives.is_empty() && statements.is_empty() {
            return RcDoc::text("{}");
        }
        let mut items: Vec<RcDoc<'a>> =
            directives.iter().map(|d| RcDoc::text(format!("{d};"))).collect();
        items.extend(statements.iter().map(|s| self.statement(s)));
        RcDoc::text("{")
            .append(
                RcDoc::hardline().append(RcDoc::intersperse(items, RcDoc::hardline())).nest(self.indent),
            )
            .append(RcDoc::hardline())
            .append(RcDoc::text("}"))
    }

    fn variable_declaration<'a>(&self, node: &Node, in_for_head: bool) -> RcDoc<'a> {
        let Node::VariableDeclaration(VariableDeclaration { kind, declarators }) = node else {
            return self.expr(node, Precedence::Sequence);
        };
        let declarators = declarators
            .iter()
            .map(|d| match &**d {
                | Node::VariableDeclarator(VariableDeclarator { binding, init }) => {
                    let binding = self.binding(binding);
                    match init {
                        | Some(init) => {
                            let doc = self.expr(init, Precedence::Assignment);
                            let doc =
                                if in_for_head && contains_in(init) { parens(doc) } else { doc };
                            binding.append(RcDoc::text(" = ")).append(doc)
                        }
                        | None => binding,
                    }
                }
                | other => self.expr(other, Precedence::Assignment),
            })
            .collect();
        RcDoc::text(format!("{} ", kind)).append(comma_list(declarators))
    }

    fn for_each<'a>(&self, word: &str, left: &Node, right: &Node, body: &Node) -> RcDoc<'a> {
        let left = match left {
            | Node::VariableDeclaration(_) => self.variable_declaration(left, true),
            | _ => self.expr(left, Precedence::Postfix),
        };
        let right_min = if word == "of" { Precedence::Assignment } else { Precedence::Sequence };
        RcDoc::text("for (")
            .append(left)
            .append(RcDoc::text(format!(" {word} ")))
            .append(self.expr(right, right_min))
            .append(RcDoc::text(") "))
            .append(self.statement(body))
    }

    fn switch_case<'a>(&self, case: &Node) -> RcDoc<'a> {
        let Node::SwitchCase(SwitchCase { test, consequent }) = case else {
            return RcDoc::nil();
        };
        let head = match test {
            | Some(test) => RcDoc::text("case ")
                .append(self.expr(test, Precedence::Sequence))
                .append(RcDoc::text(":")),
            | None => RcDoc::text("default:"),
        };
        if consequent.is_empty() {
            return head;
        }
        let body: Vec<_> = consequent.iter().map(|s| self.statement(s)).collect();
        head.append(
            RcDoc::hardline().append(RcDoc::intersperse(body, RcDoc::hardline())).nest(self.indent),
        )
    }

    /// Parameter lists and bodies.
    fn function_part<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::FormalParameters(FormalParameters { items, rest }) => {
                let mut params: Vec<_> = items.iter().map(|p| self.binding(p)).collect();
                if let Some(rest) = rest {
                    params.push(RcDoc::text("...").append(self.binding(rest)));
                }
                parens(comma_list(params))
            }
            | Node::FunctionBody(FunctionBody { directives, statements }) => {
                self.braced(directives, statements)
            }
            | other => self.expr(other, Precedence::Assignment),
        }
    }

    /* -------------------------------- Bindings -------------------------------- */

    fn binding<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::BindingIdentifier(BindingIdentifier { name }) => RcDoc::text(name.clone()),
            | Node::BindingWithDefault(BindingWithDefault { binding, init }) => self
                .binding(binding)
                .append(RcDoc::text(" = "))
                .append(self.expr(init, Precedence::Assignment)),
            | Node::ArrayBinding(ArrayBinding { elements, rest }) => {
                let mut items: Vec<_> = elements
                    .iter()
                    .map(|e| match e {
                        | Some(e) => self.binding(e),
                        | None => RcDoc::nil(),
                    })
                    .collect();
                let trailing_hole = rest.is_none() && matches!(elements.last(), Some(None));
                if let Some(rest) = rest {
                    items.push(RcDoc::text("...").append(self.binding(rest)));
                }
                let close = if trailing_hole { ",]" } else { "]" };
                RcDoc::text("[").append(comma_list(items)).append(RcDoc::text(close))
            }
            | Node::ObjectBinding(ObjectBinding { properties }) => {
                if properties.is_empty() {
                    return RcDoc::text("{}");
                }
                let items = properties.iter().map(|p| self.binding(p)).collect();
                RcDoc::text("{ ").append(comma_list(items)).append(RcDoc::text(" }"))
            }
            | Node::BindingPropertyIdentifier(BindingPropertyIdentifier { binding, init }) => {
                let doc = self.binding(binding);
                match init {
                    | Some(init) => {
                        doc.append(RcDoc::text(" = ")).append(self.expr(init, Precedence::Assignment))
                    }
                    | None => doc,
                }
            }
            | Node::BindingPropertyProperty(BindingPropertyProperty { name, binding }) => {
                self.property_name(name).append(RcDoc::text(": ")).append(self.binding(binding))
            }
            | Node::AssignmentTargetIdentifier(AssignmentTargetIdentifier { name }) => {
                RcDoc::text(name.clone())
            }
            | other => self.expr(other, Precedence::Assignment),
        }
    }

    fn property_name<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::StaticPropertyName(StaticPropertyName { value }) => {
                RcDoc::text(strings::property_key(value))
            }
            | Node::ComputedPropertyName(ComputedPropertyName { expression }) => RcDoc::text("[")
                .append(self.expr(expression, Precedence::Assignment))
                .append(RcDoc::text("]")),
            | other => self.expr(other, Precedence::Primary),
        }
    }

    /* ------------------------------- Expressions ------------------------------ */

    /// An expression, parenthesized when it binds looser than `min`.
    fn expr<'a>(&self, node: &Node, min: Precedence) -> RcDoc<'a> {
        let doc = self.expr_inner(node);
        if precedence(node) < min { parens(doc) } else { doc }
    }

    fn expr_inner<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::IdentifierExpression(IdentifierExpression { name })
            | Node::AssignmentTargetIdentifier(AssignmentTargetIdentifier { name })
            | Node::BindingIdentifier(BindingIdentifier { name }) => RcDoc::text(name.clone()),
            | Node::ThisExpression(_) => RcDoc::text("this"),
            | Node::LiteralNumericExpression(LiteralNumericExpression { value }) => {
                RcDoc::text(strings::number(*value))
            }
            | Node::LiteralStringExpression(LiteralStringExpression { value }) => {
                RcDoc::text(strings::quote(value))
            }
            | Node::LiteralBooleanExpression(LiteralBooleanExpression { value }) => {
                RcDoc::text(if *value { "true" } else { "false" })
            }
            | Node::LiteralNullExpression(_) => RcDoc::text("null"),
            | Node::LiteralRegExpExpression(LiteralRegExpExpression { pattern, flags }) => {
                RcDoc::text(format!("/{pattern}/{flags}"))
            }
            | Node::ArrayExpression(ArrayExpression { elements }) => {
                let items: Vec<_> = elements
                    .iter()
                    .map(|e| match e {
                        | Some(e) => self.expr(e, Precedence::Assignment),
                        | None => RcDoc::nil(),
                    })
                    .collect();
                let close = if matches!(elements.last(), Some(None)) { ",]" } else { "]" };
                RcDoc::text("[").append(comma_list(items)).append(RcDoc::text(close))
            }
            | Node::SpreadElement(SpreadElement { expression }) => {
                RcDoc::text("...").append(self.expr(expression, Precedence::Assignment))
            }
            | Node::ObjectExpression(ObjectExpression { properties }) => {
                if properties.is_empty() {
                    return RcDoc::text("{}");
                }
                let items: Vec<_> = properties.iter().map(|p| self.property(p)).collect();
                RcDoc::text("{")
                    .append(
                        RcDoc::line()
                            .append(RcDoc::intersperse(items, RcDoc::text(",").append(RcDoc::line())))
                            .nest(self.indent),
                    )
                    .append(RcDoc::line())
                    .append(RcDoc::text("}"))
                    .group()
            }
            | Node::FunctionExpression(FunctionExpression { name, params, body }) => {
                let name = match name {
                    | Some(name) => RcDoc::space().append(self.binding(name)),
                    | None => RcDoc::nil(),
                };
                RcDoc::text("function")
                    .append(name)
                    .append(self.function_part(params))
                    .append(RcDoc::space())
                    .append(self.function_part(body))
            }
            | Node::ArrowExpression(ArrowExpression { params, body }) => {
                let body = match &**body {
                    | Node::FunctionBody(_) => self.function_part(body),
                    | Node::ObjectExpression(_) => parens(self.expr(body, Precedence::Assignment)),
                    | _ => self.expr(body, Precedence::Assignment),
                };
                self.function_part(params).append(RcDoc::text(" => ")).append(body)
            }
            | Node::UnaryExpression(UnaryExpression { operator, operand }) => {
                let spaced = operator.is_keyword()
                    || match (operator, &**operand) {
                        | (
                            UnaryOp::Minus | UnaryOp::Plus,
                            Node::UnaryExpression(UnaryExpression {
                                operator: UnaryOp::Minus | UnaryOp::Plus,
                                ..
                            })
                            | Node::UpdateExpression(UpdateExpression { prefix: true, .. }),
                        ) => true,
                        | (UnaryOp::Minus | UnaryOp::Plus, Node::LiteralNumericExpression(lit)) => {
                            lit.value.is_sign_negative()
                        }
                        | _ => false,
                    };
                let op = if spaced {
                    format!("{} ", operator.as_str())
                } else {
                    operator.as_str().to_string()
                };
                RcDoc::text(op).append(self.expr(operand, Precedence::Prefix))
            }
            | Node::UpdateExpression(UpdateExpression { prefix, operator, operand }) => {
                let operand = self.expr(operand, Precedence::Postfix);
                if *prefix {
                    RcDoc::text(operator.as_str()).append(operand)
                } else {
                    operand.append(RcDoc::text(operator.as_str()))
                }
            }
            | Node::BinaryExpression(BinaryExpression { left, operator, right }) => {
                let prec = operator.precedence();
                let (left_min, right_min) = match operator {
                    | BinaryOp::Exp => (Precedence::Postfix, prec),
                    | _ if operator.is_right_associative() => (tighter(prec), prec),
                    | _ => (prec, tighter(prec)),
                };
                let sep = if *operator == BinaryOp::Sequence {
                    RcDoc::text(", ")
                } else {
                    RcDoc::text(format!(" {} ", operator.as_str()))
                };
                self.expr(left, left_min).append(sep).append(self.expr(right, right_min))
            }
            | Node::AssignmentExpression(AssignmentExpression { binding, expression }) => self
                .target(binding)
                .append(RcDoc::text(" = "))
                .append(self.expr(expression, Precedence::Assignment)),
            | Node::CompoundAssignmentExpression(CompoundAssignmentExpression {
                binding,
                operator,
                expression,
            }) => self
                .target(binding)
                .append(RcDoc::text(format!(" {} ", operator.as_str())))
                .append(self.expr(expression, Precedence::Assignment)),
            | Node::ConditionalExpression(ConditionalExpression { test, consequent, alternate }) => {
                self.expr(test, Precedence::LogicalOr)
                    .append(RcDoc::text(" ? "))
                    .append(self.expr(consequent, Precedence::Assignment))
                    .append(RcDoc::text(" : "))
                    .append(self.expr(alternate, Precedence::Assignment))
            }
            | Node::CallExpression(CallExpression { callee, arguments }) => {
                let callee = if callee.is_function_like() {
                    parens(self.expr_inner(callee))
                } else {
                    self.expr(callee, Precedence::Call)
                };
                callee.append(self.arguments(arguments))
            }
            | Node::NewExpression(NewExpression { callee, arguments }) => {
                let callee_doc = if chain_has_call(callee) {
                    parens(self.expr_inner(callee))
                } else {
                    self.expr(callee, Precedence::Member)
                };
                RcDoc::text("new ").append(callee_doc).append(self.arguments(arguments))
            }
            | Node::StaticMemberExpression(StaticMemberExpression { object, property })
            | Node::StaticMemberAssignmentTarget(StaticMemberAssignmentTarget {
                object,
                property,
            }) => self.object(object).append(RcDoc::text(format!(".{property}"))),
            | Node::ComputedMemberExpression(ComputedMemberExpression { object, expression })
            | Node::ComputedMemberAssignmentTarget(ComputedMemberAssignmentTarget {
                object,
                expression,
            }) => self
                .object(object)
                .append(RcDoc::text("["))
                .append(self.expr(expression, Precedence::Sequence))
                .append(RcDoc::text("]")),
            | Node::ArrayBinding(_)
            | Node::ObjectBinding(_)
            | Node::BindingWithDefault(_)
            | Node::BindingPropertyIdentifier(_)
            | Node::BindingPropertyProperty(_) => self.binding(node),
            | Node::StaticPropertyName(_) | Node::ComputedPropertyName(_) => {
                self.property_name(node)
            }
            | Node::DataProperty(_)
            | Node::ShorthandProperty(_)
            | Node::MethodDefinition(_)
            | Node::Getter(_)
            | Node::Setter(_) => self.property(node),
            | Node::FunctionBody(_) | Node::FormalParameters(_) => self.function_part(node),
            | Node::VariableDeclarator(VariableDeclarator { binding, init }) => {
                let doc = self.binding(binding);
                match init {
                    | Some(init) => {
                        doc.append(RcDoc::text(" = ")).append(self.expr(init, Precedence::Assignment))
                    }
                    | None => doc,
                }
            }
            | Node::CatchClause(_) | Node::SwitchCase(_) | Node::Script(_) => {
                RcDoc::text(format!("<{}>", node.kind()))
            }
            | statement => self.statement(statement),
        }
    }

    fn target<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::AssignmentTargetIdentifier(_)
            | Node::StaticMemberAssignmentTarget(_)
            | Node::ComputedMemberAssignmentTarget(_) => self.expr_inner(node),
            | other => self.binding(other),
        }
    }

    /// The object of a member access; number literals need parentheses before a `.`.
    fn object<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::LiteralNumericExpression(_) => parens(self.expr_inner(node)),
            | _ if node.is_function_like() => parens(self.expr_inner(node)),
            | _ => self.expr(node, Precedence::Call),
        }
    }

    fn arguments<'a>(&self, arguments: &[Tree]) -> RcDoc<'a> {
        let items = arguments.iter().map(|a| self.expr(a, Precedence::Assignment)).collect();
        parens(comma_list(items))
    }

    fn property<'a>(&self, node: &Node) -> RcDoc<'a> {
        match node {
            | Node::DataProperty(DataProperty { name, expression }) => self
                .property_name(name)
                .append(RcDoc::text(": "))
                .append(self.expr(expression, Precedence::Assignment)),
            | Node::ShorthandProperty(ShorthandProperty { name }) => {
                self.expr(name, Precedence::Primary)
            }
            | Node::MethodDefinition(MethodDefinition { name, params, body }) => self
                .property_name(name)
                .append(self.function_part(params))
                .append(RcDoc::space())
                .append(self.function_part(body)),
            | Node::Getter(Getter { name, body }) => RcDoc::text("get ")
                .append(self.property_name(name))
                .append(RcDoc::text("() "))
                .append(self.function_part(body)),
            | Node::Setter(Setter { name, param, body }) => RcDoc::text("set ")
                .append(self.property_name(name))
                .append(parens(self.binding(param)))
                .append(RcDoc::space())
                .append(self.function_part(body)),
            | other => self.expr(other, Precedence::Assignment),
        }
    }
}
