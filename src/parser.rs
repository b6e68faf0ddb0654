use tracing::{debug, trace};

use crate::ast::{
    BinaryOp, Block, BlockItem, CaseLabel, Expr, ForInit, FuncDecl, Item, Member, Param,
    PostfixOp, Program, Stmt, StructDecl, SwitchCase, Type, UnaryOp, VarDecl,
};
use crate::diagnostic::{Construct, Diagnostic, DiagnosticKind, ListKind};
use crate::stream::TokenStream;
use crate::token::{Span, Token, TokenKind};

const EQUALITY_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::EqualEqual, BinaryOp::Eq),
    (TokenKind::BangEqual, BinaryOp::Ne),
];

const RELATIONAL_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Less, BinaryOp::Lt),
    (TokenKind::Greater, BinaryOp::Gt),
    (TokenKind::LessEqual, BinaryOp::Le),
    (TokenKind::GreaterEqual, BinaryOp::Ge),
];

const ADDITIVE_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];

const MULTIPLICATIVE_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Percent, BinaryOp::Mod),
];

/// Deepest nesting of statements and expressions a parse accepts.
const MAX_DEPTH: usize = 64;

/// Parse a TyC source string into a `Program`.
///
/// Stops at the first lexical or syntax error.
///
/// # Errors
///
/// Returns the first `Diagnostic` encountered while scanning or
/// recognizing the input.
pub fn parse(input: &str) -> Result<Program, Diagnostic> {
    let result = TokenStream::new(input).and_then(|stream| Parser::new(stream).parse());
    match &result {
        Ok(program) => debug!(items = program.items.len(), "program accepted"),
        Err(err) => debug!(error = %err, "program rejected"),
    }
    result
}

/// Accept or reject a source string without keeping the tree.
///
/// # Errors
///
/// Same as [`parse`].
pub fn validate(input: &str) -> Result<(), Diagnostic> {
    parse(input).map(|_| ())
}

/// Recursive-descent recognizer, one method per grammar rule.
///
/// Expression rules take an optional `seed`: a primary that was
/// already consumed while deciding between a declaration and an
/// expression statement, which keeps lookahead at one token.
struct Parser<'src> {
    stream: TokenStream<'src>,
    depth: usize,
}

impl<'src> Parser<'src> {
    const fn new(stream: TokenStream<'src>) -> Self {
        Self { stream, depth: 0 }
    }

    fn parse(mut self) -> Result<Program, Diagnostic> {
        let mut program = Program::default();
        while !self.stream.at_end() {
            program.items.push(self.parse_item()?);
        }
        Ok(program)
    }

    // ---- declarations ----

    fn parse_item(&mut self) -> Result<Item, Diagnostic> {
        let start = self.span();

        match self.kind() {
            TokenKind::Struct => self.parse_struct_decl().map(Item::Struct),
            TokenKind::Identifier => {
                let first = self.advance()?;
                match self.kind() {
                    // `name(` with the return type omitted
                    TokenKind::LParen => self.parse_function_rest(None, first.lexeme),
                    TokenKind::Identifier => {
                        let name = self.advance()?.lexeme;
                        self.parse_function_after_name(Type::Named(first.lexeme), name, start)
                    }
                    _ => Err(Diagnostic::illegal(Construct::GlobalStatement, start)),
                }
            }
            TokenKind::Auto => {
                self.advance()?;
                self.expect_identifier()?;
                let construct = if self.check(TokenKind::LParen) {
                    Construct::AutoReturnType
                } else {
                    Construct::GlobalVariable
                };
                Err(Diagnostic::illegal(construct, start))
            }
            kind if kind.is_builtin_type() => {
                let ty = self.parse_type()?;
                let name = self.expect_identifier()?;
                self.parse_function_after_name(ty, name, start)
            }
            kind if kind.starts_statement() => {
                Err(Diagnostic::illegal(Construct::GlobalStatement, start))
            }
            _ => Err(self.unexpected("struct or function declaration")),
        }
    }

    fn parse_function_after_name(
        &mut self,
        return_type: Type,
        name: String,
        start: Span,
    ) -> Result<Item, Diagnostic> {
        match self.kind() {
            TokenKind::LParen => self.parse_function_rest(Some(return_type), name),
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::Comma => {
                Err(Diagnostic::illegal(Construct::GlobalVariable, start))
            }
            _ => Err(self.missing(TokenKind::LParen)),
        }
    }

    fn parse_function_rest(
        &mut self,
        return_type: Option<Type>,
        name: String,
    ) -> Result<Item, Diagnostic> {
        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        trace!(%name, params = params.len(), "function");
        Ok(Item::Function(FuncDecl {
            return_type,
            name,
            params,
            body,
        }))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, Diagnostic> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma)? {
                return Ok(params);
            }
            if self.check(TokenKind::RParen) {
                return Err(self.illegal_here(Construct::TrailingComma(ListKind::Parameters)));
            }
        }
    }

    fn parse_param(&mut self) -> Result<Param, Diagnostic> {
        let start = self.span();
        match self.kind() {
            TokenKind::Auto => return Err(Diagnostic::illegal(Construct::AutoParameter, start)),
            TokenKind::Void => return Err(Diagnostic::illegal(Construct::VoidParameter, start)),
            _ => {}
        }

        let ty = self.parse_type()?;
        // `f(a)`: the lone identifier is a name without a type
        if matches!(ty, Type::Named(_))
            && matches!(self.kind(), TokenKind::Comma | TokenKind::RParen)
        {
            return Err(Diagnostic::illegal(Construct::UntypedParameter, start));
        }
        let name = self.expect_identifier()?;
        Ok(Param { ty, name })
    }

    fn parse_struct_decl(&mut self) -> Result<StructDecl, Diagnostic> {
        self.expect(TokenKind::Struct)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) {
            if self.stream.at_end() {
                return Err(self.missing(TokenKind::RBrace));
            }
            members.push(self.parse_member()?);
            self.expect(TokenKind::Semicolon)?;
        }
        self.advance()?;
        self.expect(TokenKind::Semicolon)?;

        trace!(%name, members = members.len(), "struct");
        Ok(StructDecl { name, members })
    }

    fn parse_member(&mut self) -> Result<Member, Diagnostic> {
        let start = self.span();
        match self.kind() {
            TokenKind::Auto => return Err(Diagnostic::illegal(Construct::AutoMember, start)),
            TokenKind::Void => return Err(Diagnostic::illegal(Construct::VoidMember, start)),
            _ => {}
        }
        let ty = self.parse_type()?;
        let name = self.expect_identifier()?;
        Ok(Member { ty, name })
    }

    fn parse_type(&mut self) -> Result<Type, Diagnostic> {
        let ty = match self.kind() {
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            TokenKind::String => Type::String,
            TokenKind::Void => Type::Void,
            TokenKind::Identifier => Type::Named(self.stream.peek().lexeme.clone()),
            _ => return Err(self.unexpected("type")),
        };
        self.advance()?;
        Ok(ty)
    }

    // ---- blocks and statements ----

    fn parse_block(&mut self) -> Result<Block, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut block = Block::default();
        while !self.check(TokenKind::RBrace) {
            if self.stream.at_end() {
                return Err(self.missing(TokenKind::RBrace));
            }
            block.items.push(self.parse_block_item()?);
        }
        self.advance()?;
        Ok(block)
    }

    fn parse_block_item(&mut self) -> Result<BlockItem, Diagnostic> {
        if self.kind().starts_declaration() {
            self.parse_decl_or_expr_stmt().map(BlockItem::from)
        } else {
            self.parse_statement().map(BlockItem::Stmt)
        }
    }

    /// `varDecl | exprStmt`, both ending in `;`.
    fn parse_decl_or_expr_stmt(&mut self) -> Result<ForInit, Diagnostic> {
        let start = self.span();
        match self.kind() {
            TokenKind::Auto => {
                self.advance()?;
                self.parse_var_decl_rest(None, start).map(ForInit::Decl)
            }
            kind if kind.is_builtin_type() => {
                let ty = self.parse_type()?;
                self.parse_var_decl_rest(Some(ty), start).map(ForInit::Decl)
            }
            TokenKind::Identifier => {
                let first = self.advance()?;
                if self.check(TokenKind::Identifier) {
                    let ty = Type::Named(first.lexeme);
                    self.parse_var_decl_rest(Some(ty), start).map(ForInit::Decl)
                } else {
                    let expr = self.parse_assignment(Some(Expr::Ident(first.lexeme)))?;
                    self.expect(TokenKind::Semicolon)?;
                    Ok(ForInit::Expr(expr))
                }
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(ForInit::Expr(expr))
            }
        }
    }

    /// Rest of a local declaration after its type (`None` for `auto`).
    fn parse_var_decl_rest(
        &mut self,
        ty: Option<Type>,
        start: Span,
    ) -> Result<VarDecl, Diagnostic> {
        let name = self.expect_identifier()?;
        if self.check(TokenKind::LParen) {
            return Err(Diagnostic::illegal(Construct::NestedFunction, start));
        }
        if ty == Some(Type::Void) {
            return Err(Diagnostic::illegal(Construct::VoidVariable, start));
        }
        let init = if self.eat(TokenKind::Assign)? {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(VarDecl { ty, name, init })
    }

    fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.span();
        match self.kind() {
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Return => {
                self.advance()?;
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Return(value))
            }
            TokenKind::Break => {
                self.advance()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Break)
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Continue)
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Stmt::Empty)
            }
            TokenKind::Case | TokenKind::Default => {
                Err(Diagnostic::illegal(Construct::CaseOutsideSwitch, start))
            }
            // every `if` before this point has already taken its `else`
            TokenKind::Else => Err(self.unexpected("statement")),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_condition(&mut self) -> Result<Expr, Diagnostic> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    /// `if` with its `else if` chain, read iteratively so long chains
    /// do not count as nesting.
    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_statement()?);

        let mut chain = Vec::new();
        let mut last_else = None;
        // Greedy: the innermost open `if` takes the `else`.
        while self.eat(TokenKind::Else)? {
            if !self.eat(TokenKind::If)? {
                last_else = Some(Box::new(self.parse_statement()?));
                break;
            }
            let condition = self.parse_condition()?;
            chain.push((condition, Box::new(self.parse_statement()?)));
        }

        let else_branch = chain
            .into_iter()
            .rev()
            .fold(last_else, |else_branch, (condition, then_branch)| {
                Some(Box::new(Stmt::If {
                    condition,
                    then_branch,
                    else_branch,
                }))
            });
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, Diagnostic> {
        self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn parse_for(&mut self) -> Result<Stmt, Diagnostic> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = if self.eat(TokenKind::Semicolon)? {
            None
        } else {
            Some(self.parse_decl_or_expr_stmt()?)
        };
        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn parse_switch(&mut self) -> Result<Stmt, Diagnostic> {
        self.expect(TokenKind::Switch)?;
        let scrutinee = self.parse_condition()?;
        self.expect(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        loop {
            match self.kind() {
                TokenKind::RBrace => {
                    self.advance()?;
                    break;
                }
                TokenKind::Case | TokenKind::Default => cases.push(self.parse_switch_case()?),
                TokenKind::Eof => return Err(self.missing(TokenKind::RBrace)),
                _ => return Err(self.unexpected("'case', 'default' or '}'")),
            }
        }
        Ok(Stmt::Switch { scrutinee, cases })
    }

    fn parse_switch_case(&mut self) -> Result<SwitchCase, Diagnostic> {
        let label = if self.eat(TokenKind::Default)? {
            CaseLabel::Default
        } else {
            self.expect(TokenKind::Case)?;
            let start = self.span();
            // labels sit at the `||` level, below assignment
            let value = self.parse_logic_or(None)?;
            if self.check(TokenKind::Assign) {
                return Err(Diagnostic::illegal(Construct::AssignmentInCaseLabel, start));
            }
            CaseLabel::Case(value)
        };
        self.expect(TokenKind::Colon)?;

        let mut body = Vec::new();
        while !matches!(
            self.kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            body.push(self.parse_block_item()?);
        }
        Ok(SwitchCase { label, body })
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        self.nested(|parser| parser.parse_assignment(None))
    }

    fn parse_assignment(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let target = self.parse_logic_or(seed)?;
        if !self.check(TokenKind::Assign) {
            return Ok(target);
        }
        if !target.is_assignable() {
            return Err(self.illegal_here(Construct::InvalidAssignmentTarget));
        }
        self.advance()?;
        let value = self.nested(|parser| parser.parse_assignment(None))?;
        Ok(Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    fn parse_logic_or(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_logic_and(seed)?;
        while self.eat(TokenKind::OrOr)? {
            let rhs = self.parse_logic_and(None)?;
            lhs = Expr::binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_logic_and(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_equality(seed)?;
        while self.eat(TokenKind::AndAnd)? {
            let rhs = self.parse_equality(None)?;
            lhs = Expr::binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_relational(seed)?;
        while let Some(op) = self.eat_operator(EQUALITY_OPS)? {
            let rhs = self.parse_relational(None)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_additive(seed)?;
        while let Some(op) = self.eat_operator(RELATIONAL_OPS)? {
            let rhs = self.parse_additive(None)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_multiplicative(seed)?;
        while let Some(op) = self.eat_operator(ADDITIVE_OPS)? {
            let rhs = self.parse_multiplicative(None)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        let mut lhs = self.parse_unary(seed)?;
        while let Some(op) = self.eat_operator(MULTIPLICATIVE_OPS)? {
            let rhs = self.parse_unary(None)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self, seed: Option<Expr>) -> Result<Expr, Diagnostic> {
        if let Some(primary) = seed {
            return self.parse_postfix(primary);
        }
        let op = match self.kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            _ => {
                let primary = self.parse_primary()?;
                return self.parse_postfix(primary);
            }
        };
        self.advance()?;
        let operand = self.nested(|parser| parser.parse_unary(None))?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self, primary: Expr) -> Result<Expr, Diagnostic> {
        let mut expr = primary;
        loop {
            expr = match self.kind() {
                TokenKind::Dot => {
                    self.advance()?;
                    let field = self.expect_identifier()?;
                    Expr::Member {
                        object: Box::new(expr),
                        field,
                    }
                }
                TokenKind::LParen => {
                    self.advance()?;
                    let args = self.parse_expr_list(TokenKind::RParen, ListKind::Arguments)?;
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.advance()?.kind == TokenKind::PlusPlus {
                        PostfixOp::Inc
                    } else {
                        PostfixOp::Dec
                    };
                    Expr::Postfix {
                        op,
                        operand: Box::new(expr),
                    }
                }
                _ => return Ok(expr),
            };
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        match self.kind() {
            TokenKind::Identifier => Ok(Expr::Ident(self.advance()?.lexeme)),
            TokenKind::IntLiteral => Ok(Expr::Int(self.advance()?.lexeme)),
            TokenKind::FloatLiteral => Ok(Expr::Float(self.advance()?.lexeme)),
            TokenKind::StringLiteral => Ok(Expr::Str(self.advance()?.lexeme)),
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Group(Box::new(inner)))
            }
            TokenKind::LBrace => {
                self.advance()?;
                let fields = self.parse_expr_list(TokenKind::RBrace, ListKind::StructLiteral)?;
                Ok(Expr::StructLiteral(fields))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_expr_list(
        &mut self,
        close: TokenKind,
        list: ListKind,
    ) -> Result<Vec<Expr>, Diagnostic> {
        let mut items = Vec::new();
        if self.eat(close)? {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expression()?);
            if !self.eat(TokenKind::Comma)? {
                self.expect(close)?;
                return Ok(items);
            }
            if self.check(close) {
                return Err(self.illegal_here(Construct::TrailingComma(list)));
            }
        }
    }

    // ---- token helpers ----

    /// Run `rule` one nesting level deeper, failing past `MAX_DEPTH`.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, Diagnostic>,
    ) -> Result<T, Diagnostic> {
        if self.depth >= MAX_DEPTH {
            return Err(self.illegal_here(Construct::NestingTooDeep));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn kind(&self) -> TokenKind {
        self.stream.peek().kind
    }

    fn span(&self) -> Span {
        self.stream.peek().span
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.stream.check(kind)
    }

    fn advance(&mut self) -> Result<Token, Diagnostic> {
        self.stream.advance()
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, Diagnostic> {
        self.stream.eat(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        self.stream.expect(kind)
    }

    fn expect_identifier(&mut self) -> Result<String, Diagnostic> {
        Ok(self.expect(TokenKind::Identifier)?.lexeme)
    }

    fn eat_operator(
        &mut self,
        ops: &[(TokenKind, BinaryOp)],
    ) -> Result<Option<BinaryOp>, Diagnostic> {
        let kind = self.kind();
        match ops.iter().find(|(candidate, _)| *candidate == kind) {
            Some(&(_, op)) => {
                self.advance()?;
                Ok(Some(op))
            }
            None => Ok(None),
        }
    }

    fn unexpected(&self, expected: &'static str) -> Diagnostic {
        let token = self.stream.peek();
        Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                expected,
                found: token.found(),
            },
            token.span,
        )
    }

    fn missing(&self, expected: TokenKind) -> Diagnostic {
        let token = self.stream.peek();
        Diagnostic::new(
            DiagnosticKind::MissingToken {
                expected,
                found: token.found(),
            },
            token.span,
        )
    }

    fn illegal_here(&self, construct: Construct) -> Diagnostic {
        Diagnostic::illegal(construct, self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Program {
        parse(input).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
    }

    fn parse_err(input: &str) -> Diagnostic {
        match parse(input) {
            Ok(program) => panic!("expected failure for {input:?}, got {program:?}"),
            Err(err) => err,
        }
    }

    fn body_of(program: &Program) -> &[BlockItem] {
        &program.functions().next().expect("no function").body.items
    }

    #[test]
    fn empty_program() {
        assert!(parse_ok("").items.is_empty());
    }

    #[test]
    fn function_without_return_type() {
        let program = parse_ok("main() {}");
        let func = program.functions().next().unwrap();
        assert_eq!(func.name, "main");
        assert_eq!(func.return_type, None);
    }

    #[test]
    fn struct_typed_return_and_params() {
        let program = parse_ok("Point make(Point p, int n) { return p; }");
        let func = program.functions().next().unwrap();
        assert_eq!(func.return_type, Some(Type::Named("Point".to_string())));
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[1].ty, Type::Int);
    }

    #[test]
    fn struct_members() {
        let program = parse_ok("struct Node { int val; Node next; };");
        let decl = program.structs().next().unwrap();
        assert_eq!(decl.name, "Node");
        assert_eq!(decl.members[1].ty, Type::Named("Node".to_string()));
    }

    #[test]
    fn identifier_led_items() {
        let program = parse_ok("void f() { Point p; p.x = 1; g(); }");
        let items = body_of(&program);
        assert!(matches!(
            &items[0],
            BlockItem::Decl(VarDecl { ty: Some(Type::Named(t)), .. }) if t == "Point"
        ));
        assert!(matches!(&items[1], BlockItem::Stmt(Stmt::Expr(Expr::Assign { .. }))));
        assert!(matches!(&items[2], BlockItem::Stmt(Stmt::Expr(Expr::Call { .. }))));
    }

    #[test]
    fn auto_local() {
        let program = parse_ok("void f() { auto x; auto y = 1.5; }");
        let items = body_of(&program);
        assert!(matches!(&items[0], BlockItem::Decl(VarDecl { ty: None, init: None, .. })));
        assert!(matches!(&items[1], BlockItem::Decl(VarDecl { ty: None, init: Some(_), .. })));
    }

    #[test]
    fn precedence_multiplicative_binds_tighter() {
        let program = parse_ok("void f() { x = a + b * c; }");
        let BlockItem::Stmt(Stmt::Expr(Expr::Assign { value, .. })) = &body_of(&program)[0] else {
            panic!("expected assignment");
        };
        let Expr::Binary { op, rhs, .. } = value.as_ref() else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(rhs.as_ref(), Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse_ok("void f() { a = b = c; }");
        let BlockItem::Stmt(Stmt::Expr(Expr::Assign { target, value })) = &body_of(&program)[0]
        else {
            panic!("expected assignment");
        };
        assert_eq!(target.as_ref(), &Expr::Ident("a".to_string()));
        assert!(matches!(value.as_ref(), Expr::Assign { .. }));
    }

    #[test]
    fn seeded_identifier_keeps_postfix_and_binary() {
        let program = parse_ok("void f() { a.b(1).c++ * 2 == d; }");
        let BlockItem::Stmt(Stmt::Expr(expr)) = &body_of(&program)[0] else {
            panic!("expected expression statement");
        };
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn dangling_else_binds_inner_if() {
        let program = parse_ok("void f() { if(a) if(b) c=1; else d=1; }");
        let BlockItem::Stmt(Stmt::If {
            then_branch,
            else_branch,
            ..
        }) = &body_of(&program)[0]
        else {
            panic!("expected if");
        };
        assert!(else_branch.is_none());
        assert!(matches!(
            then_branch.as_ref(),
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn stacked_case_labels() {
        let program = parse_ok("void f() { switch(x) { case 1: case 2: break; default: } }");
        let BlockItem::Stmt(Stmt::Switch { cases, .. }) = &body_of(&program)[0] else {
            panic!("expected switch");
        };
        assert_eq!(cases.len(), 3);
        assert!(cases[0].body.is_empty());
        assert_eq!(cases[1].body.len(), 1);
        assert_eq!(cases[2].label, CaseLabel::Default);
    }

    #[test]
    fn for_header_segments() {
        let program = parse_ok("void f() { for (;;) {} for (i = 0; i < n; ) ; }");
        let items = body_of(&program);
        assert!(matches!(
            &items[0],
            BlockItem::Stmt(Stmt::For {
                init: None,
                condition: None,
                update: None,
                ..
            })
        ));
        assert!(matches!(
            &items[1],
            BlockItem::Stmt(Stmt::For {
                init: Some(ForInit::Expr(_)),
                condition: Some(_),
                update: None,
                ..
            })
        ));
    }

    #[test]
    fn global_declaration_is_illegal() {
        let err = parse_err("int x = 10;");
        assert_eq!(err.kind, DiagnosticKind::IllegalConstruct(Construct::GlobalVariable));
        assert_eq!((err.span.line, err.span.column), (1, 1));
    }

    #[test]
    fn global_expression_is_illegal() {
        let err = parse_err("x = 10;");
        assert_eq!(err.kind, DiagnosticKind::IllegalConstruct(Construct::GlobalStatement));
    }

    #[test]
    fn auto_return_type_is_illegal() {
        let err = parse_err("auto f() {}");
        assert_eq!(err.kind, DiagnosticKind::IllegalConstruct(Construct::AutoReturnType));
    }

    #[test]
    fn struct_requires_trailing_semicolon() {
        let err = parse_err("struct S { int x; }");
        assert_eq!(
            err.kind,
            DiagnosticKind::MissingToken {
                expected: TokenKind::Semicolon,
                found: None,
            }
        );
    }

    #[test]
    fn lvalue_rules() {
        let err = parse_err("void f() { 5 = x; }");
        assert_eq!(
            err.kind,
            DiagnosticKind::IllegalConstruct(Construct::InvalidAssignmentTarget)
        );
        assert_eq!(err.span.column, 14);
        parse_err("void f() { (x) = 1; }");
        parse_err("void f() { x++ = 1; }");
        parse_ok("void f() { get().x = 1; }");
    }

    #[test]
    fn lexical_error_wins_over_later_syntax() {
        let err = parse_err("void f() { int x = @; }");
        assert_eq!(err.kind, DiagnosticKind::IllegalCharacter('@'));
        assert!(err.is_lexical());
    }

    #[test]
    fn syntax_error_before_lexical_error() {
        // `}` is missing its `;` before the scanner ever reaches `@`
        let err = parse_err("struct S { int x } @");
        assert!(matches!(err.kind, DiagnosticKind::MissingToken { .. }));
    }

    #[test]
    fn nesting_limit_boundary() {
        let nest = |n: usize| {
            format!("void f() {{ x = {}1{}; }}", "(".repeat(n), ")".repeat(n))
        };
        let (within, past) = std::thread::Builder::new()
            .stack_size(8 << 20)
            .spawn(move || (parse(&nest(MAX_DEPTH - 1)), parse(&nest(MAX_DEPTH))))
            .unwrap()
            .join()
            .unwrap();
        assert!(within.is_ok());
        let err = past.unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::IllegalConstruct(Construct::NestingTooDeep));
        // reported at the first token past the limit
        assert_eq!(err.span.column, 80);
    }

    #[test]
    fn else_if_chain_nests_right() {
        let program = parse_ok("void f() { if(a) x=1; else if(b) x=2; else x=3; }");
        let BlockItem::Stmt(Stmt::If {
            else_branch: Some(else_branch),
            ..
        }) = &body_of(&program)[0]
        else {
            panic!("expected if with else");
        };
        let Stmt::If {
            condition,
            else_branch: Some(last),
            ..
        } = else_branch.as_ref()
        else {
            panic!("expected else-if");
        };
        assert_eq!(condition, &Expr::Ident("b".to_string()));
        assert!(matches!(last.as_ref(), Stmt::Expr(Expr::Assign { .. })));
    }

    #[test]
    fn index_brackets_are_rejected() {
        let err = parse_err("void f() { arr[0] = 1; }");
        assert!(matches!(
            err.kind,
            DiagnosticKind::MissingToken {
                expected: TokenKind::Semicolon,
                ..
            }
        ));
    }
}
