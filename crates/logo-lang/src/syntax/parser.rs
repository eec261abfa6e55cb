use std::collections::HashMap;

use crate::error::{Error, ErrorCode};
use crate::syntax::ast::{Arity, Opcode, Operator, Span};
use crate::syntax::cst::*;
use crate::syntax::token::{Token, TokenKind};

/// Shape of one argument slot in a built-in command's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgKind {
    Expr,
    /// `[ expr ]` or a bare expression.
    Condition,
    Block,
    Point,
    Colour,
    Word,
}

fn signature(opcode: Opcode) -> &'static [ArgKind] {
    use ArgKind as K;
    match opcode {
        Opcode::Forward | Opcode::Back | Opcode::Right | Opcode::Left
        | Opcode::SetX | Opcode::SetY | Opcode::SetHeading
        | Opcode::SetPenSize | Opcode::Show => &[K::Expr],
        Opcode::SetXY | Opcode::Arc => &[K::Expr, K::Expr],
        Opcode::SetPos => &[K::Point],
        Opcode::SetPenColor => &[K::Colour],
        Opcode::SetPalette => &[K::Expr, K::Colour],
        Opcode::If => &[K::Condition, K::Block],
        Opcode::IfElse => &[K::Condition, K::Block, K::Block],
        Opcode::Repeat => &[K::Expr, K::Block],
        Opcode::Forever => &[K::Block],
        Opcode::Make => &[K::Word, K::Expr],
        Opcode::PenUp | Opcode::PenDown | Opcode::Home | Opcode::Stop | Opcode::Bye
        | Opcode::To => &[],
    }
}

/// Operand count taken by the bare prefix form. The parenthesised form is variadic.
fn prefix_arity(op: Operator) -> usize {
    match op.arity() {
        Arity::Exactly(n) => n,
        Arity::OneOrTwo if op == Operator::Quotient => 2,
        Arity::OneOrTwo => 1,
        Arity::Any => 2,
    }
}

fn is_reserved(name: &str) -> bool {
    Opcode::from_keyword(name).is_some() || Operator::from_name(name).is_some()
}

/// Collects `to NAME :a :b` headers so calls know how many arguments follow.
fn scan_definitions(tokens: &[Token]) -> HashMap<String, usize> {
    let mut arities = HashMap::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind == TokenKind::To {
            if let Some(TokenKind::Ident(name)) = tokens.get(i + 1).map(|t| &t.kind) {
                let arity = tokens[i + 2..]
                    .iter()
                    .take_while(|t| matches!(t.kind, TokenKind::Variable(_)))
                    .count();
                arities.entry(name.clone()).or_insert(arity);
                i += 1 + arity;
            }
        }
        i += 1;
    }
    arities
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arities: HashMap<String, usize>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let arities = scan_definitions(&tokens);
        Self { tokens, pos: 0, arities }
    }

    pub fn parse(mut self) -> Result<SyntaxTree, Vec<Error>> {
        let mut errors = Vec::new();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let pos_before = self.pos;

            match self.parse_statement(true) {
                Ok(s) => statements.push(s),
                Err(e) => { errors.push(e); self.recover(); }
            }

            // guarantee progress on unrecognised tokens
            if self.pos == pos_before {
                self.advance();
            }
        }

        if errors.is_empty() {
            Ok(SyntaxTree { statements })
        } else {
            Err(errors)
        }
    }

    /// Parses a single standalone expression, rejecting trailing tokens.
    pub fn parse_expression(mut self) -> Result<Expr, Vec<Error>> {
        let expr = self.parse_expr().map_err(|e| vec![e])?;
        if !self.is_at_end() {
            return Err(vec![self.unexpected("end of input")]);
        }
        Ok(expr)
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_statement(&mut self, top_level: bool) -> Result<Statement, Error> {
        let tok = self.peek().clone();
        let span = Span::new(tok.line, tok.column);

        match tok.kind.clone() {
            TokenKind::To if top_level => self.parse_definition(),
            TokenKind::To => Err(Error::new(ErrorCode::P004, tok.line, tok.column,
                "procedures can only be defined at top level")),
            TokenKind::Ident(name) => {
                self.advance();
                if let Some(opcode) = Opcode::from_keyword(&name) {
                    let args = signature(opcode)
                        .iter()
                        .map(|kind| self.parse_argument(*kind))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Statement::Command { opcode, args, span })
                } else if Operator::from_name(&name).is_some() {
                    Err(self.error_at(&tok, &format!("`{name}` produces a value, expected a command")))
                } else {
                    let args = self.parse_call_args(&name)?;
                    Ok(Statement::Call { name, args, span })
                }
            }
            _ => Err(self.unexpected("command")),
        }
    }

    fn parse_definition(&mut self) -> Result<Statement, Error> {
        let span = self.span();
        self.expect(TokenKind::To)?;

        let tok = self.advance();
        let name = match tok.kind {
            TokenKind::Ident(ref name) if is_reserved(name) => {
                return Err(Error::new(ErrorCode::P003, tok.line, tok.column,
                    format!("`{name}` is reserved and cannot name a procedure")));
            }
            TokenKind::Ident(name) => name,
            ref kind if kind.is_keyword() => {
                return Err(Error::new(ErrorCode::P003, tok.line, tok.column,
                    format!("{kind:?} is reserved and cannot name a procedure")));
            }
            _ => {
                return Err(Error::new(ErrorCode::P002, tok.line, tok.column,
                    "expected procedure name after `to`"));
            }
        };

        let mut params = Vec::new();
        while let TokenKind::Variable(p) = self.peek_kind() {
            self.advance();
            params.push(p);
        }

        let mut body = Vec::new();
        while !self.check(TokenKind::End) && !self.is_at_end() {
            body.push(self.parse_statement(false)?);
        }
        self.expect(TokenKind::End)?;

        Ok(Statement::Definition { name, params, body, span })
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, Error> {
        self.expect(TokenKind::LBracket)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBracket) && !self.is_at_end() {
            stmts.push(self.parse_statement(false)?);
        }
        self.expect(TokenKind::RBracket)?;
        Ok(stmts)
    }

    // ─── Arguments ───────────────────────────────────────────────────────────

    fn parse_argument(&mut self, kind: ArgKind) -> Result<Argument, Error> {
        match kind {
            ArgKind::Expr => Ok(Argument::Expr(self.parse_expr()?)),
            ArgKind::Condition => {
                if self.matches(TokenKind::LBracket) {
                    let cond = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    Ok(Argument::Expr(cond))
                } else {
                    Ok(Argument::Expr(self.parse_expr()?))
                }
            }
            ArgKind::Block => Ok(Argument::Block(self.parse_block()?)),
            ArgKind::Point => {
                self.expect(TokenKind::LBracket)?;
                let x = self.parse_expr()?;
                let y = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                Ok(Argument::Point(x, y))
            }
            ArgKind::Colour => {
                let span = self.span();
                match self.peek_kind() {
                    TokenKind::Word(w) => {
                        self.advance();
                        Ok(Argument::Colour(ColourArg::Word(w, span)))
                    }
                    TokenKind::LBracket => {
                        self.advance();
                        let rgb = [self.parse_expr()?, self.parse_expr()?, self.parse_expr()?];
                        self.expect(TokenKind::RBracket)?;
                        Ok(Argument::Colour(ColourArg::Rgb(Box::new(rgb))))
                    }
                    _ => Ok(Argument::Colour(ColourArg::Index(self.parse_expr()?))),
                }
            }
            ArgKind::Word => {
                let tok = self.advance();
                match tok.kind {
                    TokenKind::Word(w) => Ok(Argument::Word(w, Span::new(tok.line, tok.column))),
                    other => Err(Error::new(ErrorCode::P002, tok.line, tok.column,
                        format!("expected a quoted name, found {other:?}"))),
                }
            }
        }
    }

    /// A known procedure takes exactly its declared arity; an unknown one takes
    /// every following expression.
    fn parse_call_args(&mut self, name: &str) -> Result<Vec<Expr>, Error> {
        match self.arities.get(name).copied() {
            Some(n) => (0..n).map(|_| self.parse_expr()).collect(),
            None => {
                let mut args = Vec::new();
                while self.starts_expression() {
                    args.push(self.parse_expr()?);
                }
                Ok(args)
            }
        }
    }

    fn starts_expression(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Number(_) | TokenKind::Variable(_) | TokenKind::Thing
            | TokenKind::Minus | TokenKind::Negate | TokenKind::LParen => true,
            TokenKind::Ident(name) => Operator::from_name(&name).is_some(),
            _ => false,
        }
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    pub(crate) fn parse_expr(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt    => InfixOp::Lt,
                TokenKind::LtEq  => InfixOp::LtEq,
                TokenKind::Gt    => InfixOp::Gt,
                TokenKind::GtEq  => InfixOp::GtEq,
                TokenKind::Eq    => InfixOp::Eq,
                TokenKind::NotEq => InfixOp::NotEq,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::Infix { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus  => InfixOp::Add,
                TokenKind::Minus => InfixOp::Sub,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Infix { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star    => InfixOp::Mul,
                TokenKind::Slash   => InfixOp::Div,
                TokenKind::Percent => InfixOp::Rem,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Infix { op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        if self.matches(TokenKind::Minus) || self.matches(TokenKind::Negate) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Negate { operand: Box::new(operand), span });
        }
        self.parse_power()
    }

    /// `^` binds tighter than unary minus and associates to the right.
    fn parse_power(&mut self) -> Result<Expr, Error> {
        let base = self.parse_primary()?;
        if self.check(TokenKind::Caret) {
            let span = base.span();
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Infix { op: InfixOp::Pow, left: Box::new(base), right: Box::new(exponent), span });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let tok = self.peek().clone();
        let span = Span::new(tok.line, tok.column);

        match tok.kind.clone() {
            TokenKind::Number(text) => { self.advance(); Ok(Expr::Number(text, span)) }
            TokenKind::Variable(name) => { self.advance(); Ok(Expr::Variable(name, span)) }

            TokenKind::Thing => {
                self.advance();
                let word = self.advance();
                match word.kind {
                    TokenKind::Word(name) => Ok(Expr::Thing(name.to_ascii_lowercase(), span)),
                    other => Err(Error::new(ErrorCode::P002, word.line, word.column,
                        format!("expected a quoted name after `thing`, found {other:?}"))),
                }
            }

            // `(op a b c)` variadic form, or a grouped expression
            TokenKind::LParen => {
                self.advance();
                if let TokenKind::Ident(name) = self.peek_kind() {
                    if let Some(op) = Operator::from_name(&name) {
                        self.advance();
                        let mut args = Vec::new();
                        while !self.check(TokenKind::RParen) && !self.is_at_end() {
                            args.push(self.parse_expr()?);
                        }
                        self.expect(TokenKind::RParen)?;
                        return Ok(Expr::Prefix { op, args, span });
                    }
                }
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Group(Box::new(inner), span))
            }

            TokenKind::Ident(name) => {
                if let Some(op) = Operator::from_name(&name) {
                    self.advance();
                    let args = (0..prefix_arity(op))
                        .map(|_| self.parse_expr())
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expr::Prefix { op, args, span })
                } else if self.arities.contains_key(&name) {
                    Err(Error::new(ErrorCode::P005, tok.line, tok.column,
                        format!("procedure `{name}` does not output a value")))
                } else {
                    Err(self.error_at(&tok, &format!("unknown operator `{name}`")))
                }
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(Error::new(
                ErrorCode::P002,
                tok.line,
                tok.column,
                format!("expected {:?}, found {:?}", kind, tok.kind),
            ))
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn unexpected(&self, expected: &str) -> Error {
        let tok = self.peek();
        Error::new(
            ErrorCode::P001,
            tok.line,
            tok.column,
            format!("expected {}, found {:?}", expected, tok.kind),
        )
    }

    fn error_at(&self, tok: &Token, msg: &str) -> Error {
        Error::new(ErrorCode::P001, tok.line, tok.column, msg)
    }

    /// Skip tokens until something that can start a new top-level statement.
    fn recover(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof | TokenKind::To => break,
                TokenKind::Ident(name)
                    if Opcode::from_keyword(&name).is_some() || self.arities.contains_key(&name) => break,
                _ => { self.advance(); }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
