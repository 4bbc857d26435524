//! A small entity language used to drive the runtime end to end.
//!
//! ```text
//! module   := 'module' ID '{' entity* '}'
//! entity   := 'entity' ID ( ';' | '{' feature* '}' )
//! feature  := ID ':' ID ';'
//! ```

use std::rc::Rc;

use lasu::base::Point;
use lasu::parse_tree::{ParseNode, Token};
use lasu::validation::Issue;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+|//[^\n]*")]
enum EntityToken {
    #[token("module")]
    Module,

    #[token("entity")]
    Entity,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

impl EntityToken {
    fn kind(self) -> &'static str {
        match self {
            EntityToken::Module => "MODULE",
            EntityToken::Entity => "ENTITY",
            EntityToken::LBrace => "LBRACE",
            EntityToken::RBrace => "RBRACE",
            EntityToken::Colon => "COLON",
            EntityToken::Semicolon => "SEMI",
            EntityToken::Ident => "ID",
        }
    }
}

/// Tokens of `code`, ending with an EOF token, plus lexical issues for
/// unrecognised input.
pub fn tokenize(code: &str) -> (Vec<Token>, Vec<Issue>) {
    let mut lexer = EntityToken::lexer(code);
    let mut tokens = Vec::new();
    let mut issues = Vec::new();
    let mut point = Point::START;
    let mut offset = 0;
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        point = point.advance(&code[offset..span.start]);
        let text = lexer.slice();
        match result {
            Ok(kind) => tokens.push(Token::new(kind.kind(), text, point)),
            Err(()) => {
                let token = Token::new("ERROR", text, point);
                issues.push(
                    Issue::lexical(format!("token recognition error at: '{text}'"))
                        .with_position(Some(token.position())),
                );
            }
        }
        point = point.advance(text);
        offset = span.end;
    }
    point = point.advance(&code[offset..]);
    tokens.push(Token::eof(point));
    (tokens, issues)
}

pub struct Parsed {
    pub root: Rc<ParseNode>,
    pub lexical_issues: Vec<Issue>,
}

pub fn parse(code: &str) -> Parsed {
    let (tokens, lexical_issues) = tokenize(code);
    let mut parser = Parser { tokens, cursor: 0 };
    Parsed {
        root: Rc::new(parser.module()),
        lexical_issues,
    }
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: &str) -> bool {
        self.current().kind == kind
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is_eof {
            self.cursor += 1;
        }
        token
    }

    /// Consume a `kind` token into `node`, or mark `node` as erroneous.
    fn expect(&mut self, node: &mut ParseNode, label: Option<&str>, kind: &str) -> bool {
        if !self.at(kind) {
            let found = self.current();
            let found = if found.is_eof { "<EOF>".to_string() } else { found.text.clone() };
            node.mark_error(format!("missing {kind} at '{found}'"));
            return false;
        }
        let token = self.bump();
        match label {
            Some(label) => node.push_labelled(label, token),
            None => node.push(token),
        }
        true
    }

    fn module(&mut self) -> ParseNode {
        let mut node = ParseNode::new("module");
        self.expect(&mut node, None, "MODULE");
        self.expect(&mut node, Some("name"), "ID");
        self.expect(&mut node, None, "LBRACE");
        while self.at("ENTITY") {
            let entity = self.entity();
            node.push_labelled("entities", entity);
        }
        self.expect(&mut node, None, "RBRACE");
        while !self.current().is_eof {
            let token = self.bump();
            node.mark_error(format!("extraneous input '{}'", token.text));
            node.push(token);
        }
        node.push(self.bump());
        node
    }

    fn entity(&mut self) -> ParseNode {
        let mut node = ParseNode::new("entity");
        self.expect(&mut node, None, "ENTITY");
        self.expect(&mut node, Some("name"), "ID");
        if self.at("LBRACE") {
            self.expect(&mut node, None, "LBRACE");
            while self.at("ID") {
                let feature = self.feature();
                node.push_labelled("features", feature);
            }
            self.expect(&mut node, None, "RBRACE");
        } else {
            self.expect(&mut node, None, "SEMI");
        }
        node
    }

    fn feature(&mut self) -> ParseNode {
        let mut node = ParseNode::new("feature");
        self.expect(&mut node, Some("name"), "ID");
        self.expect(&mut node, None, "COLON");
        self.expect(&mut node, Some("type"), "ID");
        self.expect(&mut node, None, "SEMI");
        node
    }
}
