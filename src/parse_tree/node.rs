//! Parse trees as produced by external parsers.

use std::rc::Rc;

use smol_str::SmolStr;

use crate::base::{Point, Position};
use crate::validation::Issue;

/// A terminal of a parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SmolStr,
    pub text: String,
    pub start: Point,
    /// End-of-input marker; covers no text
    pub is_eof: bool,
}

impl Token {
    pub fn new(kind: impl Into<SmolStr>, text: impl Into<String>, start: Point) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            start,
            is_eof: false,
        }
    }

    pub fn eof(start: Point) -> Self {
        Self {
            kind: SmolStr::new_static("EOF"),
            text: String::new(),
            start,
            is_eof: true,
        }
    }

    pub fn end(&self) -> Point {
        if self.is_eof {
            self.start
        } else {
            self.start.advance(&self.text)
        }
    }

    pub fn position(&self) -> Position {
        span(self.start, self.end())
    }
}

/// A child of a [`ParseNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseChild {
    Node(Rc<ParseNode>),
    Token(Token),
}

impl From<ParseNode> for ParseChild {
    fn from(node: ParseNode) -> Self {
        ParseChild::Node(Rc::new(node))
    }
}

impl From<Rc<ParseNode>> for ParseChild {
    fn from(node: Rc<ParseNode>) -> Self {
        ParseChild::Node(node)
    }
}

impl From<Token> for ParseChild {
    fn from(token: Token) -> Self {
        ParseChild::Token(token)
    }
}

/// A rule application in a parse tree.
///
/// Children may carry a label naming their role in the rule, so child
/// getters can ask for "the `name` token" rather than "the second child".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseNode {
    rule: SmolStr,
    children: Vec<(Option<SmolStr>, ParseChild)>,
    /// Set when the parser recovered from an error inside this rule
    error: Option<String>,
}

impl ParseNode {
    pub fn new(rule: impl Into<SmolStr>) -> Self {
        Self {
            rule: rule.into(),
            ..Self::default()
        }
    }

    /// A node the parser built while recovering from `message`.
    pub fn error(rule: impl Into<SmolStr>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Record that the parser recovered from `message` inside this rule.
    /// The first recorded message is kept.
    pub fn mark_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    pub fn push(&mut self, child: impl Into<ParseChild>) {
        self.children.push((None, child.into()));
    }

    pub fn push_labelled(&mut self, label: impl Into<SmolStr>, child: impl Into<ParseChild>) {
        self.children.push((Some(label.into()), child.into()));
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, child: impl Into<ParseChild>) -> Self {
        self.push(child);
        self
    }

    /// Builder form of [`push_labelled`](Self::push_labelled)
    pub fn with_labelled(
        mut self,
        label: impl Into<SmolStr>,
        child: impl Into<ParseChild>,
    ) -> Self {
        self.push_labelled(label, child);
        self
    }

    pub fn rule(&self) -> &SmolStr {
        &self.rule
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = &ParseChild> {
        self.children.iter().map(|(_, child)| child)
    }

    /// Child rule applications, in order
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Rc<ParseNode>> {
        self.children().filter_map(|child| match child {
            ParseChild::Node(node) => Some(node),
            ParseChild::Token(_) => None,
        })
    }

    /// Children labelled `label`, in order
    pub fn labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a ParseChild> + 'a {
        self.children
            .iter()
            .filter(move |(l, _)| l.as_deref() == Some(label))
            .map(|(_, child)| child)
    }

    /// The first child node labelled `label`
    pub fn node(&self, label: &str) -> Option<&Rc<ParseNode>> {
        self.children.iter().find_map(|(l, child)| match child {
            ParseChild::Node(node) if l.as_deref() == Some(label) => Some(node),
            _ => None,
        })
    }

    pub fn nodes_labelled<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = &'a Rc<ParseNode>> + 'a {
        self.labelled(label).filter_map(|child| match child {
            ParseChild::Node(node) => Some(node),
            ParseChild::Token(_) => None,
        })
    }

    /// The first token labelled `label`
    pub fn token(&self, label: &str) -> Option<&Token> {
        self.children.iter().find_map(|(l, child)| match child {
            ParseChild::Token(token) if l.as_deref() == Some(label) => Some(token),
            _ => None,
        })
    }

    /// Child nodes applying `rule`
    pub fn nodes_of_rule<'a>(
        &'a self,
        rule: &'a str,
    ) -> impl Iterator<Item = &'a Rc<ParseNode>> + 'a {
        self.nodes().filter(move |node| node.rule == rule)
    }

    /// Tokens covered by this node, in order
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        let mut stack: Vec<&ParseChild> = self.children().rev().collect();
        while let Some(child) = stack.pop() {
            match child {
                ParseChild::Token(token) => tokens.push(token),
                ParseChild::Node(node) => stack.extend(node.children().rev()),
            }
        }
        tokens
    }

    /// From the start of the first token to the end of the last one.
    ///
    /// Erroneous nodes whose last token precedes the first get a zero-width
    /// position at the first token.
    pub fn position(&self) -> Option<Position> {
        let tokens = self.tokens();
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(span(first.start, last.end()))
    }

    /// Token texts joined, with line breaks and spaces standing in for the
    /// gaps between tokens.
    ///
    /// Input the lexer skipped (comments, tabs, `\r\n`) is not recovered;
    /// [`source_text`](Self::source_text) slices the exact input instead.
    pub fn text(&self) -> String {
        let tokens = self.tokens();
        let mut text = String::new();
        let mut cursor: Option<Point> = None;
        for token in tokens.into_iter().filter(|t| !t.is_eof) {
            if let Some(end) = cursor {
                push_gap(&mut text, end, token.start);
            }
            text.push_str(&token.text);
            cursor = Some(token.end());
        }
        text
    }

    /// The exact input covered by this node, if `code` is the text it was
    /// parsed from.
    pub fn source_text<'a>(&self, code: &'a str) -> Option<&'a str> {
        self.position()?.text(code)
    }

    /// This node and its descendant nodes, depth-first
    pub fn walk(self: &Rc<Self>) -> Vec<Rc<ParseNode>> {
        let mut nodes = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            stack.extend(node.nodes().rev().cloned());
            nodes.push(node);
        }
        nodes
    }

    /// A syntactic issue for each erroneous node of the tree.
    pub fn issues_for_errors(self: &Rc<Self>) -> Vec<Issue> {
        self.walk()
            .iter()
            .filter_map(|node| {
                node.error
                    .as_ref()
                    .map(|message| Issue::syntactic(message.clone()).with_position(node.position()))
            })
            .collect()
    }
}

fn span(start: Point, end: Point) -> Position {
    Position::new(start, end).unwrap_or_else(|_| Position::degenerate(start))
}

/// Whitespace standing for the gap between two tokens.
fn push_gap(text: &mut String, from: Point, to: Point) {
    if to.line > from.line {
        text.extend(std::iter::repeat_n('\n', to.line - from.line));
        text.extend(std::iter::repeat_n(' ', to.column));
    } else if to.column > from.column {
        text.extend(std::iter::repeat_n(' ', to.column - from.column));
    }
}
