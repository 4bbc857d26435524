use std::rc::Rc;

use smol_str::SmolStr;
use tracing::debug;

use crate::base::{Position, Source};
use crate::model::{Ast, NodeId, Origin};
use crate::transformation::{AstTransformer, SourceNode, TransformError};
use crate::validation::AstResult;

use super::node::ParseNode;

/// An origin pointing at a parse-tree node.
///
/// Source text is only available when the code the tree was parsed from is
/// attached with [`with_code`](Self::with_code).
#[derive(Debug, Clone)]
pub struct ParseTreeOrigin {
    pub node: Rc<ParseNode>,
    pub code: Option<Rc<str>>,
    pub source: Option<Source>,
}

impl ParseTreeOrigin {
    pub fn new(node: Rc<ParseNode>) -> Self {
        Self {
            node,
            code: None,
            source: None,
        }
    }

    pub fn with_code(mut self, code: Rc<str>) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }
}

impl Origin for ParseTreeOrigin {
    fn position(&self) -> Option<Position> {
        let position = self.node.position()?;
        Some(match &self.source {
            Some(source) => position.with_source(source.clone()),
            None => position,
        })
    }

    fn source_text(&self) -> Option<String> {
        let code = self.code.as_deref()?;
        self.node.source_text(code).map(str::to_owned)
    }
}

impl SourceNode for Rc<ParseNode> {
    /// Rule name
    type Kind = SmolStr;

    fn kind(&self) -> SmolStr {
        self.rule().clone()
    }

    fn as_origin(&self) -> Option<Rc<dyn Origin>> {
        Some(Rc::new(ParseTreeOrigin::new(self.clone())))
    }

    fn from_origin(origin: &dyn Origin) -> Option<Self> {
        origin
            .downcast_ref::<ParseTreeOrigin>()
            .map(|origin| origin.node.clone())
    }
}

/// Transformer from parse trees, keyed by rule name.
pub type ParseTreeToAstTransformer = AstTransformer<Rc<ParseNode>>;

impl AstTransformer<Rc<ParseNode>> {
    /// Transform a whole parse tree.
    ///
    /// Parser recovery points become syntactic issues of the result, ahead
    /// of the issues raised while transforming.
    pub fn transform_parse_tree(
        &mut self,
        root: &Rc<ParseNode>,
    ) -> Result<AstResult, TransformError> {
        let syntax_issues = root.issues_for_errors();
        debug!(
            "[PARSE_TREE] transforming {} with {} syntax issue(s)",
            root.rule(),
            syntax_issues.len()
        );
        let mut result = self.transform_to_result(root)?;
        let mut issues = syntax_issues;
        issues.append(&mut result.issues);
        result.issues = issues;
        Ok(result)
    }

    /// Like [`transform_parse_tree`](Self::transform_parse_tree), for a tree
    /// parsed from `code`.
    ///
    /// Node origins can then return the exact source text they cover, and
    /// node and issue positions carry `source` when one is given.
    pub fn transform_parsed_code(
        &mut self,
        root: &Rc<ParseNode>,
        code: &str,
        source: Option<Source>,
    ) -> Result<AstResult, TransformError> {
        let mut result = self.transform_parse_tree(root)?;
        attach_input(&mut result.ast, &Rc::from(code), source.as_ref());
        if let Some(source) = &source {
            for issue in &mut result.issues {
                issue.position = issue.position.take().map(|position| match position.source {
                    Some(_) => position,
                    None => position.with_source(source.clone()),
                });
            }
        }
        Ok(result)
    }
}

/// Rewrite the parse-tree origins of `ast` to carry the input they came from.
fn attach_input(ast: &mut Ast, code: &Rc<str>, source: Option<&Source>) {
    let ids: Vec<NodeId> = ast.node_ids().collect();
    for id in ids {
        let Some(origin) = ast
            .origin(id)
            .and_then(|origin| (**origin).downcast_ref::<ParseTreeOrigin>())
        else {
            continue;
        };
        let mut origin = origin.clone().with_code(code.clone());
        if let Some(source) = source {
            origin = origin.with_source(source.clone());
        }
        let origin: Rc<dyn Origin> = Rc::new(origin);
        ast.set_origin(id, Some(origin));
    }
}
