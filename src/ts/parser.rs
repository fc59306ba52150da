use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for Ruby source code.
pub struct RubyParser {
    parser: Parser,
}

impl RubyParser {
    /// Create a new Ruby parser.
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        // The Ruby grammar ships with ast-grep-language
        let ts_lang = SupportLang::Ruby.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse source code into a [`ParsedTree`] that can report recovered errors.
    pub fn parse_tree(&mut self, source: &str) -> Result<ParsedTree, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedTree { tree })
    }
}

/// A tree-sitter tree plus error inspection helpers.
pub struct ParsedTree {
    pub tree: Tree,
}

impl ParsedTree {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Get all ERROR and MISSING nodes in the tree, in document order.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        if self.has_errors() {
            collect_error_nodes(self.tree.root_node(), &mut errors);
        }
        errors
    }

    /// Turn the first recorded error into a [`TreeSitterError`].
    ///
    /// A file is rejected as a whole when the grammar had to recover from
    /// anything, since recovered trees carry unreliable declaration extents.
    pub fn check_syntax(&self) -> Result<(), TreeSitterError> {
        let errors = self.error_nodes();
        match errors.as_slice() {
            [] => Ok(()),
            [only] => Err(TreeSitterError::SyntaxError {
                line: only.line(),
                column: only.column(),
            }),
            [first, ..] => Err(TreeSitterError::MultipleSyntaxErrors {
                count: errors.len(),
                line: first.line(),
                column: first.column(),
            }),
        }
    }
}

/// Where an ERROR or MISSING node starts in the parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorNode {
    pub start_point: tree_sitter::Point,
}

impl ErrorNode {
    /// 1-indexed line of the error start.
    pub fn line(&self) -> usize {
        self.start_point.row + 1
    }

    /// 1-indexed column of the error start.
    pub fn column(&self) -> usize {
        self.start_point.column + 1
    }
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            start_point: node.start_position(),
        });
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ruby() {
        let mut parser = RubyParser::new().unwrap();
        let source = "class Foo\n  def bar\n    42\n  end\nend\n";
        let parsed = parser.parse_tree(source).unwrap();

        assert!(!parsed.has_errors());
        assert!(parsed.check_syntax().is_ok());
        assert_eq!(parsed.root_node().kind(), "program");
    }

    #[test]
    fn parse_invalid_ruby() {
        let mut parser = RubyParser::new().unwrap();
        let source = "class Broken\n  def oops(\n";
        let parsed = parser.parse_tree(source).unwrap();

        assert!(parsed.has_errors());
        assert!(!parsed.error_nodes().is_empty());

        let err = parsed.check_syntax().unwrap_err();
        assert!(err.is_syntax_error());
        assert!(err.to_string().contains("line"));
    }

    #[test]
    fn errors_are_reported_in_document_order() {
        let mut parser = RubyParser::new().unwrap();
        let source = "class A\n  def ok\n  end\nend\n\nclass B\n  def oops(\n";
        let parsed = parser.parse_tree(source).unwrap();

        let errors = parsed.error_nodes();
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|e| e.line() >= 1 && e.column() >= 1));
        assert!(errors.windows(2).all(|w| w[0].start_point <= w[1].start_point));
    }
}
