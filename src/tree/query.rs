//! Read-only searches over a built declaration tree.

use crate::tree::node::{Node, NodeKind};

impl Node {
    /// Every node in this subtree (this node included) for which `matcher`
    /// holds, in preorder.
    pub fn find_all<F>(&self, mut matcher: F) -> Vec<&Node>
    where
        F: FnMut(&Node) -> bool,
    {
        let mut found = Vec::new();
        collect_matches(self, &mut matcher, &mut found);
        found
    }

    pub fn find_by_name(&self, name: &str) -> Vec<&Node> {
        self.find_all(|node| node.name() == Some(name))
    }

    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.find_all(|node| node.kind() == kind)
    }

    /// Preorder iterator over this subtree, starting with this node.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of declarations below this node.
    pub fn descendant_count(&self) -> usize {
        self.walk().count() - 1
    }
}

fn collect_matches<'a, F>(node: &'a Node, matcher: &mut F, found: &mut Vec<&'a Node>)
where
    F: FnMut(&Node) -> bool,
{
    if matcher(node) {
        found.push(node);
    }
    for child in node.children() {
        collect_matches(child, matcher, found);
    }
}

/// Depth-first preorder traversal, see [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use crate::outline_source;
    use crate::tree::NodeKind;

    const SOURCE: &str = r#"module Shop
  class Cart
    def total
    end

    def self.build
    end
  end

  class Order
    def total
    end
  end
end
"#;

    #[test]
    fn finds_every_node_with_name_in_preorder() {
        let root = outline_source("shop.rb", SOURCE).unwrap();

        let totals = root.find_by_name("total");
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].first_line(), Some(3));
        assert_eq!(totals[1].first_line(), Some(11));
    }

    #[test]
    fn empty_when_nothing_matches() {
        let root = outline_source("shop.rb", SOURCE).unwrap();

        assert!(root.find_by_name("missing").is_empty());
    }

    #[test]
    fn predicate_may_match_the_starting_node() {
        let root = outline_source("shop.rb", SOURCE).unwrap();

        let roots = root.find_all(|node| node.is_root());
        assert_eq!(roots.len(), 1);
        assert!(std::ptr::eq(roots[0], &root));
    }

    #[test]
    fn search_is_scoped_to_the_subtree() {
        let root = outline_source("shop.rb", SOURCE).unwrap();
        let order = root.find_by_name("Order")[0];

        let totals = order.find_by_name("total");
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].first_line(), Some(11));
    }

    #[test]
    fn walk_matches_find_all_order() {
        let root = outline_source("shop.rb", SOURCE).unwrap();

        let walked: Vec<_> = root.walk().map(|node| node.name()).collect();
        let found: Vec<_> = root
            .find_all(|_| true)
            .into_iter()
            .map(|node| node.name())
            .collect();

        assert_eq!(walked, found);
        assert_eq!(
            walked,
            vec![
                None,
                Some("Shop"),
                Some("Cart"),
                Some("total"),
                Some("build"),
                Some("Order"),
                Some("total"),
            ]
        );
        assert_eq!(root.descendant_count(), 6);
    }

    #[test]
    fn find_by_kind_filters_variants() {
        let root = outline_source("shop.rb", SOURCE).unwrap();

        assert_eq!(root.find_by_kind(NodeKind::Class).len(), 2);
        assert_eq!(root.find_by_kind(NodeKind::ClassMethod).len(), 1);
        assert_eq!(root.find_by_kind(NodeKind::InstanceMethod).len(), 2);
    }

    #[test]
    fn concurrent_readers_share_the_tree() {
        let root = outline_source("shop.rb", SOURCE).unwrap();

        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["total", "Cart", "build"]
                .into_iter()
                .map(|name| {
                    let root = &root;
                    scope.spawn(move || root.find_by_name(name).len())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(counts, vec![2, 1, 1]);
    }
}
