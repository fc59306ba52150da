//! Thread-local parser pooling.
//!
//! A directory scan parses every candidate file with the same grammar, so
//! the parser is created on first use per thread and reused afterwards.

use crate::ts::{RubyParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static RUBY_PARSER: RefCell<Option<RubyParser>> = const { RefCell::new(None) };
}

/// Run `f` with this thread's parser, creating it on first use.
///
/// Fails only when the Ruby grammar cannot be loaded; a failed creation
/// leaves the slot empty so the next call tries again.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ruby_outline::pool::with_parser;
///
/// let tree = with_parser(|parser| parser.parse("class Foo; end"))??;
/// assert_eq!(tree.root_node().kind(), "program");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut RubyParser) -> R,
{
    RUBY_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => RubyParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_warm() -> bool {
        RUBY_PARSER.with(|cell| cell.borrow().is_some())
    }

    #[test]
    fn parser_stays_in_slot_after_use() {
        std::thread::spawn(|| {
            assert!(!is_warm());
            with_parser(|_| ()).unwrap();
            assert!(is_warm());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn pooled_parser_is_reused() {
        let first = with_parser(|parser| {
            parser
                .parse("module A; end")
                .map(|tree| tree.root_node().kind().to_string())
        })
        .unwrap()
        .unwrap();
        let second = with_parser(|parser| {
            parser
                .parse("class B; end")
                .map(|tree| tree.root_node().named_child_count())
        })
        .unwrap()
        .unwrap();

        assert_eq!(first, "program");
        assert_eq!(second, 1);
    }
}
