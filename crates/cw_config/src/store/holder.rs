use alloc::string::String;
use alloc::vec::Vec;

use crate::store::{Node, Value};

/// Key under which a polymorphic value records its concrete type.
pub const TYPE_KEY: &str = "=type";

// -----------------------------------------------------------------------------
// DataHolder

/// A hierarchical container addressed by string keys.
///
/// [`Section`](crate::store::Section) holders use arbitrary keys;
/// [`ListSection`](crate::store::ListSection) holders use positional keys
/// `"0"`, `"1"`, ... in order.
///
/// Converters only see this trait, never the concrete tree, so that custom
/// stores can be plugged in.
pub trait DataHolder {
    fn get(&self, path: &str) -> Option<&Node>;

    fn set(&mut self, path: &str, node: Node);

    /// Removes the entry, returning it.
    fn remove(&mut self, path: &str) -> Option<Node>;

    fn get_subsection(&self, path: &str) -> Option<&dyn DataHolder>;

    fn get_subsection_mut(&mut self, path: &str) -> Option<&mut dyn DataHolder>;

    /// Replaces whatever is at `path` with an empty section.
    fn create_subsection(&mut self, path: &str) -> &mut dyn DataHolder;

    fn get_list(&self, path: &str) -> Option<&dyn DataHolder>;

    /// Replaces whatever is at `path` with an empty list.
    fn create_list(&mut self, path: &str) -> &mut dyn DataHolder;

    /// Keys in insertion order.
    fn keys(&self) -> Vec<String>;

    #[inline]
    fn is_set(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Textual form of a leaf value, `None` for absent keys and non-leaves.
    fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(Node::as_value).map(Value::to_text)
    }

    /// Attaches comment lines to a key. Holders without comments ignore it.
    fn set_comments(&mut self, _path: &str, _lines: &[String]) {}

    fn comments(&self, _path: &str) -> Option<&[String]> {
        None
    }
}
