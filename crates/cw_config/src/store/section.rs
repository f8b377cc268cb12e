use alloc::string::{String, ToString};
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::store::{DataHolder, Node};

// -----------------------------------------------------------------------------
// Section

/// An ordered string-keyed section of the document tree.
///
/// Keys keep their insertion order; replacing the value of an existing key
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    entries: IndexMap<String, Node>,
    comments: IndexMap<String, Vec<String>>,
}

impl Section {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builder-style insertion, mostly for tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.entries.insert(key.into(), node.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    #[inline]
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.entries.get(key).and_then(Node::as_section)
    }

    #[inline]
    pub fn list(&self, key: &str) -> Option<&ListSection> {
        self.entries.get(key).and_then(Node::as_list)
    }

    /// All comment lines, keyed like the entries they describe.
    pub fn all_comments(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.comments.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl DataHolder for Section {
    #[inline]
    fn get(&self, path: &str) -> Option<&Node> {
        self.entries.get(path)
    }

    #[inline]
    fn set(&mut self, path: &str, node: Node) {
        self.entries.insert(path.to_string(), node);
    }

    fn remove(&mut self, path: &str) -> Option<Node> {
        self.comments.shift_remove(path);
        self.entries.shift_remove(path)
    }

    fn get_subsection(&self, path: &str) -> Option<&dyn DataHolder> {
        match self.entries.get(path)? {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    fn get_subsection_mut(&mut self, path: &str) -> Option<&mut dyn DataHolder> {
        match self.entries.get_mut(path)? {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    fn create_subsection(&mut self, path: &str) -> &mut dyn DataHolder {
        let (index, _) = self
            .entries
            .insert_full(path.to_string(), Node::Section(Section::new()));
        match &mut self.entries[index] {
            Node::Section(section) => section,
            _ => unreachable!("a section was just inserted"),
        }
    }

    fn get_list(&self, path: &str) -> Option<&dyn DataHolder> {
        match self.entries.get(path)? {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    fn create_list(&mut self, path: &str) -> &mut dyn DataHolder {
        let (index, _) = self
            .entries
            .insert_full(path.to_string(), Node::List(ListSection::new()));
        match &mut self.entries[index] {
            Node::List(list) => list,
            _ => unreachable!("a list was just inserted"),
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn set_comments(&mut self, path: &str, lines: &[String]) {
        if lines.is_empty() {
            self.comments.shift_remove(path);
        } else {
            self.comments.insert(path.to_string(), lines.to_vec());
        }
    }

    fn comments(&self, path: &str) -> Option<&[String]> {
        self.comments.get(path).map(Vec::as_slice)
    }
}

// -----------------------------------------------------------------------------
// ListSection

/// A sequence of nodes addressed by positional keys `"0"`, `"1"`, ...
///
/// Writing to a key past the end, or to a non-positional key, appends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSection {
    items: Vec<Node>,
}

impl ListSection {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Node> {
        self.items.iter()
    }

    #[inline]
    pub fn push(&mut self, node: impl Into<Node>) {
        self.items.push(node.into());
    }

    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    fn index(&self, path: &str) -> Option<usize> {
        path.parse::<usize>().ok().filter(|i| *i < self.items.len())
    }

    fn place(&mut self, path: &str, node: Node) -> usize {
        match self.index(path) {
            Some(index) => {
                self.items[index] = node;
                index
            }
            None => {
                self.items.push(node);
                self.items.len() - 1
            }
        }
    }
}

impl From<Vec<Node>> for ListSection {
    #[inline]
    fn from(items: Vec<Node>) -> Self {
        Self { items }
    }
}

impl FromIterator<Node> for ListSection {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl DataHolder for ListSection {
    fn get(&self, path: &str) -> Option<&Node> {
        self.items.get(self.index(path)?)
    }

    fn set(&mut self, path: &str, node: Node) {
        self.place(path, node);
    }

    fn remove(&mut self, path: &str) -> Option<Node> {
        let index = self.index(path)?;
        Some(self.items.remove(index))
    }

    fn get_subsection(&self, path: &str) -> Option<&dyn DataHolder> {
        match self.get(path)? {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    fn get_subsection_mut(&mut self, path: &str) -> Option<&mut dyn DataHolder> {
        let index = self.index(path)?;
        match &mut self.items[index] {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    fn create_subsection(&mut self, path: &str) -> &mut dyn DataHolder {
        let index = self.place(path, Node::Section(Section::new()));
        match &mut self.items[index] {
            Node::Section(section) => section,
            _ => unreachable!("a section was just placed"),
        }
    }

    fn get_list(&self, path: &str) -> Option<&dyn DataHolder> {
        match self.get(path)? {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    fn create_list(&mut self, path: &str) -> &mut dyn DataHolder {
        let index = self.place(path, Node::List(ListSection::new()));
        match &mut self.items[index] {
            Node::List(list) => list,
            _ => unreachable!("a list was just placed"),
        }
    }

    fn keys(&self) -> Vec<String> {
        (0..self.items.len()).map(|i| i.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ListSection, Section};
    use crate::store::{DataHolder, Node, Value};
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn keys_keep_insertion_order() {
        let mut section = Section::new();
        section.set("zeta", Node::from(1_i64));
        section.set("alpha", Node::from(2_i64));
        section.set("mid", Node::from(3_i64));
        section.set("zeta", Node::from(4_i64));

        assert_eq!(section.keys(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(section.get("zeta"), Some(&Node::Value(Value::Int(4))));
    }

    #[test]
    fn create_subsection_replaces_contents() {
        let mut section = Section::new();
        section.create_subsection("inner").set("a", Node::from(true));
        assert!(section.get_subsection("inner").unwrap().is_set("a"));

        let fresh = section.create_subsection("inner");
        assert!(fresh.keys().is_empty());
        assert!(section.get_subsection("inner").is_some());
        assert!(section.get_list("inner").is_none());
    }

    #[test]
    fn string_view_of_leaves() {
        let section = Section::new()
            .with("n", 42_i64)
            .with("s", "text")
            .with("nested", Section::new());

        assert_eq!(section.get_string("n").as_deref(), Some("42"));
        assert_eq!(section.get_string("s").as_deref(), Some("text"));
        assert_eq!(section.get_string("nested"), None);
        assert_eq!(section.get_string("missing"), None);
    }

    #[test]
    fn comments_follow_their_key() {
        let mut section = Section::new().with("port", 8080_i64);
        let lines = vec![String::from("Listening port")];
        section.set_comments("port", &lines);
        assert_eq!(section.comments("port"), Some(lines.as_slice()));

        section.remove("port");
        assert_eq!(section.comments("port"), None);
    }

    #[test]
    fn list_positional_keys() {
        let mut list = ListSection::new();
        list.set("0", Node::from("a"));
        list.set("1", Node::from("b"));
        list.set("7", Node::from("c"));
        list.set("1", Node::from("B"));

        assert_eq!(list.keys(), vec!["0", "1", "2"]);
        assert_eq!(list.get_string("1").as_deref(), Some("B"));
        assert_eq!(list.get_string("2").as_deref(), Some("c"));
        assert!(list.get("3").is_none());
        assert!(list.get("x").is_none());

        let nested = list.create_subsection("3");
        nested.set("x", Node::from(1_i64));
        assert_eq!(list.len(), 4);
        assert!(list.get_subsection("3").unwrap().is_set("x"));
    }
}
