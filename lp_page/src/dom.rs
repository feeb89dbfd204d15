//! The slice of the DOM the page behaviours need.

/// The selector forms the behaviours use. [`crate::MemDocument`] matches
/// these directly; browsers get [`Selector::to_css`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector<'a> {
    Tag(&'a str),
    Class(&'a str),
    TagClass(&'a str, &'a str),
    AttrEquals(&'a str, &'a str),
    TagAttrEquals(&'a str, &'a str, &'a str),
}

impl Selector<'_> {
    pub fn to_css(&self) -> String {
        match self {
            Selector::Tag(tag) => (*tag).to_string(),
            Selector::Class(class) => format!(".{class}"),
            Selector::TagClass(tag, class) => format!("{tag}.{class}"),
            Selector::AttrEquals(name, value) => format!("[{name}=\"{value}\"]"),
            Selector::TagAttrEquals(tag, name, value) => format!("{tag}[{name}=\"{value}\"]"),
        }
    }
}

fn is_js_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// `String.prototype.trim`: Unicode white space plus the byte-order mark.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(is_js_space)
}

pub(crate) fn trim_text_start(text: &str) -> &str {
    text.trim_start_matches(is_js_space)
}

/// Document operations, implemented by `web_sys` in the browser and by
/// [`crate::MemDocument`] natively.
///
/// Mutations are infallible; a host whose DOM calls return errors drops them.
pub trait Dom {
    type Node: Clone;

    /// The `<html>` element; scope for document-wide queries.
    fn root(&self) -> Self::Node;
    fn body(&self) -> Option<Self::Node>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: &Self::Node, selector: Selector<'_>) -> Vec<Self::Node>;

    fn query(&self, scope: &Self::Node, selector: Selector<'_>) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Flip `class`; returns whether it is present afterwards.
    fn toggle_class(&mut self, node: &Self::Node, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    fn text_content(&self, node: &Self::Node) -> String;

    /// Current value of a form control, `None` for other elements.
    fn input_value(&self, node: &Self::Node) -> Option<String>;

    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;

    /// Append `child` to `parent`, detaching it from its current parent.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

    fn click(&mut self, node: &Self::Node);

    /// Blocking user-facing message (`window.alert`).
    fn alert(&mut self, message: &str);
}
