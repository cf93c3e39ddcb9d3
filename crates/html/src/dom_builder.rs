//! DOM construction from a token stream.
//!
//! Nodes are accumulated in a flat arena and linked by index, then converted
//! into the owned [`Node`] tree at the end. Mis-nested end tags pop the open
//! element stack to the nearest matching open element; an end tag with no
//! matching open element is ignored.

use crate::types::{Id, Node, Token};

pub fn build_dom(tokens: &[Token]) -> Node {
    let mut arena = NodeArena::new();
    let root = arena.push(ArenaNode::Document {
        doctype: None,
        children: Vec::new(),
    });

    let mut open_elements: Vec<usize> = Vec::new();

    for token in tokens {
        match token {
            Token::Doctype(s) => {
                arena.set_doctype(root, s.clone());
            }
            Token::Comment(c) => {
                let parent = open_elements.last().copied().unwrap_or(root);
                arena.add_child(parent, ArenaNode::Comment { text: c.clone() });
            }
            Token::Text(t) => {
                if !t.is_empty() {
                    let parent = open_elements.last().copied().unwrap_or(root);
                    arena.add_child(parent, ArenaNode::Text { text: t.clone() });
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let parent = open_elements.last().copied().unwrap_or(root);
                let index = arena.add_child(
                    parent,
                    ArenaNode::Element {
                        name: name.clone(),
                        attributes: attributes.clone(),
                        children: Vec::new(),
                    },
                );
                if !*self_closing {
                    open_elements.push(index);
                }
            }
            Token::EndTag(name) => {
                if open_elements
                    .iter()
                    .any(|&idx| arena.is_element_named(idx, name))
                {
                    while let Some(open) = open_elements.pop() {
                        if arena.is_element_named(open, name) {
                            break;
                        }
                    }
                }
            }
        }
    }

    arena.into_dom(root)
}

enum ArenaNode {
    Document {
        doctype: Option<String>,
        children: Vec<usize>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<usize>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

struct NodeArena {
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: ArenaNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    fn add_child(&mut self, parent: usize, child: ArenaNode) -> usize {
        let index = self.push(child);
        match &mut self.nodes[parent] {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                children.push(index);
            }
            _ => unreachable!("dom builder parent cannot have children"),
        }
        index
    }

    fn set_doctype(&mut self, root: usize, doctype: String) {
        if let ArenaNode::Document { doctype: slot, .. } = &mut self.nodes[root] {
            if slot.is_none() {
                *slot = Some(doctype);
            }
        }
    }

    fn is_element_named(&self, index: usize, target: &str) -> bool {
        matches!(&self.nodes[index], ArenaNode::Element { name, .. } if name == target)
    }

    fn into_dom(mut self, root: usize) -> Node {
        // Children are converted by take-and-recurse; each index is visited
        // exactly once because the arena is a tree.
        fn convert(arena: &mut NodeArena, index: usize) -> Node {
            let node = std::mem::replace(&mut arena.nodes[index], ArenaNode::Text {
                text: String::new(),
            });
            match node {
                ArenaNode::Document { doctype, children } => Node::Document {
                    id: Id(0),
                    doctype,
                    children: children.into_iter().map(|c| convert(arena, c)).collect(),
                },
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                } => Node::Element {
                    id: Id(0),
                    name,
                    attributes,
                    children: children.into_iter().map(|c| convert(arena, c)).collect(),
                },
                ArenaNode::Text { text } => Node::Text { id: Id(0), text },
                ArenaNode::Comment { text } => Node::Comment { id: Id(0), text },
            }
        }
        convert(&mut self, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse(input: &str) -> Node {
        build_dom(&tokenize(input))
    }

    #[test]
    fn builds_nested_tree() {
        let dom = parse("<div><p>a</p><p>b</p></div>");
        let div = &dom.children()[0];
        assert_eq!(div.name(), Some("div"));
        assert_eq!(div.children().len(), 2);
        assert_eq!(div.children()[0].name(), Some("p"));
    }

    #[test]
    fn misnested_end_tag_pops_to_match() {
        // </div> closes both the open <p> and the <div>.
        let dom = parse("<div><p>a</div><p>b</p>");
        assert_eq!(dom.children().len(), 2);
        assert_eq!(dom.children()[0].name(), Some("div"));
        assert_eq!(dom.children()[1].name(), Some("p"));
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        let dom = parse("<div>a</span>b</div>");
        let div = &dom.children()[0];
        assert_eq!(div.children().len(), 2, "both text nodes stay in the div");
    }

    #[test]
    fn doctype_recorded_once() {
        let dom = parse("<!DOCTYPE html><p>x</p>");
        assert!(matches!(
            &dom,
            Node::Document { doctype: Some(d), .. } if d == "DOCTYPE html"
        ));
    }

    #[test]
    fn self_closing_tags_take_no_children() {
        let dom = parse("<p><br>text</p>");
        let p = &dom.children()[0];
        assert_eq!(p.children().len(), 2);
        assert_eq!(p.children()[0].name(), Some("br"));
        assert!(p.children()[0].children().is_empty());
    }
}
