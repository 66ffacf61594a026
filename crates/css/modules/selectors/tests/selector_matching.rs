#![allow(clippy::unwrap_used, reason = "selectors under test are known to parse")]

use css_selectors::{
    AttrOperator, Combinator, ElementAdapter, SelectorParseError, SimpleSelector, filter_matching,
    matches_selector_list, parse_selector_list,
};

/// Flat test tree: every node stores its parent and attributes.
struct Node {
    tag: &'static str,
    parent: Option<usize>,
    attrs: Vec<(&'static str, &'static str)>,
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn siblings(&self, element: usize) -> Vec<usize> {
        let parent = self.nodes[element].parent;
        (0..self.nodes.len())
            .filter(|&idx| self.nodes[idx].parent == parent && parent.is_some())
            .collect()
    }
}

impl ElementAdapter for Tree {
    type Handle = usize;

    fn parent(&self, element: usize) -> Option<usize> {
        self.nodes[element].parent
    }

    fn previous_sibling_element(&self, element: usize) -> Option<usize> {
        let sibs = self.siblings(element);
        let pos = sibs.iter().position(|&idx| idx == element)?;
        pos.checked_sub(1).map(|prev| sibs[prev])
    }

    fn next_sibling_element(&self, element: usize) -> Option<usize> {
        let sibs = self.siblings(element);
        let pos = sibs.iter().position(|&idx| idx == element)?;
        sibs.get(pos + 1).copied()
    }

    fn tag_name(&self, element: usize) -> Option<&str> {
        Some(self.nodes[element].tag)
    }

    fn element_id(&self, element: usize) -> Option<&str> {
        self.attr(element, "id")
    }

    fn has_class(&self, element: usize, class: &str) -> bool {
        self.attr(element, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|name| name == class))
    }

    fn attr(&self, element: usize, name: &str) -> Option<&str> {
        self.nodes[element]
            .attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

/// <ul id=nav>
///   <li class="item first"><a href="/home" lang="en-GB">..</a></li>
///   <li class=item><span>..</span></li>
///   <li class="item last" data-kind=primary></li>
/// </ul>
fn sample() -> Tree {
    let node = |tag, parent, attrs| Node { tag, parent, attrs };
    Tree {
        nodes: vec![
            node("ul", None, vec![("id", "nav")]),
            node("li", Some(0), vec![("class", "item first")]),
            node("a", Some(1), vec![("href", "/home"), ("lang", "en-GB")]),
            node("li", Some(0), vec![("class", "item")]),
            node("span", Some(3), vec![]),
            node("li", Some(0), vec![("class", "item last"), ("data-kind", "primary")]),
        ],
    }
}

fn matching(tree: &Tree, selector: &str) -> Vec<usize> {
    let list = parse_selector_list(selector).unwrap();
    filter_matching(tree, &list, 0..tree.nodes.len())
}

#[test]
fn parses_compounds_and_combinators() {
    let _ = env_logger::builder().is_test(true).try_init();
    let list = parse_selector_list("#nav > li.item a").unwrap();
    let complex = &list.selectors[0];
    assert_eq!(
        complex.first.simples,
        vec![SimpleSelector::IdSelector("nav".into())]
    );
    assert_eq!(complex.rest.len(), 2);
    assert_eq!(complex.rest[0].0, Combinator::Child);
    assert_eq!(
        complex.rest[0].1.simples,
        vec![
            SimpleSelector::Type("li".into()),
            SimpleSelector::Class("item".into())
        ]
    );
    assert_eq!(complex.rest[1].0, Combinator::Descendant);
}

#[test]
fn parses_attribute_operators() {
    let list = parse_selector_list("[lang|=en], a[href^='/'], [data-kind]").unwrap();
    let ops: Vec<AttrOperator> = list
        .selectors
        .iter()
        .filter_map(|sel| {
            sel.first.simples.iter().find_map(|simple| match simple {
                SimpleSelector::Attribute { operator, .. } => Some(*operator),
                _ => None,
            })
        })
        .collect();
    assert_eq!(
        ops,
        vec![AttrOperator::DashMatch, AttrOperator::Prefix, AttrOperator::Exists]
    );
}

#[test]
fn rejects_malformed_selectors() {
    assert_eq!(parse_selector_list(""), Err(SelectorParseError::Empty));
    assert_eq!(parse_selector_list("li,"), Err(SelectorParseError::Empty));
    assert_eq!(
        parse_selector_list("ul >"),
        Err(SelectorParseError::DanglingCombinator)
    );
    assert_eq!(
        parse_selector_list("> li"),
        Err(SelectorParseError::DanglingCombinator)
    );
    assert_eq!(
        parse_selector_list("li:hover"),
        Err(SelectorParseError::UnsupportedPseudoClass("hover".into()))
    );
    assert_eq!(
        parse_selector_list("[href=]"),
        Err(SelectorParseError::BadAttribute)
    );
}

#[test]
fn type_class_and_id_matching() {
    let tree = sample();
    assert_eq!(matching(&tree, "li"), vec![1, 3, 5]);
    assert_eq!(matching(&tree, ".last"), vec![5]);
    assert_eq!(matching(&tree, "#nav"), vec![0]);
    assert_eq!(matching(&tree, "LI.item.first"), vec![1]);
    assert_eq!(matching(&tree, "span, a"), vec![2, 4]);
}

#[test]
fn combinators_match_right_to_left() {
    let tree = sample();
    assert_eq!(matching(&tree, "#nav a"), vec![2]);
    assert_eq!(matching(&tree, "ul > a"), Vec::<usize>::new());
    assert_eq!(matching(&tree, "ul > li > span"), vec![4]);
    assert_eq!(matching(&tree, ".first + li"), vec![3]);
    assert_eq!(matching(&tree, ".first ~ li"), vec![3, 5]);
    assert_eq!(matching(&tree, "ul > li + li span"), vec![4]);
}

#[test]
fn structural_and_attribute_matching() {
    let tree = sample();
    assert_eq!(matching(&tree, "li:first-child"), vec![1]);
    assert_eq!(matching(&tree, "li:last-child"), vec![5]);
    assert_eq!(matching(&tree, "[data-kind=primary]"), vec![5]);
    assert_eq!(matching(&tree, "[lang|=en]"), vec![2]);
    assert_eq!(matching(&tree, "[class~=item]"), vec![1, 3, 5]);
    assert_eq!(matching(&tree, "[href$=home]"), vec![2]);
    assert_eq!(matching(&tree, "[class*=las]"), vec![5]);
}

#[test]
fn list_matches_when_any_member_matches() {
    let tree = sample();
    let list = parse_selector_list("span, #missing").unwrap();
    assert!(matches_selector_list(&tree, 4, &list));
    assert!(!matches_selector_list(&tree, 2, &list));
}
