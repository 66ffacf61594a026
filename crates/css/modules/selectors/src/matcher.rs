//! CSS selector matching engine.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{
    Combinator, ComplexSelector, CompoundSelector, ElementAdapter, SelectorList, SimpleSelector,
};

/// Match a selector list against an element.
/// Spec: Section 3, 4
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|selector_item| matches_complex(adapter, element, selector_item))
}

/// Keep the candidates that match any selector in `list`, preserving order.
pub fn filter_matching<A, I>(adapter: &A, list: &SelectorList, candidates: I) -> Vec<A::Handle>
where
    A: ElementAdapter,
    I: IntoIterator<Item = A::Handle>,
{
    candidates
        .into_iter()
        .filter(|&candidate| matches_selector_list(adapter, candidate, list))
        .collect()
}

/// Match a complex selector against an element.
/// Spec: Section 3, 11 — Right-to-left matching strategy
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
) -> bool {
    matches_from(adapter, element, sel, sel.rest.len())
}

fn compound_at(sel: &ComplexSelector, index: usize) -> Option<&CompoundSelector> {
    if index == 0 {
        Some(&sel.first)
    } else {
        sel.rest.get(index - 1).map(|pair| &pair.1)
    }
}

/// Match compound `index` against `element`, then relate the compounds to its
/// left. Descendant and general-sibling steps backtrack over every candidate.
fn matches_from<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
    index: usize,
) -> bool {
    if !compound_at(sel, index).is_some_and(|compound| matches_compound(adapter, element, compound))
    {
        return false;
    }
    let Some(left_index) = index.checked_sub(1) else {
        return true;
    };
    let Some(&(combinator, _)) = sel.rest.get(left_index) else {
        return false;
    };
    match combinator {
        Combinator::Descendant => {
            let mut current_parent = adapter.parent(element);
            while let Some(ancestor_element) = current_parent {
                if matches_from(adapter, ancestor_element, sel, left_index) {
                    return true;
                }
                current_parent = adapter.parent(ancestor_element);
            }
            false
        }
        Combinator::Child => adapter
            .parent(element)
            .is_some_and(|parent_el| matches_from(adapter, parent_el, sel, left_index)),
        Combinator::AdjacentSibling => adapter
            .previous_sibling_element(element)
            .is_some_and(|prev_el| matches_from(adapter, prev_el, sel, left_index)),
        Combinator::GeneralSibling => {
            let mut current_sibling = adapter.previous_sibling_element(element);
            while let Some(sibling_element) = current_sibling {
                if matches_from(adapter, sibling_element, sel, left_index) {
                    return true;
                }
                current_sibling = adapter.previous_sibling_element(sibling_element);
            }
            false
        }
    }
}

/// Match a compound selector against a single element.
/// Spec: Section 5–8
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
) -> bool {
    let Some(tag) = adapter.tag_name(element) else {
        return false;
    };
    compound.simples.iter().all(|simple| match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => type_name.is_empty() || tag == type_name.as_str(),
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => adapter
            .element_id(element)
            .is_some_and(|value| value == id_value.as_str()),
        SimpleSelector::Attribute {
            name,
            operator,
            value,
        } => adapter
            .attr(element, name)
            .is_some_and(|attr_value| operator.matches(attr_value, value)),
        SimpleSelector::FirstChild => adapter.previous_sibling_element(element).is_none(),
        SimpleSelector::LastChild => adapter.next_sibling_element(element).is_none(),
    })
}
