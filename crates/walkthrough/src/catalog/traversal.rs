//! Walking the tree: parents, children and siblings, starting from an
//! element found by ID or by class.

use dom::Document;

use super::{by_class, by_id};
use crate::runner::{Completion, ExampleContext, ExampleResult, ExampleUnit};

pub fn examples<D: Document + 'static>() -> Vec<ExampleUnit<D>> {
    vec![
        ExampleUnit::new("1. Parent of #childElement", parent_of_child::<D>),
        ExampleUnit::new("2. First child of #parentElement", first_child_of_parent::<D>),
        ExampleUnit::new("3. Next sibling of #currentElement", next_of_current::<D>),
        ExampleUnit::new("4. Previous sibling of #currentElement", previous_of_current::<D>),
        ExampleUnit::new("5. Children of #parentElement", children_of_parent::<D>),
        ExampleUnit::new("6. First child of the first .myClass", first_child_of_class::<D>),
        ExampleUnit::new("7. Last child of #parentElement", last_child_of_parent::<D>),
        ExampleUnit::new("8. Parent of the first .myClass", parent_of_class::<D>),
        ExampleUnit::new("9. Next sibling of the first .myClass", next_of_class::<D>),
        ExampleUnit::new("10. Previous sibling of the first .myClass", previous_of_class::<D>),
    ]
}

pub fn parent_of_child<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(child) = cx.lookup_required("childElement") else {
        return Ok(Completion::missing(by_id("childElement")));
    };

    let parent = cx.document().parent_element(child)?;
    cx.log_node("Parent of #childElement", parent)?;
    Ok(Completion::Done)
}

pub fn first_child_of_parent<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(parent) = cx.lookup_required("parentElement") else {
        return Ok(Completion::missing(by_id("parentElement")));
    };

    let first = cx.document().first_element_child(parent)?;
    cx.log_node("First child of #parentElement", first)?;
    Ok(Completion::Done)
}

pub fn next_of_current<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(current) = cx.lookup_required("currentElement") else {
        return Ok(Completion::missing(by_id("currentElement")));
    };

    let next = cx.document().next_element_sibling(current)?;
    cx.log_node("Next sibling of #currentElement", next)?;
    Ok(Completion::Done)
}

pub fn previous_of_current<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(current) = cx.lookup_required("currentElement") else {
        return Ok(Completion::missing(by_id("currentElement")));
    };

    let previous = cx.document().previous_element_sibling(current)?;
    cx.log_node("Previous sibling of #currentElement", previous)?;
    Ok(Completion::Done)
}

pub fn children_of_parent<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(parent) = cx.lookup_required("parentElement") else {
        return Ok(Completion::missing(by_id("parentElement")));
    };

    let children = cx.document().element_children(parent)?;
    cx.log_nodes("Children of #parentElement", &children)?;
    Ok(Completion::Done)
}

pub fn first_child_of_class<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.first_by_class("myClass") else {
        return Ok(Completion::missing(by_class("myClass")));
    };

    let first = cx.document().first_element_child(element)?;
    cx.log_node("First child of .myClass", first)?;
    Ok(Completion::Done)
}

pub fn last_child_of_parent<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(parent) = cx.lookup_required("parentElement") else {
        return Ok(Completion::missing(by_id("parentElement")));
    };

    let last = cx.document().last_element_child(parent)?;
    cx.log_node("Last child of #parentElement", last)?;
    Ok(Completion::Done)
}

pub fn parent_of_class<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.first_by_class("myClass") else {
        return Ok(Completion::missing(by_class("myClass")));
    };

    let parent = cx.document().parent_element(element)?;
    cx.log_node("Parent of .myClass", parent)?;
    Ok(Completion::Done)
}

pub fn next_of_class<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.first_by_class("myClass") else {
        return Ok(Completion::missing(by_class("myClass")));
    };

    let next = cx.document().next_element_sibling(element)?;
    cx.log_node("Next sibling of .myClass", next)?;
    Ok(Completion::Done)
}

pub fn previous_of_class<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.first_by_class("myClass") else {
        return Ok(Completion::missing(by_class("myClass")));
    };

    let previous = cx.document().previous_element_sibling(element)?;
    cx.log_node("Previous sibling of .myClass", previous)?;
    Ok(Completion::Done)
}
