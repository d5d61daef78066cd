//! Example catalog
//!
//! Each example is a plain function over any [`Document`], so the same set
//! runs against the in-memory tree or anything else implementing the trait.

pub mod manipulation;
pub mod traversal;

use dom::Document;

use crate::runner::ExampleUnit;

/// Last content line of a full walkthrough
pub const COMPLETED_MESSAGE: &str = "DOM manipulation and traversal examples completed!";

/// Manipulation examples followed by traversal examples
pub fn all<D: Document + 'static>() -> Vec<ExampleUnit<D>> {
    let mut units = manipulation::examples();
    units.extend(traversal::examples());
    units
}

/// Skip description for an element looked up by ID
pub(crate) fn by_id(id: &str) -> String {
    format!("Element with ID \"{}\"", id)
}

/// Skip description for an element looked up by class
pub(crate) fn by_class(class: &str) -> String {
    format!("Element with class \"{}\"", class)
}
