//! Reading and changing the page: content, style, listeners, classes,
//! form values, node creation and removal.

use dom::{Document, DomEvent};
use tracing::info;

use super::{by_class, by_id};
use crate::runner::{Completion, ExampleContext, ExampleResult, ExampleUnit};

pub fn examples<D: Document + 'static>() -> Vec<ExampleUnit<D>> {
    vec![
        ExampleUnit::new("Update content and style", update_content_and_style::<D>),
        ExampleUnit::new("Register a click listener on #myElement", listen_on_element::<D>),
        ExampleUnit::new("Create a div and append it to body", append_div::<D>),
        ExampleUnit::new("1. Change the background color of #myDiv", change_background::<D>),
        ExampleUnit::new("2. Add a click listener to #myButton", listen_on_button::<D>),
        ExampleUnit::new("3. Append a new paragraph to body", append_paragraph::<D>),
        ExampleUnit::new("4. Change the text of every .myClass element", change_class_text::<D>),
        ExampleUnit::new("5. Remove #oldElement", remove_old_element::<D>),
        ExampleUnit::new("6. Toggle class \"active\" on #toggleElement", toggle_active::<D>),
        ExampleUnit::new("7. Read the value of #myInput", read_input::<D>),
        ExampleUnit::new("8. Set the value of #myInput", write_input::<D>),
        ExampleUnit::new("9. Append a list item to #myList", append_list_item::<D>),
        ExampleUnit::new("10. Log the text of every <p>", log_paragraphs::<D>),
    ]
}

pub fn update_content_and_style<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.lookup_required("myElement") else {
        return Ok(Completion::missing(by_id("myElement")));
    };

    let doc = cx.document_mut();
    doc.set_text_content(element, "New content!")?;
    doc.set_style_property(element, "color", "red")?;
    Ok(Completion::Done)
}

pub fn listen_on_element<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.lookup_required("myElement") else {
        return Ok(Completion::missing(by_id("myElement")));
    };

    cx.document_mut().add_event_listener(
        element,
        "click",
        Box::new(|event: &DomEvent| {
            info!(target: "walkthrough::alert", node = event.target, "Element clicked!")
        }),
    )?;
    Ok(Completion::Done)
}

pub fn append_div<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(body) = cx.document().body() else {
        return Ok(Completion::missing("<body>"));
    };

    let doc = cx.document_mut();
    let div = doc.create_element("div");
    doc.set_text_content(div, "I am a new element!")?;
    doc.append_child(body, div)?;
    Ok(Completion::Done)
}

pub fn change_background<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(div) = cx.lookup_required("myDiv") else {
        return Ok(Completion::missing(by_id("myDiv")));
    };

    cx.document_mut()
        .set_style_property(div, "background-color", "blue")?;
    Ok(Completion::Done)
}

pub fn listen_on_button<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(button) = cx.lookup_required("myButton") else {
        return Ok(Completion::missing(by_id("myButton")));
    };

    cx.document_mut().add_event_listener(
        button,
        "click",
        Box::new(|event: &DomEvent| {
            info!(target: "walkthrough::alert", node = event.target, "Button was clicked!")
        }),
    )?;
    Ok(Completion::Done)
}

pub fn append_paragraph<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(body) = cx.document().body() else {
        return Ok(Completion::missing("<body>"));
    };

    let doc = cx.document_mut();
    let paragraph = doc.create_element("p");
    doc.set_text_content(paragraph, "This is a new paragraph.")?;
    doc.append_child(body, paragraph)?;
    Ok(Completion::Done)
}

pub fn change_class_text<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let elements = cx.document().get_elements_by_class_name("myClass");
    if elements.is_empty() {
        return Ok(Completion::missing(by_class("myClass")));
    }

    for element in elements {
        cx.document_mut()
            .set_text_content(element, "Text has been changed!")?;
    }
    Ok(Completion::Done)
}

pub fn remove_old_element<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(old) = cx.lookup_required("oldElement") else {
        return Ok(Completion::missing(by_id("oldElement")));
    };
    let Some(parent) = cx.document().parent_element(old)? else {
        return Ok(Completion::missing("Parent of #oldElement"));
    };

    cx.document_mut().remove_child(parent, old)?;
    Ok(Completion::Done)
}

pub fn toggle_active<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(element) = cx.lookup_required("toggleElement") else {
        return Ok(Completion::missing(by_id("toggleElement")));
    };

    cx.document_mut().class_list_toggle(element, "active")?;
    Ok(Completion::Done)
}

pub fn read_input<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(input) = cx.lookup_required("myInput") else {
        return Ok(Completion::missing(by_id("myInput")));
    };

    let value = cx.document().value(input)?;
    cx.log(value);
    Ok(Completion::Done)
}

pub fn write_input<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(input) = cx.lookup_required("myInput") else {
        return Ok(Completion::missing(by_id("myInput")));
    };

    cx.document_mut().set_value(input, "New value")?;
    Ok(Completion::Done)
}

pub fn append_list_item<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let Some(list) = cx.lookup_required("myList") else {
        return Ok(Completion::missing(by_id("myList")));
    };

    let doc = cx.document_mut();
    let item = doc.create_element("li");
    doc.set_text_content(item, "New list item")?;
    doc.append_child(list, item)?;
    Ok(Completion::Done)
}

pub fn log_paragraphs<D: Document>(cx: &mut ExampleContext<'_, D>) -> ExampleResult {
    let paragraphs = cx.document().get_elements_by_tag_name("p");
    if paragraphs.is_empty() {
        return Ok(Completion::missing("Any <p> element"));
    }

    for paragraph in paragraphs {
        let text = cx.document().text_content(paragraph)?;
        cx.log(text);
    }
    Ok(Completion::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{Outcome, Runner};
    use dom::loader::load_value;
    use dom::DomArena;

    fn page(body: serde_json::Value) -> DomArena {
        load_value(&serde_json::json!({
            "tag": "html",
            "children": [{"tag": "body", "children": body}]
        }))
        .unwrap()
    }

    #[test]
    fn test_update_content_and_style() {
        let mut doc = page(serde_json::json!([
            {"tag": "div", "attributes": {"id": "myElement"}, "children": ["old"]}
        ]));
        let mut runner = Runner::new(&mut doc);

        assert_eq!(
            runner.run_example("Update content and style", update_content_and_style),
            Outcome::Ok
        );

        let element = doc.get_element_by_id("myElement").unwrap();
        assert_eq!(doc.text_content(element).unwrap(), "New content!");
        assert_eq!(
            doc.style_property(element, "color").unwrap().as_deref(),
            Some("red")
        );
    }

    #[test]
    fn test_listeners_are_registered_not_fired() {
        let mut doc = page(serde_json::json!([
            {"tag": "div", "attributes": {"id": "myElement"}},
            {"tag": "button", "attributes": {"id": "myButton"}}
        ]));
        let mut runner = Runner::new(&mut doc);
        runner.run_example("element", listen_on_element);
        runner.run_example("button", listen_on_button);

        let button = doc.get_element_by_id("myButton").unwrap();
        assert_eq!(doc.listener_count(button, "click"), 1);
        assert_eq!(doc.fire_event(button, "click").unwrap(), 1);
    }

    #[test]
    fn test_appends_go_to_end_of_body() {
        let mut doc = page(serde_json::json!([{"tag": "p", "children": ["first"]}]));
        let mut runner = Runner::new(&mut doc);
        runner.run_example("div", append_div);
        runner.run_example("p", append_paragraph);

        let body = doc.body().unwrap();
        let texts: Vec<String> = doc
            .element_children(body)
            .unwrap()
            .into_iter()
            .map(|id| doc.text_content(id).unwrap())
            .collect();
        assert_eq!(
            texts,
            vec!["first", "I am a new element!", "This is a new paragraph."]
        );
    }

    #[test]
    fn test_change_class_text_and_missing_class() {
        let mut doc = page(serde_json::json!([
            {"tag": "span", "attributes": {"class": "myClass"}, "children": ["a"]},
            {"tag": "span", "attributes": {"class": "other myClass"}, "children": ["b"]}
        ]));
        let mut runner = Runner::new(&mut doc);
        assert_eq!(runner.run_example("4", change_class_text), Outcome::Ok);
        for id in doc.get_elements_by_class_name("myClass") {
            assert_eq!(doc.text_content(id).unwrap(), "Text has been changed!");
        }

        let mut empty = page(serde_json::json!([]));
        let mut runner = Runner::new(&mut empty);
        assert_eq!(
            runner.run_example("4", change_class_text),
            Outcome::Skipped("Element with class \"myClass\"".to_string())
        );
    }

    #[test]
    fn test_remove_old_element() {
        let mut doc = page(serde_json::json!([
            {"tag": "div", "attributes": {"id": "oldElement"}}
        ]));
        let mut runner = Runner::new(&mut doc);

        assert_eq!(runner.run_example("5", remove_old_element), Outcome::Ok);
        assert_eq!(doc.get_element_by_id("oldElement"), None);
    }

    #[test]
    fn test_input_value_roundtrip() {
        let mut doc = page(serde_json::json!([
            {"tag": "input", "attributes": {"id": "myInput", "value": "typed"}}
        ]));
        let mut runner = Runner::new(&mut doc);
        runner.run_example("7", read_input);
        runner.run_example("8", write_input);
        runner.run_example("7 again", read_input);

        let contents: Vec<&str> = runner.transcript().contents().collect();
        assert_eq!(contents, vec!["typed", "New value"]);
    }

    #[test]
    fn test_append_list_item() {
        let mut doc = page(serde_json::json!([
            {"tag": "ul", "attributes": {"id": "myList"}, "children": [{"tag": "li", "children": ["one"]}]}
        ]));
        let mut runner = Runner::new(&mut doc);
        runner.run_example("9", append_list_item);

        let list = doc.get_element_by_id("myList").unwrap();
        let last = doc.last_element_child(list).unwrap().unwrap();
        assert_eq!(doc.text_content(last).unwrap(), "New list item");
        assert_eq!(doc.element_children(list).unwrap().len(), 2);
    }

    #[test]
    fn test_paragraph_text_keeps_whitespace() {
        let mut doc = page(serde_json::json!([
            {"tag": "p", "children": ["  spaced out  "]}
        ]));
        let mut runner = Runner::new(&mut doc);
        runner.run_example("10", log_paragraphs);

        let contents: Vec<&str> = runner.transcript().contents().collect();
        assert_eq!(contents, vec!["  spaced out  "]);
    }
}
