#![allow(dead_code)]

use tickcraft::{components::Text, hooks::UseState, AnyElement, ElementExt, Hooks};
use tickcraft_macros::{component, element};

#[component]
fn MyComponent() -> impl Into<AnyElement> {
    element!(Text(content: "plain"))
}

#[derive(Default)]
struct MyProps {
    label: String,
}

#[component]
fn MyComponentWithProps(props: &MyProps) -> impl Into<AnyElement> {
    element!(Text(content: props.label.clone()))
}

#[component]
fn MyComponentWithMutProps(props: &mut MyProps) -> impl Into<AnyElement> {
    props.label.push('!');
    element!(Text(content: props.label.clone()))
}

#[component]
fn MyComponentWithHooks(mut hooks: Hooks) -> impl Into<AnyElement> {
    let count = hooks.use_state(|| 42);
    element!(Text(content: count.to_string()))
}

#[component]
fn MyComponentWithHooksAndProps(mut hooks: Hooks, props: &MyProps) -> impl Into<AnyElement> {
    let count = hooks.use_state(|| props.label.len());
    element!(Text(content: format!("{}: {}", props.label, count)))
}

#[component]
fn MyComponentWithUnusedArgs(_props: &MyProps, _hooks: Hooks) -> impl Into<AnyElement> {
    element!(Text)
}

/// Components keep their attributes.
#[component]
pub fn MyDocumentedComponent() -> impl Into<AnyElement> {
    element!(MyComponent)
}

#[test]
fn render_components() {
    assert_eq!(element!(MyComponent).to_string(), "plain\n");
    assert_eq!(
        element!(MyComponentWithProps(label: "hi")).to_string(),
        "hi\n"
    );
    assert_eq!(
        element!(MyComponentWithMutProps(label: "hi")).to_string(),
        "hi!\n"
    );
    assert_eq!(element!(MyComponentWithHooks).to_string(), "42\n");
    assert_eq!(
        element!(MyComponentWithHooksAndProps(label: "abc")).to_string(),
        "abc: 3\n"
    );
    assert_eq!(element!(MyComponentWithUnusedArgs).to_string(), "\n");
    assert_eq!(element!(MyDocumentedComponent).to_string(), "plain\n");
}
