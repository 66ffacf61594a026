use core::any::Any;
use core::cell::RefCell;
use std::rc::Rc;

use nodelist::{
    EventInit, Handler, NodeId, NodeList, NodeListError, Page, PageConfig, This, handler,
};

/// body > ul#menu > (li.first > span, li.second, p)
struct Menu {
    page: Rc<Page>,
    menu: NodeId,
    first: NodeId,
    second: NodeId,
    span: NodeId,
    para: NodeId,
}

fn menu() -> anyhow::Result<Menu> {
    let _ = env_logger::builder().is_test(true).try_init();
    let page = Page::new(PageConfig::default())?;
    let menu = page.append_element(page.body(), "ul", &[("id", "menu")])?;
    let first = page.append_element(menu, "li", &[("class", "first")])?;
    let second = page.append_element(menu, "li", &[("class", "second")])?;
    let span = page.append_element(first, "span", &[])?;
    let para = page.append_element(menu, "p", &[])?;
    Ok(Menu {
        page,
        menu,
        first,
        second,
        span,
        para,
    })
}

type Calls = Rc<RefCell<Vec<(String, Option<NodeId>)>>>;

/// A handler that records the event type and context node of each call.
fn recorder() -> (Handler, Calls) {
    let calls: Calls = Rc::default();
    let sink = Rc::clone(&calls);
    let callback = handler(move |call, event| {
        sink.borrow_mut()
            .push((event.kind.clone(), call.this.node()));
    });
    (callback, calls)
}

fn click(page: &Rc<Page>, node: NodeId) {
    NodeList::from_nodes(page, [node]).fire("click", &EventInit::default());
}

#[test]
fn delegated_click_uses_the_matched_element() -> anyhow::Result<()> {
    let fx = menu()?;
    let (callback, calls) = recorder();
    let binding = fx.page.select("#menu")?.delegate("click", "li", &callback, None)?;
    assert_eq!(binding.len(), 1);

    click(&fx.page, fx.second);
    assert_eq!(*calls.borrow(), vec![(String::from("click"), Some(fx.second))]);

    // Only the event source is tested, not its ancestors.
    click(&fx.page, fx.span);
    click(&fx.page, fx.para);
    click(&fx.page, fx.menu);
    assert_eq!(calls.borrow().len(), 1);
    Ok(())
}

#[test]
fn this_value_overrides_the_context() -> anyhow::Result<()> {
    let fx = menu()?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let callback = handler(move |call, _| {
        sink.borrow_mut()
            .push(call.this.value::<&str>().copied());
    });
    let context: Rc<dyn Any> = Rc::new("toolbar");
    fx.page
        .select("ul")?
        .delegate("click", "li.first", &callback, Some(This::Value(context)))?;
    click(&fx.page, fx.first);
    assert_eq!(*seen.borrow(), vec![Some("toolbar")]);
    Ok(())
}

#[test]
fn detach_delegate_needs_the_full_triple() -> anyhow::Result<()> {
    let fx = menu()?;
    let list = fx.page.select("#menu")?;
    let (first_handler, first_calls) = recorder();
    let (second_handler, second_calls) = recorder();
    list.delegate("click", "li", &first_handler, None)?;
    list.delegate("click", "li", &second_handler, None)?;
    assert_eq!(fx.page.binding_count(), 2);

    assert_eq!(list.detach_delegate("click", "li.first", &first_handler), 0);
    assert_eq!(list.detach_delegate("keyup", "li", &first_handler), 0);
    assert_eq!(list.detach_delegate("click", "li", &first_handler), 1);

    click(&fx.page, fx.first);
    assert!(first_calls.borrow().is_empty());
    assert_eq!(second_calls.borrow().len(), 1);
    assert_eq!(fx.page.binding_count(), 1);
    Ok(())
}

#[test]
fn detach_delegate_removes_one_duplicate_per_element() -> anyhow::Result<()> {
    let fx = menu()?;
    let list = fx.page.select("#menu")?;
    let (callback, calls) = recorder();
    list.delegate("click", "li", &callback, None)?;
    list.delegate("click", "li", &callback, None)?;

    assert_eq!(list.detach_delegate("click", "li", &callback), 1);
    click(&fx.page, fx.first);
    assert_eq!(calls.borrow().len(), 1);

    assert_eq!(list.detach_delegate("click", "li", &callback), 1);
    click(&fx.page, fx.first);
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(fx.page.binding_count(), 0);
    assert_eq!(fx.page.document().borrow().listener_count(fx.menu), 0);
    Ok(())
}

#[test]
fn unbind_removes_exactly_one_binding() -> anyhow::Result<()> {
    let fx = menu()?;
    let items = fx.page.select("li")?;
    let (callback, calls) = recorder();
    let token = items.delegate("click", "span", &callback, None)?;
    let kept = items.delegate("click", "li", &callback, None)?;
    assert_eq!(token.len(), 2);
    assert_eq!(fx.page.binding_count(), 4);

    assert_eq!(items.unbind(&token), 2);
    assert_eq!(items.unbind(&token), 0);
    click(&fx.page, fx.span);
    assert!(calls.borrow().is_empty());
    click(&fx.page, fx.second);
    assert_eq!(calls.borrow().len(), 1);

    assert_eq!(items.unbind(&kept), 2);
    assert_eq!(fx.page.binding_count(), 0);
    Ok(())
}

#[test]
fn invalid_selectors_bind_nothing() -> anyhow::Result<()> {
    let fx = menu()?;
    let (callback, _) = recorder();
    let result = fx.page.select("#menu")?.delegate("click", "li >", &callback, None);
    assert!(matches!(result, Err(NodeListError::InvalidSelector { .. })));
    assert_eq!(fx.page.binding_count(), 0);
    assert!(matches!(
        NodeList::query(&fx.page, "li:hover"),
        Err(NodeListError::InvalidSelector { .. })
    ));
    Ok(())
}

#[test]
fn direct_bindings_bubble_and_detach() -> anyhow::Result<()> {
    let fx = menu()?;
    let list = fx.page.select("ul")?;
    let (callback, calls) = recorder();
    list.on("Click", &callback, None);

    click(&fx.page, fx.span);
    assert_eq!(*calls.borrow(), vec![(String::from("click"), Some(fx.menu))]);

    let (other, _) = recorder();
    assert_eq!(list.detach("click", &other), 0);
    assert_eq!(list.detach("click", &callback), 1);
    click(&fx.page, fx.span);
    assert_eq!(calls.borrow().len(), 1);
    Ok(())
}

#[test]
fn non_bubbling_events_stay_on_the_target() -> anyhow::Result<()> {
    let fx = menu()?;
    let (callback, calls) = recorder();
    fx.page.select("ul")?.on("focus", &callback, None);
    fx.page.select("li.first")?.on("focus", &callback, None);
    NodeList::from_nodes(&fx.page, [fx.first]).fire("focus", &EventInit::default());
    assert_eq!(*calls.borrow(), vec![(String::from("focus"), Some(fx.first))]);
    Ok(())
}

#[test]
fn key_events_fire_in_press_order() -> anyhow::Result<()> {
    let fx = menu()?;
    let list = fx.page.select("li.second")?;
    let (callback, calls) = recorder();
    for name in ["KeyUp", "keypress", "KEYDOWN"] {
        list.on(name, &callback, None);
    }

    let fired = list.fire_key("a");
    assert_eq!(fired.len(), 3);
    assert!(fired.iter().all(|event| event.key() == Some("a")));
    let order: Vec<String> = calls.borrow().iter().map(|(kind, _)| kind.clone()).collect();
    assert_eq!(order, ["keydown", "keypress", "keyup"]);

    calls.borrow_mut().clear();
    list.fire_key("Enter");
    let order: Vec<String> = calls.borrow().iter().map(|(kind, _)| kind.clone()).collect();
    assert_eq!(order, ["keydown", "keyup"]);
    Ok(())
}

#[test]
fn fire_returns_the_last_event_and_keeps_prevention() -> anyhow::Result<()> {
    let fx = menu()?;
    let items = fx.page.select("li")?;
    let blocker = handler(|_, event| event.prevent_default());
    NodeList::from_nodes(&fx.page, [fx.first]).on("submit", &blocker, None);

    let event = items
        .fire("submit", &EventInit::default().with("detail", "7"))
        .ok_or_else(|| anyhow::anyhow!("no event fired"))?;
    assert_eq!(event.source, Some(fx.second));
    assert_eq!(event.property("detail"), Some("7"));
    assert!(event.is_default_prevented());

    assert!(fx.page.select("table")?.fire("submit", &EventInit::default()).is_none());
    Ok(())
}
