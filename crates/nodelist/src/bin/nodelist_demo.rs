//! Builds a small page, delegates a click and runs a unit-converting
//! animation frame by frame. Run with
//! `RUST_LOG=info cargo run -p nodelist --features demo` to see the output;
//! `RUST_LOG=debug` also dumps the final tree as JSON.

use log::{debug, info};
use nodelist::{
    AnimEvent, AnimOptions, EventInit, NodeList, Page, PageConfig, PropertyValue, handler,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PageConfig::from_env();
    info!(
        "viewport {}x{}, frame {:?}",
        config.viewport.width_px, config.viewport.height_px, config.frame_interval
    );
    let page = Page::new(config)?;
    let stage = page.append_element(
        page.body(),
        "div",
        &[("style", "position: relative; width: 600px; height: 400px")],
    )?;
    let menu = page.append_element(stage, "ul", &[("id", "menu")])?;
    for label in ["open", "save", "quit"] {
        page.append_element(menu, "li", &[("class", label)])?;
    }
    let panel = page.append_element(
        stage,
        "div",
        &[("id", "panel"), ("style", "position: absolute; width: 120px; left: 0px")],
    )?;

    let clicked = handler(|call, event| {
        let class = call
            .this
            .node()
            .and_then(|node| call.document.borrow().attribute(node, "class").map(str::to_owned));
        info!("{} on {}", event.kind, class.unwrap_or_default());
    });
    page.select("#menu")?.delegate("click", "li", &clicked, None)?;
    page.select("li.save")?.fire("click", &EventInit::default());

    let handle = NodeList::from_nodes(&page, [panel]).anim(
        0.25,
        &[
            ("width", PropertyValue::to("50%")),
            ("left", PropertyValue::to("2em")),
        ],
        &AnimOptions::default().named_tween("easeOut")?,
    )?;
    let document = page.document().clone();
    handle.on(AnimEvent::Frame, move |_| {
        info!("frame: {}", document.borrow().style_text(panel));
    });
    handle.on(AnimEvent::Complete, |_| info!("done"));

    while !page.timeline().is_idle() {
        page.tick();
    }
    debug!("final tree:\n{}", page.document().borrow().to_json_string());
    Ok(())
}
