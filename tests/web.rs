#![cfg(target_arch = "wasm32")]

use blackhole_stopwatch::timer::TimerState;
use blackhole_stopwatch::wasm::ui::{lap_element, readout_html};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn lap_entries_prepend_newest_first() {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();

    let mut timer = TimerState::default();
    timer.start(0);
    let first = timer.lap(1_500).cloned().unwrap();
    let second = timer.lap(2_750).cloned().unwrap();

    for lap in [&first, &second] {
        let item = lap_element(&document, lap).unwrap();
        container.prepend_with_node_1(&item).unwrap();
    }

    assert_eq!(container.child_element_count(), 2);
    let top = container.first_element_child().unwrap();
    assert_eq!(top.class_name(), "lap-item");
    assert_eq!(top.text_content().unwrap(), "Lap 200:00:02.75");
    let bottom = container.last_element_child().unwrap();
    assert_eq!(bottom.text_content().unwrap(), "Lap 100:00:01.50");
}

#[wasm_bindgen_test]
fn readout_wraps_centiseconds() {
    let document = web_sys::window().unwrap().document().unwrap();
    let display = document.create_element("div").unwrap();
    display.set_inner_html(&readout_html("01:01:01.23"));

    let span = display.query_selector(".milliseconds").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), ".23");
    assert_eq!(display.text_content().unwrap(), "01:01:01.23");
}
