#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_core::InteractionGraph;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = InteractionGraph::from_json_str(text) else {
        return;
    };

    // A document that loaded once must survive a second trip unchanged.
    let reparsed = serde_json::to_string(&graph)
        .ok()
        .and_then(|json| InteractionGraph::from_json_str(&json).ok());
    assert_eq!(reparsed.as_ref(), Some(&graph));
});
