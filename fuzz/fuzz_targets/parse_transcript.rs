#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_core::transcript::parse_turns;
use parley_core::{ExclusionSet, TranscriptLayout, build_network};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(turns) = parse_turns(text, &TranscriptLayout::default()) else {
        return;
    };

    let (graph, stats) = build_network(&turns, ExclusionSet::default());
    assert_eq!(stats.turns, turns.len());
    assert!(stats.interactions <= turns.len().saturating_sub(1));
    assert_eq!(graph.total_weight(), stats.interactions as u64);

    let kept = graph.retain_top_speakers(3);
    assert!(kept.source_count() <= 3);
});
