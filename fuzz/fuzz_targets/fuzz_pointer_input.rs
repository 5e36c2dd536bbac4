#![no_main]

use libfuzzer_sys::fuzz_target;
use tapconsole_core::{PointerEventKind, PointerSource};
use tapconsole_web::parse_pointer_input;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if json.len() > 8192 {
        return;
    }

    // Must never panic; errors are fine.
    let Ok(events) = parse_pointer_input(json) else {
        return;
    };

    for event in &events {
        match event.source {
            PointerSource::Touch => assert!(event.pointer_id.is_some(), "touch without id"),
            PointerSource::Mouse => {
                assert!(event.pointer_id.is_none(), "mouse with id");
            }
        }
        if let PointerEventKind::PressEnd | PointerEventKind::PressCancel = event.kind {
            assert!(event.position().is_none(), "release carries a position");
        }
    }
    if events.iter().any(|e| e.source == PointerSource::Mouse) {
        assert_eq!(events.len(), 1, "mouse input yields at most one event");
    }
});
