#![no_main]

use libfuzzer_sys::fuzz_target;
use tapconsole_core::Value;
use tapconsole_widgets::preview;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

fuzz_target!(|data: (u8, Vec<String>)| {
    let (width, items) = data;
    if items.len() > 64 {
        return;
    }
    let width = usize::from(width).max(1);
    let value = Value::array(items.into_iter().map(Value::from));

    // Must never panic and must respect the width budget, counted the way
    // truncation counts it: per grapheme.
    let text = preview(&value, width);
    let used: usize = text.graphemes(true).map(UnicodeWidthStr::width).sum();
    assert!(
        text.width() <= width || used <= width,
        "preview wider than {width}: {text:?}"
    );
});
