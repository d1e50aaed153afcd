#![no_main]
use std::error::Error;

use libfuzzer_sys::fuzz_target;
use skrift::{charmap::Charmap, Font};

// covers the BMP and the start of the supplementary planes
const CODEPOINT_LIMIT: u32 = 0x20000;

fn do_charmap_things(charmap: &Charmap<'_>) {
    let _ = charmap.has_map();
    let _ = charmap.format();
    for cp in (0..CODEPOINT_LIMIT).step_by(7) {
        let _ = charmap.map(cp);
    }
    let _ = charmap.map(u32::MAX);
}

fn do_skrift_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    let font = Font::new(data)?;

    // we don't care about the result, just that we don't panic, hang, etc
    do_charmap_things(font.charmap());

    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_skrift_things(data);
});
