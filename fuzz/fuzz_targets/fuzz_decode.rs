#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbitplanes::*;

fuzz_target!(|data: &[u8]| {
    // Header: planes, layout, width in words, height, packbits flag.
    let [planes, layout, words, height, flags, body @ ..] = data else {
        return;
    };
    let planes = planes % 8 + 1;
    let layout = match layout % 3 {
        0 => BitplaneLayout::Contiguous,
        1 => BitplaneLayout::LineInterleaved,
        _ => BitplaneLayout::WordInterleaved,
    };
    let width = u32::from(words % 8 + 1) * 16;
    let height = u32::from(height % 32 + 1);

    let palette = IndexedPalette::new(1 << planes, 4).unwrap();
    // Must never panic
    let _ = DecodeRequest::new(body, &palette)
        .with_layout(layout)
        .with_packbits(flags & 1 != 0)
        .decode(width, height, enough::Unstoppable);

    let _ = packbits::decode(body, usize::from(*words) * 64);
    let _ = palette::atari::create_atari_st_palette(body, body.len() / 2);
});
