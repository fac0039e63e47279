#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbitplanes::*;

fuzz_target!(|data: &[u8]| {
    // Packbits must reproduce any input exactly.
    let packed = packbits::encode_to_vec(data);
    assert!(packed.len() <= packbits::max_encoded_len(data.len()));
    let unpacked = packbits::decode(&packed, data.len()).expect("packbits roundtrip failed");
    assert_eq!(unpacked, data, "packbits roundtrip mismatch");

    // Treat the input as palette indices of a 16-pixel-wide image.
    let [planes, layout, rest @ ..] = data else {
        return;
    };
    let planes = planes % 8 + 1;
    let layout = match layout % 3 {
        0 => BitplaneLayout::Contiguous,
        1 => BitplaneLayout::LineInterleaved,
        _ => BitplaneLayout::WordInterleaved,
    };
    let height = (rest.len() / 16) as u32;
    if height == 0 {
        return;
    }

    let colors = 1usize << planes;
    let mut palette = IndexedPalette::new(colors, 8).unwrap();
    for i in 0..colors {
        palette.set_rgb(i, i as u32, 0, 0).unwrap();
    }
    let mask = (colors - 1) as u8;
    let pixels: Vec<u8> = rest[..height as usize * 16]
        .iter()
        .flat_map(|&i| [i & mask, 0, 0, 255])
        .collect();

    let planar = EncodeRequest::new(&palette)
        .with_layout(layout)
        .with_packbits(planes % 2 == 0)
        .encode(&pixels, 16, height, enough::Unstoppable)
        .expect("encode of in-palette pixels failed");
    let decoded = DecodeRequest::new(&planar, &palette)
        .with_layout(layout)
        .with_packbits(planes % 2 == 0)
        .decode(16, height, enough::Unstoppable)
        .expect("re-encoded data failed to decode");
    assert_eq!(decoded.pixels(), &pixels[..], "roundtrip pixel mismatch");
});
