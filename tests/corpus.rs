//! Test corpus: packbits streams, palettes and planar images across
//! patterns, sizes, plane counts and layouts.

use enough::Unstoppable;
use zenbitplanes::*;

fn checkerboard(w: usize, h: usize, colors: usize) -> Vec<u8> {
    let mut indices = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            indices[y * w + x] = if (x / 4 + y) % 2 == 0 {
                0
            } else {
                (colors - 1) as u8
            };
        }
    }
    indices
}

fn noise_pattern(len: usize, modulo: u32) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut state: u32 = 0xDEAD_BEEF;
    for p in out.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = (state % modulo) as u8;
    }
    out
}

/// Palette of `colors` distinct 8-bit gray-ish entries.
fn ramp(colors: usize) -> IndexedPalette {
    let mut palette = IndexedPalette::new(colors, 8).unwrap();
    for i in 0..colors {
        let v = i as u32;
        palette.set_rgb(i, v, 255 - v, (v * 3) % 256).unwrap();
    }
    palette
}

fn to_rgba(indices: &[u8], palette: &IndexedPalette) -> Vec<u8> {
    let mut pixels = vec![0u8; indices.len() * 4];
    let mut writer = RgbaIndexWriter::new(&mut pixels, palette).unwrap();
    for &i in indices {
        writer.write(i).unwrap();
    }
    pixels
}

// ── packbits ─────────────────────────────────────────────────────────

fn packbits_inputs() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", vec![]),
        ("single", vec![0x42]),
        ("pair", vec![9, 9]),
        ("run_128", vec![0x11; 128]),
        ("run_129", vec![0x11; 129]),
        ("run_1000", vec![0; 1000]),
        ("literal_128", (0..128u8).collect()),
        ("literal_129", (0..129u8).collect()),
        ("ramp_1000", (0..1000u32).map(|i| i as u8).collect()),
        ("noise", noise_pattern(4096, 256)),
        ("sparse_noise", noise_pattern(4096, 3)),
        (
            "alternating",
            (0..600u32).map(|i| if i % 3 == 0 { i as u8 } else { 0xEE }).collect(),
        ),
    ]
}

#[test]
fn packbits_roundtrip_corpus() {
    for (name, src) in packbits_inputs() {
        let packed = packbits::encode_to_vec(&src);
        assert!(
            packed.len() <= packbits::max_encoded_len(src.len()),
            "{name}: {} > bound",
            packed.len()
        );
        let unpacked = packbits::decode(&packed, src.len()).unwrap();
        assert_eq!(unpacked, src, "{name}");
    }
}

#[test]
fn packbits_rows_roundtrip_corpus() {
    for (name, src) in packbits_inputs() {
        for row_len in [1, 7, 40, 160] {
            let packed = packbits::encode_rows(&src, row_len).unwrap();
            let unpacked = packbits::decode(&packed, src.len()).unwrap();
            assert_eq!(unpacked, src, "{name} rows of {row_len}");
        }
    }
}

#[test]
fn packbits_never_emits_noop() {
    for (name, src) in packbits_inputs() {
        let packed = packbits::encode_to_vec(&src);
        let mut pos = 0;
        while pos < packed.len() {
            let control = packed[pos] as i8;
            assert_ne!(control, -128, "{name} at {pos}");
            pos += if control < 0 { 2 } else { control as usize + 2 };
        }
    }
}

#[test]
fn packbits_decode_into_locates_trailer() {
    let body = noise_pattern(300, 4);
    let mut stream = packbits::encode_to_vec(&body);
    let packed_len = stream.len();
    stream.extend_from_slice(b"trailer");

    let mut out = vec![0u8; body.len()];
    let consumed = packbits::decode_into(&stream, &mut out).unwrap();
    assert_eq!(consumed, packed_len);
    assert_eq!(&stream[consumed..], b"trailer");
    assert_eq!(out, body);
}

#[test]
fn packbits_truncated_streams_fail() {
    let packed = packbits::encode_to_vec(&noise_pattern(500, 256));
    for cut in [0, 1, packed.len() / 2, packed.len() - 1] {
        let result = packbits::decode(&packed[..cut], 500);
        assert!(
            matches!(result, Err(BitplaneError::UnexpectedEof)),
            "cut at {cut}: {result:?}"
        );
    }
}

// ── planar images ────────────────────────────────────────────────────

#[test]
fn every_plane_count_and_layout() {
    let layouts = [
        BitplaneLayout::Contiguous,
        BitplaneLayout::LineInterleaved,
        BitplaneLayout::WordInterleaved,
    ];
    for planes in 1..=8u8 {
        let colors = 1usize << planes;
        let palette = ramp(colors);
        for (w, h) in [(16, 1), (32, 3), (48, 7)] {
            let indices = noise_pattern(w * h, colors as u32);
            let pixels = to_rgba(&indices, &palette);
            for layout in layouts {
                let planar = EncodeRequest::new(&palette)
                    .with_layout(layout)
                    .encode(&pixels, w as u32, h as u32, Unstoppable)
                    .unwrap();
                assert_eq!(
                    planar.len(),
                    planar_len(planes, w as u32, h as u32).unwrap()
                );
                let decoded = DecodeRequest::new(&planar, &palette)
                    .with_layout(layout)
                    .decode(w as u32, h as u32, Unstoppable)
                    .unwrap();
                assert_eq!(
                    decoded.pixels(),
                    &pixels[..],
                    "{planes} planes, {w}x{h}, {layout:?}"
                );
            }
        }
    }
}

#[test]
fn checkerboard_compresses_and_roundtrips() {
    let palette = ramp(16);
    let indices = checkerboard(320, 200, 16);
    let pixels = to_rgba(&indices, &palette);
    let packed = EncodeRequest::new(&palette)
        .with_layout(BitplaneLayout::LineInterleaved)
        .with_packbits(true)
        .encode(&pixels, 320, 200, Unstoppable)
        .unwrap();
    assert!(packed.len() < 32000 / 2);
    let decoded = DecodeRequest::new(&packed, &palette)
        .with_layout(BitplaneLayout::LineInterleaved)
        .with_packbits(true)
        .decode(320, 200, Unstoppable)
        .unwrap();
    assert_eq!(decoded.into_pixels(), pixels);
}

#[test]
fn truncated_planar_data_fails_cleanly() {
    let palette = ramp(16);
    let pixels = to_rgba(&noise_pattern(64 * 8, 16), &palette);
    let planar = EncodeRequest::new(&palette)
        .encode(&pixels, 64, 8, Unstoppable)
        .unwrap();
    for cut in [0, 1, 7, planar.len() / 2, planar.len() - 1] {
        let result = DecodeRequest::new(&planar[..cut], &palette).decode(64, 8, Unstoppable);
        assert!(
            matches!(result, Err(BitplaneError::OutOfBounds { .. })),
            "cut at {cut}"
        );
    }
}

#[test]
fn garbage_packbits_never_panics() {
    let palette = ramp(4);
    for seed_len in [0, 1, 3, 17, 256, 1024] {
        let junk = noise_pattern(seed_len, 256);
        let _ = DecodeRequest::new(&junk, &palette)
            .with_packbits(true)
            .decode(32, 8, Unstoppable);
    }
}

// ── palettes ─────────────────────────────────────────────────────────

#[test]
fn resample_roundtrip_every_depth() {
    for low in 1..=8u8 {
        let max = (1u32 << low) - 1;
        let mut palette = IndexedPalette::new(max as usize + 1, low).unwrap();
        for v in 0..=max {
            palette.set_color(v as usize, v, max - v, v / 2, max).unwrap();
        }
        for high in low..=8 {
            let back = palette.resample(high).unwrap().resample(low).unwrap();
            assert_eq!(back, palette, "{low} -> {high} -> {low}");
        }
    }
}

#[test]
fn value_array_roundtrip_at_8_bits() {
    let values = [0x0000_00FF, 0x1234_5678, 0xFFFF_FFFF, 0x8000_0001];
    let palette = IndexedPalette::from_value_array(&values);
    assert_eq!(palette.to_value_array(8, true).unwrap(), values);
    assert_eq!(
        palette.to_value_array(8, false).unwrap(),
        [0x00_0000, 0x12_3456, 0xFF_FFFF, 0x80_0000]
    );
}

#[test]
fn limits_reject_large_images() {
    let palette = ramp(2);
    let limits = Limits {
        max_width: Some(64),
        max_pixels: Some(1000),
        ..Default::default()
    };
    let too_wide = DecodeRequest::new(&[], &palette)
        .with_limits(&limits)
        .decode(80, 1, Unstoppable);
    assert!(matches!(too_wide, Err(BitplaneError::LimitExceeded(_))));

    let too_many = EncodeRequest::new(&palette)
        .with_limits(&limits)
        .encode(&[], 64, 20, Unstoppable);
    assert!(matches!(too_many, Err(BitplaneError::LimitExceeded(_))));
}
