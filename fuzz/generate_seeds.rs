#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Header bytes: planes-1, layout, width/16-1, height-1, packbits flag.

    // 4 planes, word-interleaved, 16x1, plane 0 set
    let mut st = vec![3, 2, 0, 0, 0];
    st.extend_from_slice(&[0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
    fs::write(format!("{dir}/st_16x1.bin"), st).unwrap();

    // 1 plane, line-interleaved, 32x2, packbits
    let packed = vec![0, 1, 1, 1, 1, 0xFD, 0xFF, 0xFD, 0x00];
    fs::write(format!("{dir}/packbits_32x2.bin"), packed).unwrap();

    // 2 planes, contiguous, 16x2
    let mut acbm = vec![1, 0, 0, 1, 0];
    acbm.extend_from_slice(&[0xAA, 0x55, 0xAA, 0x55, 0xF0, 0x0F, 0xF0, 0x0F]);
    fs::write(format!("{dir}/acbm_16x2.bin"), acbm).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/header_only.bin"), [3, 2, 0, 0, 0]).unwrap();
    fs::write(format!("{dir}/packbits_overrun.bin"), [0, 1, 0, 0, 1, 0x81, 0x00]).unwrap();
    fs::write(format!("{dir}/packbits_noop.bin"), [0, 1, 0, 0, 1, 0x80, 0x80, 0x01, 0xFF]).unwrap();

    println!("Generated seed corpus in {dir}/");
}
