//! Tests for PNG encoding of rendered tiles.
//!
//! Output is checked structurally: chunk layout, CRCs, header fields and the
//! decompressed scanlines.

use std::io::Read;

use renderer::png::{create_png, create_png_auto, create_png_indexed, encode_tile, PNG_SIGNATURE};
use renderer::{PixelBuffer, RenderError};

// ============================================================================
// Helper functions
// ============================================================================

struct Chunk {
    kind: [u8; 4],
    data: Vec<u8>,
}

/// Split a PNG into chunks, verifying every CRC along the way.
fn read_chunks(png: &[u8]) -> Vec<Chunk> {
    assert_eq!(&png[..8], &PNG_SIGNATURE);
    let mut chunks = Vec::new();
    let mut pos = 8;
    while pos < png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let kind = [png[pos + 4], png[pos + 5], png[pos + 6], png[pos + 7]];
        let data = png[pos + 8..pos + 8 + len].to_vec();
        let crc_bytes = &png[pos + 8 + len..pos + 12 + len];
        let crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&kind);
        hasher.update(&data);
        assert_eq!(hasher.finalize(), crc, "bad CRC on {:?}", kind);

        chunks.push(Chunk { kind, data });
        pos += 12 + len;
    }
    chunks
}

fn find<'a>(chunks: &'a [Chunk], kind: &[u8; 4]) -> Option<&'a Chunk> {
    chunks.iter().find(|c| &c.kind == kind)
}

/// (width, height, color type)
fn header(chunks: &[Chunk]) -> (u32, u32, u8) {
    let ihdr = &chunks[0];
    assert_eq!(&ihdr.kind, b"IHDR");
    let d = &ihdr.data;
    (
        u32::from_be_bytes([d[0], d[1], d[2], d[3]]),
        u32::from_be_bytes([d[4], d[5], d[6], d[7]]),
        d[9],
    )
}

fn inflate(chunks: &[Chunk]) -> Vec<u8> {
    let idat = find(chunks, b"IDAT").expect("IDAT chunk");
    let mut decoder = flate2::read::ZlibDecoder::new(&idat.data[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    out
}

fn checkerboard(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if (x + y) % 2 == 0 {
                pixels.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    pixels
}

// ============================================================================
// RGBA encoding
// ============================================================================

#[test]
fn test_rgba_png_layout() {
    let pixels = checkerboard(3, 2);
    let png = create_png(&pixels, 3, 2).unwrap();
    let chunks = read_chunks(&png);

    assert_eq!(header(&chunks), (3, 2, 6));
    assert_eq!(&chunks.last().unwrap().kind, b"IEND");

    // Each scanline is a filter byte followed by 3 RGBA pixels
    let raw = inflate(&chunks);
    assert_eq!(raw.len(), 2 * (1 + 3 * 4));
    assert_eq!(raw[0], 0);
    assert_eq!(&raw[1..13], &pixels[0..12]);
    assert_eq!(&raw[14..26], &pixels[12..24]);
}

#[test]
fn test_rgba_png_rejects_short_buffer() {
    let result = create_png(&[0u8; 15], 2, 2);
    assert!(matches!(result, Err(RenderError::Encode(_))));
}

#[test]
fn test_zero_sized_image_rejected() {
    assert!(create_png(&[], 0, 4).is_err());
    assert!(create_png_auto(&[], 4, 0).is_err());
}

// ============================================================================
// Indexed encoding
// ============================================================================

#[test]
fn test_auto_uses_indexed_for_few_colors() {
    let pixels = checkerboard(16, 16);
    let png = create_png_auto(&pixels, 16, 16).unwrap();
    let chunks = read_chunks(&png);

    assert_eq!(header(&chunks), (16, 16, 3));
    let plte = find(&chunks, b"PLTE").expect("PLTE chunk");
    assert_eq!(plte.data.len(), 2 * 3);

    // The transparent entry needs a tRNS chunk
    let trns = find(&chunks, b"tRNS").expect("tRNS chunk");
    assert!(trns.data.contains(&0));
    assert!(trns.data.contains(&255));
}

#[test]
fn test_opaque_palette_has_no_trns() {
    let png = create_png_indexed(2, 1, &[(1, 2, 3, 255)], &[0, 0]).unwrap();
    let chunks = read_chunks(&png);
    assert!(find(&chunks, b"tRNS").is_none());
    assert_eq!(inflate(&chunks), vec![0, 0, 0]);
}

#[test]
fn test_indexed_rejects_bad_input() {
    assert!(create_png_indexed(2, 2, &[(0, 0, 0, 255)], &[0, 0, 0]).is_err());
    assert!(create_png_indexed(1, 1, &[], &[0]).is_err());
}

#[test]
fn test_auto_falls_back_to_rgba_for_many_colors() {
    let mut pixels = Vec::with_capacity(300 * 4);
    for i in 0..300u32 {
        pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 7, 255]);
    }
    let png = create_png_auto(&pixels, 300, 1).unwrap();
    assert_eq!(header(&read_chunks(&png)).2, 6);
}

#[test]
fn test_indexed_smaller_than_rgba_for_tile() {
    // 256x256 banded tile with 16 colors, large enough for parallel extraction
    let mut pixels = Vec::with_capacity(256 * 256 * 4);
    for y in 0..256usize {
        for _ in 0..256usize {
            let band = (y / 16) as u8;
            pixels.extend_from_slice(&[band * 16, 255 - band * 16, 0, 255]);
        }
    }
    let indexed = create_png_auto(&pixels, 256, 256).unwrap();
    let rgba = create_png(&pixels, 256, 256).unwrap();
    assert_eq!(header(&read_chunks(&indexed)).2, 3);
    assert!(indexed.len() < rgba.len());
}

// ============================================================================
// Pixel buffers
// ============================================================================

#[test]
fn test_encode_transparent_tile() {
    let buffer = PixelBuffer::transparent(256, 256);
    let png = encode_tile(&buffer).unwrap();
    let chunks = read_chunks(&png);
    assert_eq!(header(&chunks), (256, 256, 3));
    assert_eq!(find(&chunks, b"PLTE").unwrap().data.len(), 3);
}

#[test]
fn test_encode_tile_checks_buffer_length() {
    let buffer = PixelBuffer {
        width: 4,
        height: 4,
        pixels: vec![0u8; 10],
    };
    assert!(encode_tile(&buffer).is_err());
}
