//! Synthesized image fixtures: a 1x1 grayscale PNG and a 1x1 grayscale
//! JPEG, small enough to build by hand but valid for real decoders, so no
//! binary assets need to be checked in.

/// CRC-32 (ISO 3309, reflected, poly 0xEDB88320) over chunk type + data.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Frame a PNG chunk: length, type, data, CRC.
pub fn png_chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let mut crc_input = kind.to_vec();
    crc_input.extend_from_slice(data);
    out.extend_from_slice(&crc32(&crc_input).to_be_bytes());
    out
}

/// A 1x1 grayscale PNG: signature, IHDR, IDAT (stored-deflate), IEND.
pub fn tiny_png() -> Vec<u8> {
    let mut out = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    // width 1, height 1, bit depth 8, color type 0, default methods
    let ihdr = [0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0];
    out.extend_from_slice(&png_chunk(b"IHDR", &ihdr));
    // zlib header + one stored-deflate block: filter byte 0 + one pixel,
    // followed by the adler32 of those two zero bytes
    let idat = [
        0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01,
    ];
    out.extend_from_slice(&png_chunk(b"IDAT", &idat));
    out.extend_from_slice(&png_chunk(b"IEND", &[]));
    out
}

/// The same PNG with one extra `tEXt` entry before IEND.
pub fn tiny_png_with_text(keyword: &str, text: &str) -> Vec<u8> {
    let mut contents = keyword.as_bytes().to_vec();
    contents.push(0);
    contents.extend_from_slice(text.as_bytes());
    let chunk = png_chunk(b"tEXt", &contents);

    let mut png = tiny_png();
    let iend_start = png.len() - 12; // IEND is the final 12 bytes
    png.splice(iend_start..iend_start, chunk);
    png
}

/// Walk the chunks of a PNG byte stream, returning (type, data) pairs.
pub fn png_chunks(bytes: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
    let mut chunks = Vec::new();
    let mut pos = 8; // skip signature
    while pos + 12 <= bytes.len() {
        let len = u32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap()) as usize;
        let kind: [u8; 4] = bytes[pos + 4..pos + 8].try_into().unwrap();
        let data = bytes[pos + 8..pos + 8 + len].to_vec();
        chunks.push((kind, data));
        pos += 12 + len;
    }
    chunks
}

/// A 1x1 grayscale JPEG with single-code Huffman tables and no APP1
/// segment: SOI, APP0, DQT, SOF0, two DHTs, SOS + entropy data, EOI.
pub fn tiny_jpeg() -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(&[0xFF, 0xD8]);
    // APP0 / JFIF 1.1, no thumbnail
    out.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
        0x00, 0x01, 0x00, 0x00,
    ]);
    // DQT table 0, all ones
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    out.extend_from_slice(&[0x01; 64]);
    // SOF0: 8-bit, 1x1, one component, no subsampling, quant table 0
    out.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    ]);
    // DC table 0: a single 1-bit code for symbol 0 (category 0)
    out.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, 0x00, 0x01]);
    out.extend_from_slice(&[0x00; 15]);
    out.push(0x00);
    // AC table 0: a single 1-bit code for symbol 0 (EOB)
    out.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, 0x10, 0x01]);
    out.extend_from_slice(&[0x00; 15]);
    out.push(0x00);
    // SOS, then two entropy bits (DC diff 0, EOB) padded with ones
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    out.push(0x3F);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// Walk the segments of a JPEG byte stream, returning (marker, payload)
/// pairs. The scan data following SOS is returned as the payload of the
/// 0xDA entry; SOI and EOI carry empty payloads.
pub fn jpeg_segments(bytes: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut segments = Vec::new();
    let mut pos = 0;
    while pos + 2 <= bytes.len() {
        assert_eq!(bytes[pos], 0xFF, "expected marker at offset {pos}");
        let marker = bytes[pos + 1];
        pos += 2;
        match marker {
            0xD8 | 0xD9 => segments.push((marker, Vec::new())),
            0xDA => {
                // everything up to EOI is entropy-coded scan data
                let end = bytes.len() - 2;
                segments.push((marker, bytes[pos..end].to_vec()));
                pos = end;
            }
            _ => {
                let len =
                    u16::from_be_bytes(bytes[pos..pos + 2].try_into().unwrap()) as usize;
                segments.push((marker, bytes[pos + 2..pos + len].to_vec()));
                pos += len;
            }
        }
    }
    segments
}
