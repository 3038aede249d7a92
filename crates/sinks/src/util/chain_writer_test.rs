//! Tests for chain writers

use super::*;
use lz4_flex::frame::FrameDecoder;
use std::io::Read;
use tempfile::NamedTempFile;

fn decompress(path: &std::path::Path) -> Vec<u8> {
    let compressed = std::fs::read(path).unwrap();
    let mut decoder = FrameDecoder::new(&compressed[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    out
}

// ============================================================================
// PlainTextWriter Tests
// ============================================================================

#[test]
fn test_plain_text_extension() {
    assert_eq!(PlainTextWriter::default().file_extension(), ".jsonl");
}

#[test]
fn test_plain_text_lines_written_verbatim() {
    let writer = PlainTextWriter::new(4096);
    let temp_file = NamedTempFile::new().unwrap();

    let mut chain = writer.wrap(temp_file.reopen().unwrap()).unwrap();
    for i in 0..10 {
        chain
            .write_all(format!("{{\"id\":{}}}\n", i).as_bytes())
            .unwrap();
    }
    chain.finish().unwrap();

    let content = std::fs::read_to_string(temp_file.path()).unwrap();
    assert_eq!(content.lines().count(), 10);
    assert!(content.starts_with("{\"id\":0}\n"));
    assert!(content.ends_with("{\"id\":9}\n"));
}

// ============================================================================
// Lz4Writer Tests
// ============================================================================

#[test]
fn test_lz4_extension() {
    assert_eq!(Lz4Writer::default().file_extension(), ".jsonl.lz4");
}

#[test]
fn test_lz4_finish_produces_frame_magic() {
    let writer = Lz4Writer::new(4096);
    let temp_file = NamedTempFile::new().unwrap();

    let mut chain = writer.wrap(temp_file.reopen().unwrap()).unwrap();
    chain.write_all(b"{\"id\":1}\n").unwrap();
    chain.finish().unwrap();

    // LZ4 frame magic: 0x184D2204
    let content = std::fs::read(temp_file.path()).unwrap();
    assert!(content.len() >= 4);
    assert_eq!(&content[0..4], &[0x04, 0x22, 0x4D, 0x18]);
}

#[test]
fn test_lz4_decompresses_to_input() {
    let writer = Lz4Writer::new(4096);
    let temp_file = NamedTempFile::new().unwrap();

    let mut original = Vec::new();
    for i in 0..500 {
        original.extend_from_slice(format!("{{\"id\":{},\"text\":\"repeat\"}}\n", i).as_bytes());
    }

    let mut chain = writer.wrap(temp_file.reopen().unwrap()).unwrap();
    chain.write_all(&original).unwrap();
    chain.finish().unwrap();

    assert_eq!(decompress(temp_file.path()), original);
    // repetitive JSON compresses well
    let on_disk = std::fs::metadata(temp_file.path()).unwrap().len();
    assert!(on_disk < original.len() as u64);
}

#[test]
fn test_lz4_empty_file_is_valid_frame() {
    let writer = Lz4Writer::new(4096);
    let temp_file = NamedTempFile::new().unwrap();

    let chain = writer.wrap(temp_file.reopen().unwrap()).unwrap();
    chain.finish().unwrap();

    assert!(decompress(temp_file.path()).is_empty());
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_default_buffer_size() {
    assert_eq!(DEFAULT_BUFFER_SIZE, 1024 * 1024);
}

#[test]
fn test_flush_multiple_times() {
    let writer = PlainTextWriter::new(4096);
    let temp_file = NamedTempFile::new().unwrap();

    let mut chain = writer.wrap(temp_file.reopen().unwrap()).unwrap();
    chain.write_all(b"first").unwrap();
    chain.flush().unwrap();
    chain.write_all(b"second").unwrap();
    chain.flush().unwrap();
    chain.write_all(b"third").unwrap();
    chain.finish().unwrap();

    let content = std::fs::read_to_string(temp_file.path()).unwrap();
    assert_eq!(content, "firstsecondthird");
}

#[test]
fn test_write_larger_than_buffer() {
    let writer = PlainTextWriter::new(4096);
    let temp_file = NamedTempFile::new().unwrap();
    let large = vec![b'x'; 256 * 1024];

    let mut chain = writer.wrap(temp_file.reopen().unwrap()).unwrap();
    chain.write_all(&large).unwrap();
    chain.finish().unwrap();

    assert_eq!(std::fs::metadata(temp_file.path()).unwrap().len(), 256 * 1024);
}
