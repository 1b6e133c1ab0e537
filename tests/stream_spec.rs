use lsd_reader::{
    BitReader, BitStream, ByteSource, ConstantKey, FileSource, LsdError, MemorySource,
    OverlayReader, RotatingKey, XoringSource,
};
use std::fs;
use std::path::PathBuf;

const SAMPLE: &[u8] = &[0x0F, 0xF0];

/// Writes `contents` to a per-test file under the system temp directory.
fn temp_fixture(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "lsd-reader-it-{}-{}",
        std::process::id(),
        name
    ));
    fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
    path
}

/// Obfuscates `plain` with the same keystream the reader will undo.
fn obfuscate(plain: &[u8], key: RotatingKey) -> Vec<u8> {
    let mut src = XoringSource::new(MemorySource::new(plain), key);
    src.read_vec(plain.len()).unwrap()
}

#[test]
fn nibble_scenario() {
    let mut reader = BitReader::new(MemorySource::new(SAMPLE));
    assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    assert_eq!(reader.read_bits(4).unwrap(), 0xF);
    assert_eq!(reader.read_bits(8).unwrap(), 0xF0);
    assert_eq!(reader.tell(), 2);
}

#[test]
fn constant_key_scenario() {
    let source = XoringSource::new(MemorySource::new(SAMPLE), ConstantKey(0xFF));
    let mut reader = BitReader::new(source);
    assert_eq!(reader.read_raw_bytes(2).unwrap(), vec![0xF0, 0x0F]);
}

#[test]
fn seek_scenario() {
    let mut reader = BitReader::new(MemorySource::new(SAMPLE));
    reader.seek(1);
    assert_eq!(reader.read_bits(4).unwrap(), 0xF);

    let mut sequential = BitReader::new(MemorySource::new(SAMPLE));
    sequential.read_bits(8).unwrap();
    assert_eq!(sequential.read_bits(4).unwrap(), 0xF);
}

#[test]
fn reading_past_end_is_clamped() {
    let mut reader = BitReader::new(MemorySource::new(SAMPLE));
    assert_eq!(reader.read_raw_bytes(5).unwrap(), SAMPLE.to_vec());
    assert_eq!(reader.tell(), 2);
    assert_eq!(reader.read_bits(32).unwrap(), 0);
    assert_eq!(reader.tell(), 2);
}

#[test]
fn obfuscated_file_decodes_after_random_seeks() {
    let plain: Vec<u8> = (0..200u32).map(|i| (i * 7 + 3) as u8).collect();
    let key = RotatingKey::new(0xA7);
    let path = temp_fixture("xor.lsd", &obfuscate(&plain, key));

    let mut reader = BitReader::new(XoringSource::new(FileSource::open(&path).unwrap(), key));
    for &pos in &[150u64, 3, 199, 0, 64, 65] {
        reader.seek(pos);
        assert_eq!(reader.read_bits(8).unwrap(), u32::from(plain[pos as usize]));
    }
    reader.seek(190);
    assert_eq!(reader.read_raw_bytes(20).unwrap(), plain[190..].to_vec());
    assert_eq!(reader.tell(), 200);

    fs::remove_file(path).unwrap();
}

#[test]
fn file_and_memory_sources_agree() {
    let data: Vec<u8> = (0..=255u8).rev().collect();
    let path = temp_fixture("agree.bin", &data);

    let mut from_file = BitReader::new(FileSource::open(&path).unwrap());
    let mut from_memory = BitReader::new(MemorySource::new(&data[..]));
    for width in (1..=32).cycle().take(90) {
        assert_eq!(
            from_file.read_bits(width).unwrap(),
            from_memory.read_bits(width).unwrap()
        );
        assert_eq!(from_file.tell(), from_memory.tell());
    }

    fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_fails_at_construction() {
    let result = FileSource::open(std::env::temp_dir().join("lsd-reader-no-such-file.lsd"));
    assert!(matches!(result, Err(LsdError::Io(_))));
}

#[test]
fn borrowed_source_can_be_reused() {
    let mut source = MemorySource::new(vec![0xAB, 0xCD, 0xEF]);
    {
        let mut reader = BitReader::new(&mut source);
        assert_eq!(reader.read_bits(12).unwrap(), 0xABC);
    }
    // The partial byte was pulled from the source before the reader dropped.
    assert_eq!(source.tell(), 2);
    assert_eq!(source.read_vec(1).unwrap(), vec![0xEF]);
}

#[test]
fn overlay_directory_over_obfuscated_file() {
    let key = RotatingKey::new(0x3C);
    let mut plain = vec![0u8; 8];
    plain.extend_from_slice(&1u32.to_le_bytes());
    plain.push(3);
    for unit in "abc".encode_utf16() {
        plain.extend_from_slice(&unit.to_le_bytes());
    }
    for field in [0u32, 0, 10, 4] {
        plain.extend_from_slice(&field.to_le_bytes());
    }
    let data_offset = plain.len() as u64;
    plain.extend_from_slice(&[9, 8, 7, 6]);
    let path = temp_fixture("overlay.lsd", &obfuscate(&plain, key));

    let stream = BitReader::new(XoringSource::new(FileSource::open(&path).unwrap(), key));
    let mut overlay = OverlayReader::new(stream, 8, data_offset).unwrap();
    let headings = overlay.read_headings().unwrap();
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].name, "abc");
    assert_eq!(headings[0].inflated_size, 10);
    assert_eq!(overlay.read_entry_raw(&headings[0]).unwrap(), vec![9, 8, 7, 6]);

    fs::remove_file(path).unwrap();
}

#[test]
fn dyn_bit_stream_is_usable() {
    let mut reader = BitReader::new(MemorySource::new(vec![0x80, 0x01, 0x00]));
    let stream: &mut dyn BitStream = &mut reader;
    assert!(stream.read_bit().unwrap());
    stream.align_to_byte();
    assert_eq!(stream.read_u16_le().unwrap(), 0x0001);
    assert_eq!(stream.tell(), 3);
}
