use emb_codec::dst::stitch::{decode, encode, Command, StitchChunk, MAX_DELTA};
use emb_codec::dst::{self, DATA_TERMINATOR, HEADER_SIZE};
use emb_codec::{inspect, utils, ChunkFields, ChunkTag, EmbError, HeaderMetadata, NodePayload};

const COMMANDS: [Command; 4] = [
    Command::Stitch,
    Command::Jump,
    Command::ColorChange,
    Command::Sequin,
];

#[test]
fn every_representable_motion_round_trips() {
    for command in COMMANDS {
        for dx in -MAX_DELTA..=MAX_DELTA {
            for dy in -MAX_DELTA..=MAX_DELTA {
                let chunk = StitchChunk::Motion { dx, dy, command };
                let bytes = encode(&chunk)
                    .unwrap_or_else(|e| panic!("encode failed for ({}, {}): {}", dx, dy, e));
                assert_eq!(bytes.len(), 3);
                assert_eq!(
                    decode(&bytes),
                    chunk,
                    "decode(encode) mismatch for ({}, {}, {:?})",
                    dx,
                    dy,
                    command
                );
            }
        }
    }
}

#[test]
fn known_bit_patterns_decode_as_documented() {
    // Zero motion: only the two always-set bits plus the command bits.
    let cases: [(&[u8; 3], (i32, i32, Command)); 7] = [
        (&[0x00, 0x00, 0x03], (0, 0, Command::Stitch)),
        (&[0x00, 0x00, 0x83], (0, 0, Command::Jump)),
        (&[0x00, 0x00, 0xC3], (0, 0, Command::ColorChange)),
        (&[0x00, 0x00, 0x43], (0, 0, Command::Sequin)),
        (&[0x01, 0x00, 0x03], (1, 0, Command::Stitch)),   // x+1
        (&[0x80, 0x00, 0x03], (0, 1, Command::Stitch)),   // y+1
        (&[0x02, 0x01, 0x03], (2, 0, Command::Stitch)),   // x-1 and x+3
    ];
    for (bytes, (dx, dy, command)) in cases {
        assert_eq!(
            decode(bytes.as_slice()),
            StitchChunk::Motion { dx, dy, command },
            "pattern {:02x?}",
            bytes
        );
    }
}

#[test]
fn out_of_range_deltas_are_rejected_with_no_output() {
    for (dx, dy) in [(122, 0), (-122, 0), (0, 122), (0, -122), (500, 500)] {
        let chunk = StitchChunk::Motion {
            dx,
            dy,
            command: Command::Stitch,
        };
        match encode(&chunk) {
            Err(EmbError::OutOfRange { value, max, .. }) => {
                assert_eq!(max, MAX_DELTA as i64);
                assert!(value.unsigned_abs() > MAX_DELTA as u64);
            }
            other => panic!("expected OutOfRange for ({}, {}), got {:?}", dx, dy, other),
        }
    }
}

#[test]
fn terminator_byte_round_trips() {
    assert_eq!(decode(&[DATA_TERMINATOR]), StitchChunk::Terminator);
    assert_eq!(encode(&StitchChunk::Terminator).unwrap(), vec![DATA_TERMINATOR]);
}

#[test]
fn unrecognized_chunks_are_preserved_verbatim() {
    let buffers: [&[u8]; 5] = [
        &[0x00],             // 1 byte, not the terminator
        &[0x12, 0x34],       // 2 bytes
        &[1, 2, 3, 4],       // 4 bytes
        &[0xFF; 7],          // 7 bytes
        &[],                 // empty
    ];
    for buf in buffers {
        let chunk = decode(buf);
        assert_eq!(chunk, StitchChunk::Unknown(buf.to_vec()));
        assert_eq!(encode(&chunk).unwrap(), buf, "lossless fallback for {:02x?}", buf);
    }
}

fn sample_file(trailing: &[u8]) -> Vec<u8> {
    let mut file = dst::header::encode(&HeaderMetadata::new()).expect("header");
    for chunk in [
        StitchChunk::Motion { dx: 5, dy: -3, command: Command::Stitch },
        StitchChunk::Motion { dx: 0, dy: 0, command: Command::ColorChange },
        StitchChunk::Motion { dx: -121, dy: 121, command: Command::Jump },
    ] {
        file.extend(encode(&chunk).unwrap());
    }
    file.push(DATA_TERMINATOR);
    file.extend_from_slice(trailing);
    file
}

#[test]
fn parsed_document_re_encodes_byte_for_byte() {
    for trailing in [&b""[..], &b"      "[..], &[0u8; 5][..]] {
        let file = sample_file(trailing);
        let doc = dst::parse_document(&file).expect("parse");

        let mut tags: Vec<ChunkTag> = doc.children.iter().map(|c| c.tag).collect();
        let expected_head = [
            ChunkTag::Header,
            ChunkTag::Stitch,
            ChunkTag::ColorChange,
            ChunkTag::Jump,
            ChunkTag::Terminator,
        ];
        assert_eq!(tags[..5], expected_head);
        if !trailing.is_empty() {
            assert_eq!(tags.pop(), Some(ChunkTag::Unknown));
        }

        assert_eq!(
            dst::encode_document(&doc).expect("encode"),
            file,
            "document must re-encode byte for byte (trailing {:02x?})",
            trailing
        );
    }
}

#[test]
fn terminator_value_inside_the_stream_ends_it_but_keeps_bytes() {
    // dx=-10, dy=-9 encodes with a first byte equal to the terminator value,
    // and as a standalone chunk it still decodes as motion.
    let record = encode(&StitchChunk::Motion { dx: -10, dy: -9, command: Command::Stitch }).unwrap();
    assert_eq!(record, [DATA_TERMINATOR, 0x00, 0x03]);
    assert_eq!(
        decode(&record),
        StitchChunk::Motion { dx: -10, dy: -9, command: Command::Stitch }
    );

    // At a record boundary the terminator wins, and the rest of the stream
    // is preserved verbatim as one opaque chunk, so the byte round trip
    // holds either way the ambiguity is read.
    let mut file = dst::header::encode(&HeaderMetadata::new()).expect("header");
    file.extend_from_slice(&record);
    file.push(DATA_TERMINATOR);

    let doc = dst::parse_document(&file).expect("parse");
    let tags: Vec<ChunkTag> = doc.children.iter().map(|c| c.tag).collect();
    assert_eq!(tags, [ChunkTag::Header, ChunkTag::Terminator, ChunkTag::Unknown]);
    assert_eq!(
        doc.children[2].payload,
        NodePayload::Decoded(ChunkFields::Opaque(vec![0x00, 0x03, DATA_TERMINATOR]))
    );
    assert_eq!(dst::encode_document(&doc).expect("encode"), file);
}

#[test]
fn record_shaped_tail_after_the_terminator_stays_opaque() {
    let mut file = dst::header::encode(&HeaderMetadata::new()).expect("header");
    file.extend(encode(&StitchChunk::Motion { dx: 1, dy: 1, command: Command::Stitch }).unwrap());
    file.push(DATA_TERMINATOR);
    // 3 bytes, record-shaped, but past the end of the stream; 0x00 as the
    // third byte is not a canonical record, so re-interpreting it as motion
    // would not re-encode verbatim.
    file.extend_from_slice(&[0x01, 0x02, 0x00]);

    let doc = dst::parse_document(&file).expect("parse");
    let tail = doc.children.last().expect("tail chunk");
    assert_eq!(tail.tag, ChunkTag::Unknown);
    assert_eq!(
        tail.payload,
        NodePayload::Decoded(ChunkFields::Opaque(vec![0x01, 0x02, 0x00]))
    );
    assert_eq!(tail.offset, HEADER_SIZE as u64 + 4);

    assert_eq!(dst::encode_document(&doc).expect("encode"), file);
}

#[test]
fn short_tail_without_terminator_becomes_an_opaque_chunk() {
    let mut file = dst::header::encode(&HeaderMetadata::new()).expect("header");
    file.extend_from_slice(&[0x12, 0x34]);

    let doc = dst::parse_document(&file).expect("parse");
    let tail = doc.children.last().expect("tail chunk");
    assert_eq!(tail.tag, ChunkTag::Unknown);
    assert_eq!(
        tail.payload,
        NodePayload::Decoded(ChunkFields::Opaque(vec![0x12, 0x34]))
    );
    assert_eq!(tail.offset, HEADER_SIZE as u64);

    assert_eq!(dst::encode_document(&doc).expect("encode"), file);
}

#[test]
fn truncated_header_is_rejected_with_context() {
    match dst::parse_document(&[0u8; 100]) {
        Err(EmbError::InvalidLength { expected, actual, .. }) => {
            assert_eq!(expected, HEADER_SIZE);
            assert_eq!(actual, 100);
        }
        other => panic!("expected InvalidLength, got {:?}", other),
    }
}

#[test]
fn decoded_header_metadata_is_reachable_from_the_tree() {
    let file = sample_file(b"");
    let doc = dst::parse_document(&file).expect("parse");
    match &doc.children[0].payload {
        NodePayload::Decoded(ChunkFields::Header(meta)) => {
            assert_eq!(meta.get("LA").map(|v| v.as_text()), Some("Untitled".to_string()));
        }
        other => panic!("expected decoded header, got {:?}", other),
    }
}

#[test]
fn introspection_reports_leafness_name_and_motion() {
    let file = sample_file(b"");
    let doc = dst::parse_document(&file).expect("parse");

    let root = inspect::resolve(&doc);
    assert!(!root.is_leaf);
    assert_eq!(root.name, "DST_DOCUMENT");
    assert_eq!(root.info, "0 x 0");

    let stitch = inspect::resolve(&doc.children[1]);
    assert!(stitch.is_leaf);
    assert_eq!(stitch.name, "DST_STITCH");
    assert_eq!(stitch.info, "5 x -3");

    let terminator = inspect::resolve(&doc.children[4]);
    assert_eq!(terminator.name, "DATA_TERMINATOR");
    assert_eq!(terminator.info, "0 x 0");
}

#[test]
fn packing_primitives_enforce_exact_lengths() {
    assert_eq!(utils::unpack_u8(&[0xAB]).unwrap(), 0xAB);
    assert_eq!(utils::pack_u8(0xAB), [0xAB]);
    assert_eq!(utils::unpack_u8_pair(&[1, 2]).unwrap(), (1, 2));
    assert_eq!(utils::pack_u8_pair(1, 2), [1, 2]);
    assert_eq!(utils::unpack_u24le(&[0x01, 0x02, 0x03]).unwrap(), 0x0003_0201);
    assert_eq!(utils::pack_u24le(0x0003_0201).unwrap(), [0x01, 0x02, 0x03]);

    for bad in [&[][..], &[1, 2][..], &[1, 2, 3, 4][..]] {
        match utils::unpack_u24le(bad) {
            Err(EmbError::InvalidLength { expected, actual, .. }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, bad.len());
            }
            other => panic!("expected InvalidLength for {:?}, got {:?}", bad, other),
        }
    }
    assert!(matches!(
        utils::pack_u24le(0x0100_0000),
        Err(EmbError::OutOfRange { .. })
    ));
}

#[test]
fn pes_stitch_decoding_refuses_until_verified() {
    assert!(matches!(
        emb_codec::pes::unpack_stitch(&[0x10, 0x20]),
        Err(EmbError::Unsupported(_))
    ));
    // A wrong-shaped record is still a length contract violation.
    match emb_codec::pes::unpack_stitch(&[0x10]) {
        Err(EmbError::InvalidLength { expected, actual, .. }) => {
            assert_eq!(expected, emb_codec::pes::STITCH_SIZE);
            assert_eq!(actual, 1);
        }
        other => panic!("expected InvalidLength, got {:?}", other),
    }
    assert_eq!(
        emb_codec::pes::section_length(&[0x10, 0x00, 0x00]).unwrap(),
        16
    );
}
