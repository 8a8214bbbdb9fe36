//! Chunked transfer codec for pushing opaque bytes over a text transport.
//!
//! The display transport only carries text frames, and the receiving
//! firmware reassembles into a small fixed buffer, so a payload is
//! base64-encoded and split into fragments of at most `chunk_size`
//! characters, framed as `IMG|<seq>/<total>|<fragment>` with a 1-indexed
//! sequence. Concatenating fragments 1..=total in order reproduces the
//! encoded stream exactly.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Wire tag for image chunk frames.
pub const CHUNK_FRAME_TAG: &str = "IMG";

/// One fragment of a chunked transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageChunk {
    /// 1-indexed position in the transfer.
    pub seq: u32,
    /// Total number of fragments in the transfer.
    pub total: u32,
    /// Base64 text fragment.
    pub payload: String,
}

impl fmt::Display for ImageChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{CHUNK_FRAME_TAG}|{}/{}|{}",
            self.seq, self.total, self.payload
        )
    }
}

impl ImageChunk {
    /// Parse a wire frame back into a chunk.
    ///
    /// Returns `None` for anything that is not a well-formed `IMG|` frame.
    pub fn parse(frame: &str) -> Option<ImageChunk> {
        let rest = frame.strip_prefix(CHUNK_FRAME_TAG)?.strip_prefix('|')?;
        let (position, payload) = rest.split_once('|')?;
        let (seq, total) = position.split_once('/')?;
        let seq: u32 = seq.parse().ok()?;
        let total: u32 = total.parse().ok()?;
        if seq == 0 || seq > total {
            return None;
        }
        Some(ImageChunk {
            seq,
            total,
            payload: payload.to_string(),
        })
    }
}

/// Encode a byte buffer and split it into ordered chunks.
///
/// `total = ceil(encoded_len / chunk_size)`; every fragment except the last
/// holds exactly `chunk_size` characters. An empty payload yields no chunks.
pub fn chunk_payload(bytes: &[u8], chunk_size: usize) -> Vec<ImageChunk> {
    debug_assert!(chunk_size > 0, "chunk size is validated at configuration");

    let encoded = BASE64.encode(bytes);
    if encoded.is_empty() {
        return Vec::new();
    }

    let total = encoded.len().div_ceil(chunk_size) as u32;

    // Base64 output is pure ASCII, so byte offsets are char offsets.
    encoded
        .as_bytes()
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, fragment)| ImageChunk {
            seq: index as u32 + 1,
            total,
            payload: String::from_utf8_lossy(fragment).into_owned(),
        })
        .collect()
}

/// Receiver-side reassembler, used for tests and device simulation.
///
/// Buffers fragments by sequence number, tolerating out-of-order arrival
/// and duplicates, and reconstructs only once every fragment of the
/// transfer is present.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    total: Option<u32>,
    parts: BTreeMap<u32, String>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one chunk. Returns the decoded payload once the transfer is
    /// complete, `None` while fragments are still missing.
    ///
    /// A chunk whose `total` disagrees with the buffered transfer starts a
    /// new transfer (the previous partial one is discarded).
    pub fn accept(&mut self, chunk: ImageChunk) -> Option<Vec<u8>> {
        if self.total != Some(chunk.total) {
            self.total = Some(chunk.total);
            self.parts.clear();
        }

        self.parts.insert(chunk.seq, chunk.payload);

        let total = self.total? as usize;
        if self.parts.len() < total {
            return None;
        }

        // BTreeMap iterates in ascending seq order.
        let encoded: String = self.parts.values().map(String::as_str).collect();
        self.total = None;
        self.parts.clear();

        BASE64.decode(encoded).ok()
    }

    /// Number of fragments buffered for the in-flight transfer.
    pub fn buffered(&self) -> usize {
        self.parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fragment_lengths_follow_the_contract() {
        // 7500 bytes encode to exactly 10000 base64 characters.
        let bytes = vec![0xABu8; 7500];
        let chunks = chunk_payload(&bytes, 4000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].payload.len(), 4000);
        assert_eq!(chunks[1].payload.len(), 4000);
        assert_eq!(chunks[2].payload.len(), 2000);
        assert!(chunks.iter().all(|c| c.total == 3));
        assert_eq!(
            chunks.iter().map(|c| c.seq).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn concatenation_reproduces_the_encoded_stream() {
        let bytes = vec![0xABu8; 7500];
        let chunks = chunk_payload(&bytes, 4000);

        let joined: String = chunks.iter().map(|c| c.payload.as_str()).collect();
        assert_eq!(joined, BASE64.encode(&bytes));
        assert_eq!(joined.len(), 10000);
    }

    #[test]
    fn evenly_divisible_payload_has_full_final_fragment() {
        let bytes = vec![1u8; 3000]; // 4000 base64 characters
        let chunks = chunk_payload(&bytes, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].payload.len(), 2000);
    }

    #[test]
    fn empty_payload_yields_no_chunks() {
        assert!(chunk_payload(&[], 4000).is_empty());
    }

    #[test]
    fn single_chunk_transfer() {
        let chunks = chunk_payload(b"hi", 4000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].seq, 1);
        assert_eq!(chunks[0].total, 1);
    }

    #[test]
    fn frame_round_trips_through_display_and_parse() {
        let chunk = ImageChunk {
            seq: 2,
            total: 5,
            payload: "AAAA".to_string(),
        };
        assert_eq!(chunk.to_string(), "IMG|2/5|AAAA");
        assert_eq!(ImageChunk::parse("IMG|2/5|AAAA"), Some(chunk));
    }

    #[test]
    fn parse_rejects_malformed_frames() {
        for frame in [
            "IMG|2/5",
            "IMG|0/5|AAAA",
            "IMG|6/5|AAAA",
            "IMG|a/5|AAAA",
            "CONNECTED|ESP32",
            "IMG2/5|AAAA",
            "",
        ] {
            assert_eq!(ImageChunk::parse(frame), None, "accepted {frame:?}");
        }
    }

    #[test]
    fn parse_keeps_pipes_inside_payload() {
        let chunk = ImageChunk::parse("IMG|1/1|ab|cd").unwrap();
        assert_eq!(chunk.payload, "ab|cd");
    }

    #[test]
    fn assembler_handles_out_of_order_arrival() {
        let bytes = b"the quick brown fox jumps over the lazy dog".to_vec();
        let mut chunks = chunk_payload(&bytes, 10);
        chunks.reverse();

        let mut assembler = ChunkAssembler::new();
        let mut decoded = None;
        for chunk in chunks {
            decoded = assembler.accept(chunk);
        }

        assert_eq!(decoded, Some(bytes));
    }

    #[test]
    fn assembler_waits_for_all_fragments() {
        let chunks = chunk_payload(&[7u8; 600], 100);
        let mut assembler = ChunkAssembler::new();

        for chunk in chunks.iter().take(chunks.len() - 1) {
            assert_eq!(assembler.accept(chunk.clone()), None);
        }
        assert!(assembler.buffered() > 0);

        let last = chunks.last().unwrap().clone();
        assert!(assembler.accept(last).is_some());
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn assembler_tolerates_duplicates() {
        let chunks = chunk_payload(b"duplicated fragments", 8);
        let mut assembler = ChunkAssembler::new();

        assert_eq!(assembler.accept(chunks[0].clone()), None);
        assert_eq!(assembler.accept(chunks[0].clone()), None);

        let mut decoded = None;
        for chunk in chunks.iter().skip(1) {
            decoded = assembler.accept(chunk.clone());
        }
        assert_eq!(decoded, Some(b"duplicated fragments".to_vec()));
    }

    #[test]
    fn assembler_restarts_on_new_transfer() {
        let first = chunk_payload(&[1u8; 300], 100);
        let second = chunk_payload(&[2u8; 30], 100);

        let mut assembler = ChunkAssembler::new();
        assert_eq!(assembler.accept(first[0].clone()), None);

        // A frame from a different transfer discards the partial state.
        assert_eq!(assembler.accept(second[0].clone()), Some(vec![2u8; 30]));
    }

    proptest! {
        #[test]
        fn chunking_round_trips_for_any_payload(
            bytes in proptest::collection::vec(any::<u8>(), 1..2048),
            chunk_size in 1usize..600,
        ) {
            let chunks = chunk_payload(&bytes, chunk_size);
            let encoded = BASE64.encode(&bytes);

            prop_assert_eq!(chunks.len(), encoded.len().div_ceil(chunk_size));
            for (index, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.seq as usize, index + 1);
                prop_assert_eq!(chunk.total as usize, chunks.len());
                if index + 1 < chunks.len() {
                    prop_assert_eq!(chunk.payload.len(), chunk_size);
                } else {
                    prop_assert!(chunk.payload.len() <= chunk_size);
                    prop_assert!(!chunk.payload.is_empty());
                }
            }

            let joined: String = chunks.iter().map(|c| c.payload.as_str()).collect();
            prop_assert_eq!(joined, encoded);
        }

        #[test]
        fn assembler_recovers_payload_from_shuffled_frames(
            bytes in proptest::collection::vec(any::<u8>(), 1..1024),
            chunk_size in 1usize..300,
            seed in any::<u64>(),
        ) {
            let mut chunks = chunk_payload(&bytes, chunk_size);

            // Cheap deterministic shuffle.
            let len = chunks.len();
            for i in (1..len).rev() {
                let j = (seed as usize).wrapping_mul(i).wrapping_add(17) % (i + 1);
                chunks.swap(i, j);
            }

            let mut assembler = ChunkAssembler::new();
            let mut decoded = None;
            for chunk in chunks {
                decoded = assembler.accept(chunk);
            }
            prop_assert_eq!(decoded, Some(bytes));
        }
    }
}
