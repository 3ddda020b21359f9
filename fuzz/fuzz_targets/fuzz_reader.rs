#![no_main]
use std::io;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tomlex::{BufferedReader, Codepoint, CodepointReader, ReadError, ReaderOptions, Utf8Reader};

#[derive(Arbitrary, Debug)]
struct Input {
    /// Chunk size of the streaming source.
    chunk: u8,
    /// Bytes handed out per `read` call.
    step: u8,
    /// Step-back distances, consumed one per forward read.
    hops: Vec<u8>,
    data: Vec<u8>,
}

/// Reader that returns at most `step` bytes per call.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn decode<R>(mut reader: R) -> (Vec<Codepoint>, Option<ReadError>)
where
    R: CodepointReader<Mode = tomlex::Raise>,
{
    let mut out = Vec::new();
    loop {
        match reader.read_next() {
            Ok(Some(cp)) => out.push(*cp),
            Ok(None) => return (out, None),
            Err(err) => return (out, Some(err)),
        }
    }
}

fn check(input: &Input) {
    let data = &input.data;
    let from_slice = decode(Utf8Reader::from_slice(data));

    let options = ReaderOptions {
        stream_chunk_size: usize::from(input.chunk),
        ..ReaderOptions::default()
    };
    let trickle = Trickle {
        data,
        step: usize::from(input.step).max(1),
    };
    let from_stream = decode(Utf8Reader::from_reader_with_options(trickle, &options));
    assert_eq!(from_slice, from_stream);

    let (codepoints, error) = &from_slice;
    let skip_bom = usize::from(data.starts_with(b"\xEF\xBB\xBF")) * 3;
    match std::str::from_utf8(&data[skip_bom..]) {
        Ok(text) => {
            assert!(error.is_none());
            let rebuilt: Vec<u8> = codepoints
                .iter()
                .flat_map(|cp| cp.as_bytes().iter().copied())
                .collect();
            assert_eq!(rebuilt, text.as_bytes());
        }
        Err(_) => assert!(error.is_some()),
    }
    for pair in codepoints.windows(2) {
        assert!(pair[0].position() < pair[1].position());
    }

    // Interleaving step-backs must not change what the forward reads see.
    let mut inner = Utf8Reader::from_slice(data);
    let mut reader: BufferedReader<'_, _, 16> = BufferedReader::new(&mut inner);
    let mut seen = Vec::new();
    let mut hops = input.hops.iter();
    loop {
        let fresh = reader.offset() == 0;
        match reader.read_next() {
            Ok(Some(cp)) => {
                if fresh {
                    seen.push(*cp);
                }
            }
            Ok(None) => break,
            Err(err) => {
                assert_eq!(Some(&err), error.as_ref());
                break;
            }
        }
        if let Some(&hop) = hops.next() {
            let room = reader.history_len() - reader.offset();
            let hop = usize::from(hop) % (room + 1);
            let _ = reader.step_back(hop);
        }
    }
    assert_eq!(&seen, codepoints);
}

fuzz_target!(|input: Input| check(&input));
