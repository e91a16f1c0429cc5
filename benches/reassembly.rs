//! Criterion benchmarks for adapter-stream frame reassembly.
//!
//! Measures throughput of [`FrameReassembler`] for small and large payloads,
//! delivered either in one chunk or in fixed-size reads as a TCP socket would
//! hand them over.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use dapbridge::{FrameFormat, FrameReassembler};
use dapbridge_testing::{encode_frames, split_at_offsets};

const FRAMES_PER_BATCH: usize = 64;

fn batch(payload_len: usize) -> Vec<u8> {
    let payload = vec![b'x'; payload_len];
    let payloads = vec![payload.as_slice(); FRAMES_PER_BATCH];
    encode_frames(&payloads).to_vec()
}

fn chunked(wire: &[u8], read_size: usize) -> Vec<Vec<u8>> {
    let offsets: Vec<usize> = (read_size..wire.len()).step_by(read_size).collect();
    split_at_offsets(wire, &offsets)
}

fn reassemble(chunks: &[Vec<u8>]) -> usize {
    let mut reassembler = FrameReassembler::new(FrameFormat::default());
    let mut frames = 0;
    for chunk in chunks {
        reassembler.push_chunk(chunk);
        while let Ok(Some(frame)) = reassembler.next_buffered() {
            black_box(frame.payload());
            frames += 1;
        }
    }
    frames
}

fn benchmark_reassembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassembly");

    for payload_len in [64, 4 * 1024, 256 * 1024] {
        let wire = batch(payload_len);
        group.throughput(Throughput::Bytes(wire.len() as u64));
        for read_size in [wire.len(), 8 * 1024, 512] {
            let chunks = chunked(&wire, read_size);
            let label = format!("payload={payload_len}/read={read_size}");
            group.bench_function(BenchmarkId::from_parameter(label), |b| {
                b.iter(|| {
                    let frames = reassemble(black_box(&chunks));
                    assert_eq!(frames, FRAMES_PER_BATCH);
                });
            });
        }
    }

    group.finish();
}

/// Entrypoint for reassembly throughput benchmarks.
fn main() {
    let mut criterion = Criterion::default().configure_from_args();
    benchmark_reassembly(&mut criterion);
    criterion.final_summary();
}
