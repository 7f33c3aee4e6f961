//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(50)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// Build a bulk listing body with `count` records, every third one unpublished
pub fn generate_listing(count: usize) -> Vec<u8> {
    let mut body = String::from(r#"{"_updated":1488362400000"#);

    for i in 0..count {
        let time = if i % 3 == 2 {
            r#"{"created":"2016-01-01T00:00:00.000Z"}"#
        } else {
            r#"{"created":"2016-01-01T00:00:00.000Z","modified":"2017-03-01T10:00:00.000Z"}"#
        };
        body.push_str(&format!(
            r#","package-{i:06}":{{"name":"package-{i:06}","description":"Benchmark package {{{i}}} with \"quotes\"","dist-tags":{{"latest":"1.{i}.0"}},"maintainers":[{{"name":"bench","email":"bench@example.com"}}],"time":{time},"keywords":["bench","listing"],"license":"MIT"}}"#
        ));
    }

    body.push('}');
    body.into_bytes()
}

/// Cut a body into chunks of `size` bytes
pub fn chunked(body: &[u8], size: usize) -> Vec<bytes::Bytes> {
    body.chunks(size.max(1))
        .map(bytes::Bytes::copy_from_slice)
        .collect()
}
