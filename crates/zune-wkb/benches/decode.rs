use std::fs::read;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn decode_zune_wkb(data: &[u8]) -> zune_wkb::Raster {
    zune_wkb::decode(data).unwrap()
}

fn bench_decode(c: &mut Criterion) {
    let a = env!("CARGO_MANIFEST_DIR").to_string() + "/tests/data/elevation_16bsi.wkb";

    let data = read(a).unwrap();
    let mut group = c.benchmark_group("wkb: Simple decode");

    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("zune-wkb", |b| {
        b.iter(|| black_box(decode_zune_wkb(data.as_slice())))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=bench_decode);

criterion_main!(benches);
