use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ctr_drbg_core::{
    cipher::SoftAes,
    ctr::{CtrBuilder, MAX_BYTES_PER_REQUEST},
    entropy::OsEntropy,
    thread::LocalCtrDrbg,
};
use std::time::Duration;

fn ctr_drbg(buf: &mut [u8], drbg: &LocalCtrDrbg) {
    drbg.fill_bytes(buf).unwrap();
}

fn ctr_drbg_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctr_drbg");
    group.measurement_time(Duration::new(10, 0));
    //
    // Measure the latency for filling small buffers. This reflects
    // the use-case of generating symmetric encryption keys and or
    // nonces.
    //
    let len_steps = vec![16, 32];
    let drbg = LocalCtrDrbg::default();
    for len in &len_steps {
        let title = format!("{}_bytes", len);
        let mut buf = vec![0u8; *len];
        group.bench_function(&title, |b| b.iter(|| ctr_drbg(&mut buf, &drbg)));
    }
    //
    // Zero sized requests only pay for the state refresh.
    //
    group.bench_function("0_bytes", |b| {
        b.iter(|| drbg.get_random(None, 0).unwrap())
    });
    //
    // Measure the cost of seeding from the OS.
    //
    let mut local = CtrBuilder::new(OsEntropy::default(), SoftAes::default()).build();
    group.bench_function("reseed", |b| b.iter(|| local.reseed().unwrap()));
    //
    // Measure the throughput for bulk random data.
    //
    let title = "max_request";
    let mut buf = vec![0u8; MAX_BYTES_PER_REQUEST];
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function(title, |b| {
        b.iter(|| local.get_random(Some(&mut buf[..]), MAX_BYTES_PER_REQUEST).unwrap())
    });
    let title = "1_MiB";
    let mut buf = vec![0u8; 1 << 20];
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function(title, |b| b.iter(|| ctr_drbg(&mut buf, &drbg)));
}

criterion_group!(benches, ctr_drbg_benchmark);
criterion_main!(benches);
