use std::io::{BufReader, Cursor};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use pairfinder::features::{find_features, ExtractionParams};
use pairfinder::msn::MsnStreamer;

fn generate_test_ms1(num_spectra: usize, peaks_per_spectrum: usize) -> Vec<u8> {
    let mut text = String::from("H\tCreationDate\t2020-02-21\nH\tExtractor\tRawConverter\n");

    for i in 0..num_spectra {
        let rt = (i as f64) * 0.05;
        text.push_str(&format!(
            "S\t{:06}\t{:06}\nI\tRetTime\t{:.4}\nI\tIonInjectionTime\t50.0\n",
            i + 1,
            i + 1,
            rt
        ));
        for j in 0..peaks_per_spectrum {
            let mz = 300.0 + (j as f64) * 1.7 + (i as f64) * 0.001;
            let intensity = 1000.0 + ((j * 37 + i) % 101) as f64 * 50.0;
            text.push_str(&format!("{:.5} {:.1}\n", mz, intensity));
        }
    }

    text.into_bytes()
}

fn bench_next_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("msn_streamer_next_spectrum");

    for num_spectra in [100, 500, 1000] {
        let peaks_per_spectrum = 200;
        let total_peaks = num_spectra * peaks_per_spectrum;
        let bytes = Arc::new(generate_test_ms1(num_spectra, peaks_per_spectrum));

        group.throughput(Throughput::Elements(total_peaks as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_spectra), &bytes, |b, bytes| {
            b.iter_batched(
                || MsnStreamer::new(BufReader::new(Cursor::new(bytes.as_ref().clone()))),
                |mut streamer| {
                    let mut count = 0usize;
                    while let Some(spectrum) = streamer.next_spectrum().unwrap() {
                        count += spectrum.len();
                    }
                    black_box(count);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_find_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("msn_streamer_find_features");
    let params = ExtractionParams::default();

    for num_spectra in [100, 500] {
        let peaks_per_spectrum = 200;
        let bytes = Arc::new(generate_test_ms1(num_spectra, peaks_per_spectrum));

        group.throughput(Throughput::Elements(num_spectra as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_spectra), &bytes, |b, bytes| {
            b.iter_batched(
                || MsnStreamer::new(Cursor::new(bytes.as_ref().clone())),
                |streamer| black_box(find_features(streamer, &params).unwrap().len()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_next_spectrum, bench_find_features);
criterion_main!(benches);
