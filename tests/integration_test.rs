//! Integration tests for pairfinder
//!
//! These tests run the directory drivers end to end on files written to a
//! temporary directory and check the CSV reports.

use pairfinder::constants::{DEFAULT_LABEL_MASS_DIFF, NEUTRON_MASS};
use pairfinder::fragments::{FragmentMatchConfig, FragmentTarget};
use pairfinder::msn::{MsnStreamer, MsnSummary};
use pairfinder::peptide::{IonType, Peptide};
use pairfinder::pipeline::{
    find_fragment_matches_in_dir, find_pairs_in_dir, PairFinderConfig, PipelineError,
};
use pairfinder::report::{
    write_fragment_matches_file, write_pairs_file, FRAGMENTS_REPORT_FILE, PAIRS_REPORT_FILE,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Peak lines for a labeled pair: light and heavy three-peak envelopes
fn pair_lines(mono: f64, charge: u8, scale: f64) -> String {
    let spacing = NEUTRON_MASS / f64::from(charge);
    let partner = mono + DEFAULT_LABEL_MASS_DIFF / f64::from(charge);
    let mut lines = String::new();
    for base in [mono, partner] {
        for (i, h) in [1000.0, 800.0, 400.0].iter().enumerate() {
            lines.push_str(&format!("{} {}\n", base + i as f64 * spacing, h * scale));
        }
    }
    lines
}

fn ms1_scan(scan: u32, rt: f32, peaks: &str) -> String {
    format!("S\t{scan:06}\t{scan:06}\nI\tRetTime\t{rt}\n{peaks}")
}

fn write_ms1_fixture(dir: &Path) {
    let mut a = String::from("H\tCreationDate\t2020-02-21\nH\tExtractor\tRawConverter\n");
    a.push_str(&ms1_scan(1, 10.0, &pair_lines(600.0, 2, 1.0)));
    a.push_str(&ms1_scan(2, 10.1, &pair_lines(600.0, 2, 2.0)));
    a.push_str(&ms1_scan(3, 10.2, &pair_lines(600.0, 2, 1.5)));
    // a lone isotope of the same precursor, picked up as its own pair
    a.push_str(&ms1_scan(4, 10.3, &pair_lines(600.0 + NEUTRON_MASS / 2.0, 2, 1.0)));
    // noise scan
    a.push_str(&ms1_scan(5, 10.4, "450.1 20\n451.7 35\n"));
    fs::write(dir.join("a.ms1"), a).unwrap();

    let b = ms1_scan(1, 20.0, &pair_lines(700.0, 3, 1.0));
    fs::write(dir.join("b.ms1"), b).unwrap();

    fs::write(dir.join("empty.ms1"), "").unwrap();
    fs::write(dir.join("ignored.txt"), "S\t1\n").unwrap();
}

/// Test the complete MS1 pair finding run
#[test]
fn test_pair_finding_pipeline() {
    let dir = tempdir().unwrap();
    write_ms1_fixture(dir.path());

    let groups = find_pairs_in_dir(dir.path(), &PairFinderConfig::default()).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.num_features(), 2);

    let a = groups.get("a.ms1").unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].mz, 600.0);
    assert_eq!(a[0].charge, 2);
    assert_eq!(a[0].intensity, 2000.0);
    assert_eq!(a[0].retention_time, 10.1);

    let b = groups.get("b.ms1").unwrap();
    assert_eq!(b[0].charge, 3);

    let output = dir.path().join(PAIRS_REPORT_FILE);
    let rows = write_pairs_file(&output, &groups).unwrap();
    assert_eq!(rows, 2);

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "file,m/z,z,intensity,rt",
            "a.ms1,600.0,2,2000.0,10.1",
            "b.ms1,700.0,3,1000.0,20.0",
        ]
    );
}

/// A malformed file aborts the run and the error names the file and line
#[test]
fn test_malformed_file_reports_location() {
    let dir = tempdir().unwrap();
    write_ms1_fixture(dir.path());
    fs::write(
        dir.path().join("c.ms1"),
        "S\t1\t1\nI\tRetTime\t1.0\n500.0 abc\n",
    )
    .unwrap();

    let err = find_pairs_in_dir(dir.path(), &PairFinderConfig::default()).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, PipelineError::Msn(_)));
    assert!(message.contains("c.ms1:3"), "{message}");
}

/// Test the MS2 fragment search run
#[test]
fn test_fragment_search_pipeline() {
    let dir = tempdir().unwrap();
    let peptide = Peptide::parse("GASPEK").unwrap();
    let target = FragmentTarget::new(peptide, IonType::Y);

    let mut text = String::from("H\tExtractor\tRawConverter\n");
    text.push_str("S\t000100\t000100\t300.5\nI\tRetTime\t25.5\nI\tPrecursorInt\t150000\nZ\t2\t600.0\n");
    for (i, mz) in target.fragment_mzs.iter().enumerate() {
        text.push_str(&format!("{} {}\n", mz + 0.01, 100.0 * (i + 1) as f64));
    }
    text.push_str("S\t000101\t000101\t410.2\nZ\t2\t819.4\n120.0 50\n130.0 40\n");
    fs::write(dir.path().join("run.ms2"), text).unwrap();

    let config = FragmentMatchConfig::default();
    let matches = find_fragment_matches_in_dir(dir.path(), &target, &config).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].scan_number, 100);
    assert_eq!(matches[0].precursor_intensity, 150000.0);
    assert_eq!(matches[0].fragments.num_matched, target.fragment_mzs.len());

    let output = dir.path().join(FRAGMENTS_REPORT_FILE);
    write_fragment_matches_file(&output, IonType::Y, target.fragment_mzs.len(), &matches)
        .unwrap();
    let text = fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "File,Scan#,PrecMz,PrecZ,PrecInten,PrecMH,RT,MaxMatchedYIonIntensity,y1,y2,y3,y4,y5,TotalMatchedIntensity,MassDiff"
    );
    assert!(lines.next().unwrap().starts_with("run.ms2,100,300.5,2,150000,"));
    assert!(lines.next().is_none());
}

/// Streaming summary over a file on disk
#[test]
fn test_summary_of_file() {
    let dir = tempdir().unwrap();
    write_ms1_fixture(dir.path());

    let streamer = MsnStreamer::open(dir.path().join("a.ms1")).unwrap();
    let spectra: Vec<_> = streamer.spectra().collect::<Result<_, _>>().unwrap();
    let summary: MsnSummary = spectra.iter().collect();

    assert_eq!(summary.num_spectra, 5);
    assert_eq!(summary.num_ms1_spectra, 5);
    assert_eq!(summary.total_peaks, 26);
    assert_eq!(summary.rt_range, Some((10.0, 10.4)));
    assert_eq!(summary.precursor_mz_range, None);
}
