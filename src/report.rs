//! CSV reports for pair finding and fragment matching results.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fragments::SpectrumMatch;
use crate::grouping::FeatureGroups;
use crate::peptide::IonType;

/// File name of the pair table written into the input directory
pub const PAIRS_REPORT_FILE: &str = "PairFinderResult.csv";

/// File name of the fragment match table written into the input directory
pub const FRAGMENTS_REPORT_FILE: &str = "Ms2SpecFinderRslt.csv";

/// Column names of the pair table
pub const PAIRS_HEADER: [&str; 5] = ["file", "m/z", "z", "intensity", "rt"];

/// Errors raised while writing reports
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report file could not be created
    #[error("Failed to create report {}: {source}", .path.display())]
    CreateError {
        /// Report path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error while writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

fn create(path: &Path) -> Result<File, ReportError> {
    File::create(path).map_err(|source| ReportError::CreateError {
        path: path.to_path_buf(),
        source,
    })
}

/// Write grouped features as `file,m/z,z,intensity,rt` rows
pub fn write_pairs<W: Write>(writer: W, groups: &FeatureGroups) -> Result<usize, ReportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(PAIRS_HEADER)?;

    let mut rows = 0;
    for (_, features) in groups.iter() {
        for feature in features {
            csv_writer.serialize(feature)?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    Ok(rows)
}

/// Write the pair table to a file
pub fn write_pairs_file<P: AsRef<Path>>(
    path: P,
    groups: &FeatureGroups,
) -> Result<usize, ReportError> {
    write_pairs(create(path.as_ref())?, groups)
}

/// Column names of the fragment match table for a ladder of `num_fragments`
pub fn fragment_header(ion_type: IonType, num_fragments: usize) -> Vec<String> {
    let label = ion_type.label();
    let mut header: Vec<String> = [
        "File", "Scan#", "PrecMz", "PrecZ", "PrecInten", "PrecMH", "RT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.push(format!("MaxMatched{}IonIntensity", label.to_uppercase()));
    header.extend((1..=num_fragments).map(|i| format!("{}{}", label, i)));
    header.push("TotalMatchedIntensity".to_string());
    header.push("MassDiff".to_string());
    header
}

/// Write qualifying MS2 spectra, one row per spectrum
pub fn write_fragment_matches<W: Write>(
    writer: W,
    ion_type: IonType,
    num_fragments: usize,
    matches: &[SpectrumMatch],
) -> Result<usize, ReportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(fragment_header(ion_type, num_fragments))?;

    for m in matches {
        let mut record = vec![
            m.source_file.clone(),
            m.scan_number.to_string(),
            m.precursor_mz.to_string(),
            m.precursor_charge.to_string(),
            m.precursor_intensity.to_string(),
            m.precursor_mh.to_string(),
            m.retention_time.to_string(),
            m.fragments.max_matched_intensity.to_string(),
        ];
        record.extend(m.fragments.relative_intensities.iter().map(f64::to_string));
        record.push(m.fragments.total_matched_intensity().to_string());
        record.push(m.mass_diff.to_string());
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(matches.len())
}

/// Write the fragment match table to a file
pub fn write_fragment_matches_file<P: AsRef<Path>>(
    path: P,
    ion_type: IonType,
    num_fragments: usize,
    matches: &[SpectrumMatch],
) -> Result<usize, ReportError> {
    write_fragment_matches(create(path.as_ref())?, ion_type, num_fragments, matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PrecursorFeature;
    use crate::fragments::FragmentMatch;
    use crate::grouping::{group_features, GroupingParams};

    #[test]
    fn test_pairs_table() {
        let groups = group_features(
            vec![
                PrecursorFeature::new("a.ms1", 800.5, 1200.0, 2, 10.25),
                PrecursorFeature::new("b.ms1", 650.25, 300.0, 3, 4.5),
            ],
            &GroupingParams::default(),
        );
        let mut buffer = Vec::new();
        let rows = write_pairs(&mut buffer, &groups).unwrap();

        assert_eq!(rows, 2);
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "file,m/z,z,intensity,rt");
        assert_eq!(lines[1], "a.ms1,800.5,2,1200.0,10.25");
        assert_eq!(lines[2], "b.ms1,650.25,3,300.0,4.5");
    }

    #[test]
    fn test_empty_pairs_table_has_header() {
        let mut buffer = Vec::new();
        assert_eq!(write_pairs(&mut buffer, &FeatureGroups::new()).unwrap(), 0);
        assert_eq!(String::from_utf8(buffer).unwrap(), "file,m/z,z,intensity,rt\n");
    }

    #[test]
    fn test_fragment_header() {
        let header = fragment_header(IonType::Y, 3);
        assert_eq!(
            header.join(","),
            "File,Scan#,PrecMz,PrecZ,PrecInten,PrecMH,RT,MaxMatchedYIonIntensity,y1,y2,y3,TotalMatchedIntensity,MassDiff"
        );
    }

    #[test]
    fn test_fragment_rows() {
        let row = SpectrumMatch {
            source_file: "run.ms2".to_string(),
            scan_number: 42,
            precursor_mz: 500.5,
            precursor_charge: 2,
            precursor_intensity: 1000.0,
            precursor_mh: 1000.0,
            retention_time: 33.5,
            fragments: FragmentMatch {
                peak_indices: vec![Some(0), None],
                relative_intensities: vec![50.0, 0.0],
                num_matched: 1,
                max_matched_intensity: 50.0,
            },
            mass_diff: -0.5,
        };
        let mut buffer = Vec::new();
        write_fragment_matches(&mut buffer, IonType::Y, 2, &[row]).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "run.ms2,42,500.5,2,1000,1000,33.5,50,50,0,50,-0.5");
    }

    #[test]
    fn test_write_pairs_file_reports_bad_path() {
        let err = write_pairs_file("/nonexistent/dir/out.csv", &FeatureGroups::new()).unwrap_err();
        assert!(matches!(err, ReportError::CreateError { .. }));
    }
}
