//! Line-level record classification for MS1/MS2 text files.

use std::str::FromStr;

use crate::spectrum::Peak;

/// `I` record keys that carry scan metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Annotation {
    RetentionTime(f32),
    PrecursorScan(u32),
    PrecursorIntensity(f64),
    Other,
}

/// One classified input line
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Record {
    Header,
    ScanStart {
        scan_number: u32,
        precursor_mz: Option<f64>,
    },
    Info(Annotation),
    Charge {
        charge: u8,
    },
    Peak(Peak),
    Unknown,
}

impl Record {
    /// Classify a non-empty line by its leading tag
    pub(super) fn parse(line: &str) -> Result<Self, String> {
        let first = line.chars().next().unwrap_or(' ');
        match first {
            'H' => Ok(Record::Header),
            'S' => parse_scan_start(&fields(line)),
            'I' => parse_info(&fields(line)),
            'Z' => parse_charge(&fields(line)),
            c if c.is_ascii_alphabetic() => Ok(Record::Unknown),
            _ => parse_peak(line),
        }
    }
}

/// Split a tagged record on tabs, or on whitespace when no tab is present
fn fields(line: &str) -> Vec<&str> {
    let line = line.trim_end();
    if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

fn number<T: FromStr>(field: &str, what: &str) -> Result<T, String> {
    field
        .parse()
        .map_err(|_| format!("invalid {}: '{}'", what, field))
}

fn parse_scan_start(fields: &[&str]) -> Result<Record, String> {
    let precursor_mz = match fields.len() {
        3 => None,
        4 => Some(number(fields[3], "precursor m/z")?),
        n => return Err(format!("expected 3 or 4 fields, found {}", n)),
    };
    Ok(Record::ScanStart {
        scan_number: number(fields[1], "scan number")?,
        precursor_mz,
    })
}

fn parse_info(fields: &[&str]) -> Result<Record, String> {
    let key = fields.get(1).copied().unwrap_or_default();
    let annotation = match key {
        "RetTime" | "RTime" => {
            Annotation::RetentionTime(number(value_field(fields, key)?, "retention time")?)
        }
        "PrecursorScan" => {
            Annotation::PrecursorScan(number(value_field(fields, key)?, "precursor scan")?)
        }
        "PrecursorInt" => {
            Annotation::PrecursorIntensity(number(value_field(fields, key)?, "precursor intensity")?)
        }
        _ => Annotation::Other,
    };
    Ok(Record::Info(annotation))
}

fn value_field<'a>(fields: &[&'a str], key: &str) -> Result<&'a str, String> {
    if fields.len() != 3 {
        return Err(format!("{} expects 3 fields, found {}", key, fields.len()));
    }
    Ok(fields[2])
}

fn parse_charge(fields: &[&str]) -> Result<Record, String> {
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    }
    Ok(Record::Charge {
        charge: number(fields[1], "charge")?,
    })
}

fn parse_peak(line: &str) -> Result<Record, String> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(mz), Some(intensity)) => Ok(Record::Peak(Peak::new(
            number(mz, "m/z")?,
            number(intensity, "intensity")?,
        ))),
        _ => Err("expected '<m/z> <intensity>'".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_start_levels() {
        assert_eq!(
            Record::parse("S\t000010\t000010").unwrap(),
            Record::ScanStart {
                scan_number: 10,
                precursor_mz: None
            }
        );
        assert_eq!(
            Record::parse("S\t11\t11\t652.33").unwrap(),
            Record::ScanStart {
                scan_number: 11,
                precursor_mz: Some(652.33)
            }
        );
        assert!(Record::parse("S\t12").is_err());
        assert!(Record::parse("S\tabc\tabc").is_err());
    }

    #[test]
    fn test_info_keys() {
        assert_eq!(
            Record::parse("I\tRetTime\t12.5").unwrap(),
            Record::Info(Annotation::RetentionTime(12.5))
        );
        assert_eq!(
            Record::parse("I\tPrecursorScan\t42").unwrap(),
            Record::Info(Annotation::PrecursorScan(42))
        );
        assert_eq!(
            Record::parse("I\tPrecursorInt\t1.5e6").unwrap(),
            Record::Info(Annotation::PrecursorIntensity(1.5e6))
        );
        assert_eq!(
            Record::parse("I\tInstrumentType\tOrbitrap Fusion").unwrap(),
            Record::Info(Annotation::Other)
        );
        assert!(Record::parse("I\tRetTime").is_err());
        assert!(Record::parse("I\tRetTime\t1.0\textra").is_err());
    }

    #[test]
    fn test_charge_record() {
        assert_eq!(
            Record::parse("Z\t3\t1500.7").unwrap(),
            Record::Charge { charge: 3 }
        );
        assert!(Record::parse("Z\t3").is_err());
    }

    #[test]
    fn test_peak_lines() {
        assert_eq!(
            Record::parse("400.5 1200").unwrap(),
            Record::Peak(Peak::new(400.5, 1200.0))
        );
        assert_eq!(
            Record::parse("400.5\t1200\t0\t0").unwrap(),
            Record::Peak(Peak::new(400.5, 1200.0))
        );
        assert!(Record::parse("400.5").is_err());
        assert!(Record::parse("400.5 x").is_err());
    }

    #[test]
    fn test_whitespace_separated_tags() {
        assert_eq!(
            Record::parse("S 5 5").unwrap(),
            Record::ScanStart {
                scan_number: 5,
                precursor_mz: None
            }
        );
        assert_eq!(Record::parse("D\tsomething").unwrap(), Record::Unknown);
    }
}
