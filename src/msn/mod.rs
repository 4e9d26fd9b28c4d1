//! # MS1/MS2 Text Parser Module
//!
//! Streaming parser for the scan-tagged text formats (`.ms1` / `.ms2`)
//! written by RawConverter, ProteoWizard and similar tools.
//!
//! ## Record Layout
//!
//! ```text
//! H   CreationDate    ...          file header, kept for pass-through
//! S   000123  000123  [prec m/z]   start of a scan (4th field => MS2)
//! I   RetTime 12.345               scan annotation
//! I   PrecursorScan   120
//! I   PrecursorInt    1.5e6
//! Z   2   1001.23                  precursor charge (forces MS2)
//! 400.1234 1523.5                  peak: m/z intensity
//! ```
//!
//! Only the peaks of the scan currently being accumulated are held in
//! memory; each completed scan is emitted as an immutable [`Spectrum`].
//! A scan without peaks is dropped when the next `S` record arrives, but the
//! final scan of a file is always emitted.
//!
//! [`Spectrum`]: crate::spectrum::Spectrum

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::spectrum::{Peak, Spectrum, SpectrumBuilder};

pub use error::MsnError;
pub use iterators::SpectrumIterator;
pub use summary::MsnSummary;

mod error;
mod iterators;
mod record;
mod summary;


use record::{Annotation, Record};

/// Default input buffer size for MS1/MS2 parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Label used in errors when the stream has no file name
const STREAM_SOURCE: &str = "<stream>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    BeforeFirstScan,
    Accumulating,
    Done,
}

/// Scan-level fields collected between two `S` records
#[derive(Debug)]
struct ScanState {
    scan_number: u32,
    ms_level: u8,
    precursor_mz: f64,
    charge: u8,
    precursor_scan: u32,
    retention_time: f32,
    total_ion_current: f64,
    peaks: Vec<Peak>,
}

impl ScanState {
    fn new(scan_number: u32, precursor_mz: Option<f64>) -> Self {
        Self {
            scan_number,
            ms_level: if precursor_mz.is_some() { 2 } else { 1 },
            precursor_mz: precursor_mz.unwrap_or(0.0),
            charge: 0,
            precursor_scan: 0,
            retention_time: 0.0,
            total_ion_current: 0.0,
            peaks: Vec::new(),
        }
    }

    fn finish(self) -> Spectrum {
        let builder = SpectrumBuilder::new(self.scan_number)
            .retention_time(self.retention_time)
            .total_ion_current(self.total_ion_current)
            .peaks(self.peaks);

        if self.ms_level >= 2 {
            builder
                .precursor(self.precursor_mz, self.charge, self.precursor_scan)
                .build()
        } else {
            builder.ms_level(1).build()
        }
    }
}

/// Pull-based streaming parser for MS1/MS2 text files
pub struct MsnStreamer<R: BufRead> {
    reader: R,
    source_name: String,
    line: Vec<u8>,
    line_number: usize,
    header_lines: Vec<String>,
    state: ParserState,
    current: Option<ScanState>,
}

impl MsnStreamer<BufReader<File>> {
    /// Open an MS1/MS2 file for streaming with default buffer size (64KB)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MsnError> {
        Self::open_with_buffer_size(path, DEFAULT_INPUT_BUFFER_SIZE)
    }

    /// Open an MS1/MS2 file for streaming with custom buffer size
    pub fn open_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> Result<Self, MsnError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MsnError::open(path, e))?;
        let reader = BufReader::with_capacity(buffer_size, file);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::with_source_name(reader, name))
    }
}

impl<R: BufRead> MsnStreamer<R> {
    /// Create a new streamer from a BufRead source
    pub fn new(reader: R) -> Self {
        Self::with_source_name(reader, STREAM_SOURCE)
    }

    /// Create a new streamer whose errors report `source_name` as the file
    pub fn with_source_name(reader: R, source_name: impl Into<String>) -> Self {
        Self {
            reader,
            source_name: source_name.into(),
            line: Vec::new(),
            line_number: 0,
            header_lines: Vec::new(),
            state: ParserState::BeforeFirstScan,
            current: None,
        }
    }

    /// Name of the file (or `<stream>`) being parsed
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Raw `H` lines seen so far, in file order
    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    /// Iterate over all spectra
    pub fn spectra(self) -> SpectrumIterator<R> {
        SpectrumIterator { streamer: self }
    }

    /// True while at least one more spectrum can be read.
    ///
    /// Before the first scan this reads ahead to the first `S` record, so a
    /// stream with no scans reports `false` without yielding anything.
    pub fn has_next(&mut self) -> Result<bool, MsnError> {
        match self.state {
            ParserState::Done => Ok(false),
            ParserState::Accumulating => Ok(true),
            ParserState::BeforeFirstScan => {
                let first = self.pump()?;
                debug_assert!(first.is_none());
                Ok(self.state == ParserState::Accumulating)
            }
        }
    }

    /// Read the next spectrum from the stream.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A format error ends
    /// the stream: every later call returns `Ok(None)`.
    pub fn next_spectrum(&mut self) -> Result<Option<Spectrum>, MsnError> {
        loop {
            match self.state {
                ParserState::Done => return Ok(None),
                ParserState::BeforeFirstScan => {
                    self.pump()?;
                }
                ParserState::Accumulating => return self.pump(),
            }
        }
    }

    /// Consume lines until a scan completes or the first scan starts.
    ///
    /// Returns the completed spectrum, if any. In `BeforeFirstScan` this stops
    /// as soon as the first `S` record has been read.
    fn pump(&mut self) -> Result<Option<Spectrum>, MsnError> {
        let result = self.pump_inner();
        if result.is_err() {
            self.state = ParserState::Done;
            self.current = None;
        }
        result
    }

    fn pump_inner(&mut self) -> Result<Option<Spectrum>, MsnError> {
        loop {
            self.line.clear();
            let bytes = self.reader.read_until(b'\n', &mut self.line)?;
            if bytes == 0 {
                self.state = ParserState::Done;
                return Ok(self.current.take().map(ScanState::finish));
            }
            self.line_number += 1;

            // Headers written by vendor tools are not always UTF-8
            let text = String::from_utf8_lossy(&self.line);
            let line = text.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() {
                continue;
            }

            let record = Record::parse(line)
                .map_err(|reason| self.format_error(line, reason))?;

            match record {
                Record::Header => self.header_lines.push(line.to_string()),
                Record::ScanStart {
                    scan_number,
                    precursor_mz,
                } => {
                    let previous = self
                        .current
                        .replace(ScanState::new(scan_number, precursor_mz));
                    let was_first = self.state == ParserState::BeforeFirstScan;
                    self.state = ParserState::Accumulating;
                    if was_first {
                        return Ok(None);
                    }
                    match previous {
                        Some(previous) if !previous.peaks.is_empty() => {
                            return Ok(Some(previous.finish()));
                        }
                        Some(previous) => debug!(
                            "{}:{}: scan {} has no peaks, dropped",
                            self.source_name, self.line_number, previous.scan_number
                        ),
                        None => {}
                    }
                }
                Record::Info(annotation) => {
                    let Some(scan) = self.current.as_mut() else {
                        debug!(
                            "{}:{}: annotation before first scan ignored",
                            self.source_name, self.line_number
                        );
                        continue;
                    };
                    match annotation {
                        Annotation::RetentionTime(rt) => scan.retention_time = rt,
                        Annotation::PrecursorScan(n) => scan.precursor_scan = n,
                        Annotation::PrecursorIntensity(v) => scan.total_ion_current = v,
                        Annotation::Other => {}
                    }
                }
                Record::Charge { charge } => {
                    if let Some(scan) = self.current.as_mut() {
                        scan.charge = charge;
                        scan.ms_level = 2;
                    }
                }
                Record::Peak(peak) => {
                    if let Some(scan) = self.current.as_mut() {
                        scan.peaks.push(peak);
                    }
                }
                Record::Unknown => {}
            }
        }
    }

    fn format_error(&self, line: &str, reason: String) -> MsnError {
        MsnError::FormatError {
            file: self.source_name.clone(),
            line_number: self.line_number,
            tag: line.chars().next().unwrap_or(' '),
            reason,
            line: line.to_string(),
        }
    }
}
