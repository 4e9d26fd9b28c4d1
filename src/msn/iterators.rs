use std::io::BufRead;

use super::{MsnError, MsnStreamer};
use crate::spectrum::Spectrum;

/// Iterator over spectra in an MS1/MS2 file
///
/// Yields at most one error; the stream ends after it.
pub struct SpectrumIterator<R: BufRead> {
    pub(super) streamer: MsnStreamer<R>,
}

impl<R: BufRead> SpectrumIterator<R> {
    /// Header lines read so far
    pub fn header_lines(&self) -> &[String] {
        self.streamer.header_lines()
    }
}

impl<R: BufRead> Iterator for SpectrumIterator<R> {
    type Item = Result<Spectrum, MsnError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.streamer.next_spectrum() {
            Ok(Some(spectrum)) => Some(Ok(spectrum)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
