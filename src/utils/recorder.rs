use crate::error::Result;
use crate::processing::acquisition::Sample;
use std::fs::{self, File};
use std::path::Path;

/// Writes every processed sample as a `timestamp,value` CSV row.
pub struct SampleRecorder {
    writer: csv::Writer<File>,
}

impl SampleRecorder {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }

    pub fn record(&mut self, sample: &Sample) -> Result<()> {
        self.writer.serialize(sample)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn read_samples_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    let mut samples = Vec::new();
    for result in rdr.deserialize() {
        let sample: Sample = result?;
        samples.push(sample);
    }
    Ok(samples)
}
