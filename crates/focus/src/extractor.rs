//! Landmark extraction contract and replay implementation
//!
//! The face-mesh model itself lives outside this crate. Anything that turns
//! a frame into zero or one landmark set implements `LandmarkExtractor`.

use camera_capture::VideoFrame;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};
use crate::landmarks::{LandmarkSet, Point};
use crate::FocusError;

/// Turns a frame into the landmarks of the primary face, if any
pub trait LandmarkExtractor: Send {
    fn extract(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, FocusError>;
}

impl<E: LandmarkExtractor + ?Sized> LandmarkExtractor for Box<E> {
    fn extract(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, FocusError> {
        (**self).extract(frame)
    }
}

/// Extractor that never sees a face
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFaceExtractor;

impl LandmarkExtractor for NoFaceExtractor {
    fn extract(&mut self, _frame: &VideoFrame) -> Result<Option<LandmarkSet>, FocusError> {
        Ok(None)
    }
}

/// Replays a recorded landmark trace.
///
/// The trace is JSON lines, one record per frame: `null` when no face was
/// found, otherwise an array of `[x, y]` pairs. Frame `n` is served record
/// `n % len`, so short traces loop.
#[derive(Debug, Clone)]
pub struct ReplayExtractor {
    records: Vec<Option<LandmarkSet>>,
}

impl ReplayExtractor {
    /// Load a trace file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FocusError> {
        let path = path.as_ref();
        info!("Loading landmark trace from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a trace from any reader
    pub fn from_reader(reader: impl Read) -> Result<Self, FocusError> {
        let mut records = Vec::new();

        for (number, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let raw: Option<Vec<[f32; 2]>> =
                serde_json::from_str(&line).map_err(|e| FocusError::Trace {
                    line: number + 1,
                    reason: e.to_string(),
                })?;

            let record = match raw {
                Some(points) => {
                    let points = points.into_iter().map(Point::from).collect();
                    Some(LandmarkSet::new(points)?)
                }
                None => None,
            };
            records.push(record);
        }

        if records.is_empty() {
            return Err(FocusError::Trace {
                line: 0,
                reason: "trace contains no records".into(),
            });
        }

        info!("Landmark trace loaded: {} records", records.len());
        Ok(Self { records })
    }

    /// Build from in-memory records
    pub fn from_records(records: Vec<Option<LandmarkSet>>) -> Result<Self, FocusError> {
        if records.is_empty() {
            return Err(FocusError::Trace {
                line: 0,
                reason: "trace contains no records".into(),
            });
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LandmarkExtractor for ReplayExtractor {
    fn extract(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, FocusError> {
        let index = (frame.sequence % self.records.len() as u64) as usize;
        debug!(sequence = frame.sequence, record = index, "Replaying landmarks");
        Ok(self.records[index].clone())
    }
}
