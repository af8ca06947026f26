//! Frame sources

use crate::{CameraConfig, CameraError, VideoFrame};
use std::time::Instant;
use tracing::{debug, info};

/// Anything that can hand the tracker its next frame.
///
/// `EndOfStream` ends the session normally; any other error is fatal to
/// the session. Sources are not retried.
pub trait FrameSource: Send {
    fn read(&mut self) -> Result<VideoFrame, CameraError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read(&mut self) -> Result<VideoFrame, CameraError> {
        (**self).read()
    }
}

/// Synthetic feed of black frames.
///
/// Pairs with a replayed landmark trace when no physical camera is wired in.
pub struct TestPatternSource {
    config: CameraConfig,
    started: Instant,
    sequence: u64,
}

impl TestPatternSource {
    pub fn new(config: CameraConfig) -> Self {
        info!(
            "Test pattern source {}x{} @ {} fps (limit: {:?})",
            config.width, config.height, config.fps, config.frame_limit
        );
        Self {
            config,
            started: Instant::now(),
            sequence: 0,
        }
    }

    /// Frames produced so far
    pub fn frames_read(&self) -> u64 {
        self.sequence
    }
}

impl FrameSource for TestPatternSource {
    fn read(&mut self) -> Result<VideoFrame, CameraError> {
        if let Some(limit) = self.config.frame_limit {
            if self.sequence >= limit {
                return Err(CameraError::EndOfStream(limit));
            }
        }

        let timestamp_ns = self.started.elapsed().as_nanos() as u64;
        let frame = VideoFrame::blank(
            self.config.width,
            self.config.height,
            timestamp_ns,
            self.sequence,
        );
        debug!(sequence = self.sequence, "Frame captured");
        self.sequence += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_sequenced() {
        let mut source = TestPatternSource::new(CameraConfig {
            width: 4,
            height: 2,
            ..Default::default()
        });

        let first = source.read().unwrap();
        let second = source.read().unwrap();
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(first.data.len(), 4 * 2 * 3);
    }

    #[test]
    fn test_frame_limit_ends_feed() {
        let mut source = TestPatternSource::new(CameraConfig {
            width: 2,
            height: 2,
            frame_limit: Some(1),
            ..Default::default()
        });

        assert!(source.read().is_ok());
        assert!(matches!(source.read(), Err(CameraError::EndOfStream(1))));
        assert_eq!(source.frames_read(), 1);
    }
}
