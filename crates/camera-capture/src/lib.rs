//! Camera Capture Library for the Focus Tracker
//!
//! Provides the frame type exchanged between the capture shell and the
//! focus pipeline, and the contract every frame source implements:
//! - `VideoFrame`: packed RGB24 pixels plus capture metadata
//! - `FrameSource`: blocking read of the next frame
//! - `TestPatternSource`: synthetic feed used by the demo binary and tests

pub mod frame;
pub mod source;

pub use frame::VideoFrame;
pub use source::{FrameSource, TestPatternSource};

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("End of stream after {0} frames")]
    EndOfStream(u64),
}

/// Camera configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
    /// Stop after this many frames (None = endless)
    pub frame_limit: Option<u64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 12,
            frame_limit: None,
        }
    }
}
