//! Error types for minslide

use crate::host::ClipId;
use crate::{AudioCodec, Container, VideoCodec};
use thiserror::Error;

/// Result type alias for minslide operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for minslide operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Slide show settings rejected before touching the timeline
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The timeline holds no clips to work with
    #[error("The timeline has no clips")]
    EmptyTimeline,

    /// Two clips claim the same ordinal slot
    #[error("Two clips start at frame {slot}; the timeline order is ambiguous")]
    DuplicateSlot { slot: i64 },

    /// A clip starts outside the 1..=count slot range
    #[error("Clip starts at frame {start}, outside the expected range 1..={count}")]
    SlotOutOfRange { start: i64, count: usize },

    /// An operation needs a registry built by `initialize`
    #[error("The slide show has not been initialized")]
    NotInitialized,

    /// The playhead is not on any registered clip
    #[error("No clip is registered at frame {0}")]
    NoClipAtFrame(i64),

    /// A clip reported by the host cannot be processed
    #[error("Clip {id}: {reason}")]
    InvalidClip { id: ClipId, reason: String },

    /// Container cannot carry the selected video codec
    #[error("Container {container:?} does not support video codec {codec:?}")]
    ContainerVideoMismatch { container: Container, codec: VideoCodec },

    /// Container cannot carry the selected audio codec
    #[error("Container {container:?} does not support audio codec {codec:?}")]
    ContainerAudioMismatch { container: Container, codec: AudioCodec },

    /// A timeline host query or command failed
    #[error("Host error: {0}")]
    Host(String),

    /// Settings document could not be parsed
    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for the errors that mean the host's clip ordering is unusable
    pub fn is_inconsistent_registry(&self) -> bool {
        matches!(
            self,
            Error::DuplicateSlot { .. } | Error::SlotOutOfRange { .. }
        )
    }
}

/// Error code for FFI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum ErrorCode {
    /// Success
    Ok = 0,
    /// Invalid input parameter
    InvalidInput = 1,
    /// Invalid slide show configuration
    InvalidConfig = 2,
    /// Clip ordering on the timeline is inconsistent
    InconsistentRegistry = 3,
    /// Session not initialized
    NotInitialized = 4,
    /// No clip under the playhead
    NoClipAtFrame = 5,
    /// Clip cannot be processed
    InvalidClip = 6,
    /// Container/codec mismatch
    ContainerCodecMismatch = 7,
    /// Host callback failed
    HostError = 8,
}

impl From<&Error> for ErrorCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidInput(_) => ErrorCode::InvalidInput,
            Error::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Error::Json(_) => ErrorCode::InvalidConfig,
            Error::EmptyTimeline => ErrorCode::InvalidInput,
            Error::DuplicateSlot { .. } => ErrorCode::InconsistentRegistry,
            Error::SlotOutOfRange { .. } => ErrorCode::InconsistentRegistry,
            Error::NotInitialized => ErrorCode::NotInitialized,
            Error::NoClipAtFrame(_) => ErrorCode::NoClipAtFrame,
            Error::InvalidClip { .. } => ErrorCode::InvalidClip,
            Error::ContainerVideoMismatch { .. } => ErrorCode::ContainerCodecMismatch,
            Error::ContainerAudioMismatch { .. } => ErrorCode::ContainerCodecMismatch,
            Error::Host(_) => ErrorCode::HostError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_share_code() {
        let errors = [
            Error::DuplicateSlot { slot: 2 },
            Error::SlotOutOfRange { start: 9, count: 4 },
        ];
        for err in &errors {
            assert!(err.is_inconsistent_registry());
            assert_eq!(ErrorCode::from(err), ErrorCode::InconsistentRegistry);
        }
        assert!(!Error::EmptyTimeline.is_inconsistent_registry());
    }

    #[test]
    fn test_error_messages_name_the_frame() {
        let err = Error::DuplicateSlot { slot: 3 };
        assert!(err.to_string().contains("frame 3"));
        let err = Error::SlotOutOfRange { start: 7, count: 4 };
        assert!(err.to_string().contains("frame 7"));
    }
}
