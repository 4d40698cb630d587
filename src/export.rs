//! Export configuration

use crate::host::TimelineHost;
use crate::{ExportSettings, Result};
use tracing::info;

/// Write the final frame and export format to the host
///
/// `frame_end` is the last rendered frame (inclusive).
pub fn configure_export(
    host: &mut dyn TimelineHost,
    frame_end: i64,
    export: &ExportSettings,
) -> Result<()> {
    export.validate()?;

    host.set_frame_end(frame_end)?;
    host.set_export(export)?;

    info!(
        frame_end,
        container = ?export.container,
        video_codec = ?export.video_codec,
        audio_codec = ?export.audio_codec,
        "export configured"
    );
    Ok(())
}
