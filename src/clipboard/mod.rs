//! Placing rendered transcripts on the system clipboard.

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

/// Largest transcript accepted for copying (16MB)
const MAX_TRANSCRIPT_BYTES: usize = 16 * 1024 * 1024;

/// Seam over the system clipboard so copying can be tested headless.
trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard(Clipboard);

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.0.set_text(text).context("Failed to set clipboard contents")
    }
}

fn check_transcript(transcript: &str) -> Result<()> {
    if transcript.trim().is_empty() {
        bail!("Transcript is empty, nothing to copy");
    }
    if transcript.len() > MAX_TRANSCRIPT_BYTES {
        bail!(
            "Transcript too large for clipboard ({} bytes, max {})",
            transcript.len(),
            MAX_TRANSCRIPT_BYTES
        );
    }
    Ok(())
}

fn copy_into(transcript: &str, sink: &mut dyn ClipboardSink) -> Result<()> {
    check_transcript(transcript)?;
    sink.set_text(transcript)
}

/// Copies a rendered transcript to the system clipboard.
///
/// # Errors
///
/// Fails for an empty or oversized transcript (checked before the clipboard is opened) and
/// when no clipboard is available, e.g. on a headless machine.
pub fn copy_transcript(transcript: &str) -> Result<()> {
    check_transcript(transcript)?;
    let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
    copy_into(transcript, &mut SystemClipboard(clipboard))
}
