//! Conversation-level transforms applied after parsing: batch downsampling and transcript
//! rendering.

pub mod downsample;
pub mod transcript;

pub use downsample::{clamp_ratio, downsample};
pub use transcript::{render_transcript, role_label};
