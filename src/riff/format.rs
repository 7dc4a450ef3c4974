// WAVE `fmt ` chunk and derived audio properties

use serde::Serialize;

use crate::error::ParseError;
use crate::utils::io::{le_u16, le_u32};

/// Minimum `fmt ` payload (PCMWAVEFORMAT)
pub const FMT_MIN_SIZE: usize = 16;

/// Format tags commonly seen in broadcast WAV files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatTag {
    Pcm,
    IeeeFloat,
    ALaw,
    MuLaw,
    Extensible,
    Other(u16),
}

impl FormatTag {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0001 => FormatTag::Pcm,
            0x0003 => FormatTag::IeeeFloat,
            0x0006 => FormatTag::ALaw,
            0x0007 => FormatTag::MuLaw,
            0xFFFE => FormatTag::Extensible,
            other => FormatTag::Other(other),
        }
    }
}

/// Decoded `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveFormat {
    pub format_tag: FormatTag,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl WaveFormat {
    /// Decode a `fmt ` chunk payload
    pub fn parse(payload: &[u8]) -> Result<Self, ParseError> {
        let too_short = || ParseError::TooShort {
            what: "fmt chunk",
            needed: FMT_MIN_SIZE,
            actual: payload.len(),
        };

        Ok(WaveFormat {
            format_tag: FormatTag::from_u16(le_u16(payload, 0).ok_or_else(too_short)?),
            channels: le_u16(payload, 2).ok_or_else(too_short)?,
            sample_rate: le_u32(payload, 4).ok_or_else(too_short)?,
            byte_rate: le_u32(payload, 8).ok_or_else(too_short)?,
            block_align: le_u16(payload, 12).ok_or_else(too_short)?,
            bits_per_sample: le_u16(payload, 14).ok_or_else(too_short)?,
        })
    }

    /// Bytes per sample frame, derived from the header when `block_align` is zero
    pub fn frame_size(&self) -> u32 {
        if self.block_align > 0 {
            return u32::from(self.block_align);
        }
        let bytes_per_sample = u32::from(self.bits_per_sample).div_ceil(8);
        bytes_per_sample * u32::from(self.channels)
    }
}

/// Stream properties derived from `fmt ` and the `data` chunk size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioProperties {
    pub format: WaveFormat,
    pub frames: u64,
    pub duration_seconds: f64,
}

impl AudioProperties {
    pub fn new(format: WaveFormat, data_size: u64) -> Self {
        let frame_size = u64::from(format.frame_size());
        let frames = if frame_size > 0 { data_size / frame_size } else { 0 };
        let duration_seconds = if format.sample_rate > 0 {
            frames as f64 / f64::from(format.sample_rate)
        } else {
            0.0
        };

        AudioProperties {
            format,
            frames,
            duration_seconds,
        }
    }

    /// Duration as `HH:MM:SS:FF`
    pub fn timecode(&self, fps: u32) -> String {
        seconds_to_timecode(self.duration_seconds, fps)
    }
}

/// Render seconds as `HH:MM:SS:FF` at `fps` frames per second
pub fn seconds_to_timecode(seconds: f64, fps: u32) -> String {
    let seconds = seconds.max(0.0);
    let whole = seconds.trunc() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let frames = (seconds.fract() * f64::from(fps)) as u64;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, secs, frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_fmt(channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * bits / 8;
        let mut out = Vec::new();
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out
    }

    #[test]
    fn test_parse_pcm() {
        let format = WaveFormat::parse(&pcm_fmt(2, 48000, 24)).unwrap();
        assert_eq!(format.format_tag, FormatTag::Pcm);
        assert_eq!(format.channels, 2);
        assert_eq!(format.sample_rate, 48000);
        assert_eq!(format.block_align, 6);
        assert_eq!(format.bits_per_sample, 24);
    }

    #[test]
    fn test_parse_too_short() {
        let err = WaveFormat::parse(&[1, 0, 2, 0]).unwrap_err();
        assert!(matches!(err, ParseError::TooShort { actual: 4, .. }));
    }

    #[test]
    fn test_audio_properties() {
        let format = WaveFormat::parse(&pcm_fmt(1, 48000, 16)).unwrap();
        let props = AudioProperties::new(format, 48000 * 2 * 3 + 48000);
        assert_eq!(props.frames, 48000 * 3 + 24000);
        assert!((props.duration_seconds - 3.5).abs() < 1e-9);
        assert_eq!(props.timecode(25), "00:00:03:12");
    }

    #[test]
    fn test_zero_sample_rate() {
        let format = WaveFormat::parse(&pcm_fmt(1, 0, 16)).unwrap();
        let props = AudioProperties::new(format, 1000);
        assert_eq!(props.duration_seconds, 0.0);
    }

    #[test]
    fn test_timecode() {
        assert_eq!(seconds_to_timecode(0.0, 25), "00:00:00:00");
        assert_eq!(seconds_to_timecode(3723.5, 25), "01:02:03:12");
    }
}
