use chrono::TimeDelta;
use serde::Deserialize;

/// Options for extending a GPX recording by elevation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendOptions {
    /// Shift every recorded point by the recording's duration plus a buffer so
    /// the new track reads as a separate activity (default: false)
    #[serde(default)]
    pub detach: bool,

    /// Gap between the end of the recording and the first new point, in seconds (default: 60)
    #[serde(default = "default_start_gap")]
    pub start_gap_secs: u32,

    /// Buffer added to the recording's own duration when detaching, in seconds (default: 3600)
    #[serde(default = "default_detach_buffer")]
    pub detach_buffer_secs: u32,

    /// Name for the new track; the first track's name is used when unset or empty
    #[serde(default)]
    pub track_name: Option<String>,
}

impl Default for ExtendOptions {
    fn default() -> Self {
        Self {
            detach: false,
            start_gap_secs: default_start_gap(),
            detach_buffer_secs: default_detach_buffer(),
            track_name: None,
        }
    }
}

impl ExtendOptions {
    pub fn detached() -> Self {
        Self {
            detach: true,
            ..Default::default()
        }
    }

    pub fn start_gap(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.start_gap_secs))
    }

    pub fn detach_buffer(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.detach_buffer_secs))
    }
}

fn default_start_gap() -> u32 {
    60
}

fn default_detach_buffer() -> u32 {
    60 * 60
}
