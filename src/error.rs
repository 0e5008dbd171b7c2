use std::fmt;
use std::string::FromUtf8Error;

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while reading or writing GPX text.
#[derive(Debug, Error)]
pub enum GpxError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("Invalid timestamp '{0}'")]
    InvalidTime(String),
    #[error("XML write error: {0}")]
    Write(#[from] std::io::Error),
    #[error("Serialized GPX is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Reasons an elevation extension can be refused.
///
/// Every variant leaves the document untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtendError {
    #[error("Target elevation must be a positive number of meters, got {0}")]
    InvalidTarget(f64),
    #[error("No tracks found in the document")]
    NoTracks,
    #[error("No segments found in the last track")]
    NoSegments,
    #[error("No points found in the last segment")]
    NoPoints,
    #[error("The last segment has no timestamps, the recording cannot be rebased")]
    MissingTimestamps,
    #[error("Point {index} has no timestamp, the recording cannot be rebased")]
    UntimedPoint { index: usize },
    #[error("Point {index} has no elevation")]
    MissingElevation { index: usize },
    #[error("Shifted timestamps fall outside the supported date range")]
    TimeOutOfRange,
    #[error("No points found to reach {target} m of elevation (net delta reached {reached} m)")]
    ThresholdUnreachable { target: f64, reached: f64 },
}

/// Coarse failure categories, one per user-facing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidRequest,
    InputUnavailable,
    MalformedSource,
    StructurallyEmpty,
    MissingTimestamps,
    ThresholdUnreachable,
    OutputUnavailable,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalidRequest",
            Self::InputUnavailable => "inputUnavailable",
            Self::MalformedSource => "malformedSource",
            Self::StructurallyEmpty => "structurallyEmpty",
            Self::MissingTimestamps => "missingTimestamps",
            Self::ThresholdUnreachable => "thresholdUnreachable",
            Self::OutputUnavailable => "outputUnavailable",
        }
    }

    /// Process exit status reported by the command line tool.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::InvalidRequest => 2,
            Self::InputUnavailable => 3,
            Self::MalformedSource => 4,
            Self::StructurallyEmpty => 5,
            Self::MissingTimestamps => 6,
            Self::ThresholdUnreachable => 7,
            Self::OutputUnavailable => 8,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExtendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTarget(_) => ErrorKind::InvalidRequest,
            Self::NoTracks | Self::NoSegments | Self::NoPoints => ErrorKind::StructurallyEmpty,
            Self::MissingTimestamps | Self::UntimedPoint { .. } => ErrorKind::MissingTimestamps,
            Self::MissingElevation { .. } | Self::TimeOutOfRange => ErrorKind::MalformedSource,
            Self::ThresholdUnreachable { .. } => ErrorKind::ThresholdUnreachable,
        }
    }
}

/// Top-level error for the string-in, string-out entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Gpx(#[from] GpxError),
    #[error(transparent)]
    Extend(#[from] ExtendError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Gpx(_) => ErrorKind::MalformedSource,
            Self::Extend(e) => e.kind(),
        }
    }
}

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<GpxError> for JsValue {
    fn from(e: GpxError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_share_a_kind() {
        for e in [ExtendError::NoTracks, ExtendError::NoSegments, ExtendError::NoPoints] {
            assert_eq!(e.kind(), ErrorKind::StructurallyEmpty);
        }
    }

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            ExtendError::NoTracks,
            ExtendError::NoSegments,
            ExtendError::NoPoints,
            ExtendError::MissingTimestamps,
            ExtendError::ThresholdUnreachable {
                target: 50.0,
                reached: 12.5,
            },
        ];
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            messages[4],
            "No points found to reach 50 m of elevation (net delta reached 12.5 m)"
        );
    }

    #[test]
    fn test_parse_errors_are_malformed_source() {
        let err = Error::from(GpxError::InvalidTime("yesterday".to_string()));
        assert_eq!(err.kind(), ErrorKind::MalformedSource);
        assert_eq!(err.to_string(), "Invalid timestamp 'yesterday'");
    }

    #[test]
    fn test_kind_label_matches_serde() {
        for kind in [
            ErrorKind::InvalidRequest,
            ErrorKind::InputUnavailable,
            ErrorKind::MalformedSource,
            ErrorKind::StructurallyEmpty,
            ErrorKind::MissingTimestamps,
            ErrorKind::ThresholdUnreachable,
            ErrorKind::OutputUnavailable,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
            assert!(kind.exit_code() > 1);
        }
    }
}
