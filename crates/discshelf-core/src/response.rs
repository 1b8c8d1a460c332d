//! Response shapes handed to front-ends.
//!
//! These mirror the request/response boundary a UI calls through, serialized
//! as camelCase JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::model::{ScanOutcome, TransferOutcome, TransferProgress};

const UNIDENTIFIED_MESSAGE: &str = "Could not locate a PS2 game ID inside the provided file.";

/// Why a scan did not produce an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanErrorKind {
    /// The file could not be opened or read.
    Unreadable,
    /// The file was read completely and holds no identifier.
    NotFound,
    /// The scanner was given settings it cannot work with.
    InvalidConfig,
}

/// Result of an identify request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ScanErrorKind>,
}

impl From<Result<ScanOutcome, ScanError>> for ScanResponse {
    fn from(result: Result<ScanOutcome, ScanError>) -> Self {
        match result {
            Ok(ScanOutcome::Identified(m)) => Self {
                success: true,
                game_id: Some(m.game_id().to_string()),
                formatted_game_id: Some(m.normalized_identifier().to_string()),
                game_name: m.title().map(str::to_string),
                message: None,
                error_kind: None,
            },
            Ok(ScanOutcome::Unidentified) => {
                Self::failure(UNIDENTIFIED_MESSAGE, ScanErrorKind::NotFound)
            }
            Err(e) => {
                let kind = if e.is_unreadable() {
                    ScanErrorKind::Unreadable
                } else {
                    ScanErrorKind::InvalidConfig
                };
                Self::failure(e.to_string(), kind)
            }
        }
    }
}

impl ScanResponse {
    fn failure(message: impl Into<String>, kind: ScanErrorKind) -> Self {
        Self {
            success: false,
            game_id: None,
            formatted_game_id: None,
            game_name: None,
            message: Some(message.into()),
            error_kind: Some(kind),
        }
    }
}

/// Result of a move or rename request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MoveResponse {
    pub fn moved(path: &Path) -> Self {
        Self {
            success: true,
            new_path: Some(path.to_string_lossy().into_owned()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            new_path: None,
            message: Some(message.into()),
        }
    }
}

impl From<&TransferOutcome> for MoveResponse {
    fn from(outcome: &TransferOutcome) -> Self {
        match outcome {
            TransferOutcome::Renamed { final_path } | TransferOutcome::Copied { final_path } => {
                Self::moved(final_path)
            }
            TransferOutcome::Failed { reason } => Self::failed(reason.to_string()),
        }
    }
}

/// Progress event payload with display rounding applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    pub percent: f64,
    #[serde(rename = "copiedMB")]
    pub copied_mb: f64,
    #[serde(rename = "totalMB")]
    pub total_mb: f64,
    pub elapsed: f64,
}

impl From<&TransferProgress> for ProgressPayload {
    fn from(progress: &TransferProgress) -> Self {
        Self {
            percent: progress.percent_rounded(),
            copied_mb: progress.copied_mib(),
            total_mb: progress.total_mib(),
            elapsed: progress.elapsed_rounded(),
        }
    }
}
