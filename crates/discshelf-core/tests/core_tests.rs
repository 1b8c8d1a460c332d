use discshelf_core::{
    MoveResponse, ProgressPayload, ScanError, ScanErrorKind, ScanMatch, ScanOutcome, ScanResponse,
    TransferError, TransferOutcome, TransferProgress, normalize,
};
use std::path::PathBuf;

#[test]
fn test_identified_scan_response() {
    let outcome = ScanOutcome::Identified(ScanMatch::new(
        "SLES_500.03;1",
        Some("Example Racer".to_string()),
    ));
    let response = ScanResponse::from(Ok(outcome));

    assert!(response.success);
    assert_eq!(response.game_id.as_deref(), Some("SLES_500.03"));
    assert_eq!(response.formatted_game_id.as_deref(), Some("SLES-50003"));
    assert_eq!(response.game_name.as_deref(), Some("Example Racer"));
    assert!(response.message.is_none());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["gameId"], "SLES_500.03");
    assert_eq!(json["formattedGameId"], "SLES-50003");
    assert_eq!(json["gameName"], "Example Racer");
    assert!(json.get("message").is_none());
}

#[test]
fn test_identified_without_title_omits_game_name() {
    let outcome = ScanOutcome::Identified(ScanMatch::new("SLUS_123.45", None));
    let json = serde_json::to_value(ScanResponse::from(Ok(outcome))).unwrap();

    assert_eq!(json["success"], true);
    assert!(json.get("gameName").is_none());
}

#[test]
fn test_unidentified_and_unreadable_are_distinct() {
    let not_found = ScanResponse::from(Ok(ScanOutcome::Unidentified));
    assert!(!not_found.success);
    assert_eq!(not_found.error_kind, Some(ScanErrorKind::NotFound));

    let unreadable = ScanResponse::from(Err(ScanError::io(
        "/missing.iso",
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    )));
    assert!(!unreadable.success);
    assert_eq!(unreadable.error_kind, Some(ScanErrorKind::Unreadable));
    assert!(unreadable.message.unwrap().contains("/missing.iso"));

    let json = serde_json::to_value(&not_found).unwrap();
    assert_eq!(json["errorKind"], "notFound");
}

#[test]
fn test_config_errors_are_not_reported_as_unreadable() {
    let response = ScanResponse::from(Err(ScanError::InvalidConfig {
        message: "Overlap must be at least 13 bytes to catch split identifiers".to_string(),
    }));
    assert!(!response.success);
    assert_eq!(response.error_kind, Some(ScanErrorKind::InvalidConfig));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["errorKind"], "invalidConfig");
}

#[test]
fn test_move_response_from_outcomes() {
    let renamed = TransferOutcome::Renamed {
        final_path: PathBuf::from("/library/DVD/game.iso"),
    };
    let response = MoveResponse::from(&renamed);
    assert!(response.success);
    assert_eq!(response.new_path.as_deref(), Some("/library/DVD/game.iso"));

    let failed = TransferOutcome::Failed {
        reason: TransferError::Rename {
            destination: PathBuf::from("/library/DVD/game.iso"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        },
    };
    let response = MoveResponse::from(&failed);
    assert!(!response.success);
    assert!(response.new_path.is_none());
    assert!(response.message.unwrap().contains("denied"));
}

#[test]
fn test_progress_payload_field_names() {
    let progress = TransferProgress::new(5 * 1024 * 1024, 10 * 1024 * 1024, 1.26);
    let payload = ProgressPayload::from(&progress);

    assert_eq!(payload.percent, 50.0);
    assert_eq!(payload.copied_mb, 5.0);
    assert_eq!(payload.total_mb, 10.0);
    assert_eq!(payload.elapsed, 1.3);

    let json = serde_json::to_value(payload).unwrap();
    assert_eq!(json["copiedMB"], 5.0);
    assert_eq!(json["totalMB"], 10.0);
}

#[test]
fn test_normalize_matches_catalog_keys() {
    assert_eq!(normalize("SCUS_971.13;1"), "SCUS-97113");
    assert_eq!(normalize(&normalize("SCUS_971.13;1")), "SCUS-97113");
}
