use super::*;

#[test]
fn parses_path_and_filename_variants() {
    let a = UploadResponse::parse(br#"{"success": true, "path": "/uploads/a.png"}"#).unwrap();
    assert_eq!(a.into_reference().unwrap(), "/uploads/a.png");

    let b = UploadResponse::parse(br#"{"success": true, "filename": "/uploads/b.mp4"}"#).unwrap();
    assert_eq!(b.into_reference().unwrap(), "/uploads/b.mp4");
}

#[test]
fn failure_carries_service_reason() {
    let r = UploadResponse::parse(br#"{"success": false, "error": "too large"}"#).unwrap();
    let err = r.into_reference().unwrap_err();
    assert!(matches!(err, LayercastError::Upload(_)));
    assert!(err.to_string().contains("too large"));
}

#[test]
fn success_without_path_is_an_error() {
    let r = UploadResponse::parse(br#"{"success": true}"#).unwrap();
    assert!(r.into_reference().is_err());
}

#[test]
fn malformed_body_is_an_upload_error() {
    assert!(matches!(
        UploadResponse::parse(b"<html>502</html>"),
        Err(LayercastError::Upload(_))
    ));
}

#[test]
fn content_types_follow_extension() {
    assert_eq!(content_type_for_path(Path::new("a.PNG")), Some("image/png"));
    assert_eq!(content_type_for_path(Path::new("clip.mov")), Some("video/quicktime"));
    assert_eq!(content_type_for_path(Path::new("doc.pdf")), None);
    assert_eq!(content_type_for_path(Path::new("noext")), None);
}

#[test]
fn unsupported_file_fails_before_any_request() {
    let client = UploadClient::new("http://127.0.0.1:9/").unwrap();
    assert_eq!(client.api_base(), "http://127.0.0.1:9");
    let err = client.upload_file(Path::new("notes.txt")).unwrap_err();
    assert!(matches!(err, LayercastError::Upload(_)));
}
