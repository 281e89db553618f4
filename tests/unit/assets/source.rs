use super::*;

#[test]
fn memory_source_serves_inserted_media_only() {
    let src = MemoryMediaSource::new();
    src.insert_image("a.png", PreparedImage::solid(3, 2, [1, 2, 3, 255]).unwrap());
    src.insert_video(
        "b.mp4",
        VideoClip::new(25.0, vec![PreparedImage::solid(1, 1, [0, 0, 0, 255]).unwrap()]).unwrap(),
    );

    assert_eq!(src.load_image("a.png").unwrap().width(), 3);
    assert_eq!(src.load_video("b.mp4").unwrap().frame_count(), 1);
    assert!(matches!(src.load_image("b.mp4"), Err(LayercastError::Media(_))));
    assert!(src.load_video("a.png").is_err());
}

#[test]
fn network_source_reads_local_files() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/source_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pixel.png");
    image::save_buffer_with_format(
        &path,
        &[10, 20, 30, 255],
        1,
        1,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .unwrap();

    let src = NetworkMediaSource::new(&LayercastConfig::default()).unwrap();
    let img = src.load_image(path.to_str().unwrap()).unwrap();
    assert_eq!((img.width(), img.height()), (1, 1));
    assert_eq!(img.premul_bytes(), &[10, 20, 30, 255]);
    assert!(src.load_image(dir.join("missing.png").to_str().unwrap()).is_err());
}
