use super::*;

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    s.validate().unwrap();
    assert_eq!(s.base_char_size, 150);
    assert_eq!(s.spacing_factor, -0.7);
    assert_eq!(s.space_width, 20);
    assert_eq!((s.preview_canvas.width, s.preview_canvas.height), (800, 450));
    assert_eq!((s.render_canvas.width, s.render_canvas.height), (1920, 1080));
    assert_eq!(s.fps, Fps { num: 25, den: 1 });
    assert_eq!(s.duration_secs, 10.0);
    assert_eq!(s.clips_upper_dir, Path::new("Source").join("UPPER_CASE"));
}

#[test]
fn partial_json_keeps_other_defaults() {
    let json = r#"{
        "base_char_size": 100,
        "fps": { "num": 30000, "den": 1001 },
        "encode": { "crf": 23 },
        "width_ratios": { "m": 1.5 }
    }"#;
    let s = Settings::from_reader(json.as_bytes()).unwrap();
    assert_eq!(s.base_char_size, 100);
    assert_eq!(s.fps, Fps { num: 30000, den: 1001 });
    assert_eq!(s.encode.crf, 23);
    assert_eq!(s.encode.codec, "libx264");
    assert_eq!(s.width_ratios.get('m'), 1.5);
    assert_eq!(s.space_width, 20);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Settings::from_reader(r#"{ "base_char_sise": 100 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, GlyphReelError::Serde(_)), "{err}");
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{ "spacing_factor": 0.5 }"#,
        r#"{ "spacing_factor": -1.5 }"#,
        r#"{ "base_char_size": 0 }"#,
        r#"{ "duration_secs": 0.0 }"#,
        r#"{ "fps": { "num": 25, "den": 0 } }"#,
        r#"{ "render_canvas": { "width": 1921, "height": 1080 } }"#,
        r#"{ "width_ratios": { "w": -1.0 } }"#,
    ] {
        assert!(Settings::from_reader(json.as_bytes()).is_err(), "{json}");
    }
}

#[test]
fn layout_params_follow_the_canvas() {
    let s = Settings::default();
    assert_eq!(s.preview_params().canvas, s.preview_canvas);
    assert_eq!(s.render_params().canvas, s.render_canvas);
    assert_eq!(s.render_params().base_char_size, 150);
    assert_eq!(
        s.preview_params().with_canvas(s.render_canvas),
        s.render_params()
    );
}

#[test]
fn resolve_dirs_only_touches_relative_paths() {
    let abs = std::env::temp_dir().join("glyphreel_previews");
    let s = Settings {
        preview_dir: abs.clone(),
        ..Settings::default()
    }
    .resolve_dirs(Path::new("/project"));

    assert_eq!(s.preview_dir, abs);
    assert_eq!(
        s.clips_lower_dir,
        Path::new("/project").join("Source").join("LOWER_CASE")
    );
}

#[test]
fn from_path_reports_missing_file() {
    let err = Settings::from_path("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("not/here.json"), "{err}");
}
