use storefront_fx_core::fx::{
    depth_shadow, distortion, offsets, FloatParams, Offsets, Surface, TiltParams, Transform3d,
};
use storefront_fx_core::{BannerConfig, FxError, FxSettings, Point, Rect, RevealConfig};

#[test]
fn surface_transform_is_tilt_then_float() {
    let mut s = Surface::new(TiltParams::reveal(), FloatParams::reveal());
    s.aim(offsets(
        Point::new(150.0, 50.0),
        Rect::new(0.0, 0.0, 200.0, 100.0),
    ));
    s.start_float();
    s.tick(0.0, true);
    let t = s.transform(true);
    let tilt = TiltParams::reveal().transform(Offsets { dx: 0.5, dy: 0.0 });
    let sway = FloatParams::reveal().sample(0.0);
    assert_eq!(t, tilt.then(sway));
    assert_eq!(s.transform(false), tilt);
}

#[test]
fn long_float_runs_stay_bounded() {
    for params in [FloatParams::reveal(), FloatParams::banner()] {
        let mut s = Surface::new(TiltParams::banner(), params);
        s.start_float();
        for frame in 0..10_000 {
            let css = s.tick(frame as f64 * 16.7, true).expect("running");
            assert!(css.len() < 160, "{css}");
        }
    }
}

#[test]
fn restarting_float_resets_its_clock() {
    let mut s = Surface::new(TiltParams::reveal(), FloatParams::reveal());
    s.start_float();
    let first = s.tick(1_000.0, true);
    s.tick(9_000.0, true);
    assert!(!s.start_float(), "already running keeps one frame chain");
    let restarted = s.tick(20_000.0, true);
    assert_eq!(first, restarted);
}

#[test]
fn neutral_pose_matches_markup_contract() {
    let s = Surface::new(TiltParams::banner(), FloatParams::banner());
    assert_eq!(s.render(false), Transform3d::NEUTRAL.to_css());
}

#[test]
fn shadow_follows_pointer() {
    assert_eq!(
        depth_shadow(Offsets::CENTER),
        "0px 0px 40px rgba(0, 0, 0, 0.3), 0 20px 60px rgba(0, 0, 0, 0.2)"
    );
    assert_eq!(
        depth_shadow(Offsets { dx: -1.0, dy: -1.0 }),
        "20px 20px 80px rgba(0, 0, 0, 0.3), 0 20px 60px rgba(0, 0, 0, 0.2)"
    );
}

#[test]
fn distortion_filter_is_subtle() {
    for frame in 0..1_000 {
        let f = distortion::filter_for_frame(frame);
        assert!(f.starts_with("hue-rotate("), "{f}");
        assert!(f.contains("saturate("), "{f}");
    }
}

#[test]
fn settings_flow_into_widget_configs() {
    let settings = FxSettings::from_json_str(
        r#"{
            "simulated_load_ms": 250,
            "toggle_grace_ms": 1000,
            "banner_parallax": { "max_deg": 4.0, "depth_px": 0.0 }
        }"#,
    )
    .expect("valid settings");
    let reveal = RevealConfig::with_settings(Default::default(), &settings);
    assert_eq!(reveal.simulated_load_ms, 250);
    assert_eq!(reveal.toggle_window_ms(), 6000);
    let banner = BannerConfig::with_settings(&settings);
    assert_eq!(banner.parallax.max_deg, 4.0);
}

#[test]
fn out_of_range_settings_are_rejected() {
    let err = FxSettings::from_json_str(r#"{ "reveal_tilt": { "max_deg": 80.0 } }"#)
        .expect_err("tilt too steep");
    assert!(matches!(err, FxError::OutOfRange { .. }), "{err}");
}
