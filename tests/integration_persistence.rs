use std::path::Path;

use scene_wm::backend::headless::HeadlessDesktop;
use scene_wm::runner::SceneRunner;
use scene_wm::{
    JsonFileStore, Placement, QueueChannel, Rect, SettingsStore, UnitPoint, WindowManager,
    WindowManagerConfig, WindowingLayer,
};

fn session(path: &Path, config: WindowManagerConfig, screen: Rect) -> SceneRunner<JsonFileStore> {
    let store = JsonFileStore::open(path).unwrap();
    let mut r = SceneRunner::new(WindowManager::new(
        config,
        HeadlessDesktop::with_screen(screen),
        store,
        QueueChannel::new(),
    ));
    r.manager_mut().register_scene(Some("main"), None, true, "Main");
    r.manager_mut().set_default_anchor("main", UnitPoint::TOP_LEADING);
    r
}

fn close_main_at(path: &Path, frame: Rect) {
    let mut r = session(path, WindowManagerConfig::default(), Rect::new(0.0, 0.0, 1000.0, 800.0));
    r.open("main").unwrap();
    let w = r.pump().created[0];
    r.manager_mut().layer_mut().set_frame(w, frame);
    r.close(w);
    r.pump();
}

#[test]
fn frame_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let moved = Rect::new(120.0, 90.0, 480.0, 320.0);
    close_main_at(&path, moved);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"main-frame-v1\""));

    let mut r = session(&path, WindowManagerConfig::default(), Rect::new(0.0, 0.0, 1000.0, 800.0));
    r.open("main").unwrap();
    let w = r.pump().created[0];
    assert!(matches!(
        r.session(w).and_then(|s| s.placement()),
        Some(Placement::Restore(_))
    ));
    assert_eq!(r.manager().layer().frame(w), Some(moved));
}

#[test]
fn bumping_the_key_version_ignores_old_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    close_main_at(&path, Rect::new(120.0, 90.0, 480.0, 320.0));

    let config = WindowManagerConfig::default()
        .with_frame_key_version(2)
        .unwrap();
    let mut r = session(&path, config, Rect::new(0.0, 0.0, 1000.0, 800.0));
    r.open("main").unwrap();
    let w = r.pump().created[0];
    assert_eq!(
        r.manager().layer().frame(w),
        Some(Rect::new(0.0, 480.0, 480.0, 320.0))
    );
}

#[test]
fn restore_on_a_smaller_screen_keeps_the_window_visible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    close_main_at(&path, Rect::new(500.0, 450.0, 480.0, 320.0));

    let mut r = session(&path, WindowManagerConfig::default(), Rect::new(0.0, 0.0, 600.0, 400.0));
    r.open("main").unwrap();
    let w = r.pump().created[0];
    assert_eq!(
        r.manager().layer().frame(w),
        Some(Rect::new(120.0, 80.0, 480.0, 320.0))
    );
}

#[test]
fn clearing_frames_keeps_unrelated_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    {
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("theme", "dark").unwrap();
    }
    close_main_at(&path, Rect::new(120.0, 90.0, 480.0, 320.0));

    let mut r = session(&path, WindowManagerConfig::default(), Rect::new(0.0, 0.0, 1000.0, 800.0));
    assert_eq!(r.manager_mut().clear_saved_frames().unwrap(), 1);

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get("theme").as_deref(), Some("dark"));
    assert!(store.get("main-frame-v1").is_none());

    r.open("main").unwrap();
    let w = r.pump().created[0];
    assert_eq!(
        r.manager().layer().frame(w),
        Some(Rect::new(0.0, 480.0, 480.0, 320.0))
    );
}
