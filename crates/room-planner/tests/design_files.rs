use room_core::{FurnitureKind, RoomShape, Scene};
use room_planner::{load_design, render_blueprint, report, starter_design};
use room_protocol::{SaveDesignRequest, Thumbnail};
use room_view::PlannerConfig;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("room-planner-{}-{name}", std::process::id()))
}

#[test]
fn starter_design_survives_a_file_round_trip() {
    let path = scratch("starter.json");
    let design = starter_design("Loft", RoomShape::UShape, 12.0, 10.0);
    std::fs::write(&path, serde_json::to_string(&design).unwrap()).unwrap();

    let loaded = load_design(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, design);

    let report = report(&loaded, &PlannerConfig::default());
    assert_eq!(report.shape, RoomShape::UShape);
    assert_eq!(report.walls.len(), 7);
}

#[test]
fn save_requests_load_as_designs() {
    let mut scene = Scene::default();
    scene.add(FurnitureKind::Bed);
    let request = SaveDesignRequest::new("u-1", scene.snapshot("Bedroom"), Thumbnail::default());
    let path = scratch("request.json");
    std::fs::write(&path, serde_json::to_string(&request).unwrap()).unwrap();

    let loaded = load_design(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.name, "Bedroom");
    assert_eq!(loaded.items.len(), 1);

    let svg = render_blueprint(loaded, &PlannerConfig::default(), 800.0, 600.0).unwrap();
    assert!(svg.contains("Bed"));
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_design(&scratch("does-not-exist.json")).is_err());
}
