use glam::Vec2;
use room_core::{wall, FurnitureKind, RoomShape};
use room_geom::CoordinateMapper;
use room_protocol::{DesignStore, MemoryStore};
use room_view::{
    CatalogAssets, NotificationLevel, PlannerConfig, PointerButton, PointerEvent, Session,
    ViewKind, ViewMode,
};

fn down(pos: Vec2) -> PointerEvent {
    PointerEvent::Down {
        pos,
        button: PointerButton::Primary,
    }
}

fn blueprint_session() -> (Session, CoordinateMapper) {
    let config = PlannerConfig::default();
    let mut session = Session::new(&config);
    session.set_mode(ViewMode::Blueprint);
    session.resize(ViewKind::Blueprint, 800.0, 600.0);
    let mapper = CoordinateMapper::fit(
        Vec2::new(800.0, 600.0),
        session.scene().room().width,
        session.scene().room().depth,
        config.blueprint.padding,
    )
    .unwrap();
    (session, mapper)
}

#[test]
fn chair_follows_pointer_in_blueprint() {
    let (mut session, mapper) = blueprint_session();
    let (chair, _) = session.add_item(FurnitureKind::Chair);

    let start = mapper.world_to_projection(Vec2::ZERO);
    let end = mapper.world_to_projection(Vec2::new(3.0, -2.0));
    session.handle_pointer(down(start));
    session.handle_pointer(PointerEvent::Move { pos: (start + end) / 2.0 });
    session.handle_pointer(PointerEvent::Move { pos: end });
    session.handle_pointer(PointerEvent::Up { pos: end });

    let item = session.scene().item(chair).unwrap();
    assert!((item.position[0] - 3.0).abs() < 1.0e-3);
    assert_eq!(item.position[1], 0.0);
    assert!((item.position[2] + 2.0).abs() < 1.0e-3);
    assert_eq!(session.scene().selected_id(), Some(chair));
}

#[test]
fn background_click_clears_but_item_drag_never_does() {
    let (mut session, mapper) = blueprint_session();
    let (bed, _) = session.add_item(FurnitureKind::Bed);
    let empty = mapper.world_to_projection(Vec2::new(6.0, 6.0));

    let target = mapper.world_to_projection(Vec2::new(-2.0, 1.0));
    session.handle_pointer(down(mapper.world_to_projection(Vec2::ZERO)));
    session.handle_pointer(PointerEvent::Move { pos: target });
    session.handle_pointer(PointerEvent::Up { pos: target });
    assert_eq!(session.scene().selected_id(), Some(bed));

    session.handle_pointer(down(empty));
    session.handle_pointer(PointerEvent::Up { pos: empty });
    assert_eq!(session.scene().selected_id(), None);
}

#[test]
fn viewport_drag_holds_camera_until_release() {
    let mut session = Session::new(&PlannerConfig::default());
    session.resize(ViewKind::Perspective, 800.0, 600.0);
    session.add_item(FurnitureKind::Bed);

    let center = session
        .viewport()
        .camera()
        .project(glam::Vec3::new(0.0, 0.5, 0.0))
        .unwrap();
    session.handle_pointer(down(center));
    assert!(session.viewport().drag().is_dragging());
    assert!(!session.viewport().camera().is_enabled());

    session.handle_pointer(PointerEvent::Move {
        pos: center + Vec2::new(30.0, 0.0),
    });
    session.handle_pointer(PointerEvent::Up {
        pos: center + Vec2::new(30.0, 0.0),
    });
    assert!(session.viewport().camera().is_enabled());
    assert!(!session.viewport().drag().is_dragging());
}

#[test]
fn tour_mode_frames_have_no_gizmo() {
    let mut session = Session::new(&PlannerConfig::default());
    session.add_item(FurnitureKind::Sofa);
    assert!(session.scene_frame(&CatalogAssets).gizmo.is_some());
    session.set_mode(ViewMode::Tour);
    assert!(session.scene_frame(&CatalogAssets).gizmo.is_none());
}

#[test]
fn save_then_load_into_a_fresh_session() {
    let mut store = MemoryStore::new();
    let mut author = Session::new(&PlannerConfig::default());
    author.set_shape(RoomShape::TShape);
    author.scene_mut().add_window(wall::T_STEM_L).unwrap();
    author.add_item(FurnitureKind::Cabinet);
    author.add_item(FurnitureKind::Lamp);
    let request = author.prepare_save("alice", "Study", None).unwrap();
    let notice = author.finish_save(store.save(request));
    assert_eq!(notice.level, NotificationLevel::Success);

    let mut reader = Session::new(&PlannerConfig::default());
    reader.add_item(FurnitureKind::Chair);
    let notice = reader.apply_loaded(store.load("alice"));
    assert_eq!(notice.message, "Loaded: Study");
    assert_eq!(reader.scene().room().shape, RoomShape::TShape);
    assert_eq!(reader.scene().windows().len(), 1);
    assert_eq!(reader.scene().items().len(), 2);

    let (fresh, _) = reader.add_item(FurnitureKind::Drawer);
    let ids: Vec<_> = reader.scene().items().iter().map(|item| item.id).collect();
    assert_eq!(ids.iter().filter(|id| **id == fresh).count(), 1);

    let frame = reader.scene_frame(&CatalogAssets);
    assert_eq!(frame.lights.len(), 1);
    assert_eq!(frame.glass.len(), 1);
}

#[test]
fn other_users_designs_are_not_loaded() {
    let mut store = MemoryStore::new();
    let author = Session::new(&PlannerConfig::default());
    store
        .save(author.prepare_save("alice", "Mine", None).unwrap())
        .unwrap();

    let mut reader = Session::new(&PlannerConfig::default());
    let notice = reader.apply_loaded(store.load("bob"));
    assert_eq!(notice.level, NotificationLevel::Info);
}
