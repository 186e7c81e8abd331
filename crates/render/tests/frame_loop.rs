use std::cell::Cell;
use std::time::Duration;

use compute::{BackendCall, BufferSlot, ComputeError, DispatchPlan, MockBackend};
use render::camera::{Axis, Camera, Direction, Motion};
use render::commands::{Command, Effect, ShapeField};
use render::context::FrameContext;
use render::frame::{Clock, FrameLoop, STATS_WINDOW};
use render::gpu_types::{ShapeGpu, ShapeInfoGpu, Uniforms};
use scene::{
    Operator, PresetLibrary, RenderSettings, SceneCapacity, SceneError, ScenePreset, SceneRef,
    Shape, ShapeKind,
};

/// Advances by a fixed step on every reading.
struct StepClock {
    step: Duration,
    now: Cell<Duration>,
}

impl StepClock {
    fn new(step: Duration) -> Self {
        Self {
            step,
            now: Cell::new(Duration::ZERO),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

fn union_and_subtract_library() -> PresetLibrary {
    let mut library = PresetLibrary::default();
    library.insert(ScenePreset {
        name: "Pair".into(),
        spheres: vec![Shape::template(ShapeKind::Sphere)],
        boxes: vec![Shape::template(ShapeKind::Box).with_op(Operator::new(Operator::SUBTRACT, 0.01))],
        toruses: Vec::new(),
        settings: RenderSettings::default(),
    });
    library
}

fn frame_loop_at(resolution: u32, step: Duration) -> FrameLoop<StepClock> {
    let context = FrameContext::new(
        union_and_subtract_library(),
        SceneRef::Name("pair".into()),
        resolution,
        SceneCapacity::default(),
        5.0,
    )
    .unwrap();
    FrameLoop::with_clock(context, StepClock::new(step))
}

fn info_tuples(backend: &MockBackend) -> Vec<(f32, f32, f32, f32)> {
    backend
        .read_as::<ShapeInfoGpu>(BufferSlot::ShapeInfo)
        .iter()
        .map(|info| (info.kind, info.index, info.operator, info._pad))
        .collect()
}

#[test]
fn first_tick_uploads_everything_then_only_uniforms() {
    let mut frame_loop = frame_loop_at(64, Duration::from_millis(16));
    let mut backend = MockBackend::new();

    let report = frame_loop.tick(&mut backend).unwrap();
    assert_eq!(report.frame_index, 0);
    assert_eq!(report.shapes_written, Some(2));

    let slots: Vec<Option<BufferSlot>> = backend
        .calls()
        .iter()
        .map(|call| match call {
            BackendCall::Write { slot, .. } => Some(*slot),
            BackendCall::Submit(_) => None,
        })
        .collect();
    println!("first tick: {slots:?}");
    assert_eq!(
        slots,
        vec![
            Some(BufferSlot::Uniforms),
            Some(BufferSlot::Shapes),
            Some(BufferSlot::ShapeInfo),
            None
        ]
    );
    assert_eq!(backend.submits(), vec![DispatchPlan::new(2, 64).unwrap()]);

    backend.clear();
    let report = frame_loop.tick(&mut backend).unwrap();
    assert_eq!(report.frame_index, 1);
    assert_eq!(report.shapes_written, None);
    assert_eq!(backend.write_count(BufferSlot::Uniforms), 1);
    assert_eq!(backend.write_count(BufferSlot::Shapes), 0);
    assert_eq!(backend.submits().len(), 1);
}

#[test]
fn uniforms_carry_live_counts_and_pose() {
    let mut frame_loop = frame_loop_at(128, Duration::from_millis(10));
    let mut backend = MockBackend::new();
    frame_loop.tick(&mut backend).unwrap();

    let uniforms: Vec<Uniforms> = backend.read_as(BufferSlot::Uniforms);
    let uniforms = uniforms[0];
    println!("{uniforms:?}");
    assert_eq!(uniforms.rez, 128.0);
    assert_eq!(
        (uniforms.sphere_count, uniforms.box_count, uniforms.torus_count),
        (1.0, 1.0, 0.0)
    );
    assert_eq!(uniforms.camera, Camera::HOME_POSITION.to_array());
    assert_eq!(uniforms.lookat, Camera::HOME_TARGET.to_array());
    assert_eq!(uniforms.max_marching_steps, 100.0);
}

#[test]
fn publishes_mean_after_sixty_ticks() {
    let mut frame_loop = frame_loop_at(32, Duration::from_millis(20));
    let mut backend = MockBackend::new();

    let mut published = Vec::new();
    for _ in 0..STATS_WINDOW {
        let report = frame_loop.tick(&mut backend).unwrap();
        assert_eq!(report.elapsed, Duration::from_millis(20));
        published.extend(report.stats);
    }

    println!("published: {published:?}");
    assert_eq!(published.len(), 1);
    assert!((published[0].frame_ms - 20.0).abs() < 1e-9);
    assert_eq!(published[0].fps, 50);
    assert_eq!(published[0].to_string(), "20.00 ms (50 fps)");
    assert_eq!(frame_loop.stats().latest(), Some(published[0]));
}

#[test]
fn sphere_union_box_subtract_scenario() {
    let mut frame_loop = frame_loop_at(64, Duration::from_millis(16));
    let mut backend = MockBackend::new();
    frame_loop.tick(&mut backend).unwrap();

    let shapes: Vec<ShapeGpu> = backend.read_as(BufferSlot::Shapes);
    assert_eq!(shapes.len(), 2);
    assert_eq!(
        backend.last_write(BufferSlot::Shapes).unwrap().len() as u64,
        2 * compute::layout::SHAPE_STRIDE
    );
    assert_eq!(
        info_tuples(&backend),
        vec![(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 1.0, 0.0)]
    );

    let carving = Shape::template(ShapeKind::Sphere).with_op(Operator::new(-1.0, 0.2));
    assert!(matches!(
        frame_loop.apply(Command::InsertShape(carving)),
        Ok(Effect::None)
    ));
    let report = frame_loop.tick(&mut backend).unwrap();
    assert_eq!(report.shapes_written, Some(3));

    let infos = info_tuples(&backend);
    println!("after edit: {infos:?}");
    assert_eq!(
        infos,
        vec![
            (0.0, 1.0, -1.0, 0.0),
            (0.0, 0.0, 0.0, 0.0),
            (1.0, 0.0, 1.0, 0.0)
        ]
    );
}

#[test]
fn field_edit_resorts_on_next_tick() {
    let mut frame_loop = frame_loop_at(64, Duration::from_millis(16));
    let mut backend = MockBackend::new();
    frame_loop.tick(&mut backend).unwrap();

    frame_loop
        .apply(Command::SetShapeField {
            kind: ShapeKind::Box,
            index: 0,
            field: ShapeField::Op(Operator::new(-3.0, 0.0)),
        })
        .unwrap();
    frame_loop.tick(&mut backend).unwrap();

    assert_eq!(
        info_tuples(&backend),
        vec![(1.0, 0.0, -3.0, 0.0), (0.0, 0.0, 0.0, 0.0)]
    );
}

#[test]
fn misaligned_resolution_fails_before_submit() {
    let mut frame_loop = frame_loop_at(100, Duration::from_millis(16));
    let mut backend = MockBackend::new();

    let err = frame_loop.tick(&mut backend).unwrap_err();
    println!("{err}");
    assert!(matches!(err, ComputeError::Resolution(100)));
    assert!(backend.submits().is_empty());
}

#[test]
fn failed_submit_skips_camera_and_stats() {
    let mut frame_loop = frame_loop_at(32, Duration::from_millis(100));
    let mut backend = MockBackend::new();
    frame_loop
        .apply(Command::SetCameraVelocity {
            motion: Motion::Linear,
            axis: Axis::Z,
            direction: Direction::Negative,
        })
        .unwrap();

    backend.fail_next_submit(ComputeError::DeviceLost);
    assert!(matches!(
        frame_loop.tick(&mut backend),
        Err(ComputeError::DeviceLost)
    ));
    assert_eq!(frame_loop.context().camera().position, Camera::HOME_POSITION);
    assert_eq!(frame_loop.frame_index(), 0);

    frame_loop.tick(&mut backend).unwrap();
    let position = frame_loop.context().camera().position;
    println!("after recovery: {position:?}");
    assert!((position.z - (-6.0 + 5.0 * 0.1)).abs() < 1e-4);
}

#[test]
fn rejected_command_keeps_scene() {
    let mut frame_loop = frame_loop_at(32, Duration::from_millis(16));

    let err = frame_loop
        .apply(Command::RemoveShape {
            kind: ShapeKind::Torus,
            index: 0,
        })
        .unwrap_err();
    assert!(matches!(err, SceneError::IndexOutOfRange { .. }));

    let err = frame_loop
        .apply(Command::LoadScene(SceneRef::Name("missing".into())))
        .unwrap_err();
    assert!(matches!(err, SceneError::UnknownPreset(_)));
    assert_eq!(frame_loop.context().scene_name(), "Pair");
    assert_eq!(frame_loop.context().store().total(), 2);
}

#[test]
fn empty_scene_still_dispatches_one_preprocess_group() {
    let mut frame_loop = frame_loop_at(32, Duration::from_millis(16));
    let mut backend = MockBackend::new();
    for kind in [ShapeKind::Box, ShapeKind::Sphere] {
        frame_loop
            .apply(Command::RemoveShape { kind, index: 0 })
            .unwrap();
    }

    let report = frame_loop.tick(&mut backend).unwrap();
    assert_eq!(report.shapes_written, Some(0));
    assert_eq!(backend.write_count(BufferSlot::Shapes), 0);
    assert_eq!(backend.submits()[0].preprocess, [1, 1, 1]);
    assert_eq!(backend.submits()[0].render, [2, 2, 1]);
}
