use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use anyhow::{Context, Result};
use compute::ComputeError;
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use crate::commands::Effect;
use crate::context::FrameContext;
use crate::frame::FrameLoop;
use crate::input::command_for_key;
use crate::pipeline::load_raymarch_source;
use crate::screenshot;
use crate::state::State;
use crate::RendererConfig;

/// Opens a `resolution`×`resolution` window and renders until it is closed.
///
/// `shader_changes` carries paths of edited kernel sources; each one triggers
/// a reload before the next tick.
pub fn run(config: RendererConfig, shader_changes: Option<Receiver<PathBuf>>) -> Result<()> {
    let RendererConfig {
        resolution,
        camera_speed,
        scene,
        presets,
        capacity,
        shader_dir,
        output_dir,
    } = config;

    let context = FrameContext::new(presets, scene, resolution, capacity, camera_speed)
        .context("failed to load the initial scene")?;
    let mut frame_loop = FrameLoop::new(context);
    let source = load_raymarch_source(shader_dir.as_deref())?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("Marcher - {}", frame_loop.context().scene_name()))
            .with_inner_size(PhysicalSize::new(resolution, resolution))
            .with_resizable(false)
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let mut state = pollster::block_on(State::new(
        window.clone(),
        resolution,
        capacity.total(),
        &source,
    ))?;
    info!(resolution, scene = frame_loop.context().scene_name(), "renderer ready");

    let mut screenshot_pending = false;
    let mut fatal: Option<anyhow::Error> = None;

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { ref event, window_id } if window_id == state.window().id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(physical_size) => state.resize(*physical_size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let Some(command) = command_for_key(*code, *key_state, *repeat) else {
                    return;
                };
                match frame_loop.apply(command) {
                    Ok(Effect::None) => {}
                    Ok(Effect::SaveImage) => screenshot_pending = true,
                    Ok(Effect::ExportScene(preset)) => {
                        if let Err(e) = screenshot::export_scene(&preset, &output_dir) {
                            warn!("scene export failed: {e:#}");
                        }
                    }
                    Err(e) => warn!("command rejected: {e}"),
                }
                state.window().set_title(&format!("Marcher - {}", frame_loop.context().scene_name()));
            }
            WindowEvent::RedrawRequested => {
                if let Some(changes) = &shader_changes {
                    if changes.try_iter().last().is_some() {
                        reload(&mut state, shader_dir.as_deref());
                    }
                }

                match frame_loop.tick(&mut state) {
                    Ok(report) => {
                        if let Some(stats) = report.stats {
                            state.window().set_title(&format!(
                                "Marcher - {} - {stats}",
                                frame_loop.context().scene_name()
                            ));
                        }
                        if screenshot_pending {
                            screenshot_pending = false;
                            if let Err(e) = state.save_screenshot(&output_dir) {
                                warn!("screenshot failed: {e:#}");
                            }
                        }
                    }
                    Err(ComputeError::Surface(reason)) => warn!("skipped frame: {reason}"),
                    Err(e) => {
                        error!("frame failed: {e}");
                        fatal = Some(e.into());
                        elwt.exit();
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => state.window().request_redraw(),
        _ => {}
    })?;

    fatal.map_or(Ok(()), Err)
}

fn reload(state: &mut State, shader_dir: Option<&std::path::Path>) {
    let source = match load_raymarch_source(shader_dir) {
        Ok(source) => source,
        Err(e) => {
            warn!("shader reload skipped: {e:#}");
            return;
        }
    };
    match state.reload_shader(&source) {
        Ok(()) => info!("shader reloaded"),
        Err(e) => warn!("shader reload failed, keeping previous kernels: {e}"),
    }
}
