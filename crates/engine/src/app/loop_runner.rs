use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowBuilder};

use super::canvas::Canvas;
use super::geometry::{Resolution, Vector, BASE_RESOLUTION};
use super::input::{ButtonStates, InputSnapshot, MouseButton};
use super::rendering::Renderer;

/// What the loop drives. `update` then `draw` run exactly once per frame.
pub trait Game {
    fn update(&mut self, input: &InputSnapshot);
    fn draw(&self, canvas: &mut dyn Canvas);
    fn on_resize(&mut self, resolution: Resolution);
    fn window_title(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_size: Resolution,
    pub start_fullscreen: bool,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "CSPS".to_string(),
            window_size: BASE_RESOLUTION,
            start_fullscreen: false,
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut game: Box<dyn Game>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(game.window_title())
            .with_inner_size(PhysicalSize::new(
                config.window_size.width,
                config.window_size.height,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    if config.start_fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    game.on_resize(renderer.resolution());

    event_loop.set_control_flow(ControlFlow::Poll);

    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut input_collector = InputCollector::new(renderer.resolution());
    let mut last_present_instant = Instant::now();
    let mut last_applied_title = game.window_title();

    info!(
        width = renderer.resolution().width,
        height = renderer.resolution().height,
        fullscreen = config.start_fullscreen,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                        return;
                    }
                    let resolution = renderer.resolution();
                    input_collector.set_window_size(resolution);
                    game.on_resize(resolution);
                    info!(
                        width = resolution.width,
                        height = resolution.height,
                        "display_resized"
                    );
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position(position.x, position.y);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(command) = window_command_for_key(&event) {
                        apply_window_command(&window, command);
                    }
                }
                WindowEvent::RedrawRequested => {
                    let input_snapshot = input_collector.snapshot_for_frame();
                    game.update(&input_snapshot);

                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    if let Err(error) = renderer.render(|canvas| game.draw(canvas)) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = game.window_title();
                    if next_title != last_applied_title {
                        window.set_title(&next_title);
                        last_applied_title = next_title;
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowCommand {
    ToggleFullscreen,
    ExitFullscreen,
}

fn window_command_for_key(key_event: &KeyEvent) -> Option<WindowCommand> {
    if key_event.state != ElementState::Pressed || key_event.repeat {
        return None;
    }
    window_command_for_physical_key(key_event.physical_key)
}

fn window_command_for_physical_key(key: PhysicalKey) -> Option<WindowCommand> {
    match key {
        PhysicalKey::Code(KeyCode::F11) => Some(WindowCommand::ToggleFullscreen),
        PhysicalKey::Code(KeyCode::Escape) => Some(WindowCommand::ExitFullscreen),
        _ => None,
    }
}

fn apply_window_command(window: &Window, command: WindowCommand) {
    let is_fullscreen = window.fullscreen().is_some();
    let next = match command {
        WindowCommand::ToggleFullscreen => !is_fullscreen,
        WindowCommand::ExitFullscreen => false,
    };
    if next == is_fullscreen {
        return;
    }
    window.set_fullscreen(next.then_some(Fullscreen::Borderless(None)));
    info!(fullscreen = next, "fullscreen_toggled");
}

#[derive(Debug, Default)]
struct InputCollector {
    cursor: Vector,
    buttons: ButtonStates,
    window_size: Resolution,
}

impl InputCollector {
    fn new(window_size: Resolution) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    fn set_window_size(&mut self, window_size: Resolution) {
        self.window_size = window_size;
    }

    fn set_cursor_position(&mut self, x: f64, y: f64) {
        self.cursor = Vector::new(x.floor() as i32, y.floor() as i32);
    }

    fn handle_mouse_input(&mut self, button: WinitMouseButton, state: ElementState) {
        let button = match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            _ => return,
        };
        match state {
            ElementState::Pressed => self.buttons.press(button),
            ElementState::Released => self.buttons.release(button),
        }
    }

    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.cursor, self.buttons, self.window_size);
        self.buttons.clear_edges();
        snapshot
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_click_is_edge_triggered_for_single_frame() {
        let mut input = InputCollector::new(BASE_RESOLUTION);
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Pressed);
        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert!(first.is_just_pressed(MouseButton::Left));
        assert!(!second.is_just_pressed(MouseButton::Left));
        assert!(second.is_pressed(MouseButton::Left));
    }

    #[test]
    fn held_left_click_does_not_repeat_pressed_edge() {
        let mut input = InputCollector::new(BASE_RESOLUTION);
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Pressed);
        let first = input.snapshot_for_frame();
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Pressed);
        let second = input.snapshot_for_frame();

        assert!(first.is_just_pressed(MouseButton::Left));
        assert!(!second.is_just_pressed(MouseButton::Left));
    }

    #[test]
    fn release_is_edge_triggered_for_single_frame() {
        let mut input = InputCollector::new(BASE_RESOLUTION);
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Pressed);
        let _ = input.snapshot_for_frame();
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Released);
        let released = input.snapshot_for_frame();
        let after = input.snapshot_for_frame();

        assert!(released.is_just_released(MouseButton::Left));
        assert!(!released.is_pressed(MouseButton::Left));
        assert!(!after.is_just_released(MouseButton::Left));
    }

    #[test]
    fn press_and_release_within_one_frame_keeps_both_edges() {
        let mut input = InputCollector::new(BASE_RESOLUTION);
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Pressed);
        input.handle_mouse_input(WinitMouseButton::Left, ElementState::Released);
        let snapshot = input.snapshot_for_frame();

        assert!(snapshot.is_just_pressed(MouseButton::Left));
        assert!(snapshot.is_just_released(MouseButton::Left));
    }

    #[test]
    fn snapshot_carries_cursor_and_window_size() {
        let mut input = InputCollector::new(Resolution::new(1280, 720));
        input.set_cursor_position(100.7, 200.2);
        let snapshot = input.snapshot_for_frame();

        assert_eq!(snapshot.window_size(), Resolution::new(1280, 720));
        assert_eq!(snapshot.cursor_position(), Vector::new(100, 200));
    }

    #[test]
    fn middle_button_is_ignored() {
        let mut input = InputCollector::new(BASE_RESOLUTION);
        input.handle_mouse_input(WinitMouseButton::Middle, ElementState::Pressed);
        let snapshot = input.snapshot_for_frame();
        assert!(!snapshot.is_pressed(MouseButton::Left));
        assert!(!snapshot.is_pressed(MouseButton::Right));
    }

    #[test]
    fn fullscreen_keys_map_to_window_commands() {
        assert_eq!(
            window_command_for_physical_key(PhysicalKey::Code(KeyCode::F11)),
            Some(WindowCommand::ToggleFullscreen)
        );
        assert_eq!(
            window_command_for_physical_key(PhysicalKey::Code(KeyCode::Escape)),
            Some(WindowCommand::ExitFullscreen)
        );
        assert_eq!(
            window_command_for_physical_key(PhysicalKey::Code(KeyCode::KeyA)),
            None
        );
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn target_frame_duration_for_60hz_is_expected() {
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_positive_when_under_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(5), target_frame_duration(Some(60)));
        assert!(sleep > Duration::ZERO);
    }

    #[test]
    fn normalize_render_fps_cap_disables_zero() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(60)), Some(60));
    }
}
