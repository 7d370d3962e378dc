use std::{path::PathBuf, sync::Arc, time::Instant};

use volray::engine::VolumeRenderEngine;
use volray::input::InputEvent;
use volray::options::Options;
use volray::volume::{Volume, DEFAULT_DIMENSIONS};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

const OPTIONS_PATH: &str = "options.toml";
const PRESET_DIR: &str = "presets";

struct RenderApp {
    window: Option<Arc<Window>>,
    engine: Option<VolumeRenderEngine>,
    volume_path: PathBuf,
    last_frame_time: Instant,
    frame_delta: f32,
}

impl RenderApp {
    fn new(volume_path: PathBuf) -> Self {
        Self {
            window: None,
            engine: None,
            volume_path,
            last_frame_time: Instant::now(),
            frame_delta: 0.0,
        }
    }
}

impl ApplicationHandler for RenderApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = Window::default_attributes()
                .with_title("Volray")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
            let window = Arc::new(event_loop.create_window(attrs).unwrap());
            let size = window.inner_size();

            let volume =
                match Volume::load_raw(&self.volume_path, DEFAULT_DIMENSIONS) {
                    Ok(volume) => volume,
                    Err(e) => {
                        log::error!("{e}");
                        std::process::exit(1);
                    }
                };

            let options = load_options();

            let engine = pollster::block_on(VolumeRenderEngine::new(
                window.clone(),
                (size.width, size.height),
                &volume,
                options,
                PathBuf::from(PRESET_DIR),
            ));
            let engine = match engine {
                Ok(engine) => engine,
                Err(e) => {
                    log::error!("engine initialization failed: {e}");
                    std::process::exit(1);
                }
            };

            window.request_redraw();
            self.window = Some(window);
            self.engine = Some(engine);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(engine)) =
                    (&self.window, &mut self.engine)
                {
                    let now = Instant::now();
                    self.frame_delta =
                        now.duration_since(self.last_frame_time).as_secs_f32();
                    self.last_frame_time = now;

                    match engine.render() {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => {
                            let inner = window.inner_size();
                            engine.resize(inner.width, inner.height);
                        }
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                    window.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(engine) = &mut self.engine {
                    let _ = engine.handle_input(InputEvent::MouseButton {
                        button: button.into(),
                        pressed: state == ElementState::Pressed,
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(engine) = &mut self.engine {
                    let _ = engine.handle_input(InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(engine) = &mut self.engine {
                    let delta = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => {
                            pos.y as f32 * 0.01
                        }
                    };
                    let _ =
                        engine.handle_input(InputEvent::Scroll { delta });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let Some(engine) = &mut self.engine {
                        use winit::keyboard::PhysicalKey;
                        if let PhysicalKey::Code(code) = event.physical_key {
                            let key_str = format!("{code:?}");
                            if let Some(action) =
                                engine.options().keybindings.lookup(&key_str)
                            {
                                if engine
                                    .apply_key_action(action, self.frame_delta)
                                {
                                    event_loop.exit();
                                }
                            }
                        }
                    }
                }
            }

            _ => (),
        }
    }
}

fn load_options() -> Options {
    let path = std::path::Path::new(OPTIONS_PATH);
    if !path.exists() {
        return Options::default();
    }
    match Options::load(path) {
        Ok(options) => options,
        Err(e) => {
            log::warn!("ignoring {OPTIONS_PATH}: {e}");
            Options::default()
        }
    }
}

fn main() {
    env_logger::init();

    let volume_path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            log::error!("Usage: volray <volume.raw>");
            std::process::exit(1);
        }
    };

    let mut app = RenderApp::new(volume_path);
    let event_loop = EventLoop::new().unwrap();

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app).expect("Event loop error");
}
