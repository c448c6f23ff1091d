use std::sync::Arc;

use anyhow::Context;
use cgmath::{Deg, Vector3};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::DemoConfig,
    demo::DemoScene,
    frame_loop::{Clock, FrameLoop},
    gfx::{
        camera::{CameraManager, OrbitCamera, TrackballControls},
        rendering::RenderEngine,
        scene::Scene,
    },
    inspector::{FieldEdit, InspectorPanel},
    ui::{inspector_window, UiManager},
};

/// Windowed demo: renders the scene and the material inspector every frame
pub struct MaterialLabApp {
    app_state: AppState,
}

struct AppState {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    panel: InspectorPanel,
    camera_manager: CameraManager,
    frame_loop: FrameLoop,
    clock: Clock,
    fatal: Option<anyhow::Error>,
}

impl MaterialLabApp {
    pub fn new(config: DemoConfig, demo: DemoScene, frame_loop: FrameLoop) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera = OrbitCamera::looking_at(
            Vector3::from(config.camera.position),
            Vector3::from(config.camera.target),
            aspect,
        )
        .with_projection(Deg(config.camera.fov), config.camera.near, config.camera.far);
        let controls = TrackballControls::new(&config.controls);

        Self {
            app_state: AppState {
                camera_manager: CameraManager::new(camera, controls),
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: demo.scene,
                panel: demo.panel,
                frame_loop,
                clock: Clock::new(),
                fatal: None,
            },
        }
    }

    /// Runs the event loop until the window closes
    ///
    /// Returns the error that stopped the app, if setup failed.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated abnormally")?;

        match self.app_state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let dt = self.clock.delta();
        self.camera_manager.update(dt);
        window.request_redraw();

        render_engine.update(self.camera_manager.camera.uniform, &self.scene);

        let mut edits: Vec<FieldEdit> = Vec::new();
        let ui_manager = self.ui_manager.as_mut();
        let (panel, scene) = (&self.panel, &self.scene);
        let result = render_engine.render_frame(
            scene,
            Some(|device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                if let Some(ui_manager) = ui_manager {
                    ui_manager.draw(device, queue, encoder, &window, view, |ui| {
                        edits = inspector_window(ui, panel, scene);
                    });
                }
            }),
        );
        if let Err(e) = result {
            log::error!("Skipping frame: {}", e);
        }

        for edit in edits {
            if let Err(e) = self.panel.apply(edit, &mut self.scene.material_manager) {
                log::warn!("Inspector edit rejected: {}", e);
            }
        }

        self.frame_loop.advance(&mut self.scene);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Failed to create window"));
                return;
            }
        };

        let (width, height) = window.inner_size().into();
        self.camera_manager.camera.resize_projection(width, height);

        let surface_target = window.clone();
        let renderer = match pollster::block_on(RenderEngine::new(surface_target, width, height)) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(
                    event_loop,
                    anyhow::Error::new(e).context("Failed to initialize renderer"),
                );
                return;
            }
        };

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        log::info!("Window ready at {}x{}", width, height);
        window.request_redraw();
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets first look at input
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: Event<()> = Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        self.camera_manager.controls.process_window_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                log::info!("Exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera_manager.camera.resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }
        self.camera_manager.controls.process_device_event(&event);
    }
}
