//! Starhop -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `TimeState`, 30 Hz):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- advance the session state machine one tick:
//!      menu input, or integrator -> resolver -> jump -> resolver -> clamp ->
//!      star check, or the win-banner countdown
//!   3. Rebuild the quad mesh (background, platforms, star, player)
//!   4. Issue draw calls, composite the egui menu/banner overlay
//!
//! The session state machine is {MainMenu, Playing, Won, Quit}; Quit exits
//! the event loop. Startup failures (window, GPU, level file, textures) are
//! fatal; audio failure is not.

mod audio;
mod collision;
mod level;
mod player;
#[cfg(test)]
mod replay;
mod session;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use shp_core::input::{InputState, Key};
use shp_core::time::TimeState;
use shp_platform::window::PlatformConfig;
use shp_render::{GpuContext, QuadPipeline, QuadVertex, ScreenCamera, Texture};
use shp_ui::{GameUi, UiScreen};

use audio::MusicPlayer;
use collision::RectF;
use level::{load_level_from_path, World};
use player::{FrameInput, Player};
use session::{Session, SessionState};

const LEVEL_PATH: &str = "assets/levels/level01.json";

// Scene texture slots, in the order of `TEXTURE_PATHS`.
const TEX_BACKGROUND: usize = 0;
const TEX_PLATFORM: usize = 1;
const TEX_STAR: usize = 2;
const TEX_PLAYER: usize = 3;
const TEXTURE_PATHS: [&str; 4] = [
    "assets/textures/background.png",
    "assets/textures/platform.png",
    "assets/textures/star.png",
    "assets/textures/player.png",
];

/// A contiguous run of indices that share the same texture binding.
/// Consecutive quads using the same texture merge into a single draw call.
#[derive(Debug, Clone, Copy)]
struct DrawCall {
    slot: usize,
    index_start: u32,
    index_count: u32,
}

struct QuadSpec {
    slot: usize,
    rect: RectF,
    flip_x: bool,
    color: [f32; 4],
}

/// All mutable game state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    quad_pipeline: QuadPipeline,
    ui: GameUi,

    world: World,
    player: Player,
    session: Session,
    music: Option<MusicPlayer>,

    // The quad mesh is rebuilt on the CPU each frame, then streamed into
    // these GPU buffers. Buffers grow (power-of-two) but never shrink.
    texture_bind_groups: [wgpu::BindGroup; 4],
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
}

impl GameState {
    fn new(window: Arc<Window>, config: &PlatformConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let quad_pipeline = QuadPipeline::new(&gpu.device, gpu.surface_format);
        let ui = GameUi::new(&gpu.device, gpu.surface_format, &window);

        let level = load_level_from_path(std::path::Path::new(LEVEL_PATH)).unwrap_or_else(|err| {
            panic!("Failed to load level '{LEVEL_PATH}': {err}");
        });
        log::info!(
            "Level '{}' ({}) loaded: {} platforms",
            level.level_id,
            level.version,
            level.platforms.len()
        );
        let world = World::from_file(level);
        let spawn = world.spawn();
        let player = Player::new(spawn.x, spawn.y);

        let texture_bind_groups = TEXTURE_PATHS.map(|path| {
            load_scene_texture(&gpu, &quad_pipeline, path)
                .unwrap_or_else(|err| panic!("Startup asset error: {err}"))
        });

        // The projection never changes: one logical 800x600 space, uploaded
        // once.
        let camera = ScreenCamera::new(config.width, config.height);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = quad_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            quad_pipeline,
            ui,
            world,
            player,
            session: Session::new(),
            music: None,
            texture_bind_groups,
            vertex_buffer,
            index_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
        }
    }

    fn start_game(&mut self) {
        self.session.start();
        if self.music.is_none() {
            self.music = Some(MusicPlayer::start());
        }
    }

    /// One fixed simulation tick of the session state machine.
    fn fixed_step(&mut self) {
        match self.session.state() {
            SessionState::MainMenu => {
                if self.input.is_just_pressed(Key::Enter) {
                    self.start_game();
                }
                if self.input.is_just_pressed(Key::Escape) {
                    self.session.request_quit();
                }
            }
            SessionState::Playing => {
                let input = FrameInput {
                    left: self.input.is_held(Key::Left),
                    right: self.input.is_held(Key::Right),
                    up: self.input.is_held(Key::Up),
                };
                self.player.step(input, self.world.obstacles());
                self.player.clamp_to_screen();

                if let Some(trigger) = self.world.star_trigger() {
                    if self.player.rect().overlaps(&trigger) {
                        self.session.win();
                    }
                }
            }
            SessionState::Won { .. } => self.session.tick_won(),
            SessionState::Quit => {}
        }
    }

    fn ui_screen(&self) -> UiScreen {
        match self.session.state() {
            SessionState::MainMenu => UiScreen::MainMenu,
            SessionState::Won { .. } => UiScreen::WinBanner,
            _ => UiScreen::Hidden,
        }
    }

    fn rebuild_mesh(&mut self) {
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<QuadVertex>, Vec<u32>, Vec<DrawCall>) {
        let quad_estimate = self.world.obstacles().len() + 3;
        let mut vertices = Vec::with_capacity(quad_estimate * 4);
        let mut indices = Vec::with_capacity(quad_estimate * 6);
        let mut draw_calls = Vec::with_capacity(8);

        let in_menu = self.session.state() == SessionState::MainMenu;
        // The menu dims the backdrop slightly so the buttons read clearly.
        let backdrop_color = if in_menu {
            [0.55, 0.55, 0.65, 1.0]
        } else {
            [1.0, 1.0, 1.0, 1.0]
        };

        add_quad(
            &mut vertices,
            &mut indices,
            &mut draw_calls,
            QuadSpec {
                slot: TEX_BACKGROUND,
                rect: RectF::new(0.0, 0.0, player::SCREEN_W, player::SCREEN_H),
                flip_x: false,
                color: backdrop_color,
            },
        );

        if !in_menu {
            for obstacle in self.world.obstacles() {
                add_quad(
                    &mut vertices,
                    &mut indices,
                    &mut draw_calls,
                    QuadSpec {
                        slot: TEX_PLATFORM,
                        rect: obstacle.rect,
                        flip_x: false,
                        color: [1.0, 1.0, 1.0, 1.0],
                    },
                );
            }

            if let Some(star) = self.world.star_trigger() {
                add_quad(
                    &mut vertices,
                    &mut indices,
                    &mut draw_calls,
                    QuadSpec {
                        slot: TEX_STAR,
                        rect: star,
                        flip_x: false,
                        color: [1.0, 1.0, 1.0, 1.0],
                    },
                );
            }

            add_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                QuadSpec {
                    slot: TEX_PLAYER,
                    rect: self.player.rect(),
                    flip_x: self.player.facing() == player::Facing::Left,
                    color: [1.0, 1.0, 1.0, 1.0],
                },
            );
        }

        (vertices, indices, draw_calls)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = shp_platform::window::create_window(event_loop, &self.config);
        self.state = Some(GameState::new(window, &self.config));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.ui.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.session.request_quit();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                while state.time.should_step() {
                    state.fixed_step();
                }

                if state.session.is_quit() {
                    event_loop.exit();
                    return;
                }

                state.rebuild_mesh();

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let (egui_primitives, egui_textures_delta, ui_actions) =
                    state.ui.prepare(&state.window, state.ui_screen());
                if ui_actions.start_clicked {
                    state.start_game();
                }
                if ui_actions.quit_clicked {
                    state.session.request_quit();
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: 0.392,
                                    g: 0.584,
                                    b: 0.929,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.quad_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    let mut last_bound_slot = None;
                    for draw in &state.draw_calls {
                        if last_bound_slot != Some(draw.slot) {
                            render_pass.set_bind_group(
                                1,
                                &state.texture_bind_groups[draw.slot],
                                &[],
                            );
                            last_bound_slot = Some(draw.slot);
                        }
                        render_pass.draw_indexed(
                            draw.index_start..(draw.index_start + draw.index_count),
                            0,
                            0..1,
                        );
                    }
                }

                state.ui.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .ui
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.ui.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Only clear edge-triggered input (just_pressed / just_released)
                // after at least one fixed step consumed it. Otherwise a press
                // that lands on a frame with 0 simulation steps is silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<QuadVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn add_quad(
    vertices: &mut Vec<QuadVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    spec: QuadSpec,
) {
    let (u0, u1) = if spec.flip_x { (1.0, 0.0) } else { (0.0, 1.0) };
    let base_index = vertices.len() as u32;

    // Top-left, top-right, bottom-right, bottom-left, in y-down screen space.
    vertices.push(QuadVertex {
        position: [spec.rect.left(), spec.rect.top()],
        tex_coords: [u0, 0.0],
        color: spec.color,
    });
    vertices.push(QuadVertex {
        position: [spec.rect.right(), spec.rect.top()],
        tex_coords: [u1, 0.0],
        color: spec.color,
    });
    vertices.push(QuadVertex {
        position: [spec.rect.right(), spec.rect.bottom()],
        tex_coords: [u1, 1.0],
        color: spec.color,
    });
    vertices.push(QuadVertex {
        position: [spec.rect.left(), spec.rect.bottom()],
        tex_coords: [u0, 1.0],
        color: spec.color,
    });

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, spec.slot, draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture slot
/// matches and indices are contiguous: consecutive platforms collapse into
/// a single `draw_indexed`.
fn push_draw_call(draw_calls: &mut Vec<DrawCall>, slot: usize, index_start: u32, index_count: u32) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.slot == slot && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        slot,
        index_start,
        index_count,
    });
}

fn load_scene_texture(
    gpu: &GpuContext,
    pipeline: &QuadPipeline,
    path: &str,
) -> Result<wgpu::BindGroup, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read texture '{path}': {e}"))?;
    let texture = Texture::from_bytes(&gpu.device, &gpu.queue, &bytes, path)?;
    Ok(pipeline.create_texture_bind_group(&gpu.device, &texture))
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starhop starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
