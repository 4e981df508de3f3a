//! Menu and banner UI rendered via egui on top of the game scene.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! Which screen is drawn is decided by the caller each frame via `UiScreen`;
//! egui event handling is always active so the menu buttons receive clicks.

use winit::window::Window;

/// What the overlay should draw this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiScreen {
    /// Gameplay: no overlay widgets at all.
    Hidden,
    /// Title screen with Start Game / Quit buttons.
    MainMenu,
    /// Win banner shown after the star is collected.
    WinBanner,
}

#[derive(Debug, Clone, Default)]
pub struct UiActions {
    /// User clicked the Start Game button
    pub start_clicked: bool,
    /// User clicked the Quit button
    pub quit_clicked: bool,
}

pub struct GameUi {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl GameUi {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        screen: UiScreen,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        UiActions,
    ) {
        let mut actions = UiActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| match screen {
            UiScreen::Hidden => {}
            UiScreen::MainMenu => draw_main_menu(ctx, &mut actions),
            UiScreen::WinBanner => draw_win_banner(ctx),
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_main_menu(ctx: &egui::Context, actions: &mut UiActions) {
    egui::Area::new(egui::Id::new("main_menu"))
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("STARHOP")
                        .size(64.0)
                        .strong()
                        .color(egui::Color32::from_rgb(225, 255, 225)),
                );
                ui.label(
                    egui::RichText::new("Grab the star to win")
                        .size(18.0)
                        .color(egui::Color32::from_rgb(200, 220, 200)),
                );
                ui.add_space(48.0);
                let start = egui::Button::new(egui::RichText::new("Start Game").size(24.0));
                if ui.add_sized([200.0, 50.0], start).clicked() {
                    actions.start_clicked = true;
                }
                ui.add_space(24.0);
                let quit = egui::Button::new(egui::RichText::new("Quit").size(24.0));
                if ui.add_sized([200.0, 50.0], quit).clicked() {
                    actions.quit_clicked = true;
                }
            });
        });
}

fn draw_win_banner(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("win_banner"))
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                ui.label(
                    egui::RichText::new("You collected the star! You win!")
                        .size(32.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
            });
        });
}
