use ggez::{Context, GameResult};
use ggez::graphics::{self, Color, DrawMode, DrawParam, Mesh, Text};
use ggez::event::{self, EventHandler};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::glam::Vec2 as GVec2;
use collision_lab::*;
use collision_lab::objects::radius_for_mass;

const SCREEN_WIDTH: f32 = 800.0;
const SCREEN_HEIGHT: f32 = 600.0;
const AXIS_Y: f32 = 380.0;
const PIXELS_PER_UNIT: f32 = 14.0;
const UI_MARGIN: f32 = 10.0;
const LINE_HEIGHT: f32 = 20.0;

/// Energy loss above this is shown in red, otherwise green. Purely cosmetic.
const ENERGY_LOSS_HIGHLIGHT: f64 = 0.01;

const MASS_STEP: f64 = 0.5;
const VELOCITY_STEP: f64 = 1.0;
const RESTITUTION_STEP: f64 = 0.05;

const BODY1_COLOR: Color = Color { r: 1.0, g: 0.27, b: 0.27, a: 1.0 };
const BODY2_COLOR: Color = Color { r: 0.27, g: 1.0, b: 0.27, a: 1.0 };
const LOSS_COLOR: Color = Color { r: 0.86, g: 0.15, b: 0.15, a: 1.0 };
const NO_LOSS_COLOR: Color = Color { r: 0.08, g: 0.6, b: 0.25, a: 1.0 };
const IDLE_COLOR: Color = Color { r: 0.67, g: 0.67, b: 0.67, a: 1.0 };

struct MainState {
    sim: Simulation,
    /// Inputs as currently edited; copied into the simulation on start.
    params: CollisionParameters,
    clock: FrameClock,
    /// Last start rejection, shown until the next successful start.
    error: Option<ValidationError>,
}

impl MainState {
    fn new(
        _ctx: &mut Context,
        params: CollisionParameters,
        config: SimulationConfig,
    ) -> GameResult<MainState> {
        let mut state = MainState {
            sim: Simulation::with_config(config),
            params,
            clock: FrameClock::new(),
            error: None,
        };
        // Start straight away, like pressing Space on load
        state.start();
        Ok(state)
    }

    fn start(&mut self) {
        // The first frame of a new run steps by zero
        self.clock.reset();
        match self.sim.start(self.params) {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e),
        }
    }

    fn edit(&mut self, keycode: KeyCode) {
        let p = &mut self.params;
        match keycode {
            KeyCode::Q => p.m1 += MASS_STEP,
            KeyCode::A => p.m1 -= MASS_STEP,
            KeyCode::W => p.v1i += VELOCITY_STEP,
            KeyCode::S => p.v1i -= VELOCITY_STEP,
            KeyCode::E => p.m2 += MASS_STEP,
            KeyCode::D => p.m2 -= MASS_STEP,
            KeyCode::R => p.v2i += VELOCITY_STEP,
            KeyCode::F => p.v2i -= VELOCITY_STEP,
            KeyCode::Up => p.restitution = (p.restitution + RESTITUTION_STEP).min(1.0),
            KeyCode::Down => p.restitution = (p.restitution - RESTITUTION_STEP).max(0.0),
            _ => {}
        }
    }

    /// Bodies to draw: the active run, or a preview of the edited inputs at the resting layout.
    fn bodies_to_draw(&self) -> Vec<(f64, f64)> {
        if let Some([a, b]) = self.sim.bodies() {
            return vec![(a.position, a.radius), (b.position, b.radius)];
        }
        let config = self.sim.config();
        [(self.params.m1, -config.start_offset), (self.params.m2, config.start_offset)]
            .into_iter()
            .filter(|(mass, _)| *mass > 0.0)
            .map(|(mass, position)| (position, radius_for_mass(mass, config.radius_scale)))
            .collect()
    }
}

fn to_screen_x(x: f64) -> f32 {
    SCREEN_WIDTH / 2.0 + x as f32 * PIXELS_PER_UNIT
}

fn draw_line_of_text(canvas: &mut graphics::Canvas, text: String, y: f32, color: Color) {
    let mut text = Text::new(text);
    text.set_scale(16.0);
    canvas.draw(&text, DrawParam::new().dest(GVec2::new(UI_MARGIN, y)).color(color));
}

impl EventHandler for MainState {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        let now_ms = ctx.time.time_since_start().as_secs_f64() * 1000.0;
        let elapsed = self.clock.tick(now_ms);
        self.sim.step(elapsed);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Color::from_rgb(0x20, 0x20, 0x25));
        let config = *self.sim.config();

        // Collision axis and arena boundary markers
        let axis = Mesh::new_line(
            ctx,
            &[GVec2::new(0.0, AXIS_Y), GVec2::new(SCREEN_WIDTH, AXIS_Y)],
            2.0,
            Color::from_rgb(0x88, 0x88, 0x88),
        )?;
        canvas.draw(&axis, DrawParam::new());
        for x in [-config.boundary, config.boundary] {
            let sx = to_screen_x(x);
            let marker = Mesh::new_line(
                ctx,
                &[GVec2::new(sx, AXIS_Y - 60.0), GVec2::new(sx, AXIS_Y + 10.0)],
                1.0,
                Color::from_rgb(0x44, 0x44, 0x44),
            )?;
            canvas.draw(&marker, DrawParam::new());
        }

        // Bodies sit on the axis
        let bodies = self.bodies_to_draw();
        for ((position, radius), color) in bodies.into_iter().zip([BODY1_COLOR, BODY2_COLOR]) {
            let radius_px = radius as f32 * PIXELS_PER_UNIT;
            let circle_mesh = Mesh::new_circle(
                ctx,
                DrawMode::fill(),
                GVec2::new(0.0, 0.0),
                radius_px,
                0.1,
                color,
            )?;
            canvas.draw(
                &circle_mesh,
                DrawParam::new().dest(GVec2::new(to_screen_x(position), AXIS_Y - radius_px)),
            );
        }

        // Readouts
        let p = self.params;
        let stats = compute_live_stats(&p);
        let mut y = UI_MARGIN;
        let lines = [
            format!("Object 1: m1 = {:.2} kg, v1i = {:.2} m/s   [Q/A, W/S]", p.m1, p.v1i),
            format!("Object 2: m2 = {:.2} kg, v2i = {:.2} m/s   [E/D, R/F]", p.m2, p.v2i),
            format!("Restitution e = {:.2}   [Up/Down]", p.restitution),
            format!("Initial momentum: {:.2} kg.m/s", stats.initial_momentum),
            match self.sim.final_momentum() {
                Some(momentum) => format!("Final momentum: {:.2} kg.m/s", momentum),
                None if self.sim.phase() == SimulationPhase::Approaching => {
                    "Final momentum: waiting for collision...".to_string()
                }
                None => format!("Final momentum: {:.2} kg.m/s", stats.final_momentum),
            },
            format!("v1f = {:.2} m/s, v2f = {:.2} m/s", stats.v1f, stats.v2f),
        ];
        for line in lines {
            draw_line_of_text(&mut canvas, line, y, Color::WHITE);
            y += LINE_HEIGHT;
        }

        let loss_color = if stats.energy_loss > ENERGY_LOSS_HIGHLIGHT {
            LOSS_COLOR
        } else {
            NO_LOSS_COLOR
        };
        let loss_text = format!("KE loss: {:.2} Joule", stats.energy_loss);
        draw_line_of_text(&mut canvas, loss_text, y, loss_color);
        y += LINE_HEIGHT * 1.5;

        let status_color = if self.sim.phase().is_running() {
            Color::YELLOW
        } else {
            IDLE_COLOR
        };
        draw_line_of_text(&mut canvas, self.sim.status_text(), y, status_color);
        y += LINE_HEIGHT;
        if let Some(e) = self.error {
            draw_line_of_text(&mut canvas, format!("Cannot start: {}", e), y, LOSS_COLOR);
        }

        draw_line_of_text(
            &mut canvas,
            "Space: start / reset    Esc: quit".to_string(),
            SCREEN_HEIGHT - UI_MARGIN - LINE_HEIGHT,
            Color::from_rgb(0xaa, 0xaa, 0xaa),
        );

        canvas.finish(ctx)?;
        Ok(())
    }

    fn key_down_event(
        &mut self,
        ctx: &mut Context,
        input: KeyInput,
        _repeated: bool,
    ) -> GameResult {
        match input.keycode {
            Some(KeyCode::Escape) => ctx.request_quit(),
            Some(KeyCode::Space) | Some(KeyCode::Return) => self.start(),
            Some(keycode) => self.edit(keycode),
            None => {}
        }
        Ok(())
    }
}

pub fn run_visual(params: CollisionParameters, config: SimulationConfig) -> GameResult {
    let cb = ggez::ContextBuilder::new("collision_viewer", "collision_lab")
        .window_setup(ggez::conf::WindowSetup::default().title("1D Collision Lab"))
        .window_mode(ggez::conf::WindowMode::default().dimensions(SCREEN_WIDTH, SCREEN_HEIGHT));

    let (mut ctx, event_loop) = cb.build()?;
    let state = MainState::new(&mut ctx, params, config)?;
    event::run(ctx, event_loop, state)
}
