use crate::{
    collision::{self, CollisionManifold, FinalVelocities},
    common::{CollisionParameters, SimulationConfig, ValidationError},
    objects::Body,
};
use crate::integration::integrator;

/// Relative momentum drift above which a collision is logged at debug level.
const MOMENTUM_DRIFT_TOLERANCE: f64 = 1e-9;

/// Where the current run is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationPhase {
    /// No run in progress: never started, or the last start was rejected.
    #[default]
    Idle,
    /// Bodies move at their initial velocities towards each other.
    Approaching,
    /// Contact happened; bodies move at their final velocities.
    Collided,
    /// A body left the arena. Nothing moves until the next start.
    Finished,
}

impl SimulationPhase {
    /// True while `step` still moves the bodies.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Approaching | Self::Collided)
    }

    pub fn has_collided(self) -> bool {
        matches!(self, Self::Collided | Self::Finished)
    }
}

/// Identifies an accepted run and carries the velocities precomputed for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunHandle {
    pub run_id: u64,
    pub final_velocities: FinalVelocities,
}

/// One-off transitions, reported only on the frame they happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    Collision { final_momentum: f64 },
    Finished,
}

/// Display-ready snapshot produced by every `Simulation::step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub phase: SimulationPhase,
    pub position1: f64,
    pub position2: f64,
    /// `m1*v1f + m2*v2f`, available from the collision frame onward.
    pub final_momentum: Option<f64>,
    pub event: Option<StepEvent>,
}

#[derive(Debug, Clone)]
struct Run {
    handle: RunHandle,
    params: CollisionParameters,
    // [left body, right body]
    bodies: [Body; 2],
}

impl Run {
    fn final_momentum(&self) -> f64 {
        self.bodies.iter().map(Body::final_momentum).sum()
    }
}

/// Two-body collision stepper.
///
/// Owns the single active body pair and the phase. All mutation goes through
/// `start` and `step`; the host calls `step` once per rendered frame.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    phase: SimulationPhase,
    run: Option<Run>,
    next_run_id: u64,
}

impl Simulation {
    /// Creates an idle simulation with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config,
            phase: SimulationPhase::Idle,
            run: None,
            next_run_id: 1,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    /// Handle of the active run, if any.
    pub fn run(&self) -> Option<&RunHandle> {
        self.run.as_ref().map(|run| &run.handle)
    }

    pub fn params(&self) -> Option<&CollisionParameters> {
        self.run.as_ref().map(|run| &run.params)
    }

    /// Left and right body of the active run.
    pub fn bodies(&self) -> Option<&[Body; 2]> {
        self.run.as_ref().map(|run| &run.bodies)
    }

    /// Total momentum after the collision, once it has happened.
    pub fn final_momentum(&self) -> Option<f64> {
        if !self.phase.has_collided() {
            return None;
        }
        self.run.as_ref().map(Run::final_momentum)
    }

    /// Overlay line for the current phase.
    pub fn status_text(&self) -> String {
        match self.phase {
            SimulationPhase::Idle => "Simulation ready".to_string(),
            SimulationPhase::Approaching => "Collision starting...".to_string(),
            SimulationPhase::Collided => format!(
                "COLLISION! Final momentum: {:.2} kg.m/s",
                self.final_momentum().unwrap_or_default()
            ),
            SimulationPhase::Finished => "Simulation finished.".to_string(),
        }
    }

    /// Discards any run in progress and starts a new one from the resting layout.
    ///
    /// On rejection the simulation is left `Idle` with no bodies.
    pub fn start(&mut self, params: CollisionParameters) -> Result<RunHandle, ValidationError> {
        self.run = None;
        self.phase = SimulationPhase::Idle;

        if let Err(err) = params.validate() {
            log::warn!("start rejected: {err} ({params:?})");
            return Err(err);
        }

        let final_velocities = params.solve();
        let radius_scale = self.config.radius_scale;
        let body_a = Body {
            position: -self.config.start_offset,
            initial_velocity: params.v1i,
            final_velocity: final_velocities.v1f,
            ..Body::new(params.m1, radius_scale)
        };
        let body_b = Body {
            position: self.config.start_offset,
            initial_velocity: params.v2i,
            final_velocity: final_velocities.v2f,
            ..Body::new(params.m2, radius_scale)
        };

        let handle = RunHandle {
            run_id: self.next_run_id,
            final_velocities,
        };
        self.next_run_id += 1;
        self.run = Some(Run {
            handle,
            params,
            bodies: [body_a, body_b],
        });
        self.phase = SimulationPhase::Approaching;

        log::info!(
            "run {} started: m1={} v1i={} m2={} v2i={} e={} -> v1f={:.3} v2f={:.3}",
            handle.run_id,
            params.m1,
            params.v1i,
            params.m2,
            params.v2i,
            params.restitution,
            final_velocities.v1f,
            final_velocities.v2f,
        );
        Ok(handle)
    }

    /// Advances the active run by one frame.
    ///
    /// `elapsed_seconds` is clamped to `[0, max_frame_dt]` and scaled by
    /// `speed_multiplier` before positions are updated.
    pub fn step(&mut self, elapsed_seconds: f64) -> StepReport {
        let dt = integrator::clamp_frame_dt(elapsed_seconds, self.config.max_frame_dt)
            * self.config.speed_multiplier;

        let event = match self.phase {
            SimulationPhase::Approaching => self.step_approaching(dt),
            SimulationPhase::Collided => self.step_collided(dt),
            SimulationPhase::Idle | SimulationPhase::Finished => None,
        };

        let report = self.report(event);
        log::debug!(
            "step dt={:.4}: {:?} x1={:.3} x2={:.3}",
            dt,
            report.phase,
            report.position1,
            report.position2
        );
        report
    }

    /// Moves both bodies at their initial velocities and checks for contact.
    fn step_approaching(&mut self, dt: f64) -> Option<StepEvent> {
        let run = self.run.as_mut()?;
        let [body_a, body_b] = &mut run.bodies;

        let v1i = body_a.initial_velocity;
        let v2i = body_b.initial_velocity;
        integrator::integrate(body_a, v1i, dt);
        integrator::integrate(body_b, v2i, dt);

        let manifold = collision::check_sphere_sphere(body_a, body_b)?;
        apply_positional_correction(body_a, body_b, &manifold);
        self.phase = SimulationPhase::Collided;

        let final_momentum = run.final_momentum();
        let initial_momentum = run.params.initial_momentum();
        let drift = (final_momentum - initial_momentum).abs();
        if drift > MOMENTUM_DRIFT_TOLERANCE * initial_momentum.abs().max(1.0) {
            log::debug!("momentum drift {drift:e} at collision of run {}", run.handle.run_id);
        }
        log::info!(
            "run {} collided: overlap={:.4} final momentum={:.2} kg.m/s",
            run.handle.run_id,
            manifold.depth,
            final_momentum
        );
        Some(StepEvent::Collision { final_momentum })
    }

    /// Moves both bodies at their final velocities and checks the arena boundary.
    fn step_collided(&mut self, dt: f64) -> Option<StepEvent> {
        let run = self.run.as_mut()?;
        for body in run.bodies.iter_mut() {
            let velocity = body.final_velocity;
            integrator::integrate(body, velocity, dt);
        }

        let boundary = self.config.boundary;
        if run.bodies.iter().any(|body| body.position.abs() > boundary) {
            self.phase = SimulationPhase::Finished;
            log::info!("run {} finished", run.handle.run_id);
            Some(StepEvent::Finished)
        } else {
            None
        }
    }

    fn report(&self, event: Option<StepEvent>) -> StepReport {
        let (position1, position2) = match &self.run {
            Some(run) => (run.bodies[0].position, run.bodies[1].position),
            None => (-self.config.start_offset, self.config.start_offset),
        };
        StepReport {
            phase: self.phase,
            position1,
            position2,
            final_momentum: self.final_momentum(),
            event,
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// Pushes overlapping bodies apart until they just touch.
/// Each body moves in proportion to the other's mass, so the heavier one moves less.
fn apply_positional_correction(body_a: &mut Body, body_b: &mut Body, manifold: &CollisionManifold) {
    let total_mass = body_a.mass + body_b.mass;
    body_a.position -= manifold.depth * body_b.mass / total_mass;
    body_b.position += manifold.depth * body_a.mass / total_mass;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;
    const FRAME: f64 = 1.0 / 60.0;

    fn reference_params() -> CollisionParameters {
        CollisionParameters::new(2.0, 5.0, 3.0, -1.0, 0.8)
    }

    /// Steps until `phase` is reached, returning every report produced on the way.
    fn step_until(
        sim: &mut Simulation,
        phase: SimulationPhase,
        max_frames: usize,
    ) -> Vec<StepReport> {
        let mut reports = Vec::new();
        for _ in 0..max_frames {
            let report = sim.step(FRAME);
            reports.push(report);
            if report.phase == phase {
                return reports;
            }
        }
        panic!("phase {phase:?} not reached within {max_frames} frames, now {:?}", sim.phase());
    }

    #[test]
    fn test_simulation_new() {
        let sim = Simulation::new();
        assert_eq!(sim.phase(), SimulationPhase::Idle);
        assert!(sim.run().is_none());
        assert!(sim.bodies().is_none());
        assert!(sim.final_momentum().is_none());
        assert_eq!(*sim.config(), SimulationConfig::default());
    }

    #[test]
    fn test_step_idle_reports_resting_layout() {
        let mut sim = Simulation::new();
        let report = sim.step(FRAME);
        assert_eq!(report.phase, SimulationPhase::Idle);
        assert_eq!(report.position1, -10.0);
        assert_eq!(report.position2, 10.0);
        assert!(report.final_momentum.is_none());
        assert!(report.event.is_none());
    }

    #[test]
    fn test_start_sets_up_run() {
        let mut sim = Simulation::new();
        let handle = sim.start(reference_params()).expect("valid parameters");

        assert_eq!(sim.phase(), SimulationPhase::Approaching);
        assert_eq!(handle.run_id, 1);
        assert_relative_eq!(handle.final_velocities.v1f, -1.48, epsilon = EPSILON);
        assert_relative_eq!(handle.final_velocities.v2f, 3.32, epsilon = EPSILON);
        assert_eq!(sim.run(), Some(&handle));
        assert_eq!(sim.params(), Some(&reference_params()));

        let [a, b] = sim.bodies().expect("run has bodies");
        assert_eq!(a.position, -10.0);
        assert_eq!(b.position, 10.0);
        assert_relative_eq!(a.radius, 0.5 * 2.0_f64.cbrt(), epsilon = EPSILON);
        assert_relative_eq!(b.radius, 0.5 * 3.0_f64.cbrt(), epsilon = EPSILON);
        assert_eq!(a.initial_velocity, 5.0);
        assert_eq!(b.initial_velocity, -1.0);
        assert_eq!(a.final_velocity, handle.final_velocities.v1f);
        assert_eq!(b.final_velocity, handle.final_velocities.v2f);
        assert!(sim.final_momentum().is_none());
    }

    #[test]
    fn test_start_rejections() {
        let cases = [
            (CollisionParameters::new(0.0, 5.0, 3.0, -1.0, 1.0), ValidationError::InvalidMass),
            (CollisionParameters::new(2.0, 5.0, -3.0, -1.0, 1.0), ValidationError::InvalidMass),
            (CollisionParameters::new(2.0, 2.0, 3.0, 2.0, 1.0), ValidationError::EqualVelocities),
            (
                CollisionParameters::new(2.0, -1.0, 3.0, 5.0, 1.0),
                ValidationError::WrongOrderVelocities,
            ),
            (
                CollisionParameters::new(1.0, f64::INFINITY, 1.0, 0.0, 1.0),
                ValidationError::WrongOrderVelocities,
            ),
            (
                CollisionParameters::new(10.0, 1e308, 1.0, 0.0, 1.0),
                ValidationError::WrongOrderVelocities,
            ),
        ];
        for (params, expected) in cases {
            let mut sim = Simulation::new();
            assert_eq!(sim.start(params), Err(expected));
            assert_eq!(sim.phase(), SimulationPhase::Idle);
            assert!(sim.run().is_none());
        }
    }

    #[test]
    fn test_rejected_start_discards_run_in_progress() {
        let mut sim = Simulation::new();
        sim.start(reference_params()).unwrap();
        sim.step(FRAME);

        let bad = CollisionParameters::new(1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(sim.start(bad), Err(ValidationError::EqualVelocities));
        assert_eq!(sim.phase(), SimulationPhase::Idle);
        assert!(sim.bodies().is_none());

        // Stepping after the rejection moves nothing
        let report = sim.step(FRAME);
        assert_eq!(report.phase, SimulationPhase::Idle);
        assert_eq!(report.position1, -10.0);
    }

    #[test]
    fn test_restart_mid_run_resets_state() {
        let mut sim = Simulation::new();
        let first = sim.start(reference_params()).unwrap();
        step_until(&mut sim, SimulationPhase::Collided, 1000);

        let second = sim.start(CollisionParameters::new(1.0, 3.0, 1.0, 0.0, 1.0)).unwrap();
        assert_eq!(second.run_id, first.run_id + 1);
        assert_eq!(sim.phase(), SimulationPhase::Approaching);
        assert!(sim.final_momentum().is_none());
        let [a, b] = sim.bodies().unwrap();
        assert_eq!(a.position, -10.0);
        assert_eq!(b.position, 10.0);
        assert_eq!(a.initial_velocity, 3.0);
    }

    #[test]
    fn test_step_approaching_moves_bodies() {
        let mut sim = Simulation::new();
        sim.start(reference_params()).unwrap();

        let report = sim.step(0.01);
        // x += v * dt * speed_multiplier
        assert_eq!(report.phase, SimulationPhase::Approaching);
        assert_relative_eq!(report.position1, -10.0 + 5.0 * 0.01 * 3.0, epsilon = EPSILON);
        assert_relative_eq!(report.position2, 10.0 + -1.0 * 0.01 * 3.0, epsilon = EPSILON);
        assert!(report.final_momentum.is_none());
        assert!(report.event.is_none());
    }

    #[test]
    fn test_step_clamps_long_frames() {
        let mut clamped = Simulation::new();
        let mut reference = Simulation::new();
        clamped.start(reference_params()).unwrap();
        reference.start(reference_params()).unwrap();

        let long = clamped.step(2.0);
        let max = reference.step(0.033);
        assert_eq!(long, max);
    }

    #[test]
    fn test_step_ignores_negative_elapsed() {
        let mut sim = Simulation::new();
        sim.start(reference_params()).unwrap();
        let report = sim.step(-0.5);
        assert_eq!(report.position1, -10.0);
        assert_eq!(report.position2, 10.0);
    }

    #[test]
    fn test_positions_monotonic_before_collision() {
        let mut sim = Simulation::new();
        sim.start(reference_params()).unwrap();
        let mut last = sim.step(0.0);
        loop {
            let report = sim.step(FRAME);
            if report.phase != SimulationPhase::Approaching {
                break;
            }
            assert!(report.position1 > last.position1); // v1i = 5
            assert!(report.position2 < last.position2); // v2i = -1
            last = report;
        }
    }

    #[test]
    fn test_collision_detected_exactly_once() {
        let mut sim = Simulation::new();
        sim.start(reference_params()).unwrap();
        let mut reports = step_until(&mut sim, SimulationPhase::Finished, 10_000);
        // Frozen frames after finishing
        for _ in 0..10 {
            reports.push(sim.step(FRAME));
        }

        let collisions: Vec<_> = reports
            .iter()
            .filter(|r| matches!(r.event, Some(StepEvent::Collision { .. })))
            .collect();
        assert_eq!(collisions.len(), 1);

        let finishes = reports.iter().filter(|r| r.event == Some(StepEvent::Finished)).count();
        assert_eq!(finishes, 1);

        // Phase sequence never goes back to Approaching once collided
        let first_collided = reports.iter().position(|r| r.phase.has_collided()).unwrap();
        assert!(reports[first_collided..].iter().all(|r| r.phase.has_collided()));
        assert_eq!(reports[first_collided].phase, SimulationPhase::Collided);
    }

    #[test]
    fn test_collision_momentum_matches_initial() {
        let params = reference_params();
        let mut sim = Simulation::new();
        sim.start(params).unwrap();
        let reports = step_until(&mut sim, SimulationPhase::Collided, 10_000);

        let collision = reports.last().unwrap();
        match collision.event {
            Some(StepEvent::Collision { final_momentum }) => {
                assert_relative_eq!(final_momentum, params.initial_momentum(), epsilon = EPSILON);
                assert_eq!(collision.final_momentum, Some(final_momentum));
            }
            other => panic!("expected collision event, got {other:?}"),
        }

        // Still reported on later frames, without the event
        let next = sim.step(FRAME);
        assert!(next.event.is_none());
        assert_relative_eq!(next.final_momentum.unwrap(), 7.0, epsilon = EPSILON);
    }

    #[test]
    fn test_collision_removes_overlap_by_mass() {
        // m1 = 1 (r = 0.5), m2 = 8 (r = 1.0); a single clamped frame carries body 1
        // from -10 to -10 + 300 * 0.033 * 3 = 19.7, well past body 2 at 10.
        let params = CollisionParameters::new(1.0, 300.0, 8.0, 0.0, 1.0);
        let mut sim = Simulation::new();
        sim.start(params).unwrap();

        let report = sim.step(0.033);
        assert_eq!(report.phase, SimulationPhase::Collided);

        let distance = 10.0 - 19.7;
        let overlap = 1.5 - distance;
        let expected1 = 19.7 - overlap * 8.0 / 9.0;
        let expected2 = 10.0 + overlap * 1.0 / 9.0;
        assert_relative_eq!(report.position1, expected1, epsilon = EPSILON);
        assert_relative_eq!(report.position2, expected2, epsilon = EPSILON);
        // Exactly touching afterwards
        assert_relative_eq!(report.position2 - report.position1, 1.5, epsilon = EPSILON);
    }

    #[test]
    fn test_collision_correction_equal_masses_symmetric() {
        let mut a = Body { position: -0.4, ..Body::new(1.0, 0.5) };
        let mut b = Body { position: 0.4, ..Body::new(1.0, 0.5) };
        let manifold = collision::check_sphere_sphere(&a, &b).unwrap();
        apply_positional_correction(&mut a, &mut b, &manifold);
        assert_relative_eq!(a.position, -0.5, epsilon = EPSILON);
        assert_relative_eq!(b.position, 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_collided_moves_at_final_velocities() {
        let params = reference_params();
        let mut sim = Simulation::new();
        sim.start(params).unwrap();
        step_until(&mut sim, SimulationPhase::Collided, 10_000);

        let [a, b] = *sim.bodies().unwrap();
        let report = sim.step(0.02);
        assert_eq!(report.phase, SimulationPhase::Collided);
        let dt = 0.02 * 3.0;
        assert_relative_eq!(report.position1, a.position - 1.48 * dt, epsilon = EPSILON);
        assert_relative_eq!(report.position2, b.position + 3.32 * dt, epsilon = EPSILON);
    }

    #[test]
    fn test_finished_exactly_past_boundary() {
        let mut sim = Simulation::new();
        sim.start(reference_params()).unwrap();
        step_until(&mut sim, SimulationPhase::Collided, 10_000);

        loop {
            let report = sim.step(FRAME);
            let outside = report.position1.abs() > 25.0 || report.position2.abs() > 25.0;
            assert_eq!(report.phase == SimulationPhase::Finished, outside, "{report:?}");
            if outside {
                break;
            }
        }

        let frozen = *sim.bodies().unwrap();
        for _ in 0..5 {
            let report = sim.step(FRAME);
            assert_eq!(report.phase, SimulationPhase::Finished);
            assert!(report.event.is_none());
        }
        assert_eq!(*sim.bodies().unwrap(), frozen);
    }

    #[test]
    fn test_chasing_bodies_collide() {
        // Both move right; body 1 catches up
        let mut sim = Simulation::new();
        sim.start(CollisionParameters::new(1.0, 6.0, 1.0, 2.0, 1.0)).unwrap();
        let reports = step_until(&mut sim, SimulationPhase::Collided, 10_000);
        assert!(matches!(reports.last().unwrap().event, Some(StepEvent::Collision { .. })));
    }

    #[test]
    fn test_inelastic_rest_stays_collided() {
        // Equal and opposite momenta with e = 0: both bodies stop dead at contact
        let mut sim = Simulation::new();
        let handle = sim.start(CollisionParameters::new(1.0, 1.0, 1.0, -1.0, 0.0)).unwrap();
        assert_eq!(handle.final_velocities, FinalVelocities { v1f: 0.0, v2f: 0.0 });

        step_until(&mut sim, SimulationPhase::Collided, 10_000);
        let at_rest = *sim.bodies().unwrap();
        for _ in 0..100 {
            assert_eq!(sim.step(FRAME).phase, SimulationPhase::Collided);
        }
        assert_eq!(*sim.bodies().unwrap(), at_rest);
    }

    #[test]
    fn test_custom_config() {
        let config = SimulationConfig {
            start_offset: 4.0,
            boundary: 6.0,
            speed_multiplier: 1.0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::with_config(config);
        sim.start(CollisionParameters::new(1.0, 2.0, 1.0, -2.0, 1.0)).unwrap();

        let report = sim.step(0.01);
        assert_relative_eq!(report.position1, -4.0 + 0.02, epsilon = EPSILON);
        assert_relative_eq!(report.position2, 4.0 - 0.02, epsilon = EPSILON);

        step_until(&mut sim, SimulationPhase::Finished, 100_000);
        let [a, b] = sim.bodies().unwrap();
        assert!(a.position.abs() > 6.0 || b.position.abs() > 6.0);
        assert!(a.position.abs() <= 25.0 && b.position.abs() <= 25.0);
    }

    #[test]
    fn test_status_text() {
        let mut sim = Simulation::new();
        assert_eq!(sim.status_text(), "Simulation ready");

        sim.start(reference_params()).unwrap();
        assert_eq!(sim.status_text(), "Collision starting...");

        step_until(&mut sim, SimulationPhase::Collided, 10_000);
        assert_eq!(sim.status_text(), "COLLISION! Final momentum: 7.00 kg.m/s");

        step_until(&mut sim, SimulationPhase::Finished, 10_000);
        assert_eq!(sim.status_text(), "Simulation finished.");
    }

    #[test]
    fn test_phase_helpers() {
        assert!(!SimulationPhase::Idle.is_running());
        assert!(SimulationPhase::Approaching.is_running());
        assert!(SimulationPhase::Collided.is_running());
        assert!(!SimulationPhase::Finished.is_running());
        assert!(!SimulationPhase::Approaching.has_collided());
        assert!(SimulationPhase::Collided.has_collided());
        assert!(SimulationPhase::Finished.has_collided());
    }
}
