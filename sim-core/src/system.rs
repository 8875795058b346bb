//! The particle system: owns the bodies and runs the simulation step.

use log::{info, warn};

use crate::{
    accel_buffer::AccelBuffer,
    config::SimConfig,
    effector::Effector,
    error::SimError,
    frame_timer::FrameTimer,
    particle::{Particle, distance_squared},
    phases::{self, DynEffector},
    render::{CircleDraw, RenderSink, RenderStyle, TriangleDraw},
    sampler::RandomSampler,
    types::ParticleIndex,
};

/// Alpha used for triangles in [`RenderStyle::Triangle`].
const TRIANGLE_ALPHA: f64 = 0.3;

/// Owns a population of particles and advances it step by step.
///
/// The particle collection is unordered: devour resolution sorts it and
/// removal swaps elements around. Effectors run in the order they were
/// added.
///
/// The system is either running or paused. While paused,
/// [`ParticleSystem::simulate`] changes nothing at all. Rendering and
/// input happen between steps, driven by the host.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    effectors: Vec<DynEffector>,
    cfg: SimConfig,
    sampler: RandomSampler,

    acc: AccelBuffer,
    eaten: Vec<ParticleIndex>,

    paused: bool,
    /// Skips the devour phase.
    pub disable_devour: bool,
    /// Skips the gravitation phase; accelerations keep their last value.
    pub disable_gravitation: bool,

    render_style: RenderStyle,
    frame_timer: FrameTimer,
    steps: u64,
}

impl ParticleSystem {
    /// Creates an empty, running system.
    ///
    /// The scenario sampler is seeded from `cfg.seed` when set, otherwise
    /// from OS entropy.
    pub fn new(cfg: SimConfig) -> Result<Self, SimError> {
        let sampler = match cfg.seed {
            Some(seed) => RandomSampler::seeded(seed),
            None => RandomSampler::from_entropy(),
        };
        Self::with_sampler(cfg, sampler)
    }

    /// Creates an empty, running system that seeds scenarios from `sampler`.
    pub fn with_sampler(cfg: SimConfig, sampler: RandomSampler) -> Result<Self, SimError> {
        cfg.validate()?;
        Ok(Self {
            particles: Vec::new(),
            effectors: Vec::new(),
            cfg,
            sampler,
            acc: AccelBuffer::default(),
            eaten: Vec::new(),
            paused: false,
            disable_devour: false,
            disable_gravitation: false,
            render_style: RenderStyle::default(),
            frame_timer: FrameTimer::new(),
            steps: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Sum of all particle masses.
    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(Particle::mass).sum()
    }

    /// Number of steps actually simulated (paused calls don't count).
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Registers an effector; it runs after those already registered.
    pub fn add_effector<E>(&mut self, effector: E)
    where
        E: Effector + Send + Sync + 'static,
    {
        self.effectors.push(Box::new(effector));
    }

    /// Builder form of [`ParticleSystem::add_effector`].
    pub fn with_effector<E>(mut self, effector: E) -> Self
    where
        E: Effector + Send + Sync + 'static,
    {
        self.add_effector(effector);
        self
    }

    pub fn effector_count(&self) -> usize {
        self.effectors.len()
    }

    pub fn clear_effectors(&mut self) {
        self.effectors.clear();
    }

    /// Adds one body.
    ///
    /// The body's radius is recomputed with the configured exponent and its
    /// off-screen frame is set to the configured canvas. A body
    /// with a non-positive mass or a non-finite position or velocity is
    /// rejected and the system is left unchanged.
    pub fn emit(&mut self, mut particle: Particle) -> Result<(), SimError> {
        if let Err(e) = particle.validate() {
            warn!("rejected particle: {e}");
            return Err(e);
        }
        particle.set_radius_exponent(self.cfg.radius_exponent);
        particle.bounds_width = self.cfg.width;
        particle.bounds_height = self.cfg.height;
        self.particles.push(particle);
        Ok(())
    }

    /// Seeds the orbit-disk scenario: an invisible, fixed anchor of
    /// `center_mass` at the canvas centre plus `count` orbiting bodies.
    ///
    /// See [`crate::scenario::OrbitScenario::generate`] for the layout.
    pub fn emit_scenario(&mut self, count: usize, center_mass: f64) -> Result<(), SimError> {
        let bodies = self.cfg.scenario.generate(
            self.cfg.width,
            self.cfg.height,
            count,
            center_mass,
            &mut self.sampler,
        );

        // Validate the whole batch first so a bad centre mass adds nothing.
        for b in &bodies {
            b.validate()?;
        }
        for b in bodies {
            self.emit(b)?;
        }

        info!("seeded orbit scenario: {count} bodies around a central mass of {center_mass}");
        Ok(())
    }

    /// Removes the particle at `index` if it is dead; otherwise a no-op.
    pub fn remove(&mut self, index: ParticleIndex) -> Option<Particle> {
        phases::remove_dead(&mut self.particles, index)
    }

    /// Drops every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advances the simulation by `dt`.
    ///
    /// Does nothing while paused. Otherwise runs, in order: effectors,
    /// devour resolution (unless `disable_devour`), gravitation (unless
    /// `disable_gravitation`) and integration. See [`crate::phases`].
    pub fn simulate(&mut self, dt: f64) {
        if self.paused {
            return;
        }

        phases::effector_phase(&mut self.particles, &self.effectors);

        if !self.disable_devour {
            phases::devour_phase(&mut self.particles, self.cfg.roche_coefficient, &mut self.eaten);
        }

        if !self.disable_gravitation {
            phases::gravitation_phase(
                &mut self.particles,
                self.cfg.gravitational_constant,
                self.cfg.min_distance_squared,
                &mut self.acc,
            );
        }

        phases::integration_phase(&mut self.particles, dt);
        self.steps += 1;
    }

    pub fn render_style(&self) -> RenderStyle {
        self.render_style
    }

    pub fn set_render_style(&mut self, style: RenderStyle) {
        self.render_style = style;
    }

    /// Cycles to the next [`RenderStyle`].
    pub fn switch_render_style(&mut self) {
        self.render_style = self.render_style.next();
    }

    /// Sends draw requests for the current state to `sink`.
    ///
    /// Read-only: no simulation state changes.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        match self.render_style {
            RenderStyle::PointCloud => self.render_points(sink),
            RenderStyle::Triangle => self.render_triangles(sink),
        }
    }

    fn render_points<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for p in &self.particles {
            if !p.visible || p.out_of_screen() {
                continue;
            }
            sink.fill_circle(&CircleDraw {
                center: p.position,
                radius: p.radius(),
                fill: p.color,
                alpha: 1.0,
            });
        }
    }

    /// Greedy triangulation: each unused particle is joined to its two
    /// nearest unused neighbours, and all three are then marked used.
    fn render_triangles<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        let visible: Vec<&Particle> = self.particles.iter().filter(|p| p.visible).collect();
        let mut used = vec![false; visible.len()];

        for i in 0..visible.len() {
            if used[i] {
                continue;
            }
            used[i] = true;

            let p = visible[i];
            let mut candidates: Vec<(usize, f64)> = (0..visible.len())
                .filter(|&j| !used[j])
                .map(|j| (j, distance_squared(p, visible[j])))
                .collect();
            if candidates.len() < 2 {
                continue;
            }
            candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

            let (a, b) = (candidates[0].0, candidates[1].0);
            used[a] = true;
            used[b] = true;

            sink.fill_triangle(&TriangleDraw {
                vertices: [p.position, visible[a].position, visible[b].position],
                fill: p.color,
                alpha: TRIANGLE_ALPHA,
            });
        }
    }

    /// Records a rendered frame at the host's wall-clock time.
    pub fn record_frame(&mut self, now_ms: f64) {
        self.frame_timer.record(now_ms);
    }

    /// Average interval between recorded frames, in milliseconds.
    pub fn render_interval(&self) -> f64 {
        self.frame_timer.interval()
    }

    pub fn frame_timer(&self) -> &FrameTimer {
        &self.frame_timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Color, effector::ChamberBox, render::RecordingSink, types::Vector2};

    fn system() -> ParticleSystem {
        ParticleSystem::new(SimConfig::default().with_seed(1)).unwrap()
    }

    fn body(x: f64, y: f64, mass: f64) -> Particle {
        Particle::new(Vector2::new(x, y), Vector2::ZERO, Color::WHITE, mass)
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut cfg = SimConfig::default();
        cfg.roche_coefficient = -1.0;
        assert!(ParticleSystem::new(cfg).is_err());
    }

    #[test]
    fn emit_validates_and_appends() {
        let mut sys = system();
        assert!(sys.emit(body(1.0, 1.0, 5.0)).is_ok());
        assert_eq!(sys.emit(body(1.0, 1.0, 0.0)), Err(SimError::InvalidMass(0.0)));
        assert!(sys.emit(body(f64::INFINITY, 1.0, 5.0)).is_err());
        assert_eq!(sys.len(), 1);
    }

    #[test]
    fn emit_applies_configured_radius_exponent() {
        let mut cfg = SimConfig::default();
        cfg.radius_exponent = 0.5;
        let mut sys = ParticleSystem::new(cfg).unwrap();
        sys.emit(body(0.0, 0.0, 16.0)).unwrap();
        assert_eq!(sys.particles()[0].radius(), 4.0);
    }

    #[test]
    fn emit_applies_configured_canvas() {
        let cfg = SimConfig::default().with_canvas(2000.0, 2000.0);
        let mut sys = ParticleSystem::new(cfg).unwrap();
        sys.emit(body(1500.0, 100.0, 1.0)).unwrap();

        let p = &sys.particles()[0];
        assert_eq!((p.bounds_width, p.bounds_height), (2000.0, 2000.0));

        let mut sink = RecordingSink::default();
        sys.render(&mut sink);
        assert_eq!(sink.circles.len(), 1);
        assert_eq!(sink.circles[0].center, Vector2::new(1500.0, 100.0));
    }

    #[test]
    fn paused_simulate_changes_nothing() {
        let mut sys = system().with_effector(ChamberBox::new(0.0, 0.0, 10.0, 10.0));
        let mut p = body(9.5, 5.0, 1.0);
        p.velocity = Vector2::new(3.0, 0.0);
        sys.emit(p).unwrap();
        sys.emit(body(9.6, 5.0, 0.5)).unwrap();

        sys.toggle_pause();
        sys.simulate(1.0);

        assert!(sys.is_paused());
        assert_eq!(sys.len(), 2);
        assert_eq!(sys.steps(), 0);
        let first = &sys.particles()[0];
        assert_eq!(first.position, Vector2::new(9.5, 5.0));
        assert_eq!(first.velocity, Vector2::new(3.0, 0.0));
    }

    #[test]
    fn flags_skip_devour_and_gravity() {
        let mut sys = system();
        sys.disable_devour = true;
        sys.disable_gravitation = true;
        sys.emit(body(0.0, 0.0, 100.0)).unwrap();
        sys.emit(body(0.1, 0.0, 1.0)).unwrap();

        sys.simulate(0.1);

        assert_eq!(sys.len(), 2);
        assert!(sys.particles().iter().all(|p| p.acceleration == Vector2::ZERO));
    }

    #[test]
    fn remove_only_takes_dead_particles() {
        let mut sys = system();
        sys.emit(body(0.0, 0.0, 1.0)).unwrap();
        assert!(sys.remove(0).is_none());
        assert!(sys.remove(3).is_none());
        assert_eq!(sys.len(), 1);
    }

    #[test]
    fn point_cloud_skips_invisible_and_off_screen() {
        let mut sys = system();
        sys.emit(body(100.0, 100.0, 1.0)).unwrap();
        sys.emit(body(-50.0, 100.0, 1.0)).unwrap();
        let mut hidden = body(200.0, 200.0, 1.0);
        hidden.visible = false;
        sys.emit(hidden).unwrap();

        let mut sink = RecordingSink::default();
        sys.render(&mut sink);

        assert_eq!(sink.circles.len(), 1);
        let c = sink.circles[0];
        assert_eq!(c.center, Vector2::new(100.0, 100.0));
        assert_eq!(c.alpha, 1.0);
        assert!(sink.triangles.is_empty());
    }

    #[test]
    fn triangle_style_joins_nearest_neighbours() {
        let mut sys = system();
        let points = [
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (50.0, 50.0),
            (51.0, 50.0),
            (50.0, 52.0),
        ];
        for (x, y) in points {
            sys.emit(body(x, y, 1.0)).unwrap();
        }
        sys.switch_render_style();
        assert_eq!(sys.render_style(), RenderStyle::Triangle);

        let mut sink = RecordingSink::default();
        sys.render(&mut sink);

        assert_eq!(sink.triangles.len(), 2);
        assert!(sink.circles.is_empty());
        let t = sink.triangles[0];
        assert_eq!(t.vertices[0], Vector2::new(0.0, 0.0));
        assert!(t.vertices.contains(&Vector2::new(1.0, 0.0)));
        assert!(t.vertices.contains(&Vector2::new(0.0, 1.0)));
        assert_eq!(t.alpha, TRIANGLE_ALPHA);

        sys.switch_render_style();
        assert_eq!(sys.render_style(), RenderStyle::PointCloud);
    }

    #[test]
    fn render_does_not_mutate() {
        let mut sys = system();
        sys.emit_scenario(20, 1e5).unwrap();
        let before: Vec<Vector2> = sys.particles().iter().map(|p| p.position).collect();

        let mut sink = RecordingSink::default();
        sys.render(&mut sink);
        sys.switch_render_style();
        sys.render(&mut sink);

        let after: Vec<Vector2> = sys.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        assert_eq!(sys.len(), 21);
    }

    #[test]
    fn emit_scenario_rejects_bad_center_mass() {
        let mut sys = system();
        assert!(sys.emit_scenario(10, -5.0).is_err());
        assert!(sys.is_empty());
    }

    #[test]
    fn frame_recording_is_observational() {
        let mut sys = system();
        sys.record_frame(0.0);
        sys.record_frame(20.0);
        sys.record_frame(40.0);
        assert!((sys.render_interval() - 20.0).abs() < 1e-12);
        assert_eq!(sys.steps(), 0);
    }
}
