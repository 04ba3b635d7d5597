//! Decorative particle background.
//!
//! [`ParticleField`] is plain state: fifteen drifting dots in a 100×100
//! coordinate space that wraps at the edges. [`Animation`] moves a field onto
//! its own tokio task, steps it on a fixed interval and publishes each frame
//! through a `watch` channel. Dropping the `Animation` aborts the task.
//!
//! Nothing here touches the review session.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub const PARTICLE_COUNT: usize = 15;
pub const STEP_PERIOD: Duration = Duration::from_millis(100);

/// Side length of the coordinate space. Positions are percentages of the
/// drawing area.
const SPAN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Nominal diameter, 20..80. Picks the glyph.
    pub size: f32,
    /// Index into the theme's particle palette.
    pub tint: usize,
    pub opacity: f32,
    dx: f32,
    dy: f32,
}

impl Particle {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..SPAN),
            y: rng.gen_range(0.0..SPAN),
            size: rng.gen_range(20.0..80.0),
            tint: rng.gen_range(0..3),
            opacity: rng.gen_range(0.1..0.4),
            dx: rng.gen_range(-0.25..0.25),
            dy: rng.gen_range(-0.25..0.25),
        }
    }

    fn step(&mut self) {
        self.x = wrap(self.x + self.dx);
        self.y = wrap(self.y + self.dy);
    }

    pub fn glyph(&self) -> char {
        match self.size {
            s if s < 40.0 => '·',
            s if s < 60.0 => '•',
            _ => '●',
        }
    }
}

/// Wraps into `[0, SPAN)`. `rem_euclid` can round up to `SPAN` for tiny
/// negative inputs, hence the second check.
fn wrap(v: f32) -> f32 {
    let w = v.rem_euclid(SPAN);
    if w >= SPAN || !w.is_finite() {
        0.0
    } else {
        w
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        Self { particles: (0..count).map(|_| Particle::random(rng)).collect() }
    }

    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.step();
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Handle to a running particle animation.
pub struct Animation {
    handle: JoinHandle<()>,
    frames: watch::Receiver<Vec<Particle>>,
}

impl Animation {
    /// Spawns the stepping task. Must be called inside a tokio runtime.
    pub fn start(mut field: ParticleField, period: Duration) -> Self {
        let (tx, frames) = watch::channel(field.particles().to_vec());
        let count = field.particles().len();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                field.step();
                if tx.send(field.particles().to_vec()).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(particles = count, "background animation started");
        Self { handle, frames }
    }

    /// Latest published frame.
    pub fn particles(&self) -> Vec<Particle> {
        self.frames.borrow().clone()
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn wrap_handles_both_edges() {
        assert_eq!(wrap(100.2), 100.2 - 100.0);
        assert!((wrap(-0.5) - 99.5).abs() < 1e-4);
        assert!(wrap(-1e-9) < SPAN);
    }

    #[test]
    fn field_has_requested_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::new(PARTICLE_COUNT, &mut rng);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        assert!(field.particles().iter().all(|p| p.tint < 3));
    }

    proptest! {
        #[test]
        fn positions_stay_in_range(seed in any::<u64>(), steps in 0usize..2_000) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut field = ParticleField::new(PARTICLE_COUNT, &mut rng);
            for _ in 0..steps {
                field.step();
            }
            for p in field.particles() {
                prop_assert!((0.0..SPAN).contains(&p.x), "x = {}", p.x);
                prop_assert!((0.0..SPAN).contains(&p.y), "y = {}", p.y);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn animation_publishes_frames_until_dropped() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = ParticleField::new(3, &mut rng);
        let animation = Animation::start(field.clone(), STEP_PERIOD);
        let mut frames = animation.frames.clone();
        assert_eq!(animation.particles(), field.particles());

        frames.changed().await.unwrap();
        let mut expected = field.clone();
        expected.step();
        assert_eq!(animation.particles(), expected.particles());

        drop(animation);
        // The aborted task drops its sender; changed() then reports closure.
        while frames.changed().await.is_ok() {}
    }
}
