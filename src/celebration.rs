use std::time::{Duration, Instant};

use rand::{seq::SliceRandom, Rng};

const GRAVITY: f64 = 12.0;
const SPARK_COUNT: usize = 30;
const GLYPHS: [char; 6] = ['✨', '⭐', '💫', '🌟', '*', '+'];

/// How long the burst stays on screen after a personal best
pub const CELEBRATION_DURATION: Duration = Duration::from_millis(2500);

/// A single spark thrown out of the target box
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub glyph: char,
    pub color_index: usize,
    pub age: f64,
    pub ttl: f64,
}

impl Spark {
    fn launch<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-7.0..-2.0),
            glyph: *GLYPHS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            ttl: rng.gen_range(1.2..2.5),
        }
    }

    /// Advance by `dt` seconds; false once the spark burned out
    fn advance(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.ttl
    }

    /// 1.0 when fresh, 0.0 when gone
    pub fn brightness(&self) -> f64 {
        (1.0 - self.age / self.ttl).clamp(0.0, 1.0)
    }
}

/// Spark burst shown on a new personal best
#[derive(Debug, Default)]
pub struct Celebration {
    pub sparks: Vec<Spark>,
    started_at: Option<Instant>,
    last_update: Option<Instant>,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Throw sparks from the middle of a `width` x `height` area
    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        let mut rng = rand::thread_rng();
        self.width = width as f64;
        self.height = height as f64;
        self.started_at = Some(now);
        self.last_update = Some(now);

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.sparks = (0..SPARK_COUNT)
            .map(|_| Spark::launch(cx, cy, &mut rng))
            .collect();
    }

    pub fn update(&mut self, now: Instant) {
        let (Some(started), Some(last)) = (self.started_at, self.last_update) else {
            return;
        };
        if now.saturating_duration_since(started) >= CELEBRATION_DURATION {
            self.stop();
            return;
        }

        let dt = now.saturating_duration_since(last).as_secs_f64();
        self.last_update = Some(now);

        let (width, height) = (self.width, self.height);
        self.sparks.retain_mut(|s| {
            let alive = s.advance(dt);
            let inside = s.x >= 0.0 && s.x < width && s.y < height;
            alive && inside
        });
    }

    pub fn stop(&mut self) {
        self.sparks.clear();
        self.started_at = None;
        self.last_update = None;
    }
}
