/// Configuration for spring physics animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Mass of the spring
    pub mass: f32,
    /// Stiffness of the spring
    pub stiffness: f32,
    /// Damping coefficient
    pub damping: f32,
}

impl SpringConfig {
    /// Low-bounce spring used for shade settling: bounciness 2, speed 12
    /// (see [`SpringConfig::from_bounciness`]). Damping ratio is about 0.91.
    pub const SHADE: Self = Self {
        mass: 1.0,
        stiffness: 342.1,
        damping: 33.63,
    };

    /// Critically damped spring, no overshoot at rest velocity.
    pub const CRITICAL: Self = Self {
        mass: 1.0,
        stiffness: 300.0,
        damping: 34.641,
    };

    /// Noticeably bouncy spring
    pub const BOUNCY: Self = Self {
        mass: 1.0,
        stiffness: 200.0,
        damping: 10.0,
    };

    /// Derive spring constants from designer-facing "bounciness" and "speed"
    /// values (both nominally 0..20, bounciness 0 = no overshoot).
    ///
    /// Speed maps linearly onto a tension range, bounciness interpolates the
    /// friction between the no-bounce friction for that tension and almost
    /// none; both are then converted from that unit system into
    /// stiffness/damping for a unit mass.
    pub fn from_bounciness(bounciness: f32, speed: f32) -> Self {
        let b = project_normal(normalize(bounciness / 1.7, 0.0, 20.0), 0.0, 0.8);
        let s = normalize(speed / 1.7, 0.0, 20.0);

        let tension = project_normal(s, 0.5, 200.0);
        let friction = quadratic_out_mix(b, no_bounce_friction(tension), 0.01);

        Self {
            mass: 1.0,
            stiffness: (tension - 30.0) * 3.62 + 194.0,
            damping: (friction - 8.0) * 3.0 + 25.0,
        }
    }

    /// `damping / (2 * sqrt(stiffness * mass))`; below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Undamped angular frequency in radians per second.
    pub fn natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    pub fn is_valid(&self) -> bool {
        [self.mass, self.stiffness, self.damping]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::SHADE
    }
}

fn normalize(value: f32, start: f32, end: f32) -> f32 {
    (value - start) / (end - start)
}

fn project_normal(n: f32, start: f32, end: f32) -> f32 {
    start + n * (end - start)
}

fn quadratic_out_mix(t: f32, start: f32, end: f32) -> f32 {
    let eased = 2.0 * t - t * t;
    start * (1.0 - eased) + end * eased
}

/// Friction that just avoids overshoot for a given tension (piecewise fit).
fn no_bounce_friction(tension: f32) -> f32 {
    let t = tension;
    if t <= 18.0 {
        0.0007 * t.powi(3) - 0.031 * t.powi(2) + 0.64 * t + 1.28
    } else if t <= 44.0 {
        0.000044 * t.powi(3) - 0.006 * t.powi(2) + 0.36 * t + 2.0
    } else {
        0.000_000_45 * t.powi(3) - 0.000332 * t.powi(2) + 0.1078 * t + 5.84
    }
}

/// State for spring physics simulation toward an absolute target.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringState {
    /// Current position
    pub position: f32,
    /// Current velocity in units per second
    pub velocity: f32,
    /// Rest position
    pub target: f32,
}

impl SpringState {
    pub fn new(position: f32, velocity: f32, target: f32) -> Self {
        Self {
            position,
            velocity,
            target,
        }
    }

    /// Advance the simulation by `dt_secs` and return the new position.
    ///
    /// Uses the closed-form solution of the damped harmonic oscillator from
    /// the current state, so the result does not depend on how the interval
    /// is subdivided and stays stable for long frames.
    pub fn step(&mut self, dt_secs: f32, config: &SpringConfig) -> f32 {
        if dt_secs <= 0.0 {
            return self.position;
        }

        let (x, v) = oscillate(
            self.position - self.target,
            self.velocity,
            dt_secs,
            config,
        );
        self.position = self.target + x;
        self.velocity = v;

        self.position
    }

    /// Check if the spring has come to rest near its target.
    pub fn is_settled(&self, displacement: f32, velocity: f32) -> bool {
        (self.position - self.target).abs() < displacement && self.velocity.abs() < velocity
    }
}

/// Displacement and velocity after `t` seconds, starting from `(x0, v0)`.
fn oscillate(x0: f32, v0: f32, t: f32, config: &SpringConfig) -> (f32, f32) {
    let omega = config.natural_frequency();
    let zeta = config.damping_ratio();

    if (zeta - 1.0).abs() < 1e-4 {
        let b = v0 + omega * x0;
        let decay = (-omega * t).exp();
        let x = decay * (x0 + b * t);
        let v = decay * (b - omega * (x0 + b * t));
        (x, v)
    } else if zeta < 1.0 {
        let alpha = zeta * omega;
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let b = (v0 + alpha * x0) / omega_d;
        let decay = (-alpha * t).exp();
        let (sin, cos) = (omega_d * t).sin_cos();
        let x = decay * (x0 * cos + b * sin);
        let v = decay * (v0 * cos - (alpha * b + x0 * omega_d) * sin);
        (x, v)
    } else {
        let root = omega * (zeta * zeta - 1.0).sqrt();
        let r1 = -zeta * omega + root;
        let r2 = -zeta * omega - root;
        let c1 = (v0 - r2 * x0) / (r1 - r2);
        let c2 = x0 - c1;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
    }
}
