//! Driving simulation: a small frame-based physics model that turns a
//! throttle position into RPM, load, gear changes and pops.
//!
//! The model is tuned for 60 ticks per second. Speed chases the throttle
//! target at fixed accelerate/engine-brake rates, RPM follows road speed
//! through the gear ratio, and the gearbox shifts itself.

use rugido_core::XorShift32;
use rugido_engine::{BikeConfig, ExhaustKind, REDLINE_RPM};

/// Simulation tick rate in Hz.
pub const TICK_RATE: f32 = 60.0;

const IDLE_RPM: f32 = 1000.0;
const ACCEL_KMH_PER_TICK: f32 = 0.5;
const DECEL_KMH_PER_TICK: f32 = 0.8;
const SHIFT_UP_RPM: f32 = 11_000.0;
const SHIFT_DOWN_RPM: f32 = 4_000.0;
const BACKFIRE_RPM: f32 = 5_000.0;

/// What happened during one tick, ready to feed the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimFrame {
    /// Engine speed after this tick.
    pub rpm: f32,
    /// Throttle-derived load, 0 to 1.
    pub load: f32,
    /// Road speed in km/h.
    pub speed: f32,
    /// Current gear, 0 is neutral.
    pub gear: usize,
    /// A gear change that should click.
    pub shifted: bool,
    /// An overrun pop should fire.
    pub backfire: bool,
}

/// Frame-based bike physics with an automatic gearbox.
pub struct Simulation {
    bike: BikeConfig,
    exhaust: ExhaustKind,
    throttle: f32,
    prev_throttle: f32,
    speed: f32,
    gear: usize,
    rpm: f32,
    rng: XorShift32,
}

impl Simulation {
    /// New simulation at a standstill in neutral.
    #[must_use]
    pub fn new(bike: BikeConfig, exhaust: ExhaustKind, seed: u32) -> Self {
        Self {
            bike,
            exhaust,
            throttle: 0.0,
            prev_throttle: 0.0,
            speed: 0.0,
            gear: 0,
            rpm: IDLE_RPM,
            rng: XorShift32::new(seed),
        }
    }

    /// Set the throttle position, clamped to 0..1.
    pub fn set_throttle(&mut self, throttle: f32) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    /// Advance one 60 Hz tick.
    pub fn step(&mut self) -> SimFrame {
        // Speed chases the throttle target through the engaged gear. In
        // neutral nothing drives the rear wheel, so the bike only coasts.
        // Engine braking is stronger than acceleration, which is what
        // makes overrun pops possible.
        let target_speed = if self.gear == 0 {
            0.0
        } else {
            self.throttle * self.bike.max_speed(self.gear)
        };
        if self.speed < target_speed {
            self.speed += ACCEL_KMH_PER_TICK;
        } else if self.speed > target_speed {
            self.speed -= DECEL_KMH_PER_TICK;
        }
        self.speed = self.speed.max(0.0);

        let load = self.throttle;

        // Overrun pops: a sudden throttle lift at high revs. Louder pipes
        // pop far more often.
        let mut backfire = false;
        if self.prev_throttle - self.throttle > 0.1 && self.rpm > BACKFIRE_RPM {
            let chance = match self.exhaust {
                ExhaustKind::ScProject => 0.08,
                ExhaustKind::ShortPipe => 0.1,
                _ => 0.02,
            };
            backfire = self.rng.next_unit() < chance;
        }
        self.prev_throttle = self.throttle;

        let shifted = self.auto_shift();
        self.rpm = self.calculate_rpm();

        SimFrame {
            rpm: self.rpm,
            load,
            speed: self.speed,
            gear: self.gear,
            shifted,
            backfire,
        }
    }

    /// Automatic gearbox. Returns whether an audible shift happened
    /// (neutral drops are silent, clutching into first is not).
    fn auto_shift(&mut self) -> bool {
        let previous = self.gear;
        if self.gear < self.bike.top_gear() && self.gear > 0 && self.rpm > SHIFT_UP_RPM {
            self.gear += 1;
        } else if self.gear > 1 && self.rpm < SHIFT_DOWN_RPM && self.speed > 10.0 {
            self.gear -= 1;
        } else if self.gear == 0 && self.throttle > 0.1 {
            self.gear = 1;
        } else if self.speed < 2.0 && self.throttle == 0.0 {
            self.gear = 0;
        }
        self.gear != previous && self.gear != 0
    }

    fn calculate_rpm(&mut self) -> f32 {
        let idle = IDLE_RPM + self.rng.next_unit() * 50.0;

        if self.gear == 0 {
            // Free-revving in neutral.
            return idle + self.throttle * 10_000.0;
        }

        let max_speed = self.bike.max_speed(self.gear);
        let rpm = ((self.speed / max_speed) * REDLINE_RPM).max(idle);

        if rpm > REDLINE_RPM {
            // Rev limiter bounce.
            if self.rng.next_unit() > 0.5 {
                return REDLINE_RPM - 500.0;
            }
            return REDLINE_RPM;
        }

        // Idle grit, scaled by how lumpy the engine is.
        rpm + self.rng.next_unit() * self.bike.roughness * 20.0
    }

    /// Current road speed in km/h.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current gear, 0 is neutral.
    #[must_use]
    pub fn gear(&self) -> usize {
        self.gear
    }
}

/// Scripted throttle for demo rides: idle, pull away hard, chop the
/// throttle for pops, cruise, then wind down. Repeats every 24 seconds.
#[must_use]
pub fn demo_throttle(elapsed_secs: f32) -> f32 {
    match elapsed_secs % 24.0 {
        t if t < 2.0 => 0.0,
        t if t < 3.0 => 0.3,
        t if t < 10.0 => 1.0,
        t if t < 12.0 => 0.0,
        t if t < 19.0 => 0.6,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rugido_engine::bike_by_id;

    fn sim(exhaust: ExhaustKind) -> Simulation {
        Simulation::new(*bike_by_id("s1000").unwrap(), exhaust, 0xdead_beef)
    }

    #[test]
    fn pulls_away_and_shifts_up() {
        let mut sim = sim(ExhaustKind::Stock);
        sim.set_throttle(1.0);

        let mut top_gear_seen = 0;
        for _ in 0..(TICK_RATE as usize * 120) {
            let frame = sim.step();
            top_gear_seen = top_gear_seen.max(frame.gear);
            assert!(frame.rpm >= IDLE_RPM);
            // Idle grit can peek just past the limiter.
            assert!(frame.rpm <= REDLINE_RPM + 50.0);
        }
        assert!(top_gear_seen >= 2, "wide-open throttle should climb gears");
    }

    #[test]
    fn first_gear_engages_on_throttle() {
        let mut sim = sim(ExhaustKind::Stock);
        assert_eq!(sim.gear(), 0);
        sim.set_throttle(0.5);
        let frame = sim.step();
        assert_eq!(frame.gear, 1);
        assert!(frame.shifted, "clutching into first clicks");
    }

    #[test]
    fn drops_to_neutral_when_stopped() {
        let mut sim = sim(ExhaustKind::Stock);
        sim.set_throttle(0.3);
        for _ in 0..120 {
            sim.step();
        }
        sim.set_throttle(0.0);
        for _ in 0..(TICK_RATE as usize * 60) {
            sim.step();
        }
        assert_eq!(sim.gear(), 0);
        assert!(sim.speed() < 2.0);
    }

    #[test]
    fn neutral_throttle_does_not_move_the_bike() {
        let mut sim = sim(ExhaustKind::Stock);
        // Below the clutch engagement point the gearbox stays in neutral.
        sim.set_throttle(0.05);
        for _ in 0..(TICK_RATE as usize * 10) {
            let frame = sim.step();
            assert_eq!(frame.gear, 0);
        }
        assert_eq!(sim.speed(), 0.0, "revving in neutral must not add speed");
    }

    #[test]
    fn loud_pipes_pop_on_overrun() {
        let mut sim = sim(ExhaustKind::ShortPipe);
        let mut pops = 0;

        // Repeatedly build revs then chop the throttle.
        for _ in 0..200 {
            sim.set_throttle(1.0);
            for _ in 0..(TICK_RATE as usize * 5) {
                sim.step();
            }
            sim.set_throttle(0.0);
            for _ in 0..30 {
                if sim.step().backfire {
                    pops += 1;
                }
            }
        }
        assert!(pops > 0, "a short pipe must pop on overrun eventually");
    }

    #[test]
    fn neutral_revs_follow_throttle() {
        let mut sim = sim(ExhaustKind::Stock);
        // Poke the throttle below the clutch engagement point.
        sim.set_throttle(0.05);
        let frame = sim.step();
        assert_eq!(frame.gear, 0);
        assert!(frame.rpm > IDLE_RPM && frame.rpm < IDLE_RPM + 1_000.0);
    }
}
