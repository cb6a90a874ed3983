use core::f64::consts::PI;

/// Number of delay-offset samples kept for smoothing; one is recorded per
/// audio-server cycle.
pub const RING_LEN: usize = 512;

/// Proportional gain divisor.
const CATCH_FACTOR: f64 = 100_000.0;
/// Additional integral gain divisor.
const CATCH_FACTOR_2: f64 = 10_000.0;
/// Resolution of the quantized resample factor.
const CONTROL_QUANT: f64 = 10_000.0;
/// Smoothed offsets below this magnitude contribute nothing to the
/// proportional term.
const PROPORTIONAL_CLAMP: f64 = 15.0;

/// Lowest resample factor the controller will output.
pub const MIN_FACTOR: f64 = 0.25;
/// Highest resample factor the controller will output.
pub const MAX_FACTOR: f64 = 4.0;

/// PI controller for the adaptive resample factor.
///
/// Keeps the capture buffer at its target delay by nudging the factor
/// around the static rate ratio. The raw per-cycle delay offsets are
/// smoothed over a Hann-windowed ring before they reach the proportional
/// and integral terms.
pub struct RateController {
    static_factor: f64,
    mean: f64,
    integral: f64,
    ring: [f64; RING_LEN],
    window: [f64; RING_LEN],
    index: usize,
}

impl RateController {
    /// Create a controller around the static rate ratio
    /// (server rate ÷ capture rate).
    pub fn new(static_factor: f64) -> Self {
        let mut window = [0.0; RING_LEN];
        for (i, w) in window.iter_mut().enumerate() {
            *w = 0.5 * (1.0 - (2.0 * PI * i as f64 / (RING_LEN - 1) as f64).cos());
        }
        RateController {
            static_factor,
            mean: static_factor,
            integral: 0.0,
            ring: [0.0; RING_LEN],
            window,
            index: 0,
        }
    }

    /// The static rate ratio this controller centers on.
    pub fn static_factor(&self) -> f64 {
        self.static_factor
    }

    /// Rolling mean of the produced factors.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Record this cycle's delay offset (current delay minus target) and
    /// produce the resample factor for the cycle.
    pub fn update(&mut self, offset: f64) -> f64 {
        self.ring[self.index % RING_LEN] = offset;
        let mut smoothed = 0.0;
        for (i, w) in self.window.iter().enumerate() {
            smoothed += self.ring[(i + self.index + RING_LEN - 1) % RING_LEN] * w;
        }
        smoothed /= RING_LEN as f64;
        self.index += 1;

        self.integral += smoothed;
        let proportional = if smoothed.abs() < PROPORTIONAL_CLAMP {
            0.0
        } else {
            smoothed
        };
        let mut factor = self.static_factor
            - proportional / CATCH_FACTOR
            - self.integral / (CATCH_FACTOR * CATCH_FACTOR_2);
        factor = ((factor - self.mean) * CONTROL_QUANT).round() / CONTROL_QUANT + self.mean;
        factor = factor.clamp(MIN_FACTOR, MAX_FACTOR);
        self.mean = 0.9999 * self.mean + 0.0001 * factor;
        factor
    }

    /// Forget accumulated history after a hard delay correction. The
    /// integral is preloaded so the next factor comes out at the rolling
    /// mean instead of jumping back to the static ratio.
    pub fn reset(&mut self) {
        self.integral = -(self.mean - self.static_factor) * CATCH_FACTOR * CATCH_FACTOR_2;
        self.ring = [0.0; RING_LEN];
    }
}

impl core::fmt::Debug for RateController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RateController")
            .field("static_factor", &self.static_factor)
            .field("mean", &self.mean)
            .field("integral", &self.integral)
            .field("index", &self.index)
            .finish()
    }
}
