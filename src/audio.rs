use crate::control::{RateController, MIN_FACTOR};
use crate::resample::Resampler;
use core::time::Duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// How often a pending stream resume is retried.
const RESUME_POLL: Duration = Duration::from_micros(100);

/// How often a shutdown flag is polled.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Scale of a signed 16-bit sample.
const SAMPLE_SCALE: f32 = 32767.0;

/// Capture-side failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError<E> {
    /// The stream overran and must be prepared again
    Xrun,
    /// The stream is suspended and must be resumed
    Suspended,
    /// Any other device failure
    Device(E),
}

/// An opened sound-card capture stream.
///
/// The seam towards the platform audio layer: signed 16-bit interleaved
/// frames, with the usual stopped/suspended stream states surfaced as
/// typed errors and "try again" conditions as [`nb::Error::WouldBlock`].
pub trait CaptureDevice {
    /// Platform error type
    type Error;

    /// Number of captured frames ready to be read.
    fn avail(&mut self) -> Result<usize, CaptureError<Self::Error>>;
    /// Read interleaved frames into `buf` (`frames × channels` samples).
    /// Returns the number of frames read.
    fn read(&mut self, buf: &mut [i16]) -> nb::Result<usize, CaptureError<Self::Error>>;
    /// Move the stream position back by `frames`; returns how far it
    /// actually moved.
    fn rewind(&mut self, frames: usize) -> Result<usize, CaptureError<Self::Error>>;
    /// Recover a stopped stream.
    fn prepare(&mut self) -> Result<(), Self::Error>;
    /// Resume a suspended stream; `WouldBlock` while the resume is still
    /// in progress.
    fn resume(&mut self) -> nb::Result<(), Self::Error>;
}

/// Audio-bridge configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Captured channels
    pub channels: usize,
    /// Sound-card capture rate in Hz
    pub source_rate: u32,
    /// Audio-server rate in Hz
    pub server_rate: u32,
    /// Capture delay the controller keeps, in frames
    pub target_delay: usize,
    /// Tolerated deviation from the target before a hard correction
    pub max_diff: usize,
    /// Largest frame count the server may request per cycle
    pub max_period: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            channels: 2,
            source_rate: 96_000,
            server_rate: 48_000,
            target_delay: 4096,
            max_diff: 512,
            max_period: 8192,
        }
    }
}

/// Termination flag shared between the main thread and the audio path,
/// polled between 250 ms sleeps.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// Create a lowered flag.
    pub fn new() -> Self {
        ShutdownFlag::default()
    }

    /// Request termination.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether termination was requested.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Block until termination is requested.
    pub fn wait(&self) {
        while !self.is_raised() {
            thread::sleep(SHUTDOWN_POLL);
        }
    }
}

/// The synchronous resampling bridge between a sound-card capture stream
/// and an audio server running on an independent clock.
///
/// `process` implements the server's period callback. All buffers are
/// sized at construction; the callback path does not allocate.
#[derive(Debug)]
pub struct AudioBridge {
    channels: usize,
    target: usize,
    max_diff: usize,
    capacity: usize,
    controller: RateController,
    resamplers: Vec<Resampler>,
    scratch: Vec<i16>,
    lanes: Vec<Vec<f32>>,
}

impl AudioBridge {
    /// Build a bridge for the given configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        let static_factor = f64::from(config.server_rate) / f64::from(config.source_rate);
        let capacity = (config.max_period as f64 / MIN_FACTOR).ceil() as usize + 2;
        AudioBridge {
            channels: config.channels,
            target: config.target_delay,
            max_diff: config.max_diff,
            capacity,
            controller: RateController::new(static_factor),
            resamplers: (0..config.channels).map(|_| Resampler::new()).collect(),
            scratch: vec![0; capacity * config.channels],
            lanes: vec![vec![0.0; capacity]; config.channels],
        }
    }

    /// The rate controller driving this bridge.
    pub fn controller(&self) -> &RateController {
        &self.controller
    }

    /// One audio-server cycle: keep the capture delay near its target,
    /// derive the resample factor and fill one period of output for every
    /// channel.
    ///
    /// `elapsed_frames` is how far the server has advanced into the
    /// current cycle. Recoverable capture faults are handled in place;
    /// only unrecoverable device errors are returned, and the process is
    /// expected to exit on them.
    pub fn process<C: CaptureDevice>(
        &mut self,
        capture: &mut C,
        outputs: &mut [&mut [f32]],
        elapsed_frames: usize,
    ) -> Result<(), CaptureError<C::Error>> {
        debug_assert_eq!(outputs.len(), self.channels);
        let frames = outputs.first().map_or(0, |lane| lane.len());
        let target = self.target as i64;

        let avail = match capture.avail() {
            Ok(avail) => avail,
            Err(error) => {
                recover(capture, error)?;
                capture.avail()?
            }
        };
        let mut delay = avail as i64 - elapsed_frames as i64;

        if delay > target + self.max_diff as i64 {
            log::debug!("capture {} frames ahead of target, skipping", delay - target);
            self.skip_frames(capture, (delay - target) as usize)?;
            self.controller.reset();
            delay = target;
        } else if delay < target - self.max_diff as i64 {
            log::debug!("capture {} frames behind target, rewinding", target - delay);
            if let Err(error) = capture.rewind((target - delay) as usize) {
                recover(capture, error)?;
            }
            self.controller.reset();
            delay = target;
        }

        let factor = self.controller.update((delay - target) as f64);
        let want = ((frames as f64 / factor).ceil() as usize + 2).min(self.capacity);
        let got = self.read_frames(capture, want)?;

        for channel in 0..self.channels {
            let lane = &mut self.lanes[channel];
            for frame in 0..got {
                lane[frame] = f32::from(self.scratch[frame * self.channels + channel]) / SAMPLE_SCALE;
            }
        }

        let mut used = 0;
        for (channel, lane_out) in outputs.iter_mut().enumerate() {
            let (consumed, produced) =
                self.resamplers[channel].process(factor, &self.lanes[channel][..got], lane_out);
            if channel == 0 {
                used = consumed;
            }
            if produced < lane_out.len() {
                log::debug!("conversion starved, padding {} frames", lane_out.len() - produced);
                lane_out[produced..].fill(0.0);
            }
        }

        if got > used {
            if let Err(error) = capture.rewind(got - used) {
                recover(capture, error)?;
            }
        }
        Ok(())
    }

    /// Read exactly `frames` frames into the scratch buffer, riding out
    /// retries and recoverable faults. Returns the frame count read.
    fn read_frames<C: CaptureDevice>(
        &mut self,
        capture: &mut C,
        frames: usize,
    ) -> Result<usize, CaptureError<C::Error>> {
        let mut got = 0;
        while got < frames {
            let buf = &mut self.scratch[got * self.channels..frames * self.channels];
            match capture.read(buf) {
                Ok(n) => got += n,
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(error)) => recover(capture, error)?,
            }
        }
        Ok(got)
    }

    /// Discard `frames` captured frames.
    fn skip_frames<C: CaptureDevice>(
        &mut self,
        capture: &mut C,
        mut frames: usize,
    ) -> Result<(), CaptureError<C::Error>> {
        while frames > 0 {
            let chunk = frames.min(self.capacity);
            self.read_frames(capture, chunk)?;
            frames -= chunk;
        }
        Ok(())
    }
}

/// Bring a faulted capture stream back: prepare after an xrun, resume
/// (polling every 100 µs) after a suspend, prepare if the resume fails.
fn recover<C: CaptureDevice>(
    capture: &mut C,
    error: CaptureError<C::Error>,
) -> Result<(), CaptureError<C::Error>> {
    match error {
        CaptureError::Xrun => {
            log::debug!("capture xrun, preparing stream");
            capture.prepare().map_err(CaptureError::Device)
        }
        CaptureError::Suspended => {
            log::debug!("capture suspended, waiting for resume");
            loop {
                match capture.resume() {
                    Ok(()) => return Ok(()),
                    Err(nb::Error::WouldBlock) => thread::sleep(RESUME_POLL),
                    Err(nb::Error::Other(_)) => {
                        return capture.prepare().map_err(CaptureError::Device)
                    }
                }
            }
        }
        CaptureError::Device(error) => Err(CaptureError::Device(error)),
    }
}
