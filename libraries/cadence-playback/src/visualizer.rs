//! Spectrum visualizer feed
//!
//! While the session is playing, each presentation frame pulls the latest time-domain
//! samples from the transport's analysis tap and turns them into byte-scaled frequency
//! bins. The frame loop is armed while playing, idle while paused, and torn down for
//! good when the session ends.

use cadence_core::AnalysisTap;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Smallest accepted FFT size
pub const MIN_FFT_SIZE: usize = 32;

/// Largest analysis window
pub const MAX_FFT_SIZE: usize = 32_768;

/// Bottom of the displayed decibel range (maps to 0)
pub const MIN_DECIBELS: f32 = -100.0;

/// Top of the displayed decibel range (maps to 255)
pub const MAX_DECIBELS: f32 = -30.0;

/// One frame of frequency data
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySnapshot {
    /// Magnitudes for `fft_size / 2` bins, scaled to 0..=255
    pub bins: Vec<u8>,

    /// Width of each bin in Hz
    pub bin_width_hz: f32,
}

impl FrequencySnapshot {
    /// Index of the loudest bin (first one on ties)
    pub fn peak_bin(&self) -> Option<usize> {
        self.bins
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, value)| **value)
            .map(|(index, _)| index)
    }
}

/// Windowed FFT over the most recent samples
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    samples: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("fft_size", &self.fft_size())
            .finish_non_exhaustive()
    }
}

impl SpectrumAnalyzer {
    /// Create an analyzer
    ///
    /// `fft_size` is rounded up to a power of two within [`MIN_FFT_SIZE`] and
    /// [`MAX_FFT_SIZE`].
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size
            .clamp(MIN_FFT_SIZE, MAX_FFT_SIZE)
            .next_power_of_two();
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            window: blackman_window(fft_size),
            samples: vec![0.0; fft_size],
            spectrum: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    /// Number of time-domain samples per frame
    pub fn fft_size(&self) -> usize {
        self.samples.len()
    }

    /// Number of frequency bins per snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size() / 2
    }

    /// Read from a tap and analyze
    pub fn analyze_tap(&mut self, tap: &mut dyn AnalysisTap) -> FrequencySnapshot {
        let written = tap.read_time_domain(&mut self.samples).min(self.samples.len());
        self.samples[written..].fill(0.0);
        self.transform(tap.sample_rate())
    }

    /// Analyze a block of samples (zero-padded or truncated to the FFT size)
    pub fn analyze(&mut self, samples: &[f32], sample_rate: u32) -> FrequencySnapshot {
        let n = samples.len().min(self.samples.len());
        self.samples[..n].copy_from_slice(&samples[..n]);
        self.samples[n..].fill(0.0);
        self.transform(sample_rate)
    }

    fn transform(&mut self, sample_rate: u32) -> FrequencySnapshot {
        let size = self.fft_size();

        for ((slot, sample), weight) in self
            .spectrum
            .iter_mut()
            .zip(&self.samples)
            .zip(&self.window)
        {
            *slot = Complex::new(sample * weight, 0.0);
        }
        self.fft.process(&mut self.spectrum);

        let scale = 255.0 / (MAX_DECIBELS - MIN_DECIBELS);
        let bins = self.spectrum[..size / 2]
            .iter()
            .map(|value| {
                let magnitude = value.norm() / size as f32;
                let db = 20.0 * magnitude.log10();
                ((db - MIN_DECIBELS) * scale).clamp(0.0, 255.0) as u8
            })
            .collect();

        FrequencySnapshot {
            bins,
            bin_width_hz: sample_rate as f32 / size as f32,
        }
    }
}

fn blackman_window(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;

    (0..size)
        .map(|n| {
            let phase = 2.0 * PI * n as f32 / size as f32;
            A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos()
        })
        .collect()
}

/// Lifecycle of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoopState {
    /// Not rendering (paused or nothing loaded)
    Idle,
    /// Rendering a snapshot every frame
    Armed,
    /// Session ended; never renders again
    TornDown,
}

/// Frame loop driving the spectrum display
#[derive(Debug)]
pub struct Visualizer {
    state: FrameLoopState,
    analyzer: SpectrumAnalyzer,
}

impl Visualizer {
    /// Create an idle visualizer
    pub fn new(fft_size: usize) -> Self {
        Self {
            state: FrameLoopState::Idle,
            analyzer: SpectrumAnalyzer::new(fft_size),
        }
    }

    /// Current loop state
    pub fn state(&self) -> FrameLoopState {
        self.state
    }

    /// Arm while playing, idle otherwise (no effect once torn down)
    pub fn set_playing(&mut self, playing: bool) {
        self.state = match (self.state, playing) {
            (FrameLoopState::TornDown, _) => FrameLoopState::TornDown,
            (_, true) => FrameLoopState::Armed,
            (_, false) => FrameLoopState::Idle,
        };
    }

    /// Render one frame
    ///
    /// Returns `None` unless armed and a tap is available.
    pub fn frame(&mut self, tap: Option<&mut dyn AnalysisTap>) -> Option<FrequencySnapshot> {
        if self.state != FrameLoopState::Armed {
            return None;
        }
        tap.map(|tap| self.analyzer.analyze_tap(tap))
    }

    /// Stop the loop permanently
    pub fn tear_down(&mut self) {
        self.state = FrameLoopState::TornDown;
    }
}
