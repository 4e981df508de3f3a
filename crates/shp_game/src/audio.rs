//! Background music via a cpal output stream.
//!
//! The track is a short synthesized chiptune loop rendered directly in the
//! audio callback, so there is nothing to decode and no asset to miss. The
//! stream is fire-and-forget: the game never talks to it again after start,
//! and every failure path (no device, unsupported format, stream error)
//! degrades to silence with a warning.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

const VOLUME: f32 = 0.08;
const NOTE_SECONDS: f32 = 0.24;

/// A looping square-wave melody, one note per entry, in Hz.
const MELODY: [f32; 16] = [
    523.25, 659.25, 783.99, 659.25, // C5 E5 G5 E5
    880.00, 783.99, 659.25, 587.33, // A5 G5 E5 D5
    523.25, 587.33, 659.25, 783.99, // C5 D5 E5 G5
    659.25, 587.33, 523.25, 392.00, // E5 D5 C5 G4
];

struct MelodyVoice {
    sample_rate: f32,
    phase: f32,
    note_index: usize,
    note_len: u32,
    samples_left: u32,
}

impl MelodyVoice {
    fn new(sample_rate: f32) -> Self {
        let note_len = (sample_rate * NOTE_SECONDS) as u32;
        Self {
            sample_rate,
            phase: 0.0,
            note_index: 0,
            note_len,
            samples_left: note_len,
        }
    }

    fn next_sample(&mut self) -> f32 {
        if self.samples_left == 0 {
            self.note_index = (self.note_index + 1) % MELODY.len();
            self.samples_left = self.note_len;
        }
        self.samples_left -= 1;

        let freq = MELODY[self.note_index];
        self.phase = (self.phase + freq / self.sample_rate).fract();
        let wave = if self.phase < 0.5 { 1.0 } else { -1.0 };

        // Linear decay over each note keeps the square wave from clicking
        // at note boundaries.
        let envelope = self.samples_left as f32 / self.note_len as f32;
        wave * envelope * VOLUME
    }

    fn fill(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels) {
            let sample = self.next_sample();
            for out in frame.iter_mut() {
                *out = sample;
            }
        }
    }
}

/// Holds the cpal stream alive for the life of the game. Dropping it stops
/// the music.
pub struct MusicPlayer {
    _stream: Option<cpal::Stream>,
}

impl MusicPlayer {
    pub fn start() -> Self {
        match build_stream() {
            Some(stream) => {
                log::info!("Background music started");
                Self {
                    _stream: Some(stream),
                }
            }
            None => {
                log::warn!("Audio unavailable; continuing without music");
                Self { _stream: None }
            }
        }
    }
}

fn build_stream() -> Option<cpal::Stream> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let supported = device.default_output_config().ok()?;

    if supported.sample_format() != cpal::SampleFormat::F32 {
        log::warn!(
            "Unsupported output sample format {:?}",
            supported.sample_format()
        );
        return None;
    }

    let config: cpal::StreamConfig = supported.config();
    let channels = config.channels as usize;
    let mut voice = MelodyVoice::new(config.sample_rate.0 as f32);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                voice.fill(data, channels);
            },
            |err| log::error!("Audio stream error: {err}"),
            None,
        )
        .ok()?;

    stream.play().ok()?;
    Some(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_output_stays_within_volume_bounds() {
        let mut voice = MelodyVoice::new(44100.0);
        for _ in 0..44100 {
            let s = voice.next_sample();
            assert!(s.abs() <= VOLUME + f32::EPSILON);
        }
    }

    #[test]
    fn voice_loops_back_to_the_first_note() {
        let mut voice = MelodyVoice::new(44100.0);
        let samples_per_loop = voice.note_len as usize * MELODY.len();
        for _ in 0..samples_per_loop {
            voice.next_sample();
        }
        assert_eq!(voice.note_index, MELODY.len() - 1, "end of the last note");
        voice.next_sample();
        assert_eq!(voice.note_index, 0, "melody wraps around");
    }

    #[test]
    fn fill_writes_every_channel_of_every_frame() {
        let mut voice = MelodyVoice::new(44100.0);
        let mut data = vec![42.0f32; 64];
        voice.fill(&mut data, 2);
        for frame in data.chunks(2) {
            assert_eq!(frame[0], frame[1], "both channels carry the same sample");
            assert!(frame[0].abs() <= VOLUME + f32::EPSILON);
        }
    }
}
