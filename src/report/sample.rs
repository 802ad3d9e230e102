use std::sync::mpsc::Sender;
use std::sync::Mutex;

use crate::math::Real;
use crate::occlusion::Path;

/// One finished cell, as shown by a viewer.
///
/// Coordinates are lattice indices shifted to start at zero. Each colour
/// channel tracks one body (red: Earth, green: Moon, blue: Sun): 0.5 means the
/// body is not felt at all, towards 1 means weaker than Newtonian, towards 0
/// stronger.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
    /// Branches taken, per body
    pub paths: Vec<Vec<Path>>,
}

/// Somewhere to send finished cells. Pushing must never block for long or
/// drop samples.
pub trait SampleSink: Send + Sync {
    fn push(&self, sample: Sample);
}

impl SampleSink for Sender<Sample> {
    fn push(&self, sample: Sample) {
        // A viewer that has gone away just stops receiving
        let _ = self.send(sample);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn push(&self, _sample: Sample) {}
}

/// Keeps every sample in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    samples: Mutex<Vec<Sample>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Sample> {
        let mut samples = self.samples.lock().unwrap_or_else(|err| err.into_inner());
        std::mem::take(&mut *samples)
    }
}

impl SampleSink for CollectingSink {
    fn push(&self, sample: Sample) {
        self.samples
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(sample);
    }
}

/// Colour channel for one body, comparing the pull a cell feels with the
/// Newtonian pull.
pub fn tint(felt: Option<&Real>, newton: &Real) -> f32 {
    let felt = match felt {
        Some(felt) if !newton.is_zero() => felt,
        _ => return 0.5,
    };
    if felt > newton {
        (newton / felt).to_f64() as f32 / 2.0
    } else {
        1.0 - (felt / newton).to_f64() as f32 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Kernel;
    use std::sync::mpsc::channel;

    fn sample(x: u32) -> Sample {
        Sample {
            x,
            y: 0,
            z: 0,
            r: 0.5,
            g: 0.5,
            b: 0.5,
            alpha: 0.25,
            paths: vec![vec![Path::InsideHorizon]],
        }
    }

    #[test]
    fn test_tint() {
        let k = Kernel::new(20);
        let newton = k.int(4);
        assert_eq!(tint(None, &newton), 0.5);
        assert_eq!(tint(Some(&k.int(4)), &newton), 0.5);
        assert_eq!(tint(Some(&k.int(2)), &newton), 0.75);
        assert_eq!(tint(Some(&k.int(8)), &newton), 0.25);
        assert_eq!(tint(Some(&k.zero()), &newton), 1.0);
    }

    #[test]
    fn test_channel_sink() {
        let (sender, receiver) = channel();
        sender.push(sample(1));
        sender.push(sample(2));
        drop(sender);
        let xs: Vec<u32> = receiver.iter().map(|s| s.x).collect();
        assert_eq!(xs, [1, 2]);
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (sender, receiver) = channel::<Sample>();
        drop(receiver);
        sender.push(sample(1));
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        sink.push(sample(3));
        NullSink.push(sample(4));
        assert_eq!(sink.take(), vec![sample(3)]);
        assert!(sink.take().is_empty());
    }
}
