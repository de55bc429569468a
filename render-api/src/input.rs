//! Shared rotation state written by the input thread, read by the renderer.

use std::sync::atomic::{AtomicU32, Ordering};

/// Two accumulated rotation angles (degrees) crossing from the host's input
/// handling into the render loop.
///
/// Stored as f32 bit patterns in atomics: visibility is the requirement here,
/// not atomicity of the pair. A stale read of one angle costs a single frame
/// of imperceptible jitter, so Relaxed ordering is enough and no locking is
/// involved on either side.
#[derive(Debug, Default)]
pub struct RotationInput {
    x: AtomicU32,
    y: AtomicU32,
}

impl RotationInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate pointer-move deltas (already scaled by the host).
    pub fn add_delta(&self, dx: f32, dy: f32) {
        let (x, y) = self.angles();
        self.set(x + dx, y + dy);
    }

    pub fn set(&self, x: f32, y: f32) {
        self.x.store(x.to_bits(), Ordering::Relaxed);
        self.y.store(y.to_bits(), Ordering::Relaxed);
    }

    /// Current (x, y) rotation angles in degrees.
    pub fn angles(&self) -> (f32, f32) {
        (
            f32::from_bits(self.x.load(Ordering::Relaxed)),
            f32::from_bits(self.y.load(Ordering::Relaxed)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_accumulate() {
        let input = RotationInput::new();
        input.add_delta(10.0, -2.5);
        input.add_delta(5.0, 1.0);
        let (x, y) = input.angles();
        assert_eq!(x, 15.0);
        assert_eq!(y, -1.5);
    }

    #[test]
    fn shared_across_threads() {
        let input = std::sync::Arc::new(RotationInput::new());
        let writer = std::sync::Arc::clone(&input);
        std::thread::spawn(move || writer.set(90.0, 45.0))
            .join()
            .unwrap();
        assert_eq!(input.angles(), (90.0, 45.0));
    }
}
