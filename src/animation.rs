/// Marching-ants dash phase for the selection outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashAnimation {
    phase: f32,
    start: f32,
}

impl DashAnimation {
    pub fn new(start: f32) -> Self {
        Self {
            phase: start,
            start,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance one step; wraps back to the start once the phase drops below zero.
    pub fn tick(&mut self) -> f32 {
        self.phase -= 1.0;
        if self.phase < 0.0 {
            self.phase = self.start;
        }
        self.phase
    }
}

/// White overlay shown right after a capture, fading out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashAnimation {
    opacity: f32,
    decay: f32,
}

impl FlashAnimation {
    pub fn new(decay: f32) -> Self {
        Self {
            opacity: 0.0,
            decay,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn start(&mut self) {
        self.opacity = 1.0;
    }

    /// Fade one step. Returns `true` while the flash is still visible.
    pub fn step(&mut self) -> bool {
        self.opacity = (self.opacity - self.decay).max(0.0);
        self.is_visible()
    }
}
