#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Wall-clock playback of a fixed-duration animation that can be played
/// and reversed from wherever it currently is.
#[derive(Debug, Clone)]
pub struct Playhead {
    time: f32,
    duration: f32,
    direction: Direction,
}

impl Playhead {
    pub fn new(duration: f32) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            direction: Direction::Reverse,
        }
    }

    pub fn play(&mut self) {
        self.direction = Direction::Forward;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
    }

    pub fn advance(&mut self, dt: f32) {
        let delta = match self.direction {
            Direction::Forward => dt,
            Direction::Reverse => -dt,
        };
        self.time = (self.time + delta).clamp(0.0, self.duration);
    }

    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            self.time / self.duration
        } else {
            match self.direction {
                Direction::Forward => 1.0,
                Direction::Reverse => 0.0,
            }
        }
    }
}
