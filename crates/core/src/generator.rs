use crate::prng::Prng;
use crate::stimulus::{Color, Emoji, Position, Shape, Stimulus};

/// Fixed cycle played back in deterministic mode.
pub const DETERMINISTIC_CYCLE: [Stimulus; 6] = [
    Stimulus::new(Color::Blue, Emoji::Flower, Position::Center, Shape::Square),
    Stimulus::new(Color::Green, Emoji::Ice, Position::Left, Shape::Triangle),
    Stimulus::new(Color::Blue, Emoji::Fire, Position::Right, Shape::Circle),
    Stimulus::new(Color::Green, Emoji::Flower, Position::Center, Shape::Square),
    Stimulus::new(Color::Blue, Emoji::Ice, Position::Left, Shape::Triangle),
    Stimulus::new(Color::Green, Emoji::Flower, Position::Right, Shape::Circle),
];

/// Produces the next stimulus, either drawn at random or read from
/// [`DETERMINISTIC_CYCLE`].
///
/// Random draws are independent per channel, so a fresh stimulus can agree
/// with earlier ones on any subset of channels. The cycle cursor only moves
/// on deterministic draws.
#[derive(Debug, Clone)]
pub struct StimulusSource {
    rng: Prng,
    deterministic: bool,
    cursor: usize,
}

impl StimulusSource {
    pub fn random(seed: u64) -> Self {
        Self {
            rng: Prng::new(seed),
            deterministic: false,
            cursor: 0,
        }
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn set_deterministic(&mut self, on: bool) {
        self.deterministic = on;
    }

    /// Position in the cycle of the next deterministic draw.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn next(&mut self) -> Stimulus {
        if self.deterministic {
            let s = DETERMINISTIC_CYCLE[self.cursor];
            self.cursor = (self.cursor + 1) % DETERMINISTIC_CYCLE.len();
            s
        } else {
            Stimulus {
                color: self.rng.pick(&Color::ALL),
                emoji: self.rng.pick(&Emoji::ALL),
                position: self.rng.pick(&Position::ALL),
                shape: self.rng.pick(&Shape::ALL),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_mode_wraps_the_cycle() {
        let mut src = StimulusSource::random(1);
        src.set_deterministic(true);
        let drawn: Vec<Stimulus> = (0..8).map(|_| src.next()).collect();

        assert_eq!(drawn[0], DETERMINISTIC_CYCLE[0]);
        assert_eq!(drawn[5], DETERMINISTIC_CYCLE[5]);
        assert_eq!(drawn[6], DETERMINISTIC_CYCLE[0]);
        assert_eq!(drawn[7], DETERMINISTIC_CYCLE[1]);
        assert_eq!(src.cursor(), 2);
    }

    #[test]
    fn random_draws_leave_the_cursor_alone() {
        let mut src = StimulusSource::random(99);
        for _ in 0..10 {
            let _ = src.next();
        }
        assert_eq!(src.cursor(), 0);

        src.set_deterministic(true);
        assert_eq!(src.next(), DETERMINISTIC_CYCLE[0]);
        src.set_deterministic(false);
        let _ = src.next();
        src.set_deterministic(true);
        assert_eq!(src.next(), DETERMINISTIC_CYCLE[1]);
    }

    #[test]
    fn random_mode_reaches_every_value_on_every_channel() {
        let mut src = StimulusSource::random(2024);
        let drawn: Vec<Stimulus> = (0..200).map(|_| src.next()).collect();

        for c in Color::ALL {
            assert!(drawn.iter().any(|s| s.color == c));
        }
        for e in Emoji::ALL {
            assert!(drawn.iter().any(|s| s.emoji == e));
        }
        for p in Position::ALL {
            assert!(drawn.iter().any(|s| s.position == p));
        }
        for sh in Shape::ALL {
            assert!(drawn.iter().any(|s| s.shape == sh));
        }
    }

    #[test]
    fn seeded_sources_replay_identically() {
        let mut a = StimulusSource::random(5);
        let mut b = StimulusSource::random(5);
        for _ in 0..20 {
            assert_eq!(a.next(), b.next());
        }
    }
}
