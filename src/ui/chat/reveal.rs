//! Character-by-character reveal of Rex's latest reply.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Reveal {
    index: usize,
    total: usize,
    shown: usize,
    last_tick: Instant,
}

#[derive(Debug, Clone)]
pub struct RevealState {
    interval: Duration,
    active: Option<Reveal>,
}

impl RevealState {
    /// A zero interval disables the animation.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            active: None,
        }
    }

    /// Begin revealing the transcript entry at `index`. Any reveal already
    /// running completes immediately.
    pub fn start(&mut self, index: usize, content: &str, now: Instant) {
        if self.interval.is_zero() {
            self.active = None;
            return;
        }
        let total = content.chars().count();
        self.active = (total > 0).then_some(Reveal {
            index,
            total,
            shown: 0,
            last_tick: now,
        });
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn finish(&mut self) {
        self.active = None;
    }

    /// Advance one character per elapsed interval. Returns true when more
    /// text became visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(reveal) = self.active.as_mut() else {
            return false;
        };
        let elapsed = now.saturating_duration_since(reveal.last_tick);
        let steps = (elapsed.as_millis() / self.interval.as_millis()) as usize;
        if steps == 0 {
            return false;
        }
        reveal.shown = (reveal.shown + steps).min(reveal.total);
        reveal.last_tick += self.interval * steps as u32;
        if reveal.shown >= reveal.total {
            self.active = None;
        }
        true
    }

    /// The part of `content` at `index` that should be on screen.
    pub fn visible<'a>(&self, index: usize, content: &'a str) -> &'a str {
        match &self.active {
            Some(reveal) if reveal.index == index => {
                let end = content
                    .char_indices()
                    .nth(reveal.shown)
                    .map_or(content.len(), |(byte, _)| byte);
                &content[..end]
            }
            _ => content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_character_per_interval() {
        let start = Instant::now();
        let mut reveal = RevealState::new(30);
        reveal.start(2, "Namaste", start);

        assert_eq!(reveal.visible(2, "Namaste"), "");
        assert!(!reveal.tick(start + Duration::from_millis(29)));
        assert!(reveal.tick(start + Duration::from_millis(30)));
        assert_eq!(reveal.visible(2, "Namaste"), "N");
        assert!(reveal.tick(start + Duration::from_millis(95)));
        assert_eq!(reveal.visible(2, "Namaste"), "Nam");
        assert_eq!(reveal.visible(1, "older"), "older");
    }

    #[test]
    fn completes_and_deactivates() {
        let start = Instant::now();
        let mut reveal = RevealState::new(10);
        reveal.start(0, "hi", start);
        reveal.tick(start + Duration::from_secs(1));
        assert!(!reveal.is_active());
        assert_eq!(reveal.visible(0, "hi"), "hi");
    }

    #[test]
    fn multibyte_replies_cut_on_character_boundaries() {
        let start = Instant::now();
        let mut reveal = RevealState::new(10);
        reveal.start(0, "नमस्ते", start);
        reveal.tick(start + Duration::from_millis(20));
        assert_eq!(reveal.visible(0, "नमस्ते").chars().count(), 2);
    }

    #[test]
    fn zero_interval_shows_everything() {
        let mut reveal = RevealState::new(0);
        reveal.start(0, "instant", Instant::now());
        assert!(!reveal.is_active());
        assert_eq!(reveal.visible(0, "instant"), "instant");
    }
}
