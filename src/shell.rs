//! Line-oriented driver for the navigator, used by the headless binary.
//!
//! Commands: `press <key>`, `look <dx> <dy>`, `wait <ms>`, `search <sort-key> [term...]`,
//! `dismiss`, `status`, `quit`. Blank lines and `#` comments are skipped.

use crate::events::NavigatorEvent;
use crate::input::{key_from_token, Input, InputEvent};
use crate::mode::Intent;
use crate::navigator::Navigator;
use crate::pipeline::SortKey;
use crate::render::{ImageLoader, SceneRenderer};
use crate::time::{Clock, ManualClock, SystemClock};
use anyhow::{anyhow, bail, Context, Result};
use std::io::BufRead;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

pub enum SessionClock {
    Manual(ManualClock),
    System(SystemClock),
}

impl SessionClock {
    fn now(&self) -> Duration {
        match self {
            SessionClock::Manual(clock) => clock.now(),
            SessionClock::System(clock) => clock.now(),
        }
    }

    /// Moves time forward by one frame of at most `limit`.
    fn step(&mut self, limit: Duration) -> Duration {
        let step = limit.min(FRAME);
        match self {
            SessionClock::Manual(clock) => clock.advance(step),
            SessionClock::System(clock) => {
                std::thread::sleep(step);
                clock.now()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellControl {
    Continue,
    Quit,
}

pub struct Session<R: SceneRenderer, L: ImageLoader> {
    navigator: Navigator<R, L>,
    input: Input,
    clock: SessionClock,
    log: Vec<NavigatorEvent>,
}

impl<R: SceneRenderer, L: ImageLoader> Session<R, L> {
    pub fn new(navigator: Navigator<R, L>, input: Input, clock: SessionClock) -> Self {
        Self { navigator, input, clock, log: Vec::new() }
    }

    pub fn navigator(&self) -> &Navigator<R, L> {
        &self.navigator
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Every event observed so far, in order.
    pub fn event_log(&self) -> &[NavigatorEvent] {
        &self.log
    }

    pub fn run_line(&mut self, line: &str) -> Result<ShellControl> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(ShellControl::Continue);
        }
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match command {
            "press" => {
                let key = key_from_token(rest).ok_or_else(|| anyhow!("Unknown key '{rest}'"))?;
                self.input.push(InputEvent::key_press(key));
            }
            "look" => {
                let mut parts = rest.split_whitespace();
                let dx = parse_f32(parts.next(), "dx")?;
                let dy = parse_f32(parts.next(), "dy")?;
                self.input.push(InputEvent::MouseMove { dx, dy });
            }
            "wait" => {
                let ms: u64 = rest.parse().with_context(|| format!("Invalid wait duration '{rest}'"))?;
                self.wait(Duration::from_millis(ms));
                return Ok(ShellControl::Continue);
            }
            "search" => {
                let (sort, term) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let sort_key: SortKey = sort.parse()?;
                let outcome = self.navigator.submit_search(term, sort_key);
                log::info!("[shell] search -> {outcome:?}");
            }
            "dismiss" => {
                let now = self.clock.now();
                if !self.navigator.handle_intent(Intent::DismissInstructions, now) {
                    log::info!("[shell] instructions already dismissed");
                }
            }
            "status" => self.report_status(),
            "quit" | "exit" => return Ok(ShellControl::Quit),
            other => bail!("Unknown command '{other}'"),
        }
        self.dispatch_input();
        self.frame();
        Ok(ShellControl::Continue)
    }

    /// Feeds every line of `reader`. Bad lines are logged and skipped.
    pub fn run<B: BufRead>(&mut self, reader: B) -> Result<()> {
        for (number, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read input line {}", number + 1))?;
            match self.run_line(&line) {
                Ok(ShellControl::Quit) => break,
                Ok(ShellControl::Continue) => {}
                Err(err) => log::warn!("[shell] line {}: {err:#}", number + 1),
            }
        }
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        let target = self.clock.now() + duration;
        while self.clock.now() < target {
            let remaining = target.saturating_sub(self.clock.now());
            self.clock.step(remaining);
            self.dispatch_input();
            self.frame();
        }
    }

    fn dispatch_input(&mut self) {
        let now = self.clock.now();
        for intent in self.input.drain_intents() {
            self.navigator.handle_intent(intent, now);
        }
    }

    fn frame(&mut self) {
        self.navigator.tick(self.clock.now());
        for event in self.navigator.drain_events() {
            log::info!("[event] {event}");
            self.log.push(event);
        }
    }

    fn report_status(&self) {
        let now = self.clock.now();
        let pose = self.navigator.current_pose(now);
        let item = self
            .navigator
            .current_item()
            .map(|record| format!("'{}' {}", record.title, record.artist_line()))
            .unwrap_or_else(|| "<none>".to_string());
        log::info!(
            "[status] t={}ms mode={} viewpoint={} item={} displayed={} position={:?} rotation={:?}",
            now.as_millis(),
            self.navigator.mode(),
            self.navigator.viewpoint_index(),
            item,
            self.navigator.displayed().len(),
            pose.position,
            pose.rotation
        );
    }
}

fn parse_f32(value: Option<&str>, name: &str) -> Result<f32> {
    let value = value.ok_or_else(|| anyhow!("Missing {name}"))?;
    value.parse::<f32>().with_context(|| format!("Invalid {name} '{value}'"))
}
