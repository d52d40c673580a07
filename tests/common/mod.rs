#![allow(dead_code)]

use std::collections::VecDeque;
use std::fmt;

use balltrack_rs::{
    DetectionOutputLayer, Detector, Frame, FrameSource, OutputLayerBuilder, Rect, Renderer,
    Tracker,
};

pub const BALL: usize = 32;
pub const NUM_CLASSES: usize = 80;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
pub struct MockError(pub &'static str);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for MockError {}

/// Single-row layer with a ball at normalized `(cx, cy)`.
pub fn ball_layer(cx: f32, cy: f32, size: f32, confidence: f32) -> DetectionOutputLayer {
    OutputLayerBuilder::new(NUM_CLASSES)
        .row(cx, cy, size, size)
        .objectness(0.95)
        .score(BALL, confidence)
        .build(0)
        .unwrap()
}

/// Detector replaying a script of per-call results; repeats the last entry
/// once the script runs out.
pub struct ScriptedDetector {
    script: VecDeque<Result<Vec<DetectionOutputLayer>, MockError>>,
    last: Vec<DetectionOutputLayer>,
    pub calls: usize,
}

impl ScriptedDetector {
    pub fn always(layers: Vec<DetectionOutputLayer>) -> Self {
        Self {
            script: VecDeque::new(),
            last: layers,
            calls: 0,
        }
    }

    pub fn scripted(
        script: Vec<Result<Vec<DetectionOutputLayer>, MockError>>,
        fallback: Vec<DetectionOutputLayer>,
    ) -> Self {
        Self {
            script: script.into(),
            last: fallback,
            calls: 0,
        }
    }
}

impl Detector for ScriptedDetector {
    type Error = MockError;

    fn infer(&mut self, _frame: &Frame) -> Result<Vec<DetectionOutputLayer>, Self::Error> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(result) => result,
            None => Ok(self.last.clone()),
        }
    }
}

/// Tracker with scripted `init` results that echoes its seed box on update.
#[derive(Default)]
pub struct ScriptedTracker {
    pub init_results: VecDeque<bool>,
    pub update_results: VecDeque<bool>,
    pub seed: Option<Rect>,
    pub inits: usize,
    pub updates: usize,
}

impl ScriptedTracker {
    pub fn new(init_results: Vec<bool>, update_results: Vec<bool>) -> Self {
        Self {
            init_results: init_results.into(),
            update_results: update_results.into(),
            ..Default::default()
        }
    }
}

impl Tracker for ScriptedTracker {
    fn init(&mut self, _frame: &Frame, bbox: Rect) -> bool {
        self.inits += 1;
        let ok = self.init_results.pop_front().unwrap_or(true);
        self.seed = ok.then_some(bbox);
        ok
    }

    fn update(&mut self, _frame: &Frame) -> Option<Rect> {
        self.updates += 1;
        assert!(self.seed.is_some(), "update called on an unseeded tracker");
        if self.update_results.pop_front().unwrap_or(true) {
            self.seed
        } else {
            None
        }
    }
}

/// In-memory frame source; optionally fails after yielding its frames.
pub struct VecSource {
    frames: VecDeque<Frame>,
    fail_at_end: bool,
}

impl VecSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            fail_at_end: false,
        }
    }

    pub fn blank(count: usize) -> Self {
        Self::new((0..count).map(|_| Frame::filled(100, 100, 3, 0)).collect())
    }

    pub fn failing_after(mut self) -> Self {
        self.fail_at_end = true;
        self
    }
}

impl FrameSource for VecSource {
    type Error = MockError;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None if self.fail_at_end => Err(MockError("device unplugged")),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Box(Rect, Option<String>),
    Plain,
}

/// Renderer that records what it was asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
    pub drawn: Vec<Drawn>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, _frame: &Frame, bbox: Rect, label: Option<&str>) {
        self.drawn.push(Drawn::Box(bbox, label.map(str::to_string)));
    }

    fn draw_plain(&mut self, _frame: &Frame) {
        self.drawn.push(Drawn::Plain);
    }
}
