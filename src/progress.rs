// src/progress.rs

/// Step reporting for multi-step jobs such as poster rendering.
/// The CLI prints a line per step; library callers may pass `None`.
pub trait Progress {
    /// Number of steps about to run.
    fn begin(&mut self, _total: usize) {}

    fn log(&mut self, _msg: &str) {}

    /// One step finished; `label` names it (e.g. a poster's file stem).
    fn item_done(&mut self, _label: &str) {}

    /// Always called last, also after a failed step.
    fn finish(&mut self) {}
}

/// Discards everything.
pub struct NullProgress;
impl Progress for NullProgress {}
