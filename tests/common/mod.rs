#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use simplelog::{Config, LevelFilter, TestLogger};

/// Routes the crate's `log` output through the test harness's captured stdout.
pub fn init_logging() {
    // Every test calls this; only the first registration succeeds.
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

/// Counts how many times values created from the same tracker have been dropped.
#[derive(Clone, Debug, Default)]
pub struct DropTracker(Rc<Cell<usize>>);

impl DropTracker {
    pub fn value(&self) -> Tracked {
        Tracked(Rc::clone(&self.0))
    }

    pub fn drops(&self) -> usize {
        self.0.get()
    }
}

#[derive(Debug)]
pub struct Tracked(Rc<Cell<usize>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}
