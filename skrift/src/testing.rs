//! Helpers shared by the unit tests.

use kurbo::BezPath;
use raw::types::Pen;

/// Collects path commands into a [`BezPath`].
#[derive(Default)]
pub(crate) struct BezPen {
    pub path: BezPath,
}

impl Pen for BezPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Installs a logger that prints through the test harness.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
