use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::Rect;

/// Static level geometry. Rebuilt at every round setup, never mutated mid-round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub ground_y: f64,
    pub platforms: Vec<Rect>,
    pub left: f64,
    pub right: f64,
}

/// Ground line plus three floating platforms: two low ones at 20% / 80% of
/// the screen width and a higher, wider one in the middle.
///
/// Every level currently shares this layout.
pub fn build(_level: u32) -> Arena {
    let w = SCREEN_WIDTH;
    Arena {
        ground_y: GROUND_Y,
        platforms: vec![
            Rect::new(w * 0.2 - 75.0, GROUND_Y - 120.0, 150.0, 30.0),
            Rect::new(w * 0.5 - 100.0, GROUND_Y - 200.0, 200.0, 30.0),
            Rect::new(w * 0.8 - 75.0, GROUND_Y - 120.0, 150.0, 30.0),
        ],
        left: 0.0,
        right: w,
    }
}

impl Arena {
    /// Platform whose top surface the given feet position rests on.
    pub fn platform_under(&self, x: f64, feet_y: f64) -> Option<&Rect> {
        self.platforms.iter().find(|p| {
            (feet_y - p.top()).abs() < 0.5 && x >= p.left() && x <= p.right()
        })
    }

    /// Platform whose center is horizontally nearest to `x`.
    pub fn closest_platform(&self, x: f64) -> Option<&Rect> {
        self.platforms.iter().min_by(|a, b| {
            let da = (a.center().x - x).abs();
            let db = (b.center().x - x).abs();
            da.total_cmp(&db)
        })
    }

    /// Clamp a fighter's center x so its body stays on screen.
    pub fn clamp_x(&self, x: f64, body_width: f64) -> f64 {
        x.clamp(self.left + body_width / 2.0, self.right - body_width / 2.0)
    }
}
