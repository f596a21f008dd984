// Outward search paths
use crate::layout::{CanvasSize, SpiralKind};
use std::f64::consts::PI;

/// Distance between successive Archimedean arms, in canvas units
const ARM_SPACING: f64 = 4.0;
/// Arc length between two Archimedean samples
const ARC_STEP: f64 = 2.0;
/// Vertical unit of the rectangular spiral
const RECT_STEP: f64 = 2.0;
/// Largest horizontal stretch applied to either path
const MAX_STRETCH: f64 = 2.0;

/// Iterator over candidate center offsets, starting at the canvas center
///
/// Both paths stretch horizontally by the canvas aspect ratio, capped at
/// `MAX_STRETCH` so samples on long canvases stay a few pixels apart, and end
/// once every further point lies outside the canvas.
#[derive(Debug, Clone)]
pub struct SpiralPath {
    state: PathState,
    /// +1.0 counter-clockwise, -1.0 clockwise
    direction: f64,
    emitted_origin: bool,
}

#[derive(Debug, Clone)]
enum PathState {
    Archimedean {
        stretch: f64,
        theta: f64,
        /// r = a * theta
        a: f64,
        max_radius: f64,
    },
    Rectangular {
        dx: f64,
        dy: f64,
        x: f64,
        y: f64,
        t: u64,
        half_width: f64,
        half_height: f64,
    },
}

impl SpiralPath {
    pub fn new(kind: SpiralKind, canvas: CanvasSize, clockwise: bool) -> Self {
        let stretch = (canvas.width / canvas.height).min(MAX_STRETCH);
        let state = match kind {
            SpiralKind::Archimedean => PathState::Archimedean {
                stretch,
                theta: 0.0,
                a: ARM_SPACING / (2.0 * PI),
                // Beyond this the ring's ellipse encloses the whole canvas
                max_radius: (canvas.width / (2.0 * stretch)).hypot(canvas.height / 2.0),
            },
            SpiralKind::Rectangular => PathState::Rectangular {
                dx: RECT_STEP * stretch,
                dy: RECT_STEP,
                x: 0.0,
                y: 0.0,
                t: 0,
                half_width: canvas.width / 2.0,
                half_height: canvas.height / 2.0,
            },
        };
        Self {
            state,
            direction: if clockwise { -1.0 } else { 1.0 },
            emitted_origin: false,
        }
    }
}

impl Iterator for SpiralPath {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.emitted_origin {
            self.emitted_origin = true;
            return Some((0.0, 0.0));
        }

        let direction = self.direction;
        match &mut self.state {
            PathState::Archimedean {
                stretch,
                theta,
                a,
                max_radius,
            } => {
                let r = *a * *theta;
                // Arc length after stretching stays at or below ARC_STEP
                let speed = r.max(1.0) * stretch.max(1.0);
                *theta += (ARC_STEP / speed).min(0.5);
                let r = *a * *theta;
                if r > *max_radius {
                    return None;
                }
                let angle = direction * *theta;
                Some((*stretch * r * angle.cos(), r * angle.sin()))
            }
            PathState::Rectangular {
                dx,
                dy,
                x,
                y,
                t,
                half_width,
                half_height,
            } => {
                *t += 1;
                // Arm lengths run 1, 2, 2, 3, 3, 4, ... around the center
                let arm = ((((1 + 4 * *t) as f64).sqrt() - 1.0) as u64) & 3;
                match arm {
                    0 => *x += *dx,
                    1 => *y += direction * *dy,
                    2 => *x -= *dx,
                    _ => *y -= direction * *dy,
                }
                if x.abs() > *half_width + *dx && y.abs() > *half_height + *dy {
                    return None;
                }
                Some((*x, *y))
            }
        }
    }
}
