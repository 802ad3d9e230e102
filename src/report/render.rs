//! Draws the cell feed as three orthogonal projections of the object, side
//! by side: looking down z (x right, y down), down y (x, z) and down x (y, z).

use plotters::prelude::*;

use std::path::Path;

use super::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionLayout {
    pub dot_size: u32,
    pub border: u32,
    /// Cells along one edge of the lattice
    pub edge_cells: u32,
}

impl ProjectionLayout {
    pub fn new(steps_on_edge: i64, dot_size: u32, border: u32) -> Self {
        Self {
            dot_size,
            border,
            edge_cells: (2 * steps_on_edge.max(0)) as u32,
        }
    }

    pub fn panel(&self) -> u32 {
        self.edge_cells * self.dot_size
    }

    pub fn image_size(&self) -> (u32, u32) {
        let panel = self.panel();
        (self.border + 3 * (panel + self.border), 2 * self.border + panel)
    }

    fn panel_origin(&self, panel: u32) -> (i32, i32) {
        let x = self.border + panel * (self.panel() + self.border);
        (x as i32, self.border as i32)
    }

    /// Top-left corner of the sample's dot in each panel.
    pub fn dots(&self, sample: &Sample) -> [(i32, i32); 3] {
        let d = self.dot_size as i32;
        let place = |panel: u32, u: u32, v: u32| {
            let (x0, y0) = self.panel_origin(panel);
            (x0 + u as i32 * d, y0 + v as i32 * d)
        };
        [
            place(0, sample.x, sample.y),
            place(1, sample.x, sample.z),
            place(2, sample.y, sample.z),
        ]
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Draws every sample into a PNG at `path`, returning how many were drawn.
/// Keeps drawing until the sample source runs dry.
pub fn render(
    path: &Path,
    layout: &ProjectionLayout,
    samples: impl IntoIterator<Item = Sample>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, layout.image_size()).into_drawing_area();
    root.fill(&BLACK)?;

    let panel = layout.panel() as i32;
    for p in 0..3 {
        let (x0, y0) = layout.panel_origin(p);
        root.draw(&Rectangle::new(
            [(x0 - 1, y0 - 1), (x0 + panel, y0 + panel)],
            WHITE.stroke_width(1),
        ))?;
    }

    let d = layout.dot_size as i32;
    let mut count = 0;
    for sample in samples {
        let color = RGBAColor(
            channel(sample.r),
            channel(sample.g),
            channel(sample.b),
            f64::from(sample.alpha),
        );
        for (x, y) in layout.dots(&sample) {
            root.draw(&Rectangle::new([(x, y), (x + d - 1, y + d - 1)], color.filled()))?;
        }
        count += 1;
    }

    root.present()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occlusion::Path as Branch;

    fn sample(x: u32, y: u32, z: u32) -> Sample {
        Sample {
            x,
            y,
            z,
            r: 0.2,
            g: 0.5,
            b: 0.9,
            alpha: 0.5,
            paths: vec![vec![Branch::InsideHorizon]],
        }
    }

    #[test]
    fn test_layout() {
        let layout = ProjectionLayout::new(10, 5, 30);
        assert_eq!(layout.panel(), 100);
        assert_eq!(layout.image_size(), (420, 160));
        assert_eq!(layout.dots(&sample(0, 0, 0)), [(30, 30), (160, 30), (290, 30)]);
        assert_eq!(layout.dots(&sample(1, 2, 3)), [(35, 40), (165, 45), (300, 45)]);
    }

    #[test]
    fn test_channel() {
        assert_eq!(channel(0.0), 0);
        assert_eq!(channel(0.5), 128);
        assert_eq!(channel(1.5), 255);
    }

    #[test]
    fn test_render_png() {
        let path = std::env::temp_dir().join(format!("rindler-render-{}.png", std::process::id()));
        let layout = ProjectionLayout::new(1, 4, 2);
        let drawn = render(&path, &layout, vec![sample(0, 0, 1), sample(1, 1, 0)]).unwrap();
        assert_eq!(drawn, 2);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).unwrap();
    }
}
