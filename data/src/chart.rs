pub mod legend;
pub mod mini_bars;
pub mod scale;
pub mod stack;
pub mod streamgraph;
pub mod tooltip;

pub use legend::LegendRow;
pub use mini_bars::MiniBarChart;
pub use stack::Band;
pub use streamgraph::{Region, Scene, Surface};
pub use tooltip::Tooltip;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// A labelled tick, `offset` along the axis in the owning chart's pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub offset: f32,
    pub label: String,
}
