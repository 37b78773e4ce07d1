//! render::plot
//!
//! PNG output via plotters. Requires the `plotters` feature; without it
//! every function returns [`RenderError::Unsupported`].

#[cfg(feature = "plotters")]
use plotters::prelude::*;

use std::path::Path;

#[cfg(feature = "plotters")]
use super::layout::{
    focus_subgraph, node_sizes, spring_layout, DEFAULT_ITERATIONS, DEFAULT_SPRING_K, MIN_NODE_SIZE,
};
use super::RenderError;
use crate::core::network::Network;
use crate::sentiment::SentimentCounts;

/// Network image size in pixels.
pub const NETWORK_SIZE: (u32, u32) = (1200, 900);

/// Sentiment chart size in pixels.
pub const CHART_SIZE: (u32, u32) = (600, 400);

/// What [`draw_network`] drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnNetwork {
    pub nodes: usize,
    pub edges: usize,
    pub labels: usize,
}

/// Draw the focused portion of `network` to a PNG at `path`.
///
/// The top `top_n` handles by weighted degree and their neighbours are
/// laid out; only the top handles are labelled.
#[cfg(feature = "plotters")]
pub fn draw_network(network: &Network, top_n: usize, path: &Path) -> Result<DrawnNetwork, RenderError> {
    use std::collections::HashSet;

    let focus = focus_subgraph(network, top_n);
    if focus.subgraph.is_empty() {
        return Err(RenderError::EmptyGraph);
    }
    super::ensure_parent(path)?;

    let positions = spring_layout(&focus.subgraph, DEFAULT_SPRING_K, DEFAULT_ITERATIONS);
    let sizes = node_sizes(network, &focus.subgraph);
    let labelled: HashSet<_> = focus.top.iter().collect();

    let (width, height) = NETWORK_SIZE;
    let margin = 60.0;
    let to_pixel = |(x, y): (f64, f64)| -> (i32, i32) {
        let px = margin + (x + 1.0) / 2.0 * (width as f64 - 2.0 * margin);
        let py = margin + (1.0 - (y + 1.0) / 2.0) * (height as f64 - 2.0 * margin);
        (px.round() as i32, py.round() as i32)
    };

    let draw = || -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, NETWORK_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let edge_color = RGBColor(0x33, 0x33, 0x33).mix(0.6);
        for edge in focus.subgraph.edges() {
            let (Some(&from), Some(&to)) = (positions.get(edge.source), positions.get(edge.target))
            else {
                continue;
            };
            if edge.source == edge.target {
                continue;
            }
            let (a, b) = (to_pixel(from), to_pixel(to));
            root.draw(&PathElement::new(vec![a, b], edge_color.stroke_width(1)))?;
            for wing in arrow_head(a, b) {
                root.draw(&PathElement::new(vec![b, wing], edge_color.stroke_width(1)))?;
            }
        }

        let node_color = RGBColor(0x1f, 0x78, 0xb4).mix(0.9);
        for (handle, pos) in &positions {
            let size = sizes.get(handle).copied().unwrap_or(MIN_NODE_SIZE);
            let radius = ((size as f64).sqrt() * 0.6).round() as i32;
            root.draw(&Circle::new(to_pixel(*pos), radius, node_color.filled()))?;
        }

        for (handle, pos) in &positions {
            if !labelled.contains(handle) {
                continue;
            }
            let (x, y) = to_pixel(*pos);
            root.draw(&Text::new(
                handle.to_string(),
                (x + 6, y - 6),
                ("sans-serif", 12).into_font(),
            ))?;
        }

        root.present()?;
        Ok(())
    };
    draw().map_err(|e| RenderError::Draw(e.to_string()))?;

    Ok(DrawnNetwork {
        nodes: focus.subgraph.node_count(),
        edges: focus.subgraph.edge_count(),
        labels: focus.top.len(),
    })
}

/// Two short strokes forming an arrow head at `to`, pointing away from `from`.
#[cfg(feature = "plotters")]
fn arrow_head(from: (i32, i32), to: (i32, i32)) -> [(i32, i32); 2] {
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let len = (dx * dx + dy * dy).sqrt().max(1.0);
    let (ux, uy) = (dx / len, dy / len);
    let size = 8.0;
    let wing = |sign: f64| {
        let x = to.0 as f64 - size * ux + sign * size * 0.5 * uy;
        let y = to.1 as f64 - size * uy - sign * size * 0.5 * ux;
        (x.round() as i32, y.round() as i32)
    };
    [wing(1.0), wing(-1.0)]
}

/// Draw a bar chart of sentiment counts to a PNG at `path`.
#[cfg(feature = "plotters")]
pub fn draw_sentiment_chart(counts: &SentimentCounts, path: &Path) -> Result<(), RenderError> {
    super::ensure_parent(path)?;

    let entries = counts.entries();
    let colors = [
        RGBColor(0x2c, 0xa0, 0x2c),
        RGBColor(0xff, 0x7f, 0x0e),
        RGBColor(0xd6, 0x27, 0x28),
    ];
    let max = entries.iter().map(|(_, c)| *c as u32).max().unwrap_or(0).max(1);

    let draw = || -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Post Sentiment Distribution", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(40)
            .build_cartesian_2d((0u32..3u32).into_segmented(), 0u32..(max + max / 10 + 1))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Sentiment")
            .y_desc("Count")
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => entries
                    .get(*i as usize)
                    .map(|(label, _)| label.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        for (i, ((_, count), color)) in entries.iter().zip(colors.iter()).enumerate() {
            let i = i as u32;
            let count = *count as u32;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), count)],
                color.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(i), count),
                ("sans-serif", 14).into_font(),
            )))?;
        }

        root.present()?;
        Ok(())
    };
    draw().map_err(|e| RenderError::Draw(e.to_string()))
}

/// Stub when the plotters feature is disabled.
#[cfg(not(feature = "plotters"))]
pub fn draw_network(network: &Network, top_n: usize, _path: &Path) -> Result<DrawnNetwork, RenderError> {
    if network.is_empty() || top_n == 0 {
        return Err(RenderError::EmptyGraph);
    }
    Err(RenderError::Unsupported)
}

/// Stub when the plotters feature is disabled.
#[cfg(not(feature = "plotters"))]
pub fn draw_sentiment_chart(_counts: &SentimentCounts, _path: &Path) -> Result<(), RenderError> {
    Err(RenderError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::CollapsePolicy;

    #[test]
    fn empty_network_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = draw_network(
            &Network::new(CollapsePolicy::Weighted),
            10,
            &dir.path().join("net.png"),
        );
        assert!(matches!(result, Err(RenderError::EmptyGraph)));
    }

    #[test]
    fn empty_focus_is_rejected() {
        use crate::core::types::Handle;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.png");
        let mut network = Network::new(CollapsePolicy::Weighted);
        network.insert_edge(Handle::new("a").unwrap(), Handle::new("b").unwrap(), 1, Vec::new());

        let result = draw_network(&network, 0, &path);
        assert!(matches!(result, Err(RenderError::EmptyGraph)));
        assert!(!path.exists());
    }

    #[cfg(not(feature = "plotters"))]
    #[test]
    fn png_output_unsupported_without_feature() {
        let dir = tempfile::tempdir().unwrap();
        let result = draw_sentiment_chart(&SentimentCounts::default(), &dir.path().join("s.png"));
        assert!(matches!(result, Err(RenderError::Unsupported)));
    }
}
