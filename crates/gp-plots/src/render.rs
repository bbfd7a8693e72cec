//! The boundary between recipes and a graphics backend
//!
//! Recipes compute everything a chart needs and describe it as a
//! [`PlotSpec`]. Drawing, color mapping, fonts, legends and export belong to
//! the backend implementing [`PlotRenderer`].

use crate::bar::StackedBarSpec;
use crate::box_plot::BoxPlotSpec;
use crate::correlation::TextAnnotation;
use crate::ridge::RidgeSpec;
use crate::rug::DensityRugSpec;
use crate::scatter::ScatterSpec;
use gp_core::PlotResult;

/// A renderer-independent description of one chart element
#[derive(Debug, Clone)]
pub enum PlotSpec {
    Scatter(ScatterSpec),
    Ridge(RidgeSpec),
    StackedBar(StackedBarSpec),
    DensityRug(DensityRugSpec),
    BoxPlot(BoxPlotSpec),
    Text(TextAnnotation),
}

impl PlotSpec {
    /// Short name of the chart kind, used in log messages
    pub fn kind(&self) -> &'static str {
        match self {
            PlotSpec::Scatter(_) => "scatter",
            PlotSpec::Ridge(_) => "ridge",
            PlotSpec::StackedBar(_) => "stacked_bar",
            PlotSpec::DensityRug(_) => "density_rug",
            PlotSpec::BoxPlot(_) => "box_plot",
            PlotSpec::Text(_) => "text",
        }
    }
}

/// A graphics backend that draws plot specs
pub trait PlotRenderer {
    /// Draw one spec; backend errors are returned unchanged to the caller
    fn render(&mut self, spec: &PlotSpec) -> PlotResult<()>;
}

/// Renderer that keeps every spec it is handed.
///
/// Useful for headless pipelines that serialize or inspect the computed
/// charts instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    specs: Vec<PlotSpec>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specs(&self) -> &[PlotSpec] {
        &self.specs
    }

    pub fn last(&self) -> Option<&PlotSpec> {
        self.specs.last()
    }

    pub fn into_specs(self) -> Vec<PlotSpec> {
        self.specs
    }
}

impl PlotRenderer for RecordingRenderer {
    fn render(&mut self, spec: &PlotSpec) -> PlotResult<()> {
        tracing::debug!("Recording {} spec", spec.kind());
        self.specs.push(spec.clone());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::correlation::AnnotationLoc;
    use gp_core::{PlotError, PlotOptions};

    /// Renderer that rejects everything, for error propagation tests
    pub(crate) struct FailingRenderer;

    impl PlotRenderer for FailingRenderer {
        fn render(&mut self, _spec: &PlotSpec) -> PlotResult<()> {
            Err(PlotError::Numerical("backend unavailable".to_string()))
        }
    }

    fn text(label: &str) -> PlotSpec {
        PlotSpec::Text(TextAnnotation {
            text: label.to_string(),
            loc: AnnotationLoc::UpperLeft,
            position: AnnotationLoc::UpperLeft.anchor(),
            options: PlotOptions::new(),
        })
    }

    #[test]
    fn test_recording_renderer_keeps_order() {
        let mut renderer = RecordingRenderer::new();
        renderer.render(&text("a")).unwrap();
        renderer.render(&text("b")).unwrap();

        assert_eq!(renderer.specs().len(), 2);
        assert_eq!(renderer.last().map(PlotSpec::kind), Some("text"));
        match &renderer.into_specs()[0] {
            PlotSpec::Text(t) => assert_eq!(t.text, "a"),
            other => panic!("unexpected spec {:?}", other),
        }
    }

    #[test]
    fn test_failing_renderer() {
        assert!(matches!(
            FailingRenderer.render(&text("a")),
            Err(PlotError::Numerical(_))
        ));
    }
}
