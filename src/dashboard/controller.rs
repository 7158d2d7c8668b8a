//! Active view and tab tracking with render notification.

use crate::core::errors::{Result, SpmError};
use crate::dashboard::view::View;

/// Receives a render request every time the visible view or tab changes.
///
/// Implemented by the presentation layer. Any `FnMut(View, Option<&str>)`
/// closure can be used directly.
pub trait RenderSink {
    /// Draw `view` with `tab` selected (`None` for views without tabs).
    fn render(&mut self, view: View, tab: Option<&str>);
}

impl<F> RenderSink for F
where
    F: FnMut(View, Option<&str>),
{
    fn render(&mut self, view: View, tab: Option<&str>) {
        self(view, tab);
    }
}

/// Owns the current view and the current tab within a tabbed view.
///
/// The controller keeps no history: cancel or back signals never change the
/// view.
pub struct ViewController {
    view: View,
    tab: Option<&'static str>,
    renderer: Box<dyn RenderSink>,
}

impl std::fmt::Debug for ViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("view", &self.view)
            .field("tab", &self.tab)
            .finish_non_exhaustive()
    }
}

impl ViewController {
    /// Create a controller showing [`View::Overview`].
    pub fn new(renderer: impl RenderSink + 'static) -> Self {
        Self::with_view(View::default(), renderer)
    }

    /// Create a controller showing `view` with its default tab. No render fires.
    pub fn with_view(view: View, renderer: impl RenderSink + 'static) -> Self {
        Self {
            view,
            tab: view.default_tab(),
            renderer: Box::new(renderer),
        }
    }

    /// Show `view`, resetting the tab to the view's default tab.
    ///
    /// Renders exactly once, even when `view` is already current.
    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        self.tab = view.default_tab();
        tracing::debug!(view = %view, tab = ?self.tab, "view switched");
        self.rerender();
    }

    /// Show the view named by `id`. Unknown identifiers change nothing.
    pub fn switch_view_named(&mut self, id: &str) -> Result<View> {
        let view = id.parse::<View>()?;
        self.switch_view(view);
        Ok(view)
    }

    /// Select `tab` within the current view.
    ///
    /// Fails with [`SpmError::InvalidTab`] when the current view has no tab
    /// by that name (including views without tabs). No render on failure.
    pub fn switch_tab(&mut self, tab: &str) -> Result<()> {
        let resolved = self
            .view
            .find_tab(tab)
            .ok_or_else(|| SpmError::InvalidTab {
                view: self.view.id(),
                tab: tab.to_string(),
            })?;
        self.tab = Some(resolved);
        tracing::debug!(view = %self.view, tab = resolved, "tab switched");
        self.rerender();
        Ok(())
    }

    /// Re-issue a render for the current state without changing it.
    pub fn rerender(&mut self) {
        self.renderer.render(self.view, self.tab);
    }

    /// View currently shown.
    #[must_use]
    pub const fn current_view(&self) -> View {
        self.view
    }

    /// Active tab, or `None` when the current view has no tabs.
    #[must_use]
    pub const fn current_tab(&self) -> Option<&'static str> {
        self.tab
    }
}
