use std::cell::RefCell;
use std::rc::Rc;

use crate::bars::{BarDragBinding, BarGeometry};
use crate::geom::ScreenRect;
use crate::value_drag::ValueDragBinding;

pub(crate) type SharedListener = Rc<RefCell<Option<Box<dyn FnMut(&[f64])>>>>;

// Committed values and the preview are shared with drag callbacks, which run
// while the view state is not borrowed.
pub(crate) struct ViewState {
    pub(crate) committed: Rc<RefCell<Vec<f64>>>,
    pub(crate) preview: Rc<RefCell<Option<Vec<BarGeometry>>>>,
    pub(crate) listener: SharedListener,
    pub(crate) marker_value: Option<f64>,
    pub(crate) bars: Option<BarDragBinding>,
    pub(crate) marker: Option<ValueDragBinding>,
    pub(crate) plot_rect: Option<ScreenRect>,
}

impl ViewState {
    pub(crate) fn new(values: Vec<f64>, marker_value: Option<f64>) -> Self {
        Self {
            committed: Rc::new(RefCell::new(values)),
            preview: Rc::new(RefCell::new(None)),
            listener: Rc::new(RefCell::new(None)),
            marker_value,
            bars: None,
            marker: None,
            plot_rect: None,
        }
    }

    pub(crate) fn marker(&self) -> Option<f64> {
        match &self.marker {
            Some(binding) => Some(binding.value()),
            None => self.marker_value,
        }
    }

    /// Drop every binding so the next frame attaches fresh ones.
    pub(crate) fn detach_all(&mut self) {
        if let Some(marker) = &self.marker {
            self.marker_value = Some(marker.value());
        }
        self.bars = None;
        self.marker = None;
        self.plot_rect = None;
        self.preview.replace(None);
    }
}
