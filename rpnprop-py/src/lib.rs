//! Python bindings for the rpnprop region proposal stage.
//!
//! Exposes a `ProposalCreator` callable over numpy arrays with the argument
//! order of the classic Faster R-CNN proposal layer.

use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2, PyReadonlyArray4, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use rpnprop::{
    AnchorLayout, BBox, FeatureMap, ImageSize, Mode, ProposalConfig as RustProposalConfig,
    ProposalCreator as RustProposalCreator, ProposalError,
};

/// Convert a ProposalError to a Python exception.
fn to_py_err(err: ProposalError) -> PyErr {
    match err {
        ProposalError::AcceleratorUnavailable => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn parse_layout(layout: &str) -> PyResult<AnchorLayout> {
    match layout.to_lowercase().as_str() {
        "position_major" => Ok(AnchorLayout::PositionMajor),
        "shape_major" => Ok(AnchorLayout::ShapeMajor),
        _ => Err(PyValueError::new_err("layout must be 'position_major' or 'shape_major'")),
    }
}

fn map_shape(shape: &[usize]) -> PyResult<[usize; 4]> {
    match shape {
        [n, c, h, w] => Ok([*n, *c, *h, *w]),
        _ => Err(PyValueError::new_err("prediction maps must be 4-dimensional")),
    }
}

/// Generates region proposals from RPN outputs.
#[pyclass]
pub struct ProposalCreator {
    inner: RustProposalCreator,
}

#[pymethods]
impl ProposalCreator {
    /// Create a new ProposalCreator.
    ///
    /// Args:
    ///     use_accelerated_nms: Use the parallel suppressor (default: True)
    ///     nms_thresh: IoU threshold for suppression (default: 0.7)
    ///     train_pre_nms_top_n: Candidates kept before NMS in train mode (default: 12000)
    ///     train_post_nms_top_n: Proposals kept after NMS in train mode (default: 2000)
    ///     test_pre_nms_top_n: Candidates kept before NMS in test mode (default: 6000)
    ///     test_post_nms_top_n: Proposals kept after NMS in test mode (default: 300)
    ///     min_size: Minimum box side at scale 1.0 (default: 16.0)
    ///     layout: "position_major" or "shape_major" (default: "position_major")
    #[new]
    #[pyo3(signature = (
        use_accelerated_nms = true,
        nms_thresh = 0.7,
        train_pre_nms_top_n = 12000,
        train_post_nms_top_n = 2000,
        test_pre_nms_top_n = 6000,
        test_post_nms_top_n = 300,
        min_size = 16.0,
        layout = "position_major"
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        use_accelerated_nms: bool,
        nms_thresh: f32,
        train_pre_nms_top_n: usize,
        train_post_nms_top_n: usize,
        test_pre_nms_top_n: usize,
        test_post_nms_top_n: usize,
        min_size: f32,
        layout: &str,
    ) -> PyResult<Self> {
        let cfg = RustProposalConfig {
            suppression_iou_threshold: nms_thresh,
            train_pre_budget: train_pre_nms_top_n,
            train_post_budget: train_post_nms_top_n,
            eval_pre_budget: test_pre_nms_top_n,
            eval_post_budget: test_post_nms_top_n,
            min_object_side: min_size,
            prefer_accelerated_suppression: use_accelerated_nms,
            anchor_layout: parse_layout(layout)?,
        };
        let inner = RustProposalCreator::new(cfg).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Generate proposals for one image.
    ///
    /// Args:
    ///     bbox_pred: float32 array (1, 4A, H, W) of box deltas
    ///     cls_prob: float32 array (1, 2A, H, W) of background/foreground scores
    ///     anchor: float32 array (R, 4) of anchors, R = A * H * W
    ///     img_size: (width, height) after scaling
    ///     scale: Factor the image was resized by (default: 1.0)
    ///     train: Use training budgets (default: False)
    ///
    /// Returns:
    ///     float32 array (K, 5) of (batch_index, x1, y1, x2, y2) rows
    #[pyo3(signature = (bbox_pred, cls_prob, anchor, img_size, scale = 1.0, train = false))]
    fn __call__<'py>(
        &self,
        py: Python<'py>,
        bbox_pred: PyReadonlyArray4<'py, f32>,
        cls_prob: PyReadonlyArray4<'py, f32>,
        anchor: PyReadonlyArray2<'py, f32>,
        img_size: (f32, f32),
        scale: f32,
        train: bool,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let delta_map = FeatureMap::from_shape(bbox_pred.as_slice()?, map_shape(bbox_pred.shape())?)
            .map_err(to_py_err)?;
        let score_map = FeatureMap::from_shape(cls_prob.as_slice()?, map_shape(cls_prob.shape())?)
            .map_err(to_py_err)?;

        if anchor.shape()[1] != 4 {
            return Err(PyValueError::new_err("anchor must have shape (R, 4)"));
        }
        let anchors: Vec<BBox> = anchor
            .as_slice()?
            .chunks_exact(4)
            .map(|c| BBox::new(c[0], c[1], c[2], c[3]))
            .collect();

        let mode = if train { Mode::Train } else { Mode::Eval };
        let rois = self
            .inner
            .propose(
                &score_map,
                &delta_map,
                &anchors,
                ImageSize::new(img_size.0, img_size.1),
                scale,
                mode,
            )
            .map_err(to_py_err)?;

        let rows = rois.len();
        let flat: Vec<f32> = rois.iter().flat_map(|roi| roi.to_array()).collect();
        let array = Array2::from_shape_vec((rows, 5), flat)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(array.into_pyarray(py))
    }

    fn __repr__(&self) -> String {
        let cfg = self.inner.config();
        format!(
            "ProposalCreator(nms_thresh={}, train_top_n=({}, {}), test_top_n=({}, {}), \
             min_size={}, accelerated={})",
            cfg.suppression_iou_threshold,
            cfg.train_pre_budget,
            cfg.train_post_budget,
            cfg.eval_pre_budget,
            cfg.eval_post_budget,
            cfg.min_object_side,
            cfg.prefer_accelerated_suppression
        )
    }
}

/// Python module for rpnprop.
#[pymodule]
fn _rpnprop(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ProposalCreator>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
