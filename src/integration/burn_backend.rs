//! Burn inference backend for the detector.
//!
//! This module provides a `BurnDetector` that implements `Detector` for
//! detection networks built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use balltrack_rs::integration::{BurnDetector, BurnModel};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(
//!         &self,
//!         input: burn::tensor::Tensor<NdArray, 4>,
//!     ) -> Vec<burn::tensor::Tensor<NdArray, 2>> {
//!         // Run inference, one tensor per output layer
//!     }
//! }
//!
//! let model = MyYoloModel::load("yolov3.bin");
//! let detector = BurnDetector::new(model, Default::default(), 416, 416);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::Detector;
use crate::detection::{DetectionOutputLayer, blob_from_frame};
use crate::frame::Frame;

/// Error type for Burn detection failures.
#[derive(Debug, Error)]
pub enum BurnDetectorError {
    #[error("empty input frame")]
    EmptyFrame,

    #[error("output tensor {layer} could not be read: {message}")]
    OutputRead { layer: usize, message: String },

    #[error(transparent)]
    Output(#[from] crate::error::Error),
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [1, 3, height, width], RGB in [0, 1]
    ///
    /// # Returns
    /// One `[rows, 5 + classes]` tensor per output layer.
    fn forward(&self, input: Tensor<B, 4>) -> Vec<Tensor<B, 2>>;
}

/// Burn-based object detector implementing `Detector`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    inp_width: u32,
    inp_height: u32,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model, device and network
    /// input size.
    pub fn new(model: M, device: B::Device, inp_width: u32, inp_height: u32) -> Self {
        Self {
            model,
            device,
            inp_width,
            inp_height,
        }
    }

    /// Preprocess a frame to a Burn tensor.
    pub fn preprocess(&self, frame: &Frame) -> Result<Tensor<B, 4>, BurnDetectorError> {
        if frame.is_empty() {
            return Err(BurnDetectorError::EmptyFrame);
        }

        let blob = blob_from_frame(frame, self.inp_width, self.inp_height);
        let (data, _) = blob.into_raw_vec_and_offset();

        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            3,
            self.inp_height as usize,
            self.inp_width as usize,
        ]);

        Ok(tensor)
    }

    /// Convert output tensors to `DetectionOutputLayer`s.
    fn postprocess(
        &self,
        outputs: Vec<Tensor<B, 2>>,
    ) -> Result<Vec<DetectionOutputLayer>, BurnDetectorError> {
        outputs
            .into_iter()
            .enumerate()
            .map(|(layer, tensor)| {
                let [_, columns] = tensor.dims();
                let values = tensor
                    .into_data()
                    .convert::<f32>()
                    .to_vec::<f32>()
                    .map_err(|e| BurnDetectorError::OutputRead {
                        layer,
                        message: format!("{e:?}"),
                    })?;
                Ok(DetectionOutputLayer::from_flat(values, columns, layer)?)
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> Detector for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn infer(&mut self, frame: &Frame) -> Result<Vec<DetectionOutputLayer>, Self::Error> {
        let tensor = self.preprocess(frame)?;
        let outputs = self.model.forward(tensor);
        self.postprocess(outputs)
    }
}
