//! The batch tensor buffer and the descriptor handed to inference.
//!
//! After resizing and padding, all images in a batch share one shape and are
//! assembled into a single [`BatchTensor`]. Inference engines consume a
//! [`TensorView`] that borrows the buffer's data and copies its metadata;
//! the pixel data itself is never duplicated.

use ndarray::ArrayView4;

/// A 4-dimensional tensor represented as a 4D array of f32 values.
pub type Tensor4D = ndarray::Array4<f32>;

/// Element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// 32-bit floating point.
    F32,
}

/// The device a tensor's data lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Host memory.
    Cpu,
    /// GPU memory.
    Gpu,
}

/// Memory layout of the assembled batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// Planar: `[batch, channel, height, width]`.
    Nchw,
    /// Interleaved: `[batch, height, width, channel]`.
    Nhwc,
}

/// The single tensor assembled from all images of a batch.
///
/// Owns the data; [`BatchTensor::as_view`] hands out borrowing descriptors
/// for downstream consumers.
#[derive(Debug)]
pub struct BatchTensor {
    data: Tensor4D,
    layout: TensorLayout,
    device: DeviceKind,
    device_id: i32,
}

impl BatchTensor {
    /// Wraps an assembled host tensor.
    pub fn new(data: Tensor4D, layout: TensorLayout) -> Self {
        Self {
            data,
            layout,
            device: DeviceKind::Cpu,
            device_id: 0,
        }
    }

    /// Returns the tensor shape as `[batch, d1, d2, d3]`.
    pub fn shape(&self) -> [usize; 4] {
        let (n, d1, d2, d3) = self.data.dim();
        [n, d1, d2, d3]
    }

    /// Returns the memory layout.
    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Returns the device the data lives on.
    pub fn device(&self) -> DeviceKind {
        self.device
    }

    /// Returns the device index.
    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    /// Returns the underlying array.
    pub fn data(&self) -> &Tensor4D {
        &self.data
    }

    /// Creates a descriptor viewing this buffer's data.
    ///
    /// Shape, element type, device kind, and device index are copied from
    /// the buffer's own metadata; the data is borrowed, not copied.
    pub fn as_view(&self) -> TensorView<'_> {
        TensorView {
            shape: self.shape(),
            dtype: DType::F32,
            layout: self.layout,
            data: self.data.view(),
            device: self.device,
            device_id: self.device_id,
        }
    }
}

/// A borrowing tensor descriptor for an inference engine.
#[derive(Debug, Clone)]
pub struct TensorView<'a> {
    /// Tensor shape as `[batch, d1, d2, d3]`.
    pub shape: [usize; 4],
    /// Element type.
    pub dtype: DType,
    /// Memory layout.
    pub layout: TensorLayout,
    /// View of the underlying data.
    pub data: ArrayView4<'a, f32>,
    /// Device the data lives on.
    pub device: DeviceKind,
    /// Device index.
    pub device_id: i32,
}

impl TensorView<'_> {
    /// Returns a raw pointer to the first element.
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    /// Returns the total number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Returns true if the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
