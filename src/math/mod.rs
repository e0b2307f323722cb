pub mod matrix;
pub mod tensor;

pub use matrix::Matrix;
pub use tensor::{Tensor, CHANNELS, INPUT_SIZE, TENSOR_LEN, TENSOR_SHAPE};
