/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 224;

/// R, G, B.
pub const CHANNELS: usize = 3;

/// `[batch, height, width, channels]`.
pub const TENSOR_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, CHANNELS];

/// Number of `f32` elements in a model input.
pub const TENSOR_LEN: usize = INPUT_SIZE as usize * INPUT_SIZE as usize * CHANNELS;

/// Model-ready input: `1×224×224×3` float32, row-major, RGB interleaved per
/// pixel, every value in `[-1, 1]`.
///
/// The length is fixed at construction; there is no way to build a
/// `Tensor` of any other shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
}

impl Tensor {
    /// Wraps an already normalized buffer. Returns `None` unless it holds
    /// exactly `TENSOR_LEN` values.
    pub fn from_vec(data: Vec<f32>) -> Option<Tensor> {
        (data.len() == TENSOR_LEN).then_some(Tensor { data })
    }

    pub fn shape(&self) -> [usize; 4] {
        TENSOR_SHAPE
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at pixel (`x`, `y`) channel `c`.
    pub fn at(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[(y * INPUT_SIZE as usize + x) * CHANNELS + c]
    }

    /// Raw native-endian byte view, as handed to engines that take a flat
    /// buffer. Always `TENSOR_LEN * 4` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_length_rejected() {
        assert!(Tensor::from_vec(vec![0.0; TENSOR_LEN - 1]).is_none());
        assert!(Tensor::from_vec(vec![0.0; TENSOR_LEN + 3]).is_none());
    }

    #[test]
    fn byte_view_is_four_bytes_per_element() {
        let t = Tensor::from_vec(vec![0.5; TENSOR_LEN]).unwrap();
        assert_eq!(t.to_bytes().len(), 224 * 224 * 3 * 4);
        assert_eq!(t.shape(), [1, 224, 224, 3]);
    }

    #[test]
    fn indexing_is_row_major_rgb() {
        let mut data = vec![0.0; TENSOR_LEN];
        // pixel (x=2, y=1), channel G
        data[(224 + 2) * 3 + 1] = 0.25;
        let t = Tensor::from_vec(data).unwrap();
        assert_eq!(t.at(2, 1, 1), 0.25);
        assert_eq!(t.at(1, 2, 1), 0.0);
    }
}
