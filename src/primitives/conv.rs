//! 2-D convolution forward pass

use crate::desc::{ConvDesc, FilterDesc, TensorDesc};
use crate::error::{MedirError, Result};
use crate::tensor::Tensor;

fn desc_from_tensor(t: &Tensor<f32>, what: &str) -> Result<TensorDesc> {
    let shape = t.shape();
    if shape.len() != 4 {
        return Err(MedirError::InvalidShape {
            reason: format!("{what} must be 4-D (NCHW), got {:?}", shape),
        });
    }
    TensorDesc::new(shape[0], shape[1], shape[2], shape[3])
}

/// Direct 2-D convolution forward pass over NCHW tensors
///
/// Computes cross-correlation (no kernel flip) with zero padding:
///
/// ```text
/// out[n][k][oh][ow] = sum over c, kh, kw of
///     in[n][c][oh*stride - pad + kh*dilation][ow*stride - pad + kw*dilation]
///     * filter[k][c][kh][kw]
/// ```
///
/// Out-of-bounds taps read as zero. The output shape follows
/// [`ConvDesc::output_desc`].
///
/// # Errors
///
/// Returns `InvalidShape` if either tensor is not 4-D, if the filter
/// tensor's shape disagrees with the filter descriptor implied by the
/// input, or if the geometry is invalid per `output_desc`.
pub fn conv2d_forward(
    input: &Tensor<f32>,
    filter: &Tensor<f32>,
    conv: &ConvDesc,
) -> Result<Tensor<f32>> {
    let in_desc = desc_from_tensor(input, "Convolution input")?;
    let f_shape = filter.shape();
    if f_shape.len() != 4 {
        return Err(MedirError::InvalidShape {
            reason: format!("Convolution filter must be 4-D (KCHW), got {:?}", f_shape),
        });
    }
    let filt_desc = FilterDesc::new(f_shape[0], f_shape[1], f_shape[2], f_shape[3])?;
    let out_desc = conv.output_desc(&in_desc, &filt_desc)?;

    let x = input.data();
    let w = filter.data();
    let mut out = vec![0.0f32; out_desc.element_count()];

    let (ih, iw) = (in_desc.h, in_desc.w);
    let (oh, ow) = (out_desc.h, out_desc.w);

    for n in 0..in_desc.n {
        for k in 0..filt_desc.k {
            for oy in 0..oh {
                for ox in 0..ow {
                    let mut acc = 0.0f32;
                    for c in 0..in_desc.c {
                        let x_plane = ((n * in_desc.c + c) * ih) * iw;
                        let w_plane = ((k * filt_desc.c + c) * filt_desc.h) * filt_desc.w;
                        for ky in 0..filt_desc.h {
                            // Signed arithmetic: taps can land in the padding
                            let iy = (oy * conv.stride_h + ky * conv.dilation_h) as isize
                                - conv.pad_h as isize;
                            if iy < 0 || iy >= ih as isize {
                                continue;
                            }
                            for kx in 0..filt_desc.w {
                                let ix = (ox * conv.stride_w + kx * conv.dilation_w) as isize
                                    - conv.pad_w as isize;
                                if ix < 0 || ix >= iw as isize {
                                    continue;
                                }
                                let x_idx = x_plane + iy as usize * iw + ix as usize;
                                let w_idx = w_plane + ky * filt_desc.w + kx;
                                acc += x[x_idx] * w[w_idx];
                            }
                        }
                    }
                    let out_idx = ((n * out_desc.c + k) * oh + oy) * ow + ox;
                    out[out_idx] = acc;
                }
            }
        }
    }

    Tensor::from_vec(out_desc.dims(), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv_identity_kernel() {
        // 1x1 kernel of weight 1 is the identity
        let input = Tensor::from_vec(vec![1, 1, 2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let filter = Tensor::from_vec(vec![1, 1, 1, 1], vec![1.0]).unwrap();
        let out = conv2d_forward(&input, &filter, &ConvDesc::default()).unwrap();
        assert_eq!(out.shape(), &[1, 1, 2, 2]);
        assert_eq!(out.data(), input.data());
    }

    #[test]
    fn test_conv_box_kernel_values() {
        // 3x3 input, 2x2 all-ones kernel: each output is a window sum
        let input = Tensor::from_vec(
            vec![1, 1, 3, 3],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )
        .unwrap();
        let filter = Tensor::from_vec(vec![1, 1, 2, 2], vec![1.0; 4]).unwrap();
        let out = conv2d_forward(&input, &filter, &ConvDesc::default()).unwrap();
        assert_eq!(out.shape(), &[1, 1, 2, 2]);
        assert_eq!(out.data(), &[12.0, 16.0, 24.0, 28.0]);
    }

    #[test]
    fn test_conv_padding_zero_fills() {
        // Same-pad 1x1 input: corners of the 3x3 kernel see only padding
        let input = Tensor::from_vec(vec![1, 1, 1, 1], vec![2.0]).unwrap();
        let filter = Tensor::from_vec(vec![1, 1, 3, 3], vec![1.0; 9]).unwrap();
        let conv = ConvDesc::new(1, 1, 1, 1).unwrap();
        let out = conv2d_forward(&input, &filter, &conv).unwrap();
        assert_eq!(out.shape(), &[1, 1, 1, 1]);
        // Only the center tap lands on data
        assert_eq!(out.data(), &[2.0]);
    }

    #[test]
    fn test_conv_multi_channel_sums() {
        // Two input channels, each contributing its value
        let input =
            Tensor::from_vec(vec![1, 2, 1, 1], vec![3.0, 5.0]).unwrap();
        let filter = Tensor::from_vec(vec![1, 2, 1, 1], vec![1.0, 1.0]).unwrap();
        let out = conv2d_forward(&input, &filter, &ConvDesc::default()).unwrap();
        assert_eq!(out.data(), &[8.0]);
    }

    #[test]
    fn test_conv_rejects_non_4d() {
        let input = Tensor::from_vec(vec![4], vec![0.0; 4]).unwrap();
        let filter = Tensor::from_vec(vec![1, 1, 1, 1], vec![1.0]).unwrap();
        assert!(conv2d_forward(&input, &filter, &ConvDesc::default()).is_err());
    }
}
