//! Borrowed views over dense prediction maps.
//!
//! `FeatureMap` wraps a contiguous `f32` buffer laid out as `(N, C, H, W)`,
//! the channel-major layout a detector head emits. Each channel of one batch
//! entry is a contiguous `H * W` plane, which is how the proposal stage reads
//! scores and deltas back out per anchor.

use crate::util::math::checked_volume;
use crate::util::{ProposalError, ProposalResult};

/// Borrowed `(N, C, H, W)` tensor view.
#[derive(Copy, Clone, Debug)]
pub struct FeatureMap<'a> {
    data: &'a [f32],
    batch: usize,
    channels: usize,
    height: usize,
    width: usize,
}

impl<'a> FeatureMap<'a> {
    /// Creates a view, checking that `data` holds exactly `N * C * H * W`
    /// elements.
    ///
    /// Zero-sized dimensions are allowed; they describe an empty prediction
    /// set.
    pub fn new(
        data: &'a [f32],
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
    ) -> ProposalResult<Self> {
        let needed = checked_volume(&[batch, channels, height, width]).ok_or(
            ProposalError::InvalidDimensions {
                batch,
                channels,
                height,
                width,
            },
        )?;
        if data.len() != needed {
            return Err(ProposalError::ShapeMismatch {
                expected: needed,
                got: data.len(),
                context: "map buffer length",
            });
        }
        Ok(Self {
            data,
            batch,
            channels,
            height,
            width,
        })
    }

    /// Creates a view from a `[N, C, H, W]` shape array.
    pub fn from_shape(data: &'a [f32], shape: [usize; 4]) -> ProposalResult<Self> {
        Self::new(data, shape[0], shape[1], shape[2], shape[3])
    }

    /// Number of images in the map.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of channels per image.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Spatial height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Spatial width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Shape as `[N, C, H, W]`.
    pub fn shape(&self) -> [usize; 4] {
        [self.batch, self.channels, self.height, self.width]
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the contiguous `H * W` plane of channel `c` in image `n`.
    pub fn plane(&self, n: usize, c: usize) -> Option<&'a [f32]> {
        if n >= self.batch || c >= self.channels {
            return None;
        }
        let plane_len = self.height * self.width;
        let start = (n * self.channels + c) * plane_len;
        self.data.get(start..start + plane_len)
    }

    /// Returns the element at `(n, c, y, x)` if it is within bounds.
    pub fn get(&self, n: usize, c: usize, y: usize, x: usize) -> Option<f32> {
        if y >= self.height || x >= self.width {
            return None;
        }
        self.plane(n, c)?.get(y * self.width + x).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureMap;
    use crate::util::ProposalError;

    #[test]
    fn planes_are_channel_major() {
        let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
        let map = FeatureMap::new(&data, 2, 3, 2, 2).unwrap();
        assert_eq!(map.plane(0, 1).unwrap(), &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(map.plane(1, 0).unwrap(), &[12.0, 13.0, 14.0, 15.0]);
        assert_eq!(map.get(1, 2, 1, 0), Some(22.0));
        assert!(map.plane(2, 0).is_none());
        assert!(map.get(0, 0, 2, 0).is_none());
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let data = [0.0f32; 7];
        let err = FeatureMap::new(&data, 1, 2, 2, 2).unwrap_err();
        assert_eq!(
            err,
            ProposalError::ShapeMismatch {
                expected: 8,
                got: 7,
                context: "map buffer length",
            }
        );
    }

    #[test]
    fn rejects_overflowing_shape() {
        let err = FeatureMap::new(&[], 1, usize::MAX, 2, 2).unwrap_err();
        assert!(matches!(err, ProposalError::InvalidDimensions { .. }));
    }

    #[test]
    fn empty_maps_are_allowed() {
        let map = FeatureMap::new(&[], 1, 0, 4, 4).unwrap();
        assert_eq!(map.shape(), [1, 0, 4, 4]);
        assert!(map.plane(0, 0).is_none());
    }
}
