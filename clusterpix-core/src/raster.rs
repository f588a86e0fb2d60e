//! Rasterization of a centered cluster into a fixed-size energy image.
#![allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]

use crate::cluster::Cluster;
use crate::image::ImageSize;
use ndarray::Array2;

/// A single-cluster energy image, shape `(width, height)`, indexed `[[x, y]]`.
pub type Image = Array2<f64>;

/// Paints each hit's energy into a zero-filled image.
///
/// Hits outside the frame are skipped. When two hits share a cell the later
/// one in cluster order overwrites the earlier one; values are never summed.
#[must_use]
pub fn rasterize(cluster: &Cluster, size: ImageSize) -> Image {
    let mut image = Image::zeros(size.shape());
    for hit in cluster.iter() {
        if hit.in_bounds(size.width, size.height) {
            image[[hit.x as usize, hit.y as usize]] = hit.energy;
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Hit;
    use approx::assert_relative_eq;

    #[test]
    fn test_rasterize_places_energies() {
        let cluster: Cluster = [Hit::new(1, 1, 0.5), Hit::new(3, 3, 1.0)]
            .into_iter()
            .collect();
        let image = rasterize(&cluster, ImageSize::square(4).unwrap());

        assert_eq!(image.dim(), (4, 4));
        assert_relative_eq!(image[[1, 1]], 0.5);
        assert_relative_eq!(image[[3, 3]], 1.0);
        assert_relative_eq!(image.sum(), 1.5);
        assert_eq!(image.iter().filter(|&&v| v != 0.0).count(), 2);
    }

    #[test]
    fn test_last_write_wins() {
        let cluster: Cluster = [Hit::new(2, 1, 0.25), Hit::new(2, 1, 0.75)]
            .into_iter()
            .collect();
        let image = rasterize(&cluster, ImageSize::square(4).unwrap());
        assert_relative_eq!(image[[2, 1]], 0.75);
        assert_relative_eq!(image.sum(), 0.75);
    }

    #[test]
    fn test_axes_follow_x_then_y() {
        let cluster: Cluster = [Hit::new(4, 1, 1.0)].into_iter().collect();
        let image = rasterize(&cluster, ImageSize::new(5, 2).unwrap());
        assert_eq!(image.dim(), (5, 2));
        assert_relative_eq!(image[[4, 1]], 1.0);
    }

    #[test]
    fn test_out_of_bounds_hits_skipped() {
        let cluster: Cluster = [Hit::new(-1, 0, 1.0), Hit::new(0, 4, 1.0), Hit::new(9, 9, 1.0)]
            .into_iter()
            .collect();
        let image = rasterize(&cluster, ImageSize::square(4).unwrap());
        assert!(image.iter().all(|&v| v == 0.0));
    }
}
