//! Moves a cluster's centroid to the image midpoint and clamps it into frame.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use crate::cluster::Cluster;
use crate::error::{Error, Result};
use crate::image::ImageSize;
use std::cmp::Ordering;

/// `sum / count` rounded to the nearest integer, ties to even.
fn rounded_mean(sum: i128, count: i128) -> i128 {
    let floor = sum.div_euclid(count);
    match (2 * sum.rem_euclid(count)).cmp(&count) {
        Ordering::Less => floor,
        Ordering::Greater => floor + 1,
        Ordering::Equal if floor % 2 == 0 => floor,
        Ordering::Equal => floor + 1,
    }
}

/// Integer centroid of the cluster's coordinates.
///
/// Each coordinate mean is rounded half-to-even, so a mean of `2.5` becomes
/// `2` and `3.5` becomes `4`. The mean is computed exactly for any `i64`
/// coordinates.
///
/// # Errors
/// Returns [`Error::EmptyCluster`] if the cluster has no hits.
pub fn rounded_centroid(cluster: &Cluster) -> Result<(i64, i64)> {
    if cluster.is_empty() {
        return Err(Error::EmptyCluster);
    }
    let n = cluster.len() as i128;
    let sum_x: i128 = cluster.x.iter().map(|&x| i128::from(x)).sum();
    let sum_y: i128 = cluster.y.iter().map(|&y| i128::from(y)).sum();

    // A rounded mean of i64 values always lies within the i64 range.
    let mean_x = rounded_mean(sum_x, n).clamp(i64::MIN.into(), i64::MAX.into());
    let mean_y = rounded_mean(sum_y, n).clamp(i64::MIN.into(), i64::MAX.into());
    Ok((mean_x as i64, mean_y as i64))
}

/// Offset that carries the rounded centroid onto `size.center()`.
///
/// The offset can exceed the `i64` range for extreme coordinates, so it is
/// returned as `i128`.
///
/// # Errors
/// Returns [`Error::EmptyCluster`] if the cluster has no hits.
pub fn centering_shift(cluster: &Cluster, size: ImageSize) -> Result<(i128, i128)> {
    let (mean_x, mean_y) = rounded_centroid(cluster)?;
    let (cx, cy) = size.center();
    Ok((
        cx as i128 - i128::from(mean_x),
        cy as i128 - i128::from(mean_y),
    ))
}

fn shift_and_clamp(value: i64, shift: i128, max: i128) -> i64 {
    (i128::from(value) + shift).clamp(0, max) as i64
}

/// Shifts every hit by the centering offset, then clamps each coordinate to
/// `[0, width - 1]` and `[0, height - 1]`.
///
/// Energies are untouched. Several hits may end up on the same clamped cell.
/// Returns the shift that was applied (before clamping).
///
/// # Errors
/// Returns [`Error::EmptyCluster`] if the cluster has no hits, or
/// [`Error::InvalidImageSize`] if `size` has a zero dimension.
pub fn center_cluster(cluster: &mut Cluster, size: ImageSize) -> Result<(i128, i128)> {
    size.validate()?;
    let (dx, dy) = centering_shift(cluster, size)?;
    let max_x = (size.width as i128 - 1).min(i64::MAX.into());
    let max_y = (size.height as i128 - 1).min(i64::MAX.into());

    for x in &mut cluster.x {
        *x = shift_and_clamp(*x, dx, max_x);
    }
    for y in &mut cluster.y {
        *y = shift_and_clamp(*y, dy, max_y);
    }
    Ok((dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Hit;

    fn cluster(hits: &[(i64, i64)]) -> Cluster {
        hits.iter().map(|&(x, y)| Hit::new(x, y, 1.0)).collect()
    }

    #[test]
    fn test_centroid_rounds_half_to_even() {
        // mean x = 2.5 -> 2, mean y = 3.5 -> 4
        let c = cluster(&[(2, 3), (3, 4)]);
        assert_eq!(rounded_centroid(&c).unwrap(), (2, 4));

        // mean x = 0.5 -> 0, mean y = -0.5 -> -0
        let c = cluster(&[(0, 0), (1, -1)]);
        assert_eq!(rounded_centroid(&c).unwrap(), (0, 0));

        // mean x = 1.5 -> 2
        let c = cluster(&[(1, 0), (2, 0)]);
        assert_eq!(rounded_centroid(&c).unwrap(), (2, 0));
    }

    #[test]
    fn test_centroid_exact_beyond_f64_precision() {
        // 2^53 + 1 is not representable as f64
        let c = cluster(&[(9_007_199_254_740_993, 5)]);
        assert_eq!(rounded_centroid(&c).unwrap(), (9_007_199_254_740_993, 5));

        // mean = i64::MAX - 0.5, ties to the even neighbour i64::MAX - 1
        let c = cluster(&[(i64::MAX, 0), (i64::MAX - 1, 0)]);
        assert_eq!(rounded_centroid(&c).unwrap().0, i64::MAX - 1);

        let c = cluster(&[(i64::MIN, i64::MIN), (i64::MIN, i64::MIN)]);
        assert_eq!(rounded_centroid(&c).unwrap(), (i64::MIN, i64::MIN));
    }

    #[test]
    fn test_extreme_shift_does_not_overflow() {
        let size = ImageSize::square(12).unwrap();
        let mut c = cluster(&[(i64::MIN, 5), (i64::MIN + 2, 7)]);
        let (dx, _) = center_cluster(&mut c, size).unwrap();
        assert_eq!(dx, 6 - (i128::from(i64::MIN) + 1));
        assert_eq!(c.x, vec![5, 7]);
        assert_eq!(c.y, vec![5, 7]);
    }

    #[test]
    fn test_empty_cluster_fails() {
        let mut c = Cluster::default();
        assert_eq!(rounded_centroid(&c), Err(Error::EmptyCluster));
        assert_eq!(
            center_cluster(&mut c, ImageSize::square(4).unwrap()),
            Err(Error::EmptyCluster)
        );
    }

    #[test]
    fn test_two_hit_example() {
        // centroid (2, 3), center (2, 2): shift (0, -1)
        let mut c = cluster(&[(1, 2), (3, 4)]);
        let shift = center_cluster(&mut c, ImageSize::square(4).unwrap()).unwrap();
        assert_eq!(shift, (0, -1));
        assert_eq!(c.x, vec![1, 3]);
        assert_eq!(c.y, vec![1, 3]);
    }

    #[test]
    fn test_already_centered_is_noop() {
        let size = ImageSize::new(8, 6).unwrap();
        let mut c = cluster(&[(3, 2), (4, 3), (5, 4)]);
        let before = c.clone();
        assert_eq!(center_cluster(&mut c, size).unwrap(), (0, 0));
        assert_eq!(c, before);
    }

    #[test]
    fn test_single_hit_lands_on_midpoint() {
        let coords = [
            (0, 0),
            (255, 17),
            (-40, 1000),
            (i64::from(i32::MAX), -7),
            (9_007_199_254_740_993, 5),
            (i64::MIN, 5),
            (i64::MAX, i64::MIN),
        ];
        for &(x, y) in &coords {
            for &(w, h) in &[(1, 1), (4, 4), (12, 12), (7, 3)] {
                let size = ImageSize::new(w, h).unwrap();
                let mut c = cluster(&[(x, y)]);
                center_cluster(&mut c, size).unwrap();
                let (cx, cy) = size.center();
                assert_eq!((c.x[0], c.y[0]), (cx as i64, cy as i64));
            }
        }
    }

    #[test]
    fn test_outliers_are_clamped_into_frame() {
        let size = ImageSize::new(5, 3).unwrap();
        let mut c = cluster(&[(0, 0), (100, 50), (-100, -50), (1, 1)]);
        center_cluster(&mut c, size).unwrap();

        assert!(c.iter().all(|hit| hit.in_bounds(size.width, size.height)));
        assert_eq!(c.get(1).map(|h| (h.x, h.y)), Some((4, 2)));
        assert_eq!(c.get(2).map(|h| (h.x, h.y)), Some((0, 0)));
    }

    #[test]
    fn test_all_coordinates_in_bounds() {
        let sizes = [(1, 1), (2, 3), (4, 4), (12, 12), (31, 7)];
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for &(w, h) in &sizes {
            let size = ImageSize::new(w, h).unwrap();
            for _ in 0..50 {
                let mut c = Cluster::default();
                for _ in 0..(seed % 9 + 1) {
                    // xorshift
                    seed ^= seed << 13;
                    seed ^= seed >> 7;
                    seed ^= seed << 17;
                    let x = (seed % 2000) as i64 - 1000;
                    let y = ((seed >> 16) % 2000) as i64 - 1000;
                    c.push(x, y, 1.0);
                }
                center_cluster(&mut c, size).unwrap();
                for hit in c.iter() {
                    assert!(hit.x >= 0 && (hit.x as usize) < w);
                    assert!(hit.y >= 0 && (hit.y as usize) < h);
                }
            }
        }
    }
}
