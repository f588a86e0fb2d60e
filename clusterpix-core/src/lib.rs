//! clusterpix-core: Core types and transforms for cluster rasterization.
//!
//! This crate turns a parsed detector cluster into a fixed-size image:
//! energies are rescaled against a global [`EnergyRange`], coordinates are
//! centered and clamped into an [`ImageSize`] frame, and the result is
//! rasterized into an `ndarray` grid.
//!

pub mod centering;
pub mod cluster;
pub mod energy;
pub mod error;
pub mod hit;
pub mod image;
pub mod raster;

pub use centering::{center_cluster, centering_shift, rounded_centroid};
pub use cluster::Cluster;
pub use energy::{normalize_energy, EnergyBounds, EnergyRange};
pub use error::{Error, Result};
pub use hit::Hit;
pub use image::ImageSize;
pub use raster::{rasterize, Image};

/// Runs normalize, center and rasterize on one cluster.
///
/// # Errors
/// Returns [`Error::EmptyCluster`] if the cluster has no hits, or
/// [`Error::InvalidImageSize`] if `size` has a zero dimension.
pub fn cluster_to_image(
    mut cluster: Cluster,
    range: EnergyRange,
    size: ImageSize,
) -> Result<Image> {
    normalize_energy(&mut cluster, range);
    center_cluster(&mut cluster, size)?;
    Ok(rasterize(&cluster, size))
}
