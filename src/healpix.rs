//! # HEALPix pixelization adapter
//!
//! Hierarchical Equal Area isoLatitude Pixelization of the sphere, restricted to the primitives
//! the cadence pipeline needs:
//!
//! - conversion between the **ring** and **nested** indexing schemes,
//! - **subdivision** of a pixel into its descendants at a finer resolution,
//! - pixel **centers** as `(ra, dec)` in degrees,
//! - the **target resolution** needed to draw a given number of sub-pixels out of a base pixel.
//!
//! Resolutions are expressed as `nside`, always a power of two. A pixel at `nside` has exactly
//! `(nside_out / nside)²` descendants at `nside_out`, and in the nested scheme these descendants
//! are the contiguous id range `[id·f², (id+1)·f²)` with `f = nside_out / nside`.
//!
//! The twelve base pixels (faces) are laid out as:
//! - 0–3: north polar cap
//! - 4–7: equatorial belt
//! - 8–11: south polar cap
//!
//! Inside a face, `x` increases towards the north-east and `y` towards the north-west; the
//! nested sub-index interleaves the bits of `x` (even bits) and `y` (odd bits).
//!
//! All computations are integer based, following Górski et al. (2005), so centers are exactly
//! reproducible across platforms.

use std::f64::consts::FRAC_PI_2;

use crate::{
    cadence_errors::CadenceError,
    constants::{Degree, PixelId, MAX_ORDER},
    conversion::{rad_to_deg, wrap_ra},
};

/// Row (ring) offset of each face, in units of `nside`.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// Longitude offset of each face, in units of `nside / 2`.
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// Pixel numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexingScheme {
    /// Pixels numbered along iso-latitude rings, north to south.
    Ring,
    /// Hierarchical numbering, children of a pixel are contiguous.
    Nested,
}

/// `true` if `nside` is a power of two within the supported range.
pub fn is_valid_nside(nside: u32) -> bool {
    nside.is_power_of_two() && nside.trailing_zeros() <= MAX_ORDER
}

/// Order (`log2(nside)`) of a valid resolution.
pub fn nside_to_order(nside: u32) -> Result<u32, CadenceError> {
    if is_valid_nside(nside) {
        Ok(nside.trailing_zeros())
    } else {
        Err(CadenceError::InvalidResolution(format!(
            "nside {nside} is not a power of two"
        )))
    }
}

/// Total number of pixels at `nside`: `12·nside²`.
pub fn npix(nside: u32) -> u64 {
    12 * nside as u64 * nside as u64
}

fn check_pixel(pixel: PixelId, nside: u32) -> Result<(), CadenceError> {
    if pixel < npix(nside) {
        Ok(())
    } else {
        Err(CadenceError::InvalidPixel { pixel, nside })
    }
}

/// Integer square root of a non-negative value.
fn isqrt(v: i64) -> i64 {
    let mut r = (v as f64).sqrt() as i64;
    while r * r > v {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= v {
        r += 1;
    }
    r
}

// -------------------------------------------------------------------------------------------------
// Bit interleaving
// -------------------------------------------------------------------------------------------------

/// Spread the low 32 bits of `v` onto the even bit positions.
fn spread_bits(v: u64) -> u64 {
    let mut v = v & 0xFFFF_FFFF;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}

/// Inverse of [`spread_bits`]: gather the even bits of `v`.
fn compress_bits(v: u64) -> u64 {
    let mut v = v & 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v >> 4)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v >> 8)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v >> 16)) & 0x0000_0000_FFFF_FFFF;
    v
}

// -------------------------------------------------------------------------------------------------
// (x, y, face) ↔ pixel ids
// -------------------------------------------------------------------------------------------------

fn xyf_to_nested(x: i64, y: i64, face: usize, order: u32) -> PixelId {
    ((face as u64) << (2 * order)) + (spread_bits(x as u64) | (spread_bits(y as u64) << 1))
}

fn nested_to_xyf(pixel: PixelId, order: u32) -> (i64, i64, usize) {
    let npface = 1u64 << (2 * order);
    let face = (pixel >> (2 * order)) as usize;
    let sub = pixel & (npface - 1);
    (
        compress_bits(sub) as i64,
        compress_bits(sub >> 1) as i64,
        face,
    )
}

fn ring_to_xyf(pixel: PixelId, nside: u32) -> (i64, i64, usize) {
    let ns = nside as i64;
    let pix = pixel as i64;
    let nl2 = 2 * ns;
    let ncap = 2 * ns * (ns - 1);
    let npix = 12 * ns * ns;

    let (iring, iphi, kshift, nr, face) = if pix < ncap {
        // North polar cap
        let iring = (1 + isqrt(1 + 2 * pix)) >> 1;
        let iphi = (pix + 1) - 2 * iring * (iring - 1);
        (iring, iphi, 0, iring, ((iphi - 1) / iring) as usize)
    } else if pix < npix - ncap {
        // Equatorial belt
        let ip = pix - ncap;
        let tmp = ip / (4 * ns);
        let iring = tmp + ns;
        let iphi = ip - tmp * 4 * ns + 1;
        let kshift = (iring + ns) & 1;
        let ire = tmp + 1;
        let irm = nl2 + 1 - tmp;
        let ifm = (iphi - (ire >> 1) + ns - 1) / ns;
        let ifp = (iphi - (irm >> 1) + ns - 1) / ns;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        (iring, iphi, kshift, ns, face as usize)
    } else {
        // South polar cap
        let ip = npix - pix;
        let iring = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let face = 8 + ((iphi - 1) / iring) as usize;
        (2 * nl2 - iring, iphi, 0, iring, face)
    };

    let irt = iring - JRLL[face] * ns + 1;
    let mut ipt = 2 * iphi - JPLL[face] * nr - kshift - 1;
    if ipt >= nl2 {
        ipt -= 8 * ns;
    }
    ((ipt - irt) >> 1, (-ipt - irt) >> 1, face)
}

fn xyf_to_ring(x: i64, y: i64, face: usize, nside: u32) -> PixelId {
    let ns = nside as i64;
    let nl4 = 4 * ns;
    let jr = JRLL[face] * ns - x - y - 1;

    let (nr, kshift, n_before) = if jr < ns {
        (jr, 0, 2 * jr * (jr - 1))
    } else if jr > 3 * ns {
        let nr = nl4 - jr;
        (nr, 0, 12 * ns * ns - 2 * (nr + 1) * nr)
    } else {
        (ns, (jr - ns) & 1, 2 * ns * (ns - 1) + (jr - ns) * nl4)
    };

    let mut jp = (JPLL[face] * nr + x - y + 1 + kshift).div_euclid(2);
    if jp > nl4 {
        jp -= nl4;
    } else if jp < 1 {
        jp += nl4;
    }
    (n_before + jp - 1) as PixelId
}

/// Center of pixel `(x, y, face)` as `(ra, dec)` in degrees.
fn xyf_to_radec(x: i64, y: i64, face: usize, nside: u32) -> (Degree, Degree) {
    let ns = nside as i64;
    let nl4 = 4 * ns;
    let fact2 = 4.0 / npix(nside) as f64;
    let fact1 = (2 * ns) as f64 * fact2;
    let jr = JRLL[face] * ns - x - y - 1;

    let (nr, z, kshift) = if jr < ns {
        (jr, 1.0 - (jr * jr) as f64 * fact2, 0)
    } else if jr > 3 * ns {
        let nr = nl4 - jr;
        (nr, (nr * nr) as f64 * fact2 - 1.0, 0)
    } else {
        (ns, (2 * ns - jr) as f64 * fact1, (jr - ns) & 1)
    };

    let mut jp = (JPLL[face] * nr + x - y + 1 + kshift).div_euclid(2);
    if jp > nl4 {
        jp -= nl4;
    }
    if jp < 1 {
        jp += nl4;
    }
    let phi = (jp as f64 - (kshift + 1) as f64 * 0.5) * (FRAC_PI_2 / nr as f64);

    (rad_to_deg(wrap_ra(phi)), rad_to_deg(z.clamp(-1.0, 1.0).asin()))
}

fn pixel_to_xyf(pixel: PixelId, nside: u32, scheme: IndexingScheme) -> Result<(i64, i64, usize), CadenceError> {
    let order = nside_to_order(nside)?;
    check_pixel(pixel, nside)?;
    Ok(match scheme {
        IndexingScheme::Nested => nested_to_xyf(pixel, order),
        IndexingScheme::Ring => ring_to_xyf(pixel, nside),
    })
}

// -------------------------------------------------------------------------------------------------
// Public primitives
// -------------------------------------------------------------------------------------------------

/// Convert a ring-scheme pixel id to the nested scheme at the same resolution.
pub fn ring_to_nested(pixel: PixelId, nside: u32) -> Result<PixelId, CadenceError> {
    let order = nside_to_order(nside)?;
    let (x, y, face) = pixel_to_xyf(pixel, nside, IndexingScheme::Ring)?;
    Ok(xyf_to_nested(x, y, face, order))
}

/// Convert a nested-scheme pixel id to the ring scheme at the same resolution.
pub fn nested_to_ring(pixel: PixelId, nside: u32) -> Result<PixelId, CadenceError> {
    let (x, y, face) = pixel_to_xyf(pixel, nside, IndexingScheme::Nested)?;
    Ok(xyf_to_ring(x, y, face, nside))
}

/// All descendants of a pixel at a finer resolution.
///
/// Arguments
/// -----------------
/// * `pixel`: pixel id at `nside_in`, interpreted in `scheme`
/// * `nside_in`: resolution of `pixel`
/// * `nside_out`: target resolution, a power-of-two refinement of `nside_in`
/// * `scheme`: indexing scheme of `pixel`
///
/// Return
/// ----------
/// * The `(nside_out / nside_in)²` descendants, as **nested** ids at `nside_out`, in nested order.
///   `nside_out == nside_in` yields the pixel itself (converted to nested).
///
/// Errors
/// ----------
/// * [`CadenceError::InvalidResolution`] if either resolution is not a power of two or
///   `nside_out < nside_in`.
/// * [`CadenceError::InvalidPixel`] if `pixel` does not exist at `nside_in`.
pub fn subdivide(
    pixel: PixelId,
    nside_in: u32,
    nside_out: u32,
    scheme: IndexingScheme,
) -> Result<Vec<PixelId>, CadenceError> {
    let order_in = nside_to_order(nside_in)?;
    let order_out = nside_to_order(nside_out)?;
    if order_out < order_in {
        return Err(CadenceError::InvalidResolution(format!(
            "cannot subdivide nside {nside_in} into coarser nside {nside_out}"
        )));
    }

    let nested = match scheme {
        IndexingScheme::Nested => {
            check_pixel(pixel, nside_in)?;
            pixel
        }
        IndexingScheme::Ring => ring_to_nested(pixel, nside_in)?,
    };

    let shift = 2 * (order_out - order_in);
    let first = nested << shift;
    Ok((first..first + (1u64 << shift)).collect())
}

/// Centers of a batch of pixels, in degrees.
///
/// Return
/// ----------
/// * Two parallel vectors `(ra, dec)`, one element per input pixel; `ra ∈ [0, 360)`.
pub fn centers(
    pixels: &[PixelId],
    nside: u32,
    scheme: IndexingScheme,
) -> Result<(Vec<Degree>, Vec<Degree>), CadenceError> {
    let mut ra = Vec::with_capacity(pixels.len());
    let mut dec = Vec::with_capacity(pixels.len());
    for &pixel in pixels {
        let (x, y, face) = pixel_to_xyf(pixel, nside, scheme)?;
        let (r, d) = xyf_to_radec(x, y, face, nside);
        ra.push(r);
        dec.push(d);
    }
    Ok((ra, dec))
}

/// Smallest resolution that splits a base pixel into at least `n` sub-pixels.
///
/// The result is `base_nside · 2^k` with the smallest `k ≥ 0` such that `4^k ≥ n`; `n ≤ 1`
/// returns `base_nside` itself.
pub fn target_nside_for_count(n: usize, base_nside: u32) -> Result<u32, CadenceError> {
    let base_order = nside_to_order(base_nside)?;
    let mut k = 0u32;
    while (1u128 << (2 * k)) < n as u128 {
        k += 1;
    }
    if base_order + k > MAX_ORDER {
        return Err(CadenceError::InvalidResolution(format!(
            "{n} sub-pixels per pixel exceed the finest resolution from nside {base_nside}"
        )));
    }
    Ok(base_nside << k)
}

#[cfg(test)]
mod healpix_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nside_validation() {
        assert!(is_valid_nside(1));
        assert!(is_valid_nside(32));
        assert!(!is_valid_nside(0));
        assert!(!is_valid_nside(12));
        assert_eq!(nside_to_order(32), Ok(5));
        assert!(matches!(
            nside_to_order(3),
            Err(CadenceError::InvalidResolution(_))
        ));
        assert_eq!(npix(1), 12);
        assert_eq!(npix(32), 12_288);
    }

    #[test]
    fn test_bit_interleave_roundtrip() {
        for x in 0..32u64 {
            for y in 0..32u64 {
                let sub = spread_bits(x) | (spread_bits(y) << 1);
                assert_eq!((compress_bits(sub), compress_bits(sub >> 1)), (x, y));
            }
        }
    }

    #[test]
    fn test_ring_to_nested_known_values() {
        let nested: Vec<u64> = (0..8).map(|p| ring_to_nested(p, 2).unwrap()).collect();
        assert_eq!(nested, vec![3, 7, 11, 15, 2, 1, 6, 5]);

        // At nside 1 both schemes coincide
        for p in 0..12 {
            assert_eq!(ring_to_nested(p, 1), Ok(p));
        }
    }

    #[test]
    fn test_ring_nested_bijection() {
        for nside in [1, 2, 4, 8, 32] {
            let mut seen = vec![false; npix(nside) as usize];
            for p in 0..npix(nside) {
                let n = ring_to_nested(p, nside).unwrap();
                assert!(!seen[n as usize], "nside {nside}: nested {n} produced twice");
                seen[n as usize] = true;
                assert_eq!(nested_to_ring(n, nside), Ok(p));
            }
        }
    }

    #[test]
    fn test_ring_centers_are_ring_ordered() {
        // Ring numbering runs north to south, then eastward along each ring.
        for nside in [1, 2, 4, 16] {
            let pixels: Vec<u64> = (0..npix(nside)).collect();
            let (ra, dec) = centers(&pixels, nside, IndexingScheme::Ring).unwrap();
            for i in 1..pixels.len() {
                let same_ring = (dec[i] - dec[i - 1]).abs() < 1e-9;
                assert!(
                    dec[i] < dec[i - 1] - 1e-9 || (same_ring && ra[i] > ra[i - 1]),
                    "nside {nside}: pixel {i} out of ring order"
                );
            }
        }
    }

    #[test]
    fn test_nested_centers() {
        let (ra, dec) = centers(&[0, 1, 2, 3, 16, 17], 2, IndexingScheme::Nested).unwrap();
        let expected = [
            (45.0, 19.47122063449069),
            (67.5, 41.810314895778596),
            (22.5, 41.810314895778596),
            (45.0, 66.44353569089876),
            (0.0, -19.47122063449069),
            (22.5, 0.0),
        ];
        for (i, (r, d)) in expected.iter().enumerate() {
            assert_relative_eq!(ra[i], *r, epsilon = 1e-10);
            assert_relative_eq!(dec[i], *d, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_centers_agree_across_schemes() {
        let nside = 8;
        for p in 0..npix(nside) {
            let (ra_r, dec_r) = centers(&[p], nside, IndexingScheme::Ring).unwrap();
            let n = ring_to_nested(p, nside).unwrap();
            let (ra_n, dec_n) = centers(&[n], nside, IndexingScheme::Nested).unwrap();
            assert_eq!((ra_r, dec_r), (ra_n, dec_n));
        }
    }

    #[test]
    fn test_subdivide() {
        assert_eq!(subdivide(5, 2, 4, IndexingScheme::Nested), Ok(vec![20, 21, 22, 23]));
        assert_eq!(subdivide(5, 2, 2, IndexingScheme::Nested), Ok(vec![5]));
        // ring 0 at nside 2 is nested 3
        assert_eq!(subdivide(0, 2, 4, IndexingScheme::Ring), Ok(vec![12, 13, 14, 15]));
        assert_eq!(subdivide(0, 1, 8, IndexingScheme::Nested).unwrap().len(), 64);

        assert!(matches!(
            subdivide(0, 4, 2, IndexingScheme::Nested),
            Err(CadenceError::InvalidResolution(_))
        ));
        assert!(matches!(
            subdivide(0, 4, 12, IndexingScheme::Nested),
            Err(CadenceError::InvalidResolution(_))
        ));
        assert_eq!(
            subdivide(48, 2, 4, IndexingScheme::Ring),
            Err(CadenceError::InvalidPixel {
                pixel: 48,
                nside: 2
            })
        );
    }

    #[test]
    fn test_children_lie_inside_parent() {
        // Every child center is closer to its parent center than the parent's size.
        let (pra, pdec) = centers(&[100], 4, IndexingScheme::Ring).unwrap();
        let children = subdivide(100, 4, 16, IndexingScheme::Ring).unwrap();
        let (cra, cdec) = centers(&children, 16, IndexingScheme::Nested).unwrap();
        for (r, d) in cra.iter().zip(cdec.iter()) {
            let sep = crate::conversion::angular_separation(pra[0], pdec[0], *r, *d);
            assert!(sep < 15.0, "child ({r}, {d}) too far from parent: {sep}");
        }
    }

    #[test]
    fn test_target_nside_for_count() {
        assert_eq!(target_nside_for_count(0, 32), Ok(32));
        assert_eq!(target_nside_for_count(1, 32), Ok(32));
        assert_eq!(target_nside_for_count(2, 32), Ok(64));
        assert_eq!(target_nside_for_count(4, 32), Ok(64));
        assert_eq!(target_nside_for_count(5, 32), Ok(128));
        assert_eq!(target_nside_for_count(16, 1), Ok(4));
        assert_eq!(target_nside_for_count(17, 1), Ok(8));
        assert!(target_nside_for_count(2, 6).is_err());
    }
}
