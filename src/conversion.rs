use nalgebra::Vector3;

use crate::constants::{Degree, Radian, DEGRAD, DPI, RADEG};

/// Convert an angle from degrees to radians.
#[inline]
pub fn deg_to_rad(angle: Degree) -> Radian {
    angle * RADEG
}

/// Convert an angle from radians to degrees.
#[inline]
pub fn rad_to_deg(angle: Radian) -> Degree {
    angle * DEGRAD
}

/// Wrap a right ascension into `[0, 2π)`.
#[inline]
pub fn wrap_ra(ra: Radian) -> Radian {
    let wrapped = ra.rem_euclid(DPI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector on the celestial sphere pointing at `(ra, dec)`.
///
/// Arguments
/// -----------------
/// * `ra`: right ascension in **degrees**
/// * `dec`: declination in **degrees**
///
/// Return
/// ----------
/// * The equatorial cartesian unit vector `(cos δ cos α, cos δ sin α, sin δ)`.
pub fn radec_to_unit_vector(ra: Degree, dec: Degree) -> Vector3<f64> {
    let (sin_ra, cos_ra) = deg_to_rad(ra).sin_cos();
    let (sin_dec, cos_dec) = deg_to_rad(dec).sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Great-circle angle between two unit vectors, in degrees.
///
/// Uses `atan2(|a × b|, a · b)`, which keeps full precision both for nearly
/// coincident and for nearly antipodal directions.
#[inline]
pub fn separation_from_unit_vectors(a: &Vector3<f64>, b: &Vector3<f64>) -> Degree {
    rad_to_deg(a.cross(b).norm().atan2(a.dot(b)))
}

/// Great-circle angular separation between two sky positions.
///
/// Arguments
/// -----------------
/// * `ra1`, `dec1`: first position, in **degrees**
/// * `ra2`, `dec2`: second position, in **degrees**
///
/// Return
/// ----------
/// * The angular distance in **degrees**, in `[0, 180]`.
pub fn angular_separation(ra1: Degree, dec1: Degree, ra2: Degree, dec2: Degree) -> Degree {
    separation_from_unit_vectors(
        &radec_to_unit_vector(ra1, dec1),
        &radec_to_unit_vector(ra2, dec2),
    )
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_rad_roundtrip() {
        assert_relative_eq!(deg_to_rad(180.0), std::f64::consts::PI);
        assert_relative_eq!(rad_to_deg(std::f64::consts::FRAC_PI_2), 90.0);
        assert_relative_eq!(rad_to_deg(deg_to_rad(-33.25)), -33.25, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_ra() {
        assert_relative_eq!(wrap_ra(-std::f64::consts::FRAC_PI_2), 1.5 * std::f64::consts::PI);
        assert_relative_eq!(wrap_ra(DPI + 0.25), 0.25, epsilon = 1e-12);
        assert_eq!(wrap_ra(0.0), 0.0);
    }

    #[test]
    fn test_angular_separation() {
        assert_relative_eq!(angular_separation(10.0, 0.0, 20.0, 0.0), 10.0, epsilon = 1e-10);
        assert_relative_eq!(angular_separation(0.0, 90.0, 123.0, 90.0), 0.0, epsilon = 1e-10);
        assert_relative_eq!(angular_separation(0.0, -45.0, 0.0, 45.0), 90.0, epsilon = 1e-10);
        assert_relative_eq!(angular_separation(0.0, 0.0, 180.0, 0.0), 180.0, epsilon = 1e-10);

        // Across the RA wrap
        assert_relative_eq!(angular_separation(359.5, 0.0, 0.5, 0.0), 1.0, epsilon = 1e-10);

        // RA offsets shrink with cos(dec)
        let sep = angular_separation(0.0, 60.0, 2.0, 60.0);
        assert!(sep < 1.01 && sep > 0.99, "sep = {sep}");
    }
}
