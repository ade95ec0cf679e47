//! Local lighting: Lambertian diffuse plus an achromatic specular highlight

use glam::DVec3;
use metaball_math::{reflect, safe_normalize};

/// Specular exponent before the quarter scaling
pub const SHININESS: f64 = 15.0;

/// The two lighting terms at one surface point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub lambertian: f64,
    pub specular: f64,
}

impl Lighting {
    /// Evaluate the lighting terms.
    ///
    /// `light` and `position` are world-space points; `ray_direction` and
    /// `normal` are unit vectors. The specular term is only computed on the
    /// lit side of the surface.
    pub fn at(ray_direction: DVec3, position: DVec3, normal: DVec3, light: DVec3) -> Self {
        let light_dir = safe_normalize(light - position);
        let lambertian = light_dir.dot(normal).max(0.0);

        let specular = if lambertian > 0.0 {
            let reflected = reflect(-light_dir, normal);
            reflected.dot(-ray_direction).max(0.0).powf(SHININESS / 4.0)
        } else {
            0.0
        };

        Self {
            lambertian,
            specular,
        }
    }

    /// `lambertian * diffuse + specular`, unclamped
    pub fn apply(&self, diffuse: DVec3) -> DVec3 {
        self.lambertian * diffuse + DVec3::splat(self.specular)
    }
}

/// Shade a surface point with the given diffuse color
pub fn shade(
    ray_direction: DVec3,
    position: DVec3,
    normal: DVec3,
    light: DVec3,
    diffuse: DVec3,
) -> DVec3 {
    Lighting::at(ray_direction, position, normal, light).apply(diffuse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn head_on_light_is_full_diffuse_plus_specular() {
        // Light and eye both straight in front of the surface
        let color = shade(DVec3::NEG_Z, DVec3::ZERO, DVec3::Z, DVec3::new(0.0, 0.0, 5.0), DVec3::X);
        assert_relative_eq!(color.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(color.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(color.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn light_behind_surface_is_black() {
        let color = shade(DVec3::NEG_Z, DVec3::ZERO, DVec3::Z, DVec3::new(0.0, 0.0, -5.0), DVec3::ONE);
        assert_eq!(color, DVec3::ZERO);
    }

    #[test]
    fn grazing_view_has_no_highlight() {
        // Light from +Z, viewer looking along -X: reflection points away from the eye
        let terms = Lighting::at(DVec3::X, DVec3::ZERO, DVec3::Z, DVec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(terms.lambertian, 1.0);
        assert_relative_eq!(terms.specular, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn oblique_light_scales_lambertian() {
        let light = DVec3::new(5.0, 0.0, 5.0);
        let terms = Lighting::at(DVec3::NEG_Z, DVec3::ZERO, DVec3::Z, light);
        assert_relative_eq!(terms.lambertian, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert!(terms.specular > 0.0 && terms.specular < 1.0);
    }

    #[test]
    fn zero_normal_is_unlit() {
        let color = shade(DVec3::NEG_Z, DVec3::ZERO, DVec3::ZERO, DVec3::Z, DVec3::ONE);
        assert_eq!(color, DVec3::ZERO);
    }

    #[test]
    fn output_is_not_clamped() {
        let color = shade(DVec3::NEG_Z, DVec3::ZERO, DVec3::Z, DVec3::Z, DVec3::ONE);
        assert!(color.max_element() > 1.0);
    }
}
