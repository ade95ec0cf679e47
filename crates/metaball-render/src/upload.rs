//! Flat scene buffers as a GPU-style backend would receive them
//!
//! Rebuilt from the [`Scene`] every frame: one `(x, y, z, radius)` record and
//! one `(r, g, b)` record per blob, in blob order.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use metaball_core::{Blob, Error, Result, Scene};

/// Position and radius of one blob
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BlobRecord {
    pub position: [f32; 3],
    pub radius: f32,
}

/// Diffuse color of one blob
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ColorRecord {
    pub rgb: [f32; 3],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneUpload {
    pub blobs: Vec<BlobRecord>,
    pub colors: Vec<ColorRecord>,
    pub light: [f32; 3],
    pub background: [f32; 3],
}

impl SceneUpload {
    pub fn from_scene(scene: &Scene) -> Self {
        let (blobs, colors) = scene
            .blobs()
            .iter()
            .map(|blob| {
                (
                    BlobRecord {
                        position: blob.center.as_vec3().to_array(),
                        radius: blob.radius as f32,
                    },
                    ColorRecord {
                        rgb: blob.diffuse.as_vec3().to_array(),
                    },
                )
            })
            .unzip();

        Self {
            blobs,
            colors,
            light: scene.light.as_vec3().to_array(),
            background: scene.background.as_vec3().to_array(),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// `x, y, z, radius` for every blob, back to back
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.blobs)
    }

    /// `r, g, b` for every blob, back to back
    pub fn diffuse(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn blob_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blobs)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Rebuild a renderable scene from the buffers. Velocities are not
    /// uploaded and come back as zero.
    ///
    /// Fails when the two buffers disagree on the blob count.
    pub fn to_scene(&self) -> Result<Scene> {
        if self.blobs.len() != self.colors.len() {
            return Err(Error::InvalidParameter(format!(
                "upload has {} blob records but {} color records",
                self.blobs.len(),
                self.colors.len()
            )));
        }

        let blobs = self
            .blobs
            .iter()
            .zip(&self.colors)
            .map(|(blob, color)| {
                Blob::new(
                    DVec3::from_array(blob.position.map(f64::from)),
                    f64::from(blob.radius),
                    DVec3::from_array(color.rgb.map(f64::from)),
                )
            })
            .collect();

        let mut scene = Scene::new(blobs, DVec3::from_array(self.light.map(f64::from)))?;
        scene.background = DVec3::from_array(self.background.map(f64::from));
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blob_scene() -> Scene {
        let blobs = vec![
            Blob::new(DVec3::new(30.0, 31.0, 32.0), 4.0, DVec3::new(1.0, 0.5, 0.25))
                .with_velocity(DVec3::ONE),
            Blob::new(DVec3::new(40.0, 41.0, 42.0), 7.0, DVec3::new(0.0, 0.75, 1.0)),
        ];
        Scene::new(blobs, DVec3::new(43.0, 42.0, -110.0)).unwrap()
    }

    #[test]
    fn flat_layout_is_interleaved_per_blob() {
        let upload = SceneUpload::from_scene(&two_blob_scene());

        assert_eq!(upload.len(), 2);
        assert_eq!(
            upload.positions(),
            &[30.0, 31.0, 32.0, 4.0, 40.0, 41.0, 42.0, 7.0]
        );
        assert_eq!(upload.diffuse(), &[1.0, 0.5, 0.25, 0.0, 0.75, 1.0]);
        assert_eq!(upload.blob_bytes().len(), 2 * 16);
        assert_eq!(upload.color_bytes().len(), 2 * 12);
        assert_eq!(upload.light, [43.0, 42.0, -110.0]);
    }

    #[test]
    fn rebuilt_scene_keeps_geometry_and_color() {
        let scene = two_blob_scene();
        let rebuilt = SceneUpload::from_scene(&scene).to_scene().unwrap();

        assert_eq!(rebuilt.len(), scene.len());
        for (a, b) in rebuilt.blobs().iter().zip(scene.blobs()) {
            assert_eq!(a.center, b.center);
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.diffuse, b.diffuse);
            assert_eq!(a.velocity, DVec3::ZERO);
        }
        assert_eq!(rebuilt.light, scene.light);
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let mut upload = SceneUpload::from_scene(&two_blob_scene());
        upload.colors.pop();
        assert!(matches!(upload.to_scene(), Err(Error::InvalidParameter(_))));

        let mut upload = SceneUpload::from_scene(&two_blob_scene());
        upload.colors.push(ColorRecord::default());
        assert!(upload.to_scene().is_err());
    }

    #[test]
    fn empty_scene_uploads_empty_buffers() {
        let scene = Scene::new(Vec::new(), DVec3::ZERO).unwrap();
        let upload = SceneUpload::from_scene(&scene);
        assert!(upload.is_empty());
        assert!(upload.positions().is_empty());
    }
}
