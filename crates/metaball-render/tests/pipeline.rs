//! End-to-end rendering through the backend boundary

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use glam::DVec3;
use metaball_core::{Blob, Scene};
use metaball_render::{Camera, CpuRaymarcher, Nudge, RenderBackend, SceneUpload, Viewport};

fn scene_ahead_of_default_camera() -> Scene {
    let blobs = vec![
        Blob::new(DVec3::new(41.0, 42.0, 95.0), 10.0, DVec3::new(1.0, 0.0, 0.0)),
        Blob::new(DVec3::new(46.0, 42.0, 95.0), 8.0, DVec3::new(0.0, 0.0, 1.0)),
    ];
    // Headlight: the light sits at the eye
    Scene::new(blobs, Camera::default().eye).unwrap()
}

fn render(scene: &Scene, camera: &Camera, viewport: Viewport) -> CpuRaymarcher {
    let mut backend = CpuRaymarcher::new(viewport);
    backend
        .submit_scene(&SceneUpload::from_scene(scene))
        .expect("scene upload");
    backend.submit_camera(camera, viewport).expect("camera");
    backend.render().expect("render");
    backend
}

#[test]
fn rendering_is_deterministic() {
    let scene = scene_ahead_of_default_camera();
    let viewport = Viewport::new(48, 32).unwrap();

    let a = render(&scene, &Camera::default(), viewport);
    let b = render(&scene, &Camera::default(), viewport);

    assert_eq!(a.framebuffer().pixels(), b.framebuffer().pixels());
    assert_eq!(a.last_stats(), b.last_stats());
}

#[test]
fn fused_blobs_show_both_colors() {
    let scene = scene_ahead_of_default_camera();
    let viewport = Viewport::new(64, 64).unwrap();
    let backend = render(&scene, &Camera::default(), viewport);

    let pixels = backend.framebuffer().pixels();
    assert!(pixels.iter().any(|p| p.x > 0.0 && p.z <= p.y + 1e-6));
    assert!(pixels.iter().any(|p| p.z > p.y + 1e-3 && p.x <= p.y + 1e-6));
}

#[test]
fn moving_closer_covers_more_pixels() {
    let scene = scene_ahead_of_default_camera();
    let viewport = Viewport::new(40, 40).unwrap();

    let far = render(&scene, &Camera::default(), viewport).last_stats();

    let mut camera = Camera::default();
    for _ in 0..10 {
        camera.nudge(Nudge::Forward, 0.5);
    }
    let near = render(&scene, &camera, viewport).last_stats();

    assert!(near.hits > far.hits, "{near:?} vs {far:?}");
    assert_eq!(near.total(), 1600);
}

#[test]
fn frame_exports_to_png() {
    let scene = scene_ahead_of_default_camera();
    let viewport = Viewport::new(16, 12).unwrap();
    let backend = render(&scene, &Camera::default(), viewport);

    let path = std::env::temp_dir().join(format!("metaball_pipeline_{}.png", std::process::id()));
    backend.framebuffer().save_png(&path).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (16, 12));
    assert!(image.get_pixel(8, 6)[0] > 0);
    std::fs::remove_file(&path).unwrap();
}
