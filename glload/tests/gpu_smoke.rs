mod support;

use glload::render::gpu::{DEPTH_STENCIL_FORMATS, build_candidates};
use glload::render::surface::{ConfigFilter, RenderApi};
use glload::prelude::*;

#[test]
fn default_target_matches_common_surface_formats() {
    let candidates = build_candidates(
        &[wgpu::TextureFormat::Bgra8UnormSrgb],
        &DEPTH_STENCIL_FORMATS,
        false,
    );
    let target = VisualConfig::default();
    let filter = ConfigFilter::for_target(&target, RenderApi::Gles2);

    let accepted: Vec<_> = candidates
        .iter()
        .filter(|choice| filter.accepts(|attrib| choice.attrib(attrib)))
        .collect();

    // Depth16, Depth24Plus, Depth24PlusStencil8 and Depth32Float.
    assert_eq!(accepted.len(), 4);

    let scores: Vec<i32> = accepted
        .iter()
        .map(|choice| {
            let visual = VisualConfig::new(
                8,
                8,
                8,
                0,
                choice.attrib(ConfigAttrib::DepthSize).unwrap_or(0),
                choice.attrib(ConfigAttrib::StencilSize).unwrap_or(0),
                24,
            );
            MatchScorer.score(&visual, &target)
        })
        .collect();
    let best = glload::render::best_index(&scores).expect("a best config");
    assert_eq!(
        accepted[best].depth_stencil,
        Some(wgpu::TextureFormat::Depth16Unorm)
    );
}

#[test]
fn gpu_probe_is_opt_in() {
    if !support::gpu_tests_enabled() {
        eprintln!(
            "Skipping GPU smoke probe. Set GLLOAD_RUN_GPU_TESTS=1 to run."
        );
        return;
    }

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(
        &wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: true,
            compatible_surface: None,
        },
    ))
    .expect("expected a headless adapter for GPU smoke probe");

    let info = adapter.get_info();
    assert!(!info.name.is_empty());
}
