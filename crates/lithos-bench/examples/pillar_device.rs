//! End-to-end pillar device example.
//!
//! Demonstrates: catalog → pipeline (latent + pillar) → forward → backward,
//! then the same standard-range design through a brush-constrained slice.
//!
//! Set `RUST_LOG=debug` to see module initialization and solver logs.

use lithos::ndarray::Array3;
use lithos::prelude::*;
use lithos_test_utils::{random_design, three_material_catalog, two_material_catalog};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Lithos Pillar Device Example ===\n");

    // --- Pillars along z over three materials ---
    let config = SimulationConfig::default();
    let pillar: Discretization = PillarDiscretization::builder()
        .axis(2)
        .single_polymer_columns(true)
        .build()?
        .into();
    let pipeline = ParameterPipeline::new(
        &config,
        &three_material_catalog(),
        ShapeDtype::new([8, 8, 4], Dtype::Int32),
        &[LatentTransform::StandardToInversePermittivityRange],
        &pillar,
    )?;

    let params = random_design([8, 8, 4], 0.0, 1.0, 42);
    let output = pipeline.forward(params.into())?;
    let counts = (0..3u32)
        .map(|k| output.value.iter().filter(|&&v| v == k).count())
        .collect::<Vec<_>>();
    tracing::info!(?counts, "pillar voxels per material");

    let cotangent = Array3::<f32>::ones((8, 8, 4));
    let grad = pipeline.backward(&output, cotangent.view())?;
    println!(
        "pillar: rule={}, grad mean={:.4} (latent scale {:.4})",
        output.rule.name(),
        grad.mean().unwrap_or(0.0),
        pipeline.latents()[0].scale(),
    );

    // --- One brush-constrained slice ---
    let brush: Discretization = BrushConstraint2D::builder()
        .brush(Brush::circular(3.0, None)?)
        .axis(2)
        .build()?
        .into();
    let pipeline = ParameterPipeline::new(
        &config,
        &two_material_catalog(),
        ShapeDtype::new([16, 16, 1], Dtype::Int32),
        &[LatentTransform::StandardToPlusOneMinusOneRange],
        &brush,
    )?;
    let slice = pipeline.forward(random_design([16, 16, 1], 0.0, 1.0, 7).into())?;
    for row in slice.value.outer_iter() {
        let line: String = row
            .iter()
            .map(|&v| if v == 0 { '.' } else { '#' })
            .collect();
        println!("  {line}");
    }

    Ok(())
}
