//! Column matching against the three-material test catalog.

use lithos_columns::{
    compute_allowed_indices, gather_columns, move_axis_last, nearest_index, DistanceMetric,
    Nearest,
};
use lithos_core::Dtype;
use lithos_test_utils::{random_design, three_material_catalog};
use ndarray::Axis;

#[test]
fn every_axis_yields_valid_columns() {
    let catalog = three_material_catalog();
    let allowed = catalog.ordered_values(Dtype::Float32).unwrap();
    let air = catalog.air_index().unwrap() as u32;
    let table = compute_allowed_indices(4, &[0, 1, 2], &[air], true).unwrap();

    for axis in 0..3 {
        let mut shape = [3, 5, 2];
        shape[axis] = 4;
        let design = random_design(shape, 0.25, 1.0, axis as u64);
        let sel = match nearest_index(
            design.view(),
            &allowed,
            axis,
            &DistanceMetric::default(),
            Some(&table),
        )
        .unwrap()
        {
            Nearest::PerColumn(sel) => sel,
            other => panic!("expected PerColumn, got {other:?}"),
        };
        let out = gather_columns(&sel, &table);
        for lane in out.lanes(Axis(2)) {
            assert!(table.contains(&lane.to_vec()), "axis {axis}: {lane:?}");
        }
    }
}

#[test]
fn chosen_sequence_minimizes_metric() {
    let catalog = three_material_catalog();
    let allowed = catalog.ordered_values(Dtype::Float32).unwrap();
    let table = compute_allowed_indices(3, &[0, 1, 2], &[0], false).unwrap();
    let metric = DistanceMetric::default();
    let design = random_design([4, 4, 3], 0.25, 1.0, 11);

    let sel = match nearest_index(design.view(), &allowed, 2, &metric, Some(&table)).unwrap() {
        Nearest::PerColumn(sel) => sel,
        other => panic!("expected PerColumn, got {other:?}"),
    };
    let columns = design.view().permuted_axes(move_axis_last(2).unwrap()).mapv(f64::from);
    for ((i, j), &chosen) in sel.indexed_iter() {
        let lane = columns.index_axis(Axis(0), i).index_axis_move(Axis(0), j);
        let profile = |k: usize| -> Vec<f64> {
            table.sequence(k).iter().map(|&m| allowed[m as usize]).collect()
        };
        let best = metric.column_distance(lane, &profile(chosen));
        for k in 0..table.len() {
            assert!(best <= metric.column_distance(lane, &profile(k)));
        }
    }
}
