use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rotation_quaternion::{Quaternion, RotationMatrix};
use std::f64::consts::PI;

fn mul_quaternion(c: &mut Criterion) {
    let a = create_quaternion();
    let b = Quaternion::new(0.5, -0.5, 0.5, 0.5);
    c.bench_function("mul_quaternion", |bencher| {
        bencher.iter(|| black_box(a) * black_box(b));
    });
}

fn invert_quaternion(c: &mut Criterion) {
    let a = create_quaternion();
    c.bench_function("invert_quaternion", |bencher| {
        bencher.iter(|| black_box(a).inverse());
    });
}

fn convert_quaternion_to_rotation_matrix(c: &mut Criterion) {
    let a = create_quaternion();
    c.bench_function("convert_quaternion_to_rotation_matrix", |bencher| {
        bencher.iter(|| black_box(a).to_rotation_matrix());
    });
}

fn convert_rotation_matrix_to_quaternion(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_rotation_matrix_to_quaternion");
    for (name, axis, angle) in [
        ("positive_trace", [0.0, 1.0, 0.0], 0.3),
        ("x_dominant", [1.0, 0.0, 0.0], PI),
        ("y_dominant", [0.0, 1.0, 0.0], PI),
        ("z_dominant", [0.0, 0.0, 1.0], PI),
    ] {
        let matrix = create_rotation_matrix(&axis, angle);
        group.bench_function(name, |bencher| {
            bencher.iter(|| Quaternion::from_rotation_matrix(black_box(&matrix)));
        });
    }
    group.finish();
}

fn create_quaternion() -> Quaternion {
    Quaternion::from_axis_angle(&[0.0, 0.6, 0.8], 1.2)
}

fn create_rotation_matrix(axis: &[f64; 3], angle: f64) -> RotationMatrix {
    Quaternion::from_axis_angle(axis, angle).to_rotation_matrix()
}

criterion_group!(
    benches,
    mul_quaternion,
    invert_quaternion,
    convert_quaternion_to_rotation_matrix,
    convert_rotation_matrix_to_quaternion,
);
criterion_main!(benches);
