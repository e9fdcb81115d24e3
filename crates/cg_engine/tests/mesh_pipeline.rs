//! Generate meshes, write them to disk and read them back

use approx::assert_abs_diff_eq;
use cg_engine::assets::{MeshFile, MeshLibrary, ParseWarning, PatchFile, RecordFormat, WriteOptions};
use cg_engine::foundation::math::Vec3;
use cg_engine::geometry::{Mesh, PrimitiveGenerator};
use std::path::PathBuf;

// Values are written with four decimals
const FILE_EPSILON: f32 = 1e-3;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cg_engine_it_{}_{}", std::process::id(), name))
}

fn assert_same_geometry(a: &Mesh, b: &Mesh) {
    assert_eq!(a.vertex_count(), b.vertex_count());
    for (p, q) in a.positions.iter().zip(&b.positions) {
        assert_abs_diff_eq!(p, q, epsilon = FILE_EPSILON);
    }
}

fn save_and_load(mesh: &Mesh, name: &str, options: &WriteOptions) -> Mesh {
    let path = temp_path(name);
    MeshFile::save(mesh, &path, options).unwrap();
    let parsed = MeshFile::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(parsed.is_clean(), "unexpected warnings: {:?}", parsed.warnings);
    parsed.value
}

#[test]
fn primitives_survive_a_full_round_trip() {
    let meshes = [
        ("plane.3d", PrimitiveGenerator::plane(3.0, 4).unwrap()),
        ("box.3d", PrimitiveGenerator::cube(2.0, 3).unwrap()),
        ("sphere.3d", PrimitiveGenerator::sphere(1.5, 12, 8).unwrap()),
        ("cone.3d", PrimitiveGenerator::cone(1.0, 2.0, 10, 4).unwrap()),
    ];

    for (name, mesh) in &meshes {
        let loaded = save_and_load(mesh, name, &WriteOptions::default());
        assert_same_geometry(mesh, &loaded);

        let (normals, loaded_normals) = (mesh.normals.as_ref().unwrap(), loaded.normals.as_ref().unwrap());
        for (n, m) in normals.iter().zip(loaded_normals) {
            assert_abs_diff_eq!(n, m, epsilon = FILE_EPSILON);
        }
        let (uvs, loaded_uvs) = (mesh.tex_coords.as_ref().unwrap(), loaded.tex_coords.as_ref().unwrap());
        for (a, b) in uvs.iter().zip(loaded_uvs) {
            assert_abs_diff_eq!(a, b, epsilon = FILE_EPSILON);
        }
    }
}

#[test]
fn geometry_only_files_drop_attributes() {
    let sphere = PrimitiveGenerator::sphere(1.0, 6, 4).unwrap();
    let loaded = save_and_load(&sphere, "geometry_only.3d", &WriteOptions::geometry_only());

    assert_same_geometry(&sphere, &loaded);
    assert!(!loaded.has_attributes());
    assert_eq!(WriteOptions::geometry_only().format, RecordFormat::GeometryOnly);
}

#[test]
fn plane_file_has_the_expected_layout() {
    let plane = PrimitiveGenerator::plane(2.0, 1).unwrap();
    let text = MeshFile::to_text(&plane, &WriteOptions::default()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "6");
    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(" ; ").collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1], "0,1,0");
    }

    let parsed = MeshFile::parse(&text);
    assert!(parsed.is_clean());
    let bounds = parsed.value.bounds().unwrap();
    assert_abs_diff_eq!(bounds.min, Vec3::new(-1.0, 0.0, -1.0));
    assert_abs_diff_eq!(bounds.max, Vec3::new(1.0, 0.0, 1.0));
}

#[test]
fn short_file_yields_partial_mesh_with_warning() {
    let path = temp_path("short.3d");
    std::fs::write(&path, "5\n0,0,0\n1,0,0\n0,1,0\n").unwrap();
    let parsed = MeshFile::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(parsed.value.vertex_count(), 3);
    assert_eq!(
        parsed.warnings,
        vec![ParseWarning::CountMismatch { declared: 5, parsed: 3 }]
    );
}

#[test]
fn patch_file_tessellates_into_a_mesh_file() {
    // Corner control points 1..4 at the four corners of the net, the rest at the origin
    let text = "\
1
1,0,0,2,0,0,0,0,0,0,0,0,3,0,0,4
5
0,0,0
0,0,0
1,0,0
0,0,1
1,0,1
";
    let patch_path = temp_path("corners.patch");
    std::fs::write(&patch_path, text).unwrap();
    let parsed = PatchFile::load(&patch_path).unwrap();
    std::fs::remove_file(&patch_path).ok();
    assert!(parsed.is_clean(), "unexpected warnings: {:?}", parsed.warnings);

    let mesh = parsed.value.tessellate(1).unwrap();
    assert_eq!(mesh.vertex_count(), 6);

    let corners = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
    ];
    for corner in &corners {
        assert!(mesh.positions.contains(corner), "missing corner {corner:?}");
    }

    let loaded = save_and_load(&mesh, "corners.3d", &WriteOptions::default());
    assert_same_geometry(&mesh, &loaded);
}

#[test]
fn library_loads_each_file_once() {
    let path = temp_path("library_box.3d");
    MeshFile::save(&PrimitiveGenerator::cube(1.0, 1).unwrap(), &path, &WriteOptions::default()).unwrap();

    let mut library = MeshLibrary::new();
    let first = library.load(&path).unwrap();
    let second = library.load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(first, second);
    assert_eq!(library.len(), 1);
    assert_eq!(library.get(first).unwrap().vertex_count(), 36);
}
