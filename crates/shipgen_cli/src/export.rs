//! Wavefront OBJ + MTL output.

use anyhow::{Context, Result};
use shipgen::{Material, MaterialPalette, Spaceship};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Write `ship_<seed>.obj` and `ship_<seed>.mtl` into `dir`. Returns the OBJ
/// path.
pub fn write(ship: &Spaceship, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let stem = format!("ship_{}", ship.seed);
    let mtl_name = format!("{stem}.mtl");
    let obj_path = dir.join(format!("{stem}.obj"));
    let mtl_path = dir.join(&mtl_name);

    std::fs::write(&obj_path, obj_string(ship, &mtl_name))
        .with_context(|| format!("writing {}", obj_path.display()))?;
    std::fs::write(&mtl_path, mtl_string(&ship.palette))
        .with_context(|| format!("writing {}", mtl_path.display()))?;
    Ok(obj_path)
}

/// OBJ text: shared positions, one UV per face corner, one normal per face,
/// faces grouped by material.
pub fn obj_string(ship: &Spaceship, mtl_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# shipgen seed {}", ship.seed);
    let _ = writeln!(out, "mtllib {mtl_name}");
    let _ = writeln!(out, "o ship_{}", ship.seed);

    for p in &ship.mesh.positions {
        let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
    }
    let mut first_uv = Vec::with_capacity(ship.mesh.face_count());
    let mut uv_count = 0;
    for face in &ship.mesh.faces {
        first_uv.push(uv_count);
        for uv in &face.uvs {
            let _ = writeln!(out, "vt {} {}", uv.x, uv.y);
        }
        uv_count += face.uvs.len();
    }
    for face in &ship.mesh.faces {
        let n = face.normal;
        let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
    }

    for material in Material::ALL {
        let mut header = false;
        for (i, face) in ship.mesh.faces.iter().enumerate() {
            if ship.materials.get(i) != Some(material) {
                continue;
            }
            if !header {
                let _ = writeln!(out, "usemtl {}", material.name());
                header = true;
            }
            out.push('f');
            for (k, v) in face.vertices.iter().enumerate() {
                let _ = write!(out, " {}/{}/{}", v + 1, first_uv[i] + k + 1, i + 1);
            }
            out.push('\n');
        }
    }
    out
}

pub fn mtl_string(palette: &MaterialPalette) -> String {
    let mut out = String::new();
    for material in Material::ALL {
        let [r, g, b] = palette.base_color(material);
        let _ = writeln!(out, "newmtl {}", material.name());
        let _ = writeln!(out, "Kd {r} {g} {b}");
        let _ = writeln!(out, "Ks 0.1 0.1 0.1");
        if let Some([r, g, b]) = palette.emission(material) {
            let _ = writeln!(out, "Ke {r} {g} {b}");
        }
        let _ = writeln!(out, "illum 2");
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipgen::{generate_spaceship, ShipConfig};

    fn lines_starting(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn box_ship_obj_layout() {
        let config = ShipConfig {
            num_hull_segments_min: 0,
            num_hull_segments_max: 0,
            ..ShipConfig::hull_only()
        }
        .with_seed(42u64);
        let ship = generate_spaceship(&config).unwrap();
        let obj = obj_string(&ship, "ship_42.mtl");
        assert_eq!(lines_starting(&obj, "v "), 8);
        assert_eq!(lines_starting(&obj, "vt "), 24);
        assert_eq!(lines_starting(&obj, "vn "), 6);
        assert_eq!(lines_starting(&obj, "f "), 6);
        assert_eq!(lines_starting(&obj, "usemtl "), 1);
        assert!(obj.contains("usemtl hull\n"));
        assert!(obj.contains("mtllib ship_42.mtl"));
    }

    #[test]
    fn mtl_lists_every_material() {
        let mtl = mtl_string(&MaterialPalette::default());
        assert_eq!(lines_starting(&mtl, "newmtl "), Material::ALL.len());
        assert_eq!(lines_starting(&mtl, "Ke "), 3);
    }
}
