//! Wavefront OBJ output
//!
//! One `.obj` per piece under `objs/`, all sharing a `materials.mtl`
//! written once at the end.

use anyhow::{Context, Result, bail};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use trackgen_core::{Material, MaterialTable, MeshSink, Piece};

/// Shared material library name
pub const MTL_FILE: &str = "materials.mtl";

/// Subdirectory holding the piece files
pub const OBJ_DIR: &str = "objs";

/// Writes pieces as OBJ files into an output directory
#[derive(Debug)]
pub struct ObjSink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl ObjSink {
    /// Create the sink, making `root/objs` if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let objs = root.join(OBJ_DIR);
        fs::create_dir_all(&objs).with_context(|| format!("Failed to create directory: {:?}", objs))?;
        Ok(Self {
            root,
            written: Vec::new(),
        })
    }

    pub fn piece_path(&self, name: &str) -> PathBuf {
        self.root.join(OBJ_DIR).join(format!("{}.obj", name))
    }
}

/// Serialize one piece, faces grouped by material slot
pub fn write_piece_obj<W: Write>(out: &mut W, piece: &Piece) -> Result<()> {
    let count = piece.mesh.vertex_count();

    writeln!(out, "# {}", piece.name)?;
    writeln!(out, "mtllib ../{}", MTL_FILE)?;
    writeln!(out, "o {}", piece.name)?;
    for p in &piece.mesh.positions {
        writeln!(out, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }

    for material in Material::ALL {
        let slot = material.index();
        let mut faces = piece.mesh.faces.iter().filter(|f| f.material == slot).peekable();
        if faces.peek().is_none() {
            continue;
        }

        writeln!(out, "usemtl {}", material.name())?;
        for face in faces {
            write!(out, "f")?;
            for &i in &face.indices {
                if i as usize >= count {
                    bail!("{}: face index {} out of range ({} vertices)", piece.name, i, count);
                }
                // OBJ indices are 1-based
                write!(out, " {}", i + 1)?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Serialize the material library
pub fn write_mtl<W: Write>(out: &mut W, materials: &MaterialTable) -> Result<()> {
    for def in materials.iter() {
        let [r, g, b, a] = def.color;
        writeln!(out, "newmtl {}", def.material.name())?;
        writeln!(out, "Kd {:.4} {:.4} {:.4}", r, g, b)?;
        writeln!(out, "d {:.4}", if def.visible { a } else { 0.0 })?;
        writeln!(out)?;
    }
    Ok(())
}

impl MeshSink for ObjSink {
    type Error = anyhow::Error;

    fn write_piece(&mut self, piece: &Piece, _materials: &MaterialTable) -> Result<()> {
        let path = self.piece_path(&piece.name);
        let file = File::create(&path).with_context(|| format!("Failed to create output: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        write_piece_obj(&mut writer, piece)?;
        writer.flush()?;

        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self, materials: &MaterialTable) -> Result<()> {
        let path = self.root.join(MTL_FILE);
        let file = File::create(&path).with_context(|| format!("Failed to create output: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        write_mtl(&mut writer, materials)?;
        writer.flush()?;

        tracing::info!("Wrote {} OBJ files and {:?}", self.written.len(), path);
        Ok(())
    }
}
