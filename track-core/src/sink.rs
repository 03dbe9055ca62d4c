//! Output side of the pipeline
//!
//! A [`MeshSink`] receives finished pieces one at a time. Failures are
//! reported per piece; the pipeline logs them and moves on.

use std::convert::Infallible;
use std::fmt::Display;

use crate::materials::MaterialTable;
use crate::recenter::Piece;

/// Consumer of exported pieces (files, a scene graph, ...)
pub trait MeshSink {
    type Error: Display;

    /// Store one piece
    fn write_piece(&mut self, piece: &Piece, materials: &MaterialTable) -> Result<(), Self::Error>;

    /// Called once after the last piece
    fn finish(&mut self, _materials: &MaterialTable) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Sink that keeps pieces in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub pieces: Vec<Piece>,
}

impl MeshSink for MemorySink {
    type Error = Infallible;

    fn write_piece(&mut self, piece: &Piece, _materials: &MaterialTable) -> Result<(), Self::Error> {
        self.pieces.push(piece.clone());
        Ok(())
    }
}
