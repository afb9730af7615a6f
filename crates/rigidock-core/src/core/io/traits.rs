use crate::core::models::rigid_body::RigidBody;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing rigid bodies in a structure
/// file format.
///
/// Implementors handle format-specific parsing and serialization; the provided
/// path-based methods wrap them with buffered file handles.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a rigid body from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<RigidBody, Self::Error>;

    /// Writes the current world coordinates of a rigid body to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(body: &RigidBody, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a rigid body from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<RigidBody, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a rigid body to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(body: &RigidBody, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(body, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
