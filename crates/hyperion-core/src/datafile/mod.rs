//! Attribute access on model input and output files.
//!
//! Only two attributes are ever read: the grid type tag of the input model
//! and the completion marker on the output file.

mod h5;

pub use self::h5::Hdf5Reader;

use crate::domain::{GridType, LaunchError, LaunchResult};
use std::path::{Path, PathBuf};

pub const ROOT_OBJECT: &str = "/";
pub const GRID_GEOMETRY_GROUP: &str = "Grid/Geometry";
pub const GRID_TYPE_ATTRIBUTE: &str = "grid_type";
pub const COMPLETION_MARKER_ATTRIBUTE: &str = "date_ended";

#[derive(Debug, thiserror::Error)]
pub enum DataFileError {
    #[error("cannot open '{}': {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("object '{object}' not found")]
    MissingObject { object: String },

    #[error("attribute '{name}' not found on '{object}'")]
    MissingAttribute { object: String, name: String },

    #[error("attribute '{name}' on '{object}' is not a string: {reason}")]
    NotAString {
        object: String,
        name: String,
        reason: String,
    },
}

pub trait DataFileReader {
    /// Reads attribute `name` of `object` (a group path, or `/`) as text.
    fn string_attribute(
        &self,
        file: &Path,
        object: &str,
        name: &str,
    ) -> Result<String, DataFileError>;

    fn has_attribute(&self, file: &Path, object: &str, name: &str)
    -> Result<bool, DataFileError>;
}

impl<T> DataFileReader for &T
where
    T: DataFileReader + ?Sized,
{
    fn string_attribute(
        &self,
        file: &Path,
        object: &str,
        name: &str,
    ) -> Result<String, DataFileError> {
        (**self).string_attribute(file, object, name)
    }

    fn has_attribute(
        &self,
        file: &Path,
        object: &str,
        name: &str,
    ) -> Result<bool, DataFileError> {
        (**self).has_attribute(file, object, name)
    }
}

/// Reads the grid type tag of an input model.
pub fn read_grid_type(reader: &impl DataFileReader, input: &Path) -> LaunchResult<GridType> {
    let raw = reader
        .string_attribute(input, GRID_GEOMETRY_GROUP, GRID_TYPE_ATTRIBUTE)
        .map_err(|error| LaunchError::DataFormat {
            path: input.to_path_buf(),
            reason: error.to_string(),
        })?;
    let grid_type = GridType::from_tag(&raw)?;
    tracing::debug!(input = %input.display(), %grid_type, "read grid type");
    Ok(grid_type)
}

/// True when the output file carries the completion marker. A missing file,
/// an unreadable file and a file without the marker are not distinguished.
pub fn verify_output(reader: &impl DataFileReader, output: &Path) -> bool {
    match reader.has_attribute(output, ROOT_OBJECT, COMPLETION_MARKER_ATTRIBUTE) {
        Ok(present) => present,
        Err(error) => {
            tracing::debug!(output = %output.display(), %error, "output verification failed");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{DataFileError, DataFileReader};
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};

    /// In-memory files keyed by path; each holds string attributes keyed by
    /// `(object, name)`.
    #[derive(Debug, Default)]
    pub(crate) struct FakeReader {
        files: HashMap<PathBuf, HashMap<(String, String), String>>,
        corrupt: HashSet<PathBuf>,
    }

    impl FakeReader {
        pub(crate) fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
            self.files.entry(path.into()).or_default();
            self
        }

        pub(crate) fn with_attribute(
            mut self,
            path: impl Into<PathBuf>,
            object: &str,
            name: &str,
            value: &str,
        ) -> Self {
            self.files
                .entry(path.into())
                .or_default()
                .insert((object.to_string(), name.to_string()), value.to_string());
            self
        }

        pub(crate) fn with_corrupt_file(mut self, path: impl Into<PathBuf>) -> Self {
            self.corrupt.insert(path.into());
            self
        }

        fn attributes(
            &self,
            file: &Path,
        ) -> Result<&HashMap<(String, String), String>, DataFileError> {
            if self.corrupt.contains(file) {
                return Err(DataFileError::Open {
                    path: file.to_path_buf(),
                    reason: "file signature not found".to_string(),
                });
            }
            self.files.get(file).ok_or_else(|| DataFileError::Open {
                path: file.to_path_buf(),
                reason: "no such file".to_string(),
            })
        }
    }

    impl DataFileReader for FakeReader {
        fn string_attribute(
            &self,
            file: &Path,
            object: &str,
            name: &str,
        ) -> Result<String, DataFileError> {
            self.attributes(file)?
                .get(&(object.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| DataFileError::MissingAttribute {
                    object: object.to_string(),
                    name: name.to_string(),
                })
        }

        fn has_attribute(
            &self,
            file: &Path,
            object: &str,
            name: &str,
        ) -> Result<bool, DataFileError> {
            Ok(self
                .attributes(file)?
                .contains_key(&(object.to_string(), name.to_string())))
        }
    }
}
