use super::{DataFileError, DataFileReader};
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, File, Group};
use std::path::Path;

/// Longest fixed-length string attribute decoded; HDF5 converts shorter
/// stored strings up to this size on read.
const FIXED_STRING_CAPACITY: usize = 256;

/// Reads attributes from HDF5 files through libhdf5. Every call opens the
/// file read-only and closes it before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5Reader;

impl Hdf5Reader {
    fn open(file: &Path) -> Result<File, DataFileError> {
        File::open(file).map_err(|error| DataFileError::Open {
            path: file.to_path_buf(),
            reason: error.to_string(),
        })
    }

    /// `object` is a group path relative to the root; `/` is the root itself.
    fn location(file: &File, object: &str) -> Result<Group, DataFileError> {
        file.group(object)
            .map_err(|_| DataFileError::MissingObject {
                object: object.to_string(),
            })
    }
}

impl DataFileReader for Hdf5Reader {
    fn string_attribute(
        &self,
        file: &Path,
        object: &str,
        name: &str,
    ) -> Result<String, DataFileError> {
        let handle = Self::open(file)?;
        let group = Self::location(&handle, object)?;
        let attribute = group
            .attr(name)
            .map_err(|_| DataFileError::MissingAttribute {
                object: object.to_string(),
                name: name.to_string(),
            })?;
        decode_string(&attribute).map_err(|reason| DataFileError::NotAString {
            object: object.to_string(),
            name: name.to_string(),
            reason,
        })
    }

    fn has_attribute(
        &self,
        file: &Path,
        object: &str,
        name: &str,
    ) -> Result<bool, DataFileError> {
        let handle = Self::open(file)?;
        let group = Self::location(&handle, object)?;
        let names = group.attr_names().map_err(|error| DataFileError::Open {
            path: file.to_path_buf(),
            reason: error.to_string(),
        })?;
        Ok(names.iter().any(|candidate| candidate == name))
    }
}

fn decode_string(attribute: &Attribute) -> Result<String, String> {
    let descriptor = attribute
        .dtype()
        .and_then(|dtype| dtype.to_descriptor())
        .map_err(|error| error.to_string())?;

    let text = match descriptor {
        TypeDescriptor::VarLenUnicode => attribute
            .read_scalar::<VarLenUnicode>()
            .map(|value| value.as_str().to_owned()),
        TypeDescriptor::VarLenAscii => attribute
            .read_scalar::<VarLenAscii>()
            .map(|value| value.as_str().to_owned()),
        TypeDescriptor::FixedUnicode(_) => attribute
            .read_scalar::<FixedUnicode<FIXED_STRING_CAPACITY>>()
            .map(|value| value.as_str().to_owned()),
        TypeDescriptor::FixedAscii(_) => attribute
            .read_scalar::<FixedAscii<FIXED_STRING_CAPACITY>>()
            .map(|value| value.as_str().to_owned()),
        other => return Err(format!("stored as {other:?}")),
    };

    text.map_err(|error| error.to_string())
}
