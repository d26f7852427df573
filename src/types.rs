use std::fmt;

use serde::{Deserialize, Serialize};

/// When rsync deletes extraneous files on the receiving side.
///
/// Persisted as its declaration index; the ordering is part of the database format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeleteType {
    #[default]
    During,
    After,
    Before,
}

/// Archive format applied to the destination after the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CompressionType {
    #[default]
    None,
    Tarball,
    Gz,
    Bz2,
    Xz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BackupType {
    #[default]
    Incremental,
    IncrementalNoDelta,
    Full,
    FullNoDelta,
}

impl DeleteType {
    const ALL: [DeleteType; 3] = [DeleteType::During, DeleteType::After, DeleteType::Before];

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "during" => Ok(DeleteType::During),
            "after" => Ok(DeleteType::After),
            "before" => Ok(DeleteType::Before),
            _ => Err(format!(
                "invalid delete type {}; expected during, after, or before",
                value
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteType::During => "during",
            DeleteType::After => "after",
            DeleteType::Before => "before",
        }
    }
}

impl CompressionType {
    const ALL: [CompressionType; 5] = [
        CompressionType::None,
        CompressionType::Tarball,
        CompressionType::Gz,
        CompressionType::Bz2,
        CompressionType::Xz,
    ];

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(CompressionType::None),
            "tarball" | "tar" => Ok(CompressionType::Tarball),
            "gz" | "gzip" => Ok(CompressionType::Gz),
            "bz2" | "bzip2" => Ok(CompressionType::Bz2),
            "xz" => Ok(CompressionType::Xz),
            _ => Err(format!(
                "invalid compression type {}; expected none, tarball, gz, bz2, or xz",
                value
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionType::None => "none",
            CompressionType::Tarball => "tarball",
            CompressionType::Gz => "gz",
            CompressionType::Bz2 => "bz2",
            CompressionType::Xz => "xz",
        }
    }
}

impl BackupType {
    const ALL: [BackupType; 4] = [
        BackupType::Incremental,
        BackupType::IncrementalNoDelta,
        BackupType::Full,
        BackupType::FullNoDelta,
    ];

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "incremental" => Ok(BackupType::Incremental),
            "incremental-no-delta" => Ok(BackupType::IncrementalNoDelta),
            "full" => Ok(BackupType::Full),
            "full-no-delta" => Ok(BackupType::FullNoDelta),
            _ => Err(format!(
                "invalid backup type {}; expected incremental, incremental-no-delta, full, or full-no-delta",
                value
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackupType::Incremental => "incremental",
            BackupType::IncrementalNoDelta => "incremental-no-delta",
            BackupType::Full => "full",
            BackupType::FullNoDelta => "full-no-delta",
        }
    }

    pub fn is_incremental(&self) -> bool {
        matches!(self, BackupType::Incremental | BackupType::IncrementalNoDelta)
    }

    pub fn skips_delta(&self) -> bool {
        matches!(self, BackupType::IncrementalNoDelta | BackupType::FullNoDelta)
    }
}

macro_rules! index_conversions {
    ($ty:ident, $label:literal) => {
        impl From<$ty> for u8 {
            fn from(value: $ty) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $ty {
            type Error = String;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                $ty::ALL
                    .get(usize::from(value))
                    .copied()
                    .ok_or_else(|| format!("unknown {} {}", $label, value))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

index_conversions!(DeleteType, "DeleteType");
index_conversions!(CompressionType, "CompressionType");
index_conversions!(BackupType, "BackupType");
