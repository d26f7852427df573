use crate::job::JobFlags;
use crate::types::{CompressionType, DeleteType};

const INCREMENTAL_OPTIONS: &str = "rsync -auq";
const FULL_OPTIONS: &str = "rsync -aq";
const NO_DELTA: &str = " -W";
const TRANSFER_COMPRESSION: &str = " -z";

/// Builds the rsync command line for a job, followed by an archive step when
/// backup compression is requested.
pub fn build_command(source: &str, destination: &str, flags: &JobFlags) -> String {
    let mut out = String::from(if flags.backup_type.is_incremental() {
        INCREMENTAL_OPTIONS
    } else {
        FULL_OPTIONS
    });
    if flags.backup_type.skips_delta() {
        out.push_str(NO_DELTA);
    }
    if flags.transfer_compression {
        out.push_str(TRANSFER_COMPRESSION);
    }
    out.push_str(delete_option(flags.delete_type));
    out.push(' ');
    out.push_str(source);
    out.push(' ');
    out.push_str(destination);

    if flags.backup_compression {
        if let Some((tar, ext)) = archive_command(flags.compression_type) {
            out.push_str(&format!(" && {} {}.{} {}", tar, destination, ext, destination));
        }
    }
    out
}

fn delete_option(delete_type: DeleteType) -> &'static str {
    match delete_type {
        DeleteType::During => " --delete-during",
        DeleteType::After => " --delete-after",
        DeleteType::Before => " --delete-before",
    }
}

fn archive_command(compression: CompressionType) -> Option<(&'static str, &'static str)> {
    match compression {
        CompressionType::None => None,
        CompressionType::Tarball => Some(("tar -cf", "tar")),
        CompressionType::Gz => Some(("tar -czf", "tar.gz")),
        CompressionType::Bz2 => Some(("tar -cjf", "tar.bz2")),
        CompressionType::Xz => Some(("tar -cJf", "tar.xz")),
    }
}
