pub mod job;
pub mod unit;

use crate::error::RbackupError;

pub fn exit_code(err: &RbackupError) -> i32 {
    match err {
        RbackupError::Config(_) => 2,
        RbackupError::DuplicateName(_) => 3,
        RbackupError::NotFound(_) => 4,
        RbackupError::InvalidPath(_) | RbackupError::InvalidJob(_) => 5,
        RbackupError::Io(_) => 6,
        RbackupError::External(_) => 7,
    }
}

pub fn exit_for_error(err: &RbackupError) -> ! {
    eprintln!("{}", err);
    std::process::exit(exit_code(err));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_have_distinct_exit_codes() {
        let codes = [
            exit_code(&RbackupError::DuplicateName("a".into())),
            exit_code(&RbackupError::NotFound("a".into())),
            exit_code(&RbackupError::InvalidPath("a".into())),
            exit_code(&RbackupError::Io("a".into())),
            exit_code(&RbackupError::External("a".into())),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
