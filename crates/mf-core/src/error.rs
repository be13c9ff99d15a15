use thiserror::Error;

pub type MfResult<T> = Result<T, MfError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MfError {
    #[error("Value {value} does not fit in {bits}-bit {what}")]
    WidthOverflow {
        what: &'static str,
        value: u64,
        bits: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_overflow_names_the_width() {
        let err = MfError::WidthOverflow {
            what: "vertex index",
            value: 1 << 40,
            bits: 32,
        };
        assert_eq!(
            err.to_string(),
            "Value 1099511627776 does not fit in 32-bit vertex index"
        );
    }
}
