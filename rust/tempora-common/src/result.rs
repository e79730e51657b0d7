pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

/// The failure path of [`verify_arg`], kept out of line.
#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::Error::invalid_arg(name, condition))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_week_days(days: i32) -> Result<i32> {
        verify_arg!(min_days_in_first_week, (1..=7).contains(&days));
        Ok(days)
    }

    #[test]
    fn verify_arg_passes_and_fails() {
        assert_eq!(check_week_days(4).unwrap(), 4);
        let err = check_week_days(9).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument min_days_in_first_week: (1..=7).contains(&days)"
        );
    }
}
