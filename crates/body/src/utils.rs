//! Utility macros shared by the encoders.

/// Returns early with an error if a condition is not met.
///
/// Works like `assert!`, but yields `Err($error)` from the enclosing function
/// instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(args.len() % 2 == 0, BodyError::unpaired_arguments(args.len()));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
