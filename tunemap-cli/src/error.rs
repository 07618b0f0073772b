use std::fmt::Display;

pub trait ResultExt<T, E> {
    fn handle_error<F>(self, context: &str) -> Result<T, F>
    where
        E: Display,
        F: From<String>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn handle_error<F>(self, context: &str) -> Result<T, F>
    where
        E: Display,
        F: From<String>,
    {
        self.map_err(|err| F::from(format!("{context} ({err})")))
    }
}
