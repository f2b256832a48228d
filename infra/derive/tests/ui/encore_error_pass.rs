use encore_derive::encore_error;
use std::borrow::Cow;

#[encore_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    let io: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
    io.context("Reading catalog seed")?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading catalog seed): boom");

    let internal: DemoError = "unexpected".into();
    assert!(matches!(internal, DemoError::Internal { .. }));

    let missing: Result<(), DemoError> =
        Err(DemoError::NotFound { message: "product:abc".into(), context: None });
    let err = missing.context("Loading product").unwrap_err();
    assert_eq!(err.to_string(), "Not found (Loading product): product:abc");
}
